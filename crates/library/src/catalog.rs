use std::fs;
use std::path::Path;
use std::time::Duration;

use common::TrackRecord;
use rusqlite::{params, Connection, OptionalExtension, Row};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS cadence (
    title  TEXT NOT NULL DEFAULT '',
    album  TEXT NOT NULL DEFAULT '',
    artist TEXT NOT NULL DEFAULT '',
    genre  TEXT NOT NULL DEFAULT '',
    year   INTEGER NOT NULL DEFAULT 0,
    path   TEXT NOT NULL UNIQUE
)";

// The conflict clause is evaluated by the engine inside the statement, so two
// runs racing on the same path cannot both insert it.
const INSERT_IF_ABSENT_SQL: &str = "INSERT INTO cadence (title, album, artist, genre, year, path)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
     ON CONFLICT(path) DO NOTHING";

const SELECT_COLUMNS: &str = "SELECT title, album, artist, genre, year, path FROM cadence";

/// Handle on the track catalog. Owns the connection; dropping the catalog
/// closes it.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self, CatalogError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, CatalogError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, CatalogError> {
        conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(Self { conn })
    }

    /// Inserts `record` unless a row with the same path exists. Returns whether
    /// a row was written.
    pub fn insert_if_absent(&self, record: &TrackRecord) -> Result<bool, CatalogError> {
        let mut stmt = self.conn.prepare_cached(INSERT_IF_ABSENT_SQL)?;
        let changed = stmt.execute(params![
            record.title,
            record.album,
            record.artist,
            record.genre,
            record.year,
            record.path,
        ])?;
        Ok(changed == 1)
    }

    pub fn count(&self) -> Result<usize, CatalogError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cadence", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }

    pub fn get(&self, path: &str) -> Result<Option<TrackRecord>, CatalogError> {
        let sql = format!("{} WHERE path = ?1", SELECT_COLUMNS);
        let record = self
            .conn
            .query_row(&sql, params![path], record_from_row)
            .optional()?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<TrackRecord>, CatalogError> {
        let sql = format!("{} ORDER BY path", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], record_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<TrackRecord> {
    Ok(TrackRecord {
        title: row.get(0)?,
        album: row.get(1)?,
        artist: row.get(2)?,
        genre: row.get(3)?,
        year: row.get(4)?,
        path: row.get(5)?,
    })
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(err) => write!(f, "io error: {}", err),
            CatalogError::Sqlite(err) => write!(f, "db error: {}", err),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(err) => Some(err),
            CatalogError::Sqlite(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Sqlite(err)
    }
}
