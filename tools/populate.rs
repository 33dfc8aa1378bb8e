mod config;

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use config::{config_path, load_or_create_config, resolve_path};
use library::{check_root, import_tree, Catalog, ImportOptions, ImportStats};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "populate".to_string());
    let music_dir = match args.next() {
        Some(dir) => PathBuf::from(dir),
        None => {
            print_usage(&program);
            return ExitCode::SUCCESS;
        }
    };
    let server_dir = args
        .next()
        .or_else(|| env::var("CADENCE_SERVER_DIR").ok())
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    match run(&music_dir, &server_dir) {
        Ok(stats) => {
            println!(
                "Imported {} new tracks from {:?} ({} already catalogued, {} skipped)",
                stats.inserted,
                music_dir,
                stats.already_present,
                stats.tag_errors.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error in {:?}: {}", music_dir, err);
            ExitCode::FAILURE
        }
    }
}

fn run(music_dir: &Path, server_dir: &Path) -> Result<ImportStats, Box<dyn std::error::Error>> {
    // Nothing is written under server_dir until the music root is known to exist.
    check_root(music_dir)?;

    let config_path = config_path(server_dir);
    let (config, created) = load_or_create_config(&config_path)?;
    if created {
        info!("Created default config at {:?}", config_path);
    } else {
        info!("Loaded config from {:?}", config_path);
    }

    let catalog_path = resolve_path(&config_path, &config.catalog_path);
    let catalog = Catalog::open(&catalog_path, config.busy_timeout())?;
    info!("Using catalog {:?}", catalog_path);

    let options = ImportOptions {
        follow_links: config.follow_links,
    };
    let stats = import_tree(music_dir, &catalog, &options)?;
    Ok(stats)
}

fn print_usage(program: &str) {
    println!("Usage: {} music_dir [server_dir]", program);
    println!("music_dir is the directory containing music to be parsed.");
    println!("server_dir is the path to a cadence-server install whose config.yaml");
    println!("  supplies the catalog location (defaults to $CADENCE_SERVER_DIR or .).");
}
