//! Minimal audio files for tests: a few silent MPEG-1 Layer III frames behind
//! an ID3v2.3 tag, and a FLAC stream with STREAMINFO and Vorbis comments.

use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct Tags {
    pub title: &'static str,
    pub artist: &'static str,
    pub album: &'static str,
    pub genre: &'static str,
    pub year: &'static str,
}

// 128 kbps, 44.1 kHz, no padding, no CRC: 144 * 128000 / 44100 = 417 bytes.
const MPEG_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
const MPEG_FRAME_LEN: usize = 417;
const MPEG_FRAME_COUNT: usize = 8;

pub fn write_mp3(path: &Path, tags: &Tags) {
    let mut out = id3v23(tags);
    for _ in 0..MPEG_FRAME_COUNT {
        out.extend_from_slice(&MPEG_FRAME_HEADER);
        out.resize(out.len() + MPEG_FRAME_LEN - MPEG_FRAME_HEADER.len(), 0);
    }
    fs::write(path, out).unwrap();
}

fn id3v23(tags: &Tags) -> Vec<u8> {
    let mut frames = Vec::new();
    for (id, text) in [
        (b"TIT2", tags.title),
        (b"TPE1", tags.artist),
        (b"TALB", tags.album),
        (b"TCON", tags.genre),
        (b"TYER", tags.year),
    ] {
        if text.is_empty() {
            continue;
        }
        frames.extend_from_slice(id);
        frames.extend_from_slice(&((text.len() + 1) as u32).to_be_bytes());
        frames.extend_from_slice(&[0, 0]);
        frames.push(0);
        frames.extend_from_slice(text.as_bytes());
    }
    if frames.is_empty() {
        return frames;
    }

    let mut out = b"ID3".to_vec();
    out.extend_from_slice(&[3, 0, 0]);
    out.extend_from_slice(&synchsafe(frames.len() as u32));
    out.extend_from_slice(&frames);
    out
}

fn synchsafe(value: u32) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

const FLAC_SAMPLE_RATE: u64 = 44_100;

pub fn write_flac(path: &Path, tags: &Tags) {
    let mut out = b"fLaC".to_vec();

    let mut streaminfo = Vec::with_capacity(34);
    streaminfo.extend_from_slice(&4096u16.to_be_bytes());
    streaminfo.extend_from_slice(&4096u16.to_be_bytes());
    streaminfo.extend_from_slice(&[0; 6]);
    // sample rate (20) | channels - 1 (3) | bits per sample - 1 (5) | total samples (36)
    let packed = (FLAC_SAMPLE_RATE << 44) | (1 << 41) | (15 << 36) | FLAC_SAMPLE_RATE;
    streaminfo.extend_from_slice(&packed.to_be_bytes());
    streaminfo.extend_from_slice(&[0; 16]);
    push_block(&mut out, 0, false, &streaminfo);

    let mut comments = Vec::new();
    let vendor = b"fixture";
    comments.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    comments.extend_from_slice(vendor);
    let fields: Vec<String> = [
        ("TITLE", tags.title),
        ("ARTIST", tags.artist),
        ("ALBUM", tags.album),
        ("GENRE", tags.genre),
        ("DATE", tags.year),
    ]
    .iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(key, value)| format!("{}={}", key, value))
    .collect();
    comments.extend_from_slice(&(fields.len() as u32).to_le_bytes());
    for field in &fields {
        comments.extend_from_slice(&(field.len() as u32).to_le_bytes());
        comments.extend_from_slice(field.as_bytes());
    }
    push_block(&mut out, 4, true, &comments);

    out.resize(out.len() + 64, 0);
    fs::write(path, out).unwrap();
}

fn push_block(out: &mut Vec<u8>, block_type: u8, last: bool, body: &[u8]) {
    let flag = if last { 0x80 } else { 0 };
    out.push(flag | block_type);
    let len = (body.len() as u32).to_be_bytes();
    out.extend_from_slice(&len[1..]);
    out.extend_from_slice(body);
}
