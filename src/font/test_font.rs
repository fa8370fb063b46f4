//! Smallest TrueType file that parses: `head`, `hhea` and `maxp` tables only,
//! one glyph without an outline. Units per em 1000, ascender 800, descender -200.

use std::fs;
use std::path::{Path, PathBuf};

fn head() -> Vec<u8> {
    let mut t = vec![0u8; 54];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    t[12..16].copy_from_slice(&0x5F0F_3CF5u32.to_be_bytes()); // magic
    t[18..20].copy_from_slice(&1000u16.to_be_bytes()); // units per em
    t
}

fn hhea() -> Vec<u8> {
    let mut t = vec![0u8; 36];
    t[0..4].copy_from_slice(&0x0001_0000u32.to_be_bytes());
    t[4..6].copy_from_slice(&800i16.to_be_bytes());
    t[6..8].copy_from_slice(&(-200i16).to_be_bytes());
    t[34..36].copy_from_slice(&1u16.to_be_bytes()); // h metrics
    t
}

fn maxp() -> Vec<u8> {
    let mut t = Vec::with_capacity(6);
    t.extend_from_slice(&0x0000_5000u32.to_be_bytes());
    t.extend_from_slice(&1u16.to_be_bytes()); // glyphs
    t
}

pub fn bytes() -> Vec<u8> {
    // Table records must be sorted by tag.
    let tables: [(&[u8; 4], Vec<u8>); 3] = [(b"head", head()), (b"hhea", hhea()), (b"maxp", maxp())];

    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&[0u8; 6]); // search range, entry selector, range shift

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        out.extend_from_slice(*tag);
        out.extend_from_slice(&0u32.to_be_bytes()); // checksum
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    out.extend_from_slice(&body);
    out
}

pub fn write_to(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes()).unwrap();
    path
}
