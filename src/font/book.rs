/// Maps typeface identifiers back to font files for rasterization.
///
/// The grid only remembers a file name, so the renderer looks the name up
/// among the discovered candidates. Unknown names (including the default
/// typeface) fall back to the first candidate that parses.

use super::resolver::{parse_font, Typeface};
use fontdue::Font;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct FontBook {
    by_name: HashMap<String, PathBuf>,
    order: Vec<PathBuf>,
}

impl FontBook {
    pub fn new(candidates: &[PathBuf]) -> Self {
        let mut by_name = HashMap::new();
        for path in candidates {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                // First occurrence wins, matching discovery order.
                by_name.entry(name.to_string()).or_insert_with(|| path.clone());
            }
        }
        Self { by_name, order: candidates.to_vec() }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn path_of(&self, typeface: &Typeface) -> Option<&PathBuf> {
        self.by_name.get(typeface.as_str())
    }

    /// Parsed font for `typeface`, or the first usable fallback.
    pub fn resolve(&self, typeface: &Typeface) -> Option<Font> {
        if let Some(path) = self.path_of(typeface) {
            match parse_font(path) {
                Ok(font) => return Some(font),
                Err(e) => log::warn!("Typeface {} unusable: {}", typeface, e),
            }
        } else if !typeface.is_default() {
            log::debug!("Typeface {} not found, using fallback", typeface);
        }

        self.order.iter().find_map(|path| match parse_font(path) {
            Ok(font) => Some(font),
            Err(e) => {
                log::debug!("Skipping fallback font: {}", e);
                None
            }
        })
    }
}
