/// System font discovery and font file validation.
///
/// Discovery walks a short, platform-specific list of font directories and
/// collects `.ttf` / `.otf` files. Loading a font only validates the bytes;
/// the grid keeps nothing but the file name as its typeface identifier.

use fontdue::{Font, FontSettings};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_TYPEFACE: &str = "monospace";

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf"];

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse font file {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Identifier used to look a font up at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Typeface(String);

impl Typeface {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_TYPEFACE
    }
}

impl Default for Typeface {
    fn default() -> Self {
        Self(DEFAULT_TYPEFACE.into())
    }
}

impl fmt::Display for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directories searched for fonts on this platform.
pub fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if cfg!(target_os = "windows") {
        let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join(".fonts"));
        }
    }
    dirs
}

/// All font files under the platform font directories.
pub fn discover_candidates() -> Vec<PathBuf> {
    discover_in(&font_dirs())
}

/// Walk `dirs` recursively and collect font files. Entries that cannot be
/// read are skipped. Within a directory, entries are visited in name order.
pub fn discover_in(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut fonts = Vec::new();
    for dir in dirs {
        walk(dir, &mut fonts);
    }
    log::debug!("Discovered {} font files", fonts.len());
    fonts
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Skipping font dir {}: {}", dir.display(), e);
            return;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else { continue };
        if file_type.is_dir() {
            walk(&path, out);
        } else if is_font_file(&path) {
            out.push(path);
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.contains(&ext))
}

/// Read and parse the font file at `path`.
pub(crate) fn parse_font(path: &Path) -> Result<Font, FontError> {
    let data = fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_bytes(data.as_slice(), FontSettings::default()).map_err(|reason| {
        FontError::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    })
}

/// Validate the font at `path` and return its file name as a typeface.
/// The parsed font is dropped; glyphs are rasterized later through a `FontBook`.
pub fn load_font(path: &Path) -> Result<Typeface, FontError> {
    parse_font(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    log::info!("Loaded font {} from {}", name, path.display());
    Ok(Typeface::new(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn test_default_typeface() {
        let t = Typeface::default();
        assert_eq!(t.as_str(), DEFAULT_TYPEFACE);
        assert!(t.is_default());
        assert!(!Typeface::new("Mono.ttf").is_default());
        assert_eq!(Typeface::new("Mono.ttf").to_string(), "Mono.ttf");
    }

    #[test]
    fn test_font_dirs_not_empty() {
        assert!(!font_dirs().is_empty());
    }

    #[test]
    fn test_is_font_file() {
        assert!(is_font_file(Path::new("/a/b/Mono.ttf")));
        assert!(is_font_file(Path::new("Sans.otf")));
        assert!(!is_font_file(Path::new("Sans.woff2")));
        assert!(!is_font_file(Path::new("ttf")));
        assert!(!is_font_file(Path::new("/a/b/README")));
    }

    #[test]
    fn test_discover_walks_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype").join("dejavu");
        fs::create_dir_all(&nested).unwrap();
        File::create(dir.path().join("b.otf")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(nested.join("a.ttf")).unwrap();

        let found = discover_in(&[dir.path().to_path_buf()]);
        assert_eq!(found.len(), 2);
        assert!(found.contains(&dir.path().join("b.otf")));
        assert!(found.contains(&nested.join("a.ttf")));
    }

    #[test]
    fn test_discover_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.ttf", "a.ttf", "b.otf"] {
            File::create(dir.path().join(name)).unwrap();
        }
        let found = discover_in(&[dir.path().to_path_buf()]);
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.ttf", "b.otf", "c.ttf"]);
    }

    #[test]
    fn test_discover_missing_dir_skipped() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("x.ttf")).unwrap();
        let found = discover_in(&[
            PathBuf::from("/definitely/not/a/font/dir"),
            dir.path().to_path_buf(),
        ]);
        assert_eq!(found, vec![dir.path().join("x.ttf")]);
    }

    #[test]
    fn test_load_missing_font_is_read_error() {
        let err = load_font(Path::new("/definitely/not/here.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Read { .. }));
        assert!(err.to_string().contains("here.ttf"));
    }

    #[test]
    fn test_load_garbage_font_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.ttf");
        let mut f = File::create(&path).unwrap();
        let bytes: Vec<u8> = (0..512u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        f.write_all(&bytes).unwrap();

        let err = load_font(&path).unwrap_err();
        assert!(matches!(err, FontError::Parse { .. }));
    }

    #[test]
    fn test_load_empty_font_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.otf");
        File::create(&path).unwrap();
        assert!(matches!(load_font(&path), Err(FontError::Parse { .. })));
    }

    #[test]
    fn test_load_valid_font_records_base_name() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype");
        fs::create_dir_all(&nested).unwrap();
        let path = crate::font::test_font::write_to(&nested, "TinyMono.ttf");

        let typeface = load_font(&path).unwrap();
        assert_eq!(typeface, Typeface::new("TinyMono.ttf"));
    }
}
