/// Configuration: TOML-based with sensible defaults.
/// Config file: `~/.config/termgrid/config.toml`

use crate::core::{Color, DEFAULT_FONT_SIZE};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_TEXT: &str = "Привет, мир!\nЭто тестовый текст для TermGrid.\nОн занимает несколько строк.";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub font: FontConfig,
    pub window: WindowConfig,
    pub colors: ColorConfig,
    /// Text written into the grid at startup
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f32,
    /// Font file to load instead of the first discovered one
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub foreground: String,
    pub background: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            font: FontConfig::default(),
            window: WindowConfig::default(),
            colors: ColorConfig::default(),
            text: DEFAULT_TEXT.into(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { rows: 20, cols: 40 }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: DEFAULT_FONT_SIZE, path: None }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Term".into(),
            width: 1200,
            height: 800,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            foreground: "#ffffff".into(),
            background: "#000000".into(),
        }
    }
}

impl ColorConfig {
    pub fn foreground(&self) -> Color {
        parse_or(&self.foreground, Color::WHITE)
    }

    pub fn background(&self) -> Color {
        parse_or(&self.background, Color::BLACK)
    }
}

fn parse_or(hex: &str, fallback: Color) -> Color {
    Color::from_hex(hex).unwrap_or_else(|| {
        log::warn!("Invalid color {:?}, using default", hex);
        fallback
    })
}

impl Config {
    /// Config file path: `~/.config/termgrid/config.toml`
    pub fn path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Load config from file, falling back to defaults.
    pub fn load() -> Self {
        let path = Self::path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                log::info!("Loading config from {}", path.display());
                Self::from_str(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    /// Parse config from TOML string.
    pub fn from_str(s: &str) -> Self {
        toml::from_str(s).unwrap_or_else(|e| {
            log::warn!("Invalid config, using defaults: {}", e);
            Self::default()
        })
    }
}

fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".config").join("termgrid")
}
