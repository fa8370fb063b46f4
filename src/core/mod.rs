mod grid;

pub use grid::{CellSize, Color, CursorPos, GlyphGrid, DEFAULT_FONT_SIZE};
