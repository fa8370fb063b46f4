use crate::font::{self, FontError, Typeface};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Translucent overlay painted over the cursor cell.
    pub const CURSOR: Self = Self { r: 255, g: 255, b: 255, a: 128 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`; the leading `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) || (hex.len() != 6 && hex.len() != 8) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Some(Self { r: byte(0)?, g: byte(2)?, b: byte(4)?, a })
    }
}

/// Cursor position in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPos {
    pub row: usize,
    pub col: usize,
}

/// Pixel size of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CellSize {
    fn default() -> Self {
        Self { width: 10, height: 20 }
    }
}

pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Fixed-size character grid with a write cursor.
///
/// Cells live in one row-major buffer; `None` marks a blank cell. The
/// dimensions never change after construction. The cursor column can rest
/// at `cols` once the last row is full, and appends are dropped from then
/// on since there is no scrolling.
pub struct GlyphGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<char>>,
    cell_size: CellSize,
    text_color: Color,
    background_color: Color,
    cursor: CursorPos,
    typeface: Typeface,
    font_size: f32,
    needs_redraw: bool,
}

impl GlyphGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            cell_size: CellSize::default(),
            text_color: Color::WHITE,
            background_color: Color::BLACK,
            cursor: CursorPos::default(),
            typeface: Typeface::default(),
            font_size: DEFAULT_FONT_SIZE,
            needs_redraw: true,
        }
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn cursor(&self) -> CursorPos { self.cursor }
    pub fn cell_size(&self) -> CellSize { self.cell_size }
    pub fn text_color(&self) -> Color { self.text_color }
    pub fn background_color(&self) -> Color { self.background_color }
    pub fn typeface(&self) -> &Typeface { &self.typeface }
    pub fn font_size(&self) -> f32 { self.font_size }

    /// Set by every mutation. The renderer repaints regardless.
    pub fn needs_redraw(&self) -> bool { self.needs_redraw }

    pub fn mark_drawn(&mut self) {
        self.needs_redraw = false;
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Character at `(row, col)`, `None` for blank or out-of-range cells.
    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    /// Write a character; out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, ch: char) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = Some(ch);
            self.needs_redraw = true;
        }
    }

    /// Write at the cursor and advance, wrapping to the next row.
    pub fn append_char(&mut self, ch: char) {
        if self.cursor.col >= self.cols {
            return;
        }
        let i = self.cursor.row * self.cols + self.cursor.col;
        self.cells[i] = Some(ch);
        self.cursor.col += 1;
        if self.cursor.col >= self.cols {
            self.new_line();
        }
        self.needs_redraw = true;
    }

    /// Move to the start of the next row. No-op on the last row.
    pub fn new_line(&mut self) {
        if self.cursor.row + 1 < self.rows {
            self.cursor.row += 1;
            self.cursor.col = 0;
            self.needs_redraw = true;
        }
    }

    /// Erase the previous cell, or step back to the end of the previous row's content.
    pub fn backspace(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
            let i = self.cursor.row * self.cols + self.cursor.col;
            self.cells[i] = None;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.cols - 1;
            while self.cursor.col > 0 && self.cell(self.cursor.row, self.cursor.col - 1).is_none() {
                self.cursor.col -= 1;
            }
        }
        self.needs_redraw = true;
    }

    /// Rewind the cursor to the origin and write `text` over existing cells.
    pub fn set_text(&mut self, text: &str) {
        self.cursor = CursorPos::default();
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\u{0085}' | '\u{2028}' => self.new_line(),
                _ => self.append_char(ch),
            }
        }
        self.needs_redraw = true;
    }

    /// Recompute cell size from the viewport; leftover pixels stay unused.
    pub fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        self.cell_size = CellSize {
            width: pixel_width / self.cols as u32,
            height: pixel_height / self.rows as u32,
        };
        self.needs_redraw = true;
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.needs_redraw = true;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
        self.needs_redraw = true;
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
        self.needs_redraw = true;
    }

    pub fn set_font(&mut self, typeface: Typeface) {
        self.typeface = typeface;
        self.needs_redraw = true;
    }

    /// Validate the font file at `path` and adopt its file name as the typeface.
    /// On error the current typeface is kept.
    pub fn set_font_from_path(&mut self, path: &Path) -> Result<(), FontError> {
        let typeface = font::load_font(path)?;
        self.set_font(typeface);
        Ok(())
    }

    /// Row contents with blanks as spaces and trailing blanks trimmed.
    pub fn row_text(&self, row: usize) -> String {
        (0..self.cols)
            .map(|c| self.cell(row, c).unwrap_or(' '))
            .collect::<String>()
            .trim_end()
            .to_string()
    }
}
