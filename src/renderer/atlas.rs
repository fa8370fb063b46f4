/// Glyph atlas: rasterizes glyphs and packs them into a GPU texture.
/// Uses fontdue for rasterization and keeps a cache of glyph positions.
/// The texel at (0, 0) is always opaque so solid fills can sample it.

use fontdue::Font;
use std::collections::HashMap;

pub const ATLAS_SIZE: u32 = 1024;
/// Packing starts after the reserved solid texel plus a gap.
const FIRST_SLOT_X: u32 = 2;

/// Position of a glyph within the atlas texture.
#[derive(Debug, Clone, Copy)]
pub struct GlyphEntry {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub offset_x: f32,
    pub offset_y: f32,
}

pub struct GlyphAtlas {
    font: Font,
    font_size: f32,
    /// Atlas pixel data (single channel, alpha)
    pub pixels: Vec<u8>,
    pub atlas_width: u32,
    pub atlas_height: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
    cache: HashMap<char, GlyphEntry>,
    /// Whether atlas texture needs re-upload to GPU
    pub dirty: bool,
    /// Distance from the top of a cell to the baseline
    pub ascent: f32,
}

impl GlyphAtlas {
    pub fn new(font: Font, font_size: f32) -> Self {
        let ascent = font
            .horizontal_line_metrics(font_size)
            .map(|lm| lm.ascent)
            .unwrap_or(font_size);

        let mut pixels = vec![0; (ATLAS_SIZE * ATLAS_SIZE) as usize];
        pixels[0] = 255;

        Self {
            font,
            font_size,
            pixels,
            atlas_width: ATLAS_SIZE,
            atlas_height: ATLAS_SIZE,
            cursor_x: FIRST_SLOT_X,
            cursor_y: 0,
            row_height: 1,
            cache: HashMap::new(),
            dirty: true,
            ascent,
        }
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// UV of the reserved opaque texel, sampled at its center.
    pub fn solid_uv(&self) -> [f32; 2] {
        [0.5 / self.atlas_width as f32, 0.5 / self.atlas_height as f32]
    }

    /// Get or rasterize a glyph, returning its atlas entry.
    pub fn get_glyph(&mut self, ch: char) -> GlyphEntry {
        if let Some(&entry) = self.cache.get(&ch) {
            return entry;
        }
        self.rasterize(ch)
    }

    fn rasterize(&mut self, ch: char) -> GlyphEntry {
        let (metrics, bitmap) = self.font.rasterize(ch, self.font_size);

        let w = metrics.width as u32;
        let h = metrics.height as u32;

        let Some((x, y)) = self.reserve(w, h) else {
            log::warn!("Glyph '{}' ({}x{}) does not fit in the atlas", ch, w, h);
            let entry = GlyphEntry { x: 0, y: 0, width: 0, height: 0, offset_x: 0.0, offset_y: 0.0 };
            self.cache.insert(ch, entry);
            return entry;
        };

        for row in 0..h {
            let src = (row * w) as usize;
            let dst = ((y + row) * self.atlas_width + x) as usize;
            self.pixels[dst..dst + w as usize].copy_from_slice(&bitmap[src..src + w as usize]);
        }

        let entry = GlyphEntry {
            x,
            y,
            width: w,
            height: h,
            offset_x: metrics.xmin as f32,
            offset_y: metrics.ymin as f32,
        };

        self.dirty = true;
        self.cache.insert(ch, entry);
        entry
    }

    /// Claim a `w` x `h` slot with simple row-based packing.
    /// `None` when the bitmap is wider than the atlas or the atlas is full.
    fn reserve(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 1 > self.atlas_width {
            return None;
        }
        if self.cursor_x + w + 1 > self.atlas_width {
            self.cursor_x = 0;
            self.cursor_y += self.row_height + 1;
            self.row_height = 0;
        }
        if self.cursor_y + h > self.atlas_height {
            return None;
        }
        let slot = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + 1;
        self.row_height = self.row_height.max(h);
        Some(slot)
    }

    pub fn glyph_count(&self) -> usize {
        self.cache.len()
    }
}
