/// Frame building: turns grid state into an ordered list of draw commands.
/// Every frame is a full repaint; the grid's dirty flag is not consulted.

use crate::core::{Color, GlyphGrid};
use crate::font::Typeface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    Glyph {
        x: u32,
        y: u32,
        ch: char,
        color: Color,
        typeface: Typeface,
        size: f32,
    },
}

/// Display list for one frame, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub surface_width: u32,
    pub surface_height: u32,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn glyph_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glyph { .. }))
            .count()
    }
}

pub struct FrameRenderer;

impl FrameRenderer {
    /// Background, then one glyph per non-blank cell, then the cursor overlay.
    pub fn render(grid: &GlyphGrid, surface_width: u32, surface_height: u32) -> Frame {
        let cell = grid.cell_size();
        let mut commands = Vec::with_capacity(grid.rows() * grid.cols() + 2);

        commands.push(DrawCommand::FillRect {
            rect: Rect {
                x: 0,
                y: 0,
                width: cell.width * grid.cols() as u32,
                height: cell.height * grid.rows() as u32,
            },
            color: grid.background_color(),
        });

        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let Some(ch) = grid.cell(row, col) else { continue };
                commands.push(DrawCommand::Glyph {
                    x: col as u32 * cell.width,
                    y: row as u32 * cell.height,
                    ch,
                    color: grid.text_color(),
                    typeface: grid.typeface().clone(),
                    size: grid.font_size(),
                });
            }
        }

        // A full last row parks the cursor one past the edge.
        let cursor = grid.cursor();
        let col = cursor.col.min(grid.cols() - 1) as u32;
        commands.push(DrawCommand::FillRect {
            rect: Rect {
                x: col * cell.width,
                y: cursor.row as u32 * cell.height,
                width: cell.width,
                height: cell.height,
            },
            color: Color::CURSOR,
        });

        Frame { surface_width, surface_height, commands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_text(text: &str) -> GlyphGrid {
        let mut g = GlyphGrid::new(3, 4);
        g.resize(40, 60);
        g.set_text(text);
        g
    }

    #[test]
    fn test_empty_grid_background_and_cursor() {
        let g = grid_with_text("");
        let frame = FrameRenderer::render(&g, 40, 60);
        assert_eq!(frame.commands.len(), 2);
        assert_eq!(
            frame.commands[0],
            DrawCommand::FillRect {
                rect: Rect { x: 0, y: 0, width: 40, height: 60 },
                color: Color::BLACK,
            }
        );
        assert_eq!(
            frame.commands[1],
            DrawCommand::FillRect {
                rect: Rect { x: 0, y: 0, width: 10, height: 20 },
                color: Color::CURSOR,
            }
        );
    }

    #[test]
    fn test_background_ignores_remainder_pixels() {
        let mut g = GlyphGrid::new(3, 4);
        g.resize(43, 62);
        let frame = FrameRenderer::render(&g, 43, 62);
        match &frame.commands[0] {
            DrawCommand::FillRect { rect, .. } => {
                assert_eq!((rect.width, rect.height), (40, 60));
            }
            other => panic!("expected background, got {:?}", other),
        }
        assert_eq!((frame.surface_width, frame.surface_height), (43, 62));
    }

    #[test]
    fn test_glyph_offsets_row_major() {
        let g = grid_with_text("ab\nc");
        let frame = FrameRenderer::render(&g, 40, 60);
        assert_eq!(frame.glyph_count(), 3);

        let glyphs: Vec<(u32, u32, char)> = frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Glyph { x, y, ch, .. } => Some((*x, *y, *ch)),
                _ => None,
            })
            .collect();
        assert_eq!(glyphs, vec![(0, 0, 'a'), (10, 0, 'b'), (0, 20, 'c')]);
    }

    #[test]
    fn test_glyph_carries_font_and_color() {
        let mut g = grid_with_text("x");
        g.set_text_color(Color::rgb(10, 20, 30));
        g.set_font(Typeface::new("Mono.ttf"));
        g.set_font_size(18.0);
        let frame = FrameRenderer::render(&g, 40, 60);
        assert_eq!(
            frame.commands[1],
            DrawCommand::Glyph {
                x: 0,
                y: 0,
                ch: 'x',
                color: Color::rgb(10, 20, 30),
                typeface: Typeface::new("Mono.ttf"),
                size: 18.0,
            }
        );
    }

    #[test]
    fn test_cursor_is_last_and_translucent() {
        let g = grid_with_text("ab\nc");
        let frame = FrameRenderer::render(&g, 40, 60);
        let last = frame.commands.last().unwrap();
        assert_eq!(
            *last,
            DrawCommand::FillRect {
                rect: Rect { x: 10, y: 20, width: 10, height: 20 },
                color: Color::CURSOR,
            }
        );
        assert_eq!(Color::CURSOR.a, 128);
    }

    #[test]
    fn test_cursor_clamped_on_full_last_row() {
        let mut g = GlyphGrid::new(1, 3);
        g.resize(30, 20);
        g.set_text("abc");
        assert_eq!(g.cursor().col, 3);
        let frame = FrameRenderer::render(&g, 30, 20);
        match frame.commands.last().unwrap() {
            DrawCommand::FillRect { rect, .. } => assert_eq!(rect.x, 20),
            other => panic!("expected cursor rect, got {:?}", other),
        }
    }

    #[test]
    fn test_render_does_not_clear_dirty_flag() {
        let g = grid_with_text("a");
        assert!(g.needs_redraw());
        let _ = FrameRenderer::render(&g, 40, 60);
        assert!(g.needs_redraw());
    }
}
