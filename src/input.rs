/// Keyboard dispatch: only Enter is wired to the grid; every other key is ignored.

use crate::core::GlyphGrid;
use winit::keyboard::{Key, NamedKey};

pub struct InputDispatcher;

impl InputDispatcher {
    /// Apply `key` to `grid`. Returns whether the key was handled.
    pub fn dispatch(grid: &mut GlyphGrid, key: &Key) -> bool {
        match key {
            Key::Named(NamedKey::Enter) => {
                grid.new_line();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CursorPos;

    #[test]
    fn test_enter_advances_line() {
        let mut g = GlyphGrid::new(3, 5);
        g.set_text("ab");
        assert!(InputDispatcher::dispatch(&mut g, &Key::Named(NamedKey::Enter)));
        assert_eq!(g.cursor(), CursorPos { row: 1, col: 0 });
    }

    #[test]
    fn test_enter_on_last_row() {
        let mut g = GlyphGrid::new(1, 5);
        assert!(InputDispatcher::dispatch(&mut g, &Key::Named(NamedKey::Enter)));
        assert_eq!(g.cursor(), CursorPos::default());
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut g = GlyphGrid::new(3, 5);
        g.mark_drawn();
        let keys = [
            Key::Named(NamedKey::ArrowUp),
            Key::Named(NamedKey::ArrowLeft),
            Key::Named(NamedKey::Backspace),
            Key::Character("x".into()),
        ];
        for key in &keys {
            assert!(!InputDispatcher::dispatch(&mut g, key));
        }
        assert_eq!(g.cursor(), CursorPos::default());
        assert_eq!(g.row_text(0), "");
        assert!(!g.needs_redraw());
    }
}
