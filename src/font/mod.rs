mod book;
mod resolver;

#[cfg(test)]
pub(crate) mod test_font;

pub use book::FontBook;
pub use resolver::{
    discover_candidates, discover_in, font_dirs, load_font, FontError, Typeface, DEFAULT_TYPEFACE,
};
