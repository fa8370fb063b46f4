pub mod atlas;
pub mod frame;
pub mod pipeline;

pub use atlas::GlyphAtlas;
pub use frame::{DrawCommand, Frame, FrameRenderer, Rect};
pub use pipeline::{RenderError, RenderState};
