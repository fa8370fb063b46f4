pub mod config;
pub mod core;
pub mod font;
pub mod input;
pub mod platform;
pub mod renderer;
