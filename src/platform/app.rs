/// Window application: connects the winit window, wgpu renderer and glyph grid.

use crate::config::Config;
use crate::core::GlyphGrid;
use crate::font::{self, FontBook, Typeface};
use crate::input::InputDispatcher;
use crate::renderer::atlas::ATLAS_SIZE;
use crate::renderer::{FrameRenderer, GlyphAtlas, RenderState};

use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

pub struct App {
    config: Config,
    window: Option<Arc<Window>>,
    render: Option<RenderState>,
    grid: GlyphGrid,
    fonts: FontBook,
    atlas: Option<GlyphAtlas>,
    /// Typeface and size the current atlas was built for
    atlas_key: Option<(Typeface, u32)>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut grid = GlyphGrid::new(config.grid.rows, config.grid.cols);
        grid.set_font_size(config.font.size);
        grid.set_text_color(config.colors.foreground());
        grid.set_background_color(config.colors.background());

        let candidates = font::discover_candidates();
        let chosen = config.font.path.clone().or_else(|| candidates.first().cloned());
        match chosen {
            Some(path) => {
                if let Err(e) = grid.set_font_from_path(&path) {
                    log::warn!("Error setting font: {}", e);
                }
            }
            None => log::warn!("No font files found, keeping typeface {}", grid.typeface()),
        }

        let mut book_paths = candidates;
        if let Some(path) = &config.font.path {
            book_paths.insert(0, path.clone());
        }

        grid.set_text(&config.text);

        Self {
            config,
            window: None,
            render: None,
            grid,
            fonts: FontBook::new(&book_paths),
            atlas: None,
            atlas_key: None,
        }
    }

    pub fn grid(&self) -> &GlyphGrid {
        &self.grid
    }

    /// Rebuild the atlas when the grid's typeface or size changed.
    fn sync_atlas(&mut self) {
        let key = (self.grid.typeface().clone(), self.grid.font_size().to_bits());
        if self.atlas_key.as_ref() == Some(&key) {
            return;
        }
        self.atlas = self
            .fonts
            .resolve(self.grid.typeface())
            .map(|font| GlyphAtlas::new(font, self.grid.font_size()));
        if self.atlas.is_none() {
            log::warn!("No usable font for {}, drawing without glyphs", self.grid.typeface());
        }
        self.atlas_key = Some(key);
    }

    fn render_frame(&mut self) {
        let Some(window) = &self.window else { return };
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.grid.resize(size.width, size.height);
        self.sync_atlas();

        let frame = FrameRenderer::render(&self.grid, size.width, size.height);
        if let Some(render) = &mut self.render {
            render.draw(&frame, self.atlas.as_mut());
        }
        self.grid.mark_drawn();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let max_quads = self.grid.rows() * self.grid.cols() + 2;
        match RenderState::new(window.clone(), (ATLAS_SIZE, ATLAS_SIZE), max_quads) {
            Ok(render) => self.render = Some(render),
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(render) = &mut self.render {
                    render.resize(size.width, size.height);
                }
                self.grid.resize(size.width, size.height);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && InputDispatcher::dispatch(&mut self.grid, &event.logical_key)
                {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }

            WindowEvent::RedrawRequested => self.render_frame(),

            _ => {}
        }
    }
}
