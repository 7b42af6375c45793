//! # Tessera Engine
//!
//! The frame driver tying the Tessera core together. The platform boundary
//! (window, events, present loop) lives outside this workspace; it supplies
//! an [`input::InputState`] snapshot and an RGBA32 framebuffer each tick,
//! calls [`frame::Engine::frame`], and observes
//! [`frame::Engine::should_quit`].
//!
//! ```no_run
//! use tessera_engine::prelude::*;
//! use tessera_render::{FontAtlas, ImageMut};
//!
//! let config = EngineConfig::load_or_default("tessera.toml");
//! let font = FontAtlas::load_png("resources/font.png", config.atlas_cols, config.atlas_rows)
//!     .expect("font atlas");
//! let mut input = InputState::new(config.key_repeat_delay, config.key_repeat_period);
//! let mut engine = Engine::new(config, font).expect("engine");
//!
//! let (width, height) = (1280, 720);
//! let mut pixels = vec![0u32; width as usize * height as usize];
//! while !engine.should_quit() {
//!     // ...platform fills `input` and `pixels` is presented afterwards...
//!     let mut frame = ImageMut::from_pixels(&mut pixels, width, height).expect("framebuffer");
//!     engine.frame(&mut input, &mut frame).expect("frame");
//!     input.next_frame();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod frame;
pub mod input;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::frame::*;
    pub use crate::input::*;
}

pub use prelude::*;
