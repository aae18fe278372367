//! # Pixel-to-text rendering
//!
//! ```text
//!   DynamicImage ──► FrameRenderer ──► encoder ──► String
//!                    (resize, RGB)     (runs)        │
//!                                                    ▼
//!                                  AnimationDriver (multi-frame only)
//! ```
//!
//! One terminal cell per source pixel: every pixel becomes a single `▄`
//! glyph colored with a 24-bit foreground escape.

pub mod ansi;
mod animation;
mod buffer;
pub mod encoder;
mod frame;

pub use animation::{AnimationDriver, FRAME_INTERVAL};
pub use buffer::{BufferScope, RenderBuffer};
pub use encoder::{encode, Run, Runs, GLYPH};
pub use frame::{target_dimensions, FrameRenderer, RenderedFrame, ResizeFilter};
