//! # pixcat
//!
//! Renders raster images, static or animated, as 24-bit colored block
//! characters in a terminal. Each source pixel becomes one `▄` cell;
//! consecutive pixels of the same color on a row share one color escape.
//!
//! ```no_run
//! # async fn demo() -> pixcat::Result<()> {
//! use pixcat::{Size, TermImage};
//!
//! let mut image = TermImage::from_file("cat.gif", Some(Size::new(32, 16)))?;
//! image.draw(&mut std::io::stdout(), async {
//!     let _ = tokio::signal::ctrl_c().await;
//! }).await
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod geometry;
pub mod render;
pub mod source;
pub mod term_image;

pub use config::Config;
pub use errors::{PixcatError, Result};
pub use geometry::{Size, DEFAULT_SIZE};
pub use render::{AnimationDriver, FrameRenderer, RenderedFrame, ResizeFilter};
pub use source::{open_image, Animation, DecodedImage, ImageSource};
pub use term_image::TermImage;
