//! Image acquisition: path/URL validation, download cache, decoding

mod decode;
mod loader;

pub use decode::{open_image, Animation, DecodedImage};
pub use loader::{cache_file_name, ImageSource};
