//! Opening decoded images
//!
//! Whether an image is animated is decided by what the container exposes:
//! GIF, APNG and animated WebP files with more than one frame become
//! [`DecodedImage::Animated`], everything else is [`DecodedImage::Static`].

use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, Frames, ImageFormat, ImageReader};
use tracing::{debug, instrument};

use crate::errors::{PixcatError, Result};

/// All frames of a multi-frame image, decoded up front
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<DynamicImage>,
}

impl Animation {
    pub fn new(frames: Vec<DynamicImage>) -> Result<Self> {
        if frames.is_empty() {
            return Err(PixcatError::InvalidInput(
                "an animation needs at least one frame".to_string(),
            ));
        }
        Ok(Self { frames })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[DynamicImage] {
        &self.frames
    }

    /// Seek to frame `index`
    pub fn frame(&self, index: usize) -> Option<&DynamicImage> {
        self.frames.get(index)
    }
}

/// A decoded image, dispatched on whether it has multiple frames
#[derive(Debug, Clone)]
pub enum DecodedImage {
    Static(DynamicImage),
    Animated(Animation),
}

impl DecodedImage {
    pub fn frame_count(&self) -> usize {
        match self {
            Self::Static(_) => 1,
            Self::Animated(animation) => animation.frame_count(),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Self::Animated(_))
    }
}

/// Decode the image at `path`
///
/// Decoder errors are returned as [`PixcatError::Decode`] without
/// reinterpretation.
#[instrument(level = "debug")]
pub fn open_image(path: &Path) -> Result<DecodedImage> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    debug!(?format, "guessed image format");

    let decoded = match format {
        Some(ImageFormat::Gif) => from_frames(GifDecoder::new(reader.into_inner())?.into_frames())?,
        Some(ImageFormat::Png) => {
            let mut decoder = PngDecoder::new(reader.into_inner())?;
            if decoder.is_apng()? {
                from_frames(decoder.apng()?.into_frames())?
            } else {
                DecodedImage::Static(DynamicImage::from_decoder(decoder)?)
            }
        }
        Some(ImageFormat::WebP) => {
            let decoder = WebPDecoder::new(reader.into_inner())?;
            if decoder.has_animation() {
                from_frames(decoder.into_frames())?
            } else {
                DecodedImage::Static(DynamicImage::from_decoder(decoder)?)
            }
        }
        _ => DecodedImage::Static(reader.decode()?),
    };

    debug!(frames = decoded.frame_count(), "decoded image");
    Ok(decoded)
}

fn from_frames(frames: Frames<'_>) -> Result<DecodedImage> {
    let mut frames: Vec<DynamicImage> = frames
        .collect_frames()?
        .into_iter()
        .map(|frame| DynamicImage::ImageRgba8(frame.into_buffer()))
        .collect();

    if frames.len() == 1 {
        if let Some(only) = frames.pop() {
            return Ok(DecodedImage::Static(only));
        }
    }
    Animation::new(frames).map(DecodedImage::Animated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Frame, Rgba, RgbaImage};
    use std::fs::File;
    use tempfile::TempDir;

    fn write_gif(path: &Path, colors: &[[u8; 4]]) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        let frames = colors
            .iter()
            .map(|c| Frame::new(RgbaImage::from_pixel(4, 3, Rgba(*c))));
        encoder.encode_frames(frames).unwrap();
    }

    #[test]
    fn test_multi_frame_gif_is_animated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blink.gif");
        write_gif(&path, &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]);

        let decoded = open_image(&path).unwrap();
        assert!(decoded.is_animated());
        assert_eq!(decoded.frame_count(), 3);
        if let DecodedImage::Animated(animation) = decoded {
            let first = animation.frame(0).unwrap();
            assert_eq!((first.width(), first.height()), (4, 3));
            assert!(animation.frame(3).is_none());
        }
    }

    #[test]
    fn test_single_frame_gif_is_static() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("still.gif");
        write_gif(&path, &[[10, 10, 10, 255]]);

        assert!(matches!(open_image(&path).unwrap(), DecodedImage::Static(_)));
    }

    #[test]
    fn test_png_is_static() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let decoded = open_image(&path).unwrap();
        assert_eq!(decoded.frame_count(), 1);
        assert!(!decoded.is_animated());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noise.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(open_image(&path), Err(PixcatError::Decode(_))));
    }

    #[test]
    fn test_empty_animation_rejected() {
        assert!(Animation::new(Vec::new()).is_err());
    }
}
