//! Single-frame rendering: resize, flatten to RGB, encode

use image::imageops::FilterType;
use image::DynamicImage;
use serde::Deserialize;
use tracing::trace;

use super::buffer::RenderBuffer;
use super::encoder;
use crate::errors::Result;
use crate::geometry::Size;

/// Resampling filter used when resizing to the requested [`Size`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    /// Bicubic
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Text of one rendered frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub text: String,
    /// Glyphs per row
    pub width: u32,
    /// Number of text rows
    pub rows: u32,
}

/// Converts decoded frames to colored text
///
/// Each call borrows the frame read-only; the only state carried between
/// calls is the (always empty) [`RenderBuffer`].
#[derive(Debug)]
pub struct FrameRenderer {
    size: Option<Size>,
    filter: ResizeFilter,
    buffer: RenderBuffer,
}

impl FrameRenderer {
    /// `None` renders at the frame's native resolution
    pub fn new(size: Option<Size>) -> Self {
        Self {
            size,
            filter: ResizeFilter::default(),
            buffer: RenderBuffer::new(),
        }
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut RenderBuffer {
        &mut self.buffer
    }

    /// Render `frame` to text
    pub fn render(&mut self, frame: &DynamicImage) -> Result<RenderedFrame> {
        let target = self
            .size
            .and_then(|size| target_dimensions(size, frame.width(), frame.height()));

        let rgb = match target {
            Some((width, height)) if (width, height) != (frame.width(), frame.height()) => {
                trace!(width, height, "resizing frame");
                frame
                    .resize_exact(width, height, self.filter.into())
                    .into_rgb8()
            }
            _ => frame.to_rgb8(),
        };

        let (width, rows) = rgb.dimensions();
        let mut scope = self.buffer.scope();
        encoder::encode(rgb.pixels().copied(), width as usize, &mut *scope)?;

        Ok(RenderedFrame {
            text: scope.as_str().to_owned(),
            width,
            rows,
        })
    }
}

/// Resolve a requested size against the source dimensions
///
/// A non-positive component is derived from the other one, preserving the
/// source aspect ratio. Returns `None` when both are non-positive.
pub fn target_dimensions(size: Size, src_width: u32, src_height: u32) -> Option<(u32, u32)> {
    let scaled = |other_src: u32, target: u32, src: u32| -> u32 {
        let value = f64::from(other_src) * f64::from(target) / f64::from(src.max(1));
        (value.round() as u32).max(1)
    };

    match (positive(size.width()), positive(size.height())) {
        (Some(w), Some(h)) => Some((w, h)),
        (Some(w), None) => Some((w, scaled(src_height, w, src_width))),
        (None, Some(h)) => Some((scaled(src_width, h, src_height), h)),
        (None, None) => None,
    }
}

fn positive(value: i32) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| *v > 0)
}
