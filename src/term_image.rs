//! High-level entry point: a validated image source plus render settings

use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::errors::Result;
use crate::geometry::Size;
use crate::render::{AnimationDriver, FrameRenderer, ResizeFilter, FRAME_INTERVAL};
use crate::source::{open_image, DecodedImage, ImageSource};

/// An image ready to be drawn on a terminal
///
/// Construction validates the source; decoding happens in [`TermImage::draw`].
#[derive(Debug)]
pub struct TermImage {
    path: PathBuf,
    renderer: FrameRenderer,
    interval: Duration,
    loops: Option<u32>,
}

impl TermImage {
    /// Image from a local file; `size` of `None` draws at native resolution
    pub fn from_file(path: impl AsRef<Path>, size: Option<Size>) -> Result<Self> {
        ImageSource::from_file(path.as_ref())?;
        Ok(Self::new(path.as_ref().to_path_buf(), size))
    }

    /// Image from a URL, downloaded into `cache_dir`
    pub async fn from_url(url: &str, size: Option<Size>, cache_dir: &Path) -> Result<Self> {
        let path = ImageSource::from_url(url)?.fetch(cache_dir).await?;
        Ok(Self::new(path, size))
    }

    /// Resolve `input` (path or URL) using the settings in `config`
    pub async fn from_config(input: &str, config: &Config) -> Result<Self> {
        let source = ImageSource::detect(input)?;
        let path = source.fetch(&config.cache_dir).await?;
        Ok(Self::new(path, config.size)
            .with_filter(config.filter)
            .with_interval(config.interval)
            .with_loops(config.loops))
    }

    fn new(path: PathBuf, size: Option<Size>) -> Self {
        Self {
            path,
            renderer: FrameRenderer::new(size),
            interval: FRAME_INTERVAL,
            loops: None,
        }
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.renderer = FrameRenderer::new(self.renderer.size()).with_filter(filter);
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_loops(mut self, loops: Option<u32>) -> Self {
        self.loops = loops;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> Option<Size> {
        self.renderer.size()
    }

    /// Decode and draw the image to `out`
    ///
    /// Static images are drawn once. Animated images loop until `interrupt`
    /// resolves, which returns `PixcatError::Interrupted` after the terminal
    /// has been restored.
    pub async fn draw<W, F>(&mut self, out: &mut W, interrupt: F) -> Result<()>
    where
        W: Write,
        F: Future<Output = ()>,
    {
        match open_image(&self.path)? {
            DecodedImage::Static(image) => {
                let frame = self.renderer.render(&image)?;
                debug!(width = frame.width, rows = frame.rows, "drawing static image");
                out.write_all(frame.text.as_bytes())?;
                out.write_all(b"\n")?;
                out.flush()?;
                Ok(())
            }
            DecodedImage::Animated(animation) => {
                info!(frames = animation.frame_count(), "playing animation");
                AnimationDriver::new(&mut self.renderer, out)
                    .with_interval(self.interval)
                    .with_loops(self.loops)
                    .play(&animation, interrupt)
                    .await
            }
        }
    }
}
