//! Resolving image sources to local files
//!
//! Validation happens when the source is constructed, before anything is
//! rendered. URL sources are downloaded into a per-user cache directory and
//! keyed by the final segment of the URL path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::StatusCode;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::errors::{PixcatError, Result};

/// Where an image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Url(Url),
}

impl ImageSource {
    /// A local file, which must exist
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PixcatError::file_not_found(path));
        }
        Ok(Self::File(path.to_path_buf()))
    }

    /// A remote image; the URL must carry both a scheme and a host
    pub fn from_url(input: &str) -> Result<Self> {
        let url = Url::parse(input)
            .map_err(|e| PixcatError::InvalidInput(format!("Invalid url: {input} ({e})")))?;

        if !url.has_host() {
            return Err(PixcatError::InvalidInput(format!("Invalid url: {input}")));
        }
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PixcatError::InvalidInput(format!(
                "Unsupported url scheme {:?}: {input}",
                url.scheme()
            )));
        }
        Ok(Self::Url(url))
    }

    /// Treat `http://` and `https://` inputs as URLs and anything else as a path
    pub fn detect(input: &str) -> Result<Self> {
        let lower = input.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::from_url(input.trim_start())
        } else {
            Self::from_file(input)
        }
    }

    /// Local path of the image, downloading it first for URL sources
    pub async fn fetch(&self, cache_dir: &Path) -> Result<PathBuf> {
        self.fetch_with(&reqwest::Client::new(), cache_dir).await
    }

    /// [`ImageSource::fetch`] using an existing HTTP client
    pub async fn fetch_with(&self, client: &reqwest::Client, cache_dir: &Path) -> Result<PathBuf> {
        match self {
            Self::File(path) => Ok(path.clone()),
            Self::Url(url) => download(client, url, cache_dir).await,
        }
    }
}

/// File name a URL is cached under
///
/// The last path segment, or a SHA-256 of the whole URL when the path has
/// no usable final segment.
pub fn cache_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .map(str::to_owned)
        .unwrap_or_else(|| format!("{:x}", Sha256::digest(url.as_str().as_bytes())))
}

#[instrument(level = "debug", skip_all, fields(url = %url))]
async fn download(client: &reqwest::Client, url: &Url, cache_dir: &Path) -> Result<PathBuf> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    debug!(%status, "received response");

    if status == StatusCode::NOT_FOUND {
        return Err(PixcatError::FileNotFound(format!("URL {:?}", url.as_str())));
    }
    let response = response.error_for_status()?;

    tokio::fs::create_dir_all(cache_dir).await?;
    let target = cache_dir.join(cache_file_name(url));
    let partial = partial_path(&target);

    if let Err(e) = stream_to_file(response, &partial).await {
        warn!("download of {} failed: {}", url, e);
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }
    tokio::fs::rename(&partial, &target).await?;

    info!("cached {} at {}", url, target.display());
    Ok(target)
}

async fn stream_to_file(response: reqwest::Response, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    debug!(bytes = written, "download complete");
    Ok(())
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}
