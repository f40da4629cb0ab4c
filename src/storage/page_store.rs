use crate::MirrorError;
use reqwest::Client;
use std::io::{self, Write};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Where a page body came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    /// Read back from a file mirrored earlier
    Disk,
    /// Fetched with an HTTP GET
    Network,
}

/// A page body together with its origin
#[derive(Debug, Clone)]
pub struct Page {
    pub body: Vec<u8>,
    pub source: PageSource,
}

/// Read-through page cache backed by the mirror directory
///
/// A regular file at a page's local path is authoritative: it is returned
/// without any network access and is never overwritten.
#[derive(Debug, Clone)]
pub struct PageStore {
    client: Client,
}

impl PageStore {
    /// Creates a store that fetches missing pages with `client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns the page at `local_path` if mirrored, otherwise fetches `url`
    ///
    /// # Errors
    ///
    /// * `MirrorError::Transport` - The request could not be built or sent, or
    ///   the body could not be read
    /// * `MirrorError::Filesystem` - A mirrored file exists but cannot be read
    /// * `MirrorError::Cancelled` - `cancel` fired while the request was in flight
    pub async fn fetch_or_read(
        &self,
        url: &str,
        local_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<Page, MirrorError> {
        if is_regular_file(local_path).await {
            let body = tokio::fs::read(local_path)
                .await
                .map_err(|e| MirrorError::filesystem(local_path, e))?;
            tracing::info!("read {} from disk", url);
            return Ok(Page {
                body,
                source: PageSource::Disk,
            });
        }

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(MirrorError::Cancelled),
            result = self.get(url) => result?,
        };

        tracing::info!("read {} remotely", url);
        Ok(Page {
            body,
            source: PageSource::Network,
        })
    }

    /// Performs a plain GET and reads the whole body
    async fn get(&self, url: &str) -> Result<Vec<u8>, MirrorError> {
        let transport = |source| MirrorError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            // Mirrored as served; retrying is not our business
            tracing::warn!("{} answered with HTTP {}", url, status.as_u16());
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }

    /// Writes `body` to `local_path` unless a file is already there
    ///
    /// Missing parent directories are created. The bytes go to a temporary file
    /// in the destination directory first and are then linked into place without
    /// clobbering, so a reader never sees a partial page and a concurrent writer
    /// that got there first wins.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The page was written
    /// * `Ok(false)` - A file already existed; nothing changed
    /// * `Err(MirrorError::Filesystem)` - The page could not be written
    pub async fn write(&self, body: &[u8], local_path: &Path) -> Result<bool, MirrorError> {
        match tokio::fs::metadata(local_path).await {
            Ok(metadata) if metadata.is_file() => return Ok(false),
            Ok(metadata) if metadata.is_dir() => {
                return Err(MirrorError::filesystem(
                    local_path,
                    io::Error::new(io::ErrorKind::Other, "a directory occupies the page path"),
                ));
            }
            _ => {}
        }

        let dir = local_path.parent().unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| MirrorError::filesystem(dir, e))?;

        let body = body.to_vec();
        let path = local_path.to_path_buf();
        tokio::task::spawn_blocking(move || persist_new_file(&body, &path)).await?
    }
}

async fn is_regular_file(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.is_file(),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!("treating {} as not mirrored: {}", path.display(), e);
            }
            false
        }
    }
}

fn persist_new_file(body: &[u8], path: &Path) -> Result<bool, MirrorError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::Builder::new()
        .prefix(".sumi-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| MirrorError::filesystem(dir, e))?;

    file.write_all(body)
        .and_then(|_| file.flush())
        .map_err(|e| MirrorError::filesystem(file.path(), e))?;

    match file.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            tracing::debug!("{} appeared concurrently, keeping it", path.display());
            Ok(false)
        }
        Err(e) => Err(MirrorError::filesystem(path, e.error)),
    }
}
