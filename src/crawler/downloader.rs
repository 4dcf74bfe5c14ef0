//! Asset downloading
//!
//! PDFs found during traversal are saved under `pdfs/` in the output root.
//! Unlike pages, an asset already present on disk is never fetched again.

use crate::crawler::fetcher::BlobFetcher;
use crate::output::{asset_path, PartialFile};
use crate::state::{AssetState, Registry};
use crate::url::CanonicalUrl;
use crate::ArchiveError;
use futures_util::StreamExt;
use std::path::PathBuf;
use std::sync::Arc;

/// An asset written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAsset {
    pub url: CanonicalUrl,
    pub local_path: PathBuf,
    pub bytes: u64,
}

/// Outcome of one asset work item
#[derive(Debug, Clone)]
pub struct AssetOutcome {
    pub url: CanonicalUrl,
    pub state: AssetState,
    pub saved: Option<SavedAsset>,
}

impl AssetOutcome {
    fn ended(url: &CanonicalUrl, state: AssetState) -> Self {
        Self {
            url: url.clone(),
            state,
            saved: None,
        }
    }
}

/// Downloads binary assets exactly once per run
pub struct AssetDownloader {
    output_root: PathBuf,
    fetcher: Arc<dyn BlobFetcher>,
    downloaded: Arc<Registry>,
}

impl AssetDownloader {
    pub fn new(
        output_root: PathBuf,
        fetcher: Arc<dyn BlobFetcher>,
        downloaded: Arc<Registry>,
    ) -> Self {
        Self {
            output_root,
            fetcher,
            downloaded,
        }
    }

    /// Downloads a single asset
    ///
    /// # Flow
    ///
    /// 1. Claim the asset; an already-claimed asset is a no-op
    /// 2. Map it to `pdfs/<sanitized last segment>`
    /// 3. If that file exists, skip the fetch entirely
    /// 4. Stream the body to a temp file and link it into place. A fetch
    ///    failure is logged, the temp file removed, and the asset stays
    ///    claimed for the rest of the run
    /// 5. If another asset with the same file name landed first, keep it and
    ///    report `AlreadyOnDisk`
    ///
    /// # Returns
    ///
    /// * `Ok(AssetOutcome)` - How the asset ended up
    /// * `Err(ArchiveError)` - Disk access failed; the run must stop
    pub async fn download(&self, asset: &CanonicalUrl) -> Result<AssetOutcome, ArchiveError> {
        if !self.downloaded.claim(asset).is_claimed() {
            tracing::debug!("Asset {} already claimed, skipping", asset);
            return Ok(AssetOutcome::ended(asset, AssetState::Duplicate));
        }

        let local_path = self.output_root.join(asset_path(asset));
        let exists = tokio::fs::try_exists(&local_path)
            .await
            .map_err(|e| ArchiveError::filesystem(&local_path, e))?;
        if exists {
            tracing::debug!(
                "Asset {} already on disk at {}, not fetching",
                asset,
                local_path.display()
            );
            return Ok(AssetOutcome::ended(asset, AssetState::AlreadyOnDisk));
        }

        let mut stream = match self.fetcher.fetch(asset).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Asset fetch failed, not retrying this run: {}", e);
                return Ok(AssetOutcome::ended(asset, AssetState::FetchFailed));
            }
        };

        let mut file = PartialFile::create(&local_path).await?;
        while let Some(chunk) = stream.next().await {
            let written = match chunk {
                Ok(bytes) => file.write(&bytes).await,
                Err(e) => {
                    tracing::warn!("Asset fetch failed, not retrying this run: {}", e);
                    file.discard().await;
                    return Ok(AssetOutcome::ended(asset, AssetState::FetchFailed));
                }
            };

            if let Err(e) = written {
                file.discard().await;
                return Err(e);
            }
        }

        let Some(bytes) = file.commit_new().await? else {
            tracing::debug!(
                "Asset {} appeared at {} during the fetch, keeping that copy",
                asset,
                local_path.display()
            );
            return Ok(AssetOutcome::ended(asset, AssetState::AlreadyOnDisk));
        };
        tracing::info!(
            "Downloaded {} ({} bytes) to {}",
            asset,
            bytes,
            local_path.display()
        );

        Ok(AssetOutcome {
            url: asset.clone(),
            state: AssetState::Downloaded,
            saved: Some(SavedAsset {
                url: asset.clone(),
                local_path,
                bytes,
            }),
        })
    }
}
