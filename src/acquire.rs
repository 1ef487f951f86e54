//! Makes a tag available in the cache, downloading it when needed.
//!
//! ```text
//! cache hit:  Resolving -> Ready
//! cache miss: Resolving -> Downloading -> Extracting -> Materializing -> Ready
//! ```
//!
//! Any step may fail; the error is returned unchanged. Downloads and
//! extraction happen inside a temporary directory that is removed when
//! acquisition ends, whatever the outcome.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::archive::Extractor;
use crate::asset::Platform;
use crate::cache::CacheStore;
use crate::download::download_file;
use crate::github::GetReleases;
use crate::http::HttpClient;
use crate::repository::Repository;
use crate::runtime::Runtime;
use crate::version::Tag;

/// Where the executable came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Acquisition {
    Cached(PathBuf),
    Downloaded(PathBuf),
}

impl Acquisition {
    pub fn exec_path(&self) -> &Path {
        match self {
            Acquisition::Cached(path) | Acquisition::Downloaded(path) => path,
        }
    }
}

pub struct Acquirer<'a, R: Runtime, G: GetReleases, E: Extractor> {
    runtime: &'a R,
    cache: &'a CacheStore<'a, R>,
    repository: &'a Repository<G>,
    http_client: &'a HttpClient,
    extractor: &'a E,
    platform: Platform,
    temp_root: Option<PathBuf>,
}

impl<'a, R: Runtime + 'static, G: GetReleases, E: Extractor> Acquirer<'a, R, G, E> {
    pub fn new(
        runtime: &'a R,
        cache: &'a CacheStore<'a, R>,
        repository: &'a Repository<G>,
        http_client: &'a HttpClient,
        extractor: &'a E,
        platform: Platform,
    ) -> Self {
        Self {
            runtime,
            cache,
            repository,
            http_client,
            extractor,
            platform,
            temp_root: None,
        }
    }

    /// Create temporary directories under `dir` instead of the system default.
    pub fn with_temp_root(mut self, dir: PathBuf) -> Self {
        self.temp_root = Some(dir);
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn acquire(&self, tag: &Tag) -> Result<Acquisition> {
        if self.cache.is_cached(tag) {
            debug!("{} is cached", tag);
            return Ok(Acquisition::Cached(self.cache.exec_path(tag)));
        }

        let asset = self
            .repository
            .fetch_download_url(tag, &self.platform)
            .await?;

        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("hvm-");
            builder
        };
        let temp_dir = match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .context("Failed to create temporary directory")?;

        let archive_path = temp_dir.path().join(asset.archive_file_name());
        download_file(self.runtime, &asset.url, &archive_path, self.http_client).await?;

        let extract_dir = temp_dir.path().join("extracted");
        self.runtime.create_dir_all(&extract_dir)?;
        info!("Extracting {}...", asset.archive_file_name());
        self.extractor
            .extract(self.runtime, &archive_path, &extract_dir)?;

        self.cache.materialize(tag, &extract_dir)?;

        Ok(Acquisition::Downloaded(self.cache.exec_path(tag)))
    }
}
