mod clean;
mod disable;
mod install;
mod remove;
mod select;
mod status;
mod use_version;
mod version;

pub use clean::clean;
pub use disable::disable;
pub use install::{InstallOptions, install};
pub use remove::remove;
pub use status::{StatusOptions, pinned_exec_path, status, status_report};
pub use use_version::{UseOptions, use_version};
pub use version::{BuildInfo, version};

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use crate::{
    archive::{ArchiveExtractor, Extractor},
    asset::Platform,
    config::{AppConfig, AppPaths},
    github::{GetReleases, GitHub},
    http::HttpClient,
    runtime::Runtime,
};

/// Everything a command needs, built once at startup.
pub struct Context<R: Runtime, G: GetReleases, E: Extractor> {
    pub runtime: R,
    pub github: G,
    pub extractor: E,
    pub http_client: HttpClient,
    pub config: AppConfig,
    pub paths: AppPaths,
    pub platform: Platform,
}

impl<R: Runtime> Context<R, GitHub, ArchiveExtractor> {
    pub fn new(
        runtime: R,
        cache_dir: Option<PathBuf>,
        config_dir: Option<PathBuf>,
        api_url: Option<String>,
    ) -> Result<Self> {
        let paths = AppPaths::resolve(&runtime, cache_dir, config_dir)?;
        let config = AppConfig::load(&runtime, &paths.config_file())?;
        debug!("Using cache directory {:?}", paths.cache_dir);

        let http_client = HttpClient::with_token(config.github_token.as_deref())?;
        let github = GitHub::new(http_client.clone(), api_url);

        Ok(Self {
            runtime,
            github,
            extractor: ArchiveExtractor::new(),
            http_client,
            config,
            paths,
            platform: Platform::detect(),
        })
    }
}
