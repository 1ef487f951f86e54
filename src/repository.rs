//! Hugo's release repository: the qualifying tag list and asset lookup.

use anyhow::Result;
use log::debug;

use crate::asset::{Asset, Platform, asset_file_name, find_download_url};
use crate::error::HvmError;
use crate::github::{GetReleases, GitHubRepo};
use crate::version::{self, Tag};

/// Releases before this tag were not semantically versioned.
const MINIMUM_TAG: (u64, u64, u64) = (0, 54, 0);

pub struct Repository<G: GetReleases> {
    source: G,
    repo: GitHubRepo,
    /// Qualifying tags, highest first.
    tags: Vec<Tag>,
    latest: Option<Tag>,
}

impl<G: GetReleases> Repository<G> {
    /// Fetches every tag of `repo` and keeps the resolvable ones.
    #[tracing::instrument(skip(source))]
    pub async fn fetch(source: G, repo: GitHubRepo) -> Result<Self> {
        let names = source.list_tags(&repo).await?;
        Ok(Self::from_tag_names(source, repo, &names))
    }

    fn from_tag_names(source: G, repo: GitHubRepo, names: &[String]) -> Self {
        let (major, minor, patch) = MINIMUM_TAG;
        let mut tags: Vec<Tag> = names
            .iter()
            .filter_map(|name| name.parse::<Tag>().ok())
            .filter(|tag| tag.at_least(major, minor, patch))
            .collect();
        tags.sort_by(|a, b| b.cmp(a));

        debug!(
            "Kept {} of {} tags from {}",
            tags.len(),
            names.len(),
            repo
        );

        let latest = tags.first().cloned();
        Self {
            source,
            repo,
            tags,
            latest,
        }
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn latest_tag(&self) -> Result<&Tag, HvmError> {
        self.latest.as_ref().ok_or(HvmError::NoLatestTag)
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// Resolves a version specifier against this repository's tags.
    pub fn resolve(&self, specifier: &str) -> Result<Tag, HvmError> {
        version::resolve(specifier, &self.tags, self.latest_tag()?)
    }

    /// Looks up the archive of `tag` built for `platform`.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_download_url(&self, tag: &Tag, platform: &Platform) -> Result<Asset> {
        let file_name = asset_file_name(tag, platform)?;
        debug!("Looking for {} in release {}", file_name, tag);

        let release = self
            .source
            .get_release_by_tag(&self.repo, tag.as_str())
            .await?;

        let url = find_download_url(&release, &file_name)?.ok_or_else(|| {
            HvmError::AssetNotFound {
                tag: tag.to_string(),
                os: platform.os.clone(),
                arch: platform.arch.clone(),
            }
        })?;

        Ok(Asset::from_url(tag.clone(), platform.exec_name(), url)?)
    }
}
