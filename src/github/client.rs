use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use super::repo::GitHubRepo;
use super::types::{Release, TagRef};
use crate::error::HvmError;
use crate::http::{HttpClient, Page};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GetReleases: Send + Sync {
    /// All tag names of `repo`, in the order the API returns them.
    async fn list_tags(&self, repo: &GitHubRepo) -> Result<Vec<String>>;
    async fn get_release_by_tag(&self, repo: &GitHubRepo, tag: &str) -> Result<Release>;
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Release>;
}

pub struct GitHub {
    pub client: HttpClient,
    pub api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(client, api_url))]
    pub fn new(client: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { client, api_url }
    }
}

#[async_trait]
impl GetReleases for GitHub {
    #[tracing::instrument(skip(self))]
    async fn list_tags(&self, repo: &GitHubRepo) -> Result<Vec<String>> {
        let mut tags = Vec::new();
        let mut next = Some(format!(
            "{}/repos/{}/{}/tags?per_page=100",
            self.api_url, repo.owner, repo.repo
        ));
        let mut page = 1;

        while let Some(url) = next {
            debug!("Fetching tags page {} from {}...", page, url);
            let Page { items, next: following } = self
                .client
                .get_json_page::<Vec<TagRef>>(&url)
                .await
                .with_context(|| format!("Failed to list tags of {}", repo))?;

            tags.extend(items.into_iter().map(|t| t.name));
            next = following;
            page += 1;
        }

        if tags.is_empty() {
            return Err(HvmError::NoTags.into());
        }

        debug!("Fetched {} tags from {}", tags.len(), repo);
        Ok(tags)
    }

    #[tracing::instrument(skip(self))]
    async fn get_release_by_tag(&self, repo: &GitHubRepo, tag: &str) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url, repo.owner, repo.repo, tag
        );
        self.client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to get release {} of {}", tag, repo))
    }

    #[tracing::instrument(skip(self))]
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, repo.owner, repo.repo
        );
        self.client
            .get_json(&url)
            .await
            .with_context(|| format!("Failed to get latest release of {}", repo))
    }
}
