use anyhow::{Result, anyhow};
use std::str::FromStr;

use crate::config::{REPOSITORY_NAME, REPOSITORY_OWNER, SELF_REPOSITORY_NAME, SELF_REPOSITORY_OWNER};

#[derive(Debug, PartialEq, Clone)]
pub struct GitHubRepo {
    pub owner: String,
    pub repo: String,
}

impl GitHubRepo {
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// The upstream Hugo repository.
    pub fn hugo() -> Self {
        Self::new(REPOSITORY_OWNER, REPOSITORY_NAME)
    }

    /// The repository this tool is released from.
    pub fn hvm() -> Self {
        Self::new(SELF_REPOSITORY_OWNER, SELF_REPOSITORY_NAME)
    }
}

impl std::fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for GitHubRepo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            Err(anyhow!("Invalid repository format. Expected 'owner/repo'."))
        } else {
            Ok(GitHubRepo::new(parts[0], parts[1]))
        }
    }
}
