use anyhow::{Context as _, Result};
use log::debug;
use semver::Version;

use crate::asset::Platform;
use crate::config::{APP_NAME, SELF_UPDATE_URL};
use crate::github::{GetReleases, GitHubRepo};

/// Version details stamped in at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildInfo {
    pub version: String,
    pub commit: String,
    pub date: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("HVM_VERSION").to_string(),
            commit: env!("HVM_COMMIT_HASH").to_string(),
            date: env!("HVM_BUILD_DATE").to_string(),
        }
    }

    /// `hvm <version> <os>/<arch> <commit> <date>`, skipping empty fields.
    pub fn describe(&self, platform: &Platform) -> String {
        let platform = platform.to_string();
        [
            APP_NAME,
            self.version.as_str(),
            platform.as_str(),
            self.commit.as_str(),
            self.date.as_str(),
        ]
        .into_iter()
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Print build details and mention a newer release if there is one.
#[tracing::instrument(skip(github))]
pub async fn version<G: GetReleases>(
    github: &G,
    build: &BuildInfo,
    platform: &Platform,
) -> Result<()> {
    println!("{}", build.describe(platform));

    let latest = github
        .get_latest_release(&GitHubRepo::hvm())
        .await
        .context("failed to fetch latest release")?;

    if is_newer(&latest.tag_name, &build.version) {
        println!();
        println!(
            "A newer version of {} is available: {}",
            APP_NAME, latest.tag_name
        );
        println!("Download the latest release here: {}", SELF_UPDATE_URL);
    }
    Ok(())
}

/// Whether `candidate` is a higher release than `current`. Development
/// builds without a release version never report an update.
fn is_newer(candidate: &str, current: &str) -> bool {
    let parse = |v: &str| Version::parse(v.trim_start_matches('v')).ok();
    match (parse(candidate), parse(current)) {
        (Some(candidate), Some(current)) => candidate > current,
        _ => {
            debug!("Cannot compare {:?} with {:?}", candidate, current);
            false
        }
    }
}
