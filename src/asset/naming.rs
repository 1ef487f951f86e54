//! Hugo release asset naming.
//!
//! Archive names changed twice: at v0.103.0 for every platform, and at
//! v0.153.0 when macOS moved from a tarball to an installer package.

use anyhow::{Context, Result};
use regex::Regex;

use super::Platform;
use crate::error::HvmError;
use crate::github::Release;
use crate::version::Tag;

/// File name of the extended-edition archive for `tag` on `platform`.
pub fn asset_file_name(tag: &Tag, platform: &Platform) -> Result<String, HvmError> {
    let version = tag.number();

    let suffix = if !tag.at_least(0, 103, 0) {
        match platform.os.as_str() {
            "darwin" => "macOS-64bit.tar.gz".to_string(),
            "windows" => "Windows-64bit.zip".to_string(),
            "linux" if platform.arch == "arm64" => "Linux-ARM64.deb".to_string(),
            "linux" => "Linux-64bit.tar.gz".to_string(),
            other => return Err(HvmError::UnsupportedPlatform(other.to_string())),
        }
    } else {
        match platform.os.as_str() {
            "darwin" if !tag.at_least(0, 153, 0) => "darwin-universal.tar.gz".to_string(),
            "darwin" => "darwin-universal.pkg".to_string(),
            "windows" => format!("windows-{}.zip", platform.arch),
            "linux" => format!("linux-{}.tar.gz", platform.arch),
            other => return Err(HvmError::UnsupportedPlatform(other.to_string())),
        }
    };

    Ok(format!("hugo_extended_{}_{}", version, suffix))
}

/// First download URL in `release` whose final path segment is `file_name`.
pub fn find_download_url<'a>(release: &'a Release, file_name: &str) -> Result<Option<&'a str>> {
    let pattern = format!("/{}$", regex::escape(file_name));
    let re = Regex::new(&pattern)
        .with_context(|| format!("Failed to build asset pattern for {}", file_name))?;

    Ok(release
        .assets
        .iter()
        .map(|a| a.browser_download_url.as_str())
        .find(|url| re.is_match(url)))
}
