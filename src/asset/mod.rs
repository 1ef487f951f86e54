//! Release asset description and selection.
//!
//! An [`Asset`] is one downloadable archive for one tag and platform. The
//! naming rules that map a tag and platform to a file name live in `naming`.

mod naming;
mod platform;

pub use naming::{asset_file_name, find_download_url};
pub use platform::Platform;

use crate::error::HvmError;
use crate::version::Tag;

/// Archive formats Hugo is released in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    Zip,
    Pkg,
}

impl ArchiveKind {
    /// Determine the kind from a file name or URL suffix.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.ends_with(".pkg") {
            Some(ArchiveKind::Pkg)
        } else if name.ends_with(".tar.gz") {
            Some(ArchiveKind::TarGz)
        } else if name.ends_with(".zip") {
            Some(ArchiveKind::Zip)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::Zip => "zip",
            ArchiveKind::Pkg => "pkg",
        }
    }
}

/// A platform-specific archive of one release.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub tag: Tag,
    pub exec_name: String,
    pub url: String,
    pub kind: ArchiveKind,
}

impl Asset {
    /// Builds an asset from its download URL; the archive kind comes from the URL suffix.
    pub fn from_url(tag: Tag, exec_name: &str, url: &str) -> Result<Self, HvmError> {
        let kind = ArchiveKind::from_name(url)
            .ok_or_else(|| HvmError::UnknownArchiveExtension(url.to_string()))?;
        Ok(Self {
            tag,
            exec_name: exec_name.to_string(),
            url: url.to_string(),
            kind,
        })
    }

    /// Local file name for the downloaded archive.
    pub fn archive_file_name(&self) -> String {
        format!("hugo.{}", self.kind.extension())
    }
}
