//! Error taxonomy for the resolution and acquisition pipeline.
//!
//! Components return `anyhow::Result` and raise these variants for the
//! failures a caller may want to tell apart. Use
//! `err.downcast_ref::<HvmError>()` to inspect them.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HvmError {
    /// Transport or HTTP status failure talking to the release service.
    #[error("network error: {0}")]
    Network(String),

    #[error("this repository has no tags")]
    NoTags,

    #[error("no latest release found")]
    NoLatestTag,

    #[error("unable to find download for {tag} {os}/{arch}")]
    AssetNotFound {
        tag: String,
        os: String,
        arch: String,
    },

    #[error("unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    #[error("unable to determine archive extension: {0}")]
    UnknownArchiveExtension(String),

    #[error("invalid tag: {0}")]
    InvalidSpecifier(String),

    #[error("tag not found: {0}")]
    TagNotFound(String),

    #[error("detected unsafe file in archive (zip slip): {0}")]
    PathTraversal(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("the {file_name} file in the current directory is empty: {fix}")]
    DotFileEmpty { file_name: String, fix: String },

    #[error("the {file_name} file in the current directory has an invalid format: {fix}")]
    DotFileInvalid { file_name: String, fix: String },

    #[error(
        "the {file_name} file in the current directory contains an invalid version ({tag}): {fix}"
    )]
    DotFileMissingVersion {
        file_name: String,
        tag: String,
        fix: String,
    },

    #[error("configuration: {0}")]
    Config(String),
}

impl HvmError {
    /// Returns the variant carried by an `anyhow::Error`, if any.
    pub fn from_anyhow(err: &anyhow::Error) -> Option<&HvmError> {
        err.downcast_ref::<HvmError>()
    }
}
