//! The per-directory pin file (`.hvm`).
//!
//! The file holds one tag. An absent file means version management is
//! disabled for the directory; a present file must hold a valid tag.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::config::APP_NAME;
use crate::error::HvmError;
use crate::runtime::Runtime;
use crate::version::Tag;

pub struct DotFile<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
    file_name: String,
}

impl<'a, R: Runtime> DotFile<'a, R> {
    pub fn new(runtime: &'a R, path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            runtime,
            path: path.to_path_buf(),
            file_name,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// How to repair a bad dot file.
    pub fn fix() -> String {
        format!(
            "run \"{0} use\" to select a version, or \"{0} disable\" to remove the file",
            APP_NAME
        )
    }

    /// The pinned tag, or `None` when there is no dot file.
    #[tracing::instrument(skip(self), fields(path = ?self.path))]
    pub fn read(&self) -> Result<Option<Tag>> {
        if !self.runtime.exists(&self.path) {
            debug!("No dot file at {:?}", self.path);
            return Ok(None);
        }

        let content = self.runtime.read_to_string(&self.path)?;
        let content = content.trim();

        if content.is_empty() {
            return Err(HvmError::DotFileEmpty {
                file_name: self.file_name.clone(),
                fix: Self::fix(),
            }
            .into());
        }

        let tag = content.parse::<Tag>().map_err(|_| HvmError::DotFileInvalid {
            file_name: self.file_name.clone(),
            fix: Self::fix(),
        })?;
        Ok(Some(tag))
    }

    /// Write `version` verbatim; validation happens on read.
    #[tracing::instrument(skip(self), fields(path = ?self.path))]
    pub fn write(&self, version: &str) -> Result<()> {
        self.runtime.write(&self.path, version.as_bytes())
    }

    /// Delete the dot file if present.
    pub fn remove(&self) -> Result<()> {
        if self.runtime.exists(&self.path) {
            self.runtime.remove_file(&self.path)?;
        }
        Ok(())
    }
}
