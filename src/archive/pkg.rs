use anyhow::{Context, Result, bail};
use log::debug;
use std::path::Path;
use std::process::Command;

use super::Extractor;
use crate::error::HvmError;
use crate::runtime::{Runtime, copy_tree};

/// Extractor for macOS installer packages.
///
/// `pkgutil --expand-full` unpacks the package into a temporary directory
/// and the contents of its `Payload` directory are copied to the
/// destination. The temporary directory is removed when done, on success
/// or failure.
pub struct PkgExtractor;

impl Extractor for PkgExtractor {
    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        if !cfg!(target_os = "macos") {
            return Err(HvmError::UnsupportedFormat(
                "extraction of pkg file is limited to darwin".to_string(),
            )
            .into());
        }

        if !runtime.exists(archive_path) {
            bail!("unable to find {}", archive_path.display());
        }

        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let expansion_dir = temp_dir.path().join("expanded");

        debug!("Expanding {:?} into {:?}...", archive_path, expansion_dir);
        let output = Command::new("pkgutil")
            .arg("--expand-full")
            .arg(archive_path)
            .arg(&expansion_dir)
            .output()
            .context("Failed to run pkgutil")?;

        if !output.status.success() {
            bail!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }

        copy_tree(runtime, &expansion_dir.join("Payload"), extract_to)
    }
}
