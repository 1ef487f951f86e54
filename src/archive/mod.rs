//! Archive extraction for the formats Hugo is released in.
//!
//! Every tar and zip entry name is checked before anything is written for
//! it: a name containing `..` aborts the extraction with
//! [`HvmError::PathTraversal`]. Entries processed earlier in the same archive
//! stay on disk.

mod pkg;
mod tar_gz;
mod zip;

use crate::error::HvmError;
use crate::runtime::Runtime;
use anyhow::Result;
use log::debug;
use std::path::{Component, Path, PathBuf};

pub use pkg::PkgExtractor;
pub use tar_gz::TarGzExtractor;
pub use zip::ZipExtractor;

/// Trait for archive extractors
#[cfg_attr(test, mockall::automock)]
pub trait Extractor: Send + Sync {
    /// Extract the archive to the specified directory
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()>;
}

/// Dispatcher that selects the extractor from the archive file name and
/// removes the archive once it has been extracted.
pub struct ArchiveExtractor {
    tar_gz: TarGzExtractor,
    zip: ZipExtractor,
    pkg: PkgExtractor,
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self {
            tar_gz: TarGzExtractor,
            zip: ZipExtractor,
            pkg: PkgExtractor,
        }
    }
}

impl Extractor for ArchiveExtractor {
    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        let name = archive_path.to_string_lossy().to_lowercase();

        if name.ends_with(".tar.gz") {
            self.tar_gz.extract(runtime, archive_path, extract_to)?;
        } else if name.ends_with(".zip") {
            self.zip.extract(runtime, archive_path, extract_to)?;
        } else if name.ends_with(".pkg") {
            self.pkg.extract(runtime, archive_path, extract_to)?;
        } else {
            return Err(HvmError::UnsupportedFormat(format!(
                "unknown archive format: {}",
                archive_path.display()
            ))
            .into());
        }

        debug!("Removing archive {:?}", archive_path);
        runtime.remove_file(archive_path)?;
        Ok(())
    }
}

/// Destination path for the archive entry `name` below `extract_to`.
///
/// Rejects any name containing `..`. Root and prefix components are dropped
/// so absolute entry names stay inside the destination.
pub(crate) fn entry_target(extract_to: &Path, name: &str) -> Result<PathBuf, HvmError> {
    if name.contains("..") {
        return Err(HvmError::PathTraversal(name.to_string()));
    }

    let mut target = extract_to.to_path_buf();
    for component in Path::new(name).components() {
        if let Component::Normal(part) = component {
            target.push(part);
        }
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::fs::{self, File};
    use tar::Builder;
    use tempfile::tempdir;

    fn create_test_archive(path: &Path, files: &[(&str, &str)]) -> Result<()> {
        let file = File::create(path)?;
        let enc = GzEncoder::new(file, Compression::default());
        let mut tar = Builder::new(enc);

        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(name)?;
            header.set_size(content.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            tar.append(&header, content.as_bytes())?;
        }

        tar.into_inner()?.finish()?;
        Ok(())
    }

    fn create_test_zip_archive(path: &Path, files: &[(&str, &str)]) -> Result<()> {
        use ::zip::ZipWriter;
        use ::zip::write::SimpleFileOptions;
        use std::io::Write;

        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        for (name, content) in files {
            zip.start_file(*name, SimpleFileOptions::default())?;
            zip.write_all(content.as_bytes())?;
        }
        zip.finish()?;
        Ok(())
    }

    #[test]
    fn test_dispatches_to_tar_gz_and_removes_archive() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("hugo.tar.gz");
        let extract_to = dir.path().join("extracted");
        fs::create_dir(&extract_to)?;
        create_test_archive(&archive_path, &[("hugo", "tar content")])?;

        ArchiveExtractor::new().extract(&RealRuntime, &archive_path, &extract_to)?;

        assert_eq!(fs::read_to_string(extract_to.join("hugo"))?, "tar content");
        assert!(!archive_path.exists());
        Ok(())
    }

    #[test]
    fn test_dispatches_to_zip_and_removes_archive() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("hugo.zip");
        let extract_to = dir.path().join("extracted");
        fs::create_dir(&extract_to)?;
        create_test_zip_archive(&archive_path, &[("hugo.exe", "zip content")])?;

        ArchiveExtractor::new().extract(&RealRuntime, &archive_path, &extract_to)?;

        assert_eq!(fs::read_to_string(extract_to.join("hugo.exe"))?, "zip content");
        assert!(!archive_path.exists());
        Ok(())
    }

    #[test]
    fn test_failed_extraction_keeps_archive() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("hugo.tar.gz");
        fs::write(&archive_path, "garbage")?;

        let result = ArchiveExtractor::new().extract(&RealRuntime, &archive_path, dir.path());

        assert!(result.is_err());
        assert!(archive_path.exists());
        Ok(())
    }

    #[test]
    fn test_unknown_format() {
        // Strict mock: nothing is touched for an unknown suffix
        let runtime = MockRuntime::new();
        let err = ArchiveExtractor::new()
            .extract(&runtime, Path::new("/tmp/hugo.tar.xz"), Path::new("/tmp/out"))
            .unwrap_err();

        assert!(matches!(
            HvmError::from_anyhow(&err),
            Some(HvmError::UnsupportedFormat(msg)) if msg.contains("unknown archive format")
        ));
    }

    #[test]
    fn test_entry_target() {
        let base = Path::new("/cache/tmp");
        assert_eq!(entry_target(base, "hugo").unwrap(), base.join("hugo"));
        assert_eq!(
            entry_target(base, "./docs/README.md").unwrap(),
            base.join("docs").join("README.md")
        );
        assert_eq!(entry_target(base, "/etc/passwd").unwrap(), base.join("etc").join("passwd"));
        assert_eq!(
            entry_target(base, "../../evil"),
            Err(HvmError::PathTraversal("../../evil".to_string()))
        );
        assert!(entry_target(base, "a/../b").is_err());
    }
}
