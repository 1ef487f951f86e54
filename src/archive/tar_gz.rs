use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::debug;
use std::path::Path;
use tar::{Archive, EntryType};

use super::{Extractor, entry_target};
use crate::runtime::Runtime;

/// Extractor for .tar.gz archives
pub struct TarGzExtractor;

impl Extractor for TarGzExtractor {
    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<()> {
        debug!("Extracting tar.gz archive to {:?}...", extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        let mut archive = Archive::new(GzDecoder::new(file));

        let entries = archive
            .entries()
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?;

        for entry in entries {
            let mut entry =
                entry.with_context(|| format!("Failed to read entry in {:?}", archive_path))?;
            let name = entry
                .path()
                .context("Invalid entry path in archive")?
                .to_string_lossy()
                .to_string();
            let target = entry_target(extract_to, &name)?;

            match entry.header().entry_type() {
                EntryType::Directory => {
                    runtime.create_dir_all(&target)?;
                }
                EntryType::Regular | EntryType::Continuous => {
                    if let Some(parent) = target.parent() {
                        runtime.create_dir_all(parent)?;
                    }
                    let mut dest_file = runtime.create_file(&target)?;
                    std::io::copy(&mut entry, &mut dest_file)
                        .with_context(|| format!("Failed to extract file {:?}", target))?;
                    drop(dest_file);

                    if let Ok(mode) = entry.header().mode() {
                        runtime.set_permissions(&target, mode & 0o7777)?;
                    }
                }
                other => debug!("Skipping {:?} entry {}", other, name),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HvmError;
    use crate::runtime::RealRuntime;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::fs::{self, File};
    use tar::{Builder, Header};
    use tempfile::tempdir;

    /// Writes raw tar entries so that unsafe names survive.
    fn create_test_archive(path: &Path, files: &[(&str, &str, u32)]) -> Result<()> {
        let file = File::create(path)?;
        let enc = GzEncoder::new(file, Compression::default());
        let mut tar = Builder::new(enc);

        for (name, content, mode) in files {
            let mut header = Header::new_gnu();
            {
                let gnu = header.as_gnu_mut().context("gnu header")?;
                gnu.name[..name.len()].copy_from_slice(name.as_bytes());
            }
            header.set_size(content.len() as u64);
            header.set_mode(*mode);
            header.set_entry_type(EntryType::Regular);
            header.set_cksum();
            tar.append(&header, content.as_bytes())?;
        }

        tar.into_inner()?.finish()?;
        Ok(())
    }

    #[test]
    fn test_extract_files_and_dirs() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("hugo.tar.gz");
        let extract_to = dir.path().join("out");
        fs::create_dir(&extract_to)?;

        create_test_archive(
            &archive_path,
            &[
                ("hugo", "binary", 0o755),
                ("README.md", "readme", 0o644),
                ("docs/LICENSE", "license", 0o644),
            ],
        )?;

        TarGzExtractor.extract(&RealRuntime, &archive_path, &extract_to)?;

        assert_eq!(fs::read_to_string(extract_to.join("hugo"))?, "binary");
        assert_eq!(fs::read_to_string(extract_to.join("docs/LICENSE"))?, "license");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(extract_to.join("hugo"))?.permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }

        Ok(())
    }

    #[test]
    fn test_extract_rejects_parent_traversal() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("evil.tar.gz");
        let extract_to = dir.path().join("a").join("b");
        fs::create_dir_all(&extract_to)?;

        create_test_archive(
            &archive_path,
            &[("safe.txt", "ok", 0o644), ("../../evil", "pwned", 0o644)],
        )?;

        let err = TarGzExtractor
            .extract(&RealRuntime, &archive_path, &extract_to)
            .unwrap_err();

        assert_eq!(
            HvmError::from_anyhow(&err),
            Some(&HvmError::PathTraversal("../../evil".to_string()))
        );
        assert!(!dir.path().join("evil").exists());
        // Entries before the offending one were already written
        assert!(extract_to.join("safe.txt").exists());
        Ok(())
    }

    #[test]
    fn test_extract_corrupt_archive_fails() -> Result<()> {
        let dir = tempdir()?;
        let archive_path = dir.path().join("bad.tar.gz");
        fs::write(&archive_path, "not gzip")?;

        let result = TarGzExtractor.extract(&RealRuntime, &archive_path, dir.path());
        assert!(result.is_err());
        Ok(())
    }
}
