//! Recursive directory helpers built on top of [`Runtime`].

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use super::Runtime;

/// Copy the contents of `src` into `dst`, recursively.
///
/// Missing directories are created and existing files are overwritten.
/// File permissions are carried over.
#[tracing::instrument(skip(runtime))]
pub fn copy_tree<R: Runtime + ?Sized>(runtime: &R, src: &Path, dst: &Path) -> Result<()> {
    runtime.create_dir_all(dst)?;

    for entry in runtime.read_dir(src)? {
        let name = entry
            .file_name()
            .with_context(|| format!("Invalid entry {:?} in {:?}", entry, src))?;
        let target = dst.join(name);

        if runtime.is_dir(&entry) {
            copy_tree(runtime, &entry, &target)?;
        } else {
            debug!("Copying {:?} to {:?}", entry, target);
            runtime.copy(&entry, &target)?;
            let mode = runtime.file_mode(&entry)?;
            runtime.set_permissions(&target, mode)?;
        }
    }

    Ok(())
}

/// Every non-directory path below `root`, in sorted order.
pub fn walk_files<R: Runtime + ?Sized>(runtime: &R, root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in runtime.read_dir(root)? {
        if runtime.is_dir(&entry) {
            files.extend(walk_files(runtime, &entry)?);
        } else {
            files.push(entry);
        }
    }
    Ok(files)
}
