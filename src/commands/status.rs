use anyhow::Result;
use std::fmt::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::asset::Platform;
use crate::cache::CacheStore;
use crate::config::{AppConfig, AppPaths};
use crate::dotfile::DotFile;
use crate::error::HvmError;
use crate::runtime::Runtime;

const DISABLED: &str = "Version management is disabled in the current directory.";

#[derive(Debug, Default, Clone, Copy)]
pub struct StatusOptions {
    /// Print only the pinned executable's path, cached or not.
    pub print_exec_path: bool,
    /// Print only the pinned executable's path, and only if it is cached.
    pub print_exec_path_cached: bool,
}

/// Print the pinned version, the cached versions and the cache size.
///
/// In either exec path mode nothing but the path is printed, and a failure
/// exit code means there is no path to report.
#[tracing::instrument(skip(runtime, config))]
pub fn status<R: Runtime>(
    runtime: &R,
    paths: &AppPaths,
    platform: &Platform,
    config: &AppConfig,
    options: StatusOptions,
) -> Result<ExitCode> {
    if options.print_exec_path || options.print_exec_path_cached {
        let path = pinned_exec_path(runtime, paths, platform, options.print_exec_path_cached)?;
        return Ok(match path {
            Some(path) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            None => ExitCode::FAILURE,
        });
    }

    print!("{}", status_report(runtime, paths, platform, config)?);
    Ok(ExitCode::SUCCESS)
}

/// Path of the executable for the version pinned in the working directory.
///
/// `None` when version management is disabled, or when `cached_only` is set
/// and the executable is not in the cache.
pub fn pinned_exec_path<R: Runtime>(
    runtime: &R,
    paths: &AppPaths,
    platform: &Platform,
    cached_only: bool,
) -> Result<Option<PathBuf>> {
    let cache = CacheStore::new(runtime, paths, platform.exec_name());
    let dot_file = DotFile::new(runtime, &paths.dot_file_path());

    let Some(tag) = dot_file.read()? else {
        return Ok(None);
    };
    if cached_only && !cache.is_cached(&tag) {
        return Ok(None);
    }
    Ok(Some(cache.exec_path(&tag)))
}

/// The text printed by `status`. A pin whose executable is missing from the
/// cache is an error.
pub fn status_report<R: Runtime>(
    runtime: &R,
    paths: &AppPaths,
    platform: &Platform,
    config: &AppConfig,
) -> Result<String> {
    let cache = CacheStore::new(runtime, paths, platform.exec_name());
    let dot_file = DotFile::new(runtime, &paths.dot_file_path());

    let mut out = String::new();
    match dot_file.read()? {
        Some(tag) if !cache.is_cached(&tag) => {
            return Err(HvmError::DotFileMissingVersion {
                file_name: dot_file.file_name().to_string(),
                tag: tag.to_string(),
                fix: DotFile::<R>::fix(),
            }
            .into());
        }
        Some(tag) => writeln!(
            out,
            "The current directory is configured to use Hugo {}.",
            tag
        )?,
        None => writeln!(out, "{}", DISABLED)?,
    }

    let mut tags = cache.cached_tags()?;
    if tags.is_empty() {
        writeln!(out, "The cache is empty.")?;
        return Ok(out);
    }
    if !config.sort_ascending {
        tags.reverse();
    }

    writeln!(out, "Cached versions of the Hugo executable:")?;
    writeln!(out)?;
    for tag in &tags {
        writeln!(out, "{}", tag)?;
    }
    writeln!(out)?;
    writeln!(out, "Cache size: {} MB", cache.size()? / 1_000_000)?;
    writeln!(out, "Cache directory: {}", cache.root().display())?;

    Ok(out)
}
