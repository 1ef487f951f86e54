use anyhow::{Result, bail};
use log::debug;
use std::path::Path;

use crate::acquire::Acquirer;
use crate::archive::Extractor;
use crate::cache::CacheStore;
use crate::dotfile::DotFile;
use crate::github::{GetReleases, GitHubRepo};
use crate::repository::Repository;
use crate::runtime::Runtime;

use super::Context;
use super::select::select_tag;

#[derive(Debug, Default, Clone)]
pub struct InstallOptions {
    /// Version specifier; the user is asked when absent.
    pub version: Option<String>,
    pub use_version_in_dot_file: bool,
}

/// Install the version used when version management is disabled: the
/// executable is copied to the cache's default directory.
#[tracing::instrument(skip(ctx))]
pub async fn install<R: Runtime + 'static, G: GetReleases, E: Extractor>(
    ctx: Context<R, G, E>,
    options: InstallOptions,
) -> Result<()> {
    let Context {
        runtime,
        github,
        extractor,
        http_client,
        config,
        paths,
        platform,
    } = ctx;

    let repository = Repository::fetch(github, GitHubRepo::hugo()).await?;
    let cache = CacheStore::new(&runtime, &paths, platform.exec_name());

    let tag = if options.use_version_in_dot_file {
        let dot_file = DotFile::new(&runtime, &paths.dot_file_path());
        match dot_file.read()? {
            Some(tag) => tag,
            None => bail!(
                "the current directory does not contain an {} file",
                dot_file.file_name()
            ),
        }
    } else if let Some(specifier) = options.version.as_deref() {
        repository.resolve(specifier)?
    } else {
        let message = "Select a version to use when version management is disabled";
        match select_tag(&runtime, repository.tags(), &config, &cache, message)? {
            Some(tag) => tag,
            None => return Ok(()),
        }
    };
    debug!("Installing {} as the default version", tag);

    Acquirer::new(
        &runtime,
        &cache,
        &repository,
        &http_client,
        &extractor,
        platform,
    )
    .acquire(&tag)
    .await?;
    cache.install_default(&tag)?;

    println!("Installation of {} complete.", tag);

    let default_dir = cache.default_dir();
    if !is_on_path(&runtime, &default_dir) {
        println!();
        println!(
            "Please add {} to the PATH environment variable.",
            default_dir.display()
        );
        println!("Open a new terminal after making the change.");
    }

    Ok(())
}

fn is_on_path<R: Runtime>(runtime: &R, dir: &Path) -> bool {
    runtime
        .env_var("PATH")
        .map(|path| std::env::split_paths(&path).any(|entry| entry == dir))
        .unwrap_or(false)
}
