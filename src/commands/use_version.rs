use anyhow::{Result, bail};
use log::debug;

use crate::acquire::{Acquirer, Acquisition};
use crate::archive::Extractor;
use crate::cache::CacheStore;
use crate::dotfile::DotFile;
use crate::github::{GetReleases, GitHubRepo};
use crate::repository::Repository;
use crate::runtime::Runtime;
use crate::version::Tag;

use super::Context;
use super::select::select_tag;

/// How `use` picks its version. Without any option the user is asked.
#[derive(Debug, Default, Clone)]
pub struct UseOptions {
    pub tag: Option<String>,
    pub latest: bool,
    pub use_version_in_dot_file: bool,
}

/// Pin a Hugo version to the current directory, fetching it first if needed.
#[tracing::instrument(skip(ctx))]
pub async fn use_version<R: Runtime + 'static, G: GetReleases, E: Extractor>(
    ctx: Context<R, G, E>,
    options: UseOptions,
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
    let dot_file = DotFile::new(&runtime, &paths.dot_file_path());

    let tag = if options.use_version_in_dot_file {
        pinned_version(&dot_file, &repository)?
    } else if options.latest {
        repository.latest_tag()?.clone()
    } else if let Some(specifier) = options.tag.as_deref() {
        repository.resolve(specifier)?
    } else {
        let message = "Select a version to use in the current directory";
        match select_tag(&runtime, repository.tags(), &config, &cache, message)? {
            Some(tag) => tag,
            None => return Ok(()),
        }
    };
    debug!("Using {}", tag);

    let acquirer = Acquirer::new(
        &runtime,
        &cache,
        &repository,
        &http_client,
        &extractor,
        platform,
    );
    if let Acquisition::Cached(_) = acquirer.acquire(&tag).await? {
        println!("Using {} from cache.", tag);
    }

    dot_file.write(tag.as_str())?;
    Ok(())
}

/// The version in the dot file, which must also be a known release.
fn pinned_version<R: Runtime, G: GetReleases>(
    dot_file: &DotFile<'_, R>,
    repository: &Repository<G>,
) -> Result<Tag> {
    let Some(tag) = dot_file.read()? else {
        bail!(
            "the current directory does not contain an {} file",
            dot_file.file_name()
        );
    };
    if !repository.contains(&tag) {
        bail!(
            "the version specified in the {} file ({}) is not available in the repository: {}",
            dot_file.file_name(),
            tag,
            DotFile::<R>::fix()
        );
    }
    Ok(tag)
}
