use anyhow::Result;

use crate::asset::Platform;
use crate::cache::CacheStore;
use crate::config::AppPaths;
use crate::runtime::Runtime;

/// Remove the default version installed by `install`.
#[tracing::instrument(skip(runtime))]
pub fn remove<R: Runtime>(runtime: &R, paths: &AppPaths, platform: &Platform) -> Result<()> {
    let cache = CacheStore::new(runtime, paths, platform.exec_name());
    if cache.remove_default()? {
        println!("Default version removed.");
    } else {
        println!("Nothing to remove.");
    }
    Ok(())
}
