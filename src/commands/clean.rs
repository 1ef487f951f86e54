use anyhow::Result;

use crate::asset::Platform;
use crate::cache::CacheStore;
use crate::config::AppPaths;
use crate::runtime::Runtime;

/// Delete every cached version after confirmation. The default version stays.
#[tracing::instrument(skip(runtime))]
pub fn clean<R: Runtime>(runtime: &R, paths: &AppPaths, platform: &Platform) -> Result<()> {
    let cache = CacheStore::new(runtime, paths, platform.exec_name());

    if cache.size()? == 0 {
        println!("The cache is already empty.");
        return Ok(());
    }

    println!("This will delete cached versions of the Hugo executable.");
    if !runtime.confirm("Are you sure you want to clean the cache?")? {
        println!("Canceled.");
        return Ok(());
    }

    cache.clean()?;
    println!("Cache cleaned.");
    Ok(())
}
