//! The local cache of extracted Hugo releases.
//!
//! Layout: `<root>/<tag>/<exec>` per cached release and
//! `<root>/default/<exec>` for the installed default version. A tag is
//! cached exactly when its executable exists; there is no manifest, so an
//! interrupted copy that left the executable behind also counts as cached.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::config::AppPaths;
use crate::runtime::{Runtime, copy_tree, walk_files};
use crate::version::Tag;

pub struct CacheStore<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
    default_dir_name: String,
    exec_name: String,
}

impl<'a, R: Runtime> CacheStore<'a, R> {
    pub fn new(runtime: &'a R, paths: &AppPaths, exec_name: &str) -> Self {
        Self {
            runtime,
            root: paths.cache_dir.clone(),
            default_dir_name: paths.default_dir_name.clone(),
            exec_name: exec_name.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exec_name(&self) -> &str {
        &self.exec_name
    }

    pub fn tag_dir(&self, tag: &Tag) -> PathBuf {
        self.root.join(tag.as_str())
    }

    pub fn exec_path(&self, tag: &Tag) -> PathBuf {
        self.tag_dir(tag).join(&self.exec_name)
    }

    pub fn default_dir(&self) -> PathBuf {
        self.root.join(&self.default_dir_name)
    }

    pub fn is_cached(&self, tag: &Tag) -> bool {
        self.runtime.exists(&self.exec_path(tag))
    }

    /// Copy an extracted release tree into the cache under `tag`.
    #[tracing::instrument(skip(self))]
    pub fn materialize(&self, tag: &Tag, source_dir: &Path) -> Result<PathBuf> {
        let target = self.tag_dir(tag);
        debug!("Caching {:?} as {:?}", source_dir, target);
        copy_tree(self.runtime, source_dir, &target)
            .with_context(|| format!("Failed to cache {}", tag))?;
        Ok(target)
    }

    /// Total size in bytes of cached files, excluding the default directory.
    ///
    /// Any path whose cache-relative form starts with the default directory
    /// name is excluded, so `default` and `default-old` both are.
    #[tracing::instrument(skip(self))]
    pub fn size(&self) -> Result<u64> {
        let mut total = 0;
        for file in walk_files(self.runtime, &self.root)? {
            let relative = file.strip_prefix(&self.root).unwrap_or(&file);
            if relative
                .to_string_lossy()
                .starts_with(self.default_dir_name.as_str())
            {
                continue;
            }
            total += self.runtime.file_len(&file)?;
        }
        Ok(total)
    }

    /// Cached tags in ascending order. The default directory and anything
    /// that is not a tag are skipped.
    pub fn cached_tags(&self) -> Result<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .runtime
            .read_dir(&self.root)?
            .into_iter()
            .filter(|p| self.runtime.is_dir(p))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .filter(|name| *name != self.default_dir_name)
            .filter_map(|name| name.parse::<Tag>().ok())
            .collect();
        tags.sort();
        Ok(tags)
    }

    /// Copy the executable of a cached `tag` into the default directory.
    #[tracing::instrument(skip(self))]
    pub fn install_default(&self, tag: &Tag) -> Result<PathBuf> {
        let source = self.exec_path(tag);
        let default_dir = self.default_dir();
        let target = default_dir.join(&self.exec_name);

        self.runtime.create_dir_all(&default_dir)?;
        self.runtime.copy(&source, &target)?;
        let mode = self.runtime.file_mode(&source)?;
        self.runtime.set_permissions(&target, mode)?;

        info!("Installed {} as the default version", tag);
        Ok(target)
    }

    /// Delete the default directory. Returns whether there was one.
    pub fn remove_default(&self) -> Result<bool> {
        let default_dir = self.default_dir();
        if !self.runtime.exists(&default_dir) {
            return Ok(false);
        }
        self.runtime.remove_dir_all(&default_dir)?;
        Ok(true)
    }

    /// Delete everything in the cache except the default directory.
    #[tracing::instrument(skip(self))]
    pub fn clean(&self) -> Result<()> {
        for entry in self.runtime.read_dir(&self.root)? {
            if entry.file_name().is_some_and(|n| *n == *self.default_dir_name) {
                continue;
            }
            debug!("Removing {:?}", entry);
            if self.runtime.is_dir(&entry) {
                self.runtime.remove_dir_all(&entry)?;
            } else {
                self.runtime.remove_file(&entry)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{MockRuntime, RealRuntime};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn paths(root: &Path) -> AppPaths {
        AppPaths {
            cache_dir: root.to_path_buf(),
            config_dir: root.join("config"),
            working_dir: root.join("work"),
            default_dir_name: "default".to_string(),
            dot_file_name: ".hvm".to_string(),
        }
    }

    fn tag(s: &str) -> Tag {
        s.parse().unwrap()
    }

    fn populated() -> TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("v0.120.0")).unwrap();
        fs::write(root.join("v0.120.0/hugo"), vec![0u8; 1000]).unwrap();
        fs::write(root.join("v0.120.0/LICENSE"), vec![0u8; 10]).unwrap();
        fs::create_dir_all(root.join("v0.99.0/nested")).unwrap();
        fs::write(root.join("v0.99.0/hugo"), vec![0u8; 500]).unwrap();
        fs::write(root.join("v0.99.0/nested/x"), vec![0u8; 5]).unwrap();
        fs::create_dir_all(root.join("default")).unwrap();
        fs::write(root.join("default/hugo"), vec![0u8; 7000]).unwrap();
        dir
    }

    #[test]
    fn test_is_cached_requires_executable() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("v0.120.0")).unwrap();
        let p = paths(dir.path());
        let cache = CacheStore::new(&RealRuntime, &p, "hugo");

        // A bare directory is not a cached release
        assert!(!cache.is_cached(&tag("v0.120.0")));

        fs::write(dir.path().join("v0.120.0/hugo"), "bin").unwrap();
        assert!(cache.is_cached(&tag("v0.120.0")));
        assert_eq!(
            cache.exec_path(&tag("v0.120.0")),
            dir.path().join("v0.120.0").join("hugo")
        );
    }

    #[test]
    fn test_materialize_copies_tree_and_overwrites() {
        let dir = tempdir().unwrap();
        let cache_root = dir.path().join("cache");
        let source = dir.path().join("extracted");
        fs::create_dir_all(source.join("docs")).unwrap();
        fs::write(source.join("hugo"), "complete").unwrap();
        fs::write(source.join("docs/README.md"), "readme").unwrap();
        fs::create_dir_all(cache_root.join("v0.120.0")).unwrap();
        fs::write(cache_root.join("v0.120.0/hugo"), "partial").unwrap();

        let p = paths(&cache_root);
        let cache = CacheStore::new(&RealRuntime, &p, "hugo");
        let target = cache.materialize(&tag("v0.120.0"), &source).unwrap();

        assert_eq!(target, cache_root.join("v0.120.0"));
        assert_eq!(fs::read_to_string(target.join("hugo")).unwrap(), "complete");
        assert_eq!(
            fs::read_to_string(target.join("docs/README.md")).unwrap(),
            "readme"
        );
    }

    #[test]
    fn test_size_excludes_default_dir() {
        let dir = populated();
        let p = paths(dir.path());
        let cache = CacheStore::new(&RealRuntime, &p, "hugo");
        assert_eq!(cache.size().unwrap(), 1515);
    }

    #[test]
    fn test_size_excludes_longer_prefix_names() {
        let dir = populated();
        fs::create_dir_all(dir.path().join("default-old")).unwrap();
        fs::write(dir.path().join("default-old/hugo"), vec![0u8; 300]).unwrap();

        let p = paths(dir.path());
        let cache = CacheStore::new(&RealRuntime, &p, "hugo");
        assert_eq!(cache.size().unwrap(), 1515);
    }

    #[test]
    fn test_size_of_empty_cache() {
        let dir = tempdir().unwrap();
        let p = paths(dir.path());
        let cache = CacheStore::new(&RealRuntime, &p, "hugo");
        assert_eq!(cache.size().unwrap(), 0);
    }

    #[test]
    fn test_cached_tags_sorted_without_default() {
        let dir = populated();
        fs::create_dir_all(dir.path().join("not-a-tag")).unwrap();
        let p = paths(dir.path());
        let cache = CacheStore::new(&RealRuntime, &p, "hugo");

        let tags = cache.cached_tags().unwrap();
        let names: Vec<&str> = tags.iter().map(Tag::as_str).collect();
        assert_eq!(names, vec!["v0.99.0", "v0.120.0"]);
    }

    #[test]
    fn test_install_and_remove_default() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("v0.120.0")).unwrap();
        fs::write(dir.path().join("v0.120.0/hugo"), "bin").unwrap();
        let p = paths(dir.path());
        let cache = CacheStore::new(&RealRuntime, &p, "hugo");

        let installed = cache.install_default(&tag("v0.120.0")).unwrap();
        assert_eq!(installed, dir.path().join("default").join("hugo"));
        assert_eq!(fs::read_to_string(&installed).unwrap(), "bin");

        assert!(cache.remove_default().unwrap());
        assert!(!dir.path().join("default").exists());
        assert!(!cache.remove_default().unwrap());
    }

    #[test]
    fn test_clean_keeps_default() {
        let dir = populated();
        fs::write(dir.path().join("stray.tar.gz"), "x").unwrap();
        let p = paths(dir.path());
        let cache = CacheStore::new(&RealRuntime, &p, "hugo");

        cache.clean().unwrap();

        assert!(dir.path().join("default/hugo").exists());
        assert!(!dir.path().join("v0.120.0").exists());
        assert!(!dir.path().join("stray.tar.gz").exists());
        assert_eq!(cache.size().unwrap(), 0);
    }

    #[test]
    fn test_is_cached_checks_exec_path_only() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(mockall::predicate::eq(PathBuf::from("/cache/v0.120.0/hugo.exe")))
            .times(1)
            .returning(|_| true);

        let p = paths(Path::new("/cache"));
        let cache = CacheStore::new(&runtime, &p, "hugo.exe");
        assert!(cache.is_cached(&tag("v0.120.0")));
    }
}
