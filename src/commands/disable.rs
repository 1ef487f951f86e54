use anyhow::Result;

use crate::config::AppPaths;
use crate::dotfile::DotFile;
use crate::runtime::Runtime;

/// Stop pinning a version in the current directory.
#[tracing::instrument(skip(runtime))]
pub fn disable<R: Runtime>(runtime: &R, paths: &AppPaths) -> Result<()> {
    DotFile::new(runtime, &paths.dot_file_path()).remove()?;
    println!("Version management has been disabled in the current directory.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    fn paths() -> AppPaths {
        AppPaths {
            cache_dir: PathBuf::from("/cache"),
            config_dir: PathBuf::from("/config"),
            working_dir: PathBuf::from("/site"),
            default_dir_name: "default".to_string(),
            dot_file_name: ".hvm".to_string(),
        }
    }

    #[test]
    fn test_disable_removes_dot_file() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(PathBuf::from("/site/.hvm")))
            .returning(|_| true);
        runtime
            .expect_remove_file()
            .with(eq(PathBuf::from("/site/.hvm")))
            .times(1)
            .returning(|_| Ok(()));

        disable(&runtime, &paths()).unwrap();
    }

    #[test]
    fn test_disable_without_dot_file_succeeds() {
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| false);
        runtime.expect_remove_file().never();

        disable(&runtime, &paths()).unwrap();
    }
}
