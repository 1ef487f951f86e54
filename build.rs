use std::{
    process::Command,
    time::{SystemTime, UNIX_EPOCH},
};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let version = match git(&["describe", "--tags", "--always", "--dirty"]) {
        Some(described) => {
            if described.ends_with("-dirty") || described.is_empty() {
                // Dirty working tree or no output: mark as a development build
                format!("{}-dev", described.trim_end_matches("-dirty"))
            } else {
                described
            }
        }
        None => "dev".to_string(),
    };

    let commit = git(&["rev-parse", "--short=7", "HEAD"]).unwrap_or_default();

    println!("cargo:rustc-env=HVM_VERSION={}", version);
    println!("cargo:rustc-env=HVM_COMMIT_HASH={}", commit);
    println!("cargo:rustc-env=HVM_BUILD_DATE={}", timestamp());
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8(output.stdout).ok()?.trim().to_string())
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
