use serde::{Deserialize, Serialize};

/// Represents a git tag as listed by the tags endpoint
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TagRef {
    pub name: String,
}

/// Represents a GitHub release asset
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Represents a GitHub release
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Default)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}
