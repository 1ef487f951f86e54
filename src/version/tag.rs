use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::HvmError;

/// A release tag of the form `vMAJOR.MINOR.PATCH`, ordered by semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    name: String,
    version: Version,
}

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    /// The tag without its leading `v`, as used in asset file names.
    pub fn number(&self) -> &str {
        &self.name[1..]
    }

    /// Whether this tag is at or above `major.minor.patch`.
    pub fn at_least(&self, major: u64, minor: u64, patch: u64) -> bool {
        self.version >= Version::new(major, minor, patch)
    }
}

impl FromStr for Tag {
    type Err = HvmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let version = s
            .strip_prefix('v')
            .and_then(|rest| Version::parse(rest).ok())
            .ok_or_else(|| HvmError::InvalidSpecifier(s.to_string()))?;
        Ok(Self {
            name: s.to_string(),
            version,
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Parses every tag in `names`, panicking on invalid input. Test helper.
#[cfg(test)]
pub(crate) fn tags(names: &[&str]) -> Vec<Tag> {
    names.iter().map(|n| n.parse().unwrap()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requires_prefix_and_three_parts() {
        assert!("v0.120.0".parse::<Tag>().is_ok());
        assert!("v0.120.0-DEV".parse::<Tag>().is_ok());
        assert!("0.120.0".parse::<Tag>().is_err());
        assert!("v0.120".parse::<Tag>().is_err());
        assert!("v0.120.0.1".parse::<Tag>().is_err());
        assert!("latest".parse::<Tag>().is_err());
        assert!("".parse::<Tag>().is_err());
    }

    #[test]
    fn test_ordering_is_semantic() {
        let mut list = tags(&["v0.9.0", "v0.100.0", "v0.54.0", "v1.0.0"]);
        list.sort();
        let names: Vec<&str> = list.iter().map(Tag::as_str).collect();
        assert_eq!(names, vec!["v0.9.0", "v0.54.0", "v0.100.0", "v1.0.0"]);
    }

    #[test]
    fn test_accessors() {
        let tag: Tag = "v0.153.2".parse().unwrap();
        assert_eq!(tag.major(), 0);
        assert_eq!(tag.minor(), 153);
        assert_eq!(tag.number(), "0.153.2");
        assert_eq!(tag.to_string(), "v0.153.2");
        assert!(tag.at_least(0, 153, 0));
        assert!(!tag.at_least(0, 154, 0));
    }
}
