//! Version specifiers and their resolution against a tag list.
//!
//! Accepted forms, with or without a leading `v`:
//!
//! - `latest`, `v`, `v.`: the latest tag
//! - `1.2.3`: that exact tag, which must exist
//! - `1`: the highest tag whose major is at most 1
//! - `1.2`: the highest tag with major 1 and minor at most 2
//! - `.2`: as `1.2` where 1 is the major of the latest tag
//! - `.2.1`: the exact tag `v1.2.1` where 1 is the major of the latest tag

use std::fmt;
use std::str::FromStr;

use super::Tag;
use crate::error::HvmError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
    Latest,
    Exact(Tag),
    MajorOnly(u64),
    MajorMinor(u64, u64),
    LatestMajorMinor(u64),
    LatestMajorPatch(u64, u64),
}

impl FromStr for Specifier {
    type Err = HvmError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || HvmError::InvalidSpecifier(input.to_string());

        match input {
            "" => return Err(invalid()),
            "latest" | "v" | "v." => return Ok(Specifier::Latest),
            _ => {}
        }

        let body = input.strip_prefix('v').unwrap_or(input);

        // Major taken from the latest tag
        if let Some(rest) = body.strip_prefix('.') {
            let numbers = numeric_parts(rest).ok_or_else(invalid)?;
            return match numbers.as_slice() {
                [minor] => Ok(Specifier::LatestMajorMinor(*minor)),
                [minor, patch] => Ok(Specifier::LatestMajorPatch(*minor, *patch)),
                _ => Err(invalid()),
            };
        }

        let core = body.split(['-', '+']).next().unwrap_or_default();
        if core.split('.').count() == 3 {
            let tag = format!("v{}", body).parse::<Tag>().map_err(|_| invalid())?;
            return Ok(Specifier::Exact(tag));
        }

        let numbers = numeric_parts(body).ok_or_else(invalid)?;
        match numbers.as_slice() {
            [major] => Ok(Specifier::MajorOnly(*major)),
            [major, minor] => Ok(Specifier::MajorMinor(*major, *minor)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Specifier::Latest => f.write_str("latest"),
            Specifier::Exact(tag) => write!(f, "{}", tag),
            Specifier::MajorOnly(major) => write!(f, "v{}", major),
            Specifier::MajorMinor(major, minor) => write!(f, "v{}.{}", major, minor),
            Specifier::LatestMajorMinor(minor) => write!(f, "v.{}", minor),
            Specifier::LatestMajorPatch(minor, patch) => write!(f, "v.{}.{}", minor, patch),
        }
    }
}

impl Specifier {
    /// Picks the tag this specifier names from `tags`.
    ///
    /// Partial specifiers match the highest qualifying tag. The order of
    /// `tags` does not matter and the slice is left untouched.
    pub fn resolve(&self, tags: &[Tag], latest: &Tag) -> Option<Tag> {
        match self {
            Specifier::Latest => Some(latest.clone()),
            Specifier::Exact(tag) => tags.contains(tag).then(|| tag.clone()),
            Specifier::LatestMajorPatch(minor, patch) => {
                let tag: Tag = format!("v{}.{}.{}", latest.major(), minor, patch)
                    .parse()
                    .ok()?;
                tags.contains(&tag).then_some(tag)
            }
            Specifier::LatestMajorMinor(minor) => {
                Specifier::MajorMinor(latest.major(), *minor).resolve(tags, latest)
            }
            Specifier::MajorOnly(major) => highest(tags, |t| t.major() <= *major),
            Specifier::MajorMinor(major, minor) => {
                highest(tags, |t| t.major() == *major && t.minor() <= *minor)
            }
        }
    }
}

/// Resolves a user-supplied specifier to a tag present in `tags`.
///
/// There is no sort-order argument: matching picks the highest tag, so the
/// list may arrive ascending, descending or unsorted.
#[tracing::instrument(skip(tags))]
pub fn resolve(input: &str, tags: &[Tag], latest: &Tag) -> Result<Tag, HvmError> {
    let specifier: Specifier = input.parse()?;
    specifier
        .resolve(tags, latest)
        .ok_or_else(|| HvmError::TagNotFound(input.to_string()))
}

fn highest<F>(tags: &[Tag], matches: F) -> Option<Tag>
where
    F: Fn(&Tag) -> bool,
{
    tags.iter().filter(|t| matches(t)).max().cloned()
}

/// Dot-separated non-negative integers without leading zeros.
fn numeric_parts(s: &str) -> Option<Vec<u64>> {
    s.split('.')
        .map(|part| {
            let well_formed = !part.is_empty()
                && part.bytes().all(|b| b.is_ascii_digit())
                && (part == "0" || !part.starts_with('0'));
            if well_formed { part.parse().ok() } else { None }
        })
        .collect()
}
