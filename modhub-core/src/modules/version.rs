//! Version ordering for catalog entries
//!
//! Catalog versions are loosely formatted: `1.2.3`, `v1.2.3`, and shorthand
//! forms like `2.0` or `v3` all appear. They are compared as semantic
//! versions after normalization. The stored strings are never rewritten.

use modhub_common::CatalogVersion;
use semver::Version;
use std::cmp::Ordering;

/// Parse a catalog version string into a semantic version
///
/// Accepts an optional leading `v` and the `MAJOR` / `MAJOR.MINOR`
/// shorthands (missing components are zero). Shorthands cannot carry
/// pre-release or build suffixes.
pub fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.strip_prefix('v').unwrap_or(raw);

    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let parts: Vec<&str> = trimmed.split('.').collect();
    match parts.as_slice() {
        [major] => Some(Version::new(numeric(major)?, 0, 0)),
        [major, minor] => Some(Version::new(numeric(major)?, numeric(minor)?, 0)),
        _ => None,
    }
}

/// Decimal component without leading zeros
fn numeric(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}

/// Compare two version strings by semantic-version precedence
///
/// Build metadata does not take part in the comparison. A version that
/// cannot be parsed ranks below every parseable one; two unparseable
/// versions are equal.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => precedence(&a, &b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Highest version of a module, the first one wins among equals
///
/// Returns `None` only for an empty slice.
pub fn latest_version(versions: &[CatalogVersion]) -> Option<&CatalogVersion> {
    let mut latest: Option<&CatalogVersion> = None;

    for candidate in versions {
        latest = match latest {
            Some(best) if compare_versions(&candidate.version, &best.version) != Ordering::Greater => {
                Some(best)
            }
            _ => Some(candidate),
        };
    }

    latest
}
