//! Version tokens found in artifact names and manifest versions
//!
//! Versions are opaque strings: they are extracted, compared for equality
//! and reshaped into the four-field form linglong expects, never ordered.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Four dotted numeric groups, e.g. `7.7.3851.52`
static FOUR_PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+\.\d+\.\d+)").unwrap());

/// Fallback patterns, most specific first
static FALLBACK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d{4})",
        r"(\d+\.\d+\.\d+)",
        r"(\d+\.\d+)",
        r"(\d+(?:\.\d+)+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract the version embedded in a file name or URL
///
/// A four-part dotted version wins over everything else. Otherwise the
/// fallbacks are tried in order: a bare 4-digit build number, `x.y.z`,
/// `x.y`, then any dotted run. Returns `None` if nothing matches.
pub fn extract_version(text: &str) -> Option<String> {
    std::iter::once(&*FOUR_PART_RE)
        .chain(FALLBACK_RES.iter())
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Reshape a fetched version into `major.minor.patch.MMDD`
///
/// The first three components are kept (missing ones become `0`) and the
/// fourth is always replaced by the month and day of `today`.
pub fn normalize_version(raw: &str, today: NaiveDate) -> String {
    let stamp = today.format("%m%d");
    let parts: Vec<&str> = raw.split('.').collect();

    match parts.as_slice() {
        [major] => format!("{}.0.0.{}", major, stamp),
        [major, minor] => format!("{}.{}.0.{}", major, minor, stamp),
        [major, minor, patch, ..] => format!("{}.{}.{}.{}", major, minor, patch, stamp),
        [] => format!("{}.0.0.{}", raw, stamp),
    }
}
