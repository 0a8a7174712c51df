//! Version comparison utilities.
//!
//! Release strings in the wild follow several conventions. Comparison tries
//! a PEP 440 style reading first (`1.0.dev1 < 1.0a1 < 1.0 < 1.0.post1`),
//! then strict semver, then plain string order.

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::sync::LazyLock;

static RELEASE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?:(?P<epoch>\d+)!)?
        (?P<release>\d+(?:\.\d+)*)
        (?:[-_.]?(?P<pre_kind>a|alpha|b|beta|rc|c|pre|preview)[-_.]?(?P<pre_n>\d+)?)?
        (?P<post>(?:[-_.]?(?:post|rev|r)[-_.]?(?P<post_n>\d+)?)|(?:-(?P<post_implicit>\d+)))?
        (?P<dev>[-_.]?dev[-_.]?(?P<dev_n>\d+)?)?
        (?:\+[a-z0-9]+(?:[-_.][a-z0-9]+)*)?
        $",
    )
    .expect("static regex")
});

/// Ordering key for a PEP 440 style version.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct ReleaseKey {
    epoch: u64,
    release: Vec<u64>,
    /// (phase, kind, number): dev-only < pre-release < final
    pre: (u8, u8, u64),
    /// 0 = no post segment, otherwise post number + 1
    post: u64,
    /// `u64::MAX` when there is no dev segment
    dev: u64,
}

fn parse_number(s: Option<regex::Match<'_>>) -> u64 {
    s.and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

fn release_key(version: &str) -> Option<ReleaseKey> {
    let normalized = normalize_version(version);
    let caps = RELEASE_VERSION.captures(&normalized)?;

    let mut release: Vec<u64> = caps
        .name("release")?
        .as_str()
        .split('.')
        .map(|part| part.parse().ok())
        .collect::<Option<_>>()?;
    while release.len() > 1 && release.last() == Some(&0) {
        release.pop();
    }

    let pre_kind = caps.name("pre_kind").map(|m| match m.as_str() {
        "a" | "alpha" => 0,
        "b" | "beta" => 1,
        _ => 2,
    });
    let post = if caps.name("post").is_some() {
        parse_number(caps.name("post_n").or_else(|| caps.name("post_implicit"))) + 1
    } else {
        0
    };
    let dev = if caps.name("dev").is_some() {
        Some(parse_number(caps.name("dev_n")))
    } else {
        None
    };

    let pre = match (pre_kind, post, dev) {
        (Some(kind), _, _) => (1, kind, parse_number(caps.name("pre_n"))),
        (None, 0, Some(_)) => (0, 0, 0),
        _ => (2, 0, 0),
    };

    Some(ReleaseKey {
        epoch: parse_number(caps.name("epoch")),
        release,
        pre,
        post,
        dev: dev.unwrap_or(u64::MAX),
    })
}

/// Compare two version strings
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    if let (Some(key_a), Some(key_b)) = (release_key(a), release_key(b)) {
        return key_a.cmp(&key_b).then_with(|| a.cmp(b));
    }

    if let (Ok(ver_a), Ok(ver_b)) = (Version::parse(a), Version::parse(b)) {
        return ver_a.cmp(&ver_b);
    }

    // Fall back to string comparison
    a.cmp(b)
}

/// Loose form of a version string used to resolve user input against a
/// catalog: trimmed, lowercased, without a leading `v`.
pub fn normalize_version(version: &str) -> String {
    let trimmed = version.trim();
    let stripped = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    stripped.to_lowercase()
}
