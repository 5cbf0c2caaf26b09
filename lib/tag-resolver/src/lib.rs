use std::cmp::{Ordering, Reverse};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use semver::Version;
use thiserror::Error;

#[remain::sorted]
#[derive(Debug, Error, PartialEq)]
pub enum TagResolverError {
    #[error("Tag text is empty")]
    Empty,

    #[error("Tag `{0}` is not a version: {1}")]
    InvalidVersion(String, String),
}

pub type TagResolverResult<T> = Result<T, TagResolverError>;

/// A tag that parsed as a semantic version.
///
/// Accepts strict `MAJOR.MINOR.PATCH[-PRE][+BUILD]` text with an optional leading `v`
/// (e.g. "v1.2.3" parses as "1.2.3"). The original text is kept so the tag can be written back
/// unchanged.
///
/// Equality and ordering follow version precedence, so build metadata is ignored and
/// "1.0.0+a" equals "1.0.0+b".
#[derive(Clone, Debug)]
pub struct TagVersion {
    raw: String,
    version: Version,
}

impl TagVersion {
    pub fn parse(tag: &str) -> TagResolverResult<Self> {
        if tag.is_empty() {
            return Err(TagResolverError::Empty);
        }

        let text = tag.strip_prefix('v').unwrap_or(tag);
        let version = Version::parse(text)
            .map_err(|e| TagResolverError::InvalidVersion(tag.to_string(), e.to_string()))?;

        Ok(Self {
            raw: tag.to_string(),
            version,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    /// Compares major, minor and patch numerically, then pre-release labels.
    ///
    /// A release outranks any pre-release of the same major.minor.patch. Pre-release labels are
    /// compared field by field: numeric fields numerically, alphanumeric fields lexically, and a
    /// label that is a prefix of another ranks lower.
    pub fn precedence(&self, other: &Self) -> Ordering {
        self.version
            .major
            .cmp(&other.version.major)
            .then(self.version.minor.cmp(&other.version.minor))
            .then(self.version.patch.cmp(&other.version.patch))
            .then_with(|| self.version.pre.cmp(&other.version.pre))
    }
}

impl FromStr for TagVersion {
    type Err = TagResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagVersion::parse(s)
    }
}

impl PartialEq for TagVersion {
    fn eq(&self, other: &Self) -> bool {
        self.precedence(other) == Ordering::Equal
    }
}

impl Eq for TagVersion {}

impl PartialOrd for TagVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TagVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence(other)
    }
}

impl Display for TagVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Sort key for a single tag. Smaller ranks come first.
///
/// Versioned tags always rank ahead of unversioned ones. Within each group the order is reversed
/// so that the highest version, or the lexically greatest text, leads.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum TagRank {
    Versioned(Reverse<TagVersion>),
    Unversioned(Reverse<String>),
}

impl TagRank {
    fn of(tag: &str) -> Self {
        match TagVersion::parse(tag) {
            Ok(version) => TagRank::Versioned(Reverse(version)),
            Err(_) => TagRank::Unversioned(Reverse(tag.to_string())),
        }
    }
}

/// Compares two tags by release precedence, highest first.
pub fn compare_tags(a: &str, b: &str) -> Ordering {
    TagRank::of(a).cmp(&TagRank::of(b))
}

/// Orders tags in place, highest precedence first.
///
/// The sort is stable so tags of equal rank keep their input order.
pub fn sort_tags<S: AsRef<str>>(tags: &mut [S]) {
    tags.sort_by_cached_key(|tag| TagRank::of(tag.as_ref()));
}

/// Returns the tag that would come first after [`sort_tags`], or `None` when there are no tags.
pub fn latest_tag<S: AsRef<str>>(tags: &[S]) -> Option<&str> {
    latest_by(tags, |tag| tag.as_ref()).map(|tag| tag.as_ref())
}

/// Picks the highest ranked item using the tag returned by `tag_of`.
///
/// On ties the earliest item wins.
pub fn latest_by<T, F>(items: &[T], tag_of: F) -> Option<&T>
where
    F: Fn(&T) -> &str,
{
    items.iter().min_by_key(|item| TagRank::of(tag_of(item)))
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use test_case::test_case;

    use crate::{compare_tags, latest_by, latest_tag, sort_tags, TagResolverError, TagVersion};

    #[test_case(vec!["1.0.0", "2.0.0", "1.5.0"] => vec!["2.0.0", "1.5.0", "1.0.0"]; "basic")]
    #[test_case(vec!["v2.0.0", "v1.0.0", "v1.5.0"] => vec!["v2.0.0", "v1.5.0", "v1.0.0"]; "v prefix")]
    #[test_case(vec!["1.0.0", "1.0.0-alpha", "1.0.0-beta", "1.0.0-rc1"] => vec!["1.0.0", "1.0.0-rc1", "1.0.0-beta", "1.0.0-alpha"]; "releases before pre-releases")]
    #[test_case(vec!["2.0.0", "1.0.0", "1.0.0-alpha.1", "1.0.0-alpha.2", "1.0.0-beta"] => vec!["2.0.0", "1.0.0", "1.0.0-beta", "1.0.0-alpha.2", "1.0.0-alpha.1"]; "dotted pre-releases")]
    #[test_case(vec!["latest", "1.0.0", "main", "0.1.0"] => vec!["1.0.0", "0.1.0", "main", "latest"]; "unversioned after versioned")]
    #[test_case(vec!["latest", "1.0.0", "1.0.0-alpha", "dev", "0.9.0"] => vec!["1.0.0", "1.0.0-alpha", "0.9.0", "latest", "dev"]; "mixed with pre-releases")]
    #[test_case(vec!["latest", "main", "dev", "alpha"] => vec!["main", "latest", "dev", "alpha"]; "only unversioned")]
    #[test_case(vec!["1.0.10", "1.0.2", "1.0.1"] => vec!["1.0.10", "1.0.2", "1.0.1"]; "numeric patch")]
    #[test_case(vec!["1.0.0-alpha", "1.0.0-alpha.1", "1.0.0-alpha.beta", "1.0.0-1"] => vec!["1.0.0-alpha.beta", "1.0.0-alpha.1", "1.0.0-alpha", "1.0.0-1"]; "pre-release field rules")]
    #[test_case(vec!["1.0.0"] => vec!["1.0.0"]; "single")]
    #[test_case(vec![] => Vec::<String>::new(); "empty")]
    fn should_sort_tags(input: Vec<&str>) -> Vec<String> {
        let mut tags: Vec<String> = input.into_iter().map(String::from).collect();
        sort_tags(&mut tags);
        tags
    }

    #[test]
    fn sort_should_keep_input_order_for_equal_precedence() {
        let mut tags = vec!["1.0.0+build.2", "v1.0.0", "1.0.0+build.1"];
        sort_tags(&mut tags);
        assert_eq!(vec!["1.0.0+build.2", "v1.0.0", "1.0.0+build.1"], tags);
    }

    #[test]
    fn sorted_output_should_never_increase_in_precedence() {
        let mut tags = vec![
            "0.1.0", "v3.2.1", "3.2.1-rc.1", "3.2.1-rc.10", "3.2.1-rc.2", "10.0.0", "2.0.0-beta",
            "nightly", "1.1.1",
        ];
        sort_tags(&mut tags);
        for pair in tags.windows(2) {
            assert_ne!(Ordering::Less, compare_tags(pair[1], pair[0]), "{pair:?}");
        }
        assert_eq!("10.0.0", tags[0]);
        assert_eq!("nightly", tags[tags.len() - 1]);
    }

    #[test_case("1.2.3" => true; "plain")]
    #[test_case("v1.2.3" => true; "v prefix")]
    #[test_case("1.2.3-rc.1+build.5" => true; "pre-release and build")]
    #[test_case("V1.2.3" => false; "uppercase prefix")]
    #[test_case("1.2" => false; "missing patch")]
    #[test_case("latest" => false; "word")]
    fn should_detect_versions(tag: &str) -> bool {
        TagVersion::parse(tag).is_ok()
    }

    #[test]
    fn parse_should_reject_empty() {
        assert_eq!(Err(TagResolverError::Empty), TagVersion::parse(""));
    }

    #[test]
    fn parse_should_keep_original_text() {
        let version = TagVersion::parse("v2.4.0-beta.1").unwrap();
        assert_eq!("v2.4.0-beta.1", version.to_string());
        assert_eq!(2, version.version().major);
        assert!(version.is_prerelease());
    }

    #[test]
    fn release_should_outrank_its_prerelease() {
        let release = TagVersion::parse("1.0.0").unwrap();
        let prerelease = TagVersion::parse("1.0.0-rc1").unwrap();
        assert!(release > prerelease);
    }

    #[test]
    fn latest_tag_should_pick_highest() {
        assert_eq!(
            Some("v1.10.0"),
            latest_tag(&["v1.9.0", "v1.10.0", "latest", "v1.10.0-rc.1"])
        );
        assert_eq!(Some("main"), latest_tag(&["dev", "main"]));
        assert_eq!(None, latest_tag::<&str>(&[]));
    }

    #[test]
    fn latest_by_should_prefer_first_on_ties() {
        let entries = vec![("a", "1.0.0"), ("b", "v1.0.0"), ("c", "0.9.0")];
        assert_eq!(Some(&("a", "1.0.0")), latest_by(&entries, |(_, v)| *v));
    }
}
