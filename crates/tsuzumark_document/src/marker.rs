//! Marker types.
//!
//! A marker is a tagged annotation object that lives inside the document and
//! is bound to exactly one range. Markers created by other actors on the same
//! document carry other tags and are never touched by tag-scoped operations.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TextRange;

/// Separator between messages accumulated in a marker title.
pub const MESSAGE_SEPARATOR: char = ';';

/// Namespaced marker tag, written `namespace:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarkerTag {
    namespace: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl MarkerTag {
    /// Tag carried by every lint marker this workspace creates.
    pub const LINT: MarkerTag = MarkerTag {
        namespace: Cow::Borrowed("dev.tsuzumark"),
        name: Cow::Borrowed("lint"),
    };

    /// Creates a new tag.
    ///
    /// Both parts must be non-empty and must not contain `:` or whitespace.
    pub fn new(
        namespace: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
    ) -> Result<Self, String> {
        let namespace = namespace.into();
        let name = name.into();
        validate_part("namespace", &namespace)?;
        validate_part("name", &name)?;
        Ok(Self { namespace, name })
    }

    /// Returns the namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the name part.
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn validate_part(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("Marker tag {} must not be empty", kind));
    }
    if value.chars().any(|c| c == ':' || c.is_whitespace()) {
        return Err(format!(
            "Marker tag {} '{}' must not contain ':' or whitespace",
            kind, value
        ));
    }
    Ok(())
}

impl fmt::Display for MarkerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for MarkerTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, name) = s
            .split_once(':')
            .ok_or_else(|| format!("Marker tag '{}' must be written namespace:name", s))?;
        Self::new(namespace.to_string(), name.to_string())
    }
}

impl TryFrom<String> for MarkerTag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MarkerTag> for String {
    fn from(tag: MarkerTag) -> Self {
        tag.to_string()
    }
}

/// Host-assigned marker identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A committed marker as read back from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub id: MarkerId,
    pub tag: MarkerTag,
    pub range: TextRange,
    /// Accumulated display text, e.g. `"first;second;"`.
    pub title: String,
}

impl Marker {
    /// Splits the accumulated title into individual messages.
    pub fn messages(&self) -> Vec<&str> {
        self.title
            .split(MESSAGE_SEPARATOR)
            .filter(|m| !m.is_empty())
            .collect()
    }
}

/// What happens to the wrapped characters when a marker is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerRemoval {
    /// Remove only the marker; the text stays.
    #[default]
    KeepContent,
    /// Remove the marker and the characters it wraps.
    WithContent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_lint_tag_display() {
        assert_eq!(MarkerTag::LINT.to_string(), "dev.tsuzumark:lint");
    }

    #[test]
    fn test_tag_parse_round_trip() {
        let tag: MarkerTag = "com.example:review".parse().unwrap();
        assert_eq!(tag.namespace(), "com.example");
        assert_eq!(tag.name(), "review");
    }

    #[test]
    fn test_tags_with_same_name_differ_by_namespace() {
        let ours = MarkerTag::LINT;
        let theirs = MarkerTag::new("com.other", "lint").unwrap();
        assert_ne!(ours, theirs);
    }

    #[rstest]
    #[case::no_separator("textlint")]
    #[case::empty_namespace(":lint")]
    #[case::empty_name("dev.tsuzumark:")]
    #[case::extra_separator("a:b:c")]
    #[case::whitespace("dev tsuzumark:lint")]
    fn test_tag_parse_rejects(#[case] input: &str) {
        assert!(input.parse::<MarkerTag>().is_err(), "accepted {}", input);
    }

    #[test]
    fn test_tag_serde_as_string() {
        let json = serde_json::to_string(&MarkerTag::LINT).unwrap();
        assert_eq!(json, "\"dev.tsuzumark:lint\"");
        let back: MarkerTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MarkerTag::LINT);
    }

    #[test]
    fn test_marker_messages() {
        let marker = Marker {
            id: MarkerId(1),
            tag: MarkerTag::LINT,
            range: TextRange::single(0, 0),
            title: "first;second;".to_string(),
        };
        assert_eq!(marker.messages(), vec!["first", "second"]);
    }

    #[test]
    fn test_marker_messages_empty_title() {
        let marker = Marker {
            id: MarkerId(1),
            tag: MarkerTag::LINT,
            range: TextRange::single(0, 0),
            title: String::new(),
        };
        assert!(marker.messages().is_empty());
    }
}
