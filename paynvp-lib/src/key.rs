//! Key grammar for PayPal NVP keys.
//!
//! PayPal expresses hierarchy by joining group names with `.` and marks
//! positional elements with a trailing order marker on a segment:
//!
//! ```text
//! responseEnvelope.ack
//! error(0).parameter(1)
//! receiverList.receiver[0].email
//! ```
//!
//! A marker is only recognised when the segment *ends* with `)` or `]` and
//! the text between the first matching opener and that closer parses as a
//! non-negative integer. Anything else is kept verbatim as a name.
//!
//! # Example
//!
//! ```
//! use paynvp_lib::key::{join_segments, split_key, PathComponent};
//!
//! let path = split_key("error(0).parameter(1)");
//! assert_eq!(
//!     path,
//!     vec![
//!         PathComponent::name("error"),
//!         PathComponent::Index(0),
//!         PathComponent::name("parameter"),
//!         PathComponent::Index(1),
//!     ]
//! );
//! assert_eq!(join_segments(&path), "error(0).parameter(1)");
//! ```

use serde::{Deserialize, Serialize};

/// Separator between hierarchy levels in a flat key.
pub const HIERARCHY_SEPARATOR: char = '.';

/// How order markers are rendered when keys are produced.
///
/// Both forms are accepted when parsing. Parentheses match PayPal's own
/// request documentation and are the default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStyle {
    /// `name(0)`
    #[default]
    Parentheses,
    /// `name[0]`
    Brackets,
}

impl IndexStyle {
    /// Opening character of the marker.
    pub fn open(self) -> char {
        match self {
            Self::Parentheses => '(',
            Self::Brackets => '[',
        }
    }

    /// Closing character of the marker.
    pub fn close(self) -> char {
        match self {
            Self::Parentheses => ')',
            Self::Brackets => ']',
        }
    }

    /// Style whose closing character is `close`, if any.
    fn from_close(close: char) -> Option<Self> {
        match close {
            ')' => Some(Self::Parentheses),
            ']' => Some(Self::Brackets),
            _ => None,
        }
    }
}

/// One level of a decomposed key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathComponent {
    /// A named group or field.
    Name(String),
    /// A positional element below the preceding name.
    Index(u64),
}

impl PathComponent {
    /// Create a name component.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// The name, if this is a name component.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Index(_) => None,
        }
    }

    /// The index, if this is an index component.
    pub fn as_index(&self) -> Option<u64> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(_) => None,
        }
    }
}

impl From<&str> for PathComponent {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<u64> for PathComponent {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

/// A single dot-delimited segment with its optional order marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySegment<'a> {
    /// Segment text before the marker, or the whole segment.
    pub name: &'a str,
    /// Order marker value.
    pub index: Option<u64>,
}

impl KeySegment<'_> {
    /// Number of path components this segment contributes.
    pub fn depth(&self) -> usize {
        if self.index.is_some() {
            2
        } else {
            1
        }
    }
}

/// Parse one segment, extracting a trailing `(N)` or `[N]` marker.
///
/// Unparseable markers are not an error: the segment is returned verbatim.
pub fn parse_segment(segment: &str) -> KeySegment<'_> {
    let verbatim = KeySegment {
        name: segment,
        index: None,
    };

    let Some(style) = segment.chars().last().and_then(IndexStyle::from_close) else {
        return verbatim;
    };
    let Some(offset) = segment.find(style.open()) else {
        return verbatim;
    };

    // Both markers are ASCII, so the closer is the final byte.
    let digits = &segment[offset + 1..segment.len() - 1];
    match digits.parse::<u64>() {
        Ok(index) => KeySegment {
            name: &segment[..offset],
            index: Some(index),
        },
        Err(_) => verbatim,
    }
}

/// Iterate over the segments of a flat key without allocating.
pub fn segments(key: &str) -> impl Iterator<Item = KeySegment<'_>> {
    key.split(HIERARCHY_SEPARATOR).map(parse_segment)
}

/// Decompose a flat key into path components.
///
/// An order marker adds an extra level: `error(0)` becomes
/// `[Name("error"), Index(0)]`.
pub fn split_key(key: &str) -> Vec<PathComponent> {
    let mut components = Vec::new();
    for segment in segments(key) {
        components.push(PathComponent::Name(segment.name.to_string()));
        if let Some(index) = segment.index {
            components.push(PathComponent::Index(index));
        }
    }
    components
}

/// Render path components as a flat key using parenthesised markers.
pub fn join_segments(components: &[PathComponent]) -> String {
    join_segments_with(components, IndexStyle::Parentheses)
}

/// Render path components as a flat key using the given marker style.
///
/// Names are joined with `.`; every index is appended to whatever precedes
/// it, so consecutive indices render as `a(0)(1)`.
pub fn join_segments_with(components: &[PathComponent], style: IndexStyle) -> String {
    let mut key = String::new();
    let mut first_name = true;
    for component in components {
        match component {
            PathComponent::Name(name) => {
                push_name(&mut key, name, first_name);
                first_name = false;
            }
            PathComponent::Index(index) => push_index(&mut key, *index, style),
        }
    }
    key
}

/// Append a name level to an accumulated key prefix.
///
/// Only the first name of a key goes without a separator. The prefix
/// alone cannot tell: an empty first name leaves it empty too.
pub fn push_name(prefix: &mut String, name: &str, first: bool) {
    if !first {
        prefix.push(HIERARCHY_SEPARATOR);
    }
    prefix.push_str(name);
}

/// Append an order marker to the last segment of a key prefix.
pub fn push_index(prefix: &mut String, index: u64, style: IndexStyle) {
    use std::fmt::Write;

    prefix.push(style.open());
    // Writing into a String cannot fail.
    let _ = write!(prefix, "{index}");
    prefix.push(style.close());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(parts: &[&str]) -> Vec<PathComponent> {
        parts.iter().map(|p| PathComponent::name(*p)).collect()
    }

    #[test]
    fn test_split_plain_key() {
        assert_eq!(split_key("a.b.c"), names(&["a", "b", "c"]));
    }

    #[test]
    fn test_split_indexed_key() {
        assert_eq!(
            split_key("error(0).parameter(1)"),
            vec![
                PathComponent::name("error"),
                PathComponent::Index(0),
                PathComponent::name("parameter"),
                PathComponent::Index(1),
            ]
        );
    }

    #[test]
    fn test_split_bracket_key() {
        assert_eq!(
            split_key("receiverList.receiver[0].email"),
            vec![
                PathComponent::name("receiverList"),
                PathComponent::name("receiver"),
                PathComponent::Index(0),
                PathComponent::name("email"),
            ]
        );
    }

    #[test]
    fn test_non_numeric_marker_is_kept_verbatim() {
        assert_eq!(split_key("amount[x]"), names(&["amount[x]"]));
        assert_eq!(split_key("amount(-1)"), names(&["amount(-1)"]));
        assert_eq!(split_key("amount()"), names(&["amount()"]));
    }

    #[test]
    fn test_mismatched_marker_is_kept_verbatim() {
        // Closer without the matching opener
        assert_eq!(split_key("amount[2)"), names(&["amount[2)"]));
        // First opener wins, leaving non-numeric content
        assert_eq!(split_key("a(b(1)"), names(&["a(b(1)"]));
    }

    #[test]
    fn test_marker_without_name() {
        assert_eq!(
            split_key("(3)"),
            vec![PathComponent::name(""), PathComponent::Index(3)]
        );
    }

    #[test]
    fn test_empty_segments_are_names() {
        assert_eq!(split_key("a..b"), names(&["a", "", "b"]));
        assert_eq!(split_key(""), names(&[""]));
        assert_eq!(split_key("a."), names(&["a", ""]));
    }

    #[test]
    fn test_parse_segment_depth() {
        assert_eq!(parse_segment("error(12)").depth(), 2);
        assert_eq!(parse_segment("error(12)").index, Some(12));
        assert_eq!(parse_segment("error").depth(), 1);
    }

    #[test]
    fn test_join_segments() {
        let path = split_key("receiverList.receiver[0].email");
        assert_eq!(join_segments(&path), "receiverList.receiver(0).email");
        assert_eq!(
            join_segments_with(&path, IndexStyle::Brackets),
            "receiverList.receiver[0].email"
        );
    }

    #[test]
    fn test_join_consecutive_and_leading_indices() {
        let path = vec![
            PathComponent::name("a"),
            PathComponent::Index(0),
            PathComponent::Index(1),
        ];
        assert_eq!(join_segments(&path), "a(0)(1)");
        assert_eq!(join_segments(&[PathComponent::Index(4)]), "(4)");
    }

    #[test]
    fn test_join_preserves_empty_names() {
        let path = split_key(".a..b");
        assert_eq!(join_segments(&path), ".a..b");
    }

    #[test]
    fn test_push_helpers() {
        let mut prefix = String::new();
        push_name(&mut prefix, "receiverList", true);
        push_name(&mut prefix, "receiver", false);
        push_index(&mut prefix, 10, IndexStyle::Parentheses);
        push_name(&mut prefix, "email", false);
        assert_eq!(prefix, "receiverList.receiver(10).email");

        let mut prefix = String::new();
        push_name(&mut prefix, "", true);
        push_name(&mut prefix, "b", false);
        assert_eq!(prefix, ".b");
    }
}
