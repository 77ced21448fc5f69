//! Wildcard name patterns.
//!
//! A pattern is plain text where `*` stands for any (possibly empty)
//! substring. Matching is anchored at both ends and case-insensitive. Every
//! other character is literal, so `.`, `$`, `(` and friends in a function
//! name never change the meaning of a pattern.
//!
//! Patterns are compiled once into a small closed enum and reused for every
//! candidate:
//!
//! | text      | compiled                     |
//! |-----------|------------------------------|
//! | `*`       | `Any`                        |
//! | `main`    | `Exact("main")`              |
//! | `get*`    | `Prefix("get")`              |
//! | `*Data`   | `Suffix("data")`             |
//! | `*user*`  | `Contains("user")`           |
//! | `on*Click`| `Enclosed("on", "click")`    |
//! | `a*b*c`   | `Glob(["a", "b", "c"])`      |

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::model::Node;

const WILDCARD: char = '*';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Matcher {
    Any,
    Exact(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    Enclosed(String, String),
    /// Literal segments separated by wildcards. The first segment is
    /// anchored at the start and the last at the end.
    Glob(Vec<String>),
}

/// A compiled, case-insensitive wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    matcher: Matcher,
}

impl Pattern {
    /// Compile `text` into a pattern. Compilation never fails.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let source = text.into();
        let matcher = compile(&source.to_lowercase());
        Self { source, matcher }
    }

    /// The pattern text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        !matches!(self.matcher, Matcher::Exact(_))
    }

    /// Whether the whole of `value` satisfies the pattern.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        if matches!(self.matcher, Matcher::Any) {
            return true;
        }
        let value = value.to_lowercase();
        match &self.matcher {
            Matcher::Any => true,
            Matcher::Exact(text) => value == *text,
            Matcher::Prefix(prefix) => value.starts_with(prefix.as_str()),
            Matcher::Suffix(suffix) => value.ends_with(suffix.as_str()),
            Matcher::Contains(needle) => value.contains(needle.as_str()),
            Matcher::Enclosed(prefix, suffix) => {
                value.len() >= prefix.len() + suffix.len()
                    && value.starts_with(prefix.as_str())
                    && value.ends_with(suffix.as_str())
            }
            Matcher::Glob(segments) => glob_match(segments, &value),
        }
    }

    /// Whether the node's name, id, or class name satisfies the pattern.
    #[must_use]
    pub fn matches_node(&self, node: &Node) -> bool {
        self.matches(&node.name)
            || self.matches(node.id.as_str())
            || node
                .class_name
                .as_deref()
                .is_some_and(|class_name| self.matches(class_name))
    }
}

fn compile(lowered: &str) -> Matcher {
    let segments: Vec<&str> = lowered.split(WILDCARD).collect();
    match segments.as_slice() {
        [exact] => Matcher::Exact((*exact).to_string()),
        ["", ""] => Matcher::Any,
        ["", suffix] => Matcher::Suffix((*suffix).to_string()),
        [prefix, ""] => Matcher::Prefix((*prefix).to_string()),
        [prefix, suffix] => Matcher::Enclosed((*prefix).to_string(), (*suffix).to_string()),
        ["", needle, ""] if !needle.is_empty() => Matcher::Contains((*needle).to_string()),
        _ if segments.iter().all(|segment| segment.is_empty()) => Matcher::Any,
        _ => Matcher::Glob(segments.iter().map(|segment| (*segment).to_string()).collect()),
    }
}

fn glob_match(segments: &[String], value: &str) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return value.is_empty();
    };
    let Some((last, middle)) = rest.split_last() else {
        return value == first.as_str();
    };
    if value.len() < first.len() + last.len()
        || !value.starts_with(first.as_str())
        || !value.ends_with(last.as_str())
    {
        return false;
    }

    // Greedy leftmost placement of each middle segment is optimal for
    // wildcard-only globs.
    let mut cursor = first.len();
    let limit = value.len() - last.len();
    for segment in middle {
        let Some(window) = value.get(cursor..limit) else {
            return false;
        };
        match window.find(segment.as_str()) {
            Some(offset) => cursor += offset + segment.len(),
            None => return false,
        }
    }
    true
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for Pattern {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Pattern {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
