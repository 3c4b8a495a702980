use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

use crate::error::TableError;

/// Position of a group in the definition tree, e.g. `borders.radius.t`.
///
/// Paths compare by segment, so two paths built through different routes
/// (`parse`, `child`) are equal whenever they name the same group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupPath {
    segments: Vec<String>,
}

impl GroupPath {
    /// A single-segment path directly under the root.
    pub fn root(name: &str) -> Self {
        Self {
            segments: vec![name.to_string()],
        }
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// The path of `name` under `parent`, or directly under the root.
    pub fn join(parent: Option<&GroupPath>, name: &str) -> Self {
        match parent {
            Some(parent) => parent.child(name),
            None => Self::root(name),
        }
    }

    pub fn parent(&self) -> Option<GroupPath> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True when `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &GroupPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    pub fn parse(raw: &str) -> Result<Self, TableError> {
        let segments = raw.split('.').map(str::to_string).collect::<Vec<_>>();
        if segments.iter().any(|segment| !is_valid_segment(segment)) {
            return Err(TableError::InvalidPath(raw.to_string()));
        }
        Ok(Self { segments })
    }
}

/// Segments are joined with `.`, so they may not contain one or be empty.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('.') && !segment.chars().any(char::is_whitespace)
}

impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for GroupPath {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for GroupPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathVisitor;

        impl Visitor<'_> for PathVisitor {
            type Value = GroupPath;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a dotted group path")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<GroupPath, E> {
                GroupPath::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(PathVisitor)
    }
}
