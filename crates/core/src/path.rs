//! Dotted field paths into documents
//!
//! A [`FieldPath`] names a value inside a document the way a document
//! database does: `name`, `nutritions.calories`, `tags.0`. Each segment is an
//! object key; a segment made only of digits also indexes into an array when
//! the value at that point is an array.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for field path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// The path text is empty
    #[error("path is empty")]
    Empty,
    /// Empty segment, e.g. `a..b` or a trailing dot
    #[error("empty segment at position {0}")]
    EmptySegment(usize),
    /// Operator prefix leaked into a path
    #[error("unexpected '$' at position {0}")]
    UnexpectedDollar(usize),
}

/// A dotted path to a field inside a document
///
/// # Examples
///
/// ```
/// use nutriflow_core::FieldPath;
///
/// let path: FieldPath = "nutritions.calories".parse().unwrap();
/// assert_eq!(path.segments(), &["nutritions".to_string(), "calories".to_string()]);
/// assert_eq!(path.to_string(), "nutritions.calories");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a path, reporting failures as [`crate::Error::InvalidPath`]
    pub fn parse(text: &str) -> crate::Result<Self> {
        text.parse().map_err(|e: PathParseError| crate::Error::InvalidPath {
            path: text.to_string(),
            reason: e.to_string(),
        })
    }

    /// Get the path segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for FieldPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(PathParseError::Empty);
        }

        let mut segments = Vec::new();
        let mut position = 0;
        for segment in s.split('.') {
            if segment.is_empty() {
                return Err(PathParseError::EmptySegment(position));
            }
            if segment.starts_with('$') {
                return Err(PathParseError::UnexpectedDollar(position));
            }
            segments.push(segment.to_string());
            position += segment.len() + 1;
        }

        Ok(FieldPath { segments })
    }
}

impl TryFrom<String> for FieldPath {
    type Error = PathParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
