//! Selects nodes of a [`DataValue`] tree by matching their paths.
//!
//! Every node has a textual path built from the keys and indices that lead to
//! it from the root: keys are joined with `.`, indices render as `[i]` with no
//! separator, so the value `val4` in
//! `{"key3": ["text", {"key4": "val4"}]}` lives at `key3[1].key4`.
//! The root's path is the empty string.
//!
//! A node is selected when any pattern matches anywhere inside its path
//! (unanchored search); anchor a pattern with `^`/`$` to match a whole path.
//!
//! # Examples
//!
//! ```
//! use ezdatapipe_core::path_filter::PathFilter;
//! use ezdatapipe_core::value::DataValue;
//!
//! let source: DataValue = serde_json::from_str(
//!     r#"{"key1": "val1", "key3": ["text", {"key4": "val4"}]}"#,
//! ).unwrap();
//!
//! let filter = PathFilter::new([r"\.key4$"])?;
//! assert_eq!(filter.filter(&source), vec![&DataValue::from("val4")]);
//! # Ok::<(), ezdatapipe_core::error::Error>(())
//! ```

use std::fmt::{Display, Formatter};

use log::debug;
use regex::Regex;

use crate::error::Result;
use crate::value::DataValue;

/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

impl PathSegment<'_> {
    /// Appends this segment to an already rendered parent path. Keys below
    /// the root are preceded by `.`, even when the parent path is empty.
    fn render_onto(&self, path: &mut String, depth: usize) {
        match self {
            PathSegment::Key(key) => {
                if depth > 0 {
                    path.push('.');
                }
                path.push_str(key);
            }
            PathSegment::Index(index) => {
                path.push('[');
                path.push_str(&index.to_string());
                path.push(']');
            }
        }
    }
}

impl Display for PathSegment<'_> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PathSegment::Key(key) => formatter.write_str(key),
            PathSegment::Index(index) => write!(formatter, "[{index}]"),
        }
    }
}

/// Renders a full path from root-first segments.
pub fn render_path(segments: &[PathSegment<'_>]) -> String {
    let mut path = String::new();
    for (depth, segment) in segments.iter().enumerate() {
        segment.render_onto(&mut path, depth);
    }
    path
}

/// A compiled set of path patterns.
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<Regex>,
}

impl PathFilter {
    /// Compiles the given regular expressions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Pattern`] for the first pattern that is
    /// not a valid regular expression.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn from_regexes(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Collects every node whose path matches a pattern, in depth-first
    /// pre-order. A node matching several patterns is collected once per
    /// matching pattern.
    pub fn filter<'a>(&self, source: &'a DataValue) -> Vec<&'a DataValue> {
        filter_by_path(source, &self.patterns)
    }

    /// Like [`PathFilter::filter`], pairing each node with its rendered path.
    pub fn filter_with_paths<'a>(&self, source: &'a DataValue) -> Vec<(String, &'a DataValue)> {
        let mut nodes = Vec::new();
        let mut path = String::new();
        collect(source, &mut path, 0, &self.patterns, &mut nodes);
        debug!(
            "Path filter with {} pattern(s) matched {} node(s)",
            self.patterns.len(),
            nodes.len()
        );
        nodes
    }
}

/// Collects the nodes of `source` whose path matches any of `patterns`.
pub fn filter_by_path<'a>(source: &'a DataValue, patterns: &[Regex]) -> Vec<&'a DataValue> {
    let mut nodes = Vec::new();
    let mut path = String::new();
    collect(source, &mut path, 0, patterns, &mut nodes);
    nodes.into_iter().map(|(_, node)| node).collect()
}

fn collect<'a>(
    source: &'a DataValue,
    path: &mut String,
    depth: usize,
    patterns: &[Regex],
    nodes: &mut Vec<(String, &'a DataValue)>,
) {
    for pattern in patterns {
        if pattern.is_match(path) {
            nodes.push((path.clone(), source));
        }
    }

    match source {
        DataValue::Mapping(mapping) => {
            for (key, value) in mapping {
                descend(value, PathSegment::Key(key), path, depth, patterns, nodes);
            }
        }
        DataValue::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                descend(item, PathSegment::Index(index), path, depth, patterns, nodes);
            }
        }
        DataValue::Null | DataValue::Boolean(_) | DataValue::Number(_) | DataValue::String(_) => {}
    }
}

fn descend<'a>(
    child: &'a DataValue,
    segment: PathSegment<'_>,
    path: &mut String,
    depth: usize,
    patterns: &[Regex],
    nodes: &mut Vec<(String, &'a DataValue)>,
) {
    let parent_length = path.len();
    segment.render_onto(path, depth);
    collect(child, path, depth + 1, patterns, nodes);
    path.truncate(parent_length);
}
