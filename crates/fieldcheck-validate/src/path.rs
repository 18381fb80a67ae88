//! Dotted field paths and their resolution against nested input.
//!
//! A path such as `address.*.city` is a sequence of segments. A literal
//! segment descends into an object by key (or into an array by index when the
//! segment is numeric). A `*` segment expands into one branch per element of
//! an array or per entry of an object.

use crate::error::ConfigError;
use serde_json::Value;
use std::fmt;

/// One segment of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A literal key or array index
    Key(String),
    /// `*`, matching every element at this position
    Wildcard,
}

/// One step of a concrete path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => f.write_str(key),
            Step::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A concrete location produced by resolving a [`FieldPath`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a> {
    /// Dotted concrete path (e.g., `address.1.city`)
    pub path: String,
    /// The steps of the concrete path
    pub steps: Vec<Step>,
    /// The value found there, `None` when absent
    pub value: Option<&'a Value>,
}

impl<'a> Resolved<'a> {
    fn new(steps: &[Step], value: Option<&'a Value>) -> Self {
        let path = steps
            .iter()
            .map(Step::to_string)
            .collect::<Vec<_>>()
            .join(".");
        Self {
            path,
            steps: steps.to_vec(),
            value,
        }
    }
}

/// A parsed, possibly wildcarded, dotted field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a dotted path.
    ///
    /// Empty paths and empty segments (`a..b`, `.a`, `a.`) are rejected.
    pub fn parse(path: &str) -> Result<Self, ConfigError> {
        if path.is_empty() {
            return Err(ConfigError::InvalidPath {
                path: path.to_string(),
                reason: "path is empty",
            });
        }

        let segments = path
            .split('.')
            .map(|segment| match segment {
                "" => Err(ConfigError::InvalidPath {
                    path: path.to_string(),
                    reason: "path contains an empty segment",
                }),
                "*" => Ok(Segment::Wildcard),
                key => Ok(Segment::Key(key.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// The path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Check if the path contains a `*` segment.
    pub fn is_wildcard(&self) -> bool {
        self.segments.contains(&Segment::Wildcard)
    }

    /// Check whether a concrete dotted path is matched by this path.
    pub fn matches(&self, concrete: &str) -> bool {
        let mut parts = concrete.split('.');
        for segment in &self.segments {
            match (segment, parts.next()) {
                (_, None) => return false,
                (Segment::Wildcard, Some(_)) => {}
                (Segment::Key(key), Some(part)) if key == part => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }

    /// Resolve the path against input data.
    ///
    /// Literal segments always produce exactly one location, which is absent
    /// when the key is missing. Wildcards produce one location per element,
    /// and zero locations over anything that is not an array or object.
    pub fn resolve<'a>(&self, data: &'a Value) -> Vec<Resolved<'a>> {
        let mut out = Vec::new();
        let mut steps = Vec::with_capacity(self.segments.len());
        self.walk(Some(data), 0, &mut steps, &mut out);
        out
    }

    fn walk<'a>(
        &self,
        node: Option<&'a Value>,
        depth: usize,
        steps: &mut Vec<Step>,
        out: &mut Vec<Resolved<'a>>,
    ) {
        let Some(segment) = self.segments.get(depth) else {
            out.push(Resolved::new(steps, node));
            return;
        };

        match segment {
            Segment::Key(key) => {
                let (step, child) = match node {
                    Some(Value::Object(map)) => (Step::Key(key.clone()), map.get(key)),
                    Some(Value::Array(items)) => match key.parse::<usize>() {
                        Ok(index) => (Step::Index(index), items.get(index)),
                        Err(_) => (Step::Key(key.clone()), None),
                    },
                    _ => (Step::Key(key.clone()), None),
                };
                steps.push(step);
                self.walk(child, depth + 1, steps, out);
                steps.pop();
            }
            Segment::Wildcard => match node {
                Some(Value::Array(items)) => {
                    for (index, item) in items.iter().enumerate() {
                        steps.push(Step::Index(index));
                        self.walk(Some(item), depth + 1, steps, out);
                        steps.pop();
                    }
                }
                Some(Value::Object(map)) => {
                    for (key, item) in map {
                        steps.push(Step::Key(key.clone()));
                        self.walk(Some(item), depth + 1, steps, out);
                        steps.pop();
                    }
                }
                _ => {}
            },
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Look up a literal dotted path (no wildcards) in input data.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |node, key| match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Match a dotted pattern that may contain `*` segments against a concrete path.
pub(crate) fn pattern_matches(pattern: &str, concrete: &str) -> bool {
    let mut left = pattern.split('.');
    let mut right = concrete.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some("*"), Some(_)) => {}
            (Some(a), Some(b)) if a == b => {}
            _ => return false,
        }
    }
}
