//! Structured query keys.

use std::fmt;

/// Ordered key segments: resource family first, then parameters in a
/// stable order. Invalidation matches on segment prefixes, so
/// `["signals"]` covers every `["signals", ...]` list variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    segments: Vec<String>,
}

impl QueryKey {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            segments: vec![family.into()],
        }
    }

    /// Append a positional segment (e.g. a resource id)
    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append `name=value` when the parameter is set. Unset parameters are
    /// omitted so `{limit: None}` and `{}` share one cache entry.
    pub fn param<V: fmt::Display>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.segments.push(format!("{name}={value}"));
        }
        self
    }

    pub fn family(&self) -> &str {
        &self.segments[0]
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True when `prefix` matches this key segment-by-segment.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}
