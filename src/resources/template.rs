//! Simple `{var}` URI templates.
//!
//! Variables expand to a single path segment: matched values never contain
//! `/` and are never empty.

use crate::types::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed URI template such as `acme://issues/{project}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            if rest[..open].contains('}') {
                return Err(Error::validation(format!("Unbalanced '}}' in template: {}", raw)));
            }
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| Error::validation(format!("Unclosed '{{' in template: {}", raw)))?;
            let name = &after[..close];
            if name.is_empty() || name.contains('{') {
                return Err(Error::validation(format!(
                    "Invalid variable name in template: {}",
                    raw
                )));
            }
            segments.push(Segment::Variable(name.to_string()));
            rest = &after[close + 1..];
        }

        if rest.contains('}') {
            return Err(Error::validation(format!("Unbalanced '}}' in template: {}", raw)));
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Variable names in order of appearance.
    pub fn variables(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Substitute variables. Missing variables expand to the empty string.
    pub fn expand(&self, vars: &HashMap<String, String>) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Variable(name) => vars.get(name).map(String::as_str).unwrap_or(""),
            })
            .collect()
    }

    /// Extract variables from a concrete URI, or `None` if it does not match.
    pub fn match_uri(&self, uri: &str) -> Option<HashMap<String, String>> {
        let mut vars = HashMap::new();
        let mut rest = uri;
        let mut segments = self.segments.iter().peekable();

        while let Some(segment) = segments.next() {
            match segment {
                Segment::Literal(text) => {
                    rest = rest.strip_prefix(text.as_str())?;
                }
                Segment::Variable(name) => {
                    let end = match segments.peek() {
                        Some(Segment::Literal(next)) => rest.find(next.as_str())?,
                        _ => rest.len(),
                    };
                    let value = &rest[..end];
                    if value.is_empty() || value.contains('/') {
                        return None;
                    }
                    vars.insert(name.clone(), value.to_string());
                    rest = &rest[end..];
                }
            }
        }

        rest.is_empty().then_some(vars)
    }
}

impl FromStr for UriTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
