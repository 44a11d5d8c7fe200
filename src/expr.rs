//! Terraform expressions used as resource property values.
//!
//! A property is either plain text or a template mixing text with references
//! to attributes of other resources (`${aws_s3_bucket.bucket.arn}`). References
//! are kept typed until synthesis, which is how the plan layer discovers the
//! dependency edges between resources.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Escapes Terraform template sequences so a literal is emitted verbatim.
///
/// `${` becomes `$${` and `%{` becomes `%%{`.
pub fn escape_literal(text: &str) -> String {
    text.replace("${", "$${").replace("%{", "%%{")
}

/// Returns true if `name` is usable as a Terraform identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Address of a resource inside a stack: `<type>.<logical id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceAddress {
    /// Terraform resource type, e.g. `aws_flow_log`
    pub resource_type: String,
    /// Logical id, unique per type within a stack
    pub logical_id: String,
}

impl ResourceAddress {
    /// Create a new address, validating the logical id.
    pub fn new(resource_type: impl Into<String>, logical_id: impl Into<String>) -> Result<Self> {
        let resource_type = resource_type.into();
        let logical_id = logical_id.into();
        for part in [&resource_type, &logical_id] {
            if !is_valid_identifier(part) {
                return Err(Error::InvalidIdentifier(part.clone()));
            }
        }
        Ok(Self {
            resource_type,
            logical_id,
        })
    }

    /// Reference an attribute of this resource.
    pub fn attr(&self, attribute: impl Into<String>) -> Reference {
        Reference {
            target: self.clone(),
            attribute: attribute.into(),
        }
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.logical_id)
    }
}

impl FromStr for ResourceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('.') {
            Some((resource_type, logical_id)) => Self::new(resource_type, logical_id),
            None => Err(Error::InvalidIdentifier(s.to_string())),
        }
    }
}

/// Reference to an attribute of another resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Resource being referenced
    pub target: ResourceAddress,
    /// Attribute name (`arn`, `id`, ...)
    pub attribute: String,
}

impl Reference {
    /// The interpolation form, `${type.id.attribute}`.
    pub fn interpolation(&self) -> String {
        format!("${{{self}}}")
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.attribute)
    }
}

/// One piece of a string template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, escaped on render
    Text(String),
    /// Interpolated reference
    Ref(Reference),
}

/// A string-valued property: literal text, a reference, or a mix of both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expr {
    segments: Vec<Segment>,
}

impl Expr {
    /// A plain literal.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Text(text.into())],
        }
    }

    /// A bare reference.
    pub fn reference(reference: Reference) -> Self {
        Self {
            segments: vec![Segment::Ref(reference)],
        }
    }

    /// Appends another expression, merging adjacent text.
    pub fn concat(mut self, other: impl Into<Expr>) -> Self {
        for segment in other.into().segments {
            match (self.segments.last_mut(), segment) {
                (Some(Segment::Text(prev)), Segment::Text(next)) => prev.push_str(&next),
                (_, segment) => self.segments.push(segment),
            }
        }
        self
    }

    /// All references embedded in this expression.
    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Ref(r) => Some(r),
            Segment::Text(_) => None,
        })
    }

    /// The literal text when the expression holds no references.
    pub fn as_literal(&self) -> Option<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Ref(_) => return None,
            }
        }
        Some(out)
    }

    /// Returns true if the expression renders to an empty string.
    pub fn is_empty(&self) -> bool {
        self.as_literal().is_some_and(|s| s.is_empty())
    }

    /// Renders the expression as a Terraform JSON string value.
    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Text(t) => escape_literal(t),
                Segment::Ref(r) => r.interpolation(),
            })
            .collect()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

impl From<String> for Expr {
    fn from(text: String) -> Self {
        Self::literal(text)
    }
}

impl From<Reference> for Expr {
    fn from(reference: Reference) -> Self {
        Self::reference(reference)
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

/// Serializes a string map with every value escaped as a literal.
pub fn serialize_literal_map<S: Serializer>(
    map: &BTreeMap<String, String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_map(map.iter().map(|(k, v)| (k, escape_literal(v))))
}
