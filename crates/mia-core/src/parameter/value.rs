//! Typed parameter values and conversion into caller types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::workspace::Workspace;

/// Current or default value held by a parameter.
///
/// Serialises untagged so a persisted workflow stores plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// No value (separators).
    Empty,
    /// An integer value.
    Integer(i64),
    /// A text value: an artefact name, a free-text name, or a choice.
    Text(String),
}

impl ParameterValue {
    /// Returns the type name used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Integer(_) => "integer",
            Self::Text(_) => "text",
        }
    }

    /// Returns the text value, if any.
    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Empty | Self::Integer(_) => None,
        }
    }

    /// Returns the integer value, if any.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Empty | Self::Text(_) => None,
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// Rust types a parameter value can be read as.
///
/// Implemented for `String` (text kinds) and the integer types used by
/// numeric parameters.
pub trait ParameterType: Sized {
    /// Type name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Extracts the typed value, returning `None` on a type mismatch.
    fn extract(value: &ParameterValue) -> Option<Self>;

    /// Resolves workspace-dependent meaning. The default is the identity.
    #[must_use]
    fn resolve(self, _workspace: Option<&Workspace>) -> Self {
        self
    }
}

impl ParameterType for String {
    const TYPE_NAME: &'static str = "text";

    fn extract(value: &ParameterValue) -> Option<Self> {
        value.as_text().map(str::to_owned)
    }

    fn resolve(self, workspace: Option<&Workspace>) -> Self {
        match workspace {
            Some(ws) => substitute_metadata(&self, ws.metadata()),
            None => self,
        }
    }
}

impl ParameterType for i64 {
    const TYPE_NAME: &'static str = "integer";

    fn extract(value: &ParameterValue) -> Option<Self> {
        value.as_integer()
    }
}

impl ParameterType for i32 {
    const TYPE_NAME: &'static str = "integer";

    fn extract(value: &ParameterValue) -> Option<Self> {
        value.as_integer().and_then(|v| Self::try_from(v).ok())
    }
}

impl ParameterType for u32 {
    const TYPE_NAME: &'static str = "non-negative integer";

    fn extract(value: &ParameterValue) -> Option<Self> {
        value.as_integer().and_then(|v| Self::try_from(v).ok())
    }
}

/// Replaces `M{key}` tokens with workspace metadata values.
///
/// Tokens naming an unknown key, and unterminated tokens, are left as they
/// are.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use mia_core::parameter::substitute_metadata;
///
/// let mut metadata = BTreeMap::new();
/// metadata.insert("Filename".to_owned(), "cells".to_owned());
/// assert_eq!(substitute_metadata("M{Filename}_centroids", &metadata), "cells_centroids");
/// ```
#[must_use]
pub fn substitute_metadata(text: &str, metadata: &BTreeMap<String, String>) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("M{") {
        let (before, token) = rest.split_at(start);
        output.push_str(before);
        let Some(body) = token.strip_prefix("M{") else {
            break;
        };
        match body.split_once('}') {
            Some((key, after)) => {
                match metadata.get(key) {
                    Some(value) => output.push_str(value),
                    None => {
                        output.push_str("M{");
                        output.push_str(key);
                        output.push('}');
                    }
                }
                rest = after;
            }
            None => {
                output.push_str(token);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}
