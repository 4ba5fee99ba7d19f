//! Decision variables keyed by (resource, node)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Formats the canonical variable id `"<resource>[<node>]"`.
///
/// # Example
///
/// ```
/// use allocspec_core::var_id;
///
/// assert_eq!(var_id("food", "A"), "food[A]");
/// ```
pub fn var_id(resource: &str, node: &str) -> String {
    format!("{resource}[{node}]")
}

/// Splits a canonical variable id into its resource and node parts.
///
/// Returns `None` if `id` is not of the form `"<resource>[<node>]"`.
///
/// # Example
///
/// ```
/// use allocspec_core::split_var_id;
///
/// assert_eq!(split_var_id("water[B]"), Some(("water", "B")));
/// assert_eq!(split_var_id("water"), None);
/// ```
pub fn split_var_id(id: &str) -> Option<(&str, &str)> {
    let body = id.strip_suffix(']')?;
    let open = body.find('[')?;
    let (resource, node) = (&body[..open], &body[open + 1..]);
    if resource.is_empty() || node.is_empty() || node.contains('[') {
        return None;
    }
    Some((resource, node))
}

/// The sort of a decision variable.
///
/// Only integers are supported; any other sort string survives
/// deserialization so the compiler can reject it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sort {
    #[default]
    Int,
    Unsupported(String),
}

impl Sort {
    pub fn as_str(&self) -> &str {
        match self {
            Sort::Int => "int",
            Sort::Unsupported(s) => s,
        }
    }
}

impl From<String> for Sort {
    fn from(s: String) -> Self {
        if s == "int" {
            Sort::Int
        } else {
            Sort::Unsupported(s)
        }
    }
}

impl From<Sort> for String {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Int => "int".to_string(),
            Sort::Unsupported(s) => s,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An integer decision variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    #[serde(default)]
    pub sort: Sort,
}

impl Variable {
    /// Creates the integer variable for `resource` at `node`.
    pub fn for_pair(resource: &str, node: &str) -> Self {
        Self {
            id: var_id(resource, node),
            sort: Sort::Int,
        }
    }

    pub fn with_sort(id: impl Into<String>, sort: Sort) -> Self {
        Self {
            id: id.into(),
            sort,
        }
    }

    pub fn resource(&self) -> Option<&str> {
        split_var_id(&self.id).map(|(r, _)| r)
    }

    pub fn node(&self) -> Option<&str> {
        split_var_id(&self.id).map(|(_, n)| n)
    }
}
