//! Resource definitions

use serde::{Deserialize, Serialize};

/// Unit assigned to a resource when the upstream document leaves it out.
pub const DEFAULT_UNIT: &str = "units";

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

/// A named quantity type to be allocated across locations.
///
/// Identity is the `name`; two resources with the same name are the same
/// resource regardless of unit.
///
/// # Example
///
/// ```
/// use allocspec_core::Resource;
///
/// let water = Resource::new("water", "liters");
/// assert_eq!(water.name, "water");
///
/// let food = Resource::named("food");
/// assert_eq!(food.unit, "units");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl Resource {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
        }
    }

    /// Creates a resource measured in the default unit.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_UNIT)
    }
}
