//! Value profiles: named formatting and range definitions for variables.
//!
//! A profile bundles text affixes, a numeric range, display digits, an icon,
//! and an ordered list of value associations. Profiles whose name starts with
//! [`RESERVED_PROFILE_PREFIX`] are system-provided and immutable.

use serde::{Deserialize, Serialize};

use crate::node::{LocalNode, VariableType};

/// Marker prefix of system-reserved profiles.
pub const RESERVED_PROFILE_PREFIX: char = '~';

/// Color value meaning "no color".
pub const NO_COLOR: i64 = -1;

/// A single value→label mapping inside a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Association {
    pub value: f64,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    /// RGB color as an integer, or [`NO_COLOR`].
    #[serde(default = "no_color")]
    pub color: i64,
}

fn no_color() -> i64 {
    NO_COLOR
}

impl Association {
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            icon: String::new(),
            color: NO_COLOR,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_color(mut self, color: i64) -> Self {
        self.color = color;
        self
    }
}

/// The full local definition of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    pub name: String,
    pub variable_type: VariableType,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub step: f64,
    #[serde(default)]
    pub digits: u32,
    #[serde(default)]
    pub icon: String,
    /// Applied remotely in list order.
    #[serde(default)]
    pub associations: Vec<Association>,
}

impl ProfileDefinition {
    /// An empty definition of the given type.
    pub fn new(name: impl Into<String>, variable_type: VariableType) -> Self {
        Self {
            name: name.into(),
            variable_type,
            prefix: String::new(),
            suffix: String::new(),
            min: 0.0,
            max: 0.0,
            step: 0.0,
            digits: 0,
            icon: String::new(),
            associations: Vec::new(),
        }
    }

    pub fn is_reserved(&self) -> bool {
        is_reserved_profile(&self.name)
    }
}

/// Whether `name` denotes a system-reserved profile.
pub fn is_reserved_profile(name: &str) -> bool {
    name.starts_with(RESERVED_PROFILE_PREFIX)
}

/// The profile a variable actually displays with.
///
/// A non-empty custom profile overrides the standard one. Returns `None`
/// when neither is set.
pub fn effective_profile_name(node: &LocalNode) -> Option<&str> {
    if !node.custom_profile_name.is_empty() {
        Some(&node.custom_profile_name)
    } else if !node.profile_name.is_empty() {
        Some(&node.profile_name)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::types::LocalId;

    fn variable(profile: &str, custom: &str) -> LocalNode {
        LocalNode {
            id: LocalId::new(1),
            name: "v".into(),
            parent_id: None,
            kind: NodeKind::Variable(VariableType::Float),
            profile_name: profile.into(),
            custom_profile_name: custom.into(),
        }
    }

    #[test]
    fn test_custom_profile_overrides_standard() {
        let node = variable("~Temperature", "Heating.Setpoint");
        assert_eq!(effective_profile_name(&node), Some("Heating.Setpoint"));
    }

    #[test]
    fn test_standard_profile_used_without_custom() {
        let node = variable("~Temperature", "");
        assert_eq!(effective_profile_name(&node), Some("~Temperature"));
    }

    #[test]
    fn test_no_profile() {
        assert_eq!(effective_profile_name(&variable("", "")), None);
    }

    #[test]
    fn test_reserved_marker() {
        assert!(is_reserved_profile("~Switch"));
        assert!(!is_reserved_profile("Switch~"));
        assert!(!ProfileDefinition::new("Pump.Mode", VariableType::Integer).is_reserved());
    }

    #[test]
    fn test_association_defaults_from_json() {
        let a: Association = serde_json::from_str(r#"{"value": 1.0, "label": "On"}"#).unwrap();
        assert_eq!(a.color, NO_COLOR);
        assert!(a.icon.is_empty());
    }
}
