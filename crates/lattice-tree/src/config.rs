//! Declarative model configuration.
//!
//! A [`TreeModelConfig`] names the columns of a model, the flags new nodes
//! start with, and the application's user roles. It is usually read from a
//! TOML or JSON file:
//!
//! ```toml
//! headers = ["Name", "Size", "Modified"]
//!
//! [default_flags]
//! selectable = true
//! enabled = true
//! editable = false
//!
//! [[roles]]
//! name = "path"
//! value = 0
//! description = "Absolute path of the entry"
//!
//! [[roles]]
//! name = "is_dir"
//! value = 1
//! ```
//!
//! Role values are offsets into the user range: `value = 1` is
//! `ItemRole::User(1)`.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use lattice_tree_core::logging::targets;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ItemFlags, ItemRole, TreeModel};

/// A named user role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Name used to look the role up.
    pub name: String,
    /// Offset of the role in the user range.
    pub value: u32,
    /// Free-form explanation of what the role holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleDefinition {
    /// The role this definition stands for.
    pub fn role(&self) -> ItemRole {
        ItemRole::User(self.value)
    }
}

/// Configuration for building a [`TreeModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeModelConfig {
    /// Column header labels. An empty list gives a single unnamed column.
    pub headers: Vec<String>,
    /// User role table.
    pub roles: Vec<RoleDefinition>,
    /// Flags given to newly created nodes.
    pub default_flags: ItemFlags,
}

impl Default for TreeModelConfig {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            roles: Vec::new(),
            default_flags: ItemFlags::editable(),
        }
    }
}

impl TreeModelConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file, choosing the format by extension
    /// (`.toml` or `.json`).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> ConfigResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = parse(&text).inspect_err(|err| {
            tracing::warn!(target: targets::CONFIG, path = %path.display(), %err, "rejected model config");
        })?;
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            headers = config.headers.len(),
            roles = config.roles.len(),
            "loaded model config"
        );
        Ok(config)
    }

    /// Serialize to a TOML document.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Look up a user role by name.
    pub fn role(&self, name: &str) -> Option<ItemRole> {
        self.roles
            .iter()
            .find(|def| def.name == name)
            .map(RoleDefinition::role)
    }

    /// The definition of a role, if the role is named in this configuration.
    pub fn definition(&self, role: ItemRole) -> Option<&RoleDefinition> {
        match role {
            ItemRole::User(value) => self.roles.iter().find(|def| def.value == value),
            _ => None,
        }
    }

    /// Check the role table for empty, duplicate or clashing entries.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut names = HashSet::new();
        let mut values = HashSet::new();
        for def in &self.roles {
            if def.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "role with value {} has an empty name",
                    def.value
                )));
            }
            if !names.insert(def.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate role name '{}'",
                    def.name
                )));
            }
            if !values.insert(def.value) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate role value {} (role '{}')",
                    def.value, def.name
                )));
            }
        }
        Ok(())
    }
}

impl TreeModel {
    /// Create an empty model with the headers and default flags of `config`.
    pub fn from_config(config: &TreeModelConfig) -> Self {
        let model = Self::with_headers(config.headers.iter().cloned());
        model.set_default_flags(config.default_flags);
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemModel, ModelIndex, Orientation};

    const SAMPLE: &str = r#"
        headers = ["Name", "Size"]

        [default_flags]
        selectable = true
        enabled = true

        [[roles]]
        name = "path"
        value = 0
        description = "Absolute path"

        [[roles]]
        name = "is_dir"
        value = 1
    "#;

    #[test]
    fn test_from_toml() {
        let config = TreeModelConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.headers, vec!["Name", "Size"]);
        assert_eq!(config.role("is_dir"), Some(ItemRole::User(1)));
        assert_eq!(config.role("missing"), None);
        assert!(!config.default_flags.editable);
        assert_eq!(
            config
                .definition(ItemRole::User(0))
                .and_then(|d| d.description.as_deref()),
            Some("Absolute path")
        );
    }

    #[test]
    fn test_from_json_defaults() {
        let config = TreeModelConfig::from_json_str(r#"{"headers": ["Only"]}"#).unwrap();
        assert_eq!(config.headers, vec!["Only"]);
        assert!(config.roles.is_empty());
        assert_eq!(config.default_flags, ItemFlags::editable());
    }

    #[test]
    fn test_duplicate_roles_rejected() {
        let dup_name = r#"{"roles": [{"name": "a", "value": 0}, {"name": "a", "value": 1}]}"#;
        assert!(matches!(
            TreeModelConfig::from_json_str(dup_name),
            Err(ConfigError::Invalid(_))
        ));

        let dup_value = r#"{"roles": [{"name": "a", "value": 3}, {"name": "b", "value": 3}]}"#;
        assert!(matches!(
            TreeModelConfig::from_json_str(dup_value),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            TreeModelConfig::from_toml_str("headers = ["),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            TreeModelConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_toml_round_trip_through_text() {
        let config = TreeModelConfig::from_toml_str(SAMPLE).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(TreeModelConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_model_from_config() {
        let config = TreeModelConfig::from_toml_str(SAMPLE).unwrap();
        let model = TreeModel::from_config(&config);

        assert_eq!(model.column_count(&ModelIndex::invalid()), 2);
        assert_eq!(
            model
                .header_data(0, Orientation::Horizontal, ItemRole::Display)
                .as_string(),
            Some("Name")
        );
        let node = model.create_node();
        assert_eq!(model.with_node(node, |n| n.flags()), Some(config.default_flags));
    }
}
