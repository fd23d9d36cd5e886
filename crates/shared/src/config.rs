//! Configuration types for permission resolution

use crate::capability::CapabilitySet;
use crate::error::AccessError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable read for the current user's roles unless configured otherwise
pub const DEFAULT_ROLES_ENV_VAR: &str = "COMMONS_ROLES";

/// Raw matrix declaration: role id -> module id -> capability set.
///
/// Keys stay as strings here; they are validated when the matrix is built.
pub type MatrixDefinition = BTreeMap<String, BTreeMap<String, CapabilitySet>>;

/// What the resolver grants when the role source yields no roles at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Every action on every module
    #[default]
    FullAccess,
    /// Nothing
    NoAccess,
}

impl FallbackPolicy {
    pub fn capabilities(&self) -> CapabilitySet {
        match self {
            FallbackPolicy::FullAccess => CapabilitySet::FULL,
            FallbackPolicy::NoAccess => CapabilitySet::NONE,
        }
    }
}

/// Settings file (`permissions.yaml` / `permissions.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    /// Environment variable holding the comma-delimited roles of the current user
    #[serde(default = "default_roles_env_var")]
    pub roles_env_var: String,

    /// Policy applied when no roles are available
    #[serde(default)]
    pub fallback: FallbackPolicy,

    /// Matrix override; the built-in matrix is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<MatrixDefinition>,
}

fn default_roles_env_var() -> String {
    DEFAULT_ROLES_ENV_VAR.to_string()
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            roles_env_var: default_roles_env_var(),
            fallback: FallbackPolicy::default(),
            matrix: None,
        }
    }
}

impl AccessConfig {
    /// Load configuration from a file. `.yaml`/`.yml` is read as YAML, anything else as JSON.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if is_yaml(path) {
            Self::from_yaml(&content)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    pub fn from_yaml(content: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write configuration to a file, picking the format from the extension
    pub fn write_to(&self, path: &Path) -> crate::Result<()> {
        let content = if is_yaml(path) {
            self.to_yaml()?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.roles_env_var.trim().is_empty() {
            return Err(AccessError::Config("rolesEnvVar must not be empty".to_string()));
        }
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
