//! RoleSource - Where the current user's roles come from
//!
//! A role source is read fresh on every resolution. It never fails: missing
//! or malformed role data yields an empty list.

use serde_json::Value;
use shared::{normalize_role, parse_role_list};
use std::path::PathBuf;
use tracing::debug;

/// Supplies the ordered, normalized role identifiers of the acting user
pub trait RoleSource: Send + Sync {
    fn roles(&self) -> Vec<String>;
}

impl<F> RoleSource for F
where
    F: Fn() -> Vec<String> + Send + Sync,
{
    fn roles(&self) -> Vec<String> {
        self().iter().filter_map(|r| normalize_role(r)).collect()
    }
}

/// A fixed role list supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticRoles {
    roles: Vec<String>,
}

impl StaticRoles {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            roles: roles
                .into_iter()
                .filter_map(|r| normalize_role(r.as_ref()))
                .collect(),
        }
    }

    /// No roles at all
    pub fn empty() -> Self {
        Self::default()
    }
}

impl RoleSource for StaticRoles {
    fn roles(&self) -> Vec<String> {
        self.roles.clone()
    }
}

/// Roles encoded as one comma-delimited string (e.g. `"admin, registered_user"`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelimitedRoles {
    raw: String,
}

impl DelimitedRoles {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

impl RoleSource for DelimitedRoles {
    fn roles(&self) -> Vec<String> {
        parse_role_list(&self.raw)
    }
}

/// Reads a comma-delimited role list from an environment variable on each call
#[derive(Debug, Clone)]
pub struct EnvRoleSource {
    var: String,
}

impl EnvRoleSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl RoleSource for EnvRoleSource {
    fn roles(&self) -> Vec<String> {
        match std::env::var(&self.var) {
            Ok(raw) => parse_role_list(&raw),
            Err(e) => {
                debug!(var = %self.var, error = %e, "No roles in environment");
                Vec::new()
            }
        }
    }
}

/// Reads roles from a JSON session document on each call.
///
/// The `roles` field may be an array of strings or a comma-delimited string:
///
/// ```json
/// { "user": "jane", "roles": ["registered_user", "community_admin"] }
/// { "user": "jane", "roles": "registered_user,community_admin" }
/// ```
#[derive(Debug, Clone)]
pub struct SessionFileRoleSource {
    path: PathBuf,
}

impl SessionFileRoleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Extract roles from a session document, ignoring anything malformed
    pub fn parse_session(content: &str) -> Vec<String> {
        let session: Value = match serde_json::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "Malformed session document");
                return Vec::new();
            }
        };

        match session.get("roles") {
            Some(Value::String(raw)) => parse_role_list(raw),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(normalize_role)
                .collect(),
            Some(other) => {
                debug!(value = %other, "Unexpected roles value in session");
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}

impl RoleSource for SessionFileRoleSource {
    fn roles(&self) -> Vec<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Self::parse_session(&content),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Session file unreadable");
                Vec::new()
            }
        }
    }
}
