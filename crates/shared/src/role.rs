//! Role identifiers and normalization

use crate::error::InvalidArgumentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role known to the permission matrix.
///
/// Role identifiers arriving from the identity source are plain strings;
/// they are normalized with [`normalize_role`] and parsed into this enum.
/// Strings that fail to parse are unknown roles and carry no grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superadmin,
    Admin,
    DeveloperBuilderSalesAdmin,
    DeveloperBuilderAdmin,
    CommunityAdmin,
    RegisteredUser,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Superadmin,
        Role::Admin,
        Role::DeveloperBuilderSalesAdmin,
        Role::DeveloperBuilderAdmin,
        Role::CommunityAdmin,
        Role::RegisteredUser,
    ];

    /// Canonical identifier (already normalized)
    pub fn id(&self) -> &'static str {
        match self {
            Role::Superadmin => "superadmin",
            Role::Admin => "admin",
            Role::DeveloperBuilderSalesAdmin => "developer_builder_sales_admin",
            Role::DeveloperBuilderAdmin => "developer_builder_admin",
            Role::CommunityAdmin => "community_admin",
            Role::RegisteredUser => "registered_user",
        }
    }

    /// Human-readable role name
    pub fn name(&self) -> &'static str {
        match self {
            Role::Superadmin => "Super Administrator",
            Role::Admin => "Administrator",
            Role::DeveloperBuilderSalesAdmin => "Developer/Builder Sales Admin",
            Role::DeveloperBuilderAdmin => "Developer/Builder Admin",
            Role::CommunityAdmin => "Community Admin",
            Role::RegisteredUser => "Registered User",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Superadmin => "Unrestricted access to every module",
            Role::Admin => "Platform administration; territories cannot be deleted",
            Role::DeveloperBuilderSalesAdmin => "Manages a developer's projects and sales listings",
            Role::DeveloperBuilderAdmin => "Manages a developer's projects, marketplace and events",
            Role::CommunityAdmin => "Runs a community: members, pulses, events and EHS forms",
            Role::RegisteredUser => "Signed-in resident or buyer; mostly read-only",
        }
    }

    /// Parse a raw role string, returning `None` for unknown roles
    pub fn lookup(raw: &str) -> Option<Role> {
        let key = normalize_role(raw)?;
        Role::ALL.into_iter().find(|r| r.id() == key)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Role {
    type Err = InvalidArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::lookup(s).ok_or_else(|| InvalidArgumentError::new("role", s, Role::ALL))
    }
}

/// Trim and lower-case a role identifier. Blank input yields `None`.
pub fn normalize_role(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Split a comma-delimited role string, normalizing each segment and
/// dropping empty ones. Order and duplicates are preserved.
pub fn parse_role_list(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(normalize_role).collect()
}

/// Summary info for a role in listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Modules on which the role holds at least one grant
    pub module_count: usize,
    /// Modules on which the role holds every grant
    pub full_access_count: usize,
    pub is_current: bool,
}
