//! Access-controlled modules and the actions performed on them

use crate::error::InvalidArgumentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An action a user may perform on a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = InvalidArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == key)
            .ok_or_else(|| InvalidArgumentError::new("action", s, Action::ALL))
    }
}

/// A functional area of the platform subject to access control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Developer/builder projects
    Project,
    /// Sales territories
    Territory,
    /// Community listings
    Community,
    /// Member directory
    Member,
    /// Social posts
    Pulse,
    /// Marketplace listings
    Marketplace,
    Event,
    /// Environment, health and safety compliance forms
    Ehs,
}

impl Module {
    pub const ALL: [Module; 8] = [
        Module::Project,
        Module::Territory,
        Module::Community,
        Module::Member,
        Module::Pulse,
        Module::Marketplace,
        Module::Event,
        Module::Ehs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Project => "project",
            Module::Territory => "territory",
            Module::Community => "community",
            Module::Member => "member",
            Module::Pulse => "pulse",
            Module::Marketplace => "marketplace",
            Module::Event => "event",
            Module::Ehs => "ehs",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Module {
    type Err = InvalidArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Module::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| InvalidArgumentError::new("module", s, Module::ALL))
    }
}
