//! Per-module capability grants

use crate::module::Action;
use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Whether each of the four actions is granted on a module.
///
/// Every field is required when deserializing, so a capability set is never
/// partially defined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl CapabilitySet {
    /// No grants
    pub const NONE: CapabilitySet = CapabilitySet {
        view: false,
        create: false,
        edit: false,
        delete: false,
    };

    /// Every action granted
    pub const FULL: CapabilitySet = CapabilitySet {
        view: true,
        create: true,
        edit: true,
        delete: true,
    };

    pub const fn new(view: bool, create: bool, edit: bool, delete: bool) -> Self {
        Self {
            view,
            create,
            edit,
            delete,
        }
    }

    pub const fn view_only() -> Self {
        Self::new(true, false, false, false)
    }

    /// Check whether an action is granted
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }

    /// Action-wise OR of two sets
    pub fn union(self, other: CapabilitySet) -> CapabilitySet {
        CapabilitySet {
            view: self.view || other.view,
            create: self.create || other.create,
            edit: self.edit || other.edit,
            delete: self.delete || other.delete,
        }
    }

    /// Actions granted by this set, in `Action::ALL` order
    pub fn granted(&self) -> Vec<Action> {
        Action::ALL.into_iter().filter(|a| self.allows(*a)).collect()
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl BitOr for CapabilitySet {
    type Output = CapabilitySet;

    fn bitor(self, rhs: CapabilitySet) -> CapabilitySet {
        self.union(rhs)
    }
}

impl BitOrAssign for CapabilitySet {
    fn bitor_assign(&mut self, rhs: CapabilitySet) {
        *self = self.union(rhs);
    }
}

impl FromIterator<Action> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = CapabilitySet::NONE;
        for action in iter {
            match action {
                Action::View => set.view = true,
                Action::Create => set.create = true,
                Action::Edit => set.edit = true,
                Action::Delete => set.delete = true,
            }
        }
        set
    }
}
