//! PermissionMatrix - Static role to module capability policy

use shared::{AccessError, CapabilitySet, MatrixDefinition, Module, Result, Role, RoleSummary};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Immutable mapping of Role -> (Module -> CapabilitySet).
///
/// Every role listed in the matrix carries an entry for every module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionMatrix {
    grants: BTreeMap<Role, BTreeMap<Module, CapabilitySet>>,
}

impl PermissionMatrix {
    /// Start building a matrix
    pub fn builder() -> MatrixBuilder {
        MatrixBuilder::default()
    }

    /// The platform's built-in policy
    pub fn builtin() -> Self {
        use Module::*;

        let create_edit = CapabilitySet::new(true, true, true, false);
        let post = CapabilitySet::new(true, true, false, false);

        Self::builder()
            .grant_all(Role::Superadmin, CapabilitySet::FULL)
            // Admin
            .grant_all(Role::Admin, CapabilitySet::FULL)
            .grant(Role::Admin, Territory, create_edit)
            // Developer/builder sales admin
            .grant(Role::DeveloperBuilderSalesAdmin, Project, CapabilitySet::FULL)
            .grant(Role::DeveloperBuilderSalesAdmin, Territory, CapabilitySet::view_only())
            .grant(Role::DeveloperBuilderSalesAdmin, Community, CapabilitySet::view_only())
            .grant(Role::DeveloperBuilderSalesAdmin, Member, CapabilitySet::view_only())
            .grant(Role::DeveloperBuilderSalesAdmin, Pulse, CapabilitySet::NONE)
            .grant(Role::DeveloperBuilderSalesAdmin, Marketplace, create_edit)
            .grant(Role::DeveloperBuilderSalesAdmin, Event, create_edit)
            .grant(Role::DeveloperBuilderSalesAdmin, Ehs, CapabilitySet::NONE)
            // Developer/builder admin
            .grant_all(Role::DeveloperBuilderAdmin, CapabilitySet::view_only())
            .grant(Role::DeveloperBuilderAdmin, Project, CapabilitySet::FULL)
            .grant(Role::DeveloperBuilderAdmin, Marketplace, CapabilitySet::FULL)
            .grant(Role::DeveloperBuilderAdmin, Event, CapabilitySet::FULL)
            // Community admin
            .grant_all(Role::CommunityAdmin, CapabilitySet::FULL)
            .grant(Role::CommunityAdmin, Project, CapabilitySet::view_only())
            .grant(Role::CommunityAdmin, Territory, CapabilitySet::view_only())
            .grant(Role::CommunityAdmin, Ehs, create_edit)
            // Registered user
            .grant_all(Role::RegisteredUser, CapabilitySet::view_only())
            .grant(Role::RegisteredUser, Pulse, post)
            .grant(Role::RegisteredUser, Marketplace, post)
            .grant(Role::RegisteredUser, Ehs, CapabilitySet::NONE)
            .build()
    }

    /// Build a matrix from a configuration declaration.
    ///
    /// Role and module keys must name known roles and modules, and no two keys
    /// may normalize to the same role (or the same module within a role).
    pub fn from_definition(definition: &MatrixDefinition) -> Result<Self> {
        let mut builder = Self::builder();
        let mut seen_roles = BTreeSet::new();

        for (role_key, modules) in definition {
            let role: Role = role_key.parse()?;
            if !seen_roles.insert(role) {
                return Err(AccessError::Config(format!(
                    "role '{}' is declared more than once (key '{}')",
                    role, role_key
                )));
            }
            builder = builder.role(role);

            let mut seen_modules = BTreeSet::new();
            for (module_key, caps) in modules {
                let module: Module = module_key.parse()?;
                if !seen_modules.insert(module) {
                    return Err(AccessError::Config(format!(
                        "module '{}' is declared more than once for role '{}' (key '{}')",
                        module, role, module_key
                    )));
                }
                builder = builder.grant(role, module, *caps);
            }
        }

        Ok(builder.build())
    }

    /// Export the matrix as a configuration declaration
    pub fn to_definition(&self) -> MatrixDefinition {
        self.grants
            .iter()
            .map(|(role, modules)| {
                let modules = modules
                    .iter()
                    .map(|(module, caps)| (module.as_str().to_string(), *caps))
                    .collect();
                (role.id().to_string(), modules)
            })
            .collect()
    }

    /// Capability set for a role on a module.
    ///
    /// Returns `None` if the role is not listed, or has no entry for the module.
    pub fn capabilities_for(&self, role: Role, module: Module) -> Option<CapabilitySet> {
        self.grants.get(&role)?.get(&module).copied()
    }

    /// Same as [`capabilities_for`](Self::capabilities_for) for a raw role identifier
    pub fn capabilities_for_id(&self, role_id: &str, module: Module) -> Option<CapabilitySet> {
        Role::lookup(role_id).and_then(|role| self.capabilities_for(role, module))
    }

    /// All module grants for a role
    pub fn grants_for(&self, role: Role) -> Option<&BTreeMap<Module, CapabilitySet>> {
        self.grants.get(&role)
    }

    pub fn contains_role(&self, role: Role) -> bool {
        self.grants.contains_key(&role)
    }

    /// Roles listed in the matrix
    pub fn roles(&self) -> Vec<Role> {
        self.grants.keys().copied().collect()
    }

    /// Listing summaries, flagging roles currently held
    pub fn summaries(&self, current: &[Role]) -> Vec<RoleSummary> {
        self.grants
            .iter()
            .map(|(role, modules)| RoleSummary {
                id: role.id().to_string(),
                name: role.name().to_string(),
                description: role.description().to_string(),
                module_count: modules.values().filter(|c| !c.is_empty()).count(),
                full_access_count: modules.values().filter(|c| c.is_full()).count(),
                is_current: current.contains(role),
            })
            .collect()
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Builder for [`PermissionMatrix`]
#[derive(Debug, Default)]
pub struct MatrixBuilder {
    grants: BTreeMap<Role, BTreeMap<Module, CapabilitySet>>,
}

impl MatrixBuilder {
    /// List a role without granting anything yet
    pub fn role(mut self, role: Role) -> Self {
        self.grants.entry(role).or_default();
        self
    }

    /// Set the capability set for a role on one module, replacing any earlier entry
    pub fn grant(mut self, role: Role, module: Module, caps: CapabilitySet) -> Self {
        self.grants.entry(role).or_default().insert(module, caps);
        self
    }

    /// Set the same capability set for a role on every module
    pub fn grant_all(mut self, role: Role, caps: CapabilitySet) -> Self {
        let modules = self.grants.entry(role).or_default();
        for module in Module::ALL {
            modules.insert(module, caps);
        }
        self
    }

    /// Finish the matrix. Modules left unassigned for a listed role are filled with no grants.
    pub fn build(mut self) -> PermissionMatrix {
        for (role, modules) in self.grants.iter_mut() {
            for module in Module::ALL {
                if !modules.contains_key(&module) {
                    warn!(role = %role, module = %module, "No grants declared; denying all actions");
                    modules.insert(module, CapabilitySet::NONE);
                }
            }
        }

        PermissionMatrix {
            grants: self.grants,
        }
    }
}
