//! PermissionResolver - Effective permissions for the acting user
//!
//! Effective permissions are the action-wise OR of the capability sets of
//! every role the user holds. Roles unknown to the matrix add nothing.
//!
//! When the role source yields no roles at all, [`FALLBACK_WHEN_NO_ROLES`]
//! applies. It grants full access: existing screens rely on anonymous
//! sessions seeing every affordance. This is UI gating only and must not be
//! mistaken for enforcement; embeddings with real authorization stakes should
//! pick [`FallbackPolicy::NoAccess`] via [`PermissionResolver::with_fallback`].

use crate::matrix::PermissionMatrix;
use crate::role_source::RoleSource;
use serde::Serialize;
use shared::{normalize_role, Action, CapabilitySet, FallbackPolicy, Module, Result, Role};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Policy applied when the user holds no roles
pub const FALLBACK_WHEN_NO_ROLES: FallbackPolicy = FallbackPolicy::FullAccess;

/// Merged capability sets for every module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectivePermissions {
    /// Normalized roles the permissions were computed from
    pub roles: Vec<String>,
    /// Whether the no-roles fallback produced these permissions
    pub fallback_applied: bool,
    pub modules: BTreeMap<Module, CapabilitySet>,
}

impl EffectivePermissions {
    pub fn get(&self, module: Module) -> CapabilitySet {
        self.modules.get(&module).copied().unwrap_or(CapabilitySet::NONE)
    }

    pub fn can(&self, action: Action, module: Module) -> bool {
        self.get(module).allows(action)
    }
}

/// Answers capability queries for the roles supplied by a [`RoleSource`]
#[derive(Debug, Clone)]
pub struct PermissionResolver<S> {
    matrix: Arc<PermissionMatrix>,
    source: S,
    fallback: FallbackPolicy,
}

impl<S: RoleSource> PermissionResolver<S> {
    /// Create a resolver using [`FALLBACK_WHEN_NO_ROLES`]
    pub fn new(matrix: Arc<PermissionMatrix>, source: S) -> Self {
        Self {
            matrix,
            source,
            fallback: FALLBACK_WHEN_NO_ROLES,
        }
    }

    /// Override the no-roles policy
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    /// Normalized roles currently held. Blank entries from the source are dropped.
    pub fn roles(&self) -> Vec<String> {
        self.source
            .roles()
            .iter()
            .filter_map(|r| normalize_role(r))
            .collect()
    }

    /// Whether the user currently holds a role (case-insensitive)
    pub fn has_role(&self, role: &str) -> bool {
        match normalize_role(role) {
            Some(wanted) => self.roles().iter().any(|r| *r == wanted),
            None => false,
        }
    }

    /// Known roles currently held, in source order, without duplicates
    pub fn known_roles(&self) -> Vec<Role> {
        let mut known = Vec::new();
        for role in self.roles().iter().filter_map(|r| Role::lookup(r)) {
            if !known.contains(&role) {
                known.push(role);
            }
        }
        known
    }

    /// Merged capability set for one module
    pub fn effective(&self, module: Module) -> CapabilitySet {
        let roles = self.roles();
        if roles.is_empty() {
            debug!(module = %module, fallback = ?self.fallback, "No roles available; applying fallback policy");
        }
        self.merge(&roles, module)
    }

    /// Merged capability sets for every module, from a single read of the source
    pub fn effective_all(&self) -> EffectivePermissions {
        let roles = self.roles();
        if roles.is_empty() {
            warn!(fallback = ?self.fallback, "No roles available; applying fallback policy");
        }
        let modules = Module::ALL
            .into_iter()
            .map(|module| (module, self.merge(&roles, module)))
            .collect();

        EffectivePermissions {
            fallback_applied: roles.is_empty(),
            roles,
            modules,
        }
    }

    pub fn can(&self, action: Action, module: Module) -> bool {
        self.effective(module).allows(action)
    }

    pub fn can_view(&self, module: Module) -> bool {
        self.can(Action::View, module)
    }

    pub fn can_create(&self, module: Module) -> bool {
        self.can(Action::Create, module)
    }

    pub fn can_edit(&self, module: Module) -> bool {
        self.can(Action::Edit, module)
    }

    pub fn can_delete(&self, module: Module) -> bool {
        self.can(Action::Delete, module)
    }

    /// String-keyed query for callers outside the typed API.
    ///
    /// Fails with `InvalidArgument` when the action or module is unknown.
    pub fn check(&self, action: &str, module: &str) -> Result<bool> {
        let action: Action = action.parse()?;
        let module: Module = module.parse()?;
        Ok(self.can(action, module))
    }

    fn merge(&self, roles: &[String], module: Module) -> CapabilitySet {
        if roles.is_empty() {
            return self.fallback.capabilities();
        }

        let mut effective = CapabilitySet::NONE;
        for role_id in roles {
            match Role::lookup(role_id) {
                Some(role) => {
                    effective |= self
                        .matrix
                        .capabilities_for(role, module)
                        .unwrap_or(CapabilitySet::NONE);
                }
                None => debug!(role = %role_id, "Unknown role contributes no grants"),
            }
        }
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role_source::{DelimitedRoles, StaticRoles};

    fn resolver(roles: &[&str]) -> PermissionResolver<StaticRoles> {
        PermissionResolver::new(
            Arc::new(PermissionMatrix::builtin()),
            StaticRoles::new(roles.iter().copied()),
        )
    }

    // ============== Fallback Tests ==============

    #[test]
    fn test_no_roles_grants_everything() {
        let resolver = resolver(&[]);
        for module in Module::ALL {
            assert!(resolver.can_view(module));
            assert!(resolver.can_create(module));
            assert!(resolver.can_edit(module));
            assert!(resolver.can_delete(module));
        }
    }

    #[test]
    fn test_no_access_fallback() {
        let resolver = resolver(&[]).with_fallback(FallbackPolicy::NoAccess);
        assert_eq!(resolver.fallback(), FallbackPolicy::NoAccess);
        for module in Module::ALL {
            assert_eq!(resolver.effective(module), CapabilitySet::NONE);
        }
    }

    #[test]
    fn test_blank_roles_count_as_no_roles() {
        let resolver = PermissionResolver::new(
            Arc::new(PermissionMatrix::builtin()),
            DelimitedRoles::new(" , ,"),
        );
        assert!(resolver.can_delete(Module::Territory));
    }

    mod fallback_logging {
        use super::*;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use tracing::{Event, Level, Subscriber};
        use tracing_subscriber::layer::{Context, SubscriberExt};
        use tracing_subscriber::Layer;

        struct WarnCounter(Arc<AtomicUsize>);

        impl<S: Subscriber> Layer<S> for WarnCounter {
            fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() == Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        #[test]
        fn test_per_query_fallback_does_not_warn() {
            let warnings = Arc::new(AtomicUsize::new(0));
            let subscriber =
                tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));

            tracing::subscriber::with_default(subscriber, || {
                let resolver = resolver(&[]);
                for module in Module::ALL {
                    assert!(resolver.can_view(module));
                    assert!(resolver.can_delete(module));
                }
                assert_eq!(warnings.load(Ordering::SeqCst), 0);

                assert!(resolver.effective_all().fallback_applied);
                assert_eq!(warnings.load(Ordering::SeqCst), 1);
            });
        }
    }

    #[test]
    fn test_only_unknown_roles_grant_nothing() {
        let resolver = resolver(&["ghost_role"]);
        for module in Module::ALL {
            assert_eq!(resolver.effective(module), CapabilitySet::NONE);
        }
    }

    // ============== Single Role Tests ==============

    #[test]
    fn test_registered_user_project() {
        let resolver = resolver(&["registered_user"]);
        assert!(resolver.can_view(Module::Project));
        assert!(!resolver.can_create(Module::Project));
        assert!(!resolver.can_edit(Module::Project));
        assert!(!resolver.can_delete(Module::Project));
    }

    #[test]
    fn test_superadmin_everything() {
        let resolver = resolver(&["superadmin"]);
        for module in Module::ALL {
            for action in Action::ALL {
                assert!(resolver.can(action, module));
            }
        }
    }

    #[test]
    fn test_sales_admin_territory_and_project() {
        let resolver = resolver(&["developer_builder_sales_admin"]);
        assert_eq!(resolver.effective(Module::Territory), CapabilitySet::view_only());
        assert_eq!(resolver.effective(Module::Project), CapabilitySet::FULL);
    }

    // ============== Merge Tests ==============

    #[test]
    fn test_roles_are_or_merged() {
        let matrix = PermissionMatrix::builtin();
        let merged = resolver(&["registered_user", "community_admin"]);

        for module in Module::ALL {
            let expected = matrix
                .capabilities_for(Role::RegisteredUser, module)
                .unwrap()
                | matrix.capabilities_for(Role::CommunityAdmin, module).unwrap();
            assert_eq!(merged.effective(module), expected);
        }
    }

    #[test]
    fn test_merge_ignores_order_and_duplicates() {
        let a = resolver(&["registered_user", "developer_builder_admin"]);
        let b = resolver(&["developer_builder_admin", "registered_user", "registered_user"]);

        for module in Module::ALL {
            assert_eq!(a.effective(module), b.effective(module));
        }
    }

    #[test]
    fn test_unknown_role_adds_nothing() {
        let with_ghost = resolver(&["ghost_role", "registered_user"]);
        let alone = resolver(&["registered_user"]);
        for module in Module::ALL {
            assert_eq!(with_ghost.effective(module), alone.effective(module));
        }
    }

    #[test]
    fn test_role_missing_from_matrix_adds_nothing() {
        let matrix = PermissionMatrix::builder()
            .grant(Role::RegisteredUser, Module::Project, CapabilitySet::view_only())
            .build();
        let resolver = PermissionResolver::new(
            Arc::new(matrix),
            StaticRoles::new(["registered_user", "superadmin"]),
        );

        assert_eq!(resolver.effective(Module::Project), CapabilitySet::view_only());
        assert_eq!(resolver.effective(Module::Event), CapabilitySet::NONE);
    }

    // ============== Custom Source Tests ==============

    struct SessionStore(Vec<String>);

    impl RoleSource for SessionStore {
        fn roles(&self) -> Vec<String> {
            self.0.clone()
        }
    }

    fn session_resolver(roles: &[&str]) -> PermissionResolver<SessionStore> {
        PermissionResolver::new(
            Arc::new(PermissionMatrix::builtin()),
            SessionStore(roles.iter().map(|r| r.to_string()).collect()),
        )
    }

    #[test]
    fn test_custom_source_roles_normalized() {
        let resolver = session_resolver(&[" Admin ", "REGISTERED_USER"]);
        assert_eq!(resolver.roles(), vec!["admin", "registered_user"]);
        assert!(resolver.has_role("admin"));
        assert_eq!(resolver.known_roles(), vec![Role::Admin, Role::RegisteredUser]);
        assert_eq!(resolver.effective(Module::Ehs), CapabilitySet::FULL);
    }

    #[test]
    fn test_custom_source_blank_roles_apply_fallback() {
        let resolver = session_resolver(&["  ", ""]);
        assert!(resolver.roles().is_empty());
        assert_eq!(resolver.effective(Module::Project), CapabilitySet::FULL);

        let all = resolver.effective_all();
        assert!(all.fallback_applied);
        assert!(all.roles.is_empty());
        assert!(all.modules.values().all(|c| c.is_full()));
    }

    #[test]
    fn test_custom_source_blank_roles_no_access_fallback() {
        let resolver = session_resolver(&[" "]).with_fallback(FallbackPolicy::NoAccess);
        assert_eq!(resolver.effective(Module::Project), CapabilitySet::NONE);
    }

    // ============== Query Surface Tests ==============

    #[test]
    fn test_roles_accessor_normalized() {
        let resolver = resolver(&[" SuperAdmin ", "ghost_role"]);
        assert_eq!(resolver.roles(), vec!["superadmin", "ghost_role"]);
        assert_eq!(resolver.known_roles(), vec![Role::Superadmin]);
    }

    #[test]
    fn test_has_role() {
        let resolver = resolver(&["community_admin"]);
        assert!(resolver.has_role("Community_Admin "));
        assert!(!resolver.has_role("superadmin"));
        assert!(!resolver.has_role(""));
    }

    #[test]
    fn test_known_roles_dedup() {
        let resolver = resolver(&["admin", "ADMIN", "registered_user"]);
        assert_eq!(resolver.known_roles(), vec![Role::Admin, Role::RegisteredUser]);
    }

    #[test]
    fn test_check_strings() {
        let resolver = resolver(&["registered_user"]);
        assert!(resolver.check("view", "project").unwrap());
        assert!(!resolver.check("DELETE", " Project ").unwrap());
    }

    #[test]
    fn test_check_invalid_argument() {
        let resolver = resolver(&["registered_user"]);

        let err = resolver.check("publish", "project").unwrap_err();
        assert!(err.is_invalid_argument());

        let err = resolver.check("view", "billing").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_effective_all() {
        let resolver = resolver(&["registered_user"]);
        let all = resolver.effective_all();

        assert!(!all.fallback_applied);
        assert_eq!(all.roles, vec!["registered_user"]);
        assert_eq!(all.modules.len(), Module::ALL.len());
        assert!(all.can(Action::Create, Module::Pulse));
        assert!(!all.can(Action::View, Module::Ehs));
    }

    #[test]
    fn test_effective_all_fallback() {
        let all = resolver(&[]).effective_all();
        assert!(all.fallback_applied);
        assert!(all.modules.values().all(|c| c.is_full()));
    }

    #[test]
    fn test_source_read_fresh_each_query() {
        use std::sync::Mutex;

        let current = Arc::new(Mutex::new(vec!["registered_user".to_string()]));
        let shared_roles = Arc::clone(&current);
        let resolver = PermissionResolver::new(Arc::new(PermissionMatrix::builtin()), move || {
            shared_roles.lock().unwrap().clone()
        });

        assert!(!resolver.can_delete(Module::Project));

        *current.lock().unwrap() = vec!["superadmin".to_string()];
        assert!(resolver.can_delete(Module::Project));
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PermissionResolver<StaticRoles>>();
        assert_send_sync::<PermissionMatrix>();
    }
}
