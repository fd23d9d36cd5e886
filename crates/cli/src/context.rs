//! Loaded configuration and matrix shared by all commands

use rbac::{DelimitedRoles, EnvRoleSource, PermissionMatrix, PermissionResolver, RoleSource};
use shared::AccessConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Roles given on the command line, or else the configured environment variable
#[derive(Debug, Clone)]
pub enum CliRoleSource {
    Explicit(DelimitedRoles),
    Env(EnvRoleSource),
}

impl RoleSource for CliRoleSource {
    fn roles(&self) -> Vec<String> {
        match self {
            CliRoleSource::Explicit(source) => source.roles(),
            CliRoleSource::Env(source) => source.roles(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessContext {
    pub config: AccessConfig,
    pub matrix: Arc<PermissionMatrix>,
}

impl AccessContext {
    /// Load the config file if given, otherwise use defaults with the built-in matrix
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => {
                info!(path = %path.display(), "Loading permission config");
                AccessConfig::from_file(path)?
            }
            None => AccessConfig::default(),
        };
        Self::from_config(config)
    }

    pub fn from_config(config: AccessConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let matrix = match &config.matrix {
            Some(definition) => PermissionMatrix::from_definition(definition)?,
            None => PermissionMatrix::builtin(),
        };

        Ok(Self {
            config,
            matrix: Arc::new(matrix),
        })
    }

    pub fn role_source(&self, roles: Option<&str>) -> CliRoleSource {
        match roles {
            Some(raw) => CliRoleSource::Explicit(DelimitedRoles::new(raw)),
            None => CliRoleSource::Env(EnvRoleSource::new(&self.config.roles_env_var)),
        }
    }

    pub fn resolver(&self, roles: Option<&str>) -> PermissionResolver<CliRoleSource> {
        PermissionResolver::new(Arc::clone(&self.matrix), self.role_source(roles))
            .with_fallback(self.config.fallback)
    }
}

impl Default for AccessContext {
    fn default() -> Self {
        Self {
            config: AccessConfig::default(),
            matrix: Arc::new(PermissionMatrix::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CapabilitySet, FallbackPolicy, MatrixDefinition, Module};

    #[test]
    fn test_default_context() {
        let ctx = AccessContext::load(None).unwrap();
        assert_eq!(*ctx.matrix, PermissionMatrix::builtin());
        assert_eq!(ctx.config.fallback, FallbackPolicy::FullAccess);
    }

    #[test]
    fn test_explicit_roles() {
        let ctx = AccessContext::default();
        let resolver = ctx.resolver(Some("Registered_User"));
        assert_eq!(resolver.roles(), vec!["registered_user"]);
        assert!(!resolver.can_edit(Module::Project));
    }

    #[test]
    fn test_env_roles() {
        let config = AccessConfig {
            roles_env_var: "COMMONS_CLI_TEST_ROLES_44D1".to_string(),
            ..Default::default()
        };
        std::env::set_var("COMMONS_CLI_TEST_ROLES_44D1", "superadmin");

        let ctx = AccessContext::from_config(config).unwrap();
        assert_eq!(ctx.resolver(None).roles(), vec!["superadmin"]);

        std::env::remove_var("COMMONS_CLI_TEST_ROLES_44D1");
    }

    #[test]
    fn test_config_fallback_applied() {
        let config = AccessConfig {
            fallback: FallbackPolicy::NoAccess,
            ..Default::default()
        };
        let ctx = AccessContext::from_config(config).unwrap();
        assert_eq!(ctx.resolver(Some("")).effective(Module::Event), CapabilitySet::NONE);
    }

    #[test]
    fn test_config_matrix_override() {
        let mut matrix = MatrixDefinition::new();
        matrix
            .entry("registered_user".to_string())
            .or_default()
            .insert("event".to_string(), CapabilitySet::FULL);

        let config = AccessConfig {
            matrix: Some(matrix),
            ..Default::default()
        };
        let ctx = AccessContext::from_config(config).unwrap();
        let resolver = ctx.resolver(Some("registered_user"));

        assert!(resolver.can_delete(Module::Event));
        assert!(!resolver.can_view(Module::Project));
    }

    #[test]
    fn test_config_matrix_unknown_role_rejected() {
        let mut matrix = MatrixDefinition::new();
        matrix.insert("ghost_role".to_string(), Default::default());

        let config = AccessConfig {
            matrix: Some(matrix),
            ..Default::default()
        };
        assert!(AccessContext::from_config(config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("permissions.yaml");
        std::fs::write(&path, "fallback: no_access\n").unwrap();

        let ctx = AccessContext::load(Some(&path)).unwrap();
        assert_eq!(ctx.config.fallback, FallbackPolicy::NoAccess);
    }
}
