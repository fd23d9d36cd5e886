//! # Commons RBAC
//!
//! Role-based permission resolution for the community platform UI.
//!
//! ## Components
//!
//! - `PermissionMatrix` - Static role to module capability policy
//! - `RoleSource` - Supplies the current user's roles
//! - `PermissionResolver` - OR-merges grants across held roles

pub mod matrix;
pub mod role_source;
pub mod resolver;

pub use matrix::{MatrixBuilder, PermissionMatrix};
pub use role_source::{DelimitedRoles, EnvRoleSource, RoleSource, SessionFileRoleSource, StaticRoles};
pub use resolver::{EffectivePermissions, PermissionResolver, FALLBACK_WHEN_NO_ROLES};
