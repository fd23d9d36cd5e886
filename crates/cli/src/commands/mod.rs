//! CLI Commands

pub mod init;
pub mod policy;

pub use init::InitCommand;
pub use policy::PolicyCommand;
