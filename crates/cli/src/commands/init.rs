//! commons init command

use clap::Args;
use rbac::PermissionMatrix;
use shared::AccessConfig;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "permissions.yaml";

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Omit the matrix and rely on the built-in policy
    #[arg(long)]
    pub minimal: bool,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        let path = self.write_config()?;
        println!("✓ Wrote {}", path.display());
        Ok(())
    }

    fn write_config(&self) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.directory)?;

        let path = config_path(&self.directory);
        if path.exists() && !self.force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }

        let config = self.config();
        config.write_to(&path)?;
        Ok(path)
    }

    fn config(&self) -> AccessConfig {
        AccessConfig {
            matrix: (!self.minimal).then(|| PermissionMatrix::builtin().to_definition()),
            ..Default::default()
        }
    }
}

/// Path of the config file `init` would create in a directory
pub fn config_path(directory: &Path) -> PathBuf {
    directory.join(CONFIG_FILE_NAME)
}
