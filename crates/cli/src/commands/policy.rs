//! commons policy command

use crate::context::AccessContext;
use crate::render::{render_effective, render_matrix};
use clap::{Args, Subcommand};
use shared::{Action, Module, Role};

#[derive(Debug, Args)]
pub struct PolicyCommand {
    #[command(subcommand)]
    pub command: PolicySubcommand,
}

#[derive(Debug, Subcommand)]
pub enum PolicySubcommand {
    /// Show effective permissions for a set of roles
    Check {
        /// Module to check (all modules if omitted)
        #[arg(short, long)]
        module: Option<String>,
        /// Single action to check; requires --module
        #[arg(short, long)]
        action: Option<String>,
    },
    /// List all roles in the matrix
    Roles,
    /// List all access-controlled modules
    Modules,
    /// Print every role's grants
    Matrix,
}

impl PolicyCommand {
    /// Returns `false` when a single-action check was denied
    pub fn run(&self, ctx: &AccessContext, roles: Option<&str>, json: bool) -> anyhow::Result<bool> {
        match &self.command {
            PolicySubcommand::Check { module, action } => {
                check(ctx, roles, module.as_deref(), action.as_deref(), json)
            }
            PolicySubcommand::Roles => {
                let current = ctx.resolver(roles).known_roles();
                let summaries = ctx.matrix.summaries(&current);
                if json {
                    println!("{}", serde_json::to_string_pretty(&summaries)?);
                } else {
                    println!("Available roles:");
                    for summary in summaries {
                        let marker = if summary.is_current { "*" } else { " " };
                        println!(
                            "{} {:<32} {} ({} modules, {} full)",
                            marker, summary.id, summary.description, summary.module_count, summary.full_access_count
                        );
                    }
                }
                Ok(true)
            }
            PolicySubcommand::Modules => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&Module::ALL)?);
                } else {
                    for module in Module::ALL {
                        println!("{}", module);
                    }
                }
                Ok(true)
            }
            PolicySubcommand::Matrix => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&ctx.matrix.to_definition())?);
                } else {
                    print!("{}", render_matrix(&ctx.matrix));
                }
                Ok(true)
            }
        }
    }
}

fn check(
    ctx: &AccessContext,
    roles: Option<&str>,
    module: Option<&str>,
    action: Option<&str>,
    json: bool,
) -> anyhow::Result<bool> {
    let resolver = ctx.resolver(roles);

    match (module, action) {
        (Some(module), Some(action)) => {
            let allowed = resolver.check(action, module)?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "roles": resolver.roles(),
                        "module": module.parse::<Module>()?,
                        "action": action.parse::<Action>()?,
                        "allowed": allowed,
                    })
                );
            } else {
                println!("{}", if allowed { "allowed" } else { "denied" });
            }
            Ok(allowed)
        }
        (Some(module), None) => {
            let module: Module = module.parse()?;
            let caps = resolver.effective(module);
            if json {
                println!("{}", serde_json::to_string_pretty(&caps)?);
            } else {
                let granted: Vec<_> = caps.granted().iter().map(Action::as_str).collect();
                println!("{}: {}", module, if granted.is_empty() { "-".to_string() } else { granted.join(", ") });
            }
            Ok(true)
        }
        (None, Some(_)) => anyhow::bail!("--action requires --module"),
        (None, None) => {
            let effective = resolver.effective_all();
            if json {
                println!("{}", serde_json::to_string_pretty(&effective)?);
            } else {
                print!("{}", render_effective(&effective));
                let unknown: Vec<_> = effective
                    .roles
                    .iter()
                    .filter(|r| Role::lookup(r).is_none())
                    .cloned()
                    .collect();
                if !unknown.is_empty() {
                    println!("\nUnknown roles (no grants): {}", unknown.join(", "));
                }
            }
            Ok(true)
        }
    }
}
