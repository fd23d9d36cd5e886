//! Interactive REPL mode

use crate::context::AccessContext;
use crate::render::render_effective;
use dialoguer::MultiSelect;
use shared::{Role, parse_role_list};
use std::io::{self, Write};

/// Interactive explorer for trying role combinations
pub struct InteractiveCli {
    ctx: AccessContext,
    /// Roles set in the session; `None` defers to the configured role source
    current_roles: Option<String>,
}

impl InteractiveCli {
    pub fn new(ctx: AccessContext, roles: Option<String>) -> Self {
        Self {
            ctx,
            current_roles: roles,
        }
    }

    /// Run the interactive REPL
    pub fn run(&mut self) -> anyhow::Result<()> {
        println!("Commons Permission Explorer");
        println!("Type /help for commands, /quit to exit");
        println!();

        loop {
            print!("[{}] > ", self.prompt_label());
            io::stdout().flush()?;

            let mut input = String::new();
            if io::stdin().read_line(&mut input)? == 0 {
                break;
            }
            let input = input.trim();

            if input.is_empty() {
                continue;
            }

            if !input.starts_with('/') {
                println!("Commands start with '/'. Try /can view project");
                continue;
            }

            match self.handle_command(input) {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) => println!("Error: {}", e),
            }
        }

        Ok(())
    }

    fn prompt_label(&self) -> String {
        let roles = self.ctx.resolver(self.current_roles.as_deref()).roles();
        if roles.is_empty() {
            "no roles".to_string()
        } else {
            roles.join(",")
        }
    }

    fn handle_command(&mut self, input: &str) -> anyhow::Result<bool> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye!");
                return Ok(true);
            }
            "/help" | "/h" => {
                println!("Commands:");
                println!("  /roles [csv]          - Set roles (prompt if no list given)");
                println!("  /clear                - Drop session roles, use the role source");
                println!("  /can <action> <module> - Check one action");
                println!("  /grid                 - Show effective permissions");
                println!("  /status               - Show current status");
                println!("  /quit                 - Exit");
            }
            "/roles" => {
                let roles = if parts.len() > 1 {
                    parts[1..].join(" ")
                } else {
                    self.select_roles()?
                };
                self.current_roles = Some(parse_role_list(&roles).join(","));
                println!("Roles set to: {}", self.prompt_label());
            }
            "/clear" => {
                self.current_roles = None;
                println!("Using roles from ${}", self.ctx.config.roles_env_var);
            }
            "/can" => {
                let (action, module) = match (parts.get(1), parts.get(2)) {
                    (Some(a), Some(m)) => (*a, *m),
                    _ => anyhow::bail!("usage: /can <action> <module>"),
                };
                let allowed = self
                    .ctx
                    .resolver(self.current_roles.as_deref())
                    .check(action, module)?;
                println!("{}", if allowed { "allowed" } else { "denied" });
            }
            "/grid" => {
                let effective = self.ctx.resolver(self.current_roles.as_deref()).effective_all();
                print!("{}", render_effective(&effective));
            }
            "/status" => {
                let resolver = self.ctx.resolver(self.current_roles.as_deref());
                println!("Status:");
                println!("  Roles: {:?}", resolver.roles());
                println!("  Known roles: {:?}", resolver.known_roles());
                println!("  Fallback: {:?}", resolver.fallback());
            }
            _ => {
                println!("Unknown command: {}", cmd);
            }
        }

        Ok(false)
    }

    fn select_roles(&self) -> anyhow::Result<String> {
        let items: Vec<&str> = Role::ALL.iter().map(|r| r.id()).collect();
        let chosen = MultiSelect::new()
            .with_prompt("Select roles (space to toggle, enter to confirm)")
            .items(&items)
            .interact()?;
        Ok(chosen
            .into_iter()
            .map(|i| items[i])
            .collect::<Vec<_>>()
            .join(","))
    }
}
