//! Terminal rendering of permission grids

use console::style;
use rbac::{EffectivePermissions, PermissionMatrix};
use shared::{Action, CapabilitySet, Module};

const MODULE_WIDTH: usize = 12;

fn mark(granted: bool) -> String {
    if granted {
        style("✓").green().to_string()
    } else {
        style("✗").red().to_string()
    }
}

fn header() -> String {
    let mut line = format!("{:<width$}", "module", width = MODULE_WIDTH);
    for action in Action::ALL {
        line.push_str(&format!(" {:<7}", action.as_str()));
    }
    line
}

fn row(module: Module, caps: CapabilitySet) -> String {
    let mut line = format!("{:<width$}", module.as_str(), width = MODULE_WIDTH);
    for action in Action::ALL {
        // Pad before styling; escape codes would throw off the width
        line.push(' ');
        line.push_str(&mark(caps.allows(action)));
        line.push_str(&" ".repeat(6));
    }
    line.trim_end().to_string()
}

/// Grid of effective permissions, one row per module
pub fn render_effective(perms: &EffectivePermissions) -> String {
    let mut out = String::new();

    let roles = if perms.roles.is_empty() {
        "(none)".to_string()
    } else {
        perms.roles.join(", ")
    };
    out.push_str(&format!("Roles: {}\n", roles));
    if perms.fallback_applied {
        out.push_str(&format!(
            "{}\n",
            style("No roles available; fallback policy applied").yellow()
        ));
    }
    out.push('\n');

    out.push_str(&header());
    out.push('\n');
    for (module, caps) in &perms.modules {
        out.push_str(&row(*module, *caps));
        out.push('\n');
    }
    out
}

/// Full matrix, one section per role
pub fn render_matrix(matrix: &PermissionMatrix) -> String {
    let mut out = String::new();
    for role in matrix.roles() {
        out.push_str(&format!("{} ({})\n", style(role.id()).bold(), role.name()));
        out.push_str(&header());
        out.push('\n');
        if let Some(grants) = matrix.grants_for(role) {
            for (module, caps) in grants {
                out.push_str(&row(*module, *caps));
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}
