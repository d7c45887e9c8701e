//! Help text generated from the command tree.

use super::registry::{Command, CommandMap};

/// Renders every command in declaration order, indented by depth.
pub fn render_tree(commands: &CommandMap) -> String {
    let mut out = String::new();
    for command in commands.iter() {
        render_command(command, 0, &mut out);
    }
    out
}

fn render_command(command: &Command, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let aliases = if command.aliases.is_empty() {
        String::new()
    } else {
        format!(" ({})", command.aliases.join(", "))
    };

    out.push_str(&format!(
        "{indent}{}{aliases} - {}\n",
        command.name, command.description
    ));
    out.push_str(&format!("{indent}    usage: {}\n", command.usage));

    let mut notes = Vec::new();
    if command.delay > 0 {
        notes.push(format!("cooldown {}", command.delay));
    }
    let labels = command.permissions.labels();
    if !labels.is_empty() {
        notes.push(format!("{} only", labels.join("/")));
    }
    if !notes.is_empty() {
        out.push_str(&format!("{indent}    [{}]\n", notes.join(", ")));
    }

    for child in command.subcommands.iter() {
        render_command(child, depth + 1, out);
    }
}
