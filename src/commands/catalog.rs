//! `glt commands` command.

use crate::command::{command_help_text, general_help, CommandRegistry, Operation};

/// Help text for `name`, or the overview when no name is given.
///
/// `name` may be an operation identifier such as `rename-branches`, or any
/// fragment of a command pattern or alias.
///
/// # Errors
///
/// Returns an error string if no command matches `name`.
pub fn help_for(registry: &CommandRegistry, name: Option<&str>) -> Result<String, String> {
    let Some(name) = name else {
        return Ok(general_help(registry));
    };
    let by_id = Operation::ALL
        .iter()
        .find(|op| op.as_str().eq_ignore_ascii_case(name.trim()))
        .and_then(|op| registry.get(*op));
    by_id
        .or_else(|| registry.command_help(name))
        .map(command_help_text)
        .ok_or_else(|| format!("Unknown command: {name}. Run `glt commands` for a list."))
}

/// Execute the `commands` command.
///
/// # Errors
///
/// Returns an error string if no command matches `name`.
pub fn run(name: Option<&str>) -> Result<(), String> {
    print!("{}", help_for(&CommandRegistry::builtin(), name)?);
    Ok(())
}
