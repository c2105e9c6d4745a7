//! `glt parse` command.

use std::fmt::Write as _;

use crate::command::{CommandParser, ParsedCommand};

/// Human-readable description of a match and its validation.
#[must_use]
pub fn describe(parsed: &ParsedCommand, valid: bool, errors: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Operation:  {}", parsed.operation());
    let _ = writeln!(out, "Command:    {}", parsed.command.description());
    let _ = writeln!(out, "Confidence: {:.2}", parsed.confidence);
    if parsed.parameters.is_empty() {
        let _ = writeln!(out, "Parameters: (none)");
    } else {
        let _ = writeln!(out, "Parameters:");
        for (name, value) in &parsed.parameters {
            let _ = writeln!(out, "  {name} = {value}");
        }
    }
    if valid {
        let _ = writeln!(out, "Valid:      yes");
    } else {
        let _ = writeln!(out, "Valid:      no");
        for error in errors {
            let _ = writeln!(out, "  - {error}");
        }
    }
    out
}

/// Execute the `parse` command.
///
/// # Errors
///
/// Returns an error string if nothing matches `input` or the matched
/// parameters fail validation.
pub fn run(input: &str, json: bool) -> Result<(), String> {
    let mut parser = CommandParser::new();
    let Some(parsed) = parser.parse(input) else {
        let suggestions = parser.suggestions(input);
        if !suggestions.is_empty() {
            eprintln!("Did you mean:");
            for suggestion in &suggestions {
                eprintln!("  {suggestion}");
            }
        }
        return Err(format!("No command matches {:?}. Run `glt commands` for a list.", input.trim()));
    };

    let view = parser.view(&parsed);
    if json {
        let rendered = serde_json::to_string_pretty(&view)
            .map_err(|e| format!("Failed to serialize command: {e}"))?;
        println!("{rendered}");
    } else {
        print!("{}", describe(&parsed, view.valid, &view.errors));
    }

    if view.valid {
        Ok(())
    } else {
        Err(format!("Invalid parameters: {}", view.errors.join("; ")))
    }
}
