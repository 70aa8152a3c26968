//! Camelot lookup command

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::json_output::{output_json, CamelotLookupOutput};

/// Run the camelot command
///
/// Prints the Camelot code for a key and scale. Exits 1 when the key
/// spelling is not recognized.
pub fn run(key: &str, scale: &str, json: bool) -> Result<ExitCode> {
    let output = CamelotLookupOutput::lookup(key, scale);

    if json {
        output_json(&serde_json::to_string(&output)?, None)?;
    } else {
        match output.camelot {
            Some(code) => println!("{}", code.to_string().green().bold()),
            None => eprintln!(
                "{}: unrecognized key '{}' (expected one of C, C#, Db, ... B)",
                "error".red(),
                key
            ),
        }
    }

    Ok(exit_code(&output))
}

fn exit_code(output: &CamelotLookupOutput) -> ExitCode {
    if output.camelot.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
