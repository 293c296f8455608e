//! Validate command implementation
//!
//! Loads a configuration file and checks both settings blocks.

use anyhow::Result;
use colored::Colorize;
use seqbake_spec::{validate_config, SeqBakeConfig, ValidationResult};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use super::reporting;

/// One diagnostic in JSON output.
#[derive(Debug, Serialize)]
struct JsonDiagnostic {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct ValidateOutput {
    ok: bool,
    config: String,
    errors: Vec<JsonDiagnostic>,
    warnings: Vec<JsonDiagnostic>,
}

impl ValidateOutput {
    fn from_result(config: &str, result: &ValidationResult) -> Self {
        Self {
            ok: result.is_ok(),
            config: config.to_string(),
            errors: result
                .errors
                .iter()
                .map(|e| JsonDiagnostic {
                    code: e.code.to_string(),
                    message: e.message.clone(),
                    path: e.path.clone(),
                })
                .collect(),
            warnings: result
                .warnings
                .iter()
                .map(|w| JsonDiagnostic {
                    code: w.code.to_string(),
                    message: w.message.clone(),
                    path: w.path.clone(),
                })
                .collect(),
        }
    }

    fn load_failure(config: &str, message: String) -> Self {
        Self {
            ok: false,
            config: config.to_string(),
            errors: vec![JsonDiagnostic {
                code: "LOAD".to_string(),
                message,
                path: None,
            }],
            warnings: Vec::new(),
        }
    }
}

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid or unreadable
pub fn run(config_path: &str, json_output: bool) -> Result<ExitCode> {
    let loaded = SeqBakeConfig::from_path(Path::new(config_path));

    if json_output {
        let output = match &loaded {
            Ok(config) => ValidateOutput::from_result(config_path, &validate_config(config)),
            Err(e) => ValidateOutput::load_failure(config_path, e.to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(exit_code(output.ok));
    }

    println!("{} {}", "Validating:".cyan().bold(), config_path);
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("  {} {}", "x".red(), e);
            println!("\n{} Config could not be loaded", "FAILED".red().bold());
            return Ok(ExitCode::from(1));
        }
    };

    let result = validate_config(&config);
    reporting::print_validation(&result);

    if result.is_ok() {
        println!(
            "\n{} Config is valid ({} warning(s))",
            "SUCCESS".green().bold(),
            result.warnings.len()
        );
    } else {
        println!(
            "\n{} Config has {} error(s)",
            "FAILED".red().bold(),
            result.errors.len()
        );
    }
    Ok(exit_code(result.is_ok()))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqbake_spec::SpriteSheetSettings;

    #[test]
    fn test_json_output_lists_codes_and_paths() {
        let config = SeqBakeConfig {
            sprite_sheet: SpriteSheetSettings {
                columns: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let output = ValidateOutput::from_result("cfg.json", &validate_config(&config));
        assert!(!output.ok);
        assert_eq!(output.errors[0].code, "E001");
        assert!(output.errors[0].path.is_some());
    }

    #[test]
    fn test_load_failure_is_not_ok() {
        let output = ValidateOutput::load_failure("cfg.json", "boom".to_string());
        assert!(!output.ok);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["errors"][0]["message"], "boom");
        assert!(json["errors"][0].get("path").is_none());
    }
}
