use colored::Colorize;
use seqbake_spec::{ReportEntry, Reports, Severity, ValidationResult};

/// Prints every report entry with a colored severity marker.
pub(crate) fn print_reports(reports: &Reports) {
    for entry in reports.entries() {
        print_entry(entry);
    }
}

fn print_entry(entry: &ReportEntry) {
    let marker = match entry.severity {
        Severity::Info => "i".blue(),
        Severity::Warning => "!".yellow(),
        Severity::Error => "x".red(),
    };
    match &entry.code {
        Some(code) => println!("  {} {}: {}", marker, code.dimmed(), entry.message),
        None => println!("  {} {}", marker, entry.message),
    }
}

/// Prints the errors and warnings of a validation result.
pub(crate) fn print_validation(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &result.errors {
            println!("  {} {}", "x".red(), error);
        }
    }
    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            println!("  {} {}", "!".yellow(), warning);
        }
    }
}
