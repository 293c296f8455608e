//! Doctor command implementation
//!
//! Checks the environment the CLI writes into.

use anyhow::Result;
use colored::Colorize;
use seqbake_backend_sprite::{codec, PixelBuffer, SaveOptions};
use seqbake_spec::ImageFormat;
use std::env;
use std::path::Path;
use std::process::ExitCode;

/// Run the doctor command
///
/// Checks:
/// - Version information
/// - Which sheet formats can be encoded
/// - Write access where relative output paths and rendered frames land
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run() -> Result<ExitCode> {
    println!("{}", "SeqBake Doctor".cyan().bold());
    println!("{}", "==============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} seqbake-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Formats:".bold());
    let sample = PixelBuffer::filled(2, 2, [0.25, 0.5, 0.75, 1.0]);
    for format in ImageFormat::ALL {
        let name = format!("sample.{}", format.extension());
        match codec::encode(&sample, Path::new(&name), SaveOptions::new(format, true)) {
            Ok(bytes) => println!(
                "  {} {} ({} bytes)",
                "ok".green(),
                format,
                bytes.len()
            ),
            Err(e) => println!("  {} {} {}", "--".yellow(), format, e.to_string().dimmed()),
        }
    }
    println!();

    println!("{}", "Output locations:".bold());
    let mut locations = Vec::new();
    match env::current_dir() {
        Ok(dir) => locations.push(("relative output paths", dir)),
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    locations.push(("rendered sequencer frames", env::temp_dir()));
    for (role, dir) in &locations {
        all_ok &= check_writable(role, dir);
    }

    println!();
    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Creates and drops a scratch file in `dir`, printing the outcome.
fn check_writable(role: &str, dir: &Path) -> bool {
    match tempfile::Builder::new().prefix(".seqbake-").tempfile_in(dir) {
        Ok(_) => {
            println!("  {} {} ({})", "ok".green(), role, dir.display());
            true
        }
        Err(e) => {
            println!("  {} {} not writable in {}: {}", "!!".red(), role, dir.display(), e);
            false
        }
    }
}
