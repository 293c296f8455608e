//! Plan-bake command implementation
//!
//! Prints the directories and files a sequenced bake would write for an
//! object, without a 3D host.

use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use seqbake_backend_bake::{BakePlan, PlannedFrame};
use seqbake_spec::{validate_bake_settings, PassType, SeqBakeConfig};
use serde::Serialize;
use std::ops::RangeInclusive;
use std::path::Path;
use std::process::ExitCode;

use super::reporting;

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    plan: &'a BakePlan,
    files: Vec<PlannedFrame>,
}

/// Parses `a..b`, `a..=b` or a single frame number.
pub fn parse_frames(text: &str) -> Result<RangeInclusive<i32>> {
    let text = text.trim();
    let parse = |s: &str| -> Result<i32> {
        s.trim()
            .parse::<i32>()
            .with_context(|| format!("invalid frame number '{}'", s))
    };
    let range = match text.split_once("..") {
        Some((start, end)) => parse(start)?..=parse(end.trim_start_matches('='))?,
        None => {
            let frame = parse(text)?;
            frame..=frame
        }
    };
    if range.end() < range.start() {
        bail!("frame range {} ends before it starts", text);
    }
    Ok(range)
}

/// Run the plan-bake command
///
/// # Arguments
/// * `config_path` - Configuration file holding the bake settings
/// * `object` - Object name
/// * `materials` - Materials to bake, in order
/// * `frames` - Frame range text (`1..24`)
/// * `json_output` - Print the plan as JSON
///
/// # Returns
/// Exit code: 0 if the plan has files to write, 1 otherwise
pub fn run(
    config_path: &str,
    object: &str,
    materials: &[String],
    frames: &str,
    json_output: bool,
) -> Result<ExitCode> {
    let config = SeqBakeConfig::from_path(Path::new(config_path))
        .with_context(|| format!("Failed to load config file: {}", config_path))?;
    let frames = parse_frames(frames)?;
    let settings = &config.bake;

    if settings.output_path.as_os_str().is_empty() {
        return Err(anyhow!("bake.output_path is not set in {}", config_path));
    }
    let validation = validate_bake_settings(settings);
    if !validation.is_ok() {
        if !json_output {
            reporting::print_validation(&validation);
        }
        bail!("bake settings have {} error(s)", validation.errors.len());
    }

    let passes = settings.passes.enabled();
    let plan = BakePlan::new(
        object,
        materials.to_vec(),
        passes,
        frames,
        settings.output_path.clone(),
        settings.image_format,
    );

    if json_output {
        let output = PlanOutput {
            plan: &plan,
            files: plan.entries(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_plan(&plan);
        reporting::print_validation(&validation);
    }

    Ok(if plan.is_empty() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn print_plan(plan: &BakePlan) {
    println!(
        "{} {} into {}",
        "Bake plan:".cyan().bold(),
        plan.object,
        plan.output_root.display()
    );
    if plan.passes.is_empty() {
        println!("  {} no bake passes enabled", "!".yellow());
        return;
    }

    let ext = plan.format.extension();
    for material in &plan.materials {
        for &pass in &plan.passes {
            let note = if pass == PassType::Metallic {
                " (baked as emission)".dimmed().to_string()
            } else {
                String::new()
            };
            println!(
                "  {} {}/ {}..{} .{}{}",
                "->".green(),
                plan.pass_dir(material, pass).display(),
                plan.first_frame,
                plan.last_frame,
                ext,
                note
            );
        }
    }
    println!(
        "\n{} {} file(s) in {} director(ies)",
        "PLAN".green().bold(),
        plan.len(),
        plan.materials.len() * plan.passes.len()
    );
}
