//! Pack command implementation
//!
//! Packs every image sequence directory under a root into sprite sheets.

use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use seqbake_backend_sprite::{
    run_to_completion, FsCodec, JobStatus, SpriteBatchJob, SpriteRunSummary,
};
use seqbake_spec::{
    validate_sprite_settings, ImageFormat, SortMode, SourceType, SpriteSheetSettings,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::{load_config, reporting};

/// File ordering accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// By the number in the file name
    Numeric,
    /// Alphabetical, case-sensitive
    Alpha,
    /// Alphabetical, case-insensitive
    AlphaNocase,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Numeric => SortMode::Numeric,
            SortArg::Alpha => SortMode::AlphabeticalCaseSensitive,
            SortArg::AlphaNocase => SortMode::AlphabeticalCaseInsensitive,
        }
    }
}

/// Command-line overrides for the sprite sheet settings of a config file.
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub cell_width: Option<u32>,
    pub cell_height: Option<u32>,
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub reversed: bool,
    pub sort: Option<SortArg>,
    pub format: Option<String>,
    pub name: Option<String>,
    pub alpha: bool,
    pub no_overwrite: bool,
    pub open_images: bool,
    pub open_dir: bool,
}

impl PackOptions {
    /// Applies the flags that were given on top of `settings`.
    pub fn apply(&self, settings: &mut SpriteSheetSettings) -> Result<()> {
        if let Some(v) = self.columns {
            settings.columns = v;
        }
        if let Some(v) = self.rows {
            settings.rows = v;
        }
        if let Some(v) = self.cell_width {
            settings.cell_width = v;
        }
        if let Some(v) = self.cell_height {
            settings.cell_height = v;
        }
        if let Some(v) = self.start {
            settings.start_frame = v;
        }
        if let Some(v) = self.end {
            settings.end_frame = v;
        }
        if let Some(sort) = self.sort {
            settings.sort_mode = sort.into();
        }
        if let Some(ref format) = self.format {
            settings.image_format = ImageFormat::from_name(format)
                .ok_or_else(|| anyhow!("unknown image format: {}", format))?;
        }
        if let Some(ref name) = self.name {
            settings.file_name = name.clone();
        }
        settings.reversed |= self.reversed;
        settings.use_alpha |= self.alpha;
        settings.overwrite &= !self.no_overwrite;
        settings.open_images |= self.open_images;
        settings.open_output_directory |= self.open_dir;
        Ok(())
    }
}

/// Run the pack command
///
/// # Arguments
/// * `dir` - Root holding one subdirectory per sequence; taken from the
///   config when absent
/// * `config_path` - Optional configuration file
/// * `options` - Flag overrides
/// * `json_output` - Print the run summary as JSON
///
/// # Returns
/// Exit code: 0 if at least one sheet was written without errors, 1 otherwise
pub fn run(
    dir: Option<&str>,
    config_path: Option<&str>,
    options: &PackOptions,
    json_output: bool,
) -> Result<ExitCode> {
    let mut config = load_config(config_path)?;
    if let Some(dir) = dir {
        config.sprite_sheet.directory = PathBuf::from(dir);
    }
    config.sprite_sheet.source_type = SourceType::Directory;
    options.apply(&mut config.sprite_sheet)?;

    let validation = validate_sprite_settings(&config.sprite_sheet);
    if !validation.is_ok() {
        if !json_output {
            reporting::print_validation(&validation);
        }
        bail!(
            "sprite sheet settings have {} error(s)",
            validation.errors.len()
        );
    }

    let root = config.sprite_directory().to_path_buf();
    let mut job = SpriteBatchJob::from_config(&config, &FsCodec)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    if !json_output {
        println!("{} {}", "Packing:".cyan().bold(), root.display());
        for warning in &validation.warnings {
            println!("  {} {}", "!".yellow(), warning);
        }
    }
    run_to_completion(&mut job);
    let summary = job.into_summary();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    post_actions(&config.sprite_sheet, &root, &summary);

    let ok = summary.status == JobStatus::Finished
        && !summary.sheets.is_empty()
        && !summary.reports.has_errors();
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_summary(summary: &SpriteRunSummary) {
    for sheet in &summary.sheets {
        println!(
            "  {} {} -> {} ({} placed, {} dropped, {} skipped)",
            "ok".green(),
            sheet.source,
            sheet.image.path.display(),
            sheet.placed,
            sheet.dropped,
            sheet.skipped
        );
    }
    reporting::print_reports(&summary.reports);

    let errors = summary.reports.error_count();
    if errors == 0 {
        println!(
            "\n{} {} sprite sheet(s) written",
            "SUCCESS".green().bold(),
            summary.sheets.len()
        );
    } else {
        println!(
            "\n{} {} sprite sheet(s) written, {} error(s)",
            "FAILED".red().bold(),
            summary.sheets.len(),
            errors
        );
    }
}

/// Opens written sheets and/or the output directory with the platform
/// opener. Failures are logged and do not change the exit code.
fn post_actions(settings: &SpriteSheetSettings, root: &Path, summary: &SpriteRunSummary) {
    if settings.open_images {
        for path in summary.generated.paths() {
            if let Err(e) = open::that(path) {
                log::warn!("Could not open {}: {}", path.display(), e);
            }
        }
    }
    if settings.open_output_directory {
        if let Err(e) = open::that(root) {
            log::warn!("Could not open {}: {}", root.display(), e);
        }
    }
}
