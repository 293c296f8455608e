//! SeqBake CLI - sprite sheet packing and bake planning
//!
//! Packs numbered image sequences into sprite sheets, validates SeqBake
//! configuration files, and previews the file layout of a sequenced bake.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use seqbake_cli::commands;
use seqbake_cli::commands::pack::{PackOptions, SortArg};

/// SeqBake - sequenced texture baking and sprite sheet assembly
#[derive(Parser)]
#[command(name = "seqbake")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack every image sequence under a directory into sprite sheets
    Pack {
        /// Directory holding one subdirectory per sequence (default: from
        /// the config, falling back to the bake output path)
        dir: Option<String>,

        /// SeqBake configuration file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Grid columns
        #[arg(long)]
        columns: Option<u32>,

        /// Grid rows
        #[arg(long)]
        rows: Option<u32>,

        /// Cell width in pixels
        #[arg(long)]
        cell_width: Option<u32>,

        /// Cell height in pixels
        #[arg(long)]
        cell_height: Option<u32>,

        /// First frame (1-based)
        #[arg(long)]
        start: Option<u32>,

        /// Last frame (inclusive)
        #[arg(long)]
        end: Option<u32>,

        /// Place frames in reverse order
        #[arg(long)]
        reversed: bool,

        /// File ordering within a sequence
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Output image format (png, jpeg, bmp, tiff, tga, exr, hdr)
        #[arg(short, long)]
        format: Option<String>,

        /// Sheet file name (without extension)
        #[arg(short, long)]
        name: Option<String>,

        /// Keep the alpha channel
        #[arg(long)]
        alpha: bool,

        /// Never replace existing sheets; number new files instead
        #[arg(long)]
        no_overwrite: bool,

        /// Open every written sheet afterwards
        #[arg(long)]
        open_images: bool,

        /// Open the output directory afterwards
        #[arg(long)]
        open_dir: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a SeqBake configuration file
    Validate {
        /// Path to the configuration file (JSON)
        config: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show the files a sequenced bake would write
    PlanBake {
        /// Path to the configuration file (JSON)
        config: String,

        /// Object name
        #[arg(short, long)]
        object: String,

        /// Material name (repeat for several materials)
        #[arg(short, long, required = true)]
        material: Vec<String>,

        /// Frame range, e.g. 1..24
        #[arg(long, default_value = "1..250")]
        frames: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check the environment
    Doctor,
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Pack {
            dir,
            config,
            columns,
            rows,
            cell_width,
            cell_height,
            start,
            end,
            reversed,
            sort,
            format,
            name,
            alpha,
            no_overwrite,
            open_images,
            open_dir,
            json,
        } => {
            let options = PackOptions {
                columns,
                rows,
                cell_width,
                cell_height,
                start,
                end,
                reversed,
                sort,
                format,
                name,
                alpha,
                no_overwrite,
                open_images,
                open_dir,
            };
            commands::pack::run(dir.as_deref(), config.as_deref(), &options, json)
        }
        Commands::Validate { config, json } => commands::validate::run(&config, json),
        Commands::PlanBake {
            config,
            object,
            material,
            frames,
            json,
        } => commands::plan_bake::run(&config, &object, &material, &frames, json),
        Commands::Doctor => commands::doctor::run(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
