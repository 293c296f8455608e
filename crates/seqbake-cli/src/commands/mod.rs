//! CLI command implementations

pub mod doctor;
pub mod pack;
pub mod plan_bake;
pub mod validate;

mod reporting;

use std::path::Path;

use anyhow::{Context, Result};
use seqbake_spec::SeqBakeConfig;

/// Loads a configuration file, or the defaults when no path is given.
pub(crate) fn load_config(path: Option<&str>) -> Result<SeqBakeConfig> {
    match path {
        Some(path) => SeqBakeConfig::from_path(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path)),
        None => Ok(SeqBakeConfig::default()),
    }
}
