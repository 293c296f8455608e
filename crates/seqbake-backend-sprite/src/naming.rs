//! Output file naming for sprite sheets.

use std::path::{Path, PathBuf};

use seqbake_spec::ImageFormat;

/// Base name of a sheet: the custom name when set, otherwise
/// `<source>_sprite_sheet`, with `_Reversed` appended for reversed sequences.
pub fn base_name(custom: Option<&str>, source: &str, reversed: bool) -> String {
    let mut name = match custom.map(str::trim).filter(|n| !n.is_empty()) {
        Some(custom) => custom.to_string(),
        None => format!("{}_sprite_sheet", source),
    };
    if reversed {
        name.push_str("_Reversed");
    }
    name
}

/// Picks the file a sheet is written to.
///
/// With `overwrite` the plain `<base>.<ext>` path is returned; a file already
/// there is left in place until the new sheet is written over it. Without
/// it, an existing file is kept and the first free `<base> (n).<ext>` path
/// (from `n = 1`) is returned instead.
pub fn claim_output_path(
    dir: &Path,
    base: &str,
    format: ImageFormat,
    overwrite: bool,
) -> std::io::Result<PathBuf> {
    let ext = format.extension();
    let path = dir.join(format!("{}.{}", base, ext));
    if overwrite || !path.exists() {
        return Ok(path);
    }

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{} ({}).{}", base, counter, ext));
        if !candidate.exists() {
            return Ok(candidate);
        }
        counter += 1;
    }
}

/// Returns true if `file_name` is a sheet written under `base`, either
/// `<base>.<ext>` or a numbered `<base> (n).<ext>`.
pub fn is_sheet_file(file_name: &str, base: &str) -> bool {
    let Some(stem) = Path::new(file_name).file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    if stem == base {
        return true;
    }
    stem.strip_prefix(base)
        .and_then(|rest| rest.strip_prefix(" ("))
        .and_then(|rest| rest.strip_suffix(')'))
        .map(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
