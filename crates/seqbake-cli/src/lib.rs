//! SeqBake CLI library.
//!
//! Command implementations behind the `seqbake` binary: sprite sheet
//! packing, configuration validation, bake layout planning and an
//! environment check.

pub mod commands;
