//! SeqBake sprite sheet backend
//!
//! Resolves image sequences (numbered files on disk, sequencer renders,
//! compositor renders) into ordered frame lists and packs them into grid
//! sprite sheets.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use seqbake_backend_sprite::{run_to_completion, FsCodec, SpriteBatchJob};
//! use seqbake_spec::SpriteSheetSettings;
//!
//! let settings = SpriteSheetSettings::default();
//! let mut job = SpriteBatchJob::new(settings, Path::new("renders/walk"), &FsCodec).unwrap();
//! run_to_completion(&mut job);
//! for path in job.summary().generated.paths() {
//!     println!("wrote {}", path.display());
//! }
//! ```

pub mod codec;
pub mod error;
pub mod frame;
pub mod host;
pub mod job;
pub mod naming;
pub mod packer;
pub mod pipeline;
pub mod resize;
pub mod source;

pub use codec::{FsCodec, ImageCodec, SaveOptions, SavedImage};
pub use error::{SpriteError, SpriteResult};
pub use frame::{Frame, FrameKey, FrameSequence, PixelBuffer};
pub use host::{RenderOutput, RenderResolution, TimelineHost, Track};
pub use job::{run_to_completion, CancelToken, Job, JobStatus};
pub use naming::{base_name, claim_output_path};
pub use packer::{cell_origin, pack, Placement, SpriteSheet};
pub use pipeline::{
    pack_render_pass, pack_sequence, pack_timeline, run_sprite_sheet, GeneratedImages,
    PackOutcome, SpriteBatchJob, SpriteRunSummary,
};
pub use resize::resize_nearest;
pub use source::{
    discover_sequence_dirs, resolve_directory, resolve_render_pass, resolve_timeline,
    DirectoryOptions, RenderPassOptions, TimelineOptions,
};
