//! SeqBake bake pass orchestrator
//!
//! Bakes material passes of the active object once per scene frame through
//! a [`BakeHost`], writing one image per material, pass and frame:
//!
//! ```text
//! <output>/<object>_<material>_<PASS>/<frame>.<ext>
//! ```
//!
//! Hosts have no metallic bake, so the metallic pass temporarily routes the
//! shader's metallic source into the material surface and bakes emission.
//!
//! # Example
//!
//! ```
//! use seqbake_backend_bake::BakePlan;
//! use seqbake_spec::{ImageFormat, PassType};
//!
//! let plan = BakePlan::new(
//!     "Cube",
//!     vec!["Mat".to_string()],
//!     vec![PassType::Normal],
//!     1..=3,
//!     "bakes",
//!     ImageFormat::Png,
//! );
//! assert_eq!(plan.len(), 3);
//! assert!(plan.frame_path("Mat", PassType::Normal, 2).ends_with("Cube_Mat_NORMAL/2.png"));
//! ```

pub mod error;
pub mod graph;
pub mod host;
pub mod metallic;
pub mod orchestrator;

pub use error::{BakeError, BakeResult};
pub use graph::{Link, MaterialGraph, Node, NodeId, NodeKind, NodeTemplate, SocketRef, TextureBinding};
pub use host::{BakeHost, BakeRequest, ImageSpec, ObjectInfo};
pub use metallic::{reroute_metallic, restore_surface};
pub use orchestrator::{
    prepare_bake, run_bake, BakeJob, BakePlan, BakeSummary, BakedFrame, PlannedFrame,
    NODE_OFFSET_X,
};
