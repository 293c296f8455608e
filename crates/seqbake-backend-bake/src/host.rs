//! Boundary to the 3D host that owns scenes, materials and the bake engine.

use std::ops::RangeInclusive;
use std::path::Path;

use seqbake_spec::{
    BakeMode, ColorDepth, ColorManagement, ImageFormat, PassOptions, PassType, SelectedToActive,
};
use serde::Serialize;

use crate::error::BakeResult;
use crate::graph::MaterialGraph;

/// The active object as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    /// Object name.
    pub name: String,
    /// Material per slot; empty slots are `None`.
    pub material_slots: Vec<Option<String>>,
    /// The active material.
    pub active_material: Option<String>,
}

impl ObjectInfo {
    /// Materials baked under `mode`, deduplicated in slot order.
    pub fn materials_for(&self, mode: BakeMode) -> Vec<String> {
        match mode {
            BakeMode::Active => self.active_material.iter().cloned().collect(),
            BakeMode::All => {
                let mut materials: Vec<String> = Vec::new();
                for name in self.material_slots.iter().flatten() {
                    if !materials.contains(name) {
                        materials.push(name.clone());
                    }
                }
                materials
            }
        }
    }
}

/// A bake target image to allocate in the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub alpha: bool,
    pub float: bool,
    pub colorspace: String,
}

/// One bake call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BakeRequest {
    /// Pass requested by the user.
    pub pass: PassType,
    /// Pass the host actually bakes (`Metallic` bakes as `Emit`).
    pub bake_type: PassType,
    pub frame: i32,
    pub object: String,
    pub material: String,
    /// Image receiving the result, bound to the active texture node.
    pub image: String,
    /// Pass-specific settings to apply before baking.
    pub options: PassOptions,
    /// Selected-to-active settings. `cage_object` is only set when the cage
    /// is enabled.
    pub selected_to_active: SelectedToActive,
}

/// Host operations needed to run a sequenced bake.
///
/// Implementations wrap a live 3D application; tests use in-memory mocks.
pub trait BakeHost {
    /// True when the current render engine can bake.
    fn supports_baking(&self) -> bool;

    /// Name of the current render engine, for messages.
    fn engine_name(&self) -> String;

    /// The active object, if any.
    fn active_object(&self) -> Option<ObjectInfo>;

    /// Scene frame range.
    fn frame_range(&self) -> RangeInclusive<i32>;

    /// Moves the scene to `frame`.
    fn set_frame(&mut self, frame: i32);

    /// Node graph of a material.
    fn material_graph(&mut self, material: &str) -> Option<&mut MaterialGraph>;

    /// Allocates a bake target image.
    fn create_image(&mut self, spec: &ImageSpec) -> BakeResult<()>;

    /// Applies scene color management before a bake.
    fn apply_color_management(&mut self, settings: &ColorManagement) -> BakeResult<()>;

    /// Bakes into the image bound to the active texture node.
    fn bake(&mut self, request: &BakeRequest) -> BakeResult<()>;

    /// Writes an image to disk.
    fn save_image(
        &mut self,
        image: &str,
        path: &Path,
        format: ImageFormat,
        depth: ColorDepth,
    ) -> BakeResult<()>;

    /// Drops images nothing references any more. Returns how many went.
    fn purge_unused_images(&mut self) -> usize;
}
