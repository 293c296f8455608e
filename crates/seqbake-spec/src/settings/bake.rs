//! Sequenced bake settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::format::ImageFormat;

/// A material pass that can be baked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassType {
    /// Surface normals.
    Normal,
    /// Roughness.
    Roughness,
    /// Glossy lighting.
    Glossy,
    /// Emission.
    Emit,
    /// Ambient occlusion.
    #[serde(alias = "ao")]
    AmbientOcclusion,
    /// Shadow.
    Shadow,
    /// World-space position.
    Position,
    /// UV coordinates.
    Uv,
    /// Environment lighting.
    Environment,
    /// Diffuse lighting.
    Diffuse,
    /// Transmission lighting.
    Transmission,
    /// Combined render.
    Combined,
    /// Metallic factor (not a native bake pass, rerouted through emission).
    Metallic,
}

impl PassType {
    /// All pass types in bake order.
    pub const ALL: [PassType; 13] = [
        PassType::Normal,
        PassType::Roughness,
        PassType::Glossy,
        PassType::Emit,
        PassType::AmbientOcclusion,
        PassType::Shadow,
        PassType::Position,
        PassType::Uv,
        PassType::Environment,
        PassType::Diffuse,
        PassType::Transmission,
        PassType::Combined,
        PassType::Metallic,
    ];

    /// Upper-case identifier used in output directory names.
    pub fn as_str(&self) -> &'static str {
        match self {
            PassType::Normal => "NORMAL",
            PassType::Roughness => "ROUGHNESS",
            PassType::Glossy => "GLOSSY",
            PassType::Emit => "EMIT",
            PassType::AmbientOcclusion => "AO",
            PassType::Shadow => "SHADOW",
            PassType::Position => "POSITION",
            PassType::Uv => "UV",
            PassType::Environment => "ENVIRONMENT",
            PassType::Diffuse => "DIFFUSE",
            PassType::Transmission => "TRANSMISSION",
            PassType::Combined => "COMBINED",
            PassType::Metallic => "METALLIC",
        }
    }

    /// Parses an identifier as produced by [`PassType::as_str`] (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "AMBIENT_OCCLUSION" | "AMBIENTOCCLUSION" => Some(PassType::AmbientOcclusion),
            "EMISSION" => Some(PassType::Emit),
            _ => PassType::ALL.into_iter().find(|p| p.as_str() == upper),
        }
    }

    /// The pass the host is asked to bake. Metallic is captured as an
    /// emission bake after the material graph has been rerouted.
    pub fn host_pass(&self) -> PassType {
        match self {
            PassType::Metallic => PassType::Emit,
            other => *other,
        }
    }

    /// Whether the host can bake this pass without graph rerouting.
    pub fn is_native(&self) -> bool {
        !matches!(self, PassType::Metallic)
    }
}

impl std::fmt::Display for PassType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PassType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PassType::from_name(s).ok_or_else(|| format!("unknown pass type: {}", s))
    }
}

/// One enable flag per pass type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PassToggles {
    pub normal: bool,
    pub roughness: bool,
    pub glossy: bool,
    pub emit: bool,
    pub ambient_occlusion: bool,
    pub shadow: bool,
    pub position: bool,
    pub uv: bool,
    pub environment: bool,
    pub diffuse: bool,
    pub transmission: bool,
    pub combined: bool,
    pub metallic: bool,
}

impl PassToggles {
    /// Toggles with only the given passes enabled.
    pub fn only(passes: &[PassType]) -> Self {
        let mut toggles = Self::default();
        for pass in passes {
            toggles.set(*pass, true);
        }
        toggles
    }

    /// Returns whether a pass is enabled.
    pub fn is_enabled(&self, pass: PassType) -> bool {
        match pass {
            PassType::Normal => self.normal,
            PassType::Roughness => self.roughness,
            PassType::Glossy => self.glossy,
            PassType::Emit => self.emit,
            PassType::AmbientOcclusion => self.ambient_occlusion,
            PassType::Shadow => self.shadow,
            PassType::Position => self.position,
            PassType::Uv => self.uv,
            PassType::Environment => self.environment,
            PassType::Diffuse => self.diffuse,
            PassType::Transmission => self.transmission,
            PassType::Combined => self.combined,
            PassType::Metallic => self.metallic,
        }
    }

    /// Enables or disables a pass.
    pub fn set(&mut self, pass: PassType, enabled: bool) {
        let flag = match pass {
            PassType::Normal => &mut self.normal,
            PassType::Roughness => &mut self.roughness,
            PassType::Glossy => &mut self.glossy,
            PassType::Emit => &mut self.emit,
            PassType::AmbientOcclusion => &mut self.ambient_occlusion,
            PassType::Shadow => &mut self.shadow,
            PassType::Position => &mut self.position,
            PassType::Uv => &mut self.uv,
            PassType::Environment => &mut self.environment,
            PassType::Diffuse => &mut self.diffuse,
            PassType::Transmission => &mut self.transmission,
            PassType::Combined => &mut self.combined,
            PassType::Metallic => &mut self.metallic,
        };
        *flag = enabled;
    }

    /// Enabled passes in bake order.
    pub fn enabled(&self) -> Vec<PassType> {
        PassType::ALL
            .into_iter()
            .filter(|p| self.is_enabled(*p))
            .collect()
    }
}

/// Direct/indirect/color contribution flags for a lighting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingToggles {
    pub direct: bool,
    pub indirect: bool,
    pub color: bool,
}

impl Default for LightingToggles {
    fn default() -> Self {
        Self {
            direct: true,
            indirect: true,
            color: true,
        }
    }
}

/// Lighting and contribution flags for the combined pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedToggles {
    pub direct: bool,
    pub indirect: bool,
    pub diffuse: bool,
    pub glossy: bool,
    pub transmission: bool,
    pub emit: bool,
}

impl Default for CombinedToggles {
    fn default() -> Self {
        Self {
            direct: true,
            indirect: true,
            diffuse: true,
            glossy: true,
            transmission: true,
            emit: true,
        }
    }
}

/// Coordinate space of a baked normal map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalSpace {
    Object,
    #[default]
    Tangent,
}

/// Axis written into one channel of a normal map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Swizzle {
    PosX,
    PosY,
    PosZ,
    NegX,
    NegY,
    NegZ,
}

impl Swizzle {
    /// Axis index (0 = X, 1 = Y, 2 = Z) regardless of sign.
    pub fn axis(&self) -> usize {
        match self {
            Swizzle::PosX | Swizzle::NegX => 0,
            Swizzle::PosY | Swizzle::NegY => 1,
            Swizzle::PosZ | Swizzle::NegZ => 2,
        }
    }

    /// Host identifier (e.g. "POS_X").
    pub fn as_str(&self) -> &'static str {
        match self {
            Swizzle::PosX => "POS_X",
            Swizzle::PosY => "POS_Y",
            Swizzle::PosZ => "POS_Z",
            Swizzle::NegX => "NEG_X",
            Swizzle::NegY => "NEG_Y",
            Swizzle::NegZ => "NEG_Z",
        }
    }
}

/// Normal map space and channel assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalMapSettings {
    pub space: NormalSpace,
    pub red: Swizzle,
    pub green: Swizzle,
    pub blue: Swizzle,
}

impl Default for NormalMapSettings {
    fn default() -> Self {
        Self {
            space: NormalSpace::Tangent,
            red: Swizzle::PosX,
            green: Swizzle::PosY,
            blue: Swizzle::PosZ,
        }
    }
}

/// Scene color management applied before every bake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorManagement {
    pub display_device: String,
    pub view_transform: String,
    pub look: String,
    pub exposure: f32,
    pub gamma: f32,
    pub sequencer_colorspace: String,
}

impl Default for ColorManagement {
    fn default() -> Self {
        Self {
            display_device: "sRGB".to_string(),
            view_transform: "Standard".to_string(),
            look: "None".to_string(),
            exposure: 0.0,
            gamma: 1.0,
            sequencer_colorspace: "sRGB".to_string(),
        }
    }
}

/// Image texture interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    Closest,
    Cubic,
    Smart,
}

/// Image texture projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Flat,
    Box,
    Square,
    Tube,
}

/// Image texture extension mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extension {
    #[default]
    Repeat,
    Extend,
    Clip,
    Mirror,
}

/// Sampling configuration of the temporary bake texture node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSampling {
    pub interpolation: Interpolation,
    pub projection: Projection,
    pub extension: Extension,
    pub colorspace: String,
}

impl Default for TextureSampling {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Linear,
            projection: Projection::Flat,
            extension: Extension::Repeat,
            colorspace: "sRGB".to_string(),
        }
    }
}

/// Selected-to-active bake options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectedToActive {
    pub enabled: bool,
    pub cage: bool,
    pub cage_object: Option<String>,
    pub extrusion: f32,
    pub max_ray_distance: f32,
}

impl SelectedToActive {
    /// Name of the cage object, if a cage is in use.
    pub fn cage_name(&self) -> Option<&str> {
        if self.cage {
            self.cage_object.as_deref().filter(|n| !n.is_empty())
        } else {
            None
        }
    }
}

/// Which materials of the active object are baked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BakeMode {
    /// Only the active material.
    #[default]
    Active,
    /// Every material slot of the active object.
    All,
}

/// Pass-specific options forwarded to the host with a bake request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassOptions {
    /// No pass-specific settings.
    None,
    /// Diffuse, glossy, or transmission lighting flags.
    Lighting(LightingToggles),
    /// Combined pass flags.
    Combined(CombinedToggles),
    /// Normal map space and swizzle.
    Normal(NormalMapSettings),
}

/// Settings for a sequenced bake run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeSettings {
    /// Root directory receiving one subdirectory per object/material/pass.
    pub output_path: PathBuf,
    /// Baked image width in pixels.
    pub width: u32,
    /// Baked image height in pixels.
    pub height: u32,
    /// Output format.
    pub image_format: ImageFormat,
    /// Allocate bake images with alpha.
    pub use_alpha: bool,
    /// Allocate float bake images and save at full depth.
    pub use_float: bool,
    /// Purge unused host images after the run.
    pub clear_baked_maps: bool,
    /// Active material only, or all material slots.
    pub bake_mode: BakeMode,
    /// Enabled passes.
    pub passes: PassToggles,
    pub diffuse: LightingToggles,
    pub glossy: LightingToggles,
    pub transmission: LightingToggles,
    pub combined: CombinedToggles,
    pub normal: NormalMapSettings,
    pub color_management: ColorManagement,
    pub sampling: TextureSampling,
    pub selected_to_active: SelectedToActive,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            output_path: PathBuf::new(),
            width: 1024,
            height: 1024,
            image_format: ImageFormat::Png,
            use_alpha: false,
            use_float: false,
            clear_baked_maps: true,
            bake_mode: BakeMode::Active,
            passes: PassToggles::default(),
            diffuse: LightingToggles::default(),
            glossy: LightingToggles::default(),
            transmission: LightingToggles::default(),
            combined: CombinedToggles::default(),
            normal: NormalMapSettings::default(),
            color_management: ColorManagement::default(),
            sampling: TextureSampling::default(),
            selected_to_active: SelectedToActive::default(),
        }
    }
}

impl BakeSettings {
    /// Pass-specific options for a bake of `pass`.
    pub fn pass_options(&self, pass: PassType) -> PassOptions {
        match pass {
            PassType::Diffuse => PassOptions::Lighting(self.diffuse),
            PassType::Glossy => PassOptions::Lighting(self.glossy),
            PassType::Transmission => PassOptions::Lighting(self.transmission),
            PassType::Combined => PassOptions::Combined(self.combined),
            PassType::Normal => PassOptions::Normal(self.normal),
            _ => PassOptions::None,
        }
    }
}
