//! Sequenced bake orchestration.
//!
//! A run bakes every enabled pass of every selected material once per scene
//! frame and writes `<root>/<object>_<material>_<PASS>/<frame>.<ext>`.
//! [`BakeJob`] does one (material, pass, frame) per tick. A failing frame
//! is reported and skipped; a metallic pass whose shader wiring cannot be
//! rerouted is abandoned while the other passes carry on.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use seqbake_backend_sprite::{run_to_completion, CancelToken, Job, JobStatus};
use seqbake_spec::{validate_bake_settings, BakeSettings, ColorDepth, ImageFormat, PassType, Reports};
use serde::Serialize;

use crate::error::{BakeError, BakeResult};
use crate::graph::{NodeId, NodeKind, NodeTemplate};
use crate::host::{BakeHost, BakeRequest, ImageSpec};
use crate::metallic::{reroute_metallic, restore_surface};

/// Horizontal distance between the material output and the bake texture node.
pub const NODE_OFFSET_X: f32 = 300.0;

/// What a run will bake and where it will be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BakePlan {
    pub object: String,
    pub materials: Vec<String>,
    pub passes: Vec<PassType>,
    pub first_frame: i32,
    pub last_frame: i32,
    pub output_root: PathBuf,
    pub format: ImageFormat,
}

/// One file a plan will produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFrame {
    pub material: String,
    pub pass: PassType,
    pub frame: i32,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BakeUnit {
    material: usize,
    pass: PassType,
    frame: i32,
    opens_pass: bool,
    closes_pass: bool,
}

impl BakePlan {
    pub fn new(
        object: impl Into<String>,
        materials: Vec<String>,
        passes: Vec<PassType>,
        frames: RangeInclusive<i32>,
        output_root: impl Into<PathBuf>,
        format: ImageFormat,
    ) -> Self {
        Self {
            object: object.into(),
            materials,
            passes,
            first_frame: *frames.start(),
            last_frame: *frames.end(),
            output_root: output_root.into(),
            format,
        }
    }

    /// Frames baked per pass.
    pub fn frames(&self) -> RangeInclusive<i32> {
        self.first_frame..=self.last_frame
    }

    /// Number of frames per pass (0 for an inverted range).
    pub fn frame_count(&self) -> usize {
        if self.last_frame < self.first_frame {
            0
        } else {
            (self.last_frame as i64 - self.first_frame as i64 + 1) as usize
        }
    }

    /// Number of images the plan produces.
    pub fn len(&self) -> usize {
        self.materials.len() * self.passes.len() * self.frame_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `<object>_<material>_<PASS>`, shared by the pass directory and image
    /// names.
    fn stem(&self, material: &str, pass: PassType) -> String {
        format!("{}_{}_{}", self.object, material, pass.as_str())
    }

    /// Directory receiving the frames of one material pass.
    pub fn pass_dir(&self, material: &str, pass: PassType) -> PathBuf {
        self.output_root.join(self.stem(material, pass))
    }

    /// File written for one frame.
    pub fn frame_path(&self, material: &str, pass: PassType, frame: i32) -> PathBuf {
        self.pass_dir(material, pass)
            .join(format!("{}.{}", frame, self.format.extension()))
    }

    /// Host image name used while baking one frame.
    pub fn image_name(&self, material: &str, pass: PassType, frame: i32) -> String {
        format!("{}_{}", self.stem(material, pass), frame)
    }

    /// Every file of the plan in bake order.
    pub fn entries(&self) -> Vec<PlannedFrame> {
        self.units()
            .into_iter()
            .map(|u| {
                let material = &self.materials[u.material];
                PlannedFrame {
                    material: material.clone(),
                    pass: u.pass,
                    frame: u.frame,
                    path: self.frame_path(material, u.pass, u.frame),
                }
            })
            .collect()
    }

    /// Materials outermost, then passes, then frames.
    fn units(&self) -> Vec<BakeUnit> {
        let count = self.frame_count();
        let mut units = Vec::with_capacity(self.len());
        for material in 0..self.materials.len() {
            for &pass in &self.passes {
                for (i, frame) in self.frames().enumerate() {
                    units.push(BakeUnit {
                        material,
                        pass,
                        frame,
                        opens_pass: i == 0,
                        closes_pass: i + 1 == count,
                    });
                }
            }
        }
        units
    }
}

/// Checks the preconditions of a run against the host and builds its plan.
///
/// Returns `Ok(None)` with a warning when there is nothing to do: the render
/// engine cannot bake, or no pass is enabled.
pub fn prepare_bake<H: BakeHost + ?Sized>(
    host: &H,
    settings: &BakeSettings,
    reports: &mut Reports,
) -> BakeResult<Option<BakePlan>> {
    if !host.supports_baking() {
        reports.warning(format!(
            "Sequenced bake requires a render engine that can bake (current: {})",
            host.engine_name()
        ));
        return Ok(None);
    }

    if settings.output_path.as_os_str().is_empty() {
        return Err(BakeError::MissingOutputPath);
    }
    std::fs::create_dir_all(&settings.output_path).map_err(|source| {
        BakeError::CreateOutputDir {
            path: settings.output_path.clone(),
            source,
        }
    })?;

    let object = host.active_object().ok_or(BakeError::NoActiveMaterial)?;
    if object.active_material.is_none() {
        return Err(BakeError::NoActiveMaterial);
    }

    let passes = settings.passes.enabled();
    if passes.is_empty() {
        reports.warning("No bake passes selected");
        return Ok(None);
    }

    let validation = validate_bake_settings(settings);
    reports.extend_validation(&validation);
    if !validation.is_ok() {
        return Err(BakeError::InvalidSettings(validation.errors.len()));
    }

    let materials = object.materials_for(settings.bake_mode);
    if materials.is_empty() {
        return Err(BakeError::NoMaterials);
    }

    Ok(Some(BakePlan::new(
        object.name,
        materials,
        passes,
        host.frame_range(),
        settings.output_path.clone(),
        settings.image_format,
    )))
}

/// An image written by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BakedFrame {
    pub material: String,
    pub pass: PassType,
    pub frame: i32,
    pub path: PathBuf,
}

/// Outcome of a bake run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BakeSummary {
    pub status: JobStatus,
    pub plan: Option<BakePlan>,
    pub baked: Vec<BakedFrame>,
    /// Frames whose bake or save failed.
    pub failed: usize,
    /// Material passes given up before any frame was baked.
    pub abandoned: usize,
    /// Host images purged after the run.
    pub purged_images: usize,
    pub reports: Reports,
}

impl BakeSummary {
    fn new(plan: Option<BakePlan>, reports: Reports) -> Self {
        Self {
            status: JobStatus::Running,
            plan,
            baked: Vec::new(),
            failed: 0,
            abandoned: 0,
            purged_images: 0,
            reports,
        }
    }

    /// Written files in bake order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.baked.iter().map(|b| b.path.as_path())
    }
}

/// A bake run driven one frame per tick.
pub struct BakeJob<'h, H: BakeHost + ?Sized> {
    host: &'h mut H,
    settings: BakeSettings,
    plan: BakePlan,
    units: Vec<BakeUnit>,
    next: usize,
    /// Material whose surface is currently fed by its metallic source.
    rerouted: Option<String>,
    abandoned: Vec<(usize, PassType)>,
    cancel: CancelToken,
    summary: BakeSummary,
}

impl<'h, H: BakeHost + ?Sized> BakeJob<'h, H> {
    pub fn new(host: &'h mut H, settings: BakeSettings, plan: BakePlan) -> Self {
        let units = plan.units();
        log::info!(
            "Baking {} material(s) x {} pass(es) x {} frame(s) of '{}' into {}",
            plan.materials.len(),
            plan.passes.len(),
            plan.frame_count(),
            plan.object,
            plan.output_root.display()
        );
        Self {
            host,
            settings,
            summary: BakeSummary::new(Some(plan.clone()), Reports::new()),
            plan,
            units,
            next: 0,
            rerouted: None,
            abandoned: Vec::new(),
            cancel: CancelToken::new(),
        }
    }

    /// Replaces the cancellation token (e.g. to share one with a host).
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn plan(&self) -> &BakePlan {
        &self.plan
    }

    pub fn summary(&self) -> &BakeSummary {
        &self.summary
    }

    pub fn into_summary(self) -> BakeSummary {
        self.summary
    }

    fn is_abandoned(&self, unit: &BakeUnit) -> bool {
        self.abandoned.contains(&(unit.material, unit.pass))
    }

    fn run_unit(&mut self, unit: BakeUnit) {
        let material = self.plan.materials[unit.material].clone();

        if unit.opens_pass {
            if let Err(e) = self.open_pass(&material, unit.pass) {
                self.summary.reports.backend_error(&e);
                self.summary.reports.error(format!(
                    "Skipping {} pass for material '{}'",
                    unit.pass, material
                ));
                self.abandoned.push((unit.material, unit.pass));
                self.summary.abandoned += 1;
                return;
            }
        }

        match self.bake_frame(&material, unit.pass, unit.frame) {
            Ok(path) => {
                log::info!("Baked {} frame {} to {}", unit.pass, unit.frame, path.display());
                self.summary.baked.push(BakedFrame {
                    material: material.clone(),
                    pass: unit.pass,
                    frame: unit.frame,
                    path,
                });
            }
            Err(e) => {
                self.summary.reports.backend_error(&e);
                self.summary.failed += 1;
            }
        }

        if unit.closes_pass && unit.pass == PassType::Metallic {
            self.restore_rerouted();
        }
    }

    fn open_pass(&mut self, material: &str, pass: PassType) -> BakeResult<()> {
        if pass == PassType::Metallic {
            let graph = self
                .host
                .material_graph(material)
                .ok_or_else(|| BakeError::MissingMaterial {
                    material: material.to_string(),
                })?;
            reroute_metallic(graph, material)?;
            self.rerouted = Some(material.to_string());
        }

        let dir = self.plan.pass_dir(material, pass);
        if let Err(source) = std::fs::create_dir_all(&dir) {
            // The pass is abandoned, so its closing frame never restores the shader.
            self.restore_rerouted();
            return Err(BakeError::CreateOutputDir { path: dir, source });
        }
        Ok(())
    }

    fn restore_rerouted(&mut self) {
        let Some(material) = self.rerouted.take() else {
            return;
        };
        let result = match self.host.material_graph(&material) {
            Some(graph) => restore_surface(graph, &material),
            None => Err(BakeError::MissingMaterial {
                material: material.clone(),
            }),
        };
        if let Err(e) = result {
            self.summary.reports.backend_error(&e);
        }
    }

    /// Bakes one frame through a temporary texture node. The node is removed
    /// whether or not the bake succeeds.
    fn bake_frame(&mut self, material: &str, pass: PassType, frame: i32) -> BakeResult<PathBuf> {
        self.host.set_frame(frame);

        let image = self.plan.image_name(material, pass, frame);
        self.host.create_image(&ImageSpec {
            name: image.clone(),
            width: self.settings.width,
            height: self.settings.height,
            alpha: self.settings.use_alpha,
            float: self.settings.use_float,
            colorspace: self.settings.sampling.colorspace.clone(),
        })?;

        let node = self.add_texture_node(material, &image)?;
        let path = self.plan.frame_path(material, pass, frame);
        let result = self.bake_into(material, pass, frame, &image, &path);

        let removed = match self.host.material_graph(material) {
            Some(graph) => graph.remove_node(node).map(|_| ()),
            None => Err(BakeError::MissingMaterial {
                material: material.to_string(),
            }),
        };
        if let Err(e) = removed {
            self.summary.reports.backend_warning(&e);
        }

        result.map(|()| path)
    }

    fn add_texture_node(&mut self, material: &str, image: &str) -> BakeResult<NodeId> {
        let sampling = self.settings.sampling.clone();
        let graph = self
            .host
            .material_graph(material)
            .ok_or_else(|| BakeError::MissingMaterial {
                material: material.to_string(),
            })?;
        let [x, y] = graph
            .find_by_kind(&NodeKind::MaterialOutput)
            .and_then(|id| graph.node(id))
            .map(|n| n.location)
            .unwrap_or([0.0, 0.0]);
        let node = graph.add_node(
            NodeTemplate::image_texture(image, image, sampling).at(x + NODE_OFFSET_X, y),
        );
        if let Err(e) = graph.set_active(node) {
            graph.remove_node(node)?;
            return Err(e);
        }
        Ok(node)
    }

    fn bake_into(
        &mut self,
        material: &str,
        pass: PassType,
        frame: i32,
        image: &str,
        path: &Path,
    ) -> BakeResult<()> {
        self.host
            .apply_color_management(&self.settings.color_management)?;

        let mut selected_to_active = self.settings.selected_to_active.clone();
        selected_to_active.cage_object = selected_to_active.cage_name().map(str::to_string);
        let request = BakeRequest {
            pass,
            bake_type: pass.host_pass(),
            frame,
            object: self.plan.object.clone(),
            material: material.to_string(),
            image: image.to_string(),
            options: self.settings.pass_options(pass),
            selected_to_active,
        };
        self.host.bake(&request)?;

        self.host.save_image(
            image,
            path,
            self.settings.image_format,
            ColorDepth::for_float_buffer(self.settings.use_float),
        )
    }

    /// Restores any rerouted shader and purges unused images.
    fn teardown(&mut self) {
        self.restore_rerouted();
        if self.settings.clear_baked_maps {
            self.summary.purged_images = self.host.purge_unused_images();
            log::debug!("Purged {} unused image(s)", self.summary.purged_images);
        }
    }
}

impl<'h, H: BakeHost + ?Sized> Job for BakeJob<'h, H> {
    fn tick(&mut self) -> JobStatus {
        if self.summary.status.is_done() {
            return self.summary.status;
        }
        if self.cancel.is_cancelled() {
            self.teardown();
            self.summary.reports.info(format!(
                "Sequenced bake cancelled after {} of {} frame(s)",
                self.next,
                self.units.len()
            ));
            self.summary.status = JobStatus::Cancelled;
            return self.summary.status;
        }

        while self
            .units
            .get(self.next)
            .is_some_and(|unit| self.is_abandoned(unit))
        {
            self.next += 1;
        }
        if let Some(unit) = self.units.get(self.next).copied() {
            self.next += 1;
            self.run_unit(unit);
        }

        if self.next >= self.units.len() {
            self.teardown();
            self.summary.reports.info(format!(
                "Sequenced Bake completed for {} material(s)",
                self.plan.materials.len()
            ));
            self.summary.status = JobStatus::Finished;
        }
        self.summary.status
    }

    fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn progress(&self) -> (usize, usize) {
        (self.next, self.units.len())
    }
}

/// Prepares and runs a whole bake on `host`.
pub fn run_bake<H: BakeHost + ?Sized>(host: &mut H, settings: &BakeSettings) -> BakeSummary {
    let mut reports = Reports::new();
    match prepare_bake(&*host, settings, &mut reports) {
        Ok(Some(plan)) => {
            let mut job = BakeJob::new(host, settings.clone(), plan);
            job.summary.reports = reports;
            run_to_completion(&mut job);
            job.into_summary()
        }
        Ok(None) => {
            let mut summary = BakeSummary::new(None, reports);
            summary.status = JobStatus::Finished;
            summary
        }
        Err(e) => {
            reports.backend_error(&e);
            let mut summary = BakeSummary::new(None, reports);
            summary.status = JobStatus::Finished;
            summary
        }
    }
}
