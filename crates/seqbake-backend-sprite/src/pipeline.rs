//! Sprite sheet pipeline: resolve a sequence, pack it, persist it.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use seqbake_spec::{Reports, SeqBakeConfig, SourceType, SpriteSheetSettings};
use serde::Serialize;

use crate::codec::{ImageCodec, SaveOptions, SavedImage};
use crate::error::{SpriteError, SpriteResult};
use crate::frame::FrameSequence;
use crate::host::TimelineHost;
use crate::job::{CancelToken, Job, JobStatus};
use crate::naming::{base_name, claim_output_path};
use crate::packer::pack;
use crate::source::{
    discover_sequence_dirs, resolve_directory, resolve_render_pass, resolve_timeline,
    DirectoryOptions, RenderPassOptions, TimelineOptions,
};

/// Result of packing one sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackOutcome {
    /// Source label (directory name, "VSE" or "Compositor").
    pub source: String,
    /// The written sheet.
    pub image: SavedImage,
    /// Frames placed in the grid.
    pub placed: usize,
    /// Frames left out because the grid was full.
    pub dropped: usize,
    /// Frames skipped because they had no pixels.
    pub skipped: usize,
}

/// Sheets written during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GeneratedImages {
    images: Vec<SavedImage>,
}

impl GeneratedImages {
    /// Records a written sheet.
    pub fn push(&mut self, image: SavedImage) {
        self.images.push(image);
    }

    /// Paths of the written sheets, in order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.images.iter().map(|i| i.path.as_path())
    }

    /// All written sheets.
    pub fn images(&self) -> &[SavedImage] {
        &self.images
    }

    /// Number of written sheets.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Summary of a sprite sheet run.
#[derive(Debug, Clone, Serialize)]
pub struct SpriteRunSummary {
    /// Final job state.
    pub status: JobStatus,
    /// One entry per written sheet.
    pub sheets: Vec<PackOutcome>,
    /// Written sheet files.
    pub generated: GeneratedImages,
    /// Messages recorded during the run.
    pub reports: Reports,
}

impl SpriteRunSummary {
    fn new() -> Self {
        Self {
            status: JobStatus::Running,
            sheets: Vec::new(),
            generated: GeneratedImages::default(),
            reports: Reports::new(),
        }
    }

    fn record(&mut self, outcome: Option<PackOutcome>) {
        if let Some(outcome) = outcome {
            self.generated.push(outcome.image.clone());
            self.sheets.push(outcome);
        }
    }
}

fn log_settings_summary(settings: &SpriteSheetSettings, name: &str) {
    log::info!(
        "Sprite sheet settings: source={:?} frames={}..={} grid={}x{} cell={}x{} name={} format={} alpha={} overwrite={} reversed={}",
        settings.source_type,
        settings.start_frame,
        settings.end_frame,
        settings.columns,
        settings.rows,
        settings.cell_width,
        settings.cell_height,
        name,
        settings.image_format,
        settings.use_alpha,
        settings.overwrite,
        settings.reversed
    );
}

/// Packs a resolved sequence and writes the sheet into `out_dir`.
///
/// An empty sequence writes nothing and records a warning. Failures are
/// recorded as errors; `None` is returned whenever no sheet was written.
pub fn pack_sequence<C: ImageCodec + ?Sized>(
    sequence: &FrameSequence,
    settings: &SpriteSheetSettings,
    out_dir: &Path,
    codec: &C,
    reports: &mut Reports,
) -> Option<PackOutcome> {
    let name = base_name(
        settings.custom_file_name(),
        &sequence.label,
        sequence.reversed,
    );
    log_settings_summary(settings, &name);

    if sequence.is_empty() {
        reports.warning(format!("No images to process for {}", sequence.label));
        return None;
    }
    reports.info(format!("Starting sprite sheet generation: {}", name));

    match write_sheet(sequence, settings, out_dir, &name, codec, reports) {
        Ok(outcome) => {
            reports.info(format!("Sprite sheet saved: {}", outcome.image.path.display()));
            Some(outcome)
        }
        Err(e) => {
            reports.backend_error(&e);
            None
        }
    }
}

fn write_sheet<C: ImageCodec + ?Sized>(
    sequence: &FrameSequence,
    settings: &SpriteSheetSettings,
    out_dir: &Path,
    name: &str,
    codec: &C,
    reports: &mut Reports,
) -> SpriteResult<PackOutcome> {
    std::fs::create_dir_all(out_dir).map_err(|source| SpriteError::CreateOutputDir {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let sheet = pack(sequence, &settings.layout(), reports)?;
    let path = claim_output_path(out_dir, name, settings.image_format, settings.overwrite)?;
    let image = codec.save(
        &sheet.image,
        &path,
        SaveOptions::new(settings.image_format, settings.use_alpha),
    )?;

    Ok(PackOutcome {
        source: sequence.label.clone(),
        image,
        placed: sheet.placed(),
        dropped: sheet.dropped,
        skipped: sheet.skipped,
    })
}

/// Directory-mode batch: one sheet per sequence directory, one directory
/// per tick.
pub struct SpriteBatchJob<'a, C: ImageCodec + ?Sized> {
    settings: SpriteSheetSettings,
    out_dir: PathBuf,
    codec: &'a C,
    pending: VecDeque<PathBuf>,
    total: usize,
    cancel: CancelToken,
    summary: SpriteRunSummary,
}

impl<'a, C: ImageCodec + ?Sized> SpriteBatchJob<'a, C> {
    /// Creates a batch over the sequences under `root`. Sheets are written
    /// into `root`.
    pub fn new(settings: SpriteSheetSettings, root: &Path, codec: &'a C) -> SpriteResult<Self> {
        let pending: VecDeque<PathBuf> = discover_sequence_dirs(root)?.into();
        let total = pending.len();
        Ok(Self {
            settings,
            out_dir: root.to_path_buf(),
            codec,
            pending,
            total,
            cancel: CancelToken::new(),
            summary: SpriteRunSummary::new(),
        })
    }

    /// Creates a batch from a configuration document. An empty sprite
    /// directory falls back to the bake output path with a warning.
    pub fn from_config(config: &SeqBakeConfig, codec: &'a C) -> SpriteResult<Self> {
        let mut fallback = Reports::new();
        if config.sprite_sheet.directory.as_os_str().is_empty() {
            fallback.warning(format!(
                "No image sequence directory provided, defaulting to the bake output path {}",
                config.bake.output_path.display()
            ));
        }
        let root = config.sprite_directory();
        if root.as_os_str().is_empty() {
            return Err(SpriteError::DirectoryUnreadable {
                path: PathBuf::new(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no sprite directory or bake output path configured",
                ),
            });
        }
        let mut job = Self::new(config.sprite_sheet.clone(), root, codec)?;
        job.summary.reports.append(fallback);
        Ok(job)
    }

    /// Replaces the cancellation token (e.g. to share one with a host).
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Summary so far.
    pub fn summary(&self) -> &SpriteRunSummary {
        &self.summary
    }

    /// Consumes the job and returns its summary.
    pub fn into_summary(self) -> SpriteRunSummary {
        self.summary
    }
}

impl<'a, C: ImageCodec + ?Sized> Job for SpriteBatchJob<'a, C> {
    fn tick(&mut self) -> JobStatus {
        if self.summary.status.is_done() {
            return self.summary.status;
        }
        if self.cancel.is_cancelled() {
            self.summary.reports.info(format!(
                "Sprite sheet batch cancelled with {} of {} sequences left",
                self.pending.len(),
                self.total
            ));
            self.summary.status = JobStatus::Cancelled;
            return self.summary.status;
        }

        if let Some(dir) = self.pending.pop_front() {
            let opts = DirectoryOptions::from_settings(&self.settings);
            let reports = &mut self.summary.reports;
            let sequence = resolve_directory(&dir, &opts, self.codec, reports);
            let outcome = pack_sequence(&sequence, &self.settings, &self.out_dir, self.codec, reports);
            self.summary.record(outcome);
        }

        if self.pending.is_empty() {
            self.summary.status = JobStatus::Finished;
        }
        self.summary.status
    }

    fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn progress(&self) -> (usize, usize) {
        (self.total - self.pending.len(), self.total)
    }
}

/// Renders sequencer frames through `host` and packs them into one sheet.
///
/// Rendered stills go to a temporary directory that is deleted afterwards
/// when `clear_generated_images` is set and kept otherwise.
pub fn pack_timeline<H, C>(
    host: &mut H,
    settings: &SpriteSheetSettings,
    codec: &C,
) -> SpriteRunSummary
where
    H: TimelineHost + ?Sized,
    C: ImageCodec + ?Sized,
{
    let mut summary = SpriteRunSummary::new();
    let temp = match tempfile::Builder::new().prefix("seqbake-vse-").tempdir() {
        Ok(temp) => temp,
        Err(e) => {
            summary.reports.backend_error(&SpriteError::Io(e));
            summary.status = JobStatus::Finished;
            return summary;
        }
    };

    let opts = TimelineOptions::from_settings(settings);
    let sequence = resolve_timeline(host, &opts, codec, temp.path(), &mut summary.reports);
    let outcome = pack_sequence(
        &sequence,
        settings,
        &settings.vse_output_path,
        codec,
        &mut summary.reports,
    );
    summary.record(outcome);

    if settings.clear_generated_images {
        if let Err(e) = temp.close() {
            summary
                .reports
                .warning(format!("Failed to delete rendered sequencer frames: {}", e));
        }
    } else {
        let kept = temp.keep();
        summary
            .reports
            .info(format!("Rendered sequencer frames kept in {}", kept.display()));
    }

    summary.status = JobStatus::Finished;
    summary
}

/// Renders compositor frames at the cell size through `host` and packs them
/// into one sheet. Rendered stills are removed afterwards when
/// `clear_generated_images` is set.
pub fn pack_render_pass<H, C>(
    host: &mut H,
    settings: &SpriteSheetSettings,
    codec: &C,
) -> SpriteRunSummary
where
    H: TimelineHost + ?Sized,
    C: ImageCodec + ?Sized,
{
    let mut summary = SpriteRunSummary::new();
    let opts = RenderPassOptions::from_settings(settings);
    let sequence = resolve_render_pass(host, &opts, codec, &mut summary.reports);
    let outcome = pack_sequence(
        &sequence,
        settings,
        &settings.compositor_output_path,
        codec,
        &mut summary.reports,
    );
    summary.record(outcome);

    if settings.clear_generated_images {
        for path in sequence.frames.iter().filter_map(|f| f.origin()) {
            if let Err(e) = std::fs::remove_file(path) {
                summary
                    .reports
                    .warning(format!("Failed to delete {}: {}", path.display(), e));
            }
        }
    }

    summary.status = JobStatus::Finished;
    summary
}

/// Runs the sprite sheet source selected in `settings`.
///
/// Directory mode reads from `settings.directory`; the other modes render
/// through `host`.
pub fn run_sprite_sheet<H, C>(
    host: &mut H,
    settings: &SpriteSheetSettings,
    codec: &C,
) -> SpriteRunSummary
where
    H: TimelineHost + ?Sized,
    C: ImageCodec + ?Sized,
{
    match settings.source_type {
        SourceType::Directory => {
            match SpriteBatchJob::new(settings.clone(), &settings.directory, codec) {
                Ok(mut job) => {
                    crate::job::run_to_completion(&mut job);
                    job.into_summary()
                }
                Err(e) => {
                    let mut summary = SpriteRunSummary::new();
                    summary.reports.backend_error(&e);
                    summary.status = JobStatus::Finished;
                    summary
                }
            }
        }
        SourceType::Vse => pack_timeline(host, settings, codec),
        SourceType::Compositor => pack_render_pass(host, settings, codec),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FsCodec;
    use crate::frame::{Frame, FrameKey, PixelBuffer};
    use crate::job::run_to_completion;
    use seqbake_spec::ImageFormat;

    fn small_settings() -> SpriteSheetSettings {
        SpriteSheetSettings {
            columns: 2,
            rows: 2,
            cell_width: 4,
            cell_height: 4,
            ..Default::default()
        }
    }

    fn write_frames(dir: &Path, count: usize) {
        std::fs::create_dir_all(dir).unwrap();
        for i in 1..=count {
            let image = PixelBuffer::filled(2, 2, [i as f32 / 10.0, 0.0, 0.0, 1.0]);
            FsCodec
                .save(
                    &image,
                    &dir.join(format!("{}.png", i)),
                    SaveOptions::new(ImageFormat::Png, true),
                )
                .unwrap();
        }
    }

    #[test]
    fn test_empty_sequence_writes_nothing() {
        let out = tempfile::tempdir().unwrap();
        let mut reports = Reports::new();
        let outcome = pack_sequence(
            &FrameSequence::empty("walk", false),
            &small_settings(),
            out.path(),
            &FsCodec,
            &mut reports,
        );
        assert!(outcome.is_none());
        assert_eq!(reports.warning_count(), 1);
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_pack_sequence_names_and_counts() {
        let out = tempfile::tempdir().unwrap();
        let frames = (1..=6)
            .map(|i| Frame::new(PixelBuffer::filled(2, 2, [1.0; 4]), FrameKey::Number(i)))
            .collect();
        let sequence = FrameSequence::new("walk", frames, true);
        let mut reports = Reports::new();
        let outcome =
            pack_sequence(&sequence, &small_settings(), out.path(), &FsCodec, &mut reports)
                .unwrap();
        assert_eq!(
            outcome.image.path,
            out.path().join("walk_sprite_sheet_Reversed.png")
        );
        assert_eq!((outcome.placed, outcome.dropped), (4, 2));
        assert_eq!((outcome.image.width, outcome.image.height), (8, 8));
    }

    #[test]
    fn test_unsupported_format_is_error() {
        let out = tempfile::tempdir().unwrap();
        let frames = vec![Frame::new(PixelBuffer::filled(2, 2, [1.0; 4]), FrameKey::Number(1))];
        let settings = SpriteSheetSettings {
            image_format: ImageFormat::Dpx,
            ..small_settings()
        };
        let mut reports = Reports::new();
        let outcome = pack_sequence(
            &FrameSequence::new("walk", frames, false),
            &settings,
            out.path(),
            &FsCodec,
            &mut reports,
        );
        assert!(outcome.is_none());
        assert_eq!(reports.error_count(), 1);
    }

    #[test]
    fn test_batch_one_directory_per_tick() {
        let root = tempfile::tempdir().unwrap();
        write_frames(&root.path().join("idle"), 2);
        write_frames(&root.path().join("walk"), 3);

        let mut job = SpriteBatchJob::new(small_settings(), root.path(), &FsCodec).unwrap();
        assert_eq!(job.progress(), (0, 2));
        assert_eq!(job.tick(), JobStatus::Running);
        assert_eq!(job.summary().sheets.len(), 1);
        assert_eq!(job.tick(), JobStatus::Finished);

        let summary = job.into_summary();
        let names: Vec<_> = summary
            .generated
            .paths()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["idle_sprite_sheet.png", "walk_sprite_sheet.png"]);
    }

    #[test]
    fn test_batch_cancel_keeps_written_sheets() {
        let root = tempfile::tempdir().unwrap();
        write_frames(&root.path().join("a"), 1);
        write_frames(&root.path().join("b"), 1);

        let mut job = SpriteBatchJob::new(small_settings(), root.path(), &FsCodec).unwrap();
        let token = job.cancel_token();
        assert_eq!(job.tick(), JobStatus::Running);
        token.cancel();
        assert_eq!(run_to_completion(&mut job), JobStatus::Cancelled);
        assert_eq!(job.summary().generated.len(), 1);
        assert!(root.path().join("a_sprite_sheet.png").exists());
        assert!(!root.path().join("b_sprite_sheet.png").exists());
    }

    #[test]
    fn test_from_config_falls_back_to_bake_output() {
        let root = tempfile::tempdir().unwrap();
        write_frames(root.path(), 2);
        let mut config = SeqBakeConfig::default();
        config.bake.output_path = root.path().to_path_buf();
        config.sprite_sheet.columns = 2;
        config.sprite_sheet.rows = 1;

        let mut job = SpriteBatchJob::from_config(&config, &FsCodec).unwrap();
        assert_eq!(run_to_completion(&mut job), JobStatus::Finished);
        let summary = job.into_summary();
        assert_eq!(summary.reports.warning_count(), 1);
        assert_eq!(summary.sheets.len(), 1);
    }

    #[test]
    fn test_from_config_without_any_directory() {
        let config = SeqBakeConfig::default();
        assert!(SpriteBatchJob::from_config(&config, &FsCodec).is_err());
    }
}
