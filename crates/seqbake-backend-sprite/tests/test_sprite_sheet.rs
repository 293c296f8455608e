//! End-to-end sprite sheet tests against the file system.
//!
//! Frames are written as real PNG files, packed through the public
//! pipeline, and the resulting sheets are decoded again for inspection.

use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use seqbake_backend_sprite::{
    run_sprite_sheet, run_to_completion, FsCodec, ImageCodec, JobStatus, PixelBuffer,
    RenderOutput, RenderResolution, SaveOptions, SpriteBatchJob, SpriteResult, TimelineHost,
    Track,
};
use seqbake_spec::{ImageFormat, SourceType, SpriteSheetSettings};

/// Writes `count` numbered frames whose red channel encodes the frame number.
fn write_sequence(dir: &Path, count: u32) {
    std::fs::create_dir_all(dir).unwrap();
    for i in 1..=count {
        let image = PixelBuffer::filled(3, 3, [i as f32 / 255.0, 0.0, 0.0, 1.0]);
        FsCodec
            .save(
                &image,
                &dir.join(format!("{}.png", i)),
                SaveOptions::new(ImageFormat::Png, true),
            )
            .unwrap();
    }
}

fn settings(columns: u32, rows: u32, cell: u32) -> SpriteSheetSettings {
    SpriteSheetSettings {
        columns,
        rows,
        cell_width: cell,
        cell_height: cell,
        use_alpha: true,
        ..Default::default()
    }
}

fn run_batch(settings: SpriteSheetSettings, root: &Path) -> Vec<PathBuf> {
    let mut job = SpriteBatchJob::new(settings, root, &FsCodec).unwrap();
    assert_eq!(run_to_completion(&mut job), JobStatus::Finished);
    job.into_summary().generated.paths().map(Path::to_path_buf).collect()
}

/// Frame number stored in the red channel of a sheet pixel.
fn frame_at(sheet: &PixelBuffer, x: u32, y: u32) -> u32 {
    (sheet.pixel(x, y)[0] * 255.0).round() as u32
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_sheet_dimensions_and_cell_positions() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(root.path(), 5);

    let paths = run_batch(settings(3, 2, 4), root.path());
    assert_eq!(paths.len(), 1);

    let sheet = FsCodec.load(&paths[0]).unwrap();
    assert_eq!((sheet.width, sheet.height), (12, 8));

    // Frame k sits at (k mod C * W, H_sheet - (k div C + 1) * H).
    for k in 0..5u32 {
        let x = (k % 3) * 4;
        let y = 8 - (k / 3 + 1) * 4;
        assert_eq!(frame_at(&sheet, x, y), k + 1, "frame {}", k);
        assert_eq!(frame_at(&sheet, x + 3, y + 3), k + 1, "frame {}", k);
    }
    // Sixth cell is empty.
    assert_eq!(sheet.pixel(8, 0), [0.0; 4]);
}

#[test]
fn test_overflow_keeps_first_cells() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(root.path(), 9);

    let paths = run_batch(settings(2, 2, 2), root.path());
    let sheet = FsCodec.load(&paths[0]).unwrap();
    assert_eq!(frame_at(&sheet, 0, 2), 1);
    assert_eq!(frame_at(&sheet, 2, 2), 2);
    assert_eq!(frame_at(&sheet, 0, 0), 3);
    assert_eq!(frame_at(&sheet, 2, 0), 4);
}

#[test]
fn test_frame_range_selects_files() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(root.path(), 10);

    let mut s = settings(5, 1, 1);
    s.start_frame = 3;
    s.end_frame = 7;
    let paths = run_batch(s, root.path());
    let sheet = FsCodec.load(&paths[0]).unwrap();
    let frames: Vec<u32> = (0..5).map(|x| frame_at(&sheet, x, 0)).collect();
    assert_eq!(frames, vec![3, 4, 5, 6, 7]);
}

#[test]
fn test_reversed_sheet_name_and_order() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(root.path(), 3);

    let mut s = settings(3, 1, 1);
    s.reversed = true;
    s.file_name = "hero".to_string();
    let paths = run_batch(s, root.path());
    assert_eq!(paths[0], root.path().join("hero_Reversed.png"));

    let sheet = FsCodec.load(&paths[0]).unwrap();
    let frames: Vec<u32> = (0..3).map(|x| frame_at(&sheet, x, 0)).collect();
    assert_eq!(frames, vec![3, 2, 1]);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_overwrite_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(&root.path().join("walk"), 4);

    let first = run_batch(settings(2, 2, 4), root.path());
    let bytes_first = std::fs::read(&first[0]).unwrap();
    let second = run_batch(settings(2, 2, 4), root.path());
    let bytes_second = std::fs::read(&second[0]).unwrap();

    assert_eq!(first, second);
    assert_eq!(bytes_first, bytes_second);
}

#[test]
fn test_flat_directory_rerun_ignores_its_own_sheet() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(root.path(), 3);

    let mut placed = Vec::new();
    let mut bytes = Vec::new();
    for _ in 0..2 {
        let mut job = SpriteBatchJob::new(settings(2, 2, 4), root.path(), &FsCodec).unwrap();
        assert_eq!(run_to_completion(&mut job), JobStatus::Finished);
        let summary = job.into_summary();
        placed.push(summary.sheets[0].placed);
        bytes.push(std::fs::read(&summary.sheets[0].image.path).unwrap());
    }

    assert_eq!(placed, vec![3, 3]);
    assert_eq!(bytes[0], bytes[1]);
}

#[test]
fn test_failed_save_keeps_existing_sheet() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(&root.path().join("walk"), 2);
    let existing = root.path().join("walk_sprite_sheet.dpx");
    std::fs::write(&existing, b"previous sheet").unwrap();

    let mut s = settings(2, 1, 2);
    s.image_format = ImageFormat::Dpx;
    let mut job = SpriteBatchJob::new(s, root.path(), &FsCodec).unwrap();
    assert_eq!(run_to_completion(&mut job), JobStatus::Finished);
    let summary = job.into_summary();

    assert!(summary.sheets.is_empty());
    assert_eq!(summary.reports.error_count(), 1);
    assert_eq!(std::fs::read(&existing).unwrap(), b"previous sheet");
}

#[test]
fn test_without_overwrite_numbers_new_files() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(&root.path().join("walk"), 2);

    let mut s = settings(2, 1, 2);
    s.overwrite = false;
    s.file_name = "name".to_string();
    let mut names = Vec::new();
    for _ in 0..3 {
        let paths = run_batch(s.clone(), root.path());
        names.push(paths[0].file_name().unwrap().to_string_lossy().into_owned());
    }
    assert_eq!(names, vec!["name.png", "name (1).png", "name (2).png"]);
}

#[test]
fn test_other_formats_written() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(&root.path().join("walk"), 2);

    let mut s = settings(2, 1, 2);
    s.image_format = ImageFormat::Tga;
    let paths = run_batch(s, root.path());
    assert_eq!(paths[0], root.path().join("walk_sprite_sheet.tga"));
    assert!(paths[0].exists());
}

// ============================================================================
// Host-rendered sources
// ============================================================================

struct FlatHost {
    tracks: Vec<Track>,
    output: RenderOutput,
    resolution: RenderResolution,
}

impl FlatHost {
    fn new() -> Self {
        Self {
            tracks: vec![Track::new("hero", 1)],
            output: RenderOutput {
                filepath: PathBuf::from("//render/"),
                format: ImageFormat::OpenExr,
            },
            resolution: RenderResolution {
                width: 1920,
                height: 1080,
                percentage: 100,
            },
        }
    }
}

impl TimelineHost for FlatHost {
    fn tracks(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    fn set_track_muted(&mut self, index: usize, muted: bool) {
        self.tracks[index].muted = muted;
    }

    fn set_frame(&mut self, _frame: i32) {}

    fn render_output(&self) -> RenderOutput {
        self.output.clone()
    }

    fn set_render_output(&mut self, output: RenderOutput) {
        self.output = output;
    }

    fn resolution(&self) -> RenderResolution {
        self.resolution
    }

    fn set_resolution(&mut self, resolution: RenderResolution) {
        self.resolution = resolution;
    }

    fn render_still(&mut self) -> SpriteResult<()> {
        let image = PixelBuffer::filled(
            self.resolution.width.min(8),
            self.resolution.height.min(8),
            [0.5, 0.5, 0.5, 1.0],
        );
        FsCodec
            .save(&image, &self.output.filepath, SaveOptions::new(self.output.format, true))
            .map(|_| ())
    }
}

#[test]
fn test_sequencer_sheet() {
    let out = tempfile::tempdir().unwrap();
    let mut s = settings(2, 2, 4);
    s.source_type = SourceType::Vse;
    s.vse_output_path = out.path().to_path_buf();
    s.start_frame = 1;
    s.end_frame = 4;

    let mut host = FlatHost::new();
    let summary = run_sprite_sheet(&mut host, &s, &FsCodec);
    assert_eq!(summary.status, JobStatus::Finished);
    assert_eq!(summary.sheets.len(), 1);
    assert_eq!(summary.sheets[0].placed, 4);
    assert_eq!(
        summary.sheets[0].image.path,
        out.path().join("VSE_sprite_sheet.png")
    );
    assert_eq!(host.output.format, ImageFormat::OpenExr);
}

#[test]
fn test_compositor_sheet_clears_rendered_frames() {
    let out = tempfile::tempdir().unwrap();
    let mut s = settings(2, 1, 4);
    s.source_type = SourceType::Compositor;
    s.compositor_output_path = out.path().to_path_buf();
    s.start_frame = 1;
    s.end_frame = 2;
    s.clear_generated_images = true;

    let mut host = FlatHost::new();
    let summary = run_sprite_sheet(&mut host, &s, &FsCodec);
    assert_eq!(summary.sheets.len(), 1);
    assert!(!out.path().join("compositor_frame_00001.png").exists());
    assert!(out.path().join("Compositor_sprite_sheet.png").exists());
    assert_eq!(host.resolution.width, 1920);
}

#[test]
fn test_compositor_keeps_frames_when_not_clearing() {
    let out = tempfile::tempdir().unwrap();
    let mut s = settings(2, 1, 4);
    s.source_type = SourceType::Compositor;
    s.compositor_output_path = out.path().to_path_buf();
    s.start_frame = 1;
    s.end_frame = 2;
    s.clear_generated_images = false;

    let mut host = FlatHost::new();
    run_sprite_sheet(&mut host, &s, &FsCodec);
    assert!(out.path().join("compositor_frame_00002.png").exists());
}

#[test]
fn test_oversized_grid_is_reported() {
    let root = tempfile::tempdir().unwrap();
    write_sequence(&root.path().join("walk"), 2);

    let mut s = settings(70_000, 1, 4);
    s.cell_width = 70_000;
    s.directory = root.path().to_path_buf();
    let summary = run_sprite_sheet(&mut FlatHost::new(), &s, &FsCodec);

    assert!(summary.sheets.is_empty());
    assert_eq!(summary.reports.error_count(), 1);
    assert!(!root.path().join("walk_sprite_sheet.png").exists());
}
