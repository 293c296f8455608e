//! Frame source resolution.
//!
//! Turns a directory of numbered images, the host sequencer, or the host
//! compositor into an ordered [`FrameSequence`]. Problems with individual
//! files or frames are reported and skipped; they never abort the sequence.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use seqbake_spec::{FrameRange, ImageFormat, Reports, SortMode, SourceType, SpriteSheetSettings};

use crate::codec::ImageCodec;
use crate::error::SpriteError;
use crate::frame::{Frame, FrameKey, FrameSequence};
use crate::host::{RenderOutput, RenderResolution, TimelineHost};
use crate::naming::{base_name, is_sheet_file};

static TRAILING_DIGITS: OnceLock<Regex> = OnceLock::new();

fn trailing_digits() -> &'static Regex {
    TRAILING_DIGITS.get_or_init(|| Regex::new(r"(\d+)$").expect("invalid regex pattern"))
}

/// Options for a directory sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryOptions {
    /// File ordering.
    pub sort: SortMode,
    /// Reverse after sorting.
    pub reversed: bool,
    /// 1-based inclusive slice of the sorted files.
    pub range: FrameRange,
    /// Custom sheet name. Sheets from earlier runs, under this name or the
    /// directory's default sheet name, are not read as frames.
    pub sheet_name: Option<String>,
}

impl DirectoryOptions {
    /// Options taken from sprite sheet settings.
    pub fn from_settings(settings: &SpriteSheetSettings) -> Self {
        Self {
            sort: settings.sort_mode,
            reversed: settings.reversed,
            range: settings.frame_range(),
            sheet_name: settings.custom_file_name().map(str::to_string),
        }
    }
}

/// Options for a sequencer sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineOptions {
    /// Timeline frames to render.
    pub range: FrameRange,
    /// Reverse after loading.
    pub reversed: bool,
    /// Channel rendered when `use_all_channels` is off.
    pub channel: u32,
    /// Render every unmuted track.
    pub use_all_channels: bool,
}

impl TimelineOptions {
    /// Options taken from sprite sheet settings.
    pub fn from_settings(settings: &SpriteSheetSettings) -> Self {
        Self {
            range: settings.frame_range(),
            reversed: settings.reversed,
            channel: settings.vse_channel,
            use_all_channels: settings.use_all_vse_channels,
        }
    }
}

/// Options for a compositor sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPassOptions {
    /// Timeline frames to render.
    pub range: FrameRange,
    /// Reverse after loading.
    pub reversed: bool,
    /// Forced render width.
    pub cell_width: u32,
    /// Forced render height.
    pub cell_height: u32,
    /// Directory receiving the rendered frames.
    pub output_dir: PathBuf,
}

impl RenderPassOptions {
    /// Options taken from sprite sheet settings.
    pub fn from_settings(settings: &SpriteSheetSettings) -> Self {
        Self {
            range: settings.frame_range(),
            reversed: settings.reversed,
            cell_width: settings.cell_width,
            cell_height: settings.cell_height,
            output_dir: settings.compositor_output_path.clone(),
        }
    }
}

/// Lists the sequences under `root`.
///
/// Every subdirectory is its own sequence, in name order. A directory with
/// no subdirectories is a single sequence.
pub fn discover_sequence_dirs(root: &Path) -> Result<Vec<PathBuf>, SpriteError> {
    let entries = std::fs::read_dir(root).map_err(|source| SpriteError::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }

    if dirs.is_empty() {
        return Ok(vec![root.to_path_buf()]);
    }
    dirs.sort();
    Ok(dirs)
}

/// Ordering key derived from a file name.
///
/// The part before the first dot is parsed as an integer; failing that, the
/// trailing digit run of the stem is used. Files without digits get a
/// name key and sort after numbered files.
pub fn frame_key_for(file_name: &str) -> FrameKey {
    let head = file_name.split('.').next().unwrap_or(file_name);
    if let Ok(n) = head.parse::<i64>() {
        return FrameKey::Number(n);
    }
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    trailing_digits()
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(FrameKey::Number)
        .unwrap_or_else(|| FrameKey::Name(file_name.to_string()))
}

/// Sorts file names in place.
pub fn sort_file_names(names: &mut [String], mode: SortMode) {
    match mode {
        SortMode::Numeric => {
            names.sort_by(|a, b| frame_key_for(a).cmp(&frame_key_for(b)).then_with(|| a.cmp(b)))
        }
        SortMode::AlphabeticalCaseSensitive => names.sort(),
        SortMode::AlphabeticalCaseInsensitive => names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        }),
    }
}

/// Applies a 1-based inclusive range to `items`.
///
/// The range is clamped to `[1, N]`. A start past the end or an end before
/// the start yields nothing and a warning.
pub fn slice_range<T>(mut items: Vec<T>, range: FrameRange, source: &str, reports: &mut Reports) -> Vec<T> {
    let total = items.len();
    let start = range.start.max(1) as usize;
    let end = (range.end as usize).min(total);

    if start > total {
        reports.warning(format!(
            "start frame {} exceeds the number of images ({}) in {}",
            range.start, total, source
        ));
        return Vec::new();
    }
    if end < start {
        reports.warning(format!(
            "end frame {} is before start frame {} in {}",
            range.end, range.start, source
        ));
        return Vec::new();
    }

    items.truncate(end);
    items.drain(..start - 1);
    items
}

fn label_of(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| SourceType::Directory.default_label().to_string())
}

/// Resolves a directory of image files into a sequence.
pub fn resolve_directory<C: ImageCodec + ?Sized>(
    dir: &Path,
    opts: &DirectoryOptions,
    codec: &C,
    reports: &mut Reports,
) -> FrameSequence {
    let label = label_of(dir);
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) => {
            reports.backend_error(&SpriteError::DirectoryUnreadable {
                path: dir.to_path_buf(),
                source,
            });
            return FrameSequence::empty(label, opts.reversed);
        }
    };

    let mut sheet_names = Vec::with_capacity(4);
    for custom in [opts.sheet_name.as_deref(), None] {
        for reversed in [false, true] {
            sheet_names.push(base_name(custom, &label, reversed));
        }
    }
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .map(|ext| !ext.is_empty())
                .unwrap_or(false)
        })
        .filter(|name| !sheet_names.iter().any(|base| is_sheet_file(name, base)))
        .collect();

    if names.is_empty() {
        reports.backend_warning(&SpriteError::NoImages {
            path: dir.to_path_buf(),
        });
        return FrameSequence::empty(label, opts.reversed);
    }

    sort_file_names(&mut names, opts.sort);
    if opts.reversed {
        names.reverse();
    }
    let names = slice_range(names, opts.range, &dir.display().to_string(), reports);

    let mut frames = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        match codec.load(&path) {
            Ok(image) => frames.push(Frame::new(image, frame_key_for(&name)).with_origin(path)),
            Err(e) => reports.backend_warning(&e),
        }
    }
    log::debug!("resolved {} frames from {}", frames.len(), dir.display());

    FrameSequence::new(label, frames, opts.reversed)
}

/// Renders sequencer frames through the host and loads them.
///
/// Stills are written as `vse_frame_NNNNN.png` into `temp_dir`. Track mute
/// flags and the still output settings are restored before returning.
pub fn resolve_timeline<H, C>(
    host: &mut H,
    opts: &TimelineOptions,
    codec: &C,
    temp_dir: &Path,
    reports: &mut Reports,
) -> FrameSequence
where
    H: TimelineHost + ?Sized,
    C: ImageCodec + ?Sized,
{
    let label = SourceType::Vse.default_label();
    let tracks = host.tracks();
    if tracks.is_empty() {
        reports.backend_error(&SpriteError::NoTracks);
        return FrameSequence::empty(label, opts.reversed);
    }

    let selected: Vec<bool> = tracks
        .iter()
        .map(|t| {
            if opts.use_all_channels {
                !t.muted
            } else {
                t.channel == opts.channel
            }
        })
        .collect();
    if !selected.iter().any(|s| *s) {
        let selection = if opts.use_all_channels {
            "any unmuted channel".to_string()
        } else {
            format!("channel {}", opts.channel)
        };
        reports.backend_error(&SpriteError::NoMatchingTracks { selection });
        return FrameSequence::empty(label, opts.reversed);
    }

    // Rendering every unmuted track leaves mute flags untouched.
    if !opts.use_all_channels {
        for (index, keep) in selected.iter().enumerate() {
            host.set_track_muted(index, !keep);
        }
    }
    let saved_output = host.render_output();

    let mut frames = render_frames(host, codec, opts.range, temp_dir, "vse_frame", reports);

    host.set_render_output(saved_output);
    if !opts.use_all_channels {
        for (index, track) in tracks.iter().enumerate() {
            host.set_track_muted(index, track.muted);
        }
    }

    if opts.reversed {
        frames.reverse();
    }
    FrameSequence::new(label, frames, opts.reversed)
}

/// Renders compositor frames at the sheet's cell size and loads them.
///
/// Stills are written as `compositor_frame_NNNNN.png` into the configured
/// output directory. The render resolution and still output settings are
/// restored before returning.
pub fn resolve_render_pass<H, C>(
    host: &mut H,
    opts: &RenderPassOptions,
    codec: &C,
    reports: &mut Reports,
) -> FrameSequence
where
    H: TimelineHost + ?Sized,
    C: ImageCodec + ?Sized,
{
    let label = SourceType::Compositor.default_label();
    if let Err(source) = std::fs::create_dir_all(&opts.output_dir) {
        reports.backend_error(&SpriteError::CreateOutputDir {
            path: opts.output_dir.clone(),
            source,
        });
        return FrameSequence::empty(label, opts.reversed);
    }

    let saved_output = host.render_output();
    let saved_resolution = host.resolution();
    host.set_resolution(RenderResolution {
        width: opts.cell_width,
        height: opts.cell_height,
        percentage: 100,
    });

    let mut frames = render_frames(
        host,
        codec,
        opts.range,
        &opts.output_dir,
        "compositor_frame",
        reports,
    );

    host.set_render_output(saved_output);
    host.set_resolution(saved_resolution);

    if opts.reversed {
        frames.reverse();
    }
    FrameSequence::new(label, frames, opts.reversed)
}

fn render_frames<H, C>(
    host: &mut H,
    codec: &C,
    range: FrameRange,
    dir: &Path,
    prefix: &str,
    reports: &mut Reports,
) -> Vec<Frame>
where
    H: TimelineHost + ?Sized,
    C: ImageCodec + ?Sized,
{
    let mut frames = Vec::with_capacity(range.len());
    for frame in range.frames() {
        let frame = frame as i32;
        let path = dir.join(format!("{}_{:05}.png", prefix, frame));

        host.set_frame(frame);
        host.set_render_output(RenderOutput {
            filepath: path.clone(),
            format: ImageFormat::Png,
        });
        if let Err(e) = host.render_still() {
            reports.backend_warning(&SpriteError::render_failed(frame, e.to_string()));
            continue;
        }
        if !path.exists() {
            reports.backend_warning(&SpriteError::render_failed(frame, "no image was written"));
            continue;
        }

        match codec.load(&path) {
            Ok(image) => {
                frames.push(Frame::new(image, FrameKey::Number(frame as i64)).with_origin(path))
            }
            Err(e) => reports.backend_warning(&e),
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{FsCodec, SaveOptions};
    use crate::error::SpriteResult;
    use crate::frame::PixelBuffer;
    use crate::host::Track;
    use pretty_assertions::assert_eq;

    fn write_png(dir: &Path, name: &str, value: f32) {
        let image = PixelBuffer::filled(2, 2, [value, value, value, 1.0]);
        FsCodec
            .save(&image, &dir.join(name), SaveOptions::new(ImageFormat::Png, true))
            .unwrap();
    }

    fn numbers(seq: &FrameSequence) -> Vec<i64> {
        seq.frames.iter().filter_map(|f| f.key.number()).collect()
    }

    #[test]
    fn test_frame_keys() {
        assert_eq!(frame_key_for("12.png"), FrameKey::Number(12));
        assert_eq!(frame_key_for("0003.exr"), FrameKey::Number(3));
        assert_eq!(frame_key_for("walk_0007.png"), FrameKey::Number(7));
        assert_eq!(frame_key_for("cover.png"), FrameKey::Name("cover.png".into()));
    }

    #[test]
    fn test_numeric_sort_is_not_lexical() {
        let mut names: Vec<String> = ["10.png", "2.png", "1.png", "b.png", "a.png"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_file_names(&mut names, SortMode::Numeric);
        assert_eq!(names, vec!["1.png", "2.png", "10.png", "a.png", "b.png"]);
    }

    #[test]
    fn test_alphabetical_sorts() {
        let mut names: Vec<String> = ["b.png", "A.png", "a.png", "B.png"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_file_names(&mut names, SortMode::AlphabeticalCaseSensitive);
        assert_eq!(names, vec!["A.png", "B.png", "a.png", "b.png"]);
        sort_file_names(&mut names, SortMode::AlphabeticalCaseInsensitive);
        assert_eq!(names, vec!["A.png", "a.png", "B.png", "b.png"]);
    }

    #[test]
    fn test_slice_range_clamps() {
        let mut reports = Reports::new();
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(
            slice_range(items.clone(), FrameRange::new(3, 7), "x", &mut reports),
            vec![3, 4, 5, 6, 7]
        );
        assert_eq!(
            slice_range(items.clone(), FrameRange::new(8, 64), "x", &mut reports),
            vec![8, 9, 10]
        );
        assert!(reports.is_empty());

        assert!(slice_range(items.clone(), FrameRange::new(11, 20), "x", &mut reports).is_empty());
        assert!(slice_range(items, FrameRange::new(5, 4), "x", &mut reports).is_empty());
        assert_eq!(reports.warning_count(), 2);
    }

    #[test]
    fn test_discover_sequence_dirs() {
        let root = tempfile::tempdir().unwrap();
        assert_eq!(
            discover_sequence_dirs(root.path()).unwrap(),
            vec![root.path().to_path_buf()]
        );

        std::fs::create_dir(root.path().join("walk")).unwrap();
        std::fs::create_dir(root.path().join("idle")).unwrap();
        std::fs::write(root.path().join("notes.txt"), "x").unwrap();
        assert_eq!(
            discover_sequence_dirs(root.path()).unwrap(),
            vec![root.path().join("idle"), root.path().join("walk")]
        );

        assert!(discover_sequence_dirs(&root.path().join("missing")).is_err());
    }

    #[test]
    fn test_resolve_directory_range_and_order() {
        let dir = tempfile::tempdir().unwrap();
        for i in 1..=10 {
            write_png(dir.path(), &format!("{}.png", i), i as f32 / 10.0);
        }
        let opts = DirectoryOptions {
            sort: SortMode::Numeric,
            reversed: false,
            range: FrameRange::new(3, 7),
            sheet_name: None,
        };
        let mut reports = Reports::new();
        let seq = resolve_directory(dir.path(), &opts, &FsCodec, &mut reports);
        assert_eq!(numbers(&seq), vec![3, 4, 5, 6, 7]);
        assert!(reports.is_empty());
    }

    #[test]
    fn test_resolve_directory_reverses_before_slicing() {
        let dir = tempfile::tempdir().unwrap();
        for i in 1..=5 {
            write_png(dir.path(), &format!("{}.png", i), 0.5);
        }
        let opts = DirectoryOptions {
            sort: SortMode::Numeric,
            reversed: true,
            range: FrameRange::new(1, 2),
            sheet_name: None,
        };
        let mut reports = Reports::new();
        let seq = resolve_directory(dir.path(), &opts, &FsCodec, &mut reports);
        assert_eq!(numbers(&seq), vec![5, 4]);
        assert!(seq.reversed);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "1.png", 0.5);
        std::fs::write(dir.path().join("2.png"), b"not a png").unwrap();
        write_png(dir.path(), "3.png", 0.5);
        let opts = DirectoryOptions {
            sort: SortMode::Numeric,
            reversed: false,
            range: FrameRange::new(1, 64),
            sheet_name: None,
        };
        let mut reports = Reports::new();
        let seq = resolve_directory(dir.path(), &opts, &FsCodec, &mut reports);
        assert_eq!(numbers(&seq), vec![1, 3]);
        assert_eq!(reports.warning_count(), 1);
    }

    #[test]
    fn test_missing_and_empty_directories() {
        let dir = tempfile::tempdir().unwrap();
        let opts = DirectoryOptions {
            sort: SortMode::Numeric,
            reversed: false,
            range: FrameRange::new(1, 64),
            sheet_name: None,
        };

        let mut reports = Reports::new();
        let seq = resolve_directory(dir.path(), &opts, &FsCodec, &mut reports);
        assert!(seq.is_empty());
        assert_eq!(reports.warning_count(), 1);

        let mut reports = Reports::new();
        let seq = resolve_directory(&dir.path().join("gone"), &opts, &FsCodec, &mut reports);
        assert!(seq.is_empty());
        assert_eq!(reports.error_count(), 1);
    }

    #[test]
    fn test_earlier_sheets_are_not_frames() {
        let dir = tempfile::tempdir().unwrap();
        let label = dir.path().file_name().unwrap().to_string_lossy().into_owned();
        for i in 1..=3 {
            write_png(dir.path(), &format!("{}.png", i), 0.5);
        }
        write_png(dir.path(), &format!("{}_sprite_sheet.png", label), 0.5);
        write_png(dir.path(), &format!("{}_sprite_sheet_Reversed (2).png", label), 0.5);
        write_png(dir.path(), "hero (1).png", 0.5);
        let opts = DirectoryOptions {
            sort: SortMode::Numeric,
            reversed: false,
            range: FrameRange::new(1, 64),
            sheet_name: Some("hero".to_string()),
        };
        let mut reports = Reports::new();
        let seq = resolve_directory(dir.path(), &opts, &FsCodec, &mut reports);
        assert_eq!(seq.len(), 3);
        assert_eq!(numbers(&seq), vec![1, 2, 3]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_frames_are_read() {
        let store = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        write_png(store.path(), "real.png", 0.5);
        write_png(dir.path(), "1.png", 0.5);
        std::os::unix::fs::symlink(store.path().join("real.png"), dir.path().join("2.png"))
            .unwrap();
        let opts = DirectoryOptions {
            sort: SortMode::Numeric,
            reversed: false,
            range: FrameRange::new(1, 64),
            sheet_name: None,
        };
        let mut reports = Reports::new();
        let seq = resolve_directory(dir.path(), &opts, &FsCodec, &mut reports);
        assert_eq!(numbers(&seq), vec![1, 2]);
    }

    /// Host that writes a flat still for every render and records its state.
    struct MockTimeline {
        tracks: Vec<Track>,
        frame: i32,
        output: RenderOutput,
        resolution: RenderResolution,
        fail_frames: Vec<i32>,
        rendered: Vec<(i32, Vec<bool>, RenderResolution)>,
    }

    impl MockTimeline {
        fn new(tracks: Vec<Track>) -> Self {
            Self {
                tracks,
                frame: 0,
                output: RenderOutput {
                    filepath: PathBuf::from("/render/out_"),
                    format: ImageFormat::Jpeg,
                },
                resolution: RenderResolution {
                    width: 1920,
                    height: 1080,
                    percentage: 50,
                },
                fail_frames: Vec::new(),
                rendered: Vec::new(),
            }
        }
    }

    impl TimelineHost for MockTimeline {
        fn tracks(&self) -> Vec<Track> {
            self.tracks.clone()
        }

        fn set_track_muted(&mut self, index: usize, muted: bool) {
            self.tracks[index].muted = muted;
        }

        fn set_frame(&mut self, frame: i32) {
            self.frame = frame;
        }

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
            if self.fail_frames.contains(&self.frame) {
                return Err(SpriteError::Host("render crashed".into()));
            }
            let mutes = self.tracks.iter().map(|t| t.muted).collect();
            self.rendered.push((self.frame, mutes, self.resolution));
            let image = PixelBuffer::filled(4, 4, [0.25, 0.5, 0.75, 1.0]);
            FsCodec.save(&image, &self.output.filepath, SaveOptions::new(self.output.format, true))?;
            Ok(())
        }
    }

    fn timeline_opts(start: u32, end: u32) -> TimelineOptions {
        TimelineOptions {
            range: FrameRange::new(start, end),
            reversed: false,
            channel: 2,
            use_all_channels: false,
        }
    }

    #[test]
    fn test_timeline_mutes_other_channels_and_restores() {
        let temp = tempfile::tempdir().unwrap();
        let mut host = MockTimeline::new(vec![
            Track::new("bg", 1),
            Track::new("hero", 2),
            Track::new("fx", 3).muted(true),
        ]);
        let mut reports = Reports::new();
        let seq = resolve_timeline(&mut host, &timeline_opts(1, 3), &FsCodec, temp.path(), &mut reports);

        assert_eq!(numbers(&seq), vec![1, 2, 3]);
        assert_eq!(seq.label, "VSE");
        for (_, mutes, _) in &host.rendered {
            assert_eq!(mutes, &vec![true, false, true]);
        }
        assert!(temp.path().join("vse_frame_00002.png").exists());

        // State restored
        assert_eq!(
            host.tracks.iter().map(|t| t.muted).collect::<Vec<_>>(),
            vec![false, false, true]
        );
        assert_eq!(host.output.filepath, PathBuf::from("/render/out_"));
        assert_eq!(host.output.format, ImageFormat::Jpeg);
    }

    #[test]
    fn test_timeline_all_channels_keeps_mutes() {
        let temp = tempfile::tempdir().unwrap();
        let mut host = MockTimeline::new(vec![Track::new("a", 1), Track::new("b", 4).muted(true)]);
        let opts = TimelineOptions {
            use_all_channels: true,
            reversed: true,
            ..timeline_opts(1, 2)
        };
        let mut reports = Reports::new();
        let seq = resolve_timeline(&mut host, &opts, &FsCodec, temp.path(), &mut reports);
        assert_eq!(numbers(&seq), vec![2, 1]);
        assert_eq!(host.rendered[0].1, vec![false, true]);
    }

    #[test]
    fn test_timeline_without_tracks() {
        let temp = tempfile::tempdir().unwrap();
        let mut reports = Reports::new();

        let mut host = MockTimeline::new(Vec::new());
        let seq = resolve_timeline(&mut host, &timeline_opts(1, 3), &FsCodec, temp.path(), &mut reports);
        assert!(seq.is_empty());

        let mut host = MockTimeline::new(vec![Track::new("bg", 1)]);
        let seq = resolve_timeline(&mut host, &timeline_opts(1, 3), &FsCodec, temp.path(), &mut reports);
        assert!(seq.is_empty());
        assert!(host.rendered.is_empty());

        let codes: Vec<_> = reports
            .entries()
            .iter()
            .filter_map(|e| e.code.clone())
            .collect();
        assert_eq!(codes, vec!["SPRITE_008", "SPRITE_009"]);
    }

    #[test]
    fn test_failed_render_is_skipped() {
        let temp = tempfile::tempdir().unwrap();
        let mut host = MockTimeline::new(vec![Track::new("hero", 2)]);
        host.fail_frames = vec![2];
        let mut reports = Reports::new();
        let seq = resolve_timeline(&mut host, &timeline_opts(1, 3), &FsCodec, temp.path(), &mut reports);
        assert_eq!(numbers(&seq), vec![1, 3]);
        assert_eq!(reports.warning_count(), 1);
    }

    #[test]
    fn test_render_pass_forces_cell_resolution() {
        let out = tempfile::tempdir().unwrap();
        let frames_dir = out.path().join("comp");
        let mut host = MockTimeline::new(vec![Track::new("bg", 1)]);
        let opts = RenderPassOptions {
            range: FrameRange::new(5, 6),
            reversed: false,
            cell_width: 64,
            cell_height: 32,
            output_dir: frames_dir.clone(),
        };
        let mut reports = Reports::new();
        let seq = resolve_render_pass(&mut host, &opts, &FsCodec, &mut reports);

        assert_eq!(numbers(&seq), vec![5, 6]);
        assert_eq!(seq.label, "Compositor");
        assert!(frames_dir.join("compositor_frame_00005.png").exists());
        for (_, _, resolution) in &host.rendered {
            assert_eq!(
                *resolution,
                RenderResolution {
                    width: 64,
                    height: 32,
                    percentage: 100
                }
            );
        }
        assert_eq!(host.resolution.width, 1920);
        assert_eq!(host.resolution.percentage, 50);
        assert_eq!(host.output.format, ImageFormat::Jpeg);
    }
}
