//! Host renderer interface used by the timeline and render-pass sources.

use std::path::PathBuf;

use seqbake_spec::ImageFormat;

use crate::error::SpriteResult;

/// A sequencer track as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Track (strip) name.
    pub name: String,
    /// Channel the track sits on.
    pub channel: u32,
    /// Whether the track is muted.
    pub muted: bool,
}

impl Track {
    /// Creates an unmuted track.
    pub fn new(name: impl Into<String>, channel: u32) -> Self {
        Self {
            name: name.into(),
            channel,
            muted: false,
        }
    }

    /// Sets the mute flag.
    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }
}

/// Where and how the host writes rendered stills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    /// Output file path.
    pub filepath: PathBuf,
    /// Output file format.
    pub format: ImageFormat,
}

/// Host render resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderResolution {
    /// Width in pixels at 100 %.
    pub width: u32,
    /// Height in pixels at 100 %.
    pub height: u32,
    /// Resolution scale in percent.
    pub percentage: u32,
}

/// Timeline and renderer operations the frame sources need from the host.
///
/// Setters cannot fail so that saved state can always be put back.
pub trait TimelineHost {
    /// All sequencer tracks, in host order.
    fn tracks(&self) -> Vec<Track>;

    /// Mutes or unmutes the track at `index` (an index into [`TimelineHost::tracks`]).
    fn set_track_muted(&mut self, index: usize, muted: bool);

    /// Moves the timeline to `frame`.
    fn set_frame(&mut self, frame: i32);

    /// Current still output settings.
    fn render_output(&self) -> RenderOutput;

    /// Replaces the still output settings.
    fn set_render_output(&mut self, output: RenderOutput);

    /// Current render resolution.
    fn resolution(&self) -> RenderResolution;

    /// Replaces the render resolution.
    fn set_resolution(&mut self, resolution: RenderResolution);

    /// Renders the current frame and writes it to the configured output.
    fn render_still(&mut self) -> SpriteResult<()>;
}
