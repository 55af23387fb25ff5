//! Playback engine for gmtune-core.
//!
//! The frame driver talks to music backends through the [`Engine`]
//! capability trait: render one chunk of audio, move between tracks, toggle
//! pause, and report metadata for the panel. Backends live in submodules
//! (`xm`, `wav`, `qoa`); all of them decode the whole file up front and feed
//! a shared [`PcmEngine`], so per-frame rendering is a bounded memcpy.

pub mod qoa;
pub mod wav;
pub mod xm;

use std::fmt;

/// Output sample rate advertised to the frontend.
pub const SAMPLE_RATE: u32 = 44100;

/// Stereo frames rendered per video frame (44100 Hz / 60 fps).
pub const FRAMES_PER_RUN: usize = (SAMPLE_RATE as usize) / 60;

/// Interleaved i16 samples per video frame.
pub const SAMPLES_PER_RUN: usize = FRAMES_PER_RUN * 2;

/// Longest metadata line kept, in bytes.
pub const META_MAX_BYTES: usize = 100;

/// A bounded-length metadata string.
///
/// Construction truncates at [`META_MAX_BYTES`], backing off to the nearest
/// char boundary, so the UI never has to defend against oversized input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetaLine(String);

impl MetaLine {
    pub fn new(s: &str) -> Self {
        if s.len() <= META_MAX_BYTES {
            return Self(s.to_owned());
        }
        let mut end = META_MAX_BYTES;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        Self(s[..end].to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetaLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability interface the frame driver depends on.
///
/// Close is `Drop`; open is each backend's constructor (see `crate::loader`).
pub trait Engine {
    /// Fill `out` with the next interleaved stereo i16 samples. Past the end
    /// of the track, or while paused, the remainder is silence.
    fn render(&mut self, out: &mut [i16]);

    /// Jump to the previous track, or restart the first one.
    fn prev_track(&mut self);

    /// Jump to the next track, or restart the last one.
    fn next_track(&mut self);

    fn toggle_pause(&mut self);

    /// Seek the current track back to its beginning.
    fn restart(&mut self);

    fn paused(&self) -> bool;

    fn title(&self) -> MetaLine;

    fn track_count(&self) -> usize;

    /// Zero-based index of the current track.
    fn current_track(&self) -> usize;

    fn song_name(&self) -> MetaLine;

    /// Stereo frames played so far on the current track.
    fn elapsed_frames(&self) -> u64;
}

/// Format an elapsed position as `m:ss`.
pub fn format_position(elapsed_frames: u64, sample_rate: u32) -> String {
    let seconds = elapsed_frames / sample_rate.max(1) as u64;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// One decoded track: a name and interleaved stereo PCM.
pub struct PcmTrack {
    pub name: MetaLine,
    pub pcm_stereo: Vec<i16>,
}

/// Shared playback over fully decoded PCM tracks.
pub struct PcmEngine {
    title: MetaLine,
    tracks: Vec<PcmTrack>,
    current: usize,
    cursor_frames: usize,
    paused: bool,
}

impl PcmEngine {
    /// `tracks` must be non-empty; backends always produce at least one.
    pub fn new(title: MetaLine, tracks: Vec<PcmTrack>) -> Self {
        debug_assert!(!tracks.is_empty());
        Self {
            title,
            tracks,
            current: 0,
            cursor_frames: 0,
            paused: false,
        }
    }
}

impl Engine for PcmEngine {
    fn render(&mut self, out: &mut [i16]) {
        out.fill(0);
        if self.paused {
            return;
        }
        let pcm = &self.tracks[self.current].pcm_stereo;
        let total_frames = pcm.len() / 2;
        let want_frames = out.len() / 2;
        let have_frames = total_frames
            .saturating_sub(self.cursor_frames)
            .min(want_frames);
        let start = self.cursor_frames * 2;
        out[..have_frames * 2].copy_from_slice(&pcm[start..start + have_frames * 2]);
        self.cursor_frames += have_frames;
    }

    fn prev_track(&mut self) {
        self.current = self.current.saturating_sub(1);
        self.cursor_frames = 0;
    }

    fn next_track(&mut self) {
        if self.current + 1 < self.tracks.len() {
            self.current += 1;
        }
        self.cursor_frames = 0;
    }

    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    fn restart(&mut self) {
        self.cursor_frames = 0;
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn title(&self) -> MetaLine {
        self.title.clone()
    }

    fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn current_track(&self) -> usize {
        self.current
    }

    fn song_name(&self) -> MetaLine {
        self.tracks[self.current].name.clone()
    }

    fn elapsed_frames(&self) -> u64 {
        self.cursor_frames as u64
    }
}
