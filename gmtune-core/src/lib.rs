//! gmtune-core: a libretro core that plays chiptune/game-music files and
//! renders a "now playing" panel.
//!
//! The frontend owns the event loop; this core reacts to one `on_run` call
//! per frame:
//! 1. poll the joypad and compute the rising-edge set
//! 2. dispatch edge-triggered playback commands to the music engine
//! 3. clear the framebuffer and compose the panel
//! 4. upload exactly one 320x240 RGB565 video frame
//! 5. upload exactly one batch of decoded audio (735 stereo frames)
//!
//! Music backends live behind the `player::Engine` trait; the loader picks
//! one by sniffing the ROM bytes.

pub mod gfx;
pub mod input;
pub mod loader;
pub mod player;

use gfx::Surface;
use gfx::ui::{self, NowPlaying};
use input::Command;
use libretro_backend::{
    AudioVideoInfo, Core, CoreInfo, GameData, LoadGameResult, PixelFormat, RuntimeHandle,
    libretro_core,
};
use player::{Engine, MetaLine, SAMPLE_RATE, SAMPLES_PER_RUN};

const SCREEN_WIDTH: u32 = 320;
const SCREEN_HEIGHT: u32 = 240;
const FRAME_RATE: f64 = 60.0;

/// The libretro core instance.
///
/// All mutable state lives here, owned by the frontend's core handle; there
/// are no globals. `engine: None` is the Idle state, `Some` is Playing.
pub struct GmtuneCore {
    surface: Surface,
    audio: Vec<i16>,
    engine: Option<Box<dyn Engine>>,
    prev_input: u16,
    frame: u64,
    game_data: Option<GameData>,
}

impl Default for GmtuneCore {
    fn default() -> Self {
        Self {
            surface: Surface::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            audio: vec![0i16; SAMPLES_PER_RUN],
            engine: None,
            prev_input: 0,
            frame: 0,
            game_data: None,
        }
    }
}

fn now_playing(engine: &dyn Engine) -> NowPlaying {
    NowPlaying {
        title: engine.title(),
        track: MetaLine::new(&format!(
            "Track {}/{}",
            engine.current_track() + 1,
            engine.track_count()
        )),
        song: engine.song_name(),
        position: MetaLine::new(&player::format_position(
            engine.elapsed_frames(),
            SAMPLE_RATE,
        )),
    }
}

impl GmtuneCore {
    /// Try to bring up a playback engine for the given ROM bytes.
    ///
    /// On failure the core stays in its previous state: no engine is
    /// replaced, nothing is allocated for the failed attempt.
    fn load_bytes(&mut self, bytes: &[u8], path: Option<&str>) -> bool {
        match loader::open_engine(bytes, path, SAMPLE_RATE) {
            Ok(engine) => {
                self.engine = Some(engine);
                self.prev_input = 0;
                self.frame = 0;
                true
            }
            Err(err) => {
                log::warn!("load failed: {err}");
                false
            }
        }
    }

    /// Drop the engine. Idempotent; a second unload is a no-op.
    fn unload(&mut self) {
        self.engine = None;
    }

    /// One frame of work, minus the libretro callbacks: input dispatch,
    /// framebuffer composition and audio rendering.
    fn step(&mut self, held: u16) {
        let edge_bits = input::edges(self.prev_input, held);
        self.prev_input = held;

        self.surface.clear();
        self.audio.fill(0);

        if let Some(engine) = self.engine.as_mut() {
            for command in input::commands(edge_bits) {
                match command {
                    Command::PrevTrack => engine.prev_track(),
                    Command::NextTrack => engine.next_track(),
                    Command::TogglePause => engine.toggle_pause(),
                }
            }
            self.frame += 1;

            let now = now_playing(&**engine);
            ui::draw_panel(&mut self.surface, self.frame, &now);
            engine.render(&mut self.audio);
        }
    }
}

impl Core for GmtuneCore {
    fn save_memory(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn rtc_memory(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn system_memory(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn video_memory(&mut self) -> Option<&mut [u8]> {
        None
    }

    fn info() -> CoreInfo {
        CoreInfo::new("gmtune", env!("CARGO_PKG_VERSION"))
            .supports_roms_with_extension("xm")
            .supports_roms_with_extension("wav")
            .supports_roms_with_extension("qoa")
    }

    fn on_load_game(&mut self, game_data: GameData) -> LoadGameResult {
        self.game_data = Some(game_data);

        // The data blob is required (no fullpath loading); copy it out so the
        // loader can borrow the core mutably.
        let (bytes, path) = {
            let gd = self.game_data.as_ref().unwrap();
            (gd.data().map(<[u8]>::to_vec), gd.path().map(str::to_owned))
        };

        let loaded = match bytes {
            Some(bytes) if !bytes.is_empty() => self.load_bytes(&bytes, path.as_deref()),
            _ => false,
        };

        if loaded {
            LoadGameResult::Success(
                AudioVideoInfo::new()
                    .video(SCREEN_WIDTH, SCREEN_HEIGHT, FRAME_RATE, PixelFormat::RGB565)
                    .audio(SAMPLE_RATE as f64),
            )
        } else {
            LoadGameResult::Failed(self.game_data.take().unwrap())
        }
    }

    fn on_unload_game(&mut self) -> GameData {
        self.unload();
        self.game_data.take().unwrap()
    }

    fn on_run(&mut self, handle: &mut RuntimeHandle) {
        let held = input::poll_joypad(handle);
        self.step(held);

        handle.upload_video_frame(self.surface.as_bytes());
        handle.upload_audio_frame(&self.audio);
    }

    fn on_reset(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.restart();
        }
    }
}

libretro_core!(GmtuneCore);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const L1_BIT: u16 = 1 << 10;
    const R1_BIT: u16 = 1 << 11;
    const START_BIT: u16 = 1 << 3;

    /// Scripted engine that records every dispatched command.
    struct ScriptedEngine {
        log: Rc<RefCell<Vec<&'static str>>>,
        paused: bool,
    }

    impl ScriptedEngine {
        fn install(core: &mut GmtuneCore) -> Rc<RefCell<Vec<&'static str>>> {
            let log = Rc::new(RefCell::new(Vec::new()));
            core.engine = Some(Box::new(ScriptedEngine {
                log: log.clone(),
                paused: false,
            }));
            log
        }
    }

    impl Engine for ScriptedEngine {
        fn render(&mut self, out: &mut [i16]) {
            out.fill(42);
        }
        fn prev_track(&mut self) {
            self.log.borrow_mut().push("prev");
        }
        fn next_track(&mut self) {
            self.log.borrow_mut().push("next");
        }
        fn toggle_pause(&mut self) {
            self.paused = !self.paused;
            self.log.borrow_mut().push("toggle");
        }
        fn restart(&mut self) {
            self.log.borrow_mut().push("restart");
        }
        fn paused(&self) -> bool {
            self.paused
        }
        fn title(&self) -> MetaLine {
            MetaLine::new("Scripted")
        }
        fn track_count(&self) -> usize {
            3
        }
        fn current_track(&self) -> usize {
            0
        }
        fn song_name(&self) -> MetaLine {
            MetaLine::new("song")
        }
        fn elapsed_frames(&self) -> u64 {
            0
        }
    }

    fn wav_fixture() -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut bytes, spec).expect("wav header");
            for s in 0..4410i16 {
                writer.write_sample(s).expect("sample");
                writer.write_sample(-s).expect("sample");
            }
            writer.finalize().expect("finalize");
        }
        bytes.into_inner()
    }

    #[test]
    fn frame_output_shape_is_fixed() {
        let mut core = GmtuneCore::default();
        core.load_bytes(&wav_fixture(), Some("fixture.wav"));
        core.step(0);

        assert_eq!(
            core.surface.as_bytes().len(),
            (SCREEN_WIDTH * SCREEN_HEIGHT * gfx::BYTES_PER_PIXEL) as usize
        );
        assert_eq!(core.surface.pitch(), SCREEN_WIDTH * gfx::BYTES_PER_PIXEL);
        assert_eq!(core.audio.len(), SAMPLES_PER_RUN);
    }

    #[test]
    fn empty_data_fails_and_leaves_state_unchanged() {
        let mut core = GmtuneCore::default();
        assert!(!core.load_bytes(&[], None));
        assert!(core.engine.is_none());

        // Same while Playing: the engine survives a failed load attempt.
        assert!(core.load_bytes(&wav_fixture(), None));
        assert!(!core.load_bytes(b"garbage", None));
        assert!(core.engine.is_some());
    }

    #[test]
    fn unload_is_idempotent() {
        let mut core = GmtuneCore::default();
        core.load_bytes(&wav_fixture(), None);
        core.unload();
        assert!(core.engine.is_none());
        core.unload();
        assert!(core.engine.is_none());
    }

    #[test]
    fn load_unload_load_round_trip() {
        let mut core = GmtuneCore::default();
        let data = wav_fixture();
        assert!(core.load_bytes(&data, None));
        core.unload();
        assert!(core.load_bytes(&data, None));
        assert!(core.engine.is_some());
    }

    #[test]
    fn simultaneous_prev_and_next_both_dispatch_in_order() {
        let mut core = GmtuneCore::default();
        let log = ScriptedEngine::install(&mut core);

        core.step(L1_BIT | R1_BIT);
        assert_eq!(*log.borrow(), vec!["prev", "next"]);
    }

    #[test]
    fn held_button_dispatches_once() {
        let mut core = GmtuneCore::default();
        let log = ScriptedEngine::install(&mut core);

        core.step(START_BIT);
        core.step(START_BIT);
        core.step(0);
        core.step(START_BIT);
        assert_eq!(*log.borrow(), vec!["toggle", "toggle"]);
    }

    #[test]
    fn idle_step_emits_black_video_and_silence() {
        let mut core = GmtuneCore::default();
        core.step(L1_BIT);

        assert!(core.surface.as_bytes().iter().all(|&b| b == 0));
        assert!(core.audio.iter().all(|&s| s == 0));
        assert_eq!(core.frame, 0);
    }

    #[test]
    fn playing_step_draws_panel_and_renders_audio() {
        let mut core = GmtuneCore::default();
        ScriptedEngine::install(&mut core);
        core.step(0);

        // Outer border pixel and engine audio are both present.
        assert_eq!(core.surface.get(5, 5), Some(gfx::WHITE));
        assert!(core.audio.iter().all(|&s| s == 42));
    }

    #[test]
    fn reset_restarts_current_track() {
        let mut core = GmtuneCore::default();
        let log = ScriptedEngine::install(&mut core);
        core.on_reset();
        assert_eq!(*log.borrow(), vec!["restart"]);
    }
}
