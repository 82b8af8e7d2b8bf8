//! Application shell
//!
//! Sits between the platform layer (browser events, or the headless runner)
//! and the simulation. Owns the fixed-timestep accumulator, routes drained
//! `GameEvent`s to the audio director and score store, and applies the
//! accessibility settings to the presentation values it exposes.

use crate::audio::{AudioBackend, AudioDirector, MusicTrack};
use crate::consts::*;
use crate::persistence::ScoreStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

pub struct App {
    pub state: GameState,
    /// Platform layer writes held keys and edge intents here; edge intents
    /// are cleared after the tick that consumes them.
    pub input: TickInput,
    pub settings: Settings,
    audio: AudioDirector,
    scores: Box<dyn ScoreStore>,
    accumulator: f32,
}

impl App {
    pub fn new(
        seed: u64,
        backend: Box<dyn AudioBackend>,
        scores: Box<dyn ScoreStore>,
        settings: Settings,
    ) -> Self {
        let mut state = GameState::new(seed);
        state.high_score = scores.high_score();

        let mut audio = AudioDirector::new(backend);
        audio.apply_settings(&settings);
        // The shell boots onto the title screen, so its music starts here
        audio.play_music(MusicTrack::Title);

        log::info!(
            "App initialized (seed {seed}, high score {})",
            state.high_score
        );

        Self {
            state,
            input: TickInput::default(),
            settings,
            audio,
            scores,
            accumulator: 0.0,
        }
    }

    /// Advance the simulation by `elapsed` seconds of real time, running as
    /// many fixed ticks as fit. A stalled frame is clamped so the game skips
    /// time instead of spiraling through a huge catch-up burst.
    pub fn advance(&mut self, elapsed: f32, wall_clock: f64) {
        self.accumulator += elapsed.min(MAX_FRAME_DELTA);

        while self.accumulator >= TICK_DT {
            self.accumulator -= TICK_DT;
            self.input.wall_clock = wall_clock;
            tick(&mut self.state, &self.input);

            // Edge-triggered intents fire on exactly one tick
            self.input.pause_pressed = false;
            self.input.start_pressed = false;
            self.input.quit_pressed = false;

            self.dispatch_events();
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::NewHighScore(score) = event {
                self.scores.set_high_score(score);
            }
            self.audio.handle_event(&event);
        }
    }

    /// Current shake amplitude in pixels, zero under reduced motion
    pub fn shake_magnitude(&self) -> f32 {
        if self.settings.effective_screen_shake() {
            self.state.screen_shake
        } else {
            0.0
        }
    }

    /// Whether the renderer should draw the active screen flash
    pub fn flash_visible(&self) -> bool {
        self.settings.effective_screen_flash() && self.state.flash.is_some()
    }

    /// Mute hook for window blur/focus
    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        self.settings = settings;
        self.settings.save();
    }

    /// Auto-pause hook for tab-hidden / window-blur
    pub fn request_pause(&mut self) {
        if self.state.phase == GamePhase::Playing {
            self.input.pause_pressed = true;
            log::info!("Auto-paused");
        }
    }
}
