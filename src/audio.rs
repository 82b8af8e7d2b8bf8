//! Audio direction
//!
//! The simulation never talks to a sound device. It queues `GameEvent`s, and
//! the [`AudioDirector`] maps those onto sound cues and music track changes,
//! delegating actual playback to an [`AudioBackend`]. Backends are swappable:
//! a Web Audio implementation in the browser build, [`LogAudio`] for the
//! headless runner, [`NullAudio`] for tests.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Player fires a laser
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// An executive joined the parent company roster
    Recruit,
    /// Pink slip consumed
    PinkSlip,
    /// A parent company was assimilated
    Assimilate,
    /// Wave cleared fanfare
    WaveClear,
    /// Boss descends
    BossIntro,
    /// Laser lands on the boss
    BossHit,
    /// Boss defeat burst
    BossDefeat,
    /// Run lost
    GameOver,
    /// Run won
    Victory,
    /// New personal best
    HighScore,
}

/// Looping music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Title,
    Gameplay,
    Boss,
    GameOver,
    Victory,
}

/// Playback sink. `volume` arrives pre-mixed (master x sfx or master x music).
pub trait AudioBackend {
    fn play_cue(&mut self, cue: Cue, volume: f32);
    fn play_music(&mut self, track: MusicTrack, volume: f32);
    fn stop_music(&mut self);
}

/// Backend that discards everything. Used in tests and when audio
/// initialization fails.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioBackend for NullAudio {
    fn play_cue(&mut self, _cue: Cue, _volume: f32) {}
    fn play_music(&mut self, _track: MusicTrack, _volume: f32) {}
    fn stop_music(&mut self) {}
}

/// Backend for the headless runner: logs cues instead of playing them.
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioBackend for LogAudio {
    fn play_cue(&mut self, cue: Cue, volume: f32) {
        log::debug!("cue {cue:?} (vol {volume:.2})");
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        log::info!("music -> {track:?} (vol {volume:.2})");
    }

    fn stop_music(&mut self) {
        log::info!("music stopped");
    }
}

/// Translates game events into backend calls and tracks the current music so
/// repeated requests for the same track are no-ops.
pub struct AudioDirector {
    backend: Box<dyn AudioBackend>,
    current_track: Option<MusicTrack>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl AudioDirector {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            current_track: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.backend.stop_music();
            self.current_track = None;
        }
    }

    fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Fire a one-shot cue
    pub fn play(&mut self, cue: Cue) {
        let vol = self.sfx_gain();
        if vol <= 0.0 {
            return;
        }
        self.backend.play_cue(cue, vol);
    }

    /// Switch music. Requesting the already-playing track does nothing, so
    /// callers can re-assert the desired track every event batch.
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.current_track == Some(track) {
            return;
        }
        let vol = self.music_gain();
        if vol <= 0.0 {
            return;
        }
        self.backend.play_music(track, vol);
        self.current_track = Some(track);
    }

    pub fn stop_music(&mut self) {
        if self.current_track.is_some() {
            self.backend.stop_music();
            self.current_track = None;
        }
    }

    /// Map one game event onto cues and music changes
    pub fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::RunStarted => self.play_music(MusicTrack::Gameplay),
            GameEvent::LaserFired => self.play(Cue::Shoot),
            GameEvent::EnemyDestroyed => self.play(Cue::Explosion),
            GameEvent::WaveCleared { .. } => self.play(Cue::WaveClear),
            GameEvent::Recruit => self.play(Cue::Recruit),
            GameEvent::PinkSlipUsed => self.play(Cue::PinkSlip),
            GameEvent::Assimilated => self.play(Cue::Assimilate),
            GameEvent::BossAppeared => {
                self.play(Cue::BossIntro);
                self.play_music(MusicTrack::Boss);
            }
            GameEvent::BossHit => self.play(Cue::BossHit),
            GameEvent::BossDefeated => self.play(Cue::BossDefeat),
            GameEvent::GameOver => {
                self.play(Cue::GameOver);
                self.play_music(MusicTrack::GameOver);
            }
            GameEvent::Victory => {
                self.play(Cue::Victory);
                self.play_music(MusicTrack::Victory);
            }
            GameEvent::ReturnedToTitle => self.play_music(MusicTrack::Title),
            GameEvent::NewHighScore(_) => self.play(Cue::HighScore),
        }
    }
}

/// Web Audio backend with procedurally generated sounds - no asset files.
#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use super::{AudioBackend, Cue, MusicTrack};
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    pub struct WebAudio {
        ctx: Option<AudioContext>,
        music: Option<(OscillatorNode, GainNode)>,
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, music: None }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Short one-oscillator blip with an exponential decay and an
        /// optional frequency sweep
        fn blip(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            freq: f32,
            sweep_to: Option<f32>,
            vol: f32,
            dur: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + dur)
                .ok();
            if let Some(target) = sweep_to {
                osc.frequency().set_value_at_time(freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(target, t + dur)
                    .ok();
            }

            osc.start().ok();
            osc.stop_with_when(t + dur + 0.05).ok();
        }

        /// Arpeggio of sequential notes
        fn arpeggio(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            freqs: &[f32],
            step: f64,
            vol: f32,
            note_dur: f64,
        ) {
            for (i, freq) in freqs.iter().enumerate() {
                let delay = i as f64 * step;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, osc_type) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + note_dur)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + note_dur + 0.05).ok();
                }
            }
        }
    }

    impl AudioBackend for WebAudio {
        fn play_cue(&mut self, cue: Cue, vol: f32) {
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            use OscillatorType::*;
            match cue {
                // Laser zap sweeping up
                Cue::Shoot => Self::blip(ctx, Square, 400.0, Some(900.0), vol * 0.2, 0.08),
                // Nametag pop
                Cue::Explosion => Self::blip(ctx, Sawtooth, 160.0, Some(40.0), vol * 0.4, 0.25),
                // Soft tap for a roster fill
                Cue::Recruit => Self::blip(ctx, Triangle, 300.0, None, vol * 0.2, 0.06),
                // Paper-tear squeal
                Cue::PinkSlip => Self::blip(ctx, Sawtooth, 800.0, Some(200.0), vol * 0.35, 0.2),
                // Ominous descend as a parent company goes under
                Cue::Assimilate => Self::blip(ctx, Sine, 300.0, Some(30.0), vol * 0.45, 0.7),
                Cue::WaveClear => {
                    Self::arpeggio(ctx, Triangle, &[400.0, 500.0, 600.0, 800.0], 0.1, vol * 0.3, 0.4)
                }
                Cue::BossIntro => {
                    Self::arpeggio(ctx, Sawtooth, &[120.0, 100.0, 80.0], 0.25, vol * 0.4, 0.5)
                }
                Cue::BossHit => Self::blip(ctx, Square, 200.0, Some(120.0), vol * 0.3, 0.1),
                Cue::BossDefeat => {
                    Self::blip(ctx, Sawtooth, 100.0, Some(25.0), vol * 0.5, 0.9);
                    Self::blip(ctx, Square, 1500.0, None, vol * 0.2, 0.15);
                }
                Cue::GameOver => {
                    Self::arpeggio(ctx, Sine, &[400.0, 350.0, 300.0, 200.0], 0.2, vol * 0.3, 0.35)
                }
                Cue::Victory => Self::arpeggio(
                    ctx,
                    Triangle,
                    &[500.0, 600.0, 750.0, 1000.0, 1250.0],
                    0.12,
                    vol * 0.3,
                    0.45,
                ),
                Cue::HighScore => {
                    Self::arpeggio(ctx, Triangle, &[600.0, 800.0, 1000.0, 1200.0], 0.08, vol * 0.25, 0.3)
                }
            }
        }

        fn play_music(&mut self, track: MusicTrack, vol: f32) {
            self.stop_music();
            let Some(ctx) = &self.ctx else { return };

            // One sustained pad per track, no sequenced melody
            let freq = match track {
                MusicTrack::Title => 110.0,
                MusicTrack::Gameplay => 65.0,
                MusicTrack::Boss => 55.0,
                MusicTrack::GameOver => 41.0,
                MusicTrack::Victory => 131.0,
            };
            if let Some((osc, gain)) = Self::create_osc(ctx, freq, OscillatorType::Triangle) {
                gain.gain().set_value(vol * 0.08);
                if osc.start().is_ok() {
                    self.music = Some((osc, gain));
                }
            }
        }

        fn stop_music(&mut self) {
            if let Some((osc, gain)) = self.music.take() {
                gain.gain().set_value(0.0);
                let _ = osc.stop();
            }
        }
    }
}
