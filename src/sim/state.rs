//! Game state and the shared rule helpers
//!
//! The orchestrator owns every entity collection plus all run counters. Side
//! effects destined for the collaborators (audio cues, music transitions, the
//! high-score write) are queued as `GameEvent`s and drained by the shell after
//! each tick; the sim itself never calls out.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::{Boss, BossProjectile, Enemy, Explosion, Laser, Player};
use crate::consts::*;

/// Top-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Title,
    Playing,
    Paused,
    GameOver,
    Victory,
}

/// Full-screen flash feedback; the renderer maps the kind to a color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    /// Hot pink: a pink slip absorbed the hit
    PinkSlip,
    /// Coral red: a parent set was assimilated
    Assimilate,
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenFlash {
    pub kind: FlashKind,
    pub timer: u32,
}

/// Color tag for floating text, resolved to a palette entry by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupColor {
    Accent,
    Secondary,
    Primary,
    PinkSlip,
}

/// A floating score/status text
#[derive(Debug, Clone)]
pub struct TextPopup {
    pub text: String,
    pub pos: Vec2,
    pub ticks_left: u32,
    pub color: PopupColor,
}

/// Simulation side effects for the shell to dispatch to the collaborators.
/// Best-effort: a dropped cue never rolls back the state change it accompanied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new run began (title -> playing)
    RunStarted,
    LaserFired,
    EnemyDestroyed,
    /// A regular wave was cleared; `flawless` earned the no-damage bonus
    WaveCleared { wave: usize, flawless: bool },
    /// An enemy landed or a boss projectile connected
    Recruit,
    PinkSlipUsed,
    Assimilated,
    BossAppeared,
    BossHit,
    BossDefeated,
    GameOver,
    Victory,
    ReturnedToTitle,
    /// The run beat the stored high score; carries the new value
    NewHighScore(u32),
}

/// Complete game state, advanced one fixed tick at a time
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,

    pub score: u32,
    pub high_score: u32,
    /// 0-based index into the wave table; only ever increases within a run
    pub wave: usize,
    pub enemies_cleared: u32,
    pub pink_slips: u32,
    pub parent_sets_remaining: u32,
    /// Distinct C-Suite titles filled by assimilations, in fill order
    pub filled_positions: Vec<&'static str>,

    pub player: Player,
    pub lasers: Vec<Laser>,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub boss_projectiles: Vec<BossProjectile>,
    pub explosions: Vec<Explosion>,

    pub spawn_timer: u32,
    pub wave_transition_timer: u32,
    pub wave_damage_taken: bool,

    pub screen_shake: f32,
    pub flash: Option<ScreenFlash>,
    pub popups: Vec<TextPopup>,

    pub time_ticks: u64,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state sitting on the title screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            score: 0,
            high_score: 0,
            wave: 0,
            enemies_cleared: 0,
            pink_slips: PINK_SLIPS_PER_SET,
            parent_sets_remaining: TOTAL_PARENT_SETS,
            filled_positions: Vec::new(),
            player: Player::default(),
            lasers: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            boss_projectiles: Vec::new(),
            explosions: Vec::new(),
            spawn_timer: 0,
            wave_transition_timer: 0,
            wave_damage_taken: false,
            screen_shake: 0.0,
            flash: None,
            popups: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Reset all run state and enter PLAYING. The high score survives.
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.wave = 0;
        self.enemies_cleared = 0;
        self.pink_slips = PINK_SLIPS_PER_SET;
        self.parent_sets_remaining = TOTAL_PARENT_SETS;
        self.filled_positions.clear();
        self.player = Player::default();
        self.lasers.clear();
        self.enemies.clear();
        self.boss = None;
        self.boss_projectiles.clear();
        self.explosions.clear();
        self.spawn_timer = 0;
        self.wave_transition_timer = 0;
        self.wave_damage_taken = false;
        self.screen_shake = 0.0;
        self.flash = None;
        self.popups.clear();
        self.phase = GamePhase::Playing;
    }

    /// Take the queued events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn push_popup(
        &mut self,
        text: impl Into<String>,
        x: f32,
        y: f32,
        ticks: u32,
        color: PopupColor,
    ) {
        self.popups.push(TextPopup {
            text: text.into(),
            pos: Vec2::new(x, y),
            ticks_left: ticks,
            color,
        });
    }

    /// Score and bookkeeping for a laser kill. Removal and the explosion are
    /// the collision resolver's job.
    pub fn score_enemy_kill(&mut self, cx: f32, y: f32) {
        self.score += SCORE_PER_ENEMY;
        self.enemies_cleared += 1;
        self.push_popup(format!("+{SCORE_PER_ENEMY}"), cx, y, 30, PopupColor::Accent);
        self.screen_shake = 3.0;
        self.events.push(GameEvent::EnemyDestroyed);
    }

    /// The shared defensive mechanic: an enemy reached the ground or a boss
    /// projectile connected. A pink slip absorbs the hit if any remain;
    /// otherwise a parent set is assimilated.
    pub fn resolve_company_hit(
        &mut self,
        title: Option<&'static str>,
        popup_x: f32,
        popup_y: f32,
    ) {
        self.wave_damage_taken = true;
        self.events.push(GameEvent::Recruit);

        if self.pink_slips > 0 {
            self.pink_slips -= 1;
            self.flash = Some(ScreenFlash {
                kind: FlashKind::PinkSlip,
                timer: FLASH_PINK_SLIP,
            });
            self.push_popup("PINK SLIP!", popup_x, popup_y, 45, PopupColor::PinkSlip);
            self.events.push(GameEvent::PinkSlipUsed);
        } else {
            self.assimilate(title);
        }
    }

    /// Fill a position (if a titled enemy caused this), consume a parent set,
    /// restock the pink slips, and end the run if no sets remain.
    fn assimilate(&mut self, title: Option<&'static str>) {
        if let Some(title) = title
            && !self.filled_positions.contains(&title)
        {
            self.filled_positions.push(title);
        }

        self.parent_sets_remaining = self.parent_sets_remaining.saturating_sub(1);
        self.pink_slips = PINK_SLIPS_PER_SET;

        self.flash = Some(ScreenFlash {
            kind: FlashKind::Assimilate,
            timer: FLASH_ASSIMILATE,
        });
        self.screen_shake = 12.0;
        self.push_popup(
            "ASSIMILATED!",
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT / 2.0,
            60,
            PopupColor::Primary,
        );
        self.events.push(GameEvent::Assimilated);

        if self.parent_sets_remaining == 0 {
            self.game_over();
        }
    }

    /// One laser hit on the boss. No-op without a boss; an entering or
    /// defeated boss ignores damage (the laser is still spent by the caller).
    pub fn boss_take_damage(&mut self) {
        let Some(mut boss) = self.boss.take() else {
            return;
        };
        if let Some(hit) = boss.take_hit(&mut self.rng) {
            self.screen_shake = 6.0;
            self.score += SCORE_PER_ENEMY;
            self.explosions.extend(hit.explosions);
            self.events.push(GameEvent::BossHit);
            if hit.defeated_now {
                self.screen_shake = 20.0;
                self.events.push(GameEvent::BossDefeated);
            }
        }
        self.boss = Some(boss);
    }

    pub fn game_over(&mut self) {
        self.record_high_score();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver);
        log::info!("Run over at wave {} with score {}", self.wave + 1, self.score);
    }

    pub fn victory(&mut self) {
        self.record_high_score();
        self.phase = GamePhase::Victory;
        self.events.push(GameEvent::Victory);
        log::info!("S-Corp bankrupted with score {}", self.score);
    }

    /// Compared and persisted only at the moment of a terminal transition,
    /// and only when strictly beaten.
    fn record_high_score(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore(self.score));
        }
    }
}
