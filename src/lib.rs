//! Attack of the S-Corp - a fixed-timestep arcade shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, boss, collisions)
//! - `audio`: Cue/track ids and the audio collaborator surface
//! - `persistence`: High score storage
//! - `settings`: Data-driven preferences
//! - `app`: Fixed-timestep shell wiring the sim to its collaborators
//! - `platform` (wasm32): Browser input, game loop, and DOM HUD

pub mod app;
pub mod audio;
pub mod persistence;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod settings;
pub mod sim;

pub use app::App;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const TICK_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum frame delta fed to the accumulator (spiral-of-death cap)
    pub const MAX_FRAME_DELTA: f32 = 0.2;

    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 640.0;
    /// Enemies whose bottom edge reaches this y count as landed
    pub const GROUND_Y: f32 = CANVAS_HEIGHT - 20.0;

    /// Player cannon
    pub const PLAYER_WIDTH: f32 = 48.0;
    pub const PLAYER_HEIGHT: f32 = 32.0;
    /// Horizontal speed in pixels per tick
    pub const PLAYER_SPEED: f32 = 15.0;
    /// Distance of the cannon from the bottom of the playfield
    pub const PLAYER_Y_OFFSET: f32 = 60.0;
    /// Ticks between shots while fire is held
    pub const PLAYER_FIRE_COOLDOWN: u32 = 5;

    /// Laser projectile
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 14.0;
    /// Upward speed in pixels per tick
    pub const LASER_SPEED: f32 = 21.0;

    /// Enemy nametag
    pub const ENEMY_WIDTH: f32 = 64.0;
    pub const ENEMY_HEIGHT: f32 = 28.0;

    /// Explosion lifetime in ticks
    pub const EXPLOSION_MAX_FRAMES: u32 = 20;

    /// Boss (the S-Corp itself)
    pub const BOSS_WIDTH: f32 = 120.0;
    pub const BOSS_HEIGHT: f32 = 80.0;
    pub const BOSS_MAX_HP: i32 = 10;
    /// Descent rate during the entrance animation, pixels per tick
    pub const BOSS_ENTRY_SPEED: f32 = 3.0;
    /// Resting y once the entrance completes
    pub const BOSS_TARGET_Y: f32 = 60.0;
    /// Base ticks between attacks, scaled by the phase cooldown multiplier
    pub const BOSS_ATTACK_COOLDOWN: f32 = 90.0;
    /// Horizontal bounce margin from either screen edge
    pub const BOSS_EDGE_MARGIN: f32 = 10.0;
    /// Hit flash duration in ticks
    pub const BOSS_HIT_FLASH: u32 = 8;
    /// Defeat animation length in ticks before victory triggers
    pub const BOSS_DEFEAT_TICKS: u32 = 120;
    /// Explosions spawned in the defeat burst
    pub const BOSS_DEFEAT_BURST: usize = 5;

    /// Game rules
    pub const PINK_SLIPS_PER_SET: u32 = 3;
    pub const TOTAL_PARENT_SETS: u32 = 5;
    /// Regular waves before the boss encounter
    pub const TOTAL_WAVES: usize = 9;
    pub const SCORE_PER_ENEMY: u32 = 100;
    pub const WAVE_CLEAR_BONUS: u32 = 500;
    pub const NO_DAMAGE_BONUS: u32 = 300;
    /// Breather between waves (no spawning), in ticks
    pub const WAVE_TRANSITION_TICKS: u32 = 120;

    /// Screen flash durations in ticks
    pub const FLASH_PINK_SLIP: u32 = 10;
    pub const FLASH_ASSIMILATE: u32 = 15;
}
