//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only (one `tick()` call = one step)
//! - Seeded RNG only
//! - Wall-clock time enters solely through `TickInput::wall_clock`
//! - No rendering, audio, or platform dependencies; side effects for the
//!   collaborators are queued as `GameEvent`s

pub mod collision;
pub mod entities;
pub mod state;
pub mod tick;
pub mod waves;

pub use collision::{Rect, check_collisions};
pub use entities::{Boss, BossProjectile, Enemy, Explosion, Laser, Player};
pub use state::{FlashKind, GameEvent, GamePhase, GameState, PopupColor, ScreenFlash, TextPopup};
pub use tick::{TickInput, tick};
pub use waves::{AttackPattern, BossPhase, WaveConfig, phase_for_ratio, wave_config};
