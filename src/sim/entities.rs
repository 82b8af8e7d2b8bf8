//! Entity behavior rules
//!
//! Each entity advances itself one tick with no cross-entity knowledge beyond
//! what is passed in. Cross-cutting consequences (score, cues, removals) are
//! handled by the orchestrator and the collision resolver.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::tick::TickInput;
use super::waves::{AttackPattern, BossPhase, phase_for_ratio};
use crate::consts::*;

/// The player's cannon
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Ticks remaining before the next shot is allowed
    pub fire_cooldown: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                CANVAS_HEIGHT - PLAYER_Y_OFFSET,
            ),
            fire_cooldown: 0,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// Move, clamp to the playfield, and fire if requested and off cooldown.
    /// Returns the spawned laser, if any.
    pub fn update(&mut self, input: &TickInput) -> Option<Laser> {
        if input.left {
            self.pos.x -= PLAYER_SPEED;
        }
        if input.right {
            self.pos.x += PLAYER_SPEED;
        }
        self.pos.x = self.pos.x.clamp(0.0, CANVAS_WIDTH - PLAYER_WIDTH);

        if self.fire_cooldown > 0 {
            self.fire_cooldown -= 1;
        }

        if input.fire && self.fire_cooldown == 0 {
            self.fire_cooldown = PLAYER_FIRE_COOLDOWN;
            return Some(Laser::new(
                self.pos.x + PLAYER_WIDTH / 2.0 - LASER_WIDTH / 2.0,
                self.pos.y - LASER_HEIGHT,
            ));
        }
        None
    }
}

/// An upward-traveling laser bolt
#[derive(Debug, Clone)]
pub struct Laser {
    pub pos: Vec2,
}

impl Laser {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, LASER_WIDTH, LASER_HEIGHT)
    }

    pub fn update(&mut self) {
        self.pos.y -= LASER_SPEED;
    }

    pub fn off_screen(&self) -> bool {
        self.pos.y + LASER_HEIGHT < 0.0
    }
}

/// A falling C-Suite nametag
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    /// Per-wave fall speed in pixels per tick
    pub fall_speed: f32,
    pub title: &'static str,
}

impl Enemy {
    pub fn new(x: f32, y: f32, fall_speed: f32, title: &'static str) -> Self {
        Self {
            pos: Vec2::new(x, y),
            fall_speed,
            title,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, ENEMY_WIDTH, ENEMY_HEIGHT)
    }

    pub fn update(&mut self) {
        self.pos.y += self.fall_speed;
    }

    /// True once the bottom edge reaches the ground line
    pub fn landed(&self) -> bool {
        self.pos.y + ENEMY_HEIGHT >= GROUND_Y
    }
}

/// Cosmetic burst spawned on any kill or hit; lifecycle-tracked so the
/// orchestrator can compact finished ones.
#[derive(Debug, Clone)]
pub struct Explosion {
    pub pos: Vec2,
    pub frame: u32,
    pub done: bool,
}

impl Explosion {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            frame: 0,
            done: false,
        }
    }

    pub fn update(&mut self) {
        self.frame += 1;
        if self.frame >= EXPLOSION_MAX_FRAMES {
            self.done = true;
        }
    }
}

/// Boss ordnance. One dispatch point advances any variant.
#[derive(Debug, Clone)]
pub enum BossProjectile {
    /// Small, fast, linear
    BusinessCard { pos: Vec2, vel: Vec2 },
    /// Larger, slower, drifts side to side while falling
    GoldenParachute {
        pos: Vec2,
        fall_speed: f32,
        drift_phase: f32,
    },
    /// Wide beam whose velocity leads toward a target x, computed at launch
    TakeoverBeam { pos: Vec2, vel: Vec2 },
}

impl BossProjectile {
    pub fn business_card(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self::BusinessCard {
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, vy),
        }
    }

    pub fn golden_parachute(x: f32, y: f32, rng: &mut Pcg32) -> Self {
        Self::GoldenParachute {
            pos: Vec2::new(x, y),
            fall_speed: 6.0,
            drift_phase: rng.random_range(0.0..std::f32::consts::TAU),
        }
    }

    /// `x` is the beam's horizontal center at launch
    pub fn takeover_beam(x: f32, y: f32, target_x: f32) -> Self {
        let size = Self::beam_size();
        Self::TakeoverBeam {
            pos: Vec2::new(x - size.x / 2.0, y),
            vel: Vec2::new((target_x - x) * 0.06, 15.0),
        }
    }

    fn beam_size() -> Vec2 {
        Vec2::new(8.0, 30.0)
    }

    pub fn size(&self) -> Vec2 {
        match self {
            Self::BusinessCard { .. } => Vec2::new(12.0, 8.0),
            Self::GoldenParachute { .. } => Vec2::new(20.0, 20.0),
            Self::TakeoverBeam { .. } => Self::beam_size(),
        }
    }

    pub fn pos(&self) -> Vec2 {
        match self {
            Self::BusinessCard { pos, .. }
            | Self::GoldenParachute { pos, .. }
            | Self::TakeoverBeam { pos, .. } => *pos,
        }
    }

    pub fn rect(&self) -> Rect {
        let pos = self.pos();
        let size = self.size();
        Rect::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn advance(&mut self) {
        match self {
            Self::BusinessCard { pos, vel } | Self::TakeoverBeam { pos, vel } => {
                *pos += *vel;
            }
            Self::GoldenParachute {
                pos,
                fall_speed,
                drift_phase,
            } => {
                *drift_phase += 0.15;
                pos.x += drift_phase.sin() * 4.5;
                pos.y += *fall_speed;
            }
        }
    }

    /// Destroyed on leaving any screen edge
    pub fn off_screen(&self) -> bool {
        let pos = self.pos();
        let size = self.size();
        pos.y > CANVAS_HEIGHT || pos.x + size.x < 0.0 || pos.x > CANVAS_WIDTH
    }
}

/// Result of one boss tick
#[derive(Debug, Default)]
pub struct BossAdvance {
    pub projectiles: Vec<BossProjectile>,
    /// The defeat animation just finished; the run transitions to victory
    pub defeat_complete: bool,
}

/// Outcome of a valid boss hit
#[derive(Debug)]
pub struct BossHit {
    pub explosions: Vec<Explosion>,
    /// This hit dropped hp to zero
    pub defeated_now: bool,
}

/// The S-Corp. A phase-driven state machine: entering, then active with
/// escalating attack tiers, then a fixed-length defeat animation.
#[derive(Debug, Clone)]
pub struct Boss {
    pub pos: Vec2,
    pub hp: i32,
    pub max_hp: i32,
    /// Horizontal heading, +1 right / -1 left
    pub direction: f32,
    pub attack_timer: f32,
    pub entering: bool,
    pub defeated: bool,
    pub defeat_timer: u32,
    pub hit_flash: u32,
}

impl Default for Boss {
    fn default() -> Self {
        Self::new()
    }
}

impl Boss {
    pub fn new() -> Self {
        Self {
            // Start off-screen for the entrance slide
            pos: Vec2::new(CANVAS_WIDTH / 2.0 - BOSS_WIDTH / 2.0, -BOSS_HEIGHT),
            hp: BOSS_MAX_HP,
            max_hp: BOSS_MAX_HP,
            direction: 1.0,
            attack_timer: 0.0,
            entering: true,
            defeated: false,
            defeat_timer: 0,
            hit_flash: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, BOSS_WIDTH, BOSS_HEIGHT)
    }

    /// Active phase for the current hp ratio, recomputed every tick
    pub fn phase(&self) -> &'static BossPhase {
        phase_for_ratio(self.hp as f32 / self.max_hp as f32)
    }

    /// Advance one tick: entrance descent, phase movement, attack timing.
    /// `wall_clock` drives only the erratic hover in the top phases; freezing
    /// it does not change hit outcomes in tests.
    pub fn advance(&mut self, player_cx: f32, wall_clock: f64, rng: &mut Pcg32) -> BossAdvance {
        let mut out = BossAdvance::default();

        if self.defeated {
            self.defeat_timer += 1;
            if self.defeat_timer == BOSS_DEFEAT_TICKS {
                out.defeat_complete = true;
            }
            return out;
        }

        if self.entering {
            self.pos.y += BOSS_ENTRY_SPEED;
            if self.pos.y >= BOSS_TARGET_Y {
                self.pos.y = BOSS_TARGET_Y;
                self.entering = false;
            }
            return out;
        }

        let phase = self.phase();

        // Bounce between screen margins
        self.pos.x += phase.speed * self.direction;
        if self.pos.x + BOSS_WIDTH >= CANVAS_WIDTH - BOSS_EDGE_MARGIN {
            self.direction = -1.0;
        } else if self.pos.x <= BOSS_EDGE_MARGIN {
            self.direction = 1.0;
        }

        // Erratic hover in the two highest-intensity phases
        if matches!(phase.pattern, AttackPattern::Triple | AttackPattern::Barrage) {
            self.pos.y = BOSS_TARGET_Y + ((wall_clock * 5.0).sin() as f32) * 20.0;
        }

        if self.hit_flash > 0 {
            self.hit_flash -= 1;
        }

        self.attack_timer += 1.0;
        let cooldown = BOSS_ATTACK_COOLDOWN * phase.cooldown_mult;
        if self.attack_timer >= cooldown {
            self.attack_timer = 0.0;
            out.projectiles = self.attack(phase, player_cx, rng);
        }

        out
    }

    /// Fire the phase's attack pattern. Returns the spawned projectiles.
    fn attack(
        &self,
        phase: &BossPhase,
        player_cx: f32,
        rng: &mut Pcg32,
    ) -> Vec<BossProjectile> {
        let cx = self.pos.x + BOSS_WIDTH / 2.0;
        let bottom = self.pos.y + BOSS_HEIGHT;
        let mut shots = Vec::new();

        match phase.pattern {
            AttackPattern::Single => {
                // One card homing toward the player's current x
                shots.push(BossProjectile::business_card(
                    cx - 6.0,
                    bottom,
                    (player_cx - cx) * 0.03,
                    9.0,
                ));
            }
            AttackPattern::Dual => {
                shots.push(BossProjectile::business_card(cx - 20.0, bottom, -3.0, 9.0));
                shots.push(BossProjectile::business_card(cx + 8.0, bottom, 3.0, 9.0));
            }
            AttackPattern::Triple => {
                shots.push(BossProjectile::business_card(cx - 6.0, bottom, -4.5, 9.0));
                shots.push(BossProjectile::business_card(cx - 6.0, bottom, 0.0, 10.5));
                shots.push(BossProjectile::business_card(cx - 6.0, bottom, 4.5, 9.0));
                shots.push(BossProjectile::takeover_beam(cx, bottom, player_cx));
            }
            AttackPattern::Barrage => {
                let spread_x = (rng.random::<f32>() - 0.5) * 12.0;
                shots.push(BossProjectile::business_card(
                    cx - 6.0,
                    bottom,
                    spread_x,
                    9.0 + rng.random::<f32>() * 6.0,
                ));
                // Independent rolls on every barrage attack
                if rng.random_bool(0.5) {
                    shots.push(BossProjectile::golden_parachute(cx - 10.0, bottom, rng));
                }
                if rng.random::<f32>() > 0.7 {
                    shots.push(BossProjectile::takeover_beam(cx, bottom, player_cx));
                }
            }
        }

        shots
    }

    /// Apply one point of laser damage. Ignored while entering or defeated.
    pub fn take_hit(&mut self, rng: &mut Pcg32) -> Option<BossHit> {
        if self.defeated || self.entering {
            return None;
        }

        self.hp = (self.hp - 1).max(0);
        self.hit_flash = BOSS_HIT_FLASH;

        let mut explosions = vec![self.explosion_in_bounds(rng)];
        let defeated_now = self.hp == 0;
        if defeated_now {
            self.defeated = true;
            self.defeat_timer = 0;
            for _ in 0..BOSS_DEFEAT_BURST {
                explosions.push(self.explosion_in_bounds(rng));
            }
        }

        Some(BossHit {
            explosions,
            defeated_now,
        })
    }

    fn explosion_in_bounds(&self, rng: &mut Pcg32) -> Explosion {
        Explosion::new(
            self.pos.x + rng.random::<f32>() * BOSS_WIDTH,
            self.pos.y + rng.random::<f32>() * BOSS_HEIGHT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_player_clamps_to_playfield() {
        let mut player = Player::default();
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            player.update(&input);
        }
        assert_eq!(player.pos.x, 0.0);

        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..100 {
            player.update(&input);
        }
        assert_eq!(player.pos.x, CANVAS_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_player_fire_cooldown() {
        let mut player = Player::default();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };

        assert!(player.update(&input).is_some());
        // Next shot allowed only after the cooldown elapses
        for _ in 0..PLAYER_FIRE_COOLDOWN - 1 {
            assert!(player.update(&input).is_none());
        }
        assert!(player.update(&input).is_some());
    }

    #[test]
    fn test_laser_flies_off_screen() {
        let mut laser = Laser::new(100.0, 30.0);
        assert!(!laser.off_screen());
        for _ in 0..3 {
            laser.update();
        }
        assert!(laser.off_screen());
    }

    #[test]
    fn test_explosion_lifetime() {
        let mut explosion = Explosion::new(0.0, 0.0);
        for _ in 0..EXPLOSION_MAX_FRAMES - 1 {
            explosion.update();
            assert!(!explosion.done);
        }
        explosion.update();
        assert!(explosion.done);
    }

    #[test]
    fn test_beam_leads_target() {
        let beam = BossProjectile::takeover_beam(240.0, 140.0, 360.0);
        let BossProjectile::TakeoverBeam { vel, .. } = beam else {
            panic!("expected beam");
        };
        assert!((vel.x - (360.0 - 240.0) * 0.06).abs() < 1e-6);
        assert_eq!(vel.y, 15.0);
    }

    #[test]
    fn test_boss_entrance_stops_at_target() {
        let mut boss = Boss::new();
        let mut rng = rng();
        assert!(boss.entering);
        for _ in 0..200 {
            boss.advance(240.0, 0.0, &mut rng);
        }
        assert!(!boss.entering);
        assert_eq!(boss.pos.y, BOSS_TARGET_Y);
    }

    #[test]
    fn test_boss_ignores_hits_while_entering() {
        let mut boss = Boss::new();
        let mut rng = rng();
        assert!(boss.take_hit(&mut rng).is_none());
        assert_eq!(boss.hp, BOSS_MAX_HP);
    }

    #[test]
    fn test_boss_defeat_on_tenth_hit() {
        let mut boss = Boss::new();
        boss.entering = false;
        boss.pos.y = BOSS_TARGET_Y;
        let mut rng = rng();

        for i in 1..BOSS_MAX_HP {
            let hit = boss.take_hit(&mut rng).unwrap();
            assert!(!hit.defeated_now, "defeated early at hit {i}");
        }
        let hit = boss.take_hit(&mut rng).unwrap();
        assert!(hit.defeated_now);
        assert!(boss.defeated);
        assert_eq!(boss.hp, 0);
        // Hit explosion plus the defeat burst
        assert_eq!(hit.explosions.len(), 1 + BOSS_DEFEAT_BURST);

        // Further hits are ignored
        assert!(boss.take_hit(&mut rng).is_none());
        assert_eq!(boss.hp, 0);
    }

    #[test]
    fn test_boss_defeat_animation_length() {
        let mut boss = Boss::new();
        boss.entering = false;
        boss.pos.y = BOSS_TARGET_Y;
        boss.defeated = true;
        let mut rng = rng();

        for t in 1..BOSS_DEFEAT_TICKS {
            let out = boss.advance(240.0, 0.0, &mut rng);
            assert!(!out.defeat_complete, "completed early at tick {t}");
        }
        let out = boss.advance(240.0, 0.0, &mut rng);
        assert!(out.defeat_complete);
    }

    #[test]
    fn test_boss_single_pattern_homes() {
        let mut boss = Boss::new();
        boss.entering = false;
        boss.pos.y = BOSS_TARGET_Y;
        let mut rng = rng();

        // Force an attack by advancing until the cooldown fires
        let cooldown = (BOSS_ATTACK_COOLDOWN * boss.phase().cooldown_mult).ceil() as u32;
        let mut shots = Vec::new();
        for _ in 0..=cooldown {
            let out = boss.advance(0.0, 0.0, &mut rng);
            if !out.projectiles.is_empty() {
                shots = out.projectiles;
                break;
            }
        }
        assert_eq!(shots.len(), 1);
        let BossProjectile::BusinessCard { vel, .. } = &shots[0] else {
            panic!("expected business card");
        };
        // Player is far left of the boss, so the card leans left
        assert!(vel.x < 0.0);
    }

    #[test]
    fn test_boss_triple_pattern_includes_beam() {
        let mut boss = Boss::new();
        boss.entering = false;
        boss.pos.y = BOSS_TARGET_Y;
        boss.hp = 2; // ratio 0.2 -> triple phase
        let mut rng = rng();
        assert_eq!(boss.phase().pattern, AttackPattern::Triple);

        let shots = boss.attack(boss.phase(), 240.0, &mut rng);
        assert_eq!(shots.len(), 4);
        assert!(
            shots
                .iter()
                .any(|s| matches!(s, BossProjectile::TakeoverBeam { .. }))
        );
        assert_eq!(
            shots
                .iter()
                .filter(|s| matches!(s, BossProjectile::BusinessCard { .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_barrage_always_fires_a_card() {
        let mut boss = Boss::new();
        boss.entering = false;
        boss.pos.y = BOSS_TARGET_Y;
        boss.hp = 1; // barrage phase
        let mut rng = rng();
        assert_eq!(boss.phase().pattern, AttackPattern::Barrage);

        for _ in 0..50 {
            let shots = boss.attack(boss.phase(), 240.0, &mut rng);
            assert!(
                shots
                    .iter()
                    .any(|s| matches!(s, BossProjectile::BusinessCard { .. }))
            );
            assert!(shots.len() <= 3);
        }
    }

    #[test]
    fn test_boss_bounces_at_margins() {
        let mut boss = Boss::new();
        boss.entering = false;
        boss.pos.y = BOSS_TARGET_Y;
        let mut rng = rng();

        // Walk right until the bounce flips direction
        for _ in 0..500 {
            boss.advance(240.0, 0.0, &mut rng);
        }
        assert!(boss.pos.x + BOSS_WIDTH <= CANVAS_WIDTH);
        assert!(boss.pos.x >= 0.0);
    }
}
