//! AABB collision detection and resolution
//!
//! Everything on screen is an axis-aligned rectangle. The resolver consumes
//! the current tick's entity collections and mutates game state on hits, with
//! defined precedence: laser×enemy, then laser×boss, then boss-projectile×player.
//!
//! Removals use a keep/drop flag pass compacted after scanning, so no scan
//! ever splices the collection it is iterating. Scans run in descending index
//! order to preserve the original pairing precedence.

use glam::Vec2;

use super::state::GameState;

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Open-interval overlap test: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }
}

/// Drop every element whose flag is false, preserving order.
pub(crate) fn retain_by_flags<T>(items: &mut Vec<T>, keep: &[bool]) {
    debug_assert_eq!(items.len(), keep.len());
    let mut i = 0;
    items.retain(|_| {
        let k = keep[i];
        i += 1;
        k
    });
}

/// Resolve all intersections for the current tick.
pub fn check_collisions(state: &mut GameState) {
    check_laser_enemy(state);
    check_laser_boss(state);
    check_boss_projectile_player(state);
}

/// Each laser destroys at most one enemy per tick; each enemy dies at most once.
fn check_laser_enemy(state: &mut GameState) {
    let mut keep_laser = vec![true; state.lasers.len()];
    let mut keep_enemy = vec![true; state.enemies.len()];
    let mut kills: Vec<Rect> = Vec::new();

    for li in (0..state.lasers.len()).rev() {
        let laser_rect = state.lasers[li].rect();
        for ei in (0..state.enemies.len()).rev() {
            if !keep_enemy[ei] {
                continue;
            }
            let enemy_rect = state.enemies[ei].rect();
            if laser_rect.overlaps(&enemy_rect) {
                keep_laser[li] = false;
                keep_enemy[ei] = false;
                kills.push(enemy_rect);
                // Laser consumed, stop scanning enemies for it
                break;
            }
        }
    }

    retain_by_flags(&mut state.lasers, &keep_laser);
    retain_by_flags(&mut state.enemies, &keep_enemy);

    for rect in kills {
        let c = rect.center();
        state.explosions.push(super::entities::Explosion::new(c.x, c.y));
        state.score_enemy_kill(c.x, rect.pos.y);
    }
}

/// Every laser overlapping the boss is consumed and deals one damage point.
/// No per-tick cap: a volley in flight lands as multiple hits.
fn check_laser_boss(state: &mut GameState) {
    let Some(boss) = &state.boss else { return };
    let boss_rect = boss.rect();

    let mut keep_laser = vec![true; state.lasers.len()];
    let mut hits = 0u32;
    for li in (0..state.lasers.len()).rev() {
        if state.lasers[li].rect().overlaps(&boss_rect) {
            keep_laser[li] = false;
            hits += 1;
        }
    }
    retain_by_flags(&mut state.lasers, &keep_laser);

    for _ in 0..hits {
        state.boss_take_damage();
    }
}

/// At most one player hit resolves per tick, no matter how many projectiles
/// overlap, to avoid multi-hit punishment in a single frame.
fn check_boss_projectile_player(state: &mut GameState) {
    let player_rect = state.player.rect();

    let mut hit_index = None;
    for pi in (0..state.boss_projectiles.len()).rev() {
        if state.boss_projectiles[pi].rect().overlaps(&player_rect) {
            hit_index = Some(pi);
            break;
        }
    }

    if let Some(pi) = hit_index {
        state.boss_projectiles.remove(pi);
        let c = player_rect.center();
        // Boss projectiles carry no title, so no C-Suite position fills
        state.resolve_company_hit(None, c.x, player_rect.pos.y - 20.0);
    }
}
