//! Fixed timestep simulation tick
//!
//! One call advances the world one step. The top-level state machine
//! dispatches to the active phase; PLAYING sequences player, lasers, then
//! either the wave director or the boss encounter, then collision resolution,
//! then explosion aging. All entity movement for a tick happens before
//! collisions are resolved for that tick.

use rand::Rng;

use super::collision::{check_collisions, retain_by_flags};
use super::entities::{Boss, Enemy};
use super::state::{GameEvent, GamePhase, GameState, PopupColor};
use super::waves::{CSUITE_TITLES, WaveConfig, wave_config};
use crate::consts::*;

/// Input snapshot for a single tick. `left`/`right`/`fire` are level-triggered
/// and sampled every tick; the `*_pressed` intents are edge-triggered and true
/// only on the tick the key first went down.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub pause_pressed: bool,
    pub start_pressed: bool,
    /// Leave PAUSED for the title screen
    pub quit_pressed: bool,
    /// Wall-clock seconds, presentation flourish only (boss hover). Frozen to
    /// 0.0 in tests without affecting any outcome.
    pub wall_clock: f64,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Title => {
            if input.start_pressed {
                state.reset_run();
                state.events.push(GameEvent::RunStarted);
                log::info!("New run started (seed {})", state.seed);
            }
        }
        GamePhase::Playing => update_playing(state, input),
        GamePhase::Paused => {
            if input.pause_pressed {
                state.phase = GamePhase::Playing;
            } else if input.quit_pressed {
                state.phase = GamePhase::Title;
                state.events.push(GameEvent::ReturnedToTitle);
            }
        }
        GamePhase::GameOver | GamePhase::Victory => {
            if input.start_pressed {
                state.phase = GamePhase::Title;
                state.events.push(GameEvent::ReturnedToTitle);
            }
        }
    }
}

fn update_playing(state: &mut GameState, input: &TickInput) {
    if input.pause_pressed {
        state.phase = GamePhase::Paused;
        return;
    }

    state.time_ticks += 1;
    decay_screen_effects(state);

    // Player movement and firing
    if let Some(laser) = state.player.update(input) {
        state.lasers.push(laser);
        state.events.push(GameEvent::LaserFired);
    }

    // Lasers fly regardless of the wave gate
    for laser in &mut state.lasers {
        laser.update();
    }
    state.lasers.retain(|l| !l.off_screen());

    // Between-wave breather: no spawning, enemies are gone anyway
    if state.wave_transition_timer > 0 {
        state.wave_transition_timer -= 1;
        return;
    }

    if state.wave >= TOTAL_WAVES {
        update_boss_encounter(state, input);
        return;
    }

    update_enemy_spawning(state);

    advance_enemies(state);
    if state.phase != GamePhase::Playing {
        // A ground-reach assimilation just ended the run
        return;
    }

    check_collisions(state);

    advance_explosions(state);
}

fn decay_screen_effects(state: &mut GameState) {
    state.screen_shake *= 0.85;
    if state.screen_shake < 0.5 {
        state.screen_shake = 0.0;
    }

    if let Some(flash) = &mut state.flash {
        flash.timer -= 1;
        if flash.timer == 0 {
            state.flash = None;
        }
    }

    for popup in &mut state.popups {
        popup.pos.y -= 0.5;
        popup.ticks_left -= 1;
    }
    state.popups.retain(|p| p.ticks_left > 0);
}

/// Wave director: spawn timing and wave-clear detection for regular waves.
/// An out-of-range wave index means no current config and suppresses spawning.
fn update_enemy_spawning(state: &mut GameState) {
    let Some(config) = wave_config(state.wave) else {
        return;
    };

    // Complete once the kill quota is met and the field is empty
    if state.enemies_cleared >= config.enemies_to_clear && state.enemies.is_empty() {
        advance_wave(state);
        return;
    }

    let spawned_or_cleared = state.enemies_cleared as usize + state.enemies.len();
    if state.enemies.len() < config.max_concurrent
        && spawned_or_cleared < config.enemies_to_clear as usize
    {
        state.spawn_timer += 1;
        if state.spawn_timer >= config.spawn_interval {
            state.spawn_timer = 0;
            spawn_enemy(state, config);
        }
    }
}

fn spawn_enemy(state: &mut GameState, config: &WaveConfig) {
    // Round-robin title assignment, stable regardless of spawn randomness
    let title_index =
        (state.enemies_cleared as usize + state.enemies.len()) % CSUITE_TITLES.len();
    let x = state.rng.random_range(0.0..CANVAS_WIDTH - ENEMY_WIDTH);
    state.enemies.push(Enemy::new(
        x,
        -ENEMY_HEIGHT,
        config.fall_speed,
        CSUITE_TITLES[title_index],
    ));
}

fn advance_wave(state: &mut GameState) {
    state.score += WAVE_CLEAR_BONUS;
    state.push_popup(
        format!("WAVE CLEAR +{WAVE_CLEAR_BONUS}"),
        CANVAS_WIDTH / 2.0,
        CANVAS_HEIGHT / 2.0 + 40.0,
        60,
        PopupColor::Secondary,
    );

    let flawless = !state.wave_damage_taken;
    if flawless {
        state.score += NO_DAMAGE_BONUS;
        state.push_popup(
            format!("NO DAMAGE +{NO_DAMAGE_BONUS}"),
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT / 2.0 + 60.0,
            60,
            PopupColor::Accent,
        );
    }

    state.events.push(GameEvent::WaveCleared {
        wave: state.wave,
        flawless,
    });
    log::info!("Wave {} cleared (flawless: {})", state.wave + 1, flawless);

    state.wave += 1;
    state.enemies_cleared = 0;
    state.spawn_timer = 0;
    state.wave_damage_taken = false;
    state.wave_transition_timer = WAVE_TRANSITION_TICKS;
}

/// Fall, then resolve ground-reaches through the pink-slip rule
fn advance_enemies(state: &mut GameState) {
    for enemy in &mut state.enemies {
        enemy.update();
    }

    let mut keep = vec![true; state.enemies.len()];
    let mut landed: Vec<(&'static str, f32)> = Vec::new();
    for (i, enemy) in state.enemies.iter().enumerate() {
        if enemy.landed() {
            keep[i] = false;
            landed.push((enemy.title, enemy.rect().center().x));
        }
    }
    retain_by_flags(&mut state.enemies, &keep);

    for (title, cx) in landed {
        state.resolve_company_hit(Some(title), cx, CANVAS_HEIGHT - 60.0);
        if state.phase != GamePhase::Playing {
            break;
        }
    }
}

/// Boss encounter: lazy boss creation, director tick, projectile flight,
/// collisions, explosion aging.
fn update_boss_encounter(state: &mut GameState, input: &TickInput) {
    if state.boss.is_none() {
        state.boss = Some(Boss::new());
        state.events.push(GameEvent::BossAppeared);
        log::info!("The S-Corp descends");
    }

    let player_cx = state.player.rect().center().x;
    if let Some(mut boss) = state.boss.take() {
        let outcome = boss.advance(player_cx, input.wall_clock, &mut state.rng);
        state.boss_projectiles.extend(outcome.projectiles);
        state.boss = Some(boss);
        if outcome.defeat_complete {
            state.victory();
            return;
        }
    }

    for projectile in &mut state.boss_projectiles {
        projectile.advance();
    }
    state.boss_projectiles.retain(|p| !p.off_screen());

    check_collisions(state);
    if state.phase != GamePhase::Playing {
        // A projectile hit spent the last parent set
        return;
    }

    advance_explosions(state);
}

fn advance_explosions(state: &mut GameState) {
    for explosion in &mut state.explosions {
        explosion.update();
    }
    state.explosions.retain(|e| !e.done);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::waves::WAVE_CONFIG;

    /// Destroy the oldest live enemy the way the collision resolver would,
    /// without depending on laser travel time
    fn snipe_first(state: &mut GameState) -> Option<&'static str> {
        if state.enemies.is_empty() {
            return None;
        }
        let enemy = state.enemies.remove(0);
        let c = enemy.rect().center();
        state.score_enemy_kill(c.x, enemy.rect().pos.y);
        Some(enemy.title)
    }

    fn start_run(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        let input = TickInput {
            start_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        state.drain_events();
        state
    }

    #[test]
    fn test_title_start_resets_and_plays() {
        let mut state = GameState::new(3);
        state.high_score = 777;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Title);

        let input = TickInput {
            start_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.high_score, 777);
        assert!(state.drain_events().contains(&GameEvent::RunStarted));
    }

    #[test]
    fn test_pause_toggle_and_quit() {
        let mut state = start_run(3);

        let pause = TickInput {
            pause_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        // Nothing advances while paused
        let ticks_before = state.time_ticks;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, ticks_before);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Playing);

        tick(&mut state, &pause);
        let quit = TickInput {
            quit_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &quit);
        assert_eq!(state.phase, GamePhase::Title);
        assert!(state.drain_events().contains(&GameEvent::ReturnedToTitle));
    }

    #[test]
    fn test_spawn_timer_and_concurrency_cap() {
        let mut state = start_run(11);
        let config = &WAVE_CONFIG[0];
        let input = TickInput::default();

        // First spawn lands exactly on the spawn interval
        for _ in 0..config.spawn_interval - 1 {
            tick(&mut state, &input);
            assert!(state.enemies.is_empty());
        }
        tick(&mut state, &input);
        assert_eq!(state.enemies.len(), 1);

        // Cap of one concurrent enemy in wave 1: no further spawns while alive
        for _ in 0..config.spawn_interval * 2 {
            tick(&mut state, &input);
            assert!(state.enemies.len() <= config.max_concurrent);
        }
    }

    #[test]
    fn test_enemy_titles_round_robin() {
        let mut state = start_run(12);
        let input = TickInput::default();

        let mut seen = Vec::new();
        // Wave 1 clears at 5 kills; collect spawn titles by sniping each enemy
        while seen.len() < 5 {
            tick(&mut state, &input);
            if let Some(title) = snipe_first(&mut state) {
                seen.push(title);
            }
        }
        assert_eq!(seen, vec!["CEO", "CFO", "COO", "CTO", "CMO"]);
    }

    #[test]
    fn test_scenario_c_wave_advances_exactly_once() {
        let mut state = start_run(13);
        let input = TickInput::default();
        let config = &WAVE_CONFIG[0];

        // Destroy each enemy on its spawn tick
        let mut safety = 0;
        while state.wave == 0 {
            tick(&mut state, &input);
            snipe_first(&mut state);
            safety += 1;
            assert!(safety < 10_000, "wave never advanced");
        }

        assert_eq!(state.wave, 1);
        assert_eq!(state.enemies_cleared, 0);
        assert_eq!(state.wave_transition_timer, WAVE_TRANSITION_TICKS);
        let events = state.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::WaveCleared { .. }))
                .count(),
            1
        );
        // Clear bonus plus flawless bonus plus the five kills
        assert_eq!(
            state.score,
            WAVE_CLEAR_BONUS + NO_DAMAGE_BONUS + config.enemies_to_clear * SCORE_PER_ENEMY
        );

        // No spawns during the transition window
        for _ in 0..WAVE_TRANSITION_TICKS {
            tick(&mut state, &input);
            assert!(state.enemies.is_empty());
        }
        assert_eq!(state.wave_transition_timer, 0);
    }

    #[test]
    fn test_ground_reach_consumes_pink_slip() {
        let mut state = start_run(14);
        let input = TickInput::default();

        // Let the first enemy fall unopposed until it lands
        let mut safety = 0;
        while state.pink_slips == PINK_SLIPS_PER_SET {
            tick(&mut state, &input);
            safety += 1;
            assert!(safety < 10_000, "enemy never landed");
        }
        assert_eq!(state.pink_slips, PINK_SLIPS_PER_SET - 1);
        assert!(state.wave_damage_taken);
        assert!(state.enemies.is_empty());
        assert!(state.drain_events().contains(&GameEvent::PinkSlipUsed));
    }

    #[test]
    fn test_boss_spawns_past_final_wave() {
        let mut state = start_run(15);
        state.wave = TOTAL_WAVES;
        let input = TickInput::default();

        tick(&mut state, &input);
        assert!(state.boss.is_some());
        assert!(state.boss.as_ref().unwrap().entering);
        assert!(state.drain_events().contains(&GameEvent::BossAppeared));

        // No regular enemies spawn during the encounter
        for _ in 0..200 {
            tick(&mut state, &input);
        }
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_scenario_b_boss_defeat_to_victory() {
        let mut state = start_run(16);
        state.wave = TOTAL_WAVES;
        let input = TickInput::default();
        tick(&mut state, &input);

        // Finish the entrance
        while state.boss.as_ref().unwrap().entering {
            tick(&mut state, &input);
        }

        // Land exactly ten hits
        for _ in 0..BOSS_MAX_HP {
            state.boss_take_damage();
        }
        let boss = state.boss.as_ref().unwrap();
        assert_eq!(boss.hp, 0);
        assert!(boss.defeated);
        assert!(state.drain_events().contains(&GameEvent::BossDefeated));

        // Victory lands after exactly the defeat animation length
        for i in 1..BOSS_DEFEAT_TICKS {
            tick(&mut state, &input);
            assert_eq!(state.phase, GamePhase::Playing, "ended early at tick {i}");
        }
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(state.drain_events().contains(&GameEvent::Victory));
    }

    #[test]
    fn test_victory_returns_to_title() {
        let mut state = start_run(17);
        state.victory();
        state.drain_events();

        let input = TickInput {
            start_pressed: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Title);
    }

    #[test]
    fn test_determinism_with_frozen_wall_clock() {
        let mut a = start_run(99);
        let mut b = start_run(99);
        let input = TickInput {
            fire: true,
            left: true,
            ..Default::default()
        };

        for _ in 0..600 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.lasers.len(), b.lasers.len());
        assert_eq!(a.player.pos, b.player.pos);
    }
}
