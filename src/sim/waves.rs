//! Wave and boss-phase configuration tables
//!
//! Immutable, read-only lookups. An out-of-range wave index yields `None`,
//! which suppresses spawning rather than faulting.

/// Per-wave tuning for regular (non-boss) waves
#[derive(Debug, Clone, Copy)]
pub struct WaveConfig {
    /// Cap on simultaneously live enemies
    pub max_concurrent: usize,
    /// Fall speed in pixels per tick
    pub fall_speed: f32,
    /// Kills required to clear the wave
    pub enemies_to_clear: u32,
    /// Ticks between spawns while eligible
    pub spawn_interval: u32,
}

/// Regular wave table. Waves 1-3 trickle single enemies, 4-6 pairs,
/// 7-9 triples with relentless spawn gaps.
pub const WAVE_CONFIG: [WaveConfig; 9] = [
    WaveConfig { max_concurrent: 1, fall_speed: 3.0, enemies_to_clear: 5, spawn_interval: 30 },
    WaveConfig { max_concurrent: 1, fall_speed: 3.6, enemies_to_clear: 6, spawn_interval: 27 },
    WaveConfig { max_concurrent: 1, fall_speed: 4.5, enemies_to_clear: 7, spawn_interval: 25 },
    WaveConfig { max_concurrent: 2, fall_speed: 5.4, enemies_to_clear: 8, spawn_interval: 22 },
    WaveConfig { max_concurrent: 2, fall_speed: 6.3, enemies_to_clear: 9, spawn_interval: 19 },
    WaveConfig { max_concurrent: 2, fall_speed: 7.2, enemies_to_clear: 10, spawn_interval: 17 },
    WaveConfig { max_concurrent: 3, fall_speed: 8.4, enemies_to_clear: 11, spawn_interval: 15 },
    WaveConfig { max_concurrent: 3, fall_speed: 9.6, enemies_to_clear: 12, spawn_interval: 13 },
    WaveConfig { max_concurrent: 3, fall_speed: 10.8, enemies_to_clear: 13, spawn_interval: 11 },
];

/// Config lookup keyed by 0-based wave index
pub fn wave_config(wave: usize) -> Option<&'static WaveConfig> {
    WAVE_CONFIG.get(wave)
}

/// C-Suite titles, cycled round-robin by spawn index
pub const CSUITE_TITLES: [&str; 10] = [
    "CEO", "CFO", "COO", "CTO", "CMO", "CHRO", "CIO", "CSO", "CLO", "CPO",
];

/// Boss attack patterns, one per phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPattern {
    /// One homing business card
    Single,
    /// Two cards in a fixed symmetric spread
    Dual,
    /// Three-card fan plus a takeover beam aimed at launch
    Triple,
    /// Jittered card, coin-flip parachute, occasional beam
    Barrage,
}

/// A boss behavior tier selected by remaining-HP ratio
#[derive(Debug, Clone, Copy)]
pub struct BossPhase {
    /// Exclusive lower bound: phase matches while hp ratio is strictly above this
    pub hp_threshold: f32,
    /// Horizontal speed in pixels per tick
    pub speed: f32,
    pub pattern: AttackPattern,
    /// Multiplier on the base attack cooldown
    pub cooldown_mult: f32,
}

/// Phase table, evaluated in order; the final 0.0 entry is the implicit floor.
pub const BOSS_PHASES: [BossPhase; 4] = [
    BossPhase { hp_threshold: 0.70, speed: 3.0, pattern: AttackPattern::Single, cooldown_mult: 0.33 },
    BossPhase { hp_threshold: 0.40, speed: 5.4, pattern: AttackPattern::Dual, cooldown_mult: 0.25 },
    BossPhase { hp_threshold: 0.10, speed: 7.5, pattern: AttackPattern::Triple, cooldown_mult: 0.18 },
    BossPhase { hp_threshold: 0.00, speed: 9.0, pattern: AttackPattern::Barrage, cooldown_mult: 0.10 },
];

/// Select the active phase for an hp ratio: first entry whose threshold is
/// strictly below the ratio, falling back to the last (barrage) entry.
pub fn phase_for_ratio(hp_ratio: f32) -> &'static BossPhase {
    BOSS_PHASES
        .iter()
        .find(|p| hp_ratio > p.hp_threshold)
        .unwrap_or(&BOSS_PHASES[BOSS_PHASES.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wave_config_bounds() {
        assert!(wave_config(0).is_some());
        assert!(wave_config(8).is_some());
        assert!(wave_config(9).is_none());
        assert!(wave_config(usize::MAX).is_none());
    }

    #[test]
    fn test_phase_lookup_at_full_hp() {
        assert_eq!(phase_for_ratio(1.0).pattern, AttackPattern::Single);
        assert_eq!(phase_for_ratio(0.71).pattern, AttackPattern::Single);
    }

    #[test]
    fn test_phase_lookup_boundaries() {
        // Thresholds are exclusive lower bounds
        assert_eq!(phase_for_ratio(0.70).pattern, AttackPattern::Dual);
        assert_eq!(phase_for_ratio(0.40).pattern, AttackPattern::Triple);
        assert_eq!(phase_for_ratio(0.10).pattern, AttackPattern::Barrage);
        assert_eq!(phase_for_ratio(0.0).pattern, AttackPattern::Barrage);
    }

    // Thresholds are unique, so they identify the table entry. Pointer
    // comparison would not work here: BOSS_PHASES is a const and every
    // mention inlines a fresh value.
    fn phase_index(ratio: f32) -> usize {
        let phase = phase_for_ratio(ratio);
        BOSS_PHASES
            .iter()
            .position(|p| p.hp_threshold == phase.hp_threshold)
            .unwrap()
    }

    #[test]
    fn test_phase_index_resolves_across_full_range() {
        // The 0.0 ratio takes the fallback arm and must still map to the
        // barrage entry rather than failing the table lookup
        assert_eq!(phase_index(0.0), BOSS_PHASES.len() - 1);
        assert_eq!(phase_index(0.05), BOSS_PHASES.len() - 1);
        assert_eq!(phase_index(1.0), 0);
    }

    proptest! {
        #[test]
        fn phase_never_regresses_as_hp_falls(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
            prop_assert!(phase_index(lo) >= phase_index(hi));
        }
    }
}
