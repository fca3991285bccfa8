use crate::battle::state::TurnRng;
use crate::champion::Combatant;
use crate::config::EngineConfig;
use schema::{MoveData, MoveKind};

/// Calculate effective defense including defense stages. Never below 1.
pub fn effective_defense(combatant: &Combatant, config: &EngineConfig) -> f64 {
    let multiplier = 1.0 + config.defense_stage_step * combatant.defense_stage as f64;
    (combatant.defense as f64 * multiplier).max(1.0)
}

/// Speed multiplier from the combatant's current speed stage.
pub fn speed_multiplier(combatant: &Combatant, config: &EngineConfig) -> f64 {
    1.0 + config.speed_stage_step * combatant.speed_stage as f64
}

/// Calculate effective speed including speed stages.
pub fn effective_speed(combatant: &Combatant, config: &EngineConfig) -> f64 {
    combatant.speed as f64 * speed_multiplier(combatant, config)
}

/// Accuracy gate: a draw above the move's accuracy misses.
pub fn move_hits(move_data: &MoveData, rng: &mut TurnRng) -> bool {
    let draw = rng.next_outcome("Accuracy Check");
    draw <= move_data.accuracy
}

pub fn crit_chance(kind: &MoveKind, config: &EngineConfig) -> f64 {
    let bonus = match kind {
        MoveKind::HighCritDamage { crit_bonus } => *crit_bonus,
        _ => 0.0,
    };
    (config.base_crit_chance + bonus).clamp(0.0, 1.0)
}

pub fn roll_critical_hit(kind: &MoveKind, config: &EngineConfig, rng: &mut TurnRng) -> bool {
    rng.chance(crit_chance(kind, config), "Critical Hit Check")
}

/// Pre-jitter damage for a hit.
pub fn base_damage(level: u32, power: u16, attack: u32, effective_defense: f64) -> f64 {
    let level_factor = 2.0 * level as f64 / 5.0 + 2.0;
    let raw = level_factor * power as f64 * attack as f64 / effective_defense.max(1.0);
    raw / 6.0 + 2.0
}

/// Apply the multipliers and round. A landed hit always does at least 1.
pub fn finalize_damage(base: f64, jitter: f64, type_multiplier: f64, crit_multiplier: f64) -> u32 {
    let damage = (base * jitter * type_multiplier * crit_multiplier).round();
    damage.max(1.0) as u32
}

/// Burn damage per tick, a fixed share of max HP.
pub fn burn_tick_damage(max_hp: u32, config: &EngineConfig) -> u32 {
    let share = (max_hp as f64 * config.burn_fraction).round() as u32;
    share.max(config.min_burn_damage as u32)
}

pub fn heal_amount(max_hp: u32, fraction: f64) -> u32 {
    (max_hp as f64 * fraction).round() as u32
}

/// Probability that player 1 acts first given both speeds.
pub fn first_mover_probability(speed1: f64, speed2: f64) -> f64 {
    (0.5 + (speed1 - speed2) / 40.0).clamp(0.25, 0.75)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatantBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::Species;

    #[test]
    fn test_defense_stages_raise_effective_defense() {
        let config = EngineConfig::default();
        let mut tank = TestCombatantBuilder::new(Species::Suiqrtle, 1).build();
        assert_eq!(effective_defense(&tank, &config), 14.0);
        tank.defense_stage = 3;
        assert!((effective_defense(&tank, &config) - 14.0 * 1.36).abs() < 1e-9);
    }

    #[test]
    fn test_effective_defense_has_floor_of_one() {
        let mut c = TestCombatantBuilder::new(Species::Suimander, 1).build();
        c.defense = 0;
        assert_eq!(effective_defense(&c, &EngineConfig::default()), 1.0);
    }

    #[test]
    fn test_base_damage_matches_formula() {
        // (2.4 * 40 * 22 / 12) / 6 + 2
        let base = base_damage(1, 40, 22, 12.0);
        assert!((base - 31.333_333).abs() < 1e-3);
    }

    #[rstest]
    #[case(0.0, 1.0, 1.0, 1.0, 1)]
    #[case(31.333, 1.0, 1.5, 1.0, 47)]
    #[case(31.333, 0.92, 1.5, 1.0, 43)]
    #[case(31.333, 1.08, 1.5, 1.5, 76)]
    fn test_finalize_damage(
        #[case] base: f64,
        #[case] jitter: f64,
        #[case] type_mult: f64,
        #[case] crit_mult: f64,
        #[case] expected: u32,
    ) {
        assert_eq!(finalize_damage(base, jitter, type_mult, crit_mult), expected);
    }

    #[rstest]
    #[case(102, 6)]
    #[case(20, 2)]
    #[case(115, 7)]
    fn test_burn_tick_damage(#[case] max_hp: u32, #[case] expected: u32) {
        assert_eq!(burn_tick_damage(max_hp, &EngineConfig::default()), expected);
    }

    #[rstest]
    #[case(10.0, 10.0, 0.5)]
    #[case(12.0, 8.0, 0.6)]
    #[case(40.0, 0.0, 0.75)]
    #[case(0.0, 40.0, 0.25)]
    fn test_first_mover_probability(#[case] s1: f64, #[case] s2: f64, #[case] expected: f64) {
        assert!((first_mover_probability(s1, s2) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_high_crit_adds_bonus() {
        let config = EngineConfig::default();
        assert_eq!(crit_chance(&MoveKind::Damage, &config), 0.08);
        let high = crit_chance(&MoveKind::HighCritDamage { crit_bonus: 0.10 }, &config);
        assert!((high - 0.18).abs() < 1e-9);
    }
}
