use crate::battle::state::{BattleState, TurnRng};
use crate::champion::Combatant;
use crate::errors::BattleResult;
use crate::player::{BattlePlayer, PlayerType};
use crate::species::Species;
use schema::Move;

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let champion = TestCombatantBuilder::new(Species::Suimander, 5)
///     .with_hp(40)
///     .with_burn(2)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    species: Species,
    level: u32,
    moves: Option<Vec<Move>>,
    current_hp: Option<u32>,
    burn_turns: u8,
    sleep_turns: u8,
}

impl TestCombatantBuilder {
    /// Creates a new builder for a given species and level.
    pub fn new(species: Species, level: u32) -> Self {
        Self {
            species,
            level,
            moves: None,
            current_hp: None,
            burn_turns: 0,
            sleep_turns: 0,
        }
    }

    /// Replaces the species move list.
    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = Some(moves);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_burn(mut self, turns: u8) -> Self {
        self.burn_turns = turns;
        self
    }

    pub fn with_sleep(mut self, turns: u8) -> Self {
        self.sleep_turns = turns;
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = match Combatant::new(self.species, self.level, self.current_hp) {
            Ok(c) => c,
            Err(err) => panic!("Failed to build {:?}: {}", self.species, err),
        };
        if let Some(moves) = self.moves {
            combatant.moves = moves;
        }
        combatant.burn_turns = self.burn_turns;
        combatant.sleep_turns = self.sleep_turns;
        combatant
    }
}

/// Creates an automated test player.
pub fn create_test_player(id: &str, name: &str, combatant: Combatant) -> BattlePlayer {
    BattlePlayer::new(id, name, PlayerType::Npc, combatant)
}

/// Creates an interactive test player.
pub fn create_human_player(id: &str, name: &str, combatant: Combatant) -> BattlePlayer {
    BattlePlayer::new(id, name, PlayerType::Human, combatant)
}

/// Creates a standard 1v1 battle state for testing.
pub fn create_test_battle(p1: Combatant, p2: Combatant) -> BattleState {
    BattleState::new(
        "test_battle",
        create_test_player("p1", "Player 1", p1),
        create_test_player("p2", "Player 2", p2),
    )
}

/// Creates a `TurnRng` with a generous buffer of mid-range draws.
/// Mid-range draws hit every move in the catalog, never crit and never burn.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![0.5; 400])
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
