use crate::battle::runner::BattleOutcome;
use crate::battle::state::{BattleState, EndReason};
use crate::errors::{BattleEngineError, PreconditionError};
use crate::player::PlayerRecord;
use crate::progression::leveling::apply_experience;
use crate::progression::rewards::RewardCalculator;
use crate::repository::{PlayerRepository, RepositoryError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error(transparent)]
    Engine(#[from] BattleEngineError),
    #[error("player store error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<PreconditionError> for SettlementError {
    fn from(err: PreconditionError) -> Self {
        SettlementError::Engine(err.into())
    }
}

/// Per-player part of a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSettlement {
    pub player_id: String,
    pub xp_gained: u32,
    pub leveled_up: bool,
    pub new_level: u32,
    pub final_hp: u32,
    pub max_hp: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    pub winner_id: String,
    pub loser_id: String,
    pub xp_winner: u32,
    pub xp_loser: u32,
    pub winner: PlayerSettlement,
    pub loser: PlayerSettlement,
}

/// Apply a finished battle to both players' records.
///
/// Battle HP is persisted first, then experience and level-ups are applied,
/// so a level-up adds its HP increase on top of what the battle left. Both
/// records are written in a single `save_all`; on any error nothing is saved.
pub fn settle(
    repo: &dyn PlayerRepository,
    battle: &BattleState,
    outcome: &BattleOutcome,
    rewards: &RewardCalculator,
) -> Result<SettlementReport, SettlementError> {
    let award = rewards.award(outcome);
    let (winner_record, winner_settlement) =
        settle_player(repo, battle, outcome.winner_index, award.winner, true)?;
    let (loser_record, loser_settlement) =
        settle_player(repo, battle, outcome.loser_index, award.loser, false)?;

    repo.save_all(&[winner_record, loser_record])?;

    tracing::info!(
        battle_id = %battle.battle_id,
        winner = %winner_settlement.player_id,
        loser = %loser_settlement.player_id,
        xp_winner = award.winner,
        xp_loser = award.loser,
        forfeit = outcome.reason == EndReason::Forfeit,
        "battle settled"
    );

    Ok(SettlementReport {
        winner_id: winner_settlement.player_id.clone(),
        loser_id: loser_settlement.player_id.clone(),
        xp_winner: award.winner,
        xp_loser: award.loser,
        winner: winner_settlement,
        loser: loser_settlement,
    })
}

/// Compute one player's updated record without saving it.
fn settle_player(
    repo: &dyn PlayerRepository,
    battle: &BattleState,
    player_index: usize,
    xp: u32,
    won: bool,
) -> Result<(PlayerRecord, PlayerSettlement), SettlementError> {
    let player = &battle.players[player_index];
    let mut record = repo
        .load(&player.player_id)?
        .ok_or_else(|| PreconditionError::UnknownPlayer(player.player_id.clone()))?;

    record.set_hp(player.combatant.current_hp())?;
    let level_up = apply_experience(&mut record, xp)?;
    if won {
        record.wins += 1;
    } else {
        record.losses += 1;
    }

    let settlement = PlayerSettlement {
        player_id: record.player_id.clone(),
        xp_gained: xp,
        leveled_up: level_up.leveled_up(),
        new_level: record.level,
        final_hp: record.current_hp()?,
        max_hp: record.max_hp()?,
    };
    Ok((record, settlement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_player, TestCombatantBuilder};
    use crate::config::XpPolicy;
    use crate::repository::InMemoryPlayerRepo;
    use crate::species::Species;
    use pretty_assertions::assert_eq;

    fn finished_battle(winner_hp: u32) -> (BattleState, BattleOutcome) {
        let state = BattleState::new(
            "settle",
            create_test_player(
                "w",
                "Winner",
                TestCombatantBuilder::new(Species::Suimander, 1).with_hp(winner_hp).build(),
            ),
            create_test_player(
                "l",
                "Loser",
                TestCombatantBuilder::new(Species::Basaurimon, 1).with_hp(0).build(),
            ),
        );
        let outcome = BattleOutcome {
            winner_index: 0,
            loser_index: 1,
            reason: EndReason::Knockout,
            rounds: 4,
            damage_dealt: [110, 62],
            final_hp: [winner_hp, 0],
        };
        (state, outcome)
    }

    fn repo_with_players() -> InMemoryPlayerRepo {
        let mut winner = PlayerRecord::new("w", "Winner");
        winner.choose_champion(Species::Suimander).unwrap();
        let mut loser = PlayerRecord::new("l", "Loser");
        loser.choose_champion(Species::Basaurimon).unwrap();
        InMemoryPlayerRepo::with_records([winner, loser])
    }

    #[test]
    fn test_flat_settlement_updates_both_records() {
        let repo = repo_with_players();
        let (state, outcome) = finished_battle(40);

        let report = settle(&repo, &state, &outcome, &RewardCalculator::default()).unwrap();

        assert_eq!(report.xp_winner, 45);
        assert_eq!(report.xp_loser, 20);
        assert!(!report.winner.leveled_up);

        let winner = repo.load("w").unwrap().unwrap();
        assert_eq!((winner.wins, winner.losses, winner.xp), (1, 0, 45));
        assert_eq!(winner.hp, Some(40));

        let loser = repo.load("l").unwrap().unwrap();
        assert_eq!((loser.wins, loser.losses, loser.xp), (0, 1, 20));
        assert_eq!(loser.hp, Some(0));
    }

    #[test]
    fn test_level_up_adds_hp_on_top_of_battle_hp() {
        let repo = repo_with_players();
        let mut winner = repo.load("w").unwrap().unwrap();
        winner.xp = 50;
        repo.save(&winner).unwrap();
        let (state, outcome) = finished_battle(40);

        let report = settle(&repo, &state, &outcome, &RewardCalculator::default()).unwrap();

        assert!(report.winner.leveled_up);
        assert_eq!(report.winner.new_level, 2);
        assert_eq!(report.winner.final_hp, 49);
        assert_eq!(repo.load("w").unwrap().unwrap().xp, 50 + 45 - 63);
    }

    #[test]
    fn test_scaled_double_level_up() {
        let repo = repo_with_players();
        let mut winner = repo.load("w").unwrap().unwrap();
        // 60 XP short of clearing both thresholds (63 + 90)
        winner.xp = 93;
        repo.save(&winner).unwrap();
        let (state, outcome) = finished_battle(30);

        let report = settle(&repo, &state, &outcome, &RewardCalculator::new(XpPolicy::Scaled)).unwrap();

        // 50 + 4 * 4 + 110 * 0.06 = 72.6
        assert_eq!(report.xp_winner, 72);
        let winner = repo.load("w").unwrap().unwrap();
        assert_eq!(winner.level, 3);
        assert_eq!(winner.xp, 93 + 72 - 63 - 90);
        assert_eq!(winner.hp, Some(30 + 18));
    }

    #[test]
    fn test_unknown_player_commits_nothing() {
        let mut winner = PlayerRecord::new("w", "Winner");
        winner.choose_champion(Species::Suimander).unwrap();
        let repo = InMemoryPlayerRepo::with_records([winner.clone()]);
        let (state, outcome) = finished_battle(40);

        let result = settle(&repo, &state, &outcome, &RewardCalculator::default());

        assert!(matches!(
            result,
            Err(SettlementError::Engine(BattleEngineError::Precondition(
                PreconditionError::UnknownPlayer(_)
            )))
        ));
        assert_eq!(repo.load("w").unwrap(), Some(winner));
    }
}
