//! Host-facing battle service.
//!
//! [`Arena`] ties the engine to the player store: it checks preconditions,
//! keeps at most one battle per room, drives interactive battles through
//! discrete `submit_move` calls and settles finished battles exactly once.
//! Every mutation of a player record goes through one async lock, so
//! settlements, heals and daily claims for the same player never interleave.

use crate::battle::ai::TacticalAI;
use crate::battle::runner::{BattleOutcome, BattleRunner};
use crate::battle::state::{BattleEvent, TurnRng};
use crate::config::ArenaConfig;
use crate::errors::{ActionError, BattleEngineError, PreconditionError};
use crate::player::{BattlePlayer, PlayerAction, PlayerRecord, PlayerType};
use crate::progression::{settle, RewardCalculator, SettlementError, SettlementReport};
use crate::repository::{
    InMemoryPlayerRepo, JsonFilePlayerRepo, PlayerRepository, RepositoryError,
};
use crate::species::Species;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("a battle is already running in room {0}")]
    RoomBusy(String),

    #[error("no battle is running in room {0}")]
    NoSession(String),

    #[error("battle in room {room} was aborted: {source}")]
    Aborted {
        room: String,
        #[source]
        source: BattleEngineError,
    },

    #[error("arena lock was poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Engine(#[from] BattleEngineError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),
}

impl From<PreconditionError> for ArenaError {
    fn from(err: PreconditionError) -> Self {
        ArenaError::Engine(err.into())
    }
}

impl From<ActionError> for ArenaError {
    fn from(err: ActionError) -> Self {
        ArenaError::Engine(err.into())
    }
}

pub type ArenaResult<T> = std::result::Result<T, ArenaError>;

/// Everything the host needs once a battle is over.
#[derive(Debug, Clone)]
pub struct BattleReport {
    pub battle_id: String,
    pub events: Vec<BattleEvent>,
    /// Default text rendering of `events`.
    pub log: Vec<String>,
    pub outcome: BattleOutcome,
    pub settlement: SettlementReport,
}

/// Result of one step of an interactive battle.
#[derive(Debug, Clone)]
pub struct InteractiveUpdate {
    pub events: Vec<BattleEvent>,
    /// Player id whose move is awaited; `None` once the battle ended.
    pub awaiting: Option<String>,
    pub deadline: Option<Instant>,
    /// Present on the step that ended the battle.
    pub report: Option<BattleReport>,
}

struct Session {
    runner: BattleRunner,
    deadline: Option<Instant>,
}

enum RoomSlot {
    /// An automated battle is resolving.
    Auto,
    Interactive(Arc<tokio::sync::Mutex<Session>>),
}

/// Releases a room reservation unless disarmed.
struct RoomGuard<'a> {
    rooms: &'a Mutex<HashMap<String, RoomSlot>>,
    room: String,
    armed: bool,
}

impl RoomGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for RoomGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Ok(mut rooms) = self.rooms.lock() {
                rooms.remove(&self.room);
            }
        }
    }
}

pub struct Arena {
    repo: Arc<dyn PlayerRepository>,
    config: ArenaConfig,
    rewards: RewardCalculator,
    tactical_ai: bool,
    rooms: Mutex<HashMap<String, RoomSlot>>,
    records_lock: tokio::sync::Mutex<()>,
    battle_counter: AtomicU64,
}

impl Arena {
    pub fn new(repo: Arc<dyn PlayerRepository>, config: ArenaConfig) -> Self {
        let rewards = RewardCalculator::new(config.xp_policy.clone());
        Self {
            repo,
            config,
            rewards,
            tactical_ai: false,
            rooms: Mutex::new(HashMap::new()),
            records_lock: tokio::sync::Mutex::new(()),
            battle_counter: AtomicU64::new(0),
        }
    }

    /// Build an arena backed by the configured store: a JSON file when a
    /// path is set, memory otherwise.
    pub fn from_config(config: ArenaConfig) -> ArenaResult<Self> {
        let repo: Arc<dyn PlayerRepository> = match &config.player_store_path {
            Some(path) => Arc::new(JsonFilePlayerRepo::open(path)?),
            None => Arc::new(InMemoryPlayerRepo::new()),
        };
        Ok(Self::new(repo, config))
    }

    /// Use the tactical AI instead of uniform move choice for automated battles.
    pub fn with_tactical_ai(mut self, enabled: bool) -> Self {
        self.tactical_ai = enabled;
        self
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    // === Player records ===

    pub fn player(&self, player_id: &str) -> ArenaResult<PlayerRecord> {
        self.repo
            .load(player_id)?
            .ok_or_else(|| PreconditionError::UnknownPlayer(player_id.to_string()).into())
    }

    pub fn current_hp(&self, player_id: &str) -> ArenaResult<u32> {
        Ok(self.player(player_id)?.current_hp()?)
    }

    /// Create the record on first contact, or refresh the display name.
    pub async fn ensure_player(&self, player_id: &str, name: &str) -> ArenaResult<PlayerRecord> {
        let _records = self.records_lock.lock().await;
        let record = match self.repo.load(player_id)? {
            Some(mut record) => {
                if record.name == name {
                    return Ok(record);
                }
                record.name = name.to_string();
                record
            }
            None => {
                tracing::info!(player_id, "new player");
                PlayerRecord::new(player_id, name)
            }
        };
        self.repo.save(&record)?;
        Ok(record)
    }

    pub async fn choose_champion(&self, player_id: &str, species: Species) -> ArenaResult<PlayerRecord> {
        let _records = self.records_lock.lock().await;
        let mut record = self.player(player_id)?;
        record.choose_champion(species)?;
        self.repo.save(&record)?;
        tracing::info!(player_id, %species, "champion chosen");
        Ok(record)
    }

    /// Spend one healing item to restore full HP. Returns the HP restored.
    pub async fn heal_to_full(&self, player_id: &str) -> ArenaResult<(u32, PlayerRecord)> {
        let _records = self.records_lock.lock().await;
        let mut record = self.player(player_id)?;
        let restored = record.heal_to_full()?;
        self.repo.save(&record)?;
        Ok((restored, record))
    }

    /// Grant the daily items for `day_key`. Returns false if already claimed.
    pub async fn claim_daily(&self, player_id: &str, day_key: &str) -> ArenaResult<bool> {
        let _records = self.records_lock.lock().await;
        let mut record = self.player(player_id)?;
        let granted =
            record.claim_daily(day_key, self.config.daily_item_grant, self.config.item_cap);
        if granted {
            self.repo.save(&record)?;
        }
        Ok(granted)
    }

    // === Battles ===

    pub fn active_rooms(&self) -> ArenaResult<Vec<String>> {
        let rooms = self.rooms.lock().map_err(|_| ArenaError::LockPoisoned)?;
        let mut ids: Vec<String> = rooms.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    fn reserve_room(&self, room: &str) -> ArenaResult<RoomGuard<'_>> {
        let mut rooms = self.rooms.lock().map_err(|_| ArenaError::LockPoisoned)?;
        if rooms.contains_key(room) {
            return Err(ArenaError::RoomBusy(room.to_string()));
        }
        rooms.insert(room.to_string(), RoomSlot::Auto);
        Ok(RoomGuard {
            rooms: &self.rooms,
            room: room.to_string(),
            armed: true,
        })
    }

    fn build_runner(
        &self,
        room: &str,
        p1_id: &str,
        p2_id: &str,
        seed: Option<u64>,
        player_type: PlayerType,
    ) -> ArenaResult<BattleRunner> {
        if p1_id == p2_id {
            return Err(PreconditionError::SelfBattle.into());
        }
        let p1 = BattlePlayer::from_record(&self.player(p1_id)?, player_type)?;
        let p2 = BattlePlayer::from_record(&self.player(p2_id)?, player_type)?;
        let rng = match seed {
            Some(seed) => TurnRng::seeded(seed),
            None => TurnRng::new_random(),
        };
        let battle_id = format!(
            "{}-{}",
            room,
            self.battle_counter.fetch_add(1, Ordering::Relaxed) + 1
        );

        let mut runner = BattleRunner::new(battle_id, p1, p2, self.config.engine.clone(), rng);
        if self.tactical_ai {
            runner = runner
                .with_behavior(0, Box::new(TacticalAI::new()))
                .with_behavior(1, Box::new(TacticalAI::new()));
        }
        Ok(runner)
    }

    /// Map an engine failure: rejected requests pass through, anything else
    /// aborts the battle.
    fn engine_failure(room: &str, err: BattleEngineError) -> ArenaError {
        match err {
            BattleEngineError::Precondition(_) | BattleEngineError::Action(_) => {
                ArenaError::Engine(err)
            }
            other => {
                tracing::warn!(room, error = %other, "battle aborted; no records changed");
                ArenaError::Aborted {
                    room: room.to_string(),
                    source: other,
                }
            }
        }
    }

    async fn settle_finished(&self, runner: &BattleRunner) -> ArenaResult<BattleReport> {
        let outcome = runner.outcome().ok_or_else(|| {
            BattleEngineError::BattleState(crate::errors::BattleStateError::InconsistentState(
                "settling a battle that has not ended".to_string(),
            ))
        })?;

        let settlement = {
            let _records = self.records_lock.lock().await;
            settle(self.repo.as_ref(), runner.state(), &outcome, &self.rewards)?
        };

        Ok(BattleReport {
            battle_id: runner.state().battle_id.clone(),
            events: runner.get_all_events().to_vec(),
            log: runner.render_log(),
            outcome,
            settlement,
        })
    }

    /// Fight a fully automated battle and settle it.
    pub async fn run_auto_battle(
        &self,
        room: &str,
        p1_id: &str,
        p2_id: &str,
        seed: Option<u64>,
    ) -> ArenaResult<BattleReport> {
        let guard = self.reserve_room(room)?;
        let mut runner = self.build_runner(room, p1_id, p2_id, seed, PlayerType::Npc)?;

        runner
            .run_to_completion()
            .map_err(|err| Self::engine_failure(room, err))?;
        let report = self.settle_finished(&runner).await?;
        drop(guard);
        Ok(report)
    }

    /// Start a battle where both players pick their moves.
    pub async fn open_interactive(
        &self,
        room: &str,
        p1_id: &str,
        p2_id: &str,
        seed: Option<u64>,
    ) -> ArenaResult<InteractiveUpdate> {
        let guard = self.reserve_room(room)?;
        let mut runner = self.build_runner(room, p1_id, p2_id, seed, PlayerType::Human)?;
        let events = runner
            .start()
            .map_err(|err| Self::engine_failure(room, err))?;

        if runner.is_battle_ended() {
            let report = self.settle_finished(&runner).await?;
            drop(guard);
            return Ok(InteractiveUpdate {
                events,
                awaiting: None,
                deadline: None,
                report: Some(report),
            });
        }

        let mut session = Session {
            runner,
            deadline: None,
        };
        let update = self.prompt(&mut session, events);
        {
            let mut rooms = self.rooms.lock().map_err(|_| ArenaError::LockPoisoned)?;
            rooms.insert(
                room.to_string(),
                RoomSlot::Interactive(Arc::new(tokio::sync::Mutex::new(session))),
            );
        }
        guard.disarm();
        Ok(update)
    }

    /// Arm the move deadline for whoever is awaited.
    fn prompt(&self, session: &mut Session, events: Vec<BattleEvent>) -> InteractiveUpdate {
        let awaiting = session
            .runner
            .awaiting()
            .map(|i| session.runner.state().players[i].player_id.clone());
        session.deadline = awaiting
            .as_ref()
            .map(|_| Instant::now() + Duration::from_secs(self.config.move_timeout_secs));
        InteractiveUpdate {
            events,
            awaiting,
            deadline: session.deadline,
            report: None,
        }
    }

    fn session(&self, room: &str) -> ArenaResult<Arc<tokio::sync::Mutex<Session>>> {
        let rooms = self.rooms.lock().map_err(|_| ArenaError::LockPoisoned)?;
        match rooms.get(room) {
            Some(RoomSlot::Interactive(session)) => Ok(Arc::clone(session)),
            _ => Err(ArenaError::NoSession(room.to_string())),
        }
    }

    fn release_room(&self, room: &str) -> ArenaResult<()> {
        let mut rooms = self.rooms.lock().map_err(|_| ArenaError::LockPoisoned)?;
        rooms.remove(room);
        Ok(())
    }

    /// Apply one player's action to the battle in `room`.
    async fn act(&self, room: &str, actor_id: &str, action: PlayerAction) -> ArenaResult<InteractiveUpdate> {
        let session = self.session(room)?;
        let mut session = session.lock().await;

        let player_index = session
            .runner
            .state()
            .players
            .iter()
            .position(|p| p.player_id == actor_id)
            .ok_or_else(|| ActionError::NotAParticipant(actor_id.to_string()))?;
        if session.runner.is_battle_ended() {
            return Err(ActionError::BattleNotAcceptingActions.into());
        }

        let events = match session.runner.submit_action(player_index, action) {
            Ok(events) => events,
            Err(err) => {
                let failure = Self::engine_failure(room, err);
                if matches!(failure, ArenaError::Aborted { .. }) {
                    self.release_room(room)?;
                }
                return Err(failure);
            }
        };

        if session.runner.is_battle_ended() {
            self.release_room(room)?;
            let report = self.settle_finished(&session.runner).await?;
            return Ok(InteractiveUpdate {
                events,
                awaiting: None,
                deadline: None,
                report: Some(report),
            });
        }
        Ok(self.prompt(&mut session, events))
    }

    /// Submit the acting player's move. Only the awaited player may submit.
    pub async fn submit_move(
        &self,
        room: &str,
        actor_id: &str,
        move_index: usize,
    ) -> ArenaResult<InteractiveUpdate> {
        self.act(room, actor_id, PlayerAction::UseMove { move_index }).await
    }

    /// Concede the battle in `room`. Either participant may forfeit at any time.
    pub async fn forfeit(&self, room: &str, actor_id: &str) -> ArenaResult<InteractiveUpdate> {
        tracing::info!(room, actor_id, "forfeit");
        self.act(room, actor_id, PlayerAction::Forfeit).await
    }

    /// Forfeit the awaited player in every session whose deadline passed.
    pub async fn expire_timeouts(&self) -> Vec<(String, ArenaResult<InteractiveUpdate>)> {
        let sessions: Vec<(String, Arc<tokio::sync::Mutex<Session>>)> = match self.rooms.lock() {
            Ok(rooms) => rooms
                .iter()
                .filter_map(|(room, slot)| match slot {
                    RoomSlot::Interactive(session) => Some((room.clone(), Arc::clone(session))),
                    RoomSlot::Auto => None,
                })
                .collect(),
            Err(_) => return vec![(String::new(), Err(ArenaError::LockPoisoned))],
        };

        let now = Instant::now();
        let mut expired = Vec::new();
        for (room, session) in sessions {
            let overdue = {
                let session = session.lock().await;
                match (session.deadline, session.runner.awaiting()) {
                    (Some(deadline), Some(index)) if deadline <= now => {
                        Some(session.runner.state().players[index].player_id.clone())
                    }
                    _ => None,
                }
            };
            if let Some(actor_id) = overdue {
                tracing::warn!(room = %room, actor_id = %actor_id, "move timed out");
                let result = self.act(&room, &actor_id, PlayerAction::Forfeit).await;
                expired.push((room, result));
            }
        }
        expired
    }

    /// Run [`Arena::expire_timeouts`] on a fixed interval until the task is aborted.
    pub fn spawn_timeout_sweeper(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                for (room, result) in self.expire_timeouts().await {
                    if let Err(err) = result {
                        tracing::warn!(room = %room, error = %err, "timeout forfeit failed");
                    }
                }
            }
        })
    }
}
