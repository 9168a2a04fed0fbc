//! The one live game, held for whatever transport sits in front of it.
//!
//! `GameHost` serializes every mutation behind a mutex, resolves callers by
//! their secret, checks turn ownership before a turn action and logs what
//! was accepted or refused. Every success hands back a redacted snapshot for
//! broadcasting, stamped with a version that only moves forward.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::OsRng;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::engine::{
    bank_turn_score, ensure_can_act, finish_game, player_by_secret, roll_turn_dice, start_game,
    toggle_die_selection,
};
use crate::error::{EngineError, EngineResult};
use crate::factory::{create_new_game, create_player};
use crate::lobby::{add_player, remove_player, reset_game, set_player_connected, update_config};
use crate::model::{Game, Outcome, PlayerId};
use crate::rng::{DiceSource, RngDice};

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u64,
    pub game: Game,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Handed only to the player who joined; never part of a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub player_id: PlayerId,
    pub secret: String,
}

struct Inner<D> {
    game: Option<Game>,
    version: u64,
    dice: D,
}

pub struct GameHost<D> {
    inner: Mutex<Inner<D>>,
}

impl GameHost<RngDice<OsRng>> {
    pub fn secure() -> Self {
        Self::new(RngDice::secure())
    }
}

fn authorize(game: &Game, secret: &str) -> EngineResult<PlayerId> {
    player_by_secret(game, secret).map(|p| p.id.clone()).ok_or(EngineError::Unauthorized)
}

impl<D: DiceSource> GameHost<D> {
    pub fn new(dice: D) -> Self {
        Self { inner: Mutex::new(Inner { game: None, version: 0, dice }) }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<D>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against the current game and swaps in its result.
    fn apply<T>(
        &self,
        action: &'static str,
        f: impl FnOnce(&Game, &mut D) -> EngineResult<(Game, T)>,
    ) -> EngineResult<(T, Snapshot)> {
        let mut guard = self.lock();
        let Inner { game, version, dice } = &mut *guard;
        let result = match game.as_ref() {
            Some(current) => f(current, dice),
            None => Err(EngineError::NoGame),
        };
        match result {
            Ok((next, value)) => {
                *version += 1;
                let snapshot = Snapshot { version: *version, game: next.redacted() };
                *game = Some(next);
                debug!(action, version = *version, "action applied");
                Ok((value, snapshot))
            }
            Err(err) => {
                warn!(action, code = err.code(), error = %err, "action rejected");
                Err(err)
            }
        }
    }

    /// Like `apply`, for the player holding `secret` on their own turn.
    fn turn_action<T>(
        &self,
        action: &'static str,
        secret: &str,
        f: impl FnOnce(&Game, &mut D) -> EngineResult<(Game, T)>,
    ) -> EngineResult<(T, Snapshot)> {
        self.apply(action, |game, dice| {
            let player_id = authorize(game, secret)?;
            ensure_can_act(game, &player_id)?;
            f(game, dice)
        })
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        let guard = self.lock();
        guard.game.as_ref().map(|game| Snapshot { version: guard.version, game: game.redacted() })
    }

    /// Replaces whatever game was running with an empty lobby.
    pub fn create_game(&self, config: GameConfig) -> EngineResult<Snapshot> {
        if let Err(err) = config.validate() {
            warn!(action = "create_game", code = err.code(), error = %err, "action rejected");
            return Err(err);
        }
        let mut guard = self.lock();
        let game = create_new_game(config);
        guard.version += 1;
        info!(game_id = %game.id, target = config.target_score, minimum_entry = config.minimum_entry_score, "game created");
        let snapshot = Snapshot { version: guard.version, game: game.redacted() };
        guard.game = Some(game);
        Ok(snapshot)
    }

    pub fn join(&self, name: &str) -> EngineResult<(Credentials, Snapshot)> {
        let player = create_player(Uuid::new_v4().to_string(), name);
        let credentials = Credentials { player_id: player.id.clone(), secret: player.secret.clone() };
        let (_, snapshot) = self.apply("join", |game, _| Ok((add_player(game, player)?, ())))?;
        info!(player = %credentials.player_id, name, "player joined");
        Ok((credentials, snapshot))
    }

    pub fn leave(&self, secret: &str) -> EngineResult<Snapshot> {
        let (player_id, snapshot) = self.apply("leave", |game, _| {
            let player_id = authorize(game, secret)?;
            Ok((remove_player(game, &player_id)?, player_id))
        })?;
        info!(player = %player_id, "player left");
        Ok(snapshot)
    }

    /// Marks the owner of `secret` connected again and tells the caller who
    /// they are.
    pub fn reconnect(&self, secret: &str) -> EngineResult<(PlayerId, Snapshot)> {
        let (player_id, snapshot) = self.apply("reconnect", |game, _| {
            let player_id = authorize(game, secret)?;
            Ok((set_player_connected(game, &player_id, true)?, player_id))
        })?;
        info!(player = %player_id, "player reconnected");
        Ok((player_id, snapshot))
    }

    /// Keyed by id rather than secret: the transport calls this when it sees
    /// a connection drop, and must not expose it to clients.
    pub fn disconnect(&self, player_id: &str) -> EngineResult<Snapshot> {
        let (_, snapshot) =
            self.apply("disconnect", |game, _| Ok((set_player_connected(game, player_id, false)?, ())))?;
        info!(player = %player_id, "player disconnected");
        Ok(snapshot)
    }

    pub fn update_config(&self, config: GameConfig) -> EngineResult<Snapshot> {
        let (_, snapshot) = self.apply("update_config", |game, _| Ok((update_config(game, config)?, ())))?;
        Ok(snapshot)
    }

    /// Any seated player may start the game.
    pub fn start(&self, secret: &str) -> EngineResult<Snapshot> {
        let (_, snapshot) = self.apply("start", |game, dice| {
            authorize(game, secret)?;
            Ok((start_game(game, dice)?.game, ()))
        })?;
        info!(game_id = %snapshot.game.id, order = ?snapshot.game.turn_order, "game started");
        Ok(snapshot)
    }

    pub fn toggle(&self, secret: &str, die_index: usize) -> EngineResult<Snapshot> {
        let (_, snapshot) =
            self.turn_action("toggle", secret, |game, _| Ok((toggle_die_selection(game, die_index)?, ())))?;
        Ok(snapshot)
    }

    pub fn roll(&self, secret: &str) -> EngineResult<(Outcome, Snapshot)> {
        let (outcome, snapshot) = self.turn_action("roll", secret, |game, dice| {
            let transition = roll_turn_dice(game, dice)?;
            Ok((transition.game, transition.outcome))
        })?;
        debug!(outcome = ?outcome, version = snapshot.version, "dice rolled");
        if snapshot.game.finished_at_ms.is_some() {
            info!(game_id = %snapshot.game.id, "game finished");
        }
        Ok((outcome, snapshot))
    }

    pub fn bank(&self, secret: &str) -> EngineResult<(Outcome, Snapshot)> {
        let (outcome, snapshot) = self.turn_action("bank", secret, |game, _| {
            let transition = bank_turn_score(game)?;
            Ok((transition.game, transition.outcome))
        })?;
        info!(outcome = ?outcome, version = snapshot.version, "turn banked");
        if outcome == Outcome::GameFinished {
            info!(game_id = %snapshot.game.id, "game finished");
        }
        Ok((outcome, snapshot))
    }

    /// Any seated player may end the game early.
    pub fn finish(&self, secret: &str) -> EngineResult<Snapshot> {
        let (_, snapshot) = self.apply("finish", |game, _| {
            authorize(game, secret)?;
            Ok((finish_game(game)?, ()))
        })?;
        info!(game_id = %snapshot.game.id, "game finished");
        Ok(snapshot)
    }

    /// Fresh lobby with the current config; every player is dropped. Needs a
    /// seated player's secret.
    pub fn reset(&self, secret: &str) -> EngineResult<Snapshot> {
        let (_, snapshot) = self.apply("reset", |game, _| {
            authorize(game, secret)?;
            Ok((reset_game(game), ()))
        })?;
        info!(game_id = %snapshot.game.id, "game reset");
        Ok(snapshot)
    }
}
