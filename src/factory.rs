//! Fresh snapshot pieces with their starting values.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::model::{Die, FinalRound, Game, GamePhase, Player, PlayerId, Selection, Turn, TurnStatus, DICE_PER_TURN};

const SECRET_LEN: usize = 32;

pub(crate) fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

pub fn create_new_game(config: GameConfig) -> Game {
    Game {
        id: Uuid::new_v4().to_string(),
        phase: GamePhase::Lobby,
        config,
        players: Vec::new(),
        turn_order: Vec::new(),
        active_turn_index: 0,
        turn: None,
        final_round: FinalRound::NotTriggered,
        created_at_ms: now_ms(),
        finished_at_ms: None,
    }
}

pub fn create_player(id: impl Into<PlayerId>, name: impl Into<String>) -> Player {
    let secret: String = OsRng.sample_iter(&Alphanumeric).take(SECRET_LEN).map(char::from).collect();
    Player {
        id: id.into(),
        secret,
        name: name.into(),
        score: 0,
        has_entered_game: false,
        connected: true,
        joined_at_ms: now_ms(),
    }
}

pub fn unrevealed_dice() -> Vec<Die> {
    vec![Die::unrevealed(); DICE_PER_TURN]
}

/// A turn waiting for its first roll.
///
/// # Panics
///
/// If `dice` is empty or holds more than six dice; both are caller bugs.
pub fn new_turn(player_id: PlayerId, dice: Vec<Die>) -> Turn {
    assert!(!dice.is_empty(), "a turn needs at least one die");
    assert!(dice.len() <= DICE_PER_TURN, "a turn holds at most {DICE_PER_TURN} dice");
    Turn {
        player_id,
        dice,
        accumulated_score: 0,
        selection: Selection::default(),
        status: TurnStatus::AwaitingFirstRoll,
        best_selectable_score: 0,
    }
}
