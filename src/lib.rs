//! Authoritative state engine for a multiplayer Farkle table.
//!
//! Scoring lives in [`rules`], the turn state machine in [`engine`], roster
//! changes in [`lobby`]. All of them take a `&Game` and return a new one.
//! [`session::GameHost`] is the mutex-guarded holder a server keeps around.

pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod lobby;
pub mod model;
pub mod rng;
pub mod rules;
pub mod session;

pub use config::GameConfig;
pub use engine::{
    active_player_id, advance_to_next_turn, bank_turn_score, ensure_can_act, finish_game, is_players_turn,
    player_by_secret, roll_turn_dice, standings, start_game, toggle_die_selection, winners,
};
pub use error::{EngineError, EngineResult};
pub use factory::{create_new_game, create_player, new_turn, unrevealed_dice};
pub use lobby::{add_player, remove_player, reset_game, set_player_connected, update_config};
pub use model::*;
pub use rng::{DiceSource, RngDice, ScriptedDice};
pub use rules::{best_scoring_subset, is_bust, score_selection, ScoringSubset, SelectionScore};
pub use session::{Credentials, GameHost, Snapshot};

/// New lobby with the given thresholds, taken as-is.
///
/// Range checks are a lobby rule: `update_config` and `GameHost::create_game`
/// run `GameConfig::validate`, this does not.
pub fn create_game_with(minimum_entry_score: u32, target_score: u32) -> Game {
    create_new_game(GameConfig { minimum_entry_score, target_score })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_game_with_keeps_thresholds_unchecked() {
        let game = create_game_with(800, 600);
        assert_eq!(game.phase, GamePhase::Lobby);
        assert_eq!(game.config, GameConfig { minimum_entry_score: 800, target_score: 600 });
        let err = update_config(&game, game.config).unwrap_err();
        assert_eq!(err.code(), "invalid_config");
    }
}
