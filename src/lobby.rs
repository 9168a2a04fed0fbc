//! Roster and configuration changes before play starts.

use crate::config::GameConfig;
use crate::error::{EngineError, EngineResult};
use crate::factory::create_new_game;
use crate::model::{Game, GamePhase, Player};

pub(crate) fn ensure_lobby(game: &Game) -> EngineResult<()> {
    match game.phase {
        GamePhase::Lobby => Ok(()),
        GamePhase::InProgress => Err(EngineError::GameAlreadyStarted),
        GamePhase::Finished => Err(EngineError::GameAlreadyFinished),
    }
}

/// Seats `player` at the end of the roster and the turn order.
pub fn add_player(game: &Game, player: Player) -> EngineResult<Game> {
    ensure_lobby(game)?;
    if game.player(&player.id).is_some() {
        return Err(EngineError::DuplicatePlayer(player.id));
    }
    let mut next = game.clone();
    next.turn_order.push(player.id.clone());
    next.players.push(player);
    Ok(next)
}

pub fn remove_player(game: &Game, player_id: &str) -> EngineResult<Game> {
    ensure_lobby(game)?;
    if game.player(player_id).is_none() {
        return Err(EngineError::PlayerNotFound(player_id.to_string()));
    }
    let mut next = game.clone();
    next.players.retain(|p| p.id != player_id);
    next.turn_order.retain(|id| id != player_id);
    Ok(next)
}

pub fn update_config(game: &Game, config: GameConfig) -> EngineResult<Game> {
    ensure_lobby(game)?;
    config.validate()?;
    let mut next = game.clone();
    next.config = config;
    Ok(next)
}

/// Allowed in every phase; only the flag changes.
pub fn set_player_connected(game: &Game, player_id: &str, connected: bool) -> EngineResult<Game> {
    let mut next = game.clone();
    let player = next
        .player_mut(player_id)
        .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_string()))?;
    player.connected = connected;
    Ok(next)
}

/// Empty lobby with the same configuration. The only way to drop players
/// once the game has started.
pub fn reset_game(game: &Game) -> Game {
    create_new_game(game.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create_player;

    fn lobby_with(names: &[&str]) -> Game {
        names.iter().fold(create_new_game(GameConfig::default()), |game, name| {
            add_player(&game, create_player(*name, *name)).unwrap()
        })
    }

    #[test]
    fn test_add_keeps_roster_and_order_in_step() {
        let game = lobby_with(&["alice", "bob", "carol"]);
        let ids: Vec<&str> = game.players.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob", "carol"]);
        assert_eq!(game.turn_order, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let game = lobby_with(&["alice"]);
        let err = add_player(&game, create_player("alice", "Other Alice")).unwrap_err();
        assert_eq!(err, EngineError::DuplicatePlayer("alice".into()));
        assert_eq!(game.players.len(), 1);
    }

    #[test]
    fn test_remove_player() {
        let game = lobby_with(&["alice", "bob", "carol"]);
        let next = remove_player(&game, "bob").unwrap();
        assert_eq!(next.turn_order, vec!["alice", "carol"]);
        assert_eq!(next.players.len(), 2);
        assert_eq!(game.players.len(), 3);
        assert_eq!(remove_player(&next, "bob").unwrap_err().code(), "player_not_found");
    }

    #[test]
    fn test_lobby_only() {
        let mut game = lobby_with(&["alice"]);
        game.phase = GamePhase::InProgress;
        assert_eq!(add_player(&game, create_player("bob", "Bob")).unwrap_err(), EngineError::GameAlreadyStarted);
        assert_eq!(remove_player(&game, "alice").unwrap_err(), EngineError::GameAlreadyStarted);
        game.phase = GamePhase::Finished;
        assert_eq!(update_config(&game, GameConfig::default()).unwrap_err(), EngineError::GameAlreadyFinished);
    }

    #[test]
    fn test_update_config_validates() {
        let game = lobby_with(&[]);
        let next = update_config(&game, GameConfig { minimum_entry_score: 0, target_score: 2000 }).unwrap();
        assert_eq!(next.config.target_score, 2000);
        let bad = GameConfig { minimum_entry_score: 3000, target_score: 2000 };
        assert_eq!(update_config(&game, bad).unwrap_err().code(), "invalid_config");
    }

    #[test]
    fn test_connection_flag_any_phase() {
        let mut game = lobby_with(&["alice"]);
        game.phase = GamePhase::InProgress;
        let next = set_player_connected(&game, "alice", false).unwrap();
        assert!(!next.player("alice").unwrap().connected);
        assert!(game.player("alice").unwrap().connected);
        assert!(set_player_connected(&game, "zed", true).is_err());
    }

    #[test]
    fn test_reset_clears_players_keeps_config() {
        let mut game = lobby_with(&["alice", "bob"]);
        game.config.target_score = 4000;
        game.phase = GamePhase::Finished;
        let fresh = reset_game(&game);
        assert_eq!(fresh.phase, GamePhase::Lobby);
        assert!(fresh.players.is_empty());
        assert_eq!(fresh.config.target_score, 4000);
        assert_ne!(fresh.id, game.id);
    }
}
