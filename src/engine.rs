//! Turn state machine.
//!
//! Every transition clones the snapshot it is given, works on the clone and
//! hands it back only on success, so a rejected request leaves the caller's
//! game exactly as it was.

use crate::error::{EngineError, EngineResult};
use crate::factory::{new_turn, now_ms, unrevealed_dice};
use crate::lobby::ensure_lobby;
use crate::model::{
    Die, FinalRound, Game, GamePhase, Outcome, Player, PlayerId, Selection, Transition, Turn, TurnStatus,
    DICE_PER_TURN,
};
use crate::rng::DiceSource;
use crate::rules::{best_scoring_indices, is_bust, score_selection};

fn ensure_in_progress(game: &Game) -> EngineResult<()> {
    match game.phase {
        GamePhase::InProgress => Ok(()),
        GamePhase::Lobby => Err(EngineError::GameNotInProgress),
        GamePhase::Finished => Err(EngineError::GameAlreadyFinished),
    }
}

fn begin_turn(game: &mut Game) {
    let player_id = game.turn_order[game.active_turn_index].clone();
    game.turn = Some(new_turn(player_id, unrevealed_dice()));
}

/// Moves to the next seat in turn order, wrapping. During a final round only
/// players still owed a turn are considered.
fn move_to_next_player(game: &mut Game) {
    let seats = game.turn_order.len();
    let mut index = game.active_turn_index;
    for _ in 0..seats {
        index = (index + 1) % seats;
        let id = &game.turn_order[index];
        if !game.final_round.is_active() || game.final_round.is_pending(id) {
            break;
        }
    }
    game.active_turn_index = index;
    begin_turn(game);
}

fn finish_in_place(game: &mut Game) {
    game.phase = GamePhase::Finished;
    game.turn = None;
    game.finished_at_ms = Some(now_ms());
}

/// Bookkeeping once `player_id`'s turn is over, banked or bust.
fn close_turn(game: &mut Game, player_id: &str) -> Outcome {
    game.turn = None;
    if let FinalRound::Active { pending, .. } = &mut game.final_round {
        pending.retain(|id| id != player_id);
        if pending.is_empty() {
            finish_in_place(game);
            return Outcome::GameFinished;
        }
    }
    move_to_next_player(game);
    Outcome::Continue
}

/// Recomputes the best subset of the selectable dice and pre-selects it.
fn refresh_selection(turn: &mut Turn) {
    let selectable = turn.selectable_indices();
    let faces = turn.selectable_faces();
    let (picked, score) = best_scoring_indices(&faces);
    turn.best_selectable_score = score;
    if picked.is_empty() || score == 0 {
        turn.selection = Selection::default();
        turn.status = TurnStatus::AwaitingSelection;
    } else {
        let indices = picked.into_iter().map(|i| selectable[i]).collect();
        turn.selection = Selection { indices, is_valid: true, score };
        turn.status = TurnStatus::AwaitingRoll;
    }
}

fn check_rollable(selection: &Selection) -> EngineResult<()> {
    if selection.is_empty() {
        return Err(EngineError::SelectionRequired);
    }
    if !selection.is_valid {
        return Err(EngineError::InvalidSelection);
    }
    Ok(())
}

/// Locks the selected dice and rerolls the rest. Returns true for hot dice,
/// where the selection covered every selectable die and all six come back.
fn reroll_unselected(turn: &mut Turn, dice: &mut impl DiceSource) -> bool {
    let selectable = turn.selectable_indices();
    if selectable.iter().all(|&i| turn.selection.contains(i)) {
        turn.dice = dice.roll_faces(DICE_PER_TURN).into_iter().map(Die::rolled).collect();
        return true;
    }
    for i in selectable {
        if turn.selection.contains(i) {
            turn.dice[i].selectable = false;
        } else {
            turn.dice[i] = Die::rolled(dice.roll_face());
        }
    }
    false
}

/// Shuffles the seating and hands the first turn to whoever lands first.
pub fn start_game(game: &Game, dice: &mut impl DiceSource) -> EngineResult<Transition> {
    ensure_lobby(game)?;
    if game.players.is_empty() {
        return Err(EngineError::NoPlayers);
    }
    let mut next = game.clone();
    next.turn_order = dice.shuffle(&game.turn_order);
    next.phase = GamePhase::InProgress;
    next.active_turn_index = 0;
    next.final_round = FinalRound::NotTriggered;
    begin_turn(&mut next);
    Ok(Transition::new(next, Outcome::Continue))
}

pub fn advance_to_next_turn(game: &Game) -> EngineResult<Game> {
    ensure_in_progress(game)?;
    if game.turn_order.is_empty() {
        return Err(EngineError::NoPlayers);
    }
    let mut next = game.clone();
    move_to_next_player(&mut next);
    Ok(next)
}

pub fn finish_game(game: &Game) -> EngineResult<Game> {
    if game.phase == GamePhase::Finished {
        return Err(EngineError::GameAlreadyFinished);
    }
    let mut next = game.clone();
    finish_in_place(&mut next);
    Ok(next)
}

pub fn toggle_die_selection(game: &Game, die_index: usize) -> EngineResult<Game> {
    ensure_in_progress(game)?;
    let mut next = game.clone();
    let turn = next.turn.as_mut().ok_or(EngineError::NoActiveTurn)?;
    if turn.status == TurnStatus::AwaitingFirstRoll {
        return Err(EngineError::DiceNotRolled);
    }
    let die = turn.dice.get(die_index).ok_or(EngineError::InvalidDieIndex(die_index))?;
    if !die.selectable {
        return Err(EngineError::DieLocked(die_index));
    }

    let indices = &mut turn.selection.indices;
    match indices.binary_search(&die_index) {
        Ok(pos) => {
            indices.remove(pos);
        }
        Err(pos) => indices.insert(pos, die_index),
    }
    let scored = score_selection(&turn.selected_faces());
    turn.selection.is_valid = scored.is_valid;
    turn.selection.score = scored.score;
    turn.status = if scored.is_valid && !turn.selection.is_empty() {
        TurnStatus::AwaitingRoll
    } else {
        TurnStatus::AwaitingSelection
    };
    Ok(next)
}

/// First roll of the turn, or a reroll that banks the current selection into
/// the turn total. Reports `Bust` when the fresh dice cannot score and
/// `HotDice` when every die scored and six new ones were thrown.
pub fn roll_turn_dice(game: &Game, dice: &mut impl DiceSource) -> EngineResult<Transition> {
    ensure_in_progress(game)?;
    let mut next = game.clone();
    let turn = next.turn.as_mut().ok_or(EngineError::NoActiveTurn)?;

    let hot_dice = match turn.status {
        TurnStatus::AwaitingFirstRoll => {
            let count = turn.dice.len();
            turn.dice = dice.roll_faces(count).into_iter().map(Die::rolled).collect();
            false
        }
        TurnStatus::AwaitingSelection | TurnStatus::AwaitingRoll => {
            check_rollable(&turn.selection)?;
            turn.accumulated_score = turn.accumulated_score.saturating_add(turn.selection.score);
            reroll_unselected(turn, dice)
        }
    };
    turn.selection = Selection::default();

    if is_bust(&turn.selectable_faces()) {
        let player_id = turn.player_id.clone();
        close_turn(&mut next, &player_id);
        return Ok(Transition::new(next, Outcome::Bust));
    }

    refresh_selection(turn);
    let outcome = if hot_dice { Outcome::HotDice } else { Outcome::Continue };
    Ok(Transition::new(next, outcome))
}

/// Deposits the turn total plus the best selectable score, whatever the live
/// selection is. Reaching the target opens the final round.
pub fn bank_turn_score(game: &Game) -> EngineResult<Transition> {
    ensure_in_progress(game)?;
    let turn = game.turn.as_ref().ok_or(EngineError::NoActiveTurn)?;
    let amount = turn.bankable_score();
    if amount == 0 {
        return Err(EngineError::ZeroScore);
    }
    let player_id = turn.player_id.clone();
    let player = game.player(&player_id).ok_or_else(|| EngineError::PlayerNotFound(player_id.clone()))?;
    let required = game.config.minimum_entry_score;
    if !player.has_entered_game && amount < required {
        return Err(EngineError::MinimumEntryNotMet { required, available: amount });
    }

    let mut next = game.clone();
    let total = match next.player_mut(&player_id) {
        Some(player) => {
            player.score = player.score.saturating_add(amount);
            player.has_entered_game = true;
            player.score
        }
        None => return Err(EngineError::PlayerNotFound(player_id)),
    };

    let triggers_final_round = !next.final_round.is_active() && total >= next.config.target_score;
    let outcome = if triggers_final_round {
        let seats = next.turn_order.len();
        let pending: Vec<PlayerId> = (1..seats)
            .map(|offset| next.turn_order[(next.active_turn_index + offset) % seats].clone())
            .collect();
        next.turn = None;
        if pending.is_empty() {
            finish_in_place(&mut next);
            Outcome::GameFinished
        } else {
            next.final_round = FinalRound::Active { triggered_by: player_id, pending };
            move_to_next_player(&mut next);
            Outcome::Continue
        }
    } else {
        close_turn(&mut next, &player_id)
    };
    Ok(Transition::new(next, outcome))
}

pub fn active_player_id(game: &Game) -> Option<&str> {
    if game.phase != GamePhase::InProgress {
        return None;
    }
    game.turn.as_ref().map(|t| t.player_id.as_str())
}

pub fn is_players_turn(game: &Game, player_id: &str) -> bool {
    active_player_id(game) == Some(player_id)
}

/// Whether `player_id` may take a turn action right now.
pub fn ensure_can_act(game: &Game, player_id: &str) -> EngineResult<()> {
    ensure_in_progress(game)?;
    if game.player(player_id).is_none() {
        return Err(EngineError::PlayerNotFound(player_id.to_string()));
    }
    if game.turn.is_none() {
        return Err(EngineError::NoActiveTurn);
    }
    if !is_players_turn(game, player_id) {
        return Err(EngineError::NotYourTurn(player_id.to_string()));
    }
    Ok(())
}

pub fn player_by_secret<'a>(game: &'a Game, secret: &str) -> Option<&'a Player> {
    if secret.is_empty() {
        return None;
    }
    game.players.iter().find(|p| p.secret == secret)
}

/// Players by banked score, highest first; ties keep roster order.
pub fn standings(game: &Game) -> Vec<&Player> {
    let mut ranked: Vec<&Player> = game.players.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Top scorers of a finished game. Empty while the game is still running.
pub fn winners(game: &Game) -> Vec<PlayerId> {
    if game.phase != GamePhase::Finished {
        return Vec::new();
    }
    let Some(best) = game.players.iter().map(|p| p.score).max() else {
        return Vec::new();
    };
    game.players.iter().filter(|p| p.score == best).map(|p| p.id.clone()).collect()
}
