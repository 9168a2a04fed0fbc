use farkle_engine::{
    add_player, bank_turn_score, create_game_with, create_player, roll_turn_dice, start_game, toggle_die_selection,
    EngineError, Game, GamePhase, Outcome, ScriptedDice, TurnStatus,
};

fn alice_and_bob() -> Game {
    let game = create_game_with(500, 10_000);
    let game = add_player(&game, create_player("alice", "Alice")).unwrap();
    let game = add_player(&game, create_player("bob", "Bob")).unwrap();
    start_game(&game, &mut ScriptedDice::default()).unwrap().game
}

fn roll(game: &Game, faces: &[u8]) -> (Game, Outcome) {
    let t = roll_turn_dice(game, &mut ScriptedDice::new(faces.iter().copied())).unwrap();
    (t.game, t.outcome)
}

#[test]
fn bank_prior_roll_plus_best_selectable() {
    // 300 from three 3s, then 5-1-1 is worth 250.
    let (game, _) = roll(&alice_and_bob(), &[3, 3, 3, 2, 4, 6]);
    let (game, _) = roll(&game, &[5, 1, 1]);
    let turn = game.turn.as_ref().unwrap();
    assert_eq!(turn.accumulated_score, 300);
    assert_eq!(turn.best_selectable_score, 250);

    // Dropping a die from the live selection must not shrink the bank.
    let game = toggle_die_selection(&game, 3).unwrap();
    assert_eq!(game.turn.as_ref().unwrap().selection.score, 200);

    let banked = bank_turn_score(&game).unwrap().game;
    let alice = banked.player("alice").unwrap();
    assert_eq!(alice.score, 550);
    assert!(alice.has_entered_game);
    assert_eq!(banked.turn.as_ref().unwrap().player_id, "bob");
}

#[test]
fn bank_below_minimum_entry_is_refused() {
    let (game, _) = roll(&alice_and_bob(), &[1, 2, 3, 4, 6, 6]);
    assert_eq!(game.turn.as_ref().unwrap().bankable_score(), 100);
    let before = game.clone();
    let err = bank_turn_score(&game).unwrap_err();
    assert_eq!(err.code(), "minimum_entry_not_met");
    assert_eq!(err, EngineError::MinimumEntryNotMet { required: 500, available: 100 });
    assert_eq!(game, before);
}

#[test]
fn entered_player_can_bank_small_amounts() {
    let (game, _) = roll(&alice_and_bob(), &[1, 1, 1, 2, 3, 4]);
    let game = bank_turn_score(&game).unwrap().game;
    assert!(game.player("alice").unwrap().has_entered_game);

    let (game, _) = roll(&game, &[2, 2, 3, 3, 4, 6]);
    let (game, _) = roll(&game, &[5, 2, 3, 4, 6, 6]);
    let game = bank_turn_score(&game).unwrap().game;
    let alice = game.player("alice").unwrap();
    assert_eq!(alice.score, 1050);
    assert!(alice.has_entered_game);
}

#[test]
fn hot_dice_resets_to_six_fresh_dice() {
    let (game, _) = roll(&alice_and_bob(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(game.turn.as_ref().unwrap().selection.score, 1500);
    let (game, outcome) = roll(&game, &[3, 3, 3, 4, 6, 2]);
    assert_eq!(outcome, Outcome::HotDice);
    let turn = game.turn.as_ref().unwrap();
    assert_eq!(turn.accumulated_score, 1500);
    assert_eq!(turn.dice.len(), 6);
    assert!(turn.dice.iter().all(|d| d.selectable && d.face.is_some()));
    assert_eq!(turn.selection.indices, vec![0, 1, 2]);
    assert_eq!(turn.status, TurnStatus::AwaitingRoll);
    assert_eq!(turn.bankable_score(), 1800);
}

#[test]
fn post_selection_bust_advances_and_wraps() {
    let (game, _) = roll(&alice_and_bob(), &[1, 2, 3, 4, 6, 6]);
    let (game, outcome) = roll(&game, &[2, 3, 4, 6, 6]);
    assert_eq!(outcome, Outcome::Bust);
    assert_eq!(game.player("alice").unwrap().score, 0);
    assert_eq!(game.active_turn_index, 1);

    let (game, _) = roll(&game, &[5, 2, 3, 4, 6, 6]);
    let (game, outcome) = roll(&game, &[2, 2, 3, 4, 6]);
    assert_eq!(outcome, Outcome::Bust);
    assert_eq!(game.active_turn_index, 0);
    assert_eq!(game.turn.as_ref().unwrap().player_id, "alice");
}

#[test]
fn full_game_to_final_round() {
    let game = create_game_with(0, 2000);
    let game = add_player(&game, create_player("alice", "Alice")).unwrap();
    let game = add_player(&game, create_player("bob", "Bob")).unwrap();
    let game = start_game(&game, &mut ScriptedDice::default()).unwrap().game;

    // Alice: two triplets, then bank on the hot-dice reroll.
    let (game, _) = roll(&game, &[1, 1, 1, 5, 5, 5]);
    let (game, outcome) = roll(&game, &[2, 2, 3, 4, 6, 5]);
    assert_eq!(outcome, Outcome::HotDice);
    let result = bank_turn_score(&game).unwrap();
    assert_eq!(result.outcome, Outcome::Continue);
    assert_eq!(result.game.player("alice").unwrap().score, 2550);
    assert!(result.game.final_round.is_pending("bob"));

    let (game, outcome) = roll(&result.game, &[2, 3, 4, 6, 2, 3]);
    assert_eq!(outcome, Outcome::Bust);
    assert_eq!(game.phase, GamePhase::Finished);
    assert!(game.turn.is_none());
    assert_eq!(farkle_engine::winners(&game), vec!["alice".to_string()]);
}
