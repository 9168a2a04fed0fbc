use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

pub type PlayerId = String;

/// Dice handed to a player at the start of a turn and after hot dice.
pub const DICE_PER_TURN: usize = 6;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Lobby,
    InProgress,
    Finished,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    AwaitingFirstRoll,
    AwaitingSelection,
    AwaitingRoll,
}

/// What a successful transition did to the turn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Continue,
    Bust,
    HotDice,
    GameFinished,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Die {
    /// `None` until the turn's first roll.
    pub face: Option<u8>,
    pub selectable: bool,
}

impl Die {
    pub fn unrevealed() -> Self {
        Self { face: None, selectable: false }
    }

    pub fn rolled(face: u8) -> Self {
        Self { face: Some(face), selectable: true }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    /// Sorted, no duplicates.
    pub indices: Vec<usize>,
    pub is_valid: bool,
    pub score: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self { indices: Vec::new(), is_valid: true, score: 0 }
    }
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub player_id: PlayerId,
    pub dice: Vec<Die>,
    /// Scored by earlier rolls this turn, lost on a bust.
    pub accumulated_score: u32,
    pub selection: Selection,
    pub status: TurnStatus,
    /// Best subset of the selectable dice, refreshed whenever the dice change.
    pub best_selectable_score: u32,
}

impl Turn {
    pub fn selectable_indices(&self) -> Vec<usize> {
        self.dice.iter().enumerate().filter(|(_, d)| d.selectable).map(|(i, _)| i).collect()
    }

    pub fn selectable_faces(&self) -> Vec<u8> {
        self.dice.iter().filter(|d| d.selectable).filter_map(|d| d.face).collect()
    }

    pub fn selected_faces(&self) -> Vec<u8> {
        self.selection.indices.iter().filter_map(|&i| self.dice.get(i).and_then(|d| d.face)).collect()
    }

    /// What banking right now would deposit. Ignores the live selection.
    pub fn bankable_score(&self) -> u32 {
        self.accumulated_score.saturating_add(self.best_selectable_score)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FinalRound {
    #[default]
    NotTriggered,
    Active { triggered_by: PlayerId, pending: Vec<PlayerId> },
}

impl FinalRound {
    pub fn is_active(&self) -> bool {
        matches!(self, FinalRound::Active { .. })
    }

    pub fn is_pending(&self, player_id: &str) -> bool {
        match self {
            FinalRound::NotTriggered => false,
            FinalRound::Active { pending, .. } => pending.iter().any(|p| p == player_id),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Reconnection token. Blank in redacted snapshots.
    pub secret: String,
    pub name: String,
    pub score: u32,
    pub has_entered_game: bool,
    pub connected: bool,
    pub joined_at_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    pub phase: GamePhase,
    pub config: GameConfig,
    pub players: Vec<Player>,
    pub turn_order: Vec<PlayerId>,
    pub active_turn_index: usize,
    pub turn: Option<Turn>,
    pub final_round: FinalRound,
    pub created_at_ms: u64,
    pub finished_at_ms: Option<u64>,
}

impl Game {
    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Copy safe to show to every observer.
    pub fn redacted(&self) -> Game {
        let mut game = self.clone();
        for player in &mut game.players {
            player.secret.clear();
        }
        game
    }
}

/// A new snapshot plus what happened on the way to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub game: Game,
    pub outcome: Outcome,
}

impl Transition {
    pub(crate) fn new(game: Game, outcome: Outcome) -> Self {
        Self { game, outcome }
    }
}
