//! Dice scoring. Pure functions over face values, no game state.

use serde::{Deserialize, Serialize};

pub const STRAIGHT_SCORE: u32 = 1500;
pub const THREE_PAIRS_SCORE: u32 = 1500;
pub const TWO_TRIPLETS_SCORE: u32 = 2500;
pub const SINGLE_ONE_SCORE: u32 = 100;
pub const SINGLE_FIVE_SCORE: u32 = 50;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionScore {
    pub score: u32,
    pub is_valid: bool,
}

impl SelectionScore {
    fn valid(score: u32) -> Self {
        Self { score, is_valid: true }
    }

    fn invalid() -> Self {
        Self { score: 0, is_valid: false }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringSubset {
    pub score: u32,
    pub values: Vec<u8>,
}

/// Occurrences per face; slot 0 collects anything outside 1..=6.
fn face_counts(values: &[u8]) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for &v in values {
        let slot = if (1..=6).contains(&v) { v as usize } else { 0 };
        counts[slot] += 1;
    }
    counts
}

#[inline]
fn kind_base(face: usize) -> u32 {
    if face == 1 { 1000 } else { face as u32 * 100 }
}

#[inline]
fn kind_multiplier(count: usize) -> u32 {
    match count {
        3 => 1,
        4 => 2,
        5 => 3,
        _ => 4,
    }
}

fn is_straight(counts: &[usize; 7], len: usize) -> bool {
    len == 6 && counts[1..].iter().all(|&n| n == 1)
}

// A four-of-a-kind counts as two pairs.
fn is_three_pairs(counts: &[usize; 7], len: usize) -> bool {
    len == 6 && counts[0] == 0 && counts[1..].iter().all(|&n| n == 0 || n == 2 || n == 4)
}

fn is_two_triplets(counts: &[usize; 7], len: usize) -> bool {
    len == 6 && counts[1..].iter().filter(|&&n| n == 3).count() == 2
}

/// Scores a tentative selection. Any die that does not contribute makes the
/// whole selection invalid and worth nothing.
pub fn score_selection(values: &[u8]) -> SelectionScore {
    if values.is_empty() {
        return SelectionScore::valid(0);
    }
    let counts = face_counts(values);
    let len = values.len();
    if is_straight(&counts, len) {
        return SelectionScore::valid(STRAIGHT_SCORE);
    }
    if is_three_pairs(&counts, len) {
        return SelectionScore::valid(THREE_PAIRS_SCORE);
    }
    if is_two_triplets(&counts, len) {
        return SelectionScore::valid(TWO_TRIPLETS_SCORE);
    }

    let mut score = 0u32;
    let mut consumed = 0usize;
    for face in 1..=6 {
        let n = counts[face];
        if n >= 3 {
            score += kind_base(face) * kind_multiplier(n);
            consumed += n;
        }
    }
    for (face, each) in [(1, SINGLE_ONE_SCORE), (5, SINGLE_FIVE_SCORE)] {
        let n = counts[face];
        if n < 3 {
            score += each * n as u32;
            consumed += n;
        }
    }

    if consumed == len { SelectionScore::valid(score) } else { SelectionScore::invalid() }
}

/// True when no subset of the roll could ever score.
pub fn is_bust(values: &[u8]) -> bool {
    if values.is_empty() {
        return true;
    }
    let counts = face_counts(values);
    let len = values.len();
    let has_single = counts[1] > 0 || counts[5] > 0;
    let has_kind = counts[1..].iter().any(|&n| n >= 3);
    !(has_single || has_kind || is_straight(&counts, len) || is_three_pairs(&counts, len))
}

/// Greedy pick of scoring dice, as positions into `faces`.
///
/// Takes the whole roll when it scores as-is (this is where the six-dice
/// patterns land). Otherwise takes every die of a face showing three or more
/// times plus every remaining 1 and 5. Not an optimal search.
pub fn best_scoring_indices(faces: &[u8]) -> (Vec<usize>, u32) {
    let whole = score_selection(faces);
    if !faces.is_empty() && whole.is_valid {
        return ((0..faces.len()).collect(), whole.score);
    }

    let counts = face_counts(faces);
    let chosen: Vec<usize> = faces
        .iter()
        .enumerate()
        .filter(|(_, &f)| (1..=6).contains(&f) && (counts[f as usize] >= 3 || f == 1 || f == 5))
        .map(|(i, _)| i)
        .collect();
    if chosen.is_empty() {
        return (chosen, 0);
    }
    let values: Vec<u8> = chosen.iter().map(|&i| faces[i]).collect();
    let scored = score_selection(&values);
    (chosen, scored.score)
}

pub fn best_scoring_subset(values: &[u8]) -> ScoringSubset {
    let (indices, score) = best_scoring_indices(values);
    ScoringSubset { score, values: indices.into_iter().map(|i| values[i]).collect() }
}
