//! Where die faces and turn order come from.
//!
//! The engine never reaches for a global generator; every rolling or
//! shuffling entry point takes a `DiceSource`.

use std::collections::VecDeque;

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::model::PlayerId;

pub trait DiceSource {
    /// Uniform face in 1..=6.
    fn roll_face(&mut self) -> u8;

    /// Uniform index in `0..bound`. `bound` is never zero.
    fn pick_index(&mut self, bound: usize) -> usize;

    fn roll_faces(&mut self, count: usize) -> Vec<u8> {
        (0..count).map(|_| self.roll_face()).collect()
    }

    /// Fisher-Yates over a copy of `ids`.
    fn shuffle(&mut self, ids: &[PlayerId]) -> Vec<PlayerId> {
        let mut out = ids.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.pick_index(i + 1);
            out.swap(i, j);
        }
        out
    }
}

/// Dice backed by any `rand` generator. `gen_range` rejection-samples, so
/// faces stay unbiased.
#[derive(Clone, Debug)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<OsRng> {
    /// Operating-system entropy. What live games use.
    pub fn secure() -> Self {
        Self::new(OsRng)
    }
}

impl RngDice<StdRng> {
    /// Reproducible ChaCha stream for simulations and replays.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiceSource for RngDice<R> {
    fn roll_face(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }

    fn pick_index(&mut self, bound: usize) -> usize {
        self.rng.gen_range(0..bound)
    }
}

/// Plays back a fixed list of faces, for tests.
///
/// Shuffles leave the order untouched. Panics when asked for more faces than
/// were scripted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        let faces: VecDeque<u8> = faces.into_iter().collect();
        assert!(faces.iter().all(|f| (1..=6).contains(f)), "scripted face out of range");
        Self { faces }
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll_face(&mut self) -> u8 {
        match self.faces.pop_front() {
            Some(face) => face,
            None => panic!("scripted dice exhausted"),
        }
    }

    fn pick_index(&mut self, bound: usize) -> usize {
        bound - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_faces_in_range() {
        let mut dice = RngDice::secure();
        for _ in 0..500 {
            let face = dice.roll_face();
            assert!((1..=6).contains(&face));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = RngDice::seeded(7).roll_faces(20);
        let b = RngDice::seeded(7).roll_faces(20);
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_hits_every_face() {
        let mut dice = RngDice::seeded(42);
        let mut seen = [false; 7];
        for face in dice.roll_faces(600) {
            seen[face as usize] = true;
        }
        assert!(seen[1..].iter().all(|&s| s));
        assert!(!seen[0]);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let ids: Vec<PlayerId> = (0..8).map(|i| format!("p{i}")).collect();
        let mut shuffled = RngDice::seeded(3).shuffle(&ids);
        assert_eq!(shuffled.len(), ids.len());
        shuffled.sort();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(shuffled, sorted);
    }

    #[test]
    fn test_scripted_plays_back_and_keeps_order() {
        let mut dice = ScriptedDice::new([1, 2, 3]);
        assert_eq!(dice.roll_faces(2), vec![1, 2]);
        assert_eq!(dice.remaining(), 1);
        let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(dice.shuffle(&ids), ids);
    }

    #[test]
    #[should_panic(expected = "scripted dice exhausted")]
    fn test_scripted_exhaustion_panics() {
        ScriptedDice::default().roll_face();
    }
}
