//! Pregenerated turn order.
//!
//! The queue is a sequence of [`TurnTag`]s drawn with a weighted coin. It is
//! advanced by index only; issued entries are never rewritten. When the index
//! runs past the end, another block is drawn from the same generator and
//! appended, so a long battle never runs dry.

use crate::rng::{BattleRng, PcgRng};

/// Which side acts on a given turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnTag {
    Player,
    Enemy,
}

#[derive(Clone, Debug)]
pub struct TurnQueue {
    entries: Vec<TurnTag>,
    index: usize,
    block_length: usize,
    enemy_weight: f64,
    rng: PcgRng,
}

impl TurnQueue {
    /// Generates the first block of `block_length` entries.
    ///
    /// `enemy_weight` is the probability of each entry being an enemy turn.
    pub fn generate(rng: PcgRng, block_length: usize, enemy_weight: f64) -> Self {
        let mut queue = Self {
            entries: Vec::new(),
            index: 0,
            block_length: block_length.max(1),
            enemy_weight: enemy_weight.clamp(0.0, 1.0),
            rng,
        };
        queue.extend_block();
        queue
    }

    /// Builds a queue from explicit entries. Extensions still draw randomly.
    pub fn from_entries(entries: Vec<TurnTag>, rng: PcgRng, enemy_weight: f64) -> Self {
        let block_length = entries.len().max(1);
        let mut queue = Self {
            entries,
            index: 0,
            block_length,
            enemy_weight: enemy_weight.clamp(0.0, 1.0),
            rng,
        };
        if queue.entries.is_empty() {
            queue.extend_block();
        }
        queue
    }

    fn extend_block(&mut self) {
        let weight = self.enemy_weight;
        let rng = &mut self.rng;
        self.entries.extend((0..self.block_length).map(|_| {
            if rng.chance(weight) {
                TurnTag::Enemy
            } else {
                TurnTag::Player
            }
        }));
    }

    pub fn current(&self) -> TurnTag {
        self.entries[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn entries(&self) -> &[TurnTag] {
        &self.entries
    }

    /// Entries from the current index onwards, at most `count` of them.
    pub fn upcoming(&self, count: usize) -> &[TurnTag] {
        let end = (self.index + count).min(self.entries.len());
        &self.entries[self.index..end]
    }

    /// Moves to the next turn, extending the queue when exhausted.
    pub fn advance(&mut self) -> TurnTag {
        self.index += 1;
        if self.index >= self.entries.len() {
            self.extend_block();
        }
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_queue() {
        let a = TurnQueue::generate(PcgRng::new(9), 50, 0.4);
        let b = TurnQueue::generate(PcgRng::new(9), 50, 0.4);
        assert_eq!(a.entries(), b.entries());
        assert_eq!(a.entries().len(), 50);
    }

    #[test]
    fn weight_roughly_respected() {
        let queue = TurnQueue::generate(PcgRng::new(3), 2_000, 0.4);
        let enemies = queue
            .entries()
            .iter()
            .filter(|tag| **tag == TurnTag::Enemy)
            .count();
        let share = enemies as f64 / 2_000.0;
        assert!((0.35..0.45).contains(&share), "enemy share {share}");
    }

    #[test]
    fn exhaustion_extends_without_rewriting_history() {
        let mut queue = TurnQueue::generate(PcgRng::new(5), 4, 0.5);
        let first_block = queue.entries().to_vec();
        for _ in 0..10 {
            queue.advance();
        }
        assert_eq!(queue.index(), 10);
        assert!(queue.entries().len() > 10);
        assert_eq!(&queue.entries()[..4], first_block.as_slice());
    }

    #[test]
    fn explicit_entries_are_kept() {
        let queue = TurnQueue::from_entries(
            vec![TurnTag::Enemy, TurnTag::Player],
            PcgRng::new(1),
            0.4,
        );
        assert_eq!(queue.current(), TurnTag::Enemy);
        assert_eq!(queue.upcoming(5), &[TurnTag::Enemy, TurnTag::Player]);
    }
}
