//! Static scoring of positions at the search horizon

use crate::{
    board::{Board, Side},
    CENTER_COLUMN, HEIGHT,
};

/// Default points awarded per token in the centre column
pub const DEFAULT_CENTER_WEIGHT: i32 = 3;

/// Scores a position for one side, without looking ahead
///
/// The searcher combines two calls, one per side, into a single difference.
pub trait Evaluator {
    fn score(&self, board: &Board, side: Side) -> i32;
}

/// Rewards tokens in the centre column and ignores everything else
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CenterControl {
    pub weight: i32,
}

impl CenterControl {
    pub fn new(weight: i32) -> Self {
        Self { weight }
    }
}

impl Default for CenterControl {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER_WEIGHT)
    }
}

impl Evaluator for CenterControl {
    fn score(&self, board: &Board, side: Side) -> i32 {
        let tokens = (0..HEIGHT)
            .filter(|&row| board.get(row, CENTER_COLUMN) == side.cell())
            .count();
        tokens as i32 * self.weight
    }
}
