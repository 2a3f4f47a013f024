//! A depth-limited minimax search for Connect 4

use log::debug;
use static_assertions::const_assert;

use crate::{
    board::{Board, Side},
    config::SearchConfig,
    evaluator::{CenterControl, Evaluator},
};

/// Score of a win found at depth 0; deeper wins score less
pub const WIN_SCORE: i32 = 10;
/// The default search horizon in plies below the candidate move
pub const DEFAULT_MAX_DEPTH: usize = 5;

// terminal scores must keep their sign at the horizon
const_assert!((DEFAULT_MAX_DEPTH as i32) < WIN_SCORE);

/// An agent's view of the game tree
///
/// # Notes
/// The searcher explores the board in place: each candidate move is dropped
/// on the caller's board, searched and taken back again before the next one,
/// so the board is identical before and after every call.
///
/// # Position Scoring
/// Positions are scored from the point of view of the searcher's own side.
/// A win found `depth` plies below the root move scores `10 - depth`, a loss
/// scores `depth - 10` and a full board scores 0. Positions still open at the
/// search horizon are scored by the evaluator as the own side's score minus
/// the opponent's.
pub struct Searcher<E = CenterControl> {
    own: Side,
    opponent: Side,
    max_depth: usize,
    pruning: bool,
    evaluator: E,

    /// The number of nodes searched by this `Searcher` so far (for diagnostics only)
    pub node_count: usize,
}

impl Searcher<CenterControl> {
    /// Creates a `Searcher` for `own` with the default horizon and evaluator
    pub fn new(own: Side) -> Self {
        Self::with_evaluator(own, CenterControl::default())
    }

    /// Creates a `Searcher` for `own` from search settings
    pub fn from_config(own: Side, config: &SearchConfig) -> Self {
        Self::with_evaluator(own, CenterControl::new(config.center_weight))
            .with_max_depth(config.max_depth)
            .with_pruning(config.pruning)
    }
}

impl<E: Evaluator> Searcher<E> {
    pub fn with_evaluator(own: Side, evaluator: E) -> Self {
        Self {
            own,
            opponent: own.opponent(),
            max_depth: DEFAULT_MAX_DEPTH,
            pruning: true,
            evaluator,
            node_count: 0,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables alpha-beta cutoffs; the scores are the same either way
    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn own(&self) -> Side {
        self.own
    }

    pub fn opponent(&self) -> Side {
        self.opponent
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Static score of `board` for the own side
    pub fn evaluate(&self, board: &Board) -> i32 {
        self.evaluator.score(board, self.own) - self.evaluator.score(board, self.opponent)
    }

    /// Scores `board` with the own side to move if `maximizing`, else the opponent
    ///
    /// Returns the score of the position (see [Position Scoring])
    ///
    /// [Position Scoring]: #position-scoring
    pub fn minimax(
        &mut self,
        board: &mut Board,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.node_count += 1;

        if board.has_won(self.own) {
            return WIN_SCORE - depth as i32;
        }
        if board.has_won(self.opponent) {
            return depth as i32 - WIN_SCORE;
        }
        if board.is_full() {
            return 0;
        }
        if depth >= self.max_depth {
            return self.evaluate(board);
        }

        if maximizing {
            let mut best = i32::MIN;
            for column in board.legal_moves() {
                if let Some(mut next) = board.play_scoped(column, self.own) {
                    let score = self.minimax(&mut next, depth + 1, alpha, beta, false);
                    best = best.max(score);
                    alpha = alpha.max(score);
                }
                // a minimizing parent already has a reply at least this good
                if self.pruning && beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for column in board.legal_moves() {
                if let Some(mut next) = board.play_scoped(column, self.opponent) {
                    let score = self.minimax(&mut next, depth + 1, alpha, beta, true);
                    best = best.min(score);
                    beta = beta.min(score);
                }
                if self.pruning && beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// Scores every legal column for the own side, in ascending column order
    pub fn root_scores(&mut self, board: &mut Board) -> Vec<(usize, i32)> {
        let mut scores = Vec::with_capacity(board.legal_moves().len());
        for column in board.legal_moves() {
            if let Some(mut next) = board.play_scoped(column, self.own) {
                let score = self.minimax(&mut next, 0, i32::MIN, i32::MAX, false);
                scores.push((column, score));
            }
        }
        scores
    }

    /// Finds the best column for the own side, or `None` on a full board
    ///
    /// Ties go to the lowest column.
    pub fn best_move(&mut self, board: &mut Board) -> Option<usize> {
        let start_nodes = self.node_count;

        let mut best: Option<(usize, i32)> = None;
        for (column, score) in self.root_scores(board) {
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((column, score)),
            }
        }

        debug!(
            "{} searched {} nodes, best move {:?}",
            self.own.name(),
            self.node_count - start_nodes,
            best
        );
        best.map(|(column, _)| column)
    }
}
