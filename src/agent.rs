//! Players that pick a column for a fixed side

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{
    board::{Board, Cell, Side},
    config::SearchConfig,
    evaluator::{CenterControl, Evaluator},
    search::Searcher,
    HEIGHT, WIDTH,
};

/// Universal interface for every kind of player.
///
/// The board is handed over mutably so that agents can look ahead in place,
/// but it must be returned in exactly the state it was received in.
pub trait Agent {
    /// The side this agent places tokens for.
    fn side(&self) -> Side;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Select a column to play, or `None` if the board is full.
    fn choose_move(&mut self, board: &mut Board) -> Option<usize>;
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn side(&self) -> Side {
        (**self).side()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose_move(&mut self, board: &mut Board) -> Option<usize> {
        (**self).choose_move(board)
    }
}

/// Plays the column the minimax search rates highest
pub struct MinimaxAgent<E = CenterControl> {
    searcher: Searcher<E>,
}

impl MinimaxAgent<CenterControl> {
    pub fn new(side: Side) -> Self {
        Self {
            searcher: Searcher::new(side),
        }
    }

    pub fn from_config(side: Side, config: &SearchConfig) -> Self {
        Self {
            searcher: Searcher::from_config(side, config),
        }
    }
}

impl<E: Evaluator> MinimaxAgent<E> {
    pub fn with_searcher(searcher: Searcher<E>) -> Self {
        Self { searcher }
    }

    pub fn searcher(&self) -> &Searcher<E> {
        &self.searcher
    }
}

impl<E: Evaluator> Agent for MinimaxAgent<E> {
    fn side(&self) -> Side {
        self.searcher.own()
    }

    fn name(&self) -> &str {
        "Minimax"
    }

    fn choose_move(&mut self, board: &mut Board) -> Option<usize> {
        self.searcher.best_move(board)
    }
}

/// An agent that selects uniformly at random from legal columns.
pub struct RandomAgent {
    side: Side,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(side: Side) -> Self {
        RandomAgent {
            side,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(side: Side, seed: u64) -> Self {
        RandomAgent {
            side,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn side(&self) -> Side {
        self.side
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn choose_move(&mut self, board: &mut Board) -> Option<usize> {
        board.legal_moves().choose(&mut self.rng).copied()
    }
}

/// First legal column where `side` connects four right away
fn winning_column(board: &mut Board, side: Side) -> Option<usize> {
    board.legal_moves().into_iter().find(|&column| {
        board
            .play_scoped(column, side)
            .map_or(false, |next| next.has_won(side))
    })
}

/// Wins if it can, blocks an immediate loss if it must, and plays randomly otherwise
pub struct RuleBasedAgent {
    side: Side,
    rng: StdRng,
}

impl RuleBasedAgent {
    pub fn new(side: Side) -> Self {
        RuleBasedAgent {
            side,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(side: Side, seed: u64) -> Self {
        RuleBasedAgent {
            side,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RuleBasedAgent {
    fn side(&self) -> Side {
        self.side
    }

    fn name(&self) -> &str {
        "Rule based"
    }

    fn choose_move(&mut self, board: &mut Board) -> Option<usize> {
        winning_column(board, self.side)
            .or_else(|| winning_column(board, self.side.opponent()))
            .or_else(|| board.legal_moves().choose(&mut self.rng).copied())
    }
}

/// A predicted result of a position, ordered from worst to best
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum OutcomeClass {
    Draw = 0,
    Loss = 1,
    Win = 2,
}

/// Flattened board, row-major from the top, Red as 1, Yellow as -1, empty as 0
pub type Features = [i8; WIDTH * HEIGHT];

pub fn encode_features(board: &Board) -> Features {
    let mut features = [0; WIDTH * HEIGHT];
    for row in 0..HEIGHT {
        for column in 0..WIDTH {
            features[row * WIDTH + column] = match board.get(row, column) {
                Cell::Red => 1,
                Cell::Yellow => -1,
                Cell::Empty => 0,
            };
        }
    }
    features
}

/// A trained model that classifies positions
pub trait OutcomePredictor {
    fn predict(&self, features: &Features) -> OutcomeClass;
}

impl<F: Fn(&Features) -> OutcomeClass> OutcomePredictor for F {
    fn predict(&self, features: &Features) -> OutcomeClass {
        self(features)
    }
}

/// Takes immediate wins and blocks, then plays the column whose resulting
/// position the predictor classes highest
pub struct PredictorAgent<P> {
    side: Side,
    predictor: P,
}

impl<P: OutcomePredictor> PredictorAgent<P> {
    pub fn new(side: Side, predictor: P) -> Self {
        Self { side, predictor }
    }
}

impl<P: OutcomePredictor> Agent for PredictorAgent<P> {
    fn side(&self) -> Side {
        self.side
    }

    fn name(&self) -> &str {
        "Predictor"
    }

    fn choose_move(&mut self, board: &mut Board) -> Option<usize> {
        if let Some(column) = winning_column(board, self.side)
            .or_else(|| winning_column(board, self.side.opponent()))
        {
            return Some(column);
        }

        let mut best: Option<(usize, OutcomeClass)> = None;
        for column in board.legal_moves() {
            if let Some(next) = board.play_scoped(column, self.side) {
                let class = self.predictor.predict(&encode_features(&next));
                match best {
                    Some((_, best_class)) if class <= best_class => {}
                    _ => best = Some((column, class)),
                }
            }
        }
        best.map(|(column, _)| column)
    }
}
