//! A minimax agent for playing the board game 'Connect 4'
//!
//! This agent explores the game tree to a fixed depth with alpha-beta
//! pruning, scoring wins and losses by how quickly they happen and falling
//! back to a centre-control heuristic at the search horizon.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_minimax::{agent::{Agent, MinimaxAgent}, board::{Board, Side}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // Red has three in a row along the bottom and it is Red's turn
//! let mut board = Board::from_moves("112233")?;
//! let mut agent = MinimaxAgent::new(Side::Red);
//!
//! assert_eq!(agent.choose_move(&mut board), Some(3));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod evaluator;

pub mod search;

pub mod agent;

pub mod game;

pub mod simulation;

pub mod config;

pub mod error;

mod test;

pub use agent::{Agent, MinimaxAgent, PredictorAgent, RandomAgent, RuleBasedAgent};
pub use board::{Board, Cell, Outcome, Side};
pub use config::Config;
pub use evaluator::{CenterControl, Evaluator};
pub use search::Searcher;

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of aligned tokens needed to win
pub const CONNECT: usize = 4;

/// The column favoured by the default evaluator
pub const CENTER_COLUMN: usize = WIDTH / 2;

// the win scans start from fixed ranges which assume a 6x7 board
const_assert_eq!(WIDTH, 7);
const_assert_eq!(HEIGHT, 6);
const_assert!(CENTER_COLUMN < WIDTH);
