//! Alternating play between two agents on one board

use log::{debug, info};

use crate::{
    agent::Agent,
    board::{Board, Outcome},
    error::GameError,
};

/// How a finished game went
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameRecord {
    pub outcome: Outcome,
    /// Every column played, starting with the first agent's move
    pub moves: Vec<usize>,
}

/// Plays `first` and `second` against each other from the current position
/// until one of them connects four or the board fills up.
///
/// `first` moves first regardless of how many tokens are already on the board.
pub fn play_game<'a>(
    board: &mut Board,
    first: &'a mut dyn Agent,
    second: &'a mut dyn Agent,
) -> Result<GameRecord, GameError> {
    if first.side() == second.side() {
        return Err(GameError::SameSide(first.side()));
    }

    let mut moves = Vec::new();
    let mut agents = [first, second];
    let mut turn = 0;

    let outcome = loop {
        if let Some(outcome) = board.outcome() {
            break outcome;
        }

        let agent = &mut agents[turn % 2];
        let column = agent.choose_move(board);
        match column {
            Some(column) if board.playable(column) => {
                board.drop(column, agent.side());
                debug!("{} ({}) plays column {}", agent.name(), agent.side().name(), column);
                moves.push(column);
            }
            _ => {
                return Err(GameError::IllegalMove {
                    agent: agent.name().to_string(),
                    side: agent.side(),
                    column,
                    legal: board.legal_moves(),
                })
            }
        }
        turn += 1;
    };

    match outcome {
        Outcome::Win(side) => info!("{} wins after {} moves", side.name(), moves.len()),
        Outcome::Draw => info!("Draw after {} moves", moves.len()),
    }
    Ok(GameRecord { outcome, moves })
}
