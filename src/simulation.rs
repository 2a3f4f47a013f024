//! Batch games between two kinds of agent

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use std::time::{Duration, Instant};

use crate::{
    agent::Agent,
    board::{Board, Outcome},
    config::SimulationConfig,
    error::GameError,
    game::play_game,
};

/// Tallies of a batch of games
#[derive(Clone, Debug, Default)]
pub struct SimulationReport {
    pub first_wins: usize,
    pub second_wins: usize,
    pub draws: usize,
    /// Wall-clock duration of each game, in the order the games were numbered
    pub durations: Vec<Duration>,
}

impl SimulationReport {
    pub fn games(&self) -> usize {
        self.first_wins + self.second_wins + self.draws
    }

    pub fn first_win_rate(&self) -> f64 {
        self.first_wins as f64 / self.games().max(1) as f64
    }

    pub fn second_win_rate(&self) -> f64 {
        self.second_wins as f64 / self.games().max(1) as f64
    }

    pub fn mean_duration(&self) -> Duration {
        match self.durations.len() {
            0 => Duration::default(),
            n => self.durations.iter().sum::<Duration>() / n as u32,
        }
    }
}

/// Plays `config.games` games, each on a fresh board with agents built for it
///
/// The factories receive the game number so that seeded agents can vary
/// between games. The agent from `make_first` always moves first.
pub fn simulate<F, S, A, B>(
    config: &SimulationConfig,
    make_first: F,
    make_second: S,
) -> Result<SimulationReport, GameError>
where
    F: Fn(u64) -> A + Sync,
    S: Fn(u64) -> B + Sync,
    A: Agent,
    B: Agent,
{
    let progress = if config.progress {
        let progress = ProgressBar::new(config.games as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Simulating games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
                .progress_chars("█▓▒░  "),
        );
        progress
    } else {
        ProgressBar::hidden()
    };

    let run_game = |game: u64| -> Result<(Outcome, bool, Duration), GameError> {
        let mut first = make_first(game);
        let mut second = make_second(game);
        let first_side = first.side();

        let mut board = Board::new();
        let start = Instant::now();
        let record = play_game(&mut board, &mut first, &mut second)?;
        let duration = start.elapsed();

        progress.inc(1);
        let first_won = record.outcome == Outcome::Win(first_side);
        Ok((record.outcome, first_won, duration))
    };

    let results = if config.parallel {
        (0..config.games as u64)
            .into_par_iter()
            .map(run_game)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        (0..config.games as u64)
            .map(run_game)
            .collect::<Result<Vec<_>, _>>()?
    };
    progress.finish();

    let mut report = SimulationReport::default();
    for (outcome, first_won, duration) in results {
        match outcome {
            Outcome::Draw => report.draws += 1,
            Outcome::Win(_) if first_won => report.first_wins += 1,
            Outcome::Win(_) => report.second_wins += 1,
        }
        report.durations.push(duration);
    }

    info!(
        "{} games: {} first-agent wins, {} second-agent wins, {} draws, mean {:.3}ms per game",
        report.games(),
        report.first_wins,
        report.second_wins,
        report.draws,
        report.mean_duration().as_secs_f64() * 1000.0
    );
    Ok(report)
}
