use anyhow::{anyhow, Result};
use log::warn;

use std::io::{stdin, stdout, Write};
use std::path::PathBuf;

use connect4_minimax::{
    game::play_game,
    simulation::{simulate, SimulationReport},
    *,
};

mod display;

const DEFAULT_CONFIG_PATH: &str = "connect4.toml";
const MAX_GAMES: usize = 100_000;

/// A player typing column numbers at the terminal
struct HumanAgent {
    side: Side,
    name: String,
}

impl HumanAgent {
    fn new(side: Side) -> Self {
        Self {
            side,
            name: format!("Player {}", side.name()),
        }
    }
}

impl Agent for HumanAgent {
    fn side(&self) -> Side {
        self.side
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, board: &mut Board) -> Option<usize> {
        if let Err(err) = display::draw(board) {
            warn!("failed to draw board: {}", err);
        }
        println!("{}'s turn", self.side.name());

        loop {
            print!("Pick a column (0-{}): ", WIDTH - 1);
            stdout().flush().ok()?;

            let mut input_str = String::new();
            if stdin().read_line(&mut input_str).ok()? == 0 {
                // end of input
                return None;
            }

            match input_str.trim().parse::<usize>() {
                Ok(column) if column >= WIDTH => println!("Invalid input, try again"),
                Ok(column) if !board.playable(column) => println!("Column Full"),
                Ok(column) => return Some(column),
                Err(_) => println!("Invalid input, try again"),
            }
        }
    }
}

/// Prompts until the user enters a number in `1..=max`
fn read_choice(prompt: &str, max: usize) -> Result<usize> {
    loop {
        print!("{}", prompt);
        stdout().flush()?;

        let mut buffer = String::new();
        if stdin().read_line(&mut buffer)? == 0 {
            return Err(anyhow!("unexpected end of input"));
        }
        match buffer.trim().parse::<usize>() {
            Ok(choice) if (1..=max).contains(&choice) => return Ok(choice),
            _ => println!("Invalid input, try again"),
        }
    }
}

fn main_menu() -> Result<usize> {
    println!("Connect 4");
    println!("1) Random Agent\n2) Rule Based Agent\n3) Minimax Agent\n4) P1 VS P2\n5) Bot vs Bot");
    read_choice("Please choose a Game Mode: ", 5)
}

fn play(choice: usize, config: &Config) -> Result<()> {
    let mut board = Board::new();
    let mut human = HumanAgent::new(Side::Red);
    let mut opponent: Box<dyn Agent> = match choice {
        1 => Box::new(RandomAgent::new(Side::Yellow)),
        2 => Box::new(RuleBasedAgent::new(Side::Yellow)),
        3 => Box::new(MinimaxAgent::from_config(Side::Yellow, &config.search)),
        _ => Box::new(HumanAgent::new(Side::Yellow)),
    };

    println!("Red vs Yellow");
    let record = play_game(&mut board, &mut human, &mut opponent)?;

    display::draw(&board)?;
    match record.outcome {
        Outcome::Win(side) => println!("{} wins", side.name()),
        Outcome::Draw => println!("Draw"),
    }
    Ok(())
}

fn print_report(report: &SimulationReport, first: &str, second: &str) {
    println!(
        "Agent 1 wins ({}): {}\nAgent 2 wins ({}): {}\nDraws: {}",
        first, report.first_wins, second, report.second_wins, report.draws
    );
    println!(
        "Mean time per game: {:.3}ms",
        report.mean_duration().as_secs_f64() * 1000.0
    );
}

fn simulate_games(config: &Config) -> Result<()> {
    println!("Choose Bot Game");
    println!("1) Random Agent vs Rule Based Agent\n2) Rule Based Agent vs Minimax Agent\n3) Random Agent vs Minimax Agent");
    let choice = read_choice("Please choose a Match: ", 3)?;

    let games = read_choice("How many games should be played: ", MAX_GAMES)?;
    let mut settings = config.simulation.clone();
    settings.games = games;

    // each game gets its own stream so parallel runs stay reproducible
    let seed = settings.seed;
    let seed_for = move |game: u64| seed.map(|seed| seed.wrapping_add(game));

    let random = |side: Side| {
        move |game: u64| match seed_for(game) {
            Some(seed) => RandomAgent::seeded(side, seed),
            None => RandomAgent::new(side),
        }
    };
    let rule_based = |side: Side| {
        move |game: u64| match seed_for(game) {
            Some(seed) => RuleBasedAgent::seeded(side, seed),
            None => RuleBasedAgent::new(side),
        }
    };
    let search = &config.search;
    let minimax = |side: Side| move |_game: u64| MinimaxAgent::from_config(side, search);

    match choice {
        1 => {
            let report = simulate(&settings, random(Side::Red), rule_based(Side::Yellow))?;
            print_report(&report, "Random", "Rule based");
        }
        2 => {
            let report = simulate(&settings, rule_based(Side::Red), minimax(Side::Yellow))?;
            print_report(&report, "Rule based", "Minimax");
        }
        _ => {
            let report = simulate(&settings, random(Side::Red), minimax(Side::Yellow))?;
            print_report(&report, "Random", "Minimax");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = Config::load_or_default(&config_path)?;

    match main_menu()? {
        5 => simulate_games(&config),
        choice => play(choice, &config),
    }
}
