#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use proptest::prelude::*;

    use crate::{
        agent::{encode_features, Features, OutcomeClass},
        config::{SearchConfig, SimulationConfig},
        error::GameError,
        game::play_game,
        search::WIN_SCORE,
        simulation::simulate,
        *,
    };

    /// Fills the board so that no four tokens line up anywhere
    fn drawn_board() -> Board {
        let mut board = Board::new();
        for column in 0..WIDTH {
            for row in (0..HEIGHT).rev() {
                let side = if (column / 2 + row) % 2 == 0 {
                    Side::Red
                } else {
                    Side::Yellow
                };
                assert!(board.drop(column, side));
            }
        }
        board
    }

    /// Plays `columns` alternately from Red, skipping full columns and
    /// stopping once the game is decided
    fn board_from_columns(columns: &[usize]) -> Board {
        let mut board = Board::new();
        let mut side = Side::Red;
        for &column in columns {
            if board.outcome().is_some() {
                break;
            }
            if board.drop(column, side) {
                side = side.opponent();
            }
        }
        board
    }

    #[test]
    pub fn legal_moves() -> Result<()> {
        let mut board = Board::new();
        assert_eq!(board.legal_moves(), vec![0, 1, 2, 3, 4, 5, 6]);

        for _ in 0..HEIGHT {
            assert!(board.drop(2, Side::Red));
        }
        assert_eq!(board.legal_moves(), vec![0, 1, 3, 4, 5, 6]);
        assert!(!board.drop(2, Side::Yellow));
        assert_eq!(board.column_height(2), HEIGHT);

        assert!(drawn_board().legal_moves().is_empty());
        Ok(())
    }

    #[test]
    pub fn gravity() -> Result<()> {
        let mut board = Board::new();
        assert!(board.drop(4, Side::Red));
        assert_eq!(board.get(5, 4), Cell::Red);
        assert!(board.drop(4, Side::Yellow));
        assert_eq!(board.get(4, 4), Cell::Yellow);
        assert_eq!(board.get(3, 4), Cell::Empty);
        assert_eq!(board.column_height(4), 2);
        assert_eq!(board.token_count(), 2);
        Ok(())
    }

    #[test]
    pub fn horizontal_win() -> Result<()> {
        let mut board = Board::new();
        for column in 0..4 {
            assert!(!board.has_won(Side::Red));
            board.drop(column, Side::Red);
        }
        assert!(board.has_won(Side::Red));
        assert!(!board.has_won(Side::Yellow));
        assert_eq!(board.outcome(), Some(Outcome::Win(Side::Red)));
        Ok(())
    }

    #[test]
    pub fn vertical_win() -> Result<()> {
        let mut board = Board::new();
        for _ in 0..4 {
            board.drop(0, Side::Red);
        }
        // rows 2 to 5 of column 0
        assert_eq!(board.get(2, 0), Cell::Red);
        assert!(board.has_won(Side::Red));
        Ok(())
    }

    #[test]
    pub fn diagonal_down_right_win() -> Result<()> {
        // Red at (2,0), (3,1), (4,2), (5,3)
        let mut board = Board::new();
        for _ in 0..3 {
            board.drop(0, Side::Yellow);
        }
        board.drop(0, Side::Red);
        for _ in 0..2 {
            board.drop(1, Side::Yellow);
        }
        board.drop(1, Side::Red);
        board.drop(2, Side::Yellow);
        board.drop(2, Side::Red);
        assert!(!board.has_won(Side::Red));
        board.drop(3, Side::Red);

        assert_eq!(board.get(2, 0), Cell::Red);
        assert_eq!(board.get(5, 3), Cell::Red);
        assert!(board.has_won(Side::Red));
        assert!(!board.has_won(Side::Yellow));
        Ok(())
    }

    #[test]
    pub fn diagonal_down_left_win() -> Result<()> {
        // Red at (5,0), (4,1), (3,2), (2,3)
        let mut board = Board::new();
        board.drop(0, Side::Red);
        board.drop(1, Side::Yellow);
        board.drop(1, Side::Red);
        for _ in 0..2 {
            board.drop(2, Side::Yellow);
        }
        board.drop(2, Side::Red);
        for _ in 0..3 {
            board.drop(3, Side::Yellow);
        }
        assert!(!board.has_won(Side::Red));
        board.drop(3, Side::Red);

        assert_eq!(board.get(5, 0), Cell::Red);
        assert_eq!(board.get(2, 3), Cell::Red);
        assert!(board.has_won(Side::Red));
        Ok(())
    }

    #[test]
    pub fn no_win_without_four() -> Result<()> {
        let board = Board::from_moves("1122334")?;
        assert!(board.has_won(Side::Red));

        let board = Board::from_moves("112233")?;
        assert!(!board.has_won(Side::Red));
        assert!(!board.has_won(Side::Yellow));
        assert_eq!(board.outcome(), None);
        Ok(())
    }

    #[test]
    pub fn draw() -> Result<()> {
        let board = drawn_board();
        assert!(board.is_full());
        assert!(!board.has_won(Side::Red));
        assert!(!board.has_won(Side::Yellow));
        assert_eq!(board.outcome(), Some(Outcome::Draw));
        Ok(())
    }

    #[test]
    pub fn undo_inverts_drop() -> Result<()> {
        let mut board = Board::from_moves("4453321")?;
        for column in 0..WIDTH {
            let before = board.clone();
            assert!(board.drop(column, Side::Yellow));
            assert_ne!(board, before);
            board.undo(column);
            assert_eq!(board, before);
        }
        Ok(())
    }

    #[test]
    pub fn scoped_drop_reverts() -> Result<()> {
        let mut board = Board::from_moves("44")?;
        let before = board.clone();
        {
            let next = board.play_scoped(3, Side::Red).expect("column 3 has room");
            assert_eq!(next.column(), 3);
            assert_eq!(next.get(3, 3), Cell::Red);
        }
        assert_eq!(board, before);

        let mut full = drawn_board();
        assert!(full.play_scoped(0, Side::Red).is_none());
        assert_eq!(full, drawn_board());
        Ok(())
    }

    #[test]
    #[should_panic(expected = "undo on empty column")]
    pub fn undo_empty_column_panics() {
        Board::new().undo(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    pub fn drop_out_of_range_panics() {
        Board::new().drop(WIDTH, Side::Red);
    }

    #[test]
    pub fn from_moves_rejects_bad_input() -> Result<()> {
        assert!(Board::from_moves("8").is_err());
        assert!(Board::from_moves("1x").is_err());
        assert!(Board::from_moves("1111111").is_err());
        assert!(Board::from_moves("12121213").is_err());

        let mut board = Board::from_moves("")?;
        assert_eq!(board, Board::new());
        board = Board::from_moves("47")?;
        assert_eq!(board.get(5, 3), Cell::Red);
        assert_eq!(board.get(5, 6), Cell::Yellow);
        board.reset();
        assert_eq!(board, Board::new());
        Ok(())
    }

    #[test]
    pub fn text_rendering() -> Result<()> {
        let board = Board::from_moves("41")?;
        let text = board.to_string();
        assert_eq!(text.lines().count(), HEIGHT);
        assert_eq!(text.lines().last(), Some("Y..R..."));
        Ok(())
    }

    #[test]
    pub fn center_control() -> Result<()> {
        let evaluator = CenterControl::default();
        let board = Board::from_moves("4444")?;
        assert_eq!(evaluator.score(&board, Side::Red), 6);
        assert_eq!(evaluator.score(&board, Side::Yellow), 6);

        // tokens outside the centre column count for nothing
        let board = Board::from_moves("41")?;
        assert_eq!(evaluator.score(&board, Side::Red), 3);
        assert_eq!(evaluator.score(&board, Side::Yellow), 0);
        assert_eq!(CenterControl::new(5).score(&board, Side::Red), 5);
        Ok(())
    }

    #[test]
    pub fn terminal_scores() -> Result<()> {
        // Red stacks four in column 1
        let mut board = Board::from_moves("1213141")?;
        let mut red = Searcher::new(Side::Red);
        let mut yellow = Searcher::new(Side::Yellow);

        assert_eq!(red.minimax(&mut board, 0, i32::MIN, i32::MAX, true), WIN_SCORE);
        assert_eq!(red.minimax(&mut board, 3, i32::MIN, i32::MAX, false), 7);
        assert_eq!(yellow.minimax(&mut board, 0, i32::MIN, i32::MAX, true), -WIN_SCORE);
        assert!(yellow.minimax(&mut board, 4, i32::MIN, i32::MAX, true) < 0);

        let mut board = drawn_board();
        assert_eq!(red.minimax(&mut board, 0, i32::MIN, i32::MAX, true), 0);
        assert_eq!(red.best_move(&mut board), None);
        Ok(())
    }

    #[test]
    pub fn depth_cutoff_uses_evaluator() -> Result<()> {
        let mut board = Board::from_moves("444")?;
        let mut red = Searcher::new(Side::Red);
        // two Red tokens and one Yellow in the centre
        assert_eq!(red.evaluate(&board), 3);
        assert_eq!(red.minimax(&mut board, 5, i32::MIN, i32::MAX, true), 3);
        Ok(())
    }

    #[test]
    pub fn immediate_win() -> Result<()> {
        // both sides threaten column 4, Red to move
        let mut board = Board::from_moves("112233")?;
        let mut searcher = Searcher::new(Side::Red);
        assert_eq!(searcher.best_move(&mut board), Some(3));
        Ok(())
    }

    #[test]
    pub fn immediate_block() -> Result<()> {
        // Yellow threatens column 4 along the bottom, Red to move
        let mut board = Board::from_moves("717263")?;
        let mut searcher = Searcher::new(Side::Red);
        assert_eq!(searcher.best_move(&mut board), Some(3));

        let scores = searcher.root_scores(&mut board);
        for (column, score) in scores {
            if column != 3 {
                assert_eq!(score, 1 - WIN_SCORE);
            }
        }
        Ok(())
    }

    #[test]
    pub fn search_leaves_board_unchanged() -> Result<()> {
        let mut board = Board::from_moves("4453")?;
        let before = board.clone();
        let mut searcher = Searcher::new(Side::Red);
        searcher.best_move(&mut board);
        assert_eq!(board, before);
        assert!(searcher.node_count > 0);
        Ok(())
    }

    #[test]
    pub fn ties_go_to_lowest_column() -> Result<()> {
        let mut board = Board::new();
        let mut searcher = Searcher::with_evaluator(Side::Red, CenterControl::new(0)).with_max_depth(1);
        assert!(searcher.root_scores(&mut board).iter().all(|&(_, score)| score == 0));
        assert_eq!(searcher.best_move(&mut board), Some(0));

        // the centre column breaks the tie once it is worth something
        let mut searcher = Searcher::new(Side::Red).with_max_depth(0);
        assert_eq!(searcher.best_move(&mut board), Some(CENTER_COLUMN));
        Ok(())
    }

    #[test]
    pub fn pruning_visits_fewer_nodes() -> Result<()> {
        let mut board = Board::new();
        let mut pruned = Searcher::new(Side::Red).with_max_depth(3);
        let mut exhaustive = Searcher::new(Side::Red).with_max_depth(3).with_pruning(false);

        assert_eq!(pruned.best_move(&mut board), exhaustive.best_move(&mut board));
        assert!(pruned.node_count < exhaustive.node_count);
        Ok(())
    }

    #[test]
    pub fn searcher_from_config() -> Result<()> {
        let config = SearchConfig {
            max_depth: 2,
            center_weight: 1,
            pruning: false,
        };
        let searcher = Searcher::from_config(Side::Yellow, &config);
        assert_eq!(searcher.max_depth(), 2);
        assert_eq!(searcher.own(), Side::Yellow);
        assert_eq!(searcher.opponent(), Side::Red);
        assert_eq!(searcher.evaluate(&Board::from_moves("4")?), -1);
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Alpha-beta cutoffs never change a root score or the chosen column
        #[test]
        fn pruning_matches_minimax(
            columns in prop::collection::vec(0usize..WIDTH, 0..24),
            red in any::<bool>(),
            depth in 1usize..4,
        ) {
            let mut board = board_from_columns(&columns);
            let before = board.clone();
            let side = if red { Side::Red } else { Side::Yellow };

            let mut pruned = Searcher::new(side).with_max_depth(depth);
            let mut exhaustive = Searcher::new(side).with_max_depth(depth).with_pruning(false);

            prop_assert_eq!(pruned.root_scores(&mut board), exhaustive.root_scores(&mut board));
            prop_assert_eq!(pruned.best_move(&mut board), exhaustive.best_move(&mut board));
            prop_assert_eq!(
                pruned.minimax(&mut board, 0, i32::MIN, i32::MAX, true),
                exhaustive.minimax(&mut board, 0, i32::MIN, i32::MAX, true)
            );
            prop_assert_eq!(board, before);
        }
    }

    #[test]
    pub fn minimax_agent() -> Result<()> {
        let mut board = Board::from_moves("717263")?;
        let mut agent = MinimaxAgent::from_config(Side::Red, &SearchConfig::default());
        assert_eq!(agent.side(), Side::Red);
        assert_eq!(agent.name(), "Minimax");
        assert_eq!(agent.choose_move(&mut board), Some(3));
        assert_eq!(agent.searcher().max_depth(), 5);
        Ok(())
    }

    #[test]
    pub fn random_agent() -> Result<()> {
        let mut board = Board::from_moves("111111333333")?;
        let mut agent = RandomAgent::seeded(Side::Red, 7);
        for _ in 0..100 {
            let column = agent.choose_move(&mut board).expect("board has room");
            assert!(board.legal_moves().contains(&column));
        }

        let mut first = RandomAgent::seeded(Side::Red, 42);
        let mut second = RandomAgent::seeded(Side::Red, 42);
        for _ in 0..20 {
            assert_eq!(first.choose_move(&mut board), second.choose_move(&mut board));
        }

        assert_eq!(agent.choose_move(&mut drawn_board()), None);
        Ok(())
    }

    #[test]
    pub fn rule_based_agent() -> Result<()> {
        let mut agent = RuleBasedAgent::seeded(Side::Red, 1);

        let mut board = Board::from_moves("112233")?;
        assert_eq!(agent.choose_move(&mut board), Some(3));

        let mut board = Board::from_moves("717263")?;
        let before = board.clone();
        assert_eq!(agent.choose_move(&mut board), Some(3));
        assert_eq!(board, before);

        assert_eq!(agent.choose_move(&mut drawn_board()), None);
        Ok(())
    }

    #[test]
    pub fn predictor_agent() -> Result<()> {
        let board = Board::from_moves("17")?;
        let features = encode_features(&board);
        assert_eq!(features[5 * WIDTH], 1);
        assert_eq!(features[5 * WIDTH + 6], -1);
        assert_eq!(features.iter().filter(|&&f| f != 0).count(), 2);

        // likes positions with a Yellow token at the bottom of the last column
        let likes_corner = |features: &Features| {
            if features[5 * WIDTH + 6] == -1 {
                OutcomeClass::Win
            } else {
                OutcomeClass::Loss
            }
        };
        let mut agent = PredictorAgent::new(Side::Yellow, likes_corner);
        assert_eq!(agent.choose_move(&mut Board::new()), Some(6));

        // Red threatens both ends of the bottom row, so Yellow blocks the first
        let mut board = Board::from_moves("27374")?;
        let before = board.clone();
        assert_eq!(agent.choose_move(&mut board), Some(0));
        assert_eq!(board, before);

        let mut agent = PredictorAgent::new(Side::Yellow, |_: &Features| OutcomeClass::Draw);
        assert_eq!(agent.choose_move(&mut Board::new()), Some(0));
        Ok(())
    }

    #[test]
    pub fn game_between_agents() -> Result<()> {
        let mut board = Board::new();
        let mut red = MinimaxAgent::with_searcher(Searcher::new(Side::Red).with_max_depth(3));
        let mut yellow = RandomAgent::seeded(Side::Yellow, 3);

        let record = play_game(&mut board, &mut red, &mut yellow)?;
        assert_eq!(Some(record.outcome), board.outcome());
        assert_eq!(record.moves.len(), board.token_count());

        let replay: String = record.moves.iter().map(|m| (m + 1).to_string()).collect();
        assert_eq!(Board::from_moves(replay)?, board);
        Ok(())
    }

    struct OutOfRange;

    impl Agent for OutOfRange {
        fn side(&self) -> Side {
            Side::Yellow
        }

        fn name(&self) -> &str {
            "Out of range"
        }

        fn choose_move(&mut self, _board: &mut Board) -> Option<usize> {
            Some(WIDTH)
        }
    }

    #[test]
    pub fn game_rejects_illegal_moves() -> Result<()> {
        let mut board = Board::new();
        let mut red = RandomAgent::seeded(Side::Red, 0);
        let result = play_game(&mut board, &mut red, &mut OutOfRange);
        assert!(matches!(
            result,
            Err(GameError::IllegalMove { column: Some(WIDTH), side: Side::Yellow, .. })
        ));

        let mut other_red = RandomAgent::seeded(Side::Red, 1);
        let result = play_game(&mut Board::new(), &mut red, &mut other_red);
        assert_eq!(result, Err(GameError::SameSide(Side::Red)));
        Ok(())
    }

    #[test]
    pub fn simulation_counts_every_game() -> Result<()> {
        let config = SimulationConfig {
            games: 12,
            parallel: true,
            progress: false,
            seed: Some(9),
        };
        let report = simulate(
            &config,
            |game| RandomAgent::seeded(Side::Red, game),
            |game| RuleBasedAgent::seeded(Side::Yellow, game + 100),
        )?;
        assert_eq!(report.games(), 12);
        assert_eq!(report.durations.len(), 12);
        assert!(report.first_win_rate() + report.second_win_rate() <= 1.0);
        Ok(())
    }

    #[test]
    pub fn minimax_beats_random() -> Result<()> {
        let config = SimulationConfig {
            games: 10,
            parallel: false,
            progress: false,
            seed: None,
        };
        let search = SearchConfig {
            max_depth: 3,
            ..SearchConfig::default()
        };
        let report = simulate(
            &config,
            |_| MinimaxAgent::from_config(Side::Red, &search),
            |game| RandomAgent::seeded(Side::Yellow, game),
        )?;
        assert!(
            report.first_wins >= 8,
            "minimax won only {}/{} games",
            report.first_wins,
            report.games()
        );
        Ok(())
    }
}
