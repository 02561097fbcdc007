#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::components::{Control, PieceKind, Position};
    use crate::config::Config;
    use crate::sound::AudioState;
    use crate::systems::{GameEvent, GameState, GravityStep, Scoreboard};
    use crate::tests::test_utils::state_with;
    use crossterm::event::KeyCode;
    use proptest::prelude::*;

    fn drop_until_locked(state: &mut GameState) -> GravityStep {
        loop {
            let step = state.advance_gravity();
            if step != GravityStep::Moved {
                return step;
            }
        }
    }

    #[test]
    fn test_two_pieces_clear_two_rows() {
        let mut state = state_with(PieceKind::O, 4, 8);
        assert_eq!(state.piece.position, Position { x: 1, y: 0 });

        assert!(state.shift(-1));
        assert_eq!(
            drop_until_locked(&mut state),
            GravityStep::Locked {
                rows_cleared: 0,
                game_over: false
            }
        );
        assert_eq!(state.board.get(7, 0), 2);
        assert_eq!(state.board.get(6, 1), 2);

        assert!(!state.spawn_kind(PieceKind::O));
        assert!(state.shift(1));
        assert_eq!(
            drop_until_locked(&mut state),
            GravityStep::Locked {
                rows_cleared: 2,
                game_over: false
            }
        );

        assert_eq!(state.score(), 20);
        assert!(state.board.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::PieceLocked,
                GameEvent::ScoreChanged(0),
                GameEvent::PieceLocked,
                GameEvent::RowsCleared(2),
                GameEvent::ScoreChanged(20),
            ]
        );
    }

    #[test]
    fn test_stacking_without_moving_ends_in_game_over() {
        let mut state = GameState::with_seed(10, 20, 3);
        let mut locks = 0;

        let final_score = loop {
            if let GravityStep::Locked { game_over, .. } = drop_until_locked(&mut state) {
                locks += 1;
                if game_over {
                    break state.drain_events().into_iter().find_map(|event| match event {
                        GameEvent::GameOver { final_score } => Some(final_score),
                        _ => None,
                    });
                }
            }
            assert!(locks < 100, "the center column should fill up quickly");
        };

        // Nothing ever moved sideways, so no row could be completed
        assert_eq!(final_score, Some(0));
        assert!(state.board.is_empty());
        assert_eq!(state.piece.position, GameState::spawn_position(10));

        // Play continues on the fresh board
        assert_eq!(state.advance_gravity(), GravityStep::Moved);
    }

    #[test]
    fn test_game_cycle_through_app() {
        let mut app = App::with_state(
            &Config::default(),
            state_with(PieceKind::I, 10, 20),
            AudioState::silent(),
        );

        // Move the I to the left wall and let gravity take it down
        for _ in 0..10 {
            app.handle_key(KeyCode::Left);
        }
        app.frame(0.0);
        assert_eq!(app.world.resource::<GameState>().piece.position.x, -1);

        let mut frames = 0;
        while app.world.resource::<GameState>().board.is_empty() {
            app.frame(16.0);
            frames += 1;
            assert!(frames < 2_000);
        }

        let state = app.world.resource::<GameState>();
        for row in 17..20 {
            assert_eq!(state.board.get(row, 0), 3);
        }
        // 18 gravity steps at one step per 32 frames of 16ms
        assert!(frames > 18 * 31);
        assert_eq!(app.world.resource::<Scoreboard>().score, 0);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Play(Control),
        Wait(u16),
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::Play(Control::Left)),
            Just(Step::Play(Control::Right)),
            Just(Step::Play(Control::Down)),
            Just(Step::Play(Control::Rotate)),
            (0u16..700).prop_map(Step::Wait),
        ]
    }

    proptest! {
        #[test]
        fn piece_stays_in_bounds_and_no_full_rows_persist(
            cols in 4usize..12,
            rows in 4usize..16,
            seed in any::<u64>(),
            steps in prop::collection::vec(step_strategy(), 0..300),
        ) {
            let mut state = GameState::with_seed(cols, rows, seed);

            for step in steps {
                match step {
                    Step::Play(control) => state.apply(control),
                    Step::Wait(ms) => {
                        state.tick(f64::from(ms));
                    }
                }

                for (x, y, value) in state.piece.cells() {
                    prop_assert!((0..cols as i32).contains(&x));
                    prop_assert!((0..rows as i32).contains(&y));
                    prop_assert_eq!(value, state.piece.color);
                }
                for row in 0..rows {
                    prop_assert!(!state.board.is_row_full(row));
                }
                prop_assert!(state.board.grid().flatten().all(|&c| c <= 7));
                prop_assert!((100..=500).contains(&state.progression.drop_interval));
            }
        }
    }
}
