//! End-to-end games driven through the engine facade.

use std::time::Duration;

use memory_pairs::{
    Action, BoardView, GameEngine, GameResult, IgnoreReason, MemoryConfig, Phase, ReclickPolicy,
    RulesEngine, TileFace, TileId, Transition,
};

fn engine(seed: u64) -> GameEngine {
    GameEngine::new(MemoryConfig::default().with_seed(seed)).unwrap()
}

/// Ids of the two tiles holding `value`.
fn pair_of(engine: &GameEngine, value: u32) -> (TileId, TileId) {
    let ids: Vec<_> = engine
        .state()
        .deck()
        .unwrap()
        .tiles()
        .filter(|t| t.value == value)
        .map(|t| t.id)
        .collect();
    assert_eq!(ids.len(), 2, "value {value} should appear twice");
    (ids[0], ids[1])
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

// =============================================================================
// Two-by-two Walkthrough
// =============================================================================

#[test]
fn test_two_by_two_walkthrough() {
    let mut engine = engine(42);
    assert_eq!(engine.state().grid_size(), Some(2));

    let (one_a, one_b) = pair_of(&engine, 1);
    let (two_a, two_b) = pair_of(&engine, 2);

    // First guess misses.
    assert_eq!(engine.on_tile_click(one_a), Transition::Flipped(one_a));
    assert_eq!(
        engine.on_tile_click(two_a),
        Transition::Mismatched {
            first: one_a,
            second: two_a,
            hide_at_ms: 1000,
        }
    );
    assert_eq!(engine.state().phase(), Phase::Evaluating);
    assert!(engine.state().input_locked());

    // Both stay visible until the delay runs out, and clicks are ignored meanwhile.
    assert_eq!(
        engine.on_tile_click(one_b),
        Transition::Ignored(IgnoreReason::InputLocked)
    );
    engine.advance(ms(999));
    assert_eq!(engine.state().selection(), &[one_a, two_a]);

    assert_eq!(
        engine.advance(ms(1)),
        Transition::Advanced {
            now_ms: 1000,
            hidden: Some((one_a, two_a)),
        }
    );
    assert!(engine.state().selection().is_empty());
    assert!(!engine.state().input_locked());

    // Then both pairs are found.
    engine.on_tile_click(one_a);
    assert_eq!(
        engine.on_tile_click(one_b),
        Transition::Matched {
            first: one_a,
            second: one_b,
            won: false,
        }
    );
    engine.on_tile_click(two_a);
    assert_eq!(
        engine.on_tile_click(two_b),
        Transition::Matched {
            first: two_a,
            second: two_b,
            won: true,
        }
    );

    assert_eq!(engine.state().phase(), Phase::Won);
    assert_eq!(engine.result(), Some(GameResult::Won { moves: 3 }));

    let view = engine.view();
    assert_eq!(view.banner(), Some("You won!"));
    assert_eq!(view.reset_label(), "Play Again");
    assert!(view
        .tiles
        .iter()
        .all(|t| matches!(t.face, TileFace::Matched(_))));
}

#[test]
fn test_won_game_ignores_clicks_until_reset() {
    let mut engine = engine(3);
    for value in 1..=2 {
        let (a, b) = pair_of(&engine, value);
        engine.on_tile_click(a);
        engine.on_tile_click(b);
    }
    assert!(engine.state().is_won());

    let before = engine.view();
    for id in 0..4 {
        assert_eq!(
            engine.on_tile_click(TileId(id)),
            Transition::Ignored(IgnoreReason::GameWon)
        );
    }
    assert_eq!(engine.view(), before);
    assert!(engine.legal_actions().is_empty());

    assert!(matches!(engine.reset(), Transition::Dealt { grid_size: 2, .. }));
    assert!(!engine.state().is_won());
    assert_eq!(engine.view().reset_label(), "Reset");
}

// =============================================================================
// Reveal Delay and New Deals
// =============================================================================

#[test]
fn test_reset_during_reveal_delay() {
    let mut engine = engine(8);
    engine.set_grid_size(4);
    let (one, _) = pair_of(&engine, 1);
    let (two, _) = pair_of(&engine, 2);

    engine.on_tile_click(one);
    engine.on_tile_click(two);
    assert!(engine.state().input_locked());

    engine.advance(ms(400));
    engine.reset();

    // The fresh board is playable immediately.
    assert!(!engine.state().input_locked());
    assert!(engine.state().selection().is_empty());
    assert_eq!(engine.state().phase(), Phase::Ready);

    let (fresh, _) = pair_of(&engine, 3);
    engine.on_tile_click(fresh);

    // The old reveal never fires on the new board.
    assert_eq!(
        engine.advance(ms(5000)),
        Transition::Advanced {
            now_ms: 5400,
            hidden: None,
        }
    );
    assert_eq!(engine.state().selection(), &[fresh]);
}

#[test]
fn test_grid_change_during_reveal_delay() {
    let mut engine = engine(9);
    let (one, _) = pair_of(&engine, 1);
    let (two, _) = pair_of(&engine, 2);
    engine.on_tile_click(one);
    engine.on_tile_click(two);

    engine.set_grid_size(6);

    assert_eq!(engine.state().deck().map(|d| d.len()), Some(36));
    assert!(!engine.state().input_locked());
    assert!(engine.state().scheduler.next_deadline().is_none());
}

#[test]
fn test_tiny_steps_reach_the_deadline() {
    let mut engine = engine(10);
    let (one, _) = pair_of(&engine, 1);
    let (two, _) = pair_of(&engine, 2);
    engine.on_tile_click(one);
    engine.on_tile_click(two);

    let mut hidden_at = None;
    for frame in 1..=100u64 {
        if let Transition::Advanced {
            hidden: Some(_), ..
        } = engine.advance(ms(16))
        {
            hidden_at = Some(frame * 16);
            break;
        }
    }
    assert_eq!(hidden_at, Some(1008));
}

#[test]
fn test_zero_delay_hides_on_next_advance() {
    let config = MemoryConfig::default().with_seed(4).with_reveal_delay_ms(0);
    let mut engine = GameEngine::new(config).unwrap();
    let (one, _) = pair_of(&engine, 1);
    let (two, _) = pair_of(&engine, 2);
    engine.on_tile_click(one);
    engine.on_tile_click(two);

    // Still visible until time is advanced.
    assert_eq!(engine.state().selection().len(), 2);
    assert!(matches!(
        engine.advance(Duration::ZERO),
        Transition::Advanced {
            hidden: Some(_),
            ..
        }
    ));
}

// =============================================================================
// Grid Size Control
// =============================================================================

#[test]
fn test_invalid_grid_sizes_leave_game_alone() {
    let mut engine = engine(12);
    engine.set_grid_size(3);
    let (one, _) = pair_of(&engine, 1);
    engine.on_tile_click(one);
    let before = engine.view();

    for size in [0, 1, 11, 99] {
        assert_eq!(
            engine.set_grid_size(size),
            Transition::Ignored(IgnoreReason::InvalidGridSize(size))
        );
        assert_eq!(engine.view(), before);
    }
}

#[test]
fn test_reset_uses_last_requested_size() {
    let mut engine = engine(13);
    engine.set_grid_size(5);
    engine.set_grid_size(42);

    assert_eq!(engine.state().grid_size(), Some(5));
    assert_eq!(
        engine.reset(),
        Transition::Ignored(IgnoreReason::InvalidGridSize(42))
    );

    engine.set_grid_size(3);
    assert!(matches!(
        engine.reset(),
        Transition::Dealt {
            grid_size: 3,
            tiles: 9,
            ..
        }
    ));
}

#[test]
fn test_odd_grid_has_one_empty_cell() {
    let mut engine = engine(14);
    engine.set_grid_size(5);

    let view = engine.view();
    assert_eq!(view.tiles.len(), 24);
    let rows: Vec<_> = view.rows().map(<[_]>::len).collect();
    assert_eq!(rows, vec![5, 5, 5, 5, 4]);
}

// =============================================================================
// Re-click Policies
// =============================================================================

#[test]
fn test_reclick_forgets_found_pairs() {
    let mut engine = engine(15);
    engine.set_grid_size(4);
    let (a, b) = pair_of(&engine, 1);
    engine.on_tile_click(a);
    engine.on_tile_click(b);
    let (c, _) = pair_of(&engine, 2);

    engine.on_tile_click(c);
    assert_eq!(
        engine.on_tile_click(c),
        Transition::Deselected {
            tile: c,
            cleared_matches: 2,
        }
    );
    assert!(engine.state().matched().is_empty());
    assert_eq!(engine.state().phase(), Phase::Ready);
}

#[test]
fn test_reclick_deselect_policy() {
    let config = MemoryConfig::default()
        .with_seed(15)
        .with_reclick_policy(ReclickPolicy::Deselect);
    let mut engine = GameEngine::new(config).unwrap();
    engine.set_grid_size(4);
    let (a, b) = pair_of(&engine, 1);
    engine.on_tile_click(a);
    engine.on_tile_click(b);
    let (c, _) = pair_of(&engine, 2);

    engine.on_tile_click(c);
    engine.on_tile_click(c);

    assert_eq!(engine.state().matched().len(), 2);
    assert!(engine.state().selection().is_empty());
}

// =============================================================================
// Full Games
// =============================================================================

/// Play a perfect game: flip each pair directly.
fn play_perfect(engine: &mut GameEngine) -> u32 {
    let pairs = engine.state().deck().unwrap().len() as u32 / 2;
    for value in 1..=pairs {
        let (a, b) = pair_of(engine, value);
        engine.on_tile_click(a);
        engine.on_tile_click(b);
    }
    pairs
}

#[test]
fn test_perfect_game_on_every_size() {
    for size in 2..=10 {
        let mut engine = engine(u64::from(size));
        engine.set_grid_size(size);

        let pairs = play_perfect(&mut engine);

        assert!(engine.state().is_won(), "size {size} should be won");
        assert_eq!(engine.result(), Some(GameResult::Won { moves: pairs }));
    }
}

#[test]
fn test_play_by_legal_actions_only() {
    // Keep the first legal tile and rotate through partners until one matches.
    let mut engine = engine(21);
    engine.set_grid_size(4);

    let mut attempt = 0usize;
    while engine.result().is_none() {
        attempt += 1;
        assert!(attempt < 10_000, "game should finish");

        let legal = engine.legal_actions();
        let Some(&first) = legal.first() else {
            engine.advance(Duration::from_millis(1000));
            continue;
        };
        assert!(!engine.apply(first).is_ignored());

        let partners: Vec<_> = engine
            .legal_actions()
            .into_iter()
            .filter(|&a| a != first)
            .collect();
        let second = partners[attempt % partners.len()];
        assert!(!engine.apply(second).is_ignored());
    }

    assert!(engine.state().is_won());
}

#[test]
fn test_legal_actions_match_rules() {
    let mut engine = engine(30);
    engine.set_grid_size(3);
    let rules = memory_pairs::MemoryGame::new(engine.config().clone());

    for action in engine.legal_actions() {
        assert!(rules.is_legal(engine.state(), &action));
        assert!(matches!(action, Action::Flip(_)));
    }
    assert_eq!(engine.legal_actions().len(), 8);
}

// =============================================================================
// Persistence and Views
// =============================================================================

#[test]
fn test_snapshot_mid_reveal_resumes() {
    let mut engine = engine(31);
    engine.set_grid_size(4);
    let (one, _) = pair_of(&engine, 1);
    let (two, _) = pair_of(&engine, 2);
    engine.on_tile_click(one);
    engine.on_tile_click(two);
    engine.advance(ms(300));

    let bytes = engine.snapshot().to_bytes().unwrap();
    let snapshot = memory_pairs::GameSnapshot::from_bytes(&bytes).unwrap();
    let mut restored = GameEngine::from_snapshot(snapshot).unwrap();

    assert!(restored.state().input_locked());
    assert!(matches!(
        restored.advance(ms(700)),
        Transition::Advanced {
            hidden: Some(_),
            ..
        }
    ));
    assert!(!restored.state().input_locked());
}

#[test]
fn test_view_serializes_for_hosts() {
    let mut engine = engine(32);
    let (one, _) = pair_of(&engine, 1);
    engine.on_tile_click(one);

    let view = engine.view();
    let json = serde_json::to_string(&view).unwrap();
    let decoded: BoardView = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, view);
}

#[test]
fn test_history_tracks_effective_inputs() {
    let mut engine = engine(33);
    let (one, _) = pair_of(&engine, 1);
    let (two, _) = pair_of(&engine, 2);

    engine.on_tile_click(one);
    engine.on_tile_click(two);
    engine.on_tile_click(one); // ignored, locked
    engine.advance(ms(500)); // nothing hidden yet
    engine.advance(ms(500));

    let actions: Vec<_> = engine
        .state()
        .history()
        .iter()
        .map(|record| record.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            Action::SetGridSize(2),
            Action::Flip(one),
            Action::Flip(two),
            Action::Advance { millis: 500 },
        ]
    );
}
