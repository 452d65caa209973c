use ultra_ping_pong::consts::*;
use ultra_ping_pong::sim::{Direction, GameClock, GameEvent, MatchPhase, Side, Viewport};

/// Drive the clock like the browser host does: AI poll and frame tick
/// every display frame
fn run_frames(clock: &mut GameClock, now: &mut f64, frames: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        *now += FRAME_INTERVAL_MS;
        clock.poll_ai(*now);
        events.extend(clock.tick(*now));
    }
    events
}

#[test]
fn test_full_match_reaches_game_over() {
    let mut clock = GameClock::new(2024, Viewport::new(600.0, 900.0));
    assert!(clock.start());

    // Player camps in the left corner, so most rallies end quickly
    clock.set_direction(Direction::Left);

    let mut now = 0.0;
    let mut last = (0, 0);
    let mut game_over_events = 0;

    for _ in 0..500_000 {
        if clock.phase() != MatchPhase::Playing {
            break;
        }
        let events = run_frames(&mut clock, &mut now, 1);
        game_over_events += events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();

        let state = clock.state();
        let scores = (state.player_score, state.ai_score);
        // At most one point per goal event, never decreasing
        assert!(scores.0 >= last.0 && scores.0 - last.0 <= 1);
        assert!(scores.1 >= last.1 && scores.1 - last.1 <= 1);
        assert!(scores.0 <= WINNING_SCORE && scores.1 <= WINNING_SCORE);
        last = scores;
    }

    let state = clock.state();
    assert_eq!(state.phase, MatchPhase::GameOver);
    assert_eq!(game_over_events, 1);

    let winner = state.winner.expect("winner set at game over");
    assert_eq!(state.score(winner), WINNING_SCORE);
    assert!(state.score(winner.opponent()) < WINNING_SCORE);
}

#[test]
fn test_game_over_then_reset_then_restart() {
    let mut clock = GameClock::new(7, Viewport::default());
    clock.start();
    clock.set_direction(Direction::Right);

    let mut now = 0.0;
    for _ in 0..500_000 {
        if clock.phase() != MatchPhase::Playing {
            break;
        }
        run_frames(&mut clock, &mut now, 1);
    }
    assert_eq!(clock.phase(), MatchPhase::GameOver);
    let ticks_at_game_over = clock.time_ticks();

    // The scheduler keeps running but nothing moves
    let frozen = clock.state().clone();
    assert!(run_frames(&mut clock, &mut now, 30).is_empty());
    assert_eq!(clock.state(), &frozen);

    clock.reset();
    assert_eq!(clock.phase(), MatchPhase::Idle);
    assert_eq!(clock.state().player_score, 0);
    assert_eq!(clock.state().ai_score, 0);
    assert_eq!(clock.state().winner, None);

    assert!(clock.start());
    assert_eq!(clock.phase(), MatchPhase::Playing);
    run_frames(&mut clock, &mut now, 10);
    assert!(clock.time_ticks() > ticks_at_game_over);
}

#[test]
fn test_ai_only_tracks_ball_heading_up() {
    let mut clock = GameClock::new(31, Viewport::default());
    clock.start();

    let mut now = 0.0;
    let mut targets = Vec::new();
    for _ in 0..600 {
        run_frames(&mut clock, &mut now, 1);
        if clock.phase() != MatchPhase::Playing {
            break;
        }
        targets.push((clock.state().ball.vel.y, clock.ai().target_x()));
    }

    // Whenever the ball is moving down across two frames, the target holds
    for pair in targets.windows(2) {
        let (vy_prev, target_prev) = pair[0];
        let (vy_next, target_next) = pair[1];
        if vy_prev > 0.0 && vy_next > 0.0 {
            assert_eq!(target_prev, target_next);
        }
    }
}

#[test]
fn test_every_goal_serves_from_the_conceding_side() {
    let mut clock = GameClock::new(555, Viewport::default());
    clock.start();
    clock.set_direction(Direction::Left);

    let mut now = 0.0;
    let mut goals = 0;
    for _ in 0..500_000 {
        if clock.phase() != MatchPhase::Playing || goals >= 5 {
            break;
        }
        let events = run_frames(&mut clock, &mut now, 1);
        for event in events {
            if let GameEvent::Scored(side) = event {
                goals += 1;
                let ball = clock.state().ball;
                let conceding = side.opponent();
                assert_eq!(ball.vel.y.signum(), conceding.outward());
                assert_eq!(ball.speed, BALL_INITIAL_SPEED);
                if conceding == Side::Ai {
                    assert!(ball.pos.y < 100.0);
                } else {
                    assert!(ball.pos.y > 700.0);
                }
            }
        }
    }
    assert_eq!(goals, 5);
}
