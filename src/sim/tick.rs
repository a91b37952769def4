//! Fixed-timestep simulation driver
//!
//! One [`tick`] call applies the player's input intents to the phase
//! machine, then, while playing, advances the world by `dt` seconds.
//! Physics constants are tuned for 60 fps, so motion is integrated with a
//! `dt * 60` frame scale.

use glam::Vec2;

use super::collision::{reflect_off_brick, resolve};
use super::state::{BallRole, GameEvent, GamePhase, GameState, RunOutcome};
use crate::consts::*;

/// Input intents for one tick, already decoupled from any key mapping.
///
/// `move_left`/`move_right` are held states; the rest are edge-triggered
/// (the driver sends `true` only on the frame the key went down).
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub pause: bool,
    pub restart: bool,
    pub quit_to_menu: bool,
    pub cycle_element: bool,
}

/// Advance the session by `dt` seconds of wall time
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.quit_to_menu && state.phase != GamePhase::Menu {
        state.show_menu();
        return;
    }
    if input.restart && (state.is_playing_or_paused() || state.phase == GamePhase::Over) {
        state.start_game();
        return;
    }

    if state.is_playing_or_paused() {
        if input.pause {
            state.toggle_pause();
        }
        if input.cycle_element {
            state.cycle_element();
        }
        state.paddle.set_move_left(input.move_left);
        state.paddle.set_move_right(input.move_right);
    }

    if state.phase == GamePhase::Playing {
        state.elapsed_time += dt;
        update(state, dt);
    }
}

/// One frame of world simulation. Order matters:
/// row descent, ball/brick collisions, wall and paddle bounces, ball
/// deaths, paddle movement, ball movement, item movement and pickup.
fn update(state: &mut GameState, dt: f32) {
    let frame_scale = dt * 60.0;

    if descend_rows(state, dt) {
        return;
    }

    // Safety net; normal respawning happens on life loss below
    if state.balls.is_empty() {
        let ball = state.spawn_ball_at(Vec2::new(
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT - BALL_SPAWN_BOTTOM_OFFSET,
        ));
        state.balls.add_ball(ball);
    }

    if collide_bricks(state) {
        return;
    }
    bounce_walls_and_paddle(state, frame_scale);
    if handle_dead_balls(state, frame_scale) {
        return;
    }

    state.paddle.update(frame_scale);
    state.balls.update(frame_scale);
    update_items(state, frame_scale);
}

/// Accumulate the row-descent timer and shift the field down once per
/// elapsed interval, keeping the remainder. Returns true when a brick
/// crossed the paddle line and the run ended.
fn descend_rows(state: &mut GameState, dt: f32) -> bool {
    state.row_fall_timer += dt;
    let interval = state.difficulty.row_fall_interval();
    while state.row_fall_timer >= interval {
        state.row_fall_timer -= interval;
        state.brick_field.shift_down_and_add_row(&mut state.rng);

        let paddle_line = state.paddle.bounds().top();
        if state.brick_field.has_brick_reached_line(paddle_line) {
            state.finish_run(RunOutcome::GameOver);
            return true;
        }
    }
    false
}

/// Resolve at most one brick per ball: damage, reflection, scoring, item
/// drop. Returns true when the last brick fell and the run ended.
fn collide_bricks(state: &mut GameState) -> bool {
    for idx in 0..state.balls.len() {
        let ball = state.balls.balls()[idx].clone();
        let result = resolve(&ball, &mut state.brick_field);

        if let Some(hit) = result.hit {
            reflect_off_brick(&mut state.balls.balls_mut()[idx], hit.rect);
            if hit.destroyed {
                state.score += hit.score_delta;
                let center = hit.rect.center();
                state.events.push(GameEvent::BrickDestroyed {
                    x: center.x,
                    y: center.y,
                });
                if let Some(item) = state.item_factory.create_random(hit.rect, &mut state.rng) {
                    state.items.push(item);
                }
            }
        }

        if result.all_cleared {
            state.finish_run(RunOutcome::Clear);
            return true;
        }
    }
    false
}

/// Predictive wall, ceiling and paddle bounces, checked against each
/// ball's next position so fast balls cannot tunnel through in one frame.
fn bounce_walls_and_paddle(state: &mut GameState, frame_scale: f32) {
    let paddle_rect = state.paddle.bounds();
    let paddle_center = state.paddle.center_x();
    let paddle_element = state.paddle_element;
    let half_width = paddle_rect.width / 2.0;

    for ball in state.balls.balls_mut() {
        let next = ball.pos + ball.vel * frame_scale;

        if next.x - ball.radius < 0.0 || next.x + ball.radius > CANVAS_WIDTH {
            ball.vel.x = -ball.vel.x;
        }

        if next.y - ball.radius < 0.0 {
            ball.vel.y = -ball.vel.y;
        } else if ball.vel.y > 0.0
            && next.y + ball.radius >= paddle_rect.top()
            && next.y - ball.radius <= paddle_rect.bottom()
            && next.x + ball.radius >= paddle_rect.left()
            && next.x - ball.radius <= paddle_rect.right()
        {
            // Deflection angle follows where the ball struck the paddle
            let offset = (next.x - paddle_center) / half_width;
            ball.vel.x = offset * PADDLE_DEFLECT_FACTOR;
            ball.vel.y = -ball.vel.y.abs();
            ball.set_element(paddle_element);
        }
    }

    // Clones always carry the leader's element
    if let Some(leader_element) = state
        .balls
        .balls()
        .iter()
        .find(|b| b.role == BallRole::CloneLeader)
        .map(|b| b.element)
    {
        for ball in state.balls.balls_mut() {
            if ball.role == BallRole::Clone {
                ball.set_element(leader_element);
            }
        }
    }
}

/// Drop balls whose next position is past the bottom edge; on losing the
/// last one, deduct a life and either respawn or end the run. Returns true
/// when the run ended.
fn handle_dead_balls(state: &mut GameState, frame_scale: f32) -> bool {
    let mut dead: Vec<usize> = Vec::new();
    for (idx, ball) in state.balls.balls().iter().enumerate() {
        let next_y = ball.pos.y + ball.vel.y * frame_scale;
        if next_y - ball.radius > CANVAS_HEIGHT {
            dead.push(idx);
        }
    }
    // Descending order keeps the remaining indices valid
    for &idx in dead.iter().rev() {
        state.balls.remove(idx);
    }

    if !dead.is_empty() && state.balls.is_empty() {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::LifeLost {
            remaining: state.lives,
        });
        log::debug!("ball lost, {} lives remaining", state.lives);

        if state.lives == 0 {
            state.finish_run(RunOutcome::GameOver);
            return true;
        }

        let spawn = Vec2::new(
            state.paddle.center_x(),
            CANVAS_HEIGHT - BALL_SPAWN_BOTTOM_OFFSET,
        );
        let ball = state.spawn_ball_at(spawn);
        state.balls.clear_to_single(ball);
    }
    false
}

/// Advance falling items, apply pickups against the paddle and drop
/// anything deactivated or fallen off-screen.
fn update_items(state: &mut GameState, frame_scale: f32) {
    let paddle_rect = state.paddle.bounds();

    for item in &mut state.items {
        item.update(frame_scale);
        if item.collides_with(&paddle_rect) {
            item.pick_up(&mut state.balls);
            state.events.push(GameEvent::ItemPickedUp);
        }
    }

    let despawn_y = CANVAS_HEIGHT + ITEM_DESPAWN_MARGIN;
    state.items.retain(|i| i.active && i.pos.y < despawn_y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Difficulty;

    const DT: f32 = 1.0 / 60.0;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_with_difficulty(Difficulty::Normal);
        state
    }

    /// Drop every brick so wall/paddle physics can be tested in isolation
    fn clear_field(state: &mut GameState) {
        let crusher = |e: crate::sim::Element| {
            crate::sim::elements::ELEMENTS
                .iter()
                .copied()
                .find(|a| a.dominates() == e)
                .unwrap()
        };
        while !state.brick_field.is_cleared() {
            let mut target = None;
            'scan: for (c, col) in state.brick_field.columns().iter().enumerate() {
                for (r, b) in col.iter().enumerate() {
                    if b.is_alive() {
                        target = Some((c, r, b.element));
                        break 'scan;
                    }
                }
            }
            let (c, r, e) = target.unwrap();
            // Dominating damage (6) twice kills a base-life brick
            state.brick_field.apply_hit(r, c, Some(crusher(e)));
            state.brick_field.apply_hit(r, c, Some(crusher(e)));
        }
    }

    #[test]
    fn test_ceiling_reflection() {
        let mut state = playing_state(3);
        clear_field(&mut state);
        // A cleared field ends the run on the first collision pass, so this
        // test drives the bounce helper directly.
        state.balls.balls_mut()[0].pos = Vec2::new(400.0, 20.0);
        state.balls.balls_mut()[0].vel = Vec2::new(0.0, -20.0);
        bounce_walls_and_paddle(&mut state, 1.0);
        assert!(state.balls.balls()[0].vel.y > 0.0);
    }

    #[test]
    fn test_side_wall_reflection() {
        let mut state = playing_state(3);
        state.balls.balls_mut()[0].pos = Vec2::new(5.0, 300.0);
        state.balls.balls_mut()[0].vel = Vec2::new(-10.0, 1.0);
        bounce_walls_and_paddle(&mut state, 1.0);
        assert!(state.balls.balls()[0].vel.x > 0.0);
    }

    #[test]
    fn test_paddle_bounce_reelements_ball() {
        let mut state = playing_state(4);
        state.cycle_element();
        let paddle_element = state.paddle_element;
        let top = state.paddle.bounds().top();

        let ball = &mut state.balls.balls_mut()[0];
        ball.pos = Vec2::new(state.paddle.center_x() + 10.0, top - 10.0);
        ball.vel = Vec2::new(0.0, 8.0);
        bounce_walls_and_paddle(&mut state, 1.0);

        let ball = &state.balls.balls()[0];
        assert!(ball.vel.y < 0.0, "paddle bounce must send the ball up");
        assert_eq!(ball.element, paddle_element);
        // Off-center hits deflect sideways toward the struck side
        assert!(ball.vel.x > 0.0);
    }

    #[test]
    fn test_losing_all_lives_ends_run() {
        let mut state = playing_state(5);
        for expected_remaining in (0..STARTING_LIVES).rev() {
            // Aim the only ball straight past the bottom edge
            let ball = &mut state.balls.balls_mut()[0];
            ball.pos = Vec2::new(400.0, CANVAS_HEIGHT + 50.0);
            ball.vel = Vec2::new(0.0, 10.0);
            assert!(!handle_dead_balls(&mut state, 1.0) || expected_remaining == 0);
            assert_eq!(state.lives, expected_remaining);

            if expected_remaining > 0 {
                assert_eq!(state.balls.len(), 1, "a fresh ball respawns");
                assert_eq!(state.phase, GamePhase::Playing);
            }
        }
        assert_eq!(state.phase, GamePhase::Over);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::RunEnded {
                outcome: RunOutcome::GameOver,
                ..
            }
        )));
    }

    #[test]
    fn test_row_descent_timing_keeps_remainder() {
        let mut state = playing_state(6);
        let before = state.brick_field.alive_count();
        let interval = state.difficulty.row_fall_interval();

        assert!(!descend_rows(&mut state, interval - 0.5));
        assert_eq!(state.brick_field.alive_count(), before);

        assert!(!descend_rows(&mut state, 1.0));
        assert_eq!(state.brick_field.alive_count(), before + BRICK_COLS);
        assert!((state.row_fall_timer - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_clearing_field_finishes_run() {
        let mut state = playing_state(7);
        clear_field(&mut state);
        assert!(state.brick_field.is_cleared());

        // The collision pass notices the empty field regardless of hits
        assert!(collide_bricks(&mut state));
        assert_eq!(state.phase, GamePhase::Over);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::RunEnded {
                outcome: RunOutcome::Clear,
                ..
            }
        )));
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = playing_state(8);
        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let pos_before = state.balls.balls()[0].pos;
        let time_before = state.elapsed_time;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.balls.balls()[0].pos, pos_before);
        assert_eq!(state.elapsed_time, time_before);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_from_over() {
        let mut state = playing_state(9);
        state.finish_run(RunOutcome::GameOver);
        assert_eq!(state.phase, GamePhase::Over);

        let restart = TickInput {
            restart: true,
            ..TickInput::default()
        };
        tick(&mut state, &restart, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_elapsed_time_accumulates_while_playing() {
        let mut state = playing_state(10);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
            if state.phase != GamePhase::Playing {
                break;
            }
        }
        if state.phase == GamePhase::Playing {
            assert!((state.elapsed_time - 1.0).abs() < 1e-3);
        }
    }
}
