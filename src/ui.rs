//! Presentation layer
//!
//! The simulation knows nothing about a concrete backend; rendering goes
//! through [`DrawSurface`] (shape primitives) and score/lives/timer text
//! through [`StatusSink`]. [`NullSurface`] backs headless runs and tests.

use crate::consts::*;
use crate::sim::{Effect, GamePhase, GameState};

/// Minimal drawing backend: geometry in canvas coordinates, colors as CSS
/// color strings, intensity in 0.0-1.0 for glow/alpha effects.
pub trait DrawSurface {
    fn clear(&mut self);
    fn fill_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: &str,
        intensity: f32,
    );
    fn stroke_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: &str,
    );
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: &str);
    fn text(&mut self, x: f32, y: f32, content: &str, color: &str);
}

/// Receives scoreboard updates outside the canvas
pub trait StatusSink {
    fn set_score(&mut self, score: u32);
    fn set_lives(&mut self, lives: u32);
    fn set_element_label(&mut self, label: &str);
    fn set_timer(&mut self, seconds: f32);
    fn set_final_time(&mut self, seconds: f32);
}

/// Draw one frame of the current state
pub fn render(state: &GameState, surface: &mut impl DrawSurface) {
    surface.clear();
    if !state.is_playing_or_paused() && state.phase != GamePhase::Over {
        return;
    }

    draw_bricks(state, surface);
    draw_items(state, surface);
    draw_balls(state, surface);
    draw_paddle(state, surface);

    if state.phase == GamePhase::Paused {
        surface.text(
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT / 2.0,
            "일시정지",
            "#ffffff",
        );
    }
}

/// Push the scoreboard for the current state
pub fn publish_status(state: &GameState, sink: &mut impl StatusSink) {
    sink.set_score(state.score);
    sink.set_lives(state.lives);
    sink.set_element_label(state.paddle_element.label());
    sink.set_timer(state.elapsed_time);
    if state.phase == GamePhase::Over {
        sink.set_final_time(state.elapsed_time);
    }
}

/// Bricks glow brighter when a ball in play deals them extra damage
fn draw_bricks(state: &GameState, surface: &mut impl DrawSurface) {
    let ball_elements = state.balls.elements();
    let field = &state.brick_field;

    for col in field.columns() {
        for brick in col {
            if !brick.is_alive() {
                continue;
            }
            let intensity = field.glow_factor(brick, &ball_elements);
            surface.fill_rounded_rect(
                brick.x,
                brick.y,
                field.layout.width,
                field.layout.height,
                4.0,
                brick.color(),
                intensity,
            );
            // Remaining life over the brick
            surface.text(
                brick.x + field.layout.width / 2.0,
                brick.y + field.layout.height / 2.0,
                &brick.life.to_string(),
                "#ffffff",
            );
        }
    }
}

fn draw_balls(state: &GameState, surface: &mut impl DrawSurface) {
    for ball in state.balls.balls() {
        surface.fill_circle(ball.pos.x, ball.pos.y, ball.radius, ball.color());
    }
}

fn draw_items(state: &GameState, surface: &mut impl DrawSurface) {
    for item in &state.items {
        if !item.active {
            continue;
        }
        let (color, glyph) = match item.effect {
            Effect::MultiBall { .. } => ("#ffd54f", "x2"),
            Effect::CloneBall { .. } => ("#4fc3f7", "분신"),
        };
        surface.stroke_rounded_rect(item.pos.x, item.pos.y, item.width, item.height, 4.0, color);
        surface.text(
            item.pos.x + item.width / 2.0,
            item.pos.y + item.height / 2.0,
            glyph,
            color,
        );
    }
}

fn draw_paddle(state: &GameState, surface: &mut impl DrawSurface) {
    let rect = state.paddle.bounds();
    surface.fill_rounded_rect(
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        6.0,
        state.paddle_element.color(),
        1.0,
    );
}

/// Discards every draw call; used by the headless driver and tests
#[derive(Debug, Default)]
pub struct NullSurface;

impl DrawSurface for NullSurface {
    fn clear(&mut self) {}
    fn fill_rounded_rect(
        &mut self,
        _x: f32,
        _y: f32,
        _width: f32,
        _height: f32,
        _radius: f32,
        _color: &str,
        _intensity: f32,
    ) {
    }
    fn stroke_rounded_rect(
        &mut self,
        _x: f32,
        _y: f32,
        _width: f32,
        _height: f32,
        _radius: f32,
        _color: &str,
    ) {
    }
    fn fill_circle(&mut self, _x: f32, _y: f32, _radius: f32, _color: &str) {}
    fn text(&mut self, _x: f32, _y: f32, _content: &str, _color: &str) {}
}
