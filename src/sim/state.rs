//! Game state and core simulation types
//!
//! Entities (ball, paddle), difficulty presets, the phase machine and the
//! top-level [`GameState`] that owns every sub-system for a run.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::balls::BallSystem;
use super::bricks::{BrickField, BrickLayout};
use super::elements::Element;
use super::items::{Item, ItemFactory};
use crate::Rect;
use crate::consts::*;

/// Current phase of gameplay (finite state machine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu / difficulty select
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused (rendering continues, simulation stops)
    Paused,
    /// Run ended; exited only via explicit restart or menu navigation
    Over,
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// Every brick destroyed
    Clear,
    /// Lives exhausted or a brick reached the paddle line
    GameOver,
}

/// Difficulty presets: row-descent cadence plus brick life scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Extreme,
}

impl Difficulty {
    /// Seconds between row descents
    pub const fn row_fall_interval(self) -> f32 {
        match self {
            Difficulty::Easy => 30.0,
            Difficulty::Normal => 26.0,
            Difficulty::Hard => 22.0,
            Difficulty::Extreme => 18.0,
        }
    }

    /// Brick life multiplier applied at field init and row insertion
    pub const fn brick_life_multiplier(self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.4,
            Difficulty::Extreme => 1.8,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "extreme" | "extrim" => Some(Difficulty::Extreme),
            _ => None,
        }
    }
}

/// Role of a ball within the population.
///
/// At most one leader exists and a leader is never a clone; the enum makes
/// the invalid combinations unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BallRole {
    /// Moves under its own physics
    #[default]
    Independent,
    /// Moves under physics and feeds the clone trail
    CloneLeader,
    /// Replays the leader's trail instead of integrating
    Clone,
}

/// A ball entity
#[derive(Debug, Clone)]
pub struct Ball {
    pub radius: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub element: Element,
    pub role: BallRole,
}

impl Ball {
    pub fn new(radius: f32, pos: Vec2, vel: Vec2, element: Element) -> Self {
        Self {
            radius,
            pos,
            vel,
            element,
            role: BallRole::Independent,
        }
    }

    /// Advance position by velocity, 60 fps normalized
    pub fn advance(&mut self, frame_scale: f32) {
        self.pos += self.vel * frame_scale;
    }

    pub fn set_element(&mut self, element: Element) {
        self.element = element;
    }

    /// Render color follows the element
    pub fn color(&self) -> &'static str {
        self.element.color()
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Left edge x; y is derived from the canvas height and bottom margin
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (CANVAS_WIDTH - PADDLE_WIDTH) / 2.0,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            moving_left: false,
            moving_right: false,
        }
    }
}

impl Paddle {
    /// Recenter and clear movement intents
    pub fn reset(&mut self) {
        self.x = (CANVAS_WIDTH - self.width) / 2.0;
        self.moving_left = false;
        self.moving_right = false;
    }

    pub fn set_move_left(&mut self, down: bool) {
        self.moving_left = down;
    }

    pub fn set_move_right(&mut self, down: bool) {
        self.moving_right = down;
    }

    /// Advance from movement intents, clamped to the canvas. Right intent
    /// wins when both are held.
    pub fn update(&mut self, frame_scale: f32) {
        let step = self.speed * frame_scale;
        if self.moving_right {
            self.x += step;
        } else if self.moving_left {
            self.x -= step;
        }
        self.x = self.x.clamp(0.0, CANVAS_WIDTH - self.width);
    }

    /// Collision rectangle at the bottom of the playfield
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x,
            CANVAS_HEIGHT - self.height - PADDLE_BOTTOM_MARGIN,
            self.width,
            self.height,
        )
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Events queued during a tick for the driver to drain (record saving,
/// status sinks, sound hooks).
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BrickDestroyed { x: f32, y: f32 },
    ItemPickedUp,
    LifeLost { remaining: u32 },
    RunEnded {
        outcome: RunOutcome,
        difficulty: Difficulty,
        score: u32,
        time: f32,
    },
}

/// Complete game state for one session
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    /// Seconds spent in the Playing phase, monotonic within a run
    pub elapsed_time: f32,
    pub difficulty: Difficulty,
    /// Accumulator toward the next row descent; keeps its remainder
    pub row_fall_timer: f32,
    /// Paddle element, cycled by the player
    pub paddle_element: Element,
    pub paddle: Paddle,
    pub balls: BallSystem,
    pub brick_field: BrickField,
    pub items: Vec<Item>,
    pub item_factory: ItemFactory,
    /// Events queued for the driver, drained via [`GameState::drain_events`]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session in the menu phase
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let difficulty = Difficulty::Normal;
        let mut brick_field = BrickField::new(BrickLayout::default());
        brick_field.set_life_multiplier(difficulty.brick_life_multiplier());
        brick_field.reset_random(&mut rng);

        let paddle_element = Element::Fire;
        let initial = random_launch_ball(
            &mut rng,
            Vec2::new(
                CANVAS_WIDTH / 2.0,
                CANVAS_HEIGHT - BALL_SPAWN_BOTTOM_OFFSET,
            ),
            paddle_element,
        );

        Self {
            seed,
            rng,
            phase: GamePhase::Menu,
            score: 0,
            lives: STARTING_LIVES,
            elapsed_time: 0.0,
            difficulty,
            row_fall_timer: 0.0,
            paddle_element,
            paddle: Paddle::default(),
            balls: BallSystem::new(initial),
            brick_field,
            items: Vec::new(),
            item_factory: ItemFactory::default(),
            events: Vec::new(),
        }
    }

    pub fn is_playing_or_paused(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }

    /// Spawn a ball at `pos` with a randomized upward launch angle, keeping
    /// the configured speed magnitude. Degenerate near-horizontal launches
    /// are excluded by the 30°-150° range.
    pub fn spawn_ball_at(&mut self, pos: Vec2) -> Ball {
        random_launch_ball(&mut self.rng, pos, self.paddle_element)
    }

    /// Select a difficulty and start a fresh run
    pub fn start_with_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.start_game();
    }

    /// Full reset into the playing phase, keeping the current difficulty
    pub fn start_game(&mut self) {
        self.reset_game();
        self.phase = GamePhase::Playing;
        log::info!(
            "run started: difficulty={} seed={}",
            self.difficulty.as_str(),
            self.seed
        );
    }

    /// Back to the main menu (leaves run state as-is until the next start)
    pub fn show_menu(&mut self) {
        self.phase = GamePhase::Menu;
    }

    /// Toggle between playing and paused; no-op in other phases
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Cycle the paddle to the next element. Balls pick it up on their next
    /// paddle bounce.
    pub fn cycle_element(&mut self) {
        self.paddle_element = self.paddle_element.next();
    }

    /// Reset score/lives/time/bricks/balls/items for a new run
    pub fn reset_game(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.elapsed_time = 0.0;
        self.row_fall_timer = 0.0;
        self.paddle_element = Element::Fire;
        self.paddle.reset();

        self.brick_field
            .set_life_multiplier(self.difficulty.brick_life_multiplier());
        self.brick_field.reset_random(&mut self.rng);

        let initial = self.spawn_ball_at(Vec2::new(
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT - BALL_SPAWN_BOTTOM_OFFSET,
        ));
        self.balls.clear_to_single(initial);
        self.items.clear();
        self.events.clear();
    }

    /// End the run and queue the ledger event. The frame that calls this
    /// must not apply any further physics.
    pub fn finish_run(&mut self, outcome: RunOutcome) {
        self.phase = GamePhase::Over;
        self.events.push(GameEvent::RunEnded {
            outcome,
            difficulty: self.difficulty,
            score: self.score,
            time: self.elapsed_time,
        });
        log::info!(
            "run ended: outcome={:?} score={} time={:.2}s",
            outcome,
            self.score,
            self.elapsed_time
        );
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Build a ball at `pos` with the configured speed magnitude and a uniform
/// random launch angle between 30° and 150° from horizontal, biased upward.
fn random_launch_ball(rng: &mut impl Rng, pos: Vec2, element: Element) -> Ball {
    let speed = Vec2::new(BALL_START_SPEED_X, BALL_START_SPEED_Y).length();
    let angle_deg = rng.random_range(LAUNCH_ANGLE_MIN_DEG..LAUNCH_ANGLE_MAX_DEG);
    let angle = angle_deg.to_radians();
    // y grows downward, so an upward launch needs a negative dy
    let vel = Vec2::new(speed * angle.cos(), -speed * angle.sin());
    Ball::new(BALL_RADIUS, pos, vel, element)
}
