//! Oheng Breakout - a five-element brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, element rules, collisions, game state machine)
//! - `records`: Local score ledger (save/list/clear over a key-value store)
//! - `ui`: Draw-surface and status-sink collaborator traits, render pass

pub mod records;
pub mod sim;
pub mod ui;

pub use records::{GameRecord, RecordBook};
pub use sim::{Difficulty, Element, GamePhase, GameState, TickInput, tick};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical playfield size
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Components of the reference launch velocity; only the magnitude is
    /// kept, the launch angle is randomized per spawn.
    pub const BALL_START_SPEED_X: f32 = 6.0;
    pub const BALL_START_SPEED_Y: f32 = -6.0;
    /// Randomized launch angle range, degrees from horizontal (biased upward)
    pub const LAUNCH_ANGLE_MIN_DEG: f32 = 30.0;
    pub const LAUNCH_ANGLE_MAX_DEG: f32 = 150.0;
    /// Fresh balls spawn this far above the playfield bottom
    pub const BALL_SPAWN_BOTTOM_OFFSET: f32 = 30.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 90.0;
    pub const PADDLE_HEIGHT: f32 = 14.0;
    pub const PADDLE_SPEED: f32 = 7.0;
    pub const PADDLE_BOTTOM_MARGIN: f32 = 10.0;
    /// Horizontal speed factor applied to the normalized paddle hit offset
    pub const PADDLE_DEFLECT_FACTOR: f32 = 5.0;

    /// Brick field layout
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 24.0;
    pub const BRICK_PADDING: f32 = 4.0;
    pub const BRICK_OFFSET_TOP: f32 = 40.0;
    pub const BRICK_OFFSET_LEFT: f32 = 40.0;
    /// Base life of every brick before difficulty/growth scaling
    pub const BRICK_BASE_LIFE: u32 = 6;
    /// Life growth per inserted row (+18% each)
    pub const ROW_LIFE_GROWTH_PER_STEP: f32 = 0.18;

    /// Nudge applied when un-sticking a ball from a brick face
    pub const COLLISION_EPSILON: f32 = 0.5;

    /// Item defaults
    pub const ITEM_SIZE: f32 = 20.0;
    pub const ITEM_FALL_SPEED: f32 = 3.0;
    pub const ITEM_DROP_RATE: f32 = 0.3;
    /// Items are discarded once they fall this far past the bottom
    pub const ITEM_DESPAWN_MARGIN: f32 = 50.0;

    /// Trail entries separating consecutive clone balls
    pub const CLONE_TRAIL_SPACING: usize = 15;

    /// Lives at the start of every run, regardless of difficulty
    pub const STARTING_LIVES: u32 = 3;
}

/// An axis-aligned rectangle in playfield coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// AABB overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Whether a point lies strictly inside the rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.left()
            && point.x < self.right()
            && point.y > self.top()
            && point.y < self.bottom()
    }
}
