//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-scaled updates only (60 fps normalized)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod balls;
pub mod bricks;
pub mod collision;
pub mod elements;
pub mod items;
pub mod state;
pub mod tick;

pub use balls::{BallSystem, CloneBehavior};
pub use bricks::{Brick, BrickField, BrickLayout, HitResult};
pub use collision::{BrickHit, CollisionResult, reflect_off_brick, resolve};
pub use elements::{Element, damage, glow_factor};
pub use items::{Effect, Item, ItemFactory};
pub use state::{
    Ball, BallRole, Difficulty, GameEvent, GamePhase, GameState, Paddle, RunOutcome,
};
pub use tick::{TickInput, tick};
