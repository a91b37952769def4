//! Falling power-up items and their effects
//!
//! The effect set is closed and small, so it is a plain enum with a single
//! `apply` dispatch rather than an open trait hierarchy. Items spawn
//! probabilistically from destroyed bricks, fall at a fixed speed and apply
//! their effect on paddle pickup.

use glam::Vec2;
use rand::Rng;

use super::balls::{BallSystem, CloneBehavior};
use super::state::{Ball, BallRole};
use crate::Rect;
use crate::consts::*;

/// Angular spread between multi-ball copies (15 degrees)
const MULTI_BALL_SPREAD: f32 = std::f32::consts::PI / 12.0;
/// Fallback speed when the source ball is stationary
const MULTI_BALL_FALLBACK_SPEED: f32 = 5.0;

/// A power-up effect, applied against the ball system on pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Spawn `extra` independent copies of every non-clone ball, fanned out
    /// around the source heading
    MultiBall { extra: u32 },
    /// Spawn `clones` trail-following copies of the leader and install the
    /// clone behavior
    CloneBall { clones: u32 },
}

impl Effect {
    pub fn apply(&self, balls: &mut BallSystem) {
        match *self {
            Effect::MultiBall { extra } => apply_multi_ball(balls, extra),
            Effect::CloneBall { clones } => apply_clone_ball(balls, clones),
        }
    }
}

fn apply_multi_ball(system: &mut BallSystem, extra: u32) {
    if system.is_empty() {
        return;
    }

    // Snapshot the non-clone sources first; the spawned balls must not
    // become sources themselves.
    let sources: Vec<Ball> = system
        .balls()
        .iter()
        .filter(|b| b.role != BallRole::Clone)
        .cloned()
        .collect();

    for source in sources {
        let speed = {
            let s = source.vel.length();
            if s > 0.0 { s } else { MULTI_BALL_FALLBACK_SPEED }
        };
        let base_angle = source.vel.y.atan2(source.vel.x);

        for i in 0..extra {
            // Alternate sides with growing multiples of the spread:
            // +1, -1, +2, -2, ...
            let dir = if i % 2 == 0 { 1.0 } else { -1.0 };
            let mul = (i / 2 + 1) as f32;
            let angle = base_angle + dir * MULTI_BALL_SPREAD * mul;

            let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            let mut ball = Ball::new(source.radius, source.pos, vel, source.element);
            ball.role = BallRole::Independent;
            system.add_ball(ball);
        }
    }
}

fn apply_clone_ball(system: &mut BallSystem, clones: u32) {
    if system.is_empty() {
        return;
    }

    // Prefer an existing leader; otherwise the first non-clone ball, or
    // failing that the first ball outright.
    let leader_idx = system
        .balls()
        .iter()
        .position(|b| b.role == BallRole::CloneLeader)
        .or_else(|| {
            system
                .balls()
                .iter()
                .position(|b| b.role != BallRole::Clone)
        })
        .unwrap_or(0);
    system.balls_mut()[leader_idx].role = BallRole::CloneLeader;
    let leader = system.balls()[leader_idx].clone();

    for _ in 0..clones {
        let mut clone = Ball::new(leader.radius, leader.pos, leader.vel, leader.element);
        clone.role = BallRole::Clone;
        system.add_ball(clone);
    }

    // Fresh behavior, fresh trail; replaces any prior one
    system.set_behavior(CloneBehavior::default());
}

/// A falling power-up
#[derive(Debug, Clone)]
pub struct Item {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub fall_speed: f32,
    pub effect: Effect,
    pub active: bool,
}

impl Item {
    pub fn new(pos: Vec2, effect: Effect) -> Self {
        Self {
            pos,
            width: ITEM_SIZE,
            height: ITEM_SIZE,
            fall_speed: ITEM_FALL_SPEED,
            effect,
            active: true,
        }
    }

    /// Fall straight down
    pub fn update(&mut self, frame_scale: f32) {
        if !self.active {
            return;
        }
        self.pos.y += self.fall_speed * frame_scale;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn collides_with(&self, rect: &Rect) -> bool {
        self.active && self.bounds().overlaps(rect)
    }

    /// Deactivate and apply the effect. Idempotent.
    pub fn pick_up(&mut self, balls: &mut BallSystem) {
        if !self.active {
            return;
        }
        self.active = false;
        log::debug!("item picked up: {:?}", self.effect);
        self.effect.apply(balls);
    }
}

/// Spawns items from destroyed bricks with a configurable drop rate
#[derive(Debug, Clone)]
pub struct ItemFactory {
    drop_rate: f32,
    pool: Vec<Effect>,
}

impl Default for ItemFactory {
    fn default() -> Self {
        Self {
            drop_rate: ITEM_DROP_RATE,
            pool: vec![
                Effect::MultiBall { extra: 1 },
                Effect::CloneBall { clones: 2 },
            ],
        }
    }
}

impl ItemFactory {
    pub fn new(drop_rate: f32, pool: Vec<Effect>) -> Self {
        Self { drop_rate, pool }
    }

    /// Roll the drop chance for a destroyed brick and, on success, spawn an
    /// item centered on it with a uniformly chosen effect.
    pub fn create_random(&self, brick: Rect, rng: &mut impl Rng) -> Option<Item> {
        if self.pool.is_empty() || rng.random::<f32>() > self.drop_rate {
            return None;
        }
        let effect = self.pool[rng.random_range(0..self.pool.len())];
        let center = brick.center();
        let pos = Vec2::new(center.x - ITEM_SIZE / 2.0, center.y - ITEM_SIZE / 2.0);
        Some(Item::new(pos, effect))
    }
}
