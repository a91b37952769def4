//! Ball population and pluggable movement behavior
//!
//! The system always starts from a single ball and can grow through items.
//! With no behavior installed every ball advances independently; the clone
//! behavior routes movement through a leader whose historical trail the
//! clone balls replay.

use glam::Vec2;

use super::state::{Ball, BallRole};
use crate::consts::CLONE_TRAIL_SPACING;

/// Leader-trail movement for clone balls.
///
/// The leader and any independent balls move under direct physics; each
/// clone snaps to the leader's position from `trail_length * (index + 1)`
/// frames ago and mirrors the leader's element every frame.
#[derive(Debug, Clone)]
pub struct CloneBehavior {
    trail_length: usize,
    /// Leader position history, newest first
    trail: Vec<Vec2>,
}

impl Default for CloneBehavior {
    fn default() -> Self {
        Self::new(CLONE_TRAIL_SPACING)
    }
}

impl CloneBehavior {
    pub fn new(trail_length: usize) -> Self {
        Self {
            trail_length,
            trail: Vec::new(),
        }
    }

    fn update(&mut self, balls: &mut [Ball], frame_scale: f32) {
        if balls.is_empty() {
            return;
        }

        // Promote the first ball if no leader exists; a promoted ball is
        // never left as a clone.
        let leader_idx = match balls.iter().position(|b| b.role == BallRole::CloneLeader) {
            Some(idx) => idx,
            None => {
                balls[0].role = BallRole::CloneLeader;
                0
            }
        };

        balls[leader_idx].advance(frame_scale);
        let leader_pos = balls[leader_idx].pos;
        let leader_element = balls[leader_idx].element;

        self.trail.insert(0, leader_pos);
        let clone_count = balls.iter().filter(|b| b.role == BallRole::Clone).count();
        // One past the deepest clone offset so the last clone can actually
        // reach its trail entry.
        let max_trail = self.trail_length * clone_count.max(1) + 1;
        self.trail.truncate(max_trail);

        let mut clone_idx = 0;
        for (i, ball) in balls.iter_mut().enumerate() {
            if i == leader_idx {
                continue;
            }
            match ball.role {
                BallRole::Clone => {
                    let offset = self.trail_length * (clone_idx + 1);
                    // Fall back to the leader's position until the trail is
                    // long enough.
                    ball.pos = self.trail.get(offset).copied().unwrap_or(leader_pos);
                    ball.set_element(leader_element);
                    clone_idx += 1;
                }
                _ => ball.advance(frame_scale),
            }
        }
    }
}

/// Owns the ordered, never-empty-by-construction set of active balls
#[derive(Debug)]
pub struct BallSystem {
    balls: Vec<Ball>,
    behavior: Option<CloneBehavior>,
}

impl BallSystem {
    pub fn new(initial: Ball) -> Self {
        Self {
            balls: vec![initial],
            behavior: None,
        }
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn add_ball(&mut self, ball: Ball) {
        self.balls.push(ball);
    }

    /// Replace the entire set with one ball and drop any installed
    /// behavior, as after a life loss.
    pub fn clear_to_single(&mut self, ball: Ball) {
        self.balls = vec![ball];
        self.behavior = None;
    }

    /// Install (or replace) the clone movement behavior
    pub fn set_behavior(&mut self, behavior: CloneBehavior) {
        self.behavior = Some(behavior);
    }

    /// Remove the ball at `index`; callers removing several must go in
    /// descending index order.
    pub fn remove(&mut self, index: usize) {
        self.balls.remove(index);
    }

    /// Advance all balls, through the behavior when one is installed
    pub fn update(&mut self, frame_scale: f32) {
        match &mut self.behavior {
            Some(behavior) => behavior.update(&mut self.balls, frame_scale),
            None => {
                for ball in &mut self.balls {
                    ball.advance(frame_scale);
                }
            }
        }
    }

    /// Elements of every active ball, for the brick glow pass
    pub fn elements(&self) -> Vec<super::elements::Element> {
        self.balls.iter().map(|b| b.element).collect()
    }
}
