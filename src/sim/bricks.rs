//! Brick entities and the brick field grid
//!
//! The field owns a column-major grid of bricks. Rows grow at the top over
//! time (row descent), which is the sole source of escalating difficulty
//! within a run. Destroyed bricks stay in the grid with a dead status; they
//! are only physically removed by a full reset.

use rand::Rng;

use super::elements::{self, Element};
use crate::Rect;
use crate::consts::*;

/// Brick layout parameters. A struct rather than bare constants so tests can
/// run tiny fields.
#[derive(Debug, Clone, Copy)]
pub struct BrickLayout {
    pub rows: usize,
    pub cols: usize,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub offset_top: f32,
    pub offset_left: f32,
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self {
            rows: BRICK_ROWS,
            cols: BRICK_COLS,
            width: BRICK_WIDTH,
            height: BRICK_HEIGHT,
            padding: BRICK_PADDING,
            offset_top: BRICK_OFFSET_TOP,
            offset_left: BRICK_OFFSET_LEFT,
        }
    }
}

/// A single brick
#[derive(Debug, Clone)]
pub struct Brick {
    pub element: Element,
    pub life: u32,
    pub max_life: u32,
    /// Screen-space top-left corner; moves down on row descent
    pub x: f32,
    pub y: f32,
    alive: bool,
}

impl Brick {
    pub fn new(element: Element, life: u32, x: f32, y: f32) -> Self {
        Self {
            element,
            life,
            max_life: life,
            x,
            y,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn color(&self) -> &'static str {
        self.element.color()
    }

    /// Apply damage. Returns true when this hit destroyed the brick.
    /// Dead bricks and zero damage are no-ops.
    pub fn hit(&mut self, damage: u32) -> bool {
        if !self.alive || damage == 0 {
            return false;
        }
        self.life = self.life.saturating_sub(damage);
        if self.life == 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Result of applying a hit to a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitResult {
    pub destroyed: bool,
    pub score_delta: u32,
}

impl HitResult {
    pub const NONE: HitResult = HitResult {
        destroyed: false,
        score_delta: 0,
    };
}

/// The 2-D brick grid, column-major (`bricks[col][row]`, row 0 at the top)
#[derive(Debug)]
pub struct BrickField {
    pub layout: BrickLayout,
    bricks: Vec<Vec<Brick>>,
    alive_count: usize,
    life_multiplier: f32,
    /// Rows inserted since the last reset; drives the life growth factor
    extra_row_count: u32,
}

impl BrickField {
    pub fn new(layout: BrickLayout) -> Self {
        Self {
            layout,
            bricks: Vec::new(),
            alive_count: 0,
            life_multiplier: 1.0,
            extra_row_count: 0,
        }
    }

    /// Store the difficulty multiplier for subsequent init/row insertion.
    /// Existing bricks are never rescaled.
    pub fn set_life_multiplier(&mut self, multiplier: f32) {
        self.life_multiplier = multiplier;
    }

    /// (Re)build the full grid with uniformly random brick elements
    pub fn reset_random(&mut self, rng: &mut impl Rng) {
        let layout = self.layout;
        self.bricks.clear();
        self.alive_count = 0;
        self.extra_row_count = 0;

        for c in 0..layout.cols {
            let mut col = Vec::with_capacity(layout.rows);
            for r in 0..layout.rows {
                let element = Element::random(rng);
                let life = scale_life(BRICK_BASE_LIFE, self.life_multiplier);
                let x = c as f32 * (layout.width + layout.padding) + layout.offset_left;
                let y = r as f32 * (layout.height + layout.padding) + layout.offset_top;
                col.push(Brick::new(element, life, x, y));
                self.alive_count += 1;
            }
            self.bricks.push(col);
        }
    }

    /// Columns of the grid, for collision scans and rendering
    pub fn columns(&self) -> &[Vec<Brick>] {
        &self.bricks
    }

    pub fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// All alive bricks are gone
    pub fn is_cleared(&self) -> bool {
        self.alive_count == 0
    }

    /// Collision rectangle of the cell at (col, row)
    pub fn brick_rect(&self, col: usize, row: usize) -> Rect {
        let b = &self.bricks[col][row];
        Rect::new(b.x, b.y, self.layout.width, self.layout.height)
    }

    /// Apply elemental damage to the cell at (row, col). No-op for missing
    /// or already-destroyed cells.
    pub fn apply_hit(&mut self, row: usize, col: usize, attacker: Option<Element>) -> HitResult {
        let Some(brick) = self.bricks.get_mut(col).and_then(|c| c.get_mut(row)) else {
            return HitResult::NONE;
        };
        if !brick.is_alive() {
            return HitResult::NONE;
        }

        let damage = elements::damage(attacker, Some(brick.element));
        let destroyed = brick.hit(damage);
        if destroyed {
            self.alive_count -= 1;
            HitResult {
                destroyed: true,
                score_delta: 1,
            }
        } else {
            HitResult::NONE
        }
    }

    /// Move every alive brick down one row-height and insert a fresh row at
    /// the top of each column. New bricks get progressively more life:
    /// `base * difficulty_multiplier * (1 + inserted_rows * 0.18)`.
    pub fn shift_down_and_add_row(&mut self, rng: &mut impl Rng) {
        let layout = self.layout;
        let dy = layout.height + layout.padding;

        for col in &mut self.bricks {
            for brick in col.iter_mut() {
                if brick.is_alive() {
                    brick.y += dy;
                }
            }
        }

        self.extra_row_count += 1;
        let growth_factor = 1.0 + self.extra_row_count as f32 * ROW_LIFE_GROWTH_PER_STEP;

        for c in 0..layout.cols {
            let element = Element::random(rng);
            let life = scale_life(BRICK_BASE_LIFE, self.life_multiplier * growth_factor);
            let x = c as f32 * (layout.width + layout.padding) + layout.offset_left;
            let brick = Brick::new(element, life, x, layout.offset_top);
            self.bricks[c].insert(0, brick);
            self.alive_count += 1;
        }

        log::debug!(
            "row inserted: step={} growth={:.2} alive={}",
            self.extra_row_count,
            growth_factor,
            self.alive_count
        );
    }

    /// True if any alive brick's bottom edge is at or below `line_y`
    pub fn has_brick_reached_line(&self, line_y: f32) -> bool {
        let height = self.layout.height;
        self.bricks
            .iter()
            .flatten()
            .any(|b| b.is_alive() && b.y + height >= line_y)
    }

    /// Cosmetic glow for a brick given the elements of the balls in play:
    /// the best (maximum) damage any present element would deal, mapped
    /// through the fixed glow table. No gameplay effect.
    pub fn glow_factor(&self, brick: &Brick, ball_elements: &[Element]) -> f32 {
        let best = ball_elements
            .iter()
            .map(|&e| elements::damage(Some(e), Some(brick.element)))
            .max();
        match best {
            Some(d) => elements::glow_factor(d),
            None => 1.0,
        }
    }
}

/// Scale a base life by a multiplier, rounded, with a floor of 1
fn scale_life(base: u32, multiplier: f32) -> u32 {
    ((base as f32 * multiplier).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn small_field(rows: usize, cols: usize) -> (BrickField, Pcg32) {
        let layout = BrickLayout {
            rows,
            cols,
            ..BrickLayout::default()
        };
        let mut field = BrickField::new(layout);
        let mut rng = Pcg32::seed_from_u64(42);
        field.reset_random(&mut rng);
        (field, rng)
    }

    #[test]
    fn test_fresh_field_invariants() {
        let (field, _) = small_field(5, 10);
        assert_eq!(field.alive_count(), 50);
        assert!(!field.is_cleared());
        for col in field.columns() {
            assert_eq!(col.len(), 5);
            for brick in col {
                assert!(brick.is_alive());
                assert_eq!(brick.life, BRICK_BASE_LIFE);
            }
        }
    }

    #[test]
    fn test_life_multiplier_scales_new_bricks_only() {
        let layout = BrickLayout {
            rows: 1,
            cols: 1,
            ..BrickLayout::default()
        };
        let mut field = BrickField::new(layout);
        let mut rng = Pcg32::seed_from_u64(0);
        field.reset_random(&mut rng);
        assert_eq!(field.columns()[0][0].life, 6);

        // Changing the multiplier must not touch placed bricks
        field.set_life_multiplier(1.8);
        assert_eq!(field.columns()[0][0].life, 6);

        field.reset_random(&mut rng);
        assert_eq!(field.columns()[0][0].life, 11); // round(6 * 1.8)
    }

    #[test]
    fn test_life_floor_is_one() {
        assert_eq!(scale_life(6, 0.01), 1);
        assert_eq!(scale_life(6, 0.8), 5);
    }

    #[test]
    fn test_apply_hit_and_clearance() {
        let (mut field, _) = small_field(2, 2);
        // Same-element damage is always 3, so each 6-life brick dies in two
        // hits with its own element.
        for c in 0..2 {
            for r in 0..2 {
                let element = field.columns()[c][r].element;
                let first = field.apply_hit(r, c, Some(element));
                assert!(!first.destroyed);
                let second = field.apply_hit(r, c, Some(element));
                assert!(second.destroyed);
                assert_eq!(second.score_delta, 1);
            }
        }
        assert!(field.is_cleared());
        assert_eq!(field.alive_count(), 0);

        // Hitting a dead cell is a no-op
        let result = field.apply_hit(0, 0, Some(Element::Fire));
        assert_eq!(result, HitResult::NONE);
        assert_eq!(field.alive_count(), 0);
    }

    #[test]
    fn test_nullified_hit_leaves_brick_alive() {
        let (mut field, _) = small_field(1, 1);
        let defender = field.columns()[0][0].element;
        // The attacker that the defender dominates deals 0 damage
        let attacker = defender.dominates();
        let result = field.apply_hit(0, 0, Some(attacker));
        assert!(!result.destroyed);
        assert_eq!(field.columns()[0][0].life, BRICK_BASE_LIFE);
    }

    #[test]
    fn test_shift_down_adds_rows_with_growing_life() {
        let (mut field, mut rng) = small_field(2, 3);
        let dy = field.layout.height + field.layout.padding;
        let first_y = field.columns()[0][0].y;

        field.shift_down_and_add_row(&mut rng);
        assert_eq!(field.alive_count(), 2 * 3 + 3);
        assert_eq!(field.columns()[0].len(), 3);
        // Old top row moved down, new row sits at the offset
        assert_eq!(field.columns()[0][1].y, first_y + dy);
        assert_eq!(field.columns()[0][0].y, field.layout.offset_top);
        let first_spawn_life = field.columns()[0][0].life;
        assert_eq!(first_spawn_life, 7); // round(6 * 1.18)

        // Growth is monotonic over repeated insertions
        let mut prev = first_spawn_life;
        for _ in 0..5 {
            field.shift_down_and_add_row(&mut rng);
            let life = field.columns()[0][0].life;
            assert!(life >= prev);
            prev = life;
        }
        assert!(prev > first_spawn_life);
    }

    #[test]
    fn test_has_brick_reached_line() {
        let (mut field, mut rng) = small_field(1, 1);
        let bottom = field.columns()[0][0].y + field.layout.height;
        assert!(field.has_brick_reached_line(bottom));
        assert!(!field.has_brick_reached_line(bottom + 1.0));

        // Dead bricks never trigger the line check
        let element = field.columns()[0][0].element;
        while field.columns()[0][0].is_alive() {
            field.apply_hit(0, 0, Some(element));
        }
        assert!(!field.has_brick_reached_line(bottom));
        let _ = &mut rng;
    }

    #[test]
    fn test_glow_factor_uses_best_damage() {
        let (field, _) = small_field(1, 1);
        let brick = &field.columns()[0][0];
        let crusher = super::super::elements::ELEMENTS
            .into_iter()
            .find(|e| e.dominates() == brick.element)
            .unwrap();
        // A crushing ball present anywhere maxes the glow
        assert_eq!(field.glow_factor(brick, &[brick.element, crusher]), 2.0);
        // No balls -> neutral glow
        assert_eq!(field.glow_factor(brick, &[]), 1.0);
    }
}
