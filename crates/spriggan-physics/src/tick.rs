//! The tick integrator.
//!
//! [`plan_step`] is a pure function from one sprite's geometry and motion
//! state to the integer displacement it makes this tick plus its next
//! motion state. Keeping it pure is what lets the engine compute all plans
//! for a tick in parallel from a pre-tick snapshot and then apply them --
//! no plan can observe another sprite's post-tick position, which pins down
//! the "no cross-sprite ordering within a tick" guarantee.
//!
//! Per tick, for each non-static sprite:
//!
//! 1. `dx = vx + ax + fx/m`, `dy = vy + ay + fy/m` -- acceleration is a
//!    constant per-tick increment, not integrated over wall time.
//! 2. `dy` is clamped to the terminal velocity.
//! 3. Both axes are clamped against the canvas edges and the ground row;
//!    each clamp recomputes the delta rather than rejecting the move.
//! 4. The delta splits into an integer part and a fractional remainder; the
//!    remainder feeds the leftover accumulator, and once the accumulator's
//!    magnitude reaches 1.0 the whole units fold back into the integer
//!    displacement.
//! 5. The sprite repositions by `(dx, -dy)` cells -- velocity is
//!    up-positive, rows grow downward.
//! 6. The clamped, un-rounded deltas persist as the next tick's velocity.

use serde::{Deserialize, Serialize};
use spriggan_sprite::sprite::Rect;

use crate::motion::MotionState;

// ---------------------------------------------------------------------------
// TickBounds
// ---------------------------------------------------------------------------

/// Canvas limits the integrator clamps against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickBounds {
    /// Canvas width in columns.
    pub canvas_width: u32,
    /// The ground row. A sprite's top row never exceeds `ground - height`.
    pub ground: u32,
}

// ---------------------------------------------------------------------------
// StepPlan
// ---------------------------------------------------------------------------

/// One sprite's planned movement for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPlan {
    /// Integer horizontal displacement in cells.
    pub dx_cells: i32,
    /// Integer vertical displacement in cells, up-positive. The reposition
    /// applies `(dx_cells, -dy_cells)` to the sprite's row/column.
    pub dy_cells: i32,
    /// The motion state to persist for the next tick.
    pub next: MotionState,
}

impl StepPlan {
    /// Whether this plan moves the sprite at all.
    pub fn is_stationary(&self) -> bool {
        self.dx_cells == 0 && self.dy_cells == 0
    }

    /// The sprite's rectangle after this plan is applied.
    pub fn projected(&self, current: &Rect) -> Rect {
        current.shifted(self.dx_cells, -self.dy_cells)
    }
}

// ---------------------------------------------------------------------------
// plan_step
// ---------------------------------------------------------------------------

/// Plan one tick of motion for a sprite.
///
/// `force_accel` is the acceleration contributed by the sprite's net force
/// (`net_force / mass`), already resolved by the engine.
pub fn plan_step(
    bounds_rect: Rect,
    motion: MotionState,
    force_accel: (f64, f64),
    terminal_velocity: f64,
    bounds: TickBounds,
) -> StepPlan {
    let (x, y) = (bounds_rect.x as f64, bounds_rect.y as f64);
    let width = bounds_rect.width as f64;
    let height = bounds_rect.height as f64;

    // 1. Raw deltas: velocity plus the per-tick acceleration increments.
    let mut dx = motion.vx + motion.ax + force_accel.0;
    let mut dy = motion.vy + motion.ay + force_accel.1;

    // 2. Terminal velocity bounds the vertical axis.
    dy = dy.clamp(-terminal_velocity, terminal_velocity);

    // 3. Canvas clamps, each recomputing the delta. A sprite larger than
    // its axis bound makes the far limit negative; flooring the limit at
    // zero and applying the origin-side clamp last means column 0 / row 0
    // wins the conflict, so an oversized sprite pins at the origin instead
    // of being pushed off the canvas.
    // Right edge: the sprite's right side may not pass the canvas width.
    let right_limit = (bounds.canvas_width as f64 - width).max(0.0);
    if x + dx > right_limit {
        dx = right_limit - x;
    }
    // Left wall: new x may not go below column 0.
    if x + dx < 0.0 {
        dx = -x;
    }
    // Ground: the sprite's bottom may not pass the ground row.
    let ground_limit = (bounds.ground as f64 - height).max(0.0);
    if y - dy > ground_limit {
        dy = y - ground_limit;
    }
    // Ceiling: positive dy moves the top row up (row index down).
    if y - dy < 0.0 {
        dy = y;
    }

    // 4. Integer/fraction split with leftover carry.
    let (dx_cells, leftover_x) = split_with_carry(dx, motion.leftover_x);
    let (dy_cells, leftover_y) = split_with_carry(dy, motion.leftover_y);

    StepPlan {
        dx_cells,
        dy_cells,
        next: MotionState {
            vx: dx,
            vy: dy,
            ax: motion.ax,
            ay: motion.ay,
            leftover_x,
            leftover_y,
        },
    }
}

/// Split `delta` into integer cells and a fractional remainder, folding the
/// remainder through the carried `leftover` accumulator.
fn split_with_carry(delta: f64, leftover: f64) -> (i32, f64) {
    let mut cells = delta.trunc();
    let mut carry = leftover + (delta - cells);
    if carry.abs() >= 1.0 {
        let whole = carry.trunc();
        cells += whole;
        carry -= whole;
    }
    (cells as i32, carry)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: TickBounds = TickBounds {
        canvas_width: 80,
        ground: 24,
    };

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect { x, y, width: w, height: h }
    }

    fn motion(vx: f64, vy: f64, ax: f64, ay: f64) -> MotionState {
        MotionState { vx, vy, ax, ay, ..Default::default() }
    }

    #[test]
    fn gravity_like_acceleration_after_one_tick() {
        let plan = plan_step(rect(10, 5, 2, 2), motion(0.0, 0.0, 0.0, -1.0), (0.0, 0.0), 10.0, BOUNDS);
        assert_eq!(plan.next.vy, -1.0);
        assert_eq!(plan.dy_cells, -1);
        // Reposition applies -dy: the sprite moves one row down.
        assert_eq!(plan.projected(&rect(10, 5, 2, 2)).y, 6);
    }

    #[test]
    fn terminal_velocity_bounds_vertical_speed() {
        let mut m = motion(0.0, 0.0, 0.0, -1.0);
        let r = rect(10, 0, 1, 1);
        for _ in 0..30 {
            let plan = plan_step(r, m, (0.0, 0.0), 10.0, TickBounds { canvas_width: 80, ground: 10_000 });
            m = plan.next;
        }
        assert_eq!(m.vy, -10.0, "velocity must saturate at the terminal value");
    }

    #[test]
    fn leftover_accumulates_into_whole_cells() {
        let mut m = motion(0.3, 0.0, 0.0, 0.0);
        let r = rect(10, 5, 1, 1);
        let mut displacements = Vec::new();
        for _ in 0..4 {
            let plan = plan_step(r, m, (0.0, 0.0), 10.0, BOUNDS);
            displacements.push(plan.dx_cells);
            m = plan.next;
        }
        // 0.3 + 0.3 + 0.3 + 0.3 crosses 1.0 on the fourth tick.
        assert_eq!(displacements, vec![0, 0, 0, 1]);
        assert!((m.leftover_x - 0.2).abs() < 1e-9, "accumulator reduced by the whole unit, got {}", m.leftover_x);
    }

    #[test]
    fn negative_leftover_carries_too() {
        let mut m = motion(-0.5, 0.0, 0.0, 0.0);
        let r = rect(10, 5, 1, 1);
        let plan1 = plan_step(r, m, (0.0, 0.0), 10.0, BOUNDS);
        assert_eq!(plan1.dx_cells, 0);
        m = plan1.next;
        let plan2 = plan_step(r, m, (0.0, 0.0), 10.0, BOUNDS);
        assert_eq!(plan2.dx_cells, -1);
        assert_eq!(plan2.next.leftover_x, 0.0);
    }

    #[test]
    fn left_wall_clamps_and_kills_velocity() {
        let plan = plan_step(rect(0, 5, 2, 2), motion(-3.0, 0.0, 0.0, 0.0), (0.0, 0.0), 10.0, BOUNDS);
        assert_eq!(plan.dx_cells, 0);
        assert_eq!(plan.next.vx, 0.0);
    }

    #[test]
    fn right_edge_clamps_partial_move() {
        // Sprite at x=77, width 2, canvas 80: one cell of room.
        let plan = plan_step(rect(77, 5, 2, 2), motion(5.0, 0.0, 0.0, 0.0), (0.0, 0.0), 10.0, BOUNDS);
        assert_eq!(plan.dx_cells, 1);
        assert_eq!(plan.next.vx, 1.0);
    }

    #[test]
    fn ground_clamps_downward_motion() {
        // Ground at 24, height 2: max top row is 22.
        let plan = plan_step(rect(10, 22, 2, 2), motion(0.0, -5.0, 0.0, 0.0), (0.0, 0.0), 10.0, BOUNDS);
        assert_eq!(plan.dy_cells, 0);
        assert_eq!(plan.next.vy, 0.0);
    }

    #[test]
    fn ground_allows_partial_fall() {
        let plan = plan_step(rect(10, 20, 2, 2), motion(0.0, -5.0, 0.0, 0.0), (0.0, 0.0), 10.0, BOUNDS);
        assert_eq!(plan.dy_cells, -2);
        assert_eq!(plan.projected(&rect(10, 20, 2, 2)).y, 22);
    }

    #[test]
    fn ceiling_clamps_upward_motion() {
        let plan = plan_step(rect(10, 1, 2, 2), motion(0.0, 4.0, 0.0, 0.0), (0.0, 0.0), 10.0, BOUNDS);
        assert_eq!(plan.dy_cells, 1);
        assert_eq!(plan.next.vy, 1.0);
    }

    #[test]
    fn force_acceleration_adds_every_tick() {
        let plan = plan_step(rect(10, 10, 1, 1), motion(1.0, 0.0, 0.0, 0.0), (0.5, 0.0), 10.0, BOUNDS);
        assert_eq!(plan.next.vx, 1.5);
        assert_eq!(plan.dx_cells, 1);
        assert_eq!(plan.next.leftover_x, 0.5);
    }

    #[test]
    fn oversized_sprite_at_rest_stays_put() {
        // Taller than the whole canvas: ground and ceiling clamps conflict.
        let small = TickBounds { canvas_width: 10, ground: 10 };
        let plan = plan_step(rect(0, 0, 1, 12), MotionState::default(), (0.0, 0.0), 10.0, small);
        assert!(plan.is_stationary());
        assert!(plan.next.is_at_rest(), "no velocity may appear: {:?}", plan.next);
    }

    #[test]
    fn oversized_sprite_pins_at_origin() {
        let small = TickBounds { canvas_width: 10, ground: 10 };
        // Starts below the origin; the ground clamp pushes it up, the
        // ceiling clamp caps the push at row 0.
        let mut m = MotionState::default();
        let mut r = rect(0, 3, 1, 12);
        for _ in 0..3 {
            let plan = plan_step(r, m, (0.0, 0.0), 10.0, small);
            r = plan.projected(&r);
            m = plan.next;
            assert!(r.y >= 0, "pushed above the ceiling to y={}", r.y);
        }
        assert_eq!(r.y, 0);
        assert!(m.is_at_rest(), "residual velocity after pinning: {m:?}");
    }

    #[test]
    fn overwide_sprite_at_rest_stays_put() {
        let small = TickBounds { canvas_width: 4, ground: 24 };
        let plan = plan_step(rect(0, 5, 8, 1), MotionState::default(), (0.0, 0.0), 10.0, small);
        assert!(plan.is_stationary());
        assert!(plan.next.is_at_rest());
    }

    #[test]
    fn at_rest_sprite_plans_no_movement() {
        let plan = plan_step(rect(5, 5, 1, 1), MotionState::default(), (0.0, 0.0), 10.0, BOUNDS);
        assert!(plan.is_stationary());
        assert!(plan.next.is_at_rest());
    }
}
