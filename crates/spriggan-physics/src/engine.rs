//! The [`PhysicsEngine`] facade.
//!
//! Owns the stage and every ledger, and is the only place that mutates them
//! together -- display and undisplay keep the slot-keyed motion ledger
//! compacted in the same pass as the stage, so the two can never desync.
//!
//! Each tick runs in two phases:
//!
//! 1. **Plan** (parallel): every non-static sprite's [`StepPlan`] is
//!    computed with rayon from a snapshot of pre-tick state. Plans cannot
//!    observe each other, so there is no ordering between sprites within a
//!    tick -- that is a guarantee, not an accident of scheduling.
//! 2. **Apply** (sequential): motion rows are updated and moved sprites are
//!    erased/redrawn against the display in slot order.

use rayon::prelude::*;
use spriggan_sprite::display::Display;
use spriggan_sprite::render;
use spriggan_sprite::sprite::{Rect, Sprite, SpriteId};
use spriggan_sprite::stage::{Slot, Stage};
use tracing::{debug, trace};

use crate::config::PhysicsConfig;
use crate::force::{ForceHandle, ForceLedger, Vec2};
use crate::mass::{default_mass, FrictionLedger, MassLedger};
use crate::motion::{MotionLedger, MotionState};
use crate::tick::{plan_step, StepPlan, TickBounds};
use crate::PhysicsError;

// ---------------------------------------------------------------------------
// PhysicsEngine
// ---------------------------------------------------------------------------

/// Sprite registry plus physics state, advanced one tick at a time.
pub struct PhysicsEngine {
    stage: Stage,
    forces: ForceLedger,
    masses: MassLedger,
    frictions: FrictionLedger,
    motions: MotionLedger,
    config: PhysicsConfig,
    tick_count: u64,
}

impl PhysicsEngine {
    /// Create an engine with the given configuration and an empty stage.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            stage: Stage::new(),
            forces: ForceLedger::new(),
            masses: MassLedger::new(),
            frictions: FrictionLedger::new(),
            motions: MotionLedger::new(),
            config,
            tick_count: 0,
        }
    }

    // -- stage wrappers ------------------------------------------------------

    /// Register and draw a sprite. Assigns identity on first display and
    /// creates the sprite's at-rest motion row in the same pass.
    pub fn display_sprite(
        &mut self,
        sprite: Sprite,
        display: &mut dyn Display,
    ) -> Result<SpriteId, PhysicsError> {
        let slot = self.stage.register(sprite)?;
        self.motions.push_row();
        let id = self
            .stage
            .get_by_slot(slot)
            .and_then(Sprite::stable_id)
            .ok_or(PhysicsError::NotRegistered)?;
        render::draw_sprite(&self.stage, display, id)?;
        debug!(sprite = %id, slot = slot.get(), "displayed sprite");
        Ok(id)
    }

    /// Erase and unregister a sprite. The motion row is removed with the
    /// same vacated index the stage reports, keeping both tables compacted
    /// in one pass. Stable-id ledgers (forces, mass, friction) are sticky
    /// and survive; reset them explicitly if the identity is retiring.
    pub fn undisplay_sprite(
        &mut self,
        id: SpriteId,
        display: &mut dyn Display,
    ) -> Result<Sprite, PhysicsError> {
        render::erase_sprite(&self.stage, display, id)?;
        let (sprite, vacated) = self.stage.unregister(id)?;
        self.motions.remove_slot(vacated);
        debug!(sprite = %id, vacated, "undisplayed sprite");
        Ok(sprite)
    }

    /// Move a displayed sprite by whole cells, erasing and redrawing.
    pub fn move_sprite_by(
        &mut self,
        id: SpriteId,
        dx: i32,
        dy: i32,
        display: &mut dyn Display,
    ) -> Result<(), PhysicsError> {
        render::move_sprite(&mut self.stage, display, id, dx, dy)?;
        Ok(())
    }

    /// The stage, for read-only queries (collision, z-order, lookup).
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Mutable access to a displayed sprite (grid edits, z changes).
    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.stage.get_mut(id)
    }

    /// Flag or unflag a sprite as static (excluded from the tick).
    pub fn set_static(&mut self, id: SpriteId, is_static: bool) -> Result<(), PhysicsError> {
        let sprite = self.stage.get_mut(id).ok_or(PhysicsError::NotRegistered)?;
        sprite.set_static(is_static);
        Ok(())
    }

    /// The engine configuration.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Mutable access to the engine configuration.
    pub fn config_mut(&mut self) -> &mut PhysicsConfig {
        &mut self.config
    }

    /// Ticks executed so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn known(&self, id: SpriteId) -> Result<(), PhysicsError> {
        if self.stage.id_known(id) {
            Ok(())
        } else {
            Err(PhysicsError::NotRegistered)
        }
    }

    // -- forces --------------------------------------------------------------

    /// Apply a force to a sprite. The sprite must have been displayed at
    /// least once (stable-id ledgers outlive undisplay).
    pub fn add_force(&mut self, id: SpriteId, force: Vec2) -> Result<ForceHandle, PhysicsError> {
        self.known(id)?;
        Ok(self.forces.add(id, force))
    }

    /// Remove a previously added force. `Ok(false)` if it was already gone.
    pub fn remove_force(&mut self, id: SpriteId, handle: ForceHandle) -> Result<bool, PhysicsError> {
        self.known(id)?;
        Ok(self.forces.remove(id, handle))
    }

    /// Remove every force applied to the sprite.
    pub fn remove_all_forces(&mut self, id: SpriteId) -> Result<(), PhysicsError> {
        self.known(id)?;
        self.forces.remove_all(id);
        Ok(())
    }

    /// The sprite's net force: a fresh sum, zero if none.
    pub fn net_force(&self, id: SpriteId) -> Result<Vec2, PhysicsError> {
        self.known(id)?;
        Ok(self.forces.net(id))
    }

    /// All forces applied to the sprite, in application order.
    pub fn get_all_forces(&self, id: SpriteId) -> Result<Vec<Vec2>, PhysicsError> {
        self.known(id)?;
        Ok(self.forces.all(id))
    }

    /// Drop every force for every sprite.
    pub fn clear_all_forces(&mut self) {
        self.forces.clear_all();
    }

    // -- mass ----------------------------------------------------------------

    /// The sprite's default mass: weighted non-blank cell count. Requires
    /// the sprite to be displayed, since the grid lives on the sprite.
    pub fn default_mass(&self, id: SpriteId) -> Result<f64, PhysicsError> {
        let sprite = self.stage.get(id).ok_or(PhysicsError::NotRegistered)?;
        Ok(default_mass(sprite, &self.config.char_weights))
    }

    /// The sprite's effective mass: override if set, else the default.
    /// An undisplayed sprite resolves only through its override.
    pub fn mass(&self, id: SpriteId) -> Result<f64, PhysicsError> {
        self.known(id)?;
        if let Some(m) = self.masses.get_override(id) {
            return Ok(m);
        }
        self.default_mass(id)
    }

    /// Override the sprite's mass. Must be positive and finite.
    pub fn set_mass(&mut self, id: SpriteId, mass: f64) -> Result<(), PhysicsError> {
        self.known(id)?;
        self.masses.set(id, mass)
    }

    /// Drop the mass override, reverting to the computed default.
    pub fn reset_mass(&mut self, id: SpriteId) -> Result<(), PhysicsError> {
        self.known(id)?;
        self.masses.reset(id);
        Ok(())
    }

    // -- friction ------------------------------------------------------------

    /// The sprite's friction coefficient: override or the configured
    /// default. Tracked but not consumed by the integrator.
    pub fn friction(&self, id: SpriteId) -> Result<f64, PhysicsError> {
        self.known(id)?;
        Ok(self.frictions.resolve(id, self.config.default_friction))
    }

    /// Override the sprite's friction coefficient, in `[0, 1]`.
    pub fn set_friction(&mut self, id: SpriteId, friction: f64) -> Result<(), PhysicsError> {
        self.known(id)?;
        self.frictions.set(id, friction)
    }

    /// Drop the friction override.
    pub fn reset_friction(&mut self, id: SpriteId) -> Result<(), PhysicsError> {
        self.known(id)?;
        self.frictions.reset(id);
        Ok(())
    }

    // -- motion --------------------------------------------------------------

    fn motion_index(&self, id: SpriteId) -> Result<usize, PhysicsError> {
        self.stage
            .slot_of(id)
            .map(Slot::index)
            .ok_or(PhysicsError::NotRegistered)
    }

    /// The sprite's motion state. Requires the sprite to be displayed.
    pub fn motion(&self, id: SpriteId) -> Result<MotionState, PhysicsError> {
        let idx = self.motion_index(id)?;
        self.motions
            .get(idx)
            .copied()
            .ok_or(PhysicsError::NotRegistered)
    }

    /// The sprite's velocity `(vx, vy)`, up-positive vertical.
    pub fn velocity(&self, id: SpriteId) -> Result<(f64, f64), PhysicsError> {
        self.motion(id).map(|m| (m.vx, m.vy))
    }

    /// Set the sprite's velocity.
    pub fn set_velocity(&mut self, id: SpriteId, vx: f64, vy: f64) -> Result<(), PhysicsError> {
        if !vx.is_finite() || !vy.is_finite() {
            return Err(PhysicsError::InvalidArgument {
                reason: format!("velocity must be finite, got ({vx}, {vy})"),
            });
        }
        let idx = self.motion_index(id)?;
        let row = self.motions.get_mut(idx).ok_or(PhysicsError::NotRegistered)?;
        row.vx = vx;
        row.vy = vy;
        Ok(())
    }

    /// The sprite's acceleration `(ax, ay)`.
    pub fn acceleration(&self, id: SpriteId) -> Result<(f64, f64), PhysicsError> {
        self.motion(id).map(|m| (m.ax, m.ay))
    }

    /// Set the sprite's acceleration. Added to velocity every tick.
    pub fn set_acceleration(&mut self, id: SpriteId, ax: f64, ay: f64) -> Result<(), PhysicsError> {
        if !ax.is_finite() || !ay.is_finite() {
            return Err(PhysicsError::InvalidArgument {
                reason: format!("acceleration must be finite, got ({ax}, {ay})"),
            });
        }
        let idx = self.motion_index(id)?;
        let row = self.motions.get_mut(idx).ok_or(PhysicsError::NotRegistered)?;
        row.ax = ax;
        row.ay = ay;
        Ok(())
    }

    /// Zero the sprite's motion row, including leftover carry.
    pub fn reset_motion(&mut self, id: SpriteId) -> Result<(), PhysicsError> {
        let idx = self.motion_index(id)?;
        if let Some(row) = self.motions.get_mut(idx) {
            *row = MotionState::default();
        }
        Ok(())
    }

    // -- tick ----------------------------------------------------------------

    /// The clamping bounds for a canvas.
    pub fn tick_bounds(&self, display: &dyn Display) -> TickBounds {
        TickBounds {
            canvas_width: display.width(),
            ground: self.config.ground.unwrap_or_else(|| display.height()),
        }
    }

    /// The acceleration the sprite's net force contributes this tick
    /// (`net_force / mass`). The single source for both the tick's plan
    /// phase and the collision lookahead.
    fn force_accel(&self, id: SpriteId, sprite: &Sprite) -> (f64, f64) {
        let mass = self
            .masses
            .resolve(id, sprite, &self.config.char_weights)
            .max(f64::MIN_POSITIVE);
        let net = self.forces.net(id);
        (net.x as f64 / mass, net.y as f64 / mass)
    }

    /// Plan the next tick's movement for one sprite without applying it.
    fn plan_for(&self, id: SpriteId, bounds: TickBounds) -> Option<StepPlan> {
        let sprite = self.stage.get(id)?;
        if sprite.is_static() {
            return None;
        }
        let idx = self.stage.slot_of(id).map(Slot::index)?;
        let motion = *self.motions.get(idx)?;
        let force_accel = self.force_accel(id, sprite);
        Some(plan_step(
            sprite.bounds(),
            motion,
            force_accel,
            self.config.terminal_velocity,
            bounds,
        ))
    }

    /// One-tick-lookahead broad-phase check: true if the sprites already
    /// overlap, or if either sprite's rectangle projected by its own
    /// next-tick displacement overlaps the other's current rectangle.
    pub fn is_about_to_collide(&self, a: SpriteId, b: SpriteId, bounds: TickBounds) -> bool {
        if a == b {
            return false;
        }
        if self.stage.is_colliding(a, b) {
            return true;
        }
        let (Some(sa), Some(sb)) = (self.stage.get(a), self.stage.get(b)) else {
            return false;
        };
        let (ra, rb) = (sa.bounds(), sb.bounds());
        if let Some(plan) = self.plan_for(a, bounds) {
            if plan.projected(&ra).overlaps(&rb) {
                return true;
            }
        }
        if let Some(plan) = self.plan_for(b, bounds) {
            if plan.projected(&rb).overlaps(&ra) {
                return true;
            }
        }
        false
    }

    /// Advance one tick: plan in parallel from pre-tick state, then apply
    /// motion rows and repositions in slot order. Returns the sprites whose
    /// position or motion state changed this tick.
    ///
    /// Static sprites and at-rest rows are skipped silently.
    pub fn tick(&mut self, display: &mut dyn Display) -> Vec<SpriteId> {
        let bounds = self.tick_bounds(display);

        // Plan phase: snapshot, then pure parallel computation.
        let snapshot: Vec<(SpriteId, usize, Rect, MotionState, (f64, f64))> = self
            .stage
            .all_displayed()
            .filter(|(_, s)| !s.is_static())
            .filter_map(|(slot, s)| {
                let id = s.stable_id()?;
                let idx = slot.index();
                let motion = *self.motions.get(idx)?;
                Some((id, idx, s.bounds(), motion, self.force_accel(id, s)))
            })
            .collect();

        let plans: Vec<(SpriteId, usize, MotionState, StepPlan)> = snapshot
            .par_iter()
            .map(|&(id, idx, rect, motion, accel)| {
                let plan = plan_step(rect, motion, accel, self.config.terminal_velocity, bounds);
                (id, idx, motion, plan)
            })
            .collect();

        // Apply phase: sequential, slot order.
        let mut modified = Vec::new();
        for (id, idx, old_motion, plan) in plans {
            if let Some(row) = self.motions.get_mut(idx) {
                *row = plan.next;
            }
            if !plan.is_stationary() {
                // Vertical displacement inverts: up-positive velocity,
                // downward-growing rows.
                if render::move_sprite(&mut self.stage, display, id, plan.dx_cells, -plan.dy_cells)
                    .is_err()
                {
                    trace!(sprite = %id, "sprite vanished mid-tick, skipping reposition");
                    continue;
                }
            }
            if !plan.is_stationary() || plan.next != old_motion {
                modified.push(id);
            }
        }

        self.tick_count += 1;
        if self.config.debug_overlay {
            self.render_debug_overlay(display);
        }
        trace!(tick = self.tick_count, modified = modified.len(), "tick complete");
        modified
    }

    /// Print per-sprite physics state to the top-left corner, one line per
    /// slot. Diagnostic side effect only; not part of the physics contract.
    fn render_debug_overlay(&self, display: &mut dyn Display) {
        let rows: Vec<(u32, String)> = self
            .stage
            .all_displayed()
            .filter_map(|(slot, s)| {
                let id = s.stable_id()?;
                let idx = slot.index();
                let m = self.motions.get(idx)?;
                let mass = self.masses.resolve(id, s, &self.config.char_weights);
                Some((
                    slot.get() - 1,
                    format!(
                        "{id} m={mass:.1} v=({:.2},{:.2}) a=({:.2},{:.2})",
                        m.vx, m.vy, m.ax, m.ay
                    ),
                ))
            })
            .collect();
        for (row, text) in rows {
            display.set_cursor(0, row);
            for c in text.chars() {
                display.put_char(c);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
