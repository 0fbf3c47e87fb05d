//! # Kinematic Bodies
//!
//! Axis-separated movement shared by every entity that walks the world.
//!
//! Features:
//! - Gravity while airborne, capped at a terminal speed
//! - X then Y resolution against solid blocks
//! - Floor and ceiling snapping through [`CollisionQuery`]
//! - Explicit `Airborne`/`Grounded` state
//!
//! Velocities are pixels per 60 Hz tick; `step` scales them by `dt * 60`
//! so the body moves the same distance at any frame rate.

use crate::config::MotionConfig;
use crate::spatial::{CollisionQuery, Rect};

/// Ticks per second the velocities are expressed in.
pub const TICK_RATE: f32 = 60.0;

/// Walking speeds below this magnitude snap to zero under friction.
pub const FRICTION_DEAD_ZONE: f32 = 0.1;

/// Vertical state of a body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionState {
    /// Gravity accumulates.
    #[default]
    Airborne,
    /// Standing on a solid block; vertical velocity is pinned to zero.
    Grounded,
}

/// Result of a single step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Horizontal movement was blocked.
    pub hit_wall: bool,
    /// Vertical movement was blocked by a floor.
    pub landed: bool,
    /// Vertical movement was blocked by a ceiling.
    pub bumped_head: bool,
}

// ============================================================================
// KINEMATIC BODY
// ============================================================================

/// Axis-aligned moving entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicBody {
    /// Left edge, in pixels.
    pub x: f32,
    /// Top edge, in pixels.
    pub y: f32,
    /// Hitbox width.
    pub width: f32,
    /// Hitbox height.
    pub height: f32,
    /// Horizontal velocity, pixels per tick.
    pub vel_x: f32,
    /// Vertical velocity, pixels per tick (positive is down).
    pub vel_y: f32,
    /// Vertical state.
    pub state: MotionState,
    /// Movement tunables.
    pub motion: MotionConfig,
}

impl KinematicBody {
    /// Creates a resting, airborne body.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32, motion: MotionConfig) -> Self {
        Self {
            x,
            y,
            width,
            height,
            vel_x: 0.0,
            vel_y: 0.0,
            state: MotionState::Airborne,
            motion,
        }
    }

    /// Current hitbox.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns true when standing on a block.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.state == MotionState::Grounded
    }

    /// Teleports the body and clears its velocity.
    pub fn place_at(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vel_x = 0.0;
        self.vel_y = 0.0;
        self.state = MotionState::Airborne;
    }

    /// Starts a jump. Only possible from the ground.
    pub fn jump(&mut self) -> bool {
        if self.state != MotionState::Grounded {
            return false;
        }
        self.vel_y = -self.motion.jump_velocity;
        self.state = MotionState::Airborne;
        true
    }

    /// Applies walking input: `direction` below zero walks left, above zero
    /// walks right, zero applies friction.
    pub fn walk(&mut self, direction: f32, dt: f32) {
        let ticks = dt * TICK_RATE;
        let motion = self.motion;
        if direction < 0.0 {
            self.vel_x = (self.vel_x - motion.acceleration * ticks).max(-motion.walk_speed);
        } else if direction > 0.0 {
            self.vel_x = (self.vel_x + motion.acceleration * ticks).min(motion.walk_speed);
        } else {
            self.vel_x *= motion.friction.powf(ticks);
            if self.vel_x.abs() < FRICTION_DEAD_ZONE {
                self.vel_x = 0.0;
            }
        }
    }

    /// Advances the body by `dt` seconds.
    pub fn step<W: CollisionQuery + ?Sized>(&mut self, world: &W, dt: f32) -> StepOutcome {
        let ticks = dt * TICK_RATE;
        let mut outcome = StepOutcome::default();

        if self.state == MotionState::Airborne {
            self.vel_y = (self.vel_y + self.motion.gravity * ticks).min(self.motion.max_fall_speed);
        }

        // X axis
        if self.vel_x != 0.0 {
            let new_x = self.x + self.vel_x * ticks;
            if world.check_block_collision(new_x, self.y, self.width, self.height) {
                self.vel_x = 0.0;
                outcome.hit_wall = true;
            } else {
                self.x = new_x;
            }
        }

        // Y axis
        if self.vel_y != 0.0 {
            let new_y = self.y + self.vel_y * ticks;
            if world.check_block_collision(self.x, new_y, self.width, self.height) {
                if self.vel_y > 0.0 {
                    self.y = world.find_ground_y(self.x, new_y + self.height, self.height);
                    outcome.landed = true;
                } else {
                    self.y = world.find_ceiling_y(self.x, new_y, self.height);
                    outcome.bumped_head = true;
                }
                self.vel_y = 0.0;
            } else {
                self.y = new_y;
            }
        }

        if self.vel_y >= 0.0 {
            if world.check_on_ground(self.x, self.y, self.width, self.height) {
                if self.state == MotionState::Airborne {
                    self.y = world.find_ground_y(self.x, self.bottom(), self.height);
                }
                self.state = MotionState::Grounded;
                self.vel_y = 0.0;
            } else {
                self.state = MotionState::Airborne;
            }
        }

        outcome
    }
}
