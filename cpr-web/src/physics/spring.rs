//! Chest spring - 1-DOF damped spring for the sinking/rebounding chest
//!
//! Two inputs drive it:
//! - `inject_force()` on the detection tick, pulling the chest towards the
//!   hands. It only nudges velocity, so the chest lags the hands ("give").
//! - `advance()` on the fixed physics tick, integrating with semi-implicit
//!   Euler and exponential damping.
//!
//! Displacement is always clamped to [0, max_compression]: the chest can be
//! pushed in but never pulled out past rest.

use nalgebra::{Point3, Unit, Vector3};

use crate::config::SpringConfig;

/// Chest spring-damper state
pub struct ChestSpring {
    stiffness: f32,
    damping: f32,
    max_compression: f32,
    up: Unit<Vector3<f32>>,

    /// Current push-in depth (meters, >= 0)
    displacement: f32,
    /// Rate of change of displacement (m/s)
    velocity: f32,

    /// Chest plate position at rest (world)
    rest_position: Point3<f32>,
    /// Rendered chest plate position after the last fixed tick
    current_position: Point3<f32>,
    /// `current_position - rest_position`, for followers riding the chest
    world_offset: Vector3<f32>,
}

impl ChestSpring {
    pub fn new(rest_position: Point3<f32>, config: &SpringConfig) -> Self {
        let up = Unit::try_new(Vector3::from(config.up_axis), 1e-6)
            .unwrap_or_else(Vector3::y_axis);
        Self {
            stiffness: config.stiffness,
            damping: config.damping,
            max_compression: config.max_compression,
            up,
            displacement: 0.0,
            velocity: 0.0,
            rest_position,
            current_position: rest_position,
            world_offset: Vector3::zeros(),
        }
    }

    /// Pull the chest towards `target_compression` (meters of push-in).
    ///
    /// Called while the hands are pressing. No-op for dt <= 0 or
    /// non-finite input.
    pub fn inject_force(&mut self, target_compression: f32, dt: f32) {
        if !(dt > 0.0) || !dt.is_finite() || !target_compression.is_finite() {
            return;
        }
        let target = target_compression.clamp(0.0, self.max_compression);
        let diff = target - self.displacement;
        self.set_velocity(self.velocity + diff * self.stiffness * dt);
    }

    /// Integrate one fixed physics step
    pub fn advance(&mut self, dt: f32) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }

        // Semi-implicit Euler: velocity first, then position from new velocity
        let spring_force = -self.displacement * self.stiffness;
        let mut velocity = self.velocity + spring_force * dt;

        // exp() decay stays stable at any step size; (1 - c*dt) goes negative
        // once dt > 1/c and makes the chest oscillate out of control
        velocity *= (-self.damping * dt).exp();
        self.set_velocity(velocity);

        self.displacement = (self.displacement + self.velocity * dt).clamp(0.0, self.max_compression);

        self.current_position = self.rest_position - self.up.into_inner() * self.displacement;
        self.world_offset = self.current_position - self.rest_position;
    }

    fn set_velocity(&mut self, velocity: f32) {
        // Guard against overflow after absurd inputs: a dead spring beats NaN
        self.velocity = if velocity.is_finite() { velocity } else { 0.0 };
    }

    /// Current push-in depth in meters
    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn max_compression(&self) -> f32 {
        self.max_compression
    }

    /// Normalized push axis (chest sinks against it)
    pub fn up_axis(&self) -> Unit<Vector3<f32>> {
        self.up
    }

    /// Rendered chest plate position (world)
    pub fn position(&self) -> Point3<f32> {
        self.current_position
    }

    pub fn rest_position(&self) -> Point3<f32> {
        self.rest_position
    }

    /// Offset for objects that must sink with the chest without being it.
    ///
    /// Computed from world positions against the cached rest position, which
    /// assumes the chest's parent does not move during a session.
    pub fn world_offset(&self) -> Vector3<f32> {
        self.world_offset
    }

    /// Back to rest, keeping configuration and rest position
    pub fn reset(&mut self) {
        self.displacement = 0.0;
        self.velocity = 0.0;
        self.current_position = self.rest_position;
        self.world_offset = Vector3::zeros();
    }
}
