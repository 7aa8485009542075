// Heading controller: turns a heading joystick into a chassis angular velocity
//
// The heading stick's direction is the target robot heading. A PID on the
// wrapped heading error produces a normalized output in [-1, 1], scaled by
// the drive's maximum angular velocity.

use super::geometry::{ChassisSpeeds, wrap_angle};
use crate::config::LOOP_PERIOD_SECS;

/// Anti-windup limit on the accumulated integral term
const INTEGRAL_LIMIT: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct HeadingController {
    kp: f64,
    ki: f64,
    kd: f64,
    integral: f64,
    last_error: Option<f64>,
    /// Heading stick magnitude below which the last target angle is held
    deadband: f64,
    max_angular_velocity: f64,
    last_angle: f64,
}

impl HeadingController {
    pub fn new(kp: f64, ki: f64, kd: f64, deadband: f64, max_angular_velocity: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            integral: 0.0,
            last_error: None,
            deadband,
            max_angular_velocity,
            last_angle: 0.0,
        }
    }

    /// Target heading (radians) the controller is currently holding
    pub fn last_angle(&self) -> f64 {
        self.last_angle
    }

    pub fn reset(&mut self, heading: f64) {
        self.integral = 0.0;
        self.last_error = None;
        self.last_angle = heading;
    }

    /// Angular velocity (rad/s) steering `current` towards `target`
    pub fn heading_calculate(&mut self, current: f64, target: f64) -> f64 {
        let error = wrap_angle(target - current);
        self.integral =
            (self.integral + error * LOOP_PERIOD_SECS).clamp(-INTEGRAL_LIMIT, INTEGRAL_LIMIT);
        let derivative = self
            .last_error
            .map_or(0.0, |last| (error - last) / LOOP_PERIOD_SECS);
        self.last_error = Some(error);

        let output = self.kp * error + self.ki * self.integral + self.kd * derivative;
        output.clamp(-1.0, 1.0) * self.max_angular_velocity
    }

    /// Field-relative target speeds from translation inputs and a heading stick
    ///
    /// # Arguments
    /// * `x_input`, `y_input` - translation in [-1, 1], scaled by `max_speed`
    /// * `heading_x`, `heading_y` - heading stick; `atan2(heading_x, heading_y)` is the target
    /// * `current_heading` - robot yaw in radians
    /// * `max_speed` - maximum linear speed in m/s
    pub fn target_speeds(
        &mut self,
        x_input: f64,
        y_input: f64,
        heading_x: f64,
        heading_y: f64,
        current_heading: f64,
        max_speed: f64,
    ) -> ChassisSpeeds {
        if heading_x.hypot(heading_y) > self.deadband {
            self.last_angle = heading_x.atan2(heading_y);
        }
        let omega = self.heading_calculate(current_heading, self.last_angle);
        ChassisSpeeds::new(x_input * max_speed, y_input * max_speed, omega)
    }
}
