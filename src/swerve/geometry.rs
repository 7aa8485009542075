// Planar geometry and chassis/module state types shared by the drive seam,
// the subsystem and the wire messages.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// An angle in the plane, stored in radians
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation2d {
    pub radians: f64,
}

impl Rotation2d {
    pub fn from_radians(radians: f64) -> Self {
        Self { radians }
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::from_radians(degrees.to_radians())
    }

    pub fn radians(&self) -> f64 {
        self.radians
    }

    pub fn degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    pub fn cos(&self) -> f64 {
        self.radians.cos()
    }

    pub fn sin(&self) -> f64 {
        self.radians.sin()
    }
}

/// Wrap an angle into (-PI, PI]
pub fn wrap_angle(radians: f64) -> f64 {
    let mut wrapped = radians % (2.0 * PI);
    if wrapped > PI {
        wrapped -= 2.0 * PI;
    } else if wrapped <= -PI {
        wrapped += 2.0 * PI;
    }
    wrapped
}

/// A 2D vector in meters (or m/s when used as a translational velocity)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation2d {
    pub x: f64,
    pub y: f64,
}

impl Translation2d {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Rotate counter-clockwise by `rotation`
    pub fn rotate_by(&self, rotation: Rotation2d) -> Self {
        let (sin, cos) = (rotation.sin(), rotation.cos());
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

/// Chassis velocity: x forward, y left, omega counter-clockwise
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChassisSpeeds {
    pub vx_meters_per_second: f64,
    pub vy_meters_per_second: f64,
    pub omega_radians_per_second: f64,
}

impl ChassisSpeeds {
    pub fn new(vx: f64, vy: f64, omega: f64) -> Self {
        Self {
            vx_meters_per_second: vx,
            vy_meters_per_second: vy,
            omega_radians_per_second: omega,
        }
    }

    /// Convert field-relative speeds into the robot frame given the robot's yaw
    pub fn from_field_relative(field: ChassisSpeeds, yaw: Rotation2d) -> Self {
        let robot = Translation2d::new(field.vx_meters_per_second, field.vy_meters_per_second)
            .rotate_by(Rotation2d::from_radians(-yaw.radians()));
        Self::new(robot.x, robot.y, field.omega_radians_per_second)
    }
}

/// A single swerve module's wheel speed and steering angle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SwerveModuleState {
    pub speed_meters_per_second: f64,
    pub angle: Rotation2d,
}

impl SwerveModuleState {
    pub fn new(speed_meters_per_second: f64, angle: Rotation2d) -> Self {
        Self {
            speed_meters_per_second,
            angle,
        }
    }
}

/// Module states in front-left, front-right, back-left, back-right order
pub type ModuleStates = [SwerveModuleState; 4];

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_degrees_round_trip_through_radians() {
        let r = Rotation2d::from_degrees(90.0);
        assert!((r.radians() - PI / 2.0).abs() < EPS);
        assert!((r.degrees() - 90.0).abs() < EPS);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(2.5 * PI) - PI / 2.0).abs() < EPS);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < EPS);
        assert!(wrap_angle(0.0).abs() < EPS);
    }

    #[test]
    fn test_field_relative_forward_when_facing_left() {
        // Robot yawed +90deg: field +x is the robot's -y
        let field = ChassisSpeeds::new(1.0, 0.0, 0.5);
        let robot = ChassisSpeeds::from_field_relative(field, Rotation2d::from_degrees(90.0));
        assert!(robot.vx_meters_per_second.abs() < EPS);
        assert!((robot.vy_meters_per_second + 1.0).abs() < EPS);
        assert_eq!(robot.omega_radians_per_second, 0.5);
    }
}
