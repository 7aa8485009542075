// Simulated swerve drive controller
// Inverse kinematics from chassis speeds to four module states, with the
// gyro replaced by integrating the commanded angular velocity.

use tracing::debug;

use super::SwerveDrive;
use super::geometry::{
    ChassisSpeeds, ModuleStates, Rotation2d, SwerveModuleState, Translation2d, wrap_angle,
};
use super::heading::HeadingController;
use crate::config::LOOP_PERIOD_SECS;

/// Wheel speeds below this keep the previous steering angle (m/s)
const STOPPED_SPEED: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct SimSwerveDrive {
    /// Module locations from robot center in meters, FL/FR/BL/BR
    locations: [Translation2d; 4],
    max_speed: f64,
    max_angular_velocity: f64,
    heading: HeadingController,
    states: ModuleStates,
    yaw: f64,
    open_loop: bool,
}

impl SimSwerveDrive {
    pub fn new(
        locations: [Translation2d; 4],
        max_speed: f64,
        max_angular_velocity: f64,
        heading: HeadingController,
    ) -> Self {
        Self {
            locations,
            max_speed,
            max_angular_velocity,
            heading,
            states: ModuleStates::default(),
            yaw: 0.0,
            open_loop: false,
        }
    }

    /// Whether the last drive call asked for open-loop module control
    pub fn open_loop(&self) -> bool {
        self.open_loop
    }

    /// Apply robot-relative chassis speeds for one control period
    fn set_chassis_speeds(&mut self, speeds: ChassisSpeeds) {
        let states = to_module_states(&self.locations, speeds, &self.states, self.max_speed);
        debug!(
            "Module speeds: fl={:.3}, fr={:.3}, bl={:.3}, br={:.3}",
            states[0].speed_meters_per_second,
            states[1].speed_meters_per_second,
            states[2].speed_meters_per_second,
            states[3].speed_meters_per_second
        );
        self.states = states;
        self.yaw = wrap_angle(self.yaw + speeds.omega_radians_per_second * LOOP_PERIOD_SECS);
    }
}

impl SwerveDrive for SimSwerveDrive {
    fn states(&self) -> ModuleStates {
        self.states
    }

    fn yaw(&self) -> Rotation2d {
        Rotation2d::from_radians(self.yaw)
    }

    fn maximum_velocity(&self) -> f64 {
        self.max_speed
    }

    fn maximum_angular_velocity(&self) -> f64 {
        self.max_angular_velocity
    }

    fn drive(
        &mut self,
        translation: Translation2d,
        rotation: f64,
        field_relative: bool,
        open_loop: bool,
    ) {
        self.open_loop = open_loop;
        let speeds = ChassisSpeeds::new(translation.x, translation.y, rotation);
        let speeds = if field_relative {
            ChassisSpeeds::from_field_relative(speeds, self.yaw())
        } else {
            speeds
        };
        self.set_chassis_speeds(speeds);
    }

    fn drive_field_oriented(&mut self, velocity: ChassisSpeeds) {
        self.open_loop = false;
        let speeds = ChassisSpeeds::from_field_relative(velocity, self.yaw());
        self.set_chassis_speeds(speeds);
    }

    fn target_speeds(
        &mut self,
        x_input: f64,
        y_input: f64,
        heading_x: f64,
        heading_y: f64,
        current_heading: f64,
        max_speed: f64,
    ) -> ChassisSpeeds {
        self.heading
            .target_speeds(x_input, y_input, heading_x, heading_y, current_heading, max_speed)
    }
}

/// Convert robot-relative chassis speeds to module states
///
/// Each module's velocity is the chassis translation plus omega x location.
/// If any module exceeds `max_speed`, all are scaled down by the same factor.
/// A stopped module keeps its previous angle instead of snapping to zero.
pub fn to_module_states(
    locations: &[Translation2d; 4],
    speeds: ChassisSpeeds,
    previous: &ModuleStates,
    max_speed: f64,
) -> ModuleStates {
    let omega = speeds.omega_radians_per_second;
    let velocities = locations.map(|loc| {
        Translation2d::new(
            speeds.vx_meters_per_second - omega * loc.y,
            speeds.vy_meters_per_second + omega * loc.x,
        )
    });

    let fastest = velocities.iter().map(Translation2d::norm).fold(0.0f64, f64::max);
    let scale = if fastest > max_speed { max_speed / fastest } else { 1.0 };

    let mut states = ModuleStates::default();
    for (i, v) in velocities.iter().enumerate() {
        let speed = v.norm() * scale;
        let angle = if speed > STOPPED_SPEED {
            Rotation2d::from_radians(v.y.atan2(v.x))
        } else {
            previous[i].angle
        };
        states[i] = SwerveModuleState::new(speed, angle);
    }
    states
}
