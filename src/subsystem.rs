// Swerve subsystem: builds the drive controller from the deploy directory,
// republishes module states each tick and turns axis inputs into drive commands.

use std::path::Path;
use tracing::info;

use crate::command::RunCommand;
use crate::config::{HEADING_TRANSLATION_SCALE, SWERVE_CONFIG_SUBDIR, SWERVE_STATES_LABEL};
use crate::messages::{DashboardMessage, ModuleStatesMessage};
use crate::swerve::{
    ChassisSpeeds, ConfigError, SimSwerveDrive, SwerveDrive, SwerveModuleState, SwerveParser,
    Translation2d,
};

/// Dashboard labels, indexed front-left, front-right, back-left, back-right
pub const ANGLE_KEYS: [&str; 4] = [
    "FL Angle (deg)",
    "FR Angle (deg)",
    "BL Angle (deg)",
    "BR Angle (deg)",
];
pub const SPEED_KEYS: [&str; 4] = [
    "FL Speed (m/s)",
    "FR Speed (m/s)",
    "BL Speed (m/s)",
    "BR Speed (m/s)",
];

/// Sink for per-tick telemetry
pub trait Dashboard {
    fn put_number(&mut self, key: &str, value: f64);
    fn put_module_states(&mut self, name: &str, states: &[SwerveModuleState]);
}

/// One tick's worth of telemetry, flushed to the network by the runtime
#[derive(Debug, Clone, Default)]
pub struct DashboardFrame {
    pub numbers: DashboardMessage,
    pub module_states: Option<ModuleStatesMessage>,
}

impl DashboardFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.numbers.get(key).copied()
    }
}

impl Dashboard for DashboardFrame {
    fn put_number(&mut self, key: &str, value: f64) {
        self.numbers.insert(key.to_string(), value);
    }

    fn put_module_states(&mut self, name: &str, states: &[SwerveModuleState]) {
        self.module_states = Some(ModuleStatesMessage {
            name: name.to_string(),
            states: states.to_vec(),
        });
    }
}

/// Fine control near zero, full response at the extremes
pub fn smooth_translation(input: f64, scale: f64) -> f64 {
    input.powi(3) * scale
}

pub struct SwerveSubsystem<D> {
    drive: D,
    heading_translation_scale: f64,
}

impl SwerveSubsystem<SimSwerveDrive> {
    /// Build from `<deploy_dir>/swerve`.
    ///
    /// Either the whole configuration loads or no subsystem exists.
    pub fn from_deploy_dir(deploy_dir: &Path, max_speed: f64) -> Result<Self, ConfigError> {
        let directory = deploy_dir.join(SWERVE_CONFIG_SUBDIR);
        let drive = SwerveParser::new(directory)?.create_swerve_drive(max_speed)?;
        Ok(Self::new(drive))
    }
}

impl<D: SwerveDrive> SwerveSubsystem<D> {
    pub fn new(drive: D) -> Self {
        Self {
            drive,
            heading_translation_scale: HEADING_TRANSLATION_SCALE,
        }
    }

    pub fn with_heading_translation_scale(mut self, scale: f64) -> Self {
        info!("Heading drive translation scale: {}", scale);
        self.heading_translation_scale = scale;
        self
    }

    pub fn heading_translation_scale(&self) -> f64 {
        self.heading_translation_scale
    }

    pub fn drive(&self) -> &D {
        &self.drive
    }

    /// Called once per scheduler run
    pub fn periodic(&self, dashboard: &mut impl Dashboard) {
        let states = self.drive.states();
        for (key, state) in ANGLE_KEYS.iter().zip(&states) {
            dashboard.put_number(key, state.angle.degrees());
        }
        for (key, state) in SPEED_KEYS.iter().zip(&states) {
            dashboard.put_number(key, state.speed_meters_per_second);
        }
        dashboard.put_module_states(SWERVE_STATES_LABEL, &states);
    }

    /// Drive the robot given a chassis field oriented velocity
    pub fn drive_field_oriented(&mut self, velocity: ChassisSpeeds) {
        self.drive.drive_field_oriented(velocity);
    }

    /// One tick of heading drive: cubed translation, heading stick as setpoint
    fn drive_heading(
        &mut self,
        translation_x: f64,
        translation_y: f64,
        heading_x: f64,
        heading_y: f64,
    ) {
        let x_input = smooth_translation(translation_x, self.heading_translation_scale);
        let y_input = smooth_translation(translation_y, self.heading_translation_scale);
        let yaw = self.drive.yaw().radians();
        let max_speed = self.drive.maximum_velocity();
        let target = self
            .drive
            .target_speeds(x_input, y_input, heading_x, heading_y, yaw, max_speed);
        self.drive_field_oriented(target);
    }

    /// One tick of angular drive: inputs scaled straight to max velocities
    fn drive_angular(&mut self, translation_x: f64, translation_y: f64, rotation: f64) {
        let max_speed = self.drive.maximum_velocity();
        let translation = Translation2d::new(translation_x * max_speed, translation_y * max_speed);
        let rotation = rotation * self.drive.maximum_angular_velocity();
        self.drive.drive(translation, rotation, true, false);
    }
}

impl<D: SwerveDrive + 'static> SwerveSubsystem<D> {
    /// Command to drive using translation inputs and a heading stick as the setpoint
    pub fn drive_heading_command(
        &self,
        translation_x: impl Fn() -> f64 + 'static,
        translation_y: impl Fn() -> f64 + 'static,
        heading_x: impl Fn() -> f64 + 'static,
        heading_y: impl Fn() -> f64 + 'static,
    ) -> RunCommand<D> {
        RunCommand::new("drive_heading", move |subsystem: &mut Self| {
            subsystem.drive_heading(translation_x(), translation_y(), heading_x(), heading_y());
        })
    }

    /// Command to drive using translation inputs and a rotation input as angular velocity
    pub fn drive_angular_command(
        &self,
        translation_x: impl Fn() -> f64 + 'static,
        translation_y: impl Fn() -> f64 + 'static,
        angular_rotation: impl Fn() -> f64 + 'static,
    ) -> RunCommand<D> {
        RunCommand::new("drive_angular", move |subsystem: &mut Self| {
            subsystem.drive_angular(translation_x(), translation_y(), angular_rotation());
        })
    }

    /// Command forwarding an externally computed field-relative velocity
    pub fn drive_velocity_command(
        &self,
        velocity: impl Fn() -> ChassisSpeeds + 'static,
    ) -> RunCommand<D> {
        RunCommand::new("drive_velocity", move |subsystem: &mut Self| {
            subsystem.drive_field_oriented(velocity());
        })
    }
}
