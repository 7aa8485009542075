// Swerve drive controller seam
//
// Provides:
// - Geometry and module/chassis state types
// - Configuration directory parser
// - Heading controller (heading stick -> angular velocity)
// - A minimal simulated drive controller behind the `SwerveDrive` trait

pub mod geometry;
pub mod heading;
pub mod parser;
pub mod sim;

pub use geometry::{ChassisSpeeds, ModuleStates, Rotation2d, SwerveModuleState, Translation2d};
pub use heading::HeadingController;
pub use parser::{ConfigError, SwerveConfig, SwerveParser};
pub use sim::SimSwerveDrive;

/// Everything the subsystem needs from a swerve drive controller
pub trait SwerveDrive {
    /// Current module states, front-left, front-right, back-left, back-right
    fn states(&self) -> ModuleStates;

    /// Robot heading as reported by the gyro
    fn yaw(&self) -> Rotation2d;

    /// Maximum module speed in m/s
    fn maximum_velocity(&self) -> f64;

    /// Maximum chassis angular velocity in rad/s
    fn maximum_angular_velocity(&self) -> f64;

    /// Drive with a translation (m/s) and rotation (rad/s)
    fn drive(
        &mut self,
        translation: Translation2d,
        rotation: f64,
        field_relative: bool,
        open_loop: bool,
    );

    /// Drive with field-relative chassis speeds
    fn drive_field_oriented(&mut self, velocity: ChassisSpeeds);

    /// Field-relative target speeds from translation inputs and a heading stick
    fn target_speeds(
        &mut self,
        x_input: f64,
        y_input: f64,
        heading_x: f64,
        heading_y: f64,
        current_heading: f64,
        max_speed: f64,
    ) -> ChassisSpeeds;
}
