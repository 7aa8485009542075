// Loop timing, topics, drive defaults
use std::time::Duration;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;
pub const LOOP_PERIOD_SECS: f64 = 1.0 / LOOP_HZ as f64;

// Input timeout for watchdog
pub const CMD_TIMEOUT: Duration = Duration::from_millis(250);

// Zenoh topics
pub const TOPIC_CMD_JOYSTICK: &str = "swerve/cmd/joystick"; // raw axes from teleop
pub const TOPIC_CMD_CHASSIS: &str = "swerve/cmd/chassis"; // precomputed field-relative speeds
pub const TOPIC_DASHBOARD: &str = "swerve/dashboard"; // per-module scalars
pub const TOPIC_STATES: &str = "swerve/states"; // module state array
pub const TOPIC_HEALTH: &str = "swerve/state/health"; // health status

// Label the module state array is published under
pub const SWERVE_STATES_LABEL: &str = "SwerveStates";

// Swerve configuration lives in <deploy dir>/swerve
pub const DEFAULT_DEPLOY_DIR: &str = "deploy";
pub const SWERVE_CONFIG_SUBDIR: &str = "swerve";

// Maximum module speed (m/s)
pub const MAX_SPEED: f64 = 4.5;

// Translation scale for the heading drive command, applied after cubing.
// Kept small for indoor testing; tune per robot.
pub const HEADING_TRANSLATION_SCALE: f64 = 0.1;
