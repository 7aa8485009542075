// Swerve configuration directory parser
//
// Layout:
//   swervedrive.json           - IMU and the ordered list of module files
//   controllerproperties.json  - heading controller gains and joystick deadband
//   modules/<module>.json      - per-module location and calibration

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::geometry::Translation2d;
use super::heading::HeadingController;
use super::sim::SimSwerveDrive;

pub const SWERVE_DRIVE_FILE: &str = "swervedrive.json";
pub const CONTROLLER_PROPERTIES_FILE: &str = "controllerproperties.json";
pub const MODULES_DIR: &str = "modules";

/// Module count and order: front-left, front-right, back-left, back-right
pub const MODULE_COUNT: usize = 4;

const METERS_PER_INCH: f64 = 0.0254;

/// Error types for loading a swerve configuration directory
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Swerve config directory not found: {0}")]
    MissingDirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Expected 4 swerve modules, found {0}")]
    ModuleCount(usize),

    #[error("Maximum speed must be positive and finite, got {0}")]
    InvalidMaxSpeed(f64),

    #[error("Module {0} is at the robot center; cannot derive angular velocity")]
    DegenerateGeometry(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImuJson {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub canbus: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwerveDriveJson {
    #[serde(default)]
    pub imu: Option<ImuJson>,
    #[serde(rename = "invertedIMU", default)]
    pub inverted_imu: bool,
    pub modules: Vec<String>,
}

/// Module location relative to robot center, in inches
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationJson {
    pub front: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct InvertedJson {
    #[serde(default)]
    pub drive: bool,
    #[serde(default)]
    pub angle: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleJson {
    pub location: LocationJson,
    #[serde(default)]
    pub absolute_encoder_offset: f64,
    #[serde(default)]
    pub inverted: InvertedJson,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PidfJson {
    pub p: f64,
    #[serde(default)]
    pub i: f64,
    #[serde(default)]
    pub d: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerPropertiesJson {
    pub angle_joystick_radius_deadband: f64,
    pub heading: PidfJson,
}

/// A module as the drive controller sees it
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    pub name: String,
    /// Location from robot center in meters (x forward, y left)
    pub location: Translation2d,
    pub absolute_encoder_offset_deg: f64,
    pub drive_inverted: bool,
    pub angle_inverted: bool,
}

/// Fully parsed swerve configuration
#[derive(Debug, Clone)]
pub struct SwerveConfig {
    pub imu: Option<ImuJson>,
    pub inverted_imu: bool,
    pub modules: [ModuleConfig; MODULE_COUNT],
    pub controller: ControllerPropertiesJson,
}

/// Reads a swerve configuration directory and builds a drive controller from it
#[derive(Debug, Clone)]
pub struct SwerveParser {
    directory: PathBuf,
    config: SwerveConfig,
}

impl SwerveParser {
    /// Parse every file in the directory. Nothing is built unless all of it parses.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        if !directory.is_dir() {
            return Err(ConfigError::MissingDirectory(directory));
        }
        info!("Parsing swerve configuration from {}", directory.display());

        let drive: SwerveDriveJson = read_json(&directory.join(SWERVE_DRIVE_FILE))?;
        let controller: ControllerPropertiesJson =
            read_json(&directory.join(CONTROLLER_PROPERTIES_FILE))?;

        if drive.modules.len() != MODULE_COUNT {
            return Err(ConfigError::ModuleCount(drive.modules.len()));
        }

        let mut modules = Vec::with_capacity(MODULE_COUNT);
        for file in &drive.modules {
            let module: ModuleJson = read_json(&directory.join(MODULES_DIR).join(file))?;
            debug!("Loaded module {}: {:?}", file, module.location);
            modules.push(ModuleConfig {
                name: file.trim_end_matches(".json").to_string(),
                location: Translation2d::new(
                    module.location.front * METERS_PER_INCH,
                    module.location.left * METERS_PER_INCH,
                ),
                absolute_encoder_offset_deg: module.absolute_encoder_offset,
                drive_inverted: module.inverted.drive,
                angle_inverted: module.inverted.angle,
            });
        }
        let modules: [ModuleConfig; MODULE_COUNT] = modules
            .try_into()
            .map_err(|v: Vec<ModuleConfig>| ConfigError::ModuleCount(v.len()))?;

        Ok(Self {
            directory,
            config: SwerveConfig {
                imu: drive.imu,
                inverted_imu: drive.inverted_imu,
                modules,
                controller,
            },
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn config(&self) -> &SwerveConfig {
        &self.config
    }

    /// Build the drive controller with the given maximum module speed (m/s)
    pub fn create_swerve_drive(&self, max_speed: f64) -> Result<SimSwerveDrive> {
        if !(max_speed.is_finite() && max_speed > 0.0) {
            return Err(ConfigError::InvalidMaxSpeed(max_speed));
        }

        // Max angular velocity is reached when the farthest module runs at max speed
        let farthest = self
            .config
            .modules
            .iter()
            .max_by(|a, b| a.location.norm().total_cmp(&b.location.norm()))
            .ok_or(ConfigError::ModuleCount(0))?;
        let radius = farthest.location.norm();
        if radius <= f64::EPSILON {
            return Err(ConfigError::DegenerateGeometry(farthest.name.clone()));
        }
        let max_angular_velocity = max_speed / radius;

        let gains = self.config.controller.heading;
        let heading = HeadingController::new(
            gains.p,
            gains.i,
            gains.d,
            self.config.controller.angle_joystick_radius_deadband,
            max_angular_velocity,
        );
        let locations = self.config.modules.clone().map(|m| m.location);

        info!(
            "Swerve drive created: max {:.2} m/s, {:.2} rad/s",
            max_speed, max_angular_velocity
        );
        Ok(SimSwerveDrive::new(
            locations,
            max_speed,
            max_angular_velocity,
            heading,
        ))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swerve::SwerveDrive;
    use std::fs;

    fn write_config(dir: &Path, modules: &[(&str, f64, f64)]) {
        fs::create_dir_all(dir.join(MODULES_DIR)).unwrap();
        let names: Vec<String> = modules.iter().map(|(n, _, _)| format!("{n}.json")).collect();
        fs::write(
            dir.join(SWERVE_DRIVE_FILE),
            serde_json::json!({
                "imu": { "type": "pigeon2", "id": 13, "canbus": null },
                "invertedIMU": false,
                "modules": names,
            })
            .to_string(),
        )
        .unwrap();
        fs::write(
            dir.join(CONTROLLER_PROPERTIES_FILE),
            r#"{ "angleJoystickRadiusDeadband": 0.5, "heading": { "p": 0.4, "i": 0, "d": 0.01 } }"#,
        )
        .unwrap();
        for (name, front, left) in modules {
            fs::write(
                dir.join(MODULES_DIR).join(format!("{name}.json")),
                serde_json::json!({
                    "location": { "front": front, "left": left },
                    "absoluteEncoderOffset": 12.5,
                    "inverted": { "drive": false, "angle": true },
                })
                .to_string(),
            )
            .unwrap();
        }
    }

    const SQUARE: [(&str, f64, f64); 4] = [
        ("frontleft", 12.0, 12.0),
        ("frontright", 12.0, -12.0),
        ("backleft", -12.0, 12.0),
        ("backright", -12.0, -12.0),
    ];

    #[test]
    fn test_parses_modules_in_listed_order() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), &SQUARE);

        let parser = SwerveParser::new(dir.path()).unwrap();
        let config = parser.config();
        let names: Vec<&str> = config.modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["frontleft", "frontright", "backleft", "backright"]);
        assert!((config.modules[0].location.x - 0.3048).abs() < 1e-9);
        assert!((config.modules[1].location.y + 0.3048).abs() < 1e-9);
        assert!(config.modules[2].angle_inverted);
        assert_eq!(config.imu.as_ref().map(|i| i.kind.as_str()), Some("pigeon2"));
    }

    #[test]
    fn test_max_angular_velocity_from_farthest_module() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), &SQUARE);

        let drive = SwerveParser::new(dir.path())
            .unwrap()
            .create_swerve_drive(4.5)
            .unwrap();
        let radius = (0.3048f64 * 0.3048 * 2.0).sqrt();
        assert!((drive.maximum_velocity() - 4.5).abs() < 1e-9);
        assert!((drive.maximum_angular_velocity() - 4.5 / radius).abs() < 1e-9);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = SwerveParser::new(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory(_)));
    }

    #[test]
    fn test_missing_module_file() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), &SQUARE);
        fs::remove_file(dir.path().join(MODULES_DIR).join("backright.json")).unwrap();

        let err = SwerveParser::new(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "got {err}");
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), &SQUARE);
        fs::write(dir.path().join(CONTROLLER_PROPERTIES_FILE), "{ heading: ").unwrap();

        let err = SwerveParser::new(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err}");
    }

    #[test]
    fn test_wrong_module_count() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), &SQUARE[..3]);

        let err = SwerveParser::new(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ModuleCount(3)));
    }

    #[test]
    fn test_rejects_non_positive_max_speed() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), &SQUARE);
        let parser = SwerveParser::new(dir.path()).unwrap();

        assert!(matches!(
            parser.create_swerve_drive(0.0),
            Err(ConfigError::InvalidMaxSpeed(_))
        ));
        assert!(matches!(
            parser.create_swerve_drive(f64::NAN),
            Err(ConfigError::InvalidMaxSpeed(_))
        ));
    }

    #[test]
    fn test_rejects_modules_at_center() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            &[("a", 0.0, 0.0), ("b", 0.0, 0.0), ("c", 0.0, 0.0), ("d", 0.0, 0.0)],
        );
        let parser = SwerveParser::new(dir.path()).unwrap();
        assert!(matches!(
            parser.create_swerve_drive(3.0),
            Err(ConfigError::DegenerateGeometry(_))
        ));
    }
}
