use proptest::prelude::*;
use std::fs;
use std::path::Path;

use swerve_zenoh_runtime::command::Scheduler;
use swerve_zenoh_runtime::config::{HEADING_TRANSLATION_SCALE, SWERVE_STATES_LABEL};
use swerve_zenoh_runtime::subsystem::{
    ANGLE_KEYS, DashboardFrame, SPEED_KEYS, SwerveSubsystem, smooth_translation,
};
use swerve_zenoh_runtime::swerve::{ChassisSpeeds, ConfigError, SwerveDrive};

const MODULES: [(&str, f64, f64); 4] = [
    ("frontleft", 12.0, 12.0),
    ("frontright", 12.0, -12.0),
    ("backleft", -12.0, 12.0),
    ("backright", -12.0, -12.0),
];

/// Writes <deploy>/swerve with a square 24in x 24in module layout
fn write_deploy(deploy: &Path) {
    let swerve = deploy.join("swerve");
    fs::create_dir_all(swerve.join("modules")).unwrap();
    let names: Vec<String> = MODULES.iter().map(|(n, _, _)| format!("{n}.json")).collect();
    fs::write(
        swerve.join("swervedrive.json"),
        serde_json::json!({ "invertedIMU": false, "modules": names }).to_string(),
    )
    .unwrap();
    fs::write(
        swerve.join("controllerproperties.json"),
        r#"{ "angleJoystickRadiusDeadband": 0.5, "heading": { "p": 0.4 } }"#,
    )
    .unwrap();
    for (name, front, left) in MODULES {
        fs::write(
            swerve.join("modules").join(format!("{name}.json")),
            serde_json::json!({ "location": { "front": front, "left": left } }).to_string(),
        )
        .unwrap();
    }
}

#[test]
fn test_builds_from_deploy_dir() {
    let deploy = tempfile::tempdir().unwrap();
    write_deploy(deploy.path());

    let subsystem = SwerveSubsystem::from_deploy_dir(deploy.path(), 4.5).unwrap();
    assert_eq!(subsystem.drive().maximum_velocity(), 4.5);
    assert_eq!(subsystem.heading_translation_scale(), HEADING_TRANSLATION_SCALE);
}

#[test]
fn test_shipped_deploy_config_loads() {
    let deploy = Path::new(env!("CARGO_MANIFEST_DIR")).join("deploy");
    let subsystem = SwerveSubsystem::from_deploy_dir(&deploy, 4.5).unwrap();
    assert!(subsystem.drive().maximum_angular_velocity() > 0.0);
}

#[test]
fn test_malformed_module_fails_construction() {
    let deploy = tempfile::tempdir().unwrap();
    write_deploy(deploy.path());
    fs::write(
        deploy.path().join("swerve/modules/backleft.json"),
        r#"{ "location": { "front": "far" } }"#,
    )
    .unwrap();

    match SwerveSubsystem::from_deploy_dir(deploy.path(), 4.5) {
        Err(ConfigError::Parse { path, .. }) => assert!(path.ends_with("backleft.json")),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("constructed a subsystem from a malformed config"),
    }
}

#[test]
fn test_missing_config_fails_construction() {
    let deploy = tempfile::tempdir().unwrap();
    assert!(SwerveSubsystem::from_deploy_dir(deploy.path(), 4.5).is_err());
}

#[test]
fn test_full_rotation_input_spins_at_max_angular_velocity() {
    let deploy = tempfile::tempdir().unwrap();
    write_deploy(deploy.path());
    let subsystem = SwerveSubsystem::from_deploy_dir(deploy.path(), 4.5).unwrap();
    let command = subsystem.drive_angular_command(|| 0.0, || 0.0, || 1.0);
    let mut scheduler = Scheduler::new(subsystem);
    scheduler.set_command(command);

    // First tick publishes the idle states, then drives
    let mut frame = DashboardFrame::new();
    scheduler.tick(&mut frame);
    for key in SPEED_KEYS {
        assert_eq!(frame.number(key), Some(0.0));
    }

    // Every module runs at max speed tangent to the circle
    let mut frame = DashboardFrame::new();
    scheduler.tick(&mut frame);
    let expected_deg = [135.0, 45.0, -135.0, -45.0];
    for i in 0..4 {
        assert!((frame.number(SPEED_KEYS[i]).unwrap() - 4.5).abs() < 1e-9);
        assert!((frame.number(ANGLE_KEYS[i]).unwrap() - expected_deg[i]).abs() < 1e-9);
    }
    let published = frame.module_states.unwrap();
    assert_eq!(published.name, SWERVE_STATES_LABEL);
    assert_eq!(published.states.len(), 4);
}

#[test]
fn test_pass_through_drives_field_relative() {
    let deploy = tempfile::tempdir().unwrap();
    write_deploy(deploy.path());
    let mut subsystem = SwerveSubsystem::from_deploy_dir(deploy.path(), 4.5).unwrap();

    let speeds = ChassisSpeeds::new(1.0, 1.0, 0.0);
    subsystem.drive_field_oriented(speeds);
    for state in subsystem.drive().states() {
        assert!((state.speed_meters_per_second - 2f64.sqrt()).abs() < 1e-9);
        assert!((state.angle.degrees() - 45.0).abs() < 1e-9);
    }
    assert_eq!(speeds, ChassisSpeeds::new(1.0, 1.0, 0.0));
}

proptest! {
    #[test]
    fn smoothing_is_odd(x in -1.0f64..=1.0) {
        let scale = HEADING_TRANSLATION_SCALE;
        prop_assert_eq!(smooth_translation(-x, scale), -smooth_translation(x, scale));
        prop_assert!(smooth_translation(x, scale).abs() <= scale);
    }
}
