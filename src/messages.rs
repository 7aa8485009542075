// Message types for the runtime

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::swerve::SwerveModuleState;

/// Joystick axes from teleop -> runtime, each nominally in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JoystickInput {
    #[serde(default)]
    pub translation_x: f64,
    #[serde(default)]
    pub translation_y: f64,
    #[serde(default)]
    pub heading_x: f64,
    #[serde(default)]
    pub heading_y: f64,
    #[serde(default)]
    pub rotation: f64,
}

/// Module state array as published on the states topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleStatesMessage {
    pub name: String,
    pub states: Vec<SwerveModuleState>,
}

/// Dashboard scalars as published on the dashboard topic
pub type DashboardMessage = BTreeMap<String, f64>;

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
}
