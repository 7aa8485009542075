pub mod command;
pub mod config;
pub mod messages;
pub mod runtime;
pub mod subsystem;
pub mod swerve;
