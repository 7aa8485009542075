// Cooperative command scheduling
//
// A command is a body re-run every tick until replaced. The scheduler runs the
// subsystem's periodic telemetry first, then the active command.

use tracing::info;

use crate::subsystem::{Dashboard, SwerveSubsystem};
use crate::swerve::SwerveDrive;

type CommandBody<D> = Box<dyn FnMut(&mut SwerveSubsystem<D>)>;

pub struct RunCommand<D> {
    name: &'static str,
    body: CommandBody<D>,
}

impl<D: SwerveDrive + 'static> RunCommand<D> {
    pub fn new(name: &'static str, body: impl FnMut(&mut SwerveSubsystem<D>) + 'static) -> Self {
        Self {
            name,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run one tick of the command
    pub fn execute(&mut self, subsystem: &mut SwerveSubsystem<D>) {
        (self.body)(subsystem);
    }
}

impl<D> std::fmt::Debug for RunCommand<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunCommand").field("name", &self.name).finish()
    }
}

/// Owns the subsystem and the command currently driving it
pub struct Scheduler<D> {
    subsystem: SwerveSubsystem<D>,
    active: Option<RunCommand<D>>,
}

impl<D: SwerveDrive + 'static> Scheduler<D> {
    pub fn new(subsystem: SwerveSubsystem<D>) -> Self {
        Self {
            subsystem,
            active: None,
        }
    }

    pub fn subsystem(&self) -> &SwerveSubsystem<D> {
        &self.subsystem
    }

    /// Replace the active command; the previous one is dropped
    pub fn set_command(&mut self, command: RunCommand<D>) {
        info!("Scheduling command: {}", command.name());
        self.active = Some(command);
    }

    pub fn cancel(&mut self) {
        if let Some(command) = self.active.take() {
            info!("Cancelled command: {}", command.name());
        }
    }

    pub fn active_command(&self) -> Option<&'static str> {
        self.active.as_ref().map(RunCommand::name)
    }

    /// One scheduler run: periodic telemetry, then the active command
    pub fn tick(&mut self, dashboard: &mut impl Dashboard) {
        self.subsystem.periodic(dashboard);
        if let Some(command) = self.active.as_mut() {
            command.execute(&mut self.subsystem);
        }
    }
}
