// 50 Hz control loop with input watchdog
// Each tick: drain inputs, run the scheduler (telemetry then active command),
// publish the telemetry frame and health.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::command::{RunCommand, Scheduler};
use crate::config::{
    CMD_TIMEOUT, LOOP_HZ, TOPIC_CMD_CHASSIS, TOPIC_CMD_JOYSTICK, TOPIC_DASHBOARD, TOPIC_HEALTH,
    TOPIC_STATES,
};
use crate::messages::{JoystickInput, RuntimeHealth};
use crate::subsystem::{DashboardFrame, SwerveSubsystem};
use crate::swerve::{ChassisSpeeds, SwerveDrive};

/// Which command drives the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DriveMode {
    /// Cubed translation, right stick as heading setpoint
    Heading,
    /// Translation and rotation scaled to max velocities
    Angular,
    /// Forward field-relative speeds from the chassis topic
    Velocity,
}

#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub deploy_dir: PathBuf,
    pub max_speed: f64,
    pub heading_translation_scale: f64,
    pub mode: DriveMode,
}

/// Latest inputs shared with the active command's axis closures
pub struct Runtime {
    joystick: Rc<Cell<JoystickInput>>,
    chassis: Rc<Cell<ChassisSpeeds>>,
    cmd_received_at: Option<Instant>,
    health: RuntimeHealth,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            joystick: Rc::new(Cell::new(JoystickInput::default())),
            chassis: Rc::new(Cell::new(ChassisSpeeds::default())),
            cmd_received_at: None,
            health: RuntimeHealth::CmdStale, // Start stale until first input
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    pub fn joystick(&self) -> JoystickInput {
        self.joystick.get()
    }

    pub fn chassis(&self) -> ChassisSpeeds {
        self.chassis.get()
    }

    fn on_joystick(&mut self, input: JoystickInput) {
        debug!("Received joystick: {:?}", &input);
        self.joystick.set(input);
        self.cmd_received_at = Some(Instant::now());
    }

    fn on_chassis(&mut self, speeds: ChassisSpeeds) {
        debug!("Received chassis speeds: {:?}", &speeds);
        self.chassis.set(speeds);
        self.cmd_received_at = Some(Instant::now());
    }

    /// Zero all inputs once nothing has arrived within the timeout
    fn check_watchdog(&mut self) -> RuntimeHealth {
        self.check_watchdog_at(Instant::now())
    }

    fn check_watchdog_at(&mut self, now: Instant) -> RuntimeHealth {
        let Some(received_at) = self.cmd_received_at else {
            // No input ever received
            self.health = RuntimeHealth::CmdStale;
            return self.health;
        };
        let cmd_age = now.saturating_duration_since(received_at);

        if cmd_age > CMD_TIMEOUT {
            if self.health != RuntimeHealth::CmdStale {
                warn!("Input stale ({:?} old), stopping robot", cmd_age);
            }
            self.health = RuntimeHealth::CmdStale;
            self.joystick.set(JoystickInput::default());
            self.chassis.set(ChassisSpeeds::default());
        } else {
            self.health = RuntimeHealth::Ok;
        }
        self.health
    }

    /// Build the command for `mode`, reading this runtime's latest inputs
    pub fn command_for<D: SwerveDrive + 'static>(
        &self,
        subsystem: &SwerveSubsystem<D>,
        mode: DriveMode,
    ) -> RunCommand<D> {
        let axis = |f: fn(&JoystickInput) -> f64| {
            let joystick = Rc::clone(&self.joystick);
            move || f(&joystick.get())
        };
        match mode {
            DriveMode::Heading => subsystem.drive_heading_command(
                axis(|j| j.translation_x),
                axis(|j| j.translation_y),
                axis(|j| j.heading_x),
                axis(|j| j.heading_y),
            ),
            DriveMode::Angular => subsystem.drive_angular_command(
                axis(|j| j.translation_x),
                axis(|j| j.translation_y),
                axis(|j| j.rotation),
            ),
            DriveMode::Velocity => {
                let chassis = Rc::clone(&self.chassis);
                subsystem.drive_velocity_command(move || chassis.get())
            }
        }
    }
}

pub async fn run(options: RuntimeOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subsystem = SwerveSubsystem::from_deploy_dir(&options.deploy_dir, options.max_speed)?
        .with_heading_translation_scale(options.heading_translation_scale);

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let sub_joystick = session.declare_subscriber(TOPIC_CMD_JOYSTICK).await?;
    let sub_chassis = session.declare_subscriber(TOPIC_CMD_CHASSIS).await?;
    let pub_dashboard = session.declare_publisher(TOPIC_DASHBOARD).await?;
    let pub_states = session.declare_publisher(TOPIC_STATES).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    let mut runtime = Runtime::new();
    let command = runtime.command_for(&subsystem, options.mode);
    let mut scheduler = Scheduler::new(subsystem);
    scheduler.set_command(command);
    let mut tick = interval(Duration::from_millis(1000 / LOOP_HZ));

    info!(
        "Runtime started: {}Hz loop, {}ms watchdog timeout, {:?} mode",
        LOOP_HZ,
        CMD_TIMEOUT.as_millis(),
        options.mode
    );
    info!("Subscribed to: {}, {}", TOPIC_CMD_JOYSTICK, TOPIC_CMD_CHASSIS);
    info!(
        "Publishing to: {}, {}, {}",
        TOPIC_DASHBOARD, TOPIC_STATES, TOPIC_HEALTH
    );

    loop {
        tick.tick().await;

        // 1. Drain all pending inputs (non-blocking), keep latest
        while let Ok(Some(sample)) = sub_joystick.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<JoystickInput>(&payload) {
                Ok(input) => runtime.on_joystick(input),
                Err(e) => warn!("Failed to parse joystick input: {}", e),
            }
        }
        while let Ok(Some(sample)) = sub_chassis.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<ChassisSpeeds>(&payload) {
                Ok(speeds) => runtime.on_chassis(speeds),
                Err(e) => warn!("Failed to parse chassis speeds: {}", e),
            }
        }

        // 2. Watchdog zeroes stale inputs before the command reads them
        let health = runtime.check_watchdog();

        // 3. Telemetry then active command
        let mut frame = DashboardFrame::new();
        scheduler.tick(&mut frame);

        // 4. Publish telemetry and health
        pub_dashboard.put(serde_json::to_string(&frame.numbers)?).await?;
        if let Some(states) = &frame.module_states {
            pub_states.put(serde_json::to_string(states)?).await?;
        }
        pub_health.put(serde_json::to_string(&health)?).await?;
    }
}
