// Keyboard teleop: WASD translate, Z/X rotate, IJKL heading, R/F speed, Q quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

use swerve_zenoh_runtime::config::TOPIC_CMD_JOYSTICK;
use swerve_zenoh_runtime::messages::JoystickInput;

const AXIS_LEVELS: [f64; 3] = [0.3, 0.6, 1.0]; // fraction of full stick
// Release translation/rotation after this much time with no input
const INPUT_TIMEOUT_MS: u64 = 100;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_JOYSTICK).await?;

    info!("Controls: WASD=move, Z/X=rotate, IJKL=heading, R/F=speed, Q=quit");
    info!("Speed: LOW");

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut level_idx: usize = 0;

    // Heading stick latches; the rest releases on timeout
    let mut input = JoystickInput::default();
    let mut last_movement_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                let level = AXIS_LEVELS[level_idx];

                match code {
                    // Translation (x forward, y left)
                    KeyCode::Char('w') if pressed => {
                        input.translation_x = level;
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        input.translation_x = -level;
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        input.translation_y = level;
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        input.translation_y = -level;
                        last_movement_input = Instant::now();
                    }

                    // Rotation
                    KeyCode::Char('z') if pressed => {
                        input.rotation = level;
                        last_movement_input = Instant::now();
                    }
                    KeyCode::Char('x') if pressed => {
                        input.rotation = -level;
                        last_movement_input = Instant::now();
                    }

                    // Heading setpoint
                    KeyCode::Char('i') if pressed => set_heading(&mut input, 0.0, 1.0),
                    KeyCode::Char('k') if pressed => set_heading(&mut input, 0.0, -1.0),
                    KeyCode::Char('j') if pressed => set_heading(&mut input, 1.0, 0.0),
                    KeyCode::Char('l') if pressed => set_heading(&mut input, -1.0, 0.0),

                    // Speed control
                    KeyCode::Char('r') if pressed => {
                        level_idx = (level_idx + 1).min(2);
                        print_level(level_idx);
                    }
                    KeyCode::Char('f') if pressed => {
                        level_idx = level_idx.saturating_sub(1);
                        print_level(level_idx);
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        if last_movement_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            input.translation_x = 0.0;
            input.translation_y = 0.0;
            input.rotation = 0.0;
        }

        // Always publish at ~50Hz
        publisher.put(serde_json::to_string(&input)?).await?;
    }

    Ok(())
}

fn set_heading(input: &mut JoystickInput, heading_x: f64, heading_y: f64) {
    input.heading_x = heading_x;
    input.heading_y = heading_y;
}

fn print_level(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Speed: {}", label);
}
