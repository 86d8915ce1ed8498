// Keyboard teleop: WASD move, Q quit
// Publishes remote joystick messages the way the phone controller does,
// including its inverted vertical axis (stick up = negative).
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::time::{Duration, Instant};
use tracing::info;

use duplo_drive_runtime::config::TOPIC_CMD_JOYSTICK;
use duplo_drive_runtime::messages::JoystickCommand;

const DEFLECTION: i32 = 100; // full stick travel
const INPUT_TIMEOUT_MS: u64 = 100; // Recenter the stick after this much time with no input

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CMD_JOYSTICK).await?;

    info!("Controls: W/S=forward/back, A/D=left/right (combine for diagonals), Q=quit");

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Persistent stick state
    let mut stick_x = 0;
    let mut stick_y = 0;
    let mut last_x_input = Instant::now();
    let mut last_y_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    KeyCode::Char('w') if pressed => {
                        stick_y = -DEFLECTION;
                        last_y_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        stick_y = DEFLECTION;
                        last_y_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        stick_x = -DEFLECTION;
                        last_x_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        stick_x = DEFLECTION;
                        last_x_input = Instant::now();
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        // Recenter each axis independently so diagonals can be held
        let timeout = Duration::from_millis(INPUT_TIMEOUT_MS);
        if last_x_input.elapsed() > timeout {
            stick_x = 0;
        }
        if last_y_input.elapsed() > timeout {
            stick_y = 0;
        }

        // Always publish at ~50Hz, an idle remote still owns the channel
        let cmd = JoystickCommand::new(stick_x, stick_y);
        publisher.put(serde_json::to_string(&cmd)?).await?;
    }

    Ok(())
}
