// Hardware simulator: stands in for the wheel drives, range sensor and nunchuck
//
// Usage: cargo run --example hw_sim -- [obstacle_mm]
//
// - Reports both wheel drives ready
// - Publishes a fixed range reading (0 = sensor failure) at 20Hz
// - Publishes a centered nunchuck sample
// - Logs every wheel command and direction label it receives

use std::time::Duration;

use tokio::time::interval;
use tracing::{info, warn};

use duplo_drive_runtime::config::{
    MOTOR_SHIELD_PRODUCT_ID, TOPIC_ACTUATOR_STATUS, TOPIC_DIRECTION, TOPIC_RT_CONFIG,
    TOPIC_RT_WHEELS, TOPIC_SENSOR_NUNCHUCK, TOPIC_SENSOR_RANGE,
};
use duplo_drive_runtime::messages::{
    ActuatorConfig, ActuatorStatus, NunchuckSample, RangeSample, Side, WheelActuation,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    let obstacle_mm: u32 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 500,
    };

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    let pub_status = session.declare_publisher(TOPIC_ACTUATOR_STATUS).await?;
    let pub_range = session.declare_publisher(TOPIC_SENSOR_RANGE).await?;
    let pub_nunchuck = session.declare_publisher(TOPIC_SENSOR_NUNCHUCK).await?;
    let wheels = session.declare_subscriber(TOPIC_RT_WHEELS).await?;
    let config = session.declare_subscriber(TOPIC_RT_CONFIG).await?;
    let direction = session.declare_subscriber(TOPIC_DIRECTION).await?;

    info!("Simulating obstacle at {}mm", obstacle_mm);

    let range = RangeSample {
        millimeters: obstacle_mm,
        valid: obstacle_mm > 0,
    };
    let centered = NunchuckSample {
        joy_x: 128,
        joy_y: 128,
    };

    let mut tick = interval(Duration::from_millis(50));
    loop {
        tick.tick().await;

        for side in [Side::Left, Side::Right] {
            let status = ActuatorStatus {
                side,
                product_id: MOTOR_SHIELD_PRODUCT_ID,
            };
            pub_status.put(serde_json::to_string(&status)?).await?;
        }
        pub_range.put(serde_json::to_string(&range)?).await?;
        pub_nunchuck.put(serde_json::to_string(&centered)?).await?;

        while let Ok(Some(sample)) = config.try_recv() {
            match serde_json::from_slice::<ActuatorConfig>(&sample.payload().to_bytes()) {
                Ok(cfg) => info!("PWM frequency set to {}Hz", cfg.pwm_frequency_hz),
                Err(e) => warn!("Bad actuator config: {}", e),
            }
        }
        while let Ok(Some(sample)) = wheels.try_recv() {
            match serde_json::from_slice::<WheelActuation>(&sample.payload().to_bytes()) {
                Ok(cmd) => info!(
                    "left: {}% {:?} | right: {}% {:?}",
                    cmd.left.duty, cmd.left.spin, cmd.right.duty, cmd.right.spin
                ),
                Err(e) => warn!("Bad wheel command: {}", e),
            }
        }
        while let Ok(Some(sample)) = direction.try_recv() {
            let label = sample.payload().to_bytes();
            info!("Direction: {}", String::from_utf8_lossy(&label));
        }
    }
}
