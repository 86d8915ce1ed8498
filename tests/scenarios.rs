// End-to-end control cycles through the public runtime API

use duplo_drive_runtime::config::RuntimeConfig;
use duplo_drive_runtime::control::{MovementClass, Origin};
use duplo_drive_runtime::messages::{
    NunchuckSample, RangeSample, RuntimeHealth, Side, Spin, WheelActuation,
};
use duplo_drive_runtime::motor::{Actuator, ActuatorError};
use duplo_drive_runtime::runtime::Runtime;
use duplo_drive_runtime::telemetry::{TelemetryError, TelemetrySink};

#[derive(Default)]
struct Bench {
    applied: Vec<WheelActuation>,
    labels: Vec<String>,
}

impl Actuator for Bench {
    async fn probe(&mut self, _side: Side) -> Result<bool, ActuatorError> {
        Ok(true)
    }

    async fn set_frequency(&mut self, _hz: u32) -> Result<(), ActuatorError> {
        Ok(())
    }

    async fn apply(&mut self, actuation: &WheelActuation) -> Result<(), ActuatorError> {
        self.applied.push(*actuation);
        Ok(())
    }
}

#[derive(Default)]
struct Labels(Vec<String>);

impl TelemetrySink for Labels {
    async fn direction(&mut self, label: &str) -> Result<(), TelemetryError> {
        self.0.push(label.to_string());
        Ok(())
    }

    async fn health(&mut self, _health: RuntimeHealth) -> Result<(), TelemetryError> {
        Ok(())
    }
}

fn range(millimeters: u32) -> RangeSample {
    RangeSample {
        millimeters,
        valid: true,
    }
}

/// Remote message for a unit intent, using the inverted vertical axis
fn remote(x: i32, y: i32) -> Vec<u8> {
    format!(r#"{{"left_x_mapped": {}, "left_y_mapped": {}}}"#, x * 50, -y * 50).into_bytes()
}

#[tokio::test]
async fn test_scenario_forward_far() {
    let mut runtime = Runtime::new(RuntimeConfig::default());
    let mut bench = Bench::default();
    let mut labels = Labels::default();

    runtime.on_range(range(500));
    runtime.remote_ingress().on_message(&remote(0, 1));
    let decision = runtime.step(&mut bench, &mut labels).await.unwrap();

    assert_eq!(decision.class, MovementClass::North);
    assert_eq!(decision.ceiling, 50);
    assert_eq!((decision.actuation.left.duty, decision.actuation.left.spin), (50, Spin::Cw));
    assert_eq!((decision.actuation.right.duty, decision.actuation.right.spin), (50, Spin::Cw));
    assert_eq!(labels.0, vec!["NORTH".to_string()]);
    assert_eq!(bench.applied, vec![decision.actuation]);
}

#[tokio::test]
async fn test_scenario_diagonal_inside_ramp() {
    let mut runtime = Runtime::new(RuntimeConfig::default());
    let mut bench = Bench::default();
    let mut labels = Labels::default();

    runtime.on_range(range(180));
    runtime.remote_ingress().on_message(&remote(1, 1));
    let decision = runtime.step(&mut bench, &mut labels).await.unwrap();

    assert_eq!(decision.class, MovementClass::NorthEast);
    assert_eq!((decision.actuation.left.duty, decision.actuation.left.spin), (33, Spin::Cw));
    assert_eq!(decision.actuation.right.spin, Spin::Cw);
    assert!((16..=17).contains(&decision.actuation.right.duty));
}

#[tokio::test]
async fn test_scenario_idle_remote_preempts_local() {
    let mut runtime = Runtime::new(RuntimeConfig::default());
    let mut bench = Bench::default();
    let mut labels = Labels::default();

    for distance in [30, 180, 500] {
        runtime.on_range(range(distance));
        runtime.on_local(NunchuckSample { joy_x: 255, joy_y: 128 });
        runtime.remote_ingress().on_message(&remote(0, 0));
        let decision = runtime.step(&mut bench, &mut labels).await.unwrap();

        assert_eq!(decision.intent.origin, Origin::Remote);
        assert_eq!(decision.class, MovementClass::Stop);
        assert_eq!(decision.actuation, WheelActuation::default());
    }
    assert!(labels.0.is_empty());
}

#[tokio::test]
async fn test_scenario_local_rotation_ignores_range() {
    let config = RuntimeConfig::default();
    let rotation = config.drive.max_rotation_duty;
    let mut runtime = Runtime::new(config);
    let mut bench = Bench::default();
    let mut labels = Labels::default();

    runtime.on_range(range(500));
    runtime.on_local(NunchuckSample { joy_x: 0, joy_y: 128 });
    let far = runtime.step(&mut bench, &mut labels).await.unwrap();

    assert_eq!(far.intent.origin, Origin::Local);
    assert_eq!(far.class, MovementClass::West);
    assert_eq!((far.actuation.left.duty, far.actuation.left.spin), (rotation, Spin::Ccw));
    assert_eq!((far.actuation.right.duty, far.actuation.right.spin), (rotation, Spin::Cw));

    // Same command next to an obstacle still rotates at full rotation duty
    runtime.on_range(range(10));
    let near = runtime.step(&mut bench, &mut labels).await.unwrap();
    assert_eq!(near.ceiling, 0);
    assert_eq!(near.actuation, far.actuation);
    assert_eq!(labels.0, vec!["WEST".to_string(), "WEST".to_string()]);
}

#[tokio::test]
async fn test_range_failure_does_not_drive_at_full_speed() {
    let mut runtime = Runtime::new(RuntimeConfig::default());
    let mut bench = Bench::default();
    let mut labels = Labels::default();

    runtime.on_range(RangeSample {
        millimeters: u32::MAX,
        valid: false,
    });
    runtime.remote_ingress().on_message(&remote(0, 1));
    let decision = runtime.step(&mut bench, &mut labels).await.unwrap();

    assert_eq!(decision.class, MovementClass::North);
    assert_eq!(decision.actuation.left.duty, 0);
    assert_eq!(decision.actuation.right.duty, 0);
    assert_eq!(runtime.health(), RuntimeHealth::RangeUnavailable);
}

#[tokio::test]
async fn test_loss_of_input_stops() {
    let mut runtime = Runtime::new(RuntimeConfig::default());
    let mut bench = Bench::default();
    let mut labels = Labels::default();

    runtime.on_range(range(500));
    runtime.remote_ingress().on_message(&remote(0, -1));
    let reversing = runtime.step(&mut bench, &mut labels).await.unwrap();
    assert_eq!(reversing.class, MovementClass::South);

    let stopped = runtime.step(&mut bench, &mut labels).await.unwrap();
    assert_eq!(stopped.class, MovementClass::Stop);
    assert_eq!(stopped.actuation, WheelActuation::default());
    assert_eq!(runtime.health(), RuntimeHealth::Idle);
}
