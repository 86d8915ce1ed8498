// Wheel drive actuator interface
//
// The runtime talks to the two wheel drives through the `Actuator` trait.
// `ZenohActuator` forwards commands to the drive bridge over zenoh and learns
// readiness from the status reports the bridge publishes. The status
// subscription is only held until both drives are ready.

use std::time::Duration;

use tracing::{debug, info, warn};
use zenoh::Session;
use zenoh::handlers::{RingChannel, RingChannelHandler};
use zenoh::pubsub::{Publisher, Subscriber};
use zenoh::sample::Sample;

use crate::config::{
    MOTOR_SHIELD_PRODUCT_ID, TOPIC_ACTUATOR_STATUS, TOPIC_RT_CONFIG, TOPIC_RT_WHEELS,
};
use crate::messages::{ActuatorConfig, ActuatorStatus, Side, WheelActuation};

// Status reports buffered between probes; older ones are overwritten
const STATUS_BUFFER: usize = 4;

/// Error types for wheel drive communication
#[derive(Debug, thiserror::Error)]
pub enum ActuatorError {
    #[error("Wheel drive {side:?} not ready after {attempts} attempts")]
    NotReady { side: Side, attempts: u32 },

    #[error("Failed to encode actuator message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Actuator transport error: {0}")]
    Transport(String),
}

/// A pair of wheel drives
#[allow(async_fn_in_trait)]
pub trait Actuator {
    /// Check whether the drive on `side` reports ready
    async fn probe(&mut self, side: Side) -> Result<bool, ActuatorError>;

    /// Set the PWM frequency of both drives
    async fn set_frequency(&mut self, hz: u32) -> Result<(), ActuatorError>;

    /// Apply one cycle's wheel commands
    async fn apply(&mut self, actuation: &WheelActuation) -> Result<(), ActuatorError>;

    /// Stop both wheels
    async fn stop(&mut self) -> Result<(), ActuatorError> {
        self.apply(&WheelActuation::default()).await
    }
}

/// Poll one drive until it reports ready, giving up after `attempts` probes
pub async fn wait_until_ready<A: Actuator>(
    actuator: &mut A,
    side: Side,
    attempts: u32,
    interval: Duration,
) -> Result<(), ActuatorError> {
    for attempt in 1..=attempts {
        if actuator.probe(side).await? {
            debug!("Wheel drive {:?} ready after {} probe(s)", side, attempt);
            return Ok(());
        }
        if attempt < attempts {
            tokio::time::sleep(interval).await;
        }
    }

    warn!("Wheel drive {:?} did not report ready", side);
    Err(ActuatorError::NotReady { side, attempts })
}

/// Bring up both drives: wait for readiness (left, then right), set PWM, stop
///
/// Normal operation must not start unless this returns `Ok`.
pub async fn initialize<A: Actuator>(
    actuator: &mut A,
    attempts: u32,
    interval: Duration,
    pwm_frequency_hz: u32,
) -> Result<(), ActuatorError> {
    info!("Waiting for wheel drives ({} attempts each)", attempts);

    for side in [Side::Left, Side::Right] {
        wait_until_ready(actuator, side, attempts, interval).await?;
    }

    info!("Setting PWM frequency to {}Hz", pwm_frequency_hz);
    actuator.set_frequency(pwm_frequency_hz).await?;
    actuator.stop().await?;

    info!("Wheel drives initialized successfully");
    Ok(())
}

fn transport(e: zenoh::Error) -> ActuatorError {
    ActuatorError::Transport(e.to_string())
}

/// Actuator backed by the zenoh wheel drive bridge
pub struct ZenohActuator {
    wheels: Publisher<'static>,
    config: Publisher<'static>,
    status: Option<Subscriber<RingChannelHandler<Sample>>>,
    ready: [bool; 2], // [left, right]
}

impl ZenohActuator {
    pub async fn declare(session: &Session) -> Result<Self, ActuatorError> {
        let wheels = session
            .declare_publisher(TOPIC_RT_WHEELS)
            .await
            .map_err(transport)?;
        let config = session
            .declare_publisher(TOPIC_RT_CONFIG)
            .await
            .map_err(transport)?;
        let status = session
            .declare_subscriber(TOPIC_ACTUATOR_STATUS)
            .with(RingChannel::new(STATUS_BUFFER))
            .await
            .map_err(transport)?;

        Ok(Self {
            wheels,
            config,
            status: Some(status),
            ready: [false; 2],
        })
    }

    /// Whether readiness reports are still being received
    pub fn is_listening_for_status(&self) -> bool {
        self.status.is_some()
    }

    fn drain_status(&mut self) {
        let Some(status) = &self.status else {
            return;
        };

        while let Ok(Some(sample)) = status.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<ActuatorStatus>(&payload) {
                Ok(status) => {
                    let ready = status.product_id == MOTOR_SHIELD_PRODUCT_ID;
                    if !ready {
                        debug!(
                            "Wheel drive {:?} reported product id 0x{:02X}",
                            status.side, status.product_id
                        );
                    }
                    self.ready[side_index(status.side)] = ready;
                }
                Err(e) => warn!("Failed to parse actuator status: {}", e),
            }
        }

        // Nothing reads the reports after start-up, so stop receiving them
        if self.ready.iter().all(|&r| r) {
            debug!("Both wheel drives ready, undeclaring status subscriber");
            self.status = None;
        }
    }
}

fn side_index(side: Side) -> usize {
    match side {
        Side::Left => 0,
        Side::Right => 1,
    }
}

impl Actuator for ZenohActuator {
    async fn probe(&mut self, side: Side) -> Result<bool, ActuatorError> {
        self.drain_status();
        Ok(self.ready[side_index(side)])
    }

    async fn set_frequency(&mut self, hz: u32) -> Result<(), ActuatorError> {
        let json = serde_json::to_string(&ActuatorConfig {
            pwm_frequency_hz: hz,
        })?;
        self.config.put(json).await.map_err(transport)
    }

    async fn apply(&mut self, actuation: &WheelActuation) -> Result<(), ActuatorError> {
        let json = serde_json::to_string(actuation)?;
        self.wheels.put(json).await.map_err(transport)
    }
}
