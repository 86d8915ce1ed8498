// Direction and health telemetry

use zenoh::Session;
use zenoh::pubsub::Publisher;

use crate::config::{TOPIC_DIRECTION, TOPIC_HEALTH};
use crate::messages::RuntimeHealth;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to encode telemetry: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Telemetry transport error: {0}")]
    Transport(String),
}

/// Receives one direction label per moving cycle and the runtime health
#[allow(async_fn_in_trait)]
pub trait TelemetrySink {
    async fn direction(&mut self, label: &str) -> Result<(), TelemetryError>;

    async fn health(&mut self, health: RuntimeHealth) -> Result<(), TelemetryError>;
}

pub struct ZenohTelemetry {
    direction: Publisher<'static>,
    health: Publisher<'static>,
}

impl ZenohTelemetry {
    pub async fn declare(session: &Session) -> Result<Self, TelemetryError> {
        let direction = session
            .declare_publisher(TOPIC_DIRECTION)
            .await
            .map_err(transport)?;
        let health = session
            .declare_publisher(TOPIC_HEALTH)
            .await
            .map_err(transport)?;
        Ok(Self { direction, health })
    }
}

fn transport(e: zenoh::Error) -> TelemetryError {
    TelemetryError::Transport(e.to_string())
}

impl TelemetrySink for ZenohTelemetry {
    async fn direction(&mut self, label: &str) -> Result<(), TelemetryError> {
        self.direction
            .put(label.to_string())
            .await
            .map_err(transport)
    }

    async fn health(&mut self, health: RuntimeHealth) -> Result<(), TelemetryError> {
        let json = serde_json::to_string(&health)?;
        self.health.put(json).await.map_err(transport)
    }
}
