// Fixed-cadence control loop with sensor watchdogs
// Note: every cycle recomputes from that cycle's inputs, so one bad cycle is corrected on the next tick.
// A range reading or local joystick sample older than its timeout is treated as missing.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::config::{
    RuntimeConfig, TOPIC_CMD_JOYSTICK, TOPIC_SENSOR_NUNCHUCK, TOPIC_SENSOR_RANGE,
};
use crate::control::{decide, CycleDecision, IntentPair, Origin, RemoteMailbox};
use crate::messages::{JoystickCommand, NunchuckSample, RangeSample, RuntimeHealth};
use crate::motor::{initialize, Actuator, ActuatorError, RangeReading, ZenohActuator};
use crate::telemetry::{TelemetrySink, ZenohTelemetry};

/// Decodes remote joystick payloads into the mailbox
///
/// Runs on the transport's callback context, not the control loop.
#[derive(Debug, Clone)]
pub struct RemoteIngress {
    mailbox: Arc<RemoteMailbox>,
    deadband: i32,
}

impl RemoteIngress {
    pub fn new(mailbox: Arc<RemoteMailbox>, deadband: i32) -> Self {
        Self { mailbox, deadband }
    }

    /// Handle one raw message; malformed messages leave the mailbox untouched
    pub fn on_message(&self, payload: &[u8]) {
        let cmd = match serde_json::from_slice::<JoystickCommand>(payload) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("Failed to parse joystick command: {}", e);
                return;
            }
        };

        match IntentPair::from_remote(&cmd, self.deadband) {
            Some(pair) => {
                debug!("Remote joystick {:?} -> ({}, {})", cmd, pair.x, pair.y);
                self.mailbox.post(pair);
            }
            None => warn!("Ignoring joystick command without both axes: {:?}", cmd),
        }
    }
}

/// A value with its arrival time
#[derive(Debug, Clone, Copy)]
struct Timed<T> {
    value: T,
    received_at: Instant,
}

impl<T: Copy> Timed<T> {
    fn now(value: T) -> Self {
        Self {
            value,
            received_at: Instant::now(),
        }
    }
}

pub struct Runtime {
    config: RuntimeConfig,
    mailbox: Arc<RemoteMailbox>,
    local: Option<Timed<IntentPair>>,
    range: Option<Timed<RangeReading>>,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            mailbox: Arc::new(RemoteMailbox::new()),
            local: None,
            range: None,
            health: RuntimeHealth::Idle, // Idle until the first input
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    /// Remote ingress writing into this runtime's mailbox
    pub fn remote_ingress(&self) -> RemoteIngress {
        RemoteIngress::new(Arc::clone(&self.mailbox), self.config.input.remote_deadband)
    }

    /// Process incoming local joystick sample
    pub fn on_local(&mut self, sample: NunchuckSample) {
        self.local = Some(Timed::now(IntentPair::from_nunchuck(&sample)));
    }

    /// Process incoming range sample
    pub fn on_range(&mut self, sample: RangeSample) {
        if !sample.valid {
            debug!("Range sensor reported no valid reading");
        }
        self.range = Some(Timed::now(RangeReading::from(sample)));
    }

    fn sample_range(&self) -> RangeReading {
        match self.range {
            Some(t) if t.received_at.elapsed() <= self.config.range_timeout() => t.value,
            _ => RangeReading::Unavailable,
        }
    }

    fn sample_local(&self) -> Option<IntentPair> {
        self.local
            .filter(|t| t.received_at.elapsed() <= self.config.local_timeout())
            .map(|t| t.value)
    }

    /// Run one decision cycle: range, arbitration, classification, planning, mapping
    pub fn compute(&mut self) -> CycleDecision {
        let range = self.sample_range();
        let remote = self.mailbox.take();
        let local = self.sample_local();

        let decision = decide(&self.config.drive, range, remote, local);

        debug!(
            "intent=({}, {}) from {:?} class={} duty={}",
            decision.intent.x,
            decision.intent.y,
            decision.intent.origin,
            decision.class,
            decision.ceiling
        );
        if decision.class.is_rotation() {
            debug!(
                "Rotating in place at {}% regardless of range",
                self.config.drive.max_rotation_duty
            );
        }

        let health = if !range.is_valid() {
            RuntimeHealth::RangeUnavailable
        } else if decision.intent.origin == Origin::None {
            RuntimeHealth::Idle
        } else {
            RuntimeHealth::Ok
        };
        if health != self.health {
            match health {
                RuntimeHealth::RangeUnavailable => {
                    warn!("No valid range reading, applying {:?} policy", self.config.drive.range_failure)
                }
                RuntimeHealth::Idle => info!("No control input, stopping"),
                RuntimeHealth::Ok => info!("Control input and range available"),
            }
        }
        self.health = health;

        decision
    }

    /// Compute a cycle and push it to the actuator and telemetry
    ///
    /// Actuator failures are returned; telemetry failures are logged and skipped.
    pub async fn step<A: Actuator, T: TelemetrySink>(
        &mut self,
        actuator: &mut A,
        telemetry: &mut T,
    ) -> Result<CycleDecision, ActuatorError> {
        let decision = self.compute();

        actuator.apply(&decision.actuation).await?;

        if let Some(label) = decision.label() {
            if let Err(e) = telemetry.direction(label).await {
                warn!("Failed to publish direction: {}", e);
            }
        }
        if let Err(e) = telemetry.health(self.health).await {
            warn!("Failed to publish health: {}", e);
        }

        Ok(decision)
    }
}

pub async fn run(config: RuntimeConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    let mut runtime = Runtime::new(config);
    let config = runtime.config().clone();

    info!("Setting up publishers and subscribers...");
    let remote = runtime.remote_ingress();
    let _remote_sub = session
        .declare_subscriber(TOPIC_CMD_JOYSTICK)
        .callback(move |sample| {
            let payload = sample.payload().to_bytes();
            remote.on_message(&payload);
        })
        .await?;
    let local_sub = session.declare_subscriber(TOPIC_SENSOR_NUNCHUCK).await?;
    let range_sub = session.declare_subscriber(TOPIC_SENSOR_RANGE).await?;
    let mut actuator = ZenohActuator::declare(&session).await?;
    let mut telemetry = ZenohTelemetry::declare(&session).await?;

    initialize(
        &mut actuator,
        config.ready_attempts,
        config.ready_interval(),
        config.pwm_frequency_hz,
    )
    .await?;

    info!(
        "Runtime started: {}Hz loop, {}ms range timeout",
        config.loop_hz, config.range_timeout_ms
    );
    info!(
        "Subscribed to: {}, {}, {}",
        TOPIC_CMD_JOYSTICK, TOPIC_SENSOR_NUNCHUCK, TOPIC_SENSOR_RANGE
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    // Drain pending sensor samples (non-blocking), keep latest
    let ingest = |runtime: &mut Runtime| {
        while let Ok(Some(sample)) = range_sub.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<RangeSample>(&payload) {
                Ok(range) => runtime.on_range(range),
                Err(e) => warn!("Failed to parse range sample: {}", e),
            }
        }
        while let Ok(Some(sample)) = local_sub.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<NunchuckSample>(&payload) {
                Ok(local) => runtime.on_local(local),
                Err(e) => warn!("Failed to parse nunchuck sample: {}", e),
            }
        }
    };

    let outcome = control_loop(&mut runtime, &mut actuator, &mut telemetry, shutdown, ingest).await;

    if let Err(e) = session.close().await {
        warn!("Failed to close zenoh session: {}", e);
    }
    Ok(outcome?)
}

/// Tick until `shutdown` resolves or the actuator fails, then stop the wheels
///
/// `shutdown` is polled across the whole run, so a request that arrives while a
/// cycle is being published is seen on the next iteration.
pub async fn control_loop<A, T, S>(
    runtime: &mut Runtime,
    actuator: &mut A,
    telemetry: &mut T,
    shutdown: S,
    mut ingest: impl FnMut(&mut Runtime),
) -> Result<(), ActuatorError>
where
    A: Actuator,
    T: TelemetrySink,
    S: Future<Output = ()>,
{
    let mut tick = interval(runtime.config().loop_period());
    tokio::pin!(shutdown);

    let outcome = loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = &mut shutdown => {
                info!("Shutting down, stopping wheels");
                break Ok(());
            }
        }

        // 1. Sensor samples, 2. decide, actuate, publish
        ingest(runtime);
        if let Err(e) = runtime.step(actuator, telemetry).await {
            warn!("Actuator failed, leaving control loop: {}", e);
            break Err(e);
        }
    };

    stop_on_exit(actuator, outcome).await
}

/// Best-effort stop; the loop's own error takes precedence over a failed stop
async fn stop_on_exit<A: Actuator>(
    actuator: &mut A,
    outcome: Result<(), ActuatorError>,
) -> Result<(), ActuatorError> {
    match actuator.stop().await {
        Ok(()) => outcome,
        Err(e) => {
            warn!("Failed to stop wheels on exit: {}", e);
            outcome.and(Err(e))
        }
    }
}
