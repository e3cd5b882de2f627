// ── Connection monitor ──
//
// Sole source of truth for "connected". Every period it issues one
// lightweight device-time read and classifies the result; the poller
// gates on the connected flag this module maintains.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use zowiebox_api::system::DeviceTime;
use zowiebox_api::{DeviceClient, Envelope, Error as ApiError};

use crate::controller::Controller;

/// How often the link is re-classified.
pub(crate) const CHECK_PERIOD: Duration = Duration::from_secs(5);

/// Coarse link classification shown to the host runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HostStatus {
    /// No check has completed yet.
    #[default]
    Unknown,
    /// Device reachable and answering acceptably.
    Ok,
    /// Communications administratively disabled. Distinct from
    /// `ConnectionFailure`: nothing was attempted.
    Disconnected,
    /// The device rejected the probe with a code that points at
    /// configuration (bad address, wrong credential).
    BadConfig(String),
    /// Transport-level failure, or a rejection that means the endpoint
    /// itself is unusable (port in use).
    ConnectionFailure(String),
    /// Rejected with a code outside the known classification table.
    UnknownError(String),
}

impl HostStatus {
    /// Whether the poller may run against this link state.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Classify one connection-check result.
///
/// Rejection codes map 1:1 per a fixed table; anything outside it is an
/// unknown error. A transport failure or an empty reply is a connection
/// failure, except that a closed comms gate reports `Disconnected`.
pub(crate) fn classify(
    reply: &Result<Option<Envelope<DeviceTime>>, ApiError>,
    host: &str,
) -> HostStatus {
    match reply {
        Err(e) => HostStatus::ConnectionFailure(format!("failed to connect to {host}: {e}")),
        Ok(None) => HostStatus::Disconnected,
        Ok(Some(env)) if env.is_acceptable() => HostStatus::Ok,
        Ok(Some(env)) => match env.status.as_str() {
            // invalid ip / invalid port / invalid url / wrong address /
            // wrong password
            "60008" | "60009" | "60004" | "70002" | "80005" => {
                HostStatus::BadConfig(env.reason())
            }
            // http port occupied
            "70007" => HostStatus::ConnectionFailure(env.reason()),
            _ => HostStatus::UnknownError(env.reason()),
        },
    }
}

/// Probe the device once and classify the outcome.
pub(crate) async fn connection_check(client: &DeviceClient) -> HostStatus {
    let reply = client.device_time().await;
    let status = classify(&reply, client.host());
    match &status {
        HostStatus::Ok => debug!("connection check ok"),
        other => error!(status = ?other, "connection check failed"),
    }
    status
}

/// Periodic link re-classification.
pub(crate) async fn monitor_task(controller: Controller, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                controller.check_connection().await;
            }
        }
    }
}
