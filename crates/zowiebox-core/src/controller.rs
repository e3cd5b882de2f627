// ── Controller abstraction ──
//
// Full lifecycle management for one ZowieBox appliance: config
// validation, transport client construction, connection monitoring,
// background polling, action dispatch, and the reactive surfaces the
// host runtime consumes (status, variables, feedback invalidation).

use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use zowiebox_api::DeviceClient;

use crate::action::{self, Action, ActionOutcome};
use crate::config::DeviceConfig;
use crate::convert;
use crate::error::CoreError;
use crate::feedback::{
    AudioConfigMatch, DeviceTimeMatch, FeedbackId, OutputInfoMatch, TallyMatch,
};
use crate::model::AudioProfile;
use crate::monitor::{self, HostStatus};
use crate::poller;
use crate::store::StateCache;
use crate::variables::{self, VariableSet};

const FEEDBACK_CHANNEL_SIZE: usize = 64;

/// The main entry point for host runtimes.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Construct with a
/// [`DeviceConfig`], then [`start()`](Self::start) to validate, build
/// the transport client, and spawn the background tasks.
#[derive(Clone)]
pub struct Controller {
    pub(crate) inner: Arc<ControllerInner>,
}

pub(crate) struct ControllerInner {
    config: Mutex<DeviceConfig>,
    cache: Arc<StateCache>,
    client: Mutex<Option<Arc<DeviceClient>>>,
    host_status: watch::Sender<HostStatus>,
    connected: watch::Sender<bool>,
    variables: watch::Sender<Arc<VariableSet>>,
    feedback_tx: broadcast::Sender<FeedbackId>,
    cancel: CancellationToken,
    /// Child token for the current client — cancelled on reconfiguration,
    /// replaced on reconnect (avoids permanent cancellation).
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a controller from configuration. Does NOT touch the
    /// network — call [`start()`](Self::start).
    pub fn new(config: DeviceConfig) -> Self {
        let (host_status, _) = watch::channel(HostStatus::Unknown);
        let (connected, _) = watch::channel(false);
        let (variables, _) = watch::channel(Arc::new(VariableSet::new()));
        let (feedback_tx, _) = broadcast::channel(FEEDBACK_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(ControllerInner {
                config: Mutex::new(config),
                cache: Arc::new(StateCache::new()),
                client: Mutex::new(None),
                host_status,
                connected,
                variables,
                feedback_tx,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    /// The last-known device state.
    pub fn cache(&self) -> Arc<StateCache> {
        Arc::clone(&self.inner.cache)
    }

    /// The current configuration.
    pub async fn config(&self) -> DeviceConfig {
        self.inner.config.lock().await.clone()
    }

    /// Current link classification.
    pub fn host_status(&self) -> HostStatus {
        self.inner.host_status.borrow().clone()
    }

    /// Observe link classification changes.
    pub fn subscribe_status(&self) -> watch::Receiver<HostStatus> {
        self.inner.host_status.subscribe()
    }

    /// Whether the connection monitor currently classifies the link as up.
    pub fn is_connected(&self) -> bool {
        *self.inner.connected.borrow()
    }

    /// Observe the connected flag the poller gates on.
    pub fn subscribe_connected(&self) -> watch::Receiver<bool> {
        self.inner.connected.subscribe()
    }

    /// The currently published variable set.
    pub fn variables(&self) -> Arc<VariableSet> {
        self.inner.variables.borrow().clone()
    }

    /// Observe variable republication.
    pub fn subscribe_variables(&self) -> watch::Receiver<Arc<VariableSet>> {
        self.inner.variables.subscribe()
    }

    /// Receive the ids of feedbacks whose backing state changed.
    pub fn subscribe_feedbacks(&self) -> broadcast::Receiver<FeedbackId> {
        self.inner.feedback_tx.subscribe()
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Validate configuration, construct the transport client, run an
    /// initial connection check, and spawn the background tasks.
    ///
    /// With communications disabled this reports `Disconnected` and
    /// spawns nothing; an invalid address reports `BadConfig` without
    /// any network contact.
    pub async fn start(&self) -> Result<(), CoreError> {
        let config = self.config().await;
        if let Err(e) = config.validate() {
            warn!(host = %config.host, "invalid device address");
            self.set_status(HostStatus::BadConfig(e.to_string()));
            return Err(e);
        }
        if !config.enable_coms {
            self.set_status(HostStatus::Disconnected);
            return Ok(());
        }
        self.connect(&config).await
    }

    /// Replace the configuration. Reconstructs the transport client and
    /// re-runs the connection check; tasks tied to the previous client
    /// are stopped first.
    pub async fn update_config(&self, config: DeviceConfig) -> Result<(), CoreError> {
        *self.inner.config.lock().await = config.clone();

        self.inner.cancel_child.lock().await.cancel();
        *self.inner.client.lock().await = None;

        if let Err(e) = config.validate() {
            warn!(host = %config.host, "invalid device address");
            self.set_status(HostStatus::BadConfig(e.to_string()));
            return Err(e);
        }
        if !config.enable_coms {
            let _ = self.inner.connected.send(false);
            self.set_status(HostStatus::Disconnected);
            return Ok(());
        }
        self.connect(&config).await
    }

    /// Build the client, probe the device once, and spawn monitor and
    /// poll tasks under a fresh child cancel token.
    async fn connect(&self, config: &DeviceConfig) -> Result<(), CoreError> {
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        let client = Arc::new(DeviceClient::new(config.host.clone())?);
        client.set_comms_enabled(config.enable_coms);
        *self.inner.client.lock().await = Some(client);

        self.check_connection().await;

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(monitor::monitor_task(
            self.clone(),
            monitor::CHECK_PERIOD,
            child.clone(),
        )));
        handles.push(tokio::spawn(poller::fast_poll_task(
            self.clone(),
            poller::FAST_POLL_PERIOD,
            child.clone(),
        )));
        handles.push(tokio::spawn(poller::slow_poll_task(
            self.clone(),
            poller::SLOW_POLL_PERIOD,
            child,
        )));

        info!(host = %config.host, "device instance started");
        Ok(())
    }

    /// Stop all background tasks. The cache and its subscribers stay
    /// readable; only polling and monitoring cease.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        info!("device instance stopped");
    }

    // ── Connection ───────────────────────────────────────────────

    /// Probe the device once and update the status/connected watches.
    pub async fn check_connection(&self) -> HostStatus {
        let status = match self.current_client().await {
            Some(client) => monitor::connection_check(&client).await,
            None => HostStatus::Disconnected,
        };
        let _ = self.inner.connected.send(status.is_connected());
        self.set_status(status.clone());
        status
    }

    pub(crate) fn set_status(&self, status: HostStatus) {
        let previous = self.inner.host_status.send_replace(status.clone());
        if previous != status {
            info!(status = ?status, "host status changed");
        }
    }

    pub(crate) async fn current_client(&self) -> Option<Arc<DeviceClient>> {
        self.inner.client.lock().await.clone()
    }

    // ── Surfaces ─────────────────────────────────────────────────

    /// Rebuild and republish the variable set, merging over the
    /// previously published identifiers (stale ids keep last values).
    pub(crate) fn publish_variables(&self) {
        let previous: Arc<VariableSet> = self.inner.variables.borrow().clone();
        let merged = variables::merged(&previous, &self.inner.cache);
        // `send_replace` publishes even with zero receivers.
        self.inner.variables.send_replace(Arc::new(merged));
    }

    /// Tell subscribers which feedbacks to re-evaluate.
    pub(crate) fn notify_feedbacks(&self, ids: &[FeedbackId]) {
        for id in ids {
            // Errors only when nobody is subscribed.
            let _ = self.inner.feedback_tx.send(*id);
        }
    }

    /// Run one fast poll cycle immediately, outside the timer cadence
    /// (e.g. right after an action so feedback catches up without
    /// waiting for the next tick).
    pub async fn poll_now(&self) {
        poller::run_fast_cycle(self).await;
    }

    /// Run both poll cycles immediately.
    pub async fn refresh_all(&self) {
        poller::run_fast_cycle(self).await;
        poller::run_slow_cycle(self).await;
    }

    /// Execute one action against the device.
    pub async fn run_action(&self, action: Action) -> Result<ActionOutcome, CoreError> {
        let client = self.current_client().await.ok_or(CoreError::NotConnected)?;
        action::dispatch(&client, action).await
    }

    // ── Learn (current state → feedback options) ─────────────────

    /// Read the device's current output settings as feedback options.
    pub async fn learn_output_info(&self) -> Result<Option<OutputInfoMatch>, CoreError> {
        let client = self.current_client().await.ok_or(CoreError::NotConnected)?;
        let Some(env) = client.output_info().await? else {
            return Ok(None);
        };
        if !env.is_acceptable() {
            warn!("failed to learn output info: {}", env.reason());
            return Ok(None);
        }
        Ok(env.data.map(|d| OutputInfoMatch {
            format: d.format,
            audio_switch: d.audio_switch.to_string(),
            loop_out_switch: d.loop_out_switch.to_string(),
        }))
    }

    /// Read the device's current audio configuration as feedback options.
    pub async fn learn_audio_config(&self) -> Result<Option<AudioConfigMatch>, CoreError> {
        let client = self.current_client().await.ok_or(CoreError::NotConnected)?;
        let Some(env) = client.audio_config().await? else {
            return Ok(None);
        };
        if !env.is_acceptable() {
            warn!("failed to learn audio config: {}", env.reason());
            return Ok(None);
        }
        Ok(env.all.map(|all| {
            let profile = AudioProfile::from(&all);
            AudioConfigMatch {
                ai_type: profile.ai_type,
                switch: profile.switch,
                codec: profile.codec,
                bitrate: profile.bitrate,
                sample_rate: profile.sample_rate,
                channel: profile.channel,
                volume: profile.volume,
                ao_devtype: profile.ao_devtype,
            }
        }))
    }

    /// Read the device's current clock as feedback options.
    pub async fn learn_device_time(&self) -> Result<Option<DeviceTimeMatch>, CoreError> {
        let client = self.current_client().await.ok_or(CoreError::NotConnected)?;
        let Some(env) = client.device_time().await? else {
            return Ok(None);
        };
        if !env.is_acceptable() {
            warn!("failed to learn device time: {}", env.reason());
            return Ok(None);
        }
        Ok(env
            .data
            .as_ref()
            .and_then(convert::device_clock)
            .map(|clock| DeviceTimeMatch { iso: clock.iso }))
    }

    /// Read the device's current tally state as feedback options.
    pub async fn learn_tally(&self) -> Result<Option<TallyMatch>, CoreError> {
        let client = self.current_client().await.ok_or(CoreError::NotConnected)?;
        let Some(env) = client.tally_parameters().await? else {
            return Ok(None);
        };
        if !env.is_acceptable() {
            warn!("failed to learn tally: {}", env.reason());
            return Ok(None);
        }
        Ok(env.data.map(|d| TallyMatch {
            color_id: d.color_id.to_string(),
            mode_id: d.mode_id.to_string(),
        }))
    }
}
