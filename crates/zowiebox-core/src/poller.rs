// ── Poller / reconciler ──
//
// Two periodic tasks mirror device state into the cache. Each cycle
// launches its whole read batch concurrently and awaits all of it; a
// slow or failing call delays that cycle but never queues another —
// missed ticks are skipped, so cycles cannot overlap or pile up.
//
// Per call: acceptable result → convert, swap the slot, note the
// dependent feedback; rejection → log the mapped reason, slot untouched;
// transport error → no update this cycle (the monitor will downgrade
// the link on its own probe).

use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use zowiebox_api::{Envelope, Error as ApiError};

use crate::controller::Controller;
use crate::convert;
use crate::feedback::FeedbackId;
use crate::model::AudioProfile;

/// Fast-cycle period: the state that drives button feedback.
pub(crate) const FAST_POLL_PERIOD: Duration = Duration::from_secs(1);

/// Slow-cycle period: discovery and storage specifics.
pub(crate) const SLOW_POLL_PERIOD: Duration = Duration::from_secs(5);

/// Unwrap one poll reply: `Some(data)` only for an acceptable response
/// that actually carried a payload. Everything else is logged and
/// yields `None`, leaving the cache slot untouched.
fn accepted<T>(what: &str, reply: Result<Option<Envelope<T>>, ApiError>) -> Option<T> {
    match reply {
        Ok(Some(env)) if env.is_acceptable() => env.data,
        Ok(Some(env)) => {
            warn!("failed to get {what}: {}", env.reason());
            None
        }
        // Comms gate closed mid-cycle; treat as not yet known.
        Ok(None) => None,
        Err(e) => {
            debug!(error = %e, "{what} fetch failed");
            None
        }
    }
}

/// One fast reconciliation pass. Gated on "comms enabled AND client
/// constructed AND currently connected"; a failed gate is a no-op.
pub(crate) async fn run_fast_cycle(controller: &Controller) {
    let Some(client) = controller.current_client().await else {
        return;
    };
    if !client.comms_enabled() || !controller.is_connected() {
        return;
    }

    let (output, audio, time, tally, tasks, input) = tokio::join!(
        client.output_info(),
        client.audio_config(),
        client.device_time(),
        client.tally_parameters(),
        client.recording_task_list(),
        client.input_signal(),
    );

    let cache = controller.cache();
    let mut changed: Vec<FeedbackId> = Vec::new();

    if let Some(data) = accepted("output info", output) {
        cache.output_info.store(data);
        changed.push(FeedbackId::OutputInfo);
    }

    // Audio arrives in its own `all`-keyed envelope shape.
    match audio {
        Ok(Some(env)) if env.is_acceptable() => {
            if let Some(all) = env.all {
                cache.audio.store(AudioProfile::from(&all));
                changed.push(FeedbackId::AudioConfig);
            }
        }
        Ok(Some(env)) => warn!("failed to get audio config: {}", env.reason()),
        Ok(None) => {}
        Err(e) => debug!(error = %e, "audio config fetch failed"),
    }

    if let Some(data) = accepted("device time", time) {
        // An implausible calendar is treated like a missing field.
        if let Some(clock) = convert::device_clock(&data) {
            cache.clock.store(clock);
            changed.push(FeedbackId::DeviceTime);
        } else {
            warn!(time = ?data.time, "device reported an impossible calendar");
        }
    }

    if let Some(data) = accepted("tally", tally) {
        cache.tally.store((&data).into());
        changed.push(FeedbackId::Tally);
    }

    if let Some(data) = accepted("recording task list", tasks) {
        cache.recording_tasks.store(data);
        changed.push(FeedbackId::RecordingStatus);
    }

    if let Some(data) = accepted("input signal", input) {
        cache.input_signal.store(data);
    }

    cache.last_poll.send_replace(Some(Utc::now()));
    controller.publish_variables();
    controller.notify_feedbacks(&changed);
}

/// One slow reconciliation pass: NDI discovery results and aggregate
/// storage status. Same gate and application rules as the fast cycle.
pub(crate) async fn run_slow_cycle(controller: &Controller) {
    let Some(client) = controller.current_client().await else {
        return;
    };
    if !client.comms_enabled() || !controller.is_connected() {
        return;
    }

    let (sources, storage) = tokio::join!(client.ndi_sources(), client.recording_status());

    let cache = controller.cache();

    if let Some(data) = accepted("ndi sources", sources) {
        cache.ndi_sources.store(data);
    }

    if let Some(data) = accepted("recording status", storage) {
        cache.recording_status.store(data);
    }

    controller.publish_variables();
}

pub(crate) async fn fast_poll_task(
    controller: Controller,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                run_fast_cycle(&controller).await;
            }
        }
    }
}

pub(crate) async fn slow_poll_task(
    controller: Controller,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                run_slow_cycle(&controller).await;
            }
        }
    }
}
