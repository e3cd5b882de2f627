// ── Action surface ──
//
// Typed operation requests the host runtime can invoke. Dispatch is a
// straight mapping onto the transport client: transport failures are
// errors, device rejections are `ActionOutcome::Rejected` values (logged
// with their mapped reason, device state assumed unchanged), and a
// closed comms gate is `Skipped`.

use chrono::{DateTime, Utc};
use tracing::warn;

use zowiebox_api::camera::{
    ExposureSettings, ImageSettings, NoiseReductionSettings, WhiteBalanceSettings,
};
use zowiebox_api::client::Ack;
use zowiebox_api::ptz::{PtzCommand, PtzOperand, PtzSettings};
use zowiebox_api::record::{RecordingCommand, RecordingTaskUpdate};
use zowiebox_api::streamplay::{
    StreamOrder, StreamPublication, StreamSourceNew, StreamSourceUpdate,
};
use zowiebox_api::system::TallySettings;
use zowiebox_api::video::{NdiActivation, NdiConfig, OutputSettings, VideoEncoder};
use zowiebox_api::DeviceClient;

use crate::convert;
use crate::error::CoreError;

/// What happened to a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The device accepted the operation.
    Applied,
    /// The device rejected it; state on the device is unchanged.
    Rejected { code: String, reason: String },
    /// Comms are administratively disabled; nothing was attempted.
    Skipped,
}

/// All operations the host runtime can invoke against the device.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Output ───────────────────────────────────────────────────────
    SetOutput(OutputSettings),

    // ── Audio ────────────────────────────────────────────────────────
    SetAudioSwitch { on: bool },

    // ── PTZ ──────────────────────────────────────────────────────────
    PtzControl { command: PtzCommand, operand: PtzOperand },
    SetPtzConfig(PtzSettings),
    SetFocusMode { focusmode: i64 },
    SetFocusSpeed { focus: i64, save: bool },
    SetZoomSpeed { zoom: i64, save: bool },
    SetAfLock { locked: bool },
    SetDigitalZoom { zoom: f64, enable: bool, max: Option<f64> },
    SetAperture { aperture: i64 },

    // ── Encoding ─────────────────────────────────────────────────────
    ModifyEncoders(Vec<VideoEncoder>),

    // ── Decoding ─────────────────────────────────────────────────────
    AddDecodeSource(StreamSourceNew),
    DeleteDecodeSource { index: i64 },
    ModifyDecodeSource(StreamSourceUpdate),

    // ── NDI receive ──────────────────────────────────────────────────
    NdiFind,
    EnableNdiDecoding { ndi_name: String },
    DisableNdiDecoding,
    SetNdiReceiveGroups { groups: String },

    // ── NDI transmit ─────────────────────────────────────────────────
    ActivateNdi(NdiActivation),
    SetNdiConfig(NdiConfig),
    NdiSwitch { on: bool },

    // ── Streaming ────────────────────────────────────────────────────
    PublishStream(StreamPublication),
    DeleteStream { index: i64 },
    ReorderStreams(Vec<StreamOrder>),
    ToggleStream { index: i64, on: bool },

    // ── Device time ──────────────────────────────────────────────────
    /// Set the device clock to `at`, carrying over the device's current
    /// mode/zone/NTP settings (fetched first).
    SetDeviceTime { at: DateTime<Utc> },

    // ── Recording ────────────────────────────────────────────────────
    ControlRecording { index: String, command: RecordingCommand },
    ModifyRecordingTask(RecordingTaskUpdate),

    // ── Tally ────────────────────────────────────────────────────────
    SetTally(TallySettings),
    ToggleTally { on: bool },

    // ── Camera image pipeline ────────────────────────────────────────
    SetExposure(ExposureSettings),
    SetWhiteBalance(WhiteBalanceSettings),
    SetImage(ImageSettings),
    SetNoiseReduction(NoiseReductionSettings),
    SetStyle { selected_id: i64, save: bool },
    SetAeLock { locked: bool },

    // ── Power ────────────────────────────────────────────────────────
    Reboot,
}

/// Fold a write acknowledgement into an outcome, logging rejections.
fn ack_outcome(reply: Option<Ack>) -> ActionOutcome {
    match reply {
        None => ActionOutcome::Skipped,
        Some(ack) if ack.is_acceptable() => ActionOutcome::Applied,
        Some(ack) => {
            let reason = ack.reason();
            warn!(%reason, "device rejected action");
            ActionOutcome::Rejected {
                code: ack.status,
                reason,
            }
        }
    }
}

/// Execute one action against the device.
#[allow(clippy::too_many_lines)]
pub(crate) async fn dispatch(
    client: &DeviceClient,
    action: Action,
) -> Result<ActionOutcome, CoreError> {
    let reply = match action {
        Action::SetOutput(settings) => client.set_output_info(settings).await?,
        Action::SetAudioSwitch { on } => client.set_audio_switch(on).await?,

        Action::PtzControl { command, operand } => client.control_ptz(command, operand).await?,
        Action::SetPtzConfig(settings) => client.set_ptz_config(settings).await?,
        Action::SetFocusMode { focusmode } => client.set_focus_mode(focusmode).await?,
        Action::SetFocusSpeed { focus, save } => client.set_focus_speed(focus, save).await?,
        Action::SetZoomSpeed { zoom, save } => client.set_zoom_speed(zoom, save).await?,
        Action::SetAfLock { locked } => client.set_af_lock(locked).await?,
        Action::SetDigitalZoom { zoom, enable, max } => {
            client.set_digital_zoom(zoom, enable, max).await?
        }
        Action::SetAperture { aperture } => client.set_aperture(aperture).await?,

        Action::ModifyEncoders(venc) => client.modify_encoding_parameters(&venc).await?,

        Action::AddDecodeSource(source) => client.add_decode_source(source).await?,
        Action::DeleteDecodeSource { index } => client.delete_decode_source(index).await?,
        Action::ModifyDecodeSource(update) => client.modify_decode_source(update).await?,

        Action::NdiFind => client.ndi_find().await?,
        Action::EnableNdiDecoding { ndi_name } => client.enable_ndi_decoding(&ndi_name).await?,
        Action::DisableNdiDecoding => client.disable_ndi_decoding().await?,
        Action::SetNdiReceiveGroups { groups } => client.set_ndi_receive_groups(&groups).await?,

        Action::ActivateNdi(activation) => client.activate_ndi(activation).await?,
        Action::SetNdiConfig(config) => client.set_ndi_config(config).await?,
        Action::NdiSwitch { on } => client.ndi_switch(on).await?,

        Action::PublishStream(publication) => client.publish_stream(publication).await?,
        Action::DeleteStream { index } => client.delete_stream(index).await?,
        Action::ReorderStreams(order) => client.reorder_streams(&order).await?,
        Action::ToggleStream { index, on } => client.toggle_stream(index, on).await?,

        Action::SetDeviceTime { at } => {
            // Fetch the current settings first so the write only moves
            // the clock, not the mode/zone/NTP configuration.
            let current = match client.device_time().await? {
                None => return Ok(ActionOutcome::Skipped),
                Some(env) if env.is_acceptable() => env.data.unwrap_or_default(),
                Some(env) => {
                    let reason = env.reason();
                    warn!(%reason, "could not read device time before set");
                    return Ok(ActionOutcome::Rejected {
                        code: env.status,
                        reason,
                    });
                }
            };
            let payload = convert::device_time_payload(at, &current);
            client.set_device_time(payload).await?
        }

        Action::ControlRecording { index, command } => {
            client.control_recording(&index, command).await?
        }
        Action::ModifyRecordingTask(update) => client.modify_recording_task(update).await?,

        Action::SetTally(settings) => client.set_tally_parameters(settings).await?,
        Action::ToggleTally { on } => client.toggle_tally(on).await?,

        Action::SetExposure(settings) => client.set_exposure_info(settings).await?,
        Action::SetWhiteBalance(settings) => client.set_white_balance(settings).await?,
        Action::SetImage(settings) => client.set_image_info(settings).await?,
        Action::SetNoiseReduction(settings) => client.set_noise_reduction(settings).await?,
        Action::SetStyle { selected_id, save } => {
            client.set_style_info(selected_id, save).await?
        }
        Action::SetAeLock { locked } => client.set_ae_lock(locked).await?,

        Action::Reboot => client.reboot().await?,
    };
    Ok(ack_outcome(reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ack(status: &str) -> Ack {
        Ack {
            status: status.to_owned(),
            rsp: String::new(),
            data: None,
        }
    }

    #[test]
    fn acceptable_ack_is_applied() {
        assert_eq!(ack_outcome(Some(ack("000000"))), ActionOutcome::Applied);
        assert_eq!(ack_outcome(Some(ack("00000"))), ActionOutcome::Applied);
    }

    #[test]
    fn rejection_carries_code_and_reason() {
        assert_eq!(
            ack_outcome(Some(ack("110001"))),
            ActionOutcome::Rejected {
                code: "110001".into(),
                reason: "TaskAlreadyStarted (110001)".into(),
            }
        );
    }

    #[test]
    fn closed_gate_is_skipped() {
        assert_eq!(ack_outcome(None), ActionOutcome::Skipped);
    }
}
