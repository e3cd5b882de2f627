// Video route endpoints
//
// Input signal detection, HDMI output settings, digital zoom, encoder
// parameters, and the NDI encode-side configuration. Wire models use
// `#[serde(default)]` liberally because field presence varies across
// firmware versions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{Ack, CallOption, DataCall, DeviceClient, Envelope, Feature, Group, GroupCall, Opt, OpCall};
use crate::error::Error;

// ── Input signal ─────────────────────────────────────────────────────

/// Detected HDMI input signal, from `get_input_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSignal {
    /// 0 = no signal, 1 = signal present.
    #[serde(default)]
    pub hdmi_signal: u8,
    /// Embedded audio sample rate in Hz; 0 when absent.
    #[serde(default)]
    pub audio_signal: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub framerate: f64,
    /// Display string, e.g. `"1920x1080P60"`.
    #[serde(default)]
    pub desc: String,
}

// ── Output info ──────────────────────────────────────────────────────

/// HDMI output state, from `get_output_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInfo {
    #[serde(default)]
    pub switch: Option<u8>,
    /// Output resolution token, e.g. `"1080p60"`.
    #[serde(default)]
    pub format: String,
    /// 0 = mute, 1 = unmute.
    #[serde(default)]
    pub audio_switch: u8,
    /// 0 = output, 1 = loop out.
    #[serde(default)]
    pub loop_out_switch: u8,
}

/// Payload for `set_output_info`.
#[derive(Debug, Clone, Serialize)]
pub struct OutputSettings {
    pub format: String,
    pub audio_switch: u8,
    pub loop_out_switch: u8,
}

// ── Digital zoom ─────────────────────────────────────────────────────

/// Digital zoom state. This endpoint answers with bare top-level fields
/// next to `status` instead of the usual `data` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct DigitalZoomInfo {
    pub status: String,
    #[serde(default)]
    pub rsp: String,
    #[serde(default)]
    pub digital_zoom: f64,
    #[serde(default)]
    pub digital_zoom_enable: u8,
    #[serde(default)]
    pub digital_zoom_max: f64,
}

impl DigitalZoomInfo {
    pub fn is_acceptable(&self) -> bool {
        crate::status::is_acceptable(&self.status)
    }
}

#[derive(Debug, Serialize)]
struct DigitalZoomSet {
    group: Group,
    digital_zoom: f64,
    digital_zoom_enable: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    digital_zoom_max: Option<f64>,
}

// ── Encoder parameters ───────────────────────────────────────────────

/// One entry of the device's supported-resolution list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionDesc {
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// A `{selected_id, ..._list}` pair as the device renders choice fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub selected_id: i64,
    /// The list key varies per field (`codec_list`, `mode_list`, ...);
    /// capture whichever one is present.
    #[serde(flatten)]
    pub lists: serde_json::Map<String, serde_json::Value>,
}

/// Per-channel encoder settings, both read and written as a `venc` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoEncoder {
    #[serde(default)]
    pub venc_chnid: i64,
    #[serde(default, rename = "followVI", skip_serializing_if = "Option::is_none")]
    pub follow_vi: Option<i64>,
    #[serde(default)]
    pub codec: Selection,
    #[serde(default)]
    pub profile: Selection,
    #[serde(default)]
    pub ratecontrol: Selection,
    #[serde(default)]
    pub bitrate: i64,
    #[serde(default)]
    pub ndi_bitrate_pre: i64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub framerate: f64,
    #[serde(default)]
    pub keyinterval: i64,
    #[serde(default)]
    pub gop: i64,
    #[serde(default, rename = "MaxQP")]
    pub max_qp: i64,
    #[serde(default, rename = "MinQP")]
    pub min_qp: i64,
    #[serde(default, rename = "keyMinQP")]
    pub key_min_qp: i64,
    #[serde(default, rename = "QPlevel")]
    pub qp_level: i64,
    #[serde(default)]
    pub rotate: Selection,
    #[serde(default)]
    pub stream_id: i64,
    #[serde(default)]
    pub desc: String,
}

/// Bulk encoder state, from the `all`-group read on the video route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EncodingInfo {
    #[serde(default)]
    pub resolution_list: Vec<ResolutionDesc>,
    #[serde(default)]
    pub output_list: Vec<String>,
    #[serde(default)]
    pub venc: Vec<VideoEncoder>,
}

#[derive(Debug, Serialize)]
struct EncodingSet<'a> {
    group: Group,
    venc: &'a [VideoEncoder],
}

// ── NDI (encode side) ────────────────────────────────────────────────

/// NDI transmit configuration, from `ndi`-group `get_config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdiConfig {
    #[serde(default)]
    pub authorization_code: String,
    #[serde(default)]
    pub ndi_mode: i64,
    #[serde(default)]
    pub network_bandwidth: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NdiActivation {
    pub license_key: String,
}

#[derive(Debug, Serialize)]
struct NdiSwitchSet {
    switch_value: u8,
}

impl DeviceClient {
    // ── Input / output ───────────────────────────────────────────

    /// Detected input signal.
    ///
    /// `POST /video?option=getinfo` with `hdmi/get_input_info`
    pub async fn input_signal(&self) -> Result<Option<Envelope<InputSignal>>, Error> {
        let req = OpCall { group: Group::Hdmi, opt: Opt::GetInputInfo };
        self.call(Feature::Video, CallOption::GetInfo, &req).await
    }

    /// Current HDMI output settings.
    ///
    /// `POST /video?option=getinfo` with `hdmi/get_output_info`
    pub async fn output_info(&self) -> Result<Option<Envelope<OutputInfo>>, Error> {
        let req = OpCall { group: Group::Hdmi, opt: Opt::GetOutputInfo };
        self.call(Feature::Video, CallOption::GetInfo, &req).await
    }

    /// Apply HDMI output settings.
    pub async fn set_output_info(&self, settings: OutputSettings) -> Result<Option<Ack>, Error> {
        debug!(format = %settings.format, "setting output info");
        let req = DataCall { group: Group::Hdmi, opt: Opt::SetOutputInfo, data: settings };
        self.call(Feature::Video, CallOption::SetInfo, &req).await
    }

    // ── Digital zoom ─────────────────────────────────────────────

    /// Digital zoom state (bare-field response shape).
    pub async fn digital_zoom(&self) -> Result<Option<DigitalZoomInfo>, Error> {
        let req = GroupCall { group: Group::DigitalZoom };
        self.call(Feature::Video, CallOption::GetInfo, &req).await
    }

    /// Set digital zoom level and enablement.
    pub async fn set_digital_zoom(
        &self,
        digital_zoom: f64,
        enable: bool,
        max: Option<f64>,
    ) -> Result<Option<Ack>, Error> {
        let req = DigitalZoomSet {
            group: Group::DigitalZoom,
            digital_zoom,
            digital_zoom_enable: u8::from(enable),
            digital_zoom_max: max,
        };
        self.call(Feature::Video, CallOption::SetInfo, &req).await
    }

    // ── Encoding ─────────────────────────────────────────────────

    /// All encoder channels plus the supported resolution/output lists.
    pub async fn encoding_parameters(&self) -> Result<Option<Envelope<EncodingInfo>>, Error> {
        let req = GroupCall { group: Group::All };
        self.call(Feature::Video, CallOption::GetInfo, &req).await
    }

    /// Modify encoder channels. The device expects the full `venc`
    /// array, not a delta.
    pub async fn modify_encoding_parameters(
        &self,
        venc: &[VideoEncoder],
    ) -> Result<Option<Ack>, Error> {
        debug!(channels = venc.len(), "modifying encoder parameters");
        let req = EncodingSet { group: Group::Venc, venc };
        self.call(Feature::Video, CallOption::SetInfo, &req).await
    }

    // ── NDI (encode side) ────────────────────────────────────────

    /// Activate NDI with a license key.
    pub async fn activate_ndi(&self, activation: NdiActivation) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Ndi, opt: Opt::NdiActivate, data: activation };
        self.call(Feature::Video, CallOption::SetInfo, &req).await
    }

    /// Saved NDI authorization code.
    pub async fn saved_auth_code(&self) -> Result<Option<Ack>, Error> {
        let req = OpCall { group: Group::Ndi, opt: Opt::GetAuthCode };
        self.call(Feature::Video, CallOption::GetInfo, &req).await
    }

    /// NDI transmit configuration.
    pub async fn ndi_config(&self) -> Result<Option<Envelope<NdiConfig>>, Error> {
        let req = OpCall { group: Group::Ndi, opt: Opt::GetConfig };
        self.call(Feature::Video, CallOption::GetInfo, &req).await
    }

    /// Apply NDI transmit configuration.
    pub async fn set_ndi_config(&self, config: NdiConfig) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Ndi, opt: Opt::SetConfig, data: config };
        self.call(Feature::Video, CallOption::SetInfo, &req).await
    }

    /// Toggle NDI transmission on or off.
    pub async fn ndi_switch(&self, on: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Ndi,
            opt: Opt::NdiSwitch,
            data: NdiSwitchSet { switch_value: u8::from(on) },
        };
        self.call(Feature::Video, CallOption::SetInfo, &req).await
    }
}
