// ZowieBox HTTP client
//
// Wraps `reqwest::Client` with ZowieBox-specific URL construction, the
// `{group, opt, data?}` request envelope, and the administrative comms
// gate. All endpoint modules (video, audio, record, etc.) are implemented
// as inherent methods via separate files to keep this module focused on
// transport mechanics.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::error::Error;
use crate::status::{self, Outcome};

/// Default transport timeout. The device answers on the LAN in tens of
/// milliseconds; anything slower than this is a dead link.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ── Wire vocabulary ──────────────────────────────────────────────────

/// Device feature route. Selects the URL path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Video,
    Audio,
    System,
    Record,
    Streamplay,
    Ptz,
    Camera,
}

impl Feature {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::System => "system",
            Self::Record => "record",
            Self::Streamplay => "streamplay",
            Self::Ptz => "ptz",
            Self::Camera => "camera",
        }
    }
}

/// The `option` query parameter: read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOption {
    GetInfo,
    SetInfo,
}

impl CallOption {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::GetInfo => "getinfo",
            Self::SetInfo => "setinfo",
        }
    }
}

/// The `group` routing field identifying a feature area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Group {
    Hdmi,
    Ptz,
    All,
    Venc,
    Streamplay,
    StreamplayNdi,
    Ndi,
    Audio,
    Publish,
    Systime,
    Record,
    TallyLed,
    Syscontrol,
    Camera,
    DigitalZoom,
}

/// The `opt` routing field identifying a sub-operation within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Opt {
    GetInputInfo,
    GetOutputInfo,
    SetOutputInfo,
    GetPtzInfo,
    SetPtzInfo,
    Control,
    StreamplayAdd,
    StreamplayGetAll,
    StreamplayDel,
    StreamplayModify,
    GetDecoderState,
    NdiFind,
    NdiGetAll,
    NdiRecv,
    NdiClose,
    NdiGetRecvConfig,
    NdiSetRecvConfig,
    NdiActivate,
    GetAuthCode,
    GetConfig,
    SetConfig,
    NdiSwitch,
    SetAudioSwitch,
    AddPublishInfo,
    DelPublishInfo,
    UpdateStreamsIndex,
    UpdatePublishSwitch,
    GetSystimeInfo,
    SetSystimeInfo,
    GetStatus,
    GetTaskList,
    ModifyTask,
    SetTaskEnable,
    GetTallyLedInfo,
    SetTallyLedInfo,
    SetTallyLedSwitch,
    GetTallyLedColor,
    SetRebootInfo,
    SetResetInfo,
    SetFocusMode,
    SetSensitivity,
    SetFocusZone,
    SetFocusSpeed,
    SetAfLockStatus,
    SetZoomSpeed,
    GetFocusmode,
    GetSensitivity,
    GetFocusZone,
    GetFocusSpeed,
    GetAfLockStatus,
    GetZoomSpeed,
    GetExposureInfo,
    SetExposureInfo,
    GetAperture,
    SetAperture,
    GetWhiteBalanceInfo,
    SetWhiteBalanceInfo,
    GetImageInfo,
    SetImageInfo,
    GetNrInfo,
    SetNrInfo,
    GetStyleInfo,
    SetStyleInfo,
    GetAeLockStatus,
    SetAeLockStatus,
}

// ── Request envelopes ────────────────────────────────────────────────

/// `{ group, opt }` — a read or parameterless command.
#[derive(Debug, Serialize)]
pub(crate) struct OpCall {
    pub group: Group,
    pub opt: Opt,
}

/// `{ group, opt, data }` — the common write shape.
#[derive(Debug, Serialize)]
pub(crate) struct DataCall<D: Serialize> {
    pub group: Group,
    pub opt: Opt,
    pub data: D,
}

/// `{ group }` — bulk reads keyed on the group alone.
#[derive(Debug, Serialize)]
pub(crate) struct GroupCall {
    pub group: Group,
}

// ── Response envelope ────────────────────────────────────────────────

/// Standard ZowieBox response envelope: `{ status, rsp, data? }`.
///
/// `data` is absent on rejections and on write acknowledgements. A few
/// endpoints use bespoke top-level shapes instead (audio's `all`, digital
/// zoom's bare fields); those get their own decoder types in their
/// endpoint modules.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub rsp: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Classify the status code.
    pub fn outcome(&self) -> Outcome {
        Outcome::from_code(&self.status)
    }

    /// Whether callers should apply `data`.
    pub fn is_acceptable(&self) -> bool {
        status::is_acceptable(&self.status)
    }

    /// Human-readable reason for the status code.
    pub fn reason(&self) -> String {
        status::describe(&self.status)
    }
}

/// Write acknowledgement with no payload of interest.
pub type Ack = Envelope<serde_json::Value>;

// ── Client ───────────────────────────────────────────────────────────

/// HTTP client for one ZowieBox appliance.
///
/// Holds a single shared `reqwest::Client`; `zowiebox-core` constructs a
/// fresh `DeviceClient` whenever the configured host address changes.
/// Every call is a stateless POST/response pair — the device keeps no
/// session state and the client keeps no cookies.
pub struct DeviceClient {
    http: reqwest::Client,
    host: String,
    /// Administrative gate. When cleared, calls return `Ok(None)` without
    /// touching the network; callers must treat that as "not yet known".
    comms_enabled: AtomicBool,
    /// Count of requests actually handed to the transport.
    requests_sent: AtomicU64,
}

impl DeviceClient {
    /// Create a client for the appliance at `host` (address or
    /// `address:port`).
    pub fn new(host: impl Into<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("zowiebox-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Transport)?;
        Ok(Self::with_client(http, host))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, host: impl Into<String>) -> Self {
        Self {
            http,
            host: host.into(),
            comms_enabled: AtomicBool::new(true),
            requests_sent: AtomicU64::new(0),
        }
    }

    /// The configured device host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Open or close the administrative comms gate.
    pub fn set_comms_enabled(&self, enabled: bool) {
        self.comms_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether the comms gate is open.
    pub fn comms_enabled(&self) -> bool {
        self.comms_enabled.load(Ordering::Relaxed)
    }

    /// Number of requests that reached the transport layer.
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    /// Build the URL for one feature route:
    /// `http://{host}/{feature}?option={option}&login_check_flag=1`
    fn endpoint_url(&self, feature: Feature, option: CallOption) -> Result<Url, Error> {
        // Bare IPv6 addresses need brackets in a URL authority.
        let host: &str = &self.host;
        let authority = if host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let full = format!(
            "http://{authority}/{}?option={}&login_check_flag=1",
            feature.as_str(),
            option.as_str(),
        );
        Ok(Url::parse(&full)?)
    }

    /// POST one JSON envelope and decode the response body as `T`.
    ///
    /// Returns `Ok(None)` without network I/O when comms are disabled.
    /// Transport and decode failures are logged at error severity and
    /// propagated; the device's own rejections are *not* errors — they
    /// come back inside the decoded response.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        feature: Feature,
        option: CallOption,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        if !self.comms_enabled() {
            debug!("comms disabled, skipping request");
            return Ok(None);
        }

        let url = self.endpoint_url(feature, option)?;
        debug!("POST {url}");
        self.requests_sent.fetch_add(1, Ordering::Relaxed);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                error!(error = %e, "request failed");
                Error::Transport(e)
            })?;

        let text = resp.text().await.map_err(Error::Transport)?;
        let decoded = serde_json::from_str::<T>(&text).map_err(|e| {
            let preview = &text[..text.len().min(200)];
            error!(error = %e, body = preview, "response decode failed");
            Error::Deserialization {
                message: e.to_string(),
                body: text.clone(),
            }
        })?;
        Ok(Some(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_and_opt_serialize_to_wire_names() {
        #[allow(clippy::unwrap_used)]
        fn json(v: impl Serialize) -> String {
            serde_json::to_string(&v).unwrap()
        }
        assert_eq!(json(Group::StreamplayNdi), "\"streamplay_ndi\"");
        assert_eq!(json(Group::TallyLed), "\"tally_led\"");
        assert_eq!(json(Group::DigitalZoom), "\"digital_zoom\"");
        assert_eq!(json(Opt::GetInputInfo), "\"get_input_info\"");
        assert_eq!(json(Opt::GetFocusmode), "\"get_focusmode\"");
        assert_eq!(json(Opt::NdiSetRecvConfig), "\"ndi_set_recv_config\"");
    }

    #[test]
    fn envelope_without_data_decodes() {
        let env: Ack =
            serde_json::from_str(r#"{"status":"110001","rsp":"failed"}"#).expect("decode");
        assert!(!env.is_acceptable());
        assert_eq!(env.reason(), "TaskAlreadyStarted (110001)");
        assert!(env.data.is_none());
    }
}
