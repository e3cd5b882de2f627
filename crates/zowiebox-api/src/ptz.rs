// PTZ route endpoints
//
// Camera motion control plus the focus/zoom sub-settings. Motion
// commands all go through one `control` operation keyed by a numeric
// opid; the opid vocabulary is captured in `PtzCommand`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{Ack, CallOption, DataCall, DeviceClient, Envelope, Feature, Group, Opt, OpCall};
use crate::error::Error;
use crate::video::Selection;

// ── Control vocabulary ───────────────────────────────────────────────

/// PTZ `control` operation ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PtzCommand {
    PanLeftOneStep,
    PanLeftContinuous,
    PanRightOneStep,
    PanRightContinuous,
    TiltUpOneStep,
    TiltDownOneStep,
    TiltDownContinuous,
    /// Absolute pan; `data.value` 0..=8000.
    HorizontalPosition,
    /// Absolute tilt; `data.value` 0..=2100.
    VerticalPosition,
    FocusNearOneStep,
    FocusNearContinuous,
    FocusFarOneStep,
    FocusFarContinuous,
    OnePushFocus,
    SetPreset,
    DeletePreset,
    CallPreset,
}

impl PtzCommand {
    pub(crate) fn opid(self) -> u32 {
        match self {
            Self::PanLeftOneStep => 1,
            Self::PanLeftContinuous => 2,
            Self::PanRightOneStep => 3,
            Self::PanRightContinuous => 4,
            Self::HorizontalPosition => 5,
            Self::TiltUpOneStep => 7,
            Self::TiltDownOneStep => 8,
            Self::TiltDownContinuous => 9,
            Self::VerticalPosition => 10,
            Self::FocusNearOneStep => 19,
            Self::FocusNearContinuous => 20,
            Self::FocusFarOneStep => 21,
            Self::FocusFarContinuous => 22,
            Self::OnePushFocus => 25,
            Self::SetPreset => 26,
            Self::DeletePreset => 28,
            Self::CallPreset => 29,
        }
    }
}

/// Focus-area point shared by focus-zone and one-push-focus payloads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusPoint {
    pub x_percent: f64,
    pub y_percent: f64,
    pub d_pixel: f64,
}

/// Optional operands for a `control` call (absolute positions, preset
/// ids, focus points).
#[derive(Debug, Clone, Default, Serialize)]
pub struct PtzOperand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<FocusPoint>,
}

impl PtzOperand {
    fn is_empty(&self) -> bool {
        self.value.is_none() && self.id.is_none() && self.desc.is_none() && self.point.is_none()
    }
}

#[derive(Debug, Serialize)]
struct PtzControl {
    group: Group,
    opt: Opt,
    opid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<PtzOperand>,
}

// ── PTZ configuration ────────────────────────────────────────────────

/// One protocol entry in the PTZ protocol list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtzProtocolItem {
    #[serde(default)]
    pub index: i64,
    /// The wire really does spell it `lable`.
    #[serde(default, rename = "lable")]
    pub label: String,
    #[serde(default)]
    pub r#type: Option<u8>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub port: Option<u32>,
    #[serde(default)]
    pub onvif_port: Option<u32>,
    #[serde(default)]
    pub soap_port: Option<u32>,
    #[serde(default)]
    pub addr: Option<i64>,
    #[serde(default)]
    pub addr_fix: Option<u8>,
    #[serde(default)]
    pub baudrate_id: Option<i64>,
}

/// PTZ transport configuration, from `get_ptz_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PtzConfig {
    /// Protocol id: "0" auto, "1" VISCA over IP, "3" VISCA, "4"/"5" Pelco.
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub protocol_list: Vec<PtzProtocolItem>,
    #[serde(default)]
    pub usb2serial: u8,
}

/// Payload for `set_ptz_info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PtzSettings {
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baudrate_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_fix: Option<u8>,
}

// ── Focus / zoom sub-settings ────────────────────────────────────────

/// `{selected_id, focusmode_list}` and friends all decode as `Selection`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSpeed {
    #[serde(default)]
    pub focus: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomSpeed {
    #[serde(default)]
    pub zoom: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfLockStatus {
    #[serde(default)]
    pub af_lock_status: u8,
}

/// Aperture state, from `get_aperture`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApertureInfo {
    #[serde(default)]
    pub selected_id: i64,
    #[serde(default)]
    pub max_aperture_id: i64,
    #[serde(default)]
    pub aperture_id: i64,
    #[serde(default)]
    pub aperture_list: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FocusModeSet {
    focusmode: i64,
}

#[derive(Debug, Serialize)]
struct SelectedIdSet {
    selected_id: i64,
}

#[derive(Debug, Serialize)]
struct FocusZoneSet {
    selected_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    point: Option<FocusPoint>,
}

#[derive(Debug, Serialize)]
struct FocusSpeedSet {
    focus: i64,
    save_flag: u8,
}

#[derive(Debug, Serialize)]
struct ZoomSpeedSet {
    zoom: i64,
    save_flag: u8,
}

#[derive(Debug, Serialize)]
struct AfLockSet {
    af_lock_status: u8,
}

#[derive(Debug, Serialize)]
struct ApertureSet {
    aperture: i64,
}

impl DeviceClient {
    // ── Configuration ────────────────────────────────────────────

    /// PTZ transport configuration.
    pub async fn ptz_config(&self) -> Result<Option<Envelope<PtzConfig>>, Error> {
        let req = OpCall { group: Group::Ptz, opt: Opt::GetPtzInfo };
        self.call(Feature::Ptz, CallOption::GetInfo, &req).await
    }

    /// Apply PTZ transport configuration.
    pub async fn set_ptz_config(&self, settings: PtzSettings) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Ptz, opt: Opt::SetPtzInfo, data: settings };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    // ── Motion control ───────────────────────────────────────────

    /// Issue one PTZ motion/preset command.
    pub async fn control_ptz(
        &self,
        command: PtzCommand,
        operand: PtzOperand,
    ) -> Result<Option<Ack>, Error> {
        debug!(opid = command.opid(), "PTZ control");
        let req = PtzControl {
            group: Group::Ptz,
            opt: Opt::Control,
            opid: command.opid(),
            data: if operand.is_empty() { None } else { Some(operand) },
        };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    // ── Focus / zoom reads ───────────────────────────────────────

    /// Focus mode (`{selected_id, focusmode_list}`).
    pub async fn focus_mode(&self) -> Result<Option<Envelope<Selection>>, Error> {
        let req = OpCall { group: Group::Ptz, opt: Opt::GetFocusmode };
        self.call(Feature::Ptz, CallOption::GetInfo, &req).await
    }

    /// AF sensitivity (`{selected_id, sensitivity_list}`).
    pub async fn af_sensitivity(&self) -> Result<Option<Envelope<Selection>>, Error> {
        let req = OpCall { group: Group::Ptz, opt: Opt::GetSensitivity };
        self.call(Feature::Ptz, CallOption::GetInfo, &req).await
    }

    /// Focus zone (`{selected_id, zone_list, point?}`).
    pub async fn focus_zone(&self) -> Result<Option<Envelope<Selection>>, Error> {
        let req = OpCall { group: Group::Ptz, opt: Opt::GetFocusZone };
        self.call(Feature::Ptz, CallOption::GetInfo, &req).await
    }

    /// Focus speed.
    pub async fn focus_speed(&self) -> Result<Option<Envelope<FocusSpeed>>, Error> {
        let req = OpCall { group: Group::Ptz, opt: Opt::GetFocusSpeed };
        self.call(Feature::Ptz, CallOption::GetInfo, &req).await
    }

    /// AF lock status.
    pub async fn af_lock_status(&self) -> Result<Option<Envelope<AfLockStatus>>, Error> {
        let req = OpCall { group: Group::Ptz, opt: Opt::GetAfLockStatus };
        self.call(Feature::Ptz, CallOption::GetInfo, &req).await
    }

    /// Zoom speed.
    pub async fn zoom_speed(&self) -> Result<Option<Envelope<ZoomSpeed>>, Error> {
        let req = OpCall { group: Group::Ptz, opt: Opt::GetZoomSpeed };
        self.call(Feature::Ptz, CallOption::GetInfo, &req).await
    }

    /// Aperture state. The vendor routes this read through `setinfo`.
    pub async fn aperture(&self) -> Result<Option<Envelope<ApertureInfo>>, Error> {
        let req = OpCall { group: Group::Ptz, opt: Opt::GetAperture };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    // ── Focus / zoom writes ──────────────────────────────────────

    /// Set the focus mode by index.
    pub async fn set_focus_mode(&self, focusmode: i64) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Ptz,
            opt: Opt::SetFocusMode,
            data: FocusModeSet { focusmode },
        };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    /// Set AF sensitivity by index.
    pub async fn set_af_sensitivity(&self, selected_id: i64) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Ptz,
            opt: Opt::SetSensitivity,
            data: SelectedIdSet { selected_id },
        };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    /// Set the focus zone, optionally with an explicit focus point.
    pub async fn set_focus_zone(
        &self,
        selected_id: i64,
        point: Option<FocusPoint>,
    ) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Ptz,
            opt: Opt::SetFocusZone,
            data: FocusZoneSet { selected_id, point },
        };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    /// Set the focus speed; `save` persists it across reboots.
    pub async fn set_focus_speed(&self, focus: i64, save: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Ptz,
            opt: Opt::SetFocusSpeed,
            data: FocusSpeedSet { focus, save_flag: u8::from(save) },
        };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    /// Lock or unlock autofocus.
    pub async fn set_af_lock(&self, locked: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Ptz,
            opt: Opt::SetAfLockStatus,
            data: AfLockSet { af_lock_status: u8::from(locked) },
        };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    /// Set the zoom speed; `save` persists it across reboots.
    pub async fn set_zoom_speed(&self, zoom: i64, save: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Ptz,
            opt: Opt::SetZoomSpeed,
            data: ZoomSpeedSet { zoom, save_flag: u8::from(save) },
        };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }

    /// Set the aperture by index.
    pub async fn set_aperture(&self, aperture: i64) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Ptz,
            opt: Opt::SetAperture,
            data: ApertureSet { aperture },
        };
        self.call(Feature::Ptz, CallOption::SetInfo, &req).await
    }
}
