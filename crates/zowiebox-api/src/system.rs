// System route endpoints
//
// Device clock, tally LED, and reboot.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{Ack, CallOption, DataCall, DeviceClient, Envelope, Feature, Group, Opt, OpCall};
use crate::error::Error;

// ── Device time ──────────────────────────────────────────────────────

/// Calendar fields as the device clock reports and accepts them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

/// How the device keeps its clock: 0 = from computer, 1 = manual, 2 = NTP.
pub type TimeMode = i64;

/// Device time state, from `systime/get_systime_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTime {
    #[serde(default)]
    pub time: ClockFields,
    #[serde(default)]
    pub setting_mode_id: TimeMode,
    #[serde(default)]
    pub time_zone_id: String,
    #[serde(default)]
    pub ntp_enable: u8,
    #[serde(default)]
    pub ntp_server: String,
    #[serde(default)]
    pub ntp_port: u32,
}

// ── Tally ────────────────────────────────────────────────────────────

/// Tally LED state, from `tally_led/get_tally_led_info`.
///
/// `color_id`: 0 = off, 1 = red, 2 = green, 3 = blue.
/// `mode_id`: 0 = auto, 1 = manual.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyInfo {
    #[serde(default)]
    pub selected_color: String,
    #[serde(default)]
    pub switch: u8,
    #[serde(default)]
    pub mode_id: i64,
    #[serde(default)]
    pub color_id: i64,
}

/// Payload for `set_tally_led_info`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TallySettings {
    pub mode_id: i64,
    pub color_id: i64,
}

#[derive(Debug, Serialize)]
struct TallySwitchSet {
    switch: u8,
}

#[derive(Debug, Serialize)]
struct SystemCommand<'a> {
    command: &'a str,
}

impl DeviceClient {
    // ── Device time ──────────────────────────────────────────────

    /// Current device clock. Also the lightweight read the connection
    /// monitor uses as its health probe.
    ///
    /// `POST /system?option=getinfo` with `systime/get_systime_info`
    pub async fn device_time(&self) -> Result<Option<Envelope<DeviceTime>>, Error> {
        let req = OpCall { group: Group::Systime, opt: Opt::GetSystimeInfo };
        self.call(Feature::System, CallOption::GetInfo, &req).await
    }

    /// Set the device clock (and NTP configuration).
    pub async fn set_device_time(&self, settings: DeviceTime) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Systime, opt: Opt::SetSystimeInfo, data: settings };
        self.call(Feature::System, CallOption::SetInfo, &req).await
    }

    // ── Tally ────────────────────────────────────────────────────

    /// Current tally LED parameters.
    pub async fn tally_parameters(&self) -> Result<Option<Envelope<TallyInfo>>, Error> {
        let req = OpCall { group: Group::TallyLed, opt: Opt::GetTallyLedInfo };
        self.call(Feature::System, CallOption::GetInfo, &req).await
    }

    /// Set tally mode and color.
    pub async fn set_tally_parameters(&self, settings: TallySettings) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::TallyLed, opt: Opt::SetTallyLedInfo, data: settings };
        self.call(Feature::System, CallOption::SetInfo, &req).await
    }

    /// Toggle the tally LED on or off.
    pub async fn toggle_tally(&self, on: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::TallyLed,
            opt: Opt::SetTallyLedSwitch,
            data: TallySwitchSet { switch: u8::from(on) },
        };
        self.call(Feature::System, CallOption::SetInfo, &req).await
    }

    /// Current tally color only.
    pub async fn tally_color(&self) -> Result<Option<Ack>, Error> {
        let req = OpCall { group: Group::TallyLed, opt: Opt::GetTallyLedColor };
        self.call(Feature::System, CallOption::GetInfo, &req).await
    }

    // ── Power ────────────────────────────────────────────────────

    /// Reboot the appliance. The device drops the link shortly after
    /// acknowledging.
    pub async fn reboot(&self) -> Result<Option<Ack>, Error> {
        debug!("requesting device reboot");
        let req = DataCall {
            group: Group::Syscontrol,
            opt: Opt::SetRebootInfo,
            data: SystemCommand { command: "reboot" },
        };
        self.call(Feature::System, CallOption::SetInfo, &req).await
    }
}
