// ── Wire → domain conversions ──
//
// Everything the poller derives from raw responses before a value lands
// in the cache: selected-id stringification for the audio profile, the
// device-clock ISO-8601 derivation, and the tally id flattening. The
// clock conversion is round-trip exact: fields → timestamp → fields
// reproduces the input (no rollover at second/month/day boundaries).

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

use zowiebox_api::audio::AudioConfig;
use zowiebox_api::system::{ClockFields, DeviceTime, TallyInfo};

use crate::model::{AudioProfile, DeviceClock, TallyState};

impl From<&AudioConfig> for AudioProfile {
    fn from(all: &AudioConfig) -> Self {
        Self {
            ai_type: all.ai_type.selected_id.to_string(),
            switch: all.switch.to_string(),
            codec: all.codec.selected_id.to_string(),
            bitrate: all.bitrate.selected_id.to_string(),
            sample_rate: all.sample_rate.selected_id.to_string(),
            channel: all.channel.to_string(),
            volume: all.volume,
            ao_devtype: all.ai_devid.to_string(),
        }
    }
}

impl From<&TallyInfo> for TallyState {
    fn from(info: &TallyInfo) -> Self {
        Self {
            color_id: info.color_id.to_string(),
            mode_id: info.mode_id.to_string(),
        }
    }
}

/// Interpret the device's calendar fields as a UTC timestamp.
///
/// Returns `None` for impossible calendars (month 13, day 32, ...);
/// the poller treats that like a missing field and keeps the old value.
pub fn clock_to_utc(clock: &ClockFields) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(
        clock.year,
        clock.month,
        clock.day,
        clock.hour,
        clock.minute,
        clock.second,
    )
    .single()
}

/// Split a UTC timestamp into the calendar fields a `set_systime_info`
/// payload carries.
pub fn clock_from_utc(at: DateTime<Utc>) -> ClockFields {
    ClockFields {
        year: at.year(),
        month: at.month(),
        day: at.day(),
        hour: at.hour(),
        minute: at.minute(),
        second: at.second(),
    }
}

/// Render a timestamp the way the surfaces publish it: whole seconds,
/// trailing `Z`.
pub fn format_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Derive the cached clock state from a `get_systime_info` payload.
pub fn device_clock(time: &DeviceTime) -> Option<DeviceClock> {
    clock_to_utc(&time.time).map(|at| DeviceClock { iso: format_iso(at) })
}

/// Build a `set_systime_info` payload for `at`, carrying over the
/// device's current mode/zone/NTP settings from `current`.
pub fn device_time_payload(at: DateTime<Utc>, current: &DeviceTime) -> DeviceTime {
    DeviceTime {
        time: clock_from_utc(at),
        setting_mode_id: current.setting_mode_id,
        time_zone_id: current.time_zone_id.clone(),
        ntp_enable: current.ntp_enable,
        ntp_server: current.ntp_server.clone(),
        ntp_port: current.ntp_port,
    }
}
