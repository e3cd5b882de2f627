// ── Cached domain types ──
//
// Display-ready forms of the polled device state. Where the wire shape
// is already what readers need (output info, input signal, recording
// tasks, NDI sources) the cache holds the `zowiebox-api` type directly;
// the types here are the derived ones the feedback and variable surfaces
// compare against.

use serde::{Deserialize, Serialize};

/// Audio configuration flattened to the identifiers the control surfaces
/// compare against (dropdown ids are strings on the host side).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioProfile {
    /// Input type id: "0" Line In, "1" Internal MIC, "2" HDMI In.
    pub ai_type: String,
    /// "0" off, "1" on.
    pub switch: String,
    /// Codec id: "0" AAC, "1" MP3, "2" G.711A.
    pub codec: String,
    /// Bitrate id into the device's bitrate list.
    pub bitrate: String,
    /// Sample-rate id into the device's sample-rate list.
    pub sample_rate: String,
    /// "1" mono, "2" stereo.
    pub channel: String,
    /// 0..=100.
    pub volume: i64,
    /// Output device type id.
    pub ao_devtype: String,
}

/// Device clock reduced to its ISO-8601 rendering (UTC, whole seconds).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceClock {
    pub iso: String,
}

/// Tally LED state as the surfaces compare it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyState {
    /// "0" off, "1" red, "2" green, "3" blue.
    pub color_id: String,
    /// "0" auto, "1" manual.
    pub mode_id: String,
}
