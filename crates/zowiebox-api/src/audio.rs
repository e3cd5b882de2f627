// Audio route endpoints
//
// The audio config read is one of the device's bespoke response shapes:
// the payload arrives under a top-level `all` key instead of `data`, so
// it gets its own envelope type.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{Ack, CallOption, DataCall, DeviceClient, Feature, Group, GroupCall, Opt};
use crate::error::Error;
use crate::status;
use crate::video::Selection;

/// Full audio pipeline state, from the `all`-group read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// 0 = audio off, 1 = on.
    #[serde(default)]
    pub switch: u8,
    #[serde(default)]
    pub ai_devid: i64,
    #[serde(default)]
    pub ai_chnid: Vec<i64>,
    /// Input type: 0 = Line In, 1 = Internal MIC, 2 = HDMI In.
    #[serde(default)]
    pub ai_type: Selection,
    #[serde(default)]
    pub adec_chnid: i64,
    #[serde(default)]
    pub aenc_chnnum: i64,
    #[serde(default)]
    pub stream_id: Vec<i64>,
    #[serde(default)]
    pub aenc_chnid: Vec<i64>,
    #[serde(default)]
    pub ao_devnum: i64,
    #[serde(default)]
    pub ao_devid: Vec<i64>,
    #[serde(default)]
    pub ao_chnid: Vec<i64>,
    /// Available output device types, e.g. `["LINEOUT", "HDMI"]`.
    #[serde(default)]
    pub ao_devtype: Vec<String>,
    /// Codec: 0 = AAC, 1 = MP3, 2 = G.711A.
    #[serde(default)]
    pub codec: Selection,
    #[serde(default)]
    pub bitrate: Selection,
    #[serde(default)]
    pub sample_rate: Selection,
    #[serde(default)]
    pub bit_width: i64,
    /// 1 = mono, 2 = stereo.
    #[serde(default)]
    pub channel: i64,
    /// 0..=100.
    #[serde(default)]
    pub volume: i64,
}

/// Envelope for the audio config read: `{ status, rsp, all }`.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfigEnvelope {
    pub status: String,
    #[serde(default)]
    pub rsp: String,
    #[serde(default)]
    pub all: Option<AudioConfig>,
}

impl AudioConfigEnvelope {
    pub fn is_acceptable(&self) -> bool {
        status::is_acceptable(&self.status)
    }

    pub fn reason(&self) -> String {
        status::describe(&self.status)
    }
}

/// Payload for the bulk audio write. Sent under a top-level `audio` key.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AudioSettings {
    pub stream_id: i64,
    pub ai_devid: i64,
    pub ai_chnid: Vec<i64>,
    pub adec_chnid: i64,
    pub aenc_chnid: i64,
    pub ai_type: Selection,
    pub ao_devid: i64,
    pub ao_chnid: i64,
    pub ao_devtype: Selection,
    pub switch: u8,
    pub codec: Selection,
    pub bitrate: Selection,
    pub sample_rate: Selection,
    pub bit_width: i64,
    pub channel: i64,
    pub volume: i64,
}

#[derive(Debug, Serialize)]
struct AudioSet<'a> {
    group: Group,
    audio: &'a AudioSettings,
}

#[derive(Debug, Serialize)]
struct AudioSwitchSet {
    switch: u8,
}

impl DeviceClient {
    /// Full audio configuration (`all`-keyed response shape).
    pub async fn audio_config(&self) -> Result<Option<AudioConfigEnvelope>, Error> {
        let req = GroupCall { group: Group::All };
        self.call(Feature::Audio, CallOption::GetInfo, &req).await
    }

    /// Apply a full audio configuration.
    pub async fn set_audio_config(&self, settings: &AudioSettings) -> Result<Option<Ack>, Error> {
        debug!(volume = settings.volume, "setting audio config");
        let req = AudioSet { group: Group::Audio, audio: settings };
        self.call(Feature::Audio, CallOption::SetInfo, &req).await
    }

    /// Toggle the audio pipeline on or off without touching the rest of
    /// the configuration.
    pub async fn set_audio_switch(&self, on: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Audio,
            opt: Opt::SetAudioSwitch,
            data: AudioSwitchSet { switch: u8::from(on) },
        };
        self.call(Feature::Audio, CallOption::SetInfo, &req).await
    }
}
