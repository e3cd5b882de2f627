// Streamplay route endpoints
//
// Three feature areas share this route: stream-decode sources (pull a
// remote URL and decode it), NDI receive (discovery and decode), and
// stream publishing (push the encoder to an RTMP/SRT/... target).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{Ack, CallOption, DataCall, DeviceClient, Envelope, Feature, Group, Opt, OpCall};
use crate::error::Error;

// ── Decode sources ───────────────────────────────────────────────────

/// One configured decode source, from `streamplay_get_all`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamSource {
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub switch: u8,
    #[serde(default)]
    pub name: String,
    /// 0 = local, 1 = live.
    #[serde(default)]
    pub streamtype: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub streamplay_status: i64,
    #[serde(default)]
    pub bandwidth: i64,
    #[serde(default)]
    pub framerate: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Payload for `streamplay_add`.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSourceNew {
    pub switch: u8,
    pub name: String,
    pub streamtype: i64,
    pub url: String,
}

/// Payload for `streamplay_modify`.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSourceUpdate {
    pub index: i64,
    pub switch: u8,
    pub name: String,
    pub streamtype: i64,
    pub url: String,
}

// ── NDI receive ──────────────────────────────────────────────────────

/// One discovered NDI source, from `ndi_get_all`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NdiSource {
    #[serde(default)]
    pub index: i64,
    /// Advertised NDI name, e.g. `"HD CAMERA (NDI HB HX,192.168.1.205)"`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub streamplay_status: i64,
    #[serde(default)]
    pub bandwidth: i64,
    #[serde(default)]
    pub framerate: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// NDI receive-group configuration, from `ndi_get_recv_config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdiReceiveConfig {
    #[serde(default)]
    pub groups: String,
}

#[derive(Debug, Serialize)]
struct NdiReceive<'a> {
    ndi_name: &'a str,
}

// ── Publishing ───────────────────────────────────────────────────────

/// Payload for `add_publish_info`.
#[derive(Debug, Clone, Serialize)]
pub struct StreamPublication {
    pub service: String,
    pub protocol: String,
    pub url: String,
    pub key: String,
    pub switch: u8,
    pub desc: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
struct IndexOnly {
    index: i64,
}

/// One `{index, show_index}` pair for `update_streams_index`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StreamOrder {
    pub index: i64,
    pub show_index: i64,
}

#[derive(Debug, Serialize)]
struct PublishToggle {
    index: i64,
    switch: u8,
}

impl DeviceClient {
    // ── Decode sources ───────────────────────────────────────────

    /// Add a decode source URL.
    pub async fn add_decode_source(&self, source: StreamSourceNew) -> Result<Option<Ack>, Error> {
        debug!(url = %source.url, "adding decode source");
        let req = DataCall { group: Group::Streamplay, opt: Opt::StreamplayAdd, data: source };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// All configured decode sources.
    pub async fn decode_sources(&self) -> Result<Option<Envelope<Vec<StreamSource>>>, Error> {
        let req = OpCall { group: Group::Streamplay, opt: Opt::StreamplayGetAll };
        self.call(Feature::Streamplay, CallOption::GetInfo, &req).await
    }

    /// Delete a decode source by index.
    pub async fn delete_decode_source(&self, index: i64) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Streamplay,
            opt: Opt::StreamplayDel,
            data: IndexOnly { index },
        };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// Modify a decode source in place.
    pub async fn modify_decode_source(
        &self,
        update: StreamSourceUpdate,
    ) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Streamplay, opt: Opt::StreamplayModify, data: update };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// Current decoder state.
    pub async fn decoder_state(&self) -> Result<Option<Ack>, Error> {
        let req = OpCall { group: Group::Streamplay, opt: Opt::GetDecoderState };
        self.call(Feature::Streamplay, CallOption::GetInfo, &req).await
    }

    // ── NDI receive ──────────────────────────────────────────────

    /// Kick off an NDI source discovery sweep.
    pub async fn ndi_find(&self) -> Result<Option<Ack>, Error> {
        let req = OpCall { group: Group::StreamplayNdi, opt: Opt::NdiFind };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// All NDI sources found by the last discovery sweep.
    pub async fn ndi_sources(&self) -> Result<Option<Envelope<Vec<NdiSource>>>, Error> {
        let req = OpCall { group: Group::StreamplayNdi, opt: Opt::NdiGetAll };
        self.call(Feature::Streamplay, CallOption::GetInfo, &req).await
    }

    /// Start decoding the named NDI source.
    pub async fn enable_ndi_decoding(&self, ndi_name: &str) -> Result<Option<Ack>, Error> {
        debug!(ndi_name, "enabling NDI decoding");
        let req = DataCall {
            group: Group::StreamplayNdi,
            opt: Opt::NdiRecv,
            data: NdiReceive { ndi_name },
        };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// Stop NDI decoding.
    pub async fn disable_ndi_decoding(&self) -> Result<Option<Ack>, Error> {
        let req = OpCall { group: Group::StreamplayNdi, opt: Opt::NdiClose };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// NDI receive-group configuration.
    pub async fn ndi_receive_config(&self) -> Result<Option<Envelope<NdiReceiveConfig>>, Error> {
        let req = OpCall { group: Group::StreamplayNdi, opt: Opt::NdiGetRecvConfig };
        self.call(Feature::Streamplay, CallOption::GetInfo, &req).await
    }

    /// Set the NDI receive groups (comma-separated list).
    pub async fn set_ndi_receive_groups(&self, groups: &str) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::StreamplayNdi,
            opt: Opt::NdiSetRecvConfig,
            data: NdiReceiveConfig { groups: groups.to_owned() },
        };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    // ── Publishing ───────────────────────────────────────────────

    /// Add a stream publication target.
    pub async fn publish_stream(&self, publication: StreamPublication) -> Result<Option<Ack>, Error> {
        debug!(service = %publication.service, "adding stream publication");
        let req = DataCall { group: Group::Publish, opt: Opt::AddPublishInfo, data: publication };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// Delete a stream publication by index.
    pub async fn delete_stream(&self, index: i64) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Publish,
            opt: Opt::DelPublishInfo,
            data: IndexOnly { index },
        };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// Reorder stream publications for display.
    pub async fn reorder_streams(&self, order: &[StreamOrder]) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Publish, opt: Opt::UpdateStreamsIndex, data: order };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }

    /// Start or stop one stream publication.
    pub async fn toggle_stream(&self, index: i64, on: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Publish,
            opt: Opt::UpdatePublishSwitch,
            data: PublishToggle { index, switch: u8::from(on) },
        };
        self.call(Feature::Streamplay, CallOption::SetInfo, &req).await
    }
}
