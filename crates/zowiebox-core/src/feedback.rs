// ── Feedback surface ──
//
// Boolean predicates over the state cache that drive control appearance
// in the host runtime. Evaluation is pure and pull-based; the poller
// broadcasts the `FeedbackId`s whose backing slot changed so the host
// knows which predicates to re-run.
//
// Option fields are strings because they arrive from host-side dropdowns
// whose ids are strings; an unpopulated slot always evaluates to false.

use serde::{Deserialize, Serialize};

use crate::store::StateCache;

/// Identifies one feedback definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackId {
    OutputInfo,
    AudioConfig,
    DeviceTime,
    Tally,
    RecordingStatus,
}

/// Desired output settings: resolution token plus 0/1 switch ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputInfoMatch {
    pub format: String,
    pub audio_switch: String,
    pub loop_out_switch: String,
}

/// Desired audio configuration (dropdown ids).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfigMatch {
    pub ai_type: String,
    pub switch: String,
    pub codec: String,
    pub bitrate: String,
    pub sample_rate: String,
    pub channel: String,
    pub volume: i64,
    pub ao_devtype: String,
}

/// Desired device time, ISO-8601 with whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTimeMatch {
    pub iso: String,
}

/// Desired tally color/mode ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyMatch {
    pub color_id: String,
    pub mode_id: String,
}

/// Desired recording status; true when *any* task reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingStatusMatch {
    pub status: String,
}

/// One configured feedback instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    OutputInfo(OutputInfoMatch),
    AudioConfig(AudioConfigMatch),
    DeviceTime(DeviceTimeMatch),
    Tally(TallyMatch),
    RecordingStatus(RecordingStatusMatch),
}

impl Feedback {
    /// Which definition this instance belongs to.
    pub fn id(&self) -> FeedbackId {
        match self {
            Self::OutputInfo(_) => FeedbackId::OutputInfo,
            Self::AudioConfig(_) => FeedbackId::AudioConfig,
            Self::DeviceTime(_) => FeedbackId::DeviceTime,
            Self::Tally(_) => FeedbackId::Tally,
            Self::RecordingStatus(_) => FeedbackId::RecordingStatus,
        }
    }

    /// Evaluate against the last-known device state.
    pub fn evaluate(&self, cache: &StateCache) -> bool {
        match self {
            Self::OutputInfo(want) => cache.output_info.get().is_some_and(|have| {
                have.format == want.format
                    && have.audio_switch.to_string() == want.audio_switch
                    && have.loop_out_switch.to_string() == want.loop_out_switch
            }),
            Self::AudioConfig(want) => cache.audio.get().is_some_and(|have| {
                have.ai_type == want.ai_type
                    && have.switch == want.switch
                    && have.codec == want.codec
                    && have.bitrate == want.bitrate
                    && have.sample_rate == want.sample_rate
                    && have.channel == want.channel
                    && have.volume == want.volume
                    && have.ao_devtype == want.ao_devtype
            }),
            Self::DeviceTime(want) => cache
                .clock
                .get()
                .is_some_and(|have| have.iso == want.iso),
            Self::Tally(want) => cache.tally.get().is_some_and(|have| {
                have.color_id == want.color_id && have.mode_id == want.mode_id
            }),
            Self::RecordingStatus(want) => cache.recording_tasks.get().is_some_and(|tasks| {
                tasks
                    .iter()
                    .any(|task| task.status.to_string() == want.status)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use zowiebox_api::record::RecordingTask;
    use zowiebox_api::video::OutputInfo;

    use crate::model::TallyState;

    use super::*;

    fn output_cache(format: &str, audio: u8, loop_out: u8) -> StateCache {
        let cache = StateCache::new();
        cache.output_info.store(OutputInfo {
            switch: None,
            format: format.into(),
            audio_switch: audio,
            loop_out_switch: loop_out,
        });
        cache
    }

    #[test]
    fn unpopulated_slot_evaluates_false() {
        let feedback = Feedback::Tally(TallyMatch {
            color_id: "1".into(),
            mode_id: "0".into(),
        });
        assert!(!feedback.evaluate(&StateCache::new()));
    }

    #[test]
    fn output_info_matches_exactly() {
        let cache = output_cache("1080p60", 1, 0);
        let matching = Feedback::OutputInfo(OutputInfoMatch {
            format: "1080p60".into(),
            audio_switch: "1".into(),
            loop_out_switch: "0".into(),
        });
        let wrong_format = Feedback::OutputInfo(OutputInfoMatch {
            format: "2160p30".into(),
            audio_switch: "1".into(),
            loop_out_switch: "0".into(),
        });
        assert!(matching.evaluate(&cache));
        assert!(!wrong_format.evaluate(&cache));
    }

    #[test]
    fn tally_requires_both_fields() {
        let cache = StateCache::new();
        cache.tally.store(TallyState {
            color_id: "2".into(),
            mode_id: "1".into(),
        });
        assert!(Feedback::Tally(TallyMatch {
            color_id: "2".into(),
            mode_id: "1".into(),
        })
        .evaluate(&cache));
        assert!(!Feedback::Tally(TallyMatch {
            color_id: "2".into(),
            mode_id: "0".into(),
        })
        .evaluate(&cache));
    }

    #[test]
    fn recording_status_matches_any_task() {
        let cache = StateCache::new();
        cache.recording_tasks.store(vec![
            RecordingTask {
                index: "usb1_0".into(),
                status: 0,
                ..RecordingTask::default()
            },
            RecordingTask {
                index: "sdcard_0".into(),
                status: 1,
                ..RecordingTask::default()
            },
        ]);
        let recording = Feedback::RecordingStatus(RecordingStatusMatch { status: "1".into() });
        let paused = Feedback::RecordingStatus(RecordingStatusMatch { status: "2".into() });
        assert!(recording.evaluate(&cache));
        assert!(!paused.evaluate(&cache));
    }
}
