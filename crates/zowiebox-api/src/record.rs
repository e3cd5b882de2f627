// Record route endpoints
//
// Recording tasks are per-storage-device (USB, SD card, NAS) and carry a
// nested `storageInfo` block. The task list is replaced wholesale each
// poll; the device never sends deltas.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{Ack, CallOption, DataCall, DeviceClient, Envelope, Feature, Group, Opt, OpCall};
use crate::error::Error;

/// Recording control commands for `set_task_enable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingCommand {
    Off,
    On,
    Pause,
    Continue,
}

impl RecordingCommand {
    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::On => 1,
            Self::Pause => 2,
            Self::Continue => 3,
        }
    }
}

/// Aggregate recording status, from `record/get_status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingStatus {
    #[serde(default)]
    pub storage_status: String,
    #[serde(default)]
    pub free_space: i64,
}

/// Storage medium details nested inside a recording task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageInfo {
    #[serde(default)]
    pub mount_path: String,
    #[serde(default)]
    pub totalspace: i64,
    #[serde(default)]
    pub freespace: i64,
    #[serde(default)]
    pub usagespace: i64,
    #[serde(default)]
    pub speed_test_status: i64,
    #[serde(default)]
    pub write_speed: i64,
    #[serde(default)]
    pub read_speed: i64,
}

/// One per-storage-device recording task from `record/get_task_list`.
///
/// `status`: 0 = idle, 1 = recording, 2 = paused, 3 = storage full,
/// 4 = storage invalid/unmounted, 5 = no signal source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingTask {
    /// Storage slot identifier, e.g. `"usb1_0"`, `"sdcard_0"`, `"nas1_0"`.
    #[serde(default)]
    pub index: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub record_mode: u8,
    #[serde(default)]
    pub record_loop_mode: u8,
    #[serde(default)]
    pub curr_file_name: String,
    #[serde(default)]
    pub file_name_prefix: String,
    /// Seconds recorded in the current file.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub curr_file_size: i64,
    #[serde(default)]
    pub limit_type: String,
    #[serde(default)]
    pub size_limit: i64,
    #[serde(default)]
    pub time_limit: i64,
    #[serde(default, rename = "storageInfo")]
    pub storage_info: StorageInfo,
}

/// Payload for `record/modify_task`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingTaskUpdate {
    pub index: String,
    pub name: String,
    pub file_name_prefix: String,
    pub record_mode: u8,
    pub record_loop_mode: u8,
    pub limit_type: String,
    pub size_limit: i64,
    pub time_limit: i64,
}

#[derive(Debug, Serialize)]
struct RecordingControl<'a> {
    index: &'a str,
    enable: u8,
}

impl DeviceClient {
    /// Aggregate recording/storage status.
    pub async fn recording_status(&self) -> Result<Option<Envelope<RecordingStatus>>, Error> {
        let req = OpCall { group: Group::Record, opt: Opt::GetStatus };
        self.call(Feature::Record, CallOption::GetInfo, &req).await
    }

    /// All recording tasks, one per storage device.
    pub async fn recording_task_list(&self) -> Result<Option<Envelope<Vec<RecordingTask>>>, Error> {
        let req = OpCall { group: Group::Record, opt: Opt::GetTaskList };
        self.call(Feature::Record, CallOption::GetInfo, &req).await
    }

    /// Modify a recording task's naming and limits.
    pub async fn modify_recording_task(
        &self,
        update: RecordingTaskUpdate,
    ) -> Result<Option<Ack>, Error> {
        debug!(index = %update.index, "modifying recording task");
        let req = DataCall { group: Group::Record, opt: Opt::ModifyTask, data: update };
        self.call(Feature::Record, CallOption::SetInfo, &req).await
    }

    /// Start, stop, pause, or resume recording on one storage device.
    pub async fn control_recording(
        &self,
        index: &str,
        command: RecordingCommand,
    ) -> Result<Option<Ack>, Error> {
        debug!(index, command = command.as_u8(), "controlling recording");
        let req = DataCall {
            group: Group::Record,
            opt: Opt::SetTaskEnable,
            data: RecordingControl { index, enable: command.as_u8() },
        };
        self.call(Feature::Record, CallOption::SetInfo, &req).await
    }
}
