// Camera route endpoints
//
// Image pipeline settings: exposure, white balance, picture adjustments,
// noise reduction, style presets, AE lock.

use serde::{Deserialize, Serialize};

use crate::client::{Ack, CallOption, DataCall, DeviceClient, Envelope, Feature, Group, Opt, OpCall};
use crate::error::Error;
use crate::video::Selection;

// ── Exposure ─────────────────────────────────────────────────────────

/// Exposure state, from `get_exposure_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExposureInfo {
    #[serde(default)]
    pub mode: Selection,
    #[serde(default)]
    pub gain: i64,
    #[serde(default)]
    pub shutter: Selection,
    #[serde(default)]
    pub wdr: Selection,
    #[serde(default)]
    pub flicker: Selection,
    #[serde(default)]
    pub bias_enable: u8,
    #[serde(default)]
    pub bias: i64,
    #[serde(default)]
    pub backlight_enable: u8,
    #[serde(default)]
    pub backlight: i64,
    #[serde(default)]
    pub metering: Selection,
    #[serde(default)]
    pub sensitive: Selection,
    #[serde(default)]
    pub gain_limit: i64,
}

/// Payload for `set_exposure_info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExposureSettings {
    pub mode: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bright: Option<i64>,
    pub gain: i64,
    pub shutter: Selection,
    pub wdr: Selection,
    pub flicker: Selection,
    pub bias_enable: u8,
    pub bias: i64,
    pub backlight_enable: u8,
    pub backlight: i64,
    pub metering: Selection,
    pub sensitive: Selection,
    pub save_flag: u8,
}

// ── White balance ────────────────────────────────────────────────────

/// White balance state, from `get_white_balance_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhiteBalanceInfo {
    #[serde(default)]
    pub mode: Selection,
    #[serde(default)]
    pub var: Selection,
    #[serde(default)]
    pub rgain: i64,
    #[serde(default)]
    pub bgain: i64,
    #[serde(default)]
    pub saturation: i64,
    #[serde(default)]
    pub hue: i64,
    #[serde(default)]
    pub ircut: Selection,
}

/// Payload for `set_white_balance_info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WhiteBalanceSettings {
    pub mode: Selection,
    pub var: Selection,
    pub rgain: i64,
    pub bgain: i64,
    pub saturation: i64,
    pub hue: i64,
    pub ircut: Selection,
    pub save_flag: u8,
}

// ── Image settings ───────────────────────────────────────────────────

/// Picture adjustments, from `get_image_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default)]
    pub brightness: i64,
    #[serde(default)]
    pub contrast: i64,
    #[serde(default)]
    pub sharpness: i64,
    #[serde(default)]
    pub gamma: Selection,
    #[serde(default)]
    pub flip: Selection,
    #[serde(default)]
    pub color_gray: Selection,
}

/// Payload for `set_image_info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImageSettings {
    pub brightness: i64,
    pub contrast: i64,
    pub sharpness: i64,
    pub gamma: Selection,
    pub flip: Selection,
    pub color_gray: Selection,
    pub save_flag: u8,
}

// ── Noise reduction ──────────────────────────────────────────────────

/// Noise reduction state, from `get_nr_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseReductionInfo {
    #[serde(default)]
    pub nr_2d: Selection,
    #[serde(default)]
    pub nr_3d: Selection,
    #[serde(default)]
    pub correction: Selection,
}

/// Payload for `set_nr_info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NoiseReductionSettings {
    pub nr_2d: Selection,
    pub nr_3d: Selection,
    pub correction: Selection,
    pub save_flag: u8,
}

// ── Style / AE lock ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct StyleSet {
    selected_id: i64,
    save_flag: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AeLockStatus {
    #[serde(default)]
    pub ae_lock_status: u8,
}

#[derive(Debug, Serialize)]
struct AeLockSet {
    ae_lock_status: u8,
}

impl DeviceClient {
    /// Exposure state.
    pub async fn exposure_info(&self) -> Result<Option<Envelope<ExposureInfo>>, Error> {
        let req = OpCall { group: Group::Camera, opt: Opt::GetExposureInfo };
        self.call(Feature::Camera, CallOption::GetInfo, &req).await
    }

    /// Apply exposure settings.
    pub async fn set_exposure_info(&self, settings: ExposureSettings) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Camera, opt: Opt::SetExposureInfo, data: settings };
        self.call(Feature::Camera, CallOption::SetInfo, &req).await
    }

    /// White balance state.
    pub async fn white_balance(&self) -> Result<Option<Envelope<WhiteBalanceInfo>>, Error> {
        let req = OpCall { group: Group::Camera, opt: Opt::GetWhiteBalanceInfo };
        self.call(Feature::Camera, CallOption::GetInfo, &req).await
    }

    /// Apply white balance settings.
    pub async fn set_white_balance(
        &self,
        settings: WhiteBalanceSettings,
    ) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Camera, opt: Opt::SetWhiteBalanceInfo, data: settings };
        self.call(Feature::Camera, CallOption::SetInfo, &req).await
    }

    /// Picture adjustments.
    pub async fn image_info(&self) -> Result<Option<Envelope<ImageInfo>>, Error> {
        let req = OpCall { group: Group::Camera, opt: Opt::GetImageInfo };
        self.call(Feature::Camera, CallOption::GetInfo, &req).await
    }

    /// Apply picture adjustments.
    pub async fn set_image_info(&self, settings: ImageSettings) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Camera, opt: Opt::SetImageInfo, data: settings };
        self.call(Feature::Camera, CallOption::SetInfo, &req).await
    }

    /// Noise reduction state.
    pub async fn noise_reduction(&self) -> Result<Option<Envelope<NoiseReductionInfo>>, Error> {
        let req = OpCall { group: Group::Camera, opt: Opt::GetNrInfo };
        self.call(Feature::Camera, CallOption::GetInfo, &req).await
    }

    /// Apply noise reduction settings.
    pub async fn set_noise_reduction(
        &self,
        settings: NoiseReductionSettings,
    ) -> Result<Option<Ack>, Error> {
        let req = DataCall { group: Group::Camera, opt: Opt::SetNrInfo, data: settings };
        self.call(Feature::Camera, CallOption::SetInfo, &req).await
    }

    /// Image style preset (`{selected_id, style_list}`).
    pub async fn style_info(&self) -> Result<Option<Envelope<Selection>>, Error> {
        let req = OpCall { group: Group::Camera, opt: Opt::GetStyleInfo };
        self.call(Feature::Camera, CallOption::GetInfo, &req).await
    }

    /// Select an image style preset; `save` persists it.
    pub async fn set_style_info(&self, selected_id: i64, save: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Camera,
            opt: Opt::SetStyleInfo,
            data: StyleSet { selected_id, save_flag: u8::from(save) },
        };
        self.call(Feature::Camera, CallOption::SetInfo, &req).await
    }

    /// AE lock status.
    pub async fn ae_lock_status(&self) -> Result<Option<Envelope<AeLockStatus>>, Error> {
        let req = OpCall { group: Group::Camera, opt: Opt::GetAeLockStatus };
        self.call(Feature::Camera, CallOption::GetInfo, &req).await
    }

    /// Lock or unlock auto exposure.
    pub async fn set_ae_lock(&self, locked: bool) -> Result<Option<Ack>, Error> {
        let req = DataCall {
            group: Group::Camera,
            opt: Opt::SetAeLockStatus,
            data: AeLockSet { ae_lock_status: u8::from(locked) },
        };
        self.call(Feature::Camera, CallOption::SetInfo, &req).await
    }
}
