// src/device/protocol.rs

//! Wire format of the display's HTTP command API.
//!
//! Every command is a JSON object POSTed to `/post`, discriminated by its
//! `"Command"` field. Responses are JSON objects that may carry an
//! `error_code` (non-zero means the device refused the command) and, for the
//! soft reset, a `ReturnCode`.

use serde::{Deserialize, Serialize};

/// Number of frames in a full-frame upload. Animation is never used.
pub const SINGLE_FRAME: u32 = 1;
/// Frame duration sent with every upload, in milliseconds.
pub const FRAME_SPEED_MS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Command")]
pub enum Command {
    /// Resets the device's expected picture ID sequence.
    #[serde(rename = "Draw/ResetHttpGifId")]
    ResetPictureId,

    /// Switches the display to the given channel.
    #[serde(rename = "Channel/SetIndex")]
    SelectChannel {
        #[serde(rename = "SelectIndex")]
        index: u32,
    },

    /// Uploads one full frame of base64 RGB24 pixels.
    #[serde(rename = "Draw/SendHttpGif")]
    SendFrame {
        #[serde(rename = "PicNum")]
        frame_count: u32,
        #[serde(rename = "PicWidth")]
        width: u32,
        #[serde(rename = "PicHeight")]
        height: u32,
        #[serde(rename = "PicOffset")]
        offset: u32,
        #[serde(rename = "PicID")]
        picture_id: u32,
        #[serde(rename = "PicSpeed")]
        speed_ms: u32,
        #[serde(rename = "PicData")]
        data: String,
    },

    /// Resynchronises the clock and soft-resets the device.
    #[serde(rename = "Device/TimeAndReset")]
    SoftReset,
}

impl Command {
    /// A single-frame upload of `data` (base64 RGB24, row-major).
    pub fn send_frame(width: u32, height: u32, picture_id: u32, data: String) -> Self {
        Command::SendFrame {
            frame_count: SINGLE_FRAME,
            width,
            height,
            offset: 0,
            picture_id,
            speed_ms: FRAME_SPEED_MS,
            data,
        }
    }

    /// The wire name of the command, for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Command::ResetPictureId => "Draw/ResetHttpGifId",
            Command::SelectChannel { .. } => "Channel/SetIndex",
            Command::SendFrame { .. } => "Draw/SendHttpGif",
            Command::SoftReset => "Device/TimeAndReset",
        }
    }
}

/// The fields of a device response the client inspects. Anything else in
/// the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(rename = "ReturnCode", default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i64>,
}

impl DeviceResponse {
    /// `{"error_code": 0}`, what the device sends on success.
    pub fn ok() -> Self {
        DeviceResponse {
            error_code: Some(0),
            return_code: None,
        }
    }

    pub fn with_error_code(code: i64) -> Self {
        DeviceResponse {
            error_code: Some(code),
            return_code: None,
        }
    }

    pub fn with_return_code(code: i64) -> Self {
        DeviceResponse {
            error_code: None,
            return_code: Some(code),
        }
    }
}
