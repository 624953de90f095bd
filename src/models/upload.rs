use std::path::Path;

use serde::{Deserialize, Serialize};

use super::common::ResponseStatus;
use crate::errors::{Result, RoexError};

/// Audio containers the upload endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Flac,
    Mp3,
}

impl AudioFormat {
    /// Picks the format from the file extension, ignoring case.
    ///
    /// Returns [`RoexError::Validation`] for anything but `.wav`, `.flac` and `.mp3`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "wav" => Ok(AudioFormat::Wav),
            "flac" => Ok(AudioFormat::Flac),
            "mp3" => Ok(AudioFormat::Mp3),
            other => Err(RoexError::Validation(format!(
                "unsupported file type: .{other}. Must be one of: .wav, .flac, .mp3"
            ))),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }
}

/// Body of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrlRequest {
    pub filename: String,
    pub content_type: String,
}

/// Write and read URLs for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSlot {
    /// Time-limited URL to `PUT` the file to.
    pub signed_url: String,
    /// Permanent URL to reference the file in later requests.
    pub readable_url: String,
}

/// `POST /upload` response.
#[derive(Deserialize)]
pub(crate) struct UploadUrlResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default)]
    pub signed_url: Option<String>,
    #[serde(default)]
    pub readable_url: Option<String>,
}
