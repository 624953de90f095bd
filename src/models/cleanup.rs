use serde::{Deserialize, Serialize};

use super::common::ResponseStatus;

/// Primary source in the file handed to audio cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoundSource {
    KickGroup,
    SnareGroup,
    VocalGroup,
    BackingVocalsGroup,
    PercsGroup,
    StringsGroup,
    EGuitarGroup,
    AcousticGuitarGroup,
}

/// Body of `POST /audio-cleanup`, sent under `audioCleanupData`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioCleanupData {
    pub audio_file_location: String,
    pub sound_source: SoundSource,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AudioCleanupResults {
    #[serde(default)]
    pub completion_time: String,
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub cleaned_audio_file_location: Option<String>,
}

/// `POST /audio-cleanup` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AudioCleanupResponse {
    #[serde(flatten)]
    pub status: ResponseStatus,
    #[serde(default, rename = "audioCleanupResults")]
    pub results: Option<AudioCleanupResults>,
}
