use super::common::{DesiredLoudness, MusicalStyle, SampleRate};

/// Parameters for mastering a single track.
#[derive(Debug, Clone, PartialEq)]
pub struct MasteringRequest {
    pub track_url: String,
    pub musical_style: MusicalStyle,
    pub desired_loudness: DesiredLoudness,
    pub sample_rate: SampleRate,
    pub webhook_url: Option<String>,
}

impl MasteringRequest {
    pub fn new(
        track_url: impl Into<String>,
        musical_style: MusicalStyle,
        desired_loudness: DesiredLoudness,
    ) -> Self {
        Self {
            track_url: track_url.into(),
            musical_style,
            desired_loudness,
            sample_rate: SampleRate::default(),
            webhook_url: None,
        }
    }
}

/// Several tracks mastered one after another with `Client::process_album`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlbumMasteringRequest {
    pub tracks: Vec<MasteringRequest>,
}
