use serde::{Deserialize, Serialize};

use super::common::LoudnessPreference;

/// Genre vocabulary understood by the enhance endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnhanceMusicalStyle {
    Rock,
    Pop,
    Techno,
    Trap,
    Jazz,
    Metal,
    Soul,
    Folk,
    Orchestral,
    Punk,
    Blues,
    Ambient,
    Acoustic,
    Experimental,
    HipHopGrime,
    Country,
    Funk,
    Rnb,
    IndiePop,
    IndieRock,
    Afrobeat,
    DrumNBass,
    House,
    Trance,
    LoFi,
    Electronic,
}

/// Body of the enhance endpoints, sent under `mixReviveData`.
///
/// Every fix is enabled by default; switch off the ones you don't want.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixEnhanceRequest {
    pub audio_file_location: String,
    pub musical_style: EnhanceMusicalStyle,
    pub is_master: bool,
    pub fix_clipping_issues: bool,
    #[serde(rename = "fixDRCIssues")]
    pub fix_drc_issues: bool,
    pub fix_stereo_width_issues: bool,
    pub fix_tonal_profile_issues: bool,
    pub fix_loudness_issues: bool,
    pub apply_mastering: bool,
    #[serde(rename = "webhookURL")]
    pub webhook_url: Option<String>,
    pub loudness_preference: LoudnessPreference,
    pub stem_processing: bool,
}

impl MixEnhanceRequest {
    pub fn new(audio_file_location: impl Into<String>, musical_style: EnhanceMusicalStyle) -> Self {
        Self {
            audio_file_location: audio_file_location.into(),
            musical_style,
            is_master: false,
            fix_clipping_issues: true,
            fix_drc_issues: true,
            fix_stereo_width_issues: true,
            fix_tonal_profile_issues: true,
            fix_loudness_issues: true,
            apply_mastering: true,
            webhook_url: None,
            loudness_preference: LoudnessPreference::default(),
            stem_processing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhance_request_uses_acronym_keys() {
        let request = MixEnhanceRequest::new("https://cdn/mix.wav", EnhanceMusicalStyle::DrumNBass);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["audioFileLocation"], "https://cdn/mix.wav");
        assert_eq!(value["musicalStyle"], "DRUM_N_BASS");
        assert_eq!(value["fixDRCIssues"], true);
        assert_eq!(value["fixStereoWidthIssues"], true);
        assert_eq!(value["loudnessPreference"], "STREAMING_LOUDNESS");
        assert_eq!(value["stemProcessing"], false);
        assert!(value.get("webhookURL").is_some());
    }
}
