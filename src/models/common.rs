use serde::{Deserialize, Serialize};

/// Genre reference used to guide mixing and mastering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MusicalStyle {
    RockIndie,
    Pop,
    Acoustic,
    HiphopGrime,
    Electronic,
    ReggaeDub,
    Orchestral,
    Metal,
    Other,
}

/// Role of a track inside a multitrack mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentGroup {
    BassGroup,
    DrumsGroup,
    KickGroup,
    SnareGroup,
    CymbalsGroup,
    VocalGroup,
    BackingVoxGroup,
    PercsGroup,
    StringsGroup,
    SynthGroup,
    FxGroup,
    KeysGroup,
    BrassGroup,
    EGuitarGroup,
    AcousticGuitarGroup,
    BackingTrackGroup,
    OtherGroup1,
    OtherGroup2,
    OtherGroup3,
    OtherGroup4,
    OtherGroup5,
}

/// How prominent a track should sit in the mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceSetting {
    #[default]
    Normal,
    Lead,
    Background,
}

/// Suggested stereo placement for a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PanPreference {
    #[default]
    NoPreference,
    Left,
    Centre,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReverbPreference {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// Overall loudness target for mastering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DesiredLoudness {
    Low,
    Medium,
    High,
}

/// Loudness standard targeted by mix enhancement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoudnessPreference {
    CdLoudness,
    #[default]
    StreamingLoudness,
}

/// Output sample rate. Sent as a string on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleRate {
    #[default]
    #[serde(rename = "44100")]
    Hz44100,
    #[serde(rename = "48000")]
    Hz48000,
}

/// Status fields most service responses carry next to their payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseStatus {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub info: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enums_use_wire_names() {
        assert_eq!(json!(InstrumentGroup::EGuitarGroup), json!("E_GUITAR_GROUP"));
        assert_eq!(json!(InstrumentGroup::OtherGroup3), json!("OTHER_GROUP3"));
        assert_eq!(json!(MusicalStyle::HiphopGrime), json!("HIPHOP_GRIME"));
        assert_eq!(json!(PanPreference::NoPreference), json!("NO_PREFERENCE"));
        assert_eq!(json!(LoudnessPreference::CdLoudness), json!("CD_LOUDNESS"));
        assert_eq!(json!(SampleRate::Hz48000), json!("48000"));
    }
}
