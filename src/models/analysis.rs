use serde::{Deserialize, Serialize};

/// Genre vocabulary understood by the analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisMusicalStyle {
    Rock,
    Metal,
    Instrumental,
    Electronic,
    Dance,
    HipHopGrime,
    Pop,
    Acoustic,
    Blues,
    Jazz,
    Soul,
    Folk,
    Punk,
    Ambient,
    Experimental,
    Country,
    Funk,
    Rnb,
    IndiePop,
    IndieRock,
    House,
    Trap,
    Techno,
    Orchestral,
    Afrobeat,
    DrumNBass,
    Trance,
    LoFi,
    Reggae,
    Latin,
}

/// Body of `POST /mixanalysis`, sent under `mixDiagnosisData`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixAnalysisRequest {
    pub audio_file_location: String,
    pub musical_style: AnalysisMusicalStyle,
    pub is_master: bool,
}

/// Side-by-side view of two analyses produced by `Client::compare_mixes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixComparison {
    pub mix_a: serde_json::Map<String, serde_json::Value>,
    pub mix_b: serde_json::Map<String, serde_json::Value>,
    pub differences: serde_json::Map<String, serde_json::Value>,
}
