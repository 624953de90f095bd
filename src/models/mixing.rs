use serde::Serialize;

use super::check_range;
use super::common::{
    DesiredLoudness, InstrumentGroup, MusicalStyle, PanPreference, PresenceSetting,
    ReverbPreference, SampleRate,
};
use crate::errors::{Result, RoexError};

/// Fewest and most tracks the mixing engine accepts in one request.
pub const MIN_MIX_TRACKS: usize = 2;
pub const MAX_MIX_TRACKS: usize = 32;

/// One track of a multitrack mix and how it should be treated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackData {
    #[serde(rename = "trackURL")]
    pub track_url: String,
    pub instrument_group: InstrumentGroup,
    pub presence_setting: PresenceSetting,
    pub pan_preference: PanPreference,
    pub reverb_preference: ReverbPreference,
}

impl TrackData {
    /// A track with default presence, pan and reverb preferences.
    pub fn new(track_url: impl Into<String>, instrument_group: InstrumentGroup) -> Self {
        Self {
            track_url: track_url.into(),
            instrument_group,
            presence_setting: PresenceSetting::default(),
            pan_preference: PanPreference::default(),
            reverb_preference: ReverbPreference::default(),
        }
    }
}

/// Body of `POST /mixpreview`, sent under `multitrackData`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultitrackMixRequest {
    track_data: Vec<TrackData>,
    pub musical_style: MusicalStyle,
    pub return_stems: bool,
    pub sample_rate: SampleRate,
    #[serde(rename = "webhookURL")]
    pub webhook_url: Option<String>,
}

impl MultitrackMixRequest {
    /// Returns [`RoexError::Validation`] unless there are 2 to 32 tracks.
    pub fn new(track_data: Vec<TrackData>, musical_style: MusicalStyle) -> Result<Self> {
        if !(MIN_MIX_TRACKS..=MAX_MIX_TRACKS).contains(&track_data.len()) {
            return Err(RoexError::Validation(format!(
                "track_data must contain between {MIN_MIX_TRACKS} and {MAX_MIX_TRACKS} tracks, got {}",
                track_data.len()
            )));
        }
        Ok(Self {
            track_data,
            musical_style,
            return_stems: false,
            sample_rate: SampleRate::default(),
            webhook_url: None,
        })
    }

    pub fn tracks(&self) -> &[TrackData] {
        &self.track_data
    }
}

/// Gain adjustment for one track of the final mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackGainData {
    #[serde(rename = "trackURL")]
    pub track_url: String,
    pub gain_db: f64,
}

/// Body of `POST /retrievefinalmix`, sent under `applyAudioEffectsData`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalMixRequest {
    pub multitrack_task_id: String,
    pub track_data: Vec<TrackGainData>,
    pub return_stems: bool,
    pub sample_rate: SampleRate,
}

impl FinalMixRequest {
    pub fn new(multitrack_task_id: impl Into<String>, track_data: Vec<TrackGainData>) -> Self {
        Self {
            multitrack_task_id: multitrack_task_id.into(),
            track_data,
            return_stems: false,
            sample_rate: SampleRate::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-track effects
// ---------------------------------------------------------------------------

/// A single parametric EQ band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EqBand {
    gain: f64,
    q: f64,
    centre_freq: f64,
}

impl EqBand {
    /// Gain in dB (±20), Q in 0.1..=10, centre frequency in 20..=20000 Hz.
    pub fn new(gain: f64, q: f64, centre_freq: f64) -> Result<Self> {
        check_range("EQ gain", gain, -20.0, 20.0, "dB")?;
        check_range("EQ Q factor", q, 0.1, 10.0, "")?;
        check_range("EQ centre frequency", centre_freq, 20.0, 20000.0, "Hz")?;
        Ok(Self {
            gain,
            q,
            centre_freq,
        })
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn centre_freq(&self) -> f64 {
        self.centre_freq
    }

    // Presets are built from constants that are known to be in range.
    const fn preset(gain: f64, q: f64, centre_freq: f64) -> Self {
        Self {
            gain,
            q,
            centre_freq,
        }
    }
}

impl Default for EqBand {
    fn default() -> Self {
        Self::preset(0.0, 1.0, 1000.0)
    }
}

/// Six-band parametric EQ. Unset bands are left flat.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EqSettings {
    #[serde(rename = "band1", skip_serializing_if = "Option::is_none")]
    pub band_1: Option<EqBand>,
    #[serde(rename = "band2", skip_serializing_if = "Option::is_none")]
    pub band_2: Option<EqBand>,
    #[serde(rename = "band3", skip_serializing_if = "Option::is_none")]
    pub band_3: Option<EqBand>,
    #[serde(rename = "band4", skip_serializing_if = "Option::is_none")]
    pub band_4: Option<EqBand>,
    #[serde(rename = "band5", skip_serializing_if = "Option::is_none")]
    pub band_5: Option<EqBand>,
    #[serde(rename = "band6", skip_serializing_if = "Option::is_none")]
    pub band_6: Option<EqBand>,
}

impl EqSettings {
    pub fn bass_boost() -> Self {
        Self {
            band_1: Some(EqBand::preset(4.0, 1.0, 60.0)),
            band_2: Some(EqBand::preset(3.0, 0.8, 150.0)),
            band_3: Some(EqBand::preset(-1.0, 1.0, 400.0)),
            ..Self::default()
        }
    }

    pub fn vocal_clarity() -> Self {
        Self {
            band_2: Some(EqBand::preset(-2.0, 0.7, 200.0)),
            band_4: Some(EqBand::preset(3.0, 1.2, 2500.0)),
            band_5: Some(EqBand::preset(2.0, 1.0, 5000.0)),
            band_6: Some(EqBand::preset(1.5, 0.8, 10000.0)),
            ..Self::default()
        }
    }

    pub fn kick_punch() -> Self {
        Self {
            band_1: Some(EqBand::preset(5.0, 1.2, 50.0)),
            band_2: Some(EqBand::preset(-3.0, 0.8, 250.0)),
            band_4: Some(EqBand::preset(4.0, 1.5, 3000.0)),
            ..Self::default()
        }
    }

    pub fn snare_crack() -> Self {
        Self {
            band_2: Some(EqBand::preset(2.0, 1.0, 200.0)),
            band_3: Some(EqBand::preset(-2.0, 0.9, 500.0)),
            band_5: Some(EqBand::preset(4.0, 1.2, 5000.0)),
            band_6: Some(EqBand::preset(2.0, 0.7, 10000.0)),
            ..Self::default()
        }
    }

    /// Cuts low-end rumble below roughly 80 Hz.
    pub fn high_pass() -> Self {
        Self {
            band_1: Some(EqBand::preset(-12.0, 0.5, 40.0)),
            band_2: Some(EqBand::preset(-6.0, 0.7, 80.0)),
            ..Self::default()
        }
    }

    pub fn brightness() -> Self {
        Self {
            band_5: Some(EqBand::preset(3.0, 0.8, 6000.0)),
            band_6: Some(EqBand::preset(4.0, 0.7, 12000.0)),
            ..Self::default()
        }
    }
}

/// Dynamic range compression for one track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compression {
    threshold: f64,
    ratio: f64,
    attack_ms: f64,
    release_ms: f64,
}

impl Compression {
    pub fn new(threshold: f64, ratio: f64, attack_ms: f64, release_ms: f64) -> Result<Self> {
        check_range("compression threshold", threshold, -60.0, 0.0, "dB")?;
        check_range("compression ratio", ratio, 1.0, 20.0, "")?;
        check_range("compression attack", attack_ms, 0.1, 100.0, "ms")?;
        check_range("compression release", release_ms, 1.0, 1000.0, "ms")?;
        Ok(Self {
            threshold,
            ratio,
            attack_ms,
            release_ms,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn attack_ms(&self) -> f64 {
        self.attack_ms
    }

    pub fn release_ms(&self) -> f64 {
        self.release_ms
    }

    const fn preset(threshold: f64, ratio: f64, attack_ms: f64, release_ms: f64) -> Self {
        Self {
            threshold,
            ratio,
            attack_ms,
            release_ms,
        }
    }

    pub fn vocal() -> Self {
        Self::preset(-18.0, 4.0, 5.0, 40.0)
    }

    pub fn drum_bus() -> Self {
        Self::preset(-15.0, 3.0, 10.0, 100.0)
    }

    pub fn bass() -> Self {
        Self::preset(-20.0, 5.0, 15.0, 80.0)
    }

    pub fn gentle() -> Self {
        Self::preset(-24.0, 2.5, 20.0, 150.0)
    }

    pub fn aggressive() -> Self {
        Self::preset(-12.0, 8.0, 1.0, 30.0)
    }
}

impl Default for Compression {
    fn default() -> Self {
        Self::preset(-20.0, 4.0, 5.0, 50.0)
    }
}

/// Stereo position in degrees; negative is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panning {
    panning_angle: f64,
}

impl Panning {
    pub fn new(panning_angle: f64) -> Result<Self> {
        check_range("panning angle", panning_angle, -60.0, 60.0, "degrees")?;
        Ok(Self { panning_angle })
    }

    pub fn angle(&self) -> f64 {
        self.panning_angle
    }

    pub fn center() -> Self {
        Self { panning_angle: 0.0 }
    }

    pub fn hard_left() -> Self {
        Self {
            panning_angle: -60.0,
        }
    }

    pub fn hard_right() -> Self {
        Self { panning_angle: 60.0 }
    }

    pub fn slight_left() -> Self {
        Self {
            panning_angle: -20.0,
        }
    }

    pub fn slight_right() -> Self {
        Self { panning_angle: 20.0 }
    }
}

/// Gain plus optional EQ, compression and panning for one track of the final mix.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEffectsData {
    #[serde(rename = "trackURL")]
    pub track_url: String,
    pub gain_db: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panning_settings: Option<Panning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_settings: Option<EqSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_settings: Option<Compression>,
}

/// Final mix request with per-track effects. Reuses the preview's task id,
/// so the track count was already checked when the preview was created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalMixRequestAdvanced {
    pub multitrack_task_id: String,
    pub track_data: Vec<TrackEffectsData>,
    pub return_stems: bool,
    pub create_master: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_loudness: Option<DesiredLoudness>,
    pub sample_rate: SampleRate,
    #[serde(rename = "webhookURL")]
    pub webhook_url: Option<String>,
}

impl FinalMixRequestAdvanced {
    pub fn new(multitrack_task_id: impl Into<String>, track_data: Vec<TrackEffectsData>) -> Self {
        Self {
            multitrack_task_id: multitrack_task_id.into(),
            track_data,
            return_stems: false,
            create_master: false,
            desired_loudness: None,
            sample_rate: SampleRate::default(),
            webhook_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn track(n: usize) -> TrackData {
        TrackData::new(format!("https://cdn/t{n}.wav"), InstrumentGroup::BassGroup)
    }

    #[test]
    fn mix_request_rejects_too_few_or_too_many_tracks() {
        let one = vec![track(0)];
        assert!(matches!(
            MultitrackMixRequest::new(one, MusicalStyle::Pop),
            Err(RoexError::Validation(_))
        ));

        let many = (0..33).map(track).collect();
        assert!(MultitrackMixRequest::new(many, MusicalStyle::Pop).is_err());

        let max = (0..32).map(track).collect();
        assert!(MultitrackMixRequest::new(max, MusicalStyle::Pop).is_ok());
    }

    #[test]
    fn mix_request_serializes_wire_keys() {
        let request =
            MultitrackMixRequest::new(vec![track(1), track(2)], MusicalStyle::RockIndie).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["trackData"][0]["trackURL"], "https://cdn/t1.wav");
        assert_eq!(value["trackData"][0]["instrumentGroup"], "BASS_GROUP");
        assert_eq!(value["trackData"][0]["presenceSetting"], "NORMAL");
        assert_eq!(value["trackData"][0]["reverbPreference"], "NONE");
        assert_eq!(value["musicalStyle"], "ROCK_INDIE");
        assert_eq!(value["returnStems"], false);
        assert_eq!(value["sampleRate"], "44100");
        assert_eq!(value["webhookURL"], serde_json::Value::Null);
    }

    #[test]
    fn eq_band_limits() {
        assert!(EqBand::new(20.0, 10.0, 20000.0).is_ok());
        assert!(EqBand::new(20.5, 1.0, 1000.0).is_err());
        assert!(EqBand::new(0.0, 0.05, 1000.0).is_err());
        assert!(EqBand::new(0.0, 1.0, 19.0).is_err());
    }

    #[test]
    fn compression_and_panning_limits() {
        assert!(Compression::new(-60.0, 20.0, 0.1, 1000.0).is_ok());
        assert!(Compression::new(1.0, 4.0, 5.0, 50.0).is_err());
        assert!(Compression::new(-20.0, 0.5, 5.0, 50.0).is_err());
        assert!(Compression::new(-20.0, 4.0, 101.0, 50.0).is_err());
        assert!(Compression::new(-20.0, 4.0, 5.0, 0.5).is_err());

        assert!(Panning::new(-60.0).is_ok());
        assert!(Panning::new(61.0).is_err());
    }

    #[test]
    fn presets_stay_in_range() {
        let eqs = [
            EqSettings::bass_boost(),
            EqSettings::vocal_clarity(),
            EqSettings::kick_punch(),
            EqSettings::snare_crack(),
            EqSettings::high_pass(),
            EqSettings::brightness(),
        ];
        for eq in eqs {
            for band in [eq.band_1, eq.band_2, eq.band_3, eq.band_4, eq.band_5, eq.band_6]
                .into_iter()
                .flatten()
            {
                EqBand::new(band.gain(), band.q(), band.centre_freq()).unwrap();
            }
        }

        for c in [
            Compression::vocal(),
            Compression::drum_bus(),
            Compression::bass(),
            Compression::gentle(),
            Compression::aggressive(),
        ] {
            Compression::new(c.threshold(), c.ratio(), c.attack_ms(), c.release_ms()).unwrap();
        }
    }

    #[test]
    fn effects_skip_unset_settings() {
        let request = FinalMixRequestAdvanced::new(
            "mix_1",
            vec![
                TrackEffectsData {
                    track_url: "https://cdn/bass.wav".into(),
                    gain_db: 2.0,
                    eq_settings: Some(EqSettings::high_pass()),
                    compression_settings: Some(Compression::bass()),
                    panning_settings: Some(Panning::center()),
                },
                TrackEffectsData {
                    track_url: "https://cdn/vox.wav".into(),
                    gain_db: -0.5,
                    ..TrackEffectsData::default()
                },
            ],
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value["trackData"][0]["eqSettings"],
            json!({
                "band1": {"gain": -12.0, "q": 0.5, "centreFreq": 40.0},
                "band2": {"gain": -6.0, "q": 0.7, "centreFreq": 80.0},
            })
        );
        assert_eq!(value["trackData"][0]["compressionSettings"]["attackMs"], 15.0);
        assert_eq!(value["trackData"][0]["panningSettings"]["panningAngle"], 0.0);
        assert!(value["trackData"][1].get("eqSettings").is_none());
        assert!(value.get("desiredLoudness").is_none());
        assert_eq!(value["createMaster"], false);
    }
}
