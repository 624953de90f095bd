//! Mix and master analysis.

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn, Instrument};

use crate::client::Client;
use crate::errors::Result;
use crate::models::analysis::{AnalysisMusicalStyle, MixAnalysisRequest, MixComparison};

const PRODUCTION_KEYS: &[&str] = &[
    "bit_depth",
    "clipping",
    "if_master_drc",
    "if_master_loudness",
    "if_mix_drc",
    "if_mix_loudness",
    "integrated_loudness_lufs",
    "mix_style",
    "mono_compatible",
    "musical_style",
    "peak_loudness_dbfs",
    "phase_issues",
    "sample_rate",
    "stereo_field",
];

const NUMERIC_KEYS: &[&str] = &[
    "integrated_loudness_lufs",
    "peak_loudness_dbfs",
    "bit_depth",
    "sample_rate",
];

const CATEGORICAL_KEYS: &[&str] = &["clipping", "if_master_drc", "if_master_loudness", "stereo_field"];

const TONAL_BANDS: &[&str] = &[
    "bass_frequency",
    "low_mid_frequency",
    "high_mid_frequency",
    "high_frequency",
];

const NOT_AVAILABLE: &str = "N/A";

impl Client {
    /// Analyze a mixed or mastered track.
    ///
    /// Returns the `mixDiagnosisResults` object, or the whole body if the
    /// service answered in a different layout.
    pub async fn analyze_mix(&self, request: &MixAnalysisRequest) -> Result<Value> {
        async {
            let payload = json!({ "mixDiagnosisData": request });
            let mut value = self.post_value("/mixanalysis", &payload).await?;

            match value.get_mut("mixDiagnosisResults").map(Value::take) {
                Some(results) => {
                    info!(location = %request.audio_file_location, "analysis received");
                    Ok(results)
                }
                None => {
                    warn!("analysis response without mixDiagnosisResults, returning it as-is");
                    Ok(value)
                }
            }
        }
        .instrument(self.span().clone())
        .await
    }

    /// Analyze two mixes and report how their key metrics differ.
    pub async fn compare_mixes(
        &self,
        mix_a_url: &str,
        mix_b_url: &str,
        musical_style: AnalysisMusicalStyle,
        is_master: bool,
    ) -> Result<MixComparison> {
        let request = |url: &str| MixAnalysisRequest {
            audio_file_location: url.to_string(),
            musical_style,
            is_master,
        };

        let results_a = self.analyze_mix(&request(mix_a_url)).await?;
        let results_b = self.analyze_mix(&request(mix_b_url)).await?;

        let mix_a = extract_metrics(&results_a);
        let mix_b = extract_metrics(&results_b);
        let differences = compare_metrics(&mix_a, &mix_b);

        self.span()
            .in_scope(|| info!(mix_a = mix_a_url, mix_b = mix_b_url, "comparison ready"));
        Ok(MixComparison {
            mix_a,
            mix_b,
            differences,
        })
    }
}

/// Pull the production metrics and tonal profile out of a diagnosis `payload`.
/// Missing metrics are reported as `"N/A"`.
pub(crate) fn extract_metrics(diagnosis: &Value) -> Map<String, Value> {
    let empty = Map::new();
    let payload = diagnosis
        .get("payload")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut metrics: Map<String, Value> = PRODUCTION_KEYS
        .iter()
        .map(|&key| {
            let value = payload.get(key).cloned().unwrap_or_else(|| json!(NOT_AVAILABLE));
            (key.to_string(), value)
        })
        .collect();

    let tonal = payload
        .get("tonal_profile")
        .cloned()
        .unwrap_or_else(|| json!({}));
    metrics.insert("tonal_profile".to_string(), tonal);

    debug!(metrics = metrics.len(), "metrics extracted");
    metrics
}

fn as_number(value: Option<&Value>) -> Option<f64> {
    match value {
        None => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Bool(b)) => Some(f64::from(u8::from(*b))),
        Some(_) => None,
    }
}

fn same_or_different(a: Option<&Value>, b: Option<&Value>) -> Value {
    json!({
        "status": if a == b { "SAME" } else { "DIFFERENT" },
        "mix_a_value": a,
        "mix_b_value": b,
    })
}

/// Numeric metrics get an absolute difference (or `"N/A"` when either side
/// isn't a number); categorical metrics and tonal bands get `SAME`/`DIFFERENT`.
pub(crate) fn compare_metrics(
    metrics_a: &Map<String, Value>,
    metrics_b: &Map<String, Value>,
) -> Map<String, Value> {
    let mut differences = Map::new();

    for &key in NUMERIC_KEYS {
        let entry = match (as_number(metrics_a.get(key)), as_number(metrics_b.get(key))) {
            (Some(a), Some(b)) => json!({
                "difference": (a - b).abs(),
                "mix_a_value": a,
                "mix_b_value": b,
            }),
            _ => json!(NOT_AVAILABLE),
        };
        differences.insert(key.to_string(), entry);
    }

    for &key in CATEGORICAL_KEYS {
        differences.insert(
            key.to_string(),
            same_or_different(metrics_a.get(key), metrics_b.get(key)),
        );
    }

    let tonal_a = metrics_a.get("tonal_profile");
    let tonal_b = metrics_b.get("tonal_profile");
    let tonal: Map<String, Value> = TONAL_BANDS
        .iter()
        .map(|&band| {
            let a = tonal_a.and_then(|t| t.get(band));
            let b = tonal_b.and_then(|t| t.get(band));
            (band.to_string(), same_or_different(a, b))
        })
        .collect();
    differences.insert("tonal_profile".to_string(), Value::Object(tonal));

    differences
}
