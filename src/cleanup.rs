use serde_json::json;
use tracing::{info, warn, Instrument};

use crate::client::Client;
use crate::errors::Result;
use crate::models::cleanup::{AudioCleanupData, AudioCleanupResponse};

impl Client {
    /// Remove bleed and noise around the given sound source. Answers synchronously.
    ///
    /// The service's own `error` flag is passed through in the response
    /// rather than turned into an `Err`.
    pub async fn clean_up_audio(&self, data: &AudioCleanupData) -> Result<AudioCleanupResponse> {
        async {
            let payload = json!({ "audioCleanupData": data });
            let value = self.post_value("/audio-cleanup", &payload).await?;
            let response: AudioCleanupResponse = serde_json::from_value(value)?;

            if response.status.error {
                warn!(message = %response.status.message, "audio cleanup reported an error");
            } else {
                info!(source = ?data.sound_source, "audio cleanup finished");
            }
            Ok(response)
        }
        .instrument(self.span().clone())
        .await
    }
}
