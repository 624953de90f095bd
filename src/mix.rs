//! Multitrack mixing endpoints.

use serde_json::json;
use tracing::{info, warn, Instrument};

use crate::client::Client;
use crate::errors::Result;
use crate::models::mixing::{FinalMixRequest, FinalMixRequestAdvanced, MultitrackMixRequest};
use crate::poller::{RetryPolicy, TaskPoller};
use crate::response::{normalize, Task, TaskKind, TaskResult};

const FINAL_MIX_RESULT_KEY: &str = "applyAudioEffectsResults";

impl Client {
    /// Start a mix preview. Track URLs must point to uploaded WAV or FLAC files.
    ///
    /// Poll the returned task with [`retrieve_preview_mix`](Self::retrieve_preview_mix).
    pub async fn create_mix_preview(&self, request: &MultitrackMixRequest) -> Result<Task> {
        let payload = json!({ "multitrackData": request });
        TaskPoller::new(self)
            .submit(
                "/mixpreview",
                &payload,
                TaskKind::MixPreview {
                    retrieve_fx_settings: false,
                },
            )
            .await
    }

    /// Poll a mix preview until it completes.
    ///
    /// `retrieve_fx_settings` asks the service to include the effect settings it
    /// applied. `policy` defaults to [`RetryPolicy::polling`].
    pub async fn retrieve_preview_mix(
        &self,
        task_id: &str,
        retrieve_fx_settings: bool,
        policy: Option<RetryPolicy>,
    ) -> Result<TaskResult> {
        let mut task = Task::new(
            task_id,
            TaskKind::MixPreview {
                retrieve_fx_settings,
            },
        );
        TaskPoller::new(self)
            .poll(&mut task, &policy.unwrap_or_default())
            .await
    }

    /// Render the final mix with per-track gain adjustments.
    pub async fn retrieve_final_mix(&self, request: &FinalMixRequest) -> Result<TaskResult> {
        let payload = json!({ "applyAudioEffectsData": request });
        self.final_mix(&request.multitrack_task_id, &payload).await
    }

    /// Render the final mix with per-track EQ, compression and panning.
    pub async fn retrieve_final_mix_advanced(
        &self,
        request: &FinalMixRequestAdvanced,
    ) -> Result<TaskResult> {
        let payload = json!({ "applyAudioEffectsData": request });
        self.final_mix(&request.multitrack_task_id, &payload).await
    }

    async fn final_mix(&self, task_id: &str, payload: &serde_json::Value) -> Result<TaskResult> {
        async {
            let value = self.post_value("/retrievefinalmix", payload).await?;
            let result = normalize(value, Some(FINAL_MIX_RESULT_KEY));
            if result.is_raw() {
                warn!(task_id, "final mix response in unknown format, returning it as-is");
            } else {
                info!(task_id, "final mix ready");
            }
            Ok(result)
        }
        .instrument(self.span().clone())
        .await
    }
}
