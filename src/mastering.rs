//! Mastering endpoints and the album batch workflow.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::json;
use tracing::{error, info, info_span, warn, Instrument};

use crate::client::Client;
use crate::errors::{Result, RoexError};
use crate::models::mastering::{AlbumMasteringRequest, MasteringRequest};
use crate::poller::{RetryPolicy, TaskPoller};
use crate::response::{normalize, Task, TaskKind, TaskResult};

const FINAL_MASTER_RESULT_KEY: &str = "finalMasterTaskResults";

impl Client {
    /// Start a mastering preview for one track.
    pub async fn create_mastering_preview(&self, request: &MasteringRequest) -> Result<Task> {
        let payload = json!({
            "masteringData": {
                "trackData": [{ "trackURL": request.track_url }],
                "musicalStyle": request.musical_style,
                "desiredLoudness": request.desired_loudness,
                "sampleRate": request.sample_rate,
                "webhookURL": request.webhook_url,
            }
        });
        TaskPoller::new(self)
            .submit("/masteringpreview", &payload, TaskKind::MasteringPreview)
            .await
    }

    /// Poll a mastering preview until it completes.
    ///
    /// `policy` defaults to [`RetryPolicy::polling`].
    pub async fn retrieve_preview_master(
        &self,
        task_id: &str,
        policy: Option<RetryPolicy>,
    ) -> Result<TaskResult> {
        let mut task = Task::new(task_id, TaskKind::MasteringPreview);
        TaskPoller::new(self)
            .poll(&mut task, &policy.unwrap_or_default())
            .await
    }

    /// Fetch the final master of a finished mastering task. Not polled.
    ///
    /// The result may come back as `finalMasterTaskResults`, an object with a
    /// `download_url_mastered` field, or a bare URL; all of them normalize to a
    /// [`TaskResult::Ready`]. Anything else is returned as [`TaskResult::Raw`].
    pub async fn retrieve_final_master(&self, task_id: &str) -> Result<TaskResult> {
        async {
            let payload = json!({ "masteringData": { "masteringTaskId": task_id } });
            let value = self.post_value("/retrievefinalmaster", &payload).await?;
            let result = normalize(value, Some(FINAL_MASTER_RESULT_KEY));
            if result.is_raw() {
                warn!(task_id, "final master response in unknown format, returning it as-is");
            } else {
                info!(task_id, "final master ready");
            }
            Ok(result)
        }
        .instrument(self.span().clone())
        .await
    }

    /// Master every track of an album in order and download the finals to
    /// `output_dir/final_master_track_{n}.wav` (`n` starts at 1).
    ///
    /// `policy` applies to each preview poll and defaults to [`RetryPolicy::polling`].
    /// A track that fails is logged and left out of the returned map, which
    /// holds the final download URL of every track that got one.
    ///
    /// # Errors
    ///
    /// Only [`RoexError::Io`] if `output_dir` cannot be created.
    pub async fn process_album(
        &self,
        album: &AlbumMasteringRequest,
        output_dir: impl AsRef<Path>,
        policy: Option<RetryPolicy>,
    ) -> Result<BTreeMap<usize, String>> {
        let output_dir = output_dir.as_ref();
        tokio::fs::create_dir_all(output_dir).await?;

        let mut results = BTreeMap::new();
        for (idx, request) in album.tracks.iter().enumerate() {
            let track = idx + 1;
            let span = info_span!(parent: self.span(), "album_track", track);

            let outcome = async {
                let task = self.create_mastering_preview(request).await?;

                if let Err(e) = self.retrieve_preview_master(&task.id, policy).await {
                    warn!(error = %e, "could not retrieve preview");
                }

                let final_master = self.retrieve_final_master(&task.id).await?;
                let url = final_master
                    .download_url()
                    .map(str::to_string)
                    .ok_or_else(|| RoexError::service("final master has no download URL"))?;

                let dest = output_dir.join(format!("final_master_track_{track}.wav"));
                match self.download_file(&url, &dest).await {
                    Ok(_) => info!(dest = %dest.display(), "track downloaded"),
                    Err(e) => error!(error = %e, "could not download final master"),
                }
                Ok::<_, RoexError>(url)
            }
            .instrument(span)
            .await;

            match outcome {
                Ok(url) => {
                    results.insert(track, url);
                }
                Err(e) => error!(parent: self.span(), track, error = %e, "error processing track"),
            }
        }

        Ok(results)
    }
}
