//! Mix enhancement endpoints.

use std::time::Duration;

use serde_json::json;

use crate::client::Client;
use crate::errors::Result;
use crate::models::enhance::MixEnhanceRequest;
use crate::poller::{RetryPolicy, TaskPoller};
use crate::response::{Task, TaskKind, TaskResult};

/// Enhancement runs longer than the other tasks, so it gets a larger budget.
const ENHANCE_POLL_ATTEMPTS: u32 = 50;
const ENHANCE_POLL_INTERVAL: Duration = Duration::from_secs(5);

impl Client {
    /// Start an enhancement preview of a mixed or mastered track.
    pub async fn create_mix_enhance_preview(&self, request: &MixEnhanceRequest) -> Result<Task> {
        self.submit_enhance("/mixenhancepreview", request).await
    }

    /// Start a full enhancement of a mixed or mastered track.
    pub async fn create_mix_enhance(&self, request: &MixEnhanceRequest) -> Result<Task> {
        self.submit_enhance("/mixenhance", request).await
    }

    /// Poll an enhancement task until the enhanced track is available.
    ///
    /// `policy` defaults to 50 attempts, 5 seconds apart.
    pub async fn retrieve_enhanced_track(
        &self,
        task_id: &str,
        policy: Option<RetryPolicy>,
    ) -> Result<TaskResult> {
        let policy = policy
            .unwrap_or_else(|| RetryPolicy::fixed(ENHANCE_POLL_INTERVAL, ENHANCE_POLL_ATTEMPTS));
        let mut task = Task::new(task_id, TaskKind::MixEnhance);
        TaskPoller::new(self).poll(&mut task, &policy).await
    }

    async fn submit_enhance(&self, endpoint: &str, request: &MixEnhanceRequest) -> Result<Task> {
        let payload = json!({ "mixReviveData": request });
        TaskPoller::new(self)
            .submit(endpoint, &payload, TaskKind::MixEnhance)
            .await
    }
}
