//! Task bookkeeping and response-shape decoding.
//!
//! The service reports results under different keys depending on the task
//! type. [`decode`] tries the known shapes in a fixed order and falls back to
//! [`Shape::Unknown`]; [`classify`] turns a decoded response into a polling
//! decision.

use serde_json::{json, Map, Value};

/// Lifecycle of a remote task as seen by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    /// Completed or Failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Reads a `status` field. The service uses both task-specific strings
    /// (`MIX_TASK_PREVIEW_COMPLETED`, `completed`) and HTTP-like numbers (202).
    pub(crate) fn from_wire(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => {
                let s = s.to_ascii_uppercase();
                let words: Vec<&str> = s
                    .split(|c: char| !c.is_ascii_alphanumeric())
                    .filter(|w| !w.is_empty())
                    .collect();
                let finished = matches!(
                    words.last(),
                    Some(&("COMPLETED" | "COMPLETE" | "SUCCESS" | "SUCCEEDED" | "DONE"))
                ) && !words.contains(&"NOT");

                let status = if s.contains("FAIL") || s.contains("ERROR") {
                    TaskStatus::Failed
                } else if finished {
                    TaskStatus::Completed
                } else if s == "PENDING" || s == "QUEUED" {
                    TaskStatus::Pending
                } else {
                    TaskStatus::Processing
                };
                Some(status)
            }
            Value::Number(n) => {
                let code = n.as_u64()?;
                Some(match code {
                    202 => TaskStatus::Processing,
                    200..=299 => TaskStatus::Completed,
                    400.. => TaskStatus::Failed,
                    _ => TaskStatus::Processing,
                })
            }
            _ => None,
        }
    }
}

/// The asynchronous operations the service exposes, and how to ask about each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    MixPreview { retrieve_fx_settings: bool },
    MasteringPreview,
    MixEnhance,
}

impl TaskKind {
    /// Response field holding the id of a freshly submitted task.
    pub(crate) fn id_key(self) -> &'static str {
        match self {
            TaskKind::MixPreview { .. } => "multitrack_task_id",
            TaskKind::MasteringPreview => "mastering_task_id",
            TaskKind::MixEnhance => "mixrevive_task_id",
        }
    }

    pub(crate) fn status_endpoint(self) -> &'static str {
        match self {
            TaskKind::MixPreview { .. } => "/retrievepreviewmix",
            TaskKind::MasteringPreview => "/retrievepreviewmaster",
            TaskKind::MixEnhance => "/retrieveenhancedtrack",
        }
    }

    pub(crate) fn status_payload(self, task_id: &str) -> Value {
        match self {
            TaskKind::MixPreview {
                retrieve_fx_settings,
            } => json!({
                "multitrackData": {
                    "multitrackTaskId": task_id,
                    "retrieveFXSettings": retrieve_fx_settings,
                }
            }),
            TaskKind::MasteringPreview => json!({
                "masteringData": { "masteringTaskId": task_id }
            }),
            TaskKind::MixEnhance => json!({
                "mixReviveData": { "mixReviveTaskId": task_id }
            }),
        }
    }

    /// Key the finished result is normally delivered under.
    pub(crate) fn result_key(self) -> &'static str {
        match self {
            TaskKind::MixPreview { .. } => "previewMixTaskResults",
            TaskKind::MasteringPreview => "previewMasterTaskResults",
            TaskKind::MixEnhance => "revived_track_tasks_results",
        }
    }
}

/// A task accepted by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub kind: TaskKind,
    pub status: TaskStatus,
}

impl Task {
    /// A freshly submitted task. Also handy for resuming a task whose id was
    /// stored elsewhere.
    pub fn new(id: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id: id.into(),
            kind,
            status: TaskStatus::Pending,
        }
    }
}

/// Normalized outcome of a finished task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResult {
    /// Result fields extracted from a recognized response shape.
    /// A bare URL response becomes `{"download_url": <url>}`.
    Ready(Map<String, Value>),
    /// The response did not match any known shape and is returned untouched.
    Raw(Value),
}

impl TaskResult {
    /// The download URL of the produced audio, if the result carries one.
    ///
    /// Prefers an exact `download_url` key, then the first `download_url*` key.
    pub fn download_url(&self) -> Option<&str> {
        match self {
            TaskResult::Ready(map) => download_url_in(map),
            TaskResult::Raw(Value::String(s)) if is_url(s) => Some(s),
            TaskResult::Raw(Value::Object(map)) => download_url_in(map),
            TaskResult::Raw(_) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            TaskResult::Ready(map) => map.get(key),
            TaskResult::Raw(value) => value.get(key),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, TaskResult::Raw(_))
    }

    pub fn into_value(self) -> Value {
        match self {
            TaskResult::Ready(map) => Value::Object(map),
            TaskResult::Raw(value) => value,
        }
    }
}

fn download_url_in(map: &Map<String, Value>) -> Option<&str> {
    if let Some(url) = map.get("download_url").and_then(Value::as_str) {
        return Some(url);
    }
    map.iter()
        .filter(|(k, _)| k.starts_with("download_url"))
        .find_map(|(_, v)| v.as_str())
}

fn has_download_url(map: &Map<String, Value>) -> bool {
    map.iter()
        .any(|(k, v)| k.starts_with("download_url") && v.is_string())
}

fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn is_results_key(key: &str) -> bool {
    key.ends_with("Results") || key.ends_with("_results")
}

/// A response matched against the known result layouts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Shape<'a> {
    /// Result object under a `...Results` key.
    Keyed {
        key: &'a str,
        body: &'a Map<String, Value>,
    },
    /// The whole body is a URL.
    Url(&'a str),
    /// An object (top-level or nested one level) holding `download_url*`.
    Download(&'a Map<String, Value>),
    Unknown,
}

impl Shape<'_> {
    fn describe(&self) -> &str {
        match self {
            Shape::Keyed { key, .. } => *key,
            Shape::Url(_) => "url",
            Shape::Download(_) => "download_url",
            Shape::Unknown => "unknown",
        }
    }

    fn into_result(self, original: &Value) -> TaskResult {
        match self {
            Shape::Keyed { body, .. } | Shape::Download(body) => TaskResult::Ready(body.clone()),
            Shape::Url(url) => {
                let mut map = Map::new();
                map.insert("download_url".to_string(), Value::String(url.to_string()));
                TaskResult::Ready(map)
            }
            Shape::Unknown => TaskResult::Raw(original.clone()),
        }
    }
}

/// Tries each known layout in order and returns the first that fits.
pub(crate) fn decode<'a>(value: &'a Value, result_key: Option<&str>) -> Shape<'a> {
    if let Value::String(s) = value {
        if is_url(s) {
            return Shape::Url(s);
        }
        return Shape::Unknown;
    }

    let Some(obj) = value.as_object() else {
        return Shape::Unknown;
    };

    if let Some(key) = result_key {
        if let Some((k, Value::Object(body))) = obj.get_key_value(key) {
            if !body.is_empty() {
                return Shape::Keyed { key: k, body };
            }
        }
    }

    for (k, v) in obj {
        if let Value::Object(body) = v {
            if is_results_key(k) && !body.is_empty() {
                return Shape::Keyed { key: k, body };
            }
        }
    }

    if has_download_url(obj) {
        return Shape::Download(obj);
    }

    for v in obj.values() {
        if let Value::Object(nested) = v {
            if has_download_url(nested) {
                return Shape::Download(nested);
            }
        }
    }

    Shape::Unknown
}

/// What a single status response means for the polling loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Classified {
    Done(TaskResult),
    Failed(String),
    NotReady(Option<TaskStatus>),
}

pub(crate) fn classify(value: &Value, result_key: Option<&str>) -> Classified {
    let shape = decode(value, result_key);

    // The result's own status wins over the envelope's.
    let raw_status = match &shape {
        Shape::Keyed { body, .. } | Shape::Download(body) if body.contains_key("status") => {
            body.get("status")
        }
        _ => value.get("status"),
    };
    let status = raw_status.and_then(TaskStatus::from_wire);
    tracing::debug!(shape = shape.describe(), ?status, "decoded status response");

    match status {
        Some(TaskStatus::Failed) => {
            let text = match raw_status {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => "FAILED".to_string(),
            };
            Classified::Failed(text)
        }
        Some(s @ (TaskStatus::Pending | TaskStatus::Processing)) => Classified::NotReady(Some(s)),
        _ => match shape {
            Shape::Unknown if status == Some(TaskStatus::Completed) => {
                Classified::Done(TaskResult::Raw(value.clone()))
            }
            Shape::Unknown => Classified::NotReady(status),
            known => Classified::Done(known.into_result(value)),
        },
    }
}

/// Single-shot decode for endpoints that answer synchronously: a recognized
/// shape is normalized, anything else is handed back as-is.
pub(crate) fn normalize(value: Value, result_key: Option<&str>) -> TaskResult {
    let shape = decode(&value, result_key);
    shape.into_result(&value)
}
