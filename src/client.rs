use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::errors::{Result, RoexError};
use crate::poller::{retry_until, Outcome, RetryPolicy, Step};

const DEFAULT_BASE_URL: &str = "https://tonn.roexaudio.com";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const RETRY_BACKOFF_START: Duration = Duration::from_secs(1);
const RETRY_BACKOFF_MAX: Duration = Duration::from_secs(32);
const API_KEY_HEADER: &str = "x-api-key";

/// Builder for constructing a [`Client`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use roex::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> roex::Result<()> {
/// let client = ClientBuilder::new()
///     .api_key("roex_api_key")
///     .base_url("https://staging.example.com")
///     .max_retries(5)
///     .timeout(Duration::from_secs(120))
///     .span(tracing::info_span!("mastering_job"))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    max_retries: u32,
    timeout: Duration,
    span: Option<Span>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            span: None,
        }
    }

    /// Set the API key sent in the `x-api-key` header.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the base URL (defaults to `https://tonn.roexaudio.com`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// How many times idempotent GETs are retried on transient errors
    /// (defaults to 3). Task submissions are never retried.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Set the HTTP request timeout (defaults to 60 seconds).
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    /// Span every client operation is logged under (defaults to `roex`).
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Build the [`Client`].
    ///
    /// Missing settings fall back to the `ROEX_API_KEY` and `ROEX_BASE_URL`
    /// environment variables.
    ///
    /// Returns [`RoexError::Authentication`] if no non-empty key is available.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("ROEX_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| RoexError::Authentication {
                message: "API key is required. Pass it to ClientBuilder::api_key() \
                          or set the ROEX_API_KEY environment variable."
                    .into(),
            })?;

        let base_url = self
            .base_url
            .or_else(|| std::env::var("ROEX_BASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut key = HeaderValue::from_str(&api_key)
            .map_err(|_| RoexError::Validation("API key contains invalid characters".into()))?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(RoexError::Http)?;

        let span = self.span.unwrap_or_else(|| info_span!("roex"));
        span.in_scope(|| info!(base_url = %base_url, "client initialized"));

        Ok(Client {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
            http,
            request_policy: RetryPolicy::exponential(
                RETRY_BACKOFF_START,
                RETRY_BACKOFF_MAX,
                self.max_retries.saturating_add(1),
            ),
            span,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The RoEx Tonn API client.
///
/// Use [`Client::new`] for quick construction or [`ClientBuilder`] for full control.
///
/// # Example
///
/// ```no_run
/// use roex::models::common::{DesiredLoudness, MusicalStyle};
/// use roex::models::mastering::MasteringRequest;
/// use roex::Client;
///
/// # async fn example() -> roex::Result<()> {
/// let client = Client::new("roex_api_key")?;
///
/// let track_url = client.upload_file("song.wav").await?;
/// let request = MasteringRequest::new(track_url, MusicalStyle::Pop, DesiredLoudness::Medium);
/// let task = client.create_mastering_preview(&request).await?;
/// let preview = client.retrieve_preview_master(&task.id, None).await?;
/// println!("{:?}", preview.download_url());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    headers: HeaderMap,
    pub(crate) http: reqwest::Client,
    request_policy: RetryPolicy,
    span: Span,
}

impl Client {
    /// Create a new client with the given API key and default settings.
    ///
    /// For customization, use [`ClientBuilder`] instead.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The span this client logs under.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Check that the API is reachable. Transient failures are retried.
    ///
    /// Returns the status text the service answers with.
    pub async fn health_check(&self) -> Result<String> {
        async {
            let outcome = retry_until(&self.request_policy, |attempt| async move {
                match self.send(Method::GET, "/health", None).await {
                    Ok(value) => Step::Done(value),
                    Err(e) if e.is_transient() => {
                        warn!(attempt, error = %e, "health check failed, retrying");
                        Step::Retry(Some(e))
                    }
                    Err(e) => Step::Abort(e),
                }
            })
            .await;

            let value = match outcome {
                Ok(Outcome::Done(value)) => value,
                Ok(Outcome::Exhausted(last)) => {
                    let err = last.unwrap_or_else(|| RoexError::Api {
                        status_code: 0,
                        message: "request failed after all retries".into(),
                        body: None,
                    });
                    error!(error = %err, "health check failed");
                    return Err(err);
                }
                Err(e) => {
                    error!(error = %e, "health check failed");
                    return Err(e);
                }
            };

            let status = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            info!(%status, "health check succeeded");
            Ok(status)
        }
        .instrument(self.span.clone())
        .await
    }

    // -----------------------------------------------------------------------
    // Crate-internal transport
    // -----------------------------------------------------------------------

    /// Single POST with a JSON body. No retries.
    pub(crate) async fn post_value<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(&body)).await
    }

    /// Execute one authenticated request and return the body as JSON.
    ///
    /// A 2xx body that is not JSON comes back as a JSON string; an empty one
    /// as `null`. Non-2xx statuses are mapped to typed errors:
    /// 401, 403, 404 and 429 get their own variants, the rest become
    /// [`RoexError::Api`].
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, path, "sending request");

        let mut req = self
            .http
            .request(method, &url)
            .headers(self.headers.clone());
        if let Some(b) = body {
            req = req.header(CONTENT_TYPE, "application/json").json(b);
        }

        let response = req
            .send()
            .await
            .inspect_err(|e| warn!(path, error = %e, "transport error"))?;

        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)));
        }

        Err(error_for_status(status.as_u16(), text))
    }
}

/// Map a non-2xx response onto the error taxonomy.
pub(crate) fn error_for_status(status_code: u16, text: String) -> RoexError {
    let parsed_body: Option<Value> = serde_json::from_str(&text).ok();

    let message = parsed_body
        .as_ref()
        .and_then(|b| b.get("message").or_else(|| b.get("error")))
        .and_then(|e| e.as_str())
        .unwrap_or(&text)
        .to_string();

    match status_code {
        401 => RoexError::Authentication { message },
        403 => RoexError::PermissionDenied { message },
        404 => RoexError::NotFound { message },
        429 => {
            let retry_after = parsed_body
                .as_ref()
                .and_then(|b| b.get("retryAfter"))
                .and_then(|v| v.as_f64());

            RoexError::RateLimit {
                message,
                retry_after,
            }
        }
        _ => RoexError::Api {
            status_code,
            message,
            body: parsed_body,
        },
    }
}
