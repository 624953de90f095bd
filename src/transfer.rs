//! Moving audio files in and out of the service through signed URLs.

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn, Instrument};

use crate::client::{error_for_status, Client};
use crate::errors::{Result, RoexError};
use crate::models::upload::{AudioFormat, UploadSlot, UploadUrlRequest, UploadUrlResponse};

impl Client {
    /// Request a signed upload URL and a permanent readable URL for one file.
    ///
    /// # Errors
    ///
    /// [`RoexError::Service`] if the service flags an error or omits either URL.
    pub async fn get_upload_url(&self, request: &UploadUrlRequest) -> Result<UploadSlot> {
        async {
            debug!(filename = %request.filename, "requesting upload URL");
            let value = self.post_value("/upload", request).await?;
            let resp: UploadUrlResponse = serde_json::from_value(value)?;

            if resp.status.error {
                error!(message = %resp.status.message, "upload URL request rejected");
                return Err(RoexError::service(resp.status.message));
            }

            match (resp.signed_url, resp.readable_url) {
                (Some(signed_url), Some(readable_url)) => Ok(UploadSlot {
                    signed_url,
                    readable_url,
                }),
                _ => Err(RoexError::service(
                    "upload response is missing signed_url or readable_url",
                )),
            }
        }
        .instrument(self.span().clone())
        .await
    }

    /// Upload a local `.wav`, `.flac` or `.mp3` file and return its readable URL.
    ///
    /// This performs two HTTP calls:
    /// 1. `POST /upload` to obtain an [`UploadSlot`].
    /// 2. `PUT` the file bytes to the signed URL with the matching audio `Content-Type`.
    ///
    /// # Errors
    ///
    /// - [`RoexError::Validation`] for unsupported extensions, before any request is made.
    /// - [`RoexError::Io`] if the file cannot be read.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();

        async {
            let format = AudioFormat::from_path(path)?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| RoexError::Validation(format!("{} has no file name", path.display())))?;

            let file_bytes = tokio::fs::read(path).await?;

            let slot = self
                .get_upload_url(&UploadUrlRequest {
                    filename: filename.clone(),
                    content_type: format.mime_type().to_string(),
                })
                .await?;

            debug!(%filename, bytes = file_bytes.len(), "uploading to signed URL");
            let upload_resp = self
                .http
                .put(&slot.signed_url)
                .header(CONTENT_TYPE, format.mime_type())
                .body(file_bytes)
                .send()
                .await
                .inspect_err(|e| error!(%filename, error = %e, "upload failed"))?;

            let status = upload_resp.status();
            if !status.is_success() {
                let text = upload_resp.text().await.unwrap_or_default();
                error!(%filename, status = status.as_u16(), "upload to signed URL failed");
                return Err(RoexError::Api {
                    status_code: status.as_u16(),
                    message: format!("upload to signed URL failed: {text}"),
                    body: None,
                });
            }

            info!(%filename, readable_url = %slot.readable_url, "file uploaded");
            Ok(slot.readable_url)
        }
        .instrument(self.span().clone())
        .await
    }

    /// Stream a result file to `dest`, creating parent directories as needed.
    ///
    /// Returns the number of bytes written.
    pub async fn download_file(&self, url: &str, dest: impl AsRef<Path>) -> Result<u64> {
        let dest = dest.as_ref();

        async {
            if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }

            let mut response = self
                .http
                .get(url)
                .send()
                .await
                .inspect_err(|e| error!(url, error = %e, "download failed"))?;

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                error!(url, status = status.as_u16(), "download failed");
                return Err(error_for_status(status.as_u16(), text));
            }

            let mut file = tokio::fs::File::create(dest).await?;
            let streamed = async {
                let mut written = 0u64;
                while let Some(chunk) = response.chunk().await? {
                    file.write_all(&chunk).await?;
                    written += chunk.len() as u64;
                }
                file.flush().await?;
                Ok::<_, RoexError>(written)
            }
            .await;

            let written = match streamed {
                Ok(written) => written,
                Err(e) => {
                    drop(file);
                    error!(url, error = %e, "download interrupted, removing partial file");
                    if let Err(rm) = tokio::fs::remove_file(dest).await {
                        warn!(dest = %dest.display(), error = %rm, "could not remove partial file");
                    }
                    return Err(e);
                }
            };

            info!(url, dest = %dest.display(), bytes = written, "file downloaded");
            Ok(written)
        }
        .instrument(self.span().clone())
        .await
    }
}
