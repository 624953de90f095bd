//! # RoEx Tonn SDK for Rust
//!
//! Async client for the [RoEx Tonn](https://tonn.roexaudio.com) audio API:
//! multitrack mixing, mastering, mix analysis, enhancement and audio cleanup.
//!
//! Most operations start a task on the service and hand back a [`Task`];
//! the matching `retrieve_*` call polls it until it completes, fails, or the
//! [`RetryPolicy`] runs out of attempts.
//!
//! ## Quick start
//!
//! ```no_run
//! use roex::models::common::{DesiredLoudness, MusicalStyle};
//! use roex::models::mastering::MasteringRequest;
//! use roex::Client;
//!
//! #[tokio::main]
//! async fn main() -> roex::Result<()> {
//!     let client = Client::new("roex_api_key")?;
//!
//!     let track_url = client.upload_file("song.wav").await?;
//!     let request = MasteringRequest::new(track_url, MusicalStyle::RockIndie, DesiredLoudness::High);
//!
//!     let task = client.create_mastering_preview(&request).await?;
//!     client.retrieve_preview_master(&task.id, None).await?;
//!
//!     let master = client.retrieve_final_master(&task.id).await?;
//!     if let Some(url) = master.download_url() {
//!         client.download_file(url, "out/final_master.wav").await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Builder pattern
//!
//! ```no_run
//! use roex::{ClientBuilder, RetryPolicy};
//! use std::time::Duration;
//!
//! # async fn example() -> roex::Result<()> {
//! let client = ClientBuilder::new()
//!     .api_key("roex_api_key")
//!     .base_url("https://tonn.roexaudio.com")
//!     .max_retries(5)
//!     .timeout(Duration::from_secs(120))
//!     .build()?;
//!
//! let patient = RetryPolicy::fixed(Duration::from_secs(10), 60);
//! let preview = client.retrieve_preview_master("task-id", Some(patient)).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Everything is reported through [`tracing`] under the client's span
//! (`roex` unless one is passed to [`ClientBuilder::span`]). Install any
//! subscriber to see it.

mod analysis;
mod cleanup;
mod client;
mod enhance;
mod errors;
mod mastering;
mod mix;
pub mod models;
mod poller;
mod response;
mod transfer;

pub use client::{Client, ClientBuilder};
pub use errors::{Result, RoexError};
pub use models::upload::{AudioFormat, UploadSlot};
pub use poller::{Backoff, RetryPolicy, TaskPoller};
pub use response::{Task, TaskKind, TaskResult, TaskStatus};
