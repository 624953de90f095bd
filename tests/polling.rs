use std::time::Duration;

use roex::models::common::{DesiredLoudness, MusicalStyle};
use roex::models::enhance::{EnhanceMusicalStyle, MixEnhanceRequest};
use roex::models::mastering::MasteringRequest;
use roex::{
    Client, ClientBuilder, RetryPolicy, RoexError, Task, TaskKind, TaskPoller, TaskStatus,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    ClientBuilder::new()
        .api_key("test-key")
        .base_url(server.uri())
        .max_retries(0)
        .build()
        .unwrap()
}

fn quick(attempts: u32) -> RetryPolicy {
    RetryPolicy::fixed(Duration::from_millis(10), attempts)
}

fn processing() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "PROCESSING" }))
}

async fn status_calls(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}

#[tokio::test]
async fn mastering_preview_completes_on_third_poll() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/masteringpreview"))
        .and(header("x-api-key", "test-key"))
        .and(body_partial_json(json!({
            "masteringData": {
                "trackData": [{ "trackURL": "https://cdn.example/song.wav" }],
                "musicalStyle": "POP",
                "desiredLoudness": "MEDIUM"
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "mastering_task_id": "abc123" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/retrievepreviewmaster"))
        .and(body_partial_json(json!({ "masteringData": { "masteringTaskId": "abc123" } })))
        .respond_with(processing())
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/retrievepreviewmaster"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "download_url_mastered": "https://cdn.example/master.wav"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = MasteringRequest::new(
        "https://cdn.example/song.wav",
        MusicalStyle::Pop,
        DesiredLoudness::Medium,
    );
    let task = client.create_mastering_preview(&request).await.unwrap();
    assert_eq!(task.id, "abc123");
    assert_eq!(task.kind, TaskKind::MasteringPreview);

    let result = client
        .retrieve_preview_master(&task.id, Some(quick(30)))
        .await
        .unwrap();

    assert_eq!(result.download_url(), Some("https://cdn.example/master.wav"));
    assert_eq!(status_calls(&server, "/retrievepreviewmaster").await, 3);
}

#[tokio::test]
async fn times_out_after_exactly_max_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrievepreviewmix"))
        .respond_with(processing())
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .retrieve_preview_mix("mix-1", false, Some(quick(4)))
        .await
        .unwrap_err();

    match err {
        RoexError::Timeout { attempts, budget } => {
            assert_eq!(attempts, 4);
            assert_eq!(budget, Duration::from_millis(30));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(status_calls(&server, "/retrievepreviewmix").await, 4);
}

#[tokio::test]
async fn server_errors_do_not_abort_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrieveenhancedtrack"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/retrieveenhancedtrack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "revived_track_tasks_results": {
                "status": "COMPLETED",
                "download_url_revived": "https://cdn.example/revived.wav"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .retrieve_enhanced_track("enh-1", Some(quick(5)))
        .await
        .unwrap();

    assert_eq!(result.download_url(), Some("https://cdn.example/revived.wav"));
    assert_eq!(status_calls(&server, "/retrieveenhancedtrack").await, 3);
}

#[tokio::test]
async fn transport_timeouts_do_not_abort_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrievepreviewmaster"))
        .respond_with(processing().set_delay(Duration::from_millis(500)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/retrievepreviewmaster"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previewMasterTaskResults": {
                "status": "MASTERING_TASK_PREVIEW_COMPLETED",
                "download_url_preview_mastered": "https://cdn.example/preview.wav"
            }
        })))
        .mount(&server)
        .await;

    let client = ClientBuilder::new()
        .api_key("test-key")
        .base_url(server.uri())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let result = client
        .retrieve_preview_master("m-1", Some(quick(3)))
        .await
        .unwrap();
    assert_eq!(result.download_url(), Some("https://cdn.example/preview.wav"));
}

#[tokio::test]
async fn failed_status_stops_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrievepreviewmix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previewMixTaskResults": { "status": "MIX_TASK_PREVIEW_FAILED" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .retrieve_preview_mix("mix-9", false, Some(quick(10)))
        .await
        .unwrap_err();

    match err {
        RoexError::TaskFailed { task_id, status } => {
            assert_eq!(task_id, "mix-9");
            assert_eq!(status, "MIX_TASK_PREVIEW_FAILED");
        }
        other => panic!("expected task failure, got {other:?}"),
    }
    assert_eq!(status_calls(&server, "/retrievepreviewmix").await, 1);
}

#[tokio::test]
async fn authentication_errors_stop_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrievepreviewmaster"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "bad key" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .retrieve_preview_master("m-2", Some(quick(10)))
        .await
        .unwrap_err();

    assert!(matches!(err, RoexError::Authentication { ref message } if message == "bad key"));
    assert_eq!(status_calls(&server, "/retrievepreviewmaster").await, 1);
}

#[tokio::test]
async fn mix_preview_sends_fx_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrievepreviewmix"))
        .and(body_partial_json(json!({
            "multitrackData": { "multitrackTaskId": "mix-3", "retrieveFXSettings": true }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previewMixTaskResults": {
                "status": "MIX_TASK_PREVIEW_COMPLETED",
                "download_url_preview_mixed": "https://cdn.example/preview_mix.wav",
                "fx_settings": { "gain": 1 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .retrieve_preview_mix("mix-3", true, Some(quick(2)))
        .await
        .unwrap();

    assert_eq!(result.get("fx_settings"), Some(&json!({ "gain": 1 })));
}

#[tokio::test]
async fn submission_is_never_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixenhance"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClientBuilder::new()
        .api_key("test-key")
        .base_url(server.uri())
        .max_retries(3)
        .build()
        .unwrap();
    let poller = TaskPoller::new(&client);
    let err = poller
        .submit("/mixenhance", &json!({}), TaskKind::MixEnhance)
        .await
        .unwrap_err();

    assert!(matches!(err, RoexError::Api { status_code: 503, .. }));
}

#[tokio::test]
async fn submission_without_task_id_is_a_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mixpreview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "accepted" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/masteringpreview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": true,
            "message": "quota exceeded"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let poller = TaskPoller::new(&client);

    let err = poller
        .submit(
            "/mixpreview",
            &json!({}),
            TaskKind::MixPreview {
                retrieve_fx_settings: false,
            },
        )
        .await
        .unwrap_err();
    assert!(
        matches!(err, RoexError::Service { ref message } if message.contains("multitrack_task_id"))
    );

    let err = poller
        .submit("/masteringpreview", &json!({}), TaskKind::MasteringPreview)
        .await
        .unwrap_err();
    assert!(matches!(err, RoexError::Service { ref message } if message == "quota exceeded"));
}

#[tokio::test]
async fn poller_resumes_a_stored_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrieveenhancedtrack"))
        .and(body_partial_json(json!({ "mixReviveData": { "mixReviveTaskId": "saved-7" } })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("https://cdn.example/enhanced.wav"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut task = Task::new("saved-7", TaskKind::MixEnhance);
    assert_eq!(task.status, TaskStatus::Pending);
    let result = TaskPoller::new(&client)
        .poll(&mut task, &quick(2))
        .await
        .unwrap();

    assert_eq!(task.status, TaskStatus::Completed);

    assert_eq!(result.download_url(), Some("https://cdn.example/enhanced.wav"));
    assert_eq!(
        result.into_value(),
        json!({ "download_url": "https://cdn.example/enhanced.wav" })
    );
}

#[tokio::test]
async fn final_master_shapes_are_equivalent() {
    let url = "https://cdn.example/final.wav";
    let bodies: [Value; 3] = [
        json!({ "finalMasterTaskResults": { "download_url_mastered": url } }),
        json!({ "download_url_mastered": url }),
        json!(url),
    ];

    for body in bodies {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/retrievefinalmaster"))
            .and(body_partial_json(json!({ "masteringData": { "masteringTaskId": "fm-1" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.retrieve_final_master("fm-1").await.unwrap();
        assert!(!result.is_raw(), "{body} was not recognized");
        assert_eq!(result.download_url(), Some(url));
    }
}

#[tokio::test]
async fn unknown_final_master_shape_is_returned_raw() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrievefinalmaster"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": 42 })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.retrieve_final_master("fm-2").await.unwrap();
    assert!(result.is_raw());
    assert_eq!(result.into_value(), json!({ "unexpected": 42 }));
}

#[tokio::test]
async fn enhance_preview_and_full_share_the_envelope() {
    let server = MockServer::start().await;
    for (endpoint, id) in [("/mixenhancepreview", "prev-1"), ("/mixenhance", "full-1")] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_partial_json(json!({
                "mixReviveData": {
                    "audioFileLocation": "https://cdn.example/mix.wav",
                    "musicalStyle": "TECHNO",
                    "fixDRCIssues": true,
                    "applyMastering": true
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "mixrevive_task_id": id })),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let request = MixEnhanceRequest::new("https://cdn.example/mix.wav", EnhanceMusicalStyle::Techno);

    let preview = client.create_mix_enhance_preview(&request).await.unwrap();
    let full = client.create_mix_enhance(&request).await.unwrap();

    assert_eq!(preview.id, "prev-1");
    assert_eq!(full.id, "full-1");
    assert_eq!(full.kind, TaskKind::MixEnhance);
}

#[tokio::test]
async fn poll_records_the_last_reported_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/retrievepreviewmaster"))
        .respond_with(processing())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/retrievepreviewmix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previewMixTaskResults": { "status": "MIX_TASK_PREVIEW_FAILED" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let poller = TaskPoller::new(&client);

    let mut master = Task::new("m-5", TaskKind::MasteringPreview);
    let err = poller.poll(&mut master, &quick(2)).await.unwrap_err();
    assert!(matches!(err, RoexError::Timeout { attempts: 2, .. }));
    assert_eq!(master.status, TaskStatus::Processing);

    let mut mix = Task::new(
        "mix-5",
        TaskKind::MixPreview {
            retrieve_fx_settings: false,
        },
    );
    let err = poller.poll(&mut mix, &quick(2)).await.unwrap_err();
    assert!(matches!(err, RoexError::TaskFailed { .. }));
    assert_eq!(mix.status, TaskStatus::Failed);
    assert!(mix.status.is_terminal());
}
