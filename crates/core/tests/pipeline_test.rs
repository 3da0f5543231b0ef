//! End-to-end download tests against a mock player and timed-text server.

mod common;

use common::*;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};
use ytcaption_core::{ErrorKind, ManualClock, OutputFormat};

#[tokio::test]
async fn downloads_and_renders_preferred_track() {
    let server = MockServer::start().await;
    let tracks = vec![
        track_json(&server, "es", Some("asr"), "Spanish (auto-generated)"),
        track_json(&server, "en", None, "English"),
        track_json(&server, "en", Some("asr"), "English (auto-generated)"),
    ];

    Mock::given(method("POST"))
        .and(path(PLAYER_PATH))
        .and(header("content-type", "application/json"))
        .and(header("user-agent", "ytcaption-test"))
        .and(body_json(json!({
            "context": { "client": { "clientName": "WEB", "clientVersion": "2.20250925.01.00" } },
            "videoId": VIDEO_ID
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json(tracks)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(TIMEDTEXT_PATH))
        .and(query_param("lang", "en"))
        .and(query_param("fmt", "json3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload_json()))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let caption = downloader(&server, test_options(), &clock)
        .download(VIDEO_ID)
        .await
        .unwrap();

    assert_eq!(caption.events.len(), 4);
    assert_eq!(caption.plain_text(), "Hello world again");
    assert_eq!(
        caption.srt(),
        "1\n00:00:01,000 --> 00:00:01,500\nHello world\n\n\
         2\n00:00:03,000 --> 00:00:03,000\nagain\n\n"
    );
    assert_eq!(
        OutputFormat::Vtt.render(&caption).unwrap(),
        "WEBVTT\n\n00:00:01.000 --> 00:00:01.500\nHello world\n\n\
         00:00:03.000 --> 00:00:03.000\nagain\n\n"
    );
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn falls_back_to_authored_track_in_requested_language() {
    let server = MockServer::start().await;
    let tracks = vec![
        track_json(&server, "de", Some("asr"), "German (auto-generated)"),
        track_json(&server, "en", None, "English"),
    ];

    Mock::given(method("POST"))
        .and(path(PLAYER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json(tracks)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TIMEDTEXT_PATH))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload_json()))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let caption = downloader(&server, test_options(), &clock)
        .download(VIDEO_ID)
        .await
        .unwrap();
    assert_eq!(caption.subtitle_spans().len(), 2);
}

#[tokio::test]
async fn video_without_captions_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PLAYER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playabilityStatus": { "status": "OK" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let err = downloader(&server, test_options(), &clock)
        .download(VIDEO_ID)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn invalid_id_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let dl = downloader(&server, test_options(), &clock);
    for bad in ["", "short", "vStJoetOxJg!", "vStJoetOx/g"] {
        assert_eq!(dl.download(bad).await.unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(dl.tracks(bad).await.unwrap_err().kind(), ErrorKind::InvalidInput);
    }
}

#[tokio::test]
async fn malformed_payload_is_decode_error_without_retry() {
    let server = MockServer::start().await;
    let tracks = vec![track_json(&server, "en", Some("asr"), "English (auto-generated)")];

    Mock::given(method("POST"))
        .and(path(PLAYER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json(tracks)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TIMEDTEXT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<transcript/>"))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let err = downloader(&server, test_options(), &clock)
        .download(VIDEO_ID)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeError);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn payload_retries_are_independent_of_metadata_retries() {
    let server = MockServer::start().await;
    let tracks = vec![track_json(&server, "en", Some("asr"), "English (auto-generated)")];

    Mock::given(method("POST"))
        .and(path(PLAYER_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PLAYER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json(tracks)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TIMEDTEXT_PATH))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TIMEDTEXT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload_json()))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let caption = downloader(&server, test_options(), &clock)
        .download(VIDEO_ID)
        .await
        .unwrap();
    assert_eq!(caption.plain_text(), "Hello world again");

    // Each round trip starts its own schedule at the base delay.
    assert_eq!(
        clock.sleeps(),
        vec![
            std::time::Duration::from_millis(100),
            std::time::Duration::from_millis(100),
            std::time::Duration::from_millis(200),
        ]
    );
}

#[tokio::test]
async fn lists_available_tracks() {
    let server = MockServer::start().await;
    let tracks = vec![
        track_json(&server, "en", Some("asr"), "English (auto-generated)"),
        track_json(&server, "fr", None, "French"),
    ];
    Mock::given(method("POST"))
        .and(path(PLAYER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json(tracks)))
        .expect(1)
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let tracks = downloader(&server, test_options(), &clock)
        .tracks(VIDEO_ID)
        .await
        .unwrap();
    let listed: Vec<String> = tracks.iter().map(ToString::to_string).collect();
    assert_eq!(
        listed,
        ["English (auto-generated) (en) - asr", "French (fr) - "]
    );
}

#[tokio::test]
async fn json_snapshot_round_trips_through_disk() {
    let server = MockServer::start().await;
    let tracks = vec![track_json(&server, "en", Some("asr"), "English (auto-generated)")];
    Mock::given(method("POST"))
        .and(path(PLAYER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(player_json(tracks)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TIMEDTEXT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload_json()))
        .mount(&server)
        .await;

    let clock = ManualClock::new();
    let caption = downloader(&server, test_options(), &clock)
        .download(VIDEO_ID)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    ytcaption_core::save_caption(&caption, &path, OutputFormat::Json)
        .await
        .unwrap();
    let loaded = ytcaption_core::load_caption(&path).await.unwrap();

    assert_eq!(loaded, caption);
    assert_eq!(loaded.srt(), caption.srt());
}
