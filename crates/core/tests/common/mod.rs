//! Shared fixtures for the HTTP-level tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use serde_json::{Value, json};
use wiremock::MockServer;
use ytcaption_core::{Downloader, ManualClock, Options, RetryPolicy};

pub const VIDEO_ID: &str = "vStJoetOxJg";
pub const PLAYER_PATH: &str = "/youtubei/v1/player";
pub const TIMEDTEXT_PATH: &str = "/api/timedtext";

/// Budget of one second of virtual backoff: 100, 200, 400 ms, then stop.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        base_delay: Duration::from_millis(100),
        multiplier: 2.0,
        max_interval: Duration::from_secs(1),
        max_elapsed: Duration::from_secs(1),
        jitter: None,
    }
}

pub fn test_options() -> Options {
    Options::default()
        .with_timeout(Duration::from_secs(10))
        .with_user_agent("ytcaption-test")
}

pub fn downloader(server: &MockServer, options: Options, clock: &ManualClock) -> Downloader {
    Downloader::new(options)
        .with_policy(fast_policy())
        .with_clock(Arc::new(clock.clone()))
        .with_player_url(format!("{}{PLAYER_PATH}?prettyPrint=false", server.uri()))
}

pub fn track_json(server: &MockServer, lang: &str, kind: Option<&str>, name: &str) -> Value {
    let mut track = json!({
        "baseUrl": format!("{}{TIMEDTEXT_PATH}?v={VIDEO_ID}&lang={lang}", server.uri()),
        "languageCode": lang,
        "name": { "simpleText": name },
    });
    if let Some(kind) = kind {
        track["kind"] = json!(kind);
    }
    track
}

pub fn player_json(tracks: Vec<Value>) -> Value {
    json!({
        "playabilityStatus": { "status": "OK" },
        "captions": {
            "playerCaptionsTracklistRenderer": { "captionTracks": tracks }
        }
    })
}

pub fn payload_json() -> Value {
    json!({
        "wireMagic": "pb3",
        "events": [
            { "tStartMs": 0, "dDurationMs": 6000, "id": 1 },
            { "tStartMs": 1000, "dDurationMs": 2500, "segs": [
                { "utf8": "Hello", "acAsrConf": 0 },
                { "utf8": " world", "tOffsetMs": 500, "acAsrConf": 0 }
            ]},
            { "tStartMs": 2400, "segs": [ { "utf8": "\n" } ] },
            { "tStartMs": 3000, "dDurationMs": 1000, "segs": [
                { "utf8": "again" }
            ]}
        ]
    })
}
