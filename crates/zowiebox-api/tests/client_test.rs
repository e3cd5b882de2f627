#![allow(clippy::unwrap_used)]
// Integration tests for `DeviceClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zowiebox_api::{DeviceClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let host = server
        .uri()
        .strip_prefix("http://")
        .expect("mock server uri")
        .to_owned();
    let client = DeviceClient::with_client(reqwest::Client::new(), host);
    (server, client)
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn test_output_info_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/video"))
        .and(query_param("option", "getinfo"))
        .and(query_param("login_check_flag", "1"))
        .and(body_partial_json(json!({
            "group": "hdmi",
            "opt": "get_output_info"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "00000",
            "rsp": "succeeded",
            "data": {
                "format": "1080p60",
                "audio_switch": 1,
                "loop_out_switch": 0
            }
        })))
        .mount(&server)
        .await;

    let reply = client.output_info().await.unwrap().expect("comms enabled");

    assert!(reply.is_acceptable());
    let data = reply.data.unwrap();
    assert_eq!(data.format, "1080p60");
    assert_eq!(data.audio_switch, 1);
    assert_eq!(data.loop_out_switch, 0);
}

#[tokio::test]
async fn test_rejection_is_a_value_not_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "80005",
            "rsp": "failed"
        })))
        .mount(&server)
        .await;

    let reply = client.device_time().await.unwrap().expect("comms enabled");

    assert!(!reply.is_acceptable());
    assert_eq!(reply.reason(), "WrongPassword (80005)");
    assert!(reply.data.is_none());
}

#[tokio::test]
async fn test_modification_success_is_acceptable() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/system"))
        .and(query_param("option", "setinfo"))
        .and(body_partial_json(json!({
            "group": "tally_led",
            "opt": "set_tally_led_info",
            "data": { "mode_id": 1, "color_id": 2 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "000000",
            "rsp": "succeeded"
        })))
        .mount(&server)
        .await;

    let reply = client
        .set_tally_parameters(zowiebox_api::system::TallySettings { mode_id: 1, color_id: 2 })
        .await
        .unwrap()
        .expect("comms enabled");

    assert!(reply.is_acceptable());
}

// ── Comms gate ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_comms_disabled_short_circuits_without_network() {
    let (server, client) = setup().await;

    // Any request reaching the server would violate the gate.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "00000"})))
        .expect(0)
        .mount(&server)
        .await;

    client.set_comms_enabled(false);

    let reply = client.output_info().await.unwrap();
    assert!(reply.is_none());
    assert_eq!(client.requests_sent(), 0);

    // Re-opening the gate lets requests through again.
    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "00000"})))
        .mount(&server)
        .await;

    client.set_comms_enabled(true);
    let reply = client.output_info().await.unwrap();
    assert!(reply.is_some());
    assert_eq!(client.requests_sent(), 1);
}

// ── Transport / decode failures ─────────────────────────────────────

#[tokio::test]
async fn test_http_error_maps_to_transport() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.output_info().await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_non_json_body_maps_to_deserialization() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = client.device_time().await;

    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert!(body.contains("not json"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Bespoke response shapes ─────────────────────────────────────────

#[tokio::test]
async fn test_audio_config_all_shape() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/audio"))
        .and(query_param("option", "getinfo"))
        .and(body_partial_json(json!({ "group": "all" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "00000",
            "rsp": "succeeded",
            "all": {
                "switch": 1,
                "ai_type": { "selected_id": 2, "ai_type_list": ["LINE IN", "Internal MIC", "HDMI IN"] },
                "codec": { "selected_id": 0, "codec_list": ["AAC", "MP3", "G.711A"] },
                "bitrate": { "selected_id": 3, "bitrate_list": [32000, 48000, 64000, 96000, 128000] },
                "sample_rate": { "selected_id": 4, "sample_rate_list": [8000, 16000, 32000, 44100, 48000] },
                "bit_width": 16,
                "channel": 2,
                "volume": 80,
                "ai_devid": 1
            }
        })))
        .mount(&server)
        .await;

    let reply = client.audio_config().await.unwrap().expect("comms enabled");

    assert!(reply.is_acceptable());
    let all = reply.all.unwrap();
    assert_eq!(all.switch, 1);
    assert_eq!(all.ai_type.selected_id, 2);
    assert_eq!(all.bitrate.selected_id, 3);
    assert_eq!(all.channel, 2);
    assert_eq!(all.volume, 80);
}

#[tokio::test]
async fn test_digital_zoom_bare_shape() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/video"))
        .and(body_partial_json(json!({ "group": "digital_zoom" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "00000",
            "rsp": "succeeded",
            "digital_zoom": 2.5,
            "digital_zoom_enable": 1,
            "digital_zoom_max": 8.0
        })))
        .mount(&server)
        .await;

    let reply = client.digital_zoom().await.unwrap().expect("comms enabled");

    assert!(reply.is_acceptable());
    assert!((reply.digital_zoom - 2.5).abs() < f64::EPSILON);
    assert_eq!(reply.digital_zoom_enable, 1);
}

#[tokio::test]
async fn test_recording_task_list_array_payload() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/record"))
        .and(body_partial_json(json!({
            "group": "record",
            "opt": "get_task_list"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "00000",
            "rsp": "succeeded",
            "data": [
                {
                    "index": "usb1_0",
                    "name": "usb1",
                    "status": 1,
                    "duration": 42,
                    "storageInfo": { "mount_path": "/mnt/USB1", "freespace": 1024, "totalspace": 4096 }
                },
                {
                    "index": "sdcard_0",
                    "name": "sdcard",
                    "status": 0
                }
            ]
        })))
        .mount(&server)
        .await;

    let reply = client
        .recording_task_list()
        .await
        .unwrap()
        .expect("comms enabled");

    let tasks = reply.data.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].index, "usb1_0");
    assert_eq!(tasks[0].storage_info.mount_path, "/mnt/USB1");
    assert_eq!(tasks[0].storage_info.freespace, 1024);
    // Missing sub-fields fall back to defaults, never a decode failure.
    assert_eq!(tasks[1].storage_info.mount_path, "");
    assert_eq!(tasks[1].storage_info.freespace, 0);
}
