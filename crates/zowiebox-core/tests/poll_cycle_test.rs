#![allow(clippy::unwrap_used)]
// End-to-end poll/monitor scenarios against a wiremock device.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zowiebox_core::feedback::{Feedback, OutputInfoMatch, RecordingStatusMatch};
use zowiebox_core::{Controller, DeviceConfig, HostStatus};

// ── Helpers ─────────────────────────────────────────────────────────

fn host_of(server: &MockServer) -> String {
    server
        .uri()
        .strip_prefix("http://")
        .expect("mock server uri")
        .to_owned()
}

async fn mount_op(server: &MockServer, route: &str, body: serde_json::Value, reply: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(body_partial_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

/// Mount a healthy device answering every fast-cycle read.
async fn mount_healthy_device(server: &MockServer) {
    mount_op(
        server,
        "/system",
        json!({"group": "systime", "opt": "get_systime_info"}),
        json!({
            "status": "00000", "rsp": "succeeded",
            "data": {
                "time": {"year": 2025, "month": 3, "day": 1, "hour": 12, "minute": 0, "second": 0},
                "setting_mode_id": 2, "time_zone_id": "UTC",
                "ntp_enable": 1, "ntp_server": "pool.ntp.org", "ntp_port": 123
            }
        }),
    )
    .await;
    mount_op(
        server,
        "/system",
        json!({"group": "tally_led", "opt": "get_tally_led_info"}),
        json!({
            "status": "00000", "rsp": "succeeded",
            "data": {"selected_color": "red", "switch": 1, "mode_id": 0, "color_id": 1}
        }),
    )
    .await;
    mount_op(
        server,
        "/video",
        json!({"group": "hdmi", "opt": "get_output_info"}),
        json!({
            "status": "00000", "rsp": "succeeded",
            "data": {"format": "1080p60", "audio_switch": 1, "loop_out_switch": 0}
        }),
    )
    .await;
    mount_op(
        server,
        "/video",
        json!({"group": "hdmi", "opt": "get_input_info"}),
        json!({
            "status": "00000", "rsp": "succeeded",
            "data": {
                "hdmi_signal": 1, "audio_signal": 48000,
                "width": 1920, "height": 1080, "framerate": 60.0,
                "desc": "1920x1080P60"
            }
        }),
    )
    .await;
    mount_op(
        server,
        "/audio",
        json!({"group": "all"}),
        json!({
            "status": "00000", "rsp": "succeeded",
            "all": {
                "switch": 1, "ai_devid": 1,
                "ai_type": {"selected_id": 2},
                "codec": {"selected_id": 0},
                "bitrate": {"selected_id": 3},
                "sample_rate": {"selected_id": 4},
                "bit_width": 16, "channel": 2, "volume": 80
            }
        }),
    )
    .await;
    mount_op(
        server,
        "/record",
        json!({"group": "record", "opt": "get_task_list"}),
        json!({
            "status": "00000", "rsp": "succeeded",
            "data": [{
                "index": "usb1_0", "name": "usb1", "status": 1,
                "duration": 42, "curr_file_name": "take01.mp4",
                "storageInfo": {"mount_path": "/mnt/USB1", "freespace": 1024, "totalspace": 4096}
            }]
        }),
    )
    .await;
    // Slow-cycle reads.
    mount_op(
        server,
        "/streamplay",
        json!({"group": "streamplay_ndi", "opt": "ndi_get_all"}),
        json!({
            "status": "00000", "rsp": "succeeded",
            "data": [{
                "index": 0, "name": "HD CAMERA (NDI HB HX,192.168.1.205)",
                "streamplay_status": 1, "bandwidth": 5000, "framerate": 30.0,
                "width": 1920, "height": 1080
            }]
        }),
    )
    .await;
    mount_op(
        server,
        "/record",
        json!({"group": "record", "opt": "get_status"}),
        json!({
            "status": "00000", "rsp": "succeeded",
            "data": {"storage_status": "ok", "free_space": 1024}
        }),
    )
    .await;
}

async fn started_controller(server: &MockServer) -> Controller {
    let controller = Controller::new(DeviceConfig {
        host: host_of(server),
        enable_coms: true,
    });
    controller.start().await.expect("start");
    controller
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn successful_poll_populates_cache_and_drives_feedback() {
    let server = MockServer::start().await;
    mount_healthy_device(&server).await;

    let controller = started_controller(&server).await;
    assert_eq!(controller.host_status(), HostStatus::Ok);
    assert!(controller.is_connected());

    controller.refresh_all().await;
    let cache = controller.cache();

    let output = cache.output_info.get().expect("output populated");
    assert_eq!(output.format, "1080p60");

    let clock = cache.clock.get().expect("clock populated");
    assert_eq!(clock.iso, "2025-03-01T12:00:00Z");

    let audio = cache.audio.get().expect("audio populated");
    assert_eq!(audio.ai_type, "2");
    assert_eq!(audio.volume, 80);

    let tasks = cache.recording_tasks.get().expect("tasks populated");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].storage_info.mount_path, "/mnt/USB1");

    let ndi = cache.ndi_sources.get().expect("ndi populated");
    assert_eq!(ndi[0].index, 0);

    // Feedback against the populated cache (matching / non-matching).
    let matching = Feedback::OutputInfo(OutputInfoMatch {
        format: "1080p60".into(),
        audio_switch: "1".into(),
        loop_out_switch: "0".into(),
    });
    let wrong = Feedback::OutputInfo(OutputInfoMatch {
        format: "2160p30".into(),
        audio_switch: "1".into(),
        loop_out_switch: "0".into(),
    });
    assert!(matching.evaluate(&cache));
    assert!(!wrong.evaluate(&cache));

    let recording = Feedback::RecordingStatus(RecordingStatusMatch { status: "1".into() });
    assert!(recording.evaluate(&cache));

    controller.shutdown().await;
}

#[tokio::test]
async fn variables_publish_after_poll() {
    let server = MockServer::start().await;
    mount_healthy_device(&server).await;

    let controller = started_controller(&server).await;
    controller.refresh_all().await;

    let vars = controller.variables();
    assert_eq!(vars.get("output_format").unwrap(), "1080p60");
    assert_eq!(vars.get("output_audio_switch").unwrap(), "true");
    assert_eq!(vars.get("output_loop_out_switch").unwrap(), "false");
    assert_eq!(vars.get("input_hdmi_signal").unwrap(), "true");
    assert_eq!(vars.get("device_time_iso").unwrap(), "2025-03-01T12:00:00Z");
    assert_eq!(vars.get("tally_color_id").unwrap(), "1");
    assert_eq!(vars.get("recording_usb1_0_status").unwrap(), "1");
    assert_eq!(
        vars.get("recording_usb1_0_storage_mount_path").unwrap(),
        "/mnt/USB1"
    );
    assert_eq!(
        vars.get("ndi_0_name").unwrap(),
        "HD CAMERA (NDI HB HX,192.168.1.205)"
    );
    assert_eq!(vars.get("ndi_0_resolution").unwrap(), "1920x1080");
    assert!(vars.values().all(|v| v != "undefined"));

    controller.shutdown().await;
}

#[tokio::test]
async fn feedback_ids_broadcast_on_slot_change() {
    let server = MockServer::start().await;
    mount_healthy_device(&server).await;

    let controller = started_controller(&server).await;
    let mut feedbacks = controller.subscribe_feedbacks();

    controller.poll_now().await;

    let mut seen = Vec::new();
    while let Ok(id) = feedbacks.try_recv() {
        seen.push(id);
    }
    assert!(seen.contains(&zowiebox_core::FeedbackId::OutputInfo));
    assert!(seen.contains(&zowiebox_core::FeedbackId::RecordingStatus));

    controller.shutdown().await;
}

#[tokio::test]
async fn rejected_polls_leave_the_cache_untouched() {
    let server = MockServer::start().await;
    mount_healthy_device(&server).await;

    let controller = started_controller(&server).await;
    controller.shutdown().await; // stop timers; drive cycles by hand
    controller.poll_now().await;

    let cache = controller.cache();
    let output_before = cache.output_info.get().unwrap();
    let versions_before = (
        cache.output_info.version(),
        cache.audio.version(),
        cache.clock.version(),
        cache.tally.version(),
        cache.recording_tasks.version(),
    );

    // Every call now comes back rejected for a full cycle.
    server.reset().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "80005", "rsp": "failed"
        })))
        .mount(&server)
        .await;

    controller.poll_now().await;

    let versions_after = (
        cache.output_info.version(),
        cache.audio.version(),
        cache.clock.version(),
        cache.tally.version(),
        cache.recording_tasks.version(),
    );
    assert_eq!(versions_before, versions_after, "zero cache writes");
    assert_eq!(*cache.output_info.get().unwrap(), *output_before);

    // The connection monitor maps the credential rejection to BadConfig.
    let status = controller.check_connection().await;
    assert!(matches!(status, HostStatus::BadConfig(ref reason) if reason.contains("80005")));
    assert!(!controller.is_connected());
}

#[tokio::test]
async fn polling_twice_with_unchanged_device_is_idempotent() {
    let server = MockServer::start().await;
    mount_healthy_device(&server).await;

    let controller = started_controller(&server).await;
    controller.refresh_all().await;
    let cache = controller.cache();

    let output_first = cache.output_info.get().unwrap();
    let audio_first = cache.audio.get().unwrap();
    let clock_first = cache.clock.get().unwrap();
    let tasks_first = cache.recording_tasks.get().unwrap();
    let vars_first = controller.variables();

    controller.refresh_all().await;

    assert_eq!(*cache.output_info.get().unwrap(), *output_first);
    assert_eq!(*cache.audio.get().unwrap(), *audio_first);
    assert_eq!(*cache.clock.get().unwrap(), *clock_first);
    assert_eq!(*cache.recording_tasks.get().unwrap(), *tasks_first);
    assert_eq!(*controller.variables(), *vars_first);

    controller.shutdown().await;
}

#[tokio::test]
async fn connection_check_classifies_per_the_table() {
    let server = MockServer::start().await;
    mount_op(
        &server,
        "/system",
        json!({"group": "systime", "opt": "get_systime_info"}),
        json!({"status": "60008", "rsp": "failed"}),
    )
    .await;

    let controller = Controller::new(DeviceConfig {
        host: host_of(&server),
        enable_coms: true,
    });
    controller.start().await.expect("start");

    assert!(matches!(controller.host_status(), HostStatus::BadConfig(_)));
    assert!(!controller.is_connected());

    // A rejected link gates the poller: no cache writes happen.
    controller.poll_now().await;
    assert!(controller.cache().output_info.get().is_none());

    controller.shutdown().await;
}

#[tokio::test]
async fn transport_failure_is_a_connection_failure() {
    let server = MockServer::start().await;
    mount_healthy_device(&server).await;

    let controller = started_controller(&server).await;
    assert!(controller.is_connected());

    // Device disappears.
    drop(server);

    let status = controller.check_connection().await;
    assert!(matches!(status, HostStatus::ConnectionFailure(_)));
    assert!(!controller.is_connected());

    controller.shutdown().await;
}

#[tokio::test]
async fn disabled_comms_never_touch_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "00000"})))
        .expect(0)
        .mount(&server)
        .await;

    let controller = Controller::new(DeviceConfig {
        host: host_of(&server),
        enable_coms: false,
    });
    controller.start().await.expect("start");

    assert_eq!(controller.host_status(), HostStatus::Disconnected);
    controller.refresh_all().await;
    assert!(controller.variables().is_empty());

    controller.shutdown().await;
}

#[tokio::test]
async fn invalid_address_is_bad_config_without_network_contact() {
    let controller = Controller::new(DeviceConfig {
        host: "not-an-address".into(),
        enable_coms: true,
    });

    let err = controller.start().await.expect_err("invalid host");
    assert!(err.to_string().contains("not-an-address"));
    assert!(matches!(controller.host_status(), HostStatus::BadConfig(_)));
}

#[tokio::test]
async fn reconfiguration_rebuilds_the_client_and_rechecks() {
    let first = MockServer::start().await;
    mount_healthy_device(&first).await;

    let controller = started_controller(&first).await;
    assert!(controller.is_connected());

    // Move the instance to a device that rejects the probe.
    let second = MockServer::start().await;
    mount_op(
        &second,
        "/system",
        json!({"group": "systime", "opt": "get_systime_info"}),
        json!({"status": "70002", "rsp": "failed"}),
    )
    .await;

    controller
        .update_config(DeviceConfig {
            host: host_of(&second),
            enable_coms: true,
        })
        .await
        .expect("reconfigure");

    assert!(matches!(controller.host_status(), HostStatus::BadConfig(_)));
    assert!(!controller.is_connected());

    controller.shutdown().await;
}
