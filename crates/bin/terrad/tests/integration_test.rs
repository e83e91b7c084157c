//! End-to-end smoke tests for the full terrad stack.
//!
//! Each test spins up the complete application (fresh data directory,
//! default settings, virtual hardware, real axum router) and exercises the
//! HTTP layer via `tower::ServiceExt::oneshot` — no TCP port is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tokio::sync::Mutex;
use tower::ServiceExt;

use terra_adapter_http_axum::router;
use terra_adapter_http_axum::state::AppState;
use terra_adapter_virtual::{VirtualRelayBoard, VirtualSensorBoard};
use terra_app::controller::{StoragePaths, Terrarium};
use terra_app::settings;
use terra_app::trace::DEFAULT_MAX_TRACE_DAYS;
use terra_domain::timer::Timer;

/// Build a fully-wired router backed by a fresh data directory.
fn app(dir: &std::path::Path) -> axum::Router {
    let paths = StoragePaths::under(dir);
    let loaded = settings::load_or_init(&paths.settings).expect("settings should initialise");
    let now = NaiveDate::from_ymd_opt(2021, 1, 8)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let mut terrarium = Terrarium::new(
        loaded,
        paths,
        DEFAULT_MAX_TRACE_DAYS,
        VirtualRelayBoard::new(),
        VirtualSensorBoard::new(),
        now,
    )
    .expect("default settings should validate");
    terrarium.bootstrap().expect("bootstrap should succeed");
    router::build(AppState::new(Arc::new(Mutex::new(terrarium))))
}

async fn get_json(app: axum::Router, uri: &str) -> serde_json::Value {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let dir = tempfile::tempdir().unwrap();
    let resp = app(dir.path())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Unit description and state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_describe_the_default_unit() {
    let dir = tempfile::tempdir().unwrap();
    let json = get_json(app(dir.path()), "/api/properties").await;

    assert_eq!(json["tcu"], "TERRARIUM");
    assert_eq!(json["nr_of_timers"], 23);
    assert_eq!(json["nr_of_programs"], 2);
    let devices = json["devices"].as_array().unwrap();
    assert_eq!(devices.len(), 11);
    assert_eq!(devices[0]["device"], "light1");
    let uvlight = devices.iter().find(|d| d["device"] == "uvlight").unwrap();
    assert_eq!(uvlight["lc_counted"], true);
}

#[tokio::test]
async fn should_persist_settings_file_on_first_start() {
    let dir = tempfile::tempdir().unwrap();
    let _ = app(dir.path());
    assert!(dir.path().join("settings.json").exists());
}

// ---------------------------------------------------------------------------
// Manual device control round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_cycle_a_device_through_the_api() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/device/pump/on/30")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let json = get_json(app.clone(), "/api/state").await;
    let pump = json["state"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["device"] == "pump")
        .unwrap()
        .clone();
    assert_eq!(pump["state"], "on");
    assert_eq!(pump["end_time"], "10:00:30");

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/device/pump/off")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let json = get_json(app, "/api/state").await;
    let pump = json["state"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["device"] == "pump")
        .unwrap()
        .clone();
    assert_eq!(pump["state"], "off");
    assert!(pump.get("end_time").is_none());
}

#[tokio::test]
async fn should_flag_manual_devices_in_the_state() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/device/light2/manual")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let json = get_json(app, "/api/state").await;
    let light2 = json["state"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["device"] == "light2")
        .unwrap()
        .clone();
    assert_eq!(light2["manual"], "yes");
}

#[tokio::test]
async fn should_return_not_found_for_unknown_device() {
    let dir = tempfile::tempdir().unwrap();
    let resp = app(dir.path())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/device/heater/on")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Timer programming round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reprogram_a_timer_and_read_it_back() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let json = get_json(app.clone(), "/api/timers").await;
    let timers: Vec<Timer> = serde_json::from_value(json).unwrap();
    assert_eq!(timers.len(), 23);

    let programmed = Timer {
        device: "light1".to_string(),
        index: 1,
        hour_on: 8,
        minute_on: 30,
        hour_off: 20,
        minute_off: 0,
        repeat: 1,
        period: 0,
    };
    let body = serde_json::to_string(&vec![programmed.clone()]).unwrap();
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/timers")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let json = get_json(app, "/api/timers/light1").await;
    let timers: Vec<Timer> = serde_json::from_value(json).unwrap();
    assert_eq!(timers, vec![programmed]);
}

// ---------------------------------------------------------------------------
// Trace sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_record_a_trace_session_and_serve_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/trace/on")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let json = get_json(app.clone(), "/api/state").await;
    assert_eq!(json["trace"], "on");

    let json = get_json(app.clone(), "/api/history/state").await;
    let files: Vec<String> = serde_json::from_value(json).unwrap();
    assert_eq!(files, vec!["state_20210108"]);

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/history/state/state_20210108")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(
        resp.into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap();
    assert!(body.starts_with("2021-01-08 10:00:00 start"));
}

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_serve_virtual_sensor_readings() {
    let dir = tempfile::tempdir().unwrap();
    let json = get_json(app(dir.path()), "/api/sensors").await;

    assert_eq!(json["clock"], "08-01-2021 10:00");
    let sensors = json["sensors"].as_array().unwrap();
    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0]["location"], "room");
    assert_eq!(sensors[0]["temperature"], 20);
    assert_eq!(sensors[0]["humidity"], 55);
    assert_eq!(sensors[1]["location"], "terrarium");
    assert_eq!(sensors[1]["temperature"], 25);
    assert_eq!(sensors[1]["humidity"], 0);
}
