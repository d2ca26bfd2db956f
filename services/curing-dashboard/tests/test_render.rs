//! Rendering of backend payloads into the page, through the public API

use std::time::{Duration, Instant};

use curing_dashboard::charts::build_charts;
use curing_dashboard::model::{ActuatorState, HistoryPoint, Notification, SensorReading, Severity};
use curing_dashboard::page::render_page;
use curing_dashboard::state::{DashboardView, DeviceRefresh, Tab};
use curing_dashboard::view::{self, ActuatorKind, BatteryLevel};

fn view() -> DashboardView {
    DashboardView::new(Duration::from_secs(5), 24)
}

#[test]
fn malformed_payloads_render_placeholders() {
    for json in ["{}", r#"{"error": "Sensor not found"}"#, r#"{"temperatura": null}"#] {
        let reading: SensorReading = serde_json::from_str(json).unwrap();
        let card = view::render_sensor(Some(&reading));
        assert_eq!(card.temperature, "--°C", "payload {}", json);
        assert_eq!(card.humidity, "--%", "payload {}", json);
        assert_eq!(card.battery.text, "--%", "payload {}", json);
    }
}

#[test]
fn battery_buckets() {
    let cases = [
        (15.0, BatteryLevel::Critical, "fas fa-battery-empty"),
        (16.0, BatteryLevel::Warning, "fas fa-battery-quarter"),
        (35.0, BatteryLevel::Warning, "fas fa-battery-quarter"),
        (65.0, BatteryLevel::Good, "fas fa-battery-half"),
        (85.0, BatteryLevel::Good, "fas fa-battery-three-quarters"),
        (86.0, BatteryLevel::Excellent, "fas fa-battery-full"),
    ];
    for (value, level, icon) in cases {
        let battery = view::render_battery(Some(value));
        assert_eq!(battery.level, level, "battery {}", value);
        assert_eq!(battery.icon, icon, "battery {}", value);
    }
}

#[test]
fn device_page_after_refresh() {
    let mut v = view();
    v.apply_devices(
        DeviceRefresh::Fetched {
            beton: Some(SensorReading {
                temperature: Some(22.5),
                humidity: Some(65.0),
                battery: Some(85.0),
                ..Default::default()
            }),
            povrsina: None,
            pump: Some(ActuatorState {
                active: Some(true),
                battery: Some(78.0),
                remaining_time: Some(240),
                ..Default::default()
            }),
            heater: None,
        },
        1_000,
    );

    let html = render_page(&v, 5, Instant::now());
    assert!(html.contains("● Online"));
    assert!(html.contains("22.5°C"));
    assert!(html.contains("240s"));
    assert!(html.contains("Aktivna"));
    assert!(html.contains("Neaktivan"));
    assert_eq!(
        view::render_actuator(ActuatorKind::Heater, None).detail,
        "--°C"
    );
}

#[test]
fn history_page_draws_both_charts() {
    let point = |t: f64, h: f64, ts: &str| HistoryPoint {
        temperature: Some(t),
        humidity: Some(h),
        timestamp: ts.to_string(),
    };
    let mut v = view();
    v.tab = Tab::History;
    v.charts = build_charts(
        &[point(20.0, 60.0, "2025-05-05 10:00:00"), point(21.0, 62.0, "2025-05-05 11:00:00")],
        &[point(18.0, 70.0, "2025-05-05 10:00:00"), point(18.5, 71.0, "2025-05-05 11:00:00")],
    );

    let html = render_page(&v, 5, Instant::now());
    assert_eq!(html.matches("<svg").count(), 2);
    assert_eq!(html.matches("<polyline").count(), 4);
    assert!(html.contains("Temperatura betona"));
    assert!(html.contains(r#"<option value="24" selected>24h</option>"#));
}

#[test]
fn notifications_page_lists_in_server_order() {
    let mut v = view();
    v.tab = Tab::Notifications;
    let notification = |id: u64, message: &str, acknowledged: bool| Notification {
        id,
        kind: "humidity".to_string(),
        severity: Severity::Warning,
        message: message.to_string(),
        timestamp: "2025-05-05 12:00:00".to_string(),
        acknowledged,
    };
    v.apply_notifications(
        vec![notification(2, "druga", false), notification(1, "prva", true)],
        Instant::now(),
    );

    let html = render_page(&v, 5, Instant::now());
    let second = html.find("druga").unwrap();
    let first = html.find("prva").unwrap();
    assert!(second < first);
    assert!(html.contains("05.05.2025. 12:00:00"));
    assert!(html.contains("/actions/notifications/2/acknowledge"));
    assert!(!html.contains("/actions/notifications/1/acknowledge"));
    assert!(html.contains(r#"<span class="badge">1</span>"#));
}
