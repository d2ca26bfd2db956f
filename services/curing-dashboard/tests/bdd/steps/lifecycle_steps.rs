//! BDD step definitions for the lifecycle and local server feature

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request};
use cucumber::{given, then, when};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use curing_dashboard::server::build_router;

use crate::world::CuringWorld;

fn start(world: &mut CuringWorld) {
    let scheduler = world.dashboard().start(CancellationToken::new());
    world.scheduler = Some(scheduler);
}

#[when("the dashboard is started")]
fn dashboard_started(world: &mut CuringWorld) {
    start(world);
}

#[given("the dashboard is started")]
fn dashboard_running(world: &mut CuringWorld) {
    let polling = &mut world.config.polling;
    polling.clock_interval_ms = 100;
    polling.devices_interval_ms = 100;
    polling.notifications_interval_ms = 100;
    polling.sim_time_interval_ms = 100;
    polling.history_interval_ms = 100;
    start(world);
}

#[when("the dashboard is stopped")]
async fn dashboard_stopped(world: &mut CuringWorld) {
    tokio::time::sleep(Duration::from_millis(250)).await;
    let scheduler = world.scheduler.take().expect("dashboard not started");
    scheduler.shutdown().await;
    world.requests_at_stop = world.backend.requests().await.len();
}

#[then(expr = "the scheduled tasks are {string}")]
fn scheduled_tasks(world: &mut CuringWorld, expected: String) {
    let scheduler = world.scheduler.as_ref().expect("dashboard not started");
    assert_eq!(scheduler.task_names().join(", "), expected);
}

#[then(expr = "the connection status eventually shows {string}")]
async fn connection_eventually(world: &mut CuringWorld, expected: String) {
    for _ in 0..50 {
        if world.view().await.connection.label() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("connection status never became {}", expected);
}

#[then("no further backend requests are made")]
async fn no_further_requests(world: &mut CuringWorld) {
    assert!(world.requests_at_stop > 0);
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(world.backend.requests().await.len(), world.requests_at_stop);
}

async fn send(world: &mut CuringWorld, request: Request<Body>) {
    let controller = world.dashboard().controller.clone();
    let response = build_router(controller, 5).oneshot(request).await.unwrap();
    world.last_status = Some(response.status().as_u16());

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.last_body = Some(String::from_utf8(body.to_vec()).unwrap());
}

#[when(expr = "the local page {string} is requested")]
async fn request_page(world: &mut CuringWorld, uri: String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(world, request).await;
}

#[when(expr = "the pump is started from the page with duration {string}")]
async fn start_pump_from_page(world: &mut CuringWorld, duration: String) {
    let request = Request::builder()
        .method("POST")
        .uri("/actions/pump")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("action=start&duration={}", duration)))
        .unwrap();
    send(world, request).await;
}

#[then(expr = "the response status is {int}")]
fn response_status(world: &mut CuringWorld, status: u16) {
    assert_eq!(world.last_status, Some(status));
}

#[then(expr = "the response contains {string}")]
fn response_contains(world: &mut CuringWorld, text: String) {
    let body = world.last_body.as_ref().expect("no response");
    assert!(body.contains(&text), "response did not contain {}", text);
}

#[then(expr = "the backend received a pump command with duration {int}")]
async fn pump_command_received(world: &mut CuringWorld, duration: u64) {
    let requests = world.backend.requests().await;
    let command = requests
        .iter()
        .find(|r| r.method == "POST" && r.path == "/api/pumpa/upravljanje")
        .expect("no pump command sent");
    let body = command.body.as_ref().expect("pump command without body");
    assert_eq!(body["akcija"], "pokreni");
    assert_eq!(body["trajanje"].as_u64(), Some(duration));
}
