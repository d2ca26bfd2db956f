//! Local web server: HTML page, JSON view model, and action endpoints
//!
//! Every action endpoint answers with a redirect to `/` so a plain HTML form
//! round-trips back to the refreshed page.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::controller::{Controller, InboxAction};
use crate::model::{
    HeaterCommand, PumpCommand, DEFAULT_HEATER_TARGET, DEFAULT_PUMP_DURATION_SECS,
};
use crate::page;
use crate::state::Tab;

/// Server application state
#[derive(Clone)]
pub struct ServerState {
    pub controller: Arc<Controller>,
    /// Page auto-refresh period, matches the device polling interval
    pub refresh_secs: u64,
}

/// Build the dashboard axum router
pub fn build_router(controller: Arc<Controller>, refresh_secs: u64) -> Router {
    let state = ServerState {
        controller,
        refresh_secs: refresh_secs.max(1),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/view", get(view_handler))
        .route("/health", get(health_handler))
        .route("/tabs/{tab}", post(tab_handler))
        .route("/actions/history", post(history_handler))
        .route(
            "/actions/notifications/{id}/acknowledge",
            post(acknowledge_handler),
        )
        .route("/actions/notifications/{id}/read", post(read_handler))
        .route("/actions/notifications/{id}/delete", post(delete_handler))
        .route("/actions/notifications/read-all", post(read_all_handler))
        .route("/actions/notifications/clear-read", post(clear_read_handler))
        .route("/actions/notifications/clear-all", post(clear_all_handler))
        .route("/actions/pump", post(pump_handler))
        .route("/actions/heater", post(heater_handler))
        .route("/actions/toast/dismiss", post(dismiss_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler(State(server): State<ServerState>) -> impl IntoResponse {
    let view = server.controller.view().read().await;
    Html(page::render_page(&view, server.refresh_secs, Instant::now()))
}

async fn view_handler(State(server): State<ServerState>) -> impl IntoResponse {
    let mut view = server.controller.view().write().await;
    view.toast.prune(Instant::now());
    Json(view.clone())
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn tab_handler(State(server): State<ServerState>, Path(tab): Path<String>) -> Response {
    match tab.parse::<Tab>() {
        Ok(tab) => {
            server.controller.select_tab(tab).await;
            Redirect::to("/").into_response()
        }
        Err(e) => (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct HistoryForm {
    hours: u32,
}

async fn history_handler(
    State(server): State<ServerState>,
    Form(form): Form<HistoryForm>,
) -> Redirect {
    server.controller.set_history_hours(form.hours).await;
    Redirect::to("/")
}

async fn inbox(server: &ServerState, action: InboxAction) -> Redirect {
    server.controller.inbox(action).await;
    Redirect::to("/")
}

async fn acknowledge_handler(
    State(server): State<ServerState>,
    Path(id): Path<u64>,
) -> Redirect {
    inbox(&server, InboxAction::Acknowledge(id)).await
}

async fn read_handler(State(server): State<ServerState>, Path(id): Path<u64>) -> Redirect {
    inbox(&server, InboxAction::MarkRead(id)).await
}

async fn delete_handler(State(server): State<ServerState>, Path(id): Path<u64>) -> Redirect {
    inbox(&server, InboxAction::Delete(id)).await
}

async fn read_all_handler(State(server): State<ServerState>) -> Redirect {
    inbox(&server, InboxAction::MarkAllRead).await
}

async fn clear_read_handler(State(server): State<ServerState>) -> Redirect {
    inbox(&server, InboxAction::ClearRead).await
}

async fn clear_all_handler(State(server): State<ServerState>) -> Redirect {
    inbox(&server, InboxAction::ClearAll).await
}

/// Form posted by the pump card. Empty numeric inputs arrive as `""`.
#[derive(Debug, Deserialize)]
struct PumpForm {
    action: String,
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct HeaterForm {
    action: String,
    #[serde(default)]
    target_temperature: String,
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

async fn pump_handler(State(server): State<ServerState>, Form(form): Form<PumpForm>) -> Response {
    let command = match form.action.as_str() {
        "start" => {
            let duration_secs = match form.duration.trim() {
                "" => DEFAULT_PUMP_DURATION_SECS,
                raw => match raw.parse() {
                    Ok(secs) => secs,
                    Err(_) => return bad_request(format!("Invalid duration '{}'", raw)),
                },
            };
            PumpCommand::Start { duration_secs }
        }
        "stop" => PumpCommand::Stop,
        other => return bad_request(format!("Unknown pump action '{}'", other)),
    };

    server.controller.control_pump(command).await;
    Redirect::to("/").into_response()
}

async fn heater_handler(
    State(server): State<ServerState>,
    Form(form): Form<HeaterForm>,
) -> Response {
    let command = match form.action.as_str() {
        "start" => {
            let target_temperature = match form.target_temperature.trim() {
                "" => DEFAULT_HEATER_TARGET,
                raw => match raw.parse::<f64>() {
                    Ok(t) if t.is_finite() => t,
                    _ => return bad_request(format!("Invalid target temperature '{}'", raw)),
                },
            };
            HeaterCommand::Start { target_temperature }
        }
        "stop" => HeaterCommand::Stop,
        other => return bad_request(format!("Unknown heater action '{}'", other)),
    };

    server.controller.control_heater(command).await;
    Redirect::to("/").into_response()
}

async fn dismiss_handler(State(server): State<ServerState>) -> Redirect {
    server.controller.dismiss_toast().await;
    Redirect::to("/")
}
