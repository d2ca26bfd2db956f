//! Curing dashboard - polling client for the concrete curing backend
//!
//! Polls sensor, actuator, notification and history endpoints on fixed
//! intervals, keeps the result in one view model, and serves it as an HTML
//! page with action endpoints.

pub mod backend;
pub mod charts;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod io;
pub mod model;
pub mod notifications;
pub mod page;
pub mod poller;
pub mod scheduler;
pub mod server;
pub mod state;
pub mod toast;
pub mod view;

pub use config::{load_config, Config};
pub use error::{DashboardError, Result};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::backend::BackendClient;
use crate::controller::Controller;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifications::NotificationManager;
use crate::poller::Poller;
use crate::scheduler::Scheduler;
use crate::state::ViewHandle;

/// Every component of one dashboard instance, wired to a single view
pub struct Dashboard {
    pub config: Config,
    pub backend: Arc<BackendClient>,
    pub view: ViewHandle,
    pub notifications: Arc<NotificationManager>,
    pub poller: Arc<Poller>,
    pub controller: Arc<Controller>,
}

impl Dashboard {
    pub fn new(config: Config, http: Arc<dyn HttpClient>) -> Self {
        let backend = Arc::new(BackendClient::new(&config.backend.base_url, http));
        let view = state::new_view_handle(config.toast.duration(), config.history.hours);
        let notifications = Arc::new(NotificationManager::new(
            Arc::clone(&backend),
            Arc::clone(&view),
        ));
        let poller = Arc::new(Poller::new(
            Arc::clone(&backend),
            Arc::clone(&notifications),
            Arc::clone(&view),
            config.clone(),
        ));
        let controller = Arc::new(Controller::new(
            Arc::clone(&backend),
            Arc::clone(&notifications),
            Arc::clone(&poller),
            Arc::clone(&view),
        ));

        Self {
            config,
            backend,
            view,
            notifications,
            poller,
            controller,
        }
    }

    /// Build a dashboard that talks to the backend over HTTP
    pub fn connect(config: Config) -> Result<Self> {
        config.validate()?;
        let http = ReqwestHttpClient::with_timeout(config.backend.request_timeout())?;
        Ok(Self::new(config, Arc::new(http)))
    }

    /// Start every polling task on a scheduler bound to `lifecycle`
    pub fn start(&self, lifecycle: CancellationToken) -> Scheduler {
        let mut scheduler = Scheduler::new(lifecycle);
        self.poller.schedule(&mut scheduler);
        tracing::debug!("Scheduled tasks: {:?}", scheduler.task_names());
        scheduler
    }
}

/// Run the dashboard until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let dashboard = Dashboard::connect(config)?;
    let cancel = CancellationToken::new();

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    let server_task = if dashboard.config.server.enabled {
        let port = dashboard.config.server.port;
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            DashboardError::Server(format!("Failed to bind port {}: {}", port, e))
        })?;
        tracing::info!("Dashboard listening on http://{}", addr);

        let refresh_secs = dashboard.config.polling.devices_interval().as_secs();
        let router = server::build_router(Arc::clone(&dashboard.controller), refresh_secs);
        let cancel_for_server = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_server.cancelled().await;
                })
                .await
            {
                tracing::error!("Dashboard server failed: {}", e);
            }
            tracing::debug!("Dashboard server stopped");
        }))
    } else {
        None
    };

    let scheduler = dashboard.start(cancel.clone());
    tracing::info!(
        "Curing dashboard started, backend {}",
        dashboard.backend.base_url()
    );

    cancel.cancelled().await;
    scheduler.shutdown().await;
    if let Some(task) = server_task {
        let _ = task.await;
    }
    tracing::info!("Curing dashboard stopped");

    Ok(())
}
