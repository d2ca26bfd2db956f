//! BDD test world for the curing dashboard

use std::fmt;
use std::sync::Arc;

use cucumber::World;
use curing_dashboard::config::Config;
use curing_dashboard::scheduler::Scheduler;
use curing_dashboard::state::DashboardView;
use curing_dashboard::Dashboard;

use crate::fake_backend::{FakeBackend, BASE_URL};

#[derive(World)]
#[world(init = Self::new)]
pub struct CuringWorld {
    pub backend: Arc<FakeBackend>,
    pub config: Config,
    dashboard: Option<Dashboard>,

    // Inbox testing
    pub last_notification_id: Option<u64>,

    // Lifecycle testing
    pub scheduler: Option<Scheduler>,
    pub requests_at_stop: usize,

    // Server testing
    pub last_status: Option<u16>,
    pub last_body: Option<String>,
}

impl fmt::Debug for CuringWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuringWorld")
            .field("backend", &self.backend)
            .field("started", &self.dashboard.is_some())
            .field("last_status", &self.last_status)
            .finish()
    }
}

impl CuringWorld {
    fn new() -> Self {
        let mut config = Config::default();
        config.backend.base_url = BASE_URL.to_string();
        Self {
            backend: Arc::new(FakeBackend::new()),
            config,
            dashboard: None,
            last_notification_id: None,
            scheduler: None,
            requests_at_stop: 0,
            last_status: None,
            last_body: None,
        }
    }

    /// The dashboard under test, built on first use from the current config
    pub fn dashboard(&mut self) -> &Dashboard {
        let backend = Arc::clone(&self.backend);
        let config = self.config.clone();
        self.dashboard
            .get_or_insert_with(|| Dashboard::new(config, backend))
    }

    pub async fn view(&mut self) -> DashboardView {
        self.dashboard().view.read().await.clone()
    }
}

impl Drop for CuringWorld {
    fn drop(&mut self) {
        if let Some(scheduler) = &self.scheduler {
            scheduler.lifecycle().cancel();
        }
    }
}
