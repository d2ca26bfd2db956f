//! Polling tasks: clock, devices, notifications, simulated time, history

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::backend::BackendClient;
use crate::charts::{self, Charts};
use crate::clock;
use crate::config::{Config, DeviceSource, HistorySource};
use crate::model::SensorKind;
use crate::notifications::NotificationManager;
use crate::scheduler::Scheduler;
use crate::state::{DeviceRefresh, Tab, ViewHandle};

/// Runs each read path and writes the result into the view
pub struct Poller {
    backend: Arc<BackendClient>,
    notifications: Arc<NotificationManager>,
    view: ViewHandle,
    config: Config,
}

impl Poller {
    pub fn new(
        backend: Arc<BackendClient>,
        notifications: Arc<NotificationManager>,
        view: ViewHandle,
        config: Config,
    ) -> Self {
        Self {
            backend,
            notifications,
            view,
            config,
        }
    }

    pub fn view(&self) -> &ViewHandle {
        &self.view
    }

    /// Advance the wall clock and expire a stale toast
    pub async fn tick_clock(&self) {
        let mut view = self.view.write().await;
        view.set_clock(chrono::Local::now().naive_local());
        view.toast.prune(std::time::Instant::now());
    }

    /// Fetch all four devices and re-render their cards
    pub async fn refresh_devices(&self) -> DeviceRefresh {
        let refresh = fetch_devices(&self.backend, self.config.backend.device_source).await;
        if refresh == DeviceRefresh::Unreachable {
            tracing::warn!("Backend {} unreachable", self.backend.base_url());
        }
        self.view
            .write()
            .await
            .apply_devices(refresh.clone(), current_epoch_ms());
        refresh
    }

    /// Reload the inbox. Failures leave the cached list in place.
    pub async fn check_notifications(&self) {
        if let Err(e) = self.notifications.reload().await {
            tracing::warn!("Failed to check notifications: {}", e);
        }
    }

    pub async fn sync_sim_time(&self) {
        match self.backend.sim_time().await {
            Ok(payload) => {
                let sim_time = clock::sim_time_from_payload(&payload);
                if sim_time.is_none() {
                    tracing::debug!("Unrecognised sim time payload: {:?}", payload);
                }
                self.view.write().await.set_sim_time(sim_time);
            }
            Err(e) => {
                tracing::debug!("Failed to sync sim time: {}", e);
                self.view.write().await.set_sim_time(None);
            }
        }
    }

    /// Rebuild both charts for the current time range. A failure keeps the
    /// previous charts and raises a critical toast.
    pub async fn load_history(&self) {
        let hours = self.view.read().await.history_hours;
        match self.fetch_charts(hours).await {
            Ok(charts) => self.view.write().await.charts = charts,
            Err(e) => {
                tracing::warn!("Failed to load history: {}", e);
                self.view.write().await.toast.show(
                    crate::model::Severity::Critical,
                    "Greška pri učitavanju istorijskih podataka",
                    std::time::Instant::now(),
                );
            }
        }
    }

    /// Periodic history refresh, only while the history tab is showing
    pub async fn refresh_history_if_visible(&self) {
        if self.view.read().await.tab == Tab::History {
            self.load_history().await;
        }
    }

    async fn fetch_charts(&self, hours: u32) -> crate::Result<Charts> {
        match self.config.history.source {
            HistorySource::Range => {
                let history = self.backend.history(hours).await?;
                Ok(charts::charts_from_history(&history))
            }
            HistorySource::PerSensor => {
                let limit = self.config.history.sensor_limit;
                let (beton, vazduh) = tokio::join!(
                    self.backend.sensor_history(SensorKind::Beton, limit),
                    self.backend.sensor_history(SensorKind::Povrsina, limit),
                );
                Ok(charts::build_charts(&beton?, &vazduh?))
            }
        }
    }

    /// Register every polling task on `scheduler`
    pub fn schedule(self: &Arc<Self>, scheduler: &mut Scheduler) {
        let polling = self.config.polling.clone();

        let poller = Arc::clone(self);
        scheduler.every("clock", polling.clock_interval(), move || {
            let poller = Arc::clone(&poller);
            async move { poller.tick_clock().await }
        });

        let poller = Arc::clone(self);
        scheduler.every("devices", polling.devices_interval(), move || {
            let poller = Arc::clone(&poller);
            async move {
                poller.refresh_devices().await;
            }
        });

        let poller = Arc::clone(self);
        scheduler.every(
            "notifications",
            polling.notifications_interval(),
            move || {
                let poller = Arc::clone(&poller);
                async move { poller.check_notifications().await }
            },
        );

        let poller = Arc::clone(self);
        scheduler.every("sim_time", polling.sim_time_interval(), move || {
            let poller = Arc::clone(&poller);
            async move { poller.sync_sim_time().await }
        });

        let poller = Arc::clone(self);
        scheduler.every("history", polling.history_interval(), move || {
            let poller = Arc::clone(&poller);
            async move { poller.refresh_history_if_visible().await }
        });
    }
}

/// Fetch the four devices. A transport failure on any request means the
/// backend is unreachable; any other failure only blanks that device.
pub async fn fetch_devices(backend: &BackendClient, source: DeviceSource) -> DeviceRefresh {
    match source {
        DeviceSource::PerDevice => {
            let (beton, povrsina, pump, heater) = tokio::join!(
                backend.sensor(SensorKind::Beton),
                backend.sensor(SensorKind::Povrsina),
                backend.pump(),
                backend.heater(),
            );

            let unreachable = [
                beton.as_ref().err(),
                povrsina.as_ref().err(),
                pump.as_ref().err(),
                heater.as_ref().err(),
            ]
            .into_iter()
            .flatten()
            .any(|e| e.is_transport());
            if unreachable {
                return DeviceRefresh::Unreachable;
            }

            DeviceRefresh::Fetched {
                beton: ok_or_log("beton", beton),
                povrsina: ok_or_log("povrsina", povrsina),
                pump: ok_or_log("pumpa", pump),
                heater: ok_or_log("grijac", heater),
            }
        }
        DeviceSource::Combined => match backend.dashboard().await {
            Ok(snapshot) => DeviceRefresh::Fetched {
                beton: snapshot.beton_sensor,
                povrsina: snapshot.povrsina_sensor,
                pump: snapshot.pumpa,
                heater: snapshot.grijac,
            },
            Err(e) => {
                tracing::debug!("Dashboard fetch failed: {}", e);
                DeviceRefresh::Unreachable
            }
        },
    }
}

fn ok_or_log<T>(device: &str, result: crate::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Device '{}' unavailable: {}", device, e);
            None
        }
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
