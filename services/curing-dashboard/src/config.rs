//! Configuration types for the curing dashboard

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Shortest polling interval and request timeout accepted by [`Config::validate`]
pub const MIN_INTERVAL_MS: u64 = 100;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Reject settings the poller cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.backend.base_url.trim().is_empty() {
            return Err(crate::DashboardError::Config(
                "backend.base_url must not be empty".to_string(),
            ));
        }

        let intervals = [
            ("backend.request_timeout_ms", self.backend.request_timeout_ms),
            ("polling.clock_interval_ms", self.polling.clock_interval_ms),
            ("polling.devices_interval_ms", self.polling.devices_interval_ms),
            (
                "polling.notifications_interval_ms",
                self.polling.notifications_interval_ms,
            ),
            ("polling.sim_time_interval_ms", self.polling.sim_time_interval_ms),
            ("polling.history_interval_ms", self.polling.history_interval_ms),
        ];
        for (name, value) in intervals {
            if value < MIN_INTERVAL_MS {
                return Err(crate::DashboardError::Config(format!(
                    "{} must be at least {} ms, got {}",
                    name, MIN_INTERVAL_MS, value
                )));
            }
        }

        if self.history.hours == 0 {
            return Err(crate::DashboardError::Config(
                "history.hours must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Where the device cards get their data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceSource {
    /// One request per sensor/actuator, issued concurrently
    #[default]
    PerDevice,
    /// A single `/api/dashboard` request carrying all four devices
    Combined,
}

/// Where the charts get their data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySource {
    /// `/api/istorija?hours=N`
    #[default]
    Range,
    /// `/api/sensor-history?device_type=...&limit=N`, one query per sensor
    PerSensor,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub device_source: DeviceSource,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            device_source: DeviceSource::default(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Polling intervals, one per scheduled task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_clock_interval")]
    pub clock_interval_ms: u64,
    #[serde(default = "default_devices_interval")]
    pub devices_interval_ms: u64,
    #[serde(default = "default_notifications_interval")]
    pub notifications_interval_ms: u64,
    #[serde(default = "default_sim_time_interval")]
    pub sim_time_interval_ms: u64,
    #[serde(default = "default_history_interval")]
    pub history_interval_ms: u64,
}

impl PollingConfig {
    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms)
    }

    pub fn devices_interval(&self) -> Duration {
        Duration::from_millis(self.devices_interval_ms)
    }

    pub fn notifications_interval(&self) -> Duration {
        Duration::from_millis(self.notifications_interval_ms)
    }

    pub fn sim_time_interval(&self) -> Duration {
        Duration::from_millis(self.sim_time_interval_ms)
    }

    pub fn history_interval(&self) -> Duration {
        Duration::from_millis(self.history_interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            clock_interval_ms: default_clock_interval(),
            devices_interval_ms: default_devices_interval(),
            notifications_interval_ms: default_notifications_interval(),
            sim_time_interval_ms: default_sim_time_interval(),
            history_interval_ms: default_history_interval(),
        }
    }
}

/// Chart history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_hours")]
    pub hours: u32,
    #[serde(default)]
    pub source: HistorySource,
    #[serde(default = "default_sensor_limit")]
    pub sensor_limit: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            hours: default_history_hours(),
            source: HistorySource::default(),
            sensor_limit: default_sensor_limit(),
        }
    }
}

/// Toast configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToastConfig {
    #[serde(default = "default_toast_duration")]
    pub duration_ms: u64,
}

impl ToastConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_toast_duration(),
        }
    }
}

/// Local view server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_server_port(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    5000
}

fn default_clock_interval() -> u64 {
    1000
}

fn default_devices_interval() -> u64 {
    5000
}

fn default_notifications_interval() -> u64 {
    10_000
}

fn default_sim_time_interval() -> u64 {
    30_000
}

fn default_history_interval() -> u64 {
    60_000
}

fn default_history_hours() -> u32 {
    24
}

fn default_sensor_limit() -> u32 {
    100
}

fn default_toast_duration() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_server_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
