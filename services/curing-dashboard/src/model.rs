//! Wire types returned by the backend API
//!
//! The backend has shipped with both Serbian and English field names, so every
//! field accepts either spelling. Fields are optional: the renderer decides how
//! a missing value is displayed.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Which of the two sensors a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Embedded in the concrete
    Beton,
    /// On the surface, measuring the surrounding air
    Povrsina,
}

impl SensorKind {
    /// Path segment used by `/api/senzori/{kind}`
    pub fn path_segment(self) -> &'static str {
        match self {
            SensorKind::Beton => "beton",
            SensorKind::Povrsina => "povrsina",
        }
    }

    /// `device_type` value used by `/api/sensor-history`
    pub fn device_type(self) -> &'static str {
        match self {
            SensorKind::Beton => "beton",
            SensorKind::Povrsina => "vazduh",
        }
    }
}

/// Current reading of a sensor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default, alias = "temperatura")]
    pub temperature: Option<f64>,
    #[serde(default, alias = "vlaznost")]
    pub humidity: Option<f64>,
    #[serde(default, alias = "baterija")]
    pub battery: Option<f64>,
    #[serde(default, alias = "greska")]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
}

impl SensorReading {
    /// The device reports a fault, either through `greska` or a non-online status
    pub fn has_error(&self) -> bool {
        has_error(&self.error, &self.status)
    }

    /// No measurement at all, as returned by an error-only payload
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.battery.is_none()
    }
}

/// Current state of the pump or the heater
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActuatorState {
    #[serde(
        default,
        alias = "aktivna",
        alias = "aktivan",
        deserialize_with = "deserialize_optional_flag"
    )]
    pub active: Option<bool>,
    #[serde(default, alias = "baterija")]
    pub battery: Option<f64>,
    #[serde(default, alias = "greska")]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
    /// Heater only
    #[serde(default, alias = "temperatura")]
    pub temperature: Option<f64>,
    /// Pump only, seconds
    #[serde(default, alias = "preostalo_vrijeme")]
    pub remaining_time: Option<u64>,
}

impl ActuatorState {
    pub fn has_error(&self) -> bool {
        has_error(&self.error, &self.status)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_none() && self.battery.is_none()
    }
}

fn has_error(error: &Option<serde_json::Value>, status: &Option<String>) -> bool {
    let flagged = match error {
        Some(serde_json::Value::Null) | None => false,
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    };
    let offline = status
        .as_deref()
        .map(|s| !s.eq_ignore_ascii_case("online"))
        .unwrap_or(false);
    flagged || offline
}

/// All four devices in one payload, as served by `/api/dashboard`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    #[serde(default)]
    pub beton_sensor: Option<SensorReading>,
    #[serde(default, alias = "vazduh_sensor")]
    pub povrsina_sensor: Option<SensorReading>,
    #[serde(default)]
    pub pumpa: Option<ActuatorState>,
    #[serde(default)]
    pub grijac: Option<ActuatorState>,
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Unknown => write!(f, "unknown"),
        }
    }
}

/// A notification held by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type", default, alias = "tip")]
    pub kind: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, alias = "poruka")]
    pub message: String,
    #[serde(default, alias = "vreme")]
    pub timestamp: String,
    #[serde(
        default,
        alias = "read",
        alias = "procitana",
        deserialize_with = "deserialize_flag"
    )]
    pub acknowledged: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Null(()),
}

impl Flag {
    fn value(self) -> Option<bool> {
        match self {
            Flag::Bool(b) => Some(b),
            Flag::Int(i) => Some(i != 0),
            Flag::Null(()) => None,
        }
    }
}

/// SQLite-backed servers send booleans as 0/1
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Flag::deserialize(deserializer)?.value().unwrap_or(false))
}

fn deserialize_optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Flag::deserialize(deserializer)?.value())
}

/// One sample of a sensor's history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    #[serde(default, alias = "temperatura")]
    pub temperature: Option<f64>,
    #[serde(default, alias = "vlaznost")]
    pub humidity: Option<f64>,
    #[serde(default, alias = "vreme")]
    pub timestamp: String,
}

/// Response of `/api/istorija`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    pub beton: Vec<HistoryPoint>,
    #[serde(default, alias = "povrsina")]
    pub vazduh: Vec<HistoryPoint>,
}

/// Response of `/api/sim-time`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTimePayload {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default, alias = "sim_time")]
    pub current_time: Option<String>,
}

/// Response of the actuator control endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlResponse {
    #[serde(default, alias = "uspjeh")]
    pub success: bool,
    #[serde(default, alias = "poruka")]
    pub message: String,
}

/// Pump control request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PumpCommand {
    Start { duration_secs: u64 },
    Stop,
}

/// Run time used when a start request does not name one
pub const DEFAULT_PUMP_DURATION_SECS: u64 = 300;

impl PumpCommand {
    pub fn to_body(self) -> serde_json::Value {
        match self {
            PumpCommand::Start { duration_secs } => {
                serde_json::json!({ "akcija": "pokreni", "trajanje": duration_secs })
            }
            PumpCommand::Stop => serde_json::json!({ "akcija": "zaustavi" }),
        }
    }
}

/// Heater control request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeaterCommand {
    Start { target_temperature: f64 },
    Stop,
}

/// Target used when a start request does not name one
pub const DEFAULT_HEATER_TARGET: f64 = 50.0;

impl HeaterCommand {
    pub fn to_body(self) -> serde_json::Value {
        match self {
            HeaterCommand::Start { target_temperature } => serde_json::json!({
                "akcija": "pokreni",
                "ciljna_temperatura": target_temperature
            }),
            HeaterCommand::Stop => serde_json::json!({ "akcija": "zaustavi" }),
        }
    }
}
