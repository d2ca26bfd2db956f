//! Pure rendering from backend payloads to displayable card values
//!
//! Nothing here touches the network or the shared view model. A missing or
//! malformed payload always renders the placeholder card, never an error.

use serde::{Deserialize, Serialize};

use crate::clock;
use crate::model::{ActuatorState, Notification, SensorReading, Severity};

pub const TEMPERATURE_PLACEHOLDER: &str = "--°C";
pub const PERCENT_PLACEHOLDER: &str = "--%";
pub const EMPTY_NOTIFICATIONS: &str = "Nema notifikacija";

/// Online/offline dot shown on every card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Online,
    Offline,
}

impl Indicator {
    pub fn css_class(self) -> &'static str {
        match self {
            Indicator::Online => "status-indicator online",
            Indicator::Offline => "status-indicator offline",
        }
    }
}

/// Backend reachability shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Online,
    Offline,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Online => "● Online",
            ConnectionStatus::Offline => "● Offline",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ConnectionStatus::Online => "status-online",
            ConnectionStatus::Offline => "status-offline",
        }
    }
}

/// Battery bucket, drives both the text color and the icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryLevel {
    Critical,
    Warning,
    Good,
    Excellent,
}

impl BatteryLevel {
    pub fn css_class(self) -> &'static str {
        match self {
            BatteryLevel::Critical => "critical",
            BatteryLevel::Warning => "warning",
            BatteryLevel::Good => "good",
            BatteryLevel::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryView {
    pub text: String,
    /// Fill width of the battery bar, 0-100
    pub percent: u8,
    pub level: BatteryLevel,
    pub icon: String,
}

/// Bucket a battery percentage. Missing values render as an empty battery.
pub fn render_battery(battery: Option<f64>) -> BatteryView {
    let Some(value) = battery.filter(|b| b.is_finite()) else {
        return BatteryView {
            text: PERCENT_PLACEHOLDER.to_string(),
            percent: 0,
            level: BatteryLevel::Critical,
            icon: "fas fa-battery-empty".to_string(),
        };
    };

    let (level, icon) = if value <= 15.0 {
        (BatteryLevel::Critical, "fas fa-battery-empty")
    } else if value <= 35.0 {
        (BatteryLevel::Warning, "fas fa-battery-quarter")
    } else if value <= 65.0 {
        (BatteryLevel::Good, "fas fa-battery-half")
    } else if value <= 85.0 {
        (BatteryLevel::Good, "fas fa-battery-three-quarters")
    } else {
        (BatteryLevel::Excellent, "fas fa-battery-full")
    };
    let percent = value.round().clamp(0.0, 100.0) as u8;

    BatteryView {
        text: format!("{}%", value),
        percent,
        level,
        icon: icon.to_string(),
    }
}

fn temperature_text(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(t) => format!("{:.1}°C", t),
        None => TEMPERATURE_PLACEHOLDER.to_string(),
    }
}

fn percent_text(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(h) => format!("{:.1}%", h),
        None => PERCENT_PLACEHOLDER.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorCardView {
    pub temperature: String,
    pub humidity: String,
    pub battery: BatteryView,
    pub indicator: Indicator,
}

impl SensorCardView {
    pub fn offline() -> Self {
        Self {
            temperature: TEMPERATURE_PLACEHOLDER.to_string(),
            humidity: PERCENT_PLACEHOLDER.to_string(),
            battery: render_battery(None),
            indicator: Indicator::Offline,
        }
    }
}

/// Render a sensor card. `None` or an empty payload renders offline.
pub fn render_sensor(reading: Option<&SensorReading>) -> SensorCardView {
    let Some(reading) = reading.filter(|r| !r.is_empty()) else {
        return SensorCardView::offline();
    };

    SensorCardView {
        temperature: temperature_text(reading.temperature),
        humidity: percent_text(reading.humidity),
        battery: render_battery(reading.battery),
        indicator: if reading.has_error() {
            Indicator::Offline
        } else {
            Indicator::Online
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    Pump,
    Heater,
}

impl ActuatorKind {
    fn labels(self) -> (&'static str, &'static str) {
        match self {
            ActuatorKind::Pump => ("Aktivna", "Neaktivna"),
            ActuatorKind::Heater => ("Aktivan", "Neaktivan"),
        }
    }

    fn offline_detail(self) -> &'static str {
        match self {
            ActuatorKind::Pump => "0s",
            ActuatorKind::Heater => TEMPERATURE_PLACEHOLDER,
        }
    }
}

/// Styling of the active/inactive label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Active,
    Inactive,
    Offline,
}

impl Activity {
    pub fn css_class(self) -> &'static str {
        match self {
            Activity::Active => "status-text active",
            Activity::Inactive => "status-text inactive",
            Activity::Offline => "status-text offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorCardView {
    pub kind: ActuatorKind,
    pub label: String,
    pub activity: Activity,
    pub battery: BatteryView,
    pub indicator: Indicator,
    /// Remaining run time for the pump, temperature for the heater
    pub detail: String,
}

impl ActuatorCardView {
    pub fn offline(kind: ActuatorKind) -> Self {
        Self {
            kind,
            label: kind.labels().1.to_string(),
            activity: Activity::Offline,
            battery: render_battery(None),
            indicator: Indicator::Offline,
            detail: kind.offline_detail().to_string(),
        }
    }
}

/// Render an actuator card. `None` or an empty payload renders offline.
pub fn render_actuator(kind: ActuatorKind, state: Option<&ActuatorState>) -> ActuatorCardView {
    let Some(state) = state.filter(|s| !s.is_empty()) else {
        return ActuatorCardView::offline(kind);
    };

    let (active_label, inactive_label) = kind.labels();
    let active = state.active.unwrap_or(false);
    let detail = match kind {
        ActuatorKind::Pump => format!("{}s", state.remaining_time.unwrap_or(0)),
        ActuatorKind::Heater => temperature_text(state.temperature),
    };

    ActuatorCardView {
        kind,
        label: if active { active_label } else { inactive_label }.to_string(),
        activity: if active {
            Activity::Active
        } else {
            Activity::Inactive
        },
        battery: render_battery(state.battery),
        indicator: if state.has_error() {
            Indicator::Offline
        } else {
            Indicator::Online
        },
        detail,
    }
}

/// Unread counter on the notifications tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeView {
    pub count: usize,
    pub visible: bool,
}

pub fn render_badge(unread: usize) -> BadgeView {
    BadgeView {
        count: unread,
        visible: unread > 0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationItemView {
    pub id: u64,
    pub severity: Severity,
    pub kind: String,
    pub message: String,
    pub time: String,
    pub acknowledged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum NotificationListView {
    Empty,
    Items(Vec<NotificationItemView>),
}

impl NotificationListView {
    pub fn len(&self) -> usize {
        match self {
            NotificationListView::Empty => 0,
            NotificationListView::Items(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Render the inbox in server order
pub fn render_notifications(notifications: &[Notification]) -> NotificationListView {
    if notifications.is_empty() {
        return NotificationListView::Empty;
    }

    NotificationListView::Items(
        notifications
            .iter()
            .map(|n| NotificationItemView {
                id: n.id,
                severity: n.severity,
                kind: n.kind.clone(),
                message: n.message.clone(),
                time: clock::format_timestamp(&n.timestamp),
                acknowledged: n.acknowledged,
            })
            .collect(),
    )
}
