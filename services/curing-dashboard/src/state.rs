//! The dashboard view model and its shared handle
//!
//! Every poll task and request handler receives a [`ViewHandle`] explicitly;
//! there is no module-level mutable state.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::charts::Charts;
use crate::clock;
use crate::model::{ActuatorState, Notification, SensorReading};
use crate::notifications::{self, NotificationDelta};
use crate::toast::ToastSlot;
use crate::view::{
    self, ActuatorCardView, ActuatorKind, BadgeView, ConnectionStatus, NotificationListView,
    SensorCardView,
};

/// Which tab of the dashboard is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Dashboard,
    History,
    Notifications,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Dashboard => write!(f, "dashboard"),
            Tab::History => write!(f, "history"),
            Tab::Notifications => write!(f, "notifications"),
        }
    }
}

impl FromStr for Tab {
    type Err = crate::DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(Tab::Dashboard),
            "history" => Ok(Tab::History),
            "notifications" => Ok(Tab::Notifications),
            other => Err(crate::DashboardError::Server(format!(
                "Unknown tab '{}'",
                other
            ))),
        }
    }
}

/// Outcome of one device refresh
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceRefresh {
    /// The backend could not be reached
    Unreachable,
    /// The backend answered. A device is `None` when its own request failed.
    Fetched {
        beton: Option<SensorReading>,
        povrsina: Option<SensorReading>,
        pump: Option<ActuatorState>,
        heater: Option<ActuatorState>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceCards {
    pub beton: SensorCardView,
    pub povrsina: SensorCardView,
    pub pump: ActuatorCardView,
    pub heater: ActuatorCardView,
}

impl DeviceCards {
    pub fn offline() -> Self {
        Self {
            beton: SensorCardView::offline(),
            povrsina: SensorCardView::offline(),
            pump: ActuatorCardView::offline(ActuatorKind::Pump),
            heater: ActuatorCardView::offline(ActuatorKind::Heater),
        }
    }
}

/// Everything the dashboard displays
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub connection: ConnectionStatus,
    pub devices: DeviceCards,
    pub last_refresh_epoch_ms: Option<u64>,
    pub charts: Charts,
    pub history_hours: u32,
    pub inbox: NotificationListView,
    pub badge: BadgeView,
    pub toast: ToastSlot,
    pub tab: Tab,
    pub clock: String,
    pub sim_time: Option<String>,
    /// Last list fetched from the backend. A cache, never authoritative.
    #[serde(skip)]
    pub notifications: Vec<Notification>,
    /// Ids seen on the previous reload; `None` until the first one
    #[serde(skip)]
    known_ids: Option<BTreeSet<u64>>,
}

impl DashboardView {
    pub fn new(toast_duration: Duration, history_hours: u32) -> Self {
        Self {
            connection: ConnectionStatus::Offline,
            devices: DeviceCards::offline(),
            last_refresh_epoch_ms: None,
            charts: Charts::default(),
            history_hours,
            inbox: NotificationListView::Empty,
            badge: view::render_badge(0),
            toast: ToastSlot::new(toast_duration),
            tab: Tab::default(),
            clock: String::new(),
            sim_time: None,
            notifications: Vec::new(),
            known_ids: None,
        }
    }

    /// Render a device refresh into the cards and the connection status
    pub fn apply_devices(&mut self, refresh: DeviceRefresh, now_ms: u64) {
        match refresh {
            DeviceRefresh::Unreachable => {
                self.connection = ConnectionStatus::Offline;
                self.devices = DeviceCards::offline();
            }
            DeviceRefresh::Fetched {
                beton,
                povrsina,
                pump,
                heater,
            } => {
                self.connection = ConnectionStatus::Online;
                self.devices = DeviceCards {
                    beton: view::render_sensor(beton.as_ref()),
                    povrsina: view::render_sensor(povrsina.as_ref()),
                    pump: view::render_actuator(ActuatorKind::Pump, pump.as_ref()),
                    heater: view::render_actuator(ActuatorKind::Heater, heater.as_ref()),
                };
                self.last_refresh_epoch_ms = Some(now_ms);
            }
        }
    }

    /// Replace the cached list, re-render the inbox, and toast the newest
    /// unacknowledged arrival. The first load compares against an empty set.
    pub fn apply_notifications(
        &mut self,
        list: Vec<Notification>,
        now: Instant,
    ) -> NotificationDelta {
        let delta = notifications::diff(self.known_ids.as_ref(), &list);

        if let Some(newest) = delta.newest_unacknowledged() {
            self.toast.show(newest.severity, newest.message.clone(), now);
        }

        self.known_ids = Some(list.iter().map(|n| n.id).collect());
        self.inbox = view::render_notifications(&list);
        self.badge = view::render_badge(notifications::unread_count(&list));
        self.notifications = list;
        delta
    }

    pub fn unread(&self) -> usize {
        self.badge.count
    }

    pub fn set_clock(&mut self, now: NaiveDateTime) {
        self.clock = clock::format_wall_clock(now);
    }

    pub fn set_sim_time(&mut self, sim_time: Option<NaiveDateTime>) {
        self.sim_time = sim_time.map(clock::format_wall_clock);
    }
}

/// Thread-safe shared view handle
pub type ViewHandle = Arc<RwLock<DashboardView>>;

pub fn new_view_handle(toast_duration: Duration, history_hours: u32) -> ViewHandle {
    Arc::new(RwLock::new(DashboardView::new(toast_duration, history_hours)))
}
