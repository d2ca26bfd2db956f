//! User actions: tab selection, actuator control, inbox actions

use std::sync::Arc;
use std::time::Instant;

use crate::backend::BackendClient;
use crate::model::{HeaterCommand, PumpCommand, Severity};
use crate::notifications::NotificationManager;
use crate::poller::Poller;
use crate::state::{Tab, ViewHandle};

/// Inbox action triggered from the page or the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxAction {
    Acknowledge(u64),
    MarkRead(u64),
    Delete(u64),
    MarkAllRead,
    ClearRead,
    ClearAll,
}

impl InboxAction {
    fn failure_message(self) -> &'static str {
        match self {
            InboxAction::Acknowledge(_) => "Greška pri potvrđivanju notifikacije",
            InboxAction::MarkRead(_) | InboxAction::MarkAllRead => {
                "Greška pri označavanju notifikacija"
            }
            InboxAction::Delete(_) => "Greška pri brisanju notifikacije",
            InboxAction::ClearRead | InboxAction::ClearAll => "Greška pri brisanju notifikacija",
        }
    }
}

/// Applies user actions to the backend and folds the outcome into the view
pub struct Controller {
    backend: Arc<BackendClient>,
    notifications: Arc<NotificationManager>,
    poller: Arc<Poller>,
    view: ViewHandle,
}

impl Controller {
    pub fn new(
        backend: Arc<BackendClient>,
        notifications: Arc<NotificationManager>,
        poller: Arc<Poller>,
        view: ViewHandle,
    ) -> Self {
        Self {
            backend,
            notifications,
            poller,
            view,
        }
    }

    pub fn view(&self) -> &ViewHandle {
        &self.view
    }

    /// Switch tabs and load whatever the new tab shows
    pub async fn select_tab(&self, tab: Tab) {
        self.view.write().await.tab = tab;
        tracing::debug!("Tab changed to {}", tab);

        match tab {
            Tab::History => self.poller.load_history().await,
            Tab::Notifications => self.poller.check_notifications().await,
            Tab::Dashboard => {}
        }
    }

    /// Change the history range and reload the charts
    pub async fn set_history_hours(&self, hours: u32) {
        if hours == 0 {
            tracing::warn!("Ignoring empty history range");
            return;
        }
        self.view.write().await.history_hours = hours;
        self.poller.load_history().await;
    }

    pub async fn control_pump(&self, command: PumpCommand) {
        let outcome = self.backend.control_pump(command).await;
        let fallback = match command {
            PumpCommand::Start { .. } => "Pumpa pokrenuta",
            PumpCommand::Stop => "Pumpa zaustavljena",
        };
        self.report_control("pump", outcome, fallback, "Greška pri upravljanju pumpom")
            .await;
    }

    pub async fn control_heater(&self, command: HeaterCommand) {
        let outcome = self.backend.control_heater(command).await;
        let fallback = match command {
            HeaterCommand::Start { .. } => "Grijač pokrenut",
            HeaterCommand::Stop => "Grijač zaustavljen",
        };
        self.report_control("heater", outcome, fallback, "Greška pri upravljanju grijačem")
            .await;
    }

    async fn report_control(
        &self,
        device: &str,
        outcome: crate::Result<crate::model::ControlResponse>,
        fallback: &str,
        failure: &str,
    ) {
        let (severity, message) = match outcome {
            Ok(response) if response.success => {
                (Severity::Info, message_or(response.message, fallback))
            }
            Ok(response) => {
                tracing::warn!("Backend rejected {} command: {}", device, response.message);
                (Severity::Critical, message_or(response.message, failure))
            }
            Err(e) => {
                tracing::warn!("Failed to control {}: {}", device, e);
                (Severity::Critical, failure.to_string())
            }
        };

        self.view
            .write()
            .await
            .toast
            .show(severity, message, Instant::now());
        self.poller.refresh_devices().await;
    }

    /// Run an inbox action. A failure leaves the list as is and raises a toast.
    pub async fn inbox(&self, action: InboxAction) {
        let result = match action {
            InboxAction::Acknowledge(id) => self.notifications.acknowledge(id).await,
            InboxAction::MarkRead(id) => self.notifications.mark_read(id).await,
            InboxAction::Delete(id) => self.notifications.delete(id).await,
            InboxAction::MarkAllRead => self.notifications.mark_all_read().await,
            InboxAction::ClearRead => self.notifications.clear_read().await,
            InboxAction::ClearAll => self.notifications.clear_all().await,
        };

        if let Err(e) = result {
            tracing::warn!("Inbox action {:?} failed: {}", action, e);
            self.view.write().await.toast.show(
                Severity::Critical,
                action.failure_message(),
                Instant::now(),
            );
        }
    }

    pub async fn dismiss_toast(&self) {
        self.view.write().await.toast.dismiss();
    }
}

fn message_or(message: String, fallback: &str) -> String {
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
