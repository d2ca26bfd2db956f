//! Notification inbox: reload, mutations, and exact delta detection
//!
//! The backend owns the list. Every mutation is followed by a full reload and
//! the cached copy in the view is replaced wholesale; nothing is edited
//! locally.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use crate::backend::BackendClient;
use crate::model::Notification;
use crate::state::ViewHandle;

/// Difference between two consecutive reloads
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationDelta {
    /// Present now but not on the previous reload, in server order
    pub added: Vec<Notification>,
    /// Present on the previous reload but gone now
    pub removed: Vec<u64>,
    /// There was no previous reload to compare against
    pub baseline: bool,
}

impl NotificationDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn added_ids(&self) -> Vec<u64> {
        self.added.iter().map(|n| n.id).collect()
    }

    /// The backend lists newest first, so the first unacknowledged arrival wins
    pub fn newest_unacknowledged(&self) -> Option<&Notification> {
        self.added.iter().find(|n| !n.acknowledged)
    }
}

/// Compare the previously seen id set with a fresh list
pub fn diff(previous: Option<&BTreeSet<u64>>, current: &[Notification]) -> NotificationDelta {
    let Some(previous) = previous else {
        return NotificationDelta {
            added: current.to_vec(),
            removed: Vec::new(),
            baseline: true,
        };
    };

    let current_ids: BTreeSet<u64> = current.iter().map(|n| n.id).collect();
    NotificationDelta {
        added: current
            .iter()
            .filter(|n| !previous.contains(&n.id))
            .cloned()
            .collect(),
        removed: previous.difference(&current_ids).copied().collect(),
        baseline: false,
    }
}

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.acknowledged).count()
}

/// Forwards inbox actions to the backend and reloads after each one
pub struct NotificationManager {
    backend: Arc<BackendClient>,
    view: ViewHandle,
}

impl NotificationManager {
    pub fn new(backend: Arc<BackendClient>, view: ViewHandle) -> Self {
        Self { backend, view }
    }

    /// Fetch the full list and replace the cached copy
    pub async fn reload(&self) -> crate::Result<NotificationDelta> {
        let list = self.backend.notifications().await?;
        let delta = self
            .view
            .write()
            .await
            .apply_notifications(list, Instant::now());

        if !delta.baseline && !delta.is_empty() {
            tracing::debug!(
                "Notifications changed: added={:?}, removed={:?}",
                delta.added_ids(),
                delta.removed
            );
        }
        Ok(delta)
    }

    pub async fn acknowledge(&self, id: u64) -> crate::Result<NotificationDelta> {
        tracing::debug!("Acknowledging notification {}", id);
        self.backend.acknowledge(id).await?;
        self.reload().await
    }

    pub async fn delete(&self, id: u64) -> crate::Result<NotificationDelta> {
        tracing::debug!("Deleting notification {}", id);
        self.backend.delete_notification(id).await?;
        self.reload().await
    }

    pub async fn mark_read(&self, id: u64) -> crate::Result<NotificationDelta> {
        tracing::debug!("Marking notification {} read", id);
        self.backend.mark_read(id).await?;
        self.reload().await
    }

    pub async fn mark_all_read(&self) -> crate::Result<NotificationDelta> {
        tracing::debug!("Marking all notifications read");
        self.backend.mark_all_read().await?;
        self.reload().await
    }

    pub async fn clear_read(&self) -> crate::Result<NotificationDelta> {
        tracing::debug!("Clearing read notifications");
        self.backend.clear_read().await?;
        self.reload().await
    }

    pub async fn clear_all(&self) -> crate::Result<NotificationDelta> {
        tracing::debug!("Clearing all notifications");
        self.backend.clear_all().await?;
        self.reload().await
    }
}
