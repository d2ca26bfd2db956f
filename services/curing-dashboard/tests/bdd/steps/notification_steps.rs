//! BDD step definitions for the notification inbox feature

use std::time::Instant;

use cucumber::{given, then, when};

use curing_dashboard::controller::InboxAction;
use curing_dashboard::model::Severity;
use curing_dashboard::view::NotificationListView;

use crate::world::CuringWorld;

fn parse_severity(s: &str) -> Severity {
    match s {
        "critical" => Severity::Critical,
        "warning" => Severity::Warning,
        "info" => Severity::Info,
        other => panic!("Unknown severity: {}", other),
    }
}

#[given(expr = "the backend holds a {string} notification {string}")]
async fn backend_holds(world: &mut CuringWorld, severity: String, message: String) {
    world
        .backend
        .push_notification(parse_severity(&severity), &message)
        .await;
}

#[given("the notifications were checked")]
async fn notifications_were_checked(world: &mut CuringWorld) {
    world.dashboard().poller.check_notifications().await;
}

#[when("the notifications are checked")]
async fn check_notifications(world: &mut CuringWorld) {
    world.dashboard().poller.check_notifications().await;
}

async fn newest_id(world: &CuringWorld) -> u64 {
    *world
        .backend
        .notification_ids()
        .await
        .first()
        .expect("backend holds no notifications")
}

#[given("the newest notification was acknowledged")]
async fn newest_was_acknowledged(world: &mut CuringWorld) {
    acknowledge_newest(world).await;
}

#[when("the newest notification is acknowledged")]
async fn acknowledge_newest(world: &mut CuringWorld) {
    let id = newest_id(world).await;
    world
        .dashboard()
        .controller
        .inbox(InboxAction::Acknowledge(id))
        .await;
}

#[when("the newest notification is deleted")]
async fn delete_newest(world: &mut CuringWorld) {
    let id = newest_id(world).await;
    world.last_notification_id = Some(id);
    world
        .dashboard()
        .controller
        .inbox(InboxAction::Delete(id))
        .await;
}

#[given("the toast is dismissed")]
async fn toast_dismissed(world: &mut CuringWorld) {
    world.dashboard().controller.dismiss_toast().await;
}

#[when("all notifications are marked read")]
async fn mark_all_read(world: &mut CuringWorld) {
    world
        .dashboard()
        .controller
        .inbox(InboxAction::MarkAllRead)
        .await;
}

#[when("the read notifications are cleared")]
async fn clear_read(world: &mut CuringWorld) {
    world
        .dashboard()
        .controller
        .inbox(InboxAction::ClearRead)
        .await;
}

#[when("all notifications are cleared")]
async fn clear_all(world: &mut CuringWorld) {
    world
        .dashboard()
        .controller
        .inbox(InboxAction::ClearAll)
        .await;
}

#[then(expr = "the unread badge shows {int}")]
async fn badge_shows(world: &mut CuringWorld, count: usize) {
    let view = world.view().await;
    assert_eq!(view.badge.count, count);
    assert!(view.badge.visible);
}

#[then("the unread badge is hidden")]
async fn badge_hidden(world: &mut CuringWorld) {
    let view = world.view().await;
    assert_eq!(view.badge.count, 0);
    assert!(!view.badge.visible);
}

#[then("no toast is showing")]
async fn no_toast(world: &mut CuringWorld) {
    let view = world.view().await;
    assert!(view.toast.visible(Instant::now()).is_none());
}

#[then(expr = "a {string} toast shows {string}")]
async fn toast_shows(world: &mut CuringWorld, severity: String, message: String) {
    let view = world.view().await;
    let toast = view.toast.visible(Instant::now()).expect("no toast showing");
    assert_eq!(toast.severity, parse_severity(&severity));
    assert_eq!(toast.message, message);
}

#[then("the backend no longer lists it")]
async fn backend_no_longer_lists(world: &mut CuringWorld) {
    let deleted = world.last_notification_id.expect("nothing deleted");
    assert!(!world.backend.notification_ids().await.contains(&deleted));
}

#[then(expr = "the inbox lists only {string}")]
async fn inbox_lists_only(world: &mut CuringWorld, message: String) {
    let view = world.view().await;
    match view.inbox {
        NotificationListView::Items(items) => {
            let messages: Vec<&str> = items.iter().map(|i| i.message.as_str()).collect();
            assert_eq!(messages, vec![message.as_str()]);
            assert!(!items[0].acknowledged);
        }
        NotificationListView::Empty => panic!("inbox is empty"),
    }
}

#[then(expr = "the inbox shows {string}")]
async fn inbox_shows(world: &mut CuringWorld, expected: String) {
    let view = world.view().await;
    assert_eq!(view.inbox, NotificationListView::Empty);
    assert_eq!(expected, curing_dashboard::view::EMPTY_NOTIFICATIONS);
}
