//! Row-filtered realtime change feed.
//!
//! # Responsibility
//! - Model the backend's insert/update/delete push notifications.
//! - Provide an in-process hub that store implementations publish into.
//!
//! # Invariants
//! - A subscription only receives events whose row matches its filter.
//! - Events are delivered in publish order; they carry no sequence numbers.
//! - Dropping a `Subscription` unregisters it from its source.

use crate::model::account::UserId;
use crate::model::notification::Notification;
use crate::model::project::ProjectRecord;
use crate::model::task::Task;
use crate::repo::backend_types::{BackendResult, Table};
use log::debug;
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Row payload. Deletes carry the row as it was before removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRow {
    Task(Task),
    Project(ProjectRecord),
    Notification(Notification),
}

impl ChangeRow {
    pub fn table(&self) -> Table {
        match self {
            Self::Task(_) => Table::Tasks,
            Self::Project(_) => Table::Projects,
            Self::Notification(_) => Table::Notifications,
        }
    }

    pub fn user_id(&self) -> UserId {
        match self {
            Self::Task(task) => task.user_id,
            Self::Project(project) => project.user_id,
            Self::Notification(notification) => notification.user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub row: ChangeRow,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, row: ChangeRow) -> Self {
        Self { kind, row }
    }
}

/// `table = ? AND user_id = ?` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFilter {
    pub table: Table,
    pub user_id: UserId,
}

impl RowFilter {
    pub fn new(table: Table, user_id: UserId) -> Self {
        Self { table, user_id }
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        event.row.table() == self.table && event.row.user_id() == self.user_id
    }
}

/// Source of realtime change subscriptions.
pub trait ChangeFeed {
    fn subscribe(&self, filter: RowFilter) -> BackendResult<Subscription>;
}

/// Live subscription handle. Released on drop.
pub struct Subscription {
    filter: RowFilter,
    receiver: Receiver<ChangeEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Builds a handle; `release` runs exactly once when the handle goes away.
    pub fn new(
        filter: RowFilter,
        receiver: Receiver<ChangeEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            filter,
            receiver,
            release: Some(Box::new(release)),
        }
    }

    pub fn filter(&self) -> RowFilter {
        self.filter
    }

    /// Next pending event, without blocking.
    pub fn try_next(&self) -> Option<ChangeEvent> {
        self.receiver.try_recv().ok()
    }

    /// All pending events in delivery order.
    pub fn drain(&self) -> Vec<ChangeEvent> {
        self.receiver.try_iter().collect()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// In-process fan-out used by store implementations.
#[derive(Clone, Default)]
pub struct ChangeHub {
    state: Arc<Mutex<HubState>>,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    subscribers: BTreeMap<u64, Subscriber>,
}

struct Subscriber {
    filter: RowFilter,
    sender: Sender<ChangeEvent>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, filter: RowFilter) -> Subscription {
        let (sender, receiver) = channel();
        let id = {
            let mut state = lock(&self.state);
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.insert(id, Subscriber { filter, sender });
            id
        };
        debug!(
            "event=feed_subscribe module=sync status=ok subscription_id={} table={}",
            id,
            filter.table.as_str()
        );

        let weak_state = Arc::downgrade(&self.state);
        Subscription::new(filter, receiver, move || {
            if let Some(state) = weak_state.upgrade() {
                lock(&state).subscribers.remove(&id);
                debug!("event=feed_release module=sync status=ok subscription_id={id}");
            }
        })
    }

    /// Delivers `event` to every matching subscriber; returns the fan-out count.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        let mut state = lock(&self.state);
        let mut delivered = 0;
        let mut disconnected = Vec::new();
        for (id, subscriber) in &state.subscribers {
            if !subscriber.filter.matches(event) {
                continue;
            }
            if subscriber.sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                disconnected.push(*id);
            }
        }
        for id in disconnected {
            state.subscribers.remove(&id);
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.state).subscribers.len()
    }
}

impl ChangeFeed for ChangeHub {
    fn subscribe(&self, filter: RowFilter) -> BackendResult<Subscription> {
        Ok(ChangeHub::subscribe(self, filter))
    }
}

fn lock(state: &Mutex<HubState>) -> MutexGuard<'_, HubState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::{ChangeEvent, ChangeHub, ChangeKind, ChangeRow, RowFilter};
    use crate::model::notification::{Notification, NotificationKind};
    use crate::repo::backend_types::Table;
    use uuid::Uuid;

    fn notification_event(user_id: Uuid) -> ChangeEvent {
        ChangeEvent::new(
            ChangeKind::Insert,
            ChangeRow::Notification(Notification {
                id: Uuid::new_v4(),
                user_id,
                title: "t".to_string(),
                message: "m".to_string(),
                kind: NotificationKind::Info,
                read: false,
                created_at_ms: 0,
            }),
        )
    }

    #[test]
    fn publish_reaches_only_matching_filters() {
        let hub = ChangeHub::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let alice_sub = hub.subscribe(RowFilter::new(Table::Notifications, alice));
        let alice_tasks = hub.subscribe(RowFilter::new(Table::Tasks, alice));
        let bob_sub = hub.subscribe(RowFilter::new(Table::Notifications, bob));

        assert_eq!(hub.publish(&notification_event(alice)), 1);
        assert_eq!(alice_sub.drain().len(), 1);
        assert!(alice_tasks.try_next().is_none());
        assert!(bob_sub.try_next().is_none());
    }

    #[test]
    fn dropping_subscription_unregisters_it() {
        let hub = ChangeHub::new();
        let user = Uuid::new_v4();
        let subscription = hub.subscribe(RowFilter::new(Table::Notifications, user));
        assert_eq!(hub.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(hub.publish(&notification_event(user)), 0);
    }

    #[test]
    fn subscription_outliving_hub_releases_quietly() {
        let hub = ChangeHub::new();
        let subscription = hub.subscribe(RowFilter::new(Table::Tasks, Uuid::new_v4()));
        drop(hub);
        assert!(subscription.try_next().is_none());
        drop(subscription);
    }
}
