use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::utils::time::now;

const HISTORY_CAPACITY: usize = 100;
const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Sink for user-facing alerts raised by services and middleware.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);
}

struct History {
    next_id: u64,
    items: VecDeque<Notification>,
}

/// Fan-out of notifications to live subscribers plus a bounded history that
/// HTTP clients poll.
#[derive(Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<Notification>,
    history: Arc<Mutex<History>>,
    capacity: usize,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            history: Arc::new(Mutex::new(History {
                next_id: 1,
                items: VecDeque::new(),
            })),
            capacity: capacity.max(1),
        }
    }

    /// Registers a live listener. Dropping the returned handle unregisters it.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn publish(&self, level: NotificationLevel, message: impl Into<String>) -> Notification {
        let notification = {
            let mut history = self.history.lock().expect("notification history poisoned");
            let notification = Notification {
                id: history.next_id,
                level,
                message: message.into(),
                created_at: now(),
            };
            history.next_id += 1;
            history.items.push_back(notification.clone());
            while history.items.len() > self.capacity {
                history.items.pop_front();
            }
            notification
        };

        tracing::debug!(id = notification.id, level = ?level, "notification published");
        // No live subscribers is fine; history still has it.
        let _ = self.sender.send(notification.clone());
        notification
    }

    /// Retained notifications with an id greater than `since`, oldest first.
    pub fn recent(&self, since: Option<u64>) -> Vec<Notification> {
        let history = self.history.lock().expect("notification history poisoned");
        history
            .items
            .iter()
            .filter(|n| since.map_or(true, |since| n.id > since))
            .cloned()
            .collect()
    }

    pub fn dismiss(&self, id: u64) -> bool {
        let mut history = self.history.lock().expect("notification history poisoned");
        let before = history.items.len();
        history.items.retain(|n| n.id != id);
        history.items.len() != before
    }
}

impl Notifier for NotificationHub {
    fn notify(&self, level: NotificationLevel, message: &str) {
        self.publish(level, message);
    }
}

pub struct Subscription {
    receiver: broadcast::Receiver<Notification>,
}

impl Subscription {
    /// Next notification, or `None` once the hub is gone. Notifications
    /// missed by a slow subscriber are skipped.
    pub async fn recv(&mut self) -> Option<Notification> {
        loop {
            match self.receiver.recv().await {
                Ok(notification) => return Some(notification),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "notification subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_and_unregister_on_drop() {
        let hub = NotificationHub::default();
        let mut subscription = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);

        hub.publish(NotificationLevel::Success, "Assessment submitted");
        let received = subscription.recv().await.unwrap();
        assert_eq!(received.message, "Assessment submitted");
        assert_eq!(received.level, NotificationLevel::Success);

        drop(subscription);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn history_is_bounded_and_filterable() {
        let hub = NotificationHub::new(2);
        let first = hub.publish(NotificationLevel::Info, "one");
        let second = hub.publish(NotificationLevel::Info, "two");
        let third = hub.publish(NotificationLevel::Error, "three");

        let recent = hub.recent(None);
        assert_eq!(recent.iter().map(|n| n.id).collect::<Vec<_>>(), vec![second.id, third.id]);
        assert!(recent.iter().all(|n| n.id != first.id));

        let newer = hub.recent(Some(second.id));
        assert_eq!(newer, vec![third]);
    }

    #[test]
    fn dismiss_removes_once() {
        let hub = NotificationHub::default();
        let n = hub.publish(NotificationLevel::Error, "Failed");
        assert!(hub.dismiss(n.id));
        assert!(!hub.dismiss(n.id));
        assert!(hub.recent(None).is_empty());
    }
}
