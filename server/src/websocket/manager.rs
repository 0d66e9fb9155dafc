//! Live query subscription manager.
//!
//! Tracks open live queries and pushes collection updates to them.

use std::sync::Arc;

use dashmap::DashMap;
use todo_engine::ServerMessage;
use tokio::sync::mpsc;

/// Sender for live query messages.
pub type MessageSender = mpsc::UnboundedSender<ServerMessage>;

/// Manages open live queries.
///
/// Thread-safe and can be shared across handlers via `Arc`.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Channel to each socket task, keyed by subscription id
    subscriptions: DashMap<String, MessageSender>,
}

impl SubscriptionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a subscription and return its id.
    pub fn register(&self, sender: MessageSender) -> String {
        let sub_id = uuid::Uuid::new_v4().to_string();

        self.subscriptions.insert(sub_id.clone(), sender);

        tracing::info!(sub_id = %sub_id, "Live query registered");

        sub_id
    }

    pub fn unregister(&self, sub_id: &str) {
        if self.subscriptions.remove(sub_id).is_some() {
            tracing::info!(sub_id = %sub_id, "Live query unregistered");
        }
    }

    /// Send a message to every subscription.
    ///
    /// Returns the number of subscriptions that received the message.
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        let mut sent_count = 0;

        for entry in self.subscriptions.iter() {
            if entry.value().send(message.clone()).is_ok() {
                sent_count += 1;
            }
        }

        tracing::debug!(recipients = sent_count, "Broadcast live query update");

        sent_count
    }

    /// Send a message to one subscription. Returns whether it was delivered
    /// to the socket task.
    pub fn send_to(&self, sub_id: &str, message: ServerMessage) -> bool {
        match self.subscriptions.get(sub_id) {
            Some(sender) => sender.send(message).is_ok(),
            None => false,
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_engine::Todo;

    #[test]
    fn register_unregister() {
        let manager = SubscriptionManager::new();
        let (tx, _rx) = mpsc::unbounded_channel();

        let sub_id = manager.register(tx);
        assert_eq!(manager.subscription_count(), 1);

        manager.unregister(&sub_id);
        assert_eq!(manager.subscription_count(), 0);

        // Unknown ids are ignored
        manager.unregister(&sub_id);
        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn each_registration_gets_its_own_id() {
        let manager = SubscriptionManager::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();

        let sub1 = manager.register(tx1);
        let sub2 = manager.register(tx2);
        assert_ne!(sub1, sub2);
        assert_eq!(manager.subscription_count(), 2);

        manager.unregister(&sub1);
        assert!(!manager.send_to(&sub1, ServerMessage::Pong));
        assert!(manager.send_to(&sub2, ServerMessage::Pong));
        assert!(rx1.try_recv().is_err());
        assert_eq!(rx2.try_recv().unwrap(), ServerMessage::Pong);
    }

    #[test]
    fn broadcast_reaches_everyone() {
        let manager = SubscriptionManager::new();

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        manager.register(tx1);
        manager.register(tx2);

        let message = ServerMessage::Todos {
            todos: vec![Todo::new("a", "Buy milk", 1)],
        };
        assert_eq!(manager.broadcast(&message), 2);

        assert_eq!(rx1.try_recv().unwrap(), message);
        assert_eq!(rx2.try_recv().unwrap(), message);
    }

    #[test]
    fn closed_receivers_are_not_counted() {
        let manager = SubscriptionManager::new();

        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        manager.register(tx1);
        manager.register(tx2);
        drop(rx1);

        assert_eq!(manager.broadcast(&ServerMessage::Pong), 1);
    }

    #[test]
    fn send_to_one() {
        let manager = SubscriptionManager::new();

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let sub1 = manager.register(tx1);
        manager.register(tx2);

        assert!(manager.send_to(&sub1, ServerMessage::Pong));
        assert!(!manager.send_to("unknown", ServerMessage::Pong));

        assert_eq!(rx1.try_recv().unwrap(), ServerMessage::Pong);
        assert!(rx2.try_recv().is_err());
    }
}
