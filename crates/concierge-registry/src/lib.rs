// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory registry of live client connections.
//!
//! Each WebSocket connection registers an mpsc sender here; a per-socket
//! forwarding task drains the matching receiver and writes frames to the
//! socket. Senders are cloned out of the map before any `.await`, so no
//! map lock is ever held across socket I/O.

use concierge_core::wire::OutboundEvent;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Buffered events per connection before sends start failing.
pub const CONNECTION_BUFFER: usize = 64;

/// Registry of connected clients, keyed by client ID.
///
/// At most one connection per client: registering a second connection for
/// the same ID displaces the first.
#[derive(Default)]
pub struct ConnectionRegistry {
    senders: DashMap<String, mpsc::Sender<OutboundEvent>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the channel for a new connection and register its sender.
    ///
    /// Returns a handle to this connection's sender (the identity token for
    /// [`ConnectionRegistry::disconnect_current`]) and the receiver for the
    /// connection's forwarding task. If the client already had a connection
    /// its sender is dropped here, which ends the old forwarding task once
    /// every outstanding clone is gone.
    pub fn connect(
        &self,
        client_id: &str,
    ) -> (mpsc::Sender<OutboundEvent>, mpsc::Receiver<OutboundEvent>) {
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER);
        let displaced = self.senders.insert(client_id.to_string(), tx.clone());
        if displaced.is_some() {
            debug!(client_id, "existing connection displaced");
        }
        (tx, rx)
    }

    /// Remove a client's registry entry unconditionally.
    pub fn disconnect(&self, client_id: &str) -> bool {
        self.senders.remove(client_id).is_some()
    }

    /// Remove the registry entry only if it still belongs to `sender`'s channel.
    ///
    /// A disconnecting socket must not remove an entry that a newer
    /// connection for the same client has already replaced.
    pub fn disconnect_current(&self, client_id: &str, sender: &mpsc::Sender<OutboundEvent>) -> bool {
        self.senders
            .remove_if(client_id, |_, current| current.same_channel(sender))
            .is_some()
    }

    /// Look up the sender registered for a connected client.
    pub fn sender_for(&self, client_id: &str) -> Option<mpsc::Sender<OutboundEvent>> {
        self.senders.get(client_id).map(|entry| entry.clone())
    }

    /// Push an event to one client. Returns `false` if the client is not
    /// connected or its channel is gone; a dead channel is disconnected.
    pub async fn send_to(&self, client_id: &str, event: OutboundEvent) -> bool {
        let Some(sender) = self.sender_for(client_id) else {
            return false;
        };
        match sender.send(event).await {
            Ok(()) => true,
            Err(_) => {
                warn!(client_id, "connection channel closed, dropping entry");
                self.disconnect_current(client_id, &sender);
                false
            }
        }
    }

    /// Push an event to every connected client. One client's dead channel
    /// never blocks delivery to the others. Returns the delivery count.
    pub async fn broadcast(&self, event: OutboundEvent) -> usize {
        let targets: Vec<(String, mpsc::Sender<OutboundEvent>)> = self
            .senders
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        let mut dead: Vec<(String, mpsc::Sender<OutboundEvent>)> = Vec::new();
        for (client_id, sender) in targets {
            match sender.send(event.clone()).await {
                Ok(()) => delivered += 1,
                Err(_) => dead.push((client_id, sender)),
            }
        }
        for (client_id, sender) in dead {
            warn!(client_id = %client_id, "connection channel closed, dropping entry");
            self.disconnect_current(&client_id, &sender);
        }
        delivered
    }

    /// Whether a client currently has a registered connection.
    pub fn is_connected(&self, client_id: &str) -> bool {
        self.senders.contains_key(client_id)
    }

    /// Number of registered connections.
    pub fn count(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(text: &str) -> OutboundEvent {
        OutboundEvent::message(text, "2026-03-01T09:00:00.000Z")
    }

    #[tokio::test]
    async fn send_to_delivers_to_registered_client() {
        let registry = ConnectionRegistry::new();
        let (_tx, mut rx) = registry.connect("c-1");
        assert_eq!(registry.count(), 1);

        assert!(registry.send_to("c-1", event("hello")).await);
        let received = rx.recv().await.unwrap();
        assert!(matches!(received, OutboundEvent::Message { content, .. } if content == "hello"));
    }

    #[tokio::test]
    async fn send_to_unknown_client_returns_false() {
        let registry = ConnectionRegistry::new();
        assert!(!registry.send_to("ghost", event("hello")).await);
    }

    #[tokio::test]
    async fn reconnect_displaces_previous_connection() {
        let registry = ConnectionRegistry::new();
        let (old_tx, _rx1) = registry.connect("c-1");
        let (_tx2, mut rx2) = registry.connect("c-1");
        assert_eq!(registry.count(), 1);
        let current = registry.sender_for("c-1").unwrap();
        assert!(!current.same_channel(&old_tx));

        // Delivery goes to the new connection.
        assert!(registry.send_to("c-1", event("to-new")).await);
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn stale_disconnect_does_not_remove_new_connection() {
        let registry = ConnectionRegistry::new();
        let (old_sender, _rx1) = registry.connect("c-1");

        // Client reconnects before the old socket's cleanup runs.
        let (new_sender, _rx2) = registry.connect("c-1");

        assert!(!registry.disconnect_current("c-1", &old_sender));
        assert!(registry.is_connected("c-1"));

        // The live connection's own cleanup still works.
        assert!(registry.disconnect_current("c-1", &new_sender));
        assert!(!registry.is_connected("c-1"));
    }

    #[tokio::test]
    async fn dead_channel_is_dropped_on_send() {
        let registry = ConnectionRegistry::new();
        let (_tx, rx) = registry.connect("c-1");
        drop(rx);

        assert!(!registry.send_to("c-1", event("hello")).await);
        assert!(!registry.is_connected("c-1"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_churn_leaves_consistent_count() {
        use std::sync::Arc;

        let registry = Arc::new(ConnectionRegistry::new());
        let mut handles = Vec::new();

        // Many tasks hammer an overlapping set of client ids. Each task
        // connects, sends, and half of them disconnect their own entry.
        for task in 0..50usize {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let client_id = format!("c-{}", task % 10);
                for _ in 0..20 {
                    let (tx, mut rx) = registry.connect(&client_id);
                    registry.send_to(&client_id, event("ping")).await;
                    while rx.try_recv().is_ok() {}
                    if task % 2 == 0 {
                        registry.disconnect_current(&client_id, &tx);
                    }
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // No leaked or duplicate entries: at most one entry per client id
        // survives, and every survivor is one of the ten contested ids.
        assert!(registry.count() <= 10, "count = {}", registry.count());
        for id in 0..10 {
            let client_id = format!("c-{id}");
            if let Some(sender) = registry.sender_for(&client_id) {
                assert!(registry.disconnect_current(&client_id, &sender));
            }
        }
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn broadcast_isolates_dead_channels() {
        let registry = ConnectionRegistry::new();
        let (_tx_live, mut rx_live) = registry.connect("c-live");
        let (_tx_dead, rx_dead) = registry.connect("c-dead");
        drop(rx_dead);

        let delivered = registry.broadcast(event("everyone")).await;
        assert_eq!(delivered, 1);
        assert!(rx_live.recv().await.is_some());
        assert!(!registry.is_connected("c-dead"));
        assert!(registry.is_connected("c-live"));
    }
}
