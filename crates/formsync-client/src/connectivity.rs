//! Online/offline tracking and transition delivery.
//!
//! One monitor is created by the application and shared by cloning (all
//! clones see the same state). Platform signals are forwarded as-is through
//! [`ConnectivityMonitor::signal_online`] / [`ConnectivityMonitor::signal_offline`],
//! so listeners may see repeated events and must tolerate them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::sync::broadcast;

use formsync_core::config::SyncConfig;
use formsync_observability::tracing_setup::events;

/// Subscriber backlog before slow receivers start lagging.
const EVENT_CAPACITY: usize = 64;

/// An online/offline edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityEvent {
    WentOnline,
    WentOffline,
}

type Listener = Arc<dyn Fn(ConnectivityEvent) + Send + Sync>;

struct Inner {
    online: AtomicBool,
    listeners: DashMap<u64, Listener>,
    next_listener: AtomicU64,
    sender: broadcast::Sender<ConnectivityEvent>,
}

/// Shared connectivity state with callback and async subscriptions.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    inner: Arc<Inner>,
}

impl ConnectivityMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                online: AtomicBool::new(initially_online),
                listeners: DashMap::new(),
                next_listener: AtomicU64::new(0),
                sender,
            }),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.start_online)
    }

    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::SeqCst)
    }

    /// Platform reported connectivity.
    pub fn signal_online(&self) {
        self.publish(true, ConnectivityEvent::WentOnline);
    }

    /// Platform reported loss of connectivity.
    pub fn signal_offline(&self) {
        self.publish(false, ConnectivityEvent::WentOffline);
    }

    /// Register a callback for every transition. The callback stays
    /// registered until the returned handle is dropped.
    pub fn on_change<F>(&self, listener: F) -> ListenerHandle
    where
        F: Fn(ConnectivityEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.insert(id, Arc::new(listener));
        ListenerHandle {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Async stream of transitions from now on.
    pub fn subscribe(&self) -> ConnectivitySubscription {
        ConnectivitySubscription {
            receiver: self.inner.sender.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    fn publish(&self, online: bool, event: ConnectivityEvent) {
        let was = self.inner.online.swap(online, Ordering::SeqCst);
        if was != online {
            events::connectivity_changed(online);
        }

        // Snapshot first: a listener may drop its own handle.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        for listener in listeners {
            listener(event);
        }

        // No receivers is not an error.
        let _ = self.inner.sender.send(event);
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

/// Keeps an [`on_change`](ConnectivityMonitor::on_change) callback registered.
#[must_use = "dropping the handle unregisters the listener"]
pub struct ListenerHandle {
    id: u64,
    inner: Weak<Inner>,
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.listeners.remove(&self.id);
        }
    }
}

/// Async receiver of transitions. Dropping it unsubscribes.
pub struct ConnectivitySubscription {
    receiver: broadcast::Receiver<ConnectivityEvent>,
}

impl ConnectivitySubscription {
    /// Next transition, or `None` once every monitor clone is gone.
    ///
    /// A receiver that fell behind skips to the oldest retained event.
    pub async fn recv(&mut self) -> Option<ConnectivityEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "connectivity subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking poll for a pending transition.
    pub fn try_recv(&mut self) -> Option<ConnectivityEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
