//! ConnectivityMonitor: state, callbacks, async subscriptions, handle drop.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use formsync_client::{ConnectivityEvent, ConnectivityMonitor};

#[test]
fn state_follows_signals() {
    let monitor = ConnectivityMonitor::new(false);
    assert!(!monitor.is_online());
    monitor.signal_online();
    assert!(monitor.is_online());
    monitor.signal_offline();
    assert!(!monitor.is_online());
}

#[test]
fn clones_share_state() {
    let monitor = ConnectivityMonitor::new(false);
    let clone = monitor.clone();
    clone.signal_online();
    assert!(monitor.is_online());
}

#[test]
fn listeners_see_every_signal_including_repeats() {
    let monitor = ConnectivityMonitor::new(false);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _handle = monitor.on_change(move |event| sink.lock().unwrap().push(event));

    monitor.signal_online();
    monitor.signal_online();
    monitor.signal_offline();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            ConnectivityEvent::WentOnline,
            ConnectivityEvent::WentOnline,
            ConnectivityEvent::WentOffline
        ]
    );
}

#[test]
fn dropping_handle_unsubscribes() {
    let monitor = ConnectivityMonitor::new(false);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let handle = monitor.on_change(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(monitor.listener_count(), 1);

    monitor.signal_online();
    drop(handle);
    monitor.signal_offline();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(monitor.listener_count(), 0);
}

#[test]
fn handle_outliving_monitor_is_harmless() {
    let monitor = ConnectivityMonitor::new(true);
    let handle = monitor.on_change(|_| {});
    drop(monitor);
    drop(handle);
}

#[tokio::test]
async fn subscription_receives_transitions_in_order() {
    let monitor = ConnectivityMonitor::new(false);
    let mut sub = monitor.subscribe();

    monitor.signal_online();
    monitor.signal_offline();

    assert_eq!(sub.recv().await, Some(ConnectivityEvent::WentOnline));
    assert_eq!(sub.recv().await, Some(ConnectivityEvent::WentOffline));
    assert_eq!(sub.try_recv(), None);
}

#[tokio::test]
async fn subscription_ends_when_monitor_is_gone() {
    let monitor = ConnectivityMonitor::new(false);
    let mut sub = monitor.subscribe();
    drop(monitor);
    assert_eq!(sub.recv().await, None);
}
