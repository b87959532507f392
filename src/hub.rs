use std::sync::{Mutex, Weak};

use crate::native::ActivityResult;

/// A subscriber to platform activity-result events. Returns true when the
/// event was consumed and should not be seen by other listeners.
pub trait ActivityResultListener: Send + Sync {
    fn on_activity_result(&self, result: &ActivityResult) -> bool;
}

/// Explicit subscription point for platform activity-result events. The
/// host dispatches every `(request_code, result_code, data)` event here;
/// listeners register at construction and deregister at teardown.
///
/// Listeners are held weakly; dead entries are pruned as events flow
/// through.
#[derive(Default)]
pub struct ActivityResultHub {
    inner: Mutex<HubInner>,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Weak<dyn ActivityResultListener>)>,
}

impl ActivityResultHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener, returning an id usable for deregistration.
    pub fn register(&self, listener: Weak<dyn ActivityResultListener>) -> u64 {
        let mut inner = self.inner.lock().expect("hub lock");
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        tracing::debug!(listener_id = id, "Activity result listener registered");
        id
    }

    /// Remove a previously registered listener. Unknown ids are ignored.
    pub fn unregister(&self, id: u64) {
        let mut inner = self.inner.lock().expect("hub lock");
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        if inner.listeners.len() < before {
            tracing::debug!(listener_id = id, "Activity result listener deregistered");
        }
    }

    /// Dispatch an event to every live listener. Returns true if any
    /// listener consumed it.
    pub fn dispatch(&self, result: &ActivityResult) -> bool {
        let listeners: Vec<_> = {
            let mut inner = self.inner.lock().expect("hub lock");
            inner
                .listeners
                .retain(|(_, listener)| listener.strong_count() > 0);
            inner.listeners.clone()
        };

        let mut consumed = false;
        for (_, listener) in listeners {
            if let Some(listener) = listener.upgrade() {
                consumed |= listener.on_activity_result(result);
            }
        }
        consumed
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.inner.lock().expect("hub lock").listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingListener {
        seen: AtomicUsize,
        consumes: bool,
    }

    impl CountingListener {
        fn new(consumes: bool) -> Arc<Self> {
            Arc::new(Self {
                seen: AtomicUsize::new(0),
                consumes,
            })
        }
    }

    impl ActivityResultListener for CountingListener {
        fn on_activity_result(&self, _result: &ActivityResult) -> bool {
            self.seen.fetch_add(1, Ordering::SeqCst);
            self.consumes
        }
    }

    fn downgrade(listener: &Arc<CountingListener>) -> Weak<dyn ActivityResultListener> {
        Arc::downgrade(listener) as Weak<dyn ActivityResultListener>
    }

    #[test]
    fn dispatch_reaches_all_listeners() {
        let hub = ActivityResultHub::new();
        let first = CountingListener::new(false);
        let second = CountingListener::new(false);
        hub.register(downgrade(&first));
        hub.register(downgrade(&second));

        assert!(!hub.dispatch(&ActivityResult::default()));
        assert_eq!(first.seen.load(Ordering::SeqCst), 1);
        assert_eq!(second.seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispatch_reports_consumption() {
        let hub = ActivityResultHub::new();
        let listener = CountingListener::new(true);
        hub.register(downgrade(&listener));

        assert!(hub.dispatch(&ActivityResult::default()));
    }

    #[test]
    fn unregister_stops_delivery() {
        let hub = ActivityResultHub::new();
        let listener = CountingListener::new(false);
        let id = hub.register(downgrade(&listener));
        hub.unregister(id);

        hub.dispatch(&ActivityResult::default());
        assert_eq!(listener.seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dead_listeners_are_pruned() {
        let hub = ActivityResultHub::new();
        let listener = CountingListener::new(false);
        hub.register(downgrade(&listener));
        drop(listener);

        hub.dispatch(&ActivityResult::default());
        assert_eq!(hub.listener_count(), 0);
    }
}
