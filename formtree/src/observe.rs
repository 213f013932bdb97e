//! Change subscriptions with trailing-edge debounce
//!
//! Observers are read-only taps on field value changes. Immediate
//! subscriptions fire synchronously on the mutating call; debounced ones
//! are parked until a quiet period has passed with no further changes,
//! and a newer change always supersedes the pending invocation. Delivery
//! of parked notifications is pumped by `tick`, so the engine stays
//! decoupled from any particular event loop.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::Value;

/// Default quiet period for debounced subscriptions.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Handle identifying a subscription; pass to
/// [`FormEngine::unsubscribe`](crate::FormEngine::unsubscribe) to dispose
/// it.
///
/// An undisposed handle leaks only its callback; it never crashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub(crate) u64);

type Observer = Box<dyn FnMut(&Value) + Send>;

struct Entry {
    id: u64,
    path: String,
    quiet: Option<Duration>,
    observer: Observer,
}

struct Pending {
    value: Value,
    due: Instant,
}

/// Registry of change observers, owned by the engine.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<Entry>,
    pending: HashMap<u64, Pending>,
}

impl Observers {
    pub(crate) fn subscribe(
        &mut self,
        path: String,
        quiet: Option<Duration>,
        observer: Observer,
    ) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            path,
            quiet,
            observer,
        });
        Subscription(id)
    }

    pub(crate) fn unsubscribe(&mut self, sub: Subscription) {
        self.entries.retain(|entry| entry.id != sub.0);
        self.pending.remove(&sub.0);
    }

    /// Routes a value change to every observer of `path`.
    ///
    /// Immediate observers run now; debounced ones get their pending
    /// invocation (re)scheduled for `now + quiet`, superseding whatever
    /// was parked before.
    pub(crate) fn notify(&mut self, path: &str, value: &Value, now: Instant) {
        for entry in self.entries.iter_mut().filter(|entry| entry.path == path) {
            match entry.quiet {
                None => (entry.observer)(value),
                Some(quiet) => {
                    self.pending.insert(
                        entry.id,
                        Pending {
                            value: value.clone(),
                            due: now + quiet,
                        },
                    );
                }
            }
        }
    }

    /// Fires every parked notification whose quiet period has elapsed.
    pub(crate) fn tick(&mut self, now: Instant) {
        let due: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.due <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in due {
            let Some(pending) = self.pending.remove(&id) else {
                continue;
            };
            if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
                (entry.observer)(&pending.value);
            }
        }
    }

    /// Earliest pending due time, for event-loop sleeping.
    pub(crate) fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|pending| pending.due).min()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<Value>>>, Observer) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: Observer = Box::new(move |value: &Value| {
            sink.lock().unwrap().push(value.clone());
        });
        (seen, observer)
    }

    #[test]
    fn immediate_observer_fires_synchronously() {
        let mut observers = Observers::default();
        let (seen, observer) = recorder();
        observers.subscribe("email".into(), None, observer);

        observers.notify("email", &Value::from("a"), Instant::now());
        observers.notify("other", &Value::from("b"), Instant::now());

        assert_eq!(*seen.lock().unwrap(), vec![Value::from("a")]);
    }

    #[test]
    fn debounce_supersedes_and_carries_last_value() {
        let mut observers = Observers::default();
        let (seen, observer) = recorder();
        let quiet = Duration::from_millis(100);
        observers.subscribe("email".into(), Some(quiet), observer);

        let t0 = Instant::now();
        observers.notify("email", &Value::from("a"), t0);
        observers.notify("email", &Value::from("ab"), t0 + Duration::from_millis(10));
        observers.notify("email", &Value::from("abc"), t0 + Duration::from_millis(20));

        // Not yet: the window restarts with each change.
        observers.tick(t0 + Duration::from_millis(119));
        assert!(seen.lock().unwrap().is_empty());

        // One invocation, last value, exactly at last-change + quiet.
        observers.tick(t0 + Duration::from_millis(120));
        assert_eq!(*seen.lock().unwrap(), vec![Value::from("abc")]);

        // Nothing left parked.
        observers.tick(t0 + Duration::from_secs(10));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn next_deadline_tracks_earliest_pending() {
        let mut observers = Observers::default();
        let (_, observer_a) = recorder();
        let (_, observer_b) = recorder();
        observers.subscribe("a".into(), Some(Duration::from_millis(50)), observer_a);
        observers.subscribe("b".into(), Some(Duration::from_millis(200)), observer_b);

        let t0 = Instant::now();
        assert!(observers.next_deadline().is_none());

        observers.notify("b", &Value::from(1i64), t0);
        observers.notify("a", &Value::from(2i64), t0);
        assert_eq!(observers.next_deadline(), Some(t0 + Duration::from_millis(50)));

        observers.tick(t0 + Duration::from_millis(50));
        assert_eq!(observers.next_deadline(), Some(t0 + Duration::from_millis(200)));
    }

    #[test]
    fn unsubscribe_discards_pending() {
        let mut observers = Observers::default();
        let (seen, observer) = recorder();
        let sub = observers.subscribe("a".into(), Some(Duration::from_millis(10)), observer);

        let t0 = Instant::now();
        observers.notify("a", &Value::from(1i64), t0);
        observers.unsubscribe(sub);
        observers.tick(t0 + Duration::from_secs(1));

        assert!(seen.lock().unwrap().is_empty());
        assert!(observers.next_deadline().is_none());
    }
}
