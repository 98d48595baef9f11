//! Pending one-shot location listeners.
//!
//! The registry is the service's parking lot for "give me a location"
//! requests that could not be satisfied immediately. Entries are keyed by
//! the identity of a caller-supplied token and hold it only weakly, so a
//! caller that goes away takes its pending listener with it.

use std::any::Any;
use std::collections::HashMap;
use std::mem;
use std::sync::{Arc, Weak};

use crate::{Location, LocationError};

/// Boxed one-shot callback, resolved with a terminal fix outcome.
pub type LocationCallback = Box<dyn FnOnce(Result<Location, LocationError>) + Send>;

/// Identity of a token: the address of the allocation behind the `Arc`.
fn key_id(token: &Arc<dyn Any + Send + Sync>) -> usize {
    Arc::as_ptr(token).cast::<()>() as usize
}

struct PendingEntry {
    /// Weak back-reference to the caller's token; a dead anchor means the
    /// entry is discarded instead of invoked.
    anchor: Weak<dyn Any + Send + Sync>,
    callback: LocationCallback,
}

/// Unresolved listeners, at most one per token identity.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    pending: HashMap<usize, PendingEntry>,
}

impl ListenerRegistry {
    /// Park `callback` under `token`'s identity.
    ///
    /// An unresolved entry already held under the same identity is
    /// replaced and dropped uninvoked.
    pub(crate) fn insert(
        &mut self,
        token: &Arc<dyn Any + Send + Sync>,
        callback: LocationCallback,
    ) {
        let entry = PendingEntry {
            anchor: Arc::downgrade(token),
            callback,
        };
        self.pending.insert(key_id(token), entry);
    }

    /// Drop the entry under `token`'s identity, if any, without invoking
    /// it.
    pub(crate) fn remove(&mut self, token: &Arc<dyn Any + Send + Sync>) {
        self.pending.remove(&key_id(token));
    }

    /// Move every pending entry out, leaving the registry empty.
    pub(crate) fn take_all(&mut self) -> DrainedListeners {
        DrainedListeners(mem::take(&mut self.pending).into_values().collect())
    }
}

/// Entries removed from the registry, to be resolved after the registry
/// lock is released.
pub(crate) struct DrainedListeners(Vec<PendingEntry>);

impl DrainedListeners {
    /// Invoke every callback whose token is still alive with `outcome`.
    ///
    /// Dead entries are pruned silently.
    pub(crate) fn resolve(self, outcome: &Result<Location, LocationError>) {
        for entry in self.0 {
            // keep the token alive across the call
            if let Some(_token) = entry.anchor.upgrade() {
                (entry.callback)(outcome.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::{ListenerRegistry, LocationCallback};
    use crate::Location;

    fn token() -> Arc<dyn Any + Send + Sync> {
        Arc::new(0_u32)
    }

    fn counting_callback(counter: &Arc<AtomicUsize>) -> LocationCallback {
        let counter = Arc::clone(counter);
        Box::new(move |_outcome| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn insert_under_same_token_replaces_without_invoking() {
        let mut registry = ListenerRegistry::default();
        let key = token();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        registry.insert(&key, counting_callback(&first));
        registry.insert(&key, counting_callback(&second));
        assert_eq!(registry.pending.len(), 1);

        registry.take_all().resolve(&Ok(Location::new(1.0, 2.0)));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_tokens_keep_distinct_entries() {
        let mut registry = ListenerRegistry::default();
        let keys = [token(), token(), token()];
        let counter = Arc::new(AtomicUsize::new(0));

        for key in &keys {
            registry.insert(key, counting_callback(&counter));
        }
        assert_eq!(registry.pending.len(), 3);

        registry.take_all().resolve(&Ok(Location::new(0.0, 0.0)));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(registry.pending.is_empty());
    }

    #[test]
    fn dead_token_entry_is_never_invoked() {
        let mut registry = ListenerRegistry::default();
        let counter = Arc::new(AtomicUsize::new(0));

        let key = token();
        registry.insert(&key, counting_callback(&counter));
        drop(key);

        registry.take_all().resolve(&Ok(Location::new(0.0, 0.0)));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn remove_discards_entry_without_invoking() {
        let mut registry = ListenerRegistry::default();
        let counter = Arc::new(AtomicUsize::new(0));

        let key = token();
        registry.insert(&key, counting_callback(&counter));
        registry.remove(&key);

        registry.take_all().resolve(&Ok(Location::new(0.0, 0.0)));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(registry.pending.is_empty());
    }

    #[test]
    fn resolution_passes_the_outcome_through() {
        let mut registry = ListenerRegistry::default();
        let key = token();
        let seen = Arc::new(Mutex::new(None));

        let sink = Arc::clone(&seen);
        registry.insert(
            &key,
            Box::new(move |outcome| {
                *sink.lock().unwrap() = Some(outcome);
            }),
        );

        registry
            .take_all()
            .resolve(&Err(crate::LocationError::Timeout));
        assert_eq!(
            *seen.lock().unwrap(),
            Some(Err(crate::LocationError::Timeout))
        );
    }
}
