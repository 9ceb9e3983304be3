//! Persisted consent decision.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use lumen_core::constants::{CONSENT_DENIED, CONSENT_GRANTED, CONSENT_STORAGE_KEY};
use lumen_core::traits::{IConsentGate, IKeyValueStore};
use lumen_observability::tracing_setup::events;

/// Live consent flag backed by the host key/value store.
///
/// Setting consent has no queue or network side effects; draining the
/// pre-consent queue is the caller's job.
pub struct ConsentStore {
    granted: AtomicBool,
    store: Arc<dyn IKeyValueStore>,
}

impl std::fmt::Debug for ConsentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsentStore")
            .field("granted", &self.has_consent())
            .finish()
    }
}

impl ConsentStore {
    /// Load the persisted decision. Absent, unreadable or unknown values
    /// mean consent is not granted.
    pub fn load(store: Arc<dyn IKeyValueStore>) -> Self {
        let granted = match store.get(CONSENT_STORAGE_KEY) {
            Ok(Some(value)) => value == CONSENT_GRANTED,
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "consent: failed to read persisted decision");
                false
            }
        };
        Self {
            granted: AtomicBool::new(granted),
            store,
        }
    }

    pub fn has_consent(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    /// Persist and apply a decision. Returns the previous value.
    ///
    /// A failed write is logged; the in-memory flag is updated regardless.
    pub fn set_consent(&self, granted: bool) -> bool {
        let value = if granted {
            CONSENT_GRANTED
        } else {
            CONSENT_DENIED
        };
        if let Err(e) = self.store.set(CONSENT_STORAGE_KEY, value) {
            tracing::warn!(error = %e, "consent: failed to persist decision");
        }
        let previous = self.granted.swap(granted, Ordering::SeqCst);
        if previous != granted {
            events::consent_changed(granted);
        }
        previous
    }
}

impl IConsentGate for ConsentStore {
    fn has_consent(&self) -> bool {
        ConsentStore::has_consent(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_to_not_granted() {
        let consent = ConsentStore::load(Arc::new(MemoryStore::new()));
        assert!(!consent.has_consent());
    }

    #[test]
    fn decision_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        let consent = ConsentStore::load(store.clone());
        assert!(!consent.set_consent(true));
        assert_eq!(
            store.get(CONSENT_STORAGE_KEY).unwrap().as_deref(),
            Some(CONSENT_GRANTED)
        );

        let reloaded = ConsentStore::load(store.clone());
        assert!(reloaded.has_consent());

        reloaded.set_consent(false);
        assert!(!ConsentStore::load(store).has_consent());
    }

    #[test]
    fn garbage_value_is_not_consent() {
        let store = Arc::new(MemoryStore::new());
        store.set(CONSENT_STORAGE_KEY, "yes please").unwrap();
        assert!(!ConsentStore::load(store).has_consent());
    }
}
