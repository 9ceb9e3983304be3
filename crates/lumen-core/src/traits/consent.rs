/// Read side of the consent store, consulted before any network-visible action.
pub trait IConsentGate: Send + Sync {
    fn has_consent(&self) -> bool;
}
