//! Silent snapshot/restore used by bulk population.

/// Plain-data access to an observable primitive that bypasses notification.
///
/// `restore` replaces the whole contents and notifies nobody. It exists for
/// the first phase of a document load; the loader is responsible for the
/// single explicit broadcast that follows.
pub trait Restore {
    /// Owned, observer-free copy of the contents.
    type Snapshot;

    /// Copy the current contents out.
    fn snapshot(&self) -> Self::Snapshot;

    /// Replace the contents without notifying subscribers.
    fn restore(&self, snapshot: Self::Snapshot);
}
