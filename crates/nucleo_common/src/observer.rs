//! Synchronous change notification.

use nucleo_shared::GameState;

/// Handle returned by `ProgressStore::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Called after every effective store mutation with the new state version
pub trait StateObserver {
    fn state_changed(&self, version: u64, state: &GameState);
}

impl<F> StateObserver for F
where
    F: Fn(u64, &GameState),
{
    fn state_changed(&self, version: u64, state: &GameState) {
        self(version, state)
    }
}
