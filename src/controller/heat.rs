use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::controller::ViewState;
use crate::results::RaceSnapshot;

/// Shared component that tracks the live state of a single heat's
/// result feed.
#[async_trait]
pub trait LiveHeat: Send + Sync {
    /// While holding this guard, the heat state is read-only.
    async fn lock(&self) -> RwLockReadGuard<'_, ViewState<RaceSnapshot>>;

    /// The most recent snapshot, if any result has arrived.
    async fn snapshot(&self) -> Option<RaceSnapshot> {
        self.lock().await.data().cloned()
    }
}

#[derive(Clone)]
pub struct HeatController {
    state: Arc<RwLock<ViewState<RaceSnapshot>>>,
}

impl HeatController {
    pub fn init() -> Self {
        HeatController {
            state: Arc::new(RwLock::new(ViewState::NoData)),
        }
    }

    /// Marks the start of a fresh fetch. This is the only transition
    /// out of `Failed`.
    pub async fn begin_loading(&self) {
        let mut state = self.state.write().await;
        *state = ViewState::Loading;
    }

    /// Replaces the heat state with the store's answer. `None` means
    /// nothing is stored for this heat. Returns `false` when the
    /// update was discarded because the subscription already failed.
    pub async fn set_snapshot(&self, data: Option<RaceSnapshot>) -> bool {
        let mut state = self.state.write().await;
        if let ViewState::Failed = *state {
            return false;
        }
        *state = match data {
            Some(snapshot) => ViewState::Ready(snapshot),
            None => ViewState::Empty,
        };
        true
    }

    pub async fn set_failed(&self) {
        let mut state = self.state.write().await;
        *state = ViewState::Failed;
    }
}

#[async_trait]
impl LiveHeat for HeatController {
    async fn lock(&self) -> RwLockReadGuard<'_, ViewState<RaceSnapshot>> {
        self.state.read().await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_heat_states() {
        let heat = HeatController::init();
        assert_eq!(ViewState::NoData, *heat.lock().await);

        heat.begin_loading().await;
        assert_eq!(ViewState::Loading, *heat.lock().await);

        assert!(heat.set_snapshot(None).await);
        assert_eq!(ViewState::Empty, *heat.lock().await);

        let snapshot = RaceSnapshot::default();
        assert!(heat.set_snapshot(Some(snapshot.clone())).await);
        assert!(heat.lock().await.is_ready());
        assert_eq!(Some(snapshot), heat.snapshot().await);
    }

    #[tokio::test]
    async fn test_failed_is_terminal() {
        let heat = HeatController::init();
        heat.begin_loading().await;
        heat.set_failed().await;

        assert!(!heat.set_snapshot(Some(RaceSnapshot::default())).await);
        assert_eq!(ViewState::Failed, *heat.lock().await);

        heat.begin_loading().await;
        assert!(heat.set_snapshot(Some(RaceSnapshot::default())).await);
        assert!(heat.lock().await.is_ready());
    }
}
