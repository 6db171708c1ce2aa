use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;

use crate::event::SourceEvent;
use crate::results::RaceSnapshot;
use crate::source::{ResultStore, SourceResult};

/// In-memory result store for tests: snapshots are pushed with
/// `publish`, and every subscriber of the matching event id receives
/// them in order.
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    snapshots: HashMap<String, RaceSnapshot>,
    subscribers: Vec<(String, UnboundedSender<SourceEvent>)>,
}

impl MockStore {
    pub fn new() -> MockStore {
        Default::default()
    }

    /// Replace the payload for an event id and notify subscribers.
    /// `None` clears the payload, as if the store held nothing.
    pub async fn publish(&self, event_id: &str, data: Option<RaceSnapshot>) {
        let mut state = self.state.lock().await;
        match &data {
            Some(snapshot) => {
                state.snapshots.insert(event_id.to_string(), snapshot.clone());
            }
            None => {
                state.snapshots.remove(event_id);
            }
        }
        state.subscribers.retain(|(id, tx)| {
            if id != event_id {
                return true;
            }
            tx.send(SourceEvent::Snapshot {
                event_id: event_id.to_string(),
                data: data.clone(),
            })
            .is_ok()
        });
    }
}

#[async_trait]
impl ResultStore for MockStore {
    async fn fetch(&self, event_id: &str) -> SourceResult<Option<RaceSnapshot>> {
        let state = self.state.lock().await;
        Ok(state.snapshots.get(event_id).cloned())
    }

    async fn subscribe(
        &self,
        event_id: &str,
        events: UnboundedSender<SourceEvent>,
    ) -> SourceResult<()> {
        let mut state = self.state.lock().await;
        let data = state.snapshots.get(event_id).cloned();
        let _ = events.send(SourceEvent::Snapshot {
            event_id: event_id.to_string(),
            data,
        });
        state.subscribers.push((event_id.to_string(), events));
        Ok(())
    }
}
