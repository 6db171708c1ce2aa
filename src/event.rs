use crate::results::RaceSnapshot;
use crate::source::SourceError;

/// Pushed by the result store for every subscription, and consumed by
/// the controller's event loop. Snapshots are always whole payloads;
/// the controller recomputes every derived ranking from scratch.
#[derive(Debug)]
pub enum SourceEvent {
    /// A fresh payload for a subscribed event id, or `None` when the
    /// store holds nothing for it ("no results yet").
    Snapshot {
        event_id: String,
        data: Option<RaceSnapshot>,
    },

    /// The subscription failed. Terminal for this subscription until
    /// a fresh fetch is started; the store does not retry on its own.
    Failed {
        event_id: String,
        error: SourceError,
    },
}
