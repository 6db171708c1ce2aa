use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use lazy_static::*;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

#[cfg(any(test, feature = "test"))]
pub use mock::MockStore;
pub use rest::*;

use crate::config::USER_AGENT;
use crate::event::SourceEvent;
use crate::results::RaceSnapshot;

#[cfg(any(test, feature = "test"))]
pub mod mock;
mod rest;

lazy_static! {
    /// The client used for all HTTP requests.
    static ref HTTP_CLIENT: reqwest::Client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("failed to build http client");
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Possible errors when talking to the result store.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Network or auth failure at the store.
    #[error("result store request failed")]
    RequestError(#[from] reqwest::Error),

    /// Likely a bug on our end, or a payload shape we do not know.
    #[error("failed to parse result store payload")]
    ParseError(#[from] serde_json::Error),
}

/// The remote store that holds race result payloads, keyed by an
/// opaque event identifier. Read-only: the scoreboard never writes.
///
/// Retry policy lives with implementations of this trait, never with
/// the rankings computed from its payloads.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// One-shot read of the current payload for an event id.
    /// `Ok(None)` means the store holds nothing for this id, which is
    /// the normal "no results yet" state.
    async fn fetch(&self, event_id: &str) -> SourceResult<Option<RaceSnapshot>>;

    /// Start a live subscription: every update of the payload is
    /// pushed into `events` as a whole snapshot. The first push
    /// reflects the current payload, present or not.
    async fn subscribe(
        &self,
        event_id: &str,
        events: UnboundedSender<SourceEvent>,
    ) -> SourceResult<()>;
}

/// The static lookup table mapping category and race keys to the
/// store's event identifiers, f.e. `herrer.heat1 -> "-OJpq..."`.
///
/// Lookups are case-insensitive on both keys. A pair without an entry
/// is a normal "invalid route" condition, not an internal error.
#[derive(Debug, Default, Clone)]
pub struct EventMap {
    categories: HashMap<String, HashMap<String, String>>,
}

impl EventMap {
    pub fn read_from_file(path: &Path) -> anyhow::Result<EventMap> {
        let raw = std::fs::read_to_string(path)?;
        Ok(raw.parse()?)
    }

    /// The event id registered for a category and race key, if any.
    pub fn lookup(&self, category: &str, race: &str) -> Option<&str> {
        self.categories
            .get(&category.to_lowercase())?
            .get(&race.to_lowercase())
            .map(String::as_str)
    }

    /// All known categories, in no particular order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// All race keys registered for a category, with their event ids.
    pub fn races(&self, category: &str) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .get(&category.to_lowercase())
            .into_iter()
            .flatten()
            .map(|(race, event_id)| (race.as_str(), event_id.as_str()))
    }
}

impl std::str::FromStr for EventMap {
    type Err = serde_json::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parsed: HashMap<String, HashMap<String, String>> = serde_json::from_str(raw)?;

        // Normalize keys once, so lookups only lowercase the inputs.
        let categories = parsed
            .into_iter()
            .map(|(category, races)| {
                let races = races
                    .into_iter()
                    .map(|(race, event_id)| (race.to_lowercase(), event_id))
                    .collect();
                (category.to_lowercase(), races)
            })
            .collect();
        Ok(EventMap { categories })
    }
}
