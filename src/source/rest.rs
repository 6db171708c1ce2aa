use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::delay_for;

use crate::config::STORE_POLL_INTERVAL_SECS;
use crate::event::SourceEvent;
use crate::results::RaceSnapshot;
use crate::source::{ResultStore, SourceResult, HTTP_CLIENT};

/// Client for a Firebase-style REST result store: every payload lives
/// at `<base>/race_results/<event id>.json`, and `null` bodies mean
/// "nothing stored for this id".
///
/// Subscriptions are poll loops over the same endpoint that push a
/// snapshot whenever the payload body changes. On a request failure
/// the loop pushes `SourceEvent::Failed` and ends; a fresh `subscribe`
/// starts over.
#[derive(Clone)]
pub struct RestStore {
    base_url: String,
}

impl RestStore {
    /// Connect to the result store at the given base URL, or `None`
    /// if it is unreachable.
    pub async fn connect(base_url: &str) -> Option<RestStore> {
        let store = RestStore {
            base_url: base_url.trim_end_matches('/').to_string(),
        };
        let probe_url = format!("{}/race_results.json?shallow=true", store.base_url);
        match HTTP_CLIENT.get(&probe_url).send().await {
            Ok(_) => Some(store),
            Err(err) => {
                log::debug!("result store probe failed: {}", err);
                None
            }
        }
    }
}

async fn fetch_body(base_url: &str, event_id: &str) -> SourceResult<String> {
    let url = format!("{}/race_results/{}.json", base_url, event_id);
    log::debug!("fetch race results for event {}", event_id);
    let body = HTTP_CLIENT.get(&url).send().await?.text().await?;
    Ok(body)
}

fn parse_body(body: &str) -> SourceResult<Option<RaceSnapshot>> {
    if body == "null" {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(body)?))
}

#[async_trait]
impl ResultStore for RestStore {
    async fn fetch(&self, event_id: &str) -> SourceResult<Option<RaceSnapshot>> {
        let body = fetch_body(&self.base_url, event_id).await?;
        parse_body(&body)
    }

    async fn subscribe(
        &self,
        event_id: &str,
        events: UnboundedSender<SourceEvent>,
    ) -> SourceResult<()> {
        let base_url = self.base_url.clone();
        let event_id = event_id.to_string();

        tokio::spawn(async move {
            let mut last_body: Option<String> = None;
            loop {
                let body = match fetch_body(&base_url, &event_id).await {
                    Ok(body) => body,
                    Err(error) => {
                        let _ = events.send(SourceEvent::Failed {
                            event_id: event_id.clone(),
                            error,
                        });
                        return;
                    }
                };

                if last_body.as_deref() != Some(body.as_str()) {
                    let ev = match parse_body(&body) {
                        Ok(data) => SourceEvent::Snapshot {
                            event_id: event_id.clone(),
                            data,
                        },
                        Err(error) => SourceEvent::Failed {
                            event_id: event_id.clone(),
                            error,
                        },
                    };
                    let is_failure = matches!(ev, SourceEvent::Failed { .. });
                    if events.send(ev).is_err() {
                        return; // receiver gone, subscription torn down
                    }
                    if is_failure {
                        return;
                    }
                    last_body = Some(body);
                }

                delay_for(Duration::from_secs(STORE_POLL_INTERVAL_SECS)).await;
            }
        });

        Ok(())
    }
}
