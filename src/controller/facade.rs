use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::board::{
    Board, LineBoard, OverallBoard, PointsBoard, RawScoresBoard, SegmentChoice, StatusBoard,
    TimeTrialBoard,
};
use crate::config::Config;
use crate::controller::{HeatController, LeagueController, LiveHeat, LiveLeague, RaceFormat, ViewState};
use crate::event::SourceEvent;
use crate::source::{EventMap, ResultStore, SourceResult};

/// One entry of the event map, bound to a result feed.
struct Route {
    category: String,
    race: String,
    event_id: String,
    format: RaceFormat,
}

/// This facade owns all controllers, and reacts to store events by
/// updating them and re-rendering the boards they feed.
pub struct Controller {
    title: String,
    output_dir: PathBuf,
    event_map: EventMap,
    routes: Vec<Route>,
    heats: HashMap<String, HeatController>,
    leagues: HashMap<String, LeagueController>,
}

impl Controller {
    pub fn init(config: &Config, event_map: EventMap) -> Controller {
        let mut routes = Vec::new();
        let mut heats = HashMap::new();
        let mut leagues = HashMap::new();

        for category in event_map.categories() {
            for (race, event_id) in event_map.races(category) {
                routes.push(Route {
                    category: category.to_string(),
                    race: race.to_string(),
                    event_id: event_id.to_string(),
                    format: RaceFormat::from_race_key(race),
                });
                heats
                    .entry(event_id.to_string())
                    .or_insert_with(HeatController::init);
            }

            let league = LeagueController::init(|heat_key| {
                event_map
                    .lookup(category, heat_key)
                    .map(|event_id| event_id.to_string())
            });
            leagues.insert(category.to_string(), league);
        }

        Controller {
            title: config.event_title.clone(),
            output_dir: config.output_dir.clone(),
            event_map,
            routes,
            heats,
            leagues,
        }
    }

    /// Starts a subscription for every mapped event id, and renders
    /// the initial loading pages.
    pub async fn subscribe_all(
        &self,
        store: &Arc<dyn ResultStore>,
        events: &UnboundedSender<SourceEvent>,
    ) -> SourceResult<()> {
        for (event_id, heat) in self.heats.iter() {
            heat.begin_loading().await;
            store.subscribe(event_id, events.clone()).await?;
        }
        self.write_all_boards().await;
        Ok(())
    }

    pub async fn on_source_event(&self, event: SourceEvent) {
        log::debug!("{:?}", &event);
        match event {
            SourceEvent::Snapshot { event_id, data } => {
                let accepted = match self.heats.get(&event_id) {
                    Some(heat) => heat.set_snapshot(data.clone()).await,
                    None => false,
                };
                if !accepted {
                    log::warn!("dropped snapshot for unknown or failed event {}", event_id);
                    return;
                }
                for league in self.leagues.values() {
                    league.set_heat(&event_id, data.clone()).await;
                }
                self.write_event_boards(&event_id).await;
            }
            SourceEvent::Failed { event_id, error } => {
                log::warn!("subscription for event {} failed: {}", event_id, error);
                if let Some(heat) = self.heats.get(&event_id) {
                    heat.set_failed().await;
                }
                self.write_event_boards(&event_id).await;
            }
        }
    }

    /// The board for a category and race key, rendered from the
    /// current state. Unmapped routes get a status page, so a bad
    /// link never panics.
    pub async fn render_route(&self, category: &str, race: &str) -> String {
        if race.eq_ignore_ascii_case("samlet") {
            return match self.leagues.get(&category.to_lowercase()) {
                Some(league) => self.render_overall(category, league).await,
                None => StatusBoard::invalid_route(&self.title, category, race).render(),
            };
        }

        let event_id = match self.event_map.lookup(category, race) {
            Some(event_id) => event_id,
            None => return StatusBoard::invalid_route(&self.title, category, race).render(),
        };

        let heat = match self.heats.get(event_id) {
            Some(heat) => heat,
            None => return StatusBoard::invalid_route(&self.title, category, race).render(),
        };

        let state = heat.lock().await;
        let snapshot = match &*state {
            ViewState::NoData | ViewState::Loading => {
                return StatusBoard::loading(&self.title, event_id).render()
            }
            ViewState::Empty => return StatusBoard::no_results(&self.title).render(),
            ViewState::Failed => return StatusBoard::fetch_failed(&self.title, event_id).render(),
            ViewState::Ready(snapshot) => snapshot,
        };

        match RaceFormat::from_race_key(race) {
            RaceFormat::TimeTrial => {
                TimeTrialBoard::from_snapshot(&self.title, category, race, snapshot).render()
            }
            RaceFormat::TimeTrialBigScreen => {
                TimeTrialBoard::for_big_screen(&self.title, category, race, snapshot).render()
            }
            RaceFormat::PointsRace => {
                PointsBoard::from_snapshot(&self.title, category, race, snapshot, SegmentChoice::All)
                    .render()
            }
            RaceFormat::PointsRaceBigScreen => {
                PointsBoard::for_big_screen(&self.title, category, race, snapshot).render()
            }
            RaceFormat::LineRace => {
                LineBoard::from_snapshot(&self.title, category, race, snapshot).render()
            }
            RaceFormat::Raw => {
                RawScoresBoard::from_snapshot(&self.title, event_id, snapshot).render()
            }
        }
    }

    async fn render_overall(&self, category: &str, league: &LeagueController) -> String {
        let state = league.lock().await;
        let heats: Vec<_> = state.heats.iter().map(|heat| heat.as_ref()).collect();
        OverallBoard::from_heats(&self.title, category, &heats).render()
    }

    /// Re-renders every board that shows data of this event id.
    async fn write_event_boards(&self, event_id: &str) {
        for route in self.routes.iter() {
            if route.event_id != event_id {
                continue;
            }
            let html = self.render_route(&route.category, &route.race).await;
            self.write_board(&route.category, &route.race, &html);
        }
        for (category, league) in self.leagues.iter() {
            if league.contains(event_id) {
                let html = self.render_overall(category, league).await;
                self.write_board(category, "samlet", &html);
            }
        }
    }

    async fn write_all_boards(&self) {
        for route in self.routes.iter() {
            let html = self.render_route(&route.category, &route.race).await;
            self.write_board(&route.category, &route.race, &html);
        }
        for (category, league) in self.leagues.iter() {
            let html = self.render_overall(category, league).await;
            self.write_board(category, "samlet", &html);
        }
    }

    fn write_board(&self, category: &str, race: &str, html: &str) {
        let file_name = format!("{}_{}.html", category.to_lowercase(), race.to_lowercase());
        let path = self.output_dir.join(file_name);
        if let Err(err) = std::fs::create_dir_all(&self.output_dir) {
            log::error!("failed to create {}: {}", self.output_dir.display(), err);
            return;
        }
        if let Err(err) = std::fs::write(&path, html) {
            log::error!("failed to write {}: {}", path.display(), err);
        }
    }
}
