use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::config::{LEAGUE_HEAT_KEYS, NB_LEAGUE_HEATS};
use crate::ranking::{league_standings, LeagueStanding};
use crate::results::RaceSnapshot;

/// Shared component that combines one category's league heats into
/// the overall standings.
#[async_trait]
pub trait LiveLeague: Send + Sync {
    /// While holding this guard, the league state is read-only.
    async fn lock(&self) -> RwLockReadGuard<'_, LeagueState>;

    async fn standings(&self) -> Vec<LeagueStanding> {
        self.lock().await.standings()
    }
}

pub struct LeagueState {
    /// One slot per league heat, in heat order. A slot stays `None`
    /// until a result arrives for that heat; an absent heat simply
    /// never fills its slot.
    pub heats: Vec<Option<RaceSnapshot>>,
}

impl LeagueState {
    pub fn standings(&self) -> Vec<LeagueStanding> {
        let heats: Vec<Option<&RaceSnapshot>> =
            self.heats.iter().map(|heat| heat.as_ref()).collect();
        league_standings(&heats)
    }
}

#[derive(Clone)]
pub struct LeagueController {
    /// The event id bound to each heat slot, where the event map has
    /// one.
    event_ids: Vec<Option<String>>,
    state: Arc<RwLock<LeagueState>>,
}

impl LeagueController {
    /// `event_id_for_heat` resolves a league heat key to the event id
    /// it is bound to, typically via the event map.
    pub fn init<F>(event_id_for_heat: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let event_ids = LEAGUE_HEAT_KEYS
            .iter()
            .map(|key| event_id_for_heat(key))
            .collect();
        LeagueController {
            event_ids,
            state: Arc::new(RwLock::new(LeagueState {
                heats: vec![None; NB_LEAGUE_HEATS],
            })),
        }
    }

    /// True when any league heat is bound to this event id.
    pub fn contains(&self, event_id: &str) -> bool {
        self.event_ids
            .iter()
            .any(|id| id.as_deref() == Some(event_id))
    }

    /// Stores `data` in every heat slot bound to this event id.
    /// Returns `false` when no slot matched.
    pub async fn set_heat(&self, event_id: &str, data: Option<RaceSnapshot>) -> bool {
        if !self.contains(event_id) {
            return false;
        }
        let mut state = self.state.write().await;
        for (idx, id) in self.event_ids.iter().enumerate() {
            if id.as_deref() == Some(event_id) {
                state.heats[idx] = data.clone();
            }
        }
        true
    }
}

#[async_trait]
impl LiveLeague for LeagueController {
    async fn lock(&self) -> RwLockReadGuard<'_, LeagueState> {
        self.state.read().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ranking::LeagueTotal;
    use crate::results::RacerScore;

    fn snapshot_with(points: i64) -> RaceSnapshot {
        let mut snapshot = RaceSnapshot::default();
        snapshot.racer_scores = Some(vec![RacerScore {
            athlete_id: 1,
            name: "ann".to_string(),
            league_points: Some(points),
            ..Default::default()
        }]);
        snapshot
    }

    #[tokio::test]
    async fn test_heats_fill_their_slots() {
        let league = LeagueController::init(|key| match key {
            "heat1" => Some("e1".to_string()),
            "heat2" => Some("e2".to_string()),
            _ => None,
        });

        assert!(league.contains("e1"));
        assert!(!league.contains("e9"));
        assert!(!league.set_heat("e9", Some(snapshot_with(1))).await);

        assert!(league.set_heat("e1", Some(snapshot_with(10))).await);
        assert!(league.set_heat("e2", Some(snapshot_with(6))).await);

        let standings = league.standings().await;
        assert_eq!(1, standings.len());
        assert_eq!(vec![10, 6, 0], standings[0].heat_points);
        assert_eq!(2, standings[0].races_present);
        assert_eq!(LeagueTotal::Dnf, standings[0].total);
    }

    #[tokio::test]
    async fn test_unbound_heat_stays_empty() {
        let league = LeagueController::init(|_| None);
        assert!(!league.set_heat("e1", Some(snapshot_with(1))).await);
        assert!(league.standings().await.is_empty());
    }
}
