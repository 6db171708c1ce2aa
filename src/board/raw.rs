use serde::Serialize;

use crate::board::{Board, DASH};
use crate::ranking::total_ranking;
use crate::results::{RaceSnapshot, RacerScore};

/// The unstyled per-event view of racer scores with their named point
/// sub-totals, ranked by the pre-aggregated total.
#[derive(Serialize, Debug)]
pub struct RawScoresBoard {
    pub title: String,
    pub event_id: String,
    pub timestamp: Option<String>,
    pub rows: Vec<RawScoresRow>,
}

#[derive(Serialize, Debug)]
pub struct RawScoresRow {
    pub pos: usize,
    pub name: String,
    pub fal: i64,
    pub fts: i64,
    pub fin: String,
    pub total: String,
}

impl RawScoresBoard {
    pub fn from_snapshot(title: &str, event_id: &str, snapshot: &RaceSnapshot) -> RawScoresBoard {
        let by_id = |athlete_id: i64| -> Option<&RacerScore> {
            snapshot
                .racers()
                .iter()
                .find(|score| score.athlete_id == athlete_id)
        };

        let rows = total_ranking(snapshot.racers())
            .into_iter()
            .map(|rank| {
                let score = by_id(rank.athlete_id);
                RawScoresRow {
                    pos: rank.pos,
                    name: rank.name,
                    fal: score.map(|s| s.fal_point_total).unwrap_or(0),
                    fts: score.map(|s| s.fts_point_total).unwrap_or(0),
                    fin: rank
                        .fin_points
                        .map(|points| points.to_string())
                        .unwrap_or_else(|| DASH.to_string()),
                    total: rank
                        .point_total
                        .map(|total| total.to_string())
                        .unwrap_or_else(|| DASH.to_string()),
                }
            })
            .collect();

        RawScoresBoard {
            title: title.to_string(),
            event_id: event_id.to_string(),
            timestamp: snapshot.timestamp.clone(),
            rows,
        }
    }
}

impl Board for RawScoresBoard {
    const FILE: &'static str = "raw_scores.html.j2";
}
