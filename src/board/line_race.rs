use serde::Serialize;

use crate::board::{capitalize, segment_label, Board, DASH};
use crate::ranking::{elapsed_ranking, segment_times, sort_ranked};
use crate::results::RaceSnapshot;
use crate::time::{fmt_time, try_parse_time};

/// Ranking of a line race: split times per intermediate segment, the
/// finish time, and the league points taken in the heat.
///
/// Athletes without a usable finish time (absent or `N/A`) rank last
/// and show neither time nor points.
#[derive(Serialize, Debug)]
pub struct LineBoard {
    pub title: String,
    pub category: String,
    pub race: String,

    /// Split column headers; a single header when one segment is
    /// selected.
    pub segments: Vec<String>,

    /// Whether the finish time and points columns are shown. They are
    /// hidden when the board is ranked by a single segment.
    pub with_finish: bool,

    pub rows: Vec<LineRow>,
}

#[derive(Serialize, Debug)]
pub struct LineRow {
    pub pos: usize,
    pub name: String,
    pub splits: Vec<String>,
    pub time: String,
    pub league_points: String,
}

impl LineBoard {
    /// The full ranking by finish time, with all split columns.
    pub fn from_snapshot(
        title: &str,
        category: &str,
        race: &str,
        snapshot: &RaceSnapshot,
    ) -> LineBoard {
        Self::build(title, category, race, snapshot, None)
    }

    /// Ranked by one intermediate segment's time instead of the
    /// finish time. Athletes without a split in that segment go last.
    pub fn by_segment(
        title: &str,
        category: &str,
        race: &str,
        snapshot: &RaceSnapshot,
        segment_idx: usize,
    ) -> LineBoard {
        Self::build(title, category, race, snapshot, Some(segment_idx))
    }

    fn build(
        title: &str,
        category: &str,
        race: &str,
        snapshot: &RaceSnapshot,
        selected: Option<usize>,
    ) -> LineBoard {
        let segments = snapshot.segments();
        let splits = segment_times(segments);

        let mut ranking = elapsed_ranking(snapshot.racers());
        if let Some(idx) = selected {
            // Re-rank by the chosen split; a missing or malformed
            // split time sorts last, never as a zero-duration run.
            sort_ranked(&mut ranking, |rank| {
                splits
                    .get(&rank.athlete_id)
                    .and_then(|row| row.splits.get(idx).cloned().flatten())
                    .and_then(|text| try_parse_time(&text))
            });
            for (idx, rank) in ranking.iter_mut().enumerate() {
                rank.pos = idx + 1;
            }
        }

        let column_indexes: Vec<usize> = match selected {
            Some(idx) => vec![idx],
            None => (0..segments.len()).collect(),
        };

        let rows = ranking
            .into_iter()
            .map(|rank| {
                let time = rank.millis.map(|millis| fmt_time(millis as i64));
                LineRow {
                    pos: rank.pos,
                    name: rank.name.clone(),
                    splits: column_indexes
                        .iter()
                        .map(|idx| {
                            splits
                                .get(&rank.athlete_id)
                                .and_then(|row| row.splits.get(*idx).cloned().flatten())
                                .unwrap_or_else(|| DASH.to_string())
                        })
                        .collect(),
                    // No finish time, no points: the athlete has not
                    // finished (yet).
                    league_points: match (&time, rank.league_points) {
                        (Some(_), Some(points)) => points.to_string(),
                        _ => DASH.to_string(),
                    },
                    time: time.unwrap_or_else(|| DASH.to_string()),
                }
            })
            .collect();

        LineBoard {
            title: title.to_string(),
            category: capitalize(category),
            race: race.to_string(),
            segments: column_indexes
                .iter()
                .filter_map(|idx| segments.get(*idx))
                .map(|seg| segment_label(&seg.name, seg.repeat))
                .collect(),
            with_finish: selected.is_none(),
            rows,
        }
    }
}

impl Board for LineBoard {
    const FILE: &'static str = "line_race.html.j2";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::results::{RacerScore, SegmentEntry, SegmentScore};

    fn snapshot() -> RaceSnapshot {
        let entry = |athlete_id, name: &str, time: &str| SegmentEntry {
            athlete_id,
            name: name.to_string(),
            event_time_display: Some(time.to_string()),
            ..Default::default()
        };
        let racer = |athlete_id, name: &str, time: &str, points| RacerScore {
            athlete_id,
            name: name.to_string(),
            duration_time: Some(time.to_string()),
            league_points: Some(points),
            ..Default::default()
        };
        RaceSnapshot {
            racer_scores: Some(vec![
                racer(1, "A", "1:02.000", 18),
                racer(2, "B", "1:01.000", 20),
                racer(3, "C", "N/A", 0),
            ]),
            segment_scores: Some(vec![SegmentScore {
                name: "Mellemtid".to_string(),
                repeat: 1,
                fal: vec![entry(2, "B", "0:31.000"), entry(1, "A", "0:30.000")],
                fts: vec![],
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_unfinished_athlete_ranks_last_without_points() {
        let board = LineBoard::from_snapshot("DM", "damer", "Linje", &snapshot());
        let names: Vec<&str> = board.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(vec!["B", "A", "C"], names);
        assert_eq!("-", board.rows[2].time);
        assert_eq!("-", board.rows[2].league_points);
        assert_eq!("20", board.rows[0].league_points);
    }

    #[test]
    fn test_segment_selection_ranks_by_split() {
        let board = LineBoard::by_segment("DM", "damer", "Linje", &snapshot(), 0);
        // A's split (0:30) beats B's (0:31); C has none and goes last.
        let names: Vec<&str> = board.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(vec!["A", "B", "C"], names);
        assert!(!board.with_finish);
        assert_eq!(vec!["0:30.000".to_string()], board.rows[0].splits);
    }

    #[test]
    fn test_render() {
        let board = LineBoard::from_snapshot("DM", "damer", "Linje", &snapshot());
        let html = board.render();
        assert!(html.contains("Mellemtid [1]"));
        assert!(html.contains("1:01.000"));
    }
}
