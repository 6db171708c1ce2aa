use serde::Serialize;

use crate::board::{capitalize, segment_label, Board, DASH};
use crate::ranking::{
    apply_finish_bonus, points_ranking, segment_points, sort_by_segment_points, total_ranking,
};
use crate::results::RaceSnapshot;

/// Which column a points board is ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentChoice {
    /// All sprint columns plus the total, ranked by total.
    All,

    /// Only the total column.
    Total,

    /// A single sprint column, ranked by that column.
    Segment(usize),
}

/// Ranking of a points race: sprint points per segment, with the
/// finish bonus folded into the last sprint's column.
///
/// The interactive page ranks by the total derived from the segments
/// and shows a total of 0 as 0; the big screen ranks by the upstream
/// pre-aggregated total (finish points breaking ties) and shows 0 as
/// `-`. Both call-site policies are kept as they are.
#[derive(Serialize, Debug)]
pub struct PointsBoard {
    pub title: String,
    pub category: String,
    pub race: String,

    /// Sprint column headers, f.e. `Spurt [2]`; empty when a single
    /// column is selected.
    pub segments: Vec<String>,

    /// Header of the single selected column, if any.
    pub selected: Option<String>,

    pub with_total: bool,

    pub rows: Vec<PointsRow>,
}

#[derive(Serialize, Debug)]
pub struct PointsRow {
    pub pos: usize,
    pub name: String,
    pub splits: Vec<String>,
    pub total: String,
    pub league_points: String,
}

impl PointsBoard {
    /// The interactive points race page, ranked per `choice`.
    pub fn from_snapshot(
        title: &str,
        category: &str,
        race: &str,
        snapshot: &RaceSnapshot,
        choice: SegmentChoice,
    ) -> PointsBoard {
        let segments = snapshot.segments();
        let mut ranking = points_ranking(segments, snapshot.racers());
        if let SegmentChoice::Segment(idx) = choice {
            sort_by_segment_points(&mut ranking, idx);
        }

        let rows = ranking
            .into_iter()
            .map(|rank| PointsRow {
                pos: rank.pos,
                name: rank.name,
                splits: match choice {
                    SegmentChoice::All => rank.splits.iter().map(|split| fmt_split(*split)).collect(),
                    SegmentChoice::Total => vec![],
                    SegmentChoice::Segment(idx) => {
                        vec![fmt_split(rank.splits.get(idx).copied().flatten())]
                    }
                },
                total: rank.total.to_string(),
                league_points: DASH.to_string(),
            })
            .collect();

        PointsBoard {
            title: title.to_string(),
            category: capitalize(category),
            race: race.to_string(),
            segments: match choice {
                SegmentChoice::All => segments
                    .iter()
                    .map(|seg| segment_label(&seg.name, seg.repeat))
                    .collect(),
                _ => vec![],
            },
            selected: match choice {
                SegmentChoice::Segment(idx) => segments
                    .get(idx)
                    .map(|seg| segment_label(&seg.name, seg.repeat)),
                _ => None,
            },
            with_total: !matches!(choice, SegmentChoice::Segment(_)),
            rows,
        }
    }

    /// The big-screen heat board: ranked by the upstream total with
    /// finish points breaking ties; a total of 0 shows as `-`.
    pub fn for_big_screen(
        title: &str,
        category: &str,
        race: &str,
        snapshot: &RaceSnapshot,
    ) -> PointsBoard {
        let segments = snapshot.segments();
        let mut splits = segment_points(segments);
        apply_finish_bonus(&mut splits, snapshot.racers());

        let rows = total_ranking(snapshot.racers())
            .into_iter()
            .map(|rank| PointsRow {
                pos: rank.pos,
                splits: (0..segments.len())
                    .map(|idx| {
                        fmt_split(
                            splits
                                .get(&rank.athlete_id)
                                .and_then(|row| row.splits[idx]),
                        )
                    })
                    .collect(),
                name: rank.name,
                // A zero total is indistinguishable from "no recorded
                // result" on this screen.
                total: match rank.point_total {
                    Some(total) if total > 0 => total.to_string(),
                    _ => DASH.to_string(),
                },
                league_points: rank
                    .league_points
                    .map(|points| points.to_string())
                    .unwrap_or_else(|| DASH.to_string()),
            })
            .collect();

        PointsBoard {
            title: title.to_string(),
            category: capitalize(category),
            race: race.to_string(),
            segments: segments
                .iter()
                .map(|seg| format!("Spurt {}", seg.repeat))
                .collect(),
            selected: None,
            with_total: true,
            rows,
        }
    }
}

fn fmt_split(split: Option<i64>) -> String {
    match split {
        Some(points) => points.to_string(),
        None => DASH.to_string(),
    }
}

impl Board for PointsBoard {
    const FILE: &'static str = "points_race.html.j2";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::results::{RacerScore, SegmentEntry, SegmentScore};

    fn snapshot() -> RaceSnapshot {
        let entry = |athlete_id, name: &str, points| SegmentEntry {
            athlete_id,
            name: name.to_string(),
            points: Some(points),
            ..Default::default()
        };
        RaceSnapshot {
            racer_scores: Some(vec![
                RacerScore {
                    athlete_id: 1,
                    name: "A".to_string(),
                    fin_points: Some(4),
                    point_total: Some(12),
                    league_points: Some(20),
                    ..Default::default()
                },
                RacerScore {
                    athlete_id: 2,
                    name: "B".to_string(),
                    point_total: Some(0),
                    ..Default::default()
                },
            ]),
            segment_scores: Some(vec![
                SegmentScore {
                    name: "Spurt".to_string(),
                    repeat: 1,
                    fal: vec![entry(1, "A", 3), entry(2, "B", 5)],
                    fts: vec![],
                },
                SegmentScore {
                    name: "Spurt".to_string(),
                    repeat: 2,
                    fal: vec![entry(1, "A", 5)],
                    fts: vec![],
                },
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_interactive_derived_totals() {
        let board =
            PointsBoard::from_snapshot("DM", "herrer", "Point", &snapshot(), SegmentChoice::All);
        // A: 3 + (5 + 4 finish bonus) = 12; B: 5.
        assert_eq!("A", board.rows[0].name);
        assert_eq!("12", board.rows[0].total);
        assert_eq!(vec!["3".to_string(), "9".to_string()], board.rows[0].splits);
        assert_eq!("5", board.rows[1].total);
        assert_eq!(vec!["5".to_string(), "-".to_string()], board.rows[1].splits);
    }

    #[test]
    fn test_interactive_segment_selection() {
        let board = PointsBoard::from_snapshot(
            "DM",
            "herrer",
            "Point",
            &snapshot(),
            SegmentChoice::Segment(0),
        );
        // Ranked by the first sprint: B (5) over A (3).
        assert_eq!("B", board.rows[0].name);
        assert_eq!(vec!["5".to_string()], board.rows[0].splits);
        assert_eq!(Some("Spurt [1]".to_string()), board.selected);
    }

    #[test]
    fn test_big_screen_zero_total_shows_dash() {
        let board = PointsBoard::for_big_screen("DM", "herrer", "Heat 2", &snapshot());
        assert_eq!("A", board.rows[0].name);
        assert_eq!("12", board.rows[0].total);
        assert_eq!("20", board.rows[0].league_points);
        assert_eq!("B", board.rows[1].name);
        assert_eq!("-", board.rows[1].total);
        assert_eq!("-", board.rows[1].league_points);
    }

    #[test]
    fn test_render() {
        let board = PointsBoard::for_big_screen("DM", "herrer", "Heat 2", &snapshot());
        let html = board.render();
        assert!(html.contains("Spurt 1"));
        assert!(html.contains("Herrer"));
    }
}
