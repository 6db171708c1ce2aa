use serde::Serialize;

use crate::board::{segment_label, Board, DASH};
use crate::ranking::segment_entry_ranking;
use crate::results::{RaceSnapshot, SegmentScore};

/// A single segment's breakdown, ranked by points. "Latest" always
/// means the last segment of the snapshot's ordered list.
#[derive(Serialize, Debug)]
pub struct SegmentBoard {
    pub title: String,
    pub event_id: String,
    pub segment: String,
    pub rows: Vec<SegmentRow>,
}

#[derive(Serialize, Debug)]
pub struct SegmentRow {
    pub pos: usize,
    pub name: String,
    pub points: String,
    pub time: String,
}

impl SegmentBoard {
    /// The most recently scored segment, or `None` while the snapshot
    /// has no segments yet.
    pub fn latest(title: &str, event_id: &str, snapshot: &RaceSnapshot) -> Option<SegmentBoard> {
        snapshot
            .latest_segment()
            .map(|segment| Self::build(title, event_id, segment))
    }

    /// A segment picked by name, first occurrence wins.
    pub fn by_name(
        title: &str,
        event_id: &str,
        snapshot: &RaceSnapshot,
        name: &str,
    ) -> Option<SegmentBoard> {
        snapshot
            .segment_by_name(name)
            .map(|segment| Self::build(title, event_id, segment))
    }

    fn build(title: &str, event_id: &str, segment: &SegmentScore) -> SegmentBoard {
        let rows = segment_entry_ranking(segment)
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| SegmentRow {
                pos: idx + 1,
                name: entry.name,
                points: entry
                    .points
                    .map(|points| points.to_string())
                    .unwrap_or_else(|| DASH.to_string()),
                time: entry
                    .event_time_display
                    .unwrap_or_else(|| DASH.to_string()),
            })
            .collect();

        SegmentBoard {
            title: title.to_string(),
            event_id: event_id.to_string(),
            segment: segment_label(&segment.name, segment.repeat),
            rows,
        }
    }
}

impl Board for SegmentBoard {
    const FILE: &'static str = "segment.html.j2";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::results::SegmentEntry;

    fn snapshot() -> RaceSnapshot {
        let entry = |athlete_id, name: &str, points| SegmentEntry {
            athlete_id,
            name: name.to_string(),
            points: Some(points),
            ..Default::default()
        };
        let segment = |repeat, fal| SegmentScore {
            name: "Spurt".to_string(),
            repeat,
            fal,
            fts: vec![],
        };
        RaceSnapshot {
            segment_scores: Some(vec![
                segment(1, vec![entry(1, "A", 5)]),
                segment(2, vec![entry(1, "A", 2), entry(2, "B", 5)]),
            ]),
            ..Default::default()
        }
    }

    #[test]
    fn test_latest_is_last_segment() {
        let board = SegmentBoard::latest("DM", "ev-1", &snapshot()).unwrap();
        assert_eq!("Spurt [2]", board.segment);
        assert_eq!("B", board.rows[0].name);
        assert_eq!("5", board.rows[0].points);
    }

    #[test]
    fn test_by_name_picks_first_occurrence() {
        let board = SegmentBoard::by_name("DM", "ev-1", &snapshot(), "Spurt").unwrap();
        assert_eq!("Spurt [1]", board.segment);
    }

    #[test]
    fn test_no_segments_yet() {
        assert!(SegmentBoard::latest("DM", "ev-1", &Default::default()).is_none());
    }
}
