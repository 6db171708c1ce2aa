use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One athlete's line in a heat, as scored upstream.
///
/// Every field except the identifier and name may be absent, depending
/// on the race format: individual starts carry times, points races
/// carry sub-totals, and some payloads carry both.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RacerScore {
    /// Stable across heats for the same athlete, which is what makes
    /// cross-heat standings possible.
    pub athlete_id: i64,

    pub name: String,

    /// Finish time as a display string, f.e. `58:31.537`, or `N/A`.
    pub duration_time: Option<String>,

    /// Finish time in milliseconds. Preferred over `duration_time`
    /// whenever both are present.
    pub duration_ms: Option<u64>,

    /// Intermediate-sprint ("first across line") point sub-total.
    pub fal_point_total: i64,

    /// "First to segment" point sub-total.
    pub fts_point_total: i64,

    /// Points awarded at the finish line only.
    pub fin_points: Option<i64>,

    /// Combined point total, pre-aggregated upstream.
    pub point_total: Option<i64>,

    /// Points awarded for overall placement within this heat,
    /// independent of the raw score. Used for cross-heat standings.
    pub league_points: Option<i64>,

    /// Gap to the leader as formatted upstream. Display-only; the
    /// rankings derive their own gap from the times.
    pub time_difference: Option<String>,

    /// Selects an alternate rendering mode upstream. Tolerated here,
    /// but never interpreted.
    pub position: Option<serde_json::Value>,
}

/// One athlete's entry within a scored segment.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentEntry {
    pub athlete_id: i64,
    pub name: String,
    pub points: Option<i64>,
    pub event_time_display: Option<String>,
    pub elapsed: Option<u64>,
    pub fal_diff: Option<f64>,
    pub fts_diff: Option<f64>,
}

/// A scored sub-portion of a heat, f.e. a sprint lap.
///
/// Segments of the same name can recur; `name` plus `repeat` is the
/// unique key. The segment list of a snapshot is ordered by
/// occurrence, so "latest" always means the last element.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmentScore {
    pub name: String,
    pub repeat: u32,

    /// "First across line" entries, in upstream order.
    pub fal: Vec<SegmentEntry>,

    /// "First to segment" entries, in upstream order.
    pub fts: Vec<SegmentEntry>,
}

impl SegmentScore {
    /// The unique key of this segment within a heat.
    pub fn key(&self) -> (&str, u32) {
        (&self.name, self.repeat)
    }
}

/// A whole-payload snapshot of one heat's results.
///
/// The store pushes these in full on every update; nothing here is a
/// diff. Either list may be absent while the heat has not been scored
/// yet, which is a valid state and not an error.
#[derive(Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RaceSnapshot {
    pub timestamp: Option<String>,
    pub racer_scores: Option<Vec<RacerScore>>,
    pub segment_scores: Option<Vec<SegmentScore>>,
}

impl RaceSnapshot {
    /// The athlete lines of this snapshot, empty while unscored.
    pub fn racers(&self) -> &[RacerScore] {
        self.racer_scores.as_deref().unwrap_or(&[])
    }

    /// The ordered segment list of this snapshot, empty while unscored.
    pub fn segments(&self) -> &[SegmentScore] {
        self.segment_scores.as_deref().unwrap_or(&[])
    }

    /// The most recently scored segment.
    pub fn latest_segment(&self) -> Option<&SegmentScore> {
        self.segments().last()
    }

    /// Find a segment by name, first occurrence wins.
    pub fn segment_by_name(&self, name: &str) -> Option<&SegmentScore> {
        self.segments().iter().find(|seg| seg.name == name)
    }

    /// The snapshot timestamp, when present and RFC 3339.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
