use std::cmp::{Ordering, Reverse};

use indexmap::IndexMap;

use crate::results::{RaceSnapshot, RacerScore, SegmentEntry, SegmentScore};
use crate::time::try_parse_time;

/// Stable sort shared by every leaderboard.
///
/// Rows are ordered ascending by the extracted key (wrap values in
/// `Reverse` for descending, use tuples for tie-breaks). Rows without
/// a key always end up last regardless of direction, keeping their
/// input order among themselves.
pub fn sort_ranked<T, K, F>(rows: &mut [T], key: F)
where
    K: Ord,
    F: Fn(&T) -> Option<K>,
{
    rows.sort_by(|a, b| match (key(a), key(b)) {
        (Some(ka), Some(kb)) => ka.cmp(&kb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Truncate a ranking to its top `n` rows. Kept separate from the
/// ranking functions: how many rows fit on screen is a display policy,
/// not part of the ranking itself.
pub fn top<T>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    rows.truncate(n);
    rows
}

/// One row of a time-ranked leaderboard.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRank {
    pub pos: usize,
    pub athlete_id: i64,
    pub name: String,

    /// Finish time in milliseconds, or `None` if unknown.
    pub millis: Option<u64>,

    /// Gap to the leader. `None` for the leader itself, and for rows
    /// whose time (or the leader's) is unknown.
    pub gap_millis: Option<u64>,

    pub league_points: Option<i64>,
}

/// Rank a heat by elapsed time, ascending, fastest first.
///
/// The numeric time is preferred when present; otherwise the display
/// string is parsed. Athletes whose time is missing or malformed sort
/// strictly last, in their input order — a malformed time is logged
/// but never treated as a zero-duration run.
pub fn elapsed_ranking(scores: &[RacerScore]) -> Vec<TimedRank> {
    let mut rows: Vec<TimedRank> = scores
        .iter()
        .map(|score| TimedRank {
            pos: 0,
            athlete_id: score.athlete_id,
            name: score.name.clone(),
            millis: finish_millis(score),
            gap_millis: None,
            league_points: score.league_points,
        })
        .collect();

    sort_ranked(&mut rows, |row| row.millis);

    let leader_millis = rows.first().and_then(|row| row.millis);
    for (idx, row) in rows.iter_mut().enumerate() {
        row.pos = idx + 1;
        if idx > 0 {
            row.gap_millis = match (leader_millis, row.millis) {
                (Some(leader), Some(own)) => Some(own.saturating_sub(leader)),
                _ => None,
            };
        }
    }
    rows
}

fn finish_millis(score: &RacerScore) -> Option<u64> {
    if score.duration_ms.is_some() {
        return score.duration_ms;
    }
    let text = score.duration_time.as_deref()?;
    let parsed = try_parse_time(text);
    if parsed.is_none() {
        log::warn!(
            "unparseable finish time '{}' for athlete {}",
            text,
            score.athlete_id
        );
    }
    parsed
}

/// Per-athlete point contributions, one slot per segment in segment
/// order. `None` means the athlete had no entry in that segment, which
/// counts as 0 toward the total but renders differently.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRow {
    pub athlete_id: i64,
    pub name: String,
    pub splits: Vec<Option<i64>>,
}

impl SplitRow {
    /// Derived point total: missing entries contribute 0.
    pub fn total(&self) -> i64 {
        self.splits.iter().flatten().sum()
    }
}

/// Pure fold of the ordered segment list into per-athlete point slots,
/// keyed by athlete id in order of first appearance.
pub fn segment_points(segments: &[SegmentScore]) -> IndexMap<i64, SplitRow> {
    let mut rows = IndexMap::new();
    for (idx, segment) in segments.iter().enumerate() {
        for entry in &segment.fal {
            let row = rows
                .entry(entry.athlete_id)
                .or_insert_with(|| SplitRow {
                    athlete_id: entry.athlete_id,
                    name: entry.name.clone(),
                    splits: vec![None; segments.len()],
                });
            row.splits[idx] = entry.points;
        }
    }
    rows
}

/// Merge each athlete's finish points into the value of the *last*
/// segment slot. The finish bonus is not a category of its own; it is
/// displayed as part of the final sprint's column.
///
/// Only athletes already present in the fold receive the bonus, as a
/// finish bonus without any segment entry has nowhere to land.
pub fn apply_finish_bonus(rows: &mut IndexMap<i64, SplitRow>, scores: &[RacerScore]) {
    for score in scores {
        let row = match rows.get_mut(&score.athlete_id) {
            Some(row) => row,
            None => continue,
        };
        let last = match row.splits.len().checked_sub(1) {
            Some(last) => last,
            None => continue,
        };
        let bonus = score.fin_points.unwrap_or(0);
        row.splits[last] = Some(row.splits[last].unwrap_or(0) + bonus);
    }
}

/// One row of a points-ranked leaderboard with its split columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsRank {
    pub pos: usize,
    pub athlete_id: i64,
    pub name: String,
    pub splits: Vec<Option<i64>>,
    pub total: i64,
}

/// Rank a points race by point total derived from its segments,
/// descending, finish bonus included in the last segment slot.
///
/// Ties keep the order of first appearance in the segment list, which
/// is deterministic for any given snapshot.
pub fn points_ranking(segments: &[SegmentScore], scores: &[RacerScore]) -> Vec<PointsRank> {
    let mut splits = segment_points(segments);
    apply_finish_bonus(&mut splits, scores);

    let mut rows: Vec<PointsRank> = splits
        .into_iter()
        .map(|(athlete_id, row)| PointsRank {
            pos: 0,
            athlete_id,
            name: row.name.clone(),
            total: row.total(),
            splits: row.splits,
        })
        .collect();

    sort_ranked(&mut rows, |row| Some(Reverse(row.total)));
    for (idx, row) in rows.iter_mut().enumerate() {
        row.pos = idx + 1;
    }
    rows
}

/// Re-rank a points leaderboard by a single segment column,
/// descending. Athletes without an entry in that segment count as 0,
/// as on the selection pages upstream.
pub fn sort_by_segment_points(rows: &mut [PointsRank], segment_idx: usize) {
    sort_ranked(rows, |row| {
        Some(Reverse(
            row.splits.get(segment_idx).copied().flatten().unwrap_or(0),
        ))
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.pos = idx + 1;
    }
}

/// One row of a leaderboard ranked by pre-aggregated totals.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalRank {
    pub pos: usize,
    pub athlete_id: i64,
    pub name: String,

    /// The total as supplied upstream. Absent totals rank as 0 but
    /// keep their absence for display.
    pub point_total: Option<i64>,

    pub fin_points: Option<i64>,
    pub league_points: Option<i64>,
}

/// Rank a heat by its pre-aggregated point total, descending. Equal
/// totals are broken by descending finish points; an athlete with
/// total 0 and one with no recorded total both rank as 0.
pub fn total_ranking(scores: &[RacerScore]) -> Vec<TotalRank> {
    let mut rows: Vec<TotalRank> = scores
        .iter()
        .map(|score| TotalRank {
            pos: 0,
            athlete_id: score.athlete_id,
            name: score.name.clone(),
            point_total: score.point_total,
            fin_points: score.fin_points,
            league_points: score.league_points,
        })
        .collect();

    sort_ranked(&mut rows, |row| {
        Some((
            Reverse(row.point_total.unwrap_or(0)),
            Reverse(row.fin_points.unwrap_or(0)),
        ))
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.pos = idx + 1;
    }
    rows
}

/// Per-athlete segment display times, one slot per segment in segment
/// order; the split-time analog of `segment_points`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSplits {
    pub athlete_id: i64,
    pub name: String,
    pub splits: Vec<Option<String>>,
}

pub fn segment_times(segments: &[SegmentScore]) -> IndexMap<i64, TimeSplits> {
    let mut rows = IndexMap::new();
    for (idx, segment) in segments.iter().enumerate() {
        for entry in &segment.fal {
            let row = rows
                .entry(entry.athlete_id)
                .or_insert_with(|| TimeSplits {
                    athlete_id: entry.athlete_id,
                    name: entry.name.clone(),
                    splits: vec![None; segments.len()],
                });
            row.splits[idx] = entry.event_time_display.clone();
        }
    }
    rows
}

/// Rank the entries of a single segment by points, descending.
/// Entries without points sort as 0, keeping their upstream order.
pub fn segment_entry_ranking(segment: &SegmentScore) -> Vec<SegmentEntry> {
    let mut entries = segment.fal.clone();
    sort_ranked(&mut entries, |entry| {
        Some(Reverse(entry.points.unwrap_or(0)))
    });
    entries
}

/// The cross-heat result of one athlete: a numeric sum, or the
/// did-not-finish sentinel for athletes missing from at least one heat
/// of the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueTotal {
    Points(i64),
    Dnf,
}

/// One row of the overall standings.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueStanding {
    pub pos: usize,
    pub athlete_id: i64,
    pub name: String,

    /// One league-points slot per heat of the set, 0 where the
    /// athlete was absent or the heat has no data yet.
    pub heat_points: Vec<i64>,

    /// In how many heats of the set this athlete has a record.
    pub races_present: usize,

    pub total: LeagueTotal,
}

/// Aggregate league points across an ordered, fixed set of heats.
///
/// Each slot of `heats` is that heat's latest snapshot, or `None`
/// while it has no data (not yet scored, subscription torn down, or
/// simply absent — all treated identically). The computation is a pure
/// fold over the input: it retains nothing between calls, so
/// re-running it on progressively more complete input can only grow
/// an athlete's presence counter.
///
/// An athlete missing from at least one heat totals `Dnf` no matter
/// how many points they took in the heats they did attend. An athlete
/// present in every heat with 0 points everywhere totals `Points(0)`.
///
/// Sort order: every non-DNF athlete before every DNF athlete; among
/// non-DNF, descending by total, ties broken by descending points in
/// the last heat of the set.
pub fn league_standings(heats: &[Option<&RaceSnapshot>]) -> Vec<LeagueStanding> {
    let nb_heats = heats.len();
    let mut rows: IndexMap<i64, LeagueStanding> = IndexMap::new();

    for (idx, heat) in heats.iter().enumerate() {
        let snapshot = match heat {
            Some(snapshot) => snapshot,
            None => continue,
        };
        for racer in snapshot.racers() {
            let row = rows
                .entry(racer.athlete_id)
                .or_insert_with(|| LeagueStanding {
                    pos: 0,
                    athlete_id: racer.athlete_id,
                    name: racer.name.clone(),
                    heat_points: vec![0; nb_heats],
                    races_present: 0,
                    total: LeagueTotal::Points(0),
                });
            row.heat_points[idx] = racer.league_points.unwrap_or(0);
            row.races_present += 1;
        }
    }

    let mut rows: Vec<LeagueStanding> = rows
        .into_iter()
        .map(|(_, mut row)| {
            row.total = if row.races_present < nb_heats {
                LeagueTotal::Dnf
            } else {
                LeagueTotal::Points(row.heat_points.iter().sum())
            };
            row
        })
        .collect();

    sort_ranked(&mut rows, |row| {
        let last_heat = row.heat_points.last().copied().unwrap_or(0);
        match row.total {
            LeagueTotal::Points(total) => Some((0u8, Reverse(total), Reverse(last_heat))),
            // Constant key: DNF rows stay in input order behind the rest.
            LeagueTotal::Dnf => Some((1u8, Reverse(0), Reverse(0))),
        }
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.pos = idx + 1;
    }
    rows
}
