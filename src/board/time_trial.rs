use serde::Serialize;

use crate::board::{capitalize, segment_label, Board, DASH};
use crate::config::MAX_DISPLAYED_HEAT_RANKS;
use crate::ranking::{elapsed_ranking, segment_times, top};
use crate::results::RaceSnapshot;
use crate::time::fmt_time;

/// Ranking of an individual-start heat, fastest first, athletes
/// without a time at the bottom.
///
/// Two call sites share this board: the interactive page shows every
/// athlete with their split-time columns, while the big screen shows
/// the top 16 without splits.
#[derive(Serialize, Debug)]
pub struct TimeTrialBoard {
    pub title: String,
    pub category: String,
    pub race: String,

    /// Split column headers, f.e. `Mellemtid [1]`; empty on the
    /// big-screen variant.
    pub segments: Vec<String>,

    pub rows: Vec<TimeTrialRow>,
}

#[derive(Serialize, Debug)]
pub struct TimeTrialRow {
    pub pos: usize,
    pub name: String,
    pub splits: Vec<String>,
    pub time: String,

    /// Gap to the leader, f.e. `+ 0:02.500`. The leader's gap is
    /// blank, as is the gap of anyone without a time.
    pub gap: String,

    pub league_points: String,
}

impl TimeTrialBoard {
    /// The full ranking with split-time columns.
    pub fn from_snapshot(
        title: &str,
        category: &str,
        race: &str,
        snapshot: &RaceSnapshot,
    ) -> TimeTrialBoard {
        Self::build(title, category, race, snapshot, true, usize::max_value())
    }

    /// The big-screen variant: top 16, no split columns.
    pub fn for_big_screen(
        title: &str,
        category: &str,
        race: &str,
        snapshot: &RaceSnapshot,
    ) -> TimeTrialBoard {
        Self::build(title, category, race, snapshot, false, MAX_DISPLAYED_HEAT_RANKS)
    }

    fn build(
        title: &str,
        category: &str,
        race: &str,
        snapshot: &RaceSnapshot,
        with_splits: bool,
        max_rows: usize,
    ) -> TimeTrialBoard {
        let segments = snapshot.segments();
        let splits = segment_times(segments);
        let ranking = top(elapsed_ranking(snapshot.racers()), max_rows);

        let rows = ranking
            .into_iter()
            .map(|rank| {
                let athlete_splits = if with_splits {
                    (0..segments.len())
                        .map(|idx| {
                            splits
                                .get(&rank.athlete_id)
                                .and_then(|row| row.splits[idx].clone())
                                .unwrap_or_else(|| DASH.to_string())
                        })
                        .collect()
                } else {
                    vec![]
                };

                TimeTrialRow {
                    pos: rank.pos,
                    name: rank.name.clone(),
                    splits: athlete_splits,
                    time: rank
                        .millis
                        .map(|millis| fmt_time(millis as i64))
                        .unwrap_or_else(|| DASH.to_string()),
                    gap: rank
                        .gap_millis
                        .map(|gap| format!("+ {}", fmt_time(gap as i64)))
                        .unwrap_or_else(|| DASH.to_string()),
                    league_points: rank
                        .league_points
                        .map(|points| points.to_string())
                        .unwrap_or_else(|| DASH.to_string()),
                }
            })
            .collect();

        TimeTrialBoard {
            title: title.to_string(),
            category: capitalize(category),
            race: race.to_string(),
            segments: if with_splits {
                segments
                    .iter()
                    .map(|seg| segment_label(&seg.name, seg.repeat))
                    .collect()
            } else {
                vec![]
            },
            rows,
        }
    }
}

impl Board for TimeTrialBoard {
    const FILE: &'static str = "time_trial.html.j2";
}
