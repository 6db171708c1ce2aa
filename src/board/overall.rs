use serde::Serialize;

use crate::board::{capitalize, Board, DASH};
use crate::ranking::{league_standings, LeagueTotal};
use crate::results::RaceSnapshot;

/// The overall standings across the league heats of one category.
///
/// Athletes missing from at least one heat carry the `DNF` marker and
/// rank behind everyone with a full set of heats, no matter how many
/// points they took. An athlete present everywhere with 0 points
/// ranks by that 0, but the total column still shows `-` (the screen
/// does not distinguish a zero total from no result; the DNF marker
/// is reserved for actual non-finishers).
#[derive(Serialize, Debug)]
pub struct OverallBoard {
    pub title: String,
    pub category: String,

    /// One header per league heat, f.e. `Heat 1`.
    pub heats: Vec<String>,

    pub rows: Vec<OverallRow>,
}

#[derive(Serialize, Debug)]
pub struct OverallRow {
    pub pos: usize,
    pub name: String,

    /// One cell per heat; 0 shows as `-`.
    pub heat_points: Vec<String>,

    /// The summed league points, `DNF`, or `-` for a non-DNF zero.
    pub total: String,
}

impl OverallBoard {
    pub fn from_heats(
        title: &str,
        category: &str,
        heats: &[Option<&RaceSnapshot>],
    ) -> OverallBoard {
        let rows = league_standings(heats)
            .into_iter()
            .map(|standing| OverallRow {
                pos: standing.pos,
                name: standing.name,
                heat_points: standing
                    .heat_points
                    .iter()
                    .map(|points| match points {
                        0 => DASH.to_string(),
                        points => points.to_string(),
                    })
                    .collect(),
                total: match standing.total {
                    LeagueTotal::Dnf => "DNF".to_string(),
                    LeagueTotal::Points(total) if total > 0 => total.to_string(),
                    LeagueTotal::Points(_) => DASH.to_string(),
                },
            })
            .collect();

        OverallBoard {
            title: title.to_string(),
            category: capitalize(category),
            heats: (1..=heats.len()).map(|nb| format!("Heat {}", nb)).collect(),
            rows,
        }
    }
}

impl Board for OverallBoard {
    const FILE: &'static str = "overall.html.j2";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::results::RacerScore;

    fn heat(racers: Vec<(i64, &str, i64)>) -> RaceSnapshot {
        RaceSnapshot {
            racer_scores: Some(
                racers
                    .into_iter()
                    .map(|(athlete_id, name, league_points)| RacerScore {
                        athlete_id,
                        name: name.to_string(),
                        league_points: Some(league_points),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn test_dnf_and_zero_display() {
        let heat1 = heat(vec![(1, "A", 10), (2, "B", 0)]);
        let heat2 = heat(vec![(1, "A", 12), (2, "B", 0)]);
        let heat3 = heat(vec![(2, "B", 0)]);
        let board =
            OverallBoard::from_heats("DM", "herrer", &[Some(&heat1), Some(&heat2), Some(&heat3)]);

        // B finished all three heats with 0 points: ranked, shown as '-'.
        assert_eq!("B", board.rows[0].name);
        assert_eq!("-", board.rows[0].total);
        assert_eq!(vec!["-", "-", "-"], board.rows[0].heat_points);

        // A missed heat 3: DNF despite 22 raw points.
        assert_eq!("A", board.rows[1].name);
        assert_eq!("DNF", board.rows[1].total);
        assert_eq!(vec!["10", "12", "-"], board.rows[1].heat_points);
    }

    #[test]
    fn test_pending_heat_columns() {
        let heat1 = heat(vec![(1, "A", 10)]);
        let board = OverallBoard::from_heats("DM", "herrer", &[Some(&heat1), None, None]);
        assert_eq!(vec!["Heat 1", "Heat 2", "Heat 3"], board.heats);
        assert_eq!("DNF", board.rows[0].total);
    }

    #[test]
    fn test_render() {
        let heat1 = heat(vec![(1, "Jens", 10)]);
        let board = OverallBoard::from_heats("DM", "herrer", &[Some(&heat1), None, None]);
        let html = board.render();
        assert!(html.contains("Jens"));
        assert!(html.contains("DNF"));
    }
}
