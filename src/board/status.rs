use serde::Serialize;

use crate::board::Board;

/// A message page for every state that has no result table to show.
/// Each condition keeps its own heading and wording.
#[derive(Serialize, Debug)]
pub struct StatusBoard {
    pub title: String,
    pub heading: String,
    pub message: String,
}

impl StatusBoard {
    /// The (category, race) pair has no entry in the event map.
    pub fn invalid_route(title: &str, category: &str, race: &str) -> StatusBoard {
        StatusBoard {
            title: title.to_string(),
            heading: "Invalid Route".to_string(),
            message: format!(
                "No event registered for category '{}' and race '{}'.",
                category, race
            ),
        }
    }

    /// Waiting for the first answer from the store.
    pub fn loading(title: &str, event_id: &str) -> StatusBoard {
        StatusBoard {
            title: title.to_string(),
            heading: "Loading".to_string(),
            message: format!("Loading data for event {}...", event_id),
        }
    }

    /// The store answered, but holds nothing for this event yet.
    pub fn no_results(title: &str) -> StatusBoard {
        StatusBoard {
            title: title.to_string(),
            heading: "No results".to_string(),
            message: "No results. Stay tuned!".to_string(),
        }
    }

    /// The store could not be reached, or sent a payload we cannot
    /// read. Distinct from "no results yet".
    pub fn fetch_failed(title: &str, event_id: &str) -> StatusBoard {
        StatusBoard {
            title: title.to_string(),
            heading: "Error".to_string(),
            message: format!("Failed to load results for event {}.", event_id),
        }
    }
}

impl Board for StatusBoard {
    const FILE: &'static str = "status.html.j2";
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_states_are_distinguishable() {
        let boards = vec![
            StatusBoard::invalid_route("DM", "herrer", "heat9"),
            StatusBoard::loading("DM", "ev-1"),
            StatusBoard::no_results("DM"),
            StatusBoard::fetch_failed("DM", "ev-1"),
        ];
        let headings: Vec<&str> = boards.iter().map(|b| b.heading.as_str()).collect();
        let mut unique = headings.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(headings.len(), unique.len());
    }

    #[test]
    fn test_render() {
        let html = StatusBoard::invalid_route("DM", "herrer", "heat9").render();
        assert!(html.contains("Invalid Route"));
        assert!(html.contains("herrer"));
    }
}
