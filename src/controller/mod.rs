pub use facade::Controller;
pub use heat::*;
pub use league::*;

mod facade;
mod heat;
mod league;

/// The lifecycle of one live subscription's data.
///
/// `NoData` is the state before the first fetch; `Loading` while the
/// first answer is pending. The store's first answer moves to `Empty`
/// (nothing stored for the id) or `Ready`; every further snapshot is
/// a full replacement (`Ready -> Ready`, never a partial update).
/// `Failed` is terminal until a fresh fetch is started — the core
/// never retries on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    NoData,
    Loading,
    Empty,
    Ready(T),
    Failed,
}

impl<T> ViewState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// How a race is scored, and with it, which board its results get.
/// Derived from the race key of the event map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceFormat {
    /// Individual start, full table with split times.
    TimeTrial,

    /// Individual start on the big screen: top ranks only.
    TimeTrialBigScreen,

    /// Points race, interactive table with derived totals.
    PointsRace,

    /// Points race on the big screen: upstream totals, 0 as `-`.
    PointsRaceBigScreen,

    /// Line race: split times and finish time.
    LineRace,

    /// Anything unrecognized: the raw score table.
    Raw,
}

impl RaceFormat {
    pub fn from_race_key(race: &str) -> RaceFormat {
        match race.to_lowercase().as_str() {
            "enkeltstart" => RaceFormat::TimeTrial,
            "heat1" | "heat3" => RaceFormat::TimeTrialBigScreen,
            "heat2" => RaceFormat::PointsRaceBigScreen,
            "point" => RaceFormat::PointsRace,
            "linje" => RaceFormat::LineRace,
            _ => RaceFormat::Raw,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_race_formats() {
        assert_eq!(RaceFormat::TimeTrial, RaceFormat::from_race_key("Enkeltstart"));
        assert_eq!(RaceFormat::TimeTrialBigScreen, RaceFormat::from_race_key("heat1"));
        assert_eq!(RaceFormat::PointsRaceBigScreen, RaceFormat::from_race_key("heat2"));
        assert_eq!(RaceFormat::TimeTrialBigScreen, RaceFormat::from_race_key("heat3"));
        assert_eq!(RaceFormat::PointsRace, RaceFormat::from_race_key("point"));
        assert_eq!(RaceFormat::LineRace, RaceFormat::from_race_key("linje"));
        assert_eq!(RaceFormat::Raw, RaceFormat::from_race_key("testheat"));
    }
}
