use std::collections::BTreeSet;

use itertools::Itertools;
use log::debug;

use stintview::{
    ChartOptions, Derivation, LapFilter, SessionData, SessionRequest, derive,
    summary::{WeatherSummary, weather_summary},
};

/// What one successful extraction produced. Never mutated after creation.
#[derive(Clone, Debug)]
pub(crate) struct SessionSnapshot {
    pub(crate) request: SessionRequest,
    pub(crate) session: SessionData,
    /// Drivers with at least one timed lap, sorted
    pub(crate) available_drivers: Vec<String>,
    pub(crate) max_lap: u32,
    pub(crate) weather: Option<WeatherSummary>,
}

impl SessionSnapshot {
    pub(crate) fn new(request: SessionRequest, session: SessionData) -> Self {
        let available_drivers = session
            .laps
            .iter()
            .filter(|l| l.valid_lap_time().is_some())
            .map(|l| l.driver.clone())
            .unique()
            .sorted()
            .collect();
        let max_lap = session
            .laps
            .iter()
            .filter(|l| l.valid_lap_time().is_some())
            .map(|l| l.lap_number)
            .max()
            .unwrap_or(0);
        let weather = weather_summary(&session.weather);
        Self {
            request,
            session,
            available_drivers,
            max_lap,
            weather,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ViewFilter {
    pub(crate) selected_drivers: BTreeSet<String>,
    pub(crate) first_lap: u32,
    pub(crate) last_lap: u32,
}

impl ViewFilter {
    fn covering(snapshot: &SessionSnapshot) -> Self {
        Self {
            selected_drivers: snapshot.available_drivers.iter().cloned().collect(),
            first_lap: 1,
            last_lap: snapshot.max_lap.max(1),
        }
    }

    fn lap_filter(&self) -> LapFilter {
        LapFilter::all()
            .with_drivers(self.selected_drivers.iter().cloned())
            .with_lap_range(self.first_lap, self.last_lap)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Notice {
    Error(String),
    Info(String),
}

/// Session-scoped dashboard state.
///
/// Created empty when the app starts. `replace_snapshot` swaps in the result of
/// a successful extraction wholesale; afterwards only the view filter changes,
/// and the derivation is rebuilt from the snapshot's laps.
#[derive(Default)]
pub(crate) struct DashboardState {
    snapshot: Option<SessionSnapshot>,
    filter: Option<ViewFilter>,
    derivation: Derivation,
    error: Option<String>,
}

impl DashboardState {
    pub(crate) fn snapshot(&self) -> Option<&SessionSnapshot> {
        self.snapshot.as_ref()
    }

    pub(crate) fn derivation(&self) -> &Derivation {
        &self.derivation
    }

    pub(crate) fn filter(&self) -> Option<&ViewFilter> {
        self.filter.as_ref()
    }

    pub(crate) fn replace_snapshot(&mut self, snapshot: SessionSnapshot) {
        let filter = ViewFilter::covering(&snapshot);
        self.derivation = derive(&snapshot.session.laps, &filter.lap_filter());
        self.filter = Some(filter);
        self.snapshot = Some(snapshot);
        self.error = None;
    }

    /// Records a failed extraction. The previous snapshot stays on screen.
    pub(crate) fn extraction_failed(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Applies a new view filter, re-deriving only when it changed.
    pub(crate) fn set_filter(&mut self, filter: ViewFilter) {
        if self.filter.as_ref() == Some(&filter) {
            return;
        }
        if let Some(snapshot) = &self.snapshot {
            self.derivation = derive(&snapshot.session.laps, &filter.lap_filter());
            debug!(
                "Re-derived {} stints for {} drivers, laps {}-{}",
                self.derivation.stints.len(),
                filter.selected_drivers.len(),
                filter.first_lap,
                filter.last_lap
            );
            self.filter = Some(filter);
        }
    }

    pub(crate) fn notices(&self, options: &ChartOptions) -> Vec<Notice> {
        let mut notices = Vec::new();
        if let Some(error) = &self.error {
            notices.push(Notice::Error(error.clone()));
        }
        let Some(snapshot) = &self.snapshot else {
            return notices;
        };
        if self.derivation.stints.is_empty() {
            notices.push(Notice::Info(
                "No laps with valid timing in the current selection".to_string(),
            ));
        } else if options.show_pit_stops && self.derivation.pit_events.is_empty() {
            notices.push(Notice::Info("No pit stops in the current selection".to_string()));
        }
        if snapshot.weather.is_none() {
            notices.push(Notice::Info("No weather data for this session".to_string()));
        }
        notices
    }
}
