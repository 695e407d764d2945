// Tyre stint, pit stop and fastest lap derivation from lap records

use std::collections::{BTreeMap, BTreeSet, HashMap};

use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

use crate::session::{Compound, LapRecord};

/// A lap tagged with the stint it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedLap<'a> {
    pub lap: &'a LapRecord,
    /// 1 for the driver's first stint, +1 on every compound change
    pub stint: u32,
}

/// Which laps take part in a derivation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LapFilter {
    drivers: Option<BTreeSet<String>>,
    lap_range: Option<(u32, u32)>,
}

impl LapFilter {
    /// Accepts every lap of every driver.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_drivers<I, S>(mut self, drivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drivers = Some(drivers.into_iter().map(Into::into).collect());
        self
    }

    /// Inclusive lap number range. The bounds are swapped if given in reverse.
    pub fn with_lap_range(mut self, lo: u32, hi: u32) -> Self {
        self.lap_range = Some((lo.min(hi), lo.max(hi)));
        self
    }

    pub fn accepts(&self, lap: &LapRecord) -> bool {
        let driver_selected = self
            .drivers
            .as_ref()
            .is_none_or(|drivers| drivers.contains(&lap.driver));
        let in_range = self
            .lap_range
            .is_none_or(|(lo, hi)| (lo..=hi).contains(&lap.lap_number));
        driver_selected && in_range
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Stint {
    pub driver: String,
    pub stint: u32,
    pub compound: Compound,
    pub start_lap: u32,
    pub end_lap: u32,
    /// Duration of the pit stop made on the stint's last lap, if any
    pub pit_duration_s: Option<f64>,
}

impl Stint {
    pub fn lap_count(&self) -> u32 {
        self.end_lap - self.start_lap + 1
    }

    pub fn contains(&self, lap_number: u32) -> bool {
        (self.start_lap..=self.end_lap).contains(&lap_number)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PitEvent {
    pub driver: String,
    pub lap_number: u32,
    pub compound: Compound,
    /// Pit-out minus pit-in in seconds, absent when pit-in was not recorded
    pub duration_s: Option<f64>,
}

impl PitEvent {
    fn from_lap(lap: &LapRecord) -> Self {
        let duration_s = match (lap.pit_in_time_s, lap.pit_out_time_s) {
            (Some(pit_in), Some(pit_out)) => {
                let duration = pit_out - pit_in;
                if duration.is_finite() && duration >= 0. {
                    Some(duration)
                } else {
                    warn!(
                        "Ignoring pit duration {:.3}s for {} on lap {}",
                        duration, lap.driver, lap.lap_number
                    );
                    None
                }
            }
            _ => None,
        };
        Self {
            driver: lap.driver.clone(),
            lap_number: lap.lap_number,
            compound: lap.compound,
            duration_s,
        }
    }
}

/// Pit stop durations keyed by driver, then lap, built once per derivation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PitLookup {
    durations: HashMap<String, HashMap<u32, Option<f64>>>,
}

impl PitLookup {
    pub fn new(pit_events: &[PitEvent]) -> Self {
        let mut durations: HashMap<String, HashMap<u32, Option<f64>>> = HashMap::new();
        for event in pit_events {
            durations
                .entry(event.driver.clone())
                .or_default()
                .entry(event.lap_number)
                .or_insert(event.duration_s);
        }
        Self { durations }
    }

    /// `None` when there was no pit event on that lap, `Some(None)` when there
    /// was one without a known duration.
    pub fn get(&self, driver: &str, lap_number: u32) -> Option<Option<f64>> {
        self.durations.get(driver)?.get(&lap_number).copied()
    }

    pub fn duration(&self, driver: &str, lap_number: u32) -> Option<f64> {
        self.get(driver, lap_number).flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FastestLap {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time_s: f64,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Derivation {
    pub stints: Vec<Stint>,
    pub pit_events: Vec<PitEvent>,
    #[serde(skip)]
    pub pit_lookup: PitLookup,
    pub fastest_laps: Vec<FastestLap>,
}

impl Derivation {
    pub fn is_empty(&self) -> bool {
        self.stints.is_empty() && self.pit_events.is_empty() && self.fastest_laps.is_empty()
    }

    /// Pit duration at the given lap formatted for display, e.g. "22.40s".
    pub fn pit_info(&self, driver: &str, lap_number: u32) -> Option<String> {
        self.pit_lookup
            .duration(driver, lap_number)
            .map(format_pit_duration)
    }

    /// Distinct drivers that have at least one stint, sorted.
    pub fn drivers(&self) -> Vec<&str> {
        self.stints
            .iter()
            .map(|s| s.driver.as_str())
            .unique()
            .sorted()
            .collect()
    }

    pub fn stints_for<'a>(&'a self, driver: &'a str) -> impl Iterator<Item = &'a Stint> + 'a {
        self.stints.iter().filter(move |s| s.driver == driver)
    }
}

/// Assigns stint indices to every lap, ordered by driver then lap number.
///
/// A driver's first lap always opens a stint, as does every lap whose compound
/// differs from the previous lap's. Laps without a lap time still count here so
/// that a compound change on an untimed in-lap is not lost.
pub fn stint_indices(laps: &[LapRecord]) -> Vec<IndexedLap<'_>> {
    let mut indexed = Vec::with_capacity(laps.len());
    let sorted = laps
        .iter()
        .sorted_by(|a, b| {
            a.driver
                .cmp(&b.driver)
                .then(a.lap_number.cmp(&b.lap_number))
        });

    for (_, driver_laps) in &sorted.chunk_by(|lap| lap.driver.clone()) {
        let mut stint = 0;
        let mut previous: Option<Compound> = None;
        for lap in driver_laps {
            if previous != Some(lap.compound) {
                stint += 1;
            }
            previous = Some(lap.compound);
            indexed.push(IndexedLap { lap, stint });
        }
    }
    indexed
}

/// Derives stints, pit events and fastest laps from the laps accepted by `filter`.
pub fn derive(laps: &[LapRecord], filter: &LapFilter) -> Derivation {
    let timed = stint_indices(laps)
        .into_iter()
        .filter_map(|indexed| {
            indexed
                .lap
                .valid_lap_time()
                .map(|lap_time| (indexed, lap_time))
        })
        .filter(|(indexed, _)| filter.accepts(indexed.lap))
        .collect_vec();

    let pit_events = timed
        .iter()
        .filter(|(indexed, _)| indexed.lap.pit_out_time_s.is_some())
        .map(|(indexed, _)| PitEvent::from_lap(indexed.lap))
        .unique_by(|e| (e.driver.clone(), e.lap_number))
        .collect_vec();
    let pit_lookup = PitLookup::new(&pit_events);

    let mut bounds: BTreeMap<(&str, u32, Compound), (u32, u32)> = BTreeMap::new();
    for (indexed, _) in &timed {
        let lap = indexed.lap;
        bounds
            .entry((lap.driver.as_str(), indexed.stint, lap.compound))
            .and_modify(|(start, end)| {
                *start = (*start).min(lap.lap_number);
                *end = (*end).max(lap.lap_number);
            })
            .or_insert((lap.lap_number, lap.lap_number));
    }
    let stints = bounds
        .into_iter()
        .map(|((driver, stint, compound), (start_lap, end_lap))| Stint {
            driver: driver.to_string(),
            stint,
            compound,
            start_lap,
            end_lap,
            pit_duration_s: pit_lookup.duration(driver, end_lap),
        })
        .collect_vec();

    let fastest_laps = match timed.iter().map(|(_, t)| *t).min_by(f64::total_cmp) {
        Some(min) => timed
            .iter()
            .filter(|(_, t)| *t == min)
            .map(|(indexed, lap_time)| FastestLap {
                driver: indexed.lap.driver.clone(),
                lap_number: indexed.lap.lap_number,
                lap_time_s: *lap_time,
            })
            .collect(),
        None => Vec::new(),
    };

    debug!(
        "Derived {} stints, {} pit events and {} fastest laps from {} laps ({} timed)",
        stints.len(),
        pit_events.len(),
        fastest_laps.len(),
        laps.len(),
        timed.len()
    );

    Derivation {
        stints,
        pit_events,
        pit_lookup,
        fastest_laps,
    }
}

pub fn format_pit_duration(duration_s: f64) -> String {
    format!("{:.2}s", duration_s)
}

/// Formats a lap time as `m:ss.mmm`.
pub fn format_lap_time(lap_time_s: f64) -> String {
    let total_ms = (lap_time_s * 1000.).round().max(0.) as u64;
    format!(
        "{}:{:02}.{:03}",
        total_ms / 60_000,
        (total_ms / 1000) % 60,
        total_ms % 1000
    )
}
