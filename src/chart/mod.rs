// Turns a derivation into drawing instructions for a chart sink

mod palette;

use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    session::{Compound, SessionData},
    stints::{Derivation, format_lap_time, format_pit_duration},
    summary::safety_car_laps,
};

pub use palette::{Rgb, compound_color};

const SAFETY_CAR_BAND_BEFORE: f64 = 0.5;
const SAFETY_CAR_BAND_AFTER: f64 = 2.5;
const SAFETY_CAR_BAND_OPACITY: f32 = 0.15;

/// Display toggles exposed in the dashboard.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChartOptions {
    pub show_pit_stops: bool,
    pub color_by_compound: bool,
    pub highlight_fastest_lap: bool,
    pub show_safety_car: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            show_pit_stops: true,
            color_by_compound: true,
            highlight_fastest_lap: true,
            show_safety_car: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StintSegment {
    pub row: String,
    pub x_start: f64,
    pub x_end: f64,
    pub compound: Compound,
    pub color: Rgb,
    pub hover: String,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum MarkerKind {
    PitStop,
    FastestLap,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub row: String,
    pub x: f64,
    pub color: Rgb,
    /// Text drawn next to the marker, hover text is always available
    pub label: Option<String>,
    pub hover: String,
}

/// Shaded vertical region spanning all rows.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Band {
    pub x_start: f64,
    pub x_end: f64,
    pub color: Rgb,
    pub opacity: f32,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "type")]
pub enum ChartPrimitive {
    Rows { rows: Vec<String> },
    Segment(StintSegment),
    Marker(Marker),
    Band(Band),
}

/// Receives one drawing instruction per derived record.
pub trait ChartSink {
    /// Category order of the y axis, top row last. Called once before any primitive.
    fn rows(&mut self, rows: &[String]);
    fn segment(&mut self, segment: &StintSegment);
    fn marker(&mut self, marker: &Marker);
    fn band(&mut self, band: &Band);
}

/// Sink that keeps every primitive it receives, in order.
#[derive(Default, Debug)]
pub struct RecordingSink {
    pub primitives: Vec<ChartPrimitive>,
}

impl RecordingSink {
    pub fn segments(&self) -> impl Iterator<Item = &StintSegment> {
        self.primitives.iter().filter_map(|p| match p {
            ChartPrimitive::Segment(s) => Some(s),
            _ => None,
        })
    }

    pub fn markers(&self, kind: MarkerKind) -> impl Iterator<Item = &Marker> {
        self.primitives.iter().filter_map(move |p| match p {
            ChartPrimitive::Marker(m) if m.kind == kind => Some(m),
            _ => None,
        })
    }

    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        self.primitives.iter().filter_map(|p| match p {
            ChartPrimitive::Band(b) => Some(b),
            _ => None,
        })
    }
}

impl ChartSink for RecordingSink {
    fn rows(&mut self, rows: &[String]) {
        self.primitives.push(ChartPrimitive::Rows {
            rows: rows.to_vec(),
        });
    }

    fn segment(&mut self, segment: &StintSegment) {
        self.primitives.push(ChartPrimitive::Segment(segment.clone()));
    }

    fn marker(&mut self, marker: &Marker) {
        self.primitives.push(ChartPrimitive::Marker(marker.clone()));
    }

    fn band(&mut self, band: &Band) {
        self.primitives.push(ChartPrimitive::Band(band.clone()));
    }
}

/// Driver rows sorted by abbreviation in reverse, so the first driver ends up on top.
pub fn row_order(derivation: &Derivation) -> Vec<String> {
    derivation
        .drivers()
        .into_iter()
        .rev()
        .map(str::to_string)
        .collect()
}

pub fn build_chart(
    derivation: &Derivation,
    session: &SessionData,
    options: &ChartOptions,
    sink: &mut impl ChartSink,
) {
    sink.rows(&row_order(derivation));

    if options.show_safety_car {
        for lap in safety_car_laps(&session.race_control) {
            sink.band(&Band {
                x_start: lap as f64 - SAFETY_CAR_BAND_BEFORE,
                x_end: lap as f64 + SAFETY_CAR_BAND_AFTER,
                color: Rgb::YELLOW,
                opacity: SAFETY_CAR_BAND_OPACITY,
            });
        }
    }

    for stint in &derivation.stints {
        let (full_name, team) = match session.driver(&stint.driver) {
            Some(info) => (info.full_name.as_str(), info.team_name.as_str()),
            None => (stint.driver.as_str(), "Unknown"),
        };
        let color = if options.color_by_compound {
            compound_color(stint.compound)
        } else {
            Rgb::GRAY
        };
        let pit = stint
            .pit_duration_s
            .map(|d| format!(" | Pit: {}", format_pit_duration(d)))
            .unwrap_or_default();
        sink.segment(&StintSegment {
            row: stint.driver.clone(),
            x_start: stint.start_lap as f64,
            x_end: stint.end_lap as f64,
            compound: stint.compound,
            color,
            hover: format!(
                "{} ({}) | {} | {}\nLaps {}–{}{}",
                full_name,
                stint.driver,
                team,
                stint.compound.title(),
                stint.start_lap,
                stint.end_lap,
                pit
            ),
        });
    }

    if options.show_pit_stops {
        for event in &derivation.pit_events {
            let duration = derivation
                .pit_info(&event.driver, event.lap_number)
                .unwrap_or_else(|| "no pit info".to_string());
            sink.marker(&Marker {
                kind: MarkerKind::PitStop,
                row: event.driver.clone(),
                x: event.lap_number as f64,
                color: compound_color(event.compound),
                label: None,
                hover: format!(
                    "Pit Stop | Lap {} | {}\nTyre: {}",
                    event.lap_number,
                    duration,
                    event.compound.title()
                ),
            });
        }
    }

    if options.highlight_fastest_lap {
        for fastest in &derivation.fastest_laps {
            let lap_time = format_lap_time(fastest.lap_time_s);
            sink.marker(&Marker {
                kind: MarkerKind::FastestLap,
                row: fastest.driver.clone(),
                x: fastest.lap_number as f64,
                color: Rgb::GOLD,
                label: Some(format!("Fastest Lap ({} - {})", fastest.driver, lap_time)),
                hover: format!(
                    "Fastest Lap | {} | Lap {} | {}",
                    fastest.driver, fastest.lap_number, lap_time
                ),
            });
        }
    }

    debug!(
        "Built chart with {} rows: {}",
        derivation.drivers().len(),
        derivation
            .stints
            .iter()
            .map(|s| s.driver.as_str())
            .dedup_with_count()
            .map(|(count, driver)| format!("{}x{}", driver, count))
            .join(", ")
    );
}
