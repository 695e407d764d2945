// Session-level summaries shown next to the stint chart

use std::fmt;

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::session::{
    ClassificationEntry, DriverInfo, EventInfo, LapRecord, RaceControlMessage, WeatherSample,
};

const SAFETY_CAR_MARKER: &str = "SAFETY CAR";
const PODIUM_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WeatherIcon {
    Sun,
    Cloud,
    Rain,
}

impl WeatherIcon {
    pub fn from_humidity(humidity: f64) -> Self {
        if humidity > 90. {
            WeatherIcon::Rain
        } else if humidity > 80. {
            WeatherIcon::Cloud
        } else {
            WeatherIcon::Sun
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀️",
            WeatherIcon::Cloud => "☁️",
            WeatherIcon::Rain => "🌧",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub icon: WeatherIcon,
    pub sample: WeatherSample,
}

fn reading(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => "n/a".to_string(),
    }
}

impl WeatherSummary {
    pub fn line(&self) -> String {
        format!(
            "{}  Air: {} | Track: {} | Humidity: {} | Wind: {}",
            self.icon.symbol(),
            reading(self.sample.air_temp, 1, "°C"),
            reading(self.sample.track_temp, 1, "°C"),
            reading(self.sample.humidity, 0, "%"),
            reading(self.sample.wind_speed, 1, " m/s")
        )
    }
}

fn sample_time(sample: &WeatherSample) -> f64 {
    sample
        .time_s
        .filter(|t| t.is_finite())
        .unwrap_or(f64::INFINITY)
}

/// Conditions at the start of the session, from the earliest sample that has
/// any usable reading. `None` when no such sample was recorded.
pub fn weather_summary(samples: &[WeatherSample]) -> Option<WeatherSummary> {
    samples
        .iter()
        .filter(|s| s.has_readings())
        .min_by(|a, b| sample_time(a).total_cmp(&sample_time(b)))
        .map(|sample| WeatherSummary {
            icon: sample
                .humidity
                .filter(|h| h.is_finite())
                .map_or(WeatherIcon::Sun, WeatherIcon::from_humidity),
            sample: sample.clone(),
        })
}

/// Where a driver started or finished. Pit lane starters sort after every grid slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum GridSlot {
    Position(u32),
    PitLane,
}

impl fmt::Display for GridSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridSlot::Position(position) => write!(f, "{}.", position),
            GridSlot::PitLane => f.write_str("Pit lane"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridLine {
    pub slot: GridSlot,
    pub abbreviation: String,
    pub full_name: String,
}

impl GridLine {
    pub fn line(&self) -> String {
        format!("{} {} ({})", self.slot, self.full_name, self.abbreviation)
    }
}

fn grid_line(slot: GridSlot, abbreviation: &str, drivers: &[DriverInfo]) -> GridLine {
    let full_name = drivers
        .iter()
        .find(|d| d.abbreviation == abbreviation)
        .map(|d| d.full_name.clone())
        .unwrap_or_else(|| abbreviation.to_string());
    GridLine {
        slot,
        abbreviation: abbreviation.to_string(),
        full_name,
    }
}

/// Starting order. A grid position of 0 is a pit lane start and is listed last;
/// entries without a grid position are skipped.
pub fn starting_grid(results: &[ClassificationEntry], drivers: &[DriverInfo]) -> Vec<GridLine> {
    results
        .iter()
        .filter_map(|r| {
            let slot = match r.grid_position? {
                0 => GridSlot::PitLane,
                p => GridSlot::Position(p),
            };
            Some(grid_line(slot, &r.abbreviation, drivers))
        })
        .sorted_by_key(|g| g.slot)
        .collect()
}

pub fn podium(results: &[ClassificationEntry], drivers: &[DriverInfo]) -> Vec<GridLine> {
    results
        .iter()
        .filter_map(|r| {
            r.position
                .filter(|p| *p > 0)
                .map(|p| grid_line(GridSlot::Position(p), &r.abbreviation, drivers))
        })
        .k_smallest_by_key(PODIUM_SIZE, |g| g.slot)
        .collect()
}

/// Laps on which race control announced a safety car, sorted and deduplicated.
pub fn safety_car_laps(messages: &[RaceControlMessage]) -> Vec<u32> {
    messages
        .iter()
        .filter(|m| m.message.to_uppercase().contains(SAFETY_CAR_MARKER))
        .filter_map(|m| m.lap)
        .sorted()
        .dedup()
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LapDelta {
    pub lap_number: u32,
    pub first_s: f64,
    pub second_s: f64,
}

impl LapDelta {
    /// Positive when the first driver was slower.
    pub fn delta_s(&self) -> f64 {
        self.first_s - self.second_s
    }
}

/// Lap-by-lap comparison of two drivers over the laps both completed with a valid time.
pub fn compare_drivers(laps: &[LapRecord], first: &str, second: &str) -> Vec<LapDelta> {
    let timed = |driver: &str| {
        laps.iter()
            .filter(|l| l.driver == driver)
            .filter_map(|l| l.valid_lap_time().map(|t| (l.lap_number, t)))
            .collect::<std::collections::BTreeMap<u32, f64>>()
    };
    let second_laps = timed(second);
    timed(first)
        .into_iter()
        .filter_map(|(lap_number, first_s)| {
            second_laps.get(&lap_number).map(|second_s| LapDelta {
                lap_number,
                first_s,
                second_s: *second_s,
            })
        })
        .collect()
}

pub fn race_title(event: &EventInfo) -> String {
    format!("Formula 1 - {} {}", event.event_name, event.year)
}

/// Event date as "12 September 2021", `None` when missing or not a date.
pub fn race_date(event: &EventInfo) -> Option<String> {
    let raw = event.event_date.as_deref()?;
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%d %B %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Compound;

    fn weather(time_s: f64, humidity: f64) -> WeatherSample {
        WeatherSample {
            time_s: Some(time_s),
            air_temp: Some(24.14),
            track_temp: Some(38.0),
            humidity: Some(humidity),
            wind_speed: Some(1.23),
            wind_direction: Some(180),
        }
    }

    fn roster() -> Vec<DriverInfo> {
        vec![
            DriverInfo {
                abbreviation: "RIC".to_string(),
                full_name: "Daniel Ricciardo".to_string(),
                team_name: "McLaren".to_string(),
                number: "3".to_string(),
            },
            DriverInfo {
                abbreviation: "NOR".to_string(),
                full_name: "Lando Norris".to_string(),
                team_name: "McLaren".to_string(),
                number: "4".to_string(),
            },
            DriverInfo {
                abbreviation: "BOT".to_string(),
                full_name: "Valtteri Bottas".to_string(),
                team_name: "Mercedes".to_string(),
                number: "77".to_string(),
            },
        ]
    }

    fn results() -> Vec<ClassificationEntry> {
        vec![
            ClassificationEntry {
                abbreviation: "BOT".to_string(),
                grid_position: Some(0),
                position: Some(3),
            },
            ClassificationEntry {
                abbreviation: "NOR".to_string(),
                grid_position: Some(3),
                position: Some(2),
            },
            ClassificationEntry {
                abbreviation: "RIC".to_string(),
                grid_position: Some(2),
                position: Some(1),
            },
            ClassificationEntry {
                abbreviation: "LEC".to_string(),
                grid_position: Some(4),
                position: Some(4),
            },
        ]
    }

    #[test]
    fn test_weather_summary_uses_first_sample() {
        let summary = weather_summary(&[weather(60., 95.), weather(0., 45.)]).unwrap();
        assert_eq!(summary.icon, WeatherIcon::Sun);
        assert_eq!(
            summary.line(),
            "☀️  Air: 24.1°C | Track: 38.0°C | Humidity: 45% | Wind: 1.2 m/s"
        );
        assert_eq!(weather_summary(&[]), None);
    }

    #[test]
    fn test_weather_summary_skips_empty_samples() {
        let empty = WeatherSample {
            time_s: Some(0.),
            ..Default::default()
        };
        let partial = WeatherSample {
            time_s: Some(30.),
            air_temp: Some(19.0),
            humidity: Some(f64::NAN),
            ..Default::default()
        };
        let summary = weather_summary(&[empty.clone(), partial]).unwrap();
        assert_eq!(summary.icon, WeatherIcon::Sun);
        assert_eq!(
            summary.line(),
            "☀️  Air: 19.0°C | Track: n/a | Humidity: n/a | Wind: n/a"
        );
        assert_eq!(weather_summary(&[empty]), None);
    }

    #[test]
    fn test_weather_icon_thresholds() {
        assert_eq!(WeatherIcon::from_humidity(80.), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::from_humidity(85.), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::from_humidity(90.), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::from_humidity(91.), WeatherIcon::Rain);
    }

    #[test]
    fn test_starting_grid_and_podium() {
        let grid = starting_grid(&results(), &roster());
        assert_eq!(
            grid.iter().map(GridLine::line).collect_vec(),
            vec![
                "2. Daniel Ricciardo (RIC)",
                "3. Lando Norris (NOR)",
                "4. LEC (LEC)",
                "Pit lane Valtteri Bottas (BOT)"
            ]
        );
        assert_eq!(grid[3].slot, GridSlot::PitLane);

        let podium = podium(&results(), &roster());
        assert_eq!(
            podium.iter().map(|g| g.abbreviation.as_str()).collect_vec(),
            vec!["RIC", "NOR", "BOT"]
        );
    }

    #[test]
    fn test_safety_car_laps() {
        let messages = vec![
            RaceControlMessage {
                lap: Some(26),
                message: "SAFETY CAR DEPLOYED".to_string(),
            },
            RaceControlMessage {
                lap: Some(5),
                message: "Virtual Safety Car deployed".to_string(),
            },
            RaceControlMessage {
                lap: Some(26),
                message: "safety car in this lap".to_string(),
            },
            RaceControlMessage {
                lap: Some(12),
                message: "TRACK LIMITS".to_string(),
            },
            RaceControlMessage {
                lap: None,
                message: "SAFETY CAR DEPLOYED".to_string(),
            },
        ];
        assert_eq!(safety_car_laps(&messages), vec![5, 26]);
    }

    #[test]
    fn test_compare_drivers_uses_overlapping_laps_only() {
        let laps = vec![
            LapRecord::new("A", 1, Compound::Soft, Some(90.0)),
            LapRecord::new("A", 2, Compound::Soft, Some(89.0)),
            LapRecord::new("A", 3, Compound::Soft, None),
            LapRecord::new("B", 2, Compound::Hard, Some(89.5)),
            LapRecord::new("B", 3, Compound::Hard, Some(89.4)),
        ];
        let deltas = compare_drivers(&laps, "A", "B");
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].lap_number, 2);
        assert!((deltas[0].delta_s() + 0.5).abs() < 1e-9);

        assert!(compare_drivers(&laps, "A", "C").is_empty());
    }

    #[test]
    fn test_race_title_and_date() {
        let event = EventInfo {
            event_name: "Italian Grand Prix".to_string(),
            year: 2021,
            event_date: Some("2021-09-12T00:00:00".to_string()),
        };
        assert_eq!(race_title(&event), "Formula 1 - Italian Grand Prix 2021");
        assert_eq!(race_date(&event), Some("12 September 2021".to_string()));
        assert_eq!(race_date(&EventInfo::default()), None);
    }
}
