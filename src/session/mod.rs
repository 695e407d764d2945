// Session timing data as delivered by a session provider

pub mod circuit;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::StintviewError;

pub use circuit::Circuit;

pub const MIN_YEAR: u16 = 2018;
pub const MAX_YEAR: u16 = 2024;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Compound {
    pub const ALL: [Compound; 6] = [
        Compound::Soft,
        Compound::Medium,
        Compound::Hard,
        Compound::Intermediate,
        Compound::Wet,
        Compound::Unknown,
    ];

    /// Title-cased name used in hover texts and tables.
    pub fn title(&self) -> &'static str {
        match self {
            Compound::Soft => "Soft",
            Compound::Medium => "Medium",
            Compound::Hard => "Hard",
            Compound::Intermediate => "Intermediate",
            Compound::Wet => "Wet",
            Compound::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Providers write `null` when the compound was not recorded.
fn compound_or_unknown<'de, D>(deserializer: D) -> Result<Compound, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Compound>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LapRecord {
    /// Driver abbreviation, e.g. "HAM"
    pub driver: String,
    pub lap_number: u32,
    #[serde(default, deserialize_with = "compound_or_unknown")]
    pub compound: Compound,
    /// Lap time in seconds, absent for incomplete laps
    pub lap_time_s: Option<f64>,
    /// Session time in seconds at which the car entered the pit lane
    pub pit_in_time_s: Option<f64>,
    /// Session time in seconds at which the car left the pit lane
    pub pit_out_time_s: Option<f64>,
    /// Track position at the end of the lap
    pub position: Option<u32>,
}

impl LapRecord {
    pub fn new(driver: &str, lap_number: u32, compound: Compound, lap_time_s: Option<f64>) -> Self {
        Self {
            driver: driver.to_string(),
            lap_number,
            compound,
            lap_time_s,
            ..Default::default()
        }
    }

    pub fn with_pit(mut self, pit_in_time_s: Option<f64>, pit_out_time_s: Option<f64>) -> Self {
        self.pit_in_time_s = pit_in_time_s;
        self.pit_out_time_s = pit_out_time_s;
        self
    }

    /// Lap time if it was recorded and is a usable number.
    pub fn valid_lap_time(&self) -> Option<f64> {
        self.lap_time_s.filter(|t| t.is_finite() && *t > 0.)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DriverInfo {
    pub abbreviation: String,
    pub full_name: String,
    pub team_name: String,
    pub number: String,
}

/// One weather reading. Every measurement may be missing; serde_json writes
/// non-finite readings as `null`, which reads back as `None`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherSample {
    /// Session time in seconds
    pub time_s: Option<f64>,
    /// Air temperature, °C
    pub air_temp: Option<f64>,
    /// Track temperature, °C
    pub track_temp: Option<f64>,
    /// Relative humidity, %
    pub humidity: Option<f64>,
    /// Wind speed, m/s
    pub wind_speed: Option<f64>,
    /// Wind direction, degrees
    pub wind_direction: Option<u16>,
}

impl WeatherSample {
    /// True when at least one measurement is a usable number.
    pub fn has_readings(&self) -> bool {
        [self.air_temp, self.track_temp, self.humidity, self.wind_speed]
            .into_iter()
            .flatten()
            .any(f64::is_finite)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassificationEntry {
    pub abbreviation: String,
    pub grid_position: Option<u32>,
    pub position: Option<u32>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RaceControlMessage {
    pub lap: Option<u32>,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventInfo {
    pub event_name: String,
    pub year: u16,
    /// ISO-8601 date of the event, e.g. "2021-09-12"
    pub event_date: Option<String>,
}

impl Default for EventInfo {
    fn default() -> Self {
        Self {
            event_name: "Unknown".to_string(),
            year: MIN_YEAR,
            event_date: None,
        }
    }
}

/// Everything a provider returns for one session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionData {
    pub event: EventInfo,
    pub drivers: Vec<DriverInfo>,
    pub laps: Vec<LapRecord>,
    pub weather: Vec<WeatherSample>,
    pub results: Vec<ClassificationEntry>,
    pub race_control: Vec<RaceControlMessage>,
}

impl SessionData {
    pub fn driver(&self, abbreviation: &str) -> Option<&DriverInfo> {
        self.drivers.iter().find(|d| d.abbreviation == abbreviation)
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionKind {
    #[default]
    Race,
    Qualifying,
    Sprint,
}

impl SessionKind {
    pub const ALL: [SessionKind; 3] = [
        SessionKind::Race,
        SessionKind::Qualifying,
        SessionKind::Sprint,
    ];

    /// Short code used by the data provider.
    pub fn code(&self) -> &'static str {
        match self {
            SessionKind::Race => "R",
            SessionKind::Qualifying => "Q",
            SessionKind::Sprint => "S",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionKind::Race => "Race",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Sprint => "Sprint",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SessionKind {
    type Err = StintviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionKind::ALL
            .into_iter()
            .find(|k| k.code().eq_ignore_ascii_case(s) || k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                StintviewError::invalid_input("session", format!("unknown session type '{}'", s))
            })
    }
}

/// What to load: one session of one event in one season.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRequest {
    pub year: u16,
    pub event: String,
    pub kind: SessionKind,
}

impl SessionRequest {
    pub fn new(year: u16, event: &str, kind: SessionKind) -> Result<Self, StintviewError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(StintviewError::invalid_input(
                "year",
                format!("{} is outside {}-{}", year, MIN_YEAR, MAX_YEAR),
            ));
        }
        let event = event.trim();
        if event.is_empty() {
            return Err(StintviewError::invalid_input("event", "event name is empty"));
        }
        Ok(Self {
            year,
            event: event.to_string(),
            kind,
        })
    }
}

impl fmt::Display for SessionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.year, self.event, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_deserializes_provider_names() {
        let lap: LapRecord =
            serde_json::from_str(r#"{"driver":"VER","lap_number":3,"compound":"INTERMEDIATE","lap_time_s":101.2,"pit_in_time_s":null,"pit_out_time_s":null,"position":1}"#)
                .unwrap();
        assert_eq!(lap.compound, Compound::Intermediate);

        let lap: LapRecord =
            serde_json::from_str(r#"{"driver":"VER","lap_number":3,"compound":"TEST_UNKNOWN","lap_time_s":null,"pit_in_time_s":null,"pit_out_time_s":null,"position":null}"#)
                .unwrap();
        assert_eq!(lap.compound, Compound::Unknown);
    }

    #[test]
    fn test_missing_compound_defaults_to_unknown() {
        let lap: LapRecord = serde_json::from_str(
            r#"{"driver":"NOR","lap_number":1,"lap_time_s":90.5,"pit_in_time_s":null,"pit_out_time_s":null,"position":null}"#,
        )
        .unwrap();
        assert_eq!(lap.compound, Compound::Unknown);
    }

    #[test]
    fn test_null_compound_is_unknown() {
        let lap: LapRecord = serde_json::from_str(
            r#"{"driver":"NOR","lap_number":2,"compound":null,"lap_time_s":90.5,"pit_in_time_s":null,"pit_out_time_s":null,"position":null}"#,
        )
        .unwrap();
        assert_eq!(lap.compound, Compound::Unknown);
        assert_eq!(lap.valid_lap_time(), Some(90.5));
    }

    #[test]
    fn test_partial_weather_and_roster_lines() {
        let sample: WeatherSample =
            serde_json::from_str(r#"{"time_s":12.0,"air_temp":21.5,"humidity":null}"#).unwrap();
        assert_eq!(sample.air_temp, Some(21.5));
        assert_eq!(sample.humidity, None);
        assert_eq!(sample.wind_direction, None);
        assert!(sample.has_readings());
        assert!(!WeatherSample::default().has_readings());

        let driver: DriverInfo =
            serde_json::from_str(r#"{"abbreviation":"ZHO","full_name":"Zhou Guanyu"}"#).unwrap();
        assert_eq!(driver.team_name, "");
        assert_eq!(driver.number, "");
    }

    #[test]
    fn test_valid_lap_time_rejects_nan() {
        assert_eq!(LapRecord::new("A", 1, Compound::Soft, Some(f64::NAN)).valid_lap_time(), None);
        assert_eq!(LapRecord::new("A", 1, Compound::Soft, None).valid_lap_time(), None);
        assert_eq!(
            LapRecord::new("A", 1, Compound::Soft, Some(90.1)).valid_lap_time(),
            Some(90.1)
        );
    }

    #[test]
    fn test_session_kind_parsing() {
        assert_eq!("R".parse::<SessionKind>().unwrap(), SessionKind::Race);
        assert_eq!("qualifying".parse::<SessionKind>().unwrap(), SessionKind::Qualifying);
        assert_eq!("s".parse::<SessionKind>().unwrap(), SessionKind::Sprint);
        assert!("FP1".parse::<SessionKind>().is_err());
    }

    #[test]
    fn test_session_request_validates_year() {
        assert!(SessionRequest::new(2021, "Monza", SessionKind::Race).is_ok());
        match SessionRequest::new(2017, "Monza", SessionKind::Race) {
            Err(StintviewError::InvalidUserInput { field, .. }) => assert_eq!(field, "year"),
            other => panic!("Expected InvalidUserInput error, got {:?}", other),
        }
        assert!(SessionRequest::new(2025, "Monza", SessionKind::Race).is_err());
        assert!(SessionRequest::new(2021, "  ", SessionKind::Race).is_err());
    }
}
