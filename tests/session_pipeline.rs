// Integration tests for the extraction pipeline
//
// 1. Store a session in a temporary cache directory
// 2. Load it back through the session provider
// 3. Derive stints, pit stops and fastest laps
// 4. Build the chart and check what a sink receives

use stintview::{
    CachedSessionProvider, ChartOptions, Compound, LapFilter, LapRecord, RecordingSink,
    SessionData, SessionKind, SessionProvider, SessionRequest, StintviewError, build_chart,
    chart::{ChartPrimitive, MarkerKind},
    derive,
    session::{ClassificationEntry, DriverInfo, EventInfo, RaceControlMessage, WeatherSample},
    summary::{podium, safety_car_laps, starting_grid, weather_summary},
};
use tempfile::TempDir;

fn driver(abbreviation: &str, full_name: &str, team_name: &str, number: &str) -> DriverInfo {
    DriverInfo {
        abbreviation: abbreviation.to_string(),
        full_name: full_name.to_string(),
        team_name: team_name.to_string(),
        number: number.to_string(),
    }
}

/// A short race: HAM pits at the end of lap 2, LEC never gets a timed lap.
fn sample_session() -> SessionData {
    SessionData {
        event: EventInfo {
            event_name: "British Grand Prix".to_string(),
            year: 2019,
            event_date: Some("2019-07-14".to_string()),
        },
        drivers: vec![
            driver("HAM", "Lewis Hamilton", "Mercedes", "44"),
            driver("VER", "Max Verstappen", "Red Bull Racing", "33"),
            driver("LEC", "Charles Leclerc", "Ferrari", "16"),
        ],
        laps: vec![
            LapRecord::new("HAM", 1, Compound::Soft, Some(90.1)),
            LapRecord::new("HAM", 2, Compound::Soft, Some(89.8))
                .with_pit(Some(5000.0), Some(5022.4)),
            LapRecord::new("HAM", 3, Compound::Medium, Some(89.5)),
            LapRecord::new("HAM", 4, Compound::Medium, Some(89.9)),
            LapRecord::new("VER", 1, Compound::Medium, Some(90.4)),
            LapRecord::new("VER", 2, Compound::Medium, Some(90.0)),
            LapRecord::new("VER", 3, Compound::Medium, None),
            LapRecord::new("VER", 4, Compound::Hard, Some(90.2)).with_pit(None, Some(5400.0)),
            LapRecord::new("LEC", 1, Compound::Soft, None),
        ],
        weather: vec![WeatherSample {
            time_s: Some(0.),
            air_temp: Some(21.3),
            track_temp: Some(34.9),
            humidity: Some(84.),
            wind_speed: Some(2.1),
            wind_direction: Some(240),
        }],
        results: vec![
            ClassificationEntry {
                abbreviation: "HAM".to_string(),
                grid_position: Some(2),
                position: Some(1),
            },
            ClassificationEntry {
                abbreviation: "VER".to_string(),
                grid_position: Some(4),
                position: Some(3),
            },
            ClassificationEntry {
                abbreviation: "LEC".to_string(),
                grid_position: Some(3),
                position: Some(2),
            },
        ],
        race_control: vec![RaceControlMessage {
            lap: Some(3),
            message: "SAFETY CAR DEPLOYED".to_string(),
        }],
    }
}

fn cached_provider() -> (TempDir, CachedSessionProvider, SessionRequest) {
    let temp_dir = TempDir::new().unwrap();
    let provider = CachedSessionProvider::new(temp_dir.path().to_path_buf());
    let request = SessionRequest::new(2019, "Silverstone", SessionKind::Race).unwrap();
    provider.store(&request, &sample_session()).unwrap();
    (temp_dir, provider, request)
}

#[test]
fn test_extraction_round_trip() {
    let (_temp_dir, provider, request) = cached_provider();
    let session = provider.load(&request).unwrap();
    assert_eq!(session, sample_session());
}

#[test]
fn test_stints_pit_stops_and_fastest_lap() {
    let (_temp_dir, provider, request) = cached_provider();
    let session = provider.load(&request).unwrap();
    let derivation = derive(&session.laps, &LapFilter::all());

    let stints = derivation
        .stints
        .iter()
        .map(|s| (s.driver.as_str(), s.stint, s.compound, s.start_lap, s.end_lap))
        .collect::<Vec<_>>();
    assert_eq!(
        stints,
        vec![
            ("HAM", 1, Compound::Soft, 1, 2),
            ("HAM", 2, Compound::Medium, 3, 4),
            ("VER", 1, Compound::Medium, 1, 2),
            ("VER", 2, Compound::Hard, 4, 4),
        ]
    );
    assert_eq!(derivation.pit_info("HAM", 2), Some("22.40s".to_string()));
    assert_eq!(derivation.pit_lookup.get("VER", 4), Some(None));
    assert_eq!(derivation.drivers(), vec!["HAM", "VER"]);

    assert_eq!(derivation.fastest_laps.len(), 1);
    assert_eq!(derivation.fastest_laps[0].driver, "HAM");
    assert_eq!(derivation.fastest_laps[0].lap_number, 3);
}

#[test]
fn test_lap_range_filter_drops_first_stint() {
    let (_temp_dir, provider, request) = cached_provider();
    let session = provider.load(&request).unwrap();
    let derivation = derive(
        &session.laps,
        &LapFilter::all().with_drivers(["HAM"]).with_lap_range(3, 4),
    );
    assert_eq!(derivation.stints.len(), 1);
    assert_eq!(derivation.stints[0].compound, Compound::Medium);
    assert_eq!(
        (derivation.stints[0].start_lap, derivation.stints[0].end_lap),
        (3, 4)
    );
    assert!(derivation.pit_events.is_empty());
}

#[test]
fn test_chart_receives_one_primitive_per_record() {
    let (_temp_dir, provider, request) = cached_provider();
    let session = provider.load(&request).unwrap();
    let derivation = derive(&session.laps, &LapFilter::all());
    let mut sink = RecordingSink::default();
    build_chart(&derivation, &session, &ChartOptions::default(), &mut sink);

    assert!(matches!(sink.primitives[0], ChartPrimitive::Rows { .. }));
    assert_eq!(sink.segments().count(), derivation.stints.len());
    assert_eq!(
        sink.markers(MarkerKind::PitStop).count(),
        derivation.pit_events.len()
    );
    assert_eq!(sink.markers(MarkerKind::FastestLap).count(), 1);
    assert_eq!(sink.bands().count(), 1);
}

#[test]
fn test_session_summaries() {
    let session = sample_session();
    let weather = weather_summary(&session.weather).unwrap();
    assert!(weather.line().starts_with("☁️"));
    assert_eq!(
        starting_grid(&session.results, &session.drivers)
            .iter()
            .map(|g| g.abbreviation.as_str())
            .collect::<Vec<_>>(),
        vec!["HAM", "LEC", "VER"]
    );
    assert_eq!(podium(&session.results, &session.drivers)[1].full_name, "Charles Leclerc");
    assert_eq!(safety_car_laps(&session.race_control), vec![3]);
}

#[test]
fn test_unreadable_weather_reading_survives_the_cache() {
    let temp_dir = TempDir::new().unwrap();
    let provider = CachedSessionProvider::new(temp_dir.path().to_path_buf());
    let request = SessionRequest::new(2019, "Silverstone", SessionKind::Race).unwrap();
    let mut session = sample_session();
    session.weather[0].humidity = Some(f64::NAN);
    provider.store(&request, &session).unwrap();

    let loaded = provider.load(&request).unwrap();
    assert_eq!(loaded.laps, session.laps);
    assert_eq!(loaded.weather[0].humidity, None);
    assert_eq!(loaded.weather[0].air_temp, Some(21.3));
    assert!(weather_summary(&loaded.weather).unwrap().line().contains("Humidity: n/a"));
}

#[test]
fn test_unknown_session_is_reported_not_panicking() {
    let (_temp_dir, provider, _) = cached_provider();
    let request = SessionRequest::new(2019, "Monza", SessionKind::Race).unwrap();
    let error = provider.load(&request).unwrap_err();
    assert!(matches!(error, StintviewError::SessionNotFound { .. }));
    assert!(error.user_message().contains("Monza"));
}
