mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use egui::Vec2;
use itertools::Itertools;
use log::{error, warn};

use stintview::{
    AppConfig, CachedSessionProvider, ChartOptions, LapFilter, RecordingSink, SessionKind,
    SessionProvider, SessionRequest, StintviewError, build_chart, derive,
    stints::{Derivation, format_lap_time, format_pit_duration},
};
use ui::dashboard::DashboardApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive stint dashboard
    Dashboard {
        #[arg(short, long)]
        cache_dir: Option<PathBuf>,
    },
    /// Print the stints of one session
    Stints {
        #[arg(short, long)]
        year: u16,

        #[arg(short, long)]
        event: String,

        #[arg(short, long, default_value = "R")]
        session: SessionKind,

        #[arg(short, long)]
        cache_dir: Option<PathBuf>,

        /// Comma separated driver abbreviations, all drivers when omitted
        #[arg(short, long, value_delimiter = ',')]
        drivers: Vec<String>,

        /// Inclusive lap range, e.g. "10-25"
        #[arg(short, long)]
        laps: Option<String>,

        /// Print chart primitives as JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn load_config() -> AppConfig {
    match AppConfig::from_local_file() {
        Ok(Some(config)) => config,
        Ok(None) => AppConfig::default(),
        Err(e) => {
            warn!("Ignoring config file: {}", e);
            AppConfig::default()
        }
    }
}

fn provider_for(
    cache_dir: Option<PathBuf>,
    config: &AppConfig,
) -> Result<CachedSessionProvider, StintviewError> {
    match cache_dir {
        Some(dir) => Ok(CachedSessionProvider::new(dir)),
        None => Ok(CachedSessionProvider::new(config.resolved_cache_dir()?)),
    }
}

fn parse_lap_range(range: &str) -> Result<(u32, u32), StintviewError> {
    let invalid = || StintviewError::InvalidUserInput {
        field: "laps".to_string(),
        reason: format!("expected <first>-<last>, got '{}'", range),
    };
    let (lo, hi) = range.split_once('-').ok_or_else(invalid)?;
    let lo = lo.trim().parse::<u32>().map_err(|_| invalid())?;
    let hi = hi.trim().parse::<u32>().map_err(|_| invalid())?;
    if lo == 0 || lo > hi {
        return Err(invalid());
    }
    Ok((lo, hi))
}

fn dashboard(cache_dir: Option<PathBuf>) -> Result<(), StintviewError> {
    let mut app_config = load_config();
    if cache_dir.is_some() {
        app_config.cache_dir = cache_dir.clone();
    }
    let provider = provider_for(cache_dir, &app_config)?;

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(1400., 900.))
        .with_title("Stintview");

    if let Err(e) = eframe::run_native(
        "Stintview",
        native_options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(provider, app_config, cc)))),
    ) {
        error!("Could not start dashboard: {}", e);
    }
    Ok(())
}

fn print_table(request: &SessionRequest, derivation: &Derivation) {
    println!("{}", request);
    if derivation.stints.is_empty() {
        println!("No laps with valid timing in the selection");
        return;
    }
    println!("{:<6}{:>6}  {:<14}{:>14}  {}", "Driver", "Stint", "Compound", "Laps", "Pit");
    for stint in &derivation.stints {
        println!(
            "{:<6}{:>6}  {:<14}{:>14}  {}",
            stint.driver,
            stint.stint,
            stint.compound.title(),
            format!("{}-{} ({})", stint.start_lap, stint.end_lap, stint.lap_count()),
            stint
                .pit_duration_s
                .map(format_pit_duration)
                .unwrap_or_default()
        );
    }
    if derivation.pit_events.is_empty() {
        println!("No pit stops in the selection");
    }
    println!(
        "Fastest lap: {}",
        derivation
            .fastest_laps
            .iter()
            .map(|f| format!(
                "{} lap {} ({})",
                f.driver,
                f.lap_number,
                format_lap_time(f.lap_time_s)
            ))
            .join(", ")
    );
}

fn stints(
    request: SessionRequest,
    cache_dir: Option<PathBuf>,
    drivers: Vec<String>,
    laps: Option<String>,
    json: bool,
) -> Result<(), StintviewError> {
    let app_config = load_config();
    let provider = provider_for(cache_dir, &app_config)?;
    let session = provider.load(&request)?;

    let mut filter = LapFilter::all();
    if !drivers.is_empty() {
        filter = filter.with_drivers(drivers);
    }
    if let Some(range) = laps {
        let (lo, hi) = parse_lap_range(&range)?;
        filter = filter.with_lap_range(lo, hi);
    }
    let derivation = derive(&session.laps, &filter);

    if json {
        let mut sink = RecordingSink::default();
        build_chart(&derivation, &session, &ChartOptions::default(), &mut sink);
        for primitive in &sink.primitives {
            let line = serde_json::to_string(primitive)
                .map_err(|e| StintviewError::RecordSerializeError { source: e })?;
            println!("{}", line);
        }
    } else {
        print_table(&request, &derivation);
    }
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let result = match cli.command {
        Commands::Dashboard { cache_dir } => dashboard(cache_dir),
        Commands::Stints {
            year,
            event,
            session,
            cache_dir,
            drivers,
            laps,
            json,
        } => SessionRequest::new(year, &event, session)
            .and_then(|request| stints(request, cache_dir, drivers, laps, json)),
    };
    if let Err(e) = result {
        error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lap_range() {
        assert_eq!(parse_lap_range("3-4").unwrap(), (3, 4));
        assert_eq!(parse_lap_range(" 10 - 25 ").unwrap(), (10, 25));
        assert!(parse_lap_range("4-3").is_err());
        assert!(parse_lap_range("0-3").is_err());
        assert!(parse_lap_range("12").is_err());
        assert!(parse_lap_range("a-b").is_err());
    }

    #[test]
    fn test_cli_parses_stints_command() {
        let args = Args::try_parse_from([
            "stintview", "stints", "--year", "2021", "--event", "Monza", "--session", "Q",
            "--drivers", "HAM,VER", "--laps", "1-10",
        ])
        .unwrap();
        match args.command {
            Commands::Stints {
                year,
                session,
                drivers,
                laps,
                json,
                ..
            } => {
                assert_eq!(year, 2021);
                assert_eq!(session, SessionKind::Qualifying);
                assert_eq!(drivers, vec!["HAM", "VER"]);
                assert_eq!(laps.as_deref(), Some("1-10"));
                assert!(!json);
            }
            other => panic!("Expected Stints command, got {:?}", other),
        }
    }
}
