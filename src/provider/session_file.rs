use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    StintviewError,
    session::{
        ClassificationEntry, DriverInfo, EventInfo, LapRecord, RaceControlMessage, SessionData,
        WeatherSample,
    },
};

/// One line of a cached session file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum SessionRecord {
    Event(EventInfo),
    Driver(DriverInfo),
    Lap(LapRecord),
    Weather(WeatherSample),
    Result(ClassificationEntry),
    RaceControl(RaceControlMessage),
}

pub fn load_session_jsonl(source_file: &Path) -> Result<SessionData, StintviewError> {
    let path = source_file.display().to_string();
    let records = serde_jsonlines::json_lines(source_file)
        .map_err(|e| StintviewError::SessionLoaderError {
            path: path.clone(),
            source: e,
        })?
        .collect::<Result<Vec<SessionRecord>, std::io::Error>>()
        .map_err(|e| StintviewError::SessionLoaderError {
            path: path.clone(),
            source: e,
        })?;

    let mut session = SessionData::default();
    for record in records {
        match record {
            SessionRecord::Event(event) => session.event = event,
            SessionRecord::Driver(driver) => session.drivers.push(driver),
            SessionRecord::Lap(lap) => session.laps.push(lap),
            SessionRecord::Weather(sample) => session.weather.push(sample),
            SessionRecord::Result(entry) => session.results.push(entry),
            SessionRecord::RaceControl(message) => session.race_control.push(message),
        }
    }
    info!(
        "Loaded {}, found {} drivers, {} laps and {} weather samples",
        path,
        session.drivers.len(),
        session.laps.len(),
        session.weather.len()
    );
    Ok(session)
}

fn records(session: &SessionData) -> impl Iterator<Item = SessionRecord> + '_ {
    std::iter::once(SessionRecord::Event(session.event.clone()))
        .chain(session.drivers.iter().cloned().map(SessionRecord::Driver))
        .chain(session.laps.iter().cloned().map(SessionRecord::Lap))
        .chain(session.weather.iter().cloned().map(SessionRecord::Weather))
        .chain(session.results.iter().cloned().map(SessionRecord::Result))
        .chain(
            session
                .race_control
                .iter()
                .cloned()
                .map(SessionRecord::RaceControl),
        )
}

pub fn write_session(file: &Path, session: &SessionData) -> Result<(), StintviewError> {
    let session_file = File::create(file).map_err(|e| StintviewError::WriterError { source: e })?;
    let mut session_file_writer = BufWriter::new(session_file);
    for record in records(session) {
        let line = serde_json::to_string(&record)
            .map_err(|e| StintviewError::RecordSerializeError { source: e })?;
        writeln!(session_file_writer, "{}", line)
            .map_err(|e| StintviewError::WriterError { source: e })?;
    }
    session_file_writer
        .flush()
        .map_err(|e| StintviewError::WriterError { source: e })?;
    Ok(())
}
