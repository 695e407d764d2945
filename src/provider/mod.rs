// Session data providers
// Loads whole sessions for the dashboard; the provider is the only place that touches disk

pub mod session_file;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    StintviewError,
    session::{SessionData, SessionRequest},
};

pub use session_file::{SessionRecord, load_session_jsonl, write_session};

const SESSION_FILE_EXTENSION: &str = "jsonl";

/// Source of session timing data.
pub trait SessionProvider {
    /// Load laps, roster, weather, results and race control messages for one session
    fn load(&self, request: &SessionRequest) -> Result<SessionData, StintviewError>;
}

/// Reads sessions from a directory laid out as `<year>/<event>/<session code>.jsonl`.
#[derive(Clone, Debug)]
pub struct CachedSessionProvider {
    cache_dir: PathBuf,
}

impl CachedSessionProvider {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn default_cache_dir() -> Result<PathBuf, StintviewError> {
        let app_data_dir = dirs::data_dir().ok_or(StintviewError::NoConfigDir)?;
        Ok(app_data_dir.join("stintview").join("cache"))
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Normalize event name for consistent directory naming
    fn normalize_event_name(event: &str) -> String {
        event
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }

    pub fn session_path(&self, request: &SessionRequest) -> PathBuf {
        self.cache_dir
            .join(request.year.to_string())
            .join(Self::normalize_event_name(&request.event))
            .join(format!("{}.{}", request.kind.code(), SESSION_FILE_EXTENSION))
    }

    pub fn is_cached(&self, request: &SessionRequest) -> bool {
        self.session_path(request).exists()
    }

    /// Write a session into the cache, creating directories as needed
    pub fn store(
        &self,
        request: &SessionRequest,
        session: &SessionData,
    ) -> Result<PathBuf, StintviewError> {
        let path = self.session_path(request);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StintviewError::WriterError { source: e })?;
        }
        write_session(&path, session)?;
        debug!("Stored {} at {:?}", request, path);
        Ok(path)
    }
}

impl SessionProvider for CachedSessionProvider {
    fn load(&self, request: &SessionRequest) -> Result<SessionData, StintviewError> {
        let path = self.session_path(request);
        debug!("Looking up {} at {:?}", request, path);
        if !path.exists() {
            return Err(StintviewError::SessionNotFound {
                year: request.year,
                event: request.event.clone(),
                session: request.kind.to_string(),
            });
        }
        load_session_jsonl(&path)
    }
}
