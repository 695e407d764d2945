// Library interface for stintview
// This allows integration tests and benches to access internal modules

pub mod chart;
pub mod config;
pub mod errors;
pub mod provider;
pub mod session;
pub mod stints;
pub mod summary;

// Re-export commonly used types
pub use chart::{ChartOptions, ChartSink, RecordingSink, build_chart};
pub use config::AppConfig;
pub use errors::StintviewError;
pub use provider::{CachedSessionProvider, SessionProvider};
pub use session::{Compound, LapRecord, SessionData, SessionKind, SessionRequest};
pub use stints::{Derivation, LapFilter, derive};
