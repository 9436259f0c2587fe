pub mod config;
pub mod coordinator;
pub mod dedup;
pub mod error;
pub mod layout;
pub mod models;
pub mod pacer;
pub mod pool;
pub mod reporter;
pub mod testutil;
pub mod traits;

pub use config::IngestConfig;
pub use coordinator::{IngestService, JamOutcome};
pub use dedup::DedupCache;
pub use error::AppError;
pub use layout::Layout;
pub use pacer::Pacer;
pub use pool::AdmissionGate;
pub use reporter::{IngestEvent, IngestReporter, TracingReporter};
pub use traits::{JamClient, RecordSink};
