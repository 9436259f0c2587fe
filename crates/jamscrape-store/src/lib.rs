//! Filesystem persistence for scraped jams.
//!
//! [`FsSink`] implements the save side of the pipeline under the shared
//! directory layout; [`load`] reads persisted jams back for the aggregate
//! report, which [`report`] renders to Markdown.

pub mod load;
pub mod report;
pub mod sink;

pub use load::load_jam;
pub use report::render_report;
pub use sink::{FsSink, OutputFormat};
