//! HTTP client and page field extraction for itch.io jams.
//!
//! [`ItchClient`] implements the fetch side of the pipeline: jam pages,
//! the entries feed, rate pages, and raw media downloads, all paced onto
//! a single global inter-request gap.

pub mod client;
pub mod game_page;
pub mod jam_page;
pub mod urls;

pub use client::{ClientConfig, ItchClient};
