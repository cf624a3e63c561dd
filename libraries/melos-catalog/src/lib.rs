//! Melos - Catalog Resolution
//!
//! Turns a track identifier into playable stream URLs by calling the
//! upstream player endpoint with a sequence of client identities and
//! filtering the answer down to direct audio formats. Selection of the
//! single best candidate lives in [`select_preferred`].

mod client;
mod context;
mod error;
mod response;
mod select;
mod types;

pub use client::CatalogClient;
pub use context::ClientVariant;
pub use error::{CatalogError, Result};
pub use select::select_preferred;
pub use types::{CatalogConfig, StreamCandidate};

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://youtubei.googleapis.com/youtubei/v1";
