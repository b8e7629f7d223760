//! Remote API access
//!
//! This module wraps the two endpoints the pipeline consumes: the
//! paginated city listing search and the per-hotel photo lookup. The
//! rest of the API surface is treated as a black box.

mod client;

pub use client::{ApiClient, ListingsResult};
