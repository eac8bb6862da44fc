//! Animal API surface
//!
//! Thin HTTP layer over the source and destination endpoints. Calls here are
//! single attempts; retrying lives in the layers above.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::AnimalApiClient;
pub use types::{AnimalPage, AnimalSummary};
