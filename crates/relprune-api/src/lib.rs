//! # relprune api
//!
//! Discord HTTP API client for relprune.
//!
//! The client validates the access token, lists the caller's relationships
//! (optionally writing a raw snapshot to disk), and deletes relationships
//! through a shared concurrency gate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod client;
pub mod models;
pub mod transport;
pub mod user_agent;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::*;
pub use client::*;
pub use models::*;
pub use transport::*;
pub use user_agent::*;
