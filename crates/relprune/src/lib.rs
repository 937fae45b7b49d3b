//! # relprune
//!
//! Removes Discord friends that are not on an allow-list.
//!
//! This is the binary crate that drives a single run: validate the token,
//! fetch and cache the relationship list, pick the friends to drop, delete
//! them concurrently through the client's gate, and report a summary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod allow_list;
pub mod error;
pub mod purger;

pub use allow_list::*;
pub use error::*;
pub use purger::*;
