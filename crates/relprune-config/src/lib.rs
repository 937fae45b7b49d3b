//! # relprune config
//!
//! Type-safe configuration for relprune.
//!
//! A [`Config`] is assembled once at startup from built-in defaults, an
//! optional TOML file, and environment variables, then validated and passed by
//! reference to everything that needs it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
