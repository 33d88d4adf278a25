//! # Sitsit Common Library
//!
//! Shared code for the sitsit seating planner:
//! - Attendee record (`Person`)
//! - Error taxonomy
//! - Configuration loading

pub mod config;
pub mod error;
pub mod person;

pub use config::{AffinityConfig, TomlConfig};
pub use error::{Error, Result};
pub use person::Person;
