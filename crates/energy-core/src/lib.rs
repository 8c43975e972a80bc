//! Core types shared by the campus energy crates.
//!
//! Holds the unified reading table and derived aggregate records, the
//! crate-wide error type, CLI settings, timestamp handling and number
//! formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{EnergyError, Result};
