//! Data ingestion and aggregation layer for the campus energy pipeline.
//!
//! Responsible for discovering and parsing per-building meter CSV files,
//! merging them into a unified table, aggregating daily and per-building
//! statistics and deriving the headline metrics used by the reports.

pub mod aggregator;
pub mod analysis;
pub mod demo;
pub mod reader;

pub use energy_core as core;
