//! Reporting layer for the campus energy pipeline.
//!
//! Writes the cleaned data and building summary CSVs, the executive summary
//! text, the console summary table and the three-panel PNG dashboard.

pub mod dashboard;
pub mod export;
pub mod table_view;

pub use energy_core as core;
