//! End-to-end analysis over a loaded unified table.
//!
//! Combines the aggregator outputs into a [`CampusAnalysis`] ready for the
//! reporting layer, including the executive-summary headline metrics.

use energy_core::models::{BuildingSummary, CampusHeadline, DailyTotal, UnifiedTable};
use tracing::debug;

use crate::aggregator::ConsumptionAggregator;

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything the reporting layer needs, derived from one unified table.
#[derive(Debug, Clone)]
pub struct CampusAnalysis {
    /// Zero-filled per-building daily totals.
    pub daily_totals: Vec<DailyTotal>,
    /// Per-building statistics in table order.
    pub summaries: Vec<BuildingSummary>,
    /// Campus-wide headline numbers.
    pub headline: CampusHeadline,
}

// ── Headline metrics ──────────────────────────────────────────────────────────

/// Building with the largest `sum`.
///
/// On an exact tie the first building in `summaries` order wins.
pub fn top_consumer(summaries: &[BuildingSummary]) -> Option<&BuildingSummary> {
    summaries.iter().fold(None, |best, s| match best {
        Some(b) if b.sum >= s.sum => Some(b),
        _ => Some(s),
    })
}

/// Hour of day (0-23) with the largest summed consumption over all rows.
///
/// Only hours that have readings are candidates; on an exact tie the
/// smallest hour wins. Returns `None` for an empty table.
pub fn peak_hour(table: &UnifiedTable) -> Option<u32> {
    ConsumptionAggregator::hourly_totals(table)
        .iter()
        .enumerate()
        .filter_map(|(hour, total)| total.map(|t| (hour as u32, t)))
        .fold(None, |best: Option<(u32, f64)>, (hour, total)| match best {
            Some((_, b)) if b >= total => best,
            _ => Some((hour, total)),
        })
        .map(|(hour, _)| hour)
}

/// Derive the executive-summary numbers, or `None` for an empty table.
pub fn campus_headline(
    table: &UnifiedTable,
    summaries: &[BuildingSummary],
) -> Option<CampusHeadline> {
    let top = top_consumer(summaries)?;
    let peak = peak_hour(table)?;
    Some(CampusHeadline {
        total_kwh: table.total_kwh(),
        top_building: top.building.clone(),
        peak_hour: peak,
        building_count: summaries.len(),
    })
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the aggregation pipeline over `table`.
///
/// Returns `None` when the table holds no rows; callers treat that as the
/// "no data" condition rather than an error.
pub fn analyze_table(table: &UnifiedTable) -> Option<CampusAnalysis> {
    if table.is_empty() {
        return None;
    }

    let daily_totals = ConsumptionAggregator::daily_totals(table);
    let summaries = ConsumptionAggregator::building_summaries(table);
    let headline = campus_headline(table, &summaries)?;

    debug!(
        "Analysed {} rows: {} buildings, {} daily buckets, peak hour {}",
        table.len(),
        summaries.len(),
        daily_totals.len(),
        headline.peak_hour
    );

    Some(CampusAnalysis {
        daily_totals,
        summaries,
        headline,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
