//! Consumption aggregation over buildings, calendar days and hours.
//!
//! Every function here is a pure function of the [`UnifiedTable`]; nothing is
//! cached, so results are recomputed whenever the table changes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use energy_core::models::{Building, BuildingSummary, DailyTotal, UnifiedTable};

// ── ReadingStats ──────────────────────────────────────────────────────────────

/// Running statistics accumulated across readings.
#[derive(Debug, Clone, Copy)]
pub struct ReadingStats {
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Default for ReadingStats {
    fn default() -> Self {
        Self {
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }
}

impl ReadingStats {
    pub fn add(&mut self, kwh: f64) {
        self.sum += kwh;
        self.min = self.min.min(kwh);
        self.max = self.max.max(kwh);
        self.count += 1;
    }

    /// Arithmetic mean, or `None` when no reading was added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ── ConsumptionAggregator ─────────────────────────────────────────────────────

/// Stateless helper that groups unified-table rows by building and time.
pub struct ConsumptionAggregator;

impl ConsumptionAggregator {
    /// Resample each building's readings to calendar-day totals.
    ///
    /// Every day between the building's first and last reading appears,
    /// with `0.0` for days that have no readings. Output is grouped by
    /// building (table order) and sorted by day within a building.
    pub fn daily_totals(table: &UnifiedTable) -> Vec<DailyTotal> {
        table
            .buildings()
            .flat_map(|building| Self::building_daily_totals(&building))
            .collect()
    }

    /// Daily totals for a single building, zero-filled across its range.
    pub fn building_daily_totals(building: &Building<'_>) -> Vec<DailyTotal> {
        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for reading in building.readings() {
            *per_day.entry(reading.day()).or_insert(0.0) += reading.kwh;
        }

        let (Some(&first), Some(&last)) = (per_day.keys().next(), per_day.keys().next_back())
        else {
            return Vec::new();
        };

        first
            .iter_days()
            .take_while(|day| *day <= last)
            .map(|day| DailyTotal {
                building: building.name().to_string(),
                day,
                kwh_sum: per_day.get(&day).copied().unwrap_or(0.0),
            })
            .collect()
    }

    /// Mean, min, max and sum of kWh for every building with readings,
    /// in table order.
    pub fn building_summaries(table: &UnifiedTable) -> Vec<BuildingSummary> {
        let mut stats = vec![ReadingStats::default(); table.building_count()];
        for record in table.records() {
            stats[record.building.index()].add(record.kwh);
        }

        table
            .buildings()
            .zip(stats)
            .filter_map(|(building, s)| {
                let mean = s.mean()?;
                Some(BuildingSummary {
                    building: building.name().to_string(),
                    mean,
                    min: s.min,
                    max: s.max,
                    sum: s.sum,
                    readings: s.count,
                })
            })
            .collect()
    }

    /// Summed kWh per hour of day across all buildings and days.
    ///
    /// Index `h` holds the total for hour `h`, or `None` when no reading
    /// fell in that hour.
    pub fn hourly_totals(table: &UnifiedTable) -> [Option<f64>; 24] {
        let mut hours = [None; 24];
        for record in table.records() {
            let slot: &mut Option<f64> = &mut hours[record.hour() as usize];
            *slot = Some(slot.unwrap_or(0.0) + record.kwh);
        }
        hours
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
