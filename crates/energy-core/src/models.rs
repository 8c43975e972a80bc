use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single meter sample: local wall-clock time and the energy consumed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    /// Local wall-clock instant of the sample.
    pub timestamp: NaiveDateTime,
    /// Energy consumed, in kilowatt-hours.
    pub kwh: f64,
}

impl MeterReading {
    pub fn new(timestamp: NaiveDateTime, kwh: f64) -> Self {
        Self { timestamp, kwh }
    }

    /// Hour of day (0-23) of the local timestamp.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Calendar day the reading falls on.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Index of a building inside a [`UnifiedTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuildingId(usize);

impl BuildingId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One row of the unified table: a reading tagged with its building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnifiedRecord {
    pub timestamp: NaiveDateTime,
    pub kwh: f64,
    pub building: BuildingId,
}

impl UnifiedRecord {
    pub fn reading(&self) -> MeterReading {
        MeterReading::new(self.timestamp, self.kwh)
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// Flattened table of every validated reading from one ingestion run.
///
/// Rows live in a single arena; buildings are a name list plus a lookup
/// from name to [`BuildingId`]. Building order is the order in which
/// buildings were first inserted.
#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    records: Vec<UnifiedRecord>,
    names: Vec<String>,
    lookup: HashMap<String, BuildingId>,
}

impl UnifiedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all `readings` for `name`, preserving their order.
    ///
    /// If `name` already exists its previous rows are dropped first
    /// (last write wins) and the building keeps its original position.
    /// Returns `true` when an existing building was replaced.
    pub fn insert_building(
        &mut self,
        name: impl Into<String>,
        readings: impl IntoIterator<Item = MeterReading>,
    ) -> bool {
        let name = name.into();
        let (id, replaced) = match self.lookup.get(&name) {
            Some(&id) => {
                self.records.retain(|r| r.building != id);
                (id, true)
            }
            None => {
                let id = BuildingId(self.names.len());
                self.names.push(name.clone());
                self.lookup.insert(name, id);
                (id, false)
            }
        };

        self.records
            .extend(readings.into_iter().map(|r| UnifiedRecord {
                timestamp: r.timestamp,
                kwh: r.kwh,
                building: id,
            }));
        replaced
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows across all buildings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[UnifiedRecord] {
        &self.records
    }

    pub fn building_count(&self) -> usize {
        self.names.len()
    }

    /// Name of the building behind `id`.
    ///
    /// # Panics
    /// When `id` was not issued by this table.
    pub fn building_name(&self, id: BuildingId) -> &str {
        &self.names[id.0]
    }

    pub fn building_id(&self, name: &str) -> Option<BuildingId> {
        self.lookup.get(name).copied()
    }

    pub fn building(&self, name: &str) -> Option<Building<'_>> {
        self.building_id(name).map(|id| Building { id, table: self })
    }

    /// All buildings in insertion order.
    pub fn buildings(&self) -> impl Iterator<Item = Building<'_>> {
        (0..self.names.len()).map(move |i| Building {
            id: BuildingId(i),
            table: self,
        })
    }

    /// Sum of kWh over every row.
    pub fn total_kwh(&self) -> f64 {
        self.records.iter().map(|r| r.kwh).sum()
    }
}

/// Borrowed view of one building's readings inside a [`UnifiedTable`].
#[derive(Debug, Clone, Copy)]
pub struct Building<'a> {
    id: BuildingId,
    table: &'a UnifiedTable,
}

impl<'a> Building<'a> {
    pub fn name(&self) -> &'a str {
        self.table.building_name(self.id)
    }

    /// Readings in input row order.
    pub fn readings(&self) -> impl Iterator<Item = MeterReading> + 'a {
        let id = self.id;
        self.table
            .records
            .iter()
            .filter(move |r| r.building == id)
            .map(UnifiedRecord::reading)
    }

    pub fn reading_count(&self) -> usize {
        self.readings().count()
    }
}

/// Summed consumption for one building on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub building: String,
    pub day: NaiveDate,
    pub kwh_sum: f64,
}

/// Descriptive statistics over all readings of one building.
///
/// Serialises as `Building,mean,min,max,sum`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSummary {
    #[serde(rename = "Building")]
    pub building: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    #[serde(skip)]
    pub readings: usize,
}

/// Campus-wide headline numbers for the executive summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CampusHeadline {
    /// Sum of kWh over the whole unified table.
    pub total_kwh: f64,
    /// Building with the largest summed consumption.
    pub top_building: String,
    /// Hour of day (0-23) with the largest summed consumption.
    pub peak_hour: u32,
    /// Number of buildings summarised.
    pub building_count: usize,
}
