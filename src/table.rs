//! Typed tabular representation of the energy-balance dataset.

use chrono::NaiveDateTime;

/// One source row: a subsystem's measurements for one instant, in MWh.
///
/// A numeric field is `None` when the source value was non-numeric; the
/// rest of the row is unaffected. The subsystem display name is never
/// stored here, it is derived via [`crate::catalog::display_name`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRecord {
    pub subsystem_id: String,
    pub timestamp: NaiveDateTime,
    pub hydro_mwh: Option<f64>,
    pub thermal_mwh: Option<f64>,
    pub wind_mwh: Option<f64>,
    pub solar_mwh: Option<f64>,
    pub load_mwh: Option<f64>,
    pub exchange_mwh: Option<f64>,
}

/// Ordered collection of [`EnergyRecord`]s, one per source row.
///
/// Source row order is preserved; no deduplication, no sorting.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EnergyTable {
    rows: Vec<EnergyRecord>,
}

impl EnergyTable {
    pub fn new(rows: Vec<EnergyRecord>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[EnergyRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct subsystem codes in first-appearance order.
    ///
    /// The first entry is the default selection for interactive use.
    pub fn subsystems(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !codes.contains(&row.subsystem_id.as_str()) {
                codes.push(row.subsystem_id.as_str());
            }
        }
        codes
    }
}
