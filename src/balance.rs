//! Per-subsystem aggregation of generation, load, and exchange.

use serde::Serialize;

use crate::table::EnergyTable;

/// Display labels for the four generation categories, in column order.
pub static GENERATION_LABELS: [&str; 4] = ["Hidráulica", "Térmica", "Eólica", "Solar"];

/// Summed energy figures for one subsystem over the whole table, in MWh.
///
/// Sums skip missing values. Construction is pure; nothing here touches
/// the network or the filesystem.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub subsystem_id: String,
    pub rows_matched: usize,

    pub hydro_mwh: f64,
    pub thermal_mwh: f64,
    pub wind_mwh: f64,
    pub solar_mwh: f64,
    pub load_mwh: f64,
    pub exchange_mwh: f64,
}

impl BalanceSummary {
    /// Aggregates every row whose subsystem id equals `code` (exact,
    /// case-sensitive match). No matching rows yields all-zero sums.
    pub fn from_table(table: &EnergyTable, code: &str) -> Self {
        let mut s = BalanceSummary {
            subsystem_id: code.to_string(),
            ..Default::default()
        };

        for row in table.rows() {
            if row.subsystem_id != code {
                continue;
            }

            s.rows_matched += 1;
            s.hydro_mwh += row.hydro_mwh.unwrap_or(0.0);
            s.thermal_mwh += row.thermal_mwh.unwrap_or(0.0);
            s.wind_mwh += row.wind_mwh.unwrap_or(0.0);
            s.solar_mwh += row.solar_mwh.unwrap_or(0.0);
            s.load_mwh += row.load_mwh.unwrap_or(0.0);
            s.exchange_mwh += row.exchange_mwh.unwrap_or(0.0);
        }

        s
    }

    /// Sum of the four generation categories.
    pub fn total_generation_mwh(&self) -> f64 {
        self.hydro_mwh + self.thermal_mwh + self.wind_mwh + self.solar_mwh
    }

    /// `part` as a fraction of `total`. Zero when the total is zero, so a
    /// subsystem with no generation reports all-zero shares rather than
    /// dividing by zero.
    pub fn share(part: f64, total: f64) -> f64 {
        if total == 0.0 { 0.0 } else { part / total }
    }

    pub fn hydro_share(&self) -> f64 {
        Self::share(self.hydro_mwh, self.total_generation_mwh())
    }

    pub fn thermal_share(&self) -> f64 {
        Self::share(self.thermal_mwh, self.total_generation_mwh())
    }

    pub fn wind_share(&self) -> f64 {
        Self::share(self.wind_mwh, self.total_generation_mwh())
    }

    pub fn solar_share(&self) -> f64 {
        Self::share(self.solar_mwh, self.total_generation_mwh())
    }

    /// Per-category `(label, summed MWh, share of total generation)`, the
    /// series behind the mix pie and the per-category bar chart.
    pub fn generation_mix(&self) -> [(&'static str, f64, f64); 4] {
        let total = self.total_generation_mwh();
        let sums = [self.hydro_mwh, self.thermal_mwh, self.wind_mwh, self.solar_mwh];

        [
            (GENERATION_LABELS[0], sums[0], Self::share(sums[0], total)),
            (GENERATION_LABELS[1], sums[1], Self::share(sums[1], total)),
            (GENERATION_LABELS[2], sums[2], Self::share(sums[2], total)),
            (GENERATION_LABELS[3], sums[3], Self::share(sums[3], total)),
        ]
    }

    /// Total generation, load, and exchange: the comparison bar series.
    pub fn balance(&self) -> [(&'static str, f64); 3] {
        [
            ("Total Gerado", self.total_generation_mwh()),
            ("Carga", self.load_mwh),
            ("Intercâmbio", self.exchange_mwh),
        ]
    }
}
