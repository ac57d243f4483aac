//! Presentation-facing formatting and persistence for balance summaries.
//!
//! Renders the summary table and the chart series as text, and supports
//! JSON serialization and CSV append of timestamped records.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::balance::BalanceSummary;
use crate::catalog;

/// Formats an MWh quantity with thousands separators and two decimals,
/// e.g. `1234567.891` becomes `1,234,567.89`.
pub fn format_mwh(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Rows of the summary table: the four generation categories, total
/// generation, and load, each formatted in MWh.
pub fn summary_rows(summary: &BalanceSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Geração Hidráulica", format_mwh(summary.hydro_mwh)),
        ("Geração Térmica", format_mwh(summary.thermal_mwh)),
        ("Geração Eólica", format_mwh(summary.wind_mwh)),
        ("Geração Solar", format_mwh(summary.solar_mwh)),
        ("Total da Geração", format_mwh(summary.total_generation_mwh())),
        ("Carga", format_mwh(summary.load_mwh)),
    ]
}

/// Renders the summary table as aligned text.
pub fn render_summary(summary: &BalanceSummary) -> String {
    let rows = summary_rows(summary);
    let value_width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

    let mut out = format!(
        "Resumo para {}\n",
        catalog::display_name(&summary.subsystem_id)
    );
    for (label, value) in &rows {
        out.push_str(&format!("{label:<20} {value:>value_width$} MWh\n"));
    }
    out
}

/// Renders the generation mix with percentage labels, the text
/// counterpart of the mix pie and per-category bar charts.
pub fn render_mix(summary: &BalanceSummary) -> String {
    let mut out = String::from("Geração por tipo\n");
    for (label, mwh, share) in summary.generation_mix() {
        out.push_str(&format!(
            "{label:<12} {:>16} MWh  {:>5.1}%\n",
            format_mwh(mwh),
            share * 100.0
        ));
    }
    out
}

/// Renders generation, load, and exchange with absolute-value labels.
pub fn render_balance(summary: &BalanceSummary) -> String {
    let mut out = String::from("Geração, Carga e Intercâmbio\n");
    for (label, mwh) in summary.balance() {
        out.push_str(&format!("{label:<12} {:>16} MWh\n", format_mwh(mwh)));
    }
    out
}

/// A timestamped, display-ready summary row for CSV and JSON output.
#[derive(Debug, Serialize)]
pub struct SummaryRecord {
    pub generated_at: DateTime<Utc>,
    pub subsystem_id: String,
    pub subsystem_name: String,
    pub rows_matched: usize,
    pub hydro_mwh: f64,
    pub thermal_mwh: f64,
    pub wind_mwh: f64,
    pub solar_mwh: f64,
    pub total_generation_mwh: f64,
    pub load_mwh: f64,
    pub exchange_mwh: f64,
    pub hydro_share: f64,
    pub thermal_share: f64,
    pub wind_share: f64,
    pub solar_share: f64,
}

impl SummaryRecord {
    pub fn new(summary: &BalanceSummary) -> Self {
        Self {
            generated_at: Utc::now(),
            subsystem_id: summary.subsystem_id.clone(),
            subsystem_name: catalog::display_name(&summary.subsystem_id).to_string(),
            rows_matched: summary.rows_matched,
            hydro_mwh: summary.hydro_mwh,
            thermal_mwh: summary.thermal_mwh,
            wind_mwh: summary.wind_mwh,
            solar_mwh: summary.solar_mwh,
            total_generation_mwh: summary.total_generation_mwh(),
            load_mwh: summary.load_mwh,
            exchange_mwh: summary.exchange_mwh,
            hydro_share: summary.hydro_share(),
            thermal_share: summary.thermal_share(),
            wind_share: summary.wind_share(),
            solar_share: summary.solar_share(),
        }
    }
}

/// Appends a [`SummaryRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &SummaryRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_summary() -> BalanceSummary {
        BalanceSummary {
            subsystem_id: "NE".to_string(),
            rows_matched: 3,
            hydro_mwh: 1234567.891,
            thermal_mwh: 655.21,
            wind_mwh: 7590.76,
            solar_mwh: 0.0,
            load_mwh: 10354.55,
            exchange_mwh: -902.87,
        }
    }

    #[test]
    fn test_format_mwh_groups_thousands() {
        assert_eq!(format_mwh(0.0), "0.00");
        assert_eq!(format_mwh(999.999), "1,000.00");
        assert_eq!(format_mwh(1234.5), "1,234.50");
        assert_eq!(format_mwh(1234567.891), "1,234,567.89");
    }

    #[test]
    fn test_format_mwh_negative() {
        assert_eq!(format_mwh(-902.87), "-902.87");
        assert_eq!(format_mwh(-1500000.0), "-1,500,000.00");
    }

    #[test]
    fn test_summary_rows_order_and_total() {
        let rows = summary_rows(&sample_summary());

        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].0, "Geração Hidráulica");
        assert_eq!(rows[4], ("Total da Geração", "1,242,813.86".to_string()));
        assert_eq!(rows[5], ("Carga", "10,354.55".to_string()));
    }

    #[test]
    fn test_render_summary_uses_display_name() {
        let text = render_summary(&sample_summary());
        assert!(text.contains("Nordeste"));
        assert!(text.contains("1,234,567.89"));
    }

    #[test]
    fn test_render_balance_includes_exchange() {
        let text = render_balance(&sample_summary());
        assert!(text.contains("Intercâmbio"));
        assert!(text.contains("-902.87"));
    }

    #[test]
    fn test_summary_record_derives_fields() {
        let record = SummaryRecord::new(&sample_summary());
        assert_eq!(record.subsystem_name, "Nordeste");
        assert_eq!(record.total_generation_mwh, 1234567.891 + 655.21 + 7590.76);
        assert!((record.hydro_share + record.thermal_share + record.wind_share
            + record.solar_share
            - 1.0)
            .abs()
            < 1e-9);
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("ons_balance_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        let record = SummaryRecord::new(&sample_summary());
        append_record(&path, &record).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("ons_balance_test_header.csv");
        let _ = fs::remove_file(&path);

        let record = SummaryRecord::new(&sample_summary());
        append_record(&path, &record).unwrap();
        append_record(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content
            .lines()
            .filter(|l| l.contains("generated_at"))
            .count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_two_rows() {
        let path = temp_path("ons_balance_test_rows.csv");
        let _ = fs::remove_file(&path);

        let record = SummaryRecord::new(&sample_summary());
        append_record(&path, &record).unwrap();
        append_record(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // 1 header + 2 data rows
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        fs::remove_file(&path).unwrap();
    }
}
