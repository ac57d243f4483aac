//! CSV parser for the ONS energy-balance dataset.
//!
//! The published file is semicolon-separated UTF-8 with nine columns in a
//! fixed position order: subsystem id, subsystem name, instant, hydro,
//! thermal, wind, solar, load, exchange. The header row is validated for
//! column count and discarded; records are read positionally.

use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::ParseError;
use crate::table::{EnergyRecord, EnergyTable};

/// Column count of the published dataset.
pub const COLUMN_COUNT: usize = 9;

/// Fixed parse rule for the `din_instante` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const COL_SUBSYSTEM_ID: usize = 0;
// position 1 holds the subsystem name; derived via the catalog instead
const COL_TIMESTAMP: usize = 2;
const COL_HYDRO: usize = 3;
const COL_THERMAL: usize = 4;
const COL_WIND: usize = 5;
const COL_SOLAR: usize = 6;
const COL_LOAD: usize = 7;
const COL_EXCHANGE: usize = 8;

/// Parses raw dataset bytes into an [`EnergyTable`].
///
/// A record with the wrong column count fails the whole parse rather than
/// silently misassigning fields, and so does an unparseable timestamp.
/// A non-numeric measurement only blanks that one field.
///
/// # Errors
///
/// Returns [`ParseError::Schema`] on a column-count mismatch,
/// [`ParseError::Timestamp`] on a bad instant, or [`ParseError::Csv`] if
/// the bytes are not readable as CSV at all.
pub fn parse_table(bytes: &[u8]) -> Result<EnergyTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.len() != COLUMN_COUNT {
        return Err(ParseError::Schema {
            record: 1,
            expected: COLUMN_COUNT,
            found: headers.len(),
        });
    }

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let line = i as u64 + 2; // 1-based, header is record 1

        if record.len() != COLUMN_COUNT {
            return Err(ParseError::Schema {
                record: line,
                expected: COLUMN_COUNT,
                found: record.len(),
            });
        }

        let raw_instant = &record[COL_TIMESTAMP];
        let timestamp = NaiveDateTime::parse_from_str(raw_instant, TIMESTAMP_FORMAT).map_err(
            |_| ParseError::Timestamp {
                record: line,
                value: raw_instant.to_string(),
            },
        )?;

        rows.push(EnergyRecord {
            subsystem_id: record[COL_SUBSYSTEM_ID].to_string(),
            timestamp,
            hydro_mwh: coerce_numeric(&record[COL_HYDRO]),
            thermal_mwh: coerce_numeric(&record[COL_THERMAL]),
            wind_mwh: coerce_numeric(&record[COL_WIND]),
            solar_mwh: coerce_numeric(&record[COL_SOLAR]),
            load_mwh: coerce_numeric(&record[COL_LOAD]),
            exchange_mwh: coerce_numeric(&record[COL_EXCHANGE]),
        });
    }

    debug!(rows = rows.len(), "Dataset parsed");
    Ok(EnergyTable::new(rows))
}

/// `None` when the text is not a number; the row itself survives.
fn coerce_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id_subsistema;nom_subsistema;din_instante;val_gerhidraulica;val_gertermica;val_gereolica;val_gersolar;val_carga;val_intercambio";

    fn csv_with_rows(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.into_bytes()
    }

    #[test]
    fn test_row_count_matches_input_minus_header() {
        let bytes = csv_with_rows(&[
            "NE;NORDESTE;2023-01-01 00:00:00;3011.45;655.21;7590.76;0.0;10354.55;902.87",
            "SE;SUDESTE;2023-01-01 00:00:00;25000.1;3000.2;100.0;50.5;30000.0;-1500.0",
            "NE;NORDESTE;2023-01-01 01:00:00;2990.00;640.10;7600.00;0.0;10200.00;880.00",
        ]);

        let table = parse_table(&bytes).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_source_row_order_preserved() {
        let bytes = csv_with_rows(&[
            "S;SUL;2023-06-01 10:00:00;1.0;2.0;3.0;4.0;5.0;6.0",
            "N;NORTE;2023-06-01 10:00:00;7.0;8.0;9.0;10.0;11.0;12.0",
        ]);

        let table = parse_table(&bytes).unwrap();
        assert_eq!(table.rows()[0].subsystem_id, "S");
        assert_eq!(table.rows()[1].subsystem_id, "N");
        assert_eq!(table.rows()[0].hydro_mwh, Some(1.0));
        assert_eq!(table.rows()[1].exchange_mwh, Some(12.0));
    }

    #[test]
    fn test_non_numeric_field_becomes_missing_not_fatal() {
        let bytes =
            csv_with_rows(&["NE;NORDESTE;2023-01-01 00:00:00;abc;655.21;;0.0;10354.55;902.87"]);

        let table = parse_table(&bytes).unwrap();
        let row = &table.rows()[0];
        assert_eq!(row.hydro_mwh, None);
        assert_eq!(row.wind_mwh, None);
        // neighbors of the bad fields are untouched
        assert_eq!(row.thermal_mwh, Some(655.21));
        assert_eq!(row.load_mwh, Some(10354.55));
    }

    #[test]
    fn test_header_with_wrong_column_count_is_schema_error() {
        let bytes = b"id_subsistema;din_instante;val_carga\nNE;2023-01-01 00:00:00;10.0".to_vec();

        match parse_table(&bytes) {
            Err(ParseError::Schema {
                record,
                expected,
                found,
            }) => {
                assert_eq!(record, 1);
                assert_eq!(expected, COLUMN_COUNT);
                assert_eq!(found, 3);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_short_record_is_schema_error() {
        let bytes = csv_with_rows(&[
            "NE;NORDESTE;2023-01-01 00:00:00;1.0;2.0;3.0;4.0;5.0;6.0",
            "SE;SUDESTE;2023-01-01 00:00:00;1.0;2.0",
        ]);

        match parse_table(&bytes) {
            Err(ParseError::Schema { record, found, .. }) => {
                assert_eq!(record, 3);
                assert_eq!(found, 5);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_timestamp_aborts_parse() {
        let bytes = csv_with_rows(&[
            "NE;NORDESTE;2023-01-01 00:00:00;1.0;2.0;3.0;4.0;5.0;6.0",
            "NE;NORDESTE;01/02/2023 00:00;1.0;2.0;3.0;4.0;5.0;6.0",
        ]);

        match parse_table(&bytes) {
            Err(ParseError::Timestamp { record, value }) => {
                assert_eq!(record, 3);
                assert_eq!(value, "01/02/2023 00:00");
            }
            other => panic!("expected timestamp error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_after_header() {
        let table = parse_table(&csv_with_rows(&[])).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_negative_exchange_parses() {
        let bytes =
            csv_with_rows(&["SIN;SIN;2023-03-15 12:00:00;100.0;50.0;25.0;10.0;180.0;-42.5"]);

        let table = parse_table(&bytes).unwrap();
        assert_eq!(table.rows()[0].exchange_mwh, Some(-42.5));
    }
}
