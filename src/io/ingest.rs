//! CSV ingest and normalization.
//!
//! Turns a nuclear-test CSV into typed `ExplosionRecord`s.
//!
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation**: rows whose year does not parse are skipped and
//!   reported; every other field is optional and carried as absent
//! - **No judgement**: out-of-range years, unknown codes and inconsistent
//!   yields are kept as-is and flagged later by the anomaly scan

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::domain::{Country, ExplosionRecord, Purpose, TestType};
use crate::error::AppError;

/// Row errors logged individually before switching to a summary line.
const LOGGED_ROW_ERRORS: usize = 10;

/// A logical input column and the header names accepted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    /// Header as it appears in the published dataset.
    pub canonical: &'static str,
    pub required: bool,
}

pub const COLUMNS: [Column; 13] = [
    Column { name: "country", canonical: "Location.Country", required: true },
    Column { name: "region", canonical: "Location.Region", required: false },
    Column { name: "year", canonical: "Date.Year", required: true },
    Column { name: "month", canonical: "Date.Month", required: false },
    Column { name: "day", canonical: "Date.Day", required: false },
    Column { name: "latitude", canonical: "Location.Cordinates.Latitude", required: false },
    Column { name: "longitude", canonical: "Location.Cordinates.Longitude", required: false },
    Column { name: "depth", canonical: "Location.Cordinates.Depth", required: false },
    Column { name: "yield_lower", canonical: "Data.Yeild.Lower", required: false },
    Column { name: "yield_upper", canonical: "Data.Yeild.Upper", required: false },
    Column { name: "purpose", canonical: "Data.Purpose", required: false },
    Column { name: "type", canonical: "Data.Type", required: false },
    Column { name: "name", canonical: "Data.Name", required: true },
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub name: Option<String>,
    pub message: String,
}

/// Ingest output: typed records plus what was skipped and why.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<ExplosionRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load records from a CSV file.
pub fn load_records(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_records(file)?;
    info!(
        path = %path.display(),
        rows_read = data.rows_read,
        rows_used = data.rows_used,
        row_errors = data.row_errors.len(),
        "loaded dataset"
    );
    Ok(data)
}

/// Parse records from any CSV source.
pub fn read_records(source: impl Read) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let columns = resolve_columns(&headers)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let outcome = result
            .map_err(|e| (None, format!("CSV parse error: {e}")))
            .and_then(|row| parse_row(&row, &columns));

        match outcome {
            Ok(record) => records.push(record),
            Err((name, message)) => {
                if row_errors.len() < LOGGED_ROW_ERRORS {
                    warn!(line, name = name.as_deref().unwrap_or(""), "skipping row: {message}");
                }
                row_errors.push(RowError { line, name, message });
            }
        }
    }

    if row_errors.len() > LOGGED_ROW_ERRORS {
        warn!(total = row_errors.len(), "further row errors not logged individually");
    }

    let rows_used = records.len();
    if rows_used == 0 {
        return Err(AppError::new(3, "No valid rows remain after parsing the CSV."));
    }

    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Map each logical column to its index in the file.
fn resolve_columns(headers: &StringRecord) -> Result<HashMap<&'static str, usize>, AppError> {
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect();

    let mut out = HashMap::new();
    for col in COLUMNS {
        let found = [col.canonical.to_ascii_lowercase(), col.name.to_string()]
            .iter()
            .find_map(|h| header_map.get(h).copied());
        match found {
            Some(idx) => {
                out.insert(col.name, idx);
            }
            None if col.required => {
                return Err(AppError::new(
                    2,
                    format!("Missing required column: `{}` (or `{}`)", col.canonical, col.name),
                ));
            }
            None => debug!(column = col.name, "optional column absent"),
        }
    }
    Ok(out)
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

type RowFailure = (Option<String>, String);

fn parse_row(record: &StringRecord, columns: &HashMap<&'static str, usize>) -> Result<ExplosionRecord, RowFailure> {
    let get = |name: &str| -> Option<&str> {
        let idx = columns.get(name)?;
        record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
    };

    let name = get("name").unwrap_or("").to_string();
    let year = get("year")
        .ok_or_else(|| "Missing required value: `year`".to_string())
        .and_then(parse_year)
        .map_err(|message| (Some(name.clone()).filter(|n| !n.is_empty()), message))?;

    Ok(ExplosionRecord {
        country: Country::parse(get("country").unwrap_or("")),
        region: get("region").unwrap_or("").to_string(),
        year,
        month: parse_calendar_field(get("month")),
        day: parse_calendar_field(get("day")),
        latitude: parse_opt_f64(get("latitude")),
        longitude: parse_opt_f64(get("longitude")),
        depth: parse_opt_f64(get("depth")),
        yield_lower: parse_opt_f64(get("yield_lower")),
        yield_upper: parse_opt_f64(get("yield_upper")),
        purpose: Purpose::parse(get("purpose").unwrap_or("")),
        test_type: TestType::parse(get("type").unwrap_or("")),
        name,
    })
}

/// Whole-number years; spreadsheet exports sometimes write `1962.0`.
fn parse_year(s: &str) -> Result<i32, String> {
    if let Ok(y) = s.parse::<i32>() {
        return Ok(y);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e6 => Ok(v as i32),
        _ => Err(format!("Invalid year '{s}'")),
    }
}

/// Month/day; 0 when absent or unparseable.
fn parse_calendar_field(s: Option<&str>) -> u32 {
    s.and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= 31.0)
        .map(|v| v as u32)
        .unwrap_or(0)
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET_CSV: &str = "\u{feff}Location.Country,Location.Region,Date.Year,Date.Month,Date.Day,\
Location.Cordinates.Latitude,Location.Cordinates.Longitude,Data.Magnitude.Body,Location.Cordinates.Depth,\
Data.Yeild.Lower,Data.Yeild.Upper,Data.Purpose,Data.Name,Data.Type
USA,ALAMOGORDO,1945,7,16,32.54,-105.57,0,-0.1,21,21,Wr,TRINITY,Tower
USSR,SEMI KAZAKH,1949,8,29,48,76,0,-0.1,22,22,Wr,SOVIET TEST,Surface
PAKIST,CHAGAI,1998,5,28,28.9,64.89,0,0,,,Wr,,Ug
USA,NTS,nineteen,1,1,37,-116,0,0,1,1,Wr,BAD,Shaft
";

    #[test]
    fn reads_dataset_headers() {
        let data = read_records(DATASET_CSV.as_bytes()).unwrap();
        assert_eq!(data.rows_read, 4);
        assert_eq!(data.rows_used, 3);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 5);
        assert_eq!(data.row_errors[0].name.as_deref(), Some("BAD"));

        let trinity = &data.records[0];
        assert_eq!(trinity.country, Country::Usa);
        assert_eq!(trinity.year, 1945);
        assert_eq!((trinity.month, trinity.day), (7, 16));
        assert_eq!(trinity.representative_yield(), Some(21.0));
        assert_eq!(trinity.test_type, TestType::Tower);
        assert_eq!(trinity.purpose, Purpose::WeaponsResearch);

        let chagai = &data.records[2];
        assert_eq!(chagai.country, Country::Pakistan);
        assert_eq!(chagai.yield_lower, None);
        assert_eq!(chagai.test_type, TestType::Underground);
        assert_eq!(chagai.name, "");
    }

    #[test]
    fn accepts_short_aliases() {
        let csv = "country,year,name,yield_upper,type\nUK,1957,GRAPPLE X,700,Airdrop\n";
        let data = read_records(csv.as_bytes()).unwrap();
        let r = &data.records[0];
        assert_eq!(r.country, Country::Uk);
        assert_eq!(r.yield_upper, Some(700.0));
        assert_eq!(r.yield_lower, None);
        assert_eq!(r.region, "");
        assert_eq!(r.month, 0);
    }

    #[test]
    fn missing_required_column_is_exit_code_2() {
        let err = read_records("country,name\nUSA,A\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Date.Year"));
    }

    #[test]
    fn no_usable_rows_is_exit_code_3() {
        let err = read_records("country,year,name\nUSA,,A\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year("1962"), Ok(1962));
        assert_eq!(parse_year("1962.0"), Ok(1962));
        assert!(parse_year("1962.5").is_err());
        assert_eq!(parse_calendar_field(Some("12")), 12);
        assert_eq!(parse_calendar_field(Some("x")), 0);
    }
}
