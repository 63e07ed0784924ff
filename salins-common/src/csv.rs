//! CSV ingestion and validation
//!
//! Turns the raw text of one uploaded file into an ordered sequence of typed
//! [`CompensationRecord`]s. Parsing is all-or-nothing: the first invalid row
//! aborts the whole upload and no partial record set escapes to downstream
//! components.
//!
//! Known limitation: there is no quoted-field escaping, so a field value
//! containing a literal comma is not supported.

use crate::error::{Error, Result};
use crate::record::CompensationRecord;
use std::collections::{HashMap, HashSet};

/// Required header columns; extra/unknown columns are tolerated and ignored,
/// and column order does not matter.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "employeeId",
    "name",
    "department",
    "baseSalary",
    "bonus",
    "deductions",
    "period",
];

/// Positions of the required columns within a validated header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    employee_id: usize,
    name: usize,
    department: usize,
    base_salary: usize,
    bonus: usize,
    deductions: usize,
    period: usize,
}

impl ColumnIndex {
    /// Validate the header row and resolve every required column position
    fn from_header(header: &str) -> Result<Self> {
        let positions: HashMap<&str, usize> = header
            .split(',')
            .map(str::trim)
            .enumerate()
            .map(|(i, column)| (column, i))
            .collect();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !positions.contains_key(column))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Schema(missing.join(", ")));
        }

        Ok(Self {
            employee_id: positions["employeeId"],
            name: positions["name"],
            department: positions["department"],
            base_salary: positions["baseSalary"],
            bonus: positions["bonus"],
            deductions: positions["deductions"],
            period: positions["period"],
        })
    }
}

/// One data row with its required fields resolved but not yet converted
///
/// Field extraction and type conversion are kept as separate steps so that a
/// missing cell is rejected up front rather than surfacing later as a bad
/// parse of the wrong column.
struct RawRow<'a> {
    row: usize,
    employee_id: &'a str,
    name: &'a str,
    department: &'a str,
    base_salary: &'a str,
    bonus: &'a str,
    deductions: &'a str,
    period: &'a str,
}

impl<'a> RawRow<'a> {
    fn from_line(line: &'a str, row: usize, columns: ColumnIndex) -> Result<Self> {
        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |index: usize, column: &str| -> Result<&'a str> {
            values.get(index).copied().ok_or_else(|| Error::Format {
                row,
                message: format!("missing value for column \"{}\"", column),
            })
        };

        Ok(Self {
            row,
            employee_id: field(columns.employee_id, "employeeId")?,
            name: field(columns.name, "name")?,
            department: field(columns.department, "department")?,
            base_salary: field(columns.base_salary, "baseSalary")?,
            bonus: field(columns.bonus, "bonus")?,
            deductions: field(columns.deductions, "deductions")?,
            period: field(columns.period, "period")?,
        })
    }

    /// Convert required text fields and numeric fields into a typed record
    fn into_record(self) -> Result<CompensationRecord> {
        let base_salary = parse_amount(self.base_salary, "baseSalary", self.row)?;
        let bonus = parse_amount(self.bonus, "bonus", self.row)?;
        let deductions = parse_amount(self.deductions, "deductions", self.row)?;

        Ok(CompensationRecord::new(
            require_text(self.employee_id, "employeeId", self.row)?,
            require_text(self.name, "name", self.row)?,
            require_text(self.department, "department", self.row)?,
            require_text(self.period, "period", self.row)?,
            base_salary,
            bonus,
            deductions,
        ))
    }
}

/// Reject empty required text fields
fn require_text(value: &str, column: &str, row: usize) -> Result<String> {
    if value.is_empty() {
        return Err(Error::Format {
            row,
            message: format!("column \"{}\" must not be empty", column),
        });
    }
    Ok(value.to_string())
}

/// Parse a plain decimal numeral (optionally signed) into a finite f64
///
/// Currency symbols, thousands separators, scientific notation, and locale
/// formats are all rejected.
fn parse_amount(value: &str, column: &str, row: usize) -> Result<f64> {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    let plain_decimal =
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit() || c == '.');

    let parsed = if plain_decimal {
        value.parse::<f64>().ok().filter(|v| v.is_finite())
    } else {
        None
    };

    parsed.ok_or_else(|| Error::Format {
        row,
        message: format!("column \"{}\" is not a number: \"{}\"", column, value),
    })
}

/// Parse one CSV file's text content into an ordered record sequence
///
/// Lines are split on either `\n` or `\r\n`; blank (whitespace-only) lines
/// are discarded. The first remaining line is the header. Row numbers in
/// error messages are 1-indexed physical lines, so the first data row is
/// row 2. A header-only file yields an empty sequence, not an error.
///
/// A duplicate `employeeId` rejects the batch at the offending row.
pub fn parse_records(text: &str) -> Result<Vec<CompensationRecord>> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| Error::Schema(REQUIRED_COLUMNS.join(", ")))?;
    let columns = ColumnIndex::from_header(header)?;

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut records = Vec::new();
    for (index, line) in lines.enumerate() {
        let row = index + 2;
        let record = RawRow::from_line(line, row, columns)?.into_record()?;

        if !seen_ids.insert(record.employee_id.clone()) {
            return Err(Error::Format {
                row,
                message: format!("duplicate employeeId \"{}\"", record.employee_id),
            });
        }
        records.push(record);
    }

    tracing::debug!(records = records.len(), "Parsed CSV batch");
    Ok(records)
}
