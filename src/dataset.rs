use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use crate::error::{ReportError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
  AdSpend,
  Installs,
  Payouts,
  Revenue,
}

impl Dataset {
  pub fn file_name(&self) -> &'static str {
    match self {
      Dataset::AdSpend => "adspend.csv",
      Dataset::Installs => "installs.csv",
      Dataset::Payouts => "payouts.csv",
      Dataset::Revenue => "revenue.csv",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Dataset::AdSpend => "Ads Spend",
      Dataset::Installs => "Installs",
      Dataset::Payouts => "Payouts",
      Dataset::Revenue => "Revenue",
    }
  }
}

impl fmt::Display for Dataset {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.label(), self.file_name())
  }
}

pub trait Dated {
  fn event_date(&self) -> NaiveDate;
}

/// A dated monetary row (ad spend, payout or revenue).
#[derive(Debug, Clone, PartialEq)]
pub struct AmountRecord {
  pub event_date: NaiveDate,
  pub value_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRecord {
  pub event_date: NaiveDate,
  pub country_id: u32,
  pub app_id: u32,
}

impl Dated for AmountRecord {
  fn event_date(&self) -> NaiveDate {
    self.event_date
  }
}

impl Dated for InstallRecord {
  fn event_date(&self) -> NaiveDate {
    self.event_date
  }
}

fn normalize_header_name(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  let mut last_was_sep = false;
  for ch in input.trim().trim_start_matches('\u{feff}').chars() {
    if ch.is_ascii_alphanumeric() {
      out.push(ch.to_ascii_lowercase());
      last_was_sep = false;
    } else if !last_was_sep {
      out.push('_');
      last_was_sep = true;
    }
  }
  out.trim_matches('_').to_string()
}

/// Resolves required column names to their positions in a CSV header row.
struct Columns {
  dataset: Dataset,
  idx: HashMap<String, usize>,
}

impl Columns {
  fn from_headers(dataset: Dataset, headers: &csv::StringRecord) -> Self {
    let mut idx = HashMap::new();
    for (i, h) in headers.iter().enumerate() {
      idx.entry(normalize_header_name(h)).or_insert(i);
    }
    Self { dataset, idx }
  }

  /// A zero-byte file has no header at all; it loads as an empty table.
  fn is_empty(&self) -> bool {
    self.idx.is_empty()
  }

  fn require(&self, column: &str) -> Result<usize> {
    self.idx.get(column).copied().ok_or_else(|| ReportError::Parse {
      dataset: self.dataset,
      row: 0,
      column: column.to_string(),
      message: "required column is missing from the header".to_string(),
    })
  }
}

fn field<'r>(dataset: Dataset, rec: &'r csv::StringRecord, row: usize, idx: usize, column: &str) -> Result<&'r str> {
  rec.get(idx).map(str::trim).ok_or_else(|| ReportError::Parse {
    dataset,
    row,
    column: column.to_string(),
    message: "field is missing".to_string(),
  })
}

pub fn parse_event_date(dataset: Dataset, row: usize, raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| ReportError::Parse {
    dataset,
    row,
    column: "event_date".to_string(),
    message: format!("expected YYYY-MM-DD, got '{raw}' ({e})"),
  })
}

fn parse_f64_field(dataset: Dataset, row: usize, column: &str, raw: &str) -> Result<f64> {
  raw
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .ok_or_else(|| ReportError::Parse {
      dataset,
      row,
      column: column.to_string(),
      message: format!("expected a decimal number, got '{raw}'"),
    })
}

fn parse_u32_field(dataset: Dataset, row: usize, column: &str, raw: &str) -> Result<u32> {
  raw.parse::<u32>().map_err(|_| ReportError::Parse {
    dataset,
    row,
    column: column.to_string(),
    message: format!("expected a non-negative integer id, got '{raw}'"),
  })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
  csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .trim(csv::Trim::All)
    .from_reader(reader)
}

fn headers<R: Read>(dataset: Dataset, rdr: &mut csv::Reader<R>) -> Result<Columns> {
  let headers = rdr.headers().map_err(|e| ReportError::Parse {
    dataset,
    row: 0,
    column: "*".to_string(),
    message: format!("invalid csv header: {e}"),
  })?;
  Ok(Columns::from_headers(dataset, headers))
}

fn record_error(dataset: Dataset, row: usize, err: csv::Error) -> ReportError {
  ReportError::Parse {
    dataset,
    row,
    column: "*".to_string(),
    message: format!("invalid csv row: {err}"),
  }
}

pub fn read_amount_records<R: Read>(reader: R, dataset: Dataset) -> Result<Vec<AmountRecord>> {
  let mut rdr = csv_reader(reader);
  let cols = headers(dataset, &mut rdr)?;
  if cols.is_empty() {
    return Ok(Vec::new());
  }
  let date_idx = cols.require("event_date")?;
  let value_idx = cols.require("value_usd")?;

  let mut out = Vec::new();
  for (i, rec) in rdr.records().enumerate() {
    let row = i + 1;
    let rec = rec.map_err(|e| record_error(dataset, row, e))?;

    let event_date = parse_event_date(dataset, row, field(dataset, &rec, row, date_idx, "event_date")?)?;
    let value_usd = parse_f64_field(dataset, row, "value_usd", field(dataset, &rec, row, value_idx, "value_usd")?)?;

    out.push(AmountRecord { event_date, value_usd });
  }

  Ok(out)
}

pub fn read_install_records<R: Read>(reader: R) -> Result<Vec<InstallRecord>> {
  let dataset = Dataset::Installs;
  let mut rdr = csv_reader(reader);
  let cols = headers(dataset, &mut rdr)?;
  if cols.is_empty() {
    return Ok(Vec::new());
  }
  let date_idx = cols.require("event_date")?;
  let country_idx = cols.require("country_id")?;
  let app_idx = cols.require("app_id")?;

  let mut out = Vec::new();
  for (i, rec) in rdr.records().enumerate() {
    let row = i + 1;
    let rec = rec.map_err(|e| record_error(dataset, row, e))?;

    let event_date = parse_event_date(dataset, row, field(dataset, &rec, row, date_idx, "event_date")?)?;
    let country_id = parse_u32_field(dataset, row, "country_id", field(dataset, &rec, row, country_idx, "country_id")?)?;
    let app_id = parse_u32_field(dataset, row, "app_id", field(dataset, &rec, row, app_idx, "app_id")?)?;

    out.push(InstallRecord {
      event_date,
      country_id,
      app_id,
    });
  }

  Ok(out)
}

fn open(dataset: Dataset, path: &Path) -> Result<std::fs::File> {
  std::fs::File::open(path).map_err(|source| ReportError::Io { dataset, source })
}

pub fn load_amount_records(path: &Path, dataset: Dataset) -> Result<Vec<AmountRecord>> {
  let records = read_amount_records(open(dataset, path)?, dataset)?;
  tracing::debug!(dataset = %dataset, rows = records.len(), "loaded amount records");
  Ok(records)
}

pub fn load_install_records(path: &Path) -> Result<Vec<InstallRecord>> {
  let records = read_install_records(open(Dataset::Installs, path)?)?;
  tracing::debug!(dataset = %Dataset::Installs, rows = records.len(), "loaded install records");
  Ok(records)
}
