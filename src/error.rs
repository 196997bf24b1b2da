use chrono::NaiveDate;

use crate::dataset::Dataset;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
  #[error("load failed for {dataset}: {source}")]
  Io {
    dataset: Dataset,
    #[source]
    source: std::io::Error,
  },

  #[error("parse failed for {dataset} (row {row}, column {column}): {message}")]
  Parse {
    dataset: Dataset,
    row: usize,
    column: String,
    message: String,
  },

  #[error("summarize failed: series '{series}' has no rows")]
  EmptySeries { series: String },

  #[error("daily profit failed: series '{series}' is not aligned with revenue at {date}")]
  UnalignedSeries { series: String, date: NaiveDate },

  #[error("invalid configuration: {message}")]
  Config { message: String },

  #[error("render failed: {message}")]
  Render { message: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl From<serde_json::Error> for ReportError {
  fn from(err: serde_json::Error) -> Self {
    ReportError::Render {
      message: format!("json serialization error: {err}"),
    }
  }
}
