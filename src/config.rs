use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::asset::DEFAULT_ANIMATION_URL;
use crate::chart::ChartStyle;
use crate::dataset::Dataset;
use crate::error::{ReportError, Result};
use crate::metrics::AlignmentPolicy;

pub const DEFAULT_TITLE: &str = "JustDice Financial Analysis";

#[derive(Debug, Clone, PartialEq)]
pub struct AssetConfig {
  pub enabled: bool,
  pub url: String,
  pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
  pub title: String,
  pub data_dir: PathBuf,
  pub output: PathBuf,
  pub metrics_output: Option<PathBuf>,
  pub alignment: AlignmentPolicy,
  pub asset: AssetConfig,
  pub style: ChartStyle,
}

impl Default for ReportConfig {
  fn default() -> Self {
    Self {
      title: DEFAULT_TITLE.to_string(),
      data_dir: PathBuf::from("."),
      output: PathBuf::from("report.html"),
      metrics_output: None,
      alignment: AlignmentPolicy::default(),
      asset: AssetConfig {
        enabled: true,
        url: DEFAULT_ANIMATION_URL.to_string(),
        timeout: Duration::from_secs(10),
      },
      style: ChartStyle::default(),
    }
  }
}

fn config_error(message: String) -> ReportError {
  ReportError::Config { message }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "1" | "true" | "yes" | "on" => Ok(true),
    "0" | "false" | "no" | "off" => Ok(false),
    other => Err(config_error(format!("{key} expects a boolean, got '{other}'"))),
  }
}

fn parse_timeout_secs(key: &str, raw: &str) -> Result<Duration> {
  let secs = raw
    .trim()
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite() && *v > 0.0)
    .ok_or_else(|| config_error(format!("{key} expects a positive number of seconds, got '{raw}'")))?;
  Ok(Duration::from_secs_f64(secs))
}

fn parse_flag_value(args: &[String], flag: &str) -> Result<Option<String>> {
  let Some(idx) = args.iter().position(|a| a == flag) else {
    return Ok(None);
  };
  match args.get(idx + 1) {
    Some(v) if !v.starts_with("--") => Ok(Some(v.clone())),
    _ => Err(config_error(format!("{flag} expects a value"))),
  }
}

fn non_empty(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ReportConfig {
  pub fn from_env() -> Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds a config from an environment-like lookup; unset keys keep their defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut cfg = Self::default();
    let get = |key: &str| non_empty(lookup(key));

    if let Some(v) = get("REPORT_TITLE") {
      cfg.title = v;
    }
    if let Some(v) = get("REPORT_DATA_DIR") {
      cfg.data_dir = PathBuf::from(v);
    }
    if let Some(v) = get("REPORT_OUTPUT") {
      cfg.output = PathBuf::from(v);
    }
    if let Some(v) = get("REPORT_METRICS_OUTPUT") {
      cfg.metrics_output = Some(PathBuf::from(v));
    }
    if let Some(v) = get("REPORT_ALIGNMENT") {
      cfg.alignment = v.parse()?;
    }
    if let Some(v) = get("REPORT_ASSET_URL") {
      cfg.asset.url = v;
    }
    if let Some(v) = get("REPORT_ASSET_TIMEOUT_SECS") {
      cfg.asset.timeout = parse_timeout_secs("REPORT_ASSET_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = get("REPORT_SKIP_ASSET") {
      cfg.asset.enabled = !parse_bool("REPORT_SKIP_ASSET", &v)?;
    }

    Ok(cfg)
  }

  /// Command-line flags take precedence over the environment.
  pub fn apply_args(mut self, args: &[String]) -> Result<Self> {
    let flag = |name: &str| parse_flag_value(args, name).map(non_empty);

    if let Some(v) = flag("--data-dir")? {
      self.data_dir = PathBuf::from(v);
    }
    if let Some(v) = flag("--output")? {
      self.output = PathBuf::from(v);
    }
    if let Some(v) = flag("--metrics-output")? {
      self.metrics_output = Some(PathBuf::from(v));
    }
    if let Some(v) = flag("--alignment")? {
      self.alignment = v.parse()?;
    }
    if let Some(v) = flag("--asset-url")? {
      self.asset.url = v;
    }
    if let Some(v) = flag("--asset-timeout-secs")? {
      self.asset.timeout = parse_timeout_secs("--asset-timeout-secs", &v)?;
    }
    if args.iter().any(|a| a == "--skip-asset") {
      self.asset.enabled = false;
    }

    Ok(self)
  }

  pub fn dataset_path(&self, dataset: Dataset) -> PathBuf {
    Path::new(&self.data_dir).join(dataset.file_name())
  }
}
