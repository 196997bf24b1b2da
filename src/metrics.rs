use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::aggregate::{round_cents, DailyPoint, DailySeries, SeriesKind};
use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryMetrics {
  pub days: usize,
  pub total: f64,
  pub min: f64,
  pub max: f64,
  pub mean: f64,
}

pub fn summarize(series: &DailySeries) -> Result<SummaryMetrics> {
  if series.is_empty() {
    return Err(ReportError::EmptySeries {
      series: series.name.clone(),
    });
  }

  let mut total = 0.0;
  let mut min = f64::INFINITY;
  let mut max = f64::NEG_INFINITY;
  for v in series.values() {
    total += v;
    min = min.min(v);
    max = max.max(v);
  }
  let days = series.len();

  Ok(SummaryMetrics {
    days,
    total,
    min,
    max,
    mean: total / (days as f64),
  })
}

/// Result of a division whose denominator may be zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
  Defined(f64),
  Undefined,
}

impl Ratio {
  pub fn checked(numerator: f64, denominator: f64) -> Self {
    if denominator == 0.0 {
      Ratio::Undefined
    } else {
      Ratio::Defined(numerator / denominator)
    }
  }

  pub fn value(&self) -> Option<f64> {
    match self {
      Ratio::Defined(v) => Some(*v),
      Ratio::Undefined => None,
    }
  }

  pub fn is_undefined(&self) -> bool {
    matches!(self, Ratio::Undefined)
  }
}

impl fmt::Display for Ratio {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Ratio::Defined(v) => write!(f, "{v}"),
      Ratio::Undefined => f.write_str("undefined"),
    }
  }
}

impl Serialize for Ratio {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    match self {
      Ratio::Defined(v) => serializer.serialize_f64(*v),
      Ratio::Undefined => serializer.serialize_str("undefined"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedFinancials {
  pub total_revenue: f64,
  pub total_payouts: f64,
  pub total_ads_spend: f64,
  pub total_installs: u64,
  pub total_profit: f64,
  pub profit_margin_pct: Ratio,
  pub avg_profit_per_install: Ratio,
}

pub fn derive_financials(
  total_revenue: f64,
  total_payouts: f64,
  total_ads_spend: f64,
  total_installs: u64,
) -> DerivedFinancials {
  let total_profit = total_revenue - total_payouts - total_ads_spend;

  let profit_margin_pct = match Ratio::checked(total_profit, total_revenue) {
    Ratio::Defined(v) => Ratio::Defined(v * 100.0),
    Ratio::Undefined => Ratio::Undefined,
  };
  let avg_profit_per_install = Ratio::checked(total_profit, total_installs as f64);

  if profit_margin_pct.is_undefined() {
    tracing::warn!("total revenue is zero; profit margin is undefined");
  }
  if avg_profit_per_install.is_undefined() {
    tracing::warn!("total installs is zero; average profit per install is undefined");
  }

  DerivedFinancials {
    total_revenue,
    total_payouts,
    total_ads_spend,
    total_installs,
    total_profit,
    profit_margin_pct,
    avg_profit_per_install,
  }
}

/// How the revenue, payouts and ads spend series are lined up for the daily profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
  /// All three series must carry the same dates; subtraction is keyed by date.
  #[default]
  ByDate,
  /// Subtract by position, labelled with the revenue dates and truncated to the
  /// shortest series. Misaligned inputs produce mislabelled profit.
  ///
  /// Revenue rows past the shortest series are dropped rather than kept as gaps,
  /// so totals and means match an index-aligned subtraction that skips missing
  /// values while the profit chart's date range ends at the truncation point.
  Positional,
}

impl FromStr for AlignmentPolicy {
  type Err = ReportError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
      "by_date" | "date" => Ok(AlignmentPolicy::ByDate),
      "positional" | "position" => Ok(AlignmentPolicy::Positional),
      other => Err(ReportError::Config {
        message: format!("unknown alignment policy '{other}' (expected by_date or positional)"),
      }),
    }
  }
}

fn first_mismatch(reference: &DailySeries, other: &DailySeries) -> Option<chrono::NaiveDate> {
  let mut a = reference.dates();
  let mut b = other.dates();
  loop {
    match (a.next(), b.next()) {
      (None, None) => return None,
      (Some(x), Some(y)) if x == y => continue,
      (Some(x), Some(y)) => return Some(x.min(y)),
      (Some(x), None) | (None, Some(x)) => return Some(x),
    }
  }
}

pub fn daily_profit(
  revenue: &DailySeries,
  payouts: &DailySeries,
  ads_spend: &DailySeries,
  policy: AlignmentPolicy,
) -> Result<DailySeries> {
  let points = match policy {
    AlignmentPolicy::ByDate => {
      for other in [payouts, ads_spend] {
        if let Some(date) = first_mismatch(revenue, other) {
          return Err(ReportError::UnalignedSeries {
            series: other.name.clone(),
            date,
          });
        }
      }
      revenue
        .points
        .iter()
        .map(|r| {
          let payout = payouts.get(r.date).unwrap_or(0.0);
          let ads = ads_spend.get(r.date).unwrap_or(0.0);
          DailyPoint {
            date: r.date,
            value: round_cents(r.value - payout - ads),
          }
        })
        .collect::<Vec<_>>()
    }
    AlignmentPolicy::Positional => {
      for other in [payouts, ads_spend] {
        if let Some(date) = first_mismatch(revenue, other) {
          tracing::warn!(
            series = %other.name,
            %date,
            "daily profit computed positionally over series with different dates"
          );
        }
      }
      revenue
        .points
        .iter()
        .zip(payouts.points.iter())
        .zip(ads_spend.points.iter())
        .map(|((r, p), a)| DailyPoint {
          date: r.date,
          value: round_cents(r.value - p.value - a.value),
        })
        .collect::<Vec<_>>()
    }
  };

  Ok(DailySeries::new("daily_profit", SeriesKind::Monetary, points))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, day).unwrap()
  }

  fn series(name: &str, points: &[(u32, f64)]) -> DailySeries {
    DailySeries::new(
      name,
      SeriesKind::Monetary,
      points
        .iter()
        .map(|(day, value)| DailyPoint {
          date: d(*day),
          value: *value,
        })
        .collect(),
    )
  }

  #[test]
  fn summarizes_total_min_max_mean() {
    let s = series("daily_revenue", &[(1, 10.0), (2, 30.0), (3, 20.0)]);
    let m = summarize(&s).unwrap();
    assert_eq!(m.days, 3);
    assert!((m.total - 60.0).abs() < 1e-9);
    assert!((m.min - 10.0).abs() < 1e-9);
    assert!((m.max - 30.0).abs() < 1e-9);
    assert!((m.mean - 20.0).abs() < 1e-9);
  }

  #[test]
  fn single_point_series_has_equal_stats() {
    let m = summarize(&series("daily_payouts", &[(5, 42.5)])).unwrap();
    assert_eq!(m.total, m.min);
    assert_eq!(m.min, m.max);
    assert_eq!(m.max, m.mean);
  }

  #[test]
  fn empty_series_is_an_error() {
    let err = summarize(&series("daily_ads_spend", &[])).unwrap_err();
    match err {
      ReportError::EmptySeries { series } => assert_eq!(series, "daily_ads_spend"),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn derives_profit_and_margin() {
    let f = derive_financials(1000.0, 200.0, 300.0, 50);
    assert_eq!(f.total_profit, 1000.0 - 200.0 - 300.0);
    assert_eq!(f.profit_margin_pct, Ratio::Defined(50.0));
    assert_eq!(f.avg_profit_per_install, Ratio::Defined(10.0));
  }

  #[test]
  fn zero_revenue_leaves_margin_undefined() {
    let f = derive_financials(0.0, 200.0, 300.0, 10);
    assert!((f.total_profit + 500.0).abs() < 1e-9);
    assert_eq!(f.profit_margin_pct, Ratio::Undefined);
    assert_eq!(f.profit_margin_pct.to_string(), "undefined");
    assert_eq!(f.avg_profit_per_install, Ratio::Defined(-50.0));
  }

  #[test]
  fn zero_installs_leaves_per_install_undefined() {
    let f = derive_financials(100.0, 0.0, 0.0, 0);
    assert_eq!(f.avg_profit_per_install, Ratio::Undefined);
    let json = serde_json::to_value(f).unwrap();
    assert_eq!(json["avg_profit_per_install"], "undefined");
    assert_eq!(json["profit_margin_pct"], 100.0);
  }

  #[test]
  fn daily_profit_subtracts_by_date() {
    let revenue = series("daily_revenue", &[(1, 100.0), (2, 50.0)]);
    let payouts = series("daily_payouts", &[(1, 10.0), (2, 5.0)]);
    let ads = series("daily_ads_spend", &[(1, 20.0), (2, 60.0)]);
    let profit = daily_profit(&revenue, &payouts, &ads, AlignmentPolicy::ByDate).unwrap();
    assert_eq!(profit.values().collect::<Vec<_>>(), vec![70.0, -15.0]);
    assert_eq!(profit.dates().collect::<Vec<_>>(), vec![d(1), d(2)]);
  }

  #[test]
  fn by_date_rejects_unaligned_series() {
    let revenue = series("daily_revenue", &[(1, 100.0), (2, 50.0), (3, 10.0)]);
    let payouts = series("daily_payouts", &[(1, 10.0), (3, 5.0)]);
    let ads = series("daily_ads_spend", &[(1, 20.0), (2, 60.0), (3, 1.0)]);
    let err = daily_profit(&revenue, &payouts, &ads, AlignmentPolicy::ByDate).unwrap_err();
    match err {
      ReportError::UnalignedSeries { series, date } => {
        assert_eq!(series, "daily_payouts");
        assert_eq!(date, d(2));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn positional_truncates_to_shortest_and_uses_revenue_dates() {
    let revenue = series("daily_revenue", &[(1, 100.0), (2, 50.0), (3, 10.0)]);
    let payouts = series("daily_payouts", &[(1, 10.0), (3, 5.0)]);
    let ads = series("daily_ads_spend", &[(1, 20.0), (2, 60.0), (3, 1.0)]);
    let profit = daily_profit(&revenue, &payouts, &ads, AlignmentPolicy::Positional).unwrap();
    assert_eq!(profit.dates().collect::<Vec<_>>(), vec![d(1), d(2)]);
    assert_eq!(profit.values().collect::<Vec<_>>(), vec![70.0, -15.0]);
  }

  #[test]
  fn parses_alignment_policy() {
    assert_eq!("by_date".parse::<AlignmentPolicy>().unwrap(), AlignmentPolicy::ByDate);
    assert_eq!("Positional".parse::<AlignmentPolicy>().unwrap(), AlignmentPolicy::Positional);
    assert!("nearest".parse::<AlignmentPolicy>().is_err());
  }
}
