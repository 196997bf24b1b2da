use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::Dated;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
  Monetary,
  Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPoint {
  pub date: NaiveDate,
  pub value: f64,
}

/// Per-date reduction of event records, ascending by date with one point per date present in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
  pub name: String,
  pub kind: SeriesKind,
  pub points: Vec<DailyPoint>,
}

impl DailySeries {
  pub fn new(name: impl Into<String>, kind: SeriesKind, points: Vec<DailyPoint>) -> Self {
    Self {
      name: name.into(),
      kind,
      points,
    }
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
    self.points.iter().map(|p| p.date)
  }

  pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
    self.points.iter().map(|p| p.value)
  }

  pub fn get(&self, date: NaiveDate) -> Option<f64> {
    self
      .points
      .binary_search_by_key(&date, |p| p.date)
      .ok()
      .map(|i| self.points[i].value)
  }
}

pub enum ValueSelector<R> {
  Sum(fn(&R) -> f64),
  Count,
}

/// Rounds to cents; exact half-cent ties go to the even cent.
pub fn round_cents(value: f64) -> f64 {
  (value * 100.0).round_ties_even() / 100.0
}

pub fn aggregate_by_date<R: Dated>(name: &str, records: &[R], selector: ValueSelector<R>) -> DailySeries {
  let (kind, points) = match selector {
    ValueSelector::Sum(value_of) => {
      let mut by_day = BTreeMap::<NaiveDate, f64>::new();
      for r in records {
        *by_day.entry(r.event_date()).or_insert(0.0) += value_of(r);
      }
      let points = by_day
        .into_iter()
        .map(|(date, sum)| DailyPoint {
          date,
          value: round_cents(sum),
        })
        .collect();
      (SeriesKind::Monetary, points)
    }
    ValueSelector::Count => {
      let mut by_day = BTreeMap::<NaiveDate, u64>::new();
      for r in records {
        *by_day.entry(r.event_date()).or_insert(0) += 1;
      }
      let points = by_day
        .into_iter()
        .map(|(date, count)| DailyPoint {
          date,
          value: count as f64,
        })
        .collect();
      (SeriesKind::Count, points)
    }
  };

  DailySeries::new(name, kind, points)
}

pub fn aggregate_by_date_and_category<R, K, F>(records: &[R], category_of: F) -> BTreeMap<(NaiveDate, K), u64>
where
  R: Dated,
  K: Ord,
  F: Fn(&R) -> K,
{
  let mut out = BTreeMap::new();
  for r in records {
    *out.entry((r.event_date(), category_of(r))).or_insert(0) += 1;
  }
  out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalTotals<K: Ord> {
  pub totals: BTreeMap<K, u64>,
}

impl<K: Ord + Copy> CategoricalTotals<K> {
  pub fn grand_total(&self) -> u64 {
    self.totals.values().sum()
  }

  pub fn get(&self, key: K) -> Option<u64> {
    self.totals.get(&key).copied()
  }

  pub fn len(&self) -> usize {
    self.totals.len()
  }

  pub fn is_empty(&self) -> bool {
    self.totals.is_empty()
  }

  /// Descending by total; equal totals keep ascending key order.
  pub fn ranked(&self) -> Vec<(K, u64)> {
    let mut out: Vec<(K, u64)> = self.totals.iter().map(|(k, v)| (*k, *v)).collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
  }
}

pub fn collapse_to_category_totals<K: Ord + Copy>(intermediate: &BTreeMap<(NaiveDate, K), u64>) -> CategoricalTotals<K> {
  let mut totals = BTreeMap::new();
  for ((_, key), count) in intermediate {
    *totals.entry(*key).or_insert(0) += *count;
  }
  CategoricalTotals { totals }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::{AmountRecord, InstallRecord};

  fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn amount(date: NaiveDate, value_usd: f64) -> AmountRecord {
    AmountRecord {
      event_date: date,
      value_usd,
    }
  }

  fn install(date: NaiveDate, country_id: u32, app_id: u32) -> InstallRecord {
    InstallRecord {
      event_date: date,
      country_id,
      app_id,
    }
  }

  #[test]
  fn rounds_after_summing_a_day() {
    let rows = vec![amount(d(2022, 1, 1), 10.005), amount(d(2022, 1, 1), 5.004)];
    let series = aggregate_by_date("daily_ads_spend", &rows, ValueSelector::Sum(|r: &AmountRecord| r.value_usd));
    assert_eq!(series.kind, SeriesKind::Monetary);
    assert_eq!(series.len(), 1);
    assert_eq!(series.points[0].date, d(2022, 1, 1));
    assert!((series.points[0].value - 15.01).abs() < 1e-9);
  }

  #[test]
  fn dates_are_unique_and_ascending_regardless_of_input_order() {
    let rows = vec![
      amount(d(2022, 3, 1), 1.0),
      amount(d(2022, 1, 1), 1.0),
      amount(d(2022, 2, 1), 1.0),
      amount(d(2022, 1, 1), 1.0),
    ];
    let series = aggregate_by_date("daily_revenue", &rows, ValueSelector::Sum(|r: &AmountRecord| r.value_usd));
    let dates: Vec<NaiveDate> = series.dates().collect();
    assert_eq!(dates, vec![d(2022, 1, 1), d(2022, 2, 1), d(2022, 3, 1)]);
    assert_eq!(series.get(d(2022, 1, 1)), Some(2.0));
  }

  #[test]
  fn missing_dates_are_not_filled() {
    let rows = vec![amount(d(2022, 1, 1), 1.0), amount(d(2022, 1, 5), 1.0)];
    let series = aggregate_by_date("daily_payouts", &rows, ValueSelector::Sum(|r: &AmountRecord| r.value_usd));
    assert_eq!(series.len(), 2);
    assert_eq!(series.get(d(2022, 1, 3)), None);
  }

  #[test]
  fn counts_installs_per_day_without_rounding() {
    let rows = vec![
      install(d(2022, 1, 1), 1, 10),
      install(d(2022, 1, 1), 1, 11),
      install(d(2022, 1, 2), 17, 10),
    ];
    let series = aggregate_by_date("daily_installs", &rows, ValueSelector::Count);
    assert_eq!(series.kind, SeriesKind::Count);
    assert_eq!(series.values().collect::<Vec<_>>(), vec![2.0, 1.0]);
  }

  #[test]
  fn collapses_country_totals_across_dates() {
    let rows = vec![
      install(d(2022, 1, 1), 1, 10),
      install(d(2022, 1, 1), 1, 10),
      install(d(2022, 1, 2), 17, 10),
    ];
    let by_day_country = aggregate_by_date_and_category(&rows, |r| r.country_id);
    assert_eq!(by_day_country.get(&(d(2022, 1, 1), 1)), Some(&2));

    let totals = collapse_to_category_totals(&by_day_country);
    assert_eq!(totals.get(1), Some(2));
    assert_eq!(totals.get(17), Some(1));
    assert_eq!(totals.len(), 2);
    assert_eq!(totals.get(213), None);
  }

  #[test]
  fn category_totals_sum_to_daily_total() {
    let mut rows = Vec::new();
    for day in 1..=20u32 {
      for i in 0..(day % 7 + 1) {
        rows.push(install(d(2022, 2, day), i % 3, (day + i) % 5));
      }
    }
    let daily_total: f64 = aggregate_by_date("daily_installs", &rows, ValueSelector::Count).values().sum();
    let by_country = collapse_to_category_totals(&aggregate_by_date_and_category(&rows, |r| r.country_id));
    let by_app = collapse_to_category_totals(&aggregate_by_date_and_category(&rows, |r| r.app_id));
    assert!((by_country.grand_total() as f64 - daily_total).abs() < 0.01);
    assert!((by_app.grand_total() as f64 - daily_total).abs() < 0.01);
  }

  #[test]
  fn ranked_orders_by_total_then_key() {
    let mut totals = BTreeMap::new();
    totals.insert(94u32, 5u64);
    totals.insert(121, 9);
    totals.insert(71, 5);
    let totals = CategoricalTotals { totals };
    assert_eq!(totals.ranked(), vec![(121, 9), (71, 5), (94, 5)]);
    assert_eq!(totals.grand_total(), 19);
  }

  #[test]
  fn round_cents_sends_exact_ties_to_even() {
    assert_eq!(round_cents(0.125), 0.12);
    assert_eq!(round_cents(0.375), 0.38);
    assert_eq!(round_cents(-0.125), -0.12);
    assert!((round_cents(1.234_9) - 1.23).abs() < 1e-9);
    assert!((round_cents(-2.5051) + 2.51).abs() < 1e-9);
  }

  #[test]
  fn daily_sum_on_a_half_cent_rounds_to_even() {
    let rows = vec![amount(d(2022, 1, 1), 0.125), amount(d(2022, 1, 2), 0.0625), amount(d(2022, 1, 2), 0.0625)];
    let series = aggregate_by_date("daily_revenue", &rows, ValueSelector::Sum(|r: &AmountRecord| r.value_usd));
    assert_eq!(series.values().collect::<Vec<_>>(), vec![0.12, 0.12]);
  }
}
