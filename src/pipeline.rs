use serde::Serialize;
use serde_json::Value;

use crate::aggregate::{
  aggregate_by_date, aggregate_by_date_and_category, collapse_to_category_totals, CategoricalTotals, DailySeries,
  ValueSelector,
};
use crate::asset::load_animation;
use crate::chart::{self, ChartStyle};
use crate::config::ReportConfig;
use crate::dataset::{load_amount_records, load_install_records, AmountRecord, Dataset, InstallRecord};
use crate::error::Result;
use crate::metrics::{daily_profit, derive_financials, summarize, AlignmentPolicy, DerivedFinancials, SummaryMetrics};
use crate::report::{compose, render_html, ReportCharts};

#[derive(Debug, Clone)]
pub struct Datasets {
  pub ads_spend: Vec<AmountRecord>,
  pub installs: Vec<InstallRecord>,
  pub payouts: Vec<AmountRecord>,
  pub revenue: Vec<AmountRecord>,
}

pub fn load_datasets(config: &ReportConfig) -> Result<Datasets> {
  let path = |dataset: Dataset| config.dataset_path(dataset);

  let datasets = Datasets {
    ads_spend: load_amount_records(&path(Dataset::AdSpend), Dataset::AdSpend)?,
    installs: load_install_records(&path(Dataset::Installs))?,
    payouts: load_amount_records(&path(Dataset::Payouts), Dataset::Payouts)?,
    revenue: load_amount_records(&path(Dataset::Revenue), Dataset::Revenue)?,
  };

  tracing::info!(
    ads_spend_rows = datasets.ads_spend.len(),
    install_rows = datasets.installs.len(),
    payout_rows = datasets.payouts.len(),
    revenue_rows = datasets.revenue.len(),
    "datasets loaded"
  );
  Ok(datasets)
}

#[derive(Debug, Clone)]
pub struct Aggregates {
  pub ads_spend: DailySeries,
  pub installs: DailySeries,
  pub installs_by_country: CategoricalTotals<u32>,
  pub installs_by_app: CategoricalTotals<u32>,
  pub payouts: DailySeries,
  pub revenue: DailySeries,
}

fn value_usd(r: &AmountRecord) -> f64 {
  r.value_usd
}

pub fn aggregate(datasets: &Datasets) -> Aggregates {
  let by_day_country = aggregate_by_date_and_category(&datasets.installs, |r| r.country_id);
  let by_day_app = aggregate_by_date_and_category(&datasets.installs, |r| r.app_id);

  let aggregates = Aggregates {
    ads_spend: aggregate_by_date("daily_ads_spend", &datasets.ads_spend, ValueSelector::Sum(value_usd)),
    installs: aggregate_by_date("daily_installs", &datasets.installs, ValueSelector::Count),
    installs_by_country: collapse_to_category_totals(&by_day_country),
    installs_by_app: collapse_to_category_totals(&by_day_app),
    payouts: aggregate_by_date("daily_payouts", &datasets.payouts, ValueSelector::Sum(value_usd)),
    revenue: aggregate_by_date("daily_revenue", &datasets.revenue, ValueSelector::Sum(value_usd)),
  };

  tracing::info!(
    ads_spend_days = aggregates.ads_spend.len(),
    install_days = aggregates.installs.len(),
    countries = aggregates.installs_by_country.len(),
    apps = aggregates.installs_by_app.len(),
    payout_days = aggregates.payouts.len(),
    revenue_days = aggregates.revenue.len(),
    "daily aggregates built"
  );
  aggregates
}

/// Every scalar the report prints, in one serializable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetrics {
  pub ads_spend: SummaryMetrics,
  pub installs: SummaryMetrics,
  pub payouts: SummaryMetrics,
  pub revenue: SummaryMetrics,
  pub daily_profit: SummaryMetrics,
  pub financials: DerivedFinancials,
}

#[derive(Debug, Clone)]
pub struct Analysis {
  pub aggregates: Aggregates,
  pub daily_profit: DailySeries,
  pub metrics: ReportMetrics,
}

pub fn analyze(aggregates: Aggregates, alignment: AlignmentPolicy) -> Result<Analysis> {
  let ads_spend = summarize(&aggregates.ads_spend)?;
  let installs = summarize(&aggregates.installs)?;
  let payouts = summarize(&aggregates.payouts)?;
  let revenue = summarize(&aggregates.revenue)?;

  let financials = derive_financials(
    revenue.total,
    payouts.total,
    ads_spend.total,
    installs.total.round() as u64,
  );

  let profit_series = daily_profit(&aggregates.revenue, &aggregates.payouts, &aggregates.ads_spend, alignment)?;
  let daily_profit = summarize(&profit_series)?;

  tracing::info!(
    total_revenue = financials.total_revenue,
    total_profit = financials.total_profit,
    profit_margin_pct = %financials.profit_margin_pct,
    ?alignment,
    "metrics derived"
  );

  Ok(Analysis {
    aggregates,
    daily_profit: profit_series,
    metrics: ReportMetrics {
      ads_spend,
      installs,
      payouts,
      revenue,
      daily_profit,
      financials,
    },
  })
}

pub fn render_charts(analysis: &Analysis, style: &ChartStyle) -> ReportCharts {
  let agg = &analysis.aggregates;
  let m = &analysis.metrics;

  ReportCharts {
    ads_spend: chart::ads_spend_chart(&agg.ads_spend, &m.ads_spend, style),
    installs: chart::installs_chart(&agg.installs, &m.installs, style),
    installs_by_country: chart::installs_by_country_chart(&agg.installs_by_country, style),
    installs_by_app: chart::installs_by_app_chart(&agg.installs_by_app, style),
    payouts: chart::payouts_chart(&agg.payouts, &m.payouts, style),
    revenue: chart::revenue_chart(&agg.revenue, &m.revenue, style),
    totals: chart::totals_bar_chart(&m.financials, style),
    composition: chart::composition_donut_chart(&m.financials, style),
    daily_composite: chart::daily_composite_chart(&agg.revenue, &agg.payouts, &agg.ads_spend, style),
    daily_profit: chart::daily_profit_chart(&analysis.daily_profit, &m.daily_profit, style),
  }
}

#[derive(Debug, Clone)]
pub struct GeneratedReport {
  pub html: String,
  pub metrics: ReportMetrics,
}

/// Runs every data stage and renders the document. No network access.
pub fn build_report(config: &ReportConfig, animation: Option<Value>) -> Result<GeneratedReport> {
  let datasets = load_datasets(config)?;
  let aggregates = aggregate(&datasets);
  let analysis = analyze(aggregates, config.alignment)?;
  let charts = render_charts(&analysis, &config.style);
  let document = compose(&config.title, charts, animation);
  let html = render_html(&document)?;

  Ok(GeneratedReport {
    html,
    metrics: analysis.metrics,
  })
}

pub async fn generate(config: &ReportConfig) -> Result<GeneratedReport> {
  let animation = if config.asset.enabled {
    load_animation(&config.asset.url, config.asset.timeout).await
  } else {
    None
  };
  build_report(config, animation)
}
