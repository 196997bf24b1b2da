//! Chart specifications for the report and their Plotly figure encoding.
//!
//! Builders here are pure: aggregated data plus a [`ChartStyle`] in, a [`ChartSpec`] out.
//! Nothing in this module computes metrics; totals and averages arrive precomputed.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::aggregate::{CategoricalTotals, DailySeries};
use crate::dataset::DATE_FORMAT;
use crate::format::{format_count, format_pct_ratio, format_usd, format_usd_ratio};
use crate::metrics::{DerivedFinancials, SummaryMetrics};

#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
  pub family: String,
  pub size: u32,
  pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
  pub revenue_color: String,
  pub payouts_color: String,
  pub ads_spend_color: String,
  pub profit_color: String,
  pub annotation_font: FontStyle,
  pub donut_hole: f64,
  pub height: u32,
}

impl Default for ChartStyle {
  fn default() -> Self {
    Self {
      revenue_color: "#4d79ff".to_string(),
      payouts_color: "#ff4d4d".to_string(),
      ads_spend_color: "#ffbb33".to_string(),
      profit_color: "#00cc96".to_string(),
      annotation_font: FontStyle {
        family: "Arial".to_string(),
        size: 14,
        color: "black".to_string(),
      },
      donut_hole: 0.3,
      height: 450,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAnchor {
  Left,
  Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAnchor {
  Top,
  Bottom,
}

impl XAnchor {
  fn as_str(&self) -> &'static str {
    match self {
      XAnchor::Left => "left",
      XAnchor::Right => "right",
    }
  }
}

impl YAnchor {
  fn as_str(&self) -> &'static str {
    match self {
      YAnchor::Top => "top",
      YAnchor::Bottom => "bottom",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationAnchor {
  /// Chart-relative coordinates in `[0, 1]`.
  Paper { x: f64, y: f64, xanchor: XAnchor, yanchor: YAnchor },
  /// Pinned to a bar category at a data value.
  Category { x: String, y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
  pub text: String,
  pub anchor: AnnotationAnchor,
  pub font: FontStyle,
}

impl Annotation {
  fn paper(text: String, x: f64, y: f64, xanchor: XAnchor, yanchor: YAnchor, style: &ChartStyle) -> Self {
    Self {
      text,
      anchor: AnnotationAnchor::Paper { x, y, xanchor, yanchor },
      font: style.annotation_font.clone(),
    }
  }

  fn top_left(text: String, style: &ChartStyle) -> Self {
    Self::paper(text, 0.0, 1.0, XAnchor::Left, YAnchor::Bottom, style)
  }

  fn top_right(text: String, style: &ChartStyle) -> Self {
    Self::paper(text, 1.0, 1.0, XAnchor::Right, YAnchor::Bottom, style)
  }

  fn to_plotly(&self) -> Value {
    let font = json!({
      "family": self.font.family,
      "size": self.font.size,
      "color": self.font.color,
    });
    match &self.anchor {
      AnnotationAnchor::Paper { x, y, xanchor, yanchor } => json!({
        "text": self.text,
        "showarrow": false,
        "font": font,
        "x": x,
        "y": y,
        "xref": "paper",
        "yref": "paper",
        "xanchor": xanchor.as_str(),
        "yanchor": yanchor.as_str(),
      }),
      AnnotationAnchor::Category { x, y } => json!({
        "text": self.text,
        "showarrow": false,
        "font": font,
        "x": x,
        "y": y,
        "xref": "x",
        "yref": "y",
      }),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
  Line {
    name: String,
    x: Vec<NaiveDate>,
    y: Vec<f64>,
    color: Option<String>,
  },
  Bar {
    name: String,
    x: Vec<String>,
    y: Vec<f64>,
    color: String,
  },
  Pie {
    labels: Vec<String>,
    values: Vec<f64>,
    hole: f64,
    colors: Vec<String>,
    label_inside: bool,
  },
}

impl Trace {
  fn line(name: &str, series: &DailySeries, color: Option<&str>) -> Self {
    Trace::Line {
      name: name.to_string(),
      x: series.dates().collect(),
      y: series.values().collect(),
      color: color.map(str::to_string),
    }
  }

  fn to_plotly(&self) -> Value {
    match self {
      Trace::Line { name, x, y, color } => {
        let x: Vec<String> = x.iter().map(|d| d.format(DATE_FORMAT).to_string()).collect();
        let mut trace = json!({
          "type": "scatter",
          "mode": "lines",
          "name": name,
          "x": x,
          "y": y,
        });
        if let Some(color) = color {
          trace["line"] = json!({ "color": color });
        }
        trace
      }
      Trace::Bar { name, x, y, color } => json!({
        "type": "bar",
        "name": name,
        "x": x,
        "y": y,
        "marker": { "color": color },
      }),
      Trace::Pie {
        labels,
        values,
        hole,
        colors,
        label_inside,
      } => {
        let mut trace = json!({
          "type": "pie",
          "labels": labels,
          "values": values,
          "hole": hole,
        });
        if !colors.is_empty() {
          trace["marker"] = json!({ "colors": colors });
        }
        if *label_inside {
          trace["textposition"] = json!("inside");
          trace["textinfo"] = json!("percent+label");
        }
        trace
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
  /// Stable DOM id; also the chart's position key in the report.
  pub id: String,
  pub title: String,
  pub traces: Vec<Trace>,
  pub x_axis_title: Option<String>,
  pub y_axis_title: Option<String>,
  pub annotations: Vec<Annotation>,
  pub horizontal_line: Option<f64>,
  pub show_legend: bool,
  pub height: u32,
}

impl ChartSpec {
  fn new(id: &str, title: &str, style: &ChartStyle) -> Self {
    Self {
      id: id.to_string(),
      title: title.to_string(),
      traces: Vec::new(),
      x_axis_title: None,
      y_axis_title: None,
      annotations: Vec::new(),
      horizontal_line: None,
      show_legend: false,
      height: style.height,
    }
  }

  fn axes(mut self, x: &str, y: &str) -> Self {
    self.x_axis_title = Some(x.to_string());
    self.y_axis_title = Some(y.to_string());
    self
  }

  pub fn to_plotly(&self) -> Value {
    let mut layout = json!({
      "title": { "text": self.title },
      "showlegend": self.show_legend,
      "height": self.height,
      "annotations": self.annotations.iter().map(Annotation::to_plotly).collect::<Vec<_>>(),
    });
    if let Some(x) = &self.x_axis_title {
      layout["xaxis"] = json!({ "title": { "text": x } });
    }
    if let Some(y) = &self.y_axis_title {
      layout["yaxis"] = json!({ "title": { "text": y } });
    }
    if let Some(y) = self.horizontal_line {
      layout["shapes"] = json!([{
        "type": "line",
        "xref": "paper",
        "x0": 0,
        "x1": 1,
        "yref": "y",
        "y0": y,
        "y1": y,
        "line": { "color": "black", "width": 1 },
      }]);
    }

    json!({
      "data": self.traces.iter().map(Trace::to_plotly).collect::<Vec<_>>(),
      "layout": layout,
    })
  }
}

pub fn ads_spend_chart(series: &DailySeries, summary: &SummaryMetrics, style: &ChartStyle) -> ChartSpec {
  let mut chart = ChartSpec::new("daily-ads-spend", "Daily Ads Spend", style).axes("Date", "Daily Ads Spend ($)");
  chart.traces.push(Trace::line("Daily Ads Spend", series, None));
  chart.annotations.push(Annotation::top_left(
    format!("Total Ads Spend: {}", format_usd(summary.total)),
    style,
  ));
  chart
}

pub fn installs_chart(series: &DailySeries, summary: &SummaryMetrics, style: &ChartStyle) -> ChartSpec {
  let mut chart = ChartSpec::new("daily-installs", "Daily Installs", style).axes("Date", "Daily Installs");
  chart.traces.push(Trace::line("Daily Installs", series, None));
  chart.annotations.push(Annotation::top_left(
    format!("Total Installs: {}", format_count(summary.total.round() as u64)),
    style,
  ));
  chart
}

fn category_pie(id: &str, title: &str, entries: Vec<(u32, u64)>, style: &ChartStyle) -> ChartSpec {
  let (labels, values): (Vec<String>, Vec<f64>) = entries.into_iter().map(|(k, v)| (k.to_string(), v as f64)).unzip();
  let mut chart = ChartSpec {
    show_legend: true,
    ..ChartSpec::new(id, title, style)
  };
  chart.traces.push(Trace::Pie {
    labels,
    values,
    hole: 0.0,
    colors: Vec::new(),
    label_inside: false,
  });
  chart
}

pub fn installs_by_country_chart(totals: &CategoricalTotals<u32>, style: &ChartStyle) -> ChartSpec {
  category_pie(
    "installs-by-country",
    "Total Installs by Country",
    totals.totals.iter().map(|(k, v)| (*k, *v)).collect(),
    style,
  )
}

pub fn installs_by_app_chart(totals: &CategoricalTotals<u32>, style: &ChartStyle) -> ChartSpec {
  category_pie("installs-by-app", "Total Installs by App", totals.ranked(), style)
}

pub fn payouts_chart(series: &DailySeries, summary: &SummaryMetrics, style: &ChartStyle) -> ChartSpec {
  let mut chart = ChartSpec::new("daily-payouts", "Daily Payouts", style).axes("Date", "Daily Payouts ($)");
  chart.traces.push(Trace::line("Daily Payouts", series, None));
  chart.annotations.push(Annotation::top_left(
    format!("Total Payouts: {}", format_usd(summary.total)),
    style,
  ));
  chart.annotations.push(Annotation::paper(
    format!("Average Daily Payouts: {}", format_usd(summary.mean)),
    0.9,
    1.0,
    XAnchor::Right,
    YAnchor::Bottom,
    style,
  ));
  chart
}

pub fn revenue_chart(series: &DailySeries, summary: &SummaryMetrics, style: &ChartStyle) -> ChartSpec {
  let mut chart = ChartSpec::new("daily-revenue", "Daily Revenue", style).axes("Date", "Daily Revenue ($)");
  chart.traces.push(Trace::line("Daily Revenue", series, None));
  chart.annotations.push(Annotation::top_right(
    format!("Average Daily Revenue: {}", format_usd(summary.mean)),
    style,
  ));
  chart.annotations.push(Annotation::top_left(
    format!("Total Revenue: {}", format_usd(summary.total)),
    style,
  ));
  chart
}

pub fn totals_bar_chart(financials: &DerivedFinancials, style: &ChartStyle) -> ChartSpec {
  let mut chart = ChartSpec {
    show_legend: true,
    y_axis_title: Some("USD ($)".to_string()),
    ..ChartSpec::new("totals-bar", "Total Revenue, Payouts and Ads Spend", style)
  };

  let bars = [
    ("Total Revenue", "Revenue", financials.total_revenue, &style.revenue_color),
    ("Total Payouts", "Payouts", financials.total_payouts, &style.payouts_color),
    ("Total Ads Spend", "Ads Spend", financials.total_ads_spend, &style.ads_spend_color),
  ];
  for (name, category, value, color) in bars {
    chart.traces.push(Trace::Bar {
      name: name.to_string(),
      x: vec![category.to_string()],
      y: vec![value],
      color: color.clone(),
    });
    chart.annotations.push(Annotation {
      text: format_usd(value),
      anchor: AnnotationAnchor::Category {
        x: category.to_string(),
        y: value,
      },
      font: style.annotation_font.clone(),
    });
  }
  chart
}

pub fn composition_donut_chart(financials: &DerivedFinancials, style: &ChartStyle) -> ChartSpec {
  let mut chart = ChartSpec {
    show_legend: true,
    ..ChartSpec::new("totals-composition", "Total Revenue, Payouts, Ads Spend and Profit", style)
  };
  chart.traces.push(Trace::Pie {
    labels: vec![
      "total_ads_spend".to_string(),
      "total_payouts".to_string(),
      "total_revenue".to_string(),
      "total_profit".to_string(),
    ],
    values: vec![
      financials.total_ads_spend,
      financials.total_payouts,
      financials.total_revenue,
      financials.total_profit,
    ],
    hole: style.donut_hole,
    colors: vec![
      style.ads_spend_color.clone(),
      style.payouts_color.clone(),
      style.revenue_color.clone(),
      style.profit_color.clone(),
    ],
    label_inside: true,
  });
  chart.annotations.push(Annotation::top_left(
    format!("Total Profit: {}", format_usd(financials.total_profit)),
    style,
  ));
  chart.annotations.push(Annotation::top_right(
    format!(
      "Average Profit Per Install: {}",
      format_usd_ratio(financials.avg_profit_per_install)
    ),
    style,
  ));
  chart.annotations.push(Annotation::paper(
    format!("Profit Margin: {}", format_pct_ratio(financials.profit_margin_pct)),
    0.0,
    0.0,
    XAnchor::Left,
    YAnchor::Top,
    style,
  ));
  chart
}

pub fn daily_composite_chart(
  revenue: &DailySeries,
  payouts: &DailySeries,
  ads_spend: &DailySeries,
  style: &ChartStyle,
) -> ChartSpec {
  let mut chart = ChartSpec {
    show_legend: true,
    ..ChartSpec::new("daily-composite", "Daily Revenue, Payouts and Ads Spend", style).axes("Date", "USD ($)")
  };
  chart.traces.push(Trace::line("Daily Revenue", revenue, Some(style.revenue_color.as_str())));
  chart.traces.push(Trace::line("Daily Payouts", payouts, Some(style.payouts_color.as_str())));
  chart.traces.push(Trace::line("Daily Ads Spend", ads_spend, Some(style.ads_spend_color.as_str())));
  chart
}

pub fn daily_profit_chart(series: &DailySeries, summary: &SummaryMetrics, style: &ChartStyle) -> ChartSpec {
  let mut chart = ChartSpec::new("daily-profit", "Daily Profit", style).axes("Date", "USD ($)");
  chart.traces.push(Trace::line("Daily Profit", series, Some(style.profit_color.as_str())));
  chart.annotations.push(Annotation::top_left(
    format!("Total Profit: {}", format_usd(summary.total)),
    style,
  ));
  chart.annotations.push(Annotation::top_right(
    format!("Average Daily Profit: {}", format_usd(summary.mean)),
    style,
  ));
  chart.horizontal_line = Some(0.0);
  chart
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::aggregate::{DailyPoint, SeriesKind};
  use crate::metrics::{derive_financials, summarize};
  use std::collections::BTreeMap;

  fn series(name: &str, values: &[f64]) -> DailySeries {
    DailySeries::new(
      name,
      SeriesKind::Monetary,
      values
        .iter()
        .enumerate()
        .map(|(i, v)| DailyPoint {
          date: NaiveDate::from_ymd_opt(2022, 1, 1 + i as u32).unwrap(),
          value: *v,
        })
        .collect(),
    )
  }

  #[test]
  fn ads_chart_is_a_dated_line_with_total_annotation() {
    let s = series("daily_ads_spend", &[1000.0, 234.5]);
    let chart = ads_spend_chart(&s, &summarize(&s).unwrap(), &ChartStyle::default());
    let fig = chart.to_plotly();
    assert_eq!(fig["data"][0]["type"], "scatter");
    assert_eq!(fig["data"][0]["x"][1], "2022-01-02");
    assert_eq!(fig["data"][0]["y"][0], 1000.0);
    assert_eq!(fig["layout"]["annotations"][0]["text"], "Total Ads Spend: $1,234.50");
    assert_eq!(fig["layout"]["annotations"][0]["xref"], "paper");
    assert_eq!(fig["layout"]["xaxis"]["title"]["text"], "Date");
  }

  #[test]
  fn payouts_and_revenue_charts_show_total_and_average() {
    let s = series("daily_payouts", &[10.0, 20.0]);
    let m = summarize(&s).unwrap();
    let payouts = payouts_chart(&s, &m, &ChartStyle::default());
    let texts: Vec<&str> = payouts.annotations.iter().map(|a| a.text.as_str()).collect();
    assert_eq!(texts, vec!["Total Payouts: $30.00", "Average Daily Payouts: $15.00"]);

    let revenue = revenue_chart(&s, &m, &ChartStyle::default());
    assert_eq!(revenue.annotations[0].text, "Average Daily Revenue: $15.00");
    assert_eq!(
      revenue.annotations[0].anchor,
      AnnotationAnchor::Paper {
        x: 1.0,
        y: 1.0,
        xanchor: XAnchor::Right,
        yanchor: YAnchor::Bottom
      }
    );
  }

  #[test]
  fn app_pie_lists_apps_by_descending_installs() {
    let mut totals = BTreeMap::new();
    totals.insert(71u32, 3u64);
    totals.insert(174, 12);
    totals.insert(121, 7);
    let chart = installs_by_app_chart(&CategoricalTotals { totals }, &ChartStyle::default());
    let fig = chart.to_plotly();
    assert_eq!(fig["data"][0]["type"], "pie");
    assert_eq!(fig["data"][0]["labels"], json!(["174", "121", "71"]));
    assert_eq!(fig["data"][0]["values"], json!([12.0, 7.0, 3.0]));
  }

  #[test]
  fn totals_bar_labels_each_bar() {
    let f = derive_financials(1000.0, 200.0, 300.0, 10);
    let chart = totals_bar_chart(&f, &ChartStyle::default());
    assert_eq!(chart.traces.len(), 3);
    let fig = chart.to_plotly();
    assert_eq!(fig["data"][1]["marker"]["color"], "#ff4d4d");
    assert_eq!(fig["layout"]["annotations"][2]["x"], "Ads Spend");
    assert_eq!(fig["layout"]["annotations"][2]["text"], "$300.00");
    assert_eq!(fig["layout"]["yaxis"]["title"]["text"], "USD ($)");
  }

  #[test]
  fn donut_shows_undefined_margin_for_zero_revenue() {
    let f = derive_financials(0.0, 200.0, 300.0, 0);
    let chart = composition_donut_chart(&f, &ChartStyle::default());
    let texts: Vec<&str> = chart.annotations.iter().map(|a| a.text.as_str()).collect();
    assert_eq!(
      texts,
      vec![
        "Total Profit: -$500.00",
        "Average Profit Per Install: undefined",
        "Profit Margin: undefined",
      ]
    );
    let fig = chart.to_plotly();
    assert_eq!(fig["data"][0]["hole"], 0.3);
    assert_eq!(fig["data"][0]["textinfo"], "percent+label");
  }

  #[test]
  fn daily_profit_chart_draws_zero_baseline() {
    let s = series("daily_profit", &[5.0, -3.0]);
    let chart = daily_profit_chart(&s, &summarize(&s).unwrap(), &ChartStyle::default());
    let fig = chart.to_plotly();
    assert_eq!(fig["layout"]["shapes"][0]["y0"], 0.0);
    assert_eq!(fig["data"][0]["line"]["color"], "#00cc96");
    assert_eq!(chart.annotations[1].text, "Average Daily Profit: $1.00");
  }

  #[test]
  fn composite_chart_has_three_colored_lines() {
    let r = series("daily_revenue", &[3.0]);
    let p = series("daily_payouts", &[1.0]);
    let a = series("daily_ads_spend", &[1.0]);
    let chart = daily_composite_chart(&r, &p, &a, &ChartStyle::default());
    let names: Vec<Value> = chart.to_plotly()["data"]
      .as_array()
      .unwrap()
      .iter()
      .map(|t| t["name"].clone())
      .collect();
    assert_eq!(names, vec![json!("Daily Revenue"), json!("Daily Payouts"), json!("Daily Ads Spend")]);
    assert!(chart.show_legend);
  }
}
