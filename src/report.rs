use pulldown_cmark::{html, Options, Parser};
use serde_json::Value;

use crate::chart::ChartSpec;
use crate::error::Result;
use crate::narrative;

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";
const LOTTIE_SRC: &str = "https://cdnjs.cloudflare.com/ajax/libs/lottie-web/5.12.2/lottie.min.js";

/// One column of a row: an optional chart followed by its commentary.
#[derive(Debug, Clone)]
pub struct Panel {
  pub chart: Option<ChartSpec>,
  pub narrative: &'static str,
}

impl Panel {
  fn chart(chart: ChartSpec, narrative: &'static str) -> Self {
    Self {
      chart: Some(chart),
      narrative,
    }
  }

  fn text(narrative: &'static str) -> Self {
    Self { chart: None, narrative }
  }
}

#[derive(Debug, Clone)]
pub enum Block {
  Pair(Panel, Panel),
  FullWidth(&'static str),
}

#[derive(Debug, Clone)]
pub struct ReportCharts {
  pub ads_spend: ChartSpec,
  pub installs: ChartSpec,
  pub installs_by_country: ChartSpec,
  pub installs_by_app: ChartSpec,
  pub payouts: ChartSpec,
  pub revenue: ChartSpec,
  pub totals: ChartSpec,
  pub composition: ChartSpec,
  pub daily_composite: ChartSpec,
  pub daily_profit: ChartSpec,
}

#[derive(Debug, Clone)]
pub struct Document {
  pub title: String,
  pub animation: Option<Value>,
  pub intro: &'static str,
  pub blocks: Vec<Block>,
}

impl Document {
  pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> + '_ {
    self.blocks.iter().flat_map(|b| {
      let (left, right) = match b {
        Block::Pair(left, right) => (left.chart.as_ref(), right.chart.as_ref()),
        Block::FullWidth(_) => (None, None),
      };
      left.into_iter().chain(right)
    })
  }
}

pub fn compose(title: &str, charts: ReportCharts, animation: Option<Value>) -> Document {
  let blocks = vec![
    Block::Pair(
      Panel::chart(charts.ads_spend, narrative::ADS_SPEND),
      Panel::chart(charts.installs, narrative::INSTALLS),
    ),
    Block::Pair(
      Panel::chart(charts.installs_by_country, narrative::INSTALLS_BY_COUNTRY),
      Panel::chart(charts.installs_by_app, narrative::INSTALLS_BY_APP),
    ),
    Block::Pair(
      Panel::chart(charts.payouts, narrative::PAYOUTS),
      Panel::chart(charts.revenue, narrative::REVENUE),
    ),
    Block::Pair(
      Panel::chart(charts.totals, narrative::TOTALS),
      Panel::chart(charts.composition, narrative::COMPOSITION),
    ),
    Block::Pair(
      Panel::chart(charts.daily_composite, narrative::DAILY_COMPOSITE),
      Panel::chart(charts.daily_profit, narrative::DAILY_PROFIT),
    ),
    Block::FullWidth(narrative::SWOT),
    Block::Pair(Panel::text(narrative::CONCLUSIONS), Panel::text(narrative::NEXT_STEPS)),
  ];

  Document {
    title: title.to_string(),
    animation,
    intro: narrative::INTRO,
    blocks,
  }
}

fn escape_html(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for ch in input.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(ch),
    }
  }
  out
}

fn markdown_to_html(markdown: &str) -> String {
  let parser = Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH);
  let mut out = String::new();
  html::push_html(&mut out, parser);
  out
}

/// JSON safe to embed inside a `<script>` element.
fn script_json(value: &Value) -> Result<String> {
  Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

fn render_panel(out: &mut String, panel: &Panel) -> Result<()> {
  out.push_str("<div class=\"panel\">\n");
  if let Some(chart) = &panel.chart {
    let id = escape_html(&chart.id);
    out.push_str(&format!("<div class=\"chart\" id=\"{id}\"></div>\n"));
    out.push_str(&format!(
      "<script>(function(){{var fig={};Plotly.newPlot(\"{id}\",fig.data,fig.layout,{{responsive:true}});}})();</script>\n",
      script_json(&chart.to_plotly())?
    ));
  }
  out.push_str(&markdown_to_html(panel.narrative));
  out.push_str("</div>\n");
  Ok(())
}

pub fn render_html(doc: &Document) -> Result<String> {
  let title = escape_html(&doc.title);
  let mut out = String::new();

  out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
  out.push_str(&format!("<title>{title}</title>\n"));
  out.push_str(&format!("<script src=\"{PLOTLY_SRC}\"></script>\n"));
  if doc.animation.is_some() {
    out.push_str(&format!("<script src=\"{LOTTIE_SRC}\"></script>\n"));
  }
  out.push_str(
    "<style>\
body{font-family:Arial,sans-serif;margin:0 auto;max-width:1400px;padding:1rem}\
.row{display:grid;grid-template-columns:1fr 1fr;gap:2rem;margin-bottom:2rem}\
.header{display:grid;grid-template-columns:1fr 3fr;gap:2rem;align-items:center}\
#animation{width:200px;height:200px}\
</style>\n",
  );
  out.push_str("</head>\n<body>\n");

  out.push_str("<div class=\"header\">\n<div>");
  if let Some(animation) = &doc.animation {
    out.push_str("<div id=\"animation\"></div>\n");
    out.push_str(&format!(
      "<script>lottie.loadAnimation({{container:document.getElementById(\"animation\"),renderer:\"svg\",loop:true,autoplay:true,animationData:{}}});</script>\n",
      script_json(animation)?
    ));
  }
  out.push_str("</div>\n<div>\n");
  out.push_str(&format!("<h1>{title}</h1>\n"));
  out.push_str(&markdown_to_html(doc.intro));
  out.push_str("</div>\n</div>\n");

  for block in &doc.blocks {
    match block {
      Block::Pair(left, right) => {
        out.push_str("<div class=\"row\">\n");
        render_panel(&mut out, left)?;
        render_panel(&mut out, right)?;
        out.push_str("</div>\n");
      }
      Block::FullWidth(text) => {
        out.push_str("<div class=\"full\">\n");
        out.push_str(&markdown_to_html(text));
        out.push_str("</div>\n");
      }
    }
  }

  out.push_str("</body>\n</html>\n");
  Ok(out)
}
