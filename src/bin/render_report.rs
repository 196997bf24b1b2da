use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use fiscal_report::config::ReportConfig;
use fiscal_report::error::{ReportError, Result};
use fiscal_report::format::{format_pct_ratio, format_usd};
use fiscal_report::pipeline::generate;

fn write_file(path: &std::path::Path, contents: &str) -> Result<()> {
  std::fs::write(path, contents).map_err(|e| ReportError::Render {
    message: format!("cannot write {}: {e}", path.display()),
  })
}

async fn run() -> Result<()> {
  let args: Vec<String> = std::env::args().collect();
  let config = ReportConfig::from_env()?.apply_args(&args)?;

  tracing::info!(
    data_dir = %config.data_dir.display(),
    output = %config.output.display(),
    alignment = ?config.alignment,
    asset_enabled = config.asset.enabled,
    "rendering report"
  );

  let report = generate(&config).await?;

  write_file(&config.output, &report.html)?;
  if let Some(path) = &config.metrics_output {
    write_file(path, &serde_json::to_string_pretty(&report.metrics)?)?;
  }

  let f = &report.metrics.financials;
  println!(
    "ok=true output={} total_revenue={} total_profit={} profit_margin={}",
    config.output.display(),
    format_usd(f.total_revenue),
    format_usd(f.total_profit),
    format_pct_ratio(f.profit_margin_pct)
  );
  Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fiscal_report=info,render_report=info")),
    )
    .with_writer(std::io::stderr)
    .init();

  match run().await {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      tracing::error!(error = %err, "report generation aborted");
      eprintln!("ok=false error={err}");
      ExitCode::FAILURE
    }
  }
}
