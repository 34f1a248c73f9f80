use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use covid2dash::config::{DEFAULT_COUNTRY, DEFAULT_TAIL_ROWS, DEFAULT_TITLE};
use covid2dash::{load_dashboard, render, Dashboard, DashboardConfig, Measure, Sources};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a COVID-19 country dashboard from JHU time-series CSVs", long_about = None)]
struct Cli {
    /// Confirmed cases CSV (path, file:// or http(s):// URL)
    #[arg(long, value_hint = ValueHint::AnyPath)]
    confirmed: Option<String>,

    /// Deaths CSV
    #[arg(long, value_hint = ValueHint::AnyPath)]
    deaths: Option<String>,

    /// Recovered CSV
    #[arg(long, value_hint = ValueHint::AnyPath)]
    recovered: Option<String>,

    /// Value of the Country/Region column to extract
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,

    /// Page title
    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Cumulative series to plot (comma separated; empty hides the chart)
    #[arg(long, value_delimiter = ',', default_value = "confirmed,recovered")]
    series: Vec<String>,

    /// Daily change series to plot (comma separated; empty hides the chart)
    #[arg(long, value_delimiter = ',', default_value = "confirmed")]
    daily: Vec<String>,

    /// Rows in the statistics table
    #[arg(long, default_value_t = DEFAULT_TAIL_ROWS)]
    tail_rows: usize,

    /// Output HTML path (`-` for stdout)
    #[arg(short, long, default_value = "dashboard.html", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn parse_measures(names: &[String]) -> Result<Vec<Measure>> {
    names
        .iter()
        .filter(|n| !n.trim().is_empty())
        .map(|n| n.parse::<Measure>())
        .collect()
}

impl Cli {
    fn config(&self) -> Result<DashboardConfig> {
        Ok(DashboardConfig {
            title: self.title.clone(),
            country: self.country.clone(),
            cumulative: parse_measures(&self.series).context("--series")?,
            daily: parse_measures(&self.daily).context("--daily")?,
            tail_rows: self.tail_rows,
        })
    }

    fn sources(&self) -> Sources {
        Sources {
            confirmed: self.confirmed.clone(),
            deaths: self.deaths.clone(),
            recovered: self.recovered.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = cli.config()?;
    let dashboard = load_dashboard(&cli.sources(), &config).await?;
    if let Dashboard::Pending = dashboard {
        eprintln!("{}", covid2dash::render::PENDING_MESSAGE);
    }
    let html = render(&dashboard, &config)?;

    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(html.as_bytes())?;
    } else {
        tokio::fs::write(&cli.output, html)
            .await
            .with_context(|| format!("failed to write {}", cli.output.display()))?;
        info!("wrote {}", cli.output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_config() {
        let cli = Cli::parse_from(["covid2dash"]);
        assert_eq!(cli.config().unwrap(), DashboardConfig::default());
        assert!(!cli.sources().is_complete());
    }

    #[test]
    fn empty_selection_hides_chart() {
        let cli = Cli::parse_from(["covid2dash", "--series", "", "--daily", "deaths,recovered"]);
        let config = cli.config().unwrap();
        assert!(config.cumulative.is_empty());
        assert_eq!(config.daily, vec![Measure::Deaths, Measure::Recovered]);
    }

    #[test]
    fn unknown_measure_is_rejected() {
        let cli = Cli::parse_from(["covid2dash", "--series", "active"]);
        assert!(cli.config().is_err());
    }
}
