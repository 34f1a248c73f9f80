use anyhow::{anyhow, Context, Result};
use std::io::Cursor;

use polars::prelude::*;
use tracing::info;

mod chart;
pub mod config;
mod extract;
mod fetcher;
pub mod render;
pub mod stats;
pub mod timeline;

pub use config::{DashboardConfig, Measure};
pub use extract::{country_series, parse_source_date};
pub use fetcher::fetch;
pub use render::render;
pub use stats::{composition, Ratios, Slice, SliceKind};
pub use timeline::{DailyRecord, Timeline};

/// 三个输入文件, 可以是路径或者 URL
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub confirmed: Option<String>,
    pub deaths: Option<String>,
    pub recovered: Option<String>,
}

impl Sources {
    pub fn is_complete(&self) -> bool {
        self.confirmed.is_some() && self.deaths.is_some() && self.recovered.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub country: String,
    pub timeline: Timeline,
    pub ratios: Ratios,
    pub composition: [Slice; 3],
}

#[derive(Debug, Clone)]
pub enum Dashboard {
    /// 还没有拿到全部三个文件
    Pending,
    Ready(Report),
}

pub fn build_report(
    confirmed: &DataFrame,
    deaths: &DataFrame,
    recovered: &DataFrame,
    config: &DashboardConfig,
) -> Result<Report> {
    let country = config.country.as_str();
    let confirmed = country_series(confirmed, country, Measure::Confirmed.column())
        .context("confirmed series")?;
    let deaths =
        country_series(deaths, country, Measure::Deaths.column()).context("deaths series")?;
    let recovered = country_series(recovered, country, Measure::Recovered.column())
        .context("recovered series")?;

    let timeline = Timeline::build(confirmed, deaths, recovered)?;
    let latest = timeline
        .latest()
        .ok_or_else(|| anyhow!("no date is shared by all three inputs"))?;
    let ratios = Ratios::from_record(latest);
    let composition = composition(latest);

    info!(
        "built report for {}: {} day(s), latest {}",
        country,
        timeline.len(),
        latest.date
    );
    Ok(Report {
        country: country.to_string(),
        timeline,
        ratios,
        composition,
    })
}

pub async fn load_dashboard(sources: &Sources, config: &DashboardConfig) -> Result<Dashboard> {
    if !sources.is_complete() {
        info!("waiting for all three inputs");
        return Ok(Dashboard::Pending);
    }

    let mut frames = Vec::with_capacity(3);
    for source in [&sources.confirmed, &sources.deaths, &sources.recovered]
        .into_iter()
        .flatten()
    {
        info!("retrieving data from source: {}", source);
        let df = load(fetch(source).await?).with_context(|| format!("parsing {}", source))?;
        frames.push(df);
    }

    let report = build_report(&frames[0], &frames[1], &frames[2], config)?;
    Ok(Dashboard::Ready(report))
}

pub fn load(data: String) -> Result<DataFrame> {
    let df = CsvReader::new(Cursor::new(data))
        .has_header(true)
        .infer_schema(Some(16))
        .finish()?;
    Ok(df)
}
