use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::timeline::DailyRecord;

pub const DEFAULT_TITLE: &str = "COVID-19 Dashboard";
pub const DEFAULT_COUNTRY: &str = "Korea, South";
pub const DEFAULT_TAIL_ROWS: usize = 10;

/// 三类累计数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Confirmed,
    Deaths,
    Recovered,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::Confirmed, Measure::Deaths, Measure::Recovered];

    /// 列名, 也是 CLI 中使用的名字
    pub fn column(self) -> &'static str {
        match self {
            Measure::Confirmed => "confirmed",
            Measure::Deaths => "deaths",
            Measure::Recovered => "recovered",
        }
    }

    pub fn daily_column(self) -> &'static str {
        match self {
            Measure::Confirmed => "new_confirmed",
            Measure::Deaths => "new_deaths",
            Measure::Recovered => "new_recovered",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Measure::Confirmed => "Confirmed",
            Measure::Deaths => "Deaths",
            Measure::Recovered => "Recovered",
        }
    }

    pub fn daily_label(self) -> &'static str {
        match self {
            Measure::Confirmed => "New confirmed",
            Measure::Deaths => "New deaths",
            Measure::Recovered => "New recovered",
        }
    }

    pub fn cumulative(self, record: &DailyRecord) -> i64 {
        match self {
            Measure::Confirmed => record.confirmed,
            Measure::Deaths => record.deaths,
            Measure::Recovered => record.recovered,
        }
    }

    pub fn daily(self, record: &DailyRecord) -> i64 {
        match self {
            Measure::Confirmed => record.new_confirmed,
            Measure::Deaths => record.new_deaths,
            Measure::Recovered => record.new_recovered,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Measure {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "confirmed" => Ok(Measure::Confirmed),
            "deaths" => Ok(Measure::Deaths),
            "recovered" => Ok(Measure::Recovered),
            other => Err(anyhow!(
                "unknown measure {:?}, expected confirmed, deaths or recovered",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub title: String,
    pub country: String,
    /// 累计折线图中显示的项目
    pub cumulative: Vec<Measure>,
    /// 每日增量柱状图中显示的项目
    pub daily: Vec<Measure>,
    pub tail_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            cumulative: vec![Measure::Confirmed, Measure::Recovered],
            daily: vec![Measure::Confirmed],
            tail_rows: DEFAULT_TAIL_ROWS,
        }
    }
}
