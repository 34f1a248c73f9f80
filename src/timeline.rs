use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::config::Measure;
use crate::extract::{DATE_COLUMN, DATE_FORMAT};

/// 合并后的一天
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub new_confirmed: i64,
    pub new_deaths: i64,
    pub new_recovered: i64,
}

/// 按日期合并三个长表, 排序后计算每日增量
pub fn merge(confirmed: DataFrame, deaths: DataFrame, recovered: DataFrame) -> Result<DataFrame> {
    let widest = confirmed
        .height()
        .max(deaths.height())
        .max(recovered.height());

    let deltas = Measure::ALL
        .iter()
        .map(|m| {
            (col(m.column()) - col(m.column()).shift(1))
                .fill_null(lit(0))
                .cast(DataType::Int64)
                .alias(m.daily_column())
        })
        .collect::<Vec<_>>();

    let merged = confirmed
        .lazy()
        .inner_join(deaths.lazy(), col(DATE_COLUMN), col(DATE_COLUMN))
        .inner_join(recovered.lazy(), col(DATE_COLUMN), col(DATE_COLUMN))
        // 源文件的列顺序不可靠, 先排序再做差分
        .sort(DATE_COLUMN, SortOptions { descending: false, nulls_last: true })
        .with_columns(deltas)
        .collect()?;

    if merged.height() < widest {
        warn!(
            "{} date(s) are missing from at least one input and were dropped",
            widest - merged.height()
        );
    }
    debug!("merged timeline: {} rows", merged.height());
    Ok(merged)
}

#[derive(Debug, Clone)]
pub struct Timeline {
    frame: DataFrame,
    records: Vec<DailyRecord>,
}

impl Timeline {
    pub fn build(confirmed: DataFrame, deaths: DataFrame, recovered: DataFrame) -> Result<Self> {
        let frame = merge(confirmed, deaths, recovered)?;
        Self::from_frame(frame)
    }

    pub fn from_frame(frame: DataFrame) -> Result<Self> {
        let dates = frame.column(DATE_COLUMN)?.utf8()?;
        let column = |name: &str| -> Result<Int64Chunked> {
            Ok(frame.column(name)?.cast(&DataType::Int64)?.i64()?.clone())
        };
        let confirmed = column(Measure::Confirmed.column())?;
        let deaths = column(Measure::Deaths.column())?;
        let recovered = column(Measure::Recovered.column())?;
        let new_confirmed = column(Measure::Confirmed.daily_column())?;
        let new_deaths = column(Measure::Deaths.daily_column())?;
        let new_recovered = column(Measure::Recovered.daily_column())?;

        let value = |ca: &Int64Chunked, name: &str, i: usize| -> Result<i64> {
            ca.get(i)
                .ok_or_else(|| anyhow!("missing {} value at row {}", name, i))
        };

        let mut records = Vec::with_capacity(frame.height());
        for i in 0..frame.height() {
            let label = dates
                .get(i)
                .ok_or_else(|| anyhow!("missing date at row {}", i))?;
            let date = NaiveDate::parse_from_str(label, DATE_FORMAT)
                .map_err(|e| anyhow!("bad date {:?}: {}", label, e))?;
            records.push(DailyRecord {
                date,
                confirmed: value(&confirmed, "confirmed", i)?,
                deaths: value(&deaths, "deaths", i)?,
                recovered: value(&recovered, "recovered", i)?,
                new_confirmed: value(&new_confirmed, "new_confirmed", i)?,
                new_deaths: value(&new_deaths, "new_deaths", i)?,
                new_recovered: value(&new_recovered, "new_recovered", i)?,
            });
        }

        Ok(Self { frame, records })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&DailyRecord> {
        self.records.last()
    }

    /// 最后 n 天
    pub fn tail(&self, n: usize) -> &[DailyRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }
}
