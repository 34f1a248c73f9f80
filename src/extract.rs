use std::collections::HashSet;

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::debug;

pub const COUNTRY_COLUMN: &str = "Country/Region";
pub const DATE_COLUMN: &str = "date";

// 源文件中的标识列, 其余列均为日期
const ID_COLUMNS: [&str; 4] = ["Province/State", COUNTRY_COLUMN, "Lat", "Long"];

// 源文件日期格式, 例如 1/22/20
const SOURCE_DATE_FORMAT: &str = "%m/%d/%y";
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_source_date(label: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(label.trim(), SOURCE_DATE_FORMAT)
        .map_err(|e| anyhow!("column {:?} is not a m/d/yy date: {}", label, e))
}

/// 提取某个国家的数据, 多个省份按日期求和, 并转换成 (date, value_name) 的长表
pub fn country_series(df: &DataFrame, country: &str, value_name: &str) -> Result<DataFrame> {
    if !df.get_column_names().contains(&COUNTRY_COLUMN) {
        bail!("missing {:?} column", COUNTRY_COLUMN);
    }

    let rows = df
        .clone()
        .lazy()
        .filter(col(COUNTRY_COLUMN).eq(lit(country)))
        .collect()?;
    if rows.height() == 0 {
        bail!("no rows for country {:?}", country);
    }

    let mut values = rows;
    for name in ID_COLUMNS {
        if values.get_column_names().contains(&name) {
            values = values.drop(name)?;
        }
    }
    debug!(
        "{}: {} row(s) x {} date column(s) for {}",
        value_name,
        values.height(),
        values.width(),
        country
    );

    let mut seen = HashSet::new();
    let mut dates = Vec::with_capacity(values.width());
    let mut totals = Vec::with_capacity(values.width());
    for s in values.get_columns() {
        let date = parse_source_date(s.name())?;
        if !seen.insert(date) {
            bail!("date {} appears more than once", date);
        }
        if !s.dtype().is_numeric() {
            bail!("column {:?} is not numeric ({:?})", s.name(), s.dtype());
        }
        // 先按原类型求和再取整, 小数列逐格截断会丢数
        let total = s.sum::<f64>().unwrap_or(0.0).round() as i64;
        dates.push(date.format(DATE_FORMAT).to_string());
        totals.push(total);
    }

    let long = DataFrame::new(vec![
        Series::new(DATE_COLUMN, dates),
        Series::new(value_name, totals),
    ])?;
    Ok(long)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load;

    const CONFIRMED: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20
,\"Korea, South\",35.9,127.7,1,1,2
Hubei,China,30.9,112.2,444,444,549
Beijing,China,40.1,116.4,14,22,36
";

    #[test]
    fn source_dates_use_month_day_short_year() {
        assert_eq!(
            parse_source_date("1/22/20").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 22).unwrap()
        );
        assert_eq!(
            parse_source_date("12/03/21").unwrap(),
            NaiveDate::from_ymd_opt(2021, 12, 3).unwrap()
        );
        assert!(parse_source_date("2020-01-22").is_err());
    }

    #[test]
    fn one_row_per_date_for_a_single_province_country() {
        let df = load(CONFIRMED.to_string()).unwrap();
        let korea = country_series(&df, "Korea, South", "confirmed").unwrap();
        assert_eq!(korea.height(), 3);
        let dates: Vec<_> = korea
            .column(DATE_COLUMN)
            .unwrap()
            .utf8()
            .unwrap()
            .into_iter()
            .map(|d| d.unwrap().to_string())
            .collect();
        assert_eq!(dates, vec!["2020-01-22", "2020-01-23", "2020-01-24"]);
        let values: Vec<_> = korea
            .column("confirmed")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn provinces_are_summed_per_date() {
        let df = load(CONFIRMED.to_string()).unwrap();
        let china = country_series(&df, "China", "confirmed").unwrap();
        assert_eq!(china.height(), 3);
        let values: Vec<_> = china
            .column("confirmed")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(458), Some(466), Some(585)]);
    }

    #[test]
    fn unknown_country_is_an_error() {
        let df = load(CONFIRMED.to_string()).unwrap();
        let err = country_series(&df, "Atlantis", "confirmed").unwrap_err();
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn bad_date_header_is_an_error() {
        let csv = "Country/Region,Lat,Long,first\nFrance,46.2,2.2,3\n";
        let df = load(csv.to_string()).unwrap();
        assert!(country_series(&df, "France", "deaths").is_err());
    }

    #[test]
    fn fractional_cells_are_summed_before_rounding() {
        let csv = "Province/State,Country/Region,Lat,Long,1/1/20,1/2/20\n\
A,France,46.2,2.2,1.0,1.6\n\
B,France,46.2,2.2,2.0,1.6\n";
        let df = load(csv.to_string()).unwrap();
        let france = country_series(&df, "France", "confirmed").unwrap();
        let values: Vec<_> = france
            .column("confirmed")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(3), Some(3)]);
    }

    #[test]
    fn repeated_date_is_an_error() {
        let csv = "Country/Region,1/2/20,01/02/20\nFrance,1,2\n";
        let df = load(csv.to_string()).unwrap();
        let err = country_series(&df, "France", "deaths").unwrap_err();
        assert!(err.to_string().contains("appears more than once"));
    }

    #[test]
    fn text_cell_in_date_column_is_an_error() {
        let csv = "Country/Region,1/1/20,1/2/20\nFrance,1,abc\n";
        let df = load(csv.to_string()).unwrap();
        let err = country_series(&df, "France", "deaths").unwrap_err();
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn missing_country_column_is_an_error() {
        let csv = "Province/State,1/22/20\nHubei,1\n";
        let df = load(csv.to_string()).unwrap();
        let err = country_series(&df, "China", "deaths").unwrap_err();
        assert!(err.to_string().contains("Country/Region"));
    }
}
