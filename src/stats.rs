use crate::timeline::DailyRecord;

/// 最新一天的回复率和死亡率, 百分比
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratios {
    pub recovery_rate: f64,
    pub death_rate: f64,
}

impl Ratios {
    pub fn from_record(record: &DailyRecord) -> Self {
        Self {
            recovery_rate: percent(record.recovered, record.confirmed),
            death_rate: percent(record.deaths, record.confirmed),
        }
    }
}

// 确诊为 0 时返回 0
fn percent(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

pub fn format_rate(rate: f64) -> String {
    format!("{:.2}%", rate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKind {
    Recovered,
    Deaths,
    Active,
}

impl SliceKind {
    pub fn label(self) -> &'static str {
        match self {
            SliceKind::Recovered => "Recovered",
            SliceKind::Deaths => "Deaths",
            SliceKind::Active => "Active",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub kind: SliceKind,
    pub value: i64,
}

/// 饼图数据: 回复, 死亡, 隔离中 (= 确诊 - 回复 - 死亡)
pub fn composition(record: &DailyRecord) -> [Slice; 3] {
    [
        Slice {
            kind: SliceKind::Recovered,
            value: record.recovered,
        },
        Slice {
            kind: SliceKind::Deaths,
            value: record.deaths,
        },
        Slice {
            kind: SliceKind::Active,
            value: record.confirmed - record.recovered - record.deaths,
        },
    ]
}
