use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::Range;

use anyhow::Result;
use plotters::prelude::*;

use crate::config::Measure;
use crate::stats::{Slice, SliceKind};
use crate::timeline::DailyRecord;

const SIZE: (u32, u32) = (960, 420);
const PIE_SIZE: (u32, u32) = (560, 420);
const PIE_RADIUS: f64 = 1.0;
// 每一整圈的多边形边数
const PIE_STEPS: f64 = 120.0;

fn measure_color(m: Measure) -> RGBColor {
    match m {
        Measure::Confirmed => RGBColor(31, 119, 180),
        Measure::Deaths => RGBColor(214, 39, 40),
        Measure::Recovered => RGBColor(44, 160, 44),
    }
}

fn slice_color(kind: SliceKind) -> RGBColor {
    match kind {
        SliceKind::Recovered => RGBColor(44, 160, 44),
        SliceKind::Deaths => RGBColor(214, 39, 40),
        SliceKind::Active => RGBColor(255, 127, 14),
    }
}

fn x_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

// 总是包含 0, 上下各留一点空白
fn y_range(values: impl Iterator<Item = i64>) -> Range<f64> {
    let (lo, hi) = values.fold((0i64, 0i64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let hi = if hi <= lo { lo + 1 } else { hi };
    let pad = (hi - lo) as f64 * 0.05;
    let bottom = if lo < 0 { lo as f64 - pad } else { 0.0 };
    bottom..(hi as f64 + pad)
}

fn date_label(records: &[DailyRecord], x: f64) -> String {
    let i = x.round();
    if i < 0.0 || (x - i).abs() > 1e-6 {
        return String::new();
    }
    records
        .get(i as usize)
        .map(|r| r.date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// 累计折线图
pub fn line_chart(records: &[DailyRecord], measures: &[Measure], title: &str) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let y = y_range(
            records
                .iter()
                .flat_map(|r| measures.iter().map(move |m| m.cumulative(r))),
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range(records.len()), y)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .x_label_formatter(&|x| date_label(records, *x))
            .y_label_formatter(&|y| format!("{:.0}", y))
            .draw()?;

        for &m in measures {
            let color = measure_color(m);
            chart
                .draw_series(
                    LineSeries::new(
                        records
                            .iter()
                            .enumerate()
                            .map(|(i, r)| (i as f64, m.cumulative(r) as f64)),
                        &color,
                    )
                    .point_size(2),
                )?
                .label(m.label())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    Ok(svg)
}

/// 每日增量柱状图, 多个项目并排
pub fn bar_chart(records: &[DailyRecord], measures: &[Measure], title: &str) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let y = y_range(
            records
                .iter()
                .flat_map(|r| measures.iter().map(move |m| m.daily(r))),
        );
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range(records.len()), y)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(6)
            .x_label_formatter(&|x| date_label(records, *x))
            .y_label_formatter(&|y| format!("{:.0}", y))
            .draw()?;

        let width = 0.8 / measures.len().max(1) as f64;
        for (j, &m) in measures.iter().enumerate() {
            let color = measure_color(m);
            chart
                .draw_series(records.iter().enumerate().map(move |(i, r)| {
                    let x0 = i as f64 - 0.4 + j as f64 * width;
                    let v = m.daily(r) as f64;
                    // 左上角和右下角, 负值柱向下画
                    Rectangle::new([(x0, v.max(0.0)), (x0 + width, v.min(0.0))], color.filled())
                }))?
                .label(m.daily_label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    Ok(svg)
}

fn sector(start: f64, sweep: f64) -> Vec<(f64, f64)> {
    let steps = ((sweep / TAU) * PIE_STEPS).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push((0.0, 0.0));
    for k in 0..=steps {
        // 从 12 点方向开始顺时针
        let angle = FRAC_PI_2 - (start + sweep * k as f64 / steps as f64);
        points.push((PIE_RADIUS * angle.cos(), PIE_RADIUS * angle.sin()));
    }
    points
}

/// 人数分布饼图, 负值按 0 处理
pub fn pie_chart(slices: &[Slice], title: &str) -> Result<String> {
    let total: i64 = slices.iter().map(|s| s.value.max(0)).sum();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(15)
            .build_cartesian_2d(-1.75f64..1.75f64, -1.2f64..1.2f64)?;

        let mut start = 0.0;
        for s in slices {
            let value = s.value.max(0);
            let share = if total == 0 {
                0.0
            } else {
                value as f64 / total as f64
            };
            let sweep = share * TAU;
            let color = slice_color(s.kind);
            let shape = if value > 0 {
                Some(Polygon::new(sector(start, sweep), color.filled()))
            } else {
                None
            };
            chart
                .draw_series(shape)?
                .label(format!("{} {:.1}%", s.kind.label(), share * 100.0))
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
            start += sweep;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        root.present()?;
    }
    Ok(svg)
}
