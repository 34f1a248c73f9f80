use std::fmt::Write;

use anyhow::Result;

use crate::chart::{bar_chart, line_chart, pie_chart};
use crate::config::{DashboardConfig, Measure};
use crate::stats::format_rate;
use crate::{Dashboard, Report};

pub const PENDING_MESSAGE: &str =
    "Upload all three CSV files (confirmed, deaths, recovered) to see the dashboard.";

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; color: #222; }
.tabs > input { display: none; }
.tabs > label { display: inline-block; padding: .6rem 1.2rem; cursor: pointer; border-bottom: 2px solid transparent; }
.tabs > input:checked + label { border-bottom-color: #ff4b4b; color: #ff4b4b; }
.panel { display: none; padding-top: 1rem; border-top: 1px solid #ddd; }
#tab-trend:checked ~ #panel-trend,
#tab-summary:checked ~ #panel-summary,
#tab-ratios:checked ~ #panel-ratios { display: block; }
.info { background: #e8f0fe; border-radius: .5rem; padding: 1rem; }
.metrics { display: flex; gap: 4rem; }
.metric .name { font-size: .9rem; color: #666; }
.metric .value { font-size: 2.2rem; }
table { border-collapse: collapse; }
th, td { padding: .3rem .8rem; border-bottom: 1px solid #eee; text-align: right; }
th:first-child, td:first-child { text-align: left; }
"#;

/// 转义 HTML 中的特殊字符
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn render(dashboard: &Dashboard, config: &DashboardConfig) -> Result<String> {
    let body = match dashboard {
        Dashboard::Pending => format!("<div class=\"info\">{}</div>\n", escape(PENDING_MESSAGE)),
        Dashboard::Ready(report) => render_report(report, config)?,
    };
    let title = escape(&config.title);
    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n"
    ))
}

fn render_report(report: &Report, config: &DashboardConfig) -> Result<String> {
    let mut html = String::new();
    writeln!(html, "<p>Country: <strong>{}</strong></p>", escape(&report.country))?;
    html.push_str("<div class=\"tabs\">\n");
    for (id, label, checked) in [
        ("trend", "Trend", true),
        ("summary", "Summary", false),
        ("ratios", "Ratios", false),
    ] {
        let checked = if checked { " checked" } else { "" };
        writeln!(
            html,
            "<input type=\"radio\" name=\"tabs\" id=\"tab-{id}\"{checked}><label for=\"tab-{id}\">{label}</label>"
        )?;
    }
    html.push_str(&trend_panel(report, config)?);
    html.push_str(&summary_panel(report, config)?);
    html.push_str(&ratios_panel(report)?);
    html.push_str("</div>\n");
    Ok(html)
}

fn trend_panel(report: &Report, config: &DashboardConfig) -> Result<String> {
    let records = report.timeline.records();
    let mut html = String::from("<section class=\"panel\" id=\"panel-trend\">\n");

    html.push_str("<h2>Cumulative</h2>\n");
    // 没有选择任何项目时不画图
    if !config.cumulative.is_empty() {
        html.push_str(&line_chart(records, &config.cumulative, "Cumulative cases")?);
        html.push('\n');
    }

    html.push_str("<h2>Daily change</h2>\n");
    if !config.daily.is_empty() {
        html.push_str(&bar_chart(records, &config.daily, "Daily change")?);
        html.push('\n');
    }

    html.push_str("</section>\n");
    Ok(html)
}

fn summary_panel(report: &Report, config: &DashboardConfig) -> Result<String> {
    let mut html = String::from("<section class=\"panel\" id=\"panel-summary\">\n");
    html.push_str("<h2>Daily statistics</h2>\n<table>\n<tr><th>Date</th>");
    for m in Measure::ALL {
        write!(html, "<th>{}</th>", m.label())?;
    }
    for m in Measure::ALL {
        write!(html, "<th>{}</th>", m.daily_label())?;
    }
    html.push_str("</tr>\n");

    for r in report.timeline.tail(config.tail_rows) {
        write!(html, "<tr><td>{}</td>", r.date.format("%Y-%m-%d"))?;
        for m in Measure::ALL {
            write!(html, "<td>{}</td>", m.cumulative(r))?;
        }
        for m in Measure::ALL {
            write!(html, "<td>{}</td>", m.daily(r))?;
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n</section>\n");
    Ok(html)
}

fn ratios_panel(report: &Report) -> Result<String> {
    let mut html = String::from("<section class=\"panel\" id=\"panel-ratios\">\n");
    html.push_str("<h2>Recovery and death rate on the latest day</h2>\n");
    if let Some(latest) = report.timeline.latest() {
        writeln!(html, "<p>As of {}</p>", latest.date.format("%Y-%m-%d"))?;
    }
    writeln!(
        html,
        "<div class=\"metrics\">\n<div class=\"metric\"><div class=\"name\">Recovery rate</div><div class=\"value\">{}</div></div>\n<div class=\"metric\"><div class=\"name\">Death rate</div><div class=\"value\">{}</div></div>\n</div>",
        format_rate(report.ratios.recovery_rate),
        format_rate(report.ratios.death_rate)
    )?;

    html.push_str("<h2>Case distribution</h2>\n");
    html.push_str(&pie_chart(&report.composition, "Case distribution")?);
    html.push_str("\n</section>\n");
    Ok(html)
}
