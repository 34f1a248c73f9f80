use covid2dash::{load_dashboard, render, Dashboard, DashboardConfig, Measure, Report, Sources};

fn data(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn sources() -> Sources {
    Sources {
        confirmed: Some(data("confirmed.csv")),
        deaths: Some(format!("file://{}", data("deaths.csv"))),
        recovered: Some(data("recovered.csv")),
    }
}

async fn report(config: &DashboardConfig) -> Report {
    match load_dashboard(&sources(), config).await.unwrap() {
        Dashboard::Ready(report) => report,
        Dashboard::Pending => panic!("all three sources were given"),
    }
}

#[tokio::test]
async fn korea_timeline_is_merged_sorted_and_differenced() {
    let report = report(&DashboardConfig::default()).await;
    let records = report.timeline.records();

    // 1/27 只出现在 confirmed 中
    let dates: Vec<_> = records.iter().map(|r| r.date.to_string()).collect();
    assert_eq!(
        dates,
        vec!["2020-01-22", "2020-01-23", "2020-01-24", "2020-01-25", "2020-01-26"]
    );

    let recovered: Vec<_> = records.iter().map(|r| r.recovered).collect();
    assert_eq!(recovered, vec![0, 0, 1, 1, 2]);
    let new_recovered: Vec<_> = records.iter().map(|r| r.new_recovered).collect();
    assert_eq!(new_recovered, vec![0, 0, 1, 0, 1]);
    let new_confirmed: Vec<_> = records.iter().map(|r| r.new_confirmed).collect();
    assert_eq!(new_confirmed, vec![0, 0, 1, 0, 1]);
}

#[tokio::test]
async fn provinces_are_summed_for_china() {
    let config = DashboardConfig {
        country: "China".to_string(),
        ..DashboardConfig::default()
    };
    let report = report(&config).await;
    let confirmed: Vec<_> = report.timeline.records().iter().map(|r| r.confirmed).collect();
    assert_eq!(confirmed, vec![458, 466, 585, 802, 1126]);
    let latest = report.timeline.latest().unwrap();
    assert_eq!(latest.deaths, 52);
    assert_eq!(latest.recovered, 44);
}

#[tokio::test]
async fn latest_day_ratios_and_composition() {
    let report = report(&DashboardConfig::default()).await;
    let latest = report.timeline.latest().unwrap();
    assert_eq!(
        report.composition.iter().map(|s| s.value).sum::<i64>(),
        latest.confirmed
    );
    assert!((report.ratios.recovery_rate - 200.0 / 3.0).abs() < 1e-9);
    assert!((report.ratios.death_rate - 100.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn zero_confirmed_country_has_zero_rates() {
    let config = DashboardConfig {
        country: "Atlantis".to_string(),
        ..DashboardConfig::default()
    };
    let report = report(&config).await;
    assert_eq!(report.ratios.recovery_rate, 0.0);
    assert_eq!(report.ratios.death_rate, 0.0);
    let html = render(&Dashboard::Ready(report), &config).unwrap();
    assert!(html.contains("0.00%"));
}

#[tokio::test]
async fn unknown_country_reports_which_series_failed() {
    let config = DashboardConfig {
        country: "Narnia".to_string(),
        ..DashboardConfig::default()
    };
    let err = load_dashboard(&sources(), &config).await.unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("confirmed series"));
    assert!(message.contains("Narnia"));
}

#[tokio::test]
async fn missing_input_renders_the_prompt() {
    let sources = Sources {
        recovered: None,
        ..sources()
    };
    let config = DashboardConfig::default();
    let dashboard = load_dashboard(&sources, &config).await.unwrap();
    assert!(matches!(dashboard, Dashboard::Pending));
    let html = render(&dashboard, &config).unwrap();
    assert!(html.contains(covid2dash::render::PENDING_MESSAGE));
}

#[tokio::test]
async fn page_has_three_tabs_and_honours_selection() {
    let config = DashboardConfig {
        cumulative: vec![Measure::Deaths],
        daily: vec![],
        tail_rows: 3,
        ..DashboardConfig::default()
    };
    let report = report(&config).await;
    let html = render(&Dashboard::Ready(report), &config).unwrap();

    for tab in ["panel-trend", "panel-summary", "panel-ratios"] {
        assert!(html.contains(&format!("id=\"{}\"", tab)), "missing {}", tab);
    }
    assert!(html.contains("Korea, South"));
    // 只有折线图和饼图
    assert_eq!(html.matches("<svg").count(), 2);
    // 表头一行加最后三天
    let summary = html.split("id=\"panel-summary\"").nth(1).unwrap();
    let table = summary.split("</table>").next().unwrap();
    assert_eq!(table.matches("<tr>").count(), 4);
    assert!(table.contains("2020-01-26"));
    assert!(!table.contains("2020-01-23"));
}
