//! Dashboard assembly: one normalized table plus a selection in, every tab's
//! titles, metric cards and chart descriptors out.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::{
    Selection, SummaryStats, center_series, combined_series, daily_volumes, filter_by_period, monthly_rollup,
    summary_stats, volume_totals,
};
use crate::charts::{
    ChartSink, ChartSlot, ChartSpec, combo_chart, monthly_bar_chart, sign_color, stacked_volume_chart, volume_pies,
};
use crate::constants;
use crate::format::{format_manwon, format_manwon_won, format_thousands};
use crate::source::TableSource;
use crate::table::{Center, Normalized, NormalizeWarning, Table, normalize};

// =============================================================================
// Loading
// =============================================================================

/// Read the whole worksheet from `source` and normalize it.
pub async fn load_table<S: TableSource>(source: &S) -> Result<Normalized> {
    let origin = source.describe();
    let grid = source
        .read_all()
        .await
        .with_context(|| format!("Failed to read {}", origin))?;

    let normalized = normalize(&grid).with_context(|| format!("Failed to normalize {}", origin))?;

    for warning in &normalized.warnings {
        if let NormalizeWarning::InvalidNumber { .. } = warning {
            warn!(%warning, "invalid number");
        }
    }
    info!(
        rows = normalized.table.len(),
        rejected = normalized.rejected.len(),
        source = %origin,
        "table loaded"
    );

    Ok(normalized)
}

// =============================================================================
// View model
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message shown above the tabs or inside one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&NormalizeWarning> for Notice {
    fn from(warning: &NormalizeWarning) -> Self {
        Notice::warning(warning.to_string())
    }
}

/// Summary figure with its sign color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub icon: String,
    pub label: String,
    pub value: f64,
    pub formatted: String,
    pub color: String,
}

impl MetricCard {
    fn new(icon: &str, label: &str, value: f64) -> Self {
        Self {
            icon: icon.to_string(),
            label: label.to_string(),
            value,
            formatted: format_thousands(value),
            color: sign_color(value).to_string(),
        }
    }
}

/// Min, max, cumulative and mean cards, in display order.
///
/// An empty period passes `None` and every card reads 0.
pub fn metric_cards(stats: Option<&SummaryStats>) -> Vec<MetricCard> {
    let stats = stats.copied().unwrap_or_default();
    vec![
        MetricCard::new("📉", "최저 손익", stats.min),
        MetricCard::new("📈", "최고 손익", stats.max),
        MetricCard::new("🔢", "누적 손익", stats.total),
        MetricCard::new("📊", "평균 손익", stats.mean),
    ]
}

/// Which tab of the page is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    Combined,
    Center(Center),
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Combined, Tab::Center(Center::One), Tab::Center(Center::Two)];

    /// Query-string value
    pub fn key(&self) -> &'static str {
        match self {
            Tab::Combined => "combined",
            Tab::Center(center) => center.column(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Combined => "통합정보",
            Tab::Center(center) => center.display_name(),
        }
    }

    /// Unknown keys fall back to the combined tab
    pub fn from_key(key: &str) -> Self {
        Center::from_column(key).map(Tab::Center).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedTab {
    pub volume_title: String,
    /// Two pies and the stacked daily bar; empty when the period has no rows
    pub volume_charts: Vec<ChartSlot>,
    pub pnl_title: String,
    pub cards: Vec<MetricCard>,
    pub pnl_chart: Option<ChartSlot>,
    pub monthly_title: String,
    pub monthly_chart: ChartSlot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CenterTab {
    pub center: Center,
    pub title: String,
    pub cards: Vec<MetricCard>,
    pub pnl_chart: Option<ChartSlot>,
}

/// Everything the page renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub selection: Selection,
    pub combined: CombinedTab,
    pub centers: Vec<CenterTab>,
    pub notices: Vec<Notice>,
    /// Set when the selected period has no rows
    pub empty_period: bool,
}

impl Dashboard {
    /// Build every tab for `selection` from the full table.
    pub fn build(table: &Table, selection: Selection, warnings: &[NormalizeWarning]) -> Self {
        let period = selection.period;
        let subset = filter_by_period(table, period);
        let (year, month) = (period.year, period.month);

        let mut notices: Vec<Notice> = warnings
            .iter()
            .filter(|w| !matches!(w, NormalizeWarning::InvalidNumber { .. }))
            .map(Notice::from)
            .collect();
        let invalid = warnings
            .iter()
            .filter(|w| matches!(w, NormalizeWarning::InvalidNumber { .. }))
            .count();
        if invalid > 0 {
            notices.push(Notice::warning(format!(
                "숫자로 바꿀 수 없는 값 {}개를 0으로 처리했습니다.",
                invalid
            )));
        }

        let empty_period = subset.is_empty();
        if empty_period {
            notices.push(Notice::warning(format!("{}년 {}월 데이터가 없습니다.", year, month)));
        }

        // Combined tab
        let volume_charts = if empty_period {
            Vec::new()
        } else {
            let (goods, labels) = volume_pies(&volume_totals(&subset));
            vec![
                ChartSlot::new("combined-goods-pie", ChartSpec::Pie(goods)),
                ChartSlot::new("combined-label-pie", ChartSpec::Pie(labels)),
                ChartSlot::new(
                    "combined-volume-bar",
                    ChartSpec::StackedBar(stacked_volume_chart(&daily_volumes(&subset))),
                ),
            ]
        };

        let series = combined_series(&subset);
        let combined = CombinedTab {
            volume_title: format!("{}년 {}월 {} 물량 현황", year, month, constants::COMPANY_NAME),
            volume_charts,
            pnl_title: format!("{}년 {}월 {} 손익 현황", year, month, constants::COMPANY_NAME),
            cards: metric_cards(summary_stats(&series).as_ref()),
            pnl_chart: combo_chart(&series, "통합 일별 손익", "통합 누적 손익", format_manwon)
                .map(|c| ChartSlot::new("combined-pnl", ChartSpec::Combo(c))),
            monthly_title: format!("{}년 전체 월별 통합 손익", year),
            monthly_chart: ChartSlot::new(
                "combined-monthly",
                ChartSpec::MonthlyBar(monthly_bar_chart(&monthly_rollup(table), year)),
            ),
        };

        // Per-center tabs
        let centers = Center::ALL
            .iter()
            .map(|&center| {
                let series = center_series(&subset, center);
                let name = center.display_name();
                CenterTab {
                    center,
                    title: format!("{}년 {}월 {}", year, month, name),
                    cards: metric_cards(summary_stats(&series).as_ref()),
                    pnl_chart: combo_chart(
                        &series,
                        &format!("{} 일별 손익", name),
                        &format!("{} 누적 손익", name),
                        format_manwon_won,
                    )
                    .map(|c| ChartSlot::new(format!("{}-pnl", center.column()), ChartSpec::Combo(c))),
                }
            })
            .collect();

        Self {
            selection,
            combined,
            centers,
            notices,
            empty_period,
        }
    }

    /// Charts belonging to one tab, in page order.
    pub fn charts_for(&self, tab: Tab) -> Vec<&ChartSlot> {
        match tab {
            Tab::Combined => self
                .combined
                .volume_charts
                .iter()
                .chain(self.combined.pnl_chart.as_ref())
                .chain(std::iter::once(&self.combined.monthly_chart))
                .collect(),
            Tab::Center(center) => self
                .centers
                .iter()
                .filter(|t| t.center == center)
                .filter_map(|t| t.pnl_chart.as_ref())
                .collect(),
        }
    }

    pub fn center_tab(&self, center: Center) -> Option<&CenterTab> {
        self.centers.iter().find(|t| t.center == center)
    }

    /// Hand one tab's charts to `sink`.
    pub fn render_tab(&self, tab: Tab, sink: &mut impl ChartSink) -> Result<()> {
        for slot in self.charts_for(tab) {
            sink.render(&slot.id, &slot.spec)
                .with_context(|| format!("Failed to render chart {}", slot.id))?;
        }
        Ok(())
    }

    /// Hand every chart on the page to `sink`.
    pub fn render_all(&self, sink: &mut impl ChartSink) -> Result<()> {
        for tab in Tab::ALL {
            self.render_tab(tab, sink)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Period;
    use crate::table::{Record, Volumes};
    use chrono::NaiveDate;

    struct Recorder(Vec<String>);

    impl ChartSink for Recorder {
        fn render(&mut self, id: &str, _chart: &ChartSpec) -> Result<()> {
            self.0.push(id.to_string());
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_table() -> Table {
        Table::new(vec![
            Record::new(date(2024, 1, 5), 10.0, -5.0, Volumes::default()),
            Record::new(date(2024, 1, 6), 2.0, 0.0, Volumes::default()),
            Record::new(date(2024, 2, 1), -1.0, -1.0, Volumes::default()),
        ])
    }

    #[test]
    fn test_metric_cards_order_and_colors() {
        let stats = SummaryStats {
            min: -5.0,
            max: 12.0,
            mean: 3.5,
            total: 7.0,
        };
        let cards = metric_cards(Some(&stats));
        let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["최저 손익", "최고 손익", "누적 손익", "평균 손익"]);
        assert_eq!(cards[0].color, constants::NEGATIVE_COLOR);
        assert_eq!(cards[1].color, constants::POSITIVE_COLOR);
        assert_eq!(cards[2].formatted, "7");
        assert_eq!(cards[3].formatted, "4");
    }

    #[test]
    fn test_metric_cards_empty_period() {
        let cards = metric_cards(None);
        assert!(cards.iter().all(|c| c.value == 0.0 && c.formatted == "0"));
        assert!(cards.iter().all(|c| c.color == constants::POSITIVE_COLOR));
    }

    #[test]
    fn test_tab_keys() {
        assert_eq!(Tab::from_key("center_2"), Tab::Center(Center::Two));
        assert_eq!(Tab::from_key("combined"), Tab::Combined);
        assert_eq!(Tab::from_key("bogus"), Tab::Combined);
        assert_eq!(Tab::Center(Center::One).label(), "동탄1센터");
    }

    #[test]
    fn test_build_titles_and_cards() {
        let table = sample_table();
        let selection = Selection::resolve(&table, Some(2024), Some(1)).unwrap();
        let dash = Dashboard::build(&table, selection, &[]);

        assert_eq!(dash.combined.volume_title, "2024년 1월 CJ 물류센터 물량 현황");
        assert_eq!(dash.combined.pnl_title, "2024년 1월 CJ 물류센터 손익 현황");
        assert_eq!(dash.combined.monthly_title, "2024년 전체 월별 통합 손익");
        assert_eq!(dash.centers[1].title, "2024년 1월 동탄2센터");

        // combined series [5, 2]
        let cards = &dash.combined.cards;
        assert_eq!(cards[0].value, 2.0);
        assert_eq!(cards[1].value, 5.0);
        assert_eq!(cards[2].value, 7.0);
        assert_eq!(cards[3].value, 3.5);
        assert!(!dash.empty_period);
        assert!(dash.notices.is_empty());
    }

    #[test]
    fn test_empty_period_has_warning_and_no_data_charts() {
        let table = sample_table();
        let selection = Selection {
            period: Period::new(2024, 7),
            years: vec![2024],
            months: vec![1, 2],
        };
        let dash = Dashboard::build(&table, selection, &[]);

        assert!(dash.empty_period);
        assert_eq!(dash.notices.len(), 1);
        assert_eq!(dash.notices[0].level, NoticeLevel::Warning);
        assert!(dash.combined.volume_charts.is_empty());
        assert!(dash.combined.pnl_chart.is_none());
        assert!(dash.combined.cards.iter().all(|c| c.value == 0.0));
        // The yearly chart still renders
        assert_eq!(dash.charts_for(Tab::Combined).len(), 1);
    }

    #[test]
    fn test_render_order() {
        let table = sample_table();
        let selection = Selection::resolve(&table, Some(2024), Some(1)).unwrap();
        let dash = Dashboard::build(&table, selection, &[]);

        let mut recorder = Recorder(Vec::new());
        dash.render_all(&mut recorder).unwrap();
        assert_eq!(
            recorder.0,
            vec![
                "combined-goods-pie",
                "combined-label-pie",
                "combined-volume-bar",
                "combined-pnl",
                "combined-monthly",
                "center_1-pnl",
                "center_2-pnl",
            ]
        );
    }

    #[test]
    fn test_normalize_warnings_become_notices() {
        let table = sample_table();
        let selection = Selection::resolve(&table, None, None).unwrap();
        let warnings = vec![
            NormalizeWarning::MissingColumn {
                column: "center_2".into(),
            },
            NormalizeWarning::InvalidNumber {
                column: "center_1".into(),
                row: 3,
                raw: "abc".into(),
            },
            NormalizeWarning::InvalidNumber {
                column: "center_1".into(),
                row: 4,
                raw: "?".into(),
            },
        ];
        let dash = Dashboard::build(&table, selection, &warnings);

        assert_eq!(dash.notices.len(), 2);
        assert_eq!(dash.notices[0].message, "'동탄2센터' 컬럼이 없습니다.");
        assert!(dash.notices[1].message.contains("2개"));
    }
}
