//! Chart descriptors and the sink that turns them into plotly.js figures.
//!
//! Descriptors carry data and presentation options only. Drawing is left to
//! whatever `ChartSink` receives them; the dashboard uses `PlotlySink`, which
//! emits `{data, layout}` JSON for the plotly CDN bundle.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::aggregate::{DailyVolume, MonthlyTotal, Series, VolumeItem};
use crate::constants;
use crate::format::format_manwon;
use crate::table::Volumes;

/// The sign rule used for every displayed signed value.
pub fn sign_color(value: f64) -> &'static str {
    if value < 0.0 {
        constants::NEGATIVE_COLOR
    } else {
        constants::POSITIVE_COLOR
    }
}

/// Largest magnitude in `values` (0 for an empty slice)
pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Symmetric primary-axis range, `None` (autorange) when every value is zero.
pub fn symmetric_range(values: &[f64]) -> Option<[f64; 2]> {
    let m = max_abs(values);
    if m == 0.0 {
        return None;
    }
    let bound = m * constants::AXIS_HEADROOM;
    Some([-bound, bound])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub hole: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedBarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub traces: Vec<BarTrace>,
}

/// Text placed on the chart at a data coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueLabel {
    pub x: String,
    pub y: f64,
    pub text: String,
}

/// Daily bars colored by sign plus a cumulative line on a secondary axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboChart {
    pub dates: Vec<String>,
    pub bar_name: String,
    pub bars: Vec<f64>,
    pub bar_colors: Vec<String>,
    pub line_name: String,
    pub cumulative: Vec<f64>,
    pub bar_labels: Vec<ValueLabel>,
    pub total_label: Option<ValueLabel>,
    pub y_range: Option<[f64; 2]>,
    pub height: u32,
}

/// Twelve monthly bars for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBarChart {
    pub year: i32,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
    pub texts: Vec<String>,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie(PieChart),
    StackedBar(StackedBarChart),
    Combo(ComboChart),
    MonthlyBar(MonthlyBarChart),
}

/// A chart with the DOM id it is rendered into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlot {
    pub id: String,
    pub spec: ChartSpec,
}

impl ChartSlot {
    pub fn new(id: impl Into<String>, spec: ChartSpec) -> Self {
        Self { id: id.into(), spec }
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Goods/army split and label split across the two centers.
pub fn volume_pies(totals: &Volumes) -> (PieChart, PieChart) {
    let goods = PieChart {
        title: "센터별 물자 & 군 공급 비율".to_string(),
        labels: vec![
            "동탄1센터 물자".to_string(),
            "동탄2센터 물자".to_string(),
            "동탄1센터 군물자".to_string(),
        ],
        values: vec![totals.center_1_goods, totals.center_2_goods, totals.center_1_army],
        hole: 0.3,
    };
    let labels = PieChart {
        title: "센터별 라벨비율".to_string(),
        labels: vec!["동탄1센터 라벨".to_string(), "동탄2센터 라벨".to_string()],
        values: vec![totals.center_1_label, totals.center_2_label],
        hole: 0.3,
    };
    (goods, labels)
}

/// One stacked trace per volume item, x = date.
pub fn stacked_volume_chart(daily: &[DailyVolume]) -> StackedBarChart {
    let traces = VolumeItem::ALL
        .iter()
        .map(|item| {
            let rows: Vec<&DailyVolume> = daily.iter().filter(|d| d.item == *item).collect();
            BarTrace {
                name: item.label().to_string(),
                x: rows.iter().map(|d| d.date.to_string()).collect(),
                y: rows.iter().map(|d| d.value).collect(),
            }
        })
        .collect();

    StackedBarChart {
        title: "일자별 물자/군/라벨 스택형 그래프".to_string(),
        x_title: "날짜".to_string(),
        y_title: "합계 (단위: kg 또는 건)".to_string(),
        traces,
    }
}

/// Combo chart for a profit/loss series. `None` when the series is empty.
///
/// `total_text` formats the label placed on the last cumulative point.
pub fn combo_chart(
    series: &Series,
    bar_name: &str,
    line_name: &str,
    total_text: fn(f64) -> String,
) -> Option<ComboChart> {
    let last_date = series.dates.last()?;
    let total = *series.cumulative.last()?;

    let dates: Vec<String> = series.dates.iter().map(|d| d.to_string()).collect();
    let m = max_abs(&series.values);
    let offset = m * constants::LABEL_OFFSET_RATIO;

    let bar_labels = dates
        .iter()
        .zip(&series.values)
        .map(|(x, &y)| ValueLabel {
            x: x.clone(),
            y: if y >= 0.0 { y + offset } else { y - offset },
            text: format_manwon(y),
        })
        .collect();

    Some(ComboChart {
        bar_colors: series.values.iter().map(|v| sign_color(*v).to_string()).collect(),
        bars: series.values.clone(),
        cumulative: series.cumulative.clone(),
        bar_name: bar_name.to_string(),
        line_name: line_name.to_string(),
        bar_labels,
        total_label: Some(ValueLabel {
            x: last_date.to_string(),
            y: total,
            text: total_text(total),
        }),
        y_range: symmetric_range(&series.values),
        height: constants::COMBO_CHART_HEIGHT,
        dates,
    })
}

/// Monthly combined bars for `year`, January to December.
pub fn monthly_bar_chart(rollup: &[MonthlyTotal], year: i32) -> MonthlyBarChart {
    let months: Vec<&MonthlyTotal> = rollup.iter().filter(|m| m.year == year).collect();

    MonthlyBarChart {
        year,
        labels: months.iter().map(|m| m.month_label()).collect(),
        values: months.iter().map(|m| m.combined).collect(),
        colors: months.iter().map(|m| sign_color(m.combined).to_string()).collect(),
        texts: months.iter().map(|m| format_manwon(m.combined)).collect(),
        height: constants::MONTHLY_CHART_HEIGHT,
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Receives chart descriptors for drawing.
pub trait ChartSink {
    fn render(&mut self, id: &str, chart: &ChartSpec) -> Result<()>;
}

/// A rendered plotly.js figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlyFigure {
    pub id: String,
    pub figure: Value,
}

/// Collects plotly.js `{data, layout}` figures.
#[derive(Debug, Default)]
pub struct PlotlySink {
    figures: Vec<PlotlyFigure>,
}

impl PlotlySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_figures(self) -> Vec<PlotlyFigure> {
        self.figures
    }
}

impl ChartSink for PlotlySink {
    fn render(&mut self, id: &str, chart: &ChartSpec) -> Result<()> {
        self.figures.push(PlotlyFigure {
            id: id.to_string(),
            figure: plotly_figure(chart),
        });
        Ok(())
    }
}

pub fn plotly_figure(chart: &ChartSpec) -> Value {
    match chart {
        ChartSpec::Pie(pie) => json!({
            "data": [{
                "type": "pie",
                "labels": pie.labels,
                "values": pie.values,
                "hole": pie.hole,
            }],
            "layout": {
                "title": { "text": pie.title, "x": 0.5, "y": 0.95, "font": { "size": 16 } },
            },
        }),
        ChartSpec::StackedBar(bar) => json!({
            "data": bar.traces.iter().map(|t| json!({
                "type": "bar",
                "name": t.name,
                "x": t.x,
                "y": t.y,
            })).collect::<Vec<_>>(),
            "layout": {
                "title": { "text": bar.title },
                "barmode": "stack",
                "bargap": 0.1,
                "xaxis": { "title": { "text": bar.x_title } },
                "yaxis": { "title": { "text": bar.y_title } },
            },
        }),
        ChartSpec::Combo(combo) => {
            let mut annotations: Vec<Value> = combo
                .bar_labels
                .iter()
                .map(|l| {
                    json!({
                        "x": l.x,
                        "y": l.y,
                        "text": l.text,
                        "showarrow": false,
                        "textangle": -45,
                    })
                })
                .collect();
            if let Some(total) = &combo.total_label {
                annotations.push(json!({
                    "x": total.x,
                    "y": total.y,
                    "yref": "y2",
                    "text": total.text,
                    "showarrow": false,
                    "yshift": 10,
                }));
            }

            let mut yaxis = json!({ "title": { "text": "일별 손익 (만원)" }, "rangemode": "tozero" });
            if let Some(range) = combo.y_range {
                yaxis["range"] = json!(range);
            }

            json!({
                "data": [
                    {
                        "type": "bar",
                        "x": combo.dates,
                        "y": combo.bars,
                        "name": combo.bar_name,
                        "marker": { "color": combo.bar_colors },
                        "yaxis": "y",
                    },
                    {
                        "type": "scatter",
                        "x": combo.dates,
                        "y": combo.cumulative,
                        "name": combo.line_name,
                        "mode": "lines+markers",
                        "yaxis": "y2",
                        "line": { "width": 5, "dash": "solid", "color": constants::CUMULATIVE_LINE_COLOR },
                        "marker": { "size": 9 },
                    },
                ],
                "layout": {
                    "xaxis": { "title": { "text": "날짜" }, "tickangle": -45 },
                    "yaxis": yaxis,
                    "yaxis2": {
                        "title": { "text": "누적 손익 (만원)" },
                        "side": "right",
                        "overlaying": "y",
                        "showgrid": false,
                    },
                    "height": combo.height,
                    "hovermode": "x unified",
                    "annotations": annotations,
                },
            })
        }
        ChartSpec::MonthlyBar(monthly) => json!({
            "data": [{
                "type": "bar",
                "x": monthly.labels,
                "y": monthly.values,
                "text": monthly.texts,
                "textposition": "outside",
                "marker": { "color": monthly.colors },
            }],
            "layout": {
                "height": monthly.height,
                "xaxis": {
                    "title": { "text": "월" },
                    "showline": true,
                    "categoryorder": "array",
                    "categoryarray": (1..=12).map(|m| format!("{}월", m)).collect::<Vec<_>>(),
                    "showgrid": true,
                },
                "yaxis": {
                    "title": { "text": "통합 손익 (만원)" },
                    "showline": true,
                    "zeroline": true,
                    "linewidth": 1,
                    "mirror": true,
                    "showgrid": true,
                    "zerolinewidth": 5,
                },
            },
        }),
    }
}
