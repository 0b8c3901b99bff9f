//! Period filtering and the aggregates behind every chart and metric card.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::table::{Center, Record, Table, Volumes};

/// A (year, month) selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Rows of one (year, month), ordered by date.
///
/// Unobserved periods give an empty subset, never an error.
pub fn filter_by_period(table: &Table, period: Period) -> Vec<Record> {
    let mut subset: Vec<Record> = table
        .records
        .iter()
        .filter(|r| r.year == period.year && r.month == period.month)
        .cloned()
        .collect();
    // Stable: same-date rows keep sheet order
    subset.sort_by_key(|r| r.date);
    subset
}

/// Per-row values alongside their running total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl Series {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        let cumulative = cumulative_sum(&values);
        Self {
            dates,
            values,
            cumulative,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// `out[i] = values[0] + … + values[i]`
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0_f64, |running, v| {
            *running += v;
            Some(*running)
        })
        .collect()
}

/// `center_1 + center_2` per row, with its running total.
pub fn combined_series(subset: &[Record]) -> Series {
    Series::new(
        subset.iter().map(|r| r.date).collect(),
        subset.iter().map(Record::combined).collect(),
    )
}

/// One center's per-row profit/loss, with its running total.
pub fn center_series(subset: &[Record], center: Center) -> Series {
    Series::new(
        subset.iter().map(|r| r.date).collect(),
        subset.iter().map(|r| r.center(center)).collect(),
    )
}

/// Min/max/mean over the per-row values; `total` is the final cumulative value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub total: f64,
}

impl SummaryStats {
    /// Largest magnitude among the per-row values, for symmetric axis ranges
    pub fn max_abs(&self) -> f64 {
        self.min.abs().max(self.max.abs())
    }
}

/// `None` for an empty series; callers show zeros plus a warning.
pub fn summary_stats(series: &Series) -> Option<SummaryStats> {
    let total = *series.cumulative.last()?;
    let min = series.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = series.values.iter().sum::<f64>() / series.values.len() as f64;

    Some(SummaryStats { min, max, mean, total })
}

/// One (year, month) bucket of the full-year rollup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub center_1: f64,
    pub center_2: f64,
    pub combined: f64,
}

impl MonthlyTotal {
    /// `YYYY-MM`
    pub fn period_label(&self) -> String {
        Period::new(self.year, self.month).to_string()
    }

    /// `N월`
    pub fn month_label(&self) -> String {
        format!("{}월", self.month)
    }
}

/// Exactly twelve rows per observed year, sorted by (year, month), zero-filled.
pub fn monthly_rollup(table: &Table) -> Vec<MonthlyTotal> {
    let mut sums: BTreeMap<Period, (f64, f64)> = BTreeMap::new();
    for r in &table.records {
        let entry = sums.entry(Period::new(r.year, r.month)).or_insert((0.0, 0.0));
        entry.0 += r.center_1;
        entry.1 += r.center_2;
    }

    let years: BTreeSet<i32> = table.records.iter().map(|r| r.year).collect();

    years
        .into_iter()
        .flat_map(|year| (1..=12).map(move |month| Period::new(year, month)))
        .map(|period| {
            let (center_1, center_2) = sums.get(&period).copied().unwrap_or((0.0, 0.0));
            MonthlyTotal {
                year: period.year,
                month: period.month,
                center_1,
                center_2,
                combined: center_1 + center_2,
            }
        })
        .collect()
}

/// Summed volume columns for a subset (pie charts)
pub fn volume_totals(subset: &[Record]) -> Volumes {
    subset
        .iter()
        .fold(Volumes::default(), |mut acc, r| {
            acc.center_1_goods += r.volumes.center_1_goods;
            acc.center_1_army += r.volumes.center_1_army;
            acc.center_1_label += r.volumes.center_1_label;
            acc.center_2_goods += r.volumes.center_2_goods;
            acc.center_2_label += r.volumes.center_2_label;
            acc
        })
}

/// Volume item shown in the stacked daily bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeItem {
    Center1Goods,
    Center1Army,
    Center1Label,
    Center2Goods,
    Center2Label,
}

impl VolumeItem {
    pub const ALL: [VolumeItem; 5] = [
        VolumeItem::Center1Goods,
        VolumeItem::Center1Army,
        VolumeItem::Center1Label,
        VolumeItem::Center2Goods,
        VolumeItem::Center2Label,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Center1Goods => "동탄1 물자",
            Self::Center1Army => "동탄1 군",
            Self::Center1Label => "동탄1 라벨",
            Self::Center2Goods => "동탄2 물자",
            Self::Center2Label => "동탄2 라벨",
        }
    }

    pub fn value(&self, volumes: &Volumes) -> f64 {
        match self {
            Self::Center1Goods => volumes.center_1_goods,
            Self::Center1Army => volumes.center_1_army,
            Self::Center1Label => volumes.center_1_label,
            Self::Center2Goods => volumes.center_2_goods,
            Self::Center2Label => volumes.center_2_label,
        }
    }
}

/// Long-form (date, item, value) rows, item-major like a melt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub item: VolumeItem,
    pub value: f64,
}

pub fn daily_volumes(subset: &[Record]) -> Vec<DailyVolume> {
    VolumeItem::ALL
        .iter()
        .flat_map(|item| {
            subset.iter().map(move |r| DailyVolume {
                date: r.date,
                item: *item,
                value: item.value(&r.volumes),
            })
        })
        .collect()
}

/// Distinct years, newest first (sidebar order)
pub fn available_years(table: &Table) -> Vec<i32> {
    let years: BTreeSet<i32> = table.records.iter().map(|r| r.year).collect();
    years.into_iter().rev().collect()
}

/// Distinct months observed in `year`, ascending
pub fn available_months(table: &Table, year: i32) -> Vec<u32> {
    let months: BTreeSet<u32> = table
        .records
        .iter()
        .filter(|r| r.year == year)
        .map(|r| r.month)
        .collect();
    months.into_iter().collect()
}

/// Sidebar selection with its option lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub period: Period,
    pub years: Vec<i32>,
    pub months: Vec<u32>,
}

impl Selection {
    /// Keep the requested year/month when observed; otherwise fall back to the
    /// first option of each list. `None` when the table has no rows.
    pub fn resolve(table: &Table, year: Option<i32>, month: Option<u32>) -> Option<Self> {
        let years = available_years(table);
        let year = year
            .filter(|y| years.contains(y))
            .or_else(|| years.first().copied())?;

        let months = available_months(table, year);
        let month = month
            .filter(|m| months.contains(m))
            .or_else(|| months.first().copied())?;

        Some(Self {
            period: Period::new(year, month),
            years,
            months,
        })
    }
}
