//! Report generation (CSV outputs and console summary)

use anyhow::{Context, Result};
use csv::Writer;
use std::path::{Path, PathBuf};

use crate::aggregate::{
    Period, Series, center_series, combined_series, filter_by_period, monthly_rollup, summary_stats,
};
use crate::constants;
use crate::format::format_thousands;
use crate::table::{Center, Table};

/// Write both CSV reports into `output_dir`, returning the written paths.
pub fn generate_all_reports(output_dir: &Path, table: &Table, period: Period) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    Ok(vec![
        generate_monthly_rollup(output_dir, table)?,
        generate_period_detail(output_dir, table, period)?,
    ])
}

/// Generate monthly_rollup.csv (every observed year × 12 months)
fn generate_monthly_rollup(output_dir: &Path, table: &Table) -> Result<PathBuf> {
    let path = output_dir.join(constants::MONTHLY_ROLLUP_FILENAME);
    let mut wtr = Writer::from_path(&path)?;

    wtr.write_record(["period", "year", "month", "month_label", "center_1", "center_2", "combined"])?;
    for row in monthly_rollup(table) {
        wtr.write_record([
            &row.period_label(),
            &row.year.to_string(),
            &row.month.to_string(),
            &row.month_label(),
            &format!("{:.4}", normalize_zero(row.center_1)),
            &format!("{:.4}", normalize_zero(row.center_2)),
            &format!("{:.4}", normalize_zero(row.combined)),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());

    Ok(path)
}

/// Generate period_detail.csv (selected month, one row per sheet row)
fn generate_period_detail(output_dir: &Path, table: &Table, period: Period) -> Result<PathBuf> {
    let path = output_dir.join(constants::PERIOD_DETAIL_FILENAME);
    let mut wtr = Writer::from_path(&path)?;

    let subset = filter_by_period(table, period);
    let combined = combined_series(&subset);

    wtr.write_record([
        "date",
        "center_1",
        "center_2",
        "combined",
        "combined_cumulative",
        "center_1_goods",
        "center_1_army",
        "center_1_label",
        "center_2_goods",
        "center_2_label",
    ])?;
    for (i, r) in subset.iter().enumerate() {
        wtr.write_record([
            &r.date.to_string(),
            &format!("{:.4}", r.center_1),
            &format!("{:.4}", r.center_2),
            &format!("{:.4}", combined.values[i]),
            &format!("{:.4}", combined.cumulative[i]),
            &r.volumes.center_1_goods.to_string(),
            &r.volumes.center_1_army.to_string(),
            &r.volumes.center_1_label.to_string(),
            &r.volumes.center_2_goods.to_string(),
            &r.volumes.center_2_label.to_string(),
        ])?;
    }

    wtr.flush()?;
    println!("  Generated: {}", path.display());

    Ok(path)
}

/// Normalize -0.0 to 0.0 for cleaner display
fn normalize_zero(val: f64) -> f64 {
    if val == 0.0 { 0.0 } else { val }
}

fn print_stats_block(label: &str, series: &Series) {
    println!("{}:", label);
    match summary_stats(series) {
        Some(stats) => {
            println!("  Days:           {:>12}", series.len());
            println!("  Min (만원):     {:>12}", format_thousands(stats.min));
            println!("  Max (만원):     {:>12}", format_thousands(stats.max));
            println!("  Mean (만원):    {:>12}", format_thousands(stats.mean));
            println!("  Total (만원):   {:>12}", format_thousands(stats.total));
        }
        None => println!("  (no rows)"),
    }
}

/// Print the selected period's statistics to the console
pub fn print_summary(table: &Table, period: Period) {
    let subset = filter_by_period(table, period);

    println!("\n============================================================");
    println!("           {} P/L SUMMARY ({})", constants::COMPANY_NAME, period);
    println!("============================================================\n");

    for center in Center::ALL {
        print_stats_block(center.display_name(), &center_series(&subset, center));
        println!();
    }
    print_stats_block("통합", &combined_series(&subset));

    let year_total: f64 = monthly_rollup(table)
        .iter()
        .filter(|m| m.year == period.year)
        .map(|m| m.combined)
        .sum();
    println!("\n  {} total (만원):  {:>12}", period.year, format_thousands(year_total));
    println!("============================================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Record, Volumes};
    use chrono::NaiveDate;

    fn sample_table() -> Table {
        let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        let v = Volumes {
            center_1_goods: 120.0,
            ..Volumes::default()
        };
        Table::new(vec![
            Record::new(d(1, 6), 2.0, 0.0, Volumes::default()),
            Record::new(d(1, 5), 10.0, -5.0, v),
            Record::new(d(3, 1), -1.0, 0.5, Volumes::default()),
        ])
    }

    #[test]
    fn test_generate_all_reports() {
        let dir = tempfile::tempdir().unwrap();
        let paths = generate_all_reports(dir.path(), &sample_table(), Period::new(2024, 1)).unwrap();
        assert_eq!(paths.len(), 2);

        let mut rollup = csv::Reader::from_path(dir.path().join(constants::MONTHLY_ROLLUP_FILENAME)).unwrap();
        let rows: Vec<csv::StringRecord> = rollup.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 12);
        assert_eq!(&rows[0][0], "2024-01");
        assert_eq!(&rows[0][3], "1월");
        assert_eq!(&rows[0][6], "7.0000");
        assert_eq!(&rows[1][6], "0.0000");
        assert_eq!(&rows[2][6], "-0.5000");

        let mut detail = csv::Reader::from_path(dir.path().join(constants::PERIOD_DETAIL_FILENAME)).unwrap();
        let rows: Vec<csv::StringRecord> = detail.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        // Sorted by date with the running total
        assert_eq!(&rows[0][0], "2024-01-05");
        assert_eq!(&rows[0][3], "5.0000");
        assert_eq!(&rows[1][4], "7.0000");
        assert_eq!(&rows[0][5], "120");
    }

    #[test]
    fn test_empty_period_detail_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        generate_all_reports(dir.path(), &sample_table(), Period::new(2024, 9)).unwrap();

        let mut detail = csv::Reader::from_path(dir.path().join(constants::PERIOD_DETAIL_FILENAME)).unwrap();
        assert_eq!(detail.headers().unwrap().len(), 10);
        assert_eq!(detail.records().count(), 0);
    }

    #[test]
    fn test_normalize_zero() {
        assert_eq!(format!("{:.1}", normalize_zero(-0.0)), "0.0");
    }
}
