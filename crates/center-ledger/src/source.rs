//! Where the raw grid comes from.
//!
//! The normalizer only ever sees a `Grid`; the remote sheet, a CSV export and
//! in-memory fixtures all sit behind `TableSource`.

use anyhow::{Context, Result};
use std::future::Future;
use std::path::{Path, PathBuf};

/// Cell values as strings, first row is the header
pub type Grid = Vec<Vec<String>>;

/// Anything that can hand back the whole worksheet as a grid of strings.
pub trait TableSource {
    /// Human-readable origin, used in log lines
    fn describe(&self) -> String;

    fn read_all(&self) -> impl Future<Output = Result<Grid>> + Send;
}

/// Fixed grid held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    grid: Grid,
}

impl StaticSource {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Build from string slices, mostly for tests
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }
}

impl TableSource for StaticSource {
    fn describe(&self) -> String {
        format!("in-memory grid ({} rows)", self.grid.len())
    }

    async fn read_all(&self) -> Result<Grid> {
        Ok(self.grid.clone())
    }
}

/// CSV export of the worksheet (File → Download → CSV).
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for CsvSource {
    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }

    async fn read_all(&self) -> Result<Grid> {
        read_csv_grid(&self.path)
    }
}

fn read_csv_grid(path: &Path) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV: {}", path.display()))?;

    let mut grid = Grid::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV line {} of {}", idx + 1, path.display()))?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_static_source_returns_grid() {
        let source = StaticSource::from_rows(&[&["date", "center_1"], &["2024-01-05", "100,000"]]);
        let grid = source.read_all().await.unwrap();

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][1], "100,000");
    }

    #[tokio::test]
    async fn test_csv_source_keeps_quoted_thousands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,center_1,center_2").unwrap();
        writeln!(file, "2024-01-05,\"1,234,500\",-50000").unwrap();
        writeln!(file, "2024-01-06,20000").unwrap();

        let grid = CsvSource::new(&path).read_all().await.unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1][1], "1,234,500");
        // Short rows are allowed; the normalizer pads them.
        assert_eq!(grid[2].len(), 2);
    }

    #[tokio::test]
    async fn test_csv_source_missing_file() {
        let err = CsvSource::new("/nonexistent/sheet.csv").read_all().await.unwrap_err();
        assert!(err.to_string().contains("Failed to open CSV"));
    }
}
