//! Profit/loss and volume reporting for the Dongtan logistics centers.
//!
//! `source` and `sheets` fetch the worksheet, `table` normalizes it,
//! `aggregate` computes series and rollups, and `charts`/`dashboard` turn the
//! aggregates into chart descriptors and metric cards for the web page.

pub mod aggregate;
pub mod charts;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod format;
pub mod logging;
pub mod reports;
pub mod sheets;
pub mod source;
pub mod table;
