mod dashboard;

pub use dashboard::{DashboardContent, DashboardPage, NoDataView};
