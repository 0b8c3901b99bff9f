//! Server function backing the dashboard page.

use center_ledger::charts::PlotlyFigure;
use center_ledger::dashboard::{Dashboard, Notice, Tab};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

/// Query parameters of the dashboard page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub tab: Tab,
    pub reload: bool,
}

/// Everything one page render needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub dashboard: Dashboard,
    pub tab: Tab,
    /// Figures for the active tab only
    pub figures: Vec<PlotlyFigure>,
    pub logo_path: String,
    pub logo_link: String,
}

impl DashboardPayload {
    pub fn figure(&self, id: &str) -> Option<&PlotlyFigure> {
        self.figures.iter().find(|f| f.id == id)
    }
}

/// Outcome of one dashboard load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DashboardResponse {
    Ready(Box<DashboardPayload>),
    /// The sheet loaded but no row has a usable date; carries the
    /// normalization notices that explain why
    NoData { notices: Vec<Notice> },
}

#[cfg(feature = "ssr")]
mod ssr {
    use super::*;
    use anyhow::Result;
    use center_ledger::aggregate::Selection;
    use center_ledger::charts::PlotlySink;
    use center_ledger::config::DashboardConfig;
    use center_ledger::source::TableSource;

    use crate::state::TableCache;

    /// Build the page data for `query`. `NoData` when the sheet has no dated rows.
    pub async fn build_payload<S: TableSource + Sync>(
        tables: &TableCache<S>,
        config: &DashboardConfig,
        query: &DashboardQuery,
    ) -> Result<DashboardResponse> {
        let normalized = tables.get(query.reload).await?;

        let Some(selection) = Selection::resolve(&normalized.table, query.year, query.month) else {
            let mut notices: Vec<Notice> = normalized.warnings.iter().map(Notice::from).collect();
            notices.push(Notice::warning("시트에 날짜가 있는 데이터가 없습니다."));
            return Ok(DashboardResponse::NoData { notices });
        };

        let dashboard = Dashboard::build(&normalized.table, selection, &normalized.warnings);
        let mut sink = PlotlySink::new();
        dashboard.render_tab(query.tab, &mut sink)?;

        Ok(DashboardResponse::Ready(Box::new(DashboardPayload {
            dashboard,
            tab: query.tab,
            figures: sink.into_figures(),
            logo_path: config.logo_path.clone(),
            logo_link: config.logo_link.clone(),
        })))
    }
}

#[cfg(feature = "ssr")]
pub use ssr::*;

/// Fetch (or reuse) the table and assemble the dashboard for one selection.
#[server(FetchDashboard)]
pub async fn fetch_dashboard(query: DashboardQuery) -> Result<DashboardResponse, ServerFnError> {
    use crate::state::app_state;

    let state = app_state().map_err(|e| ServerFnError::new(e.to_string()))?;
    build_payload(&state.tables, &state.dashboard, &query).await.map_err(|e| {
        tracing::error!(error = %format!("{:#}", e), "dashboard load failed");
        ServerFnError::new(format!("{:#}", e))
    })
}
