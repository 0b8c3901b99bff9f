use center_ledger::charts::ChartSpec;
use center_ledger::constants;
use center_ledger::dashboard::{CenterTab, Notice, Tab};
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::api::{DashboardPayload, DashboardQuery, DashboardResponse, fetch_dashboard};
use crate::components::{MetricCards, NoticeBox, PlotlyChart, Sidebar, TabBar};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let query = use_query_map();

    let params = move || {
        let q = query.read();
        DashboardQuery {
            year: q.get("year").and_then(|v| v.parse().ok()),
            month: q.get("month").and_then(|v| v.parse().ok()),
            tab: q.get("tab").map(|v| Tab::from_key(&v)).unwrap_or_default(),
            reload: q.get("reload").is_some_and(|v| v == "true"),
        }
    };
    let dashboard = Resource::new(params, fetch_dashboard);

    view! {
        <Suspense fallback=move || view! { <div class="loading">"데이터를 불러오는 중..."</div> }>
            {move || {
                dashboard.get().map(|result| {
                    match result {
                        Ok(DashboardResponse::Ready(payload)) => {
                            view! { <DashboardContent payload=*payload /> }.into_any()
                        }
                        Ok(DashboardResponse::NoData { notices }) => view! { <NoDataView notices=notices /> }.into_any(),
                        Err(e) => view! {
                            <main class="main">
                                <h1>{constants::COMPANY_NAME} " 손익"</h1>
                                <NoticeBox notice=Notice::error(format!("데이터를 불러오지 못했습니다: {}", e)) />
                            </main>
                        }.into_any(),
                    }
                })
            }}
        </Suspense>
    }
}

/// Shown when the sheet has no dated rows at all
#[component]
pub fn NoDataView(notices: Vec<Notice>) -> impl IntoView {
    view! {
        <main class="main">
            <h1>{constants::COMPANY_NAME} " 손익"</h1>
            {notices.into_iter().map(|n| view! { <NoticeBox notice=n /> }).collect_view()}
        </main>
    }
}

/// Sidebar, notices, tab strip and the active tab's body
#[component]
pub fn DashboardContent(payload: DashboardPayload) -> impl IntoView {
    let dashboard = payload.dashboard.clone();
    let selection = dashboard.selection.clone();
    let notices = dashboard.notices.clone();
    let period = selection.period;
    let tab = payload.tab;

    let body = match tab {
        Tab::Combined => view! { <CombinedView payload=payload.clone() /> }.into_any(),
        Tab::Center(center) => match dashboard.center_tab(center).cloned() {
            Some(center_tab) => view! { <CenterView payload=payload.clone() center_tab=center_tab /> }.into_any(),
            None => ().into_any(),
        },
    };

    view! {
        <div class="layout">
            <Sidebar
                selection=selection
                tab=tab
                logo_path=payload.logo_path.clone()
                logo_link=payload.logo_link.clone()
            />
            <main class="main">
                {notices.into_iter().map(|n| view! { <NoticeBox notice=n /> }).collect_view()}
                <TabBar active=tab period=period />
                {body}
            </main>
        </div>
    }
}

/// Chart for `id` when the active tab rendered it
fn chart(payload: &DashboardPayload, id: &str) -> Option<AnyView> {
    payload
        .figure(id)
        .cloned()
        .map(|figure| view! { <PlotlyChart figure=figure /> }.into_any())
}

#[component]
fn CombinedView(payload: DashboardPayload) -> impl IntoView {
    let combined = payload.dashboard.combined.clone();
    let pnl_chart = combined.pnl_chart.as_ref().and_then(|slot| chart(&payload, &slot.id));
    let (pies, bars): (Vec<_>, Vec<_>) = combined
        .volume_charts
        .iter()
        .partition(|slot| matches!(slot.spec, ChartSpec::Pie(_)));
    let pies: Vec<AnyView> = pies.iter().filter_map(|slot| chart(&payload, &slot.id)).collect();
    let bars: Vec<AnyView> = bars.iter().filter_map(|slot| chart(&payload, &slot.id)).collect();

    view! {
        <section>
            <h1>{combined.volume_title}</h1>
            <div class="chart-row">{pies}</div>
            {bars}

            <h1>{combined.pnl_title}</h1>
            <MetricCards cards=combined.cards />
            {pnl_chart}

            <h1>{combined.monthly_title}</h1>
            {chart(&payload, &combined.monthly_chart.id)}
        </section>
    }
}

#[component]
fn CenterView(payload: DashboardPayload, center_tab: CenterTab) -> impl IntoView {
    let pnl_chart = center_tab.pnl_chart.as_ref().and_then(|slot| chart(&payload, &slot.id));

    view! {
        <section>
            <h1>{center_tab.title}</h1>
            <MetricCards cards=center_tab.cards />
            {pnl_chart}
        </section>
    }
}
