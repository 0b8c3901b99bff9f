use center_ledger::aggregate::Period;
use center_ledger::dashboard::Tab;
use leptos::prelude::*;

/// Link to the dashboard for `period` with `tab` active.
pub fn page_href(period: Period, tab: Tab) -> String {
    format!("/?year={}&month={}&tab={}", period.year, period.month, tab.key())
}

/// Tab strip; each tab is a plain link so the page works without client code
#[component]
pub fn TabBar(active: Tab, period: Period) -> impl IntoView {
    view! {
        <nav class="tabs">
            {Tab::ALL
                .into_iter()
                .map(|tab| {
                    let class = if tab == active { "tab tab-active" } else { "tab" };
                    view! { <a class=class href=page_href(period, tab)>{tab.label()}</a> }
                })
                .collect_view()}
        </nav>
    }
}
