use center_ledger::dashboard::MetricCard;
use leptos::prelude::*;

/// Four summary figures in a row, each colored by sign
#[component]
pub fn MetricCards(cards: Vec<MetricCard>) -> impl IntoView {
    view! {
        <div class="metric-row">
            {cards
                .into_iter()
                .map(|card| {
                    let style = format!("color:{}", card.color);
                    view! {
                        <div class="metric-card">
                            <div class="metric-label">{card.icon} " " <strong>{card.label}</strong></div>
                            <div class="metric-value" style=style>{card.formatted}</div>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
