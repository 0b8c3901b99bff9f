use center_ledger::aggregate::Selection;
use center_ledger::dashboard::Tab;
use leptos::prelude::*;

/// Date filter. A GET form: changing a select resubmits the page, and the
/// Reload button adds `reload=true` to force a fresh fetch.
#[component]
pub fn Sidebar(
    selection: Selection,
    tab: Tab,
    #[prop(into)] logo_path: String,
    #[prop(into)] logo_link: String,
) -> impl IntoView {
    let period = selection.period;

    view! {
        <aside class="sidebar">
            <a href=logo_link target="_blank" rel="noopener noreferrer" class="logo">
                <img src=logo_path alt="logo" />
            </a>
            <h2>"📆 날짜 필터"</h2>
            <form method="get" action="/">
                <input type="hidden" name="tab" value=tab.key() />

                <label for="year">"연도 선택"</label>
                <select id="year" name="year" onchange="this.form.submit()">
                    {selection
                        .years
                        .into_iter()
                        .map(|y| {
                            view! { <option value=y.to_string() selected={y == period.year}>{y}</option> }
                        })
                        .collect_view()}
                </select>

                <label for="month">"월 선택"</label>
                <select id="month" name="month" onchange="this.form.submit()">
                    {selection
                        .months
                        .into_iter()
                        .map(|m| {
                            view! { <option value=m.to_string() selected={m == period.month}>{m}</option> }
                        })
                        .collect_view()}
                </select>

                <button type="submit" name="reload" value="true">"Reload"</button>
            </form>
        </aside>
    }
}
