use center_ledger::dashboard::{Notice, NoticeLevel};
use leptos::prelude::*;

#[component]
pub fn NoticeBox(notice: Notice) -> impl IntoView {
    let class = match notice.level {
        NoticeLevel::Warning => "notice notice-warning",
        NoticeLevel::Error => "notice notice-error",
    };

    view! { <div class=class>{notice.message}</div> }
}
