use leptos::prelude::*;
use leptos_meta::provide_meta_context;
use leptos_router::SsrMode;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::pages::DashboardPage;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Router>
            <Routes fallback=|| view! { <p>"404 - 페이지를 찾을 수 없습니다"</p> }>
                <Route path=path!("/") view=DashboardPage ssr=SsrMode::Async />
            </Routes>
        </Router>
    }
}
