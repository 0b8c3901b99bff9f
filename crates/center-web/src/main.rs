/// plotly.js bundle drawn into every chart container
#[cfg(feature = "ssr")]
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{LeptosRoutes, generate_route_list};
    use tower_http::compression::CompressionLayer;
    use tower_http::services::ServeDir;
    use tracing::{error, info};

    center_ledger::logging::init_tracing();

    center_web::state::init_state().map_err(|e| {
        error!(error = %format!("{:#}", e), "failed to load secrets");
        e
    })?;

    let conf = get_configuration(None).map_err(|e| {
        error!(error = %e, "failed to load Leptos configuration");
        e
    })?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let routes = generate_route_list(center_web::app::App);

    let site_root = leptos_options.site_root.clone();
    let app = Router::new()
        .leptos_routes(&leptos_options, routes, {
            move || {
                use center_web::app::App;
                view! {
                    <!DOCTYPE html>
                    <html lang="ko">
                        <head>
                            <meta charset="utf-8" />
                            <meta name="viewport" content="width=device-width, initial-scale=1" />
                            <link rel="icon" href="data:image/svg+xml,<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>📦</text></svg>" />
                            <meta name="theme-color" content="#f0f2f6" />
                            <meta name="description" content="CJ 물류센터 동탄1·동탄2센터 일별 손익, 누적 손익, 월별 통합 손익과 물량 현황 대시보드" />
                            <title>"CJ 물류센터 손익"</title>
                            <link rel="stylesheet" href="/pkg/center-web.css" />
                            <script src=PLOTLY_CDN></script>
                        </head>
                        <body>
                            <App />
                        </body>
                    </html>
                }
            }
        })
        .fallback_service(ServeDir::new(&*site_root))
        .layer(CompressionLayer::new())
        .with_state(leptos_options);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(%addr, error = %e, "failed to bind");
        e
    })?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(|e| {
        error!(error = %e, "server error");
        e
    })?;

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    // SSR-only: no client-side entry point needed
}
