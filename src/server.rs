use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::models::FinancialProfile;
use crate::services::session::DashboardSession;
use crate::state::AppState;

/// Build the application state and Axum router from a [`Config`].
///
/// Loads the configured profile (or the demo profile), starts the first
/// insight fetch, and assembles the middleware stack. Returns the shared
/// state and a ready-to-serve router.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let profile = match &config.profile_path {
        Some(path) => {
            tracing::info!("Loading financial profile from {}", path.display());
            FinancialProfile::from_json_file(path)?
        }
        None => {
            tracing::info!("No profile configured, using the demo profile");
            FinancialProfile::demo()
        }
    };

    if !config.ai.is_configured() {
        tracing::warn!(
            provider = config.ai.provider.as_str(),
            "AI provider is not configured, fallback insights will be shown"
        );
    }

    let static_path = config.static_path.clone();
    let state = AppState::new(config, DashboardSession::new(profile));
    state.refresh_insights();

    let app = Router::new()
        .merge(handlers::routes())
        .nest_service("/static", ServeDir::new(static_path))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state.clone());

    Ok((state, app))
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
