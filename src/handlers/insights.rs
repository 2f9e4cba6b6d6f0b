use askama::Template;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{Html, Json};

use crate::error::{AppResult, RenderHtml};
use crate::models::{AiInsight, FinancialProfile};
use crate::services::insights;
use crate::services::session::InsightStatus;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "partials/insights.html")]
pub struct InsightsPanelTemplate {
    pub loading: bool,
    pub insights: Vec<AiInsight>,
}

/// Insight cards, or a skeleton that polls until the fetch settles.
pub async fn panel(State(state): State<AppState>) -> AppResult<Html<String>> {
    let template = match state.session.insights() {
        InsightStatus::Loading => InsightsPanelTemplate {
            loading: true,
            insights: Vec::new(),
        },
        InsightStatus::Ready(insights) => InsightsPanelTemplate {
            loading: false,
            insights,
        },
    };

    template.render_html()
}

pub async fn status_json(State(state): State<AppState>) -> Json<InsightStatus> {
    Json(state.session.insights())
}

/// Stateless: fetch insights for the posted profile without touching the session.
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<Vec<AiInsight>>> {
    let profile = FinancialProfile::parse(&body)?;
    Ok(Json(
        insights::fetch_insights(&state.ai_settings, &profile).await,
    ))
}
