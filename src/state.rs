use crate::config::Config;
use crate::models::{AiSettings, FinancialProfile};
use crate::services::session::DashboardSession;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ai_settings: Arc<AiSettings>,
    pub session: Arc<DashboardSession>,
}

impl AppState {
    pub fn new(config: Config, session: DashboardSession) -> Self {
        Self {
            ai_settings: Arc::new(config.ai.clone()),
            config: Arc::new(config),
            session: Arc::new(session),
        }
    }

    /// Kick off an insight fetch for the session's current profile.
    pub fn refresh_insights(&self) {
        self.session.refresh(self.ai_settings.clone());
    }

    /// Replace the session's profile and fetch insights for it.
    pub fn replace_profile(&self, profile: FinancialProfile) -> u64 {
        self.session.replace_and_refresh(profile, self.ai_settings.clone())
    }
}
