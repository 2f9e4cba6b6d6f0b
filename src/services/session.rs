//! The dashboard's current profile and its insights slot.
//!
//! Every profile replacement bumps a generation counter. An insight fetch is
//! tagged with the generation it was started for, and its result is only
//! written if that generation is still current, so a slow response for an
//! old profile can never overwrite the insights of a newer one.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::{AiInsight, AiSettings, FinancialProfile};
use crate::services::insights;

/// What the insights panel currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "insights", rename_all = "lowercase")]
pub enum InsightStatus {
    Loading,
    Ready(Vec<AiInsight>),
}

impl InsightStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

struct InFlight {
    fetch: u64,
    generation: u64,
    handle: JoinHandle<()>,
}

struct SessionState {
    generation: u64,
    next_fetch: u64,
    profile: Arc<FinancialProfile>,
    insights: InsightStatus,
    in_flight: Option<InFlight>,
}

pub struct DashboardSession {
    state: Mutex<SessionState>,
}

impl DashboardSession {
    pub fn new(profile: FinancialProfile) -> Self {
        Self {
            state: Mutex::new(SessionState {
                generation: 1,
                next_fetch: 1,
                profile: Arc::new(profile),
                insights: InsightStatus::Loading,
                in_flight: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn profile(&self) -> Arc<FinancialProfile> {
        self.lock().profile.clone()
    }

    pub fn insights(&self) -> InsightStatus {
        self.lock().insights.clone()
    }

    /// Install a new profile, reset the insights slot to loading and start
    /// its insight fetch, all under one lock. Returns the new generation.
    pub fn replace_and_refresh(
        self: &Arc<Self>,
        profile: FinancialProfile,
        settings: Arc<AiSettings>,
    ) -> u64 {
        let mut state = self.lock();
        state.generation += 1;
        state.profile = Arc::new(profile);
        state.insights = InsightStatus::Loading;
        debug!(generation = state.generation, "Profile replaced");
        self.start_fetch(&mut state, settings);
        state.generation
    }

    /// Store insights fetched for `generation`. Results for a superseded
    /// generation are dropped and `false` is returned.
    pub fn settle(&self, generation: u64, insights: Vec<AiInsight>) -> bool {
        let mut state = self.lock();
        Self::store(&mut state, generation, insights)
    }

    /// Start one insight fetch for the current profile, aborting any fetch
    /// still running for an earlier one.
    pub fn refresh(self: &Arc<Self>, settings: Arc<AiSettings>) {
        let mut state = self.lock();
        self.start_fetch(&mut state, settings);
    }

    fn start_fetch(self: &Arc<Self>, state: &mut SessionState, settings: Arc<AiSettings>) {
        if let Some(previous) = state.in_flight.take() {
            previous.handle.abort();
        }

        let fetch = state.next_fetch;
        state.next_fetch += 1;
        let generation = state.generation;
        let profile = state.profile.clone();
        let session = Arc::clone(self);

        debug!(generation, fetch, "Requesting insights");
        let handle = tokio::spawn(async move {
            let result = insights::fetch_insights(&settings, &profile).await;
            session.finish(fetch, generation, result);
        });
        state.in_flight = Some(InFlight {
            fetch,
            generation,
            handle,
        });
    }

    /// Settle the result of fetch `fetch`. The in-flight handle is only
    /// released if it still belongs to that fetch.
    fn finish(&self, fetch: u64, generation: u64, insights: Vec<AiInsight>) -> bool {
        let mut state = self.lock();
        if state.in_flight.as_ref().is_some_and(|f| f.fetch == fetch) {
            state.in_flight = None;
        }
        Self::store(&mut state, generation, insights)
    }

    fn store(state: &mut SessionState, generation: u64, insights: Vec<AiInsight>) -> bool {
        if state.generation != generation {
            debug!(
                generation,
                current = state.generation,
                "Discarding stale insights"
            );
            return false;
        }
        state.insights = InsightStatus::Ready(insights);
        true
    }

    #[cfg(test)]
    fn in_flight(&self) -> Option<(u64, u64)> {
        self.lock()
            .in_flight
            .as_ref()
            .map(|f| (f.fetch, f.generation))
    }
}
