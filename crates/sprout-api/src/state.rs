//! Shared application state.

use std::sync::Arc;

use governor::{Quota, RateLimiter};
use sprout_core::GenerationBackend;
use sprout_db::Database;
use sprout_inference::TranscriptionBackend;
use sprout_insights::{ResearchLibrary, ScoringConfig};

pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
///
/// A `None` generation backend means demo mode: every model-backed operation
/// uses its fixed fallback output.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub generation: Option<Arc<dyn GenerationBackend>>,
    pub transcription: Option<Arc<dyn TranscriptionBackend>>,
    pub research: Arc<ResearchLibrary>,
    pub scoring: Arc<ScoringConfig>,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            generation: None,
            transcription: None,
            research: Arc::new(ResearchLibrary::default()),
            scoring: Arc::new(ScoringConfig::default()),
            rate_limiter: None,
        }
    }

    pub fn with_generation(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.generation = Some(backend);
        self
    }

    pub fn with_transcription(mut self, backend: Arc<dyn TranscriptionBackend>) -> Self {
        self.transcription = Some(backend);
        self
    }

    /// Allow `requests` per `period_secs` across all clients. Zero values disable limiting.
    pub fn with_rate_limit(mut self, requests: u64, period_secs: u64) -> Self {
        self.rate_limiter = build_rate_limiter(requests, period_secs).map(Arc::new);
        self
    }

    pub fn generation(&self) -> Option<&dyn GenerationBackend> {
        self.generation.as_deref()
    }
}

fn build_rate_limiter(requests: u64, period_secs: u64) -> Option<GlobalRateLimiter> {
    let burst = std::num::NonZeroU32::new(u32::try_from(requests).unwrap_or(u32::MAX))?;
    if period_secs == 0 {
        return None;
    }
    let replenish = std::time::Duration::from_secs(period_secs) / burst.get();
    let quota = Quota::with_period(replenish)?.allow_burst(burst);
    Some(RateLimiter::direct(quota))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_burst_then_rejects() {
        let limiter = build_rate_limiter(2, 60).expect("limiter");
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[test]
    fn test_zero_requests_disables_limiting() {
        assert!(build_rate_limiter(0, 60).is_none());
        assert!(build_rate_limiter(10, 0).is_none());
    }
}
