use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::time::timeout;

use super::dto::{CheckResult, HealthChecks, HealthState, HealthStatus};
use crate::domain::ai::AiClient;

static START_TIME: OnceLock<Instant> = OnceLock::new();

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Latency at or above which a passing check reports `degraded`
const DEGRADED_THRESHOLD: Duration = Duration::from_secs(2);

const CACHE_DURATION: Duration = Duration::from_secs(30);

struct CachedCheck {
    result: CheckResult,
    cached_at: Instant,
}

/// Record the process start. Call once from `main`.
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

pub fn uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

/// Provider health check with a short-lived result cache.
///
/// Each fresh check spends one tiny completion, so results are reused for
/// [`CACHE_DURATION`].
#[derive(Clone)]
pub struct HealthChecker {
    client: AiClient,
    cache: Arc<RwLock<Option<CachedCheck>>>,
    cache_duration: Duration,
}

impl HealthChecker {
    pub fn new(client: AiClient) -> Self {
        Self::with_cache_duration(client, CACHE_DURATION)
    }

    pub fn with_cache_duration(client: AiClient, cache_duration: Duration) -> Self {
        Self {
            client,
            cache: Arc::new(RwLock::new(None)),
            cache_duration,
        }
    }

    pub async fn check(&self) -> HealthStatus {
        let openai_check = self.check_provider_cached().await;

        HealthStatus {
            status: determine_health_state(&openai_check),
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: uptime_secs(),
            checks: HealthChecks {
                openai_api: openai_check,
            },
        }
    }

    async fn check_provider_cached(&self) -> CheckResult {
        {
            let cached = self.cache.read().await;
            if let Some(entry) = cached.as_ref() {
                if entry.cached_at.elapsed() < self.cache_duration {
                    tracing::debug!(
                        cache_age_secs = entry.cached_at.elapsed().as_secs(),
                        "Using cached health check result"
                    );
                    return entry.result.clone();
                }
            }
        }

        let result = self.check_provider_fresh().await;

        *self.cache.write().await = Some(CachedCheck {
            result: result.clone(),
            cached_at: Instant::now(),
        });

        result
    }

    async fn check_provider_fresh(&self) -> CheckResult {
        let start = Instant::now();
        let result = timeout(HEALTH_CHECK_TIMEOUT, self.client.health_check()).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(_)) => {
                tracing::info!(latency_ms, "Provider health check passed");
                CheckResult::success(latency_ms)
            }
            Ok(Err(e)) => {
                tracing::warn!(latency_ms, error = %e, "Provider health check failed");
                CheckResult::failure(latency_ms, e.to_string())
            }
            Err(_) => {
                tracing::warn!("Provider health check timed out");
                CheckResult::timeout(HEALTH_CHECK_TIMEOUT.as_millis() as u64)
            }
        }
    }
}

fn determine_health_state(check: &CheckResult) -> HealthState {
    if !check.status {
        return HealthState::Unhealthy;
    }

    match check.latency_ms {
        Some(latency) if latency >= DEGRADED_THRESHOLD.as_millis() as u64 => HealthState::Degraded,
        _ => HealthState::Healthy,
    }
}
