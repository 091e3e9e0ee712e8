pub mod config;
pub mod domain;
pub mod error;
pub mod global;
pub mod rate_limiter;
pub mod response;
pub mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::AppConfig;
use domain::ad::AdService;
use domain::health::HealthChecker;
use domain::offer::OfferService;
use rate_limiter::RateLimiter;

pub use domain::ai::{AiClient, AiClientTrait, CompletionRequest, OpenAiClient};

/// Upper bound for one HTTP request, retries and enhancement included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Clone)]
pub struct AppState {
    pub offer_service: OfferService,
    pub ad_service: AdService,
    pub health: HealthChecker,
}

impl AppState {
    pub fn new(config: &AppConfig, client: AiClient) -> Self {
        Self {
            offer_service: OfferService::new(client.clone(), config),
            ad_service: AdService::new(client.clone(), config),
            health: HealthChecker::new(client),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::offer::handler::generate_offer,
        domain::ad::handler::generate_ad,
        domain::health::handler::health_check,
    ),
    components(
        schemas(
            domain::offer::dto::OfferRequest,
            domain::offer::dto::OfferTone,
            domain::offer::dto::OfferResult,
            domain::offer::dto::OfferSuccessResponse,
            domain::offer::category::CategoryKind,
            domain::ad::dto::AdRequest,
            domain::ad::dto::AdResult,
            domain::ad::dto::AdSuccessResponse,
            domain::health::dto::HealthStatus,
            domain::health::dto::HealthState,
            domain::health::dto::HealthChecks,
            domain::health::dto::CheckResult,
            response::ErrorResponse,
        )
    ),
    tags(
        (name = "Offer", description = "Marketing offer generation"),
        (name = "Ad", description = "Advertisement generation"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Build the application router.
///
/// Generation routes are rate limited per client. `/metrics` is mounted only
/// when a Prometheus handle is supplied.
pub fn create_router(
    config: &AppConfig,
    client: AiClient,
    metrics: Option<PrometheusHandle>,
) -> Router {
    let state = AppState::new(config, client);
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max_requests,
        config.rate_limit_window,
    ));

    let generation = Router::new()
        .route("/api/offers/generate", post(domain::offer::handler::generate_offer))
        .route("/api/ads/generate", post(domain::ad::handler::generate_ad))
        .route_layer(middleware::from_fn_with_state(
            limiter,
            global::rate_limit::rate_limit,
        ));

    let mut router = Router::new()
        .merge(generation)
        .route("/health", get(domain::health::health_check))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics {
        router = router.route("/metrics", get(move || std::future::ready(handle.render())));
    }

    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(global::middleware::request_tracing))
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT)),
    )
}

/// Router over a caller-supplied client, for integration tests
pub fn create_test_router_with_mock(
    secret_key: &str,
    client: impl AiClientTrait + 'static,
) -> Router {
    create_test_router_with_config(AppConfig::for_test(secret_key), client)
}

pub fn create_test_router_with_config(
    config: AppConfig,
    client: impl AiClientTrait + 'static,
) -> Router {
    create_router(&config, Arc::new(client), None)
}
