use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,yelstar_server=debug,tower_http=info";

/// Install the JSON stdout subscriber. `RUST_LOG` overrides the default filter.
///
/// Repeated calls are ignored.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .flatten_event(false);

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .try_init()
    {
        eprintln!("Tracing already initialized: {e}");
    }
}
