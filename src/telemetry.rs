use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,actix_web=info,ecommerce_backend=debug";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
