use crate::utils::from_env::FromEnvVar;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

const TRACING_LOG_JSON: &str = "TRACING_LOG_JSON";

/// Install a format layer based on the `TRACING_LOG_JSON` environment
/// variable, and then install the registry.
macro_rules! install_fmt {
    (json @ $registry:ident, $filter:ident) => {{
        let fmt = tracing_subscriber::fmt::layer().json().with_filter($filter);
        $registry.with(fmt).try_init()
    }};
    (log @ $registry:ident, $filter:ident) => {{
        let fmt = tracing_subscriber::fmt::layer().with_filter($filter);
        $registry.with(fmt).try_init()
    }};
    ($registry:ident, $filter:ident) => {{
        let json = bool::from_env_var(TRACING_LOG_JSON).unwrap_or(false);
        if json {
            install_fmt!(json @ $registry, $filter)
        } else {
            install_fmt!(log @ $registry, $filter)
        }
    }};
}

/// Init tracing with a `fmt` layer filtered by `RUST_LOG`.
///
/// ## Env Reads
///
/// - `RUST_LOG` - the [`EnvFilter`] directives.
/// - `TRACING_LOG_JSON` - If set, will enable JSON logging.
///
/// Returns `false` if a global subscriber was already installed, in which
/// case the existing subscriber is left in place.
pub fn init_tracing() -> bool {
    let registry = tracing_subscriber::registry();
    let filter = EnvFilter::from_default_env();

    let installed = install_fmt!(registry, filter).is_ok();
    if installed {
        tracing::debug!("installed global tracing subscriber");
    }
    installed
}
