use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Install color-eyre with file/line locations and without the env section.
///
/// Call first thing in `main`; repeated calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(environment: &Environment) -> &'static str {
    match environment {
        Environment::Production => "info,tower_http=info,mongodb=warn",
        Environment::Development => "debug,tower_http=debug,mongodb=info",
    }
}

/// Initialize the global subscriber.
///
/// Production (`APP_ENV=production`) logs flattened JSON lines; development logs
/// pretty multi-line events. Both carry a `tracing_error::ErrorLayer` so eyre
/// reports include the active spans. `RUST_LOG` overrides [`default_filter`].
///
/// A second call is a no-op, which keeps tests that initialize tracing independent.
///
/// ```ignore
/// let environment = Environment::from_env();
/// init_tracing(&environment);
/// ```
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(environment)));

    let registry = tracing_subscriber::registry()
        .with(tracing_error::ErrorLayer::default())
        .with(filter);

    let result = match environment {
        Environment::Production => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .try_init(),
        Environment::Development => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .try_init(),
    };

    match result {
        Ok(()) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized"),
    }
}
