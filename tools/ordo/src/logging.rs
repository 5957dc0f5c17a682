use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Installs the global subscriber, writing to stderr so stdout stays free
/// for sentence output.
///
/// Reads `ORDO_LOG` (e.g. `ORDO_LOG=ordo=debug,ordo_solver=debug`), falling
/// back to `ordo=info` when unset or invalid.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ORDO_LOG").unwrap_or_else(|_| EnvFilter::new("ordo=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
