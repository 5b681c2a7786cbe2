//! Telemetry helpers for pages embedding `resilient-chart-rs`.
//!
//! The engine only emits `tracing` events. Fallback transitions, renderer
//! failures and ignored pass-through calls are all visible there, so hosts
//! either call `init_default_tracing` or wire their own subscriber.

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// The filter comes from `RUST_LOG` and defaults to `info` for the host and
/// `debug` for this crate, so expected fallbacks show up during development.
/// Returns `false` when the feature is disabled or a global subscriber is
/// already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,resilient_chart=debug")
                }),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
