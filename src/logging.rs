//! Logger setup for the binary and ad-hoc tools.

use env_logger::Env;

/// Install the global logger. `RUST_LOG` wins over `default_filter`.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(default_filter: &str) {
    let result = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();

    if result.is_ok() {
        log::debug!("Logger initialised (default filter: {})", default_filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init("warn");
        init("debug");
    }
}
