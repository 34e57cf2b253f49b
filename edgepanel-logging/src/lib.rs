use edgepanel_core::err::Result;
pub use env_logger::{init, init_from_env};
pub use log::*;

mod limiting;
pub use limiting::*;

/// Env var which overrides the default log filter
pub const LOG_FILTER_ENV: &str = "EDGEPANEL_LOG";

/// Configures the logger for the backend process
///
/// Defaults to `info`, the filter is read from `EDGEPANEL_LOG` and then `RUST_LOG`.
pub fn init_logging() -> Result<()> {
    let filter = std::env::var(LOG_FILTER_ENV)
        .or_else(|_| std::env::var(env_logger::DEFAULT_FILTER_ENV))
        .unwrap_or_else(|_| "info".into());

    env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_millis()
        .try_init()?;
    Ok(())
}

/// Logging init function for tests
pub fn init_for_tests() {
    let res = env_logger::builder()
        .filter_module("edgepanel", LevelFilter::Trace)
        .is_test(true)
        .try_init();
    if let Err(err) = res {
        eprintln!("Failed to init logging: {}", err);
    }
}
