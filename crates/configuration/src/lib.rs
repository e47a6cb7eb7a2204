use crate::error::ConfigError;
use core_types::{MAX_WINDOW, MIN_WINDOW};
use std::path::Path;

// Declare the modules that make up this crate.
#[cfg(feature = "clap")]
pub mod cli;
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use cli::WindowArgs;
pub use settings::{DashboardConfig, DataSettings, HistogramSettings, SelectionSettings, WindowSettings};

/// Prefix of environment variables that override file settings,
/// e.g. `EDA__WINDOWS__MA_WINDOW=50`.
pub const ENV_PREFIX: &str = "EDA";

/// Loads the dashboard configuration.
///
/// Built-in defaults are overlaid by the TOML file at `path` (which may be absent)
/// and then by `EDA__*` environment variables. The result is validated before it
/// is returned.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    load_config_with_env(path, None)
}

/// Like [`load_config`], but reads overrides from `env` instead of the process
/// environment when it is `Some`.
pub fn load_config_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
) -> Result<DashboardConfig, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("data.candidates")
                .source(env),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `DashboardConfig` struct
    let config = builder.try_deserialize::<DashboardConfig>()?;
    validate(&config)?;

    tracing::debug!(?config, "Configuration loaded.");
    Ok(config)
}

/// Checks the invariants the rest of the system relies on.
pub fn validate(config: &DashboardConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("windows.ma_window", config.windows.ma_window),
        ("windows.vol_window", config.windows.vol_window),
    ] {
        if !(MIN_WINDOW..=MAX_WINDOW).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {}, got {}",
                name, MIN_WINDOW, MAX_WINDOW, value
            )));
        }
    }

    if config.histogram.bins == 0 {
        return Err(ConfigError::ValidationError(
            "histogram.bins must be at least 1".to_string(),
        ));
    }

    if config.data.candidates.is_empty() {
        return Err(ConfigError::ValidationError(
            "data.candidates must list at least one location".to_string(),
        ));
    }

    Ok(())
}
