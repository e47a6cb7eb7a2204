use crate::error::ConfigError;
use crate::settings::DashboardConfig;
use clap::Args;

/// Command-line overrides for the rolling-window sizes.
#[derive(Debug, Clone, Default, Args)]
pub struct WindowArgs {
    /// Moving-average window in days (7-100).
    #[arg(long)]
    pub ma_window: Option<usize>,

    /// Volatility window in days (7-100).
    #[arg(long)]
    pub vol_window: Option<usize>,
}

impl WindowArgs {
    /// Writes the given overrides into `config` and re-validates it.
    pub fn apply(&self, config: &mut DashboardConfig) -> Result<(), ConfigError> {
        if let Some(ma_window) = self.ma_window {
            config.windows.ma_window = ma_window;
        }
        if let Some(vol_window) = self.vol_window {
            config.windows.vol_window = vol_window;
        }
        crate::validate(config)
    }
}
