use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the dashboard.
///
/// Every section falls back to its defaults, so an absent `dashboard.toml` is a
/// valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataSettings,
    pub windows: WindowSettings,
    pub selection: SelectionSettings,
    pub histogram: HistogramSettings,
}

/// Where to look for the dataset.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Candidate file locations, tried in order. A leading `~/` is expanded
    /// against `HOME`.
    pub candidates: Vec<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            candidates: vec![
                "crypto_features.csv".to_string(),
                "master_crypto_daily_prices.csv".to_string(),
                "~/Documents/Germany/TUBerlin/Projects/crypto_features.csv".to_string(),
                "~/Documents/Germany/TUBerlin/Projects/master_crypto_daily_prices.csv".to_string(),
            ],
        }
    }
}

impl DataSettings {
    /// The candidate locations with `~/` expanded.
    pub fn candidate_paths(&self) -> Vec<PathBuf> {
        let home = std::env::var_os("HOME").map(PathBuf::from);
        self.candidates
            .iter()
            .map(|c| expand_home(c, home.as_ref()))
            .collect()
    }
}

/// Default sizes of the user-controlled rolling windows.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub ma_window: usize,
    pub vol_window: usize,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            ma_window: 30,
            vol_window: 7,
        }
    }
}

/// Initial ticker selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Selected on start-up when present in the data; otherwise the first ticker is.
    pub default_ticker: String,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            default_ticker: "BTC".to_string(),
        }
    }
}

/// Parameters of the daily-return distribution view.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistogramSettings {
    pub bins: usize,
}

impl Default for HistogramSettings {
    fn default() -> Self {
        Self { bins: 80 }
    }
}

fn expand_home(candidate: &str, home: Option<&PathBuf>) -> PathBuf {
    match (candidate.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(candidate),
    }
}
