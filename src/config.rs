use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::{
    API_KEY_ENV, DEFAULT_CONCEPTS_FILE, DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_RESULTS,
    DEFAULT_QUERY_WORDS_FILE, SEARCH_COST, SLACK_WEBHOOK_ENV, VIDEOS_COST,
};
use crate::error::AppError;
use crate::store::StoreKind;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) refresh_interval_days: Option<u32>,
    #[serde(default)]
    pub(crate) quota_ceiling: Option<u64>,
    #[serde(default)]
    pub(crate) search_cost: Option<u64>,
    #[serde(default)]
    pub(crate) videos_cost: Option<u64>,
    #[serde(default)]
    pub(crate) lookback_days: Option<u32>,
    #[serde(default)]
    pub(crate) max_results: Option<u32>,
    #[serde(default)]
    pub(crate) rotation_slots: Option<u32>,
    #[serde(default)]
    pub(crate) concepts_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) query_words_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) regions_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) state_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) output_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) store: Option<StoreKind>,
    #[serde(default)]
    pub(crate) log_file: Option<PathBuf>,
    #[serde(default)]
    pub(crate) slack_webhook_url: Option<String>,
    #[serde(default)]
    pub(crate) api_key_env: Option<String>,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) no_color: bool,

    /// File the values were read from, if any
    #[serde(skip)]
    pub(crate) loaded_from: Option<PathBuf>,
}

impl Config {
    /// Load from an explicit path, or the first readable default location.
    ///
    /// An explicit path must exist and parse. Problems with the default
    /// locations only produce a warning and fall back to defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            let content = fs::read_to_string(path).map_err(|source| AppError::ReadInput {
                path: path.to_path_buf(),
                source,
            })?;
            return Self::parse(&content, path);
        }

        for path in Self::get_config_paths() {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match Self::parse(&content, &path) {
                    Ok(config) => return Ok(config),
                    Err(e) => eprintln!("Warning: {e}"),
                }
            }
        }

        Ok(Self::default())
    }

    fn parse(content: &str, path: &Path) -> Result<Self, AppError> {
        let mut config: Config = toml::from_str(content).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.loaded_from = Some(path.to_path_buf());
        Ok(config)
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/region-demand/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("region-demand").join("config.toml"));
        }

        // 2. Platform config dir (Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("region-demand").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.region-demand.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".region-demand.toml"));
        }

        paths
    }

    pub(crate) fn search_cost(&self) -> u64 {
        self.search_cost.unwrap_or(SEARCH_COST)
    }

    pub(crate) fn videos_cost(&self) -> u64 {
        self.videos_cost.unwrap_or(VIDEOS_COST)
    }

    pub(crate) fn lookback_days(&self) -> u32 {
        self.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS)
    }

    pub(crate) fn max_results(&self) -> u32 {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub(crate) fn rotation_slots(&self) -> u32 {
        self.rotation_slots.unwrap_or(1)
    }

    pub(crate) fn concepts_file(&self) -> PathBuf {
        self.concepts_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONCEPTS_FILE))
    }

    pub(crate) fn query_words_file(&self) -> PathBuf {
        self.query_words_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_QUERY_WORDS_FILE))
    }

    pub(crate) fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(API_KEY_ENV)
    }

    /// Environment wins over the file so the URL can stay out of config.
    pub(crate) fn slack_webhook_url(&self) -> Option<String> {
        std::env::var(SLACK_WEBHOOK_ENV)
            .ok()
            .or_else(|| self.slack_webhook_url.clone())
            .filter(|url| !url.trim().is_empty())
    }
}
