use serde::Deserialize;

fn default_queue_size() -> usize {
    25
}

fn default_min_group_size() -> usize {
    10
}

fn default_max_level_diff() -> u32 {
    10
}

fn default_find_group_every_seconds() -> u64 {
    1
}

fn default_match_timeout_after_seconds() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_http_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// Process-wide configuration, read once at startup from the environment.
///
/// Deserialized directly by `envy` from `QUEUE_SIZE`, `MIN_GROUP_SIZE`, etc;
/// any var that's unset falls back to its default.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,

    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,

    #[serde(default = "default_max_level_diff")]
    pub max_level_diff: u32,

    #[serde(default = "default_find_group_every_seconds")]
    pub find_group_every_seconds: u64,

    #[serde(default = "default_match_timeout_after_seconds")]
    pub match_timeout_after_seconds: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_http_address")]
    pub http_address: String,
}

impl Config {
    /// Loads a `.env` file if present (missing file is not an error), then
    /// deserializes the process environment into a `Config`.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        let config = envy::from_env::<Config>()?;
        Ok(config)
    }

    pub fn find_group_every_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.find_group_every_seconds)
    }

    pub fn match_timeout_after(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.match_timeout_after_seconds as i64)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queue_size: default_queue_size(),
            min_group_size: default_min_group_size(),
            max_level_diff: default_max_level_diff(),
            find_group_every_seconds: default_find_group_every_seconds(),
            match_timeout_after_seconds: default_match_timeout_after_seconds(),
            log_level: default_log_level(),
            http_address: default_http_address(),
        }
    }
}
