// src/config/bot.rs
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use crate::error::{BotError, Result};
use crate::ingest::providers::{pota::DEFAULT_POTA_URL, sota::DEFAULT_SOTA_URL};
use crate::ingest::roster::RosterSource;
use crate::notify::discord::DEFAULT_API_BASE;
use crate::notify::Channels;

pub const DEFAULT_CONFIG_PATH: &str = "config/spotbot.toml";
pub const ENV_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
fn default_pota_url() -> String {
    DEFAULT_POTA_URL.to_string()
}
fn default_sota_url() -> String {
    DEFAULT_SOTA_URL.to_string()
}
fn default_refresh_secs() -> u64 {
    8 * 3600
}
fn default_interval_secs() -> u64 {
    120
}
fn default_throttle_secs() -> u64 {
    4 * 3600
}
fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// "ENV" means: read from DISCORD_BOT_TOKEN
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub bot_user_id: String,
    #[serde(default)]
    pub pota_channel_id: String,
    #[serde(default)]
    pub sota_channel_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedsConfig {
    #[serde(default = "default_pota_url")]
    pub pota_url: String,
    #[serde(default = "default_sota_url")]
    pub sota_url: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            pota_url: default_pota_url(),
            sota_url: default_sota_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// CSV export (e.g. a Google Sheet link); first column holds callsigns.
    #[serde(default)]
    pub csv_url: Option<String>,
    #[serde(default = "default_refresh_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            file: None,
            csv_url: None,
            refresh_interval_secs: default_refresh_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Minimum gap between two posts of the same activation.
    #[serde(default = "default_throttle_secs")]
    pub throttle_secs: u64,
    /// Summits CSV with a park column; enables park cross-posts.
    #[serde(default)]
    pub peak_map_path: Option<PathBuf>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            throttle_secs: default_throttle_secs(),
            peak_map_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub discord: DiscordConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl BotConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!("reading config from {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        let mut cfg: BotConfig =
            toml::from_str(data).map_err(|e| BotError::Config(format!("parsing config: {e}")))?;

        // Resolve token if "ENV" (or absent)
        let token = cfg.discord.token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("env") {
            cfg.discord.token = env::var(ENV_BOT_TOKEN)
                .map_err(|_| BotError::Config(format!("missing {ENV_BOT_TOKEN} env var")))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("discord.token", &self.discord.token),
            ("discord.bot_user_id", &self.discord.bot_user_id),
            ("discord.pota_channel_id", &self.discord.pota_channel_id),
            ("discord.sota_channel_id", &self.discord.sota_channel_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(BotError::Config(format!("{name} is not set")));
            }
        }
        if self.poll.interval_secs == 0 || self.roster.refresh_interval_secs == 0 {
            return Err(BotError::Config("intervals must be positive".into()));
        }
        if self.roster.file.is_none() && self.roster.csv_url.is_none() {
            return Err(BotError::Config(
                "no roster source: set roster.file and/or roster.csv_url".into(),
            ));
        }
        Ok(())
    }

    pub fn channels(&self) -> Channels {
        Channels {
            pota: self.discord.pota_channel_id.clone(),
            sota: self.discord.sota_channel_id.clone(),
        }
    }

    pub fn roster_source(&self) -> RosterSource {
        RosterSource {
            file: self.roster.file.clone(),
            csv_url: self.roster.csv_url.clone(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs)
    }

    pub fn roster_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.roster.refresh_interval_secs)
    }
}
