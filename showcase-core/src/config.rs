//! Site configuration.
//!
//! Loaded from `~/.config/showcase/config.toml` (all keys optional) with
//! `SHOWCASE_*` environment variables taking precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::Account;
use crate::constants::DEFAULT_PROPOSAL_LIFETIME_DAYS;
use crate::error::{ShowcaseError, ShowcaseResult};
use crate::ics::{DEFAULT_PROVIDER_URL, parse_provider_base};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    4096
}

fn default_proposal_lifetime() -> Duration {
    DAY * DEFAULT_PROPOSAL_LIFETIME_DAYS as u32
}

fn default_sweep_interval() -> Duration {
    DAY
}

fn default_event_check_interval() -> Duration {
    Duration::from_secs(60 * 60)
}

fn default_notification_throttle() -> Duration {
    DAY
}

fn default_provider_url() -> String {
    DEFAULT_PROVIDER_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowcaseConfig {
    #[serde(default = "default_bind")]
    pub bind: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// How long new proposals stay open
    #[serde(default = "default_proposal_lifetime", with = "humantime_duration")]
    pub proposal_lifetime: Duration,

    #[serde(default = "default_sweep_interval", with = "humantime_duration")]
    pub sweep_interval: Duration,

    #[serde(default = "default_event_check_interval", with = "humantime_duration")]
    pub event_check_interval: Duration,

    /// Minimum time between two new-event prompts
    #[serde(default = "default_notification_throttle", with = "humantime_duration")]
    pub notification_throttle: Duration,

    #[serde(default = "default_provider_url")]
    pub calendar_provider_url: String,

    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        ShowcaseConfig {
            bind: default_bind(),
            port: default_port(),
            proposal_lifetime: default_proposal_lifetime(),
            sweep_interval: default_sweep_interval(),
            event_check_interval: default_event_check_interval(),
            notification_throttle: default_notification_throttle(),
            calendar_provider_url: default_provider_url(),
            accounts: Vec::new(),
        }
    }
}

impl ShowcaseConfig {
    pub fn config_path() -> ShowcaseResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ShowcaseError::Config("Could not determine config directory".into()))?
            .join("showcase");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, creating a commented default on first run.
    pub fn load() -> ShowcaseResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ShowcaseResult<Self> {
        let config: ShowcaseConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("SHOWCASE"))
            .build()
            .map_err(|e| ShowcaseError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ShowcaseError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ShowcaseResult<()> {
        parse_provider_base(&self.calendar_provider_url)?;
        for (name, value) in [
            ("sweep_interval", self.sweep_interval),
            ("event_check_interval", self.event_check_interval),
        ] {
            if value.is_zero() {
                return Err(ShowcaseError::Config(format!("{name} must be greater than zero")));
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn proposal_lifetime(&self) -> ShowcaseResult<chrono::Duration> {
        chrono::Duration::from_std(self.proposal_lifetime)
            .map_err(|e| ShowcaseError::Config(format!("proposal_lifetime out of range: {e}")))
    }

    pub fn notification_throttle(&self) -> ShowcaseResult<chrono::Duration> {
        chrono::Duration::from_std(self.notification_throttle)
            .map_err(|e| ShowcaseError::Config(format!("notification_throttle out of range: {e}")))
    }

    pub fn provider_base(&self) -> ShowcaseResult<Url> {
        parse_provider_base(&self.calendar_provider_url)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ShowcaseResult<()> {
        let contents = format!(
            "\
# showcase configuration

# Address and port the server listens on:
# bind = \"127.0.0.1\"
# port = 4096

# How long proposals stay open, and how often expired ones are removed:
# proposal_lifetime = \"7days\"
# sweep_interval = \"24h\"

# How often to look for new events, and how often users may be told about them:
# event_check_interval = \"1h\"
# notification_throttle = \"24h\"

# Web calendar used for \"add to calendar\" links:
# calendar_provider_url = \"{}\"

# Accounts allowed to create events (hash with `showcase hash-password`):
# [[accounts]]
# email = \"admin@example.com\"
# password_hash = \"$argon2id$...\"
",
            DEFAULT_PROVIDER_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ShowcaseError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ShowcaseError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Durations written the humantime way ("24h", "7days").
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
