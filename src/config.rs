//! Configuration and credential resolution.
//!
//! Credentials are resolved once at startup, in priority order:
//! 1. A config file pointed to by `TG_CLEANER_CONFIG`
//! 2. `config.yml` in the working directory
//! 3. The `TG_API_ID` / `TG_API_HASH` environment variables
//! 4. Interactive terminal prompt

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable holding a path to an alternate config file.
pub const CONFIG_ENV: &str = "TG_CLEANER_CONFIG";
/// Default config file looked up in the working directory.
pub const CONFIG_FILE: &str = "config.yml";
pub const API_ID_ENV: &str = "TG_API_ID";
pub const API_HASH_ENV: &str = "TG_API_HASH";
pub const DEFAULT_SESSION_NAME: &str = "cleaner";

/// Telegram API credentials, immutable once resolved.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: String,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub session_name: String,
}

impl Config {
    pub fn session_file(&self) -> String {
        format!("{}.session", self.session_name)
    }

    pub fn lock_file(&self) -> String {
        format!("{}.lock", self.session_name)
    }

    /// Resolve configuration from all non-interactive sources, falling back
    /// to a terminal prompt when none of them yields credentials.
    pub fn resolve() -> Result<Self> {
        load_dotenv();

        if let Some(config) = Self::resolve_noninteractive()? {
            return Ok(config);
        }

        Self::from_prompt()
    }

    /// Walk the non-interactive sources in priority order.
    ///
    /// Returns `Ok(None)` when no source yields credentials; a config file
    /// explicitly pointed to by the env var must parse, so errors there are
    /// not swallowed.
    pub fn resolve_noninteractive() -> Result<Option<Self>> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            let config = Self::from_file(&path)?.ok_or_else(|| {
                Error::ConfigError(format!("{} has no telegram credentials", path))
            })?;
            return Ok(Some(config));
        }

        // The cwd default is optional: a missing or unparsable file falls
        // through to the next source.
        if Path::new(CONFIG_FILE).exists() {
            if let Ok(Some(config)) = Self::from_file(CONFIG_FILE) {
                return Ok(Some(config));
            }
        }

        Self::from_env_pair()
    }

    /// Load credentials from a YAML config file.
    ///
    /// Returns `Ok(None)` if the file parses but carries no credentials.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let yaml: YamlConfig = serde_yaml::from_str(&content).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let Some(telegram) = yaml.telegram else {
            return Ok(None);
        };

        let (Some(raw_id), Some(api_hash)) = (telegram.api_id, telegram.api_hash) else {
            return Ok(None);
        };

        let api_id = raw_id
            .parse::<i32>()
            .map_err(|_| Error::ConfigError(format!("api_id must be an integer: {}", raw_id)))?;

        Ok(Some(Self {
            credentials: Credentials { api_id, api_hash },
            session_name: telegram
                .session_name
                .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string()),
        }))
    }

    /// Load credentials from the `TG_API_ID` / `TG_API_HASH` pair.
    fn from_env_pair() -> Result<Option<Self>> {
        let (Ok(raw_id), Ok(api_hash)) = (env::var(API_ID_ENV), env::var(API_HASH_ENV)) else {
            return Ok(None);
        };

        let api_id = raw_id.parse::<i32>().map_err(|_| {
            Error::ConfigError(format!("{} must be an integer: {}", API_ID_ENV, raw_id))
        })?;

        if api_hash.is_empty() {
            return Err(Error::ConfigError(format!("{} is empty", API_HASH_ENV)));
        }

        Ok(Some(Self {
            credentials: Credentials { api_id, api_hash },
            session_name: DEFAULT_SESSION_NAME.to_string(),
        }))
    }

    /// Final fallback: ask for the credentials on the terminal.
    fn from_prompt() -> Result<Self> {
        let raw_id = prompt("Enter your api_id: ")?;
        let api_id = raw_id
            .parse::<i32>()
            .map_err(|_| Error::ConfigError(format!("api_id must be an integer: {}", raw_id)))?;

        let api_hash = prompt("Enter your api_hash: ")?;
        if api_hash.is_empty() {
            return Err(Error::ConfigError("api_hash is empty".to_string()));
        }

        Ok(Self {
            credentials: Credentials { api_id, api_hash },
            session_name: DEFAULT_SESSION_NAME.to_string(),
        })
    }
}

/// Print a prompt and read one trimmed line from stdin.
pub fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Load .env into the environment, trying the parent directory as fallback.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_filename("../.env");
    }
}

/// YAML config structures
#[derive(Debug, Deserialize)]
struct YamlConfig {
    telegram: Option<TelegramSection>,
}

#[derive(Debug, Deserialize)]
struct TelegramSection {
    #[serde(default, deserialize_with = "deserialize_string_or_number")]
    api_id: Option<String>,
    api_hash: Option<String>,
    session_name: Option<String>,
}

/// Deserialize a value that can be either a string or a number
fn deserialize_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_yaml::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {:?}",
            other
        ))),
    }
}
