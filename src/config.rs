// Runtime configuration, read from the environment after `.env` is loaded.

use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_PLUGINS_PATH: &str = "plugins";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable! Create a .env file with your bot token.")]
    Missing(&'static str),

    #[error("Invalid value for {name}: '{value}' ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// Guild that receives the commands when publishing to a single guild.
    pub base_guild_id: Option<u64>,
    pub plugins_path: PathBuf,
    /// Refuse to boot when two plugins subscribe to `interaction_create`.
    pub check_interaction_create_handler: bool,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let base_guild_id = match get("BASE_GUILD_ID") {
            Some(raw) => Some(parse_guild_id("BASE_GUILD_ID", &raw)?),
            None => None,
        };

        let plugins_path = get("PLUGINS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLUGINS_PATH));

        let check_interaction_create_handler = match get("CHECK_INTERACTION_CREATE_HANDLER") {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::Invalid {
                    name: "CHECK_INTERACTION_CREATE_HANDLER",
                    value: raw.clone(),
                    reason: "expected true or false",
                })?,
            None => true,
        };

        Ok(Self {
            token: token.trim().to_string(),
            base_guild_id,
            plugins_path,
            check_interaction_create_handler,
        })
    }
}

fn parse_guild_id(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "snowflake ids are never 0",
        }),
        Ok(id) => Ok(id),
        Err(_) => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
            reason: "expected a numeric guild id",
        }),
    }
}
