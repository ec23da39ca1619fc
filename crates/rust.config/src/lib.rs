pub mod autoroles;

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serenity::all::{ChannelId, GuildId, MessageId};
use thiserror::Error;

pub use autoroles::{AutoroleEntry, EmojiKey, MappingEntry, MappingTable, RoleMapping};

/// Environment variables that must be set for the bot to start
pub const REQUIRED_ENV_VARS: [&str; 6] = [
    "DISCORD_TOKEN",
    "DISCORD_GUILD_ID",
    "AUTOROLES_CHANNEL_ID",
    "ROLES_AUTOROLES_MESSAGE_ID",
    "PREMIER_AUTOROLES_MESSAGE_ID",
    "FACEIT_AUTOROLES_MESSAGE_ID",
];

/// Autorole message slots and the environment variable holding each message ID
pub const AUTOROLE_MESSAGE_VARS: [(&str, &str); 3] = [
    ("roles", "ROLES_AUTOROLES_MESSAGE_ID"),
    ("premier", "PREMIER_AUTOROLES_MESSAGE_ID"),
    ("faceit", "FACEIT_AUTOROLES_MESSAGE_ID"),
];

const DEFAULT_LOG_FILE: &str = "debug.log";
const DEFAULT_LOG_RETENTION_DAYS: u32 = 16;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnvVars(Vec<String>),

    #[error("Environment variable {var} must be a non-zero Discord ID, got `{value}`")]
    InvalidId { var: String, value: String },

    #[error("Environment variable {var} has an invalid value `{value}`")]
    InvalidValue { var: String, value: String },

    #[error("Environment variables {first} and {second} point at the same message {message_id}")]
    DuplicateMessageId {
        first: String,
        second: String,
        message_id: MessageId,
    },

    #[error("Could not read autorole mapping file {path}: {source}")]
    MappingFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not parse autorole mapping: {0}")]
    MappingParse(#[from] serde_yaml::Error),

    /// The mapping names a message slot that has no configured message ID.
    #[error("Autorole mapping references unknown message `{0}`")]
    UnknownMessageSlot(String),

    #[error("Emoji {emoji} is mapped twice on autorole message `{slot}`")]
    DuplicateEmoji { slot: String, emoji: EmojiKey },

    #[error("Emoji {emoji} on autorole message `{slot}` maps to an invalid role ID")]
    InvalidRoleId { slot: String, emoji: EmojiKey },
}

/// Logging options. These are read separately from [`Config`] so that logging
/// is available to report configuration failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub file: PathBuf,
    pub retention_days: u32,
    pub debug: bool,
    pub debug_opts: String,
}

impl LogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let retention_days = match lookup("LOG_RETENTION_DAYS") {
            Some(value) if !value.trim().is_empty() => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: "LOG_RETENTION_DAYS".to_string(),
                    value,
                })?,
            _ => DEFAULT_LOG_RETENTION_DAYS,
        };

        Ok(Self {
            file: lookup("LOG_FILE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            retention_days,
            debug: lookup("DEBUG").unwrap_or_default() == "true",
            debug_opts: lookup("DEBUG_OPTS").unwrap_or_default(),
        })
    }
}

/// Bot configuration, immutable once loaded
pub struct Config {
    pub token: String,

    /// The guild slash commands are registered in
    pub guild_id: GuildId,

    /// The channel holding the autorole messages
    pub autoroles_channel_id: ChannelId,

    /// Message slot name to message ID, in declaration order
    pub autorole_messages: IndexMap<String, MessageId>,

    pub autoroles: RoleMapping,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .field("autoroles_channel_id", &self.autoroles_channel_id)
            .field("autorole_messages", &self.autorole_messages)
            .field("autoroles", &self.autoroles)
            .finish()
    }
}

impl Config {
    /// Loads the config from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing = REQUIRED_ENV_VARS
            .iter()
            .filter(|key| get(**key).is_none())
            .map(|key| key.to_string())
            .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(ConfigError::MissingEnvVars(missing));
        }

        let require = |key: &str| {
            get(key).ok_or_else(|| ConfigError::MissingEnvVars(vec![key.to_string()]))
        };

        let token = require("DISCORD_TOKEN")?.trim().to_string();
        let guild_id = GuildId::new(parse_id("DISCORD_GUILD_ID", &require("DISCORD_GUILD_ID")?)?);
        let autoroles_channel_id = ChannelId::new(parse_id(
            "AUTOROLES_CHANNEL_ID",
            &require("AUTOROLES_CHANNEL_ID")?,
        )?);

        let mut autorole_messages = IndexMap::new();
        let mut seen: IndexMap<MessageId, &str> = IndexMap::new();
        for (slot, var) in AUTOROLE_MESSAGE_VARS {
            let message_id = MessageId::new(parse_id(var, &require(var)?)?);

            if let Some(first) = seen.insert(message_id, var) {
                return Err(ConfigError::DuplicateMessageId {
                    first: first.to_string(),
                    second: var.to_string(),
                    message_id,
                });
            }

            autorole_messages.insert(slot.to_string(), message_id);
        }

        let table = match get("AUTOROLES_MAPPING_FILE") {
            Some(path) => MappingTable::from_file(Path::new(path.trim()))?,
            None => MappingTable::builtin(),
        };

        let autoroles = RoleMapping::build(&table, &autorole_messages)?;

        Ok(Self {
            token,
            guild_id,
            autoroles_channel_id,
            autorole_messages,
            autoroles,
        })
    }
}

fn parse_id(var: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| ConfigError::InvalidId {
            var: var.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DISCORD_TOKEN", "token"),
            ("DISCORD_GUILD_ID", "100"),
            ("AUTOROLES_CHANNEL_ID", "200"),
            ("ROLES_AUTOROLES_MESSAGE_ID", "301"),
            ("PREMIER_AUTOROLES_MESSAGE_ID", "302"),
            ("FACEIT_AUTOROLES_MESSAGE_ID", "303"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn loads_builtin_mapping_for_every_message() {
        let config = load(&full_env()).expect("config should load");

        assert_eq!(config.guild_id, GuildId::new(100));
        assert_eq!(config.autoroles_channel_id, ChannelId::new(200));
        assert_eq!(config.autorole_messages["premier"], MessageId::new(302));

        for message_id in [301, 302, 303] {
            assert!(config.autoroles.is_tracked(MessageId::new(message_id)));
        }

        assert_eq!(
            config
                .autoroles
                .roles_for(MessageId::new(303))
                .map(|roles| roles.len()),
            Some(11)
        );
    }

    #[test]
    fn reports_every_missing_variable() {
        let mut env = full_env();
        env.remove("DISCORD_TOKEN");
        env.insert("FACEIT_AUTOROLES_MESSAGE_ID", "  ");

        match load(&env) {
            Err(ConfigError::MissingEnvVars(missing)) => {
                assert_eq!(missing, vec!["DISCORD_TOKEN", "FACEIT_AUTOROLES_MESSAGE_ID"])
            }
            other => panic!("expected missing vars, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let mut env = full_env();
        env.insert("AUTOROLES_CHANNEL_ID", "general");

        assert!(matches!(
            load(&env),
            Err(ConfigError::InvalidId { ref var, .. }) if var == "AUTOROLES_CHANNEL_ID"
        ));

        env.insert("AUTOROLES_CHANNEL_ID", "0");
        assert!(matches!(load(&env), Err(ConfigError::InvalidId { .. })));
    }

    #[test]
    fn rejects_shared_message_ids() {
        let mut env = full_env();
        env.insert("FACEIT_AUTOROLES_MESSAGE_ID", "301");

        assert!(matches!(
            load(&env),
            Err(ConfigError::DuplicateMessageId { .. })
        ));
    }

    #[test]
    fn log_config_defaults() {
        let log = LogConfig::from_lookup(|_| None).unwrap();

        assert_eq!(log.file, PathBuf::from("debug.log"));
        assert_eq!(log.retention_days, 16);
        assert!(!log.debug);

        let err = LogConfig::from_lookup(|key| {
            (key == "LOG_RETENTION_DAYS").then(|| "soon".to_string())
        });
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })));
    }
}
