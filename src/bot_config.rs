use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::path::Path;
use serde::Deserialize;
use thiserror::Error;
use crate::permissions::RoleName;

/// Logical role that may open, close, advance and list a queue
pub const TUTOR_ROLE: &str = "tutor";

const DEFAULT_PREFIX: &str = "$";

/// Logical role name to the platform role names that grant it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(HashMap<String, Vec<RoleName>>);

impl RoleSet {
    pub fn new(roles: HashMap<String, Vec<RoleName>>) -> Self {
        Self(roles)
    }

    /// Platform roles granting `logical_role`. Unknown names grant nothing.
    pub fn required(&self, logical_role: &str) -> &[RoleName] {
        self.0.get(logical_role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

#[derive(Deserialize)]
struct BotConfigData {
    token: Option<String>,
    prefix: Option<String>,
    #[serde(default)]
    roles: RoleSet,
}

pub struct BotConfig {
    pub token: String,
    pub prefix: String,
    pub roles: RoleSet,
}

impl BotConfig {
    /// Read config from a json file. The token may come from `DISCORD_TOKEN` instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let data: BotConfigData = serde_json::from_reader(file)?;
        Self::from_data(data, env::var("DISCORD_TOKEN").ok())
    }

    fn from_data(data: BotConfigData, env_token: Option<String>) -> Result<Self, ConfigError> {
        let token = data.token.or(env_token).ok_or(ConfigError::MissingToken)?;
        if data.roles.is_empty() {
            return Err(ConfigError::MissingRoles)
        }
        Ok(Self{
            token,
            prefix: data.prefix.unwrap_or_else(|| DEFAULT_PREFIX.into()),
            roles: data.roles
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config must contain a token or DISCORD_TOKEN must be set")]
    MissingToken,
    #[error("Config must contain roles")]
    MissingRoles
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(json: &str, env_token: Option<&str>) -> Result<BotConfig, ConfigError> {
        let data: BotConfigData = serde_json::from_str(json)?;
        BotConfig::from_data(data, env_token.map(String::from))
    }

    #[test]
    fn full_config() {
        let config = parse(r#"{"token": "abc", "prefix": "!", "roles": {"tutor": ["Tutor", "Admin"]}}"#, None).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.prefix, "!");
        assert_eq!(config.roles.required(TUTOR_ROLE), [RoleName::from("Tutor"), RoleName::from("Admin")]);
        assert!(config.roles.required("moderator").is_empty());
    }

    #[test]
    fn token_falls_back_to_environment() {
        let config = parse(r#"{"roles": {"tutor": ["Tutor"]}}"#, Some("from-env")).unwrap();
        assert_eq!(config.token, "from-env");
        assert_eq!(config.prefix, "$");
    }

    #[test]
    fn file_token_wins() {
        let config = parse(r#"{"token": "file", "roles": {"tutor": ["Tutor"]}}"#, Some("env")).unwrap();
        assert_eq!(config.token, "file");
    }

    #[test]
    fn missing_token_is_rejected() {
        let result = parse(r#"{"roles": {"tutor": ["Tutor"]}}"#, None);
        assert!(matches!(result, Err(ConfigError::MissingToken)));
    }

    #[test]
    fn missing_or_empty_roles_are_rejected() {
        assert!(matches!(parse(r#"{"token": "abc"}"#, None), Err(ConfigError::MissingRoles)));
        assert!(matches!(parse(r#"{"token": "abc", "roles": {"tutor": []}}"#, None), Err(ConfigError::MissingRoles)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"token": "abc", "roles": {{"tutor": ["Tutor"]}}}}"#).unwrap();
        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.roles.required(TUTOR_ROLE), [RoleName::from("Tutor")]);
    }

    #[test]
    fn load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "roles: tutor").unwrap();
        assert!(matches!(BotConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }
}
