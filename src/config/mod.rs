//! Configuration management for reqgate
//!
//! Everything comes from the process environment, optionally seeded from a
//! `.env` file. Variables already present in the environment are never
//! overridden by the file.

use std::fmt;
use std::path::Path;

use url::Url;

use crate::error::ConfigError;

pub const ACCOUNT_ID: &str = "NETSUITE_ACCOUNT_ID";
pub const REALM: &str = "NETSUITE_REALM";
pub const CONSUMER_KEY: &str = "NETSUITE_CONSUMER_KEY";
pub const CONSUMER_SECRET: &str = "NETSUITE_CONSUMER_SECRET";
pub const TOKEN_ID: &str = "NETSUITE_TOKEN_ID";
pub const TOKEN_SECRET: &str = "NETSUITE_TOKEN_SECRET";
pub const RESTLET_URL: &str = "NETSUITE_RESTLET_URL";
pub const PORT: &str = "PORT";

const DEFAULT_PORT: u16 = 8080;

/// Long-lived OAuth 1.0a token credential for the restlet.
///
/// Immutable once built. Secrets are redacted from `Debug` output and the
/// type is deliberately not `Serialize`.
#[derive(Clone)]
pub struct Credential {
    pub account_id: String,
    pub realm: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token_id: String,
    pub token_secret: String,
    pub endpoint: Url,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("account_id", &self.account_id)
            .field("realm", &self.realm)
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token_id", &self.token_id)
            .field("token_secret", &"<redacted>")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

#[cfg(test)]
impl Credential {
    /// Fixed credential pointing at `endpoint`
    pub fn for_tests(endpoint: &str) -> Self {
        Self {
            account_id: "1234567".to_string(),
            realm: "1234567".to_string(),
            consumer_key: "ck".to_string(),
            consumer_secret: "cs".to_string(),
            token_id: "tk".to_string(),
            token_secret: "ts".to_string(),
            endpoint: Url::parse(endpoint).expect("test endpoint must parse"),
        }
    }
}

/// Raw configuration values as read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub account_id: Option<String>,
    pub realm: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub token_id: Option<String>,
    pub token_secret: Option<String>,
    pub restlet_url: Option<String>,
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Values are trimmed; empty values count as unset.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = get(PORT)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            account_id: get(ACCOUNT_ID),
            realm: get(REALM),
            consumer_key: get(CONSUMER_KEY),
            consumer_secret: get(CONSUMER_SECRET),
            token_id: get(TOKEN_ID),
            token_secret: get(TOKEN_SECRET),
            restlet_url: get(RESTLET_URL),
            port,
        }
    }

    /// Names of required OAuth variables that are not set
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            (ACCOUNT_ID, &self.account_id),
            (CONSUMER_KEY, &self.consumer_key),
            (CONSUMER_SECRET, &self.consumer_secret),
            (TOKEN_ID, &self.token_id),
            (TOKEN_SECRET, &self.token_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Validate and assemble the restlet credential.
    ///
    /// The realm falls back to the account id when unset.
    pub fn credential(&self) -> Result<Credential, ConfigError> {
        let raw_url = self.restlet_url.as_deref().ok_or(ConfigError::MissingEndpoint)?;
        let endpoint =
            Url::parse(raw_url).map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.host_str().is_none() {
            return Err(ConfigError::InvalidEndpoint(format!(
                "{} is not an http(s) URL",
                raw_url
            )));
        }

        let missing = self.missing_credentials();
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        // Every field below was checked by missing_credentials()
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        let account_id = field(&self.account_id);
        let realm = self.realm.clone().unwrap_or_else(|| account_id.clone());

        Ok(Credential {
            realm,
            account_id,
            consumer_key: field(&self.consumer_key),
            consumer_secret: field(&self.consumer_secret),
            token_id: field(&self.token_id),
            token_secret: field(&self.token_secret),
            endpoint,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

/// Seed the environment from a dotenv file.
///
/// With no explicit path, `.env` is looked up from the working directory.
/// A missing default file is not an error.
pub fn load_env_file(path: Option<&Path>) {
    match path {
        Some(path) => match dotenvy::from_path(path) {
            Ok(()) => log::debug!("Loaded env file: {}", path.display()),
            Err(e) => log::warn!("Failed to load env file {}: {}", path.display(), e),
        },
        None => match dotenvy::dotenv() {
            Ok(found) => log::debug!("Loaded env file: {}", found.display()),
            Err(e) if e.not_found() => log::debug!("No .env file found"),
            Err(e) => log::warn!("Failed to load .env: {}", e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| map.get(key).cloned())
    }

    fn full() -> Vec<(&'static str, &'static str)> {
        vec![
            (ACCOUNT_ID, "1234567_SB1"),
            (CONSUMER_KEY, "ck"),
            (CONSUMER_SECRET, "cs"),
            (TOKEN_ID, "tk"),
            (TOKEN_SECRET, "ts"),
            (RESTLET_URL, "https://1234567-sb1.restlets.api.netsuite.com/app/site/hosting/restlet.nl?script=1&deploy=1"),
        ]
    }

    #[test]
    fn test_default_config_is_unconfigured() {
        let config = vars(&[]);
        assert_eq!(config.port, 8080);
        assert_eq!(Config::default().port, 8080);
        assert!(matches!(config.credential(), Err(ConfigError::MissingEndpoint)));
    }

    #[test]
    fn test_full_config_builds_credential() {
        let credential = vars(&full()).credential().unwrap();
        assert_eq!(credential.account_id, "1234567_SB1");
        assert_eq!(credential.consumer_key, "ck");
        assert_eq!(credential.endpoint.query(), Some("script=1&deploy=1"));
    }

    #[test]
    fn test_realm_defaults_to_account_id() {
        let credential = vars(&full()).credential().unwrap();
        assert_eq!(credential.realm, "1234567_SB1");

        let mut pairs = full();
        pairs.push((REALM, "CUSTOM"));
        let credential = vars(&pairs).credential().unwrap();
        assert_eq!(credential.realm, "CUSTOM");
    }

    #[test]
    fn test_missing_secret_is_reported() {
        let pairs: Vec<_> = full()
            .into_iter()
            .filter(|(k, _)| *k != TOKEN_SECRET)
            .collect();
        match vars(&pairs).credential() {
            Err(ConfigError::MissingCredentials(missing)) => {
                assert_eq!(missing, vec![TOKEN_SECRET]);
            }
            other => panic!("Expected MissingCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut pairs = full();
        pairs.retain(|(k, _)| *k != CONSUMER_KEY);
        pairs.push((CONSUMER_KEY, "   "));
        let config = vars(&pairs);
        assert_eq!(config.missing_credentials(), vec![CONSUMER_KEY]);
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut pairs = full();
        pairs.retain(|(k, _)| *k != RESTLET_URL);
        pairs.push((RESTLET_URL, "not a url"));
        assert!(matches!(
            vars(&pairs).credential(),
            Err(ConfigError::InvalidEndpoint(_))
        ));

        let mut pairs = full();
        pairs.retain(|(k, _)| *k != RESTLET_URL);
        pairs.push((RESTLET_URL, "mailto:ops@example.com"));
        assert!(matches!(
            vars(&pairs).credential(),
            Err(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn test_port_parsing() {
        assert_eq!(vars(&[(PORT, "9090")]).port, 9090);
        assert_eq!(vars(&[(PORT, "nope")]).port, 8080);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut pairs = full();
        pairs.retain(|(k, _)| *k != CONSUMER_SECRET && *k != TOKEN_SECRET);
        pairs.push((CONSUMER_SECRET, "super-consumer-secret"));
        pairs.push((TOKEN_SECRET, "super-token-secret"));
        let credential = vars(&pairs).credential().unwrap();

        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-consumer-secret"));
        assert!(!debug.contains("super-token-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("1234567_SB1"));
    }
}
