//! Portal configuration
//!
//! Deployment parameters resolve in three tiers, first hit wins per
//! field: an injected JSON override (`CLEANGHANA_CONFIG`), individual
//! environment variables, then hardcoded demo defaults. Partial
//! configuration is tolerated; missing or unparseable values fall back
//! instead of failing startup.

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub sender_id: String,
    pub app_id: String,

    /// Port to listen on
    pub port: u16,

    /// SQLite database path; `None` keeps records in memory
    pub database: Option<String>,

    /// Pre-supplied auth token; identity bootstrap signs in anonymously
    /// when absent
    pub auth_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: "demo-api-key".to_string(),
            auth_domain: "clean-ghana-app.example.com".to_string(),
            project_id: "clean-ghana-app".to_string(),
            storage_bucket: "clean-ghana-app.storage.example.com".to_string(),
            sender_id: "000000000000".to_string(),
            app_id: "clean-ghana-app".to_string(),
            port: 3000,
            database: None,
            auth_token: None,
        }
    }
}

/// Injected runtime override, keyed the way the deployment host names
/// these options
#[derive(Debug, Default, Deserialize)]
struct ConfigOverride {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
    #[serde(rename = "authDomain")]
    auth_domain: Option<String>,
    #[serde(rename = "projectId")]
    project_id: Option<String>,
    #[serde(rename = "storageBucket")]
    storage_bucket: Option<String>,
    #[serde(rename = "senderId")]
    sender_id: Option<String>,
    #[serde(rename = "appId")]
    app_id: Option<String>,
    port: Option<u16>,
    database: Option<String>,
    #[serde(rename = "authToken")]
    auth_token: Option<String>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::resolve(std::env::var("CLEANGHANA_CONFIG").ok().as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolve configuration from an optional injected JSON override and
    /// an environment lookup. Separated from [`Config::from_env`] so tests
    /// never have to touch process-global environment variables.
    pub fn resolve(override_json: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let overrides = match override_json {
            Some(raw) => match serde_json::from_str::<ConfigOverride>(raw) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::warn!("Failed to parse injected config override: {}", err);
                    ConfigOverride::default()
                }
            },
            None => ConfigOverride::default(),
        };

        let defaults = Config::default();

        let port = overrides
            .port
            .or_else(|| match env("CLEANGHANA_PORT") {
                Some(raw) => match raw.parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        tracing::warn!(value = %raw, "Ignoring unparseable CLEANGHANA_PORT");
                        None
                    }
                },
                None => None,
            })
            .unwrap_or(defaults.port);

        Self {
            api_key: overrides
                .api_key
                .or_else(|| env("CLEANGHANA_API_KEY"))
                .unwrap_or(defaults.api_key),
            auth_domain: overrides
                .auth_domain
                .or_else(|| env("CLEANGHANA_AUTH_DOMAIN"))
                .unwrap_or(defaults.auth_domain),
            project_id: overrides
                .project_id
                .or_else(|| env("CLEANGHANA_PROJECT_ID"))
                .unwrap_or(defaults.project_id),
            storage_bucket: overrides
                .storage_bucket
                .or_else(|| env("CLEANGHANA_STORAGE_BUCKET"))
                .unwrap_or(defaults.storage_bucket),
            sender_id: overrides
                .sender_id
                .or_else(|| env("CLEANGHANA_SENDER_ID"))
                .unwrap_or(defaults.sender_id),
            app_id: overrides
                .app_id
                .or_else(|| env("CLEANGHANA_APP_ID"))
                .unwrap_or(defaults.app_id),
            port,
            database: overrides.database.or_else(|| env("CLEANGHANA_DATABASE")),
            auth_token: overrides.auth_token.or_else(|| env("CLEANGHANA_AUTH_TOKEN")),
        }
    }

    /// Hierarchical key of the shared record collection
    pub fn collection_path(&self) -> String {
        format!("artifacts/{}/public/data/reports", self.app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_when_nothing_is_supplied() {
        let config = Config::resolve(None, no_env);
        assert_eq!(config.app_id, "clean-ghana-app");
        assert_eq!(config.port, 3000);
        assert!(config.database.is_none());
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_collection_path_embeds_app_id() {
        let config = Config::resolve(None, no_env);
        assert_eq!(
            config.collection_path(),
            "artifacts/clean-ghana-app/public/data/reports"
        );
    }

    #[test]
    fn test_env_values_override_defaults() {
        let config = Config::resolve(None, |key| match key {
            "CLEANGHANA_APP_ID" => Some("pilot-accra".to_string()),
            "CLEANGHANA_PORT" => Some("8080".to_string()),
            "CLEANGHANA_DATABASE" => Some("/var/lib/cleanghana.db".to_string()),
            _ => None,
        });
        assert_eq!(config.app_id, "pilot-accra");
        assert_eq!(config.port, 8080);
        assert_eq!(config.database.as_deref(), Some("/var/lib/cleanghana.db"));
        // Untouched fields keep their defaults
        assert_eq!(config.api_key, "demo-api-key");
    }

    #[test]
    fn test_injected_override_wins_over_env() {
        let config = Config::resolve(
            Some(r#"{"appId": "injected-app", "port": 9000}"#),
            |key| match key {
                "CLEANGHANA_APP_ID" => Some("env-app".to_string()),
                "CLEANGHANA_PROJECT_ID" => Some("env-project".to_string()),
                _ => None,
            },
        );
        assert_eq!(config.app_id, "injected-app");
        assert_eq!(config.port, 9000);
        // Fields absent from the override still resolve from env
        assert_eq!(config.project_id, "env-project");
    }

    #[test]
    fn test_unparseable_override_falls_through() {
        let config = Config::resolve(Some("{not json"), |key| match key {
            "CLEANGHANA_APP_ID" => Some("env-app".to_string()),
            _ => None,
        });
        assert_eq!(config.app_id, "env-app");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_unparseable_port_falls_back() {
        let config = Config::resolve(None, |key| match key {
            "CLEANGHANA_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 3000);
    }
}
