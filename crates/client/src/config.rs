//! Client configuration from the environment.

use std::path::PathBuf;

use shopdesk_auth::Resource;

pub const API_URL_ENV: &str = "SHOPDESK_API_URL";
pub const SESSION_FILE_ENV: &str = "SHOPDESK_SESSION_FILE";

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_SESSION_FILE: &str = "shopdesk-session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend API, without trailing slash.
    pub api_base_url: String,
    /// Where the session slot is persisted.
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>, session_file: impl Into<PathBuf>) -> Self {
        let api_base_url: String = api_base_url.into();
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            session_file: session_file.into(),
        }
    }

    /// Read `SHOPDESK_API_URL` / `SHOPDESK_SESSION_FILE`, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup(API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("{API_URL_ENV} not set; using {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            });

        let session_file = lookup(SESSION_FILE_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::debug!("{SESSION_FILE_ENV} not set; using {DEFAULT_SESSION_FILE}");
                DEFAULT_SESSION_FILE.to_string()
            });

        Self::new(api_base_url, session_file)
    }

    /// Authentication service endpoint (`POST {email, password}`).
    pub fn login_url(&self) -> String {
        format!("{}/auth/login", self.api_base_url)
    }

    /// Collection endpoint of a resource service.
    pub fn resource_url(&self, resource: Resource) -> String {
        let path = match resource {
            Resource::Client => "clients",
            Resource::Product => "products",
            Resource::Order => "orders",
            Resource::OrderItem => "order-items",
        };
        format!("{}/{}", self.api_base_url, path)
    }

    /// Single-record endpoint (`PUT`/`DELETE`).
    pub fn record_url(&self, resource: Resource, id: i64) -> String {
        format!("{}/{}", self.resource_url(resource), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(
            config.login_url(),
            "http://localhost:3000/api/v1/auth/login"
        );
    }

    #[test]
    fn env_values_override_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (API_URL_ENV, "https://shop.example.com/api/v1/"),
            (SESSION_FILE_ENV, "/tmp/s.json"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_base_url, "https://shop.example.com/api/v1");
        assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
        assert_eq!(
            config.record_url(Resource::OrderItem, 7),
            "https://shop.example.com/api/v1/order-items/7"
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = ClientConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, ClientConfig::default());
    }
}
