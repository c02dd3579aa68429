use std::collections::HashMap;

use serde::Deserialize;

use crate::constants::DEFAULT_PORT;

/// Runtime configuration, deserialized from the process environment.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// JSON object mapping a signing-key id to its shared secret,
    /// e.g. `{"main":"a-long-random-secret"}`.
    pub jwt_keys: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn parse_keys(&self) -> Result<HashMap<String, String>, serde_json::Error> {
        serde_json::from_str(&self.jwt_keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_map() {
        let config = Config {
            database_url: "postgres://localhost/drinks".to_string(),
            port: default_port(),
            jwt_issuer: "https://issuer.test/".to_string(),
            jwt_audience: "drinks".to_string(),
            jwt_keys: r#"{"main":"secret-a","rotated":"secret-b"}"#.to_string(),
        };

        let keys = config.parse_keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get("main").map(String::as_str), Some("secret-a"));
    }

    #[test]
    fn rejects_malformed_key_map() {
        let config = Config {
            database_url: String::new(),
            port: default_port(),
            jwt_issuer: String::new(),
            jwt_audience: String::new(),
            jwt_keys: "main=secret".to_string(),
        };

        assert!(config.parse_keys().is_err());
    }
}
