use serde::Deserialize;

use crate::shared::{PgConnectionConfig, ValidationError};

/// Commit message which marks a lock acquisition unless configured otherwise.
pub const DEFAULT_ACQUIRE_MESSAGE: &str = "Acquiring lock";

/// Behavior of the relay core, independent of any transport.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayConfig {
    /// How commit messages are mapped to lock transitions.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// What the dispatcher does when a notification cannot be delivered.
    #[serde(default)]
    pub delivery_failure_policy: DeliveryFailurePolicy,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.classifier.acquire_message.is_empty() {
            return Err(ValidationError::EmptyAcquireMessage);
        }

        Ok(())
    }
}

/// Selects the transition classification strategy applied to the last commit message.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub strategy: ClassifierStrategy,
    #[serde(default = "default_acquire_message")]
    pub acquire_message: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategy: ClassifierStrategy::default(),
            acquire_message: default_acquire_message(),
        }
    }
}

fn default_acquire_message() -> String {
    DEFAULT_ACQUIRE_MESSAGE.to_string()
}

/// Matching rule used to recognise an acquisition message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierStrategy {
    /// The message must equal the acquire message exactly.
    #[default]
    Exact,
    /// The message must contain the acquire message.
    Contains,
}

/// Severity assigned to a failed notification delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryFailurePolicy {
    /// A failed delivery terminates the process.
    #[default]
    Fatal,
    /// A failed delivery is logged and the notification dropped.
    Log,
}

/// Backing store for server status rows.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local store, lost on restart.
    Memory {
        /// Server names created at startup, standing in for rows provisioned out of band.
        #[serde(default)]
        seed_servers: Vec<String>,
    },
    /// Postgres backed store.
    Postgres {
        connection: PgConnectionConfig,
    },
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            StoreConfig::Memory { .. } => Ok(()),
            StoreConfig::Postgres { connection } => connection.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_config_defaults_to_exact_match_and_fatal_delivery() {
        let config: RelayConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.classifier.strategy, ClassifierStrategy::Exact);
        assert_eq!(config.classifier.acquire_message, DEFAULT_ACQUIRE_MESSAGE);
        assert_eq!(
            config.delivery_failure_policy,
            DeliveryFailurePolicy::Fatal
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_acquire_message_is_rejected() {
        let config: RelayConfig = serde_json::from_str(
            r#"{"classifier": {"strategy": "contains", "acquire_message": ""}}"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyAcquireMessage)
        ));
    }

    #[test]
    fn store_config_is_tagged_by_type() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"type": "memory", "seed_servers": ["db1", "db2"]}"#).unwrap();

        match config {
            StoreConfig::Memory { seed_servers } => assert_eq!(seed_servers, vec!["db1", "db2"]),
            other => panic!("unexpected store config: {other:?}"),
        }
    }

    #[test]
    fn postgres_store_with_tls_requires_certificates() {
        let config: StoreConfig = serde_json::from_str(
            r#"{
                "type": "postgres",
                "connection": {
                    "host": "localhost",
                    "port": 5432,
                    "name": "lockrelay",
                    "username": "postgres",
                    "password": null,
                    "tls": {"enabled": true}
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingTrustedRootCerts)
        ));
    }
}
