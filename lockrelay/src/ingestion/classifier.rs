use std::sync::Arc;

use lockrelay_config::shared::{ClassifierConfig, ClassifierStrategy};

use crate::types::LockTransition;

/// Maps the last commit message of a push to a lock transition.
pub trait TransitionClassifier: Send + Sync {
    fn classify(&self, message: &str) -> LockTransition;
}

impl<F> TransitionClassifier for F
where
    F: Fn(&str) -> LockTransition + Send + Sync,
{
    fn classify(&self, message: &str) -> LockTransition {
        self(message)
    }
}

/// Acquires when the message equals the acquire message, releases otherwise.
#[derive(Debug, Clone)]
pub struct ExactMessageClassifier {
    acquire_message: String,
}

impl ExactMessageClassifier {
    pub fn new(acquire_message: impl Into<String>) -> Self {
        Self {
            acquire_message: acquire_message.into(),
        }
    }
}

impl Default for ExactMessageClassifier {
    fn default() -> Self {
        Self::new(lockrelay_config::shared::DEFAULT_ACQUIRE_MESSAGE)
    }
}

impl TransitionClassifier for ExactMessageClassifier {
    fn classify(&self, message: &str) -> LockTransition {
        LockTransition::from_open(message == self.acquire_message)
    }
}

/// Acquires when the message contains the acquire message anywhere, releases otherwise.
#[derive(Debug, Clone)]
pub struct ContainsMessageClassifier {
    acquire_message: String,
}

impl ContainsMessageClassifier {
    pub fn new(acquire_message: impl Into<String>) -> Self {
        Self {
            acquire_message: acquire_message.into(),
        }
    }
}

impl TransitionClassifier for ContainsMessageClassifier {
    fn classify(&self, message: &str) -> LockTransition {
        LockTransition::from_open(message.contains(self.acquire_message.as_str()))
    }
}

/// Builds the classifier selected by `config`.
pub fn classifier_from_config(config: &ClassifierConfig) -> Arc<dyn TransitionClassifier> {
    match config.strategy {
        ClassifierStrategy::Exact => {
            Arc::new(ExactMessageClassifier::new(config.acquire_message.clone()))
        }
        ClassifierStrategy::Contains => {
            Arc::new(ContainsMessageClassifier::new(config.acquire_message.clone()))
        }
    }
}
