//! Event Ingestion: push events in, store writes and notifications out.

mod classifier;
mod event;
mod ingestor;

pub use classifier::{
    ContainsMessageClassifier, ExactMessageClassifier, TransitionClassifier, classifier_from_config,
};
pub use event::{Commit, PushEvent, Pusher, Repository};
pub use ingestor::EventIngestor;
