use serde::{Deserialize, Serialize};

pub mod health_check;
pub mod hook;
pub mod metrics;

/// JSON body returned with every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub error: String,
}
