use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// TLS is enabled but no trusted root certificates are provided.
    #[error("Invalid TLS config: `trusted_root_certs` must be set when `enabled` is true")]
    MissingTrustedRootCerts,
    /// The classifier would never recognise an acquisition.
    #[error("`relay.classifier.acquire_message` cannot be empty")]
    EmptyAcquireMessage,
    /// The messaging client cannot authenticate without a token.
    #[error("`telegram.token` cannot be empty")]
    EmptyTelegramToken,
    /// Long polling needs a non-zero timeout.
    #[error("`telegram.poll_timeout_secs` cannot be zero")]
    PollTimeoutZero,
    /// A zero payload limit would reject every push event.
    #[error("`application.max_payload_bytes` cannot be zero")]
    PayloadLimitZero,
}
