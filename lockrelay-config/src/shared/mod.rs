//! Configuration types shared by the relay crates.

mod base;
mod connection;
mod relay;
mod telegram;

pub use base::ValidationError;
pub use connection::{IntoConnectOptions, PgConnectionConfig, TlsConfig};
pub use relay::{
    ClassifierConfig, ClassifierStrategy, DEFAULT_ACQUIRE_MESSAGE, DeliveryFailurePolicy,
    RelayConfig, StoreConfig,
};
pub use telegram::TelegramConfig;
