//! Command Handler: `status`, `subscribe` and `help` over a [`crate::messaging::CommandSource`].

mod command;
mod handler;

pub use command::Command;
pub use handler::CommandHandler;
