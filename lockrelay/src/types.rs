//! Data model shared by the relay components.

use std::fmt;

/// Opaque address of a chat or channel that can receive messages.
///
/// The relay never interprets the value; it is stored as given and handed back to the
/// messaging client on delivery.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Destination(String);

impl Destination {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for Destination {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// Persistent lock status of a single server.
///
/// `lock_holder` is only ever set while `is_open` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub name: String,
    pub is_open: bool,
    pub lock_holder: Option<String>,
    pub subscriber: Option<Destination>,
}

impl ServerStatus {
    /// Creates an unlocked status row without subscriber.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_open: false,
            lock_holder: None,
            subscriber: None,
        }
    }

    /// Applies a lock transition, recording `actor` as holder on acquisition and clearing the
    /// holder on release whoever held it.
    pub fn apply(&mut self, actor: &str, transition: LockTransition) {
        match transition {
            LockTransition::Acquire => {
                self.is_open = true;
                self.lock_holder = Some(actor.to_string());
            }
            LockTransition::Release => {
                self.is_open = false;
                self.lock_holder = None;
            }
        }
    }
}

/// Direction of a lock change derived from a commit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockTransition {
    Acquire,
    Release,
}

impl LockTransition {
    pub fn from_open(is_open: bool) -> Self {
        if is_open {
            LockTransition::Acquire
        } else {
            LockTransition::Release
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, LockTransition::Acquire)
    }

    pub fn as_static_str(&self) -> &'static str {
        match self {
            LockTransition::Acquire => "acquire",
            LockTransition::Release => "release",
        }
    }
}

/// In-memory record of a lock change, routed from ingestion to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub server_name: String,
    pub actor: String,
    pub is_open: bool,
}
