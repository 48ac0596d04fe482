/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Status of one server, or of every server subscribed from the caller's chat.
    Status(Option<String>),
    /// Route notifications for a server to the caller's chat.
    Subscribe(Option<String>),
    Help,
    Unknown,
}

impl Command {
    /// Parses a command word and its free-text argument.
    ///
    /// The argument is trimmed, an empty argument becomes `None`.
    pub fn parse(word: &str, argument: &str) -> Self {
        let argument = argument.trim();
        let argument = (!argument.is_empty()).then(|| argument.to_string());

        match word {
            "status" => Command::Status(argument),
            "subscribe" => Command::Subscribe(argument),
            "help" => Command::Help,
            _ => Command::Unknown,
        }
    }

    pub fn as_static_str(&self) -> &'static str {
        match self {
            Command::Status(_) => "status",
            Command::Subscribe(_) => "subscribe",
            Command::Help => "help",
            Command::Unknown => "unknown",
        }
    }
}
