use lockrelay::messaging::InboundCommand;
use lockrelay::types::Destination;
use serde::{Deserialize, Serialize};

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

impl User {
    fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.first_name)
    }
}

impl Message {
    /// Turns a `/command` message into an [`InboundCommand`] replying to the same chat.
    pub fn into_command(self) -> Option<InboundCommand> {
        let (word, argument) = parse_command(self.text.as_deref()?)?;
        let actor = self
            .from
            .as_ref()
            .map(|user| user.display_name().to_string())
            .unwrap_or_default();

        Some(InboundCommand {
            word,
            argument,
            actor,
            reply_to: Destination::from(self.chat.id),
        })
    }
}

/// Splits `/word@bot argument` into `("word", "argument")`.
///
/// Returns `None` unless the text starts with `/` followed by a command word.
pub fn parse_command(text: &str) -> Option<(String, String)> {
    let rest = text.strip_prefix('/')?;
    let (head, argument) = match rest.split_once(char::is_whitespace) {
        Some((head, argument)) => (head, argument.trim()),
        None => (rest, ""),
    };
    let word = head.split('@').next().unwrap_or_default();

    if word.is_empty() {
        return None;
    }

    Some((word.to_string(), argument.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_split_into_word_and_argument() {
        assert_eq!(
            parse_command("/status db1"),
            Some(("status".to_string(), "db1".to_string()))
        );
        assert_eq!(
            parse_command("/subscribe@lock_bot   org/db1  "),
            Some(("subscribe".to_string(), "org/db1".to_string()))
        );
        assert_eq!(
            parse_command("/help"),
            Some(("help".to_string(), String::new()))
        );
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("status db1"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/@lock_bot"), None);
    }

    #[test]
    fn message_becomes_command_for_its_chat() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 10,
                "message": {
                    "message_id": 1,
                    "date": 0,
                    "chat": {"id": -100200, "type": "group"},
                    "from": {"id": 5, "is_bot": false, "first_name": "Alice", "username": "alice"},
                    "text": "/status db1"
                }
            }"#,
        )
        .unwrap();

        let command = update.message.unwrap().into_command().unwrap();
        assert_eq!(command.word, "status");
        assert_eq!(command.argument, "db1");
        assert_eq!(command.actor, "alice");
        assert_eq!(command.reply_to, Destination::new("-100200"));
    }
}
