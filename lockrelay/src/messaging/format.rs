//! Message templates.
//!
//! Templates using markup are written for Telegram MarkdownV2. Every dynamic part is escaped so
//! that names containing reserved characters still render as the literal name.

/// Characters that must be escaped anywhere outside code spans.
const MARKDOWN_V2_RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Help text sent as plain text in reply to `help`.
pub const HELP_TEXT: &str = "Available commands are:\n\n\
- /status <server-name>\n\
- /status (servers subscribed from this chat)\n\
- /subscribe <server-name>\n\
- /help";

/// Escapes `text` for use in MarkdownV2 body text.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_V2_RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Escapes `text` for use inside a MarkdownV2 inline code span.
pub fn escape_code(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '`' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

/// Notification for a lock acquisition.
pub fn lock_opened(server: &str, actor: &str) -> String {
    format!(
        "`{}` was *started* by _{}_",
        escape_code(server),
        escape_markdown(actor)
    )
}

/// Notification for a lock release.
pub fn lock_closed(server: &str) -> String {
    format!("`{}` was *closed*", escape_code(server))
}

/// Reply to `status` for a locked server.
pub fn status_open(server: &str, holder: &str) -> String {
    format!(
        "`{}` is currently *open* by _{}_",
        escape_code(server),
        escape_markdown(holder)
    )
}

/// Reply to `status` for an unlocked server.
pub fn status_closed(server: &str) -> String {
    format!("`{}` is currently *closed*", escape_code(server))
}

/// Plain-text confirmation of a subscription.
pub fn subscribed(server: &str) -> String {
    format!("Subscribed to {server}")
}

/// Plain-text error pointing the user at `help`.
pub fn usage_error(reason: &str) -> String {
    format!("Error: {reason}. Type /help for more information")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_render_unchanged() {
        assert_eq!(lock_opened("db1", "alice"), "`db1` was *started* by _alice_");
        assert_eq!(lock_closed("db1"), "`db1` was *closed*");
        assert_eq!(
            status_open("db1", "alice"),
            "`db1` is currently *open* by _alice_"
        );
        assert_eq!(status_closed("db1"), "`db1` is currently *closed*");
        assert_eq!(subscribed("db1"), "Subscribed to db1");
    }

    #[test]
    fn reserved_characters_are_escaped_outside_code() {
        assert_eq!(
            lock_opened("db-1.prod", "john_doe"),
            "`db-1.prod` was *started* by _john\\_doe_"
        );
        assert_eq!(escape_markdown("a.b!c"), "a\\.b\\!c");
    }

    #[test]
    fn code_spans_only_escape_backtick_and_backslash() {
        assert_eq!(escape_code("we`ird\\name_"), "we\\`ird\\\\name_");
    }

    #[test]
    fn usage_error_points_at_help() {
        assert_eq!(
            usage_error("no server specified"),
            "Error: no server specified. Type /help for more information"
        );
    }
}
