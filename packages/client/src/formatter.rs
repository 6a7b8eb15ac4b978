//! Rendering of server events for the terminal.

use irori_server::infrastructure::dto::websocket::{MessageDto, UserDto};
use irori_shared::time::timestamp_to_clock_time;

/// Formats server events into printable lines.
///
/// Pure functions, so the rendering is testable without a terminal. Every
/// line starts with `\r` to clear the readline prompt and ends with `\n`.
pub struct MessageFormatter;

impl MessageFormatter {
    pub fn format_chat_message(message: &MessageDto) -> String {
        format!(
            "\r[{}] {}: {}\n",
            timestamp_to_clock_time(message.timestamp),
            message.sender.display_name,
            message.content
        )
    }

    pub fn format_user_connected(user: &UserDto) -> String {
        format!("\r* {} joined the room\n", user.display_name)
    }

    pub fn format_user_disconnected(user_id: &str) -> String {
        format!("\r* {} left the room\n", user_id)
    }

    pub fn format_roster(users: &[UserDto]) -> String {
        if users.is_empty() {
            return "\r* nobody is online\n".to_string();
        }
        let names: Vec<&str> = users.iter().map(|u| u.display_name.as_str()).collect();
        format!("\r* online ({}): {}\n", users.len(), names.join(", "))
    }

    pub fn format_history(messages: &[MessageDto]) -> String {
        if messages.is_empty() {
            return "\r* no messages yet\n".to_string();
        }
        let mut out = String::new();
        for message in messages {
            out.push_str(&Self::format_chat_message(message));
        }
        out
    }

    pub fn format_rpc_failure(context: &str, error: &str) -> String {
        format!("\r! {} failed: {}\n", context, error)
    }
}
