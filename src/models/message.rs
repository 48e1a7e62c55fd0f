use serde::Deserialize;

use crate::types::{GroupLabel, SenderId};

/// Represents a single chat message row from the input CSV file.
///
/// `text` is the raw, free-form message body and may span several lines.
/// `sender` is empty for exports that do not carry sender identities.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InboundMessage {
    /// Label of the chat group the message was posted in.
    #[serde(rename = "group")]
    pub group_label: GroupLabel,
    /// The posting account, when known.
    #[serde(rename = "sender", default)]
    pub sender_id: Option<SenderId>,
    /// Message body.
    pub text: String
}

impl InboundMessage {
    pub fn new(group_label: impl Into<String>, sender_id: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            group_label: group_label.into(),
            sender_id: sender_id.filter(|id| !id.is_empty()).map(str::to_string),
            text: text.into()
        }
    }

    /// Group-system notices are posted under the chatroom's own id.
    pub fn is_system_notice(&self) -> bool {
        self.sender_id.as_deref().is_some_and(|id| id.ends_with("@chatroom"))
    }
}
