#[cfg(test)]
#[path = "transcript_test.rs"]
mod transcript_test;

use serde::Serialize;

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Npc,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }
}

/// One visible transcript row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(Message),
    /// Ephemeral "… is typing" row; always last while present.
    Typing { npc_name: String },
}

/// Ordered chat transcript.
///
/// Messages are append-only. The typing indicator is the only removable
/// entry and at most one exists at a time.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    typing: Option<String>,
}

impl Transcript {
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Show the typing indicator. Returns `false` if one is already shown.
    pub fn show_typing(&mut self, npc_name: &str) -> bool {
        if self.typing.is_some() {
            return false;
        }
        self.typing = Some(npc_name.to_owned());
        true
    }

    /// Remove the typing indicator. Returns `false` if none was shown.
    pub fn hide_typing(&mut self) -> bool {
        self.typing.take().is_some()
    }

    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.typing.is_some()
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// All visible rows, typing indicator last.
    #[must_use]
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self.messages.iter().cloned().map(Entry::Message).collect();
        if let Some(npc_name) = &self.typing {
            entries.push(Entry::Typing { npc_name: npc_name.clone() });
        }
        entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + usize::from(self.typing.is_some())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
