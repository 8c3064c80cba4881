#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;

use uuid::Uuid;

use super::transcript::Transcript;
use crate::net::types::Npc;
use crate::phase::{Action, Phase};

/// The single open chat with one NPC.
///
/// Created when the player opens a card and dropped, transcript included,
/// when they return to the roster.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Correlates log lines for this chat.
    pub id: Uuid,
    pub npc: Npc,
    pub phase: Phase,
    pub transcript: Transcript,
    actions: Vec<Action>,
    pending: bool,
}

impl Conversation {
    #[must_use]
    pub fn new(npc: Npc, phase: Phase) -> Self {
        Self { id: Uuid::new_v4(), npc, phase, transcript: Transcript::default(), actions: Vec::new(), pending: false }
    }

    /// Actions currently offered. Empty while a turn is outstanding.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        if self.pending { &[] } else { self.actions.as_slice() }
    }

    pub fn set_actions(&mut self, actions: Vec<Action>) {
        self.actions = actions;
    }

    #[must_use]
    pub fn offers(&self, action: &Action) -> bool {
        self.actions().contains(action)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Mark a turn as outstanding. Returns `false` if one already is.
    pub fn begin_turn(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn end_turn(&mut self) {
        self.pending = false;
    }
}
