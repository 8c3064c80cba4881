//! Roster view model — the NPC cards shown in the conference room.
//!
//! DESIGN
//! ======
//! `render` replaces the whole roster on every call; nothing is diffed.
//! Status maps to a badge through an exhaustive match, and unrecognized
//! wire statuses have already degraded to `Unknown` at decode time, so
//! rendering never fails.

#[cfg(test)]
#[path = "roster_test.rs"]
mod roster_test;

use crate::net::types::{Npc, NpcStatus};
use crate::session::Command;

/// Well-known avatar images keyed by NPC id.
const AVATAR_ASSETS: [(&str, &str); 10] = [
    ("alex_frontend", "alexandre.jpg"),
    ("david_devops", "david.jpg"),
    ("maria_backend", "maria.jpg"),
    ("sarah_pm", "sarah.jpg"),
    ("tom_ux", "tom.jpg"),
    ("lisa_data", "lisa.jpg"),
    ("mike_security", "miguel.jpg"),
    ("jen_founder", "jennifer.jpg"),
    ("robert_lead", "roberto.jpg"),
    ("anna_qa", "ana.jpg"),
];

const AVATAR_ASSET_DIR: &str = "/static/images/avatars";

// =============================================================================
// BADGE / AVATAR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    Safe,
    NeedsConvincing,
    Unknown,
}

impl StatusBadge {
    #[must_use]
    pub fn for_status(status: NpcStatus) -> Self {
        match status {
            NpcStatus::Safe => Self::Safe,
            NpcStatus::NeedsConvincing => Self::NeedsConvincing,
            NpcStatus::Unknown => Self::Unknown,
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Safe => "✅",
            Self::NeedsConvincing => "💬",
            Self::Unknown => "?",
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::NeedsConvincing => "needs-convincing",
            Self::Unknown => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    /// Portrait image served by the backend.
    Asset { path: String },
    /// First letter of the name on the NPC's colour.
    Initial { letter: char, color: String },
}

impl Avatar {
    #[must_use]
    pub fn for_npc(npc: &Npc) -> Self {
        if let Some((_, file)) = AVATAR_ASSETS.iter().find(|(id, _)| *id == npc.id) {
            return Self::Asset { path: format!("{AVATAR_ASSET_DIR}/{file}") };
        }
        Self::Initial { letter: npc.name.chars().next().unwrap_or('?'), color: npc.avatar_color.clone() }
    }
}

// =============================================================================
// ROSTER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub npc_id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub avatar: Avatar,
    pub badge: StatusBadge,
}

impl RosterEntry {
    #[must_use]
    pub fn from_npc(npc: &Npc) -> Self {
        Self {
            npc_id: npc.id.clone(),
            name: npc.name.clone(),
            role: npc.role.clone(),
            bio: npc.bio.clone(),
            avatar: Avatar::for_npc(npc),
            badge: StatusBadge::for_status(npc.status),
        }
    }

    /// The single action bound to this card.
    #[must_use]
    pub fn command(&self) -> Command {
        Command::OpenConversation(self.npc_id.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Replace the displayed roster with `npcs`, in order.
    pub fn render<'a>(&mut self, npcs: impl IntoIterator<Item = &'a Npc>) -> &[RosterEntry] {
        self.entries = npcs.into_iter().map(RosterEntry::from_npc).collect();
        &self.entries
    }

    #[must_use]
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    #[must_use]
    pub fn find(&self, npc_id: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.npc_id == npc_id)
    }
}
