//! Wire schema for the dialogue backend's JSON API.
//!
//! DESIGN
//! ======
//! Only the fields the client consumes are modelled. Unknown fields are
//! ignored so backend-side additions never break decoding, and NPC status
//! decoding is total: anything that is not a recognized status reads as
//! `Unknown`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// NPC
// =============================================================================

/// Win status of a single NPC as reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcStatus {
    Safe,
    NeedsConvincing,
    #[default]
    Unknown,
}

impl NpcStatus {
    /// Map a raw status string; unrecognized values degrade to `Unknown`.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "safe" => Self::Safe,
            "needs_convincing" => Self::NeedsConvincing,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for NpcStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw.as_str().map_or(Self::Unknown, Self::from_wire))
    }
}

/// A non-player character as consumed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Npc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_color: String,
    #[serde(default)]
    pub status: NpcStatus,
}

// =============================================================================
// GAME STATUS
// =============================================================================

/// Aggregate progress snapshot from `GET /api/game_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub safe_count: usize,
    pub total_npcs: usize,
    #[serde(default)]
    pub safe_npcs: Vec<Npc>,
    #[serde(default)]
    pub needs_convincing: Vec<Npc>,
    #[serde(default)]
    pub unknown: Vec<Npc>,
    #[serde(default)]
    pub game_won: bool,
}

/// A `GameStatus` whose partitions disagree with its counters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("safe_count {reported} does not match {actual} safe NPCs")]
    SafeCountMismatch { reported: usize, actual: usize },
    #[error("total_npcs {reported} does not match {actual} partitioned NPCs")]
    TotalMismatch { reported: usize, actual: usize },
    #[error("NPC {0} appears in more than one partition")]
    DuplicateNpc(String),
}

impl GameStatus {
    /// Check that the partitions are disjoint and agree with the counters.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), SnapshotError> {
        if self.safe_count != self.safe_npcs.len() {
            return Err(SnapshotError::SafeCountMismatch { reported: self.safe_count, actual: self.safe_npcs.len() });
        }

        let mut seen = HashSet::new();
        for npc in self.partitioned() {
            if !seen.insert(npc.id.as_str()) {
                return Err(SnapshotError::DuplicateNpc(npc.id.clone()));
            }
        }

        if seen.len() != self.total_npcs {
            return Err(SnapshotError::TotalMismatch { reported: self.total_npcs, actual: seen.len() });
        }
        Ok(())
    }

    /// All NPCs in roster order: safe, then needs convincing, then unknown.
    pub fn partitioned(&self) -> impl Iterator<Item = &Npc> {
        self.safe_npcs
            .iter()
            .chain(&self.needs_convincing)
            .chain(&self.unknown)
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Body of `POST /api/start_game`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartGame {
    pub success: bool,
    #[serde(default)]
    pub npcs: Vec<Npc>,
    pub status: GameStatus,
}

/// Body of `POST /api/start_conversation/{npcId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationOpened {
    pub npc: Npc,
    pub message: String,
    pub phase: String,
}

/// Body of the three phase-advancing calls (fixed questions and arguments).
///
/// Won-over is signalled either by `success: true` (arguments) or by
/// `status: "safe"` (fixed questions); otherwise `phase` names the next step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnReply {
    pub response: String,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub status: Option<NpcStatus>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl TurnReply {
    #[must_use]
    pub fn won_over(&self) -> bool {
        self.success == Some(true) || self.status == Some(NpcStatus::Safe)
    }
}

/// Body of `POST /api/chat/{npcId}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// One entry of `GET /api/random_arguments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentOption {
    /// Literal argument text sent to `make_argument`.
    pub text: String,
    /// Human-readable label shown on the action.
    pub description: String,
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ArgumentRequest<'a> {
    pub argument: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}
