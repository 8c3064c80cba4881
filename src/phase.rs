//! Conversation phase state machine.
//!
//! DESIGN
//! ======
//! The backend owns phase progression; the client only mirrors what each
//! reply declares. A won-over signal always lands in [`Phase::Safe`], a
//! continuation lands in exactly the phase the backend named. Each phase
//! maps to one fixed set of [`Action`]s; phases the client does not know
//! are kept verbatim and offer the safe exit plus free-form chat.

#[cfg(test)]
#[path = "phase_test.rs"]
mod phase_test;

use std::fmt;

use crate::net::types::{ArgumentOption, TurnReply};
use crate::session::Command;

/// Literal text of the special argument offered in every argument phase.
pub const SPECIAL_ARGUMENT: &str = "chicoteia";

// =============================================================================
// PHASE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Initial,
    AiOpinion,
    ArgumentPhase,
    Safe,
    /// A phase name the client does not recognize, kept as received.
    Unrecognized(String),
}

impl Phase {
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "initial" => Self::Initial,
            "ai_opinion" => Self::AiOpinion,
            "argument_phase" => Self::ArgumentPhase,
            "safe" => Self::Safe,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Initial => "initial",
            Self::AiOpinion => "ai_opinion",
            Self::ArgumentPhase => "argument_phase",
            Self::Safe => "safe",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// The phase that follows a backend signal. The current phase never
    /// influences the result; it is mirrored from the server.
    #[must_use]
    pub fn advance(&self, signal: &Signal) -> Phase {
        match signal {
            Signal::WonOver => Phase::Safe,
            Signal::Continue(next) => next.clone(),
        }
    }

    /// The scripted question offered in this phase, if any.
    #[must_use]
    pub fn fixed_question(&self) -> Option<FixedQuestion> {
        match self {
            Self::Initial => Some(FixedQuestion::KnowsGiovanni),
            Self::AiOpinion => Some(FixedQuestion::AiBubble),
            Self::ArgumentPhase | Self::Safe | Self::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

// =============================================================================
// SIGNAL
// =============================================================================

/// What a phase-advancing reply told the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    WonOver,
    Continue(Phase),
}

impl Signal {
    /// Read the signal out of a reply. `None` when the reply neither wins
    /// the NPC over nor names a next phase.
    #[must_use]
    pub fn from_reply(reply: &TurnReply) -> Option<Self> {
        if reply.won_over() {
            return Some(Self::WonOver);
        }
        reply
            .phase
            .as_deref()
            .map(|raw| Self::Continue(Phase::from_wire(raw)))
    }
}

// =============================================================================
// ACTIONS
// =============================================================================

/// The two scripted questions, each bound to its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedQuestion {
    KnowsGiovanni,
    AiBubble,
}

impl FixedQuestion {
    /// Text appended to the transcript as the player's message.
    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::KnowsGiovanni => "Do you know Giovanni?",
            Self::AiBubble => "What do you think about the AI market? Is it a bubble?",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::KnowsGiovanni => "Ask about Giovanni",
            Self::AiBubble => "Ask about the AI bubble",
        }
    }

    /// System notice shown when this question alone wins the NPC over.
    #[must_use]
    pub fn safe_notice(self) -> &'static str {
        match self {
            Self::KnowsGiovanni => "✅ This NPC is safe! They don't know Giovanni.",
            Self::AiBubble => "✅ This NPC is safe! They don't think AI is a bubble.",
        }
    }
}

/// An affordance offered to the player. Each maps to exactly one engine
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AskQuestion(FixedQuestion),
    SubmitArgument(ArgumentOption),
    Freeform,
    ReturnToRoster,
}

impl Action {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::AskQuestion(question) => question.label().to_owned(),
            Self::SubmitArgument(option) => option.description.clone(),
            Self::Freeform => "Chat freely".to_owned(),
            Self::ReturnToRoster => "← Back to the conference".to_owned(),
        }
    }

    /// The command this action triggers. `None` for free-form chat, which
    /// needs the player's text first.
    #[must_use]
    pub fn command(&self) -> Option<Command> {
        match self {
            Self::AskQuestion(question) => Some(Command::AskQuestion(*question)),
            Self::SubmitArgument(option) => Some(Command::SubmitArgument(option.text.clone())),
            Self::Freeform => None,
            Self::ReturnToRoster => Some(Command::ReturnToRoster),
        }
    }
}

/// The special argument, always first in an argument phase.
#[must_use]
pub fn special_argument() -> ArgumentOption {
    ArgumentOption { text: SPECIAL_ARGUMENT.to_owned(), description: format!("🎯 Say \"{SPECIAL_ARGUMENT}\"") }
}

/// Built-in options used when the backend cannot supply any.
#[must_use]
pub fn fallback_arguments() -> Vec<ArgumentOption> {
    vec![
        ArgumentOption {
            text: "AI is saving lives in medicine with more accurate diagnoses".to_owned(),
            description: "Healthcare argument".to_owned(),
        },
        ArgumentOption {
            text: "Large companies are integrating AI into core operations, not just experimenting".to_owned(),
            description: "Enterprise argument".to_owned(),
        },
    ]
}

/// The actions offered in `phase`. `arguments` are the server-supplied
/// options and only matter in the argument phase, where they follow the
/// special argument.
#[must_use]
pub fn actions_for(phase: &Phase, arguments: &[ArgumentOption]) -> Vec<Action> {
    match phase {
        Phase::Initial | Phase::AiOpinion => {
            let mut actions = Vec::with_capacity(2);
            if let Some(question) = phase.fixed_question() {
                actions.push(Action::AskQuestion(question));
            }
            actions.push(Action::Freeform);
            actions
        }
        Phase::ArgumentPhase => {
            let mut actions = Vec::with_capacity(arguments.len() + 2);
            actions.push(Action::SubmitArgument(special_argument()));
            actions.extend(
                arguments
                    .iter()
                    .filter(|option| option.text != SPECIAL_ARGUMENT)
                    .cloned()
                    .map(Action::SubmitArgument),
            );
            actions.push(Action::Freeform);
            actions
        }
        Phase::Safe | Phase::Unrecognized(_) => vec![Action::ReturnToRoster, Action::Freeform],
    }
}
