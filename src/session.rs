//! Game session controller — owns all client state for one game.
//!
//! DESIGN
//! ======
//! `GameSession` is constructed explicitly and held by the front-end; there
//! is no global. Each player action is one `&mut self` async method that
//! issues exactly one backend call, paces the reply through the
//! [`Sequencer`], and publishes UI updates as [`SessionEvent`]s on an
//! unbounded channel. Presentation layers only consume events and send
//! [`Command`]s back through [`GameSession::dispatch`].
//!
//! TURN PROTOCOL
//! =============
//! 1. Player message appended immediately, actions withdrawn.
//! 2. Typing indicator shown, one backend call issued.
//! 3. Reply paced, indicator removed, reply appended.
//! 4. Won over: safe notice + safe actions. Otherwise the declared phase's
//!    actions (argument phase re-fetches its options).
//! 5. Progress refreshed, actions restored.
//!
//! ERROR HANDLING
//! ==============
//! Backend failures inside a turn never escape as `Err`: the indicator is
//! removed first, then one system notice is appended and the previous
//! phase's actions come back so the player can retry. `Err` is reserved for
//! calls the UI should not have made (no conversation, turn in flight,
//! action not offered) and for start/open failures, which also emit a
//! blocking notice.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::net::api::{ApiError, GameApi};
use crate::net::types::{ArgumentOption, GameStatus, Npc};
use crate::pacing::{Pause, ReplyWeight, Sequencer};
use crate::phase::{Action, FixedQuestion, Phase, Signal, actions_for, fallback_arguments};
use crate::state::conversation::Conversation;
use crate::state::progress::{Progress, ProgressTracker};
use crate::state::roster::{Avatar, Roster, RosterEntry};
use crate::state::transcript::{Message, Role};

const ARGUMENT_WON_NOTICE: &str = "✅ Argument succeeded! The NPC was convinced.";
const ARGUMENT_REJECTED_NOTICE: &str = "❌ The argument didn't convince them. Try again!";
const START_GAME_FAILED_NOTICE: &str = "Failed to start the game. Please reload and try again.";
const OPEN_CONVERSATION_FAILED_NOTICE: &str = "Failed to start the conversation. Please try again.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Roster,
    Conversation,
}

/// UI updates published by the session, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RosterRendered(Vec<RosterEntry>),
    ProgressUpdated(Progress),
    ViewChanged(View),
    /// Header of a freshly opened chat.
    ConversationOpened { npc: Npc, avatar: Avatar },
    MessageAppended(Message),
    TypingStarted { npc_name: String },
    TypingStopped,
    /// Replaces the offered actions. Empty while a turn is outstanding.
    ActionsChanged(Vec<Action>),
    /// A failure the player must acknowledge before continuing.
    BlockingNotice(String),
    Victory,
}

/// Every operation a presentation layer can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartGame,
    OpenConversation(String),
    AskQuestion(FixedQuestion),
    SubmitArgument(String),
    SendFreeform(String),
    ReturnToRoster,
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The backend declared the next phase.
    Continued(Phase),
    WonOver,
    /// A free-form reply was shown; phase untouched.
    Replied,
    /// The backend call failed; a notice was appended and the phase kept.
    Failed,
    /// Empty input, nothing sent.
    Ignored,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no conversation is open")]
    NoConversation,
    #[error("a turn is already in flight")]
    TurnInFlight,
    #[error("action not offered in phase {0}")]
    ActionUnavailable(Phase),
    #[error("backend failure: {0}")]
    Backend(#[from] ApiError),
}

enum Advance {
    Question(FixedQuestion),
    Argument(String),
}

// =============================================================================
// SESSION
// =============================================================================

pub struct GameSession {
    api: Arc<dyn GameApi>,
    sequencer: Sequencer,
    victory_delay: Duration,
    events: UnboundedSender<SessionEvent>,
    roster: Roster,
    progress: ProgressTracker,
    conversation: Option<Conversation>,
    view: View,
    victory_scheduled: bool,
}

impl GameSession {
    #[must_use]
    pub fn new(
        api: Arc<dyn GameApi>,
        pause: Arc<dyn Pause>,
        config: &ClientConfig,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            api,
            sequencer: Sequencer::new(config.pacing, pause),
            victory_delay: config.victory_delay,
            events,
            roster: Roster::default(),
            progress: ProgressTracker::default(),
            conversation: None,
            view: View::Roster,
            victory_scheduled: false,
        }
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn roster(&self) -> &[RosterEntry] {
        self.roster.entries()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress.progress()
    }

    #[must_use]
    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    /// Actions offered in the open conversation; empty on the roster.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        self.conversation
            .as_ref()
            .map(Conversation::actions)
            .unwrap_or_default()
    }

    /// Route a UI command to its operation.
    ///
    /// # Errors
    ///
    /// Propagates the error of the dispatched operation.
    pub async fn dispatch(&mut self, command: Command) -> Result<Option<TurnOutcome>, SessionError> {
        match command {
            Command::StartGame => self.start_game().await.map(|()| None),
            Command::OpenConversation(npc_id) => self.open_conversation(&npc_id).await.map(|()| None),
            Command::AskQuestion(question) => self.ask_fixed_question(question).await.map(Some),
            Command::SubmitArgument(argument) => self.submit_argument(&argument).await.map(Some),
            Command::SendFreeform(message) => self.send_freeform(&message).await.map(Some),
            Command::ReturnToRoster => {
                self.return_to_roster();
                Ok(None)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Game lifecycle
    // -------------------------------------------------------------------------

    /// Start (or restart) a game and show the roster.
    ///
    /// # Errors
    ///
    /// Returns `TurnInFlight` during an outstanding turn, or the backend
    /// error after emitting a blocking notice.
    pub async fn start_game(&mut self) -> Result<(), SessionError> {
        if self.conversation.as_ref().is_some_and(Conversation::is_pending) {
            return Err(SessionError::TurnInFlight);
        }

        let started = match self.api.start_game().await {
            Ok(started) => started,
            Err(e) => {
                warn!(error = %e, "game: start failed");
                self.emit(SessionEvent::BlockingNotice(START_GAME_FAILED_NOTICE.to_owned()));
                return Err(e.into());
            }
        };

        info!(npcs = started.npcs.len(), "game: started");
        self.conversation = None;
        self.victory_scheduled = false;
        self.progress.reset();

        let entries = self.roster.render(&started.npcs).to_vec();
        self.emit(SessionEvent::RosterRendered(entries));
        self.apply_status(started.status);
        self.show_view(View::Roster);
        Ok(())
    }

    /// Pull the authoritative status and re-render progress and roster.
    /// Failures are logged only.
    pub async fn refresh_progress(&mut self) {
        match self.api.game_status().await {
            Ok(status) => self.apply_status(status),
            Err(e) => warn!(error = %e, "progress: refresh failed"),
        }
    }

    fn apply_status(&mut self, status: GameStatus) {
        let update = match self.progress.apply(status) {
            Ok(update) => update,
            Err(e) => {
                warn!(error = %e, "progress: rejected inconsistent snapshot");
                return;
            }
        };

        self.emit(SessionEvent::ProgressUpdated(update.progress));
        if let Some(snapshot) = self.progress.snapshot() {
            let entries = self.roster.render(snapshot.partitioned()).to_vec();
            self.emit(SessionEvent::RosterRendered(entries));
        }
        if update.game_won {
            self.schedule_victory();
        }
    }

    /// Announce victory once, after the fixed delay, off the turn's path.
    fn schedule_victory(&mut self) {
        if self.victory_scheduled {
            return;
        }
        self.victory_scheduled = true;

        let pause = self.sequencer.pause_source();
        let delay = self.victory_delay;
        let events = self.events.clone();
        tokio::spawn(async move {
            pause.pause(delay).await;
            info!("game: won");
            if events.send(SessionEvent::Victory).is_err() {
                debug!("game: victory dropped, front-end gone");
            }
        });
    }

    // -------------------------------------------------------------------------
    // Conversation lifecycle
    // -------------------------------------------------------------------------

    /// Open a chat with `npc_id`, replacing any open one.
    ///
    /// # Errors
    ///
    /// Returns `TurnInFlight` during an outstanding turn, or the backend
    /// error after emitting a blocking notice; the roster stays shown.
    pub async fn open_conversation(&mut self, npc_id: &str) -> Result<(), SessionError> {
        if self.conversation.as_ref().is_some_and(Conversation::is_pending) {
            return Err(SessionError::TurnInFlight);
        }

        let opened = match self.api.start_conversation(npc_id).await {
            Ok(opened) => opened,
            Err(e) => {
                warn!(%npc_id, error = %e, "conversation: open failed");
                self.emit(SessionEvent::BlockingNotice(OPEN_CONVERSATION_FAILED_NOTICE.to_owned()));
                return Err(e.into());
            }
        };

        let phase = Phase::from_wire(&opened.phase);
        let mut convo = Conversation::new(opened.npc, phase.clone());
        info!(conversation_id = %convo.id, npc_id = %convo.npc.id, %phase, "conversation: opened");

        convo.begin_turn();
        let npc = convo.npc.clone();
        self.conversation = Some(convo);
        self.emit(SessionEvent::ConversationOpened { avatar: Avatar::for_npc(&npc), npc: npc.clone() });
        self.show_view(View::Conversation);

        self.show_typing(&npc.name);
        self.sequencer
            .pace(&opened.message, ReplyWeight::Standard)
            .await;
        self.hide_typing();
        self.append(Message::new(Role::Npc, opened.message));

        self.enter_phase(phase).await;
        self.finish_turn();
        Ok(())
    }

    /// Close the chat, dropping its transcript, and show the roster.
    pub fn return_to_roster(&mut self) {
        if let Some(convo) = self.conversation.take() {
            info!(conversation_id = %convo.id, npc_id = %convo.npc.id, "conversation: closed");
        }
        self.show_view(View::Roster);
    }

    // -------------------------------------------------------------------------
    // Turns
    // -------------------------------------------------------------------------

    /// Ask the scripted question offered in the current phase.
    ///
    /// # Errors
    ///
    /// Returns an error when no conversation is open, a turn is pending, or
    /// `question` is not offered in the current phase.
    pub async fn ask_fixed_question(&mut self, question: FixedQuestion) -> Result<TurnOutcome, SessionError> {
        self.check_offered(&Action::AskQuestion(question))?;
        self.advancing_turn(Advance::Question(question)).await
    }

    /// Submit an argument. Any text is accepted in the argument phase;
    /// blank text is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when no conversation is open, a turn is pending, or
    /// the conversation is not in the argument phase.
    pub async fn submit_argument(&mut self, argument: &str) -> Result<TurnOutcome, SessionError> {
        let argument = argument.trim();
        if argument.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        let convo = self
            .conversation
            .as_ref()
            .ok_or(SessionError::NoConversation)?;
        if convo.is_pending() {
            return Err(SessionError::TurnInFlight);
        }
        if convo.phase != Phase::ArgumentPhase {
            return Err(SessionError::ActionUnavailable(convo.phase.clone()));
        }
        self.advancing_turn(Advance::Argument(argument.to_owned()))
            .await
    }

    /// Send free-form chat. Never changes the phase; blank text is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when no conversation is open or a turn is pending.
    pub async fn send_freeform(&mut self, message: &str) -> Result<TurnOutcome, SessionError> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        let (npc_id, npc_name) = self.begin_turn()?;

        self.append(Message::new(Role::User, message));
        self.show_typing(&npc_name);

        let reply = match self.api.chat(&npc_id, message).await {
            Ok(reply) => reply,
            Err(e) => return Ok(self.fail_turn(&e)),
        };

        self.sequencer
            .pace(&reply.response, ReplyWeight::Freeform)
            .await;
        self.hide_typing();
        self.append(Message::new(Role::Npc, reply.response));
        self.finish_turn();
        Ok(TurnOutcome::Replied)
    }

    async fn advancing_turn(&mut self, advance: Advance) -> Result<TurnOutcome, SessionError> {
        let (npc_id, npc_name) = self.begin_turn()?;

        let outgoing = match &advance {
            Advance::Question(question) => question.prompt().to_owned(),
            Advance::Argument(argument) => argument.clone(),
        };
        self.append(Message::new(Role::User, outgoing));
        self.show_typing(&npc_name);

        let result = match &advance {
            Advance::Question(FixedQuestion::KnowsGiovanni) => self.api.ask_giovanni(&npc_id).await,
            Advance::Question(FixedQuestion::AiBubble) => self.api.ask_ai_opinion(&npc_id).await,
            Advance::Argument(argument) => self.api.make_argument(&npc_id, argument).await,
        };
        let (reply, signal) = match result.and_then(|reply| {
            let signal = Signal::from_reply(&reply)
                .ok_or_else(|| ApiError::Malformed("reply has neither a phase nor a won-over signal".to_owned()))?;
            Ok((reply, signal))
        }) {
            Ok(parsed) => parsed,
            Err(e) => return Ok(self.fail_turn(&e)),
        };

        let weight = match advance {
            Advance::Question(FixedQuestion::AiBubble) => ReplyWeight::Opinion,
            Advance::Question(FixedQuestion::KnowsGiovanni) | Advance::Argument(_) => ReplyWeight::Standard,
        };
        self.sequencer.pace(&reply.response, weight).await;
        self.hide_typing();
        self.append(Message::new(Role::Npc, reply.response));

        let current = self.current_phase();
        let next = current.advance(&signal);
        let outcome = match (&signal, &advance) {
            (Signal::WonOver, Advance::Question(question)) => {
                self.append(Message::new(Role::System, question.safe_notice()));
                TurnOutcome::WonOver
            }
            (Signal::WonOver, Advance::Argument(_)) => {
                self.append(Message::new(Role::System, ARGUMENT_WON_NOTICE));
                TurnOutcome::WonOver
            }
            (Signal::Continue(_), Advance::Argument(_)) => {
                self.append(Message::new(Role::System, ARGUMENT_REJECTED_NOTICE));
                TurnOutcome::Continued(next.clone())
            }
            (Signal::Continue(_), Advance::Question(_)) => TurnOutcome::Continued(next.clone()),
        };
        info!(%npc_id, from = %current, to = %next, ?outcome, "conversation: turn complete");

        self.enter_phase(next).await;
        self.refresh_progress().await;
        self.finish_turn();
        Ok(outcome)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn check_offered(&self, action: &Action) -> Result<(), SessionError> {
        let convo = self
            .conversation
            .as_ref()
            .ok_or(SessionError::NoConversation)?;
        if convo.is_pending() {
            return Err(SessionError::TurnInFlight);
        }
        if !convo.offers(action) {
            return Err(SessionError::ActionUnavailable(convo.phase.clone()));
        }
        Ok(())
    }

    /// Mark a turn outstanding and withdraw the actions. Returns the NPC id
    /// and name.
    fn begin_turn(&mut self) -> Result<(String, String), SessionError> {
        let convo = self
            .conversation
            .as_mut()
            .ok_or(SessionError::NoConversation)?;
        if !convo.begin_turn() {
            return Err(SessionError::TurnInFlight);
        }
        let ids = (convo.npc.id.clone(), convo.npc.name.clone());
        self.emit(SessionEvent::ActionsChanged(Vec::new()));
        Ok(ids)
    }

    /// Close the turn and publish the actions now offered.
    fn finish_turn(&mut self) {
        let Some(convo) = self.conversation.as_mut() else {
            return;
        };
        convo.end_turn();
        let actions = convo.actions().to_vec();
        self.emit(SessionEvent::ActionsChanged(actions));
    }

    /// Error path: indicator removed before the notice, phase untouched.
    fn fail_turn(&mut self, error: &ApiError) -> TurnOutcome {
        let conversation_id = self.conversation.as_ref().map(|c| c.id);
        warn!(?conversation_id, %error, "conversation: turn failed");
        self.hide_typing();
        self.append(Message::new(Role::System, format!("⚠️ Failed to get a response ({error}). Please try again.")));
        self.finish_turn();
        TurnOutcome::Failed
    }

    async fn enter_phase(&mut self, phase: Phase) {
        let arguments = if phase == Phase::ArgumentPhase { self.load_arguments().await } else { Vec::new() };
        if let Phase::Unrecognized(raw) = &phase {
            warn!(phase = %raw, "conversation: unrecognized phase, offering exit and free chat only");
        }
        let actions = actions_for(&phase, &arguments);
        if let Some(convo) = self.conversation.as_mut() {
            convo.phase = phase;
            convo.set_actions(actions);
        }
    }

    /// Fresh options for every argument phase; built-in ones on failure.
    async fn load_arguments(&self) -> Vec<ArgumentOption> {
        match self.api.random_arguments().await {
            Ok(options) => options,
            Err(e) => {
                warn!(error = %e, "conversation: argument options unavailable, using built-in set");
                fallback_arguments()
            }
        }
    }

    fn current_phase(&self) -> Phase {
        self.conversation
            .as_ref()
            .map_or(Phase::Initial, |c| c.phase.clone())
    }

    fn append(&mut self, message: Message) {
        if let Some(convo) = self.conversation.as_mut() {
            convo.transcript.push(message.clone());
            self.emit(SessionEvent::MessageAppended(message));
        }
    }

    fn show_typing(&mut self, npc_name: &str) {
        if let Some(convo) = self.conversation.as_mut() {
            if convo.transcript.show_typing(npc_name) {
                self.emit(SessionEvent::TypingStarted { npc_name: npc_name.to_owned() });
            }
        }
    }

    fn hide_typing(&mut self) {
        if let Some(convo) = self.conversation.as_mut() {
            if convo.transcript.hide_typing() {
                self.emit(SessionEvent::TypingStopped);
            }
        }
    }

    fn show_view(&mut self, view: View) {
        self.view = view;
        self.emit(SessionEvent::ViewChanged(view));
    }

    fn emit(&self, event: SessionEvent) {
        // A closed receiver means the front-end is gone; nothing to update.
        if self.events.send(event).is_err() {
            debug!("session: event receiver closed");
        }
    }
}
