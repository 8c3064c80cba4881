//! `jibber` — line-oriented terminal front-end for the dialogue game.
//!
//! Events from the session are printed by a separate task; the main task
//! reads stdin and turns each line into one [`Command`]. Logs go to stderr
//! so the transcript on stdout stays readable.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::warn;

use jibber_jabber::config::{ClientConfig, ConfigError};
use jibber_jabber::net::api::{ApiError, HttpGameApi};
use jibber_jabber::pacing::{PacingPolicy, TokioPause};
use jibber_jabber::phase::Action;
use jibber_jabber::session::{Command, GameSession, SessionError, SessionEvent, View};
use jibber_jabber::state::progress::Progress;
use jibber_jabber::state::roster::{Avatar, RosterEntry};
use jibber_jabber::state::transcript::Role;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Api(#[from] ApiError),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "jibber", about = "Talk your way through the conference")]
struct Cli {
    /// Backend origin; overrides `JIBBER_BASE_URL`.
    #[arg(long, env = "JIBBER_BASE_URL")]
    base_url: Option<String>,

    /// Show replies immediately instead of simulating typing.
    #[arg(long)]
    no_pacing: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if cli.no_pacing {
        config.pacing = PacingPolicy::instant();
        config.victory_delay = Duration::ZERO;
    }

    let api = Arc::new(HttpGameApi::new(&config)?);
    let (tx, rx) = unbounded_channel();
    let printer = tokio::spawn(print_events(rx));
    let mut session = GameSession::new(api, Arc::new(TokioPause), &config, tx);

    println!("Connecting to {} ...", config.base_url);
    run(&mut session, Command::StartGame).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let command = match line {
            "" => continue,
            "/quit" => break,
            "/new" => Command::StartGame,
            "/back" => Command::ReturnToRoster,
            _ => match parse_input(&session, line) {
                Some(command) => command,
                None => continue,
            },
        };
        run(&mut session, command).await;
    }

    drop(session);
    if let Err(e) = printer.await {
        warn!(error = %e, "printer: task failed");
    }
    Ok(())
}

async fn run(session: &mut GameSession, command: Command) {
    match session.dispatch(command).await {
        Ok(_) => {}
        // Start/open failures were already shown as a blocking notice.
        Err(SessionError::Backend(_)) => {}
        Err(e) => warn!(error = %e, "input: command refused"),
    }
}

/// Map one input line to a command: a number picks a roster entry or an
/// action, anything else is free-form chat.
fn parse_input(session: &GameSession, line: &str) -> Option<Command> {
    let Ok(choice) = line.parse::<usize>() else {
        if session.view() == View::Conversation {
            return Some(Command::SendFreeform(line.to_owned()));
        }
        println!("Pick an attendee by number, or /new, /quit.");
        return None;
    };
    let index = choice.checked_sub(1)?;

    match session.view() {
        View::Roster => match session.roster().get(index) {
            Some(entry) => Some(entry.command()),
            None => {
                println!("No attendee #{choice}.");
                None
            }
        },
        View::Conversation => match session.actions().get(index) {
            Some(Action::Freeform) => {
                println!("Type your message and press Enter.");
                None
            }
            Some(action) => action.command(),
            None => {
                println!("No action #{choice}.");
                None
            }
        },
    }
}

// =============================================================================
// PRINTER
// =============================================================================

#[derive(Default)]
struct Printer {
    view: Option<View>,
    roster: Vec<RosterEntry>,
    progress: Progress,
    npc_name: String,
}

async fn print_events(mut rx: UnboundedReceiver<SessionEvent>) {
    let mut printer = Printer::default();
    while let Some(event) = rx.recv().await {
        printer.handle(event);
    }
}

impl Printer {
    fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::RosterRendered(entries) => self.roster = entries,
            SessionEvent::ProgressUpdated(progress) => {
                self.progress = progress;
                if self.view == Some(View::Conversation) {
                    println!("  [{progress}]");
                }
            }
            SessionEvent::ViewChanged(view) => {
                self.view = Some(view);
                if view == View::Roster {
                    self.print_roster();
                }
            }
            SessionEvent::ConversationOpened { npc, avatar } => {
                let badge = match avatar {
                    Avatar::Initial { letter, .. } => format!("({letter}) "),
                    Avatar::Asset { .. } => String::new(),
                };
                println!("\n=== {badge}{} · {} ===", npc.name, npc.role);
                self.npc_name = npc.name;
            }
            SessionEvent::MessageAppended(message) => match message.role {
                Role::User => println!("you> {}", message.text),
                Role::Npc => println!("{}> {}", self.npc_name, message.text),
                Role::System => println!("  * {}", message.text),
            },
            SessionEvent::TypingStarted { npc_name } => println!("  {npc_name} is typing..."),
            SessionEvent::TypingStopped => {}
            SessionEvent::ActionsChanged(actions) => {
                for (i, action) in actions.iter().enumerate() {
                    println!("  {}. {}", i + 1, action.label());
                }
            }
            SessionEvent::BlockingNotice(text) => println!("!! {text}"),
            SessionEvent::Victory => {
                println!("\n*** Victory! Every attendee is safe. ***");
                println!("Type /new to play again or /quit to leave.");
            }
        }
    }

    fn print_roster(&self) {
        println!("\n=== Conference floor [{}] ===", self.progress);
        for (i, entry) in self.roster.iter().enumerate() {
            println!("  {:>2}. {} {} ({})", i + 1, entry.badge.icon(), entry.name, entry.role);
        }
        println!("Pick an attendee by number. /new restarts, /quit leaves.");
    }
}
