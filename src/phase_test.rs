use super::*;

fn reply(value: serde_json::Value) -> TurnReply {
    serde_json::from_value(value).unwrap()
}

fn option(text: &str, description: &str) -> ArgumentOption {
    ArgumentOption { text: text.to_owned(), description: description.to_owned() }
}

// =============================================================
// Wire mapping
// =============================================================

#[test]
fn from_wire_maps_known_phases() {
    assert_eq!(Phase::from_wire("initial"), Phase::Initial);
    assert_eq!(Phase::from_wire("ai_opinion"), Phase::AiOpinion);
    assert_eq!(Phase::from_wire("argument_phase"), Phase::ArgumentPhase);
    assert_eq!(Phase::from_wire("safe"), Phase::Safe);
}

#[test]
fn from_wire_keeps_unrecognized_phase_verbatim() {
    let phase = Phase::from_wire("giovanni_check");
    assert_eq!(phase, Phase::Unrecognized("giovanni_check".to_owned()));
    assert_eq!(phase.to_string(), "giovanni_check");
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn won_over_from_initial_is_always_safe() {
    let signal = Signal::from_reply(&reply(serde_json::json!({
        "response": "Never heard of him.",
        "status": "safe",
        "phase": "initial"
    })))
    .unwrap();
    assert_eq!(signal, Signal::WonOver);
    assert_eq!(Phase::Initial.advance(&signal), Phase::Safe);
}

#[test]
fn continuation_from_initial_follows_the_declared_phase() {
    let signal = Signal::from_reply(&reply(serde_json::json!({
        "response": "Yes, I know Giovanni!",
        "status": "needs_convincing",
        "phase": "ai_opinion"
    })))
    .unwrap();
    assert_eq!(Phase::Initial.advance(&signal), Phase::AiOpinion);
}

#[test]
fn continuation_mirrors_even_unexpected_jumps() {
    let signal = Signal::Continue(Phase::Initial);
    assert_eq!(Phase::ArgumentPhase.advance(&signal), Phase::Initial);
    let odd = Signal::Continue(Phase::from_wire("mystery"));
    assert_eq!(Phase::Safe.advance(&odd), Phase::Unrecognized("mystery".to_owned()));
}

#[test]
fn argument_success_is_won_over() {
    let signal = Signal::from_reply(&reply(serde_json::json!({
        "response": "You changed my mind!",
        "success": true,
        "phase": "safe"
    })));
    assert_eq!(signal, Some(Signal::WonOver));
}

#[test]
fn reply_without_phase_or_win_has_no_signal() {
    let signal = Signal::from_reply(&reply(serde_json::json!({ "response": "...", "success": false })));
    assert_eq!(signal, None);
}

// =============================================================
// Actions per phase
// =============================================================

#[test]
fn initial_offers_first_question_and_freeform() {
    assert_eq!(
        actions_for(&Phase::Initial, &[]),
        vec![Action::AskQuestion(FixedQuestion::KnowsGiovanni), Action::Freeform]
    );
}

#[test]
fn ai_opinion_offers_second_question_and_freeform() {
    assert_eq!(
        actions_for(&Phase::AiOpinion, &[]),
        vec![Action::AskQuestion(FixedQuestion::AiBubble), Action::Freeform]
    );
}

#[test]
fn argument_phase_puts_special_option_first() {
    let options = vec![option("jobs", "Jobs argument"), option("health", "Health argument")];
    let actions = actions_for(&Phase::ArgumentPhase, &options);
    assert_eq!(actions.len(), 4);
    assert_eq!(actions[0], Action::SubmitArgument(special_argument()));
    assert_eq!(actions[1], Action::SubmitArgument(options[0].clone()));
    assert_eq!(actions[2], Action::SubmitArgument(options[1].clone()));
    assert_eq!(actions[3], Action::Freeform);
}

#[test]
fn argument_phase_does_not_duplicate_the_special_option() {
    let options = vec![option(SPECIAL_ARGUMENT, "again")];
    let actions = actions_for(&Phase::ArgumentPhase, &options);
    assert_eq!(actions, vec![Action::SubmitArgument(special_argument()), Action::Freeform]);
}

#[test]
fn safe_and_unrecognized_offer_exit_and_freeform() {
    let expected = vec![Action::ReturnToRoster, Action::Freeform];
    assert_eq!(actions_for(&Phase::Safe, &[]), expected);
    assert_eq!(actions_for(&Phase::Unrecognized("limbo".to_owned()), &[]), expected);
}

#[test]
fn fallback_arguments_are_non_empty_and_exclude_special() {
    let fallback = fallback_arguments();
    assert!(!fallback.is_empty());
    assert!(fallback.iter().all(|o| o.text != SPECIAL_ARGUMENT));
}

#[test]
fn actions_map_to_commands() {
    assert_eq!(
        Action::AskQuestion(FixedQuestion::AiBubble).command(),
        Some(Command::AskQuestion(FixedQuestion::AiBubble))
    );
    assert_eq!(
        Action::SubmitArgument(special_argument()).command(),
        Some(Command::SubmitArgument(SPECIAL_ARGUMENT.to_owned()))
    );
    assert_eq!(Action::ReturnToRoster.command(), Some(Command::ReturnToRoster));
    assert_eq!(Action::Freeform.command(), None);
}
