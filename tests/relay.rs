use std::time::Duration;

use super_chat::{ChatRelay, TurnError, TurnRole, OVERLOADED_MESSAGE, PERSONA_ACK, PERSONA_PROMPT};
use tokio::time::Instant;
use turn_provider_mock::{ScriptedOutcome, ScriptedTurnProvider};

async fn submit_collecting(
    relay: &mut ChatRelay<ScriptedTurnProvider>,
    text: &str,
) -> (String, Vec<String>) {
    let mut prefixes = Vec::new();
    let final_text = relay
        .submit(text, |prefix| prefixes.push(prefix.to_string()))
        .await;
    (final_text, prefixes)
}

fn relay_with(outcomes: Vec<ScriptedOutcome>) -> ChatRelay<ScriptedTurnProvider> {
    ChatRelay::new(ScriptedTurnProvider::new(outcomes))
}

#[tokio::test]
async fn deltas_surface_as_strictly_growing_prefixes() {
    let mut relay = relay_with(vec![ScriptedOutcome::stream(&["a", "b", "c"])]);

    let (final_text, prefixes) = submit_collecting(&mut relay, "hi").await;

    assert_eq!(prefixes, vec!["a", "ab", "abc"]);
    assert_eq!(final_text, "abc");

    let visible = relay.session().visible_turns();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[1].role, TurnRole::Model);
    assert_eq!(visible[1].text, "abc");

    let records = relay.history().all();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_text, "hi");
    assert_eq!(records[0].assistant_text, "abc");
}

#[tokio::test]
async fn empty_deltas_are_skipped() {
    let mut relay = relay_with(vec![ScriptedOutcome::stream(&["a", "", "b"])]);

    let (final_text, prefixes) = submit_collecting(&mut relay, "hi").await;

    assert_eq!(prefixes, vec!["a", "ab"]);
    assert_eq!(final_text, "ab");
}

#[tokio::test(start_paused = true)]
async fn overload_is_retried_once_after_the_fixed_delay() {
    let mut relay = relay_with(vec![
        ScriptedOutcome::fail(TurnError::overloaded("HTTP 503")),
        ScriptedOutcome::stream(&["o", "k"]),
    ]);

    let started = Instant::now();
    let (final_text, prefixes) = submit_collecting(&mut relay, "hi").await;

    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(prefixes, vec!["o", "ok"]);
    assert_eq!(final_text, "ok");
    assert_eq!(relay.provider().call_count(), 2);

    // No error text anywhere: the failed attempt is invisible to the caller.
    assert_eq!(relay.history().all().len(), 1);
    assert_eq!(relay.history().all()[0].assistant_text, "ok");
}

#[tokio::test(start_paused = true)]
async fn second_overload_yields_one_final_notice() {
    let mut relay = relay_with(vec![
        ScriptedOutcome::fail(TurnError::overloaded("HTTP 503")),
        ScriptedOutcome::fail(TurnError::overloaded("HTTP 503")),
    ]);

    let (final_text, prefixes) = submit_collecting(&mut relay, "hi").await;

    assert_eq!(final_text, OVERLOADED_MESSAGE);
    assert_eq!(prefixes, vec![OVERLOADED_MESSAGE.to_string()]);
    assert_eq!(relay.provider().call_count(), 2);

    // The notice lands in the history but never in the session.
    let records = relay.history().all();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].assistant_text, OVERLOADED_MESSAGE);
    let visible = relay.session().visible_turns();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].role, TurnRole::User);
}

#[tokio::test]
async fn non_overload_failure_is_not_retried() {
    let mut relay = relay_with(vec![ScriptedOutcome::fail(TurnError::failed(
        "invalid request",
    ))]);

    let (final_text, prefixes) = submit_collecting(&mut relay, "hi").await;

    assert_eq!(final_text, "An error occurred: invalid request");
    assert_eq!(prefixes, vec![final_text.clone()]);
    assert_eq!(relay.provider().call_count(), 1);
}

#[tokio::test]
async fn overload_after_partial_output_is_terminal() {
    let mut relay = relay_with(vec![ScriptedOutcome::fail_after(
        &["par", "tial"],
        TurnError::overloaded("HTTP 503"),
    )]);

    let (final_text, prefixes) = submit_collecting(&mut relay, "hi").await;

    // The turn already produced output, so it is never resent.
    assert_eq!(relay.provider().call_count(), 1);
    assert!(final_text.starts_with("An error occurred: "));
    assert_eq!(prefixes.len(), 3);
    assert_eq!(prefixes[0], "par");
    assert_eq!(prefixes[1], "partial");
    assert_eq!(prefixes[2], final_text);
    assert_eq!(relay.history().all()[0].assistant_text, final_text);
}

#[tokio::test]
async fn whitespace_only_input_is_ignored() {
    let mut relay = relay_with(vec![ScriptedOutcome::stream(&["unused"])]);

    let (final_text, prefixes) = submit_collecting(&mut relay, "   \n\t").await;

    assert_eq!(final_text, "");
    assert!(prefixes.is_empty());
    assert_eq!(relay.provider().call_count(), 0);
    assert!(relay.session().visible_turns().is_empty());
    assert!(relay.history().is_empty());
}

#[tokio::test]
async fn input_is_trimmed_before_sending() {
    let mut relay = relay_with(vec![ScriptedOutcome::stream(&["ok"])]);

    let _ = submit_collecting(&mut relay, "  hello  ").await;

    assert_eq!(relay.session().visible_turns()[0].text, "hello");
    assert_eq!(relay.history().all()[0].user_text, "hello");
}

#[tokio::test]
async fn provider_receives_preamble_then_conversation() {
    let mut relay = relay_with(vec![
        ScriptedOutcome::stream(&["first reply"]),
        ScriptedOutcome::stream(&["second reply"]),
    ]);

    let _ = submit_collecting(&mut relay, "one").await;
    let _ = submit_collecting(&mut relay, "two").await;

    let received = relay.provider().received_turns();
    assert_eq!(received.len(), 2);

    let first = &received[0];
    assert_eq!(first.len(), 3);
    assert_eq!(first[0].text, PERSONA_PROMPT);
    assert_eq!(first[1].text, PERSONA_ACK);
    assert_eq!(first[2].text, "one");

    let second = &received[1];
    assert_eq!(second.len(), 5);
    assert_eq!(second[3].text, "first reply");
    assert_eq!(second[3].role, TurnRole::Model);
    assert_eq!(second[4].text, "two");
}

#[tokio::test]
async fn reset_clears_history_and_replaces_the_session() {
    let mut relay = relay_with(vec![ScriptedOutcome::stream(&["reply"])]);

    let _ = submit_collecting(&mut relay, "hello").await;
    let old_id = relay.session().id();
    assert_eq!(relay.history().len(), 1);

    relay.reset();

    assert!(relay.history().is_empty());
    assert_ne!(relay.session().id(), old_id);
    assert!(relay.session().visible_turns().is_empty());
    assert_eq!(relay.session().turns().len(), 2);
    assert_eq!(relay.session().turns()[0].text, PERSONA_PROMPT);
}

#[tokio::test]
async fn history_spans_rounds_in_order_including_failures() {
    let mut relay = relay_with(vec![
        ScriptedOutcome::stream(&["fine"]),
        ScriptedOutcome::fail(TurnError::failed("boom")),
        ScriptedOutcome::stream(&["again"]),
    ]);

    let _ = submit_collecting(&mut relay, "a").await;
    let _ = submit_collecting(&mut relay, "b").await;
    let _ = submit_collecting(&mut relay, "c").await;

    let answers: Vec<&str> = relay
        .history()
        .all()
        .iter()
        .map(|record| record.assistant_text.as_str())
        .collect();
    assert_eq!(answers, vec!["fine", "An error occurred: boom", "again"]);
}
