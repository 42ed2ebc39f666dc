use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tokio::sync::oneshot;
use timerecorder::{BulletCycler, EntryKind, GlyphCatalog, Recorder, RecorderConfig, NOT_A_FUTURE};

#[derive(Debug, Error, PartialEq)]
#[error("connection refused by {0}")]
struct Refused(String);

async fn after<T, E>(ms: u64, outcome: Result<T, E>) -> Result<T, E> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    outcome
}

fn recorder_with_glyphs(glyphs: &[&str]) -> (Recorder, BulletCycler) {
    let cycler = BulletCycler::new(GlyphCatalog::new(glyphs.iter().copied()).expect("catalog"));
    let recorder = Recorder::with_config(RecorderConfig {
        cycler: cycler.clone(),
        ..RecorderConfig::default()
    });
    (recorder, cycler)
}

#[tokio::test(start_paused = true)]
async fn test_label_entry_never_terminates() {
    let recorder = Recorder::new();
    recorder.mark("Phase 1");
    tokio::time::sleep(Duration::from_millis(500)).await;

    let entries = recorder.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Label);
    assert_eq!(entries[0].glyph, "👉");
    assert!(entries[0].is_pending());
    assert_eq!(entries[0].end_ms(), None);
}

#[tokio::test]
async fn test_plain_value_is_recorded_as_misuse_and_passed_through() {
    let recorder = Recorder::new();
    let value = recorder.track_plain("answer", 42);
    assert_eq!(value, 42);

    let entries = recorder.entries();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.kind, EntryKind::SyncMisuse);
    assert_eq!(entry.glyph, "⚠️ ");
    assert_eq!(entry.success(), Some(true));
    assert_eq!(entry.error(), Some(NOT_A_FUTURE));
    assert_eq!(entry.error(), Some("Not a promise"));
    assert_eq!(entry.end_ms(), Some(entry.start_ms));
    assert!(entry.data.is_none());
}

#[tokio::test]
async fn test_plain_value_callback_sees_the_operand() {
    let recorder = Recorder::new();
    let value = recorder.track_plain_with("answer", vec![1, 2], |v| Ok(json!({ "len": v.len() })));
    assert_eq!(value, vec![1, 2]);
    assert_eq!(recorder.entries()[0].data, Some(json!({ "len": 2 })));
}

#[tokio::test(start_paused = true)]
async fn test_resolved_future_appends_pending_then_terminal() {
    let (recorder, _) = recorder_with_glyphs(&["a", "b"]);
    let result = recorder.track("load", after(100, Ok::<_, Refused>("R"))).await;
    assert_eq!(result, Ok("R"));

    let entries = recorder.entries();
    assert_eq!(entries.len(), 2);
    let (pending, terminal) = (&entries[0], &entries[1]);

    assert!(pending.is_pending());
    assert_eq!(pending.kind, EntryKind::Async);
    assert!(terminal.is_terminal());
    assert_eq!(terminal.success(), Some(true));
    assert_eq!(terminal.error(), None);

    assert_eq!(pending.id, terminal.id);
    assert_eq!(pending.label, terminal.label);
    assert_eq!(pending.start_ms, terminal.start_ms);
    assert_eq!(pending.glyph, "a");
    assert_eq!(terminal.glyph, "a");

    let duration = terminal.duration_ms().expect("terminal");
    assert!((100..=101).contains(&duration), "duration was {duration}");
}

#[tokio::test(start_paused = true)]
async fn test_failed_future_is_logged_and_reraised() {
    let recorder = Recorder::new();
    let result = recorder
        .track("connect", after(30, Err::<(), _>(Refused("db".into()))))
        .await;
    assert_eq!(result, Err(Refused("db".into())));

    let entries = recorder.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].success(), Some(false));
    assert_eq!(entries[1].error(), Some("Refused: connection refused by db"));
}

#[tokio::test]
async fn test_pending_entry_is_appended_before_first_poll() {
    let recorder = Recorder::new();
    let tracked = recorder.track("lazy", async { Ok::<_, Refused>(1) });
    assert_eq!(recorder.len(), 1);
    assert!(!tracked.is_finished());

    assert_eq!(tracked.await, Ok(1));
    assert_eq!(recorder.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_log_follows_settlement_order() {
    let recorder = Recorder::new();
    let slow = recorder.track("A", after(50, Ok::<_, Refused>("a")));
    let fast = recorder.track("B", after(10, Ok::<_, Refused>("b")));
    let (a, b) = tokio::join!(slow, fast);
    assert_eq!((a, b), (Ok("a"), Ok("b")));

    let order: Vec<(String, bool)> = recorder
        .entries()
        .into_iter()
        .map(|e| (e.label.clone(), e.is_terminal()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("A".to_string(), false),
            ("B".to_string(), false),
            ("B".to_string(), true),
            ("A".to_string(), true),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_callback_receives_outcome_and_stores_data() {
    let recorder = Recorder::new();
    let ok = recorder
        .track_with("ok", after(5, Ok::<u32, Refused>(9)), |outcome| {
            Ok(json!({ "value": outcome.copied().ok() }))
        })
        .await;
    let err = recorder
        .track_with("err", after(5, Err::<u32, _>(Refused("api".into()))), |outcome| {
            Ok(json!({ "error": outcome.err().map(|e| e.to_string()) }))
        })
        .await;
    assert_eq!(ok, Ok(9));
    assert!(err.is_err());

    let entries = recorder.entries();
    let data: Vec<_> = entries.iter().filter_map(|e| e.data.clone()).collect();
    assert_eq!(
        data,
        vec![json!({ "value": 9 }), json!({ "error": "connection refused by api" })]
    );
}

#[tokio::test(start_paused = true)]
async fn test_callback_failure_is_discarded() {
    let recorder = Recorder::new();
    let result = recorder
        .track_with("flaky", after(5, Ok::<_, Refused>("fine")), |_| {
            Err(anyhow::anyhow!("callback blew up"))
        })
        .await;
    assert_eq!(result, Ok("fine"));

    let entries = recorder.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].success(), Some(true));
    assert!(entries[1].data.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_flush_keeps_late_settlements() {
    let recorder = Recorder::new();
    recorder.mark("before");
    let tracked = recorder.track("late", after(40, Ok::<_, Refused>(())));
    assert_eq!(recorder.len(), 2);

    recorder.flush();
    assert_eq!(recorder.len(), 0);
    assert!(recorder.is_empty());

    tracked.await.expect("resolves");
    let entries = recorder.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].is_terminal());
    assert_eq!(entries[0].label, "late");

    let unmatched = recorder.unmatched_terminals();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].id, entries[0].id);
}

#[tokio::test(start_paused = true)]
async fn test_flush_does_not_move_origin() {
    let recorder = Recorder::new();
    let origin = recorder.origin_ms();
    recorder.sleep(20).await;
    recorder.flush();
    assert_eq!(recorder.origin_ms(), origin);
}

#[tokio::test(start_paused = true)]
async fn test_sleep_uses_formatted_default_label() {
    let recorder = Recorder::new();
    recorder.sleep(1_250).await;

    let entries = recorder.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].label, "Sleeping 00:00:01.250");
    assert_eq!(entries[1].success(), Some(true));
    let duration = entries[1].duration_ms().expect("terminal");
    assert!((1_250..=1_251).contains(&duration), "duration was {duration}");
}

#[tokio::test(start_paused = true)]
async fn test_sleep_with_label_and_callback() {
    let recorder = Recorder::new();
    recorder
        .sleep_with(10, Some("backoff".to_string()), |outcome| {
            Ok(json!({ "slept": outcome.is_ok() }))
        })
        .await;
    recorder.sleep_labeled(10, "cooldown").await;

    let entries = recorder.entries();
    assert_eq!(entries[0].label, "backoff");
    assert_eq!(entries[1].data, Some(json!({ "slept": true })));
    assert_eq!(entries[2].label, "cooldown");
}

#[tokio::test(start_paused = true)]
async fn test_operation_settles_without_being_awaited() {
    let recorder = Recorder::new();
    drop(recorder.track("background", after(25, Ok::<_, Refused>(()))));
    assert_eq!(recorder.len(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let entries = recorder.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].success(), Some(true));
    let duration = entries[1].duration_ms().expect("terminal");
    assert!((25..=26).contains(&duration), "duration was {duration}");
}

#[tokio::test(start_paused = true)]
async fn test_late_await_does_not_stretch_the_sleep() {
    let recorder = Recorder::new();
    let nap = recorder.sleep(100);
    tokio::time::sleep(Duration::from_millis(300)).await;
    nap.await;

    let entries = recorder.entries();
    assert_eq!(entries.len(), 2);
    let duration = entries[1].duration_ms().expect("terminal");
    assert!((100..=101).contains(&duration), "duration was {duration}");
}

#[tokio::test(start_paused = true)]
async fn test_awaiting_in_call_order_keeps_settlement_order() {
    let recorder = Recorder::new();
    let slow = recorder.track("A", after(50, Ok::<_, Refused>("a")));
    let fast = recorder.track("B", after(10, Ok::<_, Refused>("b")));
    assert_eq!(slow.await, Ok("a"));
    assert_eq!(fast.await, Ok("b"));

    let terminals: Vec<(String, u64)> = recorder
        .entries()
        .into_iter()
        .filter_map(|e| e.duration_ms().map(|d| (e.label.clone(), d)))
        .collect();
    assert_eq!(terminals.len(), 2);
    assert_eq!(terminals[0].0, "B");
    assert!((10..=11).contains(&terminals[0].1), "B took {}", terminals[0].1);
    assert_eq!(terminals[1].0, "A");
    assert!((50..=51).contains(&terminals[1].1), "A took {}", terminals[1].1);
}

#[tokio::test(start_paused = true)]
async fn test_join_handle_operand_is_timed_at_completion() {
    let recorder = Recorder::new();
    let task = tokio::spawn(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        7u32
    });
    let tracked = recorder.track("task", task);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(tracked.await.expect("task completes"), 7);

    let duration = recorder.entries()[1].duration_ms().expect("terminal");
    assert!((20..=21).contains(&duration), "duration was {duration}");
}

#[tokio::test(start_paused = true)]
async fn test_oneshot_operand_records_reply_and_closed_channel() {
    let recorder = Recorder::new();
    let (tx, rx) = oneshot::channel::<&'static str>();
    let (dropped_tx, dropped_rx) = oneshot::channel::<&'static str>();
    let reply = recorder.track("reply", rx);
    let never = recorder.track("never", dropped_rx);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(15)).await;
        let _ = tx.send("pong");
    });
    drop(dropped_tx);
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(reply.await.expect("reply"), "pong");
    assert!(never.await.is_err());

    let entries = recorder.entries();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[2].label, "never");
    assert_eq!(entries[2].error(), Some("RecvError: channel closed"));
    assert_eq!(entries[2].duration_ms(), Some(0));
    assert_eq!(entries[3].label, "reply");
    let duration = entries[3].duration_ms().expect("terminal");
    assert!((15..=16).contains(&duration), "duration was {duration}");
}

#[tokio::test]
async fn test_glyph_cycling_is_shared_across_recorders() {
    let cycler = BulletCycler::new(GlyphCatalog::new(["x", "y", "z"]).expect("catalog"));
    let config = RecorderConfig {
        cycler: cycler.clone(),
        ..RecorderConfig::default()
    };
    let first = Recorder::with_config(config.clone());
    let second = Recorder::with_config(config);

    let _ = first.track("1", async { Ok::<_, Refused>(()) }).await;
    let _ = second.track("2", async { Ok::<_, Refused>(()) }).await;
    let _ = first.track("3", async { Ok::<_, Refused>(()) }).await;
    let _ = second.track("4", async { Ok::<_, Refused>(()) }).await;

    let glyphs = |r: &Recorder| -> Vec<String> {
        r.entries().into_iter().filter(|e| e.is_pending()).map(|e| e.glyph).collect()
    };
    assert_eq!(glyphs(&first), vec!["x", "z"]);
    assert_eq!(glyphs(&second), vec!["y", "x"]);
    assert_eq!(cycler.position(), 4);
}

#[tokio::test]
async fn test_labels_and_plain_values_do_not_advance_the_cycler() {
    let (recorder, cycler) = recorder_with_glyphs(&["x", "y"]);
    recorder.mark("note");
    recorder.track_plain("plain", 1);
    assert_eq!(cycler.position(), 0);

    let _ = recorder.track("async", async { Ok::<_, Refused>(()) }).await;
    assert_eq!(cycler.position(), 1);
}
