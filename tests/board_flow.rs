//! End-to-end board flow against in-process adapters: polling, countdown
//! expiry, alert fan-out, and finishing an order.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use kitchen_display::adapters::audio::{BroadcastAudioOutput, PlaybackCommand};
use kitchen_display::adapters::clock::ManualClock;
use kitchen_display::adapters::storage::{FileSettingsStore, FileTimerStore, LocalSoundStorage};
use kitchen_display::application::handlers::{FinishOrderHandler, RefreshBoardHandler};
use kitchen_display::domain::alert::{AlertDispatcher, SoundSettings};
use kitchen_display::domain::countdown::CountdownEngine;
use kitchen_display::domain::foundation::{CommandMetadata, OrderNumber};
use kitchen_display::domain::order::RawOrderRow;
use kitchen_display::ports::{
    Clock, OrderCommandError, OrderCommands, OrderSource, OrderSourceError, TimerStore,
};

struct ScriptedOrderSource {
    rows: Mutex<Vec<RawOrderRow>>,
}

impl ScriptedOrderSource {
    fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    fn set_rows(&self, rows: Vec<RawOrderRow>) {
        *self.rows.lock().unwrap() = rows;
    }
}

#[async_trait]
impl OrderSource for ScriptedOrderSource {
    async fn fetch_active_lines(
        &self,
        _categories: &[i64],
    ) -> Result<Vec<RawOrderRow>, OrderSourceError> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

struct AcceptingCommands;

#[async_trait]
impl OrderCommands for AcceptingCommands {
    async fn finish_order(&self, _: OrderNumber, _: &str) -> Result<(), OrderCommandError> {
        Ok(())
    }
}

fn row(order: i64, item: &str, minutes: f64, at: chrono::DateTime<Utc>) -> RawOrderRow {
    RawOrderRow {
        order_number: Some(order),
        item_code: Some(item.to_string()),
        item_name: Some(item.to_string()),
        quantity: Some(1.0),
        order_time: Some(at),
        time_to_finish_minutes: Some(minutes),
        item_type: Some("I".to_string()),
        ..Default::default()
    }
}

struct Fixture {
    source: Arc<ScriptedOrderSource>,
    board: Arc<RefreshBoardHandler>,
    finish: Arc<FinishOrderHandler>,
    clock: Arc<ManualClock>,
    timers: Arc<FileTimerStore>,
    output: Arc<BroadcastAudioOutput>,
    _state_dir: tempfile::TempDir,
    _sound_dir: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let state_dir = tempfile::tempdir().unwrap();
    let sound_dir = tempfile::tempdir().unwrap();

    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
    ));
    let timers = Arc::new(FileTimerStore::new(state_dir.path()).unwrap());
    let engine = Arc::new(CountdownEngine::new(timers.clone(), clock.clone()));
    let output = Arc::new(BroadcastAudioOutput::new(32));
    let storage = Arc::new(LocalSoundStorage::new(sound_dir.path(), 5 * 1024 * 1024));
    let alerts = Arc::new(AlertDispatcher::new(
        output.clone(),
        storage,
        clock.clone(),
        Duration::from_secs(10),
        SoundSettings::default(),
    ));
    let source = Arc::new(ScriptedOrderSource::new());
    let board = Arc::new(RefreshBoardHandler::new(
        source.clone(),
        Arc::new(FileSettingsStore::new(state_dir.path())),
        engine,
        alerts,
        clock.clone(),
    ));
    let finish = Arc::new(FinishOrderHandler::new(
        Arc::new(AcceptingCommands),
        board.clone(),
        Arc::new(Notify::new()),
    ));

    Fixture {
        source,
        board,
        finish,
        clock,
        timers,
        output,
        _state_dir: state_dir,
        _sound_dir: sound_dir,
    }
}

fn drain(receiver: &mut tokio::sync::broadcast::Receiver<PlaybackCommand>) -> Vec<PlaybackCommand> {
    let mut commands = Vec::new();
    while let Ok(command) = receiver.try_recv() {
        commands.push(command);
    }
    commands
}

#[tokio::test]
async fn poll_cycle_diffs_orders_and_alerts_once_per_batch() {
    let fx = fixture();
    let mut commands = fx.output.subscribe();
    let noon = fx.clock.now();

    fx.source.set_rows(vec![
        row(101, "burger", 10.0, noon),
        row(102, "pizza", 15.0, noon),
    ]);
    let snapshot = fx.board.execute().await.unwrap();
    assert_eq!(snapshot.orders.len(), 2);
    assert!(drain(&mut commands).is_empty(), "first poll must be silent");

    // 101 finished elsewhere, 103 and 104 arrive.
    fx.source.set_rows(vec![
        row(102, "pizza", 15.0, noon),
        row(103, "salad", 5.0, noon),
        row(104, "soup", 5.0, noon),
    ]);
    let snapshot = fx.board.execute().await.unwrap();
    assert_eq!(snapshot.orders.len(), 3);

    let played = drain(&mut commands);
    assert_eq!(played.len(), 1, "two arrivals batch into one alert");
    assert!(matches!(&played[0], PlaybackCommand::Play(r) if !r.looping));

    // The removed order's persisted timer state is gone.
    assert!(fx.timers.load(OrderNumber::new(101)).unwrap().is_none());
    assert!(fx.timers.load(OrderNumber::new(102)).unwrap().is_some());
}

#[tokio::test]
async fn countdown_expires_and_loops_until_the_order_is_finished() {
    let fx = fixture();
    let mut commands = fx.output.subscribe();
    let noon = fx.clock.now();

    fx.source.set_rows(vec![row(101, "burger", 5.0, noon)]);
    fx.board.execute().await.unwrap();
    drain(&mut commands);

    fx.clock.advance(chrono::Duration::minutes(6));
    fx.board.tick().await.unwrap();

    let played = drain(&mut commands);
    assert!(
        played
            .iter()
            .any(|c| matches!(c, PlaybackCommand::Play(r) if r.looping)),
        "overdue order starts the looping alarm"
    );

    let snapshot = fx.board.execute().await.unwrap();
    let countdown = snapshot.orders[0].countdown.as_ref().unwrap();
    assert!(countdown.expired);
    assert_eq!(countdown.display, "00:00");

    // Finishing the order stops the alarm and clears its state.
    fx.finish
        .execute(
            OrderNumber::new(101),
            CommandMetadata::new("chef-1").with_source("test"),
        )
        .await
        .unwrap();

    let commands_after_finish = drain(&mut commands);
    assert!(commands_after_finish.contains(&PlaybackCommand::Stop));
    assert!(fx.timers.load(OrderNumber::new(101)).unwrap().is_none());
}

#[tokio::test]
async fn countdown_state_survives_a_restart() {
    let state_dir = tempfile::tempdir().unwrap();
    let noon = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    let deadline = {
        let timers = Arc::new(FileTimerStore::new(state_dir.path()).unwrap());
        let clock = Arc::new(ManualClock::new(noon));
        let engine = CountdownEngine::new(timers.clone(), clock);
        engine
            .evaluate(&kitchen_display::domain::countdown::CountdownInputs {
                order: OrderNumber::new(101),
                order_time: Some(noon),
                time_to_finish_minutes: 10,
            })
            .unwrap()
            .unwrap();
        timers
            .load(OrderNumber::new(101))
            .unwrap()
            .unwrap()
            .deadline_ms
            .unwrap()
    };

    // New store and engine over the same directory, two minutes later.
    let timers = Arc::new(FileTimerStore::new(state_dir.path()).unwrap());
    let clock = Arc::new(ManualClock::new(noon + chrono::Duration::minutes(2)));
    let engine = CountdownEngine::new(timers.clone(), clock);
    let outcome = engine
        .evaluate(&kitchen_display::domain::countdown::CountdownInputs {
            order: OrderNumber::new(101),
            order_time: Some(noon),
            time_to_finish_minutes: 10,
        })
        .unwrap()
        .unwrap();

    assert_eq!(
        timers
            .load(OrderNumber::new(101))
            .unwrap()
            .unwrap()
            .deadline_ms
            .unwrap(),
        deadline,
        "restart must not recompute the deadline"
    );
    assert_eq!(outcome.status.remaining_seconds, 480);
}
