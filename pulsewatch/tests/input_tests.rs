// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pulsewatch::input::{button_channel, ButtonInterrupt, InputWatcher};
use pulsewatch_core::{ActivityFlag, AlarmCell, AlarmState, CancellationToken, MonitorError};
use pulsewatch_runtime::TokioClock;
use pulsewatch_test_utils::FakePin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{pause, sleep, timeout};

const BUTTON_PIN: u8 = 0;

struct Harness {
    interrupt: ButtonInterrupt,
    pin: FakePin,
    alarm: Arc<AlarmCell>,
    activity: Arc<ActivityFlag>,
    cancel_token: CancellationToken,
    task: JoinHandle<pulsewatch_core::Result<()>>,
}

impl Harness {
    fn start() -> Self {
        let (interrupt, rx) = button_channel();
        let pin = FakePin::new();
        let alarm = Arc::new(AlarmCell::new());
        let activity = Arc::new(ActivityFlag::new());
        let cancel_token = CancellationToken::new();
        let watcher = InputWatcher::new(
            TokioClock,
            pin.clone(),
            BUTTON_PIN,
            rx,
            alarm.clone(),
            activity.clone(),
            Duration::from_millis(50),
            cancel_token.clone(),
        );

        Self {
            interrupt,
            pin,
            alarm,
            activity,
            cancel_token,
            task: tokio::spawn(watcher.run()),
        }
    }

    async fn stop(self) -> anyhow::Result<()> {
        self.cancel_token.cancel();
        self.task.await??;
        Ok(())
    }
}

#[tokio::test]
async fn test_confirmed_press_acknowledges_and_records_activity() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start();
    harness.alarm.evaluate(true);

    // Act
    harness.pin.set_low(true);
    assert!(harness.interrupt.on_falling_edge(BUTTON_PIN));
    sleep(Duration::from_millis(10)).await;

    // Assert
    assert!(!harness.alarm.is_unacknowledged());
    assert_eq!(harness.alarm.state(), AlarmState::Emergency);
    assert!(harness.activity.is_marked());
    harness.stop().await
}

#[tokio::test]
async fn test_press_without_alarm_still_records_activity() -> anyhow::Result<()> {
    pause();
    let harness = Harness::start();

    harness.pin.set_low(true);
    harness.interrupt.on_falling_edge(BUTTON_PIN);
    sleep(Duration::from_millis(10)).await;

    assert!(harness.activity.is_marked());
    harness.stop().await
}

#[tokio::test]
async fn test_released_pin_is_ignored() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start();
    harness.alarm.evaluate(true);

    // Act
    harness.pin.set_low(false);
    harness.interrupt.on_falling_edge(BUTTON_PIN);
    sleep(Duration::from_millis(100)).await;

    // Assert
    assert!(harness.alarm.is_unacknowledged());
    assert!(!harness.activity.is_marked());
    harness.stop().await
}

#[tokio::test]
async fn test_other_pin_is_ignored() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start();
    harness.alarm.evaluate(true);

    // Act
    harness.pin.set_low(true);
    harness.interrupt.on_falling_edge(BUTTON_PIN + 4);
    sleep(Duration::from_millis(100)).await;

    // Assert
    assert!(harness.alarm.is_unacknowledged());
    assert!(!harness.activity.is_marked());
    harness.stop().await
}

#[test]
fn test_interrupt_coalesces_edges_into_single_slot() {
    let (interrupt, rx) = button_channel();

    assert!(interrupt.on_falling_edge(BUTTON_PIN));
    assert!(!interrupt.on_falling_edge(BUTTON_PIN));
    assert!(!interrupt.on_falling_edge(BUTTON_PIN));

    assert_eq!(rx.len(), 1);
    assert_eq!(rx.try_recv(), Ok(BUTTON_PIN));
    assert!(interrupt.on_falling_edge(BUTTON_PIN));
}

#[tokio::test]
async fn test_dropped_interrupt_side_is_reported() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start();

    // Act
    drop(harness.interrupt);

    // Assert
    let result = timeout(Duration::from_secs(1), harness.task).await??;
    assert!(matches!(result, Err(MonitorError::ChannelClosed { .. })));
    Ok(())
}
