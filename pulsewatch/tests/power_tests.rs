// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pulsewatch::power::{PowerManager, PowerState, PowerTiming};
use pulsewatch_core::{ActivityFlag, CancellationToken, ConnectivityGate};
use pulsewatch_runtime::TokioClock;
use pulsewatch_test_utils::FakeSleeper;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{advance, pause, sleep, Instant};

const WAKE_PIN: u8 = 0;

const TIMING: PowerTiming = PowerTiming {
    tick: Duration::from_secs(1),
    idle_timeout: Duration::from_millis(2000),
    link_wait: Duration::from_secs(30),
};

fn power_manager(
    sleeper: &FakeSleeper,
    activity: &Arc<ActivityFlag>,
    gate: &Arc<ConnectivityGate>,
    cancel_token: &CancellationToken,
) -> PowerManager<TokioClock, FakeSleeper> {
    PowerManager::new(
        TokioClock,
        sleeper.clone(),
        WAKE_PIN,
        activity.clone(),
        gate.clone(),
        TIMING,
        cancel_token.clone(),
    )
}

fn connected_gate() -> Arc<ConnectivityGate> {
    let gate = Arc::new(ConnectivityGate::new());
    gate.set();
    gate
}

#[tokio::test]
async fn test_check_requires_idle_strictly_beyond_timeout() -> anyhow::Result<()> {
    // Arrange
    pause();
    let activity = Arc::new(ActivityFlag::new());
    let mut manager = power_manager(
        &FakeSleeper::new(),
        &activity,
        &connected_gate(),
        &CancellationToken::new(),
    );

    // Act & Assert
    advance(Duration::from_millis(2000)).await;
    assert_eq!(manager.check(), PowerState::Active);

    advance(Duration::from_millis(1)).await;
    assert_eq!(manager.check(), PowerState::SleepPending);

    activity.mark();
    assert_eq!(manager.check(), PowerState::Active);
    assert_eq!(manager.idle_for(), Duration::ZERO);
    assert!(!activity.is_marked());
    Ok(())
}

#[tokio::test]
async fn test_sleeps_after_idle_timeout() -> anyhow::Result<()> {
    // Arrange
    pause();
    let sleeper = FakeSleeper::new();
    let activity = Arc::new(ActivityFlag::new());
    let start = Instant::now();
    let task = tokio::spawn(
        power_manager(&sleeper, &activity, &connected_gate(), &CancellationToken::new()).run(),
    );

    // Act
    sleep(Duration::from_millis(2500)).await;
    let asleep_early = sleeper.is_sleeping();
    sleep(Duration::from_millis(1000)).await;

    // Assert
    assert_eq!(sleeper.armed_pin(), Some(WAKE_PIN));
    assert!(!asleep_early);
    assert_eq!(sleeper.entered_at(), Some(start + Duration::from_secs(3)));
    assert!(!task.is_finished());
    task.abort();
    Ok(())
}

#[tokio::test]
async fn test_activity_resets_countdown() -> anyhow::Result<()> {
    // Arrange
    pause();
    let sleeper = FakeSleeper::new();
    let activity = Arc::new(ActivityFlag::new());
    let start = Instant::now();
    let task = tokio::spawn(
        power_manager(&sleeper, &activity, &connected_gate(), &CancellationToken::new()).run(),
    );

    // Act
    sleep(Duration::from_millis(1500)).await;
    activity.mark();
    sleep(Duration::from_millis(2000)).await;

    // Assert
    assert!(!sleeper.is_sleeping());

    sleep(Duration::from_millis(2000)).await;
    assert_eq!(sleeper.entered_at(), Some(start + Duration::from_secs(5)));
    task.abort();
    Ok(())
}

#[tokio::test]
async fn test_waits_for_first_association() -> anyhow::Result<()> {
    // Arrange
    pause();
    let sleeper = FakeSleeper::new();
    let activity = Arc::new(ActivityFlag::new());
    let gate = Arc::new(ConnectivityGate::new());
    let cancel_token = CancellationToken::new();
    let task = tokio::spawn(power_manager(&sleeper, &activity, &gate, &cancel_token).run());

    // Act
    sleep(Duration::from_secs(10)).await;
    let armed_before = sleeper.armed_pin();
    gate.set();
    sleep(Duration::from_millis(10)).await;

    // Assert
    assert_eq!(armed_before, None);
    assert_eq!(sleeper.armed_pin(), Some(WAKE_PIN));
    assert!(!sleeper.is_sleeping());

    cancel_token.cancel();
    task.await??;
    Ok(())
}

#[tokio::test]
async fn test_starts_anyway_after_link_wait() -> anyhow::Result<()> {
    // Arrange
    pause();
    let sleeper = FakeSleeper::new();
    let activity = Arc::new(ActivityFlag::new());
    let gate = Arc::new(ConnectivityGate::new());
    let start = Instant::now();
    let task = tokio::spawn(
        power_manager(&sleeper, &activity, &gate, &CancellationToken::new()).run(),
    );

    // Act
    sleep(Duration::from_secs(34)).await;

    // Assert
    assert_eq!(sleeper.armed_pin(), Some(WAKE_PIN));
    assert_eq!(sleeper.entered_at(), Some(start + Duration::from_secs(33)));
    task.abort();
    Ok(())
}

#[tokio::test]
async fn test_cancel_before_sleep_stops_cleanly() -> anyhow::Result<()> {
    pause();
    let sleeper = FakeSleeper::new();
    let cancel_token = CancellationToken::new();
    let task = tokio::spawn(
        power_manager(
            &sleeper,
            &Arc::new(ActivityFlag::new()),
            &connected_gate(),
            &cancel_token,
        )
        .run(),
    );
    sleep(Duration::from_millis(1500)).await;

    cancel_token.cancel();
    task.await??;

    assert!(!sleeper.is_sleeping());
    Ok(())
}
