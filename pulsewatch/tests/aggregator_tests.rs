// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_channel::{Receiver, Sender};
use pulsewatch::aggregator::{Aggregator, AggregatorTiming};
use pulsewatch_core::{
    AlarmCell, AlarmState, BreachThresholds, CancellationToken, MonitorError, RawSample, Vitals,
    VitalsWindow,
};
use pulsewatch_runtime::TokioClock;
use pulsewatch_test_utils::fixtures::{hypoxic, resting, tachycardic};
use pulsewatch_test_utils::{
    assert_close, shared_bus, DisplayWrite, RecordingDisplay, ScriptedSensor,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{pause, sleep, timeout};

struct Harness {
    raw_tx: Sender<RawSample>,
    vitals_rx: Receiver<Vitals>,
    display: RecordingDisplay,
    alarm: Arc<AlarmCell>,
    cancel_token: CancellationToken,
    task: JoinHandle<pulsewatch_core::Result<()>>,
}

impl Harness {
    fn start(vitals_capacity: usize) -> Self {
        let (raw_tx, raw_rx) = async_channel::bounded(20);
        let (vitals_tx, vitals_rx) = async_channel::bounded(vitals_capacity);
        let display = RecordingDisplay::new();
        let alarm = Arc::new(AlarmCell::new());
        let cancel_token = CancellationToken::new();

        let aggregator = Aggregator::new(
            TokioClock,
            shared_bus(ScriptedSensor::new(), display.clone()),
            raw_rx,
            vitals_tx,
            VitalsWindow::new(10).unwrap(),
            BreachThresholds::default(),
            alarm.clone(),
            AggregatorTiming {
                receive_timeout: Duration::from_millis(500),
                send_timeout: Duration::from_secs(1),
            },
            cancel_token.clone(),
        );

        Self {
            raw_tx,
            vitals_rx,
            display,
            alarm,
            cancel_token,
            task: tokio::spawn(aggregator.run()),
        }
    }

    async fn feed(&self, sample: RawSample, count: usize) -> anyhow::Result<()> {
        for _ in 0..count {
            self.raw_tx.send(sample).await?;
        }
        sleep(Duration::from_millis(1)).await;
        Ok(())
    }

    async fn stop(self) -> anyhow::Result<()> {
        self.cancel_token.cancel();
        self.task.await??;
        Ok(())
    }
}

#[tokio::test]
async fn test_resting_window_emits_means_and_stays_normal() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(5);

    // Act
    harness.feed(resting(), 10).await?;

    // Assert
    let vitals = harness.vitals_rx.try_recv()?;
    assert_eq!(vitals, Vitals::new(70.0, 98.0));
    assert_eq!(harness.alarm.state(), AlarmState::Normal);
    assert_eq!(
        harness.display.writes(),
        vec![
            DisplayWrite {
                row: 0,
                col: 4,
                text: "70.00".to_string()
            },
            DisplayWrite {
                row: 1,
                col: 5,
                text: "98.00".to_string()
            },
        ]
    );

    harness.stop().await
}

#[tokio::test]
async fn test_nine_samples_emit_nothing() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(5);

    // Act
    harness.feed(resting(), 9).await?;
    sleep(Duration::from_secs(2)).await;

    // Assert
    assert!(harness.vitals_rx.is_empty());
    assert!(harness.display.writes().is_empty());

    // Act
    harness.feed(resting(), 1).await?;

    // Assert
    assert_eq!(harness.vitals_rx.len(), 1);
    harness.stop().await
}

#[tokio::test]
async fn test_mean_of_mixed_window() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(5);
    let heart_rates = [60.0, 62.5, 65.0, 70.0, 71.25, 80.0, 82.0, 90.5, 95.0, 99.75];

    // Act
    for (i, hr) in heart_rates.iter().enumerate() {
        harness
            .feed(RawSample::beat(*hr, 90.0 + i as f32), 1)
            .await?;
    }

    // Assert
    let vitals = harness.vitals_rx.try_recv()?;
    assert_close(vitals.mean_heart_rate, heart_rates.iter().sum::<f32>() / 10.0);
    assert_close(vitals.mean_oxygen_saturation, 94.5);
    assert_eq!(harness.alarm.state(), AlarmState::Normal);
    harness.stop().await
}

#[tokio::test]
async fn test_breach_latches_until_acknowledged() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(5);

    // Act & Assert
    harness.feed(tachycardic(), 10).await?;
    assert_eq!(harness.alarm.state(), AlarmState::Emergency);
    assert_eq!(harness.vitals_rx.try_recv()?.mean_heart_rate, 110.0);

    harness.feed(resting(), 10).await?;
    assert_eq!(harness.alarm.state(), AlarmState::Emergency);

    sleep(Duration::from_secs(2)).await;
    assert_eq!(harness.alarm.state(), AlarmState::Emergency);

    harness.stop().await
}

#[tokio::test]
async fn test_acknowledged_alarm_clears_on_next_evaluation_pass() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(5);
    harness.feed(hypoxic(), 10).await?;
    assert_eq!(harness.alarm.state(), AlarmState::Emergency);

    // Act
    assert!(harness.alarm.acknowledge());

    // Assert
    assert_eq!(harness.alarm.state(), AlarmState::Emergency);

    sleep(Duration::from_millis(501)).await;
    assert_eq!(harness.alarm.state(), AlarmState::Normal);

    harness.stop().await
}

#[tokio::test]
async fn test_breach_after_acknowledgement_relatches() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(5);
    harness.feed(tachycardic(), 10).await?;
    harness.alarm.acknowledge();

    // Act
    harness.feed(tachycardic(), 10).await?;
    sleep(Duration::from_secs(1)).await;

    // Assert
    assert_eq!(harness.alarm.state(), AlarmState::Emergency);
    assert!(harness.alarm.is_unacknowledged());
    harness.stop().await
}

#[tokio::test]
async fn test_display_failure_does_not_stop_pipeline() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(5);
    harness.display.fail(true);

    // Act
    harness.feed(resting(), 10).await?;

    // Assert
    assert_eq!(harness.vitals_rx.try_recv()?, Vitals::new(70.0, 98.0));
    assert!(harness.display.writes().is_empty());
    assert!(!harness.task.is_finished());
    harness.stop().await
}

#[tokio::test]
async fn test_full_vitals_queue_drops_window_but_still_evaluates() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(1);
    harness.feed(resting(), 10).await?;

    // Act
    harness.feed(tachycardic(), 10).await?;
    sleep(Duration::from_millis(1100)).await;

    // Assert
    assert_eq!(harness.vitals_rx.len(), 1);
    assert_eq!(harness.vitals_rx.try_recv()?, Vitals::new(70.0, 98.0));
    assert_eq!(harness.alarm.state(), AlarmState::Emergency);
    harness.stop().await
}

#[tokio::test]
async fn test_closed_raw_channel_is_reported() -> anyhow::Result<()> {
    // Arrange
    pause();
    let harness = Harness::start(5);

    // Act
    drop(harness.raw_tx);

    // Assert
    let result = timeout(Duration::from_secs(1), harness.task).await??;
    assert!(matches!(result, Err(MonitorError::ChannelClosed { .. })));
    Ok(())
}
