// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pulsewatch_core::{AlarmCell, AlarmState, BreachThresholds, RawSample, Vitals, VitalsWindow};

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_window_mean_matches_arithmetic_mean_of_each_window() {
    // Arrange
    let heart_rates = [
        61.5, 64.0, 70.25, 58.0, 90.0, 88.5, 72.0, 66.75, 80.0, 75.0, // window 1
        101.0, 99.5, 97.0, 102.25, 110.0, 95.5, 98.0, 100.0, 104.0, 96.75, // window 2
    ];
    let spo2 = [
        97.0, 98.0, 96.5, 99.0, 95.0, 97.25, 98.5, 96.0, 97.0, 99.0, //
        91.0, 89.5, 90.0, 92.25, 88.0, 93.0, 91.5, 90.5, 89.0, 92.0,
    ];
    let mut window = VitalsWindow::new(10).unwrap();

    // Act
    let emitted: Vec<Vitals> = heart_rates
        .iter()
        .zip(spo2.iter())
        .filter_map(|(hr, ox)| window.push(&RawSample::beat(*hr, *ox)))
        .collect();

    // Assert
    assert_eq!(emitted.len(), 2);
    for (index, vitals) in emitted.iter().enumerate() {
        let range = index * 10..index * 10 + 10;
        let expected_hr: f32 = heart_rates[range.clone()].iter().sum::<f32>() / 10.0;
        let expected_ox: f32 = spo2[range].iter().sum::<f32>() / 10.0;
        assert_close(vitals.mean_heart_rate, expected_hr);
        assert_close(vitals.mean_oxygen_saturation, expected_ox);
    }
    assert!(window.is_empty());
}

#[test]
fn test_resting_window_is_normal() {
    // Arrange
    let mut window = VitalsWindow::new(10).unwrap();
    let cell = AlarmCell::new();
    let thresholds = BreachThresholds::default();

    // Act
    let vitals = (0..10)
        .filter_map(|_| window.push(&RawSample::beat(70.0, 98.0)))
        .last()
        .unwrap();
    let state = cell.evaluate(thresholds.is_breach(&vitals));

    // Assert
    assert_eq!(vitals, Vitals::new(70.0, 98.0));
    assert_eq!(state, AlarmState::Normal);
}

#[test]
fn test_tachycardic_window_latches_emergency_over_next_normal_window() {
    // Arrange
    let mut window = VitalsWindow::new(10).unwrap();
    let cell = AlarmCell::new();
    let thresholds = BreachThresholds::default();

    // Act & Assert
    let high = (0..10)
        .filter_map(|_| window.push(&RawSample::beat(110.0, 97.0)))
        .last()
        .unwrap();
    assert_eq!(high.mean_heart_rate, 110.0);
    assert_eq!(cell.evaluate(thresholds.is_breach(&high)), AlarmState::Emergency);

    let normal = (0..10)
        .filter_map(|_| window.push(&RawSample::beat(70.0, 98.0)))
        .last()
        .unwrap();
    assert_eq!(cell.evaluate(thresholds.is_breach(&normal)), AlarmState::Emergency);
    assert!(cell.is_unacknowledged());
}

#[test]
fn test_custom_thresholds() {
    let thresholds = BreachThresholds {
        heart_rate_high: 120.0,
        heart_rate_low: 40.0,
        spo2_low: 85.0,
    };

    assert!(!thresholds.is_breach(&Vitals::new(110.0, 88.0)));
    assert!(thresholds.is_breach(&Vitals::new(121.0, 95.0)));
    assert!(thresholds.is_breach(&Vitals::new(80.0, 84.0)));
}
