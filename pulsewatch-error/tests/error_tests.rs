// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pulsewatch_error::{DeviceError, MonitorError, Result, ResultExt};
use std::error::Error;

#[test]
fn test_error_display() {
    let err = MonitorError::Sensor(DeviceError::new("max30100", "i2c nack"));
    assert_eq!(err.to_string(), "Sensor read failed: max30100: i2c nack");

    let err = MonitorError::http("http://h/x", DeviceError::new("http", "connection refused"));
    assert_eq!(
        err.to_string(),
        "HTTP request to http://h/x failed: http: connection refused"
    );

    let err = MonitorError::config("window size must be non-zero");
    assert_eq!(
        err.to_string(),
        "Invalid configuration: window size must be non-zero"
    );
}

#[test]
fn test_device_error_is_source() {
    let err = MonitorError::Display(DeviceError::new("lcd", "busy"));
    let source = err.source().expect("display error carries a source");
    assert_eq!(source.to_string(), "lcd: busy");
}

#[test]
fn test_sensor_failure_is_fatal() {
    let err = MonitorError::Sensor(DeviceError::new("max30100", "bus timeout"));
    assert!(err.is_fatal());
    assert!(!err.is_recoverable());
}

#[test]
fn test_network_and_display_failures_are_recoverable() {
    let http = MonitorError::http("http://h", DeviceError::new("http", "dns"));
    let link = MonitorError::Link(DeviceError::new("wifi", "auth rejected"));
    let display = MonitorError::Display(DeviceError::new("lcd", "nack"));

    for err in [http, link, display] {
        assert!(err.is_recoverable(), "{err} should be recoverable");
        assert!(!err.is_fatal(), "{err} should not be fatal");
    }
}

#[test]
fn test_channel_closed_is_neither_recoverable_nor_fatal() {
    let err = MonitorError::channel_closed("vitals");
    assert!(!err.is_recoverable());
    assert!(!err.is_fatal());
    assert_eq!(err.to_string(), "Channel closed: vitals");
}

#[test]
fn test_result_context_prefixes_config_errors() {
    let result: Result<()> = Err(MonitorError::config("missing [uplink] section"));

    let err = result.context("loading monitor.toml").unwrap_err();

    assert!(matches!(err, MonitorError::Config { .. }));
    assert_eq!(
        err.to_string(),
        "Invalid configuration: loading monitor.toml: missing [uplink] section"
    );
}

#[test]
fn test_result_context_preserves_device_errors() {
    let result: Result<()> = Err(MonitorError::Sensor(DeviceError::new("max30100", "nack")));

    let err = result.with_context(|| "reading".to_string()).unwrap_err();

    assert!(matches!(err, MonitorError::Sensor(_)));
    assert_eq!(err.to_string(), "Sensor read failed: max30100: nack");
}

#[test]
fn test_result_context_ok() {
    let result: Result<i32> = Ok(42);
    let value = result.context("operation failed").unwrap();
    assert_eq!(value, 42);
}
