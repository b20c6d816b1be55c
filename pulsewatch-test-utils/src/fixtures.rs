// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use pulsewatch::config::MonitorConfig;
use pulsewatch_core::RawSample;

pub fn resting() -> RawSample {
    RawSample::beat(70.0, 98.0)
}

pub fn tachycardic() -> RawSample {
    RawSample::beat(110.0, 97.0)
}

pub fn bradycardic() -> RawSample {
    RawSample::beat(42.0, 97.0)
}

pub fn hypoxic() -> RawSample {
    RawSample::beat(75.0, 86.0)
}

/// A reading taken between beats.
pub fn no_pulse() -> RawSample {
    RawSample::new(0.0, 0.0, false)
}

/// Reference configuration with a device token and a short link wait, so
/// power management starts promptly in tests that never associate.
pub fn test_config() -> MonitorConfig {
    let mut config = MonitorConfig::default();
    config.uplink.server_base = "http://h".to_string();
    config.uplink.device_token = "T".to_string();
    config.timing.link_wait_ms = 100;
    config
}
