// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::{self, Display};

/// One reading from the pulse oximeter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Beats per minute
    pub heart_rate: f32,
    /// Oxygen saturation, percent
    pub oxygen_saturation: f32,
    /// Whether the sensor detected a beat during this cycle
    pub pulse_detected: bool,
}

impl RawSample {
    pub fn new(heart_rate: f32, oxygen_saturation: f32, pulse_detected: bool) -> Self {
        Self {
            heart_rate,
            oxygen_saturation,
            pulse_detected,
        }
    }

    /// A reading taken during a detected beat.
    pub fn beat(heart_rate: f32, oxygen_saturation: f32) -> Self {
        Self::new(heart_rate, oxygen_saturation, true)
    }
}

/// Mean heart rate and oxygen saturation over one completed window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub mean_heart_rate: f32,
    pub mean_oxygen_saturation: f32,
}

impl Vitals {
    pub fn new(mean_heart_rate: f32, mean_oxygen_saturation: f32) -> Self {
        Self {
            mean_heart_rate,
            mean_oxygen_saturation,
        }
    }
}

impl Display for Vitals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BPM: {:.2} | SpO2: {:.2}%",
            self.mean_heart_rate, self.mean_oxygen_saturation
        )
    }
}
