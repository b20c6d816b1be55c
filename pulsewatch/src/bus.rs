// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::devices::{CharacterDisplay, SampleSource};
use pulsewatch_core::{DeviceError, RawSample, Vitals};

/// Devices on the shared sensor bus.
///
/// The sensor and the display sit on the same bus, so both are only reached
/// through one mutex (`R::Mutex<SensorBus>`). Every method is a synchronous
/// bus transaction; callers lock, call and release without awaiting.
pub struct SensorBus {
    sensor: Box<dyn SampleSource>,
    display: Box<dyn CharacterDisplay>,
}

impl SensorBus {
    pub fn new(sensor: impl SampleSource, display: impl CharacterDisplay) -> Self {
        Self {
            sensor: Box::new(sensor),
            display: Box::new(display),
        }
    }

    pub fn read(&mut self) -> Result<RawSample, DeviceError> {
        self.sensor.read()
    }

    /// Clear the display and draw the static labels.
    pub fn draw_labels(&mut self) -> Result<(), DeviceError> {
        self.display.clear()?;
        self.display.write_at(0, 0, "BPM:")?;
        self.display.write_at(1, 0, "SPO2:     %")
    }

    /// Write the window means next to their labels.
    pub fn show_vitals(&mut self, vitals: &Vitals) -> Result<(), DeviceError> {
        self.display
            .write_at(0, 4, &format!("{:.2}", vitals.mean_heart_rate))?;
        self.display
            .write_at(1, 5, &format!("{:.2}", vitals.mean_oxygen_saturation))
    }
}
