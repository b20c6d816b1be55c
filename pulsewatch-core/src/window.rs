// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::sample::{RawSample, Vitals};
use pulsewatch_error::{MonitorError, Result};

/// Running sums over a fixed number of samples.
///
/// Each completed window yields one [`Vitals`] and starts the next window from
/// zero. Windows never overlap. Samples that never reached the aggregator
/// (dropped under back-pressure) simply do not count.
#[derive(Debug, Clone)]
pub struct VitalsWindow {
    size: usize,
    sum_heart_rate: f32,
    sum_oxygen_saturation: f32,
    count: usize,
}

impl VitalsWindow {
    /// # Errors
    /// Returns [`MonitorError::Config`] when `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(MonitorError::config("averaging window size must be non-zero"));
        }

        Ok(Self {
            size,
            sum_heart_rate: 0.0,
            sum_oxygen_saturation: 0.0,
            count: 0,
        })
    }

    /// Add a sample; returns the means once the window is full.
    pub fn push(&mut self, sample: &RawSample) -> Option<Vitals> {
        self.sum_heart_rate += sample.heart_rate;
        self.sum_oxygen_saturation += sample.oxygen_saturation;
        self.count += 1;

        if self.count < self.size {
            return None;
        }

        let count = self.count as f32;
        let vitals = Vitals::new(
            self.sum_heart_rate / count,
            self.sum_oxygen_saturation / count,
        );
        self.reset();
        Some(vitals)
    }

    /// Samples accumulated in the current, incomplete window.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn reset(&mut self) {
        self.sum_heart_rate = 0.0;
        self.sum_oxygen_saturation = 0.0;
        self.count = 0;
    }
}
