// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Host-side shutdown signal.
//!
//! On the device nothing ever cancels the activities. The host simulation and
//! the tests still need to stop them deterministically, so every activity
//! except the terminal sleep path races its suspension points against
//! [`CancellationToken::cancelled`].

use crate::signal::Signal;
use std::sync::Arc;

/// Cloneable handle to one shared, one-way shutdown flag.
///
/// # Example
///
/// ```
/// use pulsewatch_core::CancellationToken;
///
/// let token = CancellationToken::new();
/// let clone = token.clone();
/// assert!(!clone.is_cancelled());
///
/// token.cancel();
/// assert!(clone.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    signal: Arc<Signal>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent. There is no way back.
    pub fn cancel(&self) {
        self.signal.raise();
    }

    pub fn is_cancelled(&self) -> bool {
        self.signal.is_raised()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone.
    pub async fn cancelled(&self) {
        self.signal.raised().await;
    }
}
