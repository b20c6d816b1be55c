// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::signal::Signal;

/// "Network associated" level signal.
///
/// Unlike [`CancellationToken`](crate::CancellationToken) the gate can be
/// cleared again: the connectivity supervisor sets it on association and
/// clears it on loss. [`ConnectivityGate::wait`] only resolves while the gate
/// is set; a waiter that arrives after a loss blocks until the next
/// association.
#[derive(Debug, Default)]
pub struct ConnectivityGate {
    signal: Signal,
}

impl ConnectivityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.signal.raise();
    }

    pub fn clear(&self) {
        self.signal.lower();
    }

    pub fn is_set(&self) -> bool {
        self.signal.is_raised()
    }

    /// Wait until the gate is set.
    pub async fn wait(&self) {
        self.signal.raised().await;
    }
}
