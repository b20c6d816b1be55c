// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::sync::atomic::{AtomicBool, Ordering};

/// "User activity observed since the last check".
///
/// Set by the input watcher on every confirmed press, consumed by the power
/// manager, which resets its idle baseline when it finds the flag set.
#[derive(Debug, Default)]
pub struct ActivityFlag {
    observed: AtomicBool,
}

impl ActivityFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that activity happened.
    pub fn mark(&self) {
        self.observed.store(true, Ordering::Release);
    }

    /// Consume the flag, returning whether activity was observed.
    pub fn take(&self) -> bool {
        self.observed.swap(false, Ordering::AcqRel)
    }

    pub fn is_marked(&self) -> bool {
        self.observed.load(Ordering::Acquire)
    }
}
