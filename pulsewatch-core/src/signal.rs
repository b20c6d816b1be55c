// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::sync::atomic::{AtomicBool, Ordering};
use event_listener::Event;

/// Level-triggered flag with async waiters.
///
/// Raising wakes every waiter. Lowering wakes nobody; waiters that arrive
/// while the flag is down park until the next raise.
#[derive(Debug, Default)]
pub(crate) struct Signal {
    raised: AtomicBool,
    event: Event,
}

impl Signal {
    pub(crate) fn raise(&self) {
        self.raised.store(true, Ordering::Release);
        self.event.notify(usize::MAX);
    }

    pub(crate) fn lower(&self) {
        self.raised.store(false, Ordering::Release);
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    pub(crate) async fn raised(&self) {
        while !self.is_raised() {
            let listener = self.event.listen();

            // raise() may have run between the check and listen()
            if self.is_raised() {
                return;
            }

            listener.await;
        }
    }
}
