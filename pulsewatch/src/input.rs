// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Button handling.
//!
//! The interrupt side ([`ButtonInterrupt`]) only hands the pin number to a
//! single-slot channel and never blocks. Edges that arrive while the slot is
//! occupied are coalesced into the pending one. The task side
//! ([`InputWatcher`]) confirms the press by checking that the pin still reads
//! low, then acknowledges the alarm and records user activity.

use crate::devices::InputPin;
use async_channel::{Receiver, Sender};
use core::time::Duration;
use pulsewatch_core::{ActivityFlag, AlarmCell, CancellationToken, MonitorError, Result};
use pulsewatch_runtime::{timeout, Clock};
use std::sync::Arc;
use tokio::select;

/// Create the single-slot hand-off between the interrupt and the watcher.
pub fn button_channel() -> (ButtonInterrupt, Receiver<u8>) {
    let (tx, rx) = async_channel::bounded(1);
    (ButtonInterrupt { tx }, rx)
}

/// Interrupt-context handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ButtonInterrupt {
    tx: Sender<u8>,
}

impl ButtonInterrupt {
    /// Falling-edge handler. Returns whether the edge was queued.
    pub fn on_falling_edge(&self, pin: u8) -> bool {
        self.tx.try_send(pin).is_ok()
    }
}

/// Consumes button notifications.
pub struct InputWatcher<C, P> {
    clock: C,
    pin: P,
    pin_number: u8,
    rx: Receiver<u8>,
    alarm: Arc<AlarmCell>,
    activity: Arc<ActivityFlag>,
    poll_timeout: Duration,
    cancel_token: CancellationToken,
}

impl<C, P> InputWatcher<C, P>
where
    C: Clock,
    P: InputPin,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: C,
        pin: P,
        pin_number: u8,
        rx: Receiver<u8>,
        alarm: Arc<AlarmCell>,
        activity: Arc<ActivityFlag>,
        poll_timeout: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            clock,
            pin,
            pin_number,
            rx,
            alarm,
            activity,
            poll_timeout,
            cancel_token,
        }
    }

    pub async fn run(self) -> Result<()> {
        crate::info!("Input watcher started");
        let cancel_token = self.cancel_token.clone();

        loop {
            select! {
                _ = cancel_token.cancelled() => {
                    break;
                }
                result = self.poll() => {
                    result?;
                }
            }
        }

        crate::info!("Input watcher stopped");
        Ok(())
    }

    async fn poll(&self) -> Result<()> {
        match timeout(&self.clock, self.poll_timeout, self.rx.recv()).await {
            Ok(Ok(pin)) => {
                self.handle(pin);
                Ok(())
            }
            Ok(Err(_)) => Err(MonitorError::channel_closed("button")),
            Err(_) => Ok(()),
        }
    }

    fn handle(&self, pin: u8) {
        if pin != self.pin_number {
            crate::debug!("Ignoring edge on pin {}", pin);
            return;
        }
        if !self.pin.is_low() {
            crate::debug!("Pin {} released before confirmation", pin);
            return;
        }

        let was_pending = self.alarm.acknowledge();
        self.activity.mark();
        crate::info!(
            "Button pressed on pin {}{}",
            pin,
            if was_pending { ", alarm acknowledged" } else { "" }
        );
    }
}
