// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::clock::Clock;
use crate::shared::SharedLock;

/// The clock and lock types one executor provides.
pub trait Platform: 'static {
    type Clock: Clock + Default;
    type Lock<T: Send + 'static>: SharedLock<T>;
}
