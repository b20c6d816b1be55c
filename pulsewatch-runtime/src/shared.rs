// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// A value owned jointly by several activities.
///
/// Access is only possible inside [`SharedLock::with`]. The closure is
/// synchronous, so the lock is always released before the caller reaches its
/// next `.await`.
pub trait SharedLock<T>: Clone + Send + Sync + 'static {
    fn new(value: T) -> Self;

    /// Run `f` with exclusive access to the value.
    fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R;
}
