// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing-edge debounce over host-supplied time.
//!
//! The debouncer never reads a clock. Callers pass `now` to [`Debouncer::schedule`] and
//! [`Debouncer::poll`], and ask the host to call back at [`Debouncer::deadline`].
//!
//! ```
//! use core::time::Duration;
//! use understory_toc::debounce::Debouncer;
//!
//! let ms = Duration::from_millis;
//! let mut d = Debouncer::new();
//! d.schedule("a", ms(0), ms(100));
//! d.schedule("b", ms(50), ms(100)); // restarts the window
//! assert_eq!(d.poll(ms(120)), None);
//! assert_eq!(d.deadline(), Some(ms(150)));
//! assert_eq!(d.poll(ms(150)), Some("b"));
//! assert_eq!(d.poll(ms(300)), None);
//! ```

use core::time::Duration;

/// Holds at most one value until its quiet period has elapsed.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    pending: Option<(T, Duration)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Debouncer<T> {
    /// An idle debouncer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending value and restart the window at `now + delay`.
    pub fn schedule(&mut self, value: T, now: Duration, delay: Duration) {
        self.pending = Some((value, now.saturating_add(delay)));
    }

    /// Take the pending value if its deadline is at or before `now`.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match self.pending {
            Some((_, due)) if due <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    /// The pending value, without taking it.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    /// Returns true while a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
