// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors captured by the engine.
//!
//! None of these escape an operation of the [controller](crate::controller::TocController):
//! they are logged, stored as the controller's `error`, and forwarded to the
//! configured error handler.

use alloc::string::String;

/// A recoverable fault while scanning, observing or navigating.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TocError {
    /// No element has the configured container id.
    #[error("Container with id \"{container_id}\" not found.")]
    ContainerNotFound {
        /// The id that was looked up.
        container_id: String,
    },
    /// The host rejected the heading selector expression.
    #[error("invalid heading selector \"{selectors}\": {message}")]
    InvalidSelector {
        /// The selector expression as configured.
        selectors: String,
        /// Parser message from the host.
        message: String,
    },
    /// The host could not start the visibility subscription (for example a bad root margin).
    #[error("cannot observe headings: {message}")]
    Observer {
        /// Host message.
        message: String,
    },
    /// Any other host failure during a scan.
    #[error("unexpected error while scanning headings: {message}")]
    Unexpected {
        /// Host message.
        message: String,
    },
}

impl TocError {
    /// Returns true for a missing container, which is reported as a warning rather than an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ContainerNotFound { .. })
    }
}
