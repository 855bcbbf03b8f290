// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Controller configuration.
//!
//! ```
//! use core::time::Duration;
//! use understory_toc::options::{IdGenerator, TocOptions};
//!
//! let options = TocOptions {
//!     container_id: "article".into(),
//!     selectors: "h2, h3".into(),
//!     debounce_delay: Duration::from_millis(50),
//!     id_generator: IdGenerator::new(|text, level, _| format!("h{level}-{}", text.len())),
//!     ..Default::default()
//! };
//! assert!(options.rescan_needed(&TocOptions::default()));
//! ```

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use crate::error::TocError;
use crate::slug::default_id_generator;

/// Default container id.
pub const DEFAULT_CONTAINER_ID: &str = "markdown-content";
/// Default heading selector.
pub const DEFAULT_SELECTORS: &str = "h1, h2, h3, h4, h5, h6";
/// Default root margin: only the top fifth of the viewport counts as "reading position".
pub const DEFAULT_ROOT_MARGIN: &str = "0px 0px -80% 0px";
/// Default visibility threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.1;
/// Default debounce delay for intersection-derived updates.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(100);

type GeneratorFn = dyn Fn(&str, u8, usize) -> String;

/// Generates an id from `(text, level, index)` for headings without one.
///
/// Two generators are the same when both are the default or both wrap the same closure
/// allocation; a different generator triggers a rescan.
#[derive(Clone, Default)]
pub struct IdGenerator(Option<Rc<GeneratorFn>>);

impl IdGenerator {
    /// Wrap a custom generator.
    pub fn new(f: impl Fn(&str, u8, usize) -> String + 'static) -> Self {
        Self(Some(Rc::new(f)))
    }

    /// Run the generator.
    pub fn generate(&self, text: &str, level: u8, index: usize) -> String {
        match &self.0 {
            Some(f) => f(text, level, index),
            None => default_id_generator(text, level, index),
        }
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl core::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(_) => f.write_str("IdGenerator(custom)"),
            None => f.write_str("IdGenerator(default)"),
        }
    }
}

type HandlerFn = dyn Fn(&TocError, &str);

/// Callback receiving every captured error and the context it happened in
/// (`"scan"`, `"observe"`).
#[derive(Clone)]
pub struct ErrorHandler(Rc<HandlerFn>);

impl ErrorHandler {
    /// Wrap a callback.
    pub fn new(f: impl Fn(&TocError, &str) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    pub fn call(&self, error: &TocError, context: &str) {
        (self.0)(error, context);
    }
}

impl core::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ErrorHandler")
    }
}

/// One visibility ratio or an ordered set of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds(Vec<f64>);

impl Thresholds {
    /// The ratios.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(DEFAULT_THRESHOLD)
    }
}

impl From<f64> for Thresholds {
    fn from(value: f64) -> Self {
        Self(alloc::vec![value])
    }
}

impl From<Vec<f64>> for Thresholds {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Thresholds {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Thresholds {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

/// Configuration of a [`TocController`](crate::controller::TocController).
#[derive(Clone, Debug)]
pub struct TocOptions {
    /// Id of the element containing the document.
    pub container_id: String,
    /// Selector list matching heading elements.
    pub selectors: String,
    /// Viewport margin for visibility observation.
    pub root_margin: String,
    /// Visibility ratios that trigger observation reports.
    pub threshold: Thresholds,
    /// Quiet period before an intersection-derived active heading is published.
    pub debounce_delay: Duration,
    /// Assign ids to headings that have none.
    pub generate_ids: bool,
    /// Id generator used when `generate_ids` is on.
    pub id_generator: IdGenerator,
    /// Store captured errors in the controller's `error` and call `on_error`.
    /// When off, errors are only logged.
    pub enable_error_handling: bool,
    /// Optional error callback.
    pub on_error: Option<ErrorHandler>,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            container_id: String::from(DEFAULT_CONTAINER_ID),
            selectors: String::from(DEFAULT_SELECTORS),
            root_margin: String::from(DEFAULT_ROOT_MARGIN),
            threshold: Thresholds::default(),
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            generate_ids: true,
            id_generator: IdGenerator::default(),
            enable_error_handling: true,
            on_error: None,
        }
    }
}

impl TocOptions {
    /// Options for a specific container, defaults otherwise.
    pub fn for_container(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            ..Default::default()
        }
    }

    /// Returns true if switching from `previous` to `self` requires a new scan.
    ///
    /// `debounce_delay`, `enable_error_handling` and `on_error` apply without rescanning.
    pub fn rescan_needed(&self, previous: &Self) -> bool {
        self.container_id != previous.container_id
            || self.selectors != previous.selectors
            || self.root_margin != previous.root_margin
            || self.threshold != previous.threshold
            || self.generate_ids != previous.generate_ids
            || !self.id_generator.same_as(&previous.id_generator)
    }
}
