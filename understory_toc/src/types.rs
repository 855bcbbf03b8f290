// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types: TOC items, visibility entries, and the host traits the engine reads and drives.
//!
//! ## Overview
//!
//! The engine never owns a document. It reaches the host through four small traits
//! over a copyable element handle `E`:
//!
//! - [`DocumentAccess`]: lookups, the document's ids, selector queries, text, tags, ids, geometry.
//! - [`LocationAccess`]: the URL fragment.
//! - [`ViewportAccess`]: scrolling and focus.
//! - [`VisibilityObserver`]: the viewport-visibility subscription.
//!
//! [`Host`] is implemented for every type that implements all four.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use kurbo::Rect;

/// A single table of contents entry.
///
/// `element` is a non-owning handle into the host document, used only for geometry
/// queries; it may go stale after the host re-renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocItem<E> {
    /// Unique identifier (the element's `id`).
    pub id: String,
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Trimmed, non-empty heading text.
    pub text: String,
    /// Host handle of the heading element.
    pub element: E,
}

impl<E> TocItem<E> {
    /// Compare id, level and text, ignoring the element handle.
    pub fn same_content<F>(&self, other: &TocItem<F>) -> bool {
        self.id == other.id && self.level == other.level && self.text == other.text
    }
}

/// Returns true if two TOCs are equal entry by entry, ignoring element handles.
pub fn same_headings<E, F>(a: &[TocItem<E>], b: &[TocItem<F>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_content(y))
}

/// Requested scroll animation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScrollBehavior {
    /// Host default.
    Auto,
    /// Animated.
    #[default]
    Smooth,
    /// Immediate.
    Instant,
}

/// One visibility report delivered by the host's observer.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry<E> {
    /// Observed element.
    pub target: E,
    /// Whether the element currently intersects the (margin-adjusted) viewport.
    pub is_intersecting: bool,
    /// Visible fraction in `[0, 1]`.
    pub intersection_ratio: f64,
    /// Element rect relative to the viewport's top-left corner.
    pub bounding_client_rect: Rect,
}

/// Options handed to [`VisibilityObserver::observe`].
#[derive(Clone, Debug, PartialEq)]
pub struct ObserverOptions<'a> {
    /// CSS-like margin shorthand applied to the viewport, e.g. `"0px 0px -80% 0px"`.
    pub root_margin: &'a str,
    /// Visibility ratios that trigger a report when crossed.
    pub thresholds: &'a [f64],
}

/// Error reported by a host operation the engine cannot recover from locally.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    /// Human-readable description.
    pub message: String,
}

impl HostError {
    /// Wrap a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A selector expression the host could not parse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SelectorSyntaxError {
    /// Human-readable description from the host's parser.
    pub message: String,
}

/// Read access to the host document, plus id assignment.
pub trait DocumentAccess {
    /// Element handle. Handles are compared by identity.
    type Element: Copy + Eq + Debug;

    /// First element in the document whose id is `id`.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Every non-empty id in the document.
    fn document_ids(&self) -> BTreeSet<String>;

    /// Descendants of `scope` matching `selectors`, in document order.
    fn query_selector_all(
        &self,
        scope: Self::Element,
        selectors: &str,
    ) -> Result<Vec<Self::Element>, SelectorSyntaxError>;

    /// Full text content of `el`.
    fn text_content(&self, el: Self::Element) -> String;

    /// Tag name of `el`, e.g. `"h2"`.
    fn tag_name(&self, el: Self::Element) -> String;

    /// Non-empty id of `el`, if any.
    fn element_id(&self, el: Self::Element) -> Option<String>;

    /// Assign an id to `el`.
    fn set_element_id(&mut self, el: Self::Element, id: &str) -> Result<(), HostError>;

    /// Current rect of `el` relative to the viewport; `None` if it no longer exists.
    fn bounding_client_rect(&self, el: Self::Element) -> Option<Rect>;
}

/// The URL fragment.
pub trait LocationAccess {
    /// Current fragment without `#`; empty when there is none.
    fn hash(&self) -> String;

    /// Replace the fragment without adding a history entry or emitting a change notification.
    fn replace_hash(&mut self, id: &str);
}

/// Scrolling and focus.
pub trait ViewportAccess: DocumentAccess {
    /// Scroll so `el` is aligned with the top of the viewport.
    fn scroll_into_view(&mut self, el: Self::Element, behavior: ScrollBehavior);

    /// Make `el` programmatically focusable if it is not naturally focusable.
    fn make_focusable(&mut self, el: Self::Element);

    /// Move keyboard focus to `el`, optionally without scrolling.
    fn focus(&mut self, el: Self::Element, prevent_scroll: bool);
}

/// Viewport-visibility subscription.
///
/// The host delivers batches asynchronously through
/// [`TocController::on_intersections`](crate::controller::TocController::on_intersections).
pub trait VisibilityObserver: DocumentAccess {
    /// Start observing `targets`, replacing any previous subscription.
    fn observe(
        &mut self,
        targets: &[Self::Element],
        options: &ObserverOptions<'_>,
    ) -> Result<(), HostError>;

    /// Stop observing everything. Must be idempotent.
    fn disconnect(&mut self);
}

/// Everything the engine needs from its host.
pub trait Host: DocumentAccess + LocationAccess + ViewportAccess + VisibilityObserver {}

impl<T> Host for T where T: DocumentAccess + LocationAccess + ViewportAccess + VisibilityObserver {}
