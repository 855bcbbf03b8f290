// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active-heading determination.
//!
//! Three streams propose an active heading, each as a [`Signal`]:
//!
//! - [`Signal::Hash`]: the URL fragment. Always wins and publishes immediately.
//! - [`Signal::Programmatic`]: the consumer chose a heading. Publishes immediately if
//!   the id is in the TOC.
//! - [`Signal::Intersection`]: the best visible heading from an observer batch.
//!   Published after a trailing debounce, and only if still fresh when the debounce fires.
//!
//! A hash or programmatic update opens a precedence window of one debounce delay.
//! Intersection candidates enqueued before or inside that window are discarded at fire
//! time, so scrolling caused by a navigation does not immediately override it.
//!
//! [`ActiveTracker::apply`] is the single decision function for all three streams.

use alloc::string::String;
use core::time::Duration;
use kurbo::Rect;

use crate::debounce::Debouncer;
use crate::types::{IntersectionEntry, TocItem};

/// Ratio difference below which two visible headings are considered equally visible.
pub const TIE_EPSILON: f64 = 0.01;

/// Where the current active id came from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ActiveSource {
    /// Nothing is active.
    #[default]
    None,
    /// The URL fragment.
    Hash,
    /// Viewport visibility.
    Intersection,
    /// A consumer call.
    Programmatic,
}

/// The active heading and its provenance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveState {
    /// Active heading id.
    pub active_id: Option<String>,
    /// Which stream set it.
    pub source: ActiveSource,
}

/// A visible heading proposed by the intersection stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Heading id.
    pub id: String,
    /// Visible ratio; `0` for headings chosen from fresh geometry.
    pub ratio: f64,
    /// Rect relative to the viewport.
    pub rect: Rect,
}

/// An input to [`ActiveTracker::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// URL fragment without `#`.
    Hash(String),
    /// Visibility-derived candidate.
    Intersection(Candidate),
    /// Consumer-selected id.
    Programmatic(String),
}

/// Choose among intersecting headings.
///
/// A heading named by `hash` wins. Otherwise every heading within [`TIE_EPSILON`] of the
/// highest ratio is a contender, and the one higher on the page wins. Contenders at the
/// same height go to the earliest in `visible`, so callers pass document order.
pub fn select_candidate<'a>(visible: &'a [Candidate], hash: &str) -> Option<&'a Candidate> {
    if !hash.is_empty() {
        if let Some(c) = visible.iter().find(|c| c.id == hash) {
            return Some(c);
        }
    }
    let top = visible.iter().map(|c| c.ratio).reduce(f64::max)?;
    visible
        .iter()
        .filter(|c| c.ratio > top - TIE_EPSILON)
        .reduce(|best, c| if c.rect.y0 < best.rect.y0 { c } else { best })
}

/// Turn an observer batch into at most one candidate.
///
/// Entries for elements not in `headings` are ignored. When no TOC heading intersects,
/// `geometry` is queried for every heading and the one at or above the viewport top and
/// closest to it is chosen (the heading the reader last scrolled past).
pub fn candidate_from_batch<E, G>(
    headings: &[TocItem<E>],
    entries: &[IntersectionEntry<E>],
    hash: &str,
    geometry: G,
) -> Option<Candidate>
where
    E: Copy + PartialEq,
    G: Fn(E) -> Option<Rect>,
{
    let mut visible: alloc::vec::Vec<(usize, Candidate)> = entries
        .iter()
        .filter(|e| e.is_intersecting)
        .filter_map(|e| {
            let index = headings.iter().position(|h| h.element == e.target)?;
            Some((
                index,
                Candidate {
                    id: headings[index].id.clone(),
                    ratio: e.intersection_ratio,
                    rect: e.bounding_client_rect,
                },
            ))
        })
        .collect();
    if !visible.is_empty() {
        visible.sort_by_key(|(index, _)| *index);
        let visible: alloc::vec::Vec<Candidate> = visible.into_iter().map(|(_, c)| c).collect();
        return select_candidate(&visible, hash).cloned();
    }

    let mut best: Option<(&TocItem<E>, Rect)> = None;
    for item in headings {
        let Some(rect) = geometry(item.element) else {
            continue;
        };
        if rect.y0 > 0.0 {
            continue;
        }
        if best.is_none_or(|(_, b)| rect.y0 > b.y0) {
            best = Some((item, rect));
        }
    }
    best.map(|(item, rect)| Candidate {
        id: item.id.clone(),
        ratio: 0.0,
        rect,
    })
}

#[derive(Clone, Debug)]
struct Pending {
    id: String,
    epoch: u64,
    enqueued_at: Duration,
}

/// Resolves signals into the published [`ActiveState`].
#[derive(Clone, Debug, Default)]
pub struct ActiveTracker {
    state: ActiveState,
    last_published: Option<String>,
    // Bumped by every hash or programmatic update and by reset.
    epoch: u64,
    precedence_until: Option<Duration>,
    pending: Debouncer<Pending>,
}

impl ActiveTracker {
    /// A tracker with nothing active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &ActiveState {
        &self.state
    }

    /// Current active id.
    pub fn active_id(&self) -> Option<&str> {
        self.state.active_id.as_deref()
    }

    /// When the pending intersection candidate is due, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.deadline()
    }

    /// Apply a signal at `now`.
    ///
    /// `known` answers whether an id is in the current TOC. Returns the new state when it
    /// changed and was published.
    pub fn apply(
        &mut self,
        signal: Signal,
        now: Duration,
        delay: Duration,
        known: impl Fn(&str) -> bool,
    ) -> Option<ActiveState> {
        match signal {
            Signal::Hash(id) => {
                if id.is_empty() {
                    return None;
                }
                self.take_precedence(now, delay);
                self.publish(id, ActiveSource::Hash)
            }
            Signal::Programmatic(id) => {
                if !known(&id) {
                    log::debug!("ignoring active heading `{id}`: not in the table of contents");
                    return None;
                }
                self.take_precedence(now, delay);
                self.publish(id, ActiveSource::Programmatic)
            }
            Signal::Intersection(candidate) => {
                if !known(&candidate.id) {
                    return None;
                }
                self.pending.schedule(
                    Pending {
                        id: candidate.id,
                        epoch: self.epoch,
                        enqueued_at: now,
                    },
                    now,
                    delay,
                );
                if delay.is_zero() {
                    self.fire(now, known)
                } else {
                    None
                }
            }
        }
    }

    /// Publish the pending intersection candidate if it is due and still fresh.
    pub fn fire(&mut self, now: Duration, known: impl Fn(&str) -> bool) -> Option<ActiveState> {
        let pending = self.pending.poll(now)?;
        let superseded = pending.epoch != self.epoch
            || self
                .precedence_until
                .is_some_and(|until| pending.enqueued_at < until);
        if superseded || !known(&pending.id) || self.last_published.as_deref() == Some(&pending.id)
        {
            log::debug!("discarding stale active heading candidate `{}`", pending.id);
            return None;
        }
        self.publish(pending.id, ActiveSource::Intersection)
    }

    /// Clear the state, the last-published marker and any pending candidate.
    pub fn reset(&mut self) {
        self.state = ActiveState::default();
        self.last_published = None;
        self.precedence_until = None;
        self.epoch = self.epoch.wrapping_add(1);
        self.pending.cancel();
    }

    /// Drop the pending candidate without touching the published state.
    pub fn cancel_pending(&mut self) {
        self.pending.cancel();
    }

    fn take_precedence(&mut self, now: Duration, delay: Duration) {
        self.epoch = self.epoch.wrapping_add(1);
        self.precedence_until = Some(now.saturating_add(delay));
        self.pending.cancel();
    }

    fn publish(&mut self, id: String, source: ActiveSource) -> Option<ActiveState> {
        self.last_published = Some(id.clone());
        let next = ActiveState {
            active_id: Some(id),
            source,
        };
        if next == self.state {
            return None;
        }
        log::trace!("active heading -> {:?} ({:?})", next.active_id, next.source);
        self.state = next.clone();
        Some(next)
    }
}
