// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection observation: threshold-crossing visibility records for observed elements.
//!
//! ## Model
//!
//! The root is the viewport (client coordinates) adjusted by a [`RootMargin`].
//! For each observed element the observer computes the intersection of its client rect
//! with the root, the visible ratio (intersection area over element area), and the
//! threshold bucket the ratio falls in. [`IntersectionObserver::take_records`] returns a
//! record for every element whose bucket or intersecting state changed since the last
//! call; the first call after [`observe`](IntersectionObserver::observe) always reports.
//!
//! Edge-adjacent rects count as intersecting with a ratio of zero.

use alloc::vec::Vec;
use kurbo::Rect;

use crate::document::Document;
use crate::margin::RootMargin;
use crate::types::{ElementFlags, ElementId};
use crate::viewport::Viewport;

/// Error produced for invalid threshold lists.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    /// A threshold outside `[0, 1]` (or NaN).
    #[error("threshold {0} is outside [0, 1]")]
    OutOfRange(f64),
}

/// One visibility report for an observed element.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionRecord {
    /// The observed element.
    pub target: ElementId,
    /// Whether the element touches the root.
    pub is_intersecting: bool,
    /// Visible fraction of the element in `[0, 1]`.
    pub intersection_ratio: f64,
    /// Element rect in client coordinates.
    pub bounding_client_rect: Rect,
    /// Visible part of the element in client coordinates (`Rect::ZERO` when not intersecting).
    pub intersection_rect: Rect,
    /// The root after applying margins.
    pub root_bounds: Rect,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Bucket {
    // `None` when not intersecting.
    threshold_index: Option<usize>,
}

/// Observer over a set of elements with fixed margins and thresholds.
#[derive(Clone, Debug)]
pub struct IntersectionObserver {
    root_margin: RootMargin,
    thresholds: Vec<f64>,
    targets: Vec<(ElementId, Option<Bucket>)>,
}

impl IntersectionObserver {
    /// Create an observer. Thresholds are sorted and deduplicated; an empty list means `[0]`.
    pub fn new(root_margin: RootMargin, thresholds: &[f64]) -> Result<Self, ThresholdError> {
        let mut sorted = Vec::with_capacity(thresholds.len().max(1));
        for &t in thresholds {
            if !(0.0..=1.0).contains(&t) {
                return Err(ThresholdError::OutOfRange(t));
            }
            sorted.push(t);
        }
        if sorted.is_empty() {
            sorted.push(0.0);
        }
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        Ok(Self {
            root_margin,
            thresholds: sorted,
            targets: Vec::new(),
        })
    }

    /// Normalized thresholds.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Root margin in use.
    pub fn root_margin(&self) -> RootMargin {
        self.root_margin
    }

    /// Start observing `target`. Observing twice is a no-op.
    pub fn observe(&mut self, target: ElementId) {
        if !self.is_observing(target) {
            self.targets.push((target, None));
        }
    }

    /// Stop observing `target`.
    pub fn unobserve(&mut self, target: ElementId) {
        self.targets.retain(|(t, _)| *t != target);
    }

    /// Stop observing everything.
    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    /// Returns true if `target` is observed.
    pub fn is_observing(&self, target: ElementId) -> bool {
        self.targets.iter().any(|(t, _)| *t == target)
    }

    /// Observed elements in observation order.
    pub fn targets(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.targets.iter().map(|(t, _)| *t)
    }

    /// Compute records for every element whose visibility bucket changed.
    ///
    /// Elements removed from the document are dropped from observation silently.
    pub fn take_records(&mut self, doc: &Document, viewport: &Viewport) -> Vec<IntersectionRecord> {
        let root = self.root_margin.resolve(viewport.client_bounds());
        self.targets.retain(|(t, _)| doc.is_alive(*t));
        let mut out = Vec::new();
        for (target, last) in &mut self.targets {
            let Some(data) = doc.data(*target) else {
                continue;
            };
            let client = viewport.to_client(data.bounds);
            let rendered = data.flags.contains(ElementFlags::VISIBLE);
            let (is_intersecting, ratio, visible) = if rendered {
                measure(client, root)
            } else {
                (false, 0.0, Rect::ZERO)
            };
            let bucket = Bucket {
                threshold_index: is_intersecting.then(|| bucket_index(&self.thresholds, ratio)),
            };
            if *last == Some(bucket) {
                continue;
            }
            *last = Some(bucket);
            out.push(IntersectionRecord {
                target: *target,
                is_intersecting,
                intersection_ratio: ratio,
                bounding_client_rect: client,
                intersection_rect: visible,
                root_bounds: root,
            });
        }
        out
    }
}

fn measure(target: Rect, root: Rect) -> (bool, f64, Rect) {
    let x0 = target.x0.max(root.x0);
    let y0 = target.y0.max(root.y0);
    let x1 = target.x1.min(root.x1);
    let y1 = target.y1.min(root.y1);
    if x0 > x1 || y0 > y1 {
        return (false, 0.0, Rect::ZERO);
    }
    let visible = Rect::new(x0, y0, x1, y1);
    let area = target.area();
    let ratio = if area > 0.0 {
        (visible.area() / area).clamp(0.0, 1.0)
    } else {
        1.0
    };
    (true, ratio, visible)
}

// Index of the first threshold greater than `ratio`; a ratio of exactly 1 lands past the end.
fn bucket_index(thresholds: &[f64], ratio: f64) -> usize {
    thresholds
        .iter()
        .position(|t| *t > ratio)
        .unwrap_or(thresholds.len())
}
