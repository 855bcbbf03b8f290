// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Doc Tree.
//!
//! ## Feature
//!
//! Enable with `doc_tree_adapter`.
//!
//! ## Notes
//!
//! [`Page`] implements every host trait, so a `TocController<Page>` runs against the
//! headless page directly. The page does not call back on its own: after scrolling or
//! changing the document, the driver pulls pending records with [`take_intersection_entries`]
//! and feeds them to [`TocController::on_intersections`](crate::controller::TocController::on_intersections).
//! Likewise, after `Location::set_hash` the driver checks `Location::take_hash_change` and
//! calls `on_hash_change`.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Rect;
use understory_doc_tree::{
    ElementId, IntersectionObserver, IntersectionRecord, Page, RootMargin, ScrollMode,
};

use crate::types::{
    DocumentAccess, HostError, IntersectionEntry, LocationAccess, ObserverOptions, ScrollBehavior,
    SelectorSyntaxError, ViewportAccess, VisibilityObserver,
};

/// Map a requested scroll behavior to the page's scroll mode.
pub fn scroll_mode(behavior: ScrollBehavior) -> ScrollMode {
    match behavior {
        ScrollBehavior::Auto => ScrollMode::Auto,
        ScrollBehavior::Smooth => ScrollMode::Smooth,
        ScrollBehavior::Instant => ScrollMode::Instant,
    }
}

/// Convert a page record into an engine entry.
pub fn intersection_entry(record: &IntersectionRecord) -> IntersectionEntry<ElementId> {
    IntersectionEntry {
        target: record.target,
        is_intersecting: record.is_intersecting,
        intersection_ratio: record.intersection_ratio,
        bounding_client_rect: record.bounding_client_rect,
    }
}

/// Drain the page's pending visibility records as engine entries.
pub fn take_intersection_entries(page: &mut Page) -> Vec<IntersectionEntry<ElementId>> {
    page.take_intersection_records()
        .iter()
        .map(intersection_entry)
        .collect()
}

impl DocumentAccess for Page {
    type Element = ElementId;

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.document().get_element_by_id(id)
    }

    fn document_ids(&self) -> BTreeSet<String> {
        self.document().ids().map(ToString::to_string).collect()
    }

    fn query_selector_all(
        &self,
        scope: ElementId,
        selectors: &str,
    ) -> Result<Vec<ElementId>, SelectorSyntaxError> {
        self.document()
            .query_selector_all(scope, selectors)
            .map_err(|e| SelectorSyntaxError {
                message: e.to_string(),
            })
    }

    fn text_content(&self, el: ElementId) -> String {
        self.document().text_content(el)
    }

    fn tag_name(&self, el: ElementId) -> String {
        self.document()
            .data(el)
            .map(|d| d.tag.clone())
            .unwrap_or_default()
    }

    fn element_id(&self, el: ElementId) -> Option<String> {
        self.document().element_id(el).map(ToString::to_string)
    }

    fn set_element_id(&mut self, el: ElementId, id: &str) -> Result<(), HostError> {
        if self.document_mut().set_id(el, Some(id.to_string())) {
            Ok(())
        } else {
            Err(HostError::new("element was removed from the document"))
        }
    }

    fn bounding_client_rect(&self, el: ElementId) -> Option<Rect> {
        Page::bounding_client_rect(self, el)
    }
}

impl LocationAccess for Page {
    fn hash(&self) -> String {
        self.location().hash().to_string()
    }

    fn replace_hash(&mut self, id: &str) {
        self.location_mut().replace_hash(id);
    }
}

impl ViewportAccess for Page {
    fn scroll_into_view(&mut self, el: ElementId, behavior: ScrollBehavior) {
        Page::scroll_into_view(self, el, scroll_mode(behavior));
    }

    fn make_focusable(&mut self, el: ElementId) {
        if !self.document().is_focusable(el) {
            self.document_mut().set_tab_index(el, Some(-1));
        }
    }

    fn focus(&mut self, el: ElementId, prevent_scroll: bool) {
        Page::focus(self, el, prevent_scroll);
    }
}

impl VisibilityObserver for Page {
    fn observe(
        &mut self,
        targets: &[ElementId],
        options: &ObserverOptions<'_>,
    ) -> Result<(), HostError> {
        let margin =
            RootMargin::parse(options.root_margin).map_err(|e| HostError::new(e.to_string()))?;
        let mut observer = IntersectionObserver::new(margin, options.thresholds)
            .map_err(|e| HostError::new(e.to_string()))?;
        for target in targets {
            observer.observe(*target);
        }
        self.set_observer(observer);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.disconnect_observer();
    }
}
