// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless page: document, viewport, location, focus, and one intersection observer.

use alloc::vec::Vec;
use kurbo::{Rect, Size};

use crate::document::Document;
use crate::location::Location;
use crate::observer::{IntersectionObserver, IntersectionRecord};
use crate::types::ElementId;
use crate::viewport::{ScrollMode, Viewport};

/// Everything a table-of-contents engine needs from a browser page, without a browser.
#[derive(Debug)]
pub struct Page {
    document: Document,
    viewport: Viewport,
    location: Location,
    focused: Option<ElementId>,
    observer: Option<IntersectionObserver>,
}

impl Page {
    /// An empty page with a viewport of `size`.
    pub fn new(size: Size) -> Self {
        Self::with_document(Document::new(), size)
    }

    /// A page around an existing document.
    pub fn with_document(document: Document, size: Size) -> Self {
        Self {
            document,
            viewport: Viewport::new(size),
            location: Location::new(),
            focused: None,
            observer: None,
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The document, mutably.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// The viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The viewport, mutably (for simulated user scrolling).
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// The location.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The location, mutably.
    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    /// Element rect relative to the viewport, if `el` is live.
    pub fn bounding_client_rect(&self, el: ElementId) -> Option<Rect> {
        let data = self.document.data(el)?;
        Some(self.viewport.to_client(data.bounds))
    }

    /// Align `el` with the top of the viewport.
    pub fn scroll_into_view(&mut self, el: ElementId, mode: ScrollMode) -> bool {
        let Some(data) = self.document.data(el) else {
            return false;
        };
        let target = data.bounds;
        let content = self.document.content_bounds();
        self.viewport.scroll_into_view(target, content, mode);
        true
    }

    /// Focus `el` if it is focusable. Unless `prevent_scroll` is set, the element is
    /// also scrolled into view.
    pub fn focus(&mut self, el: ElementId, prevent_scroll: bool) -> bool {
        if !self.document.is_focusable(el) {
            return false;
        }
        self.focused = Some(el);
        if !prevent_scroll {
            self.scroll_into_view(el, ScrollMode::Auto);
        }
        true
    }

    /// Currently focused element, if it is still live.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused.filter(|el| self.document.is_alive(*el))
    }

    /// Install `observer`, replacing (and disconnecting) any previous one.
    pub fn set_observer(&mut self, observer: IntersectionObserver) {
        self.observer = Some(observer);
    }

    /// The installed observer, if any.
    pub fn observer(&self) -> Option<&IntersectionObserver> {
        self.observer.as_ref()
    }

    /// Disconnect and remove the installed observer.
    pub fn disconnect_observer(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
        }
    }

    /// Pending visibility records of the installed observer; empty without one.
    pub fn take_intersection_records(&mut self) -> Vec<IntersectionRecord> {
        match self.observer.as_mut() {
            Some(observer) => observer.take_records(&self.document, &self.viewport),
            None => Vec::new(),
        }
    }
}
