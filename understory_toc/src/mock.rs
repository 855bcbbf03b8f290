// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-crate recording host for unit tests.
//!
//! Elements are indices into a flat list in document order. Selectors are comma-separated
//! tag names or `*`; anything else is a syntax error.

use alloc::collections::BTreeSet;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::Cell;
use kurbo::Rect;

use crate::types::{
    DocumentAccess, HostError, LocationAccess, ObserverOptions, ScrollBehavior,
    SelectorSyntaxError, ViewportAccess, VisibilityObserver,
};

#[derive(Clone, Debug)]
pub(crate) struct MockElement {
    pub(crate) tag: String,
    pub(crate) id: Option<String>,
    pub(crate) text: String,
    pub(crate) parent: Option<usize>,
    pub(crate) top: f64,
    pub(crate) tab_index: Option<i32>,
}

#[derive(Debug, Default)]
pub(crate) struct MockHost {
    pub(crate) elements: Vec<MockElement>,
    pub(crate) hash: String,
    pub(crate) scroll_y: f64,
    pub(crate) scrolls: Vec<(usize, ScrollBehavior)>,
    pub(crate) focused: Option<usize>,
    pub(crate) focus_prevented_scroll: bool,
    pub(crate) observing: Vec<usize>,
    pub(crate) observe_calls: usize,
    pub(crate) last_root_margin: String,
    pub(crate) last_thresholds: Vec<f64>,
    // Shared so tests can observe teardown after the controller is dropped.
    pub(crate) disconnects: Rc<Cell<usize>>,
    pub(crate) fail_observe: bool,
    pub(crate) readonly_ids: bool,
    pub(crate) id_lookups: Cell<usize>,
}

pub(crate) const HEADING_HEIGHT: f64 = 30.0;

impl MockHost {
    /// A host with a single `article#content` container.
    pub(crate) fn with_container() -> Self {
        let mut host = Self::default();
        host.push(None, "article", Some("content"), "", 0.0);
        host
    }

    pub(crate) fn push(
        &mut self,
        parent: Option<usize>,
        tag: &str,
        id: Option<&str>,
        text: &str,
        top: f64,
    ) -> usize {
        self.elements.push(MockElement {
            tag: tag.to_string(),
            id: id.map(ToString::to_string),
            text: text.to_string(),
            parent,
            top,
            tab_index: None,
        });
        self.elements.len() - 1
    }

    /// Append a heading under the container at index 0.
    pub(crate) fn heading(&mut self, tag: &str, id: Option<&str>, text: &str, top: f64) -> usize {
        self.push(Some(0), tag, id, text, top)
    }

    pub(crate) fn id_of(&self, el: usize) -> Option<&str> {
        self.elements[el].id.as_deref()
    }

    fn is_descendant(&self, el: usize, scope: usize) -> bool {
        let mut cur = self.elements[el].parent;
        while let Some(p) = cur {
            if p == scope {
                return true;
            }
            cur = self.elements[p].parent;
        }
        false
    }
}

impl DocumentAccess for MockHost {
    type Element = usize;

    fn element_by_id(&self, id: &str) -> Option<usize> {
        self.id_lookups.set(self.id_lookups.get() + 1);
        if id.is_empty() {
            return None;
        }
        self.elements
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
    }

    fn document_ids(&self) -> BTreeSet<String> {
        self.elements
            .iter()
            .filter_map(|e| e.id.clone())
            .filter(|id| !id.is_empty())
            .collect()
    }

    fn query_selector_all(
        &self,
        scope: usize,
        selectors: &str,
    ) -> Result<Vec<usize>, SelectorSyntaxError> {
        let mut tags = Vec::new();
        for part in selectors.split(',') {
            let part = part.trim();
            if part.is_empty() || !part.chars().all(|c| c == '*' || c.is_ascii_alphanumeric()) {
                return Err(SelectorSyntaxError {
                    message: alloc::format!("unexpected token in `{part}`"),
                });
            }
            tags.push(part.to_ascii_lowercase());
        }
        Ok((0..self.elements.len())
            .filter(|&el| self.is_descendant(el, scope))
            .filter(|&el| {
                let tag = self.elements[el].tag.to_ascii_lowercase();
                tags.iter().any(|t| t == "*" || *t == tag)
            })
            .collect())
    }

    fn text_content(&self, el: usize) -> String {
        let mut out = self.elements[el].text.clone();
        for child in 0..self.elements.len() {
            if self.is_descendant(child, el) {
                out.push_str(&self.elements[child].text);
            }
        }
        out
    }

    fn tag_name(&self, el: usize) -> String {
        self.elements[el].tag.clone()
    }

    fn element_id(&self, el: usize) -> Option<String> {
        self.elements[el].id.clone().filter(|id| !id.is_empty())
    }

    fn set_element_id(&mut self, el: usize, id: &str) -> Result<(), HostError> {
        if self.readonly_ids {
            return Err(HostError::new("document is read-only"));
        }
        self.elements[el].id = Some(id.to_string());
        Ok(())
    }

    fn bounding_client_rect(&self, el: usize) -> Option<Rect> {
        let top = self.elements.get(el)?.top - self.scroll_y;
        Some(Rect::new(0.0, top, 100.0, top + HEADING_HEIGHT))
    }
}

impl LocationAccess for MockHost {
    fn hash(&self) -> String {
        self.hash.clone()
    }

    fn replace_hash(&mut self, id: &str) {
        self.hash = id.to_string();
    }
}

impl ViewportAccess for MockHost {
    fn scroll_into_view(&mut self, el: usize, behavior: ScrollBehavior) {
        self.scroll_y = self.elements[el].top;
        self.scrolls.push((el, behavior));
    }

    fn make_focusable(&mut self, el: usize) {
        let e = &mut self.elements[el];
        if e.tab_index.is_none() {
            e.tab_index = Some(-1);
        }
    }

    fn focus(&mut self, el: usize, prevent_scroll: bool) {
        if self.elements[el].tab_index.is_some() {
            self.focused = Some(el);
            self.focus_prevented_scroll = prevent_scroll;
        }
    }
}

impl VisibilityObserver for MockHost {
    fn observe(&mut self, targets: &[usize], options: &ObserverOptions<'_>) -> Result<(), HostError> {
        self.observe_calls += 1;
        if self.fail_observe {
            return Err(HostError::new("rootMargin must be specified in pixels or percent"));
        }
        self.observing = targets.to_vec();
        self.last_root_margin = options.root_margin.to_string();
        self.last_thresholds = options.thresholds.to_vec();
        Ok(())
    }

    fn disconnect(&mut self) {
        if !self.observing.is_empty() {
            self.disconnects.set(self.disconnects.get() + 1);
        }
        self.observing.clear();
    }
}
