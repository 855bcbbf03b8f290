// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, updates, lookups, and selector queries.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;

use crate::selector::{Selector, SelectorError};
use crate::types::{ElementData, ElementFlags, ElementId};

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// An element tree in document order.
///
/// Children keep their insertion order; document order is a pre-order walk
/// over the roots in insertion order.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    roots: Vec<ElementId>,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    data: ElementData,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Insert a new element as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the element as a root.
    pub fn insert(&mut self, parent: Option<ElementId>, data: ElementData) -> ElementId {
        let node = |generation| Node {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        let id = ElementId::new(idx as u32, generation);
        match parent.and_then(|p| self.node_opt_mut(p).map(|n| (p, n))) {
            Some((p, parent_node)) => {
                parent_node.children.push(id);
                if let Some(n) = self.node_opt_mut(id) {
                    n.parent = Some(p);
                }
            }
            None => self.roots.push(id),
        }
        id
    }

    /// Remove an element and its subtree.
    pub fn remove(&mut self, id: ElementId) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        match node.parent {
            Some(parent) => {
                if let Some(p) = self.node_opt_mut(parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        self.free_subtree(id);
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = self
            .node_opt_mut(id)
            .map(|n| core::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Element data, if `id` is live.
    pub fn data(&self, id: ElementId) -> Option<&ElementData> {
        self.node_opt(id).map(|n| &n.data)
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node_opt(id)?.parent
    }

    /// Children of `id` in order; empty for stale ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node_opt(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// All live elements in document order.
    pub fn elements(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.walk(*root, &mut out);
        }
        out
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        for child in self.children(scope) {
            self.walk(*child, &mut out);
        }
        out
    }

    fn walk(&self, id: ElementId, out: &mut Vec<ElementId>) {
        // Explicit stack keeps deep documents off the call stack.
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
    }

    /// First element in document order whose `id` attribute equals `id`.
    ///
    /// An empty `id` never matches.
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        if id.is_empty() {
            return None;
        }
        self.elements()
            .into_iter()
            .find(|el| self.element_id(*el) == Some(id))
    }

    /// The non-empty `id` attribute of `el`.
    pub fn element_id(&self, el: ElementId) -> Option<&str> {
        self.data(el)?.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Every non-empty `id` attribute of a live element, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes
            .iter()
            .flatten()
            .filter_map(|n| n.data.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Descendants of `scope` matching `selectors`, in document order.
    pub fn query_selector_all(
        &self,
        scope: ElementId,
        selectors: &str,
    ) -> Result<Vec<ElementId>, SelectorError> {
        let selector = Selector::parse(selectors)?;
        Ok(self
            .descendants(scope)
            .into_iter()
            .filter(|el| selector.matches(self, *el))
            .collect())
    }

    /// Concatenated text of `el` and its descendants in document order.
    pub fn text_content(&self, el: ElementId) -> String {
        let mut out = String::new();
        let mut all = alloc::vec![el];
        all.extend(self.descendants(el));
        for id in all {
            if let Some(data) = self.data(id) {
                out.push_str(&data.text);
            }
        }
        out
    }

    /// Set (or clear) the `id` attribute. Returns false for stale ids.
    pub fn set_id(&mut self, el: ElementId, id: Option<String>) -> bool {
        match self.node_opt_mut(el) {
            Some(n) => {
                n.data.id = id;
                true
            }
            None => false,
        }
    }

    /// Update the layout box.
    pub fn set_bounds(&mut self, el: ElementId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(el) {
            n.data.bounds = bounds;
        }
    }

    /// Update the direct text.
    pub fn set_text(&mut self, el: ElementId, text: impl Into<String>) {
        if let Some(n) = self.node_opt_mut(el) {
            n.data.text = text.into();
        }
    }

    /// Update the explicit tab index.
    pub fn set_tab_index(&mut self, el: ElementId, tab_index: Option<i32>) {
        if let Some(n) = self.node_opt_mut(el) {
            n.data.tab_index = tab_index;
        }
    }

    /// Update element flags.
    pub fn set_flags(&mut self, el: ElementId, flags: ElementFlags) {
        if let Some(n) = self.node_opt_mut(el) {
            n.data.flags = flags;
        }
    }

    /// Returns true if `el` can receive focus, naturally or through a tab index.
    pub fn is_focusable(&self, el: ElementId) -> bool {
        self.data(el).is_some_and(|d| {
            d.flags.contains(ElementFlags::FOCUSABLE) || d.tab_index.is_some()
        })
    }

    /// Union of the bounds of all visible elements, or `None` for an empty document.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.nodes
            .iter()
            .flatten()
            .filter(|n| n.data.flags.contains(ElementFlags::VISIBLE))
            .map(|n| n.data.bounds)
            .reduce(|acc, r| acc.union(r))
    }

    // --- internals ---

    fn node_opt(&self, id: ElementId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }
}
