// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document tree: element identifiers, flags, and element data.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Rect;

/// Identifier for an element in the document.
///
/// A small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ElementId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ElementId`.
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether an `ElementId`
/// still refers to a live element. Stale ids never alias a different live element
/// because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Element flags controlling rendering and keyboard interaction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Element is rendered (participates in geometry and intersection observation).
        const VISIBLE   = 0b0000_0001;
        /// Element is naturally focusable (links, buttons, form controls).
        const FOCUSABLE = 0b0000_0010;
    }
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Data carried by a single element.
///
/// `bounds` are in document (page) coordinates, i.e. before scrolling.
#[derive(Clone, Debug)]
pub struct ElementData {
    /// Tag name, compared case-insensitively by selectors.
    pub tag: String,
    /// Value of the `id` attribute, if any. An empty id is treated as absent.
    pub id: Option<String>,
    /// Class list.
    pub classes: Vec<String>,
    /// Other attributes as `(name, value)` pairs.
    pub attributes: Vec<(String, String)>,
    /// Text owned directly by this element (descendant text is concatenated after it).
    pub text: String,
    /// Layout box in document coordinates.
    pub bounds: Rect,
    /// Explicit `tabindex`, if any. Any value makes the element focusable.
    pub tab_index: Option<i32>,
    /// Rendering and focus flags.
    pub flags: ElementFlags,
}

impl ElementData {
    /// Element with the given tag and defaults for everything else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set the direct text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the `id` attribute.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set the layout box.
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Returns the value of attribute `name`.
    ///
    /// `id` and `class` are answered from their dedicated fields.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("id") {
            return self.id.as_deref();
        }
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl Default for ElementData {
    fn default() -> Self {
        Self {
            tag: String::from("div"),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            text: String::new(),
            bounds: Rect::ZERO,
            tab_index: None,
            flags: ElementFlags::default(),
        }
    }
}
