// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_doc_tree --heading-base-level=0

//! Understory Doc Tree: a headless page model for document-navigation engines.
//!
//! Understory Doc Tree is a reusable building block for code that reads a rendered document
//! the way a browser script would, but without a browser.
//!
//! - Represents an element hierarchy with tags, ids, classes, attributes, text, and layout boxes.
//! - Answers `getElementById`-style lookups and selector queries in document order.
//! - Models a scrollable viewport, a URL fragment with session history, and keyboard focus.
//! - Emulates intersection observation with root margins and threshold crossings.
//!
//! ## Not a layout engine
//!
//! This crate does not parse HTML or compute layout.
//! Upstream code inserts elements with the boxes its own layout produced (or synthetic boxes in tests).
//! Think of this as the geometry and navigation surface of a page, not a renderer.
//!
//! ## API overview
//!
//! - [`Document`]: element arena with generational [`ElementId`] handles.
//! - [`ElementData`]: per-element data; see [`ElementFlags`] for rendering and focus controls.
//! - [`Selector`]: parsed selector list used by [`Document::query_selector_all`].
//! - [`Viewport`] and [`ScrollMode`]: scroll position and client-coordinate conversion.
//! - [`Location`]: URL fragment with push/replace semantics and change notifications.
//! - [`IntersectionObserver`] and [`RootMargin`]: visibility records for observed elements.
//! - [`Page`]: all of the above plus focus and an installed observer.
//!
//! ### Minimal usage
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_doc_tree::{ElementData, IntersectionObserver, Page, RootMargin};
//!
//! let mut page = Page::new(Size::new(800.0, 600.0));
//! let main = page.document_mut().insert(None, ElementData::new("main").with_id("content"));
//! let intro = page.document_mut().insert(
//!     Some(main),
//!     ElementData::new("h1").with_text("Intro").with_bounds(Rect::new(0.0, 0.0, 800.0, 40.0)),
//! );
//!
//! let hits = page.document().query_selector_all(main, "h1, h2").unwrap();
//! assert_eq!(hits, [intro]);
//!
//! let mut observer = IntersectionObserver::new(RootMargin::default(), &[0.0, 1.0]).unwrap();
//! observer.observe(intro);
//! page.set_observer(observer);
//! let records = page.take_intersection_records();
//! assert!(records[0].is_intersecting);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod location;
mod margin;
mod observer;
mod page;
mod selector;
mod types;
mod viewport;

pub use document::Document;
pub use location::Location;
pub use margin::{Length, MarginError, RootMargin};
pub use observer::{IntersectionObserver, IntersectionRecord, ThresholdError};
pub use page::Page;
pub use selector::{Selector, SelectorError};
pub use types::{ElementData, ElementFlags, ElementId};
pub use viewport::{ScrollMode, Viewport};
