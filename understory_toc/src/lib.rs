// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_toc --heading-base-level=0

//! Understory TOC: a live table of contents with active-heading tracking.
//!
//! ## Overview
//!
//! This crate derives a table of contents (TOC) from the headings of a rendered document and
//! keeps track of which heading is *active*: the one the reader is looking at, or the one the
//! URL fragment points to.
//! It does not own the document. The host (a browser binding, a native document view, or the
//! headless page from `understory_doc_tree`) is reached through the traits in [`types`].
//!
//! ## Headings
//!
//! [`scan_headings`](crate::scan::scan_headings) finds elements matching a selector inside a
//! container, skips blank ones, and gives each a stable unique id.
//! Missing ids are generated from the text with [`slugify`](crate::slug::slugify) (or a custom
//! [`IdGenerator`](crate::options::IdGenerator)) and written back to the document, so links to
//! `#id` work.
//!
//! ## Active heading
//!
//! Three sources compete, resolved by [`ActiveTracker`](crate::active::ActiveTracker):
//!
//! - The URL fragment, applied immediately.
//! - Consumer calls such as [`TocController::navigate_to_heading`](crate::controller::TocController::navigate_to_heading),
//!   applied immediately.
//! - Viewport visibility reports, debounced. The most visible heading wins, near-ties go to the
//!   heading higher on the page, and when nothing is visible the heading scrolled past last wins.
//!
//! Fragment and consumer updates take precedence over visibility reports for one debounce delay.
//!
//! ## Driving
//!
//! [`TocController`](crate::controller::TocController) is host-driven and deterministic: the
//! host supplies time and forwards frames, visibility batches, fragment changes and timer
//! callbacks; every call returns the [`TocEvent`](crate::controller::TocEvent)s to react to.
//!
//! ```
//! # #[cfg(feature = "doc_tree_adapter")]
//! # {
//! use core::time::Duration;
//! use kurbo::{Rect, Size};
//! use understory_doc_tree::{ElementData, Page};
//! use understory_toc::adapters::doc_tree::take_intersection_entries;
//! use understory_toc::controller::TocController;
//! use understory_toc::options::TocOptions;
//!
//! let mut page = Page::new(Size::new(800.0, 600.0));
//! let doc = page.document_mut();
//! let main = doc.insert(None, ElementData::new("main").with_id("markdown-content"));
//! doc.insert(
//!     Some(main),
//!     ElementData::new("h1").with_text("Hello World").with_bounds(Rect::new(0.0, 0.0, 800.0, 40.0)),
//! );
//!
//! let mut toc = TocController::new(page, TocOptions::default());
//! toc.on_frame(Duration::ZERO);
//! assert_eq!(toc.headings()[0].id, "hello-world");
//!
//! let batch = take_intersection_entries(toc.host_mut());
//! toc.on_intersections(&batch, Duration::ZERO);
//! let due = toc.next_deadline().unwrap();
//! toc.on_timer(due);
//! assert_eq!(toc.active_id(), Some("hello-world"));
//! # }
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade: a missing container is a warning, other captured
//! errors are errors, and scan summaries and discarded updates are debug messages.
//! No logger is installed by this crate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod active;
pub mod adapters;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod navigate;
pub mod options;
pub mod scan;
pub mod slug;
pub mod types;

#[cfg(test)]
mod mock;
