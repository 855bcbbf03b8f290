// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Doc tree basics.
//!
//! Build a small document, query it with selectors, scroll, and read intersection records.
//!
//! Run:
//! - `cargo run -p understory_demos --example doc_tree_basics`

use kurbo::{Rect, Size};
use understory_doc_tree::{ElementData, IntersectionObserver, Page, RootMargin, ScrollMode};

fn main() {
    let mut page = Page::new(Size::new(400.0, 300.0));
    let doc = page.document_mut();
    let main = doc.insert(
        None,
        ElementData::new("main")
            .with_id("content")
            .with_bounds(Rect::new(0.0, 0.0, 400.0, 1200.0)),
    );
    let title = doc.insert(
        Some(main),
        ElementData::new("h1")
            .with_text("Title")
            .with_bounds(Rect::new(0.0, 0.0, 400.0, 40.0)),
    );
    let aside = doc.insert(
        Some(main),
        ElementData::new("aside")
            .with_class("note")
            .with_bounds(Rect::new(0.0, 100.0, 400.0, 300.0)),
    );
    let nested = doc.insert(
        Some(aside),
        ElementData::new("h2")
            .with_text("Aside")
            .with_bounds(Rect::new(0.0, 100.0, 400.0, 130.0)),
    );
    let section = doc.insert(
        Some(main),
        ElementData::new("h2")
            .with_text("Section")
            .with_attribute("data-level", "2")
            .with_bounds(Rect::new(0.0, 800.0, 400.0, 830.0)),
    );

    // Selector queries run in document order.
    let all = page.document().query_selector_all(main, "h1, h2").unwrap();
    println!("h1, h2        -> {all:?}");
    assert_eq!(all, vec![title, nested, section]);
    let direct = page.document().query_selector_all(main, "main > h2").unwrap();
    println!("main > h2     -> {direct:?}");
    assert_eq!(direct, vec![section]);
    let attr = page
        .document()
        .query_selector_all(main, "h2[data-level=\"2\"]")
        .unwrap();
    assert_eq!(attr, vec![section]);
    let err = page.document().query_selector_all(main, "h2 >").unwrap_err();
    println!("h2 >          -> error: {err}");

    // Observe every heading through the top half of the viewport.
    let margin = RootMargin::parse("0px 0px -50% 0px").unwrap();
    let mut observer = IntersectionObserver::new(margin, &[0.0, 0.5, 1.0]).unwrap();
    for el in &all {
        observer.observe(*el);
    }
    page.set_observer(observer);

    for record in page.take_intersection_records() {
        println!(
            "{:?}: intersecting={} ratio={:.2}",
            record.target, record.is_intersecting, record.intersection_ratio
        );
    }

    // Bring the last section to the top and read the changes.
    page.scroll_into_view(section, ScrollMode::Instant);
    println!("scrolled to y={}", page.viewport().scroll_offset().y);
    let changed = page.take_intersection_records();
    for record in &changed {
        println!(
            "{:?}: intersecting={} client={:?}",
            record.target, record.is_intersecting, record.bounding_client_rect
        );
    }
    assert!(changed.iter().any(|r| r.target == section && r.is_intersecting));
}
