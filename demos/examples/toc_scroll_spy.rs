// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-spy over a headless page.
//!
//! Build an article, scan its headings, then scroll through it and print the active heading.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example toc_scroll_spy`

use core::time::Duration;

use kurbo::{Rect, Size};
use understory_doc_tree::{ElementData, Page};
use understory_toc::adapters::doc_tree::take_intersection_entries;
use understory_toc::controller::{TocController, TocEvent};
use understory_toc::options::TocOptions;

const SECTION_H: f64 = 500.0;

fn article() -> Page {
    let mut page = Page::new(Size::new(1024.0, 700.0));
    let doc = page.document_mut();
    let main = doc.insert(
        None,
        ElementData::new("main")
            .with_id("markdown-content")
            .with_bounds(Rect::new(0.0, 0.0, 1024.0, 8.0 * SECTION_H)),
    );
    let outline = [
        ("h1", "Understory TOC"),
        ("h2", "Installation"),
        ("h3", "From crates.io"),
        ("h3", "From source"),
        ("h2", "Usage"),
        ("h3", "Options"),
        ("h2", "FAQ"),
        ("h2", "Usage"),
    ];
    for (i, (tag, text)) in outline.iter().enumerate() {
        let y = i as f64 * SECTION_H;
        doc.insert(
            Some(main),
            ElementData::new(*tag)
                .with_text(*text)
                .with_bounds(Rect::new(0.0, y, 1024.0, y + 36.0)),
        );
        doc.insert(
            Some(main),
            ElementData::new("p")
                .with_text("Lorem ipsum.")
                .with_bounds(Rect::new(0.0, y + 48.0, 1024.0, y + SECTION_H - 24.0)),
        );
    }
    page
}

fn print_events(label: &str, events: &[TocEvent]) {
    for event in events {
        println!("  [{label}] {event:?}");
    }
}

fn main() {
    env_logger::init();

    let mut toc = TocController::new(article(), TocOptions::default());
    let mut now = Duration::ZERO;
    print_events("frame", &toc.on_frame(now));

    println!("== Table of contents ==");
    for item in toc.headings() {
        let indent = "  ".repeat(usize::from(item.level - 1));
        println!("{indent}- {} (#{})", item.text, item.id);
    }
    // The second "Usage" heading gets a suffixed id.
    assert_eq!(toc.headings()[7].id, "usage-1");

    println!("== Scrolling ==");
    for y in [0.0, 480.0, 1_020.0, 1_700.0, 2_490.0] {
        now += Duration::from_millis(250);
        toc.host_mut().viewport_mut().scroll_to_y(y);
        let batch = take_intersection_entries(toc.host_mut());
        print_events("batch", &toc.on_intersections(&batch, now));
        if let Some(deadline) = toc.next_deadline() {
            print_events("timer", &toc.on_timer(deadline));
        }
        println!("scrollY={y:>6}: active = {:?}", toc.active_id());
    }
    assert_eq!(toc.active_id(), Some("options"));

    print_events("shutdown", &toc.shutdown());
    assert!(toc.host().observer().is_none());
}
