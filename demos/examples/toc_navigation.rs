// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fragment and programmatic navigation.
//!
//! Open a page with a deep link, follow a fragment link, then navigate from the TOC and
//! reconfigure the controller with a custom id generator and error handler.
//!
//! Run:
//! - `RUST_LOG=understory_toc=debug cargo run -p understory_demos --example toc_navigation`

use core::time::Duration;

use kurbo::{Rect, Size};
use understory_doc_tree::{ElementData, Location, Page, ScrollMode};
use understory_toc::active::ActiveSource;
use understory_toc::adapters::doc_tree::take_intersection_entries;
use understory_toc::controller::TocController;
use understory_toc::options::{ErrorHandler, IdGenerator, TocOptions};
use understory_toc::types::ScrollBehavior;

fn page() -> Page {
    let mut page = Page::new(Size::new(800.0, 600.0));
    let doc = page.document_mut();
    let main = doc.insert(
        None,
        ElementData::new("article")
            .with_id("docs")
            .with_bounds(Rect::new(0.0, 0.0, 800.0, 2400.0)),
    );
    for (i, text) in ["Overview", "Design", "Reference"].iter().enumerate() {
        let y = i as f64 * 800.0;
        doc.insert(
            Some(main),
            ElementData::new("h2")
                .with_text(*text)
                .with_bounds(Rect::new(0.0, y, 800.0, y + 32.0)),
        );
    }
    *page.location_mut() = Location::with_hash("#design");
    page
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn main() {
    env_logger::init();

    let options = TocOptions {
        container_id: "docs".into(),
        selectors: "h2".into(),
        on_error: Some(ErrorHandler::new(|err, context| {
            log::warn!("toc error during {context}: {err}");
        })),
        ..Default::default()
    };
    let mut toc = TocController::new(page(), options);
    println!("deep link: active = {:?}", toc.active_state());
    assert_eq!(toc.active_id(), Some("design"));

    toc.on_frame(ms(0));
    // The page opens at the top, but the fragment keeps precedence.
    let batch = take_intersection_entries(toc.host_mut());
    toc.on_intersections(&batch, ms(16));
    if let Some(deadline) = toc.next_deadline() {
        toc.on_timer(deadline);
    }
    assert_eq!(toc.active_id(), Some("design"));

    // A fragment link click pushes history and notifies.
    toc.host_mut().location_mut().set_hash("reference");
    if toc.host_mut().location_mut().take_hash_change() {
        println!("hash change: {:?}", toc.on_hash_change(ms(500)));
    }
    assert_eq!(toc.active_state().source, ActiveSource::Hash);

    // A TOC click: scroll, replace the fragment, focus.
    let events = toc.navigate_to_heading("overview", ScrollBehavior::Smooth, ms(1000));
    println!("navigate: {events:?}");
    let page = toc.host();
    assert_eq!(page.location().hash(), "overview");
    assert_eq!(page.viewport().last_scroll_mode(), Some(ScrollMode::Smooth));
    assert!(page.focused().is_some());
    println!(
        "history entries: {}, scrollY = {}",
        page.location().history_len(),
        page.viewport().scroll_offset().y
    );

    // Reconfigure: only a scan-relevant change schedules a new scan.
    let generator = IdGenerator::new(|text, level, index| {
        format!("s{level}-{index}-{}", text.len())
    });
    let events = toc.set_options(TocOptions {
        container_id: "missing".into(),
        id_generator: generator,
        ..toc.options().clone()
    });
    println!("reconfigure: {events:?}");
    println!("rescan: {:?}", toc.on_frame(ms(1200)));
    assert!(toc.headings().is_empty());
    println!("error: {:?}", toc.error());
}
