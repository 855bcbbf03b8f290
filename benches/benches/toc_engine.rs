// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_doc_tree::{ElementData, Page};
use understory_toc::active::{Candidate, candidate_from_batch, select_candidate};
use understory_toc::adapters::doc_tree::take_intersection_entries;
use understory_toc::controller::TocController;
use understory_toc::options::TocOptions;
use understory_toc::scan::scan_headings;
use understory_toc::slug::slugify;
use understory_toc::types::TocItem;

const SECTION_H: f64 = 400.0;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// A long article: `n` sections, each a heading (levels cycling 1..=4) and a paragraph.
/// Every eighth heading repeats an earlier title to exercise id collisions.
fn gen_article(n: usize) -> Page {
    let mut page = Page::new(Size::new(1024.0, 768.0));
    let doc = page.document_mut();
    let main = doc.insert(
        None,
        ElementData::new("main")
            .with_id("markdown-content")
            .with_bounds(Rect::new(0.0, 0.0, 1024.0, n as f64 * SECTION_H)),
    );
    for i in 0..n {
        let y = i as f64 * SECTION_H;
        let tag = ["h1", "h2", "h3", "h4"][i % 4];
        let title = if i % 8 == 7 {
            format!("Section {}: Notes & Details", i - 1)
        } else {
            format!("Section {i}: Notes & Details")
        };
        doc.insert(
            Some(main),
            ElementData::new(tag)
                .with_text(title)
                .with_bounds(Rect::new(0.0, y, 1024.0, y + 32.0)),
        );
        doc.insert(
            Some(main),
            ElementData::new("p")
                .with_text("Body")
                .with_bounds(Rect::new(0.0, y + 40.0, 1024.0, y + SECTION_H - 20.0)),
        );
    }
    page
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let options = TocOptions::default();
    for &n in &[100_usize, 1000, 5000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("generate_ids_n{n}"), |b| {
            b.iter_batched(
                || gen_article(n),
                |mut page| {
                    let items = scan_headings(&mut page, &options).unwrap();
                    black_box(items.len());
                },
                BatchSize::LargeInput,
            );
        });
        let mut scanned = gen_article(n);
        let _ = scan_headings(&mut scanned, &options).unwrap();
        group.bench_function(format!("rescan_n{n}"), |b| {
            b.iter(|| {
                let items = scan_headings(&mut scanned, &options).unwrap();
                black_box(items.len());
            });
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_selector_all");
    for &n in &[1000_usize, 5000] {
        let page = gen_article(n);
        let main = page.document().get_element_by_id("markdown-content").unwrap();
        group.throughput(Throughput::Elements(2 * n as u64));
        for selectors in ["h1, h2, h3, h4, h5, h6", "main > h2", "h1, h2[data-x]"] {
            group.bench_function(format!("{selectors}_n{n}"), |b| {
                b.iter(|| {
                    let hits = page.document().query_selector_all(main, selectors).unwrap();
                    black_box(hits.len());
                });
            });
        }
    }
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("active");
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for &n in &[8_usize, 64, 512] {
        let candidates: Vec<Candidate> = (0..n)
            .map(|i| {
                let top = rng.next_f64() * 800.0;
                Candidate {
                    id: format!("h-{i}"),
                    // Coarse ratios so near-ties are common.
                    ratio: (rng.next_f64() * 10.0).floor() / 10.0,
                    rect: Rect::new(0.0, top, 100.0, top + 30.0),
                }
            })
            .collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("select_candidate_n{n}"), |b| {
            b.iter(|| black_box(select_candidate(&candidates, "").map(|c| c.rect.y0)));
        });
    }

    // Nothing visible: every call falls back to fresh geometry.
    let items: Vec<TocItem<usize>> = (0..2000)
        .map(|i| TocItem {
            id: format!("h-{i}"),
            level: 2,
            text: format!("H {i}"),
            element: i,
        })
        .collect();
    group.bench_function("fallback_last_passed_n2000", |b| {
        b.iter(|| {
            let c = candidate_from_batch(&items, &[], "", |el| {
                let top = el as f64 * SECTION_H - 400_000.0;
                Some(Rect::new(0.0, top, 100.0, top + 30.0))
            });
            black_box(c.map(|c| c.id.len()));
        });
    });
    group.finish();
}

fn bench_slug(c: &mut Criterion) {
    let titles: Vec<String> = (0..1000)
        .map(|i| format!("  Chapter {i}: The Über-Quick  Guide (v{i}.0) -- Part_{i}  "))
        .collect();
    let mut group = c.benchmark_group("slug");
    group.throughput(Throughput::Elements(titles.len() as u64));
    group.bench_function("slugify_1000_titles", |b| {
        b.iter(|| {
            let total: usize = titles.iter().map(|t| slugify(t).len()).sum();
            black_box(total);
        });
    });
    group.finish();
}

fn bench_scroll_spy(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_spy");
    let n = 1000_usize;
    let steps: Vec<f64> = (0..200).map(|i| i as f64 * 1_900.0).collect();
    group.throughput(Throughput::Elements(steps.len() as u64));
    group.bench_function(format!("scroll_pump_n{n}"), |b| {
        b.iter_batched(
            || {
                let mut toc = TocController::new(gen_article(n), TocOptions::default());
                let _ = toc.on_frame(Duration::ZERO);
                toc
            },
            |mut toc| {
                let mut now = Duration::ZERO;
                for &y in &steps {
                    now += Duration::from_millis(200);
                    toc.host_mut().viewport_mut().scroll_to_y(y);
                    let batch: Vec<_> = take_intersection_entries(toc.host_mut());
                    let _ = toc.on_intersections(&batch, now);
                    if let Some(deadline) = toc.next_deadline() {
                        let _ = toc.on_timer(deadline);
                    }
                }
                black_box(toc.active_id().map(str::len));
            },
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_scan,
    bench_query,
    bench_select,
    bench_slug,
    bench_scroll_spy,
);
criterion_main!(benches);
