// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The controller: one host, one live TOC, one active heading.
//!
//! ## Driving the controller
//!
//! The controller never reads a clock and never blocks. The host calls in when something
//! happens and applies the returned [`TocEvent`]s (typically by re-rendering):
//!
//! - [`TocController::on_frame`] on the next frame after a scan was scheduled
//!   (see [`TocController::is_loading`]).
//! - [`TocController::on_intersections`] when the visibility observer delivers a batch.
//! - [`TocController::on_hash_change`] when the URL fragment changes.
//! - [`TocController::on_timer`] at or after [`TocController::next_deadline`].
//!
//! ## Scan cycles
//!
//! Each scan opens a cycle owning the visibility subscription and any pending debounced
//! candidate. Changing a scan-relevant option, [`refresh`](TocController::refresh),
//! [`shutdown`](TocController::shutdown) and dropping the controller all end the current
//! cycle: the observer is disconnected and the pending candidate is dropped.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::time::Duration;

use crate::active::{ActiveSource, ActiveState, ActiveTracker, Signal, candidate_from_batch};
use crate::error::TocError;
use crate::navigate;
use crate::options::TocOptions;
use crate::scan::scan_headings;
use crate::types::{Host, IntersectionEntry, ObserverOptions, ScrollBehavior, TocItem, same_headings};

/// A change the consumer should react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TocEvent {
    /// The TOC content (ids, levels or texts) changed.
    HeadingsChanged,
    /// The active heading changed.
    ActiveChanged {
        /// New active id.
        id: Option<String>,
        /// Which stream set it.
        source: ActiveSource,
    },
    /// An error was captured; the message is also available from [`TocController::error`].
    Error(String),
    /// A scan was scheduled (`true`) or finished (`false`).
    LoadingChanged(bool),
}

impl From<ActiveState> for TocEvent {
    fn from(state: ActiveState) -> Self {
        Self::ActiveChanged {
            id: state.active_id,
            source: state.source,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ScanCycle {
    scan_pending: bool,
    observing: bool,
}

/// Live table of contents over a host document.
///
/// See the [module documentation](self) for how the host drives it.
pub struct TocController<H: Host> {
    host: H,
    options: TocOptions,
    headings: Vec<TocItem<H::Element>>,
    tracker: ActiveTracker,
    error: Option<String>,
    cycle: ScanCycle,
    // Set by the first completed scan; only that scan re-applies the URL fragment.
    scanned: bool,
}

impl<H: Host> core::fmt::Debug for TocController<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TocController")
            .field("options", &self.options)
            .field("headings", &self.headings)
            .field("active", self.tracker.state())
            .field("error", &self.error)
            .field("is_loading", &self.cycle.scan_pending)
            .finish_non_exhaustive()
    }
}

impl<H: Host> TocController<H> {
    /// Create a controller and schedule the first scan.
    ///
    /// A non-empty URL fragment becomes the active heading right away.
    pub fn new(host: H, options: TocOptions) -> Self {
        let mut this = Self {
            host,
            options,
            headings: Vec::new(),
            tracker: ActiveTracker::new(),
            error: None,
            cycle: ScanCycle {
                scan_pending: true,
                observing: false,
            },
            scanned: false,
        };
        let hash = this.current_hash();
        this.tracker.apply(
            Signal::Hash(hash),
            Duration::ZERO,
            this.options.debounce_delay,
            |_| true,
        );
        this
    }

    /// Current TOC, in document order.
    pub fn headings(&self) -> &[TocItem<H::Element>] {
        &self.headings
    }

    /// Current active heading id.
    pub fn active_id(&self) -> Option<&str> {
        self.tracker.active_id()
    }

    /// Current active heading and its source.
    pub fn active_state(&self) -> &ActiveState {
        self.tracker.state()
    }

    /// Message of the last captured error, cleared by a successful scan.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true while a scan is scheduled but has not run.
    pub fn is_loading(&self) -> bool {
        self.cycle.scan_pending
    }

    /// Current options.
    pub fn options(&self) -> &TocOptions {
        &self.options
    }

    /// When the host should call [`on_timer`](Self::on_timer) next.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tracker.deadline()
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably (for example to change the document before a [`refresh`](Self::refresh)).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Replace the options.
    ///
    /// A new scan is scheduled only if a scan-relevant option changed
    /// (see [`TocOptions::rescan_needed`]).
    pub fn set_options(&mut self, options: TocOptions) -> Vec<TocEvent> {
        let rescan = options.rescan_needed(&self.options);
        self.options = options;
        if rescan { self.restart() } else { Vec::new() }
    }

    /// End the current cycle and schedule a new scan.
    pub fn refresh(&mut self) -> Vec<TocEvent> {
        self.restart()
    }

    /// End the current cycle without scheduling another.
    ///
    /// The TOC and active heading are kept; a later [`refresh`](Self::refresh) resumes.
    pub fn shutdown(&mut self) -> Vec<TocEvent> {
        let was_loading = self.cycle.scan_pending;
        self.end_cycle();
        if was_loading {
            alloc::vec![TocEvent::LoadingChanged(false)]
        } else {
            Vec::new()
        }
    }

    /// Run the scheduled scan, if any.
    pub fn on_frame(&mut self, now: Duration) -> Vec<TocEvent> {
        if !self.cycle.scan_pending {
            return Vec::new();
        }
        self.cycle.scan_pending = false;

        let mut events = Vec::new();
        let previous = self.tracker.state().clone();
        let items = match scan_headings(&mut self.host, &self.options) {
            Ok(items) => {
                self.error = None;
                items
            }
            Err(err) => {
                events.extend(self.report(&err, "scan"));
                Vec::new()
            }
        };
        if !same_headings(&items, &self.headings) {
            events.push(TocEvent::HeadingsChanged);
        }
        self.headings = items;

        self.tracker.reset();
        // A deep link keeps precedence over the first batch after load. Later scans start
        // from nothing so the new subscription's first batch decides.
        if !core::mem::replace(&mut self.scanned, true) {
            let hash = self.current_hash();
            self.tracker
                .apply(Signal::Hash(hash), now, self.options.debounce_delay, |_| true);
        }
        if self.tracker.state() != &previous {
            events.push(self.tracker.state().clone().into());
        }

        if !self.headings.is_empty() {
            self.observe(&mut events);
        }
        events.push(TocEvent::LoadingChanged(false));
        events
    }

    /// Publish the debounced intersection candidate if it is due and still fresh.
    pub fn on_timer(&mut self, now: Duration) -> Vec<TocEvent> {
        let headings = &self.headings;
        self.tracker
            .fire(now, |id| contains(headings, id))
            .map(TocEvent::from)
            .into_iter()
            .collect()
    }

    /// Re-read the URL fragment; a non-empty fragment becomes active immediately.
    pub fn on_hash_change(&mut self, now: Duration) -> Vec<TocEvent> {
        let hash = self.current_hash();
        self.tracker
            .apply(Signal::Hash(hash), now, self.options.debounce_delay, |_| true)
            .map(TocEvent::from)
            .into_iter()
            .collect()
    }

    /// Feed a batch from the visibility observer.
    ///
    /// Batches arriving while no subscription is active are ignored.
    pub fn on_intersections(
        &mut self,
        batch: &[IntersectionEntry<H::Element>],
        now: Duration,
    ) -> Vec<TocEvent> {
        if !self.cycle.observing {
            return Vec::new();
        }
        let hash = self.current_hash();
        let host = &self.host;
        let Some(candidate) = candidate_from_batch(&self.headings, batch, &hash, |el| {
            host.bounding_client_rect(el)
        }) else {
            return Vec::new();
        };
        let headings = &self.headings;
        self.tracker
            .apply(
                Signal::Intersection(candidate),
                now,
                self.options.debounce_delay,
                |id| contains(headings, id),
            )
            .map(TocEvent::from)
            .into_iter()
            .collect()
    }

    /// Make `id` active immediately. Ids not in the TOC are ignored.
    pub fn set_active_heading(&mut self, id: &str, now: Duration) -> Vec<TocEvent> {
        let headings = &self.headings;
        self.tracker
            .apply(
                Signal::Programmatic(id.to_string()),
                now,
                self.options.debounce_delay,
                |id| contains(headings, id),
            )
            .map(TocEvent::from)
            .into_iter()
            .collect()
    }

    /// Scroll to the element with `id`, replace the URL fragment, focus it, and make it active.
    ///
    /// Does nothing if no element has that id.
    pub fn navigate_to_heading(
        &mut self,
        id: &str,
        behavior: ScrollBehavior,
        now: Duration,
    ) -> Vec<TocEvent> {
        if navigate::navigate_to_heading(&mut self.host, id, behavior).is_none() {
            return Vec::new();
        }
        self.set_active_heading(id, now)
    }

    fn current_hash(&self) -> String {
        let hash = self.host.hash();
        match hash.strip_prefix('#') {
            Some(stripped) => stripped.to_string(),
            None => hash,
        }
    }

    fn observe(&mut self, events: &mut Vec<TocEvent>) {
        let targets: Vec<_> = self.headings.iter().map(|h| h.element).collect();
        let options = ObserverOptions {
            root_margin: &self.options.root_margin,
            thresholds: self.options.threshold.as_slice(),
        };
        match self.host.observe(&targets, &options) {
            Ok(()) => self.cycle.observing = true,
            Err(e) => {
                let err = TocError::Observer { message: e.message };
                events.extend(self.report(&err, "observe"));
            }
        }
    }

    fn report(&mut self, err: &TocError, context: &str) -> Option<TocEvent> {
        if err.is_not_found() {
            log::warn!("{err}");
        } else {
            log::error!("{context}: {err}");
        }
        if !self.options.enable_error_handling {
            return None;
        }
        let message = err.to_string();
        self.error = Some(message.clone());
        if let Some(handler) = &self.options.on_error {
            handler.call(err, context);
        }
        Some(TocEvent::Error(message))
    }

    fn restart(&mut self) -> Vec<TocEvent> {
        let was_loading = self.cycle.scan_pending;
        self.end_cycle();
        self.cycle.scan_pending = true;
        if was_loading {
            Vec::new()
        } else {
            alloc::vec![TocEvent::LoadingChanged(true)]
        }
    }

    fn end_cycle(&mut self) {
        self.cycle.scan_pending = false;
        if core::mem::take(&mut self.cycle.observing) {
            self.host.disconnect();
        }
        self.tracker.cancel_pending();
    }
}

impl<H: Host> Drop for TocController<H> {
    fn drop(&mut self) {
        self.end_cycle();
    }
}

fn contains<E>(headings: &[TocItem<E>], id: &str) -> bool {
    headings.iter().any(|h| h.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{HEADING_HEIGHT, MockHost};
    use crate::options::ErrorHandler;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::Rect;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn options() -> TocOptions {
        TocOptions::for_container("content")
    }

    /// Container with headings `a`, `b`, `c` (generated ids) 400px apart.
    fn host() -> MockHost {
        let mut host = MockHost::with_container();
        host.heading("h1", None, "A", 0.0);
        host.heading("h2", None, "B", 400.0);
        host.heading("h2", None, "C", 800.0);
        host
    }

    fn scanned(host: MockHost) -> TocController<MockHost> {
        let mut toc = TocController::new(host, options());
        toc.on_frame(ms(0));
        toc
    }

    fn entry(el: usize, ratio: f64, top: f64) -> IntersectionEntry<usize> {
        IntersectionEntry {
            target: el,
            is_intersecting: ratio > 0.0,
            intersection_ratio: ratio,
            bounding_client_rect: Rect::new(0.0, top, 100.0, top + HEADING_HEIGHT),
        }
    }

    fn active(id: &str, source: ActiveSource) -> TocEvent {
        TocEvent::ActiveChanged {
            id: Some(id.into()),
            source,
        }
    }

    #[test]
    fn scan_runs_on_next_frame() {
        let mut toc = TocController::new(host(), options());
        assert!(toc.is_loading());
        assert!(toc.headings().is_empty());
        assert_eq!(toc.host().observe_calls, 0);

        let events = toc.on_frame(ms(0));
        assert_eq!(
            events,
            [TocEvent::HeadingsChanged, TocEvent::LoadingChanged(false)]
        );
        assert!(!toc.is_loading());
        let summary: Vec<_> = toc
            .headings()
            .iter()
            .map(|h| (h.id.as_str(), h.level, h.text.as_str()))
            .collect();
        assert_eq!(summary, [("a", 1, "A"), ("b", 2, "B"), ("c", 2, "C")]);
        assert_eq!(toc.host().observing, [1, 2, 3]);
        assert_eq!(toc.host().last_root_margin, "0px 0px -80% 0px");
        assert_eq!(toc.host().last_thresholds, [0.1]);
        assert_eq!(toc.error(), None);

        assert!(toc.on_frame(ms(16)).is_empty());
    }

    #[test]
    fn fragment_is_active_before_any_visibility_data() {
        let mut h = host();
        h.hash = "#b".into();
        let mut toc = TocController::new(h, options());
        assert_eq!(toc.active_id(), Some("b"));
        assert_eq!(toc.active_state().source, ActiveSource::Hash);
        // The scan re-applies the same fragment: no transition.
        let events = toc.on_frame(ms(0));
        assert!(!events.iter().any(|e| matches!(e, TocEvent::ActiveChanged { .. })));
        assert_eq!(toc.active_id(), Some("b"));
    }

    #[test]
    fn unknown_fragment_is_still_active() {
        let mut h = host();
        h.hash = "elsewhere".into();
        let toc = scanned(h);
        assert_eq!(toc.active_id(), Some("elsewhere"));
    }

    #[test]
    fn visible_fragment_target_beats_more_visible_heading() {
        let mut h = host();
        h.hash = "b".into();
        let mut toc = scanned(h);
        let batch = [entry(1, 1.0, 0.0), entry(2, 0.2, 100.0)];
        assert!(toc.on_intersections(&batch, ms(500)).is_empty());
        assert!(toc.on_timer(ms(600)).is_empty());
        assert_eq!(toc.active_id(), Some("b"));
    }

    #[test]
    fn fragment_beats_concurrent_batch_for_another_heading() {
        let mut h = host();
        h.hash = "b".into();
        let mut toc = scanned(h);
        toc.on_intersections(&[entry(1, 1.0, 0.0)], ms(10));
        assert!(toc.on_timer(ms(110)).is_empty());
        assert_eq!(toc.active_id(), Some("b"));
    }

    #[test]
    fn debounced_candidates_publish_once() {
        let mut toc = scanned(host());
        assert!(toc.on_intersections(&[entry(1, 0.5, 0.0)], ms(0)).is_empty());
        assert!(toc.on_intersections(&[entry(2, 0.5, 10.0)], ms(40)).is_empty());
        assert_eq!(toc.next_deadline(), Some(ms(140)));
        assert!(toc.on_timer(ms(100)).is_empty());
        assert_eq!(
            toc.on_timer(ms(140)),
            [active("b", ActiveSource::Intersection)]
        );
        assert!(toc.on_timer(ms(1000)).is_empty());
        assert_eq!(toc.next_deadline(), None);
    }

    #[test]
    fn zero_delay_publishes_from_the_batch() {
        let mut opts = options();
        opts.debounce_delay = Duration::ZERO;
        let mut toc = TocController::new(host(), opts);
        toc.on_frame(ms(0));
        assert_eq!(
            toc.on_intersections(&[entry(3, 0.4, 5.0)], ms(1)),
            [active("c", ActiveSource::Intersection)]
        );
    }

    #[test]
    fn nothing_visible_selects_last_passed_heading() {
        let mut toc = scanned(host());
        // Scrolled to 500: `b` sits 100px above the viewport top, `c` 300px below.
        toc.host_mut().scroll_y = 500.0;
        toc.on_intersections(&[entry(2, 0.0, -100.0)], ms(0));
        assert_eq!(
            toc.on_timer(ms(100)),
            [active("b", ActiveSource::Intersection)]
        );
    }

    #[test]
    fn hash_change_wins_over_pending_candidate() {
        let mut toc = scanned(host());
        toc.on_intersections(&[entry(1, 0.5, 0.0)], ms(0));
        toc.host_mut().hash = "c".into();
        assert_eq!(toc.on_hash_change(ms(50)), [active("c", ActiveSource::Hash)]);
        assert!(toc.on_timer(ms(100)).is_empty());
        assert_eq!(toc.active_id(), Some("c"));

        toc.host_mut().hash = String::new();
        assert!(toc.on_hash_change(ms(60)).is_empty());
        assert_eq!(toc.active_id(), Some("c"));
    }

    #[test]
    fn set_active_heading_validates() {
        let mut toc = scanned(host());
        assert!(toc.set_active_heading("nope", ms(0)).is_empty());
        assert_eq!(toc.active_id(), None);
        assert_eq!(
            toc.set_active_heading("c", ms(0)),
            [active("c", ActiveSource::Programmatic)]
        );
    }

    #[test]
    fn navigate_scrolls_sets_fragment_and_focuses() {
        let mut toc = scanned(host());
        let events = toc.navigate_to_heading("c", ScrollBehavior::Smooth, ms(0));
        assert_eq!(events, [active("c", ActiveSource::Programmatic)]);
        let h = toc.host();
        assert_eq!(h.hash, "c");
        assert_eq!(h.scrolls, [(3, ScrollBehavior::Smooth)]);
        assert_eq!(h.elements[3].tab_index, Some(-1));
        assert_eq!(h.focused, Some(3));
        assert!(h.focus_prevented_scroll);

        // The scroll reports other headings; the navigation target holds.
        toc.on_intersections(&[entry(2, 1.0, -10.0)], ms(20));
        assert!(toc.on_timer(ms(120)).is_empty());
        assert_eq!(toc.active_id(), Some("c"));

        assert!(toc.navigate_to_heading("missing", ScrollBehavior::Auto, ms(200)).is_empty());
    }

    #[test]
    fn missing_container_reports_error() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let opts = TocOptions {
            on_error: Some(ErrorHandler::new(move |err, ctx| {
                sink.borrow_mut().push((err.clone(), String::from(ctx)));
            })),
            ..TocOptions::for_container("missing")
        };
        let mut toc = TocController::new(host(), opts);
        let events = toc.on_frame(ms(0));
        let message = String::from("Container with id \"missing\" not found.");
        assert_eq!(
            events,
            [
                TocEvent::Error(message.clone()),
                TocEvent::LoadingChanged(false)
            ]
        );
        assert!(toc.headings().is_empty());
        assert_eq!(toc.error(), Some(message.as_str()));
        assert_eq!(toc.host().observe_calls, 0);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.is_not_found());
        assert_eq!(seen[0].1, "scan");
    }

    #[test]
    fn disabled_error_handling_only_logs() {
        let called = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&called);
        let opts = TocOptions {
            enable_error_handling: false,
            on_error: Some(ErrorHandler::new(move |_, _| *counter.borrow_mut() += 1)),
            ..TocOptions::for_container("missing")
        };
        let mut toc = TocController::new(host(), opts);
        assert_eq!(toc.on_frame(ms(0)), [TocEvent::LoadingChanged(false)]);
        assert_eq!(toc.error(), None);
        assert_eq!(*called.borrow(), 0);
    }

    #[test]
    fn invalid_selector_gives_empty_toc() {
        let mut toc = scanned(host());
        assert_eq!(toc.headings().len(), 3);
        let opts = TocOptions {
            selectors: "h2[".into(),
            ..options()
        };
        assert_eq!(toc.set_options(opts), [TocEvent::LoadingChanged(true)]);
        let events = toc.on_frame(ms(0));
        assert!(matches!(events[0], TocEvent::Error(_)));
        assert_eq!(events[1], TocEvent::HeadingsChanged);
        assert!(toc.headings().is_empty());
        assert!(toc.error().is_some());
    }

    #[test]
    fn observer_failure_is_reported_with_context() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut h = host();
        h.fail_observe = true;
        let opts = TocOptions {
            on_error: Some(ErrorHandler::new(move |_, ctx| {
                sink.borrow_mut().push(String::from(ctx));
            })),
            ..options()
        };
        let mut toc = TocController::new(h, opts);
        let events = toc.on_frame(ms(0));
        assert_eq!(toc.headings().len(), 3);
        assert!(events.contains(&TocEvent::Error(String::from(
            "cannot observe headings: rootMargin must be specified in pixels or percent"
        ))));
        assert_eq!(*seen.borrow(), ["observe"]);
        // No subscription, so batches are ignored.
        assert!(toc.on_intersections(&[entry(1, 1.0, 0.0)], ms(0)).is_empty());
        assert_eq!(toc.next_deadline(), None);
    }

    #[test]
    fn successful_scan_clears_error() {
        let mut toc = TocController::new(host(), TocOptions::for_container("missing"));
        toc.on_frame(ms(0));
        assert!(toc.error().is_some());
        toc.set_options(options());
        toc.on_frame(ms(0));
        assert_eq!(toc.error(), None);
        assert_eq!(toc.headings().len(), 3);
    }

    #[test]
    fn reconfiguration_tears_down_the_cycle() {
        let mut toc = scanned(host());
        let disconnects = Rc::clone(&toc.host().disconnects);
        toc.on_intersections(&[entry(1, 0.5, 0.0)], ms(0));
        assert!(toc.next_deadline().is_some());

        // Non-scan options apply in place.
        let slower = TocOptions {
            debounce_delay: ms(300),
            ..options()
        };
        assert!(toc.set_options(slower).is_empty());
        assert_eq!(disconnects.get(), 0);
        assert!(toc.next_deadline().is_some());

        let margin = TocOptions {
            root_margin: "0px".into(),
            ..options()
        };
        assert_eq!(toc.set_options(margin), [TocEvent::LoadingChanged(true)]);
        assert_eq!(disconnects.get(), 1);
        assert_eq!(toc.next_deadline(), None);
        assert!(toc.on_timer(ms(1000)).is_empty());
        // Stale batches from the old subscription are ignored.
        assert!(toc.on_intersections(&[entry(1, 0.5, 0.0)], ms(0)).is_empty());

        toc.on_frame(ms(1000));
        assert_eq!(toc.host().last_root_margin, "0px");
        assert_eq!(toc.host().observe_calls, 2);
    }

    #[test]
    fn refresh_picks_up_new_headings() {
        let mut toc = scanned(host());
        let events = toc.refresh();
        assert_eq!(events, [TocEvent::LoadingChanged(true)]);
        // Unchanged document: no content change.
        assert_eq!(toc.on_frame(ms(0)), [TocEvent::LoadingChanged(false)]);

        toc.host_mut().heading("h3", None, "D", 1200.0);
        toc.refresh();
        assert_eq!(
            toc.on_frame(ms(0)),
            [TocEvent::HeadingsChanged, TocEvent::LoadingChanged(false)]
        );
        assert_eq!(toc.headings()[3].id, "d");
    }

    #[test]
    fn rescan_resets_active_heading() {
        let mut toc = scanned(host());
        toc.on_intersections(&[entry(2, 0.5, 0.0)], ms(0));
        toc.on_timer(ms(100));
        assert_eq!(toc.active_id(), Some("b"));
        toc.refresh();
        let events = toc.on_frame(ms(200));
        assert!(events.contains(&TocEvent::ActiveChanged {
            id: None,
            source: ActiveSource::None
        }));
        assert_eq!(toc.active_id(), None);
    }

    #[test]
    fn rescan_lets_the_first_batch_override_an_old_fragment() {
        let mut h = host();
        h.hash = "a".into();
        let mut toc = scanned(h);
        assert_eq!(toc.active_id(), Some("a"));
        toc.on_intersections(&[entry(3, 0.5, 0.0)], ms(4900));
        toc.on_timer(ms(5000));
        assert_eq!(toc.active_id(), Some("c"));

        toc.refresh();
        let events = toc.on_frame(ms(6000));
        assert!(!events.contains(&active("a", ActiveSource::Hash)));
        assert_eq!(toc.active_id(), None);
        toc.on_intersections(&[entry(3, 0.5, 0.0)], ms(6016));
        assert_eq!(
            toc.on_timer(ms(6116)),
            [active("c", ActiveSource::Intersection)]
        );
    }

    #[test]
    fn fragment_change_after_rescan_still_wins() {
        let mut toc = scanned(host());
        toc.refresh();
        toc.on_frame(ms(10));
        toc.host_mut().hash = "c".into();
        assert_eq!(toc.on_hash_change(ms(20)), [active("c", ActiveSource::Hash)]);
        toc.on_intersections(&[entry(1, 1.0, 0.0)], ms(30));
        assert!(toc.on_timer(ms(130)).is_empty());
        assert_eq!(toc.active_id(), Some("c"));
    }

    #[test]
    fn empty_toc_is_not_observed() {
        let mut h = MockHost::with_container();
        h.heading("h2", None, "  ", 0.0);
        let toc = scanned(h);
        assert!(toc.headings().is_empty());
        assert_eq!(toc.host().observe_calls, 0);
    }

    #[test]
    fn shutdown_and_drop_disconnect() {
        let mut toc = scanned(host());
        let disconnects = Rc::clone(&toc.host().disconnects);
        assert!(toc.shutdown().is_empty());
        assert_eq!(disconnects.get(), 1);
        assert!(toc.on_intersections(&[entry(1, 1.0, 0.0)], ms(0)).is_empty());

        let toc = scanned(host());
        let disconnects = Rc::clone(&toc.host().disconnects);
        drop(toc);
        assert_eq!(disconnects.get(), 1);
    }

    #[test]
    fn shutdown_cancels_pending_scan() {
        let mut toc = TocController::new(host(), options());
        assert_eq!(toc.shutdown(), [TocEvent::LoadingChanged(false)]);
        assert!(toc.on_frame(ms(0)).is_empty());
        assert!(toc.headings().is_empty());
        assert_eq!(toc.refresh(), vec![TocEvent::LoadingChanged(true)]);
    }
}
