// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport: a scrollable window onto document coordinates.

use kurbo::{Rect, Size, Vec2};

/// How a scroll should be animated.
///
/// A headless viewport jumps immediately for every mode; the mode is recorded
/// so callers can assert on what was requested.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScrollMode {
    /// Host default.
    Auto,
    /// Animated scroll.
    #[default]
    Smooth,
    /// Immediate jump.
    Instant,
}

/// A vertical/horizontal scroll window of a fixed size.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    size: Size,
    offset: Vec2,
    last_scroll: Option<ScrollMode>,
}

impl Viewport {
    /// A viewport of `size` scrolled to the origin.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
            last_scroll: None,
        }
    }

    /// Viewport size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Resize the viewport, keeping the scroll offset.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Current scroll offset (document coordinates of the viewport's top-left corner).
    pub fn scroll_offset(&self) -> Vec2 {
        self.offset
    }

    /// The mode of the most recent programmatic scroll, if any.
    pub fn last_scroll_mode(&self) -> Option<ScrollMode> {
        self.last_scroll
    }

    /// Scroll so the viewport's top edge sits at document `y`.
    ///
    /// Negative offsets clamp to zero.
    pub fn scroll_to_y(&mut self, y: f64) {
        self.offset.y = y.max(0.0);
    }

    /// The viewport in client coordinates (origin at its top-left corner).
    pub fn client_bounds(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.size)
    }

    /// The viewport in document coordinates.
    pub fn document_bounds(&self) -> Rect {
        self.client_bounds() + self.offset
    }

    /// Convert a document-space rect into client coordinates.
    pub fn to_client(&self, rect: Rect) -> Rect {
        rect - self.offset
    }

    /// Scroll so `target` (document coordinates) is aligned to the top edge.
    ///
    /// When `content` is given the offset clamps so the viewport never scrolls past
    /// the end of the content.
    pub fn scroll_into_view(&mut self, target: Rect, content: Option<Rect>, mode: ScrollMode) {
        let mut y = target.y0;
        if let Some(content) = content {
            y = y.min((content.y1 - self.size.height).max(0.0));
        }
        self.scroll_to_y(y);
        self.last_scroll = Some(mode);
    }
}
