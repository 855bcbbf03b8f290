// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root margins: CSS-like offsets that grow or shrink the observation root.
//!
//! The syntax follows the `margin` shorthand with one to four lengths, each in `px` or `%`
//! (a bare `0` is also accepted). Percentages of top/bottom resolve against the root height,
//! left/right against the root width. Negative values shrink the root.
//!
//! ```
//! use kurbo::Rect;
//! use understory_doc_tree::RootMargin;
//!
//! let margin = RootMargin::parse("0px 0px -80% 0px").unwrap();
//! let root = margin.resolve(Rect::new(0.0, 0.0, 800.0, 1000.0));
//! assert_eq!(root, Rect::new(0.0, 0.0, 800.0, 200.0));
//! ```

use alloc::string::{String, ToString};
use kurbo::Rect;

/// Error produced when a root margin string is malformed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MarginError {
    /// Zero or more than four lengths.
    #[error("root margin must have one to four lengths, found {0}")]
    Arity(usize),
    /// A length without a `px`/`%` unit or with a non-finite number.
    #[error("invalid root margin length {0:?}")]
    Length(String),
}

/// A single margin length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of the root's extent along the same axis.
    Percent(f64),
}

impl Length {
    fn parse(token: &str) -> Result<Self, MarginError> {
        let invalid = || MarginError::Length(token.to_string());
        let (number, make): (&str, fn(f64) -> Self) = if let Some(n) = token.strip_suffix("px") {
            (n, Self::Px)
        } else if let Some(n) = token.strip_suffix('%') {
            (n, Self::Percent)
        } else if token == "0" {
            (token, Self::Px)
        } else {
            return Err(invalid());
        };
        let value: f64 = number.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(make(value))
    }

    fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => extent * p / 100.0,
        }
    }
}

/// Offsets applied to each edge of the observation root.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RootMargin {
    /// Top edge offset.
    pub top: Length,
    /// Right edge offset.
    pub right: Length,
    /// Bottom edge offset.
    pub bottom: Length,
    /// Left edge offset.
    pub left: Length,
}

impl Default for RootMargin {
    fn default() -> Self {
        let zero = Length::Px(0.0);
        Self {
            top: zero,
            right: zero,
            bottom: zero,
            left: zero,
        }
    }
}

impl RootMargin {
    /// Parse a margin shorthand.
    pub fn parse(input: &str) -> Result<Self, MarginError> {
        let mut lengths = [Length::Px(0.0); 4];
        let mut count = 0;
        for token in input.split_whitespace() {
            if count == 4 {
                return Err(MarginError::Arity(input.split_whitespace().count()));
            }
            lengths[count] = Length::parse(token)?;
            count += 1;
        }
        let [a, b, c, d] = lengths;
        let (top, right, bottom, left) = match count {
            1 => (a, a, a, a),
            2 => (a, b, a, b),
            3 => (a, b, c, b),
            4 => (a, b, c, d),
            n => return Err(MarginError::Arity(n)),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }

    /// Apply the margins to `root`. The result may be empty (inverted) when margins
    /// shrink past the opposite edge.
    pub fn resolve(&self, root: Rect) -> Rect {
        let w = root.width();
        let h = root.height();
        Rect::new(
            root.x0 - self.left.resolve(w),
            root.y0 - self.top.resolve(h),
            root.x1 + self.right.resolve(w),
            root.y1 + self.bottom.resolve(h),
        )
    }
}
