// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slugs: URL-safe identifiers derived from heading text.
//!
//! ```
//! use understory_toc::slug::{default_id_generator, slugify};
//!
//! assert_eq!(slugify("Hello World!"), "hello-world");
//! assert_eq!(slugify("Section 2.1"), "section-21");
//! assert_eq!(slugify("Special@#$%"), "special");
//! assert_eq!(default_id_generator("Getting Started", 2, 1), "getting-started");
//! assert_eq!(default_id_generator("¿?", 1, 2), "heading-1-2");
//! ```

use alloc::format;
use alloc::string::String;

/// Lowercase `text`, keep ASCII letters, digits and separators, and join words with `-`.
///
/// Characters other than ASCII alphanumerics, `_`, `-` and whitespace are removed.
/// Runs of whitespace, `_` and `-` collapse to a single `-`, and the result never starts
/// or ends with `-`. Empty input (or input with nothing to keep) yields an empty string.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut separator = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            separator = true;
        } else if c.is_ascii_alphanumeric() {
            if separator && !out.is_empty() {
                out.push('-');
            }
            separator = false;
            out.push(c);
        }
        // Removed characters do not end a separator run.
    }
    out
}

/// Identifier for a heading: its slug, or `heading-{level}-{index}` when the slug is empty.
///
/// Never returns an empty string.
pub fn default_id_generator(text: &str, level: u8, index: usize) -> String {
    let slug = slugify(text);
    if slug.is_empty() {
        format!("heading-{level}-{index}")
    } else {
        slug
    }
}
