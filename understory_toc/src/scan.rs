// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Heading discovery and id assignment.
//!
//! [`scan_headings`] turns the headings under the configured container into a TOC:
//!
//! - Headings whose trimmed text is empty are skipped.
//! - Headings without an id get one from the configured generator (when enabled).
//!   Collisions with ids seen earlier in the scan, or present anywhere in the document,
//!   get a `-1`, `-2`, … suffix. The id is written back to the element.
//! - Headings still without an id are skipped, and the first heading wins for a repeated id.
//! - The level comes from the tag name (`h1`..`h6`); other tags are skipped.

use alloc::collections::BTreeSet;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::TocError;
use crate::options::TocOptions;
use crate::types::{DocumentAccess, TocItem};

/// Scan the container named by `options.container_id` and build the TOC.
///
/// Generated ids are written to the host document.
pub fn scan_headings<D>(host: &mut D, options: &TocOptions) -> Result<Vec<TocItem<D::Element>>, TocError>
where
    D: DocumentAccess + ?Sized,
{
    let container =
        host.element_by_id(&options.container_id)
            .ok_or_else(|| TocError::ContainerNotFound {
                container_id: options.container_id.clone(),
            })?;

    let matched = host
        .query_selector_all(container, &options.selectors)
        .map_err(|e| TocError::InvalidSelector {
            selectors: options.selectors.clone(),
            message: e.message,
        })?;

    let texts: Vec<(D::Element, String)> = matched
        .into_iter()
        .filter_map(|el| {
            let text = host.text_content(el).trim().to_string();
            (!text.is_empty()).then_some((el, text))
        })
        .collect();

    // Ids already in the document, collected once; generated ids join `seen`.
    let existing = host.document_ids();
    let mut seen = BTreeSet::new();
    let mut identified = Vec::with_capacity(texts.len());
    for (index, (el, text)) in texts.into_iter().enumerate() {
        let tag = host.tag_name(el);
        let level = heading_level(&tag);
        let id = match host.element_id(el) {
            Some(id) => Some(id),
            None if options.generate_ids => {
                let base = options
                    .id_generator
                    .generate(&text, level.unwrap_or(0), index);
                if base.is_empty() {
                    None
                } else {
                    let id = unique_id(&existing, &seen, &base);
                    host.set_element_id(el, &id)
                        .map_err(|e| TocError::Unexpected { message: e.message })?;
                    Some(id)
                }
            }
            None => None,
        };
        if let Some(id) = id {
            seen.insert(id.clone());
            identified.push((el, id, level, text));
        }
    }

    let mut emitted = BTreeSet::new();
    let items: Vec<_> = identified
        .into_iter()
        .filter_map(|(element, id, level, text)| {
            let level = level?;
            emitted.insert(id.clone()).then_some(TocItem {
                id,
                level,
                text,
                element,
            })
        })
        .collect();

    log::debug!(
        "scanned {} headings in #{} with `{}`",
        items.len(),
        options.container_id,
        options.selectors
    );
    Ok(items)
}

/// Heading level from a tag name: the digits after the first character, if in `1..=6`.
///
/// ```
/// use understory_toc::scan::heading_level;
///
/// assert_eq!(heading_level("h2"), Some(2));
/// assert_eq!(heading_level("H6"), Some(6));
/// assert_eq!(heading_level("h7"), None);
/// assert_eq!(heading_level("div"), None);
/// ```
pub fn heading_level(tag: &str) -> Option<u8> {
    let mut chars = tag.chars();
    chars.next()?;
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u8>().ok().filter(|l| (1..=6).contains(l))
}

fn unique_id(existing: &BTreeSet<String>, seen: &BTreeSet<String>, base: &str) -> String {
    let taken = |id: &str| seen.contains(id) || existing.contains(id);
    if !taken(base) {
        return base.to_string();
    }
    let mut counter = 1_usize;
    loop {
        let id = format!("{base}-{counter}");
        if !taken(&id) {
            return id;
        }
        counter += 1;
    }
}
