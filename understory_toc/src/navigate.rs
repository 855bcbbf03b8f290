// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation to a heading: scroll, fragment, focus.

use crate::types::{Host, ScrollBehavior};

/// Bring the element with `id` to the top of the viewport and give it keyboard focus.
///
/// The lookup is document-wide, not limited to the TOC. On success the URL fragment is
/// replaced with `id` without a history entry, the element is made focusable if needed and
/// focused without a second scroll, and the element is returned. An unknown id does nothing.
pub fn navigate_to_heading<H>(host: &mut H, id: &str, behavior: ScrollBehavior) -> Option<H::Element>
where
    H: Host + ?Sized,
{
    let Some(el) = host.element_by_id(id) else {
        log::debug!("cannot navigate to `{id}`: no such element");
        return None;
    };
    host.scroll_into_view(el, behavior);
    host.replace_hash(id);
    host.make_focusable(el);
    host.focus(el, true);
    Some(el)
}
