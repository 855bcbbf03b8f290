// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! URL fragment state with a minimal session history.
//!
//! Fragments are stored without the leading `#`.
//!
//! ```
//! use understory_doc_tree::Location;
//!
//! let mut loc = Location::new();
//! loc.set_hash("#intro");
//! assert_eq!(loc.hash(), "intro");
//! assert!(loc.take_hash_change());
//!
//! // Replacing does not add history and does not notify.
//! loc.replace_hash("usage");
//! assert!(!loc.take_hash_change());
//! assert_eq!(loc.history_len(), 2);
//! ```

use alloc::string::String;
use alloc::vec::Vec;

/// Current fragment plus back history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    hash: String,
    back: Vec<String>,
    changed: bool,
}

fn strip(hash: &str) -> &str {
    hash.strip_prefix('#').unwrap_or(hash)
}

impl Location {
    /// A location with an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A location that was loaded with `hash` (no pending change notification).
    pub fn with_hash(hash: &str) -> Self {
        Self {
            hash: String::from(strip(hash)),
            ..Self::default()
        }
    }

    /// Current fragment without `#`; empty when there is none.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Navigate to a new fragment: pushes a history entry and queues a change notification.
    ///
    /// Setting the current fragment again is a no-op, like in browsers.
    pub fn set_hash(&mut self, hash: &str) {
        let hash = strip(hash);
        if hash == self.hash {
            return;
        }
        let previous = core::mem::replace(&mut self.hash, String::from(hash));
        self.back.push(previous);
        self.changed = true;
    }

    /// Replace the fragment in place: no history entry, no change notification.
    pub fn replace_hash(&mut self, hash: &str) {
        self.hash = String::from(strip(hash));
    }

    /// Go back one history entry. Returns false when there is nothing to go back to.
    pub fn back(&mut self) -> bool {
        match self.back.pop() {
            Some(previous) => {
                self.changed |= previous != self.hash;
                self.hash = previous;
                true
            }
            None => false,
        }
    }

    /// Number of session history entries, including the current one.
    pub fn history_len(&self) -> usize {
        self.back.len() + 1
    }

    /// Returns and clears the pending change notification.
    pub fn take_hash_change(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }
}
