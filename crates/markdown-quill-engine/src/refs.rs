//! Document-wide link-reference map.
//!
//! Built during block parsing from link-reference definitions, which are
//! stripped from the visible tree. Read-only once inline resolution starts.

use std::collections::HashMap;

/// Target of a reference-style link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub dest: String,
    pub title: Option<String>,
}

/// Mapping from normalized reference label to link target.
#[derive(Debug, Default)]
pub struct RefMap {
    map: HashMap<String, LinkRef>,
}

impl RefMap {
    /// Records a definition. The first definition of a label wins.
    pub fn insert(&mut self, label: &str, dest: String, title: Option<String>) {
        self.map
            .entry(normalize_label(label))
            .or_insert(LinkRef { dest, title });
    }

    /// Looks up a label as written in a reference link.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Option<&LinkRef> {
        self.map.get(&normalize_label(label))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Case-folds a label and collapses interior whitespace runs to one space.
fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut pending_space = false;
    for ch in label.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }
    out
}
