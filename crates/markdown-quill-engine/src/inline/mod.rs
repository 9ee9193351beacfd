//! Inline-structure recognition.
//!
//! Runs after block parsing: every leaf block that carries inline content
//! gets its raw text resolved into a tree of [`InlineNode`]s, using the
//! link-reference definitions collected by the block pass.

pub mod cursor;
pub mod emphasis;
pub mod kinds;
pub mod parser;
pub mod types;

pub use emphasis::MAX_INLINE_DEPTH;
pub use parser::{InlineParser, MAX_BRACKET_DEPTH};
pub use types::InlineNode;

use crate::doc::Document;
use crate::options::Options;

/// Resolves inline content for every leaf block in the document.
pub fn resolve(doc: &mut Document, options: &Options) {
    let ids: Vec<_> = doc.ids().collect();
    let refs = std::mem::take(&mut doc.refs);
    let parser = InlineParser::new(&refs, options);
    for id in ids {
        let node = doc.get(id);
        if !node.kind.has_inline_content() {
            continue;
        }
        let raw = node.raw.clone();
        doc.get_mut(id).inlines = parser.parse(&raw);
    }
    doc.refs = refs;
}
