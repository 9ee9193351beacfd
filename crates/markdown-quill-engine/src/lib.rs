//! Markdown rendering engine.
//!
//! Converts Markdown bytes plus a resolved [`Options`] document into HTML.
//! The pipeline is scanning, block-structure recognition, inline resolution,
//! and HTML emission; malformed constructs degrade to literal text and no
//! input shape can make a render call panic.

pub mod blocks;
pub mod doc;
pub mod error;
pub mod inline;
pub mod options;
pub mod refs;
pub mod render;
pub mod scanner;

// Re-export key types for easier usage
pub use doc::{Alignment, BlockId, BlockKind, BlockNode, Document, ListKind};
pub use error::RenderError;
pub use inline::InlineNode;
pub use options::{Extensions, Options};
pub use refs::{LinkRef, RefMap};
pub use scanner::Scanner;

/// Renders Markdown bytes to an HTML string.
///
/// Deterministic for identical inputs. The only failures are invalid UTF-8
/// input and a refused output allocation; everything else renders.
pub fn render(input: &[u8], options: &Options) -> Result<String, RenderError> {
    let scanner = Scanner::new(input)?;
    let mut doc = blocks::parse_blocks(&scanner, options);
    inline::resolve(&mut doc, options);
    render::render_html(&doc, options)
}
