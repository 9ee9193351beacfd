//! Inline syntax kinds.
//!
//! Each kind owns its delimiter characters and the recognition rules for
//! them, mirroring the block-side layout.

pub mod autolink;
pub mod code_span;
pub mod raw_html;

pub use autolink::{Autolink, BareUrl};
pub use code_span::CodeSpan;
pub use raw_html::RawHtmlTag;
