//! Block-level syntax knowledge.
//!
//! Each construct owns its marker constants and recognition rules here; the
//! tree builder composes them but never hardcodes delimiter characters.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod html_block;
pub mod link_def;
pub mod list;
pub mod table;
pub mod thematic_break;

pub use block_quote::QuoteMarker;
pub use code_fence::{CodeFence, Fence};
pub use heading::{AtxHeading, SetextUnderline};
pub use html_block::HtmlBlockStart;
pub use link_def::LinkDef;
pub use list::{ListMarker, TaskMarker};
pub use table::{DelimiterRow, TableRowLine};
pub use thematic_break::ThematicBreakRule;
