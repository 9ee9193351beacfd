//! HTML output.

pub mod escape;
pub mod html;

pub use html::render_html;
