//! UniFFI bindings for the markdown-quill rendering engine.
//!
//! Exposes a `RenderContext` object with a render call and a last-failure
//! accessor, so host apps get a stable boundary without engine types
//! crossing the FFI.

use markdown_quill_engine::{Options, RenderError};
use std::sync::Mutex;

uniffi::setup_scaffolding!();

/// Errors that can cross the FFI boundary.
/// Note: field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Invalid encoding at byte {offset}")]
    InvalidEncoding { offset: u64 },
    #[error("Invalid options: {reason}")]
    InvalidOptions { reason: String },
    #[error("Allocation failure")]
    AllocationFailure,
}

impl From<RenderError> for FfiError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::InvalidEncoding { offset } => Self::InvalidEncoding {
                offset: offset as u64,
            },
            RenderError::InvalidOptions { reason } => Self::InvalidOptions { reason },
            RenderError::AllocationFailure => Self::AllocationFailure,
        }
    }
}

/// A render call context.
///
/// Each context keeps the failure message from its most recent render call;
/// contexts are independent and safe to share across threads.
#[derive(uniffi::Object)]
pub struct RenderContext {
    last_failure: Mutex<String>,
}

#[uniffi::export]
impl RenderContext {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self {
            last_failure: Mutex::new(String::new()),
        }
    }

    /// Renders Markdown to HTML.
    ///
    /// `options_json` is an optional JSON object (extensions, safe,
    /// hardbreaks); malformed JSON is an options error. The last-failure
    /// message is overwritten on every call, emptied on success.
    pub fn render(&self, markdown: String, options_json: Option<String>) -> Result<String, FfiError> {
        let result = try_render(&markdown, options_json.as_deref());
        // Recover from poisoned mutex (another thread panicked while holding lock)
        let mut last = self.last_failure.lock().unwrap_or_else(|e| e.into_inner());
        match &result {
            Ok(_) => last.clear(),
            Err(err) => *last = err.to_string(),
        }
        result
    }

    /// The failure message from the most recent render on this context,
    /// or an empty string.
    pub fn last_failure(&self) -> String {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        self.last_failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

fn try_render(markdown: &str, options_json: Option<&str>) -> Result<String, FfiError> {
    let value = match options_json {
        None => None,
        Some(text) => Some(serde_json::from_str::<serde_json::Value>(text).map_err(|e| {
            FfiError::InvalidOptions {
                reason: format!("configuration is not valid JSON: {e}"),
            }
        })?),
    };
    let options = Options::resolve(value.as_ref()).map_err(FfiError::from)?;
    markdown_quill_engine::render(markdown.as_bytes(), &options).map_err(FfiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_heading() {
        let ctx = RenderContext::new();
        let html = ctx.render("# Hello".to_string(), None).unwrap();
        assert_eq!(html, "<h1>Hello</h1>\n");
        assert_eq!(ctx.last_failure(), "");
    }

    #[test]
    fn test_options_json_is_applied() {
        let ctx = RenderContext::new();
        let html = ctx
            .render(
                "~~gone~~".to_string(),
                Some(r#"{"extensions": ["strikethrough"]}"#.to_string()),
            )
            .unwrap();
        assert_eq!(html, "<p><del>gone</del></p>\n");
    }

    #[test]
    fn test_malformed_json_is_an_options_error() {
        let ctx = RenderContext::new();
        let result = ctx.render("text".to_string(), Some("{not json".to_string()));
        assert!(matches!(result, Err(FfiError::InvalidOptions { .. })));
        assert!(ctx.last_failure().contains("Invalid options"));
    }

    #[test]
    fn test_wrong_typed_option_is_an_options_error() {
        let ctx = RenderContext::new();
        let result = ctx.render("text".to_string(), Some(r#"{"safe": "yes"}"#.to_string()));
        assert!(matches!(result, Err(FfiError::InvalidOptions { .. })));
    }

    #[test]
    fn test_last_failure_clears_on_success() {
        let ctx = RenderContext::new();
        let _ = ctx.render("x".to_string(), Some("{bad".to_string()));
        assert!(!ctx.last_failure().is_empty());
        ctx.render("x".to_string(), None).unwrap();
        assert_eq!(ctx.last_failure(), "");
    }

    #[test]
    fn test_contexts_are_independent() {
        let a = RenderContext::new();
        let b = RenderContext::new();
        let _ = a.render("x".to_string(), Some("{bad".to_string()));
        assert!(!a.last_failure().is_empty());
        assert_eq!(b.last_failure(), "");
    }
}
