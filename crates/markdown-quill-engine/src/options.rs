//! Resolves the caller's configuration document into an immutable [`Options`]
//! record consumed by every later stage.

use serde_json::Value;

use crate::error::RenderError;

/// Extension flags understood by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extensions {
    pub tables: bool,
    pub strikethrough: bool,
    pub autolink: bool,
    pub tasklist: bool,
}

/// Immutable per-call options.
///
/// Defaults: all extensions off, safe mode off, soft line breaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub extensions: Extensions,
    /// Escape raw markup and suppress unsafe URL schemes in output.
    pub safe: bool,
    /// Render every newline inside a paragraph as a hard break.
    pub hardbreaks: bool,
}

impl Options {
    /// Resolves a structured configuration value.
    ///
    /// Unknown keys are ignored. A recognized key whose value has the wrong
    /// shape fails with [`RenderError::InvalidOptions`]. `None` and JSON
    /// `null` both yield the defaults.
    pub fn resolve(value: Option<&Value>) -> Result<Self, RenderError> {
        let value = match value {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(v) => v,
        };
        let map = value.as_object().ok_or_else(|| invalid("configuration must be an object"))?;

        let mut options = Self::default();
        if let Some(v) = map.get("extensions") {
            let list = v
                .as_array()
                .ok_or_else(|| invalid("`extensions` must be a list of strings"))?;
            for entry in list {
                let name = entry
                    .as_str()
                    .ok_or_else(|| invalid("`extensions` must be a list of strings"))?;
                // Unknown extension names are ignored.
                match name {
                    "tables" => options.extensions.tables = true,
                    "strikethrough" => options.extensions.strikethrough = true,
                    "autolink" => options.extensions.autolink = true,
                    "tasklist" => options.extensions.tasklist = true,
                    _ => {}
                }
            }
        }
        if let Some(v) = map.get("safe") {
            options.safe = v.as_bool().ok_or_else(|| invalid("`safe` must be a boolean"))?;
        }
        if let Some(v) = map.get("hardbreaks") {
            options.hardbreaks = v
                .as_bool()
                .ok_or_else(|| invalid("`hardbreaks` must be a boolean"))?;
        }
        Ok(options)
    }
}

fn invalid(reason: &str) -> RenderError {
    RenderError::InvalidOptions {
        reason: reason.to_string(),
    }
}
