use thiserror::Error;

/// Errors a render call can surface to the caller.
///
/// Everything else — unmatched emphasis, unterminated links, unknown
/// extension syntax — degrades to literal text inside the pipeline and is
/// never reported here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("input is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidEncoding { offset: usize },

    #[error("invalid options: {reason}")]
    InvalidOptions { reason: String },

    #[error("allocation failed while building output")]
    AllocationFailure,
}
