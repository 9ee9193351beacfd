//! Splits validated UTF-8 input into logical lines.
//!
//! Tabs are expanded to the next multiple of [`Scanner::TAB_STOP`] columns
//! during scanning so that every later stage can treat one byte of leading
//! whitespace as one column.

use crate::error::RenderError;

/// How a logical line was terminated in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    /// Last line of input with no trailing newline.
    Eof,
}

/// A logical line with tabs expanded and the terminator stripped.
#[derive(Debug, Clone)]
pub struct Line {
    /// Line text after tab expansion, without the line ending.
    pub text: String,
    /// Width in columns of the leading whitespace run.
    pub indent: usize,
    /// How the line was terminated.
    pub ending: LineEnding,
    /// 1-based source line number, for diagnostics only.
    pub number: usize,
}

impl Line {
    /// The line content with leading whitespace stripped.
    #[must_use]
    pub fn rest(&self) -> &str {
        &self.text[self.indent..]
    }

    /// True when the line contains nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Validates input bytes and hands out line iterators.
///
/// The scanner owns nothing beyond a borrowed view of the input; iterating
/// lines is restartable by calling [`Scanner::lines`] again.
#[derive(Debug)]
pub struct Scanner<'a> {
    text: &'a str,
}

impl<'a> Scanner<'a> {
    /// Column multiple tabs expand to.
    pub const TAB_STOP: usize = 4;

    /// Validates `input` as UTF-8.
    ///
    /// Fails with [`RenderError::InvalidEncoding`] at the first invalid byte;
    /// no lines are produced in that case.
    pub fn new(input: &'a [u8]) -> Result<Self, RenderError> {
        match std::str::from_utf8(input) {
            Ok(text) => Ok(Self { text }),
            Err(e) => Err(RenderError::InvalidEncoding {
                offset: e.valid_up_to(),
            }),
        }
    }

    /// Lazy iterator over logical lines, starting from the first line.
    pub fn lines(&self) -> Lines<'a> {
        Lines {
            rest: self.text,
            number: 0,
        }
    }
}

/// Iterator state for [`Scanner::lines`].
pub struct Lines<'a> {
    rest: &'a str,
    number: usize,
}

impl Iterator for Lines<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        if self.rest.is_empty() {
            return None;
        }
        self.number += 1;

        let (raw, ending, remainder) = match self.rest.find('\n') {
            Some(idx) => {
                let line = &self.rest[..idx];
                if line.ends_with('\r') {
                    (&line[..line.len() - 1], LineEnding::CrLf, &self.rest[idx + 1..])
                } else {
                    (line, LineEnding::Lf, &self.rest[idx + 1..])
                }
            }
            None => (self.rest, LineEnding::Eof, ""),
        };
        self.rest = remainder;

        let text = expand_tabs(raw);
        let indent = text.len() - text.trim_start_matches(' ').len();
        Some(Line {
            text,
            indent,
            ending,
            number: self.number,
        })
    }
}

/// Expands tabs to the next multiple of [`Scanner::TAB_STOP`] columns.
///
/// Non-ASCII characters count as one column, which is enough for marker and
/// indentation logic; rendered text is carried through untouched.
fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + Scanner::TAB_STOP);
    let mut col = 0usize;
    for ch in line.chars() {
        if ch == '\t' {
            let pad = Scanner::TAB_STOP - (col % Scanner::TAB_STOP);
            for _ in 0..pad {
                out.push(' ');
            }
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    out
}
