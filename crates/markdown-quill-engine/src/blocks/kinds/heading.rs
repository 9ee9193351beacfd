/// ATX (`#`) heading recognition.
pub struct AtxHeading;

impl AtxHeading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: u8 = 6;

    /// Tries to read an ATX heading from `rest` (text after leading indent).
    ///
    /// Returns the level and the heading text with closing hashes trimmed.
    pub fn parse(rest: &str) -> Option<(u8, String)> {
        let level = rest.chars().take_while(|c| *c == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL as usize {
            return None;
        }
        let after = &rest[level..];
        if !after.is_empty() && !after.starts_with(' ') {
            return None;
        }
        let text = after.trim();
        // Trim a closing hash run, but only if it is its own word.
        let text = match text.trim_end_matches(Self::MARKER) {
            closed if closed.len() < text.len() => {
                if closed.is_empty() {
                    closed
                } else if closed.ends_with(' ') {
                    closed.trim_end()
                } else {
                    text
                }
            }
            _ => text,
        };
        Some((level as u8, text.to_string()))
    }
}

/// Setext underline recognition (`===` / `---` under a paragraph).
pub struct SetextUnderline;

impl SetextUnderline {
    /// Returns the heading level the underline produces, if `rest` is an
    /// underline: a run of `=` (level 1) or `-` (level 2) and nothing else.
    pub fn level(rest: &str) -> Option<u8> {
        let trimmed = rest.trim_end();
        let ch = trimmed.chars().next()?;
        let level = match ch {
            '=' => 1,
            '-' => 2,
            _ => return None,
        };
        if trimmed.chars().all(|c| c == ch) {
            Some(level)
        } else {
            None
        }
    }
}
