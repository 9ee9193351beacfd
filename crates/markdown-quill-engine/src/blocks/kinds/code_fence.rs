/// An open code fence: which character, how many, and at what indent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    pub ch: char,
    pub len: usize,
    /// Indentation of the opening fence; stripped from content lines.
    pub indent: usize,
}

/// Fenced code block recognition.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: char = '`';
    pub const TILDE: char = '~';

    /// Minimum run length for a fence.
    pub const MIN_LEN: usize = 3;

    /// Tries to read a fence opener from `rest` (text after leading indent).
    ///
    /// Returns the fence and the info string that follows it. An info string
    /// containing a backtick disqualifies a backtick fence.
    pub fn open(rest: &str, indent: usize) -> Option<(Fence, String)> {
        let ch = rest.chars().next()?;
        if ch != Self::BACKTICK && ch != Self::TILDE {
            return None;
        }
        let len = rest.chars().take_while(|c| *c == ch).count();
        if len < Self::MIN_LEN {
            return None;
        }
        let info = rest[len..].trim();
        if ch == Self::BACKTICK && info.contains(Self::BACKTICK) {
            return None;
        }
        Some((Fence { ch, len, indent }, info.to_string()))
    }

    /// True when `rest` closes the given open fence: a run of the same
    /// character at least as long, and nothing but whitespace after.
    pub fn closes(fence: Fence, rest: &str) -> bool {
        let run = rest.chars().take_while(|c| *c == fence.ch).count();
        run >= fence.len && rest[run..].trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_backtick_fence_with_info() {
        let (fence, info) = CodeFence::open("```rust", 0).unwrap();
        assert_eq!(fence.ch, '`');
        assert_eq!(fence.len, 3);
        assert_eq!(info, "rust");
    }

    #[test]
    fn opens_tilde_fence() {
        let (fence, info) = CodeFence::open("~~~~", 2).unwrap();
        assert_eq!(fence.ch, '~');
        assert_eq!(fence.len, 4);
        assert_eq!(fence.indent, 2);
        assert_eq!(info, "");
    }

    #[test]
    fn two_characters_are_not_a_fence() {
        assert!(CodeFence::open("``x``", 0).is_none());
    }

    #[test]
    fn backtick_info_string_disqualifies() {
        assert!(CodeFence::open("``` a`b", 0).is_none());
        assert!(CodeFence::open("~~~ a`b", 0).is_some());
    }

    #[test]
    fn closing_run_must_be_at_least_as_long() {
        let (fence, _) = CodeFence::open("````", 0).unwrap();
        assert!(!CodeFence::closes(fence, "```"));
        assert!(CodeFence::closes(fence, "````"));
        assert!(CodeFence::closes(fence, "`````  "));
    }

    #[test]
    fn closer_allows_no_trailing_text() {
        let (fence, _) = CodeFence::open("```", 0).unwrap();
        assert!(!CodeFence::closes(fence, "``` done"));
    }
}
