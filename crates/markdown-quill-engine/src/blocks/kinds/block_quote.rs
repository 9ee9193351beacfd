/// Block quote marker recognition.
pub struct QuoteMarker;

impl QuoteMarker {
    pub const PREFIX: char = '>';

    /// Maximum indentation before a marker still counts as one.
    pub const MAX_INDENT: usize = 3;

    /// Tries to consume one quote marker at the start of `text`.
    ///
    /// Accepts up to three leading spaces, the `>` character, and one
    /// optional following space. Returns the number of bytes consumed.
    pub fn strip(text: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        let mut i = 0usize;
        while i < bytes.len() && bytes[i] == b' ' && i < Self::MAX_INDENT {
            i += 1;
        }
        if bytes.get(i) != Some(&(Self::PREFIX as u8)) {
            return None;
        }
        i += 1;
        if bytes.get(i) == Some(&b' ') {
            i += 1;
        }
        Some(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_plain_marker() {
        assert_eq!(QuoteMarker::strip("> hello"), Some(2));
    }

    #[test]
    fn strips_marker_without_space() {
        assert_eq!(QuoteMarker::strip(">hello"), Some(1));
    }

    #[test]
    fn allows_up_to_three_leading_spaces() {
        assert_eq!(QuoteMarker::strip("   > x"), Some(5));
        assert_eq!(QuoteMarker::strip("    > x"), None);
    }

    #[test]
    fn rejects_non_marker() {
        assert_eq!(QuoteMarker::strip("plain"), None);
    }
}
