use crate::inline::kinds::Autolink;

/// Raw HTML block recognition.
///
/// The dialect is deliberately coarse: a line whose first character is `<`
/// followed by a tag name, `/`, `!`, or `?` starts an HTML block, which runs
/// until the next blank line. Everything inside is carried verbatim.
pub struct HtmlBlockStart;

impl HtmlBlockStart {
    pub const OPEN: char = '<';

    /// True when `rest` (text after leading indent) starts an HTML block.
    pub fn matches(rest: &str) -> bool {
        let mut chars = rest.chars();
        if chars.next() != Some(Self::OPEN) {
            return false;
        }
        match chars.next() {
            Some('/') | Some('!') | Some('?') => true,
            Some(c) if c.is_ascii_alphabetic() => !Self::opens_autolink(rest),
            _ => false,
        }
    }

    /// `<scheme:...>` and `<user@host>` lines belong to the inline parser.
    fn opens_autolink(rest: &str) -> bool {
        let Some(gt) = rest.find('>') else {
            return false;
        };
        let inner = &rest[1..gt];
        Autolink::is_uri(inner) || Autolink::is_email(inner)
    }
}
