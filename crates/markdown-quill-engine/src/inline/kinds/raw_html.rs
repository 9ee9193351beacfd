/// Inline raw markup recognition.
///
/// A deliberately small dialect: open/close tags, comments, processing
/// instructions, and declarations. Anything else starting with `<` is plain
/// text.
pub struct RawHtmlTag;

impl RawHtmlTag {
    /// Tries to read one tag at the start of `text`, which must begin with
    /// `<`. Returns the bytes consumed, including the closing `>`.
    pub fn parse(text: &str) -> Option<usize> {
        let bytes = text.as_bytes();
        if bytes.first() != Some(&b'<') {
            return None;
        }
        if let Some(rest) = text.strip_prefix("<!--") {
            let end = rest.find("-->")?;
            return Some(4 + end + 3);
        }
        if text.starts_with("<?") {
            let end = text.find("?>")?;
            return Some(end + 2);
        }
        match bytes.get(1)? {
            b'!' => {
                if !bytes.get(2)?.is_ascii_alphabetic() {
                    return None;
                }
                Some(Self::until_close(text, 2)?)
            }
            b'/' => {
                Self::tag_name_len(&text[2..])?;
                Some(Self::until_close(text, 2)?)
            }
            c if c.is_ascii_alphabetic() => {
                Self::tag_name_len(&text[1..])?;
                Some(Self::until_close(text, 1)?)
            }
            _ => None,
        }
    }

    /// Tag names are a letter followed by letters, digits, and hyphens.
    fn tag_name_len(text: &str) -> Option<usize> {
        let mut len = 0usize;
        for (i, ch) in text.char_indices() {
            if i == 0 {
                if !ch.is_ascii_alphabetic() {
                    return None;
                }
            } else if !ch.is_ascii_alphanumeric() && ch != '-' {
                break;
            }
            len = i + ch.len_utf8();
        }
        if len == 0 { None } else { Some(len) }
    }

    /// Scans for the closing `>` from `from`, rejecting a nested `<`.
    fn until_close(text: &str, from: usize) -> Option<usize> {
        for (i, ch) in text[from..].char_indices() {
            match ch {
                '>' => return Some(from + i + 1),
                '<' => return None,
                _ => {}
            }
        }
        None
    }
}
