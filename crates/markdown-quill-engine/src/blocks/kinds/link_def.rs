use crate::refs::RefMap;

/// Link-reference definition recognition (`[label]: dest "title"`).
///
/// Definitions only occur at the head of a paragraph; once a line fails to
/// parse as one, the rest of the text is ordinary paragraph content.
pub struct LinkDef;

impl LinkDef {
    pub const MAX_LABEL_LEN: usize = 999;

    /// Strips leading definitions from a closed paragraph's raw text into
    /// `refs`, returning the remaining paragraph content (possibly empty).
    pub fn extract(raw: &str, refs: &mut RefMap) -> String {
        let mut rest = raw;
        while let Some((label, dest, title, consumed)) = Self::parse_one(rest) {
            refs.insert(label, dest.to_string(), title);
            rest = &rest[consumed..];
        }
        rest.to_string()
    }

    /// Parses one definition at the start of `text`.
    ///
    /// Returns the label, destination, optional title, and bytes consumed
    /// including the trailing newline.
    fn parse_one(text: &str) -> Option<(&str, &str, Option<String>, usize)> {
        let bytes = text.as_bytes();
        let mut i = 0usize;
        while i < bytes.len() && bytes[i] == b' ' && i < 3 {
            i += 1;
        }
        if bytes.get(i) != Some(&b'[') {
            return None;
        }
        i += 1;
        let label_start = i;
        while i < bytes.len() && bytes[i] != b']' {
            if bytes[i] == b'\\' && i + 1 < bytes.len() {
                i += 1;
            }
            if bytes[i] == b'[' {
                return None;
            }
            i += 1;
        }
        if i >= bytes.len() || i - label_start > Self::MAX_LABEL_LEN {
            return None;
        }
        let label = &text[label_start..i];
        if label.trim().is_empty() {
            return None;
        }
        i += 1;
        if bytes.get(i) != Some(&b':') {
            return None;
        }
        i += 1;

        // Destination may sit on the same line or the next one.
        i = skip_spaces(bytes, i);
        if bytes.get(i) == Some(&b'\n') {
            i = skip_spaces(bytes, i + 1);
        }
        let (dest, mut i) = parse_destination(text, i)?;

        // Optional title on the same line; it may span lines once opened.
        let after_dest = skip_spaces(bytes, i);
        if let Some((title, end)) = parse_title(text, after_dest) {
            let line_end = skip_spaces(bytes, end);
            if line_end >= bytes.len() {
                return Some((label, dest, Some(title), line_end));
            }
            if bytes[line_end] == b'\n' {
                return Some((label, dest, Some(title), line_end + 1));
            }
            return None;
        }

        // No title: the destination must end its line.
        i = after_dest;
        if i >= bytes.len() {
            return Some((label, dest, None, i));
        }
        if bytes[i] == b'\n' {
            return Some((label, dest, None, i + 1));
        }
        None
    }
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    i
}

/// Reads a destination: `<...>` or a run of non-whitespace characters.
fn parse_destination(text: &str, i: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(i) == Some(&b'<') {
        let start = i + 1;
        let mut j = start;
        while j < bytes.len() && bytes[j] != b'>' && bytes[j] != b'\n' {
            j += 1;
        }
        if bytes.get(j) == Some(&b'>') {
            return Some((&text[start..j], j + 1));
        }
        return None;
    }
    let start = i;
    let mut j = i;
    while j < bytes.len() && !bytes[j].is_ascii_whitespace() {
        j += 1;
    }
    if j == start {
        return None;
    }
    Some((&text[start..j], j))
}

/// Reads a quoted or parenthesized title starting at `i`.
fn parse_title(text: &str, i: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    let open = *bytes.get(i)?;
    let close = match open {
        b'"' => b'"',
        b'\'' => b'\'',
        b'(' => b')',
        _ => return None,
    };
    let start = i + 1;
    let mut j = start;
    while j < bytes.len() && bytes[j] != close {
        j += 1;
    }
    if j >= bytes.len() {
        return None;
    }
    Some((text[start..j].to_string(), j + 1))
}
