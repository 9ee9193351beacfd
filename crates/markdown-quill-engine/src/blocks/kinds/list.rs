use crate::doc::ListKind;

/// A recognized list item marker and the content geometry it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: ListKind,
    /// Column width of the marker itself (`-` is 1, `12.` is 3).
    pub width: usize,
    /// Spaces between the marker and the content (1 when the rest of the
    /// line is empty, clamped so heavily padded items still nest sanely).
    pub padding: usize,
}

impl ListMarker {
    pub const BULLETS: [char; 3] = ['-', '+', '*'];
    pub const ORDERED_DELIMS: [char; 2] = ['.', ')'];

    /// Longest digit run accepted for an ordered marker.
    pub const MAX_DIGITS: usize = 9;

    /// Padding wider than this binds the content to column 1 after the
    /// marker, treating the rest as indented code inside the item.
    pub const MAX_PADDING: usize = 4;

    /// Tries to read a list marker from `rest` (text after leading indent).
    pub fn parse(rest: &str) -> Option<Self> {
        let first = rest.chars().next()?;
        let (kind, width) = if Self::BULLETS.contains(&first) {
            (ListKind::Bullet { marker: first }, 1)
        } else if first.is_ascii_digit() {
            let digits = rest.chars().take_while(char::is_ascii_digit).count();
            if digits > Self::MAX_DIGITS {
                return None;
            }
            let delim = rest.chars().nth(digits)?;
            if !Self::ORDERED_DELIMS.contains(&delim) {
                return None;
            }
            let start: u64 = rest[..digits].parse().ok()?;
            (ListKind::Ordered { start, delim }, digits + 1)
        } else {
            return None;
        };

        let after = &rest[width..];
        if after.is_empty() {
            return Some(Self { kind, width, padding: 1 });
        }
        let spaces = after.chars().take_while(|c| *c == ' ').count();
        if spaces == 0 {
            return None;
        }
        let padding = if spaces > Self::MAX_PADDING || after[spaces..].is_empty() {
            1
        } else {
            spaces
        };
        Some(Self { kind, width, padding })
    }

    /// Indent of the item's content relative to the marker start.
    #[must_use]
    pub fn content_indent(&self) -> usize {
        self.width + self.padding
    }

    /// Two markers continue the same list when the bullet character or the
    /// ordered delimiter matches.
    pub fn compatible(a: ListKind, b: ListKind) -> bool {
        match (a, b) {
            (ListKind::Bullet { marker: x }, ListKind::Bullet { marker: y }) => x == y,
            (ListKind::Ordered { delim: x, .. }, ListKind::Ordered { delim: y, .. }) => x == y,
            _ => false,
        }
    }
}

/// Task checkbox (`[ ]`, `[x]`) at the start of a list item's content.
pub struct TaskMarker;

impl TaskMarker {
    /// Tries to read a task checkbox from `rest` (item content after the
    /// list marker). Returns the checked state and the bytes consumed,
    /// including the space separating the checkbox from the item text.
    pub fn parse(rest: &str) -> Option<(bool, usize)> {
        let bytes = rest.as_bytes();
        if bytes.first() != Some(&b'[') || bytes.get(2) != Some(&b']') {
            return None;
        }
        let checked = match bytes.get(1)? {
            b' ' => false,
            b'x' | b'X' => true,
            _ => return None,
        };
        match bytes.get(3) {
            Some(&b' ') => Some((checked, 4)),
            None => Some((checked, 3)),
            _ => None,
        }
    }
}
