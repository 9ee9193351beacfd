use crate::doc::Alignment;

/// The delimiter row that turns a paragraph line into a table header
/// (`| --- | :---: |`).
pub struct DelimiterRow;

impl DelimiterRow {
    pub const PIPE: char = '|';
    pub const DASH: char = '-';
    pub const COLON: char = ':';

    /// Parses a delimiter row into per-column alignments.
    ///
    /// Every cell must be a dash run with optional leading/trailing colons.
    pub fn parse(rest: &str) -> Option<Vec<Alignment>> {
        let cells = TableRowLine::split(rest)?;
        let mut alignments = Vec::with_capacity(cells.len());
        for cell in &cells {
            let cell = cell.trim();
            let left = cell.starts_with(Self::COLON);
            let right = cell.ends_with(Self::COLON) && cell.len() > 1;
            let dashes = cell
                .trim_start_matches(Self::COLON)
                .trim_end_matches(Self::COLON);
            if dashes.is_empty() || !dashes.chars().all(|c| c == Self::DASH) {
                return None;
            }
            alignments.push(match (left, right) {
                (true, true) => Alignment::Center,
                (true, false) => Alignment::Left,
                (false, true) => Alignment::Right,
                (false, false) => Alignment::None,
            });
        }
        Some(alignments)
    }
}

/// A pipe-delimited table row.
pub struct TableRowLine;

impl TableRowLine {
    /// Splits a row line into raw cell texts.
    ///
    /// Outer pipes are optional; `\|` keeps a literal pipe inside a cell.
    /// Returns `None` for lines that contain no pipe at all.
    pub fn split(rest: &str) -> Option<Vec<String>> {
        let trimmed = rest.trim();
        if !trimmed.contains(DelimiterRow::PIPE) {
            return None;
        }
        let trimmed = trimmed.strip_prefix(DelimiterRow::PIPE).unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix(DelimiterRow::PIPE).unwrap_or(trimmed);

        let mut cells = vec![];
        let mut cell = String::new();
        let mut escaped = false;
        for ch in trimmed.chars() {
            if escaped {
                if ch != DelimiterRow::PIPE {
                    cell.push('\\');
                }
                cell.push(ch);
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == DelimiterRow::PIPE {
                cells.push(cell.trim().to_string());
                cell = String::new();
            } else {
                cell.push(ch);
            }
        }
        if escaped {
            cell.push('\\');
        }
        cells.push(cell.trim().to_string());
        Some(cells)
    }
}
