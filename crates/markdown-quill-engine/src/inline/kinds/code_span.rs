/// Backtick code spans.
///
/// Owns the backtick-matching rule: an opener of N backticks closes only on
/// the next run of exactly N backticks.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: char = '`';

    /// Tries to read a code span at the start of `text`, which must begin
    /// with a backtick. Returns the literal content and bytes consumed.
    pub fn parse(text: &str) -> Option<(String, usize)> {
        let bytes = text.as_bytes();
        let mut open = 0usize;
        while open < bytes.len() && bytes[open] == b'`' {
            open += 1;
        }
        let mut i = open;
        while i < bytes.len() {
            if bytes[i] == b'`' {
                let run_start = i;
                while i < bytes.len() && bytes[i] == b'`' {
                    i += 1;
                }
                if i - run_start == open {
                    return Some((Self::normalize(&text[open..run_start]), i));
                }
            } else {
                i += 1;
            }
        }
        None
    }

    /// Line endings become spaces; one space is stripped from each end when
    /// the content is padded on both sides and is not all spaces.
    fn normalize(content: &str) -> String {
        let content = content.replace('\n', " ");
        let padded = content.starts_with(' ')
            && content.ends_with(' ')
            && !content.chars().all(|c| c == ' ');
        if padded && content.len() >= 2 {
            content[1..content.len() - 1].to_string()
        } else {
            content
        }
    }
}
