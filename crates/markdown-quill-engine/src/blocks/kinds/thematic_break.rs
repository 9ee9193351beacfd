/// Thematic break (`---`, `***`, `___`) recognition.
pub struct ThematicBreakRule;

impl ThematicBreakRule {
    pub const CHARS: [char; 3] = ['-', '_', '*'];
    pub const MIN_COUNT: usize = 3;

    /// True when `rest` is a thematic break: three or more of the same break
    /// character, interleaved with spaces only.
    pub fn matches(rest: &str) -> bool {
        let trimmed = rest.trim_end();
        let Some(ch) = trimmed.chars().find(|c| *c != ' ') else {
            return false;
        };
        if !Self::CHARS.contains(&ch) {
            return false;
        }
        let mut count = 0usize;
        for c in trimmed.chars() {
            if c == ch {
                count += 1;
            } else if c != ' ' {
                return false;
            }
        }
        count >= Self::MIN_COUNT
    }
}
