/// Character cursor over one leaf block's raw text.
///
/// Positions are byte offsets into the original string, so slices taken
/// between two positions stay valid UTF-8.
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The character at the cursor, if any.
    pub fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// The character immediately before the cursor, if any.
    pub fn prev(&self) -> Option<char> {
        self.text[..self.pos].chars().next_back()
    }

    /// Advances past one character and returns it.
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Advances while `pred` holds, returning how many characters moved.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
            count += 1;
        }
        count
    }

    /// Everything from the cursor to the end of the text.
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Slice between two previously observed positions.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    /// Moves the cursor to an absolute position obtained from `pos()`.
    pub fn seek(&mut self, pos: usize) {
        debug_assert!(pos <= self.text.len());
        self.pos = pos;
    }
}
