/// Lexer state structure for walking a message input stream one character at
/// a time. Byte-position based so multi-byte emoji never split the cursor.
pub struct Lexer<'a> {
    pub input: &'a str,
    pub byte_pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, byte_pos: 0 }
    }

    /// Checks current value of the input stream under the cursor without advancing its position
    pub fn peek_char(&self) -> Option<char> {
        self.input[self.byte_pos..].chars().next()
    }

    /// Advances the cursor position forward one element (if the next element is not the EOF),
    /// returning the value of the previous element
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek_char();
        if let Some(utf) = ch {
            self.byte_pos += utf.len_utf8();
            Some(utf)
        } else {
            None
        }
    }

    /// Consumes the expected character if it is under the cursor, reporting
    /// whether the cursor advanced
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes an exact literal if the remaining input starts with it
    pub fn eat_str(&mut self, literal: &str) -> bool {
        if self.input[self.byte_pos..].starts_with(literal) {
            self.byte_pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consumes all consecutive whitespace characters, returning execution to the caller when a
    /// non-whitespace character is found under the cursor
    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Consumes all consecutive ASCII digits, returning the consumed characters to the caller
    pub fn take_digits(&mut self) -> Option<&'a str> {
        let start = self.byte_pos;
        while let Some(ch) = self.peek_char() {
            if !ch.is_ascii_digit() {
                break;
            }

            self.next();
        }

        if start == self.byte_pos {
            None
        } else {
            Some(&self.input[start..self.byte_pos])
        }
    }

    /// Consumes all consecutive characters until the character under the cursor is equal to a
    /// member in the `delims` array, returning the consumed characters to the caller
    pub fn next_until(&mut self, delims: &[char]) -> Option<&'a str> {
        let start = self.byte_pos;
        while let Some(ch) = self.peek_char() {
            if delims.contains(&ch) {
                break;
            }

            self.next();
        }

        if start == self.byte_pos {
            None
        } else {
            Some(&self.input[start..self.byte_pos])
        }
    }

    /// Consume the remaining input stream and return it
    pub fn rest(&mut self) -> Option<&'a str> {
        if self.is_eof() {
            None
        } else {
            let result = &self.input[self.byte_pos..];
            self.byte_pos = self.input.len();
            Some(result)
        }
    }

    /// Determine if the cursor's position is the end of the input stream
    pub fn is_eof(&self) -> bool {
        self.byte_pos >= self.input.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_handles_multibyte_emoji() {
        let mut lexer = Lexer::new("🌎🟩🟨⬛ 📅");

        assert_eq!(lexer.next(), Some('🌎'));
        assert_eq!(lexer.next(), Some('🟩'));

        let cluster = lexer.next_until(&[' ']).unwrap();
        assert_eq!(cluster, "🟨⬛");

        lexer.skip_whitespace();
        assert_eq!(lexer.rest(), Some("📅"));
        assert!(lexer.is_eof());
    }

    #[test]
    fn eat_only_advances_on_match() {
        let mut lexer = Lexer::new("🌎x");

        assert!(!lexer.eat('x'));
        assert!(lexer.eat('🌎'));
        assert!(lexer.eat('x'));
        assert!(lexer.is_eof());
    }

    #[test]
    fn eat_str_matches_literals() {
        let mut lexer = Lexer::new("TimeGuessr #412");

        assert!(lexer.eat_str("TimeGuessr #"));
        assert_eq!(lexer.take_digits(), Some("412"));
        assert!(lexer.is_eof());
    }

    #[test]
    fn take_digits_stops_at_non_digit() {
        let mut lexer = Lexer::new("49,500/50,000");

        assert_eq!(lexer.take_digits(), Some("49"));
        assert!(lexer.eat(','));
        assert_eq!(lexer.take_digits(), Some("500"));
        assert_eq!(lexer.take_digits(), None);
    }
}
