//! Token Cursor (§4.1): a read-only view over the user's argument vector.
//!
//! The legacy C tool conflated matching with advancement; callers would
//! sometimes consume a keyword twice, or leave it dangling when a later
//! branch didn't expect it. `match_and_advance` is the single primitive the
//! dispatcher and every operation executor use so a token is never touched
//! more than once.

pub struct TokenCursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        TokenCursor { tokens, pos: 0 }
    }

    /// The token at the current position, without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    /// True if the head token equals `lit`. Never consumes.
    pub fn matches(&self, lit: &str) -> bool {
        self.peek() == Some(lit)
    }

    /// Advance past the current token, if any.
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Advance and return the token that was at the head, if any.
    pub fn take(&mut self) -> Option<&'a str> {
        let tok = self.peek();
        if tok.is_some() {
            self.advance();
        }
        tok
    }

    /// If the head token equals `lit`, consume it and return true.
    /// Otherwise leaves the cursor untouched and returns false.
    pub fn match_and_advance(&mut self, lit: &str) -> bool {
        if self.matches(lit) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn empty(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn toks(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn peek_does_not_consume() {
        let t = toks(&["device", "show"]);
        let c = TokenCursor::new(&t);
        assert_eq!(c.peek(), Some("device"));
        assert_eq!(c.peek(), Some("device"));
    }

    #[test]
    fn match_and_advance_consumes_once() {
        let t = toks(&["device", "show"]);
        let mut c = TokenCursor::new(&t);
        assert!(c.match_and_advance("device"));
        assert!(!c.match_and_advance("device"));
        assert!(c.match_and_advance("show"));
        assert!(c.empty());
    }

    #[test]
    fn take_returns_none_when_empty() {
        let t: Vec<String> = vec![];
        let mut c = TokenCursor::new(&t);
        assert_eq!(c.take(), None);
        assert!(c.empty());
    }

    #[test]
    fn non_matching_literal_is_not_consumed() {
        let t = toks(&["pin"]);
        let mut c = TokenCursor::new(&t);
        assert!(!c.match_and_advance("device"));
        assert_eq!(c.peek(), Some("pin"));
    }
}
