#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),

    LParen,      // (
    RParen,      // )
    Comma,       // ,
    Semicolon,   // ;
    Arrow,       // ->
    DoubleArrow, // ->->

    Eof,
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character {ch:?} at byte {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("Incomplete arrow at byte {0}: expected '>' after '-'")]
    IncompleteArrow(usize),
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte-offset scanner over a `relation`/`fd`/`mvd` source.
pub struct Lexer<'a> {
    src: &'a str,
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, offset: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.offset..]
    }

    fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.current()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    /// Whitespace and `#` line comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start();
            self.offset += rest.len() - trimmed.len();
            if !trimmed.starts_with('#') {
                return;
            }
            self.offset += trimmed.find('\n').map_or(trimmed.len(), |n| n + 1);
        }
    }

    fn take_ident(&mut self) -> String {
        let rest = self.rest();
        let len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
        self.offset += len;
        rest[..len].to_string()
    }

    fn take_arrow(&mut self, start: usize) -> Result<Token, LexError> {
        let rest = self.rest();
        if rest.starts_with("->->") {
            self.offset += 4;
            Ok(Token::DoubleArrow)
        } else if rest.starts_with("->") {
            self.offset += 2;
            Ok(Token::Arrow)
        } else {
            Err(LexError::IncompleteArrow(start))
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();
        let start = self.offset;
        let Some(c) = self.current() else {
            return Ok(Token::Eof);
        };

        let punct = match c {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            _ => None,
        };
        if let Some(tok) = punct {
            self.bump();
            return Ok(tok);
        }

        match c {
            '-' => self.take_arrow(start),
            c if is_ident_char(c) => Ok(Token::Ident(self.take_ident())),
            ch => Err(LexError::UnexpectedChar { ch, offset: start }),
        }
    }

    /// All tokens, terminated by exactly one `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut out = Vec::new();
        while out.last() != Some(&Token::Eof) {
            out.push(self.next_token()?);
        }
        Ok(out)
    }
}
