//! Java tokenizer.
//!
//! Produces just enough structure for declaration parsing: identifiers (which
//! include keywords), literals, and single-character punctuation. Comments and
//! whitespace are dropped; every token keeps its byte span so the printer can
//! edit the original text in place.
//!
//! Multi-character operators are emitted one character at a time. `>>` in
//! `List<List<String>>` is two `>` tokens, which keeps generic type arguments
//! trivially balanced for the parser.

use crate::error::SyntaxError;

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Numeric, string, text block or character literal.
    Literal,
    /// A single punctuation or operator character.
    Punct(char),
}

/// One token with its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Source text of the token.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// Tokenize a whole compilation unit.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
    }
    .run()
}

struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek_char() {
            let start = self.pos;
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if self.starts_with("//") {
                self.skip_line_comment();
            } else if self.starts_with("/*") {
                self.skip_block_comment()?;
            } else if is_ident_start(c) {
                self.eat_while(is_ident_part);
                tokens.push(self.token(TokenKind::Ident, start));
            } else if c.is_ascii_digit() || (c == '.' && self.byte_at(1).is_some_and(|b| b.is_ascii_digit())) {
                self.eat_number();
                tokens.push(self.token(TokenKind::Literal, start));
            } else if self.starts_with("\"\"\"") {
                self.eat_text_block()?;
                tokens.push(self.token(TokenKind::Literal, start));
            } else if c == '"' || c == '\'' {
                self.eat_quoted(c)?;
                tokens.push(self.token(TokenKind::Literal, start));
            } else {
                self.pos += c.len_utf8();
                tokens.push(self.token(TokenKind::Punct(c), start));
            }
        }
        Ok(tokens)
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.pos,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn byte_at(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.source[self.pos..].starts_with(prefix)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn skip_line_comment(&mut self) {
        match self.source[self.pos..].find('\n') {
            Some(idx) => self.pos += idx,
            None => self.pos = self.source.len(),
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        match self.source[self.pos + 2..].find("*/") {
            Some(idx) => {
                self.pos += 2 + idx + 2;
                Ok(())
            }
            None => Err(SyntaxError::new(start, "unterminated comment")),
        }
    }

    fn eat_number(&mut self) {
        // Digits, underscores, radix prefixes, suffixes, `.`, and signed exponents.
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                let exponent = matches!(c, 'e' | 'E' | 'p' | 'P');
                self.pos += 1;
                if exponent && matches!(self.byte_at(0), Some(b'+') | Some(b'-')) {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn eat_quoted(&mut self, quote: char) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 1;
        while let Some(c) = self.peek_char() {
            match c {
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.peek_char() {
                        self.pos += escaped.len_utf8();
                    }
                }
                '\n' => break,
                _ if c == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += c.len_utf8(),
            }
        }
        let what = if quote == '"' {
            "unterminated string literal"
        } else {
            "unterminated character literal"
        };
        Err(SyntaxError::new(start, what))
    }

    fn eat_text_block(&mut self) -> Result<(), SyntaxError> {
        let start = self.pos;
        self.pos += 3;
        while let Some(c) = self.peek_char() {
            if c == '\\' {
                self.pos += 1;
                if let Some(escaped) = self.peek_char() {
                    self.pos += escaped.len_utf8();
                }
            } else if self.starts_with("\"\"\"") {
                self.pos += 3;
                return Ok(());
            } else {
                self.pos += c.len_utf8();
            }
        }
        Err(SyntaxError::new(start, "unterminated text block"))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.text(source)))
            .collect()
    }

    #[test]
    fn identifiers_and_punctuation() {
        assert_eq!(
            lex("class A { }"),
            vec![
                (TokenKind::Ident, "class"),
                (TokenKind::Ident, "A"),
                (TokenKind::Punct('{'), "{"),
                (TokenKind::Punct('}'), "}"),
            ]
        );
    }

    #[test]
    fn dollar_and_unicode_identifiers() {
        assert_eq!(
            lex("$x _y café"),
            vec![
                (TokenKind::Ident, "$x"),
                (TokenKind::Ident, "_y"),
                (TokenKind::Ident, "café"),
            ]
        );
    }

    #[test]
    fn shift_operators_split_into_single_characters() {
        let kinds: Vec<TokenKind> = lex("List<List<String>>").into_iter().map(|t| t.0).collect();
        assert_eq!(kinds[5], TokenKind::Punct('>'));
        assert_eq!(kinds[6], TokenKind::Punct('>'));
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(
            lex("a // b { \n /* c } */ d /** e */"),
            vec![(TokenKind::Ident, "a"), (TokenKind::Ident, "d")]
        );
    }

    #[test]
    fn braces_inside_literals_are_not_tokens() {
        assert_eq!(
            lex(r#"x = "{ \" }"; c = '}';"#),
            vec![
                (TokenKind::Ident, "x"),
                (TokenKind::Punct('='), "="),
                (TokenKind::Literal, r#""{ \" }""#),
                (TokenKind::Punct(';'), ";"),
                (TokenKind::Ident, "c"),
                (TokenKind::Punct('='), "="),
                (TokenKind::Literal, "'}'"),
                (TokenKind::Punct(';'), ";"),
            ]
        );
    }

    #[test]
    fn text_blocks() {
        let source = "s = \"\"\"\n  { \"quoted\" }\n  \"\"\";";
        let tokens = lex(source);
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[2].0, TokenKind::Literal);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            lex("1_000L 0x1F .5e-3 1.0f"),
            vec![
                (TokenKind::Literal, "1_000L"),
                (TokenKind::Literal, "0x1F"),
                (TokenKind::Literal, ".5e-3"),
                (TokenKind::Literal, "1.0f"),
            ]
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let source = "/* é */ Old";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens[0].text(source), "Old");
        assert_eq!(tokens[0].start, source.find("Old").unwrap());
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("x = \"abc\n").unwrap_err();
        assert_eq!(err.offset, 4);
        assert_eq!(err.message, "unterminated string literal");
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        let err = tokenize("class A {} /* never closed").unwrap_err();
        assert_eq!(err.message, "unterminated comment");
    }
}
