use std::fmt;

use thiserror::Error;

use crate::ast::{Keyword, Token};

/// Location of a character in the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Character offset from the start of input
    pub offset: usize,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character {ch:?} at {position}")]
    UnexpectedCharacter { position: Position, ch: char },

    #[error("unterminated string literal starting at {position}")]
    UnterminatedString { position: Position },

    #[error("integer literal {literal} at {position} is too large")]
    IntegerOverflow { position: Position, literal: String },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::IntegerOverflow { position, .. } => *position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn here(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    /// Skips whitespace and `//` comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '/' && self.peek_char(1) == Some('/') {
                while let Some(c) = self.current_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.here();
        let mut result = String::new();
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '"' {
                return Ok(result);
            }
            result.push(ch);
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        let mut digits = String::new();

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        digits
            .parse::<u64>()
            .map(Token::Integer)
            .map_err(|_| LexError::IntegerOverflow {
                position: start,
                literal: digits,
            })
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        match self.current_char() {
            None => Ok(Token::Eof),
            Some(',') => {
                self.advance();
                Ok(Token::Comma)
            }
            Some('=') => {
                self.advance();
                Ok(Token::Equals)
            }
            Some('"') => self.read_string().map(Token::String),
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let word = self.read_word();
                Ok(match Keyword::lookup(&word) {
                    Some(kw) => Token::Keyword(kw),
                    None => Token::Identifier(word),
                })
            }
            Some(ch) => Err(LexError::UnexpectedCharacter {
                position: self.here(),
                ch,
            }),
        }
    }

    /// Lexes the whole input. The result always ends with [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[test]
fn test_keywords_ignore_case() {
    let mut lexer = Lexer::new("BUSCAR Repeticiones separado_POR todo");
    assert_eq!(lexer.next_token(), Ok(Token::Keyword(Keyword::Buscar)));
    assert_eq!(lexer.next_token(), Ok(Token::Keyword(Keyword::Repeticiones)));
    assert_eq!(lexer.next_token(), Ok(Token::Keyword(Keyword::SeparadoPor)));
    assert_eq!(lexer.next_token(), Ok(Token::Keyword(Keyword::Todo)));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_var_declaration() {
    let tokens = Lexer::new("var doc = \"a.txt\", // trailing\n").tokenize().unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Keyword(Keyword::Var),
            Token::Identifier("doc".to_string()),
            Token::Equals,
            Token::String("a.txt".to_string()),
            Token::Comma,
            Token::Eof,
        ]
    );
}
