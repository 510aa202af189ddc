use thiserror::Error;

use crate::{
    ast::{Keyword, Limit, Operand, Program, Sensitivity, Statement, Token, TokenKind, WriteMode},
    lexer::{LexError, Lexer},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error at token {index} ({found}): expected {}", describe_expected(.expected))]
    UnexpectedToken {
        index: usize,
        found: Token,
        expected: Vec<TokenKind>,
    },

    #[error("syntax error at token {index}: command '{keyword}' is not implemented")]
    NotImplemented { index: usize, keyword: Keyword },
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => "a statement".to_string(),
        [only] => only.to_string(),
        many => {
            let names: Vec<String> = many.iter().map(|k| k.to_string()).collect();
            format!("one of {}", names.join(", "))
        }
    }
}

const STATEMENT_STARTS: [Keyword; 9] = [
    Keyword::Var,
    Keyword::Buscar,
    Keyword::Fusionar,
    Keyword::Reemplazar,
    Keyword::Sobreescribir,
    Keyword::Enumerar,
    Keyword::Extraer,
    Keyword::Invertir,
    Keyword::Fragmentar,
];

/// Lexes and parses a whole script.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse_program()
}

pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    /// Creates a parser over a token stream. A missing trailing [`Token::Eof`] is added.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last() != Some(&Token::Eof) {
            tokens.push(Token::Eof);
        }
        Parser { tokens, index: 0 }
    }

    fn current(&self) -> &Token {
        // new() guarantees a trailing Eof and advance() never moves past it
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.index < self.tokens.len() - 1 {
            self.index += 1;
        }
        token
    }

    fn error(&self, expected: Vec<TokenKind>) -> ParseError {
        ParseError::UnexpectedToken {
            index: self.index,
            found: self.current().clone(),
            expected,
        }
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        *self.current() == Token::Keyword(keyword)
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(vec![TokenKind::Keyword(keyword)]))
        }
    }

    fn expect_integer(&mut self) -> Result<u64, ParseError> {
        match *self.current() {
            Token::Integer(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.error(vec![TokenKind::Integer])),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Identifier(name) = self.current() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error(vec![TokenKind::Identifier]))
        }
    }

    /// A string literal or a variable reference.
    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        let operand = match self.current() {
            Token::String(s) => Operand::Literal(s.clone()),
            Token::Identifier(name) => Operand::Variable(name.clone()),
            _ => return Err(self.error(vec![TokenKind::String, TokenKind::Identifier])),
        };
        self.advance();
        Ok(operand)
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();

        while *self.current() != Token::Eof {
            statements.push(self.parse_statement()?);

            if *self.current() == Token::Comma {
                self.advance();
            }
        }

        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let keyword = match self.current() {
            Token::Keyword(kw) if kw.is_statement_start() => *kw,
            _ => {
                let expected = STATEMENT_STARTS.iter().map(|kw| TokenKind::Keyword(*kw)).collect();
                return Err(self.error(expected));
            }
        };

        match keyword {
            Keyword::Var => self.parse_var_declaration(),
            Keyword::Buscar => self.parse_search(),
            Keyword::Fusionar => self.parse_fusion(),
            Keyword::Reemplazar => self.parse_replace_overwrite(WriteMode::Replace),
            Keyword::Sobreescribir => self.parse_replace_overwrite(WriteMode::Overwrite),
            Keyword::Enumerar => self.parse_enumerate(),
            Keyword::Extraer => self.parse_extract(),
            Keyword::Invertir => self.parse_invert(),
            Keyword::Fragmentar => self.parse_fragment(),
            other => Err(ParseError::NotImplemented {
                index: self.index,
                keyword: other,
            }),
        }
    }

    // var NAME = S|V
    fn parse_var_declaration(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Var)?;
        let name = self.expect_identifier()?;

        if *self.current() != Token::Equals {
            return Err(self.error(vec![TokenKind::Equals]));
        }
        self.advance();

        let value = self.parse_operand()?;
        Ok(Statement::VarDecl { name, value })
    }

    // buscar repeticiones de S|V de S|V [con|sin sensibilidad]
    fn parse_search(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Buscar)?;
        self.expect_keyword(Keyword::Repeticiones)?;
        self.expect_keyword(Keyword::De)?;
        let term = self.parse_operand()?;
        self.expect_keyword(Keyword::De)?;
        let document = self.parse_operand()?;

        let sensitivity = if self.check_keyword(Keyword::Con) {
            self.advance();
            self.expect_keyword(Keyword::Sensibilidad)?;
            Sensitivity::Sensitive
        } else if self.check_keyword(Keyword::Sin) {
            self.advance();
            self.expect_keyword(Keyword::Sensibilidad)?;
            Sensitivity::Insensitive
        } else {
            Sensitivity::default()
        };

        Ok(Statement::Search {
            term,
            document,
            sensitivity,
        })
    }

    // fusionar S|V con S|V separado_por S|V en S|V
    fn parse_fusion(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Fusionar)?;
        let first = self.parse_operand()?;
        self.expect_keyword(Keyword::Con)?;
        let second = self.parse_operand()?;
        self.expect_keyword(Keyword::SeparadoPor)?;
        let separator = self.parse_operand()?;
        self.expect_keyword(Keyword::En)?;
        let output = self.parse_operand()?;

        Ok(Statement::Fusion {
            first,
            second,
            separator,
            output,
        })
    }

    // (reemplazar|sobreescribir) (todo|N) S|V con S|V [cada N] de S|V en S|V
    fn parse_replace_overwrite(&mut self, mode: WriteMode) -> Result<Statement, ParseError> {
        self.advance(); // command keyword

        let limit = match *self.current() {
            Token::Keyword(Keyword::Todo) => {
                self.advance();
                Limit::All
            }
            Token::Integer(n) => {
                self.advance();
                Limit::AtMost(n)
            }
            _ => {
                return Err(self.error(vec![
                    TokenKind::Keyword(Keyword::Todo),
                    TokenKind::Integer,
                ]));
            }
        };

        let original = self.parse_operand()?;
        self.expect_keyword(Keyword::Con)?;
        let replacement = self.parse_operand()?;

        let frequency = if self.check_keyword(Keyword::Cada) {
            self.advance();
            self.expect_integer()?
        } else {
            1
        };

        self.expect_keyword(Keyword::De)?;
        let source = self.parse_operand()?;
        self.expect_keyword(Keyword::En)?;
        let target = self.parse_operand()?;

        Ok(Statement::ReplaceOverwrite {
            mode,
            limit,
            original,
            replacement,
            frequency,
            source,
            target,
        })
    }

    // enumerar S|V desde N hasta N de S|V en S|V
    fn parse_enumerate(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Enumerar)?;
        let term = self.parse_operand()?;
        self.expect_keyword(Keyword::Desde)?;
        let start = self.expect_integer()?;
        self.expect_keyword(Keyword::Hasta)?;
        let end = self.expect_integer()?;
        self.expect_keyword(Keyword::De)?;
        let source = self.parse_operand()?;
        self.expect_keyword(Keyword::En)?;
        let target = self.parse_operand()?;

        Ok(Statement::Enumerate {
            term,
            start,
            end,
            source,
            target,
        })
    }

    // extraer de S|V desde N hasta N en S|V
    fn parse_extract(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Extraer)?;
        self.expect_keyword(Keyword::De)?;
        let source = self.parse_operand()?;
        self.expect_keyword(Keyword::Desde)?;
        let start = self.expect_integer()?;
        self.expect_keyword(Keyword::Hasta)?;
        let end = self.expect_integer()?;
        self.expect_keyword(Keyword::En)?;
        let target = self.parse_operand()?;

        Ok(Statement::Extract {
            source,
            start,
            end,
            target,
        })
    }

    // invertir de S|V en S|V
    fn parse_invert(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Invertir)?;
        self.expect_keyword(Keyword::De)?;
        let source = self.parse_operand()?;
        self.expect_keyword(Keyword::En)?;
        let target = self.parse_operand()?;

        Ok(Statement::Invert { source, target })
    }

    // fragmentar de S|V por S|V en S|V
    fn parse_fragment(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Fragmentar)?;
        self.expect_keyword(Keyword::De)?;
        let source = self.parse_operand()?;
        self.expect_keyword(Keyword::Por)?;
        let delimiter = self.parse_operand()?;
        self.expect_keyword(Keyword::En)?;
        let target = self.parse_operand()?;

        Ok(Statement::Fragment {
            source,
            delimiter,
            target,
        })
    }
}
