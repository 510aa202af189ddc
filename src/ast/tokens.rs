use std::fmt;

/// Reserved words of the language.
///
/// Lookup is case-insensitive: `BUSCAR`, `Buscar` and `buscar` are the same keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Declarations
    /// Variable declaration
    ///
    /// # Examples
    /// ```text
    /// var informe = "informe.txt"
    /// ```
    Var,

    // Connectives
    Con,
    Sin,
    De,
    Por,
    En,
    Desde,
    Hasta,

    // Commands
    /// Count occurrences of a term in a document
    Buscar,
    /// Join two documents around a separator
    Fusionar,
    /// Replace occurrences of a term
    Reemplazar,
    /// Overwrite characters starting at each occurrence of a term
    Sobreescribir,
    /// Replace occurrences of a term with a numeric sequence
    Enumerar,
    /// Reserved, rejected by the parser
    Contar,
    /// Copy a page range out of a paginated document
    Extraer,
    /// Reverse the page order of a paginated document
    Invertir,
    /// Split a text document on a delimiter
    Fragmentar,

    // Modifiers
    Repeticiones,
    Sensibilidad,
    /// `separado_por`, the fusion separator marker
    SeparadoPor,
    /// `cada N`, replacement frequency
    Cada,
    /// `todo`, unbounded replacement limit
    Todo,
}

impl Keyword {
    const TABLE: [(&'static str, Keyword); 22] = [
        ("var", Keyword::Var),
        ("con", Keyword::Con),
        ("sin", Keyword::Sin),
        ("de", Keyword::De),
        ("por", Keyword::Por),
        ("en", Keyword::En),
        ("desde", Keyword::Desde),
        ("hasta", Keyword::Hasta),
        ("buscar", Keyword::Buscar),
        ("fusionar", Keyword::Fusionar),
        ("reemplazar", Keyword::Reemplazar),
        ("sobreescribir", Keyword::Sobreescribir),
        ("enumerar", Keyword::Enumerar),
        ("contar", Keyword::Contar),
        ("extraer", Keyword::Extraer),
        ("invertir", Keyword::Invertir),
        ("fragmentar", Keyword::Fragmentar),
        ("repeticiones", Keyword::Repeticiones),
        ("sensibilidad", Keyword::Sensibilidad),
        ("separado_por", Keyword::SeparadoPor),
        ("cada", Keyword::Cada),
        ("todo", Keyword::Todo),
    ];

    /// Case-insensitive lookup against the reserved-word table.
    pub fn lookup(word: &str) -> Option<Keyword> {
        let lowered = word.to_lowercase();
        Self::TABLE
            .iter()
            .find(|(text, _)| *text == lowered)
            .map(|(_, kw)| *kw)
    }

    /// Canonical (lowercase) spelling.
    pub fn as_str(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, kw)| *kw == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }

    /// Keywords that may start a statement.
    pub fn is_statement_start(self) -> bool {
        matches!(
            self,
            Keyword::Var
                | Keyword::Buscar
                | Keyword::Fusionar
                | Keyword::Reemplazar
                | Keyword::Sobreescribir
                | Keyword::Enumerar
                | Keyword::Contar
                | Keyword::Extraer
                | Keyword::Invertir
                | Keyword::Fragmentar
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Reserved word
    ///
    /// # Examples
    /// ```text
    /// buscar
    /// SEPARADO_POR
    /// ```
    Keyword(Keyword),

    /// Variable name
    ///
    /// Any run of letters, digits and underscores that is not a keyword.
    ///
    /// # Examples
    /// ```text
    /// informe
    /// doc_2
    /// ```
    Identifier(String),

    /// String literal enclosed in double quotes, no escape sequences
    ///
    /// # Examples
    /// ```text
    /// "capitulo1.txt"
    /// "---"
    /// ```
    String(String),

    /// Non-negative integer
    ///
    /// # Examples
    /// ```text
    /// 1
    /// 250
    /// ```
    Integer(u64),

    /// Optional statement separator
    Comma,

    /// Assignment in `var` declarations
    Equals,

    /// End of input
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Keyword(kw) => TokenKind::Keyword(*kw),
            Token::Identifier(_) => TokenKind::Identifier,
            Token::String(_) => TokenKind::String,
            Token::Integer(_) => TokenKind::Integer,
            Token::Comma => TokenKind::Comma,
            Token::Equals => TokenKind::Equals,
            Token::Eof => TokenKind::Eof,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Keyword(kw) => write!(f, "keyword '{}'", kw),
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::String(s) => write!(f, "string \"{}\"", s),
            Token::Integer(n) => write!(f, "integer {}", n),
            Token::Comma => f.write_str("','"),
            Token::Equals => f.write_str("'='"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// Token kind without payload, used to describe what the parser expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    String,
    Integer,
    Comma,
    Equals,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "'{}'", kw),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::String => f.write_str("string"),
            TokenKind::Integer => f.write_str("integer"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Equals => f.write_str("'='"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}
