use std::fmt;

/// A field that is either written inline or names a variable.
///
/// Variable references are resolved when the statement runs, not when it is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Quoted text
    ///
    /// # Example
    /// ```text
    /// "informe.txt"
    /// ```
    Literal(String),

    /// Bare identifier naming a variable
    ///
    /// # Example
    /// ```text
    /// informe
    /// ```
    Variable(String),
}

impl Operand {
    pub fn literal(s: impl Into<String>) -> Self {
        Operand::Literal(s.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Operand::Variable(name.into())
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(s) => write!(f, "\"{}\"", s),
            Operand::Variable(name) => f.write_str(name),
        }
    }
}

/// Case handling for `buscar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sensitivity {
    /// `con sensibilidad`
    Sensitive,
    /// `sin sensibilidad` (default)
    #[default]
    Insensitive,
}

/// Which of the two modification commands a statement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// `reemplazar`
    Replace,
    /// `sobreescribir`
    Overwrite,
}

impl WriteMode {
    pub fn tag(self) -> &'static str {
        match self {
            WriteMode::Replace => "REEMPLAZAR",
            WriteMode::Overwrite => "SOBREESCRIBIR",
        }
    }
}

/// Maximum number of replacements in one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// `todo`
    All,
    AtMost(u64),
}

impl Limit {
    pub fn allows(self, done: u64) -> bool {
        match self {
            Limit::All => true,
            Limit::AtMost(max) => done < max,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::All => f.write_str("todo"),
            Limit::AtMost(n) => write!(f, "{}", n),
        }
    }
}

/// One top-level statement of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Variable declaration
    ///
    /// # Example
    /// ```text
    /// var fuente = "capitulo.txt"
    /// ```
    VarDecl { name: String, value: Operand },

    /// Occurrence count
    ///
    /// # Example
    /// ```text
    /// buscar repeticiones de "lobo" de "cuento.txt" con sensibilidad
    /// ```
    Search {
        term: Operand,
        document: Operand,
        sensitivity: Sensitivity,
    },

    /// Document fusion
    ///
    /// # Example
    /// ```text
    /// fusionar "a.txt" con "b.txt" separado_por "***" en "ab.txt"
    /// ```
    Fusion {
        first: Operand,
        second: Operand,
        separator: Operand,
        output: Operand,
    },

    /// Term replacement, in replace or overwrite mode
    ///
    /// # Example
    /// ```text
    /// reemplazar 3 "gato" con "perro" cada 2 de "in.txt" en "out.txt"
    /// sobreescribir todo "XX" con "ab" de "in.txt" en "out.txt"
    /// ```
    ReplaceOverwrite {
        mode: WriteMode,
        limit: Limit,
        original: Operand,
        replacement: Operand,
        frequency: u64,
        source: Operand,
        target: Operand,
    },

    /// Sequential numbering of occurrences
    ///
    /// # Example
    /// ```text
    /// enumerar "#" desde 1 hasta 10 de "lista.txt" en "numerada.txt"
    /// ```
    Enumerate {
        term: Operand,
        start: u64,
        end: u64,
        source: Operand,
        target: Operand,
    },

    /// Page range extraction
    ///
    /// # Example
    /// ```text
    /// extraer de "libro.pdf" desde 2 hasta 5 en "parte.pdf"
    /// ```
    Extract {
        source: Operand,
        start: u64,
        end: u64,
        target: Operand,
    },

    /// Page order reversal
    ///
    /// # Example
    /// ```text
    /// invertir de "libro.pdf" en "al_reves.pdf"
    /// ```
    Invert { source: Operand, target: Operand },

    /// Delimiter-based split into numbered files
    ///
    /// # Example
    /// ```text
    /// fragmentar de "todo.txt" por "---" en "parte.txt"
    /// ```
    Fragment {
        source: Operand,
        delimiter: Operand,
        target: Operand,
    },
}

impl Statement {
    /// Log tag of the command, as the user wrote it.
    pub fn tag(&self) -> &'static str {
        match self {
            Statement::VarDecl { .. } => "VAR",
            Statement::Search { .. } => "BUSCAR",
            Statement::Fusion { .. } => "FUSIONAR",
            Statement::ReplaceOverwrite { mode, .. } => mode.tag(),
            Statement::Enumerate { .. } => "ENUMERAR",
            Statement::Extract { .. } => "EXTRAER",
            Statement::Invert { .. } => "INVERTIR",
            Statement::Fragment { .. } => "FRAGMENTAR",
        }
    }
}
