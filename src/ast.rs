//! # ArkScript - Abstract Syntax Tree
//!
//! This module defines the tokens and statements of ArkScript, a small command
//! language for batch editing of text and PDF documents.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[statements]** - One statement variant per command keyword
//! - **[program]** - A whole parsed script
//!
//! ## Quick Start
//!
//! ```text
//! var origen = "cuento.txt"
//! buscar repeticiones de "lobo" de origen
//! reemplazar todo "lobo" con "zorro" de origen en "cuento2.txt"
//! ```
//!
//! ## Core Concepts
//!
//! ### Statements
//!
//! A script is a flat list of statements, optionally separated by commas.
//! There are no expressions, loops or conditionals. Each statement names its
//! input and output documents explicitly.
//!
//! ### Operands
//!
//! Every text field is either a quoted literal or a bare identifier naming a
//! variable declared with `var`. Identifiers are looked up when the statement
//! runs, so an undefined variable only fails that statement.
//!
//! ### Documents
//!
//! Document names are resolved against one root directory. Names ending in
//! `.pdf` are paginated documents: they are read through page text extraction
//! and written by rendering text onto pages.
//!
//! ## Examples
//!
//! ### Numbering
//!
//! ```text
//! enumerar "#" desde 1 hasta 3 de "lista.txt" en "numerada.txt"
//! ```
//!
//! ### Page Work
//!
//! ```text
//! extraer de "libro.pdf" desde 2 hasta 4 en "parte.pdf",
//! invertir de "parte.pdf" en "parte_inversa.pdf"
//! ```
//!
//! ### Comments
//!
//! ```text
//! // everything after two slashes is ignored
//! fragmentar de "todo.txt" por "---" en "seccion.txt"
//! ```
pub mod program;
pub mod statements;
pub mod tokens;

pub use program::Program;
pub use statements::{Limit, Operand, Sensitivity, Statement, WriteMode};
pub use tokens::{Keyword, Token, TokenKind};
