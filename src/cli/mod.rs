//! CLI support for arkscript
//!
//! Provides programmatic access to the `ark` command functionality for
//! embedding in other tools.

mod check;
mod docs;
mod onboard;
mod run;

pub use check::{CheckResult, describe_statement, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use onboard::get_onboarding_content;
pub use run::{RunOptions, execute_run, read_script};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Script did not lex or parse
    #[error("Syntax error: {0}")]
    Parse(#[from] crate::ParseError),

    /// Working directory housekeeping failed
    #[error("Workspace error: {0}")]
    Workspace(#[from] crate::WorkspaceError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No script given on the command line or stdin
    #[error("No script provided. Pass a script file, use -e, or pipe the script to stdin.")]
    NoInput,

    /// A run that was rejected before evaluation
    #[error("Run failed: {0}")]
    RunFailed(String),

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'ark docs' to see available categories.")]
    UnknownCategory(String),
}
