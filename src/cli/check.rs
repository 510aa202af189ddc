//! Syntax-only validation of ArkScript programs

use super::CliError;
use crate::ast::{Limit, Sensitivity, Statement};
use crate::parse_source;

/// Result of a check operation
#[derive(Debug)]
pub struct CheckResult {
    /// One line per statement, in source order
    pub statements: Vec<String>,
}

/// Parse `source` without running it.
pub fn execute_check(source: &str) -> Result<CheckResult, CliError> {
    let program = parse_source(source)?;
    let statements = program
        .statements
        .iter()
        .enumerate()
        .map(|(i, stmt)| format!("{:>3}  {}", i + 1, describe_statement(stmt)))
        .collect();
    Ok(CheckResult { statements })
}

/// One-line summary of a statement.
pub fn describe_statement(stmt: &Statement) -> String {
    let tag = stmt.tag();
    match stmt {
        Statement::VarDecl { name, value } => format!("{} {} = {}", tag, name, value),
        Statement::Search {
            term,
            document,
            sensitivity,
        } => {
            let case = match sensitivity {
                Sensitivity::Sensitive => "case-sensitive",
                Sensitivity::Insensitive => "case-insensitive",
            };
            format!("{} {} in {} ({})", tag, term, document, case)
        }
        Statement::Fusion {
            first,
            second,
            separator,
            output,
        } => format!("{} {} + {} sep {} -> {}", tag, first, second, separator, output),
        Statement::ReplaceOverwrite {
            limit,
            original,
            replacement,
            frequency,
            source,
            target,
            ..
        } => {
            let limit = match limit {
                Limit::All => "all".to_string(),
                Limit::AtMost(n) => format!("at most {}", n),
            };
            format!(
                "{} {} -> {} ({}, every {}) {} -> {}",
                tag, original, replacement, limit, frequency, source, target
            )
        }
        Statement::Enumerate {
            term,
            start,
            end,
            source,
            target,
        } => format!("{} {} {}..{} {} -> {}", tag, term, start, end, source, target),
        Statement::Extract {
            source,
            start,
            end,
            target,
        } => format!("{} pages {}..{} of {} -> {}", tag, start, end, source, target),
        Statement::Invert { source, target } => format!("{} {} -> {}", tag, source, target),
        Statement::Fragment {
            source,
            delimiter,
            target,
        } => format!("{} {} by {} -> {}", tag, source, delimiter, target),
    }
}
