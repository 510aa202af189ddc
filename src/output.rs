//! Run results and the execution log.
//!
//! A run produces one [`LogSection`] per statement, in source order, plus the
//! set of documents it wrote. A script that fails to lex or parse produces no
//! sections at all: [`RunResult::failed`] is set and [`RunResult::error`]
//! holds the message.
//!
//! # Examples
//!
//! ```
//! use arkscript::output::{RunResult, to_json};
//!
//! let result = RunResult::fatal("syntax error at token 0");
//! assert!(result.failed);
//! assert!(to_json(&result).contains("\"failed\":true"));
//! ```

use std::collections::BTreeSet;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub level: Level,
    pub message: String,
}

/// Log lines of one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSection {
    /// 0-based position of the statement in the script
    pub statement: usize,
    /// Command tag, e.g. `BUSCAR`
    pub command: String,
    pub lines: Vec<LogLine>,
}

impl LogSection {
    pub fn new(statement: usize, command: &str) -> Self {
        LogSection {
            statement,
            command: command.to_string(),
            lines: Vec::new(),
        }
    }

    fn push(&mut self, level: Level, message: String) {
        match level {
            Level::Info => tracing::info!(statement = self.statement, command = %self.command, "{}", message),
            Level::Warning => tracing::warn!(statement = self.statement, command = %self.command, "{}", message),
            Level::Error => tracing::error!(statement = self.statement, command = %self.command, "{}", message),
        }
        self.lines.push(LogLine { level, message });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Level::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    pub fn has_errors(&self) -> bool {
        self.lines.iter().any(|line| line.level == Level::Error)
    }

    pub fn render(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| match line.level {
                Level::Info => format!("[{}] {}", self.command, line.message),
                Level::Warning => format!("[{}] warning: {}", self.command, line.message),
                Level::Error => format!("[{}] error: {}", self.command, line.message),
            })
            .collect()
    }
}

/// What a run hands back to its caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub sections: Vec<LogSection>,
    /// Documents written during the run
    pub generated_files: BTreeSet<String>,
    /// The script did not lex or parse; nothing ran
    pub failed: bool,
    pub error: Option<String>,
}

impl RunResult {
    pub fn fatal(message: impl Into<String>) -> Self {
        RunResult {
            failed: true,
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// The execution log as plain lines.
    pub fn log(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .error
            .iter()
            .map(|e| format!("compile error: {}", e))
            .collect();
        lines.extend(self.sections.iter().flat_map(LogSection::render));
        lines
    }

    /// Number of statements that logged at least one error.
    pub fn statement_errors(&self) -> usize {
        self.sections.iter().filter(|s| s.has_errors()).count()
    }
}

#[derive(Serialize)]
struct Report<'a> {
    failed: bool,
    error: Option<&'a str>,
    log: Vec<String>,
    generated_files: &'a BTreeSet<String>,
    sections: &'a [LogSection],
}

impl<'a> From<&'a RunResult> for Report<'a> {
    fn from(result: &'a RunResult) -> Self {
        Report {
            failed: result.failed,
            error: result.error.as_deref(),
            log: result.log(),
            generated_files: &result.generated_files,
            sections: &result.sections,
        }
    }
}

pub fn to_json(result: &RunResult) -> String {
    serde_json::to_string(&Report::from(result)).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

pub fn to_json_pretty(result: &RunResult) -> String {
    serde_json::to_string_pretty(&Report::from(result))
        .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}
