use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroU64;

use thiserror::Error;

use crate::{
    ast::{Limit, Operand, Program, Sensitivity, Statement, WriteMode},
    codec::{CodecError, PageCodec, PagedDocument},
    document::{Content, Format, ReadMode, split_extension},
    output::{LogSection, RunResult},
    storage::{Storage, StorageError},
    transform,
};

/// Errors that fail a single statement.
///
/// They are caught at the statement boundary and logged; the run goes on with
/// the next statement.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Reference to a variable no `var` declared
    #[error("variable '{0}' is not defined")]
    UndefinedVariable(String),

    #[error("document not found: '{0}'")]
    FileNotFound(String),

    /// The build has no support for paginated documents
    #[error("cannot process '{0}': paginated document support is not available")]
    CapabilityUnavailable(String),

    #[error("invalid page range {start} to {end}{}", describe_pages(.pages))]
    InvalidRange {
        start: u64,
        end: u64,
        pages: Option<usize>,
    },

    #[error("{0}")]
    InvalidParameter(String),

    /// A paginated document that could not be decoded
    #[error("cannot process '{name}': {message}")]
    Document { name: String, message: String },

    #[error(transparent)]
    Storage(StorageError),
}

fn describe_pages(pages: &Option<usize>) -> String {
    match pages {
        Some(n) => format!(" (document has {} page(s))", n),
        None => String::new(),
    }
}

impl From<StorageError> for EvalError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(name) => EvalError::FileNotFound(name),
            other => EvalError::Storage(other),
        }
    }
}

fn codec_error(name: &str, e: CodecError) -> EvalError {
    match e {
        CodecError::Unavailable => EvalError::CapabilityUnavailable(name.to_string()),
        other => EvalError::Document {
            name: name.to_string(),
            message: other.to_string(),
        },
    }
}

fn require_paginated(name: &str, role: &str) -> Result<(), EvalError> {
    if Format::of(name).is_paginated() {
        Ok(())
    } else {
        Err(EvalError::InvalidParameter(format!(
            "{} '{}' must be a PDF document",
            role, name
        )))
    }
}

/// Executes one program against a document store.
///
/// An evaluator lives for a single run: it owns the variables declared by the
/// script and the set of documents written so far.
pub struct Evaluator<'a> {
    storage: &'a dyn Storage,
    codec: &'a dyn PageCodec,
    variables: HashMap<String, String>,
    generated: BTreeSet<String>,
}

impl<'a> Evaluator<'a> {
    pub fn new(storage: &'a dyn Storage, codec: &'a dyn PageCodec) -> Self {
        Evaluator {
            storage,
            codec,
            variables: HashMap::new(),
            generated: BTreeSet::new(),
        }
    }

    /// Runs every statement in order.
    ///
    /// A failing statement logs its error and the run continues, so the
    /// result always has one section per statement.
    #[tracing::instrument(level = "debug", skip(self, program), fields(statements = program.len()))]
    pub fn evaluate(mut self, program: &Program) -> RunResult {
        let mut sections = Vec::with_capacity(program.len());

        for (index, stmt) in program.statements.iter().enumerate() {
            let mut section = LogSection::new(index, stmt.tag());
            tracing::debug!(index, statement = ?stmt, "evaluating");
            if let Err(e) = self.eval_statement(stmt, &mut section) {
                section.error(e.to_string());
            }
            sections.push(section);
        }

        RunResult {
            sections,
            generated_files: self.generated,
            failed: false,
            error: None,
        }
    }

    fn eval_statement(&mut self, stmt: &Statement, log: &mut LogSection) -> Result<(), EvalError> {
        match stmt {
            Statement::VarDecl { name, value } => self.declare(name, value, log),
            Statement::Search {
                term,
                document,
                sensitivity,
            } => self.search(term, document, *sensitivity, log),
            Statement::Fusion {
                first,
                second,
                separator,
                output,
            } => self.fusion(first, second, separator, output, log),
            Statement::ReplaceOverwrite {
                mode,
                limit,
                original,
                replacement,
                frequency,
                source,
                target,
            } => self.replace_overwrite(
                *mode,
                *limit,
                original,
                replacement,
                *frequency,
                source,
                target,
                log,
            ),
            Statement::Enumerate {
                term,
                start,
                end,
                source,
                target,
            } => self.enumerate(term, *start, *end, source, target, log),
            Statement::Extract {
                source,
                start,
                end,
                target,
            } => self.extract(source, *start, *end, target, log),
            Statement::Invert { source, target } => self.invert(source, target, log),
            Statement::Fragment {
                source,
                delimiter,
                target,
            } => self.fragment(source, delimiter, target, log),
        }
    }

    // ========================================
    // Shared operations
    // ========================================

    fn resolve(&self, operand: &Operand) -> Result<String, EvalError> {
        match operand {
            Operand::Literal(s) => Ok(s.clone()),
            Operand::Variable(name) => self
                .variables
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
        }
    }

    fn open_paginated(&self, name: &str) -> Result<Box<dyn PagedDocument>, EvalError> {
        let bytes = self.storage.read(name)?;
        self.codec.open(&bytes).map_err(|e| codec_error(name, e))
    }

    /// Reads a whole document. Paginated documents are read as the text of
    /// their non-empty pages joined by newlines, unless `mode` is opaque.
    fn read_content(&self, name: &str, mode: ReadMode) -> Result<Content, EvalError> {
        if !Format::of(name).is_paginated() {
            let bytes = self.storage.read(name)?;
            return String::from_utf8(bytes).map(Content::Text).map_err(|_| {
                EvalError::InvalidParameter(format!("'{}' is not valid UTF-8 text", name))
            });
        }

        if mode == ReadMode::Opaque {
            return Ok(Content::Binary);
        }

        let doc = self.open_paginated(name)?;
        let mut pages = Vec::with_capacity(doc.page_count());
        for index in 0..doc.page_count() {
            let text = doc.page_text(index).map_err(|e| codec_error(name, e))?;
            if !text.is_empty() {
                pages.push(text);
            }
        }
        Ok(Content::Text(pages.join("\n")))
    }

    fn read_text(&self, name: &str) -> Result<String, EvalError> {
        match self.read_content(name, ReadMode::ExtractText)? {
            Content::Text(text) => Ok(text),
            Content::Binary => Err(EvalError::InvalidParameter(format!(
                "'{}' has no text content",
                name
            ))),
        }
    }

    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<(), EvalError> {
        self.storage.write(name, bytes)?;
        self.generated.insert(name.to_string());
        Ok(())
    }

    /// Writes text, rendering it onto pages when `name` is a paginated document.
    fn write_text(&mut self, name: &str, text: &str, log: &mut LogSection) -> Result<(), EvalError> {
        if Format::of(name).is_paginated() {
            let bytes = self
                .codec
                .render_text(text)
                .map_err(|e| codec_error(name, e))?;
            self.write_bytes(name, &bytes)?;
            log.info(format!("wrote '{}' (rendered as PDF)", name));
        } else {
            self.write_bytes(name, text.as_bytes())?;
            log.info(format!("wrote '{}'", name));
        }
        Ok(())
    }

    // ========================================
    // Commands
    // ========================================

    fn declare(&mut self, name: &str, value: &Operand, log: &mut LogSection) -> Result<(), EvalError> {
        // `var a = b` stores the word "b", never the value bound to b
        let value = match value {
            Operand::Literal(s) | Operand::Variable(s) => s.clone(),
        };
        log.info(format!("variable '{}' = '{}'", name, value));
        self.variables.insert(name.to_string(), value);
        Ok(())
    }

    fn search(
        &mut self,
        term: &Operand,
        document: &Operand,
        sensitivity: Sensitivity,
        log: &mut LogSection,
    ) -> Result<(), EvalError> {
        let term = self.resolve(term)?;
        let document = self.resolve(document)?;
        let content = self.read_text(&document)?;

        let count = transform::count_occurrences(&content, &term, sensitivity)
            .map_err(|e| EvalError::InvalidParameter(format!("bad search term: {}", e)))?;
        let sensitive = match sensitivity {
            Sensitivity::Sensitive => "yes",
            Sensitivity::Insensitive => "no",
        };
        log.info(format!(
            "found {} occurrence(s) of '{}' in '{}' (case-sensitive: {})",
            count, term, document, sensitive
        ));
        Ok(())
    }

    fn fusion(
        &mut self,
        first: &Operand,
        second: &Operand,
        separator: &Operand,
        output: &Operand,
        log: &mut LogSection,
    ) -> Result<(), EvalError> {
        let first = self.resolve(first)?;
        let second = self.resolve(second)?;
        let separator = self.resolve(separator)?;
        let output = self.resolve(output)?;

        let a = self.read_text(&first)?;
        let b = self.read_text(&second)?;
        log.info(format!("joining '{}' and '{}' into '{}'", first, second, output));
        self.write_text(&output, &transform::fuse(&a, &b, &separator), log)
    }

    #[allow(clippy::too_many_arguments)]
    fn replace_overwrite(
        &mut self,
        mode: WriteMode,
        limit: Limit,
        original: &Operand,
        replacement: &Operand,
        frequency: u64,
        source: &Operand,
        target: &Operand,
        log: &mut LogSection,
    ) -> Result<(), EvalError> {
        let original = self.resolve(original)?;
        let replacement = self.resolve(replacement)?;
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;

        if original.is_empty() {
            return Err(EvalError::InvalidParameter(
                "the term to replace cannot be empty".to_string(),
            ));
        }
        let frequency = NonZeroU64::new(frequency).ok_or_else(|| {
            EvalError::InvalidParameter("'cada' must be at least 1".to_string())
        })?;

        let content = self.read_text(&source)?;
        let rewrite = match mode {
            WriteMode::Replace => transform::replace(&content, &original, &replacement, frequency, limit),
            WriteMode::Overwrite => transform::overwrite(&content, &original, &replacement, frequency, limit),
        };

        if rewrite.matches == 0 {
            log.info(format!(
                "no occurrences of '{}' in '{}', copying unchanged",
                original, source
            ));
        } else {
            log.info(format!(
                "{} of {} occurrence(s) of '{}' rewritten (limit {}, every {})",
                rewrite.replaced, rewrite.matches, original, limit, frequency
            ));
        }
        self.write_text(&target, &rewrite.text, log)
    }

    fn enumerate(
        &mut self,
        term: &Operand,
        start: u64,
        end: u64,
        source: &Operand,
        target: &Operand,
        log: &mut LogSection,
    ) -> Result<(), EvalError> {
        let term = self.resolve(term)?;
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;

        if term.is_empty() {
            return Err(EvalError::InvalidParameter(
                "the term to enumerate cannot be empty".to_string(),
            ));
        }

        let content = self.read_text(&source)?;
        let direction = if start <= end { "ascending" } else { "descending" };
        log.info(format!(
            "{} sequence of {} value(s) from {} to {}",
            direction,
            transform::sequence_len(start, end),
            start,
            end
        ));

        let rewrite = transform::enumerate(&content, &term, start, end);
        if rewrite.matches == 0 {
            log.info(format!(
                "no occurrences of '{}' in '{}', copying unchanged",
                term, source
            ));
        } else {
            log.info(format!("{} occurrence(s) of '{}' numbered", rewrite.matches, term));
        }
        self.write_text(&target, &rewrite.text, log)
    }

    fn extract(
        &mut self,
        source: &Operand,
        start: u64,
        end: u64,
        target: &Operand,
        log: &mut LogSection,
    ) -> Result<(), EvalError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;

        if start == 0 || start > end {
            return Err(EvalError::InvalidRange {
                start,
                end,
                pages: None,
            });
        }
        require_paginated(&source, "source")?;

        let doc = self.open_paginated(&source)?;
        let total = doc.page_count();
        if end > total as u64 {
            return Err(EvalError::InvalidRange {
                start,
                end,
                pages: Some(total),
            });
        }

        // bounded by total above
        let order: Vec<usize> = (start as usize - 1..end as usize).collect();

        if Format::of(&target).is_paginated() {
            let bytes = doc.assemble(&order).map_err(|e| codec_error(&source, e))?;
            self.write_bytes(&target, &bytes)?;
            log.info(format!(
                "pages {}-{} of '{}' copied to '{}'",
                start, end, source, target
            ));
            Ok(())
        } else {
            let mut pages = Vec::with_capacity(order.len());
            for index in order {
                let text = doc.page_text(index).map_err(|e| codec_error(&source, e))?;
                pages.push((index + 1, text));
            }
            log.info(format!("text of pages {}-{} of '{}' extracted", start, end, source));
            self.write_text(&target, &transform::page_listing(&pages), log)
        }
    }

    fn invert(&mut self, source: &Operand, target: &Operand, log: &mut LogSection) -> Result<(), EvalError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        require_paginated(&source, "source")?;
        require_paginated(&target, "target")?;

        let doc = self.open_paginated(&source)?;
        let total = doc.page_count();
        if total == 0 {
            log.warn(format!("'{}' has no pages, nothing written", source));
            return Ok(());
        }

        let order: Vec<usize> = (0..total).rev().collect();
        let bytes = doc.assemble(&order).map_err(|e| codec_error(&source, e))?;
        self.write_bytes(&target, &bytes)?;
        log.info(format!("{} page(s) of '{}' reversed into '{}'", total, source, target));
        Ok(())
    }

    fn fragment(
        &mut self,
        source: &Operand,
        delimiter: &Operand,
        target: &Operand,
        log: &mut LogSection,
    ) -> Result<(), EvalError> {
        let source = self.resolve(source)?;
        let delimiter = self.resolve(delimiter)?;
        let target = self.resolve(target)?;

        let content = match self.read_content(&source, ReadMode::Opaque)? {
            Content::Text(text) => text,
            Content::Binary => {
                return Err(EvalError::InvalidParameter(format!(
                    "source '{}' must be a text document, not a PDF",
                    source
                )));
            }
        };
        if delimiter.is_empty() {
            return Err(EvalError::InvalidParameter(
                "the delimiter cannot be empty".to_string(),
            ));
        }

        let fragments = transform::fragment(&content, &delimiter);
        if fragments.is_empty() {
            log.warn(format!(
                "no fragments in '{}': the document is empty or holds only delimiters",
                source
            ));
            return Ok(());
        }

        let (base, ext) = split_extension(&target);
        for (n, body) in fragments.iter().enumerate() {
            let name = format!("{}{}{}", base, n + 1, ext);
            self.write_text(&name, body, log)?;
        }
        log.info(format!("'{}' split into {} fragment(s)", source, fragments.len()));
        Ok(())
    }
}
