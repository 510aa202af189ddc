//! Entry point that ties parsing and evaluation together.

use crate::{
    codec::{PageCodec, default_codec},
    evaluator::Evaluator,
    output::RunResult,
    parser::parse_source,
    storage::{LocalStorage, Storage},
};

/// Runs ArkScript programs against one document store.
///
/// Every [`run`](Interpreter::run) starts from a clean slate: variables and
/// the generated-file set never leak from one script into the next.
///
/// # Examples
///
/// ```
/// use arkscript::codec::SheetCodec;
/// use arkscript::storage::MemoryStorage;
/// use arkscript::Interpreter;
///
/// let storage = MemoryStorage::new().with("a.txt", "hola hola");
/// let interpreter = Interpreter::new(storage.clone(), SheetCodec::default());
///
/// let result = interpreter.run(r#"reemplazar todo "hola" con "adios" de "a.txt" en "b.txt""#);
/// assert!(!result.failed);
/// assert_eq!(storage.text("b.txt").as_deref(), Some("adios adios"));
/// ```
pub struct Interpreter<S, C> {
    storage: S,
    codec: C,
}

impl<S: Storage, C: PageCodec> Interpreter<S, C> {
    pub fn new(storage: S, codec: C) -> Self {
        Interpreter { storage, codec }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Lex, parse and evaluate `source`.
    ///
    /// A lexing or parsing error aborts before anything runs and comes back
    /// as a failed result with no sections.
    #[tracing::instrument(level = "info", skip_all, fields(bytes = source.len()))]
    pub fn run(&self, source: &str) -> RunResult {
        let program = match parse_source(source) {
            Ok(program) => program,
            Err(e) => {
                tracing::warn!(error = %e, "script rejected");
                return RunResult::fatal(e.to_string());
            }
        };

        let result = Evaluator::new(&self.storage, &self.codec).evaluate(&program);
        tracing::info!(
            codec = self.codec.name(),
            statements = result.sections.len(),
            errors = result.statement_errors(),
            generated = result.generated_files.len(),
            "run finished"
        );
        result
    }
}

impl Interpreter<LocalStorage, Box<dyn PageCodec>> {
    /// Interpreter over a directory, using the paginated codec this build supports.
    pub fn local(storage: LocalStorage) -> Self {
        Interpreter::new(storage, default_codec())
    }
}
