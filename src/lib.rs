pub mod ast;
pub mod cli;
pub mod codec;
pub mod config;
pub mod document;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod storage;
pub mod transform;
pub mod workspace;

pub use ast::{Keyword, Operand, Program, Statement, Token};
pub use codec::{CodecError, PageCodec, PagedDocument, default_codec};
pub use config::Config;
pub use evaluator::{EvalError, Evaluator};
pub use interpreter::Interpreter;
pub use lexer::{LexError, Lexer, Position};
pub use output::{LogSection, RunResult, to_json, to_json_pretty};
pub use parser::{ParseError, Parser, parse_source};
pub use storage::{LocalStorage, MemoryStorage, Storage, StorageError};
pub use workspace::{Workspace, WorkspaceError};
