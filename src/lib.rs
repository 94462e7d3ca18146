// Monkey Language Interpreter Library
//
// This is the core library for the Monkey language interpreter: a lexer,
// a Pratt parser, and a tree-walking evaluator over a dynamically-typed
// value model with lexical closures.

// Public modules
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{Block, Expr, Program, Stmt};
pub use error::{MonkeyError, Span};
pub use evaluator::{evaluate, Evaluator};
pub use lexer::{tokenize, Lexer, Token, TokenType};
pub use parser::{parse, Parser};
pub use value::{Env, Environment, HashKey, HashPair, Value};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
