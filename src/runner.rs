use crate::error::MonkeyError;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;

/// Run a whole source string: lex, parse, evaluate. Parse diagnostics are
/// reported together; evaluation only happens for a clean parse.

pub fn run(source: &str, filename: Option<&str>) {
    let mut parser = Parser::new(Lexer::new(source.to_string()));
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        for error in parser.errors() {
            error.report(source, filename);
        }
        return;
    }

    let evaluator = Evaluator::new();
    match evaluator.eval_program(&program) {
        Value::Error(message) => {
            MonkeyError::runtime_error(message).report(source, filename);
        }
        Value::Null => {}
        value => println!("{}", value),
    }
}
