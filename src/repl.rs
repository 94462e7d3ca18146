use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::value::Value;
use std::env;
use std::io::{self, Write};

/// Interactive loop. A single evaluator is kept alive for the whole
/// session so `let` bindings persist between lines.

pub fn start() {
    let username = env::var("USER").unwrap_or_else(|_| "there".to_string());
    println!(
        "Hello {}! Welcome to the Monkey programming language",
        username
    );
    println!("Feel free to type in commands, 'exit' to quit");
    println!();

    let evaluator = Evaluator::new();

    loop {
        print!(">>> ");
        io::stdout().flush().unwrap();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                run_repl_command(line, &evaluator);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_repl_command(source: &str, evaluator: &Evaluator) {
    let mut parser = Parser::new(Lexer::new(source.to_string()));
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        for error in parser.errors() {
            error.report(source, None);
        }
        return;
    }

    match evaluator.eval_program(&program) {
        // Null covers both `let` bindings and empty input; echoing it
        // every line is just noise.
        Value::Null => {}
        value => println!("{}", value),
    }
}
