use crate::ast::{Block, Expr, Program, Stmt};
use crate::value::{Env, Environment, HashPair, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Holds the top-level environment so bindings survive across programs,
/// which is what keeps `let` definitions alive between REPL lines.
pub struct Evaluator {
    env: Env,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            env: Rc::new(RefCell::new(Environment::new())),
        }
    }

    pub fn eval_program(&self, program: &Program) -> Value {
        evaluate(program, &self.env)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk the program against the given environment. A `ReturnValue` is
/// unwrapped here, once; an `Error` aborts the walk and becomes the
/// program's final value.
pub fn evaluate(program: &Program, env: &Env) -> Value {
    let mut result = Value::Null;

    for statement in &program.statements {
        match eval_statement(statement, env) {
            Value::Return(inner) => return *inner,
            error @ Value::Error(_) => return error,
            value => result = value,
        }
    }

    result
}

fn eval_statement(statement: &Stmt, env: &Env) -> Value {
    match statement {
        Stmt::Expression { expr } => eval_expression(expr, env),
        Stmt::Let { name, value } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            env.borrow_mut().set(name.clone(), value);
            Value::Null
        }
        Stmt::Return { value } => {
            let value = eval_expression(value, env);
            if value.is_error() {
                return value;
            }
            Value::Return(Box::new(value))
        }
    }
}

/// Unlike the program walk, a block hands back `ReturnValue` and `Error`
/// results unchanged, so a `return` in a nested block bubbles through
/// every enclosing `if` before the program or call boundary unwraps it.
fn eval_block(block: &Block, env: &Env) -> Value {
    let mut result = Value::Null;

    for statement in &block.statements {
        match eval_statement(statement, env) {
            value @ (Value::Return(_) | Value::Error(_)) => return value,
            value => result = value,
        }
    }

    result
}

fn eval_expression(expr: &Expr, env: &Env) -> Value {
    match expr {
        Expr::IntegerLiteral(value) => Value::Integer(*value),
        Expr::StringLiteral(value) => Value::String(value.clone()),
        Expr::BooleanLiteral(value) => Value::Boolean(*value),
        Expr::Identifier(name) => eval_identifier(name, env),
        Expr::Prefix { operator, right } => {
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            eval_prefix_expression(operator, right)
        }
        Expr::Infix {
            left,
            operator,
            right,
        } => {
            // Right operand first; observable through which error surfaces.
            let right = eval_expression(right, env);
            if right.is_error() {
                return right;
            }
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            eval_infix_expression(operator, left, right)
        }
        Expr::If {
            condition,
            consequence,
            alternative,
        } => {
            let condition = eval_expression(condition, env);
            if condition.is_error() {
                return condition;
            }
            if condition.is_truthy() {
                eval_block(consequence, env)
            } else if let Some(alternative) = alternative {
                eval_block(alternative, env)
            } else {
                Value::Null
            }
        }
        Expr::Function { parameters, body } => Value::Function {
            parameters: parameters.clone(),
            body: body.clone(),
            env: Rc::clone(env),
        },
        Expr::Call {
            function,
            arguments,
        } => {
            let function = eval_expression(function, env);
            if function.is_error() {
                return function;
            }
            let arguments = match eval_expressions(arguments, env) {
                Ok(arguments) => arguments,
                Err(error) => return error,
            };
            apply_function(function, arguments)
        }
        Expr::Array { elements } => match eval_expressions(elements, env) {
            Ok(elements) => Value::Array(elements),
            Err(error) => error,
        },
        Expr::Index { left, index } => {
            let left = eval_expression(left, env);
            if left.is_error() {
                return left;
            }
            let index = eval_expression(index, env);
            if index.is_error() {
                return index;
            }
            eval_index_expression(left, index)
        }
        Expr::Hash { pairs } => eval_hash_literal(pairs, env),
    }
}

fn eval_identifier(name: &str, env: &Env) -> Value {
    if let Some(value) = env.borrow().get(name) {
        return value;
    }
    if let Some(builtin) = builtin(name) {
        return builtin;
    }
    Value::Error(format!("identifier not found: {}", name))
}

/// Left-to-right, aborting on the first error.
fn eval_expressions(exprs: &[Expr], env: &Env) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env);
        if value.is_error() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => eval_bang_operator(right),
        "-" => eval_minus_operator(right),
        _ => Value::Error(format!(
            "unknown operator: {}{}",
            operator,
            right.type_name()
        )),
    }
}

fn eval_bang_operator(right: Value) -> Value {
    match right {
        Value::Boolean(value) => Value::Boolean(!value),
        Value::Null => Value::Boolean(true),
        _ => Value::Boolean(false),
    }
}

fn eval_minus_operator(right: Value) -> Value {
    match right {
        Value::Integer(value) => Value::Integer(value.wrapping_neg()),
        _ => Value::Error(format!("unknown operator: -{}", right.type_name())),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        (Value::Boolean(l), Value::Boolean(r)) => eval_boolean_infix(operator, *l, *r),
        _ if left.type_name() != right.type_name() => Value::Error(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),
        // The missing 'n' in "unkown" is load-bearing; the test suite
        // asserts this exact text.
        _ => Value::Error(format!(
            "unkown operator: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left.wrapping_add(right)),
        "-" => Value::Integer(left.wrapping_sub(right)),
        "*" => Value::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(left.wrapping_div(right))
            }
        }
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        _ => Value::Error(format!("unkown operator: INTEGER {} INTEGER", operator)),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::String(format!("{}{}", left, right)),
        _ => Value::Error(format!("unknown operator: STRING {} STRING", operator)),
    }
}

fn eval_boolean_infix(operator: &str, left: bool, right: bool) -> Value {
    match operator {
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        _ => Value::Error(format!("unknown operator: BOOLEAN {} BOOLEAN", operator)),
    }
}

fn apply_function(function: Value, arguments: Vec<Value>) -> Value {
    match function {
        Value::Function {
            parameters,
            body,
            env,
        } => {
            if arguments.len() != parameters.len() {
                return Value::Error(format!(
                    "wrong number of arguments: got={}, want={}",
                    arguments.len(),
                    parameters.len()
                ));
            }

            let call_env = Rc::new(RefCell::new(Environment::new_enclosed(env)));
            for (parameter, argument) in parameters.iter().zip(arguments) {
                call_env.borrow_mut().set(parameter.clone(), argument);
            }

            match eval_block(&body, &call_env) {
                Value::Return(inner) => *inner,
                other => other,
            }
        }
        Value::Builtin(function) => function(arguments),
        other => Value::Error(format!("not a function: {}", other.type_name())),
    }
}

fn eval_index_expression(left: Value, index: Value) -> Value {
    match (left, index) {
        (Value::Array(elements), Value::Integer(i)) => {
            if i < 0 || i as usize >= elements.len() {
                Value::Null
            } else {
                elements[i as usize].clone()
            }
        }
        (Value::Hash(pairs), index) => match index.hash_key() {
            Some(key) => pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::Null),
            None => Value::Error(format!("unusable as hash key: {}", index.type_name())),
        },
        (left, _) => Value::Error(format!(
            "index operator not supported: {}",
            left.type_name()
        )),
    }
}

fn eval_hash_literal(pairs: &[(Expr, Expr)], env: &Env) -> Value {
    let mut map = HashMap::new();

    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env);
        if key.is_error() {
            return key;
        }
        let hash_key = match key.hash_key() {
            Some(hash_key) => hash_key,
            None => {
                return Value::Error(format!("unusable as hash key: {}", key.type_name()));
            }
        };

        let value = eval_expression(value_expr, env);
        if value.is_error() {
            return value;
        }

        // Duplicate keys overwrite the earlier pair.
        map.insert(hash_key, HashPair { key, value });
    }

    Value::Hash(map)
}

fn builtin(name: &str) -> Option<Value> {
    match name {
        "len" => Some(Value::Builtin(builtin_len)),
        "exit" => Some(Value::Builtin(builtin_exit)),
        _ => None,
    }
}

fn builtin_len(arguments: Vec<Value>) -> Value {
    if arguments.len() != 1 {
        return Value::Error(format!(
            "wrong number of arguments. got={}, want=1",
            arguments.len()
        ));
    }

    match &arguments[0] {
        Value::String(value) => Value::Integer(value.len() as i64),
        other => Value::Error(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        )),
    }
}

fn builtin_exit(_arguments: Vec<Value>) -> Value {
    std::process::exit(1);
}
