use crate::ast::Block;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Shared-ownership handle for environments. Function values capture their
/// definition environment through this handle; a recursive `let` binds the
/// function into the very environment it captured, so cycles are possible
/// and are only reclaimed when the interpreter instance is dropped.
pub type Env = Rc<RefCell<Environment>>;

pub type BuiltinFn = fn(Vec<Value>) -> Value;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(Vec<Value>),
    Hash(HashMap<HashKey, HashPair>),
    Function {
        parameters: Vec<String>,
        body: Block,
        env: Env,
    },
    Builtin(BuiltinFn),
    /// Wrapper produced by `return`; passes through block evaluation
    /// unchanged and is unwrapped exactly once at the program or call
    /// boundary. Never observable outside the evaluator.
    Return(Box<Value>),
    Error(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function { .. } => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Return(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
        }
    }

    /// Only `false` and `NULL` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(value) => *value,
            Value::Null => false,
            _ => true,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Physical key for hash storage. Only integers, booleans and strings
    /// are hashable; everything else returns None and the evaluator turns
    /// that into an "unusable as hash key" error.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(value) => Some(HashKey {
                kind: self.type_name(),
                value: *value as u64,
            }),
            Value::Boolean(value) => Some(HashKey {
                kind: self.type_name(),
                value: *value as u64,
            }),
            Value::String(value) => Some(HashKey {
                kind: self.type_name(),
                value: fnv1a_64(value.as_bytes()),
            }),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(l), Value::Integer(r)) => l == r,
            (Value::Boolean(l), Value::Boolean(r)) => l == r,
            (Value::String(l), Value::String(r)) => l == r,
            (Value::Null, Value::Null) => true,
            (Value::Array(l), Value::Array(r)) => l == r,
            (Value::Hash(l), Value::Hash(r)) => l == r,
            (Value::Return(l), Value::Return(r)) => l == r,
            (Value::Error(l), Value::Error(r)) => l == r,
            (Value::Builtin(l), Value::Builtin(r)) => l == r,
            // Captured environments can be cyclic; compare them by handle
            // identity rather than by contents.
            (
                Value::Function {
                    parameters: lp,
                    body: lb,
                    env: le,
                },
                Value::Function {
                    parameters: rp,
                    body: rb,
                    env: re,
                },
            ) => lp == rp && lb == rb && Rc::ptr_eq(le, re),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{}", value),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::String(value) => write!(f, "{}", value),
            Value::Null => write!(f, "NULL"),
            Value::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Value::Hash(pairs) => {
                let pairs: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{} : {}", pair.key, pair.value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Value::Function {
                parameters, body, ..
            } => {
                write!(f, "fn ({}) {{\n{}\n}}", parameters.join(", "), body)
            }
            Value::Builtin(_) => write!(f, "builtin function"),
            Value::Return(value) => write!(f, "{}", value),
            Value::Error(message) => write!(f, "Error: {}", message),
        }
    }
}

/// Hash entries keep the original key value alongside the stored value so
/// hashes can be inspected and printed.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// `(type tag, 64-bit hash)` pair used as the physical hash key. Carrying
/// the tag keeps `1` and `true` distinct even though both hash to 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: &'static str,
    pub value: u64,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the UTF-8 bytes, used for string hash keys.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Name-to-value mapping with an optional enclosing scope. Lookup walks
/// outward; `set` always writes into the innermost store.
#[derive(Debug)]
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Env>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            outer: None,
        }
    }

    pub fn new_enclosed(outer: Env) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.get(name) {
            Some(value.clone())
        } else if let Some(ref outer) = self.outer {
            outer.borrow().get(name)
        } else {
            None
        }
    }

    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
