//! # Values Module / 值模块
//!
//! Runtime values and the shared [`Namespace`] binding map.
//!
//! 运行时值以及共享的 [`Namespace`] 绑定表。

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::interp::ast::FunctionDef;
use crate::interp::error::EvalResult;
use crate::interp::eval::Interpreter;

/// A mutable, shareable map of names to values.
///
/// Cloning a `Namespace` shares the underlying map; use [`Namespace::snapshot`]
/// to get an independent copy.
#[derive(Clone, Default)]
pub struct Namespace(Rc<RefCell<HashMap<String, Value>>>);

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.0.borrow().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.borrow().contains_key(name)
    }

    /// A shallow copy: new bindings, same values.
    pub fn snapshot(&self) -> Self {
        Self(Rc::new(RefCell::new(self.0.borrow().clone())))
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Namespace {
    // Values may refer back to this namespace (a function's globals), so only names are shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Call arguments: positional values followed by keyword values.
#[derive(Debug, Clone, Default)]
pub struct Args {
    pub positional: Vec<Value>,
    pub keywords: Vec<(String, Value)>,
}

impl Args {
    pub fn positional(values: Vec<Value>) -> Self {
        Self {
            positional: values,
            keywords: Vec::new(),
        }
    }

    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keywords
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Signature of a function implemented in Rust.
pub type NativeFn = fn(&mut Interpreter, Args) -> EvalResult<Value>;

/// A builtin or registry-provided function.
pub struct NativeFunction {
    pub name: String,
    pub doc: Option<String>,
    pub func: NativeFn,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A user-defined function closed over its defining scopes.
#[derive(Debug)]
pub struct Function {
    pub def: Rc<FunctionDef>,
    pub globals: Namespace,
    /// Enclosing function scopes, innermost last.
    pub enclosing: Vec<Namespace>,
    /// Default values, aligned with `def.params`.
    pub defaults: Vec<Option<Value>>,
}

#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub attrs: Namespace,
}

#[derive(Debug)]
pub struct Instance {
    pub class: Rc<Class>,
    pub attrs: Namespace,
}

#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Rc<RefCell<Vec<Value>>>),
    /// Insertion-ordered entries; keys are compared with value equality.
    Dict(Rc<RefCell<Vec<(Value, Value)>>>),
    Function(Rc<Function>),
    Native(Rc<NativeFunction>),
    Class(Rc<Class>),
    Instance(Rc<Instance>),
    BoundMethod {
        receiver: Rc<Instance>,
        func: Rc<Function>,
    },
    /// A method of a builtin type (`"abc".upper`), bound to its receiver.
    BuiltinMethod {
        receiver: Box<Value>,
        name: String,
    },
    Exception {
        kind: String,
        message: String,
    },
}

impl Value {
    pub fn str(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    pub fn list(items: Vec<Value>) -> Self {
        Self::List(Rc::new(RefCell::new(items)))
    }

    pub fn dict(entries: Vec<(Value, Value)>) -> Self {
        Self::Dict(Rc::new(RefCell::new(entries)))
    }

    pub fn native(name: &str, doc: Option<&str>, func: NativeFn) -> Self {
        Self::Native(Rc::new(NativeFunction {
            name: name.to_string(),
            doc: doc.map(str::to_string),
            func,
        }))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The type name used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Self::None => "NoneType".to_string(),
            Self::Bool(_) => "bool".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Str(_) => "str".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Dict(_) => "dict".to_string(),
            Self::Function(_) => "function".to_string(),
            Self::Native(_) => "builtin_function_or_method".to_string(),
            Self::Class(_) => "type".to_string(),
            Self::Instance(instance) => instance.class.name.clone(),
            Self::BoundMethod { .. } => "method".to_string(),
            Self::BuiltinMethod { .. } => "builtin_function_or_method".to_string(),
            Self::Exception { kind, .. } => kind.clone(),
        }
    }

    pub fn truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.borrow().is_empty(),
            Self::Dict(entries) => !entries.borrow().is_empty(),
            _ => true,
        }
    }

    /// Integer view of `bool` and `int` values.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Bool(b) => Some(i64::from(*b)),
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Float view of any numeric value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            other => other.as_int().map(|i| i as f64),
        }
    }
}

/// Render a float the way an interactive session echoes it (`1.0`, `0.1`, `1e+16`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }
    let formatted = format!("{value}");
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

/// Quote a string literal, preferring single quotes.
pub fn quote_str(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
