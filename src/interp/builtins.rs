//! # Builtins Module / 内置函数模块
//!
//! Builtin functions, exception constructors and methods of builtin types.
//!
//! 内置函数、异常构造器以及内置类型的方法。

use std::cmp::Ordering;

use crate::interp::ast::BinOp;
use crate::interp::error::{EvalError, EvalResult};
use crate::interp::eval::Interpreter;
use crate::interp::ops;
use crate::interp::value::{quote_str, Args, Namespace, NativeFn, Value};

/// Exception kinds that can be constructed and raised by name.
pub const EXCEPTION_KINDS: &[&str] = &[
    "Exception",
    "ValueError",
    "TypeError",
    "KeyError",
    "IndexError",
    "ZeroDivisionError",
    "AssertionError",
    "RuntimeError",
    "NameError",
    "AttributeError",
];

const STR_METHODS: &[&str] = &[
    "upper", "lower", "strip", "lstrip", "rstrip", "split", "join", "replace", "startswith",
    "endswith",
];
const LIST_METHODS: &[&str] = &["append", "pop", "extend", "index"];
const DICT_METHODS: &[&str] = &["get", "keys", "values"];

pub fn is_exception_kind(name: &str) -> bool {
    EXCEPTION_KINDS.contains(&name)
}

/// The builtin namespace consulted after module globals.
pub fn namespace() -> Namespace {
    let table: &[(&str, NativeFn)] = &[
        ("print", print),
        ("len", len),
        ("str", str_),
        ("repr", repr),
        ("int", int),
        ("float", float),
        ("bool", bool_),
        ("abs", abs),
        ("min", min),
        ("max", max),
        ("sum", sum),
        ("range", range),
        ("sorted", sorted),
        ("list", list),
        ("round", round),
        ("Exception", exception),
        ("ValueError", value_error),
        ("TypeError", type_error),
        ("KeyError", key_error),
        ("IndexError", index_error),
        ("ZeroDivisionError", zero_division_error),
        ("AssertionError", assertion_error),
        ("RuntimeError", runtime_error),
        ("NameError", name_error),
        ("AttributeError", attribute_error),
    ];
    let namespace = Namespace::new();
    for (name, func) in table {
        namespace.set(*name, Value::native(name, None, *func));
    }
    namespace
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Check positional arity and keyword names of a builtin call.
fn arguments(name: &str, args: &Args, min: usize, max: usize, keywords: &[&str]) -> EvalResult<()> {
    let given = args.positional.len();
    if given < min || given > max {
        let message = if min == max {
            format!("{name}() takes exactly {min} argument{} ({given} given)", plural(min))
        } else if given > max {
            format!("{name}() takes at most {max} argument{} ({given} given)", plural(max))
        } else {
            format!("{name}() takes at least {min} argument{} ({given} given)", plural(min))
        };
        return Err(EvalError::type_error(message));
    }
    if let Some((key, _)) = args.keywords.iter().find(|(key, _)| !keywords.contains(&key.as_str())) {
        return Err(EvalError::type_error(format!(
            "{name}() got an unexpected keyword argument '{key}'"
        )));
    }
    Ok(())
}

fn expect_str<'a>(value: &'a Value, what: &str) -> EvalResult<&'a str> {
    match value {
        Value::Str(s) => Ok(s.as_str()),
        other => Err(EvalError::type_error(format!(
            "{what} must be str, not {}",
            other.type_name()
        ))),
    }
}

// ── Functions ─────────────────────────────────────────────────────────────

fn print(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("print", &args, 0, usize::MAX, &["sep", "end"])?;
    let sep = match args.keyword("sep") {
        None | Some(Value::None) => " ".to_string(),
        Some(value) => expect_str(value, "sep")?.to_string(),
    };
    let end = match args.keyword("end") {
        None | Some(Value::None) => "\n".to_string(),
        Some(value) => expect_str(value, "end")?.to_string(),
    };
    let mut parts = Vec::with_capacity(args.positional.len());
    for value in &args.positional {
        parts.push(interp.str(value)?);
    }
    let line = parts.join(&sep);
    interp.write(&line);
    interp.write(&end);
    Ok(Value::None)
}

fn len(_: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("len", &args, 1, 1, &[])?;
    let length = match &args.positional[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Dict(entries) => entries.borrow().len(),
        other => {
            return Err(EvalError::type_error(format!(
                "object of type '{}' has no len()",
                other.type_name()
            )));
        }
    };
    Ok(Value::Int(i64::try_from(length).unwrap_or(i64::MAX)))
}

fn str_(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("str", &args, 0, 1, &[])?;
    match args.positional.first() {
        Some(value) => interp.str(value).map(Value::Str),
        None => Ok(Value::str("")),
    }
}

fn repr(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("repr", &args, 1, 1, &[])?;
    interp.repr(&args.positional[0]).map(Value::Str)
}

fn int(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("int", &args, 0, 1, &[])?;
    let Some(value) = args.positional.first() else {
        return Ok(Value::Int(0));
    };
    match value {
        Value::Float(f) if f.is_finite() => Ok(Value::Int(f.trunc() as i64)),
        Value::Float(f) => Err(EvalError::value_error(format!(
            "cannot convert float {} to integer",
            interp.repr(&Value::Float(*f))?
        ))),
        Value::Str(s) => s
            .trim()
            .replace('_', "")
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| {
                EvalError::value_error(format!(
                    "invalid literal for int() with base 10: {}",
                    quote_str(s)
                ))
            }),
        other => other.as_int().map(Value::Int).ok_or_else(|| {
            EvalError::type_error(format!(
                "int() argument must be a string or a real number, not '{}'",
                other.type_name()
            ))
        }),
    }
}

fn float(_: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("float", &args, 0, 1, &[])?;
    let Some(value) = args.positional.first() else {
        return Ok(Value::Float(0.0));
    };
    match value {
        Value::Str(s) => {
            let trimmed = s.trim();
            let parsed = match trimmed.to_ascii_lowercase().as_str() {
                "inf" | "+inf" | "infinity" => Some(f64::INFINITY),
                "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
                "nan" => Some(f64::NAN),
                _ => trimmed.parse::<f64>().ok(),
            };
            parsed.map(Value::Float).ok_or_else(|| {
                EvalError::value_error(format!(
                    "could not convert string to float: {}",
                    quote_str(s)
                ))
            })
        }
        other => other.as_float().map(Value::Float).ok_or_else(|| {
            EvalError::type_error(format!(
                "float() argument must be a string or a real number, not '{}'",
                other.type_name()
            ))
        }),
    }
}

fn bool_(_: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("bool", &args, 0, 1, &[])?;
    Ok(Value::Bool(args.positional.first().is_some_and(Value::truthy)))
}

fn abs(_: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("abs", &args, 1, 1, &[])?;
    match &args.positional[0] {
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => match other.as_int() {
            Some(i) => i
                .checked_abs()
                .map(Value::Int)
                .ok_or_else(|| EvalError::raised("OverflowError", "integer result too large")),
            None => Err(EvalError::type_error(format!(
                "bad operand type for abs(): '{}'",
                other.type_name()
            ))),
        },
    }
}

fn extremum(interp: &mut Interpreter, args: Args, name: &str, wanted: Ordering) -> EvalResult<Value> {
    arguments(name, &args, 1, usize::MAX, &[])?;
    let candidates = if args.positional.len() == 1 {
        interp.iterate(&args.positional[0])?
    } else {
        args.positional
    };
    let mut iter = candidates.into_iter();
    let Some(mut best) = iter.next() else {
        return Err(EvalError::value_error(format!("{name}() arg is an empty sequence")));
    };
    let symbol = if wanted == Ordering::Less { "<" } else { ">" };
    for candidate in iter {
        if ops::order(symbol, &candidate, &best)? == wanted {
            best = candidate;
        }
    }
    Ok(best)
}

fn min(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    extremum(interp, args, "min", Ordering::Less)
}

fn max(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    extremum(interp, args, "max", Ordering::Greater)
}

fn sum(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("sum", &args, 1, 2, &["start"])?;
    let mut total = args
        .positional
        .get(1)
        .or_else(|| args.keyword("start"))
        .cloned()
        .unwrap_or(Value::Int(0));
    if matches!(total, Value::Str(_)) {
        return Err(EvalError::type_error(
            "sum() can't sum strings [use ''.join(seq) instead]",
        ));
    }
    for item in interp.iterate(&args.positional[0])? {
        total = ops::binary(BinOp::Add, &total, &item)?;
    }
    Ok(total)
}

fn range(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("range", &args, 1, 3, &[])?;
    let mut bounds = Vec::with_capacity(args.positional.len());
    for value in &args.positional {
        bounds.push(value.as_int().ok_or_else(|| {
            EvalError::type_error(format!(
                "'{}' object cannot be interpreted as an integer",
                value.type_name()
            ))
        })?);
    }
    let (start, stop, step) = match bounds.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => (0, 0, 1),
    };
    if step == 0 {
        return Err(EvalError::value_error("range() arg 3 must not be zero"));
    }
    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        interp.tick()?;
        items.push(Value::Int(current));
        current = match current.checked_add(step) {
            Some(next) => next,
            None => break,
        };
    }
    Ok(Value::list(items))
}

/// Stable insertion sort with a fallible comparison.
fn sort_values(items: &mut [Value]) -> EvalResult<()> {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && ops::order("<", &items[j], &items[j - 1])? == Ordering::Less {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
    Ok(())
}

fn sorted(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("sorted", &args, 1, 1, &["reverse"])?;
    let mut items = interp.iterate(&args.positional[0])?;
    sort_values(&mut items)?;
    if args.keyword("reverse").is_some_and(Value::truthy) {
        items.reverse();
    }
    Ok(Value::list(items))
}

fn list(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("list", &args, 0, 1, &[])?;
    match args.positional.first() {
        Some(value) => interp.iterate(value).map(Value::list),
        None => Ok(Value::list(Vec::new())),
    }
}

fn round(_: &mut Interpreter, args: Args) -> EvalResult<Value> {
    arguments("round", &args, 1, 2, &["ndigits"])?;
    let ndigits = args.positional.get(1).or_else(|| args.keyword("ndigits"));
    let value = &args.positional[0];
    match (value, ndigits) {
        (Value::Float(f), None | Some(Value::None)) => {
            if !f.is_finite() {
                return Err(EvalError::value_error("cannot convert float to integer"));
            }
            Ok(Value::Int(f.round_ties_even() as i64))
        }
        (Value::Float(f), Some(digits)) => {
            let digits = digits.as_int().ok_or_else(|| {
                EvalError::type_error("'ndigits' must be an integer")
            })?;
            let scale = 10f64.powi(i32::try_from(digits).unwrap_or(0));
            Ok(Value::Float((f * scale).round_ties_even() / scale))
        }
        (other, _) => other.as_int().map(Value::Int).ok_or_else(|| {
            EvalError::type_error(format!(
                "type {} doesn't define __round__ method",
                other.type_name()
            ))
        }),
    }
}

fn make_exception(interp: &mut Interpreter, kind: &str, args: Args) -> EvalResult<Value> {
    arguments(kind, &args, 0, usize::MAX, &[])?;
    let message = match args.positional.as_slice() {
        [] => String::new(),
        [only] => interp.str(only)?,
        many => {
            let mut parts = Vec::with_capacity(many.len());
            for value in many {
                parts.push(interp.repr(value)?);
            }
            format!("({})", parts.join(", "))
        }
    };
    Ok(Value::Exception {
        kind: kind.to_string(),
        message,
    })
}

macro_rules! exception_constructor {
    ($($func:ident => $kind:literal),* $(,)?) => {
        $(
            fn $func(interp: &mut Interpreter, args: Args) -> EvalResult<Value> {
                make_exception(interp, $kind, args)
            }
        )*
    };
}

exception_constructor! {
    exception => "Exception",
    value_error => "ValueError",
    type_error => "TypeError",
    key_error => "KeyError",
    index_error => "IndexError",
    zero_division_error => "ZeroDivisionError",
    assertion_error => "AssertionError",
    runtime_error => "RuntimeError",
    name_error => "NameError",
    attribute_error => "AttributeError",
}

// ── Methods ───────────────────────────────────────────────────────────────

/// Whether `value` has a builtin method called `name`.
pub fn has_method(value: &Value, name: &str) -> bool {
    match value {
        Value::Str(_) => STR_METHODS.contains(&name),
        Value::List(_) => LIST_METHODS.contains(&name),
        Value::Dict(_) => DICT_METHODS.contains(&name),
        _ => false,
    }
}

/// Invoke the builtin method `name` on `receiver`.
pub fn call_method(interp: &mut Interpreter, receiver: &Value, name: &str, args: Args) -> EvalResult<Value> {
    match receiver {
        Value::Str(text) => str_method(interp, text, name, args),
        Value::List(_) => list_method(interp, receiver, name, args),
        Value::Dict(_) => dict_method(receiver, name, args),
        other => Err(EvalError::attribute_error(&other.type_name(), name)),
    }
}

fn strip_chars(args: &Args, name: &str) -> EvalResult<Option<Vec<char>>> {
    arguments(name, args, 0, 1, &[])?;
    match args.positional.first() {
        None | Some(Value::None) => Ok(None),
        Some(value) => Ok(Some(expect_str(value, "strip arg")?.chars().collect())),
    }
}

fn str_method(interp: &mut Interpreter, text: &str, name: &str, args: Args) -> EvalResult<Value> {
    match name {
        "upper" => {
            arguments(name, &args, 0, 0, &[])?;
            Ok(Value::str(text.to_uppercase()))
        }
        "lower" => {
            arguments(name, &args, 0, 0, &[])?;
            Ok(Value::str(text.to_lowercase()))
        }
        "strip" | "lstrip" | "rstrip" => {
            let chars = strip_chars(&args, name)?;
            let strippable = |c: char| match &chars {
                Some(set) => set.contains(&c),
                None => c.is_whitespace(),
            };
            let stripped = match name {
                "lstrip" => text.trim_start_matches(strippable),
                "rstrip" => text.trim_end_matches(strippable),
                _ => text.trim_matches(strippable),
            };
            Ok(Value::str(stripped))
        }
        "split" => {
            arguments(name, &args, 0, 1, &["sep"])?;
            let sep = args.positional.first().or_else(|| args.keyword("sep"));
            let parts: Vec<Value> = match sep {
                None | Some(Value::None) => text.split_whitespace().map(Value::str).collect(),
                Some(sep) => {
                    let sep = expect_str(sep, "separator")?;
                    if sep.is_empty() {
                        return Err(EvalError::value_error("empty separator"));
                    }
                    text.split(sep).map(Value::str).collect()
                }
            };
            Ok(Value::list(parts))
        }
        "join" => {
            arguments(name, &args, 1, 1, &[])?;
            let items = interp.iterate(&args.positional[0])?;
            let mut parts = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::Str(s) => parts.push(s.clone()),
                    other => {
                        return Err(EvalError::type_error(format!(
                            "sequence item {index}: expected str instance, {} found",
                            other.type_name()
                        )));
                    }
                }
            }
            Ok(Value::str(parts.join(text)))
        }
        "replace" => {
            arguments(name, &args, 2, 2, &[])?;
            let old = expect_str(&args.positional[0], "replace() argument 1")?;
            let new = expect_str(&args.positional[1], "replace() argument 2")?;
            let hits = if old.is_empty() {
                text.chars().count() + 1
            } else {
                text.matches(old).count()
            };
            let inserted = ops::sequence_len(new.len(), hits)?;
            ops::sequence_len(text.len() + inserted, 1)?;
            Ok(Value::str(text.replace(old, new)))
        }
        "startswith" | "endswith" => {
            arguments(name, &args, 1, 1, &[])?;
            let affix = expect_str(&args.positional[0], &format!("{name} first arg"))?;
            let found = if name == "startswith" {
                text.starts_with(affix)
            } else {
                text.ends_with(affix)
            };
            Ok(Value::Bool(found))
        }
        _ => Err(EvalError::attribute_error("str", name)),
    }
}

fn list_method(interp: &mut Interpreter, receiver: &Value, name: &str, args: Args) -> EvalResult<Value> {
    let Value::List(items) = receiver else {
        return Err(EvalError::attribute_error(&receiver.type_name(), name));
    };
    match name {
        "append" => {
            arguments(name, &args, 1, 1, &[])?;
            items.borrow_mut().push(args.positional[0].clone());
            Ok(Value::None)
        }
        "extend" => {
            arguments(name, &args, 1, 1, &[])?;
            let more = interp.iterate(&args.positional[0])?;
            items.borrow_mut().extend(more);
            Ok(Value::None)
        }
        "pop" => {
            arguments(name, &args, 0, 1, &[])?;
            let mut items = items.borrow_mut();
            if items.is_empty() {
                return Err(EvalError::raised("IndexError", "pop from empty list"));
            }
            let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
            let index = match args.positional.first() {
                Some(value) => value.as_int().ok_or_else(|| {
                    EvalError::type_error(format!(
                        "'{}' object cannot be interpreted as an integer",
                        value.type_name()
                    ))
                })?,
                None => -1,
            };
            let index = if index < 0 { index + len } else { index };
            match usize::try_from(index) {
                Ok(index) if index < items.len() => Ok(items.remove(index)),
                _ => Err(EvalError::raised("IndexError", "pop index out of range")),
            }
        }
        "index" => {
            arguments(name, &args, 1, 1, &[])?;
            let needle = &args.positional[0];
            let position = items.borrow().iter().position(|item| ops::equal(item, needle));
            match position {
                Some(index) => Ok(Value::Int(i64::try_from(index).unwrap_or(i64::MAX))),
                None => Err(EvalError::value_error(format!(
                    "{} is not in list",
                    interp.repr(needle)?
                ))),
            }
        }
        _ => Err(EvalError::attribute_error("list", name)),
    }
}

fn dict_method(receiver: &Value, name: &str, args: Args) -> EvalResult<Value> {
    let Value::Dict(entries) = receiver else {
        return Err(EvalError::attribute_error(&receiver.type_name(), name));
    };
    let entries = entries.borrow();
    match name {
        "get" => {
            arguments(name, &args, 1, 2, &[])?;
            let key = &args.positional[0];
            ops::check_hashable(key)?;
            let found = entries
                .iter()
                .find(|(existing, _)| ops::equal(existing, key))
                .map(|(_, value)| value.clone());
            Ok(found.unwrap_or_else(|| args.positional.get(1).cloned().unwrap_or(Value::None)))
        }
        "keys" => {
            arguments(name, &args, 0, 0, &[])?;
            Ok(Value::list(entries.iter().map(|(key, _)| key.clone()).collect()))
        }
        "values" => {
            arguments(name, &args, 0, 0, &[])?;
            Ok(Value::list(entries.iter().map(|(_, value)| value.clone()).collect()))
        }
        _ => Err(EvalError::attribute_error("dict", name)),
    }
}
