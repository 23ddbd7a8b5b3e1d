//! # Operators Module / 运算符模块
//!
//! Arithmetic, equality and ordering on runtime values. Sequence-building
//! operators refuse results above a fixed size.
//!
//! 运行时值上的算术、相等与排序运算。构建序列的运算符会拒绝超过固定大小的结果。

use std::cmp::Ordering;
use std::rc::Rc;

use crate::interp::ast::{BinOp, CmpOp};
use crate::interp::error::{EvalError, EvalResult};
use crate::interp::value::Value;

fn unsupported(op: BinOp, left: &Value, right: &Value) -> EvalError {
    if op == BinOp::Add && matches!(left, Value::Str(_)) {
        return EvalError::type_error(format!(
            "can only concatenate str (not \"{}\") to str",
            right.type_name()
        ));
    }
    if op == BinOp::Add && matches!(left, Value::List(_)) {
        return EvalError::type_error(format!(
            "can only concatenate list (not \"{}\") to list",
            right.type_name()
        ));
    }
    EvalError::type_error(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

fn overflow() -> EvalError {
    EvalError::raised("OverflowError", "integer result too large")
}

/// Largest string (in bytes) or list (in items) an operator may build.
pub const MAX_SEQUENCE_LEN: usize = 1 << 24;

/// Checks that a sequence of `unit` elements repeated `count` times stays
/// under [`MAX_SEQUENCE_LEN`], returning the total length.
pub fn sequence_len(unit: usize, count: usize) -> EvalResult<usize> {
    match unit.checked_mul(count) {
        Some(total) if total <= MAX_SEQUENCE_LEN => Ok(total),
        _ => Err(EvalError::raised("MemoryError", "sequence too large")),
    }
}

/// Repeat count for `seq * n`; negative counts give an empty sequence.
fn repeat_count(n: &Value) -> usize {
    n.as_int()
        .map_or(0, |count| usize::try_from(count.max(0)).unwrap_or(usize::MAX))
}

/// Size of a list for the limit above: one per item, plus the bytes of any
/// string item, since strings are copied along with the list.
pub fn list_weight(items: &[Value]) -> usize {
    items
        .iter()
        .map(|item| match item {
            Value::Str(text) => 1 + text.len(),
            _ => 1,
        })
        .sum()
}

/// Evaluate `left <op> right`.
pub fn binary(op: BinOp, left: &Value, right: &Value) -> EvalResult<Value> {
    if let (Some(a), Some(b)) = (left.as_int(), right.as_int()) {
        return int_binary(op, a, b);
    }
    if let (Some(a), Some(b)) = (left.as_float(), right.as_float()) {
        return float_binary(op, a, b);
    }
    match (op, left, right) {
        (BinOp::Add, Value::Str(a), Value::Str(b)) => {
            sequence_len(a.len() + b.len(), 1)?;
            Ok(Value::Str(format!("{a}{b}")))
        }
        (BinOp::Add, Value::List(a), Value::List(b)) => {
            sequence_len(list_weight(&a.borrow()) + list_weight(&b.borrow()), 1)?;
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (BinOp::Mul, Value::Str(s), n) | (BinOp::Mul, n, Value::Str(s)) if n.as_int().is_some() => {
            let count = repeat_count(n);
            sequence_len(s.len(), count)?;
            Ok(Value::Str(s.repeat(count)))
        }
        (BinOp::Mul, Value::List(items), n) | (BinOp::Mul, n, Value::List(items))
            if n.as_int().is_some() =>
        {
            let count = repeat_count(n);
            let items = items.borrow();
            if items.is_empty() {
                return Ok(Value::list(Vec::new()));
            }
            sequence_len(list_weight(&items), count)?;
            let mut repeated = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                repeated.extend(items.iter().cloned());
            }
            Ok(Value::list(repeated))
        }
        _ => Err(unsupported(op, left, right)),
    }
}

fn int_binary(op: BinOp, a: i64, b: i64) -> EvalResult<Value> {
    let value = match op {
        BinOp::Add => a.checked_add(b).ok_or_else(overflow)?,
        BinOp::Sub => a.checked_sub(b).ok_or_else(overflow)?,
        BinOp::Mul => a.checked_mul(b).ok_or_else(overflow)?,
        BinOp::Div => {
            if b == 0 {
                return Err(EvalError::zero_division("division by zero"));
            }
            return Ok(Value::Float(a as f64 / b as f64));
        }
        BinOp::FloorDiv => {
            if b == 0 {
                return Err(EvalError::zero_division("integer division or modulo by zero"));
            }
            floor_div(a, b).ok_or_else(overflow)?
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(EvalError::zero_division("integer modulo by zero"));
            }
            let r = a.checked_rem(b).ok_or_else(overflow)?;
            if r != 0 && (r < 0) != (b < 0) { r + b } else { r }
        }
        BinOp::Pow => {
            if b < 0 {
                return Ok(Value::Float((a as f64).powf(b as f64)));
            }
            let exponent = u32::try_from(b).map_err(|_| overflow())?;
            a.checked_pow(exponent).ok_or_else(overflow)?
        }
    };
    Ok(Value::Int(value))
}

/// Floor division rounds toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

fn float_binary(op: BinOp, a: f64, b: f64) -> EvalResult<Value> {
    let value = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(EvalError::zero_division("float division by zero"));
            }
            a / b
        }
        BinOp::FloorDiv => {
            if b == 0.0 {
                return Err(EvalError::zero_division("float floor division by zero"));
            }
            (a / b).floor()
        }
        BinOp::Mod => {
            if b == 0.0 {
                return Err(EvalError::zero_division("float modulo"));
            }
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
        }
        BinOp::Pow => a.powf(b),
    };
    Ok(Value::Float(value))
}

/// Value equality (`==`).
pub fn equal(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (left.as_float(), right.as_float()) {
        return match (left.as_int(), right.as_int()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        };
    }
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            if Rc::ptr_eq(a, b) {
                return true;
            }
            let (a, b) = (a.borrow(), b.borrow());
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| equal(x, y))
        }
        (Value::Dict(a), Value::Dict(b)) => {
            if Rc::ptr_eq(a, b) {
                return true;
            }
            let (a, b) = (a.borrow(), b.borrow());
            a.len() == b.len()
                && a.iter().all(|(key, value)| {
                    b.iter()
                        .any(|(other_key, other_value)| equal(key, other_key) && equal(value, other_value))
                })
        }
        (
            Value::Exception { kind: ka, message: ma },
            Value::Exception { kind: kb, message: mb },
        ) => ka == kb && ma == mb,
        _ => identical(left, right),
    }
}

/// Identity (`is`). Immutable scalars compare by value.
pub fn identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
        (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(a, b),
        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Ordering for `<`, `<=`, `>`, `>=` and for sorting.
pub fn order(op: &str, left: &Value, right: &Value) -> EvalResult<Ordering> {
    let unordered = || {
        EvalError::type_error(format!(
            "'{op}' not supported between instances of '{}' and '{}'",
            left.type_name(),
            right.type_name()
        ))
    };
    if let (Some(a), Some(b)) = (left.as_float(), right.as_float()) {
        if let (Some(x), Some(y)) = (left.as_int(), right.as_int()) {
            return Ok(x.cmp(&y));
        }
        return a.partial_cmp(&b).ok_or_else(unordered);
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::List(a), Value::List(b)) => {
            let (a, b) = (a.borrow().clone(), b.borrow().clone());
            for (x, y) in a.iter().zip(b.iter()) {
                if !equal(x, y) {
                    return order(op, x, y);
                }
            }
            Ok(a.len().cmp(&b.len()))
        }
        _ => Err(unordered()),
    }
}

/// Membership (`in`).
pub fn contains(container: &Value, item: &Value) -> EvalResult<bool> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(EvalError::type_error(format!(
                "'in <string>' requires string as left operand, not {}",
                other.type_name()
            ))),
        },
        Value::List(items) => Ok(items.borrow().iter().any(|x| equal(x, item))),
        Value::Dict(entries) => Ok(entries.borrow().iter().any(|(key, _)| equal(key, item))),
        other => Err(EvalError::type_error(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

/// Evaluate a single comparison.
pub fn compare(op: CmpOp, left: &Value, right: &Value) -> EvalResult<bool> {
    let symbol = op.symbol();
    Ok(match op {
        CmpOp::Eq => equal(left, right),
        CmpOp::NotEq => !equal(left, right),
        CmpOp::Lt => order(symbol, left, right)? == Ordering::Less,
        CmpOp::LtE => order(symbol, left, right)? != Ordering::Greater,
        CmpOp::Gt => order(symbol, left, right)? == Ordering::Greater,
        CmpOp::GtE => order(symbol, left, right)? != Ordering::Less,
        CmpOp::In => contains(right, left)?,
        CmpOp::NotIn => !contains(right, left)?,
        CmpOp::Is => identical(left, right),
        CmpOp::IsNot => !identical(left, right),
    })
}

/// Reject values that cannot be dictionary keys.
pub fn check_hashable(key: &Value) -> EvalResult<()> {
    match key {
        Value::List(_) | Value::Dict(_) => Err(EvalError::type_error(format!(
            "unhashable type: '{}'",
            key.type_name()
        ))),
        _ => Ok(()),
    }
}
