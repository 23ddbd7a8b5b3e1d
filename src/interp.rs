//! # Example Language Module / 示例语言模块
//!
//! A small, Python-flavoured language in which embedded examples are written.
//! It covers what documentation examples need: expressions, assignments,
//! functions, classes, loops and a handful of builtins. Source is lexed with
//! indentation tokens, parsed into a tree and evaluated by a tree-walking
//! [`Interpreter`].
//!
//! 嵌入式示例所使用的小型类 Python 语言。
//! 它覆盖文档示例所需的内容：表达式、赋值、函数、类、循环以及少量内置函数。
//! 源码按缩进词法分析，解析为语法树，并由树遍历解释器 [`Interpreter`] 执行。

/// Syntax tree definitions / 语法树定义
pub mod ast;
/// Builtin functions and methods / 内置函数与方法
pub mod builtins;
/// Runtime errors / 运行时错误
pub mod error;
/// Statement and expression evaluation / 语句与表达式求值
pub mod eval;
/// Source tokenizer / 源码词法分析器
pub mod lexer;
/// Arithmetic and comparison operators / 算术与比较运算
pub mod ops;
/// Recursive-descent parser / 递归下降解析器
pub mod parser;
/// Runtime values and namespaces / 运行时值与命名空间
pub mod value;

pub use ast::{Docstring, Program};
pub use error::{EvalError, EvalResult};
pub use eval::Interpreter;
pub use parser::parse_program;
pub use value::{Args, Namespace, NativeFn, NativeFunction, Value};
