//! # Evaluator Module / 求值器模块
//!
//! Tree-walking evaluator. Runs example source and module bodies, captures
//! printed output and bounds each run by call depth and step count.
//!
//! 树遍历求值器。运行示例源码和模块主体，捕获打印输出，
//! 并以调用深度和步数限制每次运行。

use std::rc::Rc;

use tracing::{debug, trace};

use crate::interp::ast::{
    BinOp, BoolOp, ClassDef, Expr, FunctionDef, Program, Stmt, StmtKind, Subscript, UnaryOp,
};
use crate::interp::builtins;
use crate::interp::error::{EvalError, EvalResult};
use crate::interp::ops;
use crate::interp::parser::parse_program;
use crate::interp::value::{format_float, quote_str, Args, Class, Function, Instance, Namespace, Value};

/// Maximum nesting of user-level function calls.
pub const MAX_DEPTH: usize = 64;

/// Default number of evaluation steps an example may take.
pub const DEFAULT_STEP_LIMIT: u64 = 1_000_000;

/// Control flow out of a statement.
enum Flow {
    Next,
    Return(Value),
    Break,
    Continue,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Module,
    Function,
    Class,
}

struct Frame {
    locals: Namespace,
    globals: Namespace,
    enclosing: Vec<Namespace>,
    kind: ScopeKind,
    /// Expression statements print their `repr`, as at an interactive prompt.
    echo: bool,
}

impl Frame {
    fn module(globals: &Namespace, echo: bool) -> Self {
        Self {
            locals: globals.clone(),
            globals: globals.clone(),
            enclosing: Vec::new(),
            kind: ScopeKind::Module,
            echo,
        }
    }

    /// Scopes visible to a function or class defined in this frame.
    fn scopes_for_nested(&self) -> Vec<Namespace> {
        let mut scopes = self.enclosing.clone();
        if self.kind == ScopeKind::Function {
            scopes.push(self.locals.clone());
        }
        scopes
    }
}

/// Executes example-language code and captures what it prints.
pub struct Interpreter {
    builtins: Namespace,
    output: String,
    steps: u64,
    step_limit: u64,
    depth: usize,
    /// Containers currently being rendered, to cut reference cycles.
    repr_active: Vec<usize>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_LIMIT)
    }
}

impl Interpreter {
    pub fn new(step_limit: u64) -> Self {
        Self {
            builtins: builtins::namespace(),
            output: String::new(),
            steps: 0,
            step_limit,
            depth: 0,
            repr_active: Vec::new(),
        }
    }

    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }

    /// Run one example's source in `globals`, returning everything it wrote.
    ///
    /// Like an interactive prompt, every expression statement outside a
    /// function or class body whose value is not `None` has its `repr` echoed
    /// on its own line, including those inside top-level loops and branches.
    pub fn run_example(&mut self, source: &str, globals: &Namespace) -> EvalResult<String> {
        self.reset();
        let result = parse_program(source).and_then(|program| self.run_body(&program.body, globals, true));
        let output = std::mem::take(&mut self.output);
        result.map(|()| output)
    }

    /// Execute a module body in `globals`. Output written at import time is discarded.
    pub fn exec_module(&mut self, program: &Program, globals: &Namespace) -> EvalResult<()> {
        self.reset();
        let result = self.run_body(&program.body, globals, false);
        let output = std::mem::take(&mut self.output);
        if !output.is_empty() {
            debug!(bytes = output.len(), "discarding output written at import time");
        }
        result
    }

    /// Append text to the captured output.
    pub fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn reset(&mut self) {
        self.output.clear();
        self.steps = 0;
        self.depth = 0;
        self.repr_active.clear();
    }

    fn run_body(&mut self, body: &[Stmt], globals: &Namespace, echo: bool) -> EvalResult<()> {
        let frame = Frame::module(globals, echo);
        for stmt in body {
            match self.exec_stmt(stmt, &frame)? {
                Flow::Next => {}
                Flow::Return(_) => return Err(EvalError::syntax("'return' outside function", stmt.line)),
                Flow::Break => return Err(EvalError::syntax("'break' outside loop", stmt.line)),
                Flow::Continue => {
                    return Err(EvalError::syntax("'continue' not properly in loop", stmt.line));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn tick(&mut self) -> EvalResult<()> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(EvalError::raised(
                "RuntimeError",
                format!("step limit of {} exceeded", self.step_limit),
            ));
        }
        Ok(())
    }

    // ── Statements ────────────────────────────────────────────────────────

    fn exec_block(&mut self, body: &[Stmt], frame: &Frame) -> EvalResult<Flow> {
        for stmt in body {
            match self.exec_stmt(stmt, frame)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, frame: &Frame) -> EvalResult<Flow> {
        self.tick()?;
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                let value = self.eval(expr, frame)?;
                if frame.echo && !value.is_none() {
                    let text = self.repr(&value)?;
                    self.output.push_str(&text);
                    self.output.push('\n');
                }
            }
            StmtKind::Assign { targets, value } => {
                let value = self.eval(value, frame)?;
                for target in targets {
                    self.assign(target, value.clone(), frame)?;
                }
            }
            StmtKind::AugAssign { target, op, value } => {
                let current = self.eval(target, frame)?;
                let operand = self.eval(value, frame)?;
                let result = match (&current, &operand, op) {
                    // `items += more` extends the list in place.
                    (Value::List(items), Value::List(more), BinOp::Add) => {
                        ops::sequence_len(ops::list_weight(&items.borrow()) + ops::list_weight(&more.borrow()), 1)?;
                        let more = more.borrow().clone();
                        items.borrow_mut().extend(more);
                        current.clone()
                    }
                    _ => ops::binary(*op, &current, &operand)?,
                };
                self.assign(target, result, frame)?;
            }
            StmtKind::FunctionDef(def) => {
                let function = self.make_function(def, frame)?;
                frame.locals.set(def.name.clone(), function);
            }
            StmtKind::ClassDef(def) => {
                let class = self.make_class(def, frame)?;
                frame.locals.set(def.name.clone(), class);
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr, frame)?,
                    None => Value::None,
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::If { branches, orelse } => {
                for (test, body) in branches {
                    if self.eval(test, frame)?.truthy() {
                        return self.exec_block(body, frame);
                    }
                }
                return self.exec_block(orelse, frame);
            }
            StmtKind::While { test, body } => loop {
                self.tick()?;
                if !self.eval(test, frame)?.truthy() {
                    break;
                }
                match self.exec_block(body, frame)? {
                    Flow::Break => break,
                    Flow::Next | Flow::Continue => {}
                    flow @ Flow::Return(_) => return Ok(flow),
                }
            },
            StmtKind::For { target, iter, body } => {
                let iterable = self.eval(iter, frame)?;
                for item in self.iterate(&iterable)? {
                    self.tick()?;
                    frame.locals.set(target.clone(), item);
                    match self.exec_block(body, frame)? {
                        Flow::Break => break,
                        Flow::Next | Flow::Continue => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
            }
            StmtKind::Raise(None) => {
                return Err(EvalError::raised("RuntimeError", "No active exception to reraise"));
            }
            StmtKind::Raise(Some(expr)) => {
                let value = self.eval(expr, frame)?;
                return Err(self.to_exception(value)?);
            }
            StmtKind::Assert { test, message } => {
                if !self.eval(test, frame)?.truthy() {
                    let message = match message {
                        Some(expr) => {
                            let value = self.eval(expr, frame)?;
                            self.str(&value)?
                        }
                        None => String::new(),
                    };
                    return Err(EvalError::raised("AssertionError", message));
                }
            }
            StmtKind::Break => return Ok(Flow::Break),
            StmtKind::Continue => return Ok(Flow::Continue),
            StmtKind::Pass => {}
        }
        Ok(Flow::Next)
    }

    fn make_function(&mut self, def: &Rc<FunctionDef>, frame: &Frame) -> EvalResult<Value> {
        let mut defaults = Vec::with_capacity(def.params.len());
        for param in &def.params {
            let default = match &param.default {
                Some(expr) => Some(self.eval(expr, frame)?),
                None => None,
            };
            defaults.push(default);
        }
        Ok(Value::Function(Rc::new(Function {
            def: Rc::clone(def),
            globals: frame.globals.clone(),
            enclosing: frame.scopes_for_nested(),
            defaults,
        })))
    }

    fn make_class(&mut self, def: &Rc<ClassDef>, frame: &Frame) -> EvalResult<Value> {
        let attrs = Namespace::new();
        if let Some(doc) = &def.docstring {
            attrs.set("__doc__", Value::str(doc.text.clone()));
        }
        let body_frame = Frame {
            locals: attrs.clone(),
            globals: frame.globals.clone(),
            enclosing: frame.scopes_for_nested(),
            kind: ScopeKind::Class,
            echo: false,
        };
        match self.exec_block(&def.body, &body_frame)? {
            Flow::Next => {}
            _ => return Err(EvalError::syntax("invalid statement in class body", def.line)),
        }
        Ok(Value::Class(Rc::new(Class {
            name: def.name.clone(),
            attrs,
        })))
    }

    fn assign(&mut self, target: &Expr, value: Value, frame: &Frame) -> EvalResult<()> {
        match target {
            Expr::Name(name) => {
                frame.locals.set(name.clone(), value);
                Ok(())
            }
            Expr::Attribute { object, name } => match self.eval(object, frame)? {
                Value::Instance(instance) => {
                    instance.attrs.set(name.clone(), value);
                    Ok(())
                }
                Value::Class(class) => {
                    class.attrs.set(name.clone(), value);
                    Ok(())
                }
                other => Err(EvalError::attribute_error(&other.type_name(), name)),
            },
            Expr::Subscript {
                object,
                index: Subscript::Index(index),
            } => {
                let container = self.eval(object, frame)?;
                let key = self.eval(index, frame)?;
                set_item(&container, key, value)
            }
            _ => Err(EvalError::syntax("cannot assign to expression", 0)),
        }
    }

    fn lookup(&self, name: &str, frame: &Frame) -> EvalResult<Value> {
        if let Some(value) = frame.locals.get(name) {
            return Ok(value);
        }
        for scope in frame.enclosing.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Ok(value);
            }
        }
        if let Some(value) = frame.globals.get(name) {
            return Ok(value);
        }
        self.builtins
            .get(name)
            .ok_or_else(|| EvalError::name_error(name))
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn eval(&mut self, expr: &Expr, frame: &Frame) -> EvalResult<Value> {
        match expr {
            Expr::None => Ok(Value::None),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Name(name) => self.lookup(name, frame),
            Expr::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, frame)?);
                }
                Ok(Value::list(values))
            }
            Expr::Dict(entries) => {
                let mut values: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = self.eval(key, frame)?;
                    let value = self.eval(value, frame)?;
                    ops::check_hashable(&key)?;
                    match values.iter_mut().find(|(existing, _)| ops::equal(existing, &key)) {
                        Some(slot) => slot.1 = value,
                        None => values.push((key, value)),
                    }
                }
                Ok(Value::dict(values))
            }
            Expr::Attribute { object, name } => {
                let object = self.eval(object, frame)?;
                self.get_attr(&object, name)
            }
            Expr::Subscript { object, index } => {
                let object = self.eval(object, frame)?;
                match index {
                    Subscript::Index(index) => {
                        let key = self.eval(index, frame)?;
                        get_item(self, &object, &key)
                    }
                    Subscript::Slice { lower, upper } => {
                        let lower = match lower {
                            Some(expr) => self.eval(expr, frame)?,
                            None => Value::None,
                        };
                        let upper = match upper {
                            Some(expr) => self.eval(expr, frame)?,
                            None => Value::None,
                        };
                        slice(&object, &lower, &upper)
                    }
                }
            }
            Expr::Call {
                func,
                args,
                keywords,
            } => {
                let callee = self.eval(func, frame)?;
                let mut call_args = Args::default();
                for arg in args {
                    call_args.positional.push(self.eval(arg, frame)?);
                }
                for (name, value) in keywords {
                    let value = self.eval(value, frame)?;
                    call_args.keywords.push((name.clone(), value));
                }
                self.tick()?;
                self.call(&callee, call_args)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand, frame)?;
                unary(*op, &value)
            }
            Expr::Binary { left, op, right } => {
                let left = self.eval(left, frame)?;
                let right = self.eval(right, frame)?;
                ops::binary(*op, &left, &right)
            }
            Expr::Compare { left, rest } => {
                let mut left = self.eval(left, frame)?;
                for (op, right) in rest {
                    let right = self.eval(right, frame)?;
                    if !ops::compare(*op, &left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
            Expr::Logical { left, op, right } => {
                let left = self.eval(left, frame)?;
                let short_circuit = match op {
                    BoolOp::And => !left.truthy(),
                    BoolOp::Or => left.truthy(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.eval(right, frame)
                }
            }
            Expr::IfElse { test, body, orelse } => {
                if self.eval(test, frame)?.truthy() {
                    self.eval(body, frame)
                } else {
                    self.eval(orelse, frame)
                }
            }
        }
    }

    /// Attribute access (`value.name`).
    pub fn get_attr(&mut self, object: &Value, name: &str) -> EvalResult<Value> {
        match object {
            Value::Instance(instance) => {
                if let Some(value) = instance.attrs.get(name) {
                    return Ok(value);
                }
                match instance.class.attrs.get(name) {
                    Some(Value::Function(func)) => Ok(Value::BoundMethod {
                        receiver: Rc::clone(instance),
                        func,
                    }),
                    Some(value) => Ok(value),
                    None if name == "__class__" => Ok(Value::Class(Rc::clone(&instance.class))),
                    None => Err(EvalError::attribute_error(&instance.class.name, name)),
                }
            }
            Value::Class(class) => match class.attrs.get(name) {
                Some(value) => Ok(value),
                None if name == "__name__" => Ok(Value::str(class.name.clone())),
                None => Err(EvalError::raised(
                    "AttributeError",
                    format!("type object '{}' has no attribute '{name}'", class.name),
                )),
            },
            Value::Function(func) if name == "__name__" => Ok(Value::str(func.def.name.clone())),
            Value::Function(func) if name == "__doc__" => Ok(func
                .def
                .docstring
                .as_ref()
                .map_or(Value::None, |doc| Value::str(doc.text.clone()))),
            Value::Native(native) if name == "__name__" => Ok(Value::str(native.name.clone())),
            Value::Native(native) if name == "__doc__" => {
                Ok(native.doc.as_ref().map_or(Value::None, |doc| Value::str(doc.clone())))
            }
            Value::Exception { message, .. } if name == "args" => {
                if message.is_empty() {
                    Ok(Value::list(Vec::new()))
                } else {
                    Ok(Value::list(vec![Value::str(message.clone())]))
                }
            }
            _ if builtins::has_method(object, name) => Ok(Value::BuiltinMethod {
                receiver: Box::new(object.clone()),
                name: name.to_string(),
            }),
            _ => Err(EvalError::attribute_error(&object.type_name(), name)),
        }
    }

    /// Call any callable value.
    pub fn call(&mut self, callee: &Value, mut args: Args) -> EvalResult<Value> {
        match callee {
            Value::Function(func) => self.call_function(func, args),
            Value::BoundMethod { receiver, func } => {
                args.positional.insert(0, Value::Instance(Rc::clone(receiver)));
                self.call_function(func, args)
            }
            Value::Native(native) => (native.func)(self, args),
            Value::BuiltinMethod { receiver, name } => builtins::call_method(self, receiver, name, args),
            Value::Class(class) => {
                let instance = Rc::new(Instance {
                    class: Rc::clone(class),
                    attrs: Namespace::new(),
                });
                match class.attrs.get("__init__") {
                    Some(Value::Function(init)) => {
                        args.positional.insert(0, Value::Instance(Rc::clone(&instance)));
                        let returned = self.call_function(&init, args)?;
                        if !returned.is_none() {
                            return Err(EvalError::type_error(format!(
                                "__init__() should return None, not '{}'",
                                returned.type_name()
                            )));
                        }
                    }
                    _ if !args.positional.is_empty() || !args.keywords.is_empty() => {
                        return Err(EvalError::type_error(format!("{}() takes no arguments", class.name)));
                    }
                    _ => {}
                }
                Ok(Value::Instance(instance))
            }
            other => Err(EvalError::type_error(format!(
                "'{}' object is not callable",
                other.type_name()
            ))),
        }
    }

    fn call_function(&mut self, func: &Rc<Function>, args: Args) -> EvalResult<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::raised(
                "RecursionError",
                "maximum recursion depth exceeded",
            ));
        }
        let locals = bind_arguments(func, args)?;
        let frame = Frame {
            locals,
            globals: func.globals.clone(),
            enclosing: func.enclosing.clone(),
            kind: ScopeKind::Function,
            echo: false,
        };
        trace!(function = %func.def.name, depth = self.depth, "call");
        self.depth += 1;
        let flow = self.exec_block(&func.def.body, &frame);
        self.depth -= 1;
        match flow? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::None),
        }
    }

    fn to_exception(&mut self, value: Value) -> EvalResult<EvalError> {
        match value {
            Value::Exception { kind, message } => Ok(EvalError::raised(kind, message)),
            Value::Native(native) if builtins::is_exception_kind(&native.name) => {
                Ok(EvalError::raised(native.name.clone(), ""))
            }
            _ => Err(EvalError::type_error("exceptions must derive from BaseException")),
        }
    }

    /// The values a `for` loop visits.
    pub fn iterate(&self, value: &Value) -> EvalResult<Vec<Value>> {
        match value {
            Value::List(items) => Ok(items.borrow().clone()),
            Value::Str(text) => Ok(text.chars().map(|c| Value::Str(c.to_string())).collect()),
            Value::Dict(entries) => Ok(entries.borrow().iter().map(|(key, _)| key.clone()).collect()),
            other => Err(EvalError::type_error(format!(
                "'{}' object is not iterable",
                other.type_name()
            ))),
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────

    /// `repr(value)`, honouring a class's `__repr__`.
    pub fn repr(&mut self, value: &Value) -> EvalResult<String> {
        match value {
            Value::None => Ok("None".to_string()),
            Value::Bool(true) => Ok("True".to_string()),
            Value::Bool(false) => Ok("False".to_string()),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => Ok(format_float(*f)),
            Value::Str(s) => Ok(quote_str(s)),
            Value::List(items) => {
                let id = Rc::as_ptr(items) as usize;
                if self.repr_active.contains(&id) {
                    return Ok("[...]".to_string());
                }
                self.repr_active.push(id);
                let items = items.borrow().clone();
                let rendered = self.repr_all(&items);
                self.repr_active.pop();
                Ok(format!("[{}]", rendered?.join(", ")))
            }
            Value::Dict(entries) => {
                let id = Rc::as_ptr(entries) as usize;
                if self.repr_active.contains(&id) {
                    return Ok("{...}".to_string());
                }
                self.repr_active.push(id);
                let entries = entries.borrow().clone();
                let mut rendered = Vec::with_capacity(entries.len());
                let mut result = Ok(());
                for (key, value) in &entries {
                    match (self.repr(key), self.repr(value)) {
                        (Ok(key), Ok(value)) => rendered.push(format!("{key}: {value}")),
                        (Err(e), _) | (_, Err(e)) => {
                            result = Err(e);
                            break;
                        }
                    }
                }
                self.repr_active.pop();
                result.map(|()| format!("{{{}}}", rendered.join(", ")))
            }
            Value::Function(func) => Ok(format!(
                "<function {} at {:#x}>",
                func.def.name,
                Rc::as_ptr(func) as usize
            )),
            Value::Native(native) => Ok(format!("<built-in function {}>", native.name)),
            Value::Class(class) => Ok(format!("<class '{}'>", class.name)),
            Value::Instance(instance) => match self.call_hook(instance, "__repr__")? {
                Some(text) => Ok(text),
                None => Ok(format!(
                    "<{} object at {:#x}>",
                    instance.class.name,
                    Rc::as_ptr(instance) as usize
                )),
            },
            Value::BoundMethod { receiver, func } => Ok(format!(
                "<bound method {}.{}>",
                receiver.class.name, func.def.name
            )),
            Value::BuiltinMethod { receiver, name } => Ok(format!(
                "<built-in method {name} of {} object>",
                receiver.type_name()
            )),
            Value::Exception { kind, message } if message.is_empty() => Ok(format!("{kind}()")),
            Value::Exception { kind, message } => Ok(format!("{kind}({})", quote_str(message))),
        }
    }

    fn repr_all(&mut self, values: &[Value]) -> EvalResult<Vec<String>> {
        values.iter().map(|value| self.repr(value)).collect()
    }

    /// `str(value)`, honouring a class's `__str__` and then `__repr__`.
    pub fn str(&mut self, value: &Value) -> EvalResult<String> {
        match value {
            Value::Str(s) => Ok(s.clone()),
            Value::Exception { message, .. } => Ok(message.clone()),
            Value::Instance(instance) => match self.call_hook(instance, "__str__")? {
                Some(text) => Ok(text),
                None => self.repr(value),
            },
            other => self.repr(other),
        }
    }

    /// Call a string-returning special method if the class defines it.
    fn call_hook(&mut self, instance: &Rc<Instance>, hook: &str) -> EvalResult<Option<String>> {
        let Some(Value::Function(func)) = instance.class.attrs.get(hook) else {
            return Ok(None);
        };
        let args = Args::positional(vec![Value::Instance(Rc::clone(instance))]);
        match self.call_function(&func, args)? {
            Value::Str(text) => Ok(Some(text)),
            other => Err(EvalError::type_error(format!(
                "{hook} returned non-string (type {})",
                other.type_name()
            ))),
        }
    }
}

fn unary(op: UnaryOp, value: &Value) -> EvalResult<Value> {
    let bad_operand = |symbol: &str| {
        EvalError::type_error(format!(
            "bad operand type for unary {symbol}: '{}'",
            value.type_name()
        ))
    };
    match op {
        UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
        UnaryOp::Neg => match value {
            Value::Float(f) => Ok(Value::Float(-f)),
            other => match other.as_int() {
                Some(i) => i
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::raised("OverflowError", "integer result too large")),
                None => Err(bad_operand("-")),
            },
        },
        UnaryOp::Pos => match value {
            Value::Float(f) => Ok(Value::Float(*f)),
            other => other.as_int().map(Value::Int).ok_or_else(|| bad_operand("+")),
        },
    }
}

fn bind_arguments(func: &Function, args: Args) -> EvalResult<Namespace> {
    let name = &func.def.name;
    let params = &func.def.params;
    let total = params.len();
    let given = args.positional.len();
    if given > total {
        let required = func.defaults.iter().filter(|d| d.is_none()).count();
        let takes = if required == total {
            format!("{total} positional argument{}", if total == 1 { "" } else { "s" })
        } else {
            format!("from {required} to {total} positional arguments")
        };
        let verb = if given == 1 { "was" } else { "were" };
        return Err(EvalError::type_error(format!(
            "{name}() takes {takes} but {given} {verb} given"
        )));
    }

    let locals = Namespace::new();
    for (param, value) in params.iter().zip(args.positional) {
        locals.set(param.name.clone(), value);
    }
    for (key, value) in args.keywords {
        if !params.iter().any(|p| p.name == key) {
            return Err(EvalError::type_error(format!(
                "{name}() got an unexpected keyword argument '{key}'"
            )));
        }
        if locals.contains(&key) {
            return Err(EvalError::type_error(format!(
                "{name}() got multiple values for argument '{key}'"
            )));
        }
        locals.set(key, value);
    }

    let mut missing = Vec::new();
    for (param, default) in params.iter().zip(&func.defaults) {
        if locals.contains(&param.name) {
            continue;
        }
        match default {
            Some(value) => locals.set(param.name.clone(), value.clone()),
            None => missing.push(format!("'{}'", param.name)),
        }
    }
    if !missing.is_empty() {
        let count = missing.len();
        let listed = match missing.as_slice() {
            [only] => only.clone(),
            [first, second] => format!("{first} and {second}"),
            [init @ .., last] => format!("{}, and {last}", init.join(", ")),
            [] => String::new(),
        };
        return Err(EvalError::type_error(format!(
            "{name}() missing {count} required positional argument{}: {listed}",
            if count == 1 { "" } else { "s" }
        )));
    }
    Ok(locals)
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

fn index_of(key: &Value, container: &str) -> EvalResult<i64> {
    key.as_int().ok_or_else(|| {
        EvalError::type_error(format!(
            "{container} indices must be integers or slices, not {}",
            key.type_name()
        ))
    })
}

fn get_item(interp: &mut Interpreter, container: &Value, key: &Value) -> EvalResult<Value> {
    match container {
        Value::List(items) => {
            let items = items.borrow();
            normalize_index(index_of(key, "list")?, items.len())
                .map(|i| items[i].clone())
                .ok_or_else(|| EvalError::raised("IndexError", "list index out of range"))
        }
        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            normalize_index(index_of(key, "string")?, chars.len())
                .map(|i| Value::Str(chars[i].to_string()))
                .ok_or_else(|| EvalError::raised("IndexError", "string index out of range"))
        }
        Value::Dict(entries) => {
            ops::check_hashable(key)?;
            let found = entries
                .borrow()
                .iter()
                .find(|(existing, _)| ops::equal(existing, key))
                .map(|(_, value)| value.clone());
            match found {
                Some(value) => Ok(value),
                None => Err(EvalError::raised("KeyError", interp.repr(key)?)),
            }
        }
        other => Err(EvalError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

fn set_item(container: &Value, key: Value, value: Value) -> EvalResult<()> {
    match container {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let index = normalize_index(index_of(&key, "list")?, items.len())
                .ok_or_else(|| EvalError::raised("IndexError", "list assignment index out of range"))?;
            items[index] = value;
            Ok(())
        }
        Value::Dict(entries) => {
            ops::check_hashable(&key)?;
            let mut entries = entries.borrow_mut();
            match entries.iter_mut().find(|(existing, _)| ops::equal(existing, &key)) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
            Ok(())
        }
        other => Err(EvalError::type_error(format!(
            "'{}' object does not support item assignment",
            other.type_name()
        ))),
    }
}

/// Clamp slice bounds the way sequences do: out-of-range bounds never fail.
fn slice_bounds(lower: &Value, upper: &Value, len: usize) -> EvalResult<(usize, usize)> {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let clamp = |bound: &Value, default: i64| -> EvalResult<usize> {
        let raw = match bound {
            Value::None => default,
            other => other.as_int().ok_or_else(|| {
                EvalError::type_error("slice indices must be integers or None")
            })?,
        };
        let adjusted = if raw < 0 { (raw + len_i).max(0) } else { raw.min(len_i) };
        Ok(usize::try_from(adjusted).unwrap_or(0))
    };
    let start = clamp(lower, 0)?;
    let end = clamp(upper, len_i)?;
    Ok((start, end.max(start)))
}

fn slice(container: &Value, lower: &Value, upper: &Value) -> EvalResult<Value> {
    match container {
        Value::List(items) => {
            let items = items.borrow();
            let (start, end) = slice_bounds(lower, upper, items.len())?;
            Ok(Value::list(items[start..end].to_vec()))
        }
        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            let (start, end) = slice_bounds(lower, upper, chars.len())?;
            Ok(Value::Str(chars[start..end].iter().collect()))
        }
        other => Err(EvalError::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}
