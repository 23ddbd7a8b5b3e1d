//! # Module Loader Module / 模块加载模块
//!
//! Loading turns a dotted module name into a [`Module`]: its executed
//! top-level namespace plus an explicit tree of documentation owners
//! (module → functions and classes → methods), built once at load time.
//!
//! Three loaders are provided:
//! - [`SourceLoader`] finds source files under a list of search roots.
//! - [`Registry`] serves modules registered in-process, either as source text
//!   or as native Rust functions.
//! - [`ChainLoader`] asks several loaders in turn.
//!
//! 加载过程将点分模块名转换为 [`Module`]：包括执行后的顶层命名空间，
//! 以及在加载时构建一次的文档所属者树（模块 → 函数和类 → 方法）。

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::core::checker;
use crate::core::error::LoadError;
use crate::interp::ast::{Docstring, Program, Stmt, StmtKind};
use crate::interp::eval::{DEFAULT_STEP_LIMIT, Interpreter};
use crate::interp::{parse_program, Args, EvalError, EvalResult, Namespace, NativeFn, Value};

/// Source of modules by dotted name.
/// 按点分名称提供模块的来源。
pub trait ModuleLoader {
    /// Load `name`. `package_root`, when known, is searched before anything else.
    /// 加载 `name`。若已知 `package_root`，则优先在其中查找。
    fn load(&self, name: &str, package_root: Option<&Path>) -> Result<Module, LoadError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OwnerKind {
    Module,
    Function,
    Class,
    Method,
}

/// A documentation-bearing entity and the owners nested in it.
/// 带有文档的实体及其内部嵌套的所属者。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    /// Qualified name, e.g. `pkg.mod.Class.method`.
    /// 限定名称，例如 `pkg.mod.Class.method`。
    pub name: String,
    pub kind: OwnerKind,
    pub docstring: Option<Docstring>,
    pub children: Vec<Owner>,
}

impl Owner {
    /// Build the owner tree of a parsed module.
    /// 构建已解析模块的所属者树。
    pub fn from_program(module: &str, program: &Program) -> Self {
        Self {
            name: module.to_string(),
            kind: OwnerKind::Module,
            docstring: program.docstring.clone(),
            children: owners_in(module, &program.body, false),
        }
    }

    /// Number of owners in this tree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Owner::count).sum::<usize>()
    }
}

fn owners_in(prefix: &str, body: &[Stmt], in_class: bool) -> Vec<Owner> {
    body.iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::FunctionDef(def) => Some(Owner {
                name: format!("{prefix}.{}", def.name),
                kind: if in_class {
                    OwnerKind::Method
                } else {
                    OwnerKind::Function
                },
                docstring: def.docstring.clone(),
                children: Vec::new(),
            }),
            StmtKind::ClassDef(def) => {
                let name = format!("{prefix}.{}", def.name);
                let children = owners_in(&name, &def.body, true);
                Some(Owner {
                    name,
                    kind: OwnerKind::Class,
                    docstring: def.docstring.clone(),
                    children,
                })
            }
            _ => None,
        })
        .collect()
}

/// A loaded module.
/// 已加载的模块。
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    /// Source file, when the module came from disk.
    /// 模块来自磁盘时对应的源文件。
    pub path: Option<PathBuf>,
    /// Top-level bindings after the module body ran.
    /// 模块主体执行后的顶层绑定。
    pub globals: Namespace,
    pub root: Owner,
}

/// Parse and execute module source, then build its owner tree.
/// 解析并执行模块源码，然后构建其所属者树。
pub fn compile_module(
    name: &str,
    path: Option<PathBuf>,
    source: &str,
    step_limit: u64,
) -> Result<Module, LoadError> {
    let import_error = |error: EvalError| LoadError::Import {
        module: name.to_string(),
        message: error.to_string(),
    };

    let program = parse_program(source).map_err(import_error)?;
    let globals = Namespace::new();
    globals.set("__name__", Value::str(name));
    if let Some(doc) = &program.docstring {
        globals.set("__doc__", Value::str(doc.text.clone()));
    }

    Interpreter::new(step_limit)
        .exec_module(&program, &globals)
        .map_err(import_error)?;

    let root = Owner::from_program(name, &program);
    debug!(module = name, owners = root.count(), "module loaded");
    Ok(Module {
        name: name.to_string(),
        path,
        globals,
        root,
    })
}

fn valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
}

/// Loads modules from source files under a list of search roots.
///
/// `a.b.c` is looked up as `a/b/c.<ext>`, then `a/b/c/__init__.<ext>`, under
/// each root in turn.
///
/// 从一组搜索根目录下的源文件加载模块。
#[derive(Debug, Clone)]
pub struct SourceLoader {
    search_paths: Vec<PathBuf>,
    extensions: Vec<String>,
    step_limit: u64,
}

impl SourceLoader {
    pub fn new(search_paths: Vec<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            search_paths,
            extensions,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Locate the source file for `name`.
    /// 查找 `name` 对应的源文件。
    pub fn find(&self, name: &str, package_root: Option<&Path>) -> Option<PathBuf> {
        if !valid_module_name(name) {
            return None;
        }
        let relative: PathBuf = name.split('.').collect();
        let roots = package_root.into_iter().chain(self.search_paths.iter().map(PathBuf::as_path));

        for root in roots {
            for ext in &self.extensions {
                let file = root.join(&relative).with_extension(ext);
                trace!(candidate = %file.display(), "probing");
                if file.is_file() {
                    return Some(file);
                }
                let init = root.join(&relative).join(format!("__init__.{ext}"));
                if init.is_file() {
                    return Some(init);
                }
            }
        }
        None
    }
}

impl ModuleLoader for SourceLoader {
    fn load(&self, name: &str, package_root: Option<&Path>) -> Result<Module, LoadError> {
        let path = self.find(name, package_root).ok_or_else(|| LoadError::NotFound {
            module: name.to_string(),
        })?;
        let source = fs::read_to_string(&path).map_err(|e| LoadError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        compile_module(name, Some(path), &source, self.step_limit)
    }
}

/// A module implemented by Rust functions.
/// 由 Rust 函数实现的模块。
#[derive(Debug, Clone)]
pub struct NativeModule {
    pub name: String,
    pub doc: Option<String>,
    pub functions: Vec<NativeEntry>,
}

#[derive(Debug, Clone)]
pub struct NativeEntry {
    pub name: String,
    pub doc: Option<String>,
    pub func: NativeFn,
}

impl NativeModule {
    pub fn new(name: impl Into<String>, doc: Option<&str>) -> Self {
        Self {
            name: name.into(),
            doc: doc.map(str::to_string),
            functions: Vec::new(),
        }
    }

    pub fn function(mut self, name: &str, doc: Option<&str>, func: NativeFn) -> Self {
        self.functions.push(NativeEntry {
            name: name.to_string(),
            doc: doc.map(str::to_string),
            func,
        });
        self
    }

    fn instantiate(&self) -> Module {
        let globals = Namespace::new();
        globals.set("__name__", Value::str(self.name.clone()));
        let docstring = |doc: &Option<String>| {
            doc.as_ref().map(|text| Docstring {
                text: text.clone(),
                line: 0,
            })
        };

        let children = self
            .functions
            .iter()
            .map(|entry| {
                globals.set(
                    entry.name.clone(),
                    Value::native(&entry.name, entry.doc.as_deref(), entry.func),
                );
                Owner {
                    name: format!("{}.{}", self.name, entry.name),
                    kind: OwnerKind::Function,
                    docstring: docstring(&entry.doc),
                    children: Vec::new(),
                }
            })
            .collect();

        Module {
            name: self.name.clone(),
            path: None,
            globals,
            root: Owner {
                name: self.name.clone(),
                kind: OwnerKind::Module,
                docstring: docstring(&self.doc),
                children,
            },
        }
    }
}

/// In-process module table: the registration point for modules that do not
/// live on disk.
///
/// 进程内模块表：用于注册不在磁盘上的模块。
#[derive(Debug, Clone)]
pub struct Registry {
    sources: HashMap<String, String>,
    natives: HashMap<String, NativeModule>,
    step_limit: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            sources: HashMap::new(),
            natives: HashMap::new(),
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Register a module given as source text.
    pub fn register_source(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.sources.insert(name.into(), source.into());
        self
    }

    /// Register a module implemented in Rust.
    pub fn register_native(&mut self, module: NativeModule) -> &mut Self {
        self.natives.insert(module.name.clone(), module);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name) || self.natives.contains_key(name)
    }

    /// The registry shipped with the binary: the `testerson` module, whose
    /// functions expose the output checker and document it with examples.
    ///
    /// 随二进制文件提供的注册表：`testerson` 模块，其函数暴露输出检查器并以示例进行说明。
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_native(
            NativeModule::new("testerson", Some(TESTERSON_DOC))
                .function("normalize_whitespace", Some(NORMALIZE_DOC), native_normalize_whitespace)
                .function("ellipsis_match", Some(ELLIPSIS_DOC), native_ellipsis_match),
        );
        registry
    }
}

impl ModuleLoader for Registry {
    fn load(&self, name: &str, _package_root: Option<&Path>) -> Result<Module, LoadError> {
        if let Some(source) = self.sources.get(name) {
            return compile_module(name, None, source, self.step_limit);
        }
        if let Some(native) = self.natives.get(name) {
            return Ok(native.instantiate());
        }
        Err(LoadError::NotFound {
            module: name.to_string(),
        })
    }
}

/// Tries each loader in order; the first one that knows the module wins.
/// 依次尝试每个加载器；第一个识别该模块的加载器生效。
#[derive(Default)]
pub struct ChainLoader {
    loaders: Vec<Box<dyn ModuleLoader>>,
}

impl ChainLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }
}

impl ModuleLoader for ChainLoader {
    fn load(&self, name: &str, package_root: Option<&Path>) -> Result<Module, LoadError> {
        for loader in &self.loaders {
            match loader.load(name, package_root) {
                Err(LoadError::NotFound { .. }) => continue,
                other => return other,
            }
        }
        Err(LoadError::NotFound {
            module: name.to_string(),
        })
    }
}

const TESTERSON_DOC: &str = "Output comparison helpers.

>>> normalize_whitespace('a \\n  b')
'a b'
";

const NORMALIZE_DOC: &str = "Collapse every run of whitespace into one space.

>>> normalize_whitespace('  spaced   out  ')
'spaced out'
>>> normalize_whitespace('')
''
";

const ELLIPSIS_DOC: &str = "Match text where '...' in the pattern stands for anything.

>>> ellipsis_match('a...z', 'aXYZz')
True
>>> ellipsis_match('a...z', 'az')
True
>>> ellipsis_match('a...z', 'a')
False
";

fn string_arg<'a>(args: &'a Args, index: usize, function: &str) -> EvalResult<&'a str> {
    match args.positional.get(index) {
        Some(Value::Str(s)) => Ok(s.as_str()),
        Some(other) => Err(EvalError::type_error(format!(
            "{function}() argument {} must be str, not {}",
            index + 1,
            other.type_name()
        ))),
        None => Err(EvalError::type_error(format!(
            "{function}() missing required argument {}",
            index + 1
        ))),
    }
}

fn native_normalize_whitespace(_: &mut Interpreter, args: Args) -> EvalResult<Value> {
    let text = string_arg(&args, 0, "normalize_whitespace")?;
    Ok(Value::str(checker::normalize_whitespace(text)))
}

fn native_ellipsis_match(_: &mut Interpreter, args: Args) -> EvalResult<Value> {
    let want = string_arg(&args, 0, "ellipsis_match")?;
    let got = string_arg(&args, 1, "ellipsis_match")?;
    Ok(Value::Bool(checker::ellipsis_match(want, got)))
}
