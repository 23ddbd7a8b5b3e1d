//! # Example Engine Module / 示例引擎模块
//!
//! Runs the embedded examples of one resolved target. Module owners are
//! walked depth first; each owner gets a snapshot of its parent's context
//! taken when the owner starts, so siblings never see each other's bindings
//! while nested owners see what their parent's examples defined.
//!
//! 运行一个已解析目标中的嵌入式示例。模块的所属者按深度优先遍历；
//! 每个所属者在开始时获得其父级上下文的快照，因此兄弟之间互不可见，
//! 而嵌套的所属者可以看到父级示例所定义的内容。

use std::fs;
use tracing::{debug, trace};

use crate::core::checker::{check_output, describe_mismatch, ComparisonOptions};
use crate::core::error::{LoadError, TargetError};
use crate::core::examples::{extract_examples, ExampleBlock};
use crate::core::models::{ExampleOutcome, ExampleReport, OutcomeKind, ResolvedTarget};
use crate::infra::clock::Clock;
use crate::infra::loader::{Module, ModuleLoader, Owner};
use crate::interp::eval::{DEFAULT_STEP_LIMIT, Interpreter};
use crate::interp::{Namespace, Value};

/// Extracts and executes examples against a live evaluation context.
/// 提取示例并在实时求值上下文中执行。
pub struct ExampleEngine<'a> {
    loader: &'a dyn ModuleLoader,
    clock: &'a dyn Clock,
    step_limit: u64,
}

impl<'a> ExampleEngine<'a> {
    pub fn new(loader: &'a dyn ModuleLoader, clock: &'a dyn Clock) -> Self {
        Self {
            loader,
            clock,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    pub fn with_step_limit(mut self, step_limit: u64) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// Run every example of `resolved`.
    ///
    /// # Errors
    /// Returns a [`TargetError`] when the module cannot be loaded or the text
    /// file cannot be read. Failing examples are never errors; they are
    /// counted in the report.
    ///
    /// 运行 `resolved` 的所有示例。模块无法加载或文本文件无法读取时返回错误；
    /// 失败的示例不是错误，而是计入报告。
    pub fn run(
        &self,
        resolved: &ResolvedTarget,
        options: &ComparisonOptions,
    ) -> Result<ExampleReport, TargetError> {
        match resolved {
            ResolvedTarget::Module { name, package_root } => {
                let module = self.loader.load(name, package_root.as_deref())?;
                Ok(self.run_module(&module, options))
            }
            ResolvedTarget::TextFile { path } => {
                let text = fs::read_to_string(path).map_err(|e| LoadError::Read {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                Ok(self.run_text(&text, &path.display().to_string(), options))
            }
        }
    }

    /// Run the examples in a loaded module's owner tree.
    /// 运行已加载模块所属者树中的示例。
    pub fn run_module(&self, module: &Module, options: &ComparisonOptions) -> ExampleReport {
        let file = module.path.as_ref().map(|p| p.display().to_string());
        let mut session = Session::new(self.step_limit, options, file);

        let start = self.clock.now();
        session.run_owner(&module.root, &module.globals);
        let elapsed = self.clock.now().saturating_duration_since(start);

        debug!(module = %module.name, attempted = session.attempted, failed = session.failed, "module examples finished");
        session.finish(elapsed)
    }

    /// Run the examples in a standalone text, all in one `__main__` context.
    /// 运行独立文本中的示例，全部处于同一个 `__main__` 上下文中。
    pub fn run_text(&self, text: &str, file: &str, options: &ComparisonOptions) -> ExampleReport {
        let globals = Namespace::new();
        globals.set("__name__", Value::str("__main__"));
        let blocks = extract_examples(text, 1);
        let mut session = Session::new(self.step_limit, options, Some(file.to_string()));

        let start = self.clock.now();
        for block in &blocks {
            session.run_block(file, block, &globals);
        }
        let elapsed = self.clock.now().saturating_duration_since(start);

        debug!(file, attempted = session.attempted, failed = session.failed, "text examples finished");
        session.finish(elapsed)
    }
}

/// Mutable state of one engine run.
struct Session<'o> {
    interp: Interpreter,
    options: &'o ComparisonOptions,
    file: Option<String>,
    attempted: usize,
    failed: usize,
    failures: Vec<ExampleOutcome>,
    /// Set by fail-fast after the first failure.
    stopped: bool,
}

impl<'o> Session<'o> {
    fn new(step_limit: u64, options: &'o ComparisonOptions, file: Option<String>) -> Self {
        Self {
            interp: Interpreter::new(step_limit),
            options,
            file,
            attempted: 0,
            failed: 0,
            failures: Vec::new(),
            stopped: false,
        }
    }

    fn run_owner(&mut self, owner: &Owner, parent: &Namespace) {
        if self.stopped {
            return;
        }
        let globals = parent.snapshot();
        if let Some(doc) = &owner.docstring {
            for block in extract_examples(&doc.text, doc.line) {
                self.run_block(&owner.name, &block, &globals);
            }
        }
        for child in &owner.children {
            self.run_owner(child, &globals);
        }
    }

    fn run_block(&mut self, owner: &str, block: &ExampleBlock, globals: &Namespace) {
        if self.stopped {
            return;
        }
        self.attempted += 1;
        trace!(owner, line = block.line, source = %block.source, "running example");

        let (actual, kind, diff) = match self.interp.run_example(&block.source, globals) {
            Ok(output) if check_output(&block.expected, &output, self.options) => {
                (output, OutcomeKind::Passed, None)
            }
            Ok(output) => {
                let diff = describe_mismatch(&block.expected, &output);
                (output, OutcomeKind::Mismatch, Some(diff))
            }
            Err(error) => {
                let actual = error.to_string();
                let diff = format!("Exception raised:\n    {actual}\n");
                (actual, OutcomeKind::Exception, Some(diff))
            }
        };

        if kind == OutcomeKind::Passed {
            return;
        }

        self.failed += 1;
        debug!(owner, line = block.line, ?kind, "example failed");
        self.failures.push(ExampleOutcome {
            owner: owner.to_string(),
            file: self.file.clone(),
            line: block.line,
            source: block.source.clone(),
            expected: block.expected.clone(),
            actual,
            kind,
            diff,
        });
        if self.options.fail_fast {
            self.stopped = true;
        }
    }

    fn finish(self, elapsed: std::time::Duration) -> ExampleReport {
        ExampleReport {
            attempted: self.attempted,
            failed: self.failed,
            elapsed,
            failures: self.failures,
        }
    }
}
