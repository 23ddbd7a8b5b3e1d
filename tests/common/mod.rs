// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

use doctor_testerson::core::checker::ComparisonOptions;
use doctor_testerson::core::engine::ExampleEngine;
use doctor_testerson::core::models::ExampleReport;
use doctor_testerson::infra::clock::MonotonicClock;
use doctor_testerson::infra::loader::{ModuleLoader, Registry};

/// A module whose examples all pass.
pub const PASSING_MODULE: &str = r#""""Small arithmetic helpers.

>>> double(2)
4
"""

def double(x):
    """Double a value.

    >>> double(21)
    42
    >>> double('ab')
    'abab'
    """
    return x * 2
"#;

/// A module with one passing and one failing example.
pub const FAILING_MODULE: &str = r#""""Helpers that disagree with their documentation."""

def one():
    """
    >>> one()
    1
    """
    return 1

def broken():
    """
    >>> broken()
    2
    """
    return 1
"#;

/// A module without any documentation examples.
pub const EMPTY_MODULE: &str = r#""""No examples here."""

def quiet():
    return None
"#;

/// A text file with a single passing example.
pub const PASSING_TEXT: &str = "Adding numbers:\n\n>>> 2 + 2\n4\n";

/// Writes `content` to `relative` under `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// A temporary project with a `pyproject.toml` at its root.
pub fn setup_project() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    write_file(temp_dir.path(), "pyproject.toml", "[project]\nname = \"sample\"\n");
    temp_dir
}

/// A project holding the passing, failing and empty modules plus a text file.
pub fn setup_sample_project() -> TempDir {
    let temp_dir = setup_project();
    let root = temp_dir.path();
    write_file(root, "mathy.py", PASSING_MODULE);
    write_file(root, "broken.py", FAILING_MODULE);
    write_file(root, "quiet.py", EMPTY_MODULE);
    write_file(root, "README.md", PASSING_TEXT);
    temp_dir
}

/// A registry serving the given `(name, source)` modules.
pub fn registry_with(modules: &[(&str, &str)]) -> Registry {
    let mut registry = Registry::new();
    for (name, source) in modules {
        registry.register_source(*name, *source);
    }
    registry
}

/// Runs the examples of module `name` from `loader`.
pub fn run_module(loader: &dyn ModuleLoader, name: &str, options: &ComparisonOptions) -> ExampleReport {
    let clock = MonotonicClock;
    let engine = ExampleEngine::new(loader, &clock);
    let module = loader.load(name, None).expect("module should load");
    engine.run_module(&module, options)
}

/// Runs the examples in `text` as a standalone text file.
pub fn run_text(text: &str, options: &ComparisonOptions) -> ExampleReport {
    let registry = Registry::new();
    let clock = MonotonicClock;
    let engine = ExampleEngine::new(&registry, &clock);
    engine.run_text(text, "example.txt", options)
}
