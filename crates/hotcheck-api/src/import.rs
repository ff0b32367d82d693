//! Import statement records produced by an [`ImportExtractor`](crate::ImportExtractor)

use serde::{Deserialize, Serialize};

/// Node.js core modules that may be imported without the `node:` prefix
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Classification of an import target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecifierKind {
    /// `./foo`, `../bar`
    Relative,
    /// `/abs/path.js`, `file:///abs/path.js`
    Absolute,
    /// `node:fs`, `fs/promises`
    Builtin,
    /// `lodash`, `@scope/pkg/sub`
    Package,
    /// Statically known but empty
    Invalid,
    /// Computed at runtime, e.g. `import(cond ? a : b)`
    Unknown,
}

impl SpecifierKind {
    /// Classify a statically known specifier value
    pub fn classify(value: &str) -> Self {
        if value.is_empty() {
            return Self::Invalid;
        }

        if value == "." || value == ".." || value.starts_with("./") || value.starts_with("../") {
            return Self::Relative;
        }

        if value.starts_with('/') || value.starts_with("file:") {
            return Self::Absolute;
        }

        if value.starts_with("node:") {
            return Self::Builtin;
        }

        let head = value.split('/').next().unwrap_or(value);
        if NODE_BUILTINS.contains(&head) {
            Self::Builtin
        } else {
            Self::Package
        }
    }
}

/// The target of an import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSpecifier {
    /// Raw source text of the target, quotes included for literals
    pub code: String,
    /// Evaluated string value, `None` when computed at runtime
    pub value: Option<String>,
    pub kind: SpecifierKind,
}

impl ModuleSpecifier {
    /// A specifier whose value is known statically
    pub fn literal(code: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            code: code.into(),
            kind: SpecifierKind::classify(&value),
            value: Some(value),
        }
    }

    /// A specifier produced by an arbitrary expression
    pub fn computed(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value: None,
            kind: SpecifierKind::Unknown,
        }
    }

    /// Exact string match against the evaluated value
    pub fn matches(&self, specifier: &str) -> bool {
        self.value.as_deref() == Some(specifier)
    }
}

/// One parsed import statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    pub module_specifier: ModuleSpecifier,
    /// `import(...)` expression rather than an import/export declaration
    pub is_dynamic: bool,
    /// `import type` / `export type` declarations
    pub type_only: bool,
    /// 1-based line where the statement starts
    pub line: usize,
}

impl ImportRecord {
    pub fn new_static(module_specifier: ModuleSpecifier, line: usize) -> Self {
        Self {
            module_specifier,
            is_dynamic: false,
            type_only: false,
            line,
        }
    }

    pub fn new_dynamic(module_specifier: ModuleSpecifier, line: usize) -> Self {
        Self {
            module_specifier,
            is_dynamic: true,
            type_only: false,
            line,
        }
    }

    pub fn with_type_only(mut self, type_only: bool) -> Self {
        self.type_only = type_only;
        self
    }

    /// Whether this record is a dynamic import of exactly `specifier`
    pub fn is_dynamic_import_of(&self, specifier: &str) -> bool {
        self.is_dynamic && self.module_specifier.matches(specifier)
    }
}
