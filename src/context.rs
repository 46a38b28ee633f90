//! JavaScript execution context
//!
//! The Context is the main entry point of the bridge. It owns one engine
//! context (global scope plus heap) and provides the API for evaluating
//! JavaScript code and reading or writing global bindings.
//!
//! Successive evaluations share the same global scope: declarations made by
//! one `eval` are visible to the next.

use std::fs;
use std::path::{Path, PathBuf};

use boa_engine::{JsResult, JsString, Source};
use log::{debug, trace, warn};
use thiserror::Error;

use crate::runtime::Exception;
use crate::value::{BridgeError, Value};

/// Engine limits applied when a context is created
///
/// The default sets no limits: a script that never terminates blocks the
/// calling thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextConfig {
    /// Maximum iterations of a single loop
    pub loop_iteration_limit: Option<u64>,
    /// Maximum call recursion depth
    pub recursion_limit: Option<usize>,
    /// Maximum engine value stack size
    pub stack_size_limit: Option<usize>,
    /// Evaluate scripts in strict mode
    pub strict: bool,
}

impl ContextConfig {
    pub fn with_loop_iteration_limit(mut self, limit: u64) -> Self {
        self.loop_iteration_limit = Some(limit);
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = Some(limit);
        self
    }

    pub fn with_stack_size_limit(mut self, limit: usize) -> Self {
        self.stack_size_limit = Some(limit);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Error from JavaScript evaluation
#[derive(Debug, Error)]
pub enum EngineError {
    /// The script raised an uncaught exception
    #[error("uncaught exception: {0}")]
    Exception(Exception),
    /// The script source could not be read
    #[error("failed to read script {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// The script exception, if this error carries one
    pub fn exception(&self) -> Option<&Exception> {
        match self {
            EngineError::Exception(e) => Some(e),
            EngineError::Io { .. } => None,
        }
    }
}

impl From<BridgeError> for EngineError {
    fn from(e: BridgeError) -> Self {
        match e {
            BridgeError::Exception(exception) => EngineError::Exception(exception),
            BridgeError::NotCallable => {
                EngineError::Exception(Exception::new("TypeError: value is not a function"))
            }
        }
    }
}

/// JavaScript execution context
///
/// Exactly one engine context per instance; it is released when the
/// instance is dropped. The engine heap is thread-local, so a `Context` is
/// neither `Send` nor `Sync`.
#[repr(transparent)]
pub struct Context {
    engine: boa_engine::Context,
}

impl Context {
    /// Create a new context with a fresh global scope
    ///
    /// # Panics
    /// Panics if the engine cannot be initialized.
    pub fn new() -> Self {
        Self::with_config(ContextConfig::default())
    }

    /// Create a new context with the given engine limits
    pub fn with_config(config: ContextConfig) -> Self {
        let mut engine = boa_engine::Context::default();

        let limits = engine.runtime_limits_mut();
        if let Some(limit) = config.loop_iteration_limit {
            limits.set_loop_iteration_limit(limit);
        }
        if let Some(limit) = config.recursion_limit {
            limits.set_recursion_limit(limit);
        }
        if let Some(limit) = config.stack_size_limit {
            limits.set_stack_size_limit(limit);
        }
        engine.strict(config.strict);

        debug!("created script context ({:?})", config);
        Context { engine }
    }

    /// View an engine context handed to a host callback as a bridge context
    pub(crate) fn from_engine_mut(engine: &mut boa_engine::Context) -> &mut Context {
        // SAFETY: `Context` is `repr(transparent)` over `boa_engine::Context`,
        // so both types have the same layout and the borrow is carried over.
        unsafe { &mut *(engine as *mut boa_engine::Context as *mut Context) }
    }

    pub(crate) fn engine_mut(&mut self) -> &mut boa_engine::Context {
        &mut self.engine
    }

    /// Convert an engine result into a bridge result.
    ///
    /// Every path that enters the engine goes through here so that a thrown
    /// exception is always surfaced as a typed error and never left behind.
    pub(crate) fn check<T>(&mut self, result: JsResult<T>) -> Result<T, BridgeError> {
        result.map_err(|err| {
            let exception = Exception::from_js_error(err, &mut self.engine);
            warn!("script exception: {}", exception);
            BridgeError::Exception(exception)
        })
    }

    /// Evaluate JavaScript source code
    ///
    /// Runs the script to completion against the global scope and returns
    /// the completion value (undefined when the script produces none). An
    /// uncaught exception takes priority over any produced value.
    pub fn eval(&mut self, source: &str) -> Result<Value, EngineError> {
        debug!("evaluating {} bytes of script", source.len());
        let result = self.engine.eval(Source::from_bytes(source));
        self.check(result).map(Value::from_js).map_err(EngineError::from)
    }

    /// Evaluate JavaScript source code, panicking on an uncaught exception
    ///
    /// This is an escape hatch for hosts that treat a failing script as a
    /// program bug. Callers that cannot tolerate a script failure crashing
    /// the host should use [`Context::eval`] instead.
    ///
    /// # Panics
    /// Panics with the exception message if the script throws.
    pub fn eval_or_panic(&mut self, source: &str) -> Value {
        match self.eval(source) {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }

    /// Read a script file and evaluate its contents
    ///
    /// Read failures are reported as [`EngineError::Io`], never as a
    /// script exception.
    pub fn eval_file(&mut self, path: impl AsRef<Path>) -> Result<Value, EngineError> {
        let path = path.as_ref();
        debug!("loading script {}", path.display());
        let source = fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.eval(&source)
    }

    /// The global scope object
    pub fn global_object(&mut self) -> Value {
        Value::from_js(self.engine.global_object().into())
    }

    /// Read a global binding
    ///
    /// An absent name yields undefined. Accessor properties on the global
    /// object may run script; an exception they throw is returned.
    pub fn global(&mut self, name: &str) -> Result<Value, BridgeError> {
        trace!("get global {}", name);
        let global = self.engine.global_object();
        let result = global.get(JsString::from(name), &mut self.engine);
        self.check(result).map(Value::from_js)
    }

    /// Create or overwrite a global binding
    ///
    /// Writes follow non-strict assignment: a read-only binding such as
    /// `NaN` keeps its value and the call still succeeds.
    pub fn set_global(&mut self, name: &str, value: impl Into<Value>) -> Result<(), BridgeError> {
        let value = value.into();
        debug!("set global {} = {:?}", name, value);
        let global = self.engine.global_object();
        let result = global.set(JsString::from(name), value.into_js(), false, &mut self.engine);
        if !self.check(result)? {
            debug!("write to read-only global {} was ignored", name);
        }
        Ok(())
    }

    /// Run the engine's garbage collector
    pub fn gc(&mut self) {
        boa_gc::force_collect();
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        trace!("releasing script context");
    }
}
