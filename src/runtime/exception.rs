//! Script exceptions
//!
//! The engine reports failures as thrown values. This module turns them into
//! [`Exception`], a plain host value holding the display message and, when it
//! can be recovered, the source position of the throw.

use std::sync::OnceLock;

use boa_engine::{Context as Engine, JsError, JsString, JsValue};
use regex::Regex;
use thiserror::Error;

/// An uncaught script exception
///
/// Rendered as `"<message> (line: <line|?>, column: <column|?>)"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line: {}, column: {})", position(.line), position(.column))]
pub struct Exception {
    /// Engine display string of the thrown value, e.g. `TypeError: x is not a function`
    pub message: String,
    /// 1-based source line, if known
    pub line: Option<u32>,
    /// 1-based source column, if known
    pub column: Option<u32>,
}

fn position(value: &Option<u32>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

impl Exception {
    /// Create an exception with a message and no position
    pub fn new(message: impl Into<String>) -> Self {
        Exception {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Attach a source position
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Build an exception from an error the engine returned.
    ///
    /// Thrown objects may carry their own position in `line`/`column`
    /// (or `lineNumber`/`columnNumber`) properties. Otherwise the position
    /// is recovered from an `at line N, col M` suffix in the message, which
    /// the engine appends to syntax errors.
    pub(crate) fn from_js_error(err: JsError, engine: &mut Engine) -> Self {
        let mut exception = match err.as_opaque().cloned() {
            Some(thrown) => {
                let message = match err.try_native(engine) {
                    Ok(native) => native.to_string(),
                    Err(_) => describe(&thrown, engine),
                };
                Exception {
                    message,
                    line: numeric_property(&thrown, &["line", "lineNumber"], engine),
                    column: numeric_property(&thrown, &["column", "columnNumber"], engine),
                }
            }
            // Native errors are never converted to script objects here: the
            // runtime-limit kind has no script representation.
            None => Exception::new(err.to_string()),
        };

        if exception.line.is_none() {
            if let Some((line, column)) = parse_position(&exception.message) {
                exception.line = Some(line);
                exception.column = Some(column);
            }
        }
        exception
    }
}

/// `ToString` of a thrown value, falling back to the engine's debug display
/// when the conversion itself throws.
fn describe(value: &JsValue, engine: &mut Engine) -> String {
    match value.to_string(engine) {
        Ok(s) => s.to_std_string_lossy(),
        Err(_) => value.display().to_string(),
    }
}

fn numeric_property(value: &JsValue, names: &[&str], engine: &mut Engine) -> Option<u32> {
    let object = value.as_object()?;
    names.iter().find_map(|name| {
        let n = object
            .get(JsString::from(*name), engine)
            .ok()?
            .as_number()?;
        (n.is_finite() && n >= 0.0 && n <= u32::MAX as f64).then_some(n as u32)
    })
}

fn position_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"at line (\d+), col(?:umn)? (\d+)").expect("position pattern is valid")
    })
}

/// Extract the last `at line N, col M` position mentioned in a message
pub(crate) fn parse_position(message: &str) -> Option<(u32, u32)> {
    let captures = position_pattern().captures_iter(message).last()?;
    let line = captures.get(1)?.as_str().parse().ok()?;
    let column = captures.get(2)?.as_str().parse().ok()?;
    Some((line, column))
}
