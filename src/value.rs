//! JavaScript value handles
//!
//! [`Value`] is a non-owning view onto a single engine value: a primitive, an
//! object, an array or a function. The engine's garbage collector governs the
//! lifetime of the underlying object; the handle only keeps it reachable.
//!
//! Nothing is cached. Every predicate and accessor re-reads the engine value,
//! so a handle always reports the current kind of what it refers to.
//!
//! # Integer width
//! The bridge integer type is `i64`. Engine numbers are IEEE doubles, so
//! integers beyond 2^53 in magnitude round on the way in, and [`Value::as_int`]
//! truncates toward zero with a saturating conversion (`NaN` becomes 0).
//!
//! # Contexts
//! Primitive values are context-independent in the engine, so literals built
//! with the `From` impls belong to no particular [`Context`] and can be handed
//! to any of them. Objects belong to the context that created them and should
//! only be used with that context.

use std::fmt;

use boa_engine::{JsString, JsValue};
use thiserror::Error;

use crate::context::Context;
use crate::runtime::Exception;

/// Coarse classification of a value, derived fresh on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    BigInt,
    /// Any non-callable object, arrays included
    Object,
    /// A callable object
    Function,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Symbol => "symbol",
            Kind::BigInt => "bigint",
            Kind::Object => "object",
            Kind::Function => "function",
        };
        f.write_str(name)
    }
}

/// Error from an operation on a [`Value`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The callee has no invocable representation
    #[error("value is not a function")]
    NotCallable,
    /// The engine threw while running the operation
    #[error("script exception: {0}")]
    Exception(Exception),
}

impl BridgeError {
    /// The script exception, if this error carries one
    pub fn exception(&self) -> Option<&Exception> {
        match self {
            BridgeError::Exception(e) => Some(e),
            BridgeError::NotCallable => None,
        }
    }
}

/// Handle to a JavaScript value
#[derive(Clone)]
#[repr(transparent)]
pub struct Value(JsValue);

impl Value {
    // Constructors

    /// Create an undefined value
    #[inline]
    pub fn undefined() -> Self {
        Value(JsValue::undefined())
    }

    /// Create a null value
    #[inline]
    pub fn null() -> Self {
        Value(JsValue::null())
    }

    /// Wrap a raw engine value
    #[inline]
    pub fn from_js(value: JsValue) -> Self {
        Value(value)
    }

    /// Borrow the raw engine value
    #[inline]
    pub fn as_js(&self) -> &JsValue {
        &self.0
    }

    /// Unwrap into the raw engine value
    #[inline]
    pub fn into_js(self) -> JsValue {
        self.0
    }

    // Type checking

    /// Check if this is undefined
    #[inline]
    pub fn is_undefined(&self) -> bool {
        self.0.is_undefined()
    }

    /// Check if this is null
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Check if this is null or undefined
    #[inline]
    pub fn is_nullish(&self) -> bool {
        self.0.is_null_or_undefined()
    }

    /// Check if this is a boolean
    #[inline]
    pub fn is_bool(&self) -> bool {
        self.0.is_boolean()
    }

    /// Check if this is a number (integer or floating point)
    #[inline]
    pub fn is_number(&self) -> bool {
        self.0.is_number()
    }

    /// Check if this is a string
    #[inline]
    pub fn is_string(&self) -> bool {
        self.0.is_string()
    }

    /// Check if this is an object (functions and arrays included)
    #[inline]
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    /// Check if this is callable
    #[inline]
    pub fn is_function(&self) -> bool {
        self.0.is_callable()
    }

    /// Check if this is an array
    pub fn is_array(&self) -> bool {
        self.0.as_object().is_some_and(|o| o.is_array())
    }

    /// Classify the value
    pub fn kind(&self) -> Kind {
        let v = &self.0;
        if v.is_undefined() {
            Kind::Undefined
        } else if v.is_null() {
            Kind::Null
        } else if v.is_boolean() {
            Kind::Boolean
        } else if v.is_number() {
            Kind::Number
        } else if v.is_string() {
            Kind::String
        } else if v.is_symbol() {
            Kind::Symbol
        } else if v.is_bigint() {
            Kind::BigInt
        } else if v.is_callable() {
            Kind::Function
        } else {
            Kind::Object
        }
    }

    // Value extraction. None unless the kind matches exactly; nothing is
    // coerced across kinds.

    /// Get boolean value, returns None if not a boolean
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        self.0.as_boolean()
    }

    /// Get integer value, returns None if not a number
    ///
    /// Fractional numbers truncate toward zero (`5.67` gives `5`).
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        self.0.as_number().map(|n| n as i64)
    }

    /// Get floating point value, returns None if not a number
    #[inline]
    pub fn as_double(&self) -> Option<f64> {
        self.0.as_number()
    }

    /// Get string value, returns None if not a string
    ///
    /// Unpaired surrogates have no UTF-8 form and come back as U+FFFD.
    pub fn as_string(&self) -> Option<String> {
        self.0.as_string().map(|s| s.to_std_string_lossy())
    }

    // Engine-backed operations

    /// Compare with the engine's loose (`==`) equality
    ///
    /// Objects compared against primitives go through `valueOf`/`toString`,
    /// which may run script and throw.
    pub fn loose_eq(&self, other: &Value, ctx: &mut Context) -> Result<bool, BridgeError> {
        let result = self.0.equals(&other.0, ctx.engine_mut());
        ctx.check(result)
    }

    /// Convert to a string with the engine's `ToString`
    pub fn to_js_string(&self, ctx: &mut Context) -> Result<String, BridgeError> {
        let result = self.0.to_string(ctx.engine_mut());
        ctx.check(result).map(|s| s.to_std_string_lossy())
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::undefined()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.0.display())
    }
}

/// Diagnostic rendering that needs no context. Use
/// [`Value::to_js_string`] for the script-visible string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_string() {
            Some(s) => f.write_str(&s.to_std_string_lossy()),
            None => write!(f, "{}", self.0.display()),
        }
    }
}

// Host literal conversions

impl From<JsValue> for Value {
    fn from(value: JsValue) -> Self {
        Value(value)
    }
}

impl From<Value> for JsValue {
    fn from(value: Value) -> Self {
        value.0
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::undefined()
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value(JsValue::from(b))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value(JsValue::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value(JsValue::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        match i32::try_from(n) {
            Ok(small) => Value(JsValue::from(small)),
            Err(_) => Value(JsValue::from(n as f64)),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value(JsValue::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(JsValue::from(JsString::from(s)))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from(s.as_str())
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

/// `None` becomes null
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(Value::null, Into::into)
    }
}
