//! Property and element access
//!
//! Named and indexed reads and writes on a [`Value`]. Absent properties read
//! as undefined, out-of-range reads as undefined, and out-of-range writes
//! extend arrays, all following the engine's own semantics. The bridge adds
//! no bounds checks of its own.
//!
//! Primitive receivers (strings, numbers, booleans) are boxed the way the
//! engine boxes them, so `"abc".length` reads as 3. Reads on null or
//! undefined yield undefined and writes to them are ignored.

use boa_engine::property::PropertyKey;
use boa_engine::{JsObject, JsString};
use log::trace;

use crate::context::Context;
use crate::value::{BridgeError, Value};

impl Value {
    /// Object to operate on, or None for null/undefined
    fn receiver(&self, ctx: &mut Context) -> Result<Option<JsObject>, BridgeError> {
        let value = self.as_js();
        if value.is_null_or_undefined() {
            return Ok(None);
        }
        if let Some(object) = value.as_object() {
            return Ok(Some(object.clone()));
        }
        let boxed = value.to_object(ctx.engine_mut());
        ctx.check(boxed).map(Some)
    }

    fn get_key(&self, ctx: &mut Context, key: PropertyKey) -> Result<Value, BridgeError> {
        let Some(object) = self.receiver(ctx)? else {
            return Ok(Value::undefined());
        };
        let result = object.get(key, ctx.engine_mut());
        ctx.check(result).map(Value::from_js)
    }

    fn set_key(&self, ctx: &mut Context, key: PropertyKey, value: Value) -> Result<(), BridgeError> {
        // Writes to primitives land on a temporary wrapper and are lost,
        // matching non-strict script semantics.
        let Some(object) = self.as_js().as_object().cloned() else {
            trace!("ignoring property write on a {} value", self.kind());
            return Ok(());
        };
        let result = object.set(key.clone(), value.into_js(), false, ctx.engine_mut());
        if !ctx.check(result)? {
            trace!("write to read-only property {:?} was ignored", key);
        }
        Ok(())
    }

    /// Read a named property
    pub fn get(&self, ctx: &mut Context, name: &str) -> Result<Value, BridgeError> {
        trace!("get .{}", name);
        self.get_key(ctx, JsString::from(name).into())
    }

    /// Write a named property in place
    ///
    /// Writes follow non-strict assignment: a read-only or frozen target
    /// keeps its value and the call still succeeds.
    pub fn set(&self, ctx: &mut Context, name: &str, value: impl Into<Value>) -> Result<(), BridgeError> {
        trace!("set .{}", name);
        self.set_key(ctx, JsString::from(name).into(), value.into())
    }

    /// Read an indexed element
    pub fn at(&self, ctx: &mut Context, index: u32) -> Result<Value, BridgeError> {
        trace!("get [{}]", index);
        self.get_key(ctx, index.into())
    }

    /// Write an indexed element in place
    pub fn set_at(&self, ctx: &mut Context, index: u32, value: impl Into<Value>) -> Result<(), BridgeError> {
        trace!("set [{}]", index);
        self.set_key(ctx, index.into(), value.into())
    }

    /// Walk a dot-separated path such as `organizers.0.name`
    ///
    /// Segments that parse as `u32` are element indices; the rest are
    /// property names. A missing step yields undefined, and so does every
    /// step after it.
    pub fn get_path(&self, ctx: &mut Context, path: &str) -> Result<Value, BridgeError> {
        let mut current = self.clone();
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = match segment.parse::<u32>() {
                Ok(index) => current.at(ctx, index)?,
                Err(_) => current.get(ctx, segment)?,
            };
        }
        Ok(current)
    }
}
