//! Function invocation
//!
//! Calls go straight to the engine and the result is always checked for a
//! thrown exception before the return value is handed back.

use boa_engine::JsValue;
use log::debug;

use crate::context::Context;
use crate::value::{BridgeError, Value};

fn to_engine_args(args: &[Value]) -> Vec<JsValue> {
    args.iter().map(|arg| arg.as_js().clone()).collect()
}

impl Value {
    /// Call this value as a function with an undefined `this`
    ///
    /// Arguments are passed positionally in the order given.
    pub fn call(&self, ctx: &mut Context, args: &[Value]) -> Result<Value, BridgeError> {
        self.call_with_this(ctx, &Value::undefined(), args)
    }

    /// Call this value as a function with an explicit receiver
    pub fn call_with_this(
        &self,
        ctx: &mut Context,
        this: &Value,
        args: &[Value],
    ) -> Result<Value, BridgeError> {
        let Some(function) = self.as_js().as_callable().cloned() else {
            return Err(BridgeError::NotCallable);
        };
        debug!("calling function with {} argument(s)", args.len());
        let result = function.call(this.as_js(), &to_engine_args(args), ctx.engine_mut());
        ctx.check(result).map(Value::from_js)
    }

    /// Read the method `name` and call it with this value as receiver
    pub fn call_method(&self, ctx: &mut Context, name: &str, args: &[Value]) -> Result<Value, BridgeError> {
        let method = self.get(ctx, name)?;
        method.call_with_this(ctx, self, args)
    }

    /// Call this value as a constructor (`new f(...args)`)
    pub fn construct(&self, ctx: &mut Context, args: &[Value]) -> Result<Value, BridgeError> {
        let Some(constructor) = self.as_js().as_constructor().cloned() else {
            return Err(BridgeError::NotCallable);
        };
        debug!("constructing with {} argument(s)", args.len());
        let result = constructor.construct(&to_engine_args(args), None, ctx.engine_mut());
        ctx.check(result).map(|object| Value::from_js(object.into()))
    }
}

impl Context {
    /// Call the global function `name` with an undefined `this`
    pub fn call_global(&mut self, name: &str, args: &[Value]) -> Result<Value, BridgeError> {
        let function = self.global(name)?;
        function.call(self, args)
    }
}
