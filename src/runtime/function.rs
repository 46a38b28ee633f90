//! Host functions and host objects
//!
//! Rust closures can be exposed to scripts as ordinary function objects.
//! When a script calls one, the closure receives the bridge context and the
//! arguments as [`Value`]s. The context is the same one whose `eval` or
//! `call` is still on the stack, so a host function may re-enter it: read
//! globals, evaluate more code or call back into script.
//!
//! Arbitrary Rust data can also travel through script code wrapped in an
//! opaque object, and be recovered on the way back with
//! [`Value::host_object`].

use std::any::Any;
use std::rc::Rc;

use boa_engine::object::FunctionObjectBuilder;
use boa_engine::{JsData, JsNativeError, JsObject, JsResult, JsString, JsValue, NativeFunction};
use boa_gc::{Finalize, Trace};
use log::debug;

use crate::context::Context;
use crate::runtime::Exception;
use crate::value::{BridgeError, Value};

/// Result returned by a host function
pub type HostResult<T = Value> = Result<T, Exception>;

/// Opaque payload for host data passed through script code
#[derive(Trace, Finalize, JsData)]
struct HostObject {
    // Host data holds no engine values, so there is nothing to trace.
    #[unsafe_ignore_trace]
    data: Rc<dyn Any>,
}

impl Context {
    /// Wrap a host closure as a script function named `name`
    ///
    /// The closure's `Ok` value is returned to the script. An `Err` is
    /// thrown into the script as an `Error` carrying the exception message,
    /// where `try`/`catch` can handle it.
    ///
    /// The closure is stored where the engine's collector cannot see inside
    /// it, so it must not hold engine values. The `Send` bound enforces this:
    /// [`Value`] and every other engine handle are `!Send`. Keep shared
    /// script state in globals, and shared host state behind `Arc`.
    ///
    /// ```compile_fail
    /// use jsbridge::Context;
    ///
    /// let mut ctx = Context::new();
    /// let captured = ctx.eval("({})").unwrap();
    /// ctx.create_function("leak", move |_ctx, _args| Ok(captured.clone()));
    /// ```
    pub fn create_function<F, R>(&mut self, name: &str, f: F) -> Value
    where
        F: Fn(&mut Context, &[Value]) -> HostResult<R> + Send + 'static,
        R: Into<Value>,
    {
        let label = name.to_string();
        let trampoline = move |_this: &JsValue,
                               args: &[JsValue],
                               engine: &mut boa_engine::Context|
              -> JsResult<JsValue> {
            debug!("host function {} called with {} argument(s)", label, args.len());
            let ctx = Context::from_engine_mut(engine);
            let args: Vec<Value> = args.iter().cloned().map(Value::from_js).collect();
            match f(ctx, &args) {
                Ok(value) => Ok(value.into().into_js()),
                Err(e) => Err(JsNativeError::error().with_message(e.message).into()),
            }
        };

        // SAFETY: the closure captures the host callable and its name. Both
        // are `Send`, and no garbage-collected engine handle is `Send`.
        let native = unsafe { NativeFunction::from_closure(trampoline) };
        let function = FunctionObjectBuilder::new(self.engine_mut().realm(), native)
            .name(JsString::from(name))
            .length(0)
            .build();
        Value::from_js(function.into())
    }

    /// Expose a host closure as the global function `name`
    pub fn register_fn<F, R>(&mut self, name: &str, f: F) -> Result<(), BridgeError>
    where
        F: Fn(&mut Context, &[Value]) -> HostResult<R> + Send + 'static,
        R: Into<Value>,
    {
        debug!("registering host function {}", name);
        let function = self.create_function(name, f);
        self.set_global(name, function)
    }

    /// Wrap host data in an opaque script object
    pub fn wrap_host_object<T: Any>(&mut self, data: T) -> Value {
        let prototype = self
            .engine_mut()
            .intrinsics()
            .constructors()
            .object()
            .prototype();
        let object = JsObject::from_proto_and_data(prototype, HostObject { data: Rc::new(data) });
        Value::from_js(object.into())
    }
}

impl Value {
    /// Recover host data wrapped by [`Context::wrap_host_object`]
    ///
    /// Returns None for any other value or when `T` does not match.
    pub fn host_object<T: Any>(&self) -> Option<Rc<T>> {
        let object = self.as_js().as_object()?;
        let host = object.downcast_ref::<HostObject>()?;
        host.data.clone().downcast::<T>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_lowercase_host_function() {
        let mut ctx = Context::new();
        ctx.register_fn("lowercase", |_ctx, args| {
            let text = args.first().and_then(Value::as_string).unwrap_or_default();
            Ok(text.to_lowercase())
        })
        .unwrap();

        let result = ctx.eval("lowercase('HeLLo World')").unwrap();
        assert_eq!(result.as_string().as_deref(), Some("hello world"));
    }

    #[test]
    fn test_host_function_receives_arguments() {
        let mut ctx = Context::new();
        ctx.register_fn("describe", |ctx, args| {
            assert_eq!(args.len(), 3);
            assert!(args[0].loose_eq(&Value::from(1), ctx).unwrap());
            assert_eq!(args[1].as_string().as_deref(), Some("two"));
            assert!(args[2].is_object());
            let inner = args[2].get(ctx, "k").map_err(|e| Exception::new(e.to_string()))?;
            Ok(inner)
        })
        .unwrap();

        let result = ctx.eval("describe(1, 'two', { k: 'value' })").unwrap();
        assert_eq!(result.as_string().as_deref(), Some("value"));
    }

    #[test]
    fn test_host_function_missing_arguments() {
        let mut ctx = Context::new();
        ctx.register_fn("count", |_ctx, args| Ok(args.len() as i32)).unwrap();
        assert_eq!(ctx.eval("count()").unwrap().as_int(), Some(0));
        assert_eq!(ctx.eval("count(1, 2, 3)").unwrap().as_int(), Some(3));
    }

    #[test]
    fn test_host_function_literal_returns() {
        let mut ctx = Context::new();
        ctx.register_fn("nothing", |_ctx, _args| Ok(())).unwrap();
        ctx.register_fn("maybe", |_ctx, _args| Ok(None::<i32>)).unwrap();
        ctx.register_fn("half", |_ctx, _args| Ok(0.5)).unwrap();

        assert_eq!(ctx.eval("nothing() === undefined").unwrap().as_bool(), Some(true));
        assert_eq!(ctx.eval("maybe() === null").unwrap().as_bool(), Some(true));
        assert_eq!(ctx.eval("half() * 4").unwrap().as_int(), Some(2));
    }

    #[test]
    fn test_host_function_error() {
        let mut ctx = Context::new();
        ctx.register_fn("fail", |_ctx, _args| -> HostResult {
            Err(Exception::new("host refused"))
        })
        .unwrap();

        let err = ctx.eval("fail()").unwrap_err();
        assert!(err.exception().unwrap().message.contains("host refused"));

        let caught = ctx
            .eval("var msg; try { fail(); } catch (e) { msg = e.message; } msg")
            .unwrap();
        assert_eq!(caught.as_string().as_deref(), Some("host refused"));
    }

    #[test]
    fn test_host_function_reentry() {
        let mut ctx = Context::new();
        ctx.eval("var base = 100; function scale(n) { return n * 2; }").unwrap();
        ctx.register_fn("compute", |ctx, args| {
            let n = args.first().and_then(Value::as_int).unwrap_or(0);
            let base = ctx.global("base").map_err(|e| Exception::new(e.to_string()))?;
            let doubled = ctx
                .call_global("scale", &[Value::from(n)])
                .map_err(|e| Exception::new(e.to_string()))?;
            ctx.eval("var touched = true;")
                .map_err(|e| Exception::new(e.to_string()))?;
            Ok(base.as_int().unwrap_or(0) + doubled.as_int().unwrap_or(0))
        })
        .unwrap();

        assert_eq!(ctx.eval("compute(21)").unwrap().as_int(), Some(142));
        assert_eq!(ctx.global("touched").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_host_function_called_from_host() {
        let mut ctx = Context::new();
        let f = ctx.create_function("twice", |_ctx, args| {
            Ok(args.first().and_then(Value::as_int).unwrap_or(0) * 2)
        });
        assert!(f.is_function());
        assert_eq!(f.call(&mut ctx, &[Value::from(8)]).unwrap().as_int(), Some(16));
        assert!(ctx.global("twice").unwrap().is_undefined());
    }

    #[test]
    fn test_host_function_state() {
        let mut ctx = Context::new();
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        ctx.register_fn("hit", move |_ctx, _args| {
            Ok(counter.fetch_add(1, Ordering::Relaxed) + 1)
        })
        .unwrap();

        ctx.eval("hit(); hit(); hit();").unwrap();
        assert_eq!(hits.load(Ordering::Relaxed), 3);
        assert_eq!(ctx.eval("hit()").unwrap().as_int(), Some(4));
    }

    #[test]
    fn test_host_function_name() {
        let mut ctx = Context::new();
        ctx.register_fn("named", |_ctx, _args| Ok(1)).unwrap();
        assert_eq!(ctx.eval("named.name").unwrap().as_string().as_deref(), Some("named"));
        assert_eq!(ctx.eval("typeof named").unwrap().as_string().as_deref(), Some("function"));
    }

    #[derive(Debug, PartialEq)]
    struct Ticket {
        id: u32,
    }

    #[test]
    fn test_host_object_round_trip() {
        let mut ctx = Context::new();
        let ticket = ctx.wrap_host_object(Ticket { id: 7 });
        assert!(ticket.is_object());
        ctx.set_global("ticket", ticket).unwrap();
        ctx.eval("var stash = { inner: ticket };").unwrap();

        let back = ctx.eval("stash.inner").unwrap();
        assert_eq!(back.host_object::<Ticket>().as_deref(), Some(&Ticket { id: 7 }));
        assert!(back.host_object::<String>().is_none());
        assert!(Value::from(1).host_object::<Ticket>().is_none());
        assert_eq!(ctx.eval("typeof ticket").unwrap().as_string().as_deref(), Some("object"));
    }

    #[test]
    fn test_host_object_through_host_function() {
        let mut ctx = Context::new();
        let handle = ctx.wrap_host_object(String::from("payload"));
        ctx.set_global("handle", handle).unwrap();
        ctx.register_fn("unwrap", |_ctx, args| {
            let data = args
                .first()
                .and_then(|v| v.host_object::<String>())
                .ok_or_else(|| Exception::new("not a host string"))?;
            Ok(data.len() as i32)
        })
        .unwrap();

        assert_eq!(ctx.eval("unwrap(handle)").unwrap().as_int(), Some(7));
        assert!(ctx.eval("unwrap({})").is_err());
    }
}
