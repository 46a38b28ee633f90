//! jsbridge - a value bridge between Rust and an embedded JavaScript engine
//!
//! The bridge lets host code evaluate scripts, read and write global
//! bindings, navigate script objects, call script functions and expose Rust
//! closures to scripts. Script exceptions always come back as typed errors.
//!
//! # Features
//! - One isolated global scope per [`Context`]
//! - [`Value`] handles with kind predicates and exact-kind accessors
//! - Property, element and path access
//! - Function calls with mandatory exception checking
//! - Host functions and opaque host objects
//!
//! # Example
//! ```
//! use jsbridge::{Context, Value};
//!
//! let mut ctx = Context::new();
//! ctx.register_fn("lowercase", |_ctx, args| {
//!     Ok(args[0].as_string().unwrap_or_default().to_lowercase())
//! })
//! .unwrap();
//!
//! let x = ctx.eval("var x = {a: 1, b: [1, 2, 3]}; x").unwrap();
//! assert_eq!(x.get(&mut ctx, "a").unwrap().as_int(), Some(1));
//!
//! let s = ctx.eval("lowercase('HELLO')").unwrap();
//! assert_eq!(s.as_string().as_deref(), Some("hello"));
//!
//! let err = Value::from(3).call(&mut ctx, &[]).unwrap_err();
//! assert_eq!(err, jsbridge::BridgeError::NotCallable);
//! ```

// Core modules
pub mod context;
pub mod value;

// Bridge operations
pub mod runtime;

// Re-export main types
pub use context::{Context, ContextConfig, EngineError};
pub use runtime::{Exception, HostResult};
pub use value::{BridgeError, Kind, Value};
