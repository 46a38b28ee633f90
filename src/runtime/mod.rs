//! Runtime support
//!
//! This module contains the operations that cross the bridge:
//! - Exception extraction from engine errors
//! - Property and element access
//! - Function calls
//! - Host functions and host objects

pub mod call;
pub mod exception;
pub mod function;
pub mod property;

pub use exception::Exception;
pub use function::HostResult;
