//! Method Invocation
//!
//! A method name plus its positional JSON arguments. Built fresh for each
//! remote call and consumed by the envelope codec.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One remote method call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInvocation {
    pub method: String,
    pub args: Vec<Value>,
}

impl MethodInvocation {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Build an invocation from any serializable argument tuple
    ///
    /// Tuples and sequences become the positional list, `()` becomes an empty
    /// list and any other value becomes the single argument.
    pub fn from_args<A: Serialize>(
        method: impl Into<String>,
        args: &A,
    ) -> serde_json::Result<Self> {
        let args = match serde_json::to_value(args)? {
            Value::Array(values) => values,
            Value::Null => Vec::new(),
            single => vec![single],
        };
        Ok(Self::new(method, args))
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}
