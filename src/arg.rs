use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Op};
use crate::kind::Kind;
use crate::leaf::Str;

/// One constructor argument, classified by what it contributes to the new node.
///
/// Anything convertible with `Arg::from` can be passed to the `e!` macro.
#[derive(Debug, Clone)]
pub enum Arg {
    Op(Op),
    Kind(Kind),
    /// Plain text, becomes a leaf cause.
    Message(String),
    /// A structured error, owned by the new node as its cause.
    Error(Error),
    /// Any other error, used as an opaque leaf cause.
    Source(Arc<dyn std::error::Error + Send + Sync>),
    /// A value the constructor cannot classify.
    Unsupported {
        type_name: &'static str,
        value: String,
    },
}

impl Arg {
    /// Wraps an arbitrary error. A structured [`Error`] is recognized and kept
    /// structured so that kind normalization and matching can see into it.
    pub fn source<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        if let Some(structured) = (&err as &dyn Any).downcast_ref::<Error>() {
            return Self::Error(structured.clone());
        }
        Self::Source(Arc::new(err))
    }

    /// Marks a value the constructor has no slot for. Building an error from it
    /// yields a descriptive leaf instead of aborting.
    pub fn unsupported<T: fmt::Debug + ?Sized>(value: &T) -> Self {
        Self::Unsupported {
            type_name: std::any::type_name::<T>(),
            value: format!("{value:?}"),
        }
    }
}

impl From<Op> for Arg {
    fn from(op: Op) -> Self {
        Self::Op(op)
    }
}

impl From<Kind> for Arg {
    fn from(kind: Kind) -> Self {
        Self::Kind(kind)
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Self::Message(text.to_string())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Self::Message(text)
    }
}

impl From<Error> for Arg {
    fn from(err: Error) -> Self {
        Self::Error(err)
    }
}

impl From<&Error> for Arg {
    fn from(err: &Error) -> Self {
        Self::Error(err.clone())
    }
}

impl From<Str> for Arg {
    fn from(err: Str) -> Self {
        Self::Source(Arc::new(err))
    }
}

impl From<std::io::Error> for Arg {
    fn from(err: std::io::Error) -> Self {
        Self::Source(Arc::new(err))
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Arg {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match err.downcast::<Error>() {
            Ok(structured) => Self::Error(*structured),
            Err(other) => Self::Source(Arc::from(other)),
        }
    }
}
