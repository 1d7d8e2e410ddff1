use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::arg::Arg;
use crate::kind::Kind;
use crate::leaf::Str;
use crate::stack::{self, Frame, Stack, StackSource, shared_ancestry};

/// Label of the logical action that failed, e.g. `"user.save"`. Empty means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Op(Cow<'static, str>);

impl Op {
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shorthand for [`Op::new`].
pub fn op(label: impl Into<Cow<'static, str>>) -> Op {
    Op::new(label)
}

/// What a node wraps.
#[derive(Debug, Clone)]
pub enum Cause {
    /// Another structured node; the chain continues.
    Error(Box<Error>),
    /// An opaque error; the chain ends here.
    Leaf(Arc<dyn std::error::Error + Send + Sync>),
}

impl Cause {
    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Self::Error(err) => Some(&**err),
            Self::Leaf(_) => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Error(err) => err.to_string(),
            Self::Leaf(leaf) => leaf.to_string(),
        }
    }
}

/// A node in a causal chain of failures.
///
/// Build one with the [`e!`](crate::e) macro or [`Error::from_args`]. Each
/// node carries an optional operation label, a [`Kind`], an optional cause and
/// the call stack captured when it was built.
#[derive(Debug, Clone, Default)]
pub struct Error {
    pub(crate) op: Op,
    pub(crate) kind: Kind,
    pub(crate) cause: Option<Cause>,
    pub(crate) stack: Stack,
}

impl Error {
    /// Builds a node from classified arguments, capturing the stack with the
    /// process-wide source (see [`stack::current`]).
    ///
    /// # Panics
    ///
    /// Panics when `args` is empty.
    #[track_caller]
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
    {
        Self::from_args_in(stack::current(), args)
    }

    /// Same as [`Error::from_args`] with an explicit stack source.
    ///
    /// When several arguments fill the same slot the last one wins. A prior
    /// [`Error`] is owned by the new node, and its kind is normalized against
    /// the new one: a repeated kind is cleared from the cause, and an unset
    /// kind is lifted from the cause onto the new node.
    ///
    /// An [`Arg::Unsupported`] argument discards the others and yields a node
    /// with no op, no kind and no stack whose only content is a leaf naming
    /// the bad argument. That node is still structured, so [`Error::matches`]
    /// and [`crate::is`] see it as an `Error` with a message cause.
    ///
    /// # Panics
    ///
    /// Panics when `args` is empty.
    #[track_caller]
    pub fn from_args_in<I>(source: Arc<dyn StackSource>, args: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
    {
        let mut args = args.into_iter().peekable();
        if args.peek().is_none() {
            no_arguments();
        }

        let mut err = Self::default();
        for arg in args {
            match arg {
                Arg::Op(op) => err.op = op,
                Arg::Kind(kind) => err.kind = kind,
                Arg::Message(text) => err.cause = Some(Cause::Leaf(Arc::new(Str::new(text)))),
                Arg::Error(prev) => err.cause = Some(Cause::Error(Box::new(prev))),
                Arg::Source(leaf) => err.cause = Some(Cause::Leaf(leaf)),
                Arg::Unsupported { type_name, value } => {
                    return Self::unsupported(type_name, &value);
                }
            }
        }

        err.stack = Stack::capture(&source);
        err.reconcile_stack();
        err.normalize_kind();
        err
    }

    #[track_caller]
    fn unsupported(type_name: &str, value: &str) -> Self {
        let caller = Location::caller();
        tracing::warn!(
            file = caller.file(),
            line = caller.line(),
            type_name,
            value,
            "bad error construction call"
        );
        Self {
            cause: Some(Cause::Leaf(Arc::new(crate::errorf!(
                "unknown type {type_name}, value {value} in error call"
            )))),
            ..Self::default()
        }
    }

    fn reconcile_stack(&mut self) {
        if let Some(Cause::Error(prev)) = &mut self.cause {
            prev.stack.shared = shared_ancestry(&self.stack.pcs, &prev.stack.pcs);
        }
    }

    pub(crate) fn normalize_kind(&mut self) {
        let Some(Cause::Error(prev)) = &mut self.cause else {
            return;
        };
        if prev.kind == self.kind {
            prev.kind = Kind::Undefined;
        } else if self.kind == Kind::Undefined {
            self.kind = prev.kind;
            prev.kind = Kind::Undefined;
        }
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    /// Kind recorded on this node only. See [`Error::resolved_kind`] for the
    /// kind found by walking the chain.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// First defined kind on this node or down its chain of structured causes.
    pub fn resolved_kind(&self) -> Kind {
        let mut node = self;
        loop {
            if node.kind.is_defined() {
                return node.kind;
            }
            match &node.cause {
                Some(Cause::Error(prev)) => node = &**prev,
                _ => return Kind::Undefined,
            }
        }
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    pub fn cause_error(&self) -> Option<&Error> {
        self.cause.as_ref().and_then(Cause::as_error)
    }

    /// Captured call sites, oldest first. Empty when the stack source
    /// captured nothing.
    pub fn frames(&self) -> Vec<Frame> {
        self.stack.frames()
    }

    /// Oldest frames this node shares with the error that wraps it.
    pub fn shared_frames(&self) -> usize {
        self.stack.shared
    }

    /// Iterates this node and its structured causes, outermost first.
    pub fn chain(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |node| node.cause_error())
    }

    /// True when the node has no op, no kind and no cause. Such a node adds
    /// nothing to its parent's rendering.
    pub fn is_zero(&self) -> bool {
        self.op.is_empty() && self.kind == Kind::Undefined && self.cause.is_none()
    }
}

#[expect(
    clippy::panic,
    reason = "an argument-less construction is a programming error"
)]
#[track_caller]
fn no_arguments() -> ! {
    panic!("call to error constructor with no arguments")
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = match self.cause.as_ref()? {
            Cause::Error(prev) => &**prev,
            Cause::Leaf(leaf) => &**leaf,
        };
        Some(source)
    }
}
