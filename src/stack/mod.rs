#[cfg(feature = "debug-stack")]
pub mod backtrace;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

#[cfg(feature = "debug-stack")]
pub use self::backtrace::BacktraceStack;

/// Upper bound on captured frames. Deeper stacks keep the most recent ones.
pub const MAX_FRAMES: usize = 64;

/// A resolved call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    /// Fully qualified function name.
    pub function: String,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: u32, function: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
        }
    }

    /// Placeholder for a counter the source could not symbolize.
    pub(crate) fn unresolved(pc: usize) -> Self {
        Self::new("?", 0, format!("{pc:#x}"))
    }
}

/// Capability for reading and symbolizing the current call stack.
///
/// `capture` returns program counters with the most recent call first, at most
/// [`MAX_FRAMES`] of them, and must leave out its own frames. `resolve` maps
/// one of those counters back to a source location.
pub trait StackSource: Send + Sync + fmt::Debug {
    fn capture(&self) -> Vec<usize>;

    fn resolve(&self, pc: usize) -> Option<Frame>;
}

/// Source for hosts that do not want stack traces. Errors built with it carry none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStack;

impl StackSource for NoStack {
    fn capture(&self) -> Vec<usize> {
        Vec::new()
    }

    fn resolve(&self, _pc: usize) -> Option<Frame> {
        None
    }
}

pub fn no_stack() -> Arc<dyn StackSource> {
    Arc::new(NoStack)
}

static INSTALLED: RwLock<Option<Arc<dyn StackSource>>> = parking_lot::const_rwlock(None);

fn default_source() -> Arc<dyn StackSource> {
    #[cfg(feature = "debug-stack")]
    {
        Arc::new(BacktraceStack)
    }
    #[cfg(not(feature = "debug-stack"))]
    {
        no_stack()
    }
}

/// Source used by [`crate::Error::from_args`] and the `e!` macro.
pub fn current() -> Arc<dyn StackSource> {
    INSTALLED.read().clone().unwrap_or_else(default_source)
}

/// Replaces the process-wide source and returns the one it displaced.
pub fn install(source: Arc<dyn StackSource>) -> Arc<dyn StackSource> {
    tracing::debug!(?source, "installing stack source");
    swap(Some(source)).unwrap_or_else(default_source)
}

/// Drops any installed source; [`current`] falls back to the build default.
pub fn reset() {
    swap(None);
}

#[cfg(test)]
pub(crate) fn installed() -> Option<Arc<dyn StackSource>> {
    INSTALLED.read().clone()
}

pub(crate) fn swap(source: Option<Arc<dyn StackSource>>) -> Option<Arc<dyn StackSource>> {
    std::mem::replace(&mut *INSTALLED.write(), source)
}

/// Number of frames two captures share, counted from the oldest end.
///
/// Both slices are most-recent-first, as returned by [`StackSource::capture`].
pub fn shared_ancestry(a: &[usize], b: &[usize]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Program counters captured at construction, plus the source that can resolve them.
#[derive(Clone, Default)]
pub(crate) struct Stack {
    pub(crate) pcs: Vec<usize>,
    pub(crate) source: Option<Arc<dyn StackSource>>,
    /// Oldest frames also present in the wrapping error's capture.
    pub(crate) shared: usize,
}

impl Stack {
    pub(crate) fn capture(source: &Arc<dyn StackSource>) -> Self {
        let mut pcs = source.capture();
        pcs.truncate(MAX_FRAMES);
        if pcs.is_empty() {
            return Self::default();
        }
        Self {
            pcs,
            source: Some(Arc::clone(source)),
            shared: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pcs.is_empty()
    }

    /// Resolved frames, oldest first.
    pub(crate) fn frames(&self) -> Vec<Frame> {
        let Some(source) = &self.source else {
            return Vec::new();
        };
        self.pcs
            .iter()
            .rev()
            .map(|pc| source.resolve(*pc).unwrap_or_else(|| Frame::unresolved(*pc)))
            .collect()
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("frames", &self.pcs.len())
            .field("shared", &self.shared)
            .finish()
    }
}
