use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::stack::{self, Frame, StackSource};

/// Deterministic stack source: hands out pre-recorded captures in order and
/// resolves counters from a fixed table.
#[derive(Debug, Default)]
pub(crate) struct ScriptedStack {
    captures: Mutex<VecDeque<Vec<usize>>>,
    symbols: HashMap<usize, Frame>,
}

impl ScriptedStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a capture, most recent call first.
    pub(crate) fn push_capture(self, pcs: &[usize]) -> Self {
        self.captures.lock().push_back(pcs.to_vec());
        self
    }

    pub(crate) fn frame(mut self, pc: usize, file: &str, line: u32, function: &str) -> Self {
        self.symbols.insert(pc, Frame::new(file, line, function));
        self
    }
}

impl StackSource for ScriptedStack {
    fn capture(&self) -> Vec<usize> {
        self.captures.lock().pop_front().unwrap_or_default()
    }

    fn resolve(&self, pc: usize) -> Option<Frame> {
        self.symbols.get(&pc).cloned()
    }
}

static INSTALL_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Exclusive use of the process-wide stack source. Whatever was installed when
/// the guard was taken is put back on drop.
pub(crate) struct InstalledGuard {
    previous: Option<Arc<dyn StackSource>>,
    _lock: MutexGuard<'static, ()>,
}

pub(crate) fn lock_installed() -> InstalledGuard {
    let lock = INSTALL_LOCK.lock();
    InstalledGuard {
        previous: stack::installed(),
        _lock: lock,
    }
}

impl Drop for InstalledGuard {
    fn drop(&mut self) {
        stack::swap(self.previous.take());
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `work` under a plain-text subscriber and returns what it logged.
pub(crate) fn capture_logs<T>(work: impl FnOnce() -> T) -> (T, String) {
    let buf = SharedBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, work);
    let logs = String::from_utf8_lossy(&buf.0.lock()).into_owned();
    (out, logs)
}
