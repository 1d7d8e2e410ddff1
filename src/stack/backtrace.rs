use std::ffi::c_void;

use super::{Frame, MAX_FRAMES, StackSource};

/// Frames walked before the capture path is stripped off the top.
const WALK_LIMIT: usize = MAX_FRAMES + 16;

/// Symbols between a constructor call and the stack walker. Leading frames
/// made only of these are dropped, so a trail ends at the code that built the
/// error.
const CAPTURE_PATH: &[&str] = &[
    "backtrace::",
    "chainerr::stack::backtrace::BacktraceStack",
    "<chainerr::stack::backtrace::BacktraceStack as ",
    "chainerr::stack::Stack::capture",
    "chainerr::error::Error::from_args",
];

/// Stack source backed by the `backtrace` crate.
///
/// Symbolication goes through the crate's global lock, so concurrent renders
/// are safe.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceStack;

impl StackSource for BacktraceStack {
    #[inline(never)]
    fn capture(&self) -> Vec<usize> {
        let mut pcs = Vec::with_capacity(WALK_LIMIT);
        ::backtrace::trace(|frame| {
            pcs.push(frame.ip() as usize);
            pcs.len() < WALK_LIMIT
        });
        let internal = pcs.iter().take_while(|pc| on_capture_path(**pc)).count();
        pcs.drain(..internal);
        pcs.truncate(MAX_FRAMES);
        pcs
    }

    fn resolve(&self, pc: usize) -> Option<Frame> {
        let mut resolved = None;
        ::backtrace::resolve(pc as *mut c_void, |symbol| {
            if resolved.is_some() {
                return;
            }
            let function = symbol
                .name()
                .map(|name| format!("{name:#}"))
                .unwrap_or_default();
            let file = symbol
                .filename()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "?".to_string());
            resolved = Some(Frame {
                file,
                line: symbol.lineno().unwrap_or(0),
                function,
            });
        });
        resolved
    }
}

/// True when every symbol at `pc`, inlined ones included, is part of the
/// capture path. A frame with a caller inlined into it is kept.
fn on_capture_path(pc: usize) -> bool {
    let mut any = false;
    let mut all = true;
    ::backtrace::resolve(pc as *mut c_void, |symbol| {
        any = true;
        let name = symbol
            .name()
            .map(|name| format!("{name:#}"))
            .unwrap_or_default();
        all &= CAPTURE_PATH.iter().any(|prefix| name.starts_with(prefix));
    });
    any && all
}
