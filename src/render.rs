use std::fmt;

use crate::error::{Cause, Error};
use crate::stack::Frame;

/// Placed between stack frames and between a node and its structured cause.
pub const SEPARATOR: &str = ":\n\t";

/// Appends `sep` only when `buf` already has content.
pub fn push_separator(buf: &mut String, sep: &str) {
    if !buf.is_empty() {
        buf.push_str(sep);
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(0))
    }
}

impl Error {
    /// `skip_oldest` frames are left out because the wrapping node already
    /// printed them.
    fn render(&self, skip_oldest: usize) -> String {
        let mut buf = String::new();
        self.write_stack(&mut buf, skip_oldest);

        if !self.op.is_empty() {
            push_separator(&mut buf, ": ");
            buf.push_str(self.op.as_str());
        }
        if self.kind.is_defined() {
            push_separator(&mut buf, ": ");
            buf.push_str(self.kind.code());
        }
        match &self.cause {
            Some(Cause::Error(prev)) => {
                if !prev.is_zero() {
                    push_separator(&mut buf, SEPARATOR);
                    buf.push_str(&prev.render(prev.stack.shared));
                }
            }
            Some(Cause::Leaf(leaf)) => {
                push_separator(&mut buf, ": ");
                buf.push_str(&leaf.to_string());
            }
            None => {}
        }

        if buf.is_empty() {
            return "no error".to_string();
        }
        buf
    }

    /// Prints captured frames oldest first. Frames shared with the stack that
    /// is rendering right now are skipped up to the first difference, and a
    /// function repeated back to back is printed once.
    fn write_stack(&self, buf: &mut String, skip_oldest: usize) {
        let Some(source) = &self.stack.source else {
            return;
        };
        // Unresolved frames are named "" on both sides so that the process
        // entry frames, which rarely symbolize, still count as shared.
        let printing: Vec<String> = source
            .capture()
            .iter()
            .rev()
            .map(|pc| source.resolve(*pc).map(|f| f.function).unwrap_or_default())
            .collect();

        let mut prev = String::new();
        let mut diverged = false;
        for (i, pc) in self.stack.pcs.iter().rev().enumerate().skip(skip_oldest) {
            let resolved = source.resolve(*pc);
            if !diverged {
                let name = resolved.as_ref().map_or("", |f| f.function.as_str());
                if printing.get(i).is_some_and(|p| p == name) {
                    continue;
                }
                diverged = true;
            }
            let frame = resolved.unwrap_or_else(|| Frame::unresolved(*pc));
            if frame.function == prev {
                continue;
            }

            let trim = elided_prefix(&frame.function, &prev);
            push_separator(buf, SEPARATOR);
            buf.push_str(&format!("{}:{}: ", frame.file, frame.line));
            if trim > 0 {
                buf.push_str("...");
            }
            buf.push_str(&frame.function[trim..]);
            prev = frame.function;
        }
    }
}

/// Length of the leading path segments `name` shares with `prev`, including
/// the trailing delimiter.
fn elided_prefix(name: &str, prev: &str) -> usize {
    if prev.is_empty() {
        return 0;
    }
    let mut trim = 0;
    while let Some(j) = name[trim..].find(['.', '/', ':']) {
        if !prev.starts_with(&name[..trim + j]) {
            break;
        }
        trim += j + 1;
    }
    trim
}
