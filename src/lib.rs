#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

mod macros;

pub mod arg;
pub mod codec;
pub mod error;
pub mod kind;
pub mod leaf;
pub mod matching;
pub mod recover;
pub mod render;
pub mod stack;

#[cfg(test)]
mod test_support;

pub use arg::Arg;
pub use codec::CodecError;
pub use error::{Cause, Error, Op, op};
pub use kind::Kind;
pub use leaf::{Str, str};
pub use matching::{is, matches};
pub use recover::safely_do;
pub use render::{SEPARATOR, push_separator};
pub use stack::{Frame, MAX_FRAMES, NoStack, StackSource};
