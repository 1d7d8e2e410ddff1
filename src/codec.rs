//! JSON wire form of an error chain.
//!
//! Op, kind code and the cause chain travel; stacks are process-local and are
//! dropped. Leaf causes are sent as their message and come back as [`Str`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Cause, Error, Op};
use crate::kind::Kind;
use crate::leaf::Str;

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown error kind code: {code}")]
    UnknownKind { code: String },
}

#[derive(Serialize, Deserialize)]
struct WireError {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    op: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cause: Option<WireCause>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WireCause {
    Error(Box<WireError>),
    Message(String),
}

fn encode(err: &Error) -> WireError {
    WireError {
        op: err.op.as_str().to_string(),
        kind: err.kind.is_defined().then(|| err.kind.code().to_string()),
        cause: err.cause.as_ref().map(|cause| match cause {
            Cause::Error(prev) => WireCause::Error(Box::new(encode(prev))),
            Cause::Leaf(leaf) => WireCause::Message(leaf.to_string()),
        }),
    }
}

fn decode(wire: WireError) -> Result<Error, CodecError> {
    let kind = match wire.kind {
        Some(code) => code
            .parse::<Kind>()
            .map_err(|_| CodecError::UnknownKind { code })?,
        None => Kind::Undefined,
    };
    let cause = match wire.cause {
        Some(WireCause::Error(prev)) => Some(Cause::Error(Box::new(decode(*prev)?))),
        Some(WireCause::Message(text)) => Some(Cause::Leaf(Arc::new(Str::new(text)))),
        None => None,
    };
    let mut err = Error {
        op: Op::new(wire.op),
        kind,
        cause,
        ..Error::default()
    };
    err.normalize_kind();
    Ok(err)
}

impl Error {
    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&encode(self))?)
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let wire: WireError = serde_json::from_str(json)?;
        decode(wire)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(&encode(self))?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        let wire: WireError = serde_json::from_slice(bytes)?;
        decode(wire)
    }
}
