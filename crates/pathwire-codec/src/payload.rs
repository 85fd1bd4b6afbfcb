//! Path-service message envelope.
//!
//! A payload pairs a correlation id with exactly one request or reply body.
//! On the wire it is the CBOR map `{id, which, body}`, where `which` is the
//! numeric discriminant selecting how `body` is read. Discriminant `0` is the
//! unset marker and, like any value past the last kind, is rejected on decode.

use std::fmt;
use std::io::Cursor;

use ciborium::Value;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, DecodeError};
use crate::info::{
    AsInfoReply, AsInfoReq, IfInfoReply, IfInfoRequest, ServiceInfoReply, ServiceInfoRequest,
};
use crate::path::{PathReply, PathReq};
use crate::revocation::{RevNotification, RevReply};

/// Wire discriminant of a payload body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Which {
    PathReq = 1,
    PathReply = 2,
    AsInfoReq = 3,
    AsInfoReply = 4,
    RevNotification = 5,
    RevReply = 6,
    IfInfoRequest = 7,
    IfInfoReply = 8,
    ServiceInfoRequest = 9,
    ServiceInfoReply = 10,
}

impl Which {
    pub const ALL: [Which; 10] = [
        Which::PathReq,
        Which::PathReply,
        Which::AsInfoReq,
        Which::AsInfoReply,
        Which::RevNotification,
        Which::RevReply,
        Which::IfInfoRequest,
        Which::IfInfoReply,
        Which::ServiceInfoRequest,
        Which::ServiceInfoReply,
    ];

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn name(self) -> &'static str {
        match self {
            Which::PathReq => "pathReq",
            Which::PathReply => "pathReply",
            Which::AsInfoReq => "asInfoReq",
            Which::AsInfoReply => "asInfoReply",
            Which::RevNotification => "revNotification",
            Which::RevReply => "revReply",
            Which::IfInfoRequest => "ifInfoRequest",
            Which::IfInfoReply => "ifInfoReply",
            Which::ServiceInfoRequest => "serviceInfoRequest",
            Which::ServiceInfoReply => "serviceInfoReply",
        }
    }
}

impl TryFrom<u16> for Which {
    type Error = DecodeError;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Which::ALL
            .into_iter()
            .find(|which| which.as_u16() == raw)
            .ok_or(DecodeError::UnknownDiscriminant(raw))
    }
}

impl fmt::Display for Which {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The single active request or reply carried by a [`Payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadBody {
    PathReq(PathReq),
    PathReply(PathReply),
    AsInfoReq(AsInfoReq),
    AsInfoReply(AsInfoReply),
    RevNotification(RevNotification),
    RevReply(RevReply),
    IfInfoRequest(IfInfoRequest),
    IfInfoReply(IfInfoReply),
    ServiceInfoRequest(ServiceInfoRequest),
    ServiceInfoReply(ServiceInfoReply),
}

/// Runs `$action` with `$inner` bound to the active body.
macro_rules! with_body {
    ($body:expr, $inner:ident => $action:expr) => {
        match $body {
            PayloadBody::PathReq($inner) => $action,
            PayloadBody::PathReply($inner) => $action,
            PayloadBody::AsInfoReq($inner) => $action,
            PayloadBody::AsInfoReply($inner) => $action,
            PayloadBody::RevNotification($inner) => $action,
            PayloadBody::RevReply($inner) => $action,
            PayloadBody::IfInfoRequest($inner) => $action,
            PayloadBody::IfInfoReply($inner) => $action,
            PayloadBody::ServiceInfoRequest($inner) => $action,
            PayloadBody::ServiceInfoReply($inner) => $action,
        }
    };
}

macro_rules! impl_body_from {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for PayloadBody {
                fn from(body: $kind) -> Self {
                    PayloadBody::$kind(body)
                }
            }
        )*
    };
}

impl_body_from!(
    PathReq,
    PathReply,
    AsInfoReq,
    AsInfoReply,
    RevNotification,
    RevReply,
    IfInfoRequest,
    IfInfoReply,
    ServiceInfoRequest,
    ServiceInfoReply,
);

impl PayloadBody {
    pub fn which(&self) -> Which {
        match self {
            PayloadBody::PathReq(_) => Which::PathReq,
            PayloadBody::PathReply(_) => Which::PathReply,
            PayloadBody::AsInfoReq(_) => Which::AsInfoReq,
            PayloadBody::AsInfoReply(_) => Which::AsInfoReply,
            PayloadBody::RevNotification(_) => Which::RevNotification,
            PayloadBody::RevReply(_) => Which::RevReply,
            PayloadBody::IfInfoRequest(_) => Which::IfInfoRequest,
            PayloadBody::IfInfoReply(_) => Which::IfInfoReply,
            PayloadBody::ServiceInfoRequest(_) => Which::ServiceInfoRequest,
            PayloadBody::ServiceInfoReply(_) => Which::ServiceInfoReply,
        }
    }

    fn decode(which: Which, body: &Value) -> Result<Self, DecodeError> {
        Ok(match which {
            Which::PathReq => PayloadBody::PathReq(body_as(body)?),
            Which::PathReply => PayloadBody::PathReply(body_as(body)?),
            Which::AsInfoReq => PayloadBody::AsInfoReq(body_as(body)?),
            Which::AsInfoReply => PayloadBody::AsInfoReply(body_as(body)?),
            Which::RevNotification => PayloadBody::RevNotification(body_as(body)?),
            Which::RevReply => PayloadBody::RevReply(body_as(body)?),
            Which::IfInfoRequest => PayloadBody::IfInfoRequest(body_as(body)?),
            Which::IfInfoReply => PayloadBody::IfInfoReply(body_as(body)?),
            Which::ServiceInfoRequest => PayloadBody::ServiceInfoRequest(body_as(body)?),
            Which::ServiceInfoReply => PayloadBody::ServiceInfoReply(body_as(body)?),
        })
    }
}

/// Correlation id plus one typed request or reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub id: u64,
    pub body: PayloadBody,
}

impl Payload {
    pub fn new(id: u64, body: impl Into<PayloadBody>) -> Self {
        Self {
            id,
            body: body.into(),
        }
    }

    /// Builds a reply correlated with `request`.
    pub fn reply_to(request: &Payload, body: impl Into<PayloadBody>) -> Self {
        Self::new(request.id, body)
    }

    pub fn which(&self) -> Which {
        self.body.which()
    }

    /// Human-readable rendering for logs and diagnostics.
    pub fn describe(&self) -> String {
        with_body!(&self.body, inner => format!("Sciond: Id: {} Union: {:?}", self.id, inner))
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[derive(Serialize)]
struct FrameOut<'a, T> {
    id: u64,
    which: u16,
    body: &'a T,
}

#[derive(Deserialize)]
struct FrameIn {
    id: u64,
    which: u16,
    body: Value,
}

fn body_as<T: DeserializeOwned>(body: &Value) -> Result<T, DecodeError> {
    body.deserialized()
        .map_err(|e| DecodeError::Malformed(e.to_string()))
}

fn write_frame<T: Serialize>(id: u64, which: Which, body: &T) -> Result<Vec<u8>, CodecError> {
    let frame = FrameOut {
        id,
        which: which.as_u16(),
        body,
    };
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&frame, &mut bytes)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(bytes)
}

fn read_frame(bytes: &[u8]) -> Result<FrameIn, DecodeError> {
    let mut cursor = Cursor::new(bytes);
    let frame: FrameIn = ciborium::de::from_reader(&mut cursor)?;
    if cursor.position() as usize != bytes.len() {
        return Err(DecodeError::Malformed(
            "trailing bytes after payload".to_string(),
        ));
    }
    Ok(frame)
}

/// Encodes a payload as CBOR.
pub fn encode_payload(payload: &Payload) -> Result<Vec<u8>, CodecError> {
    let which = payload.which();
    with_body!(&payload.body, inner => write_frame(payload.id, which, inner))
}

/// Decodes a complete CBOR payload.
///
/// Unknown discriminants fail with [`DecodeError::UnknownDiscriminant`]
/// rather than selecting a default body.
pub fn decode_payload(bytes: &[u8]) -> Result<Payload, DecodeError> {
    let decoded = read_frame(bytes).and_then(|frame| {
        let which = Which::try_from(frame.which)?;
        let body = PayloadBody::decode(which, &frame.body)?;
        Ok(Payload { id: frame.id, body })
    });
    if let Err(err) = &decoded {
        tracing::debug!(error = %err, len = bytes.len(), "payload decode failed");
    }
    decoded
}

/// Renders raw payload bytes for diagnostics, embedding any decode error
/// in the text instead of failing.
pub fn describe_raw(bytes: &[u8]) -> String {
    let frame = match read_frame(bytes) {
        Ok(frame) => frame,
        Err(err) => return format!("Sciond: {err}"),
    };
    let body = Which::try_from(frame.which)
        .and_then(|which| PayloadBody::decode(which, &frame.body));
    match body {
        Ok(body) => Payload { id: frame.id, body }.describe(),
        Err(err) => format!("Sciond: Id: {} Union: {err}", frame.id),
    }
}
