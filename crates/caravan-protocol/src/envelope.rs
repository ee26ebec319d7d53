// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Envelope format for stored and streamed model payloads.
//!
//! Every serialized model carries a two byte header so readers can tell how
//! the payload was encoded and which schema generation produced it:
//! - 1 byte: encoding
//! - 1 byte: schema version
//! - N bytes: payload (JSON text or protobuf)

use bytes::{Buf, BufMut, Bytes, BytesMut};
use prost::Message;
use thiserror::Error;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Envelope header size (1 byte encoding + 1 byte version)
pub const HEADER_SIZE: usize = 2;

/// Payload encodings understood by the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Encoding {
    /// Structured text form
    Json = 1,
    /// Compact binary tagged form
    Protobuf = 2,
}

impl TryFrom<u8> for Encoding {
    type Error = EnvelopeError;

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        match value {
            1 => Ok(Encoding::Json),
            2 => Ok(Encoding::Protobuf),
            _ => Err(EnvelopeError::InvalidEncoding(value)),
        }
    }
}

/// Errors that can occur during envelope encoding/decoding
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("payload too large: {0} bytes (max: {MAX_PAYLOAD_SIZE})")]
    PayloadTooLarge(usize),

    #[error("invalid encoding: {0}")]
    InvalidEncoding(u8),

    #[error("incomplete envelope header")]
    IncompleteHeader,

    #[error("expected {expected:?} payload, found {found:?}")]
    EncodingMismatch { expected: Encoding, found: Encoding },

    #[error("protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// A payload tagged with its encoding and schema version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub encoding: Encoding,
    pub version: u8,
    pub payload: Bytes,
}

impl Envelope {
    /// Wrap an already-serialized payload
    pub fn new(encoding: Encoding, version: u8, payload: Bytes) -> Result<Self, EnvelopeError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(EnvelopeError::PayloadTooLarge(payload.len()));
        }
        Ok(Self {
            encoding,
            version,
            payload,
        })
    }

    /// Create a protobuf envelope from a message
    pub fn protobuf<M: Message>(version: u8, msg: &M) -> Result<Self, EnvelopeError> {
        Self::new(Encoding::Protobuf, version, Bytes::from(msg.encode_to_vec()))
    }

    /// Create a JSON envelope from serialized text
    pub fn json(version: u8, text: Vec<u8>) -> Result<Self, EnvelopeError> {
        Self::new(Encoding::Json, version, Bytes::from(text))
    }

    /// Decode the payload as a protobuf message
    pub fn decode<M: Message + Default>(&self) -> Result<M, EnvelopeError> {
        if self.encoding != Encoding::Protobuf {
            return Err(EnvelopeError::EncodingMismatch {
                expected: Encoding::Protobuf,
                found: self.encoding,
            });
        }
        Ok(M::decode(self.payload.clone())?)
    }

    /// Encode the envelope to bytes for storage or transmission
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.payload.len());
        buf.put_u8(self.encoding as u8);
        buf.put_u8(self.version);
        buf.put(self.payload.clone());
        buf.freeze()
    }

    /// Decode an envelope from bytes
    pub fn decode_from_bytes(mut bytes: Bytes) -> Result<Self, EnvelopeError> {
        if bytes.len() < HEADER_SIZE {
            return Err(EnvelopeError::IncompleteHeader);
        }

        let encoding = Encoding::try_from(bytes.get_u8())?;
        let version = bytes.get_u8();

        if bytes.len() > MAX_PAYLOAD_SIZE {
            return Err(EnvelopeError::PayloadTooLarge(bytes.len()));
        }

        Ok(Self {
            encoding,
            version,
            payload: bytes,
        })
    }
}
