// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Caravan Protocol - binary wire messages and envelope framing
//!
//! This crate provides the compact binary form of every caravan model:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    caravan-protocol                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Envelope: encoding byte + schema version byte + payload    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Serialization: Protobuf (prost) or JSON (caravan-models)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The messages in [`models`] mirror `proto/models.proto`. They are the
//! canonical intermediate shape: domain types in `caravan-models` convert to
//! and from them, and nothing else reads protobuf bytes directly.
//!
//! Enumerations travel as small integers. A value of `0` is always the
//! `Invalid` variant so that an absent field never decodes to a real state.
//!
//! # Usage
//!
//! ```ignore
//! use caravan_protocol::{Envelope, models};
//!
//! let tag = models::ModificationTag { epoch: "e".into(), index: 1 };
//! let bytes = Envelope::protobuf(3, &tag)?.encode();
//!
//! let envelope = Envelope::decode_from_bytes(bytes)?;
//! let decoded: models::ModificationTag = envelope.decode()?;
//! ```

pub mod envelope;

// Generated protobuf types for the model schema
pub mod models {
    include!("generated/caravan.models.rs");
}

pub use envelope::{Encoding, Envelope, EnvelopeError};
