// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Marshalling entities into enveloped payloads.
//!
//! Both wire forms are available for every entity: JSON through the serde
//! derives and protobuf through [`ProtoConvert`]. The envelope header records
//! which one was used and the schema version of the payload, so stored
//! records can be read back without out-of-band knowledge.

use bytes::Bytes;
use caravan_protocol::{Encoding, Envelope};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::action::Action;
use crate::actual_lrp::{ActualLrp, ActualLrpGroup};
use crate::convert::ProtoConvert;
use crate::config::ModelsConfig;
use crate::desired_lrp::{DesiredLrp, DesiredLrpUpdate};
use crate::error::Result;
use crate::task::{Task, TaskDefinition};
use crate::version::SchemaVersion;

/// An entity that can be written to and read from an envelope.
pub trait WireEntity: ProtoConvert + Serialize + DeserializeOwned + Clone {
    /// The value as an older consumer must see it. Entities without
    /// version-dependent fields are returned unchanged.
    fn downgraded(&self, _target: SchemaVersion) -> Self {
        self.clone()
    }

    /// The value as read from a record written at `source`.
    fn upgraded(self, _source: SchemaVersion) -> Self {
        self
    }
}

impl WireEntity for ActualLrp {}
impl WireEntity for ActualLrpGroup {}
impl WireEntity for DesiredLrpUpdate {}

impl WireEntity for Action {
    fn upgraded(self, source: SchemaVersion) -> Self {
        if source < SchemaVersion::V1 {
            self.with_timeout_ms_from_deprecated_ns()
        } else {
            self
        }
    }
}

impl WireEntity for DesiredLrp {
    fn downgraded(&self, target: SchemaVersion) -> Self {
        self.version_down_to(target)
    }

    fn upgraded(self, source: SchemaVersion) -> Self {
        self.version_up_from(source)
    }
}

impl WireEntity for TaskDefinition {
    fn downgraded(&self, target: SchemaVersion) -> Self {
        self.version_down_to(target)
    }

    fn upgraded(self, source: SchemaVersion) -> Self {
        self.version_up_from(source)
    }
}

impl WireEntity for Task {
    fn downgraded(&self, target: SchemaVersion) -> Self {
        self.version_down_to(target)
    }

    fn upgraded(self, source: SchemaVersion) -> Self {
        self.version_up_from(source)
    }
}

/// Encode `entity` at the latest schema version.
pub fn encode<E: WireEntity>(entity: &E, encoding: Encoding) -> Result<Bytes> {
    envelope(entity, encoding, SchemaVersion::LATEST)
}

/// Encode `entity` for a consumer at `target`, downgrading it first.
pub fn encode_for<E: WireEntity>(
    entity: &E,
    encoding: Encoding,
    target: SchemaVersion,
) -> Result<Bytes> {
    envelope(&entity.downgraded(target), encoding, target)
}

/// Encode `entity` at the schema version `config` targets.
pub fn encode_configured<E: WireEntity>(
    entity: &E,
    encoding: Encoding,
    config: &ModelsConfig,
) -> Result<Bytes> {
    encode_for(entity, encoding, config.target_schema_version)
}

fn envelope<E: WireEntity>(
    entity: &E,
    encoding: Encoding,
    version: SchemaVersion,
) -> Result<Bytes> {
    let envelope = match encoding {
        Encoding::Json => Envelope::json(version.as_u8(), serde_json::to_vec(entity)?)?,
        Encoding::Protobuf => Envelope::protobuf(version.as_u8(), &entity.to_proto())?,
    };
    trace!(
        encoding = ?encoding,
        version = %version,
        size = envelope.payload.len(),
        "Encoded entity"
    );
    Ok(envelope.encode())
}

/// Decode an enveloped entity in whichever encoding it was written.
pub fn decode<E: WireEntity>(bytes: Bytes) -> Result<E> {
    decode_with_version(bytes).map(|(entity, _)| entity)
}

/// Decode an enveloped entity along with the schema version it was written at.
///
/// Records written before V1 have their millisecond timeouts filled in from
/// the legacy nanosecond and whole-second fields.
pub fn decode_with_version<E: WireEntity>(bytes: Bytes) -> Result<(E, SchemaVersion)> {
    let envelope = Envelope::decode_from_bytes(bytes)?;
    let version = SchemaVersion::try_from(envelope.version)?;
    let entity: E = match envelope.encoding {
        Encoding::Json => serde_json::from_slice(&envelope.payload)?,
        Encoding::Protobuf => E::from_proto(envelope.decode::<E::Proto>()?)?,
    };
    Ok((entity.upgraded(version), version))
}
