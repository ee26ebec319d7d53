// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Conversions between domain types and the protobuf wire messages.
//!
//! [`ProtoConvert`] is the only path into and out of the binary form. Going to
//! protobuf is total. Coming back fails with [`ModelError::InvalidRecord`] for
//! shapes the domain types reject: an `Action` with more than one variant set,
//! or an enumeration value this build does not know.

mod action;
mod actual_lrp;
mod desired_lrp;
mod task;

pub(crate) use action::{action_from_proto, action_to_proto};

use caravan_protocol::models as proto;

use crate::common::{EnvironmentVariable, ResourceLimits};
use crate::error::ModelError;
use crate::modification_tag::ModificationTag;

/// A domain type with a protobuf counterpart.
pub trait ProtoConvert: Sized {
    type Proto: prost::Message + Default;

    fn to_proto(&self) -> Self::Proto;

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError>;
}

/// Resolve a wire enumeration, rejecting zero and unknown values.
pub(crate) fn required_enum<E>(value: i32, field: &str) -> Result<E, ModelError>
where
    E: TryFrom<i32>,
{
    if value == 0 {
        return Err(ModelError::invalid_record(format!("{} is not set", field)));
    }
    E::try_from(value)
        .map_err(|_| ModelError::invalid_record(format!("unknown {} value {}", field, value)))
}

/// Like [`required_enum`], but zero means absent.
pub(crate) fn optional_enum<E>(value: i32, field: &str) -> Result<Option<E>, ModelError>
where
    E: TryFrom<i32>,
{
    if value == 0 {
        return Ok(None);
    }
    required_enum(value, field).map(Some)
}

impl ProtoConvert for EnvironmentVariable {
    type Proto = proto::EnvironmentVariable;

    fn to_proto(&self) -> Self::Proto {
        proto::EnvironmentVariable {
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            name: proto.name,
            value: proto.value,
        })
    }
}

impl ProtoConvert for ResourceLimits {
    type Proto = proto::ResourceLimits;

    fn to_proto(&self) -> Self::Proto {
        proto::ResourceLimits {
            nofile: self.nofile,
            nproc: self.nproc,
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            nofile: proto.nofile,
            nproc: proto.nproc,
        })
    }
}

impl ProtoConvert for ModificationTag {
    type Proto = proto::ModificationTag;

    fn to_proto(&self) -> Self::Proto {
        proto::ModificationTag {
            epoch: self.epoch.clone(),
            index: self.index,
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            epoch: proto.epoch,
            index: proto.index,
        })
    }
}

pub(crate) fn vec_to_proto<T: ProtoConvert>(items: &[T]) -> Vec<T::Proto> {
    items.iter().map(ProtoConvert::to_proto).collect()
}

pub(crate) fn vec_from_proto<T: ProtoConvert>(items: Vec<T::Proto>) -> Result<Vec<T>, ModelError> {
    items.into_iter().map(T::from_proto).collect()
}

pub(crate) fn option_from_proto<T: ProtoConvert>(
    item: Option<T::Proto>,
) -> Result<Option<T>, ModelError> {
    item.map(T::from_proto).transpose()
}
