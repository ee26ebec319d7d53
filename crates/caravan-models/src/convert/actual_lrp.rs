// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later

use caravan_protocol::models as proto;

use super::{ProtoConvert, option_from_proto, required_enum, vec_from_proto, vec_to_proto};
use crate::actual_lrp::{
    ActualLrp, ActualLrpGroup, ActualLrpInstanceKey, ActualLrpKey, ActualLrpNetInfo,
    ActualLrpState, PortMapping,
};
use crate::error::ModelError;
use crate::modification_tag::ModificationTag;

impl From<ActualLrpState> for proto::ActualLrpState {
    fn from(state: ActualLrpState) -> Self {
        match state {
            ActualLrpState::Unclaimed => proto::ActualLrpState::Unclaimed,
            ActualLrpState::Claimed => proto::ActualLrpState::Claimed,
            ActualLrpState::Running => proto::ActualLrpState::Running,
            ActualLrpState::Crashed => proto::ActualLrpState::Crashed,
        }
    }
}

impl TryFrom<i32> for ActualLrpState {
    type Error = ModelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match required_enum::<proto::ActualLrpState>(value, "state")? {
            proto::ActualLrpState::Unclaimed => Ok(ActualLrpState::Unclaimed),
            proto::ActualLrpState::Claimed => Ok(ActualLrpState::Claimed),
            proto::ActualLrpState::Running => Ok(ActualLrpState::Running),
            proto::ActualLrpState::Crashed => Ok(ActualLrpState::Crashed),
            proto::ActualLrpState::Invalid => Err(ModelError::invalid_record("state is not set")),
        }
    }
}

impl ProtoConvert for ActualLrpKey {
    type Proto = proto::ActualLrpKey;

    fn to_proto(&self) -> Self::Proto {
        proto::ActualLrpKey {
            process_guid: self.process_guid.clone(),
            index: self.index,
            domain: self.domain.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            process_guid: proto.process_guid,
            index: proto.index,
            domain: proto.domain,
        })
    }
}

impl ProtoConvert for ActualLrpInstanceKey {
    type Proto = proto::ActualLrpInstanceKey;

    fn to_proto(&self) -> Self::Proto {
        proto::ActualLrpInstanceKey {
            instance_guid: self.instance_guid.clone(),
            cell_id: self.cell_id.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            instance_guid: proto.instance_guid,
            cell_id: proto.cell_id,
        })
    }
}

impl ProtoConvert for PortMapping {
    type Proto = proto::PortMapping;

    fn to_proto(&self) -> Self::Proto {
        proto::PortMapping {
            container_port: self.container_port,
            host_port: self.host_port,
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            container_port: proto.container_port,
            host_port: proto.host_port,
        })
    }
}

impl ProtoConvert for ActualLrpNetInfo {
    type Proto = proto::ActualLrpNetInfo;

    fn to_proto(&self) -> Self::Proto {
        proto::ActualLrpNetInfo {
            address: self.address.clone(),
            ports: vec_to_proto(&self.ports),
            instance_address: self.instance_address.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            address: proto.address,
            ports: vec_from_proto(proto.ports)?,
            instance_address: proto.instance_address,
        })
    }
}

impl ProtoConvert for ActualLrp {
    type Proto = proto::ActualLrp;

    fn to_proto(&self) -> Self::Proto {
        proto::ActualLrp {
            actual_lrp_key: Some(self.key.to_proto()),
            actual_lrp_instance_key: Some(self.instance_key.to_proto()),
            actual_lrp_net_info: Some(self.net_info.to_proto()),
            crash_count: self.crash_count,
            crash_reason: self.crash_reason.clone(),
            state: proto::ActualLrpState::from(self.state) as i32,
            placement_error: self.placement_error.clone(),
            since: self.since,
            modification_tag: Some(self.modification_tag.to_proto()),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            key: option_from_proto(proto.actual_lrp_key)?.unwrap_or_default(),
            instance_key: option_from_proto(proto.actual_lrp_instance_key)?.unwrap_or_default(),
            net_info: option_from_proto(proto.actual_lrp_net_info)?.unwrap_or_default(),
            crash_count: proto.crash_count,
            crash_reason: proto.crash_reason,
            state: ActualLrpState::try_from(proto.state)?,
            placement_error: proto.placement_error,
            since: proto.since,
            modification_tag: option_from_proto::<ModificationTag>(proto.modification_tag)?
                .unwrap_or_default(),
        })
    }
}

impl ProtoConvert for ActualLrpGroup {
    type Proto = proto::ActualLrpGroup;

    fn to_proto(&self) -> Self::Proto {
        proto::ActualLrpGroup {
            instance: self.instance.as_ref().map(ProtoConvert::to_proto),
            evacuating: self.evacuating.as_ref().map(ProtoConvert::to_proto),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            instance: option_from_proto(proto.instance)?,
            evacuating: option_from_proto(proto.evacuating)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_travels_as_integer() {
        let lrp = ActualLrp {
            state: ActualLrpState::Crashed,
            ..Default::default()
        };
        assert_eq!(lrp.to_proto().state, 4);
    }

    #[test]
    fn test_unset_state_rejected() {
        let err = ActualLrp::from_proto(proto::ActualLrp::default()).unwrap_err();
        assert_eq!(err.to_string(), "invalid record: state is not set");
    }
}
