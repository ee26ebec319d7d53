// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later

use caravan_protocol::models as proto;

use super::desired_lrp::{optional_action_from_proto, optional_action_to_proto};
use super::{ProtoConvert, option_from_proto, required_enum, vec_from_proto, vec_to_proto};
use crate::error::ModelError;
use crate::task::{Task, TaskDefinition, TaskState};

impl From<TaskState> for proto::TaskState {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Pending => proto::TaskState::Pending,
            TaskState::Running => proto::TaskState::Running,
            TaskState::Completed => proto::TaskState::Completed,
            TaskState::Resolving => proto::TaskState::Resolving,
        }
    }
}

impl TryFrom<i32> for TaskState {
    type Error = ModelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match required_enum::<proto::TaskState>(value, "state")? {
            proto::TaskState::Pending => Ok(TaskState::Pending),
            proto::TaskState::Running => Ok(TaskState::Running),
            proto::TaskState::Completed => Ok(TaskState::Completed),
            proto::TaskState::Resolving => Ok(TaskState::Resolving),
            proto::TaskState::Invalid => Err(ModelError::invalid_record("state is not set")),
        }
    }
}

impl ProtoConvert for TaskDefinition {
    type Proto = proto::TaskDefinition;

    fn to_proto(&self) -> Self::Proto {
        proto::TaskDefinition {
            root_fs: self.root_fs.clone(),
            environment_variables: vec_to_proto(&self.environment_variables),
            action: optional_action_to_proto(&self.action),
            disk_mb: self.disk_mb,
            memory_mb: self.memory_mb,
            cpu_weight: self.cpu_weight,
            privileged: self.privileged,
            log_source: self.log_source.clone(),
            log_guid: self.log_guid.clone(),
            metrics_guid: self.metrics_guid.clone(),
            result_file: self.result_file.clone(),
            completion_callback_url: self.completion_callback_url.clone(),
            annotation: self.annotation.clone(),
            cached_dependencies: vec_to_proto(&self.cached_dependencies),
            legacy_download_user: self.legacy_download_user.clone(),
            placement_tags: self.placement_tags.clone(),
            image_layers: vec_to_proto(&self.image_layers),
            max_pids: self.max_pids,
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            root_fs: proto.root_fs,
            environment_variables: vec_from_proto(proto.environment_variables)?,
            action: optional_action_from_proto(proto.action)?,
            disk_mb: proto.disk_mb,
            memory_mb: proto.memory_mb,
            cpu_weight: proto.cpu_weight,
            privileged: proto.privileged,
            log_source: proto.log_source,
            log_guid: proto.log_guid,
            metrics_guid: proto.metrics_guid,
            result_file: proto.result_file,
            completion_callback_url: proto.completion_callback_url,
            annotation: proto.annotation,
            cached_dependencies: vec_from_proto(proto.cached_dependencies)?,
            legacy_download_user: proto.legacy_download_user,
            placement_tags: proto.placement_tags,
            image_layers: vec_from_proto(proto.image_layers)?,
            max_pids: proto.max_pids,
        })
    }
}

impl ProtoConvert for Task {
    type Proto = proto::Task;

    fn to_proto(&self) -> Self::Proto {
        proto::Task {
            task_definition: Some(self.definition.to_proto()),
            task_guid: self.task_guid.clone(),
            domain: self.domain.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            first_completed_at: self.first_completed_at,
            state: proto::TaskState::from(self.state) as i32,
            cell_id: self.cell_id.clone(),
            result: self.result.clone(),
            failed: self.failed,
            failure_reason: self.failure_reason.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            definition: option_from_proto(proto.task_definition)?.unwrap_or_default(),
            task_guid: proto.task_guid,
            domain: proto.domain,
            created_at: proto.created_at,
            updated_at: proto.updated_at,
            first_completed_at: proto.first_completed_at,
            state: TaskState::try_from(proto.state)?,
            cell_id: proto.cell_id,
            result: proto.result,
            failed: proto.failed,
            failure_reason: proto.failure_reason,
        })
    }
}
