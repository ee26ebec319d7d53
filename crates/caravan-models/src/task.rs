// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! One-shot tasks.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::action::Action;
use crate::common::{
    EnvironmentVariable, MAX_CPU_WEIGHT, has_url_scheme, is_valid_guid, is_zero,
    validate_annotation, validate_environment,
};
use crate::config::ModelsConfig;
use crate::desired_lrp::validate_downloads;
use crate::error::ModelError;
use crate::image_layer::{CachedDependency, ImageLayer};
use crate::validation::{ValidationError, Validator};
use crate::version::{self, SchemaVersion, SetupParts};

// ============================================================================
// State
// ============================================================================

/// Task lifecycle.
///
/// ```text
/// PENDING -> RUNNING -> COMPLETED -> RESOLVING
///    |                     ^
///    +---------------------+
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    #[default]
    Pending,
    Running,
    Completed,
    Resolving,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Running => "RUNNING",
            TaskState::Completed => "COMPLETED",
            TaskState::Resolving => "RESOLVING",
        }
    }

    pub fn can_transition_to(&self, next: TaskState) -> bool {
        matches!(
            (self, next),
            (TaskState::Pending, TaskState::Running)
                | (TaskState::Pending, TaskState::Completed)
                | (TaskState::Running, TaskState::Completed)
                | (TaskState::Completed, TaskState::Resolving)
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Definition
// ============================================================================

/// What a task runs. Unlike a desired LRP there is a single action and no
/// setup or monitor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDefinition {
    #[serde(rename = "rootfs")]
    pub root_fs: String,
    #[serde(rename = "env", skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "is_zero")]
    pub disk_mb: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub memory_mb: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cpu_weight: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub privileged: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_guid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metrics_guid: String,
    /// File inside the container whose contents become the task result
    #[serde(skip_serializing_if = "String::is_empty")]
    pub result_file: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub completion_callback_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub annotation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cached_dependencies: Vec<CachedDependency>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub legacy_download_user: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub placement_tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_layers: Vec<ImageLayer>,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_pids: i32,
}

impl TaskDefinition {
    /// An equivalent definition understood by a `target` consumer. Layers and
    /// dependencies are prepended to the task action.
    pub fn version_down_to(&self, target: SchemaVersion) -> TaskDefinition {
        let mut definition = self.clone();
        if target >= SchemaVersion::LATEST {
            return definition;
        }

        version::downgrade_setup(
            SetupParts {
                setup: &mut definition.action,
                cached_dependencies: &mut definition.cached_dependencies,
                image_layers: &mut definition.image_layers,
                legacy_download_user: &self.legacy_download_user,
            },
            target,
        );

        if target < SchemaVersion::V1 {
            version::downgrade_timeouts(&mut definition.action);
        }

        definition
    }

    /// The definition as a current consumer reads a record written at
    /// `source`.
    pub fn version_up_from(&self, source: SchemaVersion) -> TaskDefinition {
        let mut definition = self.clone();
        if source < SchemaVersion::V1 {
            version::upgrade_timeouts(&mut definition.action);
        }
        definition
    }

    pub fn validate_with(&self, config: &ModelsConfig) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if !has_url_scheme(&self.root_fs) {
            errors = errors.invalid_field("rootfs");
        }
        errors = match &self.action {
            Some(action) => errors.nest("action", action.validate()),
            None => errors.invalid_field("action"),
        };
        if self.cpu_weight > MAX_CPU_WEIGHT {
            errors = errors.invalid_field("cpu_weight");
        }
        if self.memory_mb < 0 {
            errors = errors.invalid_field("memory_mb");
        }
        if self.disk_mb < 0 {
            errors = errors.invalid_field("disk_mb");
        }
        if self.max_pids < 0 {
            errors = errors.invalid_field("max_pids");
        }

        errors = validate_annotation(errors, &self.annotation, config.max_annotation_bytes);
        errors = validate_downloads(
            errors,
            &self.cached_dependencies,
            &self.image_layers,
            &self.legacy_download_user,
        );
        validate_environment(errors, &self.environment_variables).into_result()
    }
}

impl Validator for TaskDefinition {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(&ModelsConfig::default())
    }
}

// ============================================================================
// Task
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    #[serde(rename = "task_definition")]
    pub definition: TaskDefinition,
    pub task_guid: String,
    pub domain: String,
    /// Unix nanoseconds
    #[serde(skip_serializing_if = "is_zero")]
    pub created_at: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub updated_at: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_completed_at: i64,
    pub state: TaskState,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cell_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub result: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub failure_reason: String,
}

impl Task {
    /// A copy of this task moved to `next`, stamped with `now` (Unix nanoseconds).
    pub fn transition_to(&self, next: TaskState, now: i64) -> Result<Task, ModelError> {
        if !self.state.can_transition_to(next) {
            return Err(ModelError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }

        let mut task = self.clone();
        task.state = next;
        task.updated_at = now;
        if next == TaskState::Completed && task.first_completed_at == 0 {
            task.first_completed_at = now;
        }
        debug!(task_guid = %task.task_guid, from = %self.state, to = %next, "Task state changed");
        Ok(task)
    }

    pub fn version_down_to(&self, target: SchemaVersion) -> Task {
        Task {
            definition: self.definition.version_down_to(target),
            ..self.clone()
        }
    }

    pub fn version_up_from(&self, source: SchemaVersion) -> Task {
        Task {
            definition: self.definition.version_up_from(source),
            ..self.clone()
        }
    }

    pub fn validate_with(&self, config: &ModelsConfig) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.domain.is_empty() {
            errors = errors.invalid_field("domain");
        }
        if !is_valid_guid(&self.task_guid) {
            errors = errors.invalid_field("task_guid");
        }
        errors
            .merge(self.definition.validate_with(config))
            .into_result()
    }
}

impl Validator for Task {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(&ModelsConfig::default())
    }
}
