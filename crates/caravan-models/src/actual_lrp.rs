// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Running instances of a desired LRP and their lifecycle.
//!
//! ```text
//!  UNCLAIMED --claim--> CLAIMED --start--> RUNNING
//!      ^                   |                  |
//!      |                   +------crash-------+--> CRASHED
//!      +----------------(restart, external)-------------+
//! ```
//!
//! The state decides which of the instance key, net info and placement error
//! may be populated; [`ActualLrp::validate`](Validator::validate) enforces it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::common::is_zero;
use crate::error::ModelError;
use crate::modification_tag::ModificationTag;
use crate::restart::RestartPolicy;
use crate::validation::{FieldViolation, ValidationError, Validator};

// ============================================================================
// Keys
// ============================================================================

/// Identifies an instance slot of a desired LRP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualLrpKey {
    pub process_guid: String,
    pub index: i32,
    pub domain: String,
}

impl ActualLrpKey {
    pub fn new(process_guid: impl Into<String>, index: i32, domain: impl Into<String>) -> Self {
        Self {
            process_guid: process_guid.into(),
            index,
            domain: domain.into(),
        }
    }
}

impl Validator for ActualLrpKey {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.process_guid.is_empty() {
            errors = errors.invalid_field("process_guid");
        }
        if self.index < 0 {
            errors = errors.invalid_field("index");
        }
        if self.domain.is_empty() {
            errors = errors.invalid_field("domain");
        }
        errors.into_result()
    }
}

/// Identifies the concrete container occupying a slot, and its cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualLrpInstanceKey {
    pub instance_guid: String,
    pub cell_id: String,
}

impl ActualLrpInstanceKey {
    pub fn new(instance_guid: impl Into<String>, cell_id: impl Into<String>) -> Self {
        Self {
            instance_guid: instance_guid.into(),
            cell_id: cell_id.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instance_guid.is_empty() && self.cell_id.is_empty()
    }
}

impl Validator for ActualLrpInstanceKey {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.instance_guid.is_empty() {
            errors = errors.invalid_field("instance_guid");
        }
        if self.cell_id.is_empty() {
            errors = errors.invalid_field("cell_id");
        }
        errors.into_result()
    }
}

// ============================================================================
// Net Info
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PortMapping {
    pub container_port: u32,
    pub host_port: u32,
}

impl PortMapping {
    pub fn new(container_port: u32, host_port: u32) -> Self {
        Self {
            container_port,
            host_port,
        }
    }
}

/// Where a running instance can be reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualLrpNetInfo {
    pub address: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortMapping>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub instance_address: String,
}

impl ActualLrpNetInfo {
    pub fn new(address: impl Into<String>, ports: Vec<PortMapping>) -> Self {
        Self {
            address: address.into(),
            ports,
            instance_address: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.address.is_empty() && self.ports.is_empty() && self.instance_address.is_empty()
    }
}

impl Validator for ActualLrpNetInfo {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.address.is_empty() {
            return ValidationError::new().invalid_field("address").into_result();
        }
        Ok(())
    }
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActualLrpState {
    #[default]
    Unclaimed,
    Claimed,
    Running,
    Crashed,
}

impl ActualLrpState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActualLrpState::Unclaimed => "UNCLAIMED",
            ActualLrpState::Claimed => "CLAIMED",
            ActualLrpState::Running => "RUNNING",
            ActualLrpState::Crashed => "CRASHED",
        }
    }

    fn is_claimed_or_running(self) -> bool {
        matches!(self, ActualLrpState::Claimed | ActualLrpState::Running)
    }
}

impl fmt::Display for ActualLrpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Actual LRP
// ============================================================================

/// One instance of a long-running process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualLrp {
    #[serde(rename = "actual_lrp_key")]
    pub key: ActualLrpKey,
    #[serde(rename = "actual_lrp_instance_key")]
    pub instance_key: ActualLrpInstanceKey,
    #[serde(rename = "actual_lrp_net_info")]
    pub net_info: ActualLrpNetInfo,
    #[serde(skip_serializing_if = "is_zero")]
    pub crash_count: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub crash_reason: String,
    pub state: ActualLrpState,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub placement_error: String,
    /// Unix nanoseconds at which the record entered its state
    pub since: i64,
    pub modification_tag: ModificationTag,
}

impl ActualLrp {
    /// The time `since` refers to, when representable.
    pub fn since_time(&self) -> Option<DateTime<Utc>> {
        (self.since != 0).then(|| DateTime::from_timestamp_nanos(self.since))
    }

    /// Whether moving to `new_state` with the given keys is permitted.
    ///
    /// A claimed instance may always start running, whoever reports it. Between
    /// claimed and running otherwise the owning instance must not change.
    pub fn allows_transition_to(
        &self,
        key: &ActualLrpKey,
        instance_key: &ActualLrpInstanceKey,
        new_state: ActualLrpState,
    ) -> bool {
        if &self.key != key {
            return false;
        }

        if self.state == ActualLrpState::Claimed && new_state == ActualLrpState::Running {
            return true;
        }

        if self.state.is_claimed_or_running()
            && new_state.is_claimed_or_running()
            && &self.instance_key != instance_key
        {
            return false;
        }

        true
    }

    /// Whether a crashed instance should be restarted now. Always false for
    /// any other state.
    pub fn should_restart_crash(&self, now: DateTime<Utc>, policy: &dyn RestartPolicy) -> bool {
        if self.state != ActualLrpState::Crashed {
            return false;
        }
        let now = now.timestamp_nanos_opt().unwrap_or(i64::MAX);
        policy.should_restart(now, self.since, self.crash_count)
    }

    fn validate_state(&self, errors: ValidationError) -> ValidationError {
        let state = self.state;
        let must_be_empty = |errors: ValidationError, field: &str, populated: bool| {
            if populated {
                errors.append(FieldViolation::constraint(
                    field,
                    format!("cannot be set when state is {}", state),
                ))
            } else {
                errors
            }
        };

        let instance_key_set = !self.instance_key.is_empty();
        let net_info_set = !self.net_info.is_empty();
        let placement_error_set = !self.placement_error.is_empty();

        match state {
            ActualLrpState::Unclaimed => {
                let errors = must_be_empty(errors, "instance_key", instance_key_set);
                must_be_empty(errors, "net_info", net_info_set)
            }
            ActualLrpState::Claimed => {
                let errors = errors.nest("instance_key", self.instance_key.validate());
                let errors = must_be_empty(errors, "net_info", net_info_set);
                must_be_empty(errors, "placement_error", placement_error_set)
            }
            ActualLrpState::Running => {
                let errors = errors
                    .nest("instance_key", self.instance_key.validate())
                    .nest("net_info", self.net_info.validate());
                must_be_empty(errors, "placement_error", placement_error_set)
            }
            ActualLrpState::Crashed => {
                let errors = must_be_empty(errors, "instance_key", instance_key_set);
                let errors = must_be_empty(errors, "net_info", net_info_set);
                must_be_empty(errors, "placement_error", placement_error_set)
            }
        }
    }
}

impl Validator for ActualLrp {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new().nest("actual_lrp_key", self.key.validate());
        if self.since == 0 {
            errors = errors.invalid_field("since");
        }
        self.validate_state(errors).into_result()
    }
}

// ============================================================================
// Group
// ============================================================================

/// The records occupying one slot: the regular instance and, while its cell is
/// being drained, an evacuating copy on the old cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualLrpGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<ActualLrp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evacuating: Option<ActualLrp>,
}

impl ActualLrpGroup {
    /// The authoritative record of the group, and whether it is the evacuating one.
    ///
    /// When both records exist the instance wins only once it is running or
    /// has crashed; until then the evacuating copy is still serving.
    pub fn resolve(&self) -> Result<(&ActualLrp, bool), ModelError> {
        match (&self.instance, &self.evacuating) {
            (None, None) => Err(ModelError::ActualLrpGroupInvalid),
            (Some(instance), None) => Ok((instance, false)),
            (None, Some(evacuating)) => {
                trace!(
                    process_guid = %evacuating.key.process_guid,
                    index = evacuating.key.index,
                    "Resolved group to lone evacuating record"
                );
                Ok((evacuating, true))
            }
            (Some(instance), Some(evacuating)) => {
                if matches!(
                    instance.state,
                    ActualLrpState::Running | ActualLrpState::Crashed
                ) {
                    Ok((instance, false))
                } else {
                    debug!(
                        process_guid = %evacuating.key.process_guid,
                        index = evacuating.key.index,
                        instance_state = %instance.state,
                        "Evacuating record preferred over instance"
                    );
                    Ok((evacuating, true))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: ActualLrpState) -> ActualLrp {
        let mut lrp = ActualLrp {
            key: ActualLrpKey::new("pg", 0, "domain"),
            state,
            since: 1138,
            ..Default::default()
        };
        if state.is_claimed_or_running() {
            lrp.instance_key = ActualLrpInstanceKey::new("ig", "cell");
        }
        if state == ActualLrpState::Running {
            lrp.net_info = ActualLrpNetInfo::new("1.2.3.4", vec![PortMapping::new(8080, 61000)]);
        }
        lrp
    }

    #[test]
    fn test_state_text_form() {
        assert_eq!(
            serde_json::to_string(&ActualLrpState::Running).unwrap(),
            "\"RUNNING\""
        );
        assert_eq!(ActualLrpState::Crashed.to_string(), "CRASHED");
    }

    #[test]
    fn test_valid_records_per_state() {
        for state in [
            ActualLrpState::Unclaimed,
            ActualLrpState::Claimed,
            ActualLrpState::Running,
            ActualLrpState::Crashed,
        ] {
            assert!(record(state).validate().is_ok(), "state {}", state);
        }
    }

    #[test]
    fn test_since_required() {
        let mut lrp = record(ActualLrpState::Unclaimed);
        lrp.since = 0;
        assert!(lrp.validate().unwrap_err().mentions_field("since"));
    }

    #[test]
    fn test_since_time() {
        let lrp = record(ActualLrpState::Unclaimed);
        assert_eq!(lrp.since_time().unwrap().timestamp_nanos_opt(), Some(1138));
        assert!(ActualLrp::default().since_time().is_none());
    }

    #[test]
    fn test_resolve_prefers_evacuating_until_instance_runs() {
        let group = ActualLrpGroup {
            instance: Some(record(ActualLrpState::Claimed)),
            evacuating: Some(record(ActualLrpState::Running)),
        };
        let (resolved, evacuating) = group.resolve().unwrap();
        assert!(evacuating);
        assert_eq!(resolved.state, ActualLrpState::Running);
    }
}
