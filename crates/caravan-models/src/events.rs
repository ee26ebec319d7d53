// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Change notifications published when records are created, changed or removed.
//!
//! The text form is adjacently tagged:
//!
//! ```json
//! {"type": "desired_lrp_removed", "payload": {"process_guid": "...", ...}}
//! ```

use serde::{Deserialize, Serialize};

use crate::actual_lrp::{ActualLrpGroup, ActualLrpInstanceKey, ActualLrpKey};
use crate::common::is_zero;
use crate::desired_lrp::DesiredLrp;
use crate::error::ModelError;
use crate::task::Task;
use crate::version::SchemaVersion;

/// A record before and after a change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Change<T> {
    pub before: T,
    pub after: T,
}

/// Emitted when a running instance crashes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActualLrpCrash {
    #[serde(rename = "actual_lrp_key")]
    pub key: ActualLrpKey,
    #[serde(rename = "actual_lrp_instance_key")]
    pub instance_key: ActualLrpInstanceKey,
    #[serde(skip_serializing_if = "is_zero")]
    pub crash_count: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub crash_reason: String,
    pub since: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Event {
    DesiredLrpCreated(DesiredLrp),
    DesiredLrpChanged(Change<DesiredLrp>),
    DesiredLrpRemoved(DesiredLrp),
    ActualLrpCreated(ActualLrpGroup),
    ActualLrpChanged(Change<ActualLrpGroup>),
    ActualLrpRemoved(ActualLrpGroup),
    ActualLrpCrashed(ActualLrpCrash),
    TaskCreated(Task),
    TaskChanged(Change<Task>),
    TaskRemoved(Task),
}

impl Event {
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::DesiredLrpCreated(_) => "desired_lrp_created",
            Event::DesiredLrpChanged(_) => "desired_lrp_changed",
            Event::DesiredLrpRemoved(_) => "desired_lrp_removed",
            Event::ActualLrpCreated(_) => "actual_lrp_created",
            Event::ActualLrpChanged(_) => "actual_lrp_changed",
            Event::ActualLrpRemoved(_) => "actual_lrp_removed",
            Event::ActualLrpCrashed(_) => "actual_lrp_crashed",
            Event::TaskCreated(_) => "task_created",
            Event::TaskChanged(_) => "task_changed",
            Event::TaskRemoved(_) => "task_removed",
        }
    }

    /// Identifies the record the event is about.
    ///
    /// Fails only for actual LRP group events whose group carries no record.
    pub fn key(&self) -> Result<&str, ModelError> {
        match self {
            Event::DesiredLrpCreated(lrp) | Event::DesiredLrpRemoved(lrp) => {
                Ok(&lrp.process_guid)
            }
            Event::DesiredLrpChanged(change) => Ok(&change.before.process_guid),
            Event::ActualLrpCreated(group) | Event::ActualLrpRemoved(group) => {
                group_key(group)
            }
            Event::ActualLrpChanged(change) => group_key(&change.before),
            Event::ActualLrpCrashed(crash) => Ok(&crash.instance_key.instance_guid),
            Event::TaskCreated(task) | Event::TaskRemoved(task) => Ok(&task.task_guid),
            Event::TaskChanged(change) => Ok(&change.before.task_guid),
        }
    }

    /// The same event with embedded definitions downgraded for `target`.
    pub fn version_down_to(&self, target: SchemaVersion) -> Event {
        match self {
            Event::DesiredLrpCreated(lrp) => Event::DesiredLrpCreated(lrp.version_down_to(target)),
            Event::DesiredLrpChanged(change) => Event::DesiredLrpChanged(Change {
                before: change.before.version_down_to(target),
                after: change.after.version_down_to(target),
            }),
            Event::DesiredLrpRemoved(lrp) => Event::DesiredLrpRemoved(lrp.version_down_to(target)),
            Event::TaskCreated(task) => Event::TaskCreated(task.version_down_to(target)),
            Event::TaskChanged(change) => Event::TaskChanged(Change {
                before: change.before.version_down_to(target),
                after: change.after.version_down_to(target),
            }),
            Event::TaskRemoved(task) => Event::TaskRemoved(task.version_down_to(target)),
            other => other.clone(),
        }
    }
}

fn group_key(group: &ActualLrpGroup) -> Result<&str, ModelError> {
    let (lrp, _) = group.resolve()?;
    Ok(&lrp.instance_key.instance_guid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group_has_no_key() {
        let event = Event::ActualLrpRemoved(ActualLrpGroup::default());
        assert!(matches!(
            event.key(),
            Err(ModelError::ActualLrpGroupInvalid)
        ));
    }

    #[test]
    fn test_crash_key_is_instance_guid() {
        let event = Event::ActualLrpCrashed(ActualLrpCrash {
            instance_key: ActualLrpInstanceKey::new("ig", "cell"),
            ..Default::default()
        });
        assert_eq!(event.key().unwrap(), "ig");
        assert_eq!(event.event_type(), "actual_lrp_crashed");
    }
}
