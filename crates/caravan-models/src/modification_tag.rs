// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Optimistic-concurrency tag carried by stored records.

use serde::{Deserialize, Serialize};

use crate::common::is_zero;

/// Epoch plus a monotonically increasing index.
///
/// The epoch changes only when a record is replaced wholesale; every semantic
/// update bumps the index by one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ModificationTag {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub epoch: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub index: u32,
}

impl ModificationTag {
    pub fn new(epoch: impl Into<String>, index: u32) -> Self {
        Self {
            epoch: epoch.into(),
            index,
        }
    }

    /// The tag following this one: same epoch, index plus one.
    #[must_use]
    pub fn increment(&self) -> Self {
        Self {
            epoch: self.epoch.clone(),
            index: self.index.wrapping_add(1),
        }
    }

    /// Whether `other` is a newer revision than `self`.
    ///
    /// A record without an epoch is always superseded, and a different epoch
    /// means the record was replaced.
    pub fn succeeded_by(&self, other: &ModificationTag) -> bool {
        if self.epoch.is_empty() || other.epoch.is_empty() {
            return true;
        }
        self.epoch != other.epoch || self.index < other.index
    }
}
