// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Schema generations and the rewrites that move a definition down to them.
//!
//! A definition is always held at [`SchemaVersion::LATEST`]. Before handing it
//! to a consumer that only understands an older generation, callers invoke
//! `version_down_to` on the entity, which clones it and applies the steps
//! below in order:
//!
//! ```text
//! V3 -> V2   shared layers   => cached dependencies (prepended)
//!            exclusive layers => Serial(Parallel(downloads), setup)
//! V2 -> V1   cached deps      => Serial(Parallel(downloads), setup)
//! V1 -> V0   timeout_ms       => deprecated_timeout_ns on every timeout node
//!            start_timeout_ms => deprecated_start_timeout_s
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::action::{Action, parallel, serial};
use crate::error::ModelError;
use crate::image_layer::{CachedDependency, ImageLayer};

/// Wire schema generations, oldest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum SchemaVersion {
    /// Legacy nanosecond timeouts and whole-second start timeout.
    V0 = 0,
    /// Millisecond timeouts; no cached dependencies or image layers.
    V1 = 1,
    /// Cached dependencies.
    V2 = 2,
    /// Image layers.
    #[default]
    V3 = 3,
}

impl SchemaVersion {
    pub const LATEST: SchemaVersion = SchemaVersion::V3;

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for SchemaVersion {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SchemaVersion::V0),
            1 => Ok(SchemaVersion::V1),
            2 => Ok(SchemaVersion::V2),
            3 => Ok(SchemaVersion::V3),
            other => Err(ModelError::invalid_record(format!(
                "unknown schema version {}",
                other
            ))),
        }
    }
}

impl From<SchemaVersion> for u8 {
    fn from(version: SchemaVersion) -> u8 {
        version.as_u8()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.as_u8())
    }
}

// ============================================================================
// Downgrade Steps
// ============================================================================

/// The parts of a definition that the layer and dependency rewrites touch.
///
/// Borrowed mutably from a private clone; callers never pass stored values.
pub(crate) struct SetupParts<'a> {
    pub setup: &'a mut Option<Action>,
    pub cached_dependencies: &'a mut Vec<CachedDependency>,
    pub image_layers: &'a mut Vec<ImageLayer>,
    pub legacy_download_user: &'a str,
}

/// Apply the layer (V3 -> V2) and dependency (V2 -> V1) rewrites needed to
/// reach `target`.
pub(crate) fn downgrade_setup(parts: SetupParts<'_>, target: SchemaVersion) {
    let SetupParts {
        setup,
        cached_dependencies,
        image_layers,
        legacy_download_user,
    } = parts;

    if target < SchemaVersion::V3 {
        apply_image_layers(setup, cached_dependencies, image_layers, legacy_download_user);
    }
    if target < SchemaVersion::V2 {
        apply_cached_dependencies(setup, cached_dependencies, legacy_download_user);
    }
}

fn apply_image_layers(
    setup: &mut Option<Action>,
    cached_dependencies: &mut Vec<CachedDependency>,
    image_layers: &mut Vec<ImageLayer>,
    user: &str,
) {
    if image_layers.is_empty() {
        return;
    }
    let (exclusive, shared): (Vec<&ImageLayer>, Vec<&ImageLayer>) =
        image_layers.iter().partition(|layer| layer.is_exclusive());
    debug!(
        shared = shared.len(),
        exclusive = exclusive.len(),
        "Converting image layers for V2 consumer"
    );

    if !shared.is_empty() {
        let mut converted: Vec<CachedDependency> =
            shared.iter().map(|layer| layer.to_cached_dependency()).collect();
        converted.append(cached_dependencies);
        *cached_dependencies = converted;
    }

    if !exclusive.is_empty() {
        let downloads =
            parallel(exclusive.iter().map(|layer| Action::from(layer.to_download_action(user))));
        *setup = Some(match setup.take() {
            Some(original) => serial([downloads, original]),
            None => downloads,
        });
    }

    image_layers.clear();
}

fn apply_cached_dependencies(
    setup: &mut Option<Action>,
    cached_dependencies: &mut Vec<CachedDependency>,
    user: &str,
) {
    if cached_dependencies.is_empty() {
        return;
    }
    debug!(
        count = cached_dependencies.len(),
        "Converting cached dependencies to download actions for V1 consumer"
    );

    let downloads = parallel(
        cached_dependencies
            .iter()
            .map(|dependency| Action::from(dependency.to_download_action(user))),
    );
    let mut steps = vec![downloads];
    steps.extend(setup.take());
    *setup = Some(serial(steps));

    cached_dependencies.clear();
}

/// Rewrite every timeout node in `action` to carry the legacy nanosecond field.
pub(crate) fn downgrade_timeouts(action: &mut Option<Action>) {
    if let Some(tree) = action.as_ref() {
        *action = Some(tree.with_deprecated_timeout_ns());
    }
}

/// Fill every unset millisecond timeout in `action` from the legacy
/// nanosecond field.
pub(crate) fn upgrade_timeouts(action: &mut Option<Action>) {
    if let Some(tree) = action.as_ref() {
        *action = Some(tree.with_timeout_ms_from_deprecated_ns());
    }
}

/// Legacy whole-seconds start timeout, truncated.
pub(crate) fn deprecated_start_timeout_s(start_timeout_ms: i64) -> u32 {
    u32::try_from(start_timeout_ms.max(0) / 1000).unwrap_or(u32::MAX)
}
