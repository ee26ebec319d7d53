// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Desired long-running processes.
//!
//! A [`DesiredLrp`] is the user's declaration of what should run and how many
//! copies. The scheduler only needs a small part of it, the
//! [`DesiredLrpSchedulingInfo`], which is also the part mutated by a
//! [`DesiredLrpUpdate`]. The run information (actions, environment,
//! dependencies) is immutable once desired.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::action::Action;
use crate::common::{
    EnvironmentVariable, MAX_CPU_WEIGHT, has_url_scheme, is_valid_guid, is_zero,
    validate_annotation, validate_environment,
};
use crate::config::ModelsConfig;
use crate::image_layer::{CachedDependency, ImageLayer};
use crate::modification_tag::ModificationTag;
use crate::validation::{FieldViolation, ValidationError, Validator};
use crate::version::{self, SchemaVersion, SetupParts};

/// Routing information keyed by router name; values are opaque to this crate.
pub type Routes = BTreeMap<String, serde_json::Value>;

/// Upper bound on the serialized size of all routes of one LRP (4 KiB).
pub const MAX_ROUTES_BYTES: usize = 4 * 1024;

// ============================================================================
// Desired LRP
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredLrp {
    pub process_guid: String,
    pub domain: String,
    #[serde(rename = "rootfs")]
    pub root_fs: String,
    pub instances: i32,
    #[serde(rename = "env", skip_serializing_if = "Vec::is_empty")]
    pub environment_variables: Vec<EnvironmentVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<Action>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(skip_serializing_if = "is_zero")]
    pub start_timeout_ms: i64,
    /// Whole seconds; only populated for V0 consumers.
    #[serde(rename = "start_timeout", skip_serializing_if = "is_zero")]
    pub deprecated_start_timeout_s: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor: Option<Action>,
    #[serde(skip_serializing_if = "is_zero")]
    pub disk_mb: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub memory_mb: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub cpu_weight: u32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub privileged: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u32>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub routes: Routes,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_guid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metrics_guid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub annotation: String,
    pub modification_tag: ModificationTag,
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

impl DesiredLrp {
    pub fn key(&self) -> DesiredLrpKey {
        DesiredLrpKey {
            process_guid: self.process_guid.clone(),
            domain: self.domain.clone(),
            log_guid: self.log_guid.clone(),
        }
    }

    pub fn resource(&self) -> DesiredLrpResource {
        DesiredLrpResource {
            memory_mb: self.memory_mb,
            disk_mb: self.disk_mb,
            max_pids: self.max_pids,
            root_fs: self.root_fs.clone(),
        }
    }

    /// The subset of the definition the scheduler works with.
    pub fn scheduling_info(&self) -> DesiredLrpSchedulingInfo {
        DesiredLrpSchedulingInfo {
            key: self.key(),
            annotation: self.annotation.clone(),
            instances: self.instances,
            resource: self.resource(),
            routes: self.routes.clone(),
            modification_tag: self.modification_tag.clone(),
            placement_tags: self.placement_tags.clone(),
        }
    }

    /// A new definition with the update applied and the modification index bumped.
    pub fn apply_update(&self, update: &DesiredLrpUpdate) -> DesiredLrp {
        let mut lrp = self.clone();
        if let Some(instances) = update.instances {
            lrp.instances = instances;
        }
        if let Some(routes) = &update.routes {
            lrp.routes = routes.clone();
        }
        if let Some(annotation) = &update.annotation {
            lrp.annotation = annotation.clone();
        }
        lrp.modification_tag = self.modification_tag.increment();
        debug!(
            process_guid = %lrp.process_guid,
            index = lrp.modification_tag.index,
            "Applied desired LRP update"
        );
        lrp
    }

    /// An equivalent definition understood by a `target` consumer.
    ///
    /// Returns an unchanged copy when `target` is the latest version.
    pub fn version_down_to(&self, target: SchemaVersion) -> DesiredLrp {
        let mut lrp = self.clone();
        if target >= SchemaVersion::LATEST {
            return lrp;
        }
        debug!(process_guid = %lrp.process_guid, target = %target, "Downgrading desired LRP");

        version::downgrade_setup(
            SetupParts {
                setup: &mut lrp.setup,
                cached_dependencies: &mut lrp.cached_dependencies,
                image_layers: &mut lrp.image_layers,
                legacy_download_user: &self.legacy_download_user,
            },
            target,
        );

        if target < SchemaVersion::V1 {
            version::downgrade_timeouts(&mut lrp.setup);
            version::downgrade_timeouts(&mut lrp.action);
            version::downgrade_timeouts(&mut lrp.monitor);
            lrp.deprecated_start_timeout_s =
                version::deprecated_start_timeout_s(lrp.start_timeout_ms);
        }

        lrp
    }

    /// The definition as a current consumer reads a record written at
    /// `source`. Records older than V1 only carry the legacy timeouts, so the
    /// millisecond fields are filled from them where unset.
    pub fn version_up_from(&self, source: SchemaVersion) -> DesiredLrp {
        let mut lrp = self.clone();
        if source >= SchemaVersion::V1 {
            return lrp;
        }

        version::upgrade_timeouts(&mut lrp.setup);
        version::upgrade_timeouts(&mut lrp.action);
        version::upgrade_timeouts(&mut lrp.monitor);
        if lrp.start_timeout_ms == 0 {
            lrp.start_timeout_ms = i64::from(lrp.deprecated_start_timeout_s) * 1000;
        }
        lrp
    }

    /// Validate using the limits from `config`.
    pub fn validate_with(&self, config: &ModelsConfig) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        if self.domain.is_empty() {
            errors = errors.invalid_field("domain");
        }
        if !is_valid_guid(&self.process_guid) {
            errors = errors.invalid_field("process_guid");
        }
        if !has_url_scheme(&self.root_fs) {
            errors = errors.invalid_field("rootfs");
        }
        if self.instances < 0 {
            errors = errors.invalid_field("instances");
        }

        if let Some(setup) = &self.setup {
            errors = errors.nest("setup", setup.validate());
        }
        errors = match &self.action {
            Some(action) => errors.nest("action", action.validate()),
            None => errors.invalid_field("action"),
        };
        if let Some(monitor) = &self.monitor {
            errors = errors.nest("monitor", monitor.validate());
        }

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
        errors = validate_routes(errors, &self.routes);
        errors = validate_downloads(
            errors,
            &self.cached_dependencies,
            &self.image_layers,
            &self.legacy_download_user,
        );
        validate_environment(errors, &self.environment_variables).into_result()
    }
}

impl Validator for DesiredLrp {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(&ModelsConfig::default())
    }
}

fn validate_routes(errors: ValidationError, routes: &Routes) -> ValidationError {
    let total: usize = routes
        .iter()
        .map(|(name, value)| name.len() + value.to_string().len())
        .sum();
    if total > MAX_ROUTES_BYTES {
        errors.append(FieldViolation::constraint(
            "routes",
            format!("must be at most {} bytes", MAX_ROUTES_BYTES),
        ))
    } else {
        errors
    }
}

/// Cached dependencies and image layers, plus the legacy download user older
/// consumers need to run them as download actions.
pub(crate) fn validate_downloads(
    errors: ValidationError,
    cached_dependencies: &[CachedDependency],
    image_layers: &[ImageLayer],
    legacy_download_user: &str,
) -> ValidationError {
    let mut errors = cached_dependencies
        .iter()
        .enumerate()
        .fold(errors, |errors, (index, dependency)| {
            errors.nest(
                format!("cached_dependency at index {}", index),
                dependency.validate(),
            )
        });
    errors = image_layers
        .iter()
        .enumerate()
        .fold(errors, |errors, (index, layer)| {
            errors.nest(format!("image_layer at index {}", index), layer.validate())
        });

    let needs_user =
        !cached_dependencies.is_empty() || image_layers.iter().any(ImageLayer::is_exclusive);
    if needs_user && legacy_download_user.is_empty() {
        errors = errors.invalid_field("legacy_download_user");
    }
    errors
}

// ============================================================================
// Scheduling View
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredLrpKey {
    pub process_guid: String,
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_guid: String,
}

impl Validator for DesiredLrpKey {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.domain.is_empty() {
            errors = errors.invalid_field("domain");
        }
        if !is_valid_guid(&self.process_guid) {
            errors = errors.invalid_field("process_guid");
        }
        errors.into_result()
    }
}

/// Resources a cell must have free to place an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredLrpResource {
    pub memory_mb: i32,
    pub disk_mb: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_pids: i32,
    #[serde(rename = "rootfs")]
    pub root_fs: String,
}

impl Validator for DesiredLrpResource {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if !has_url_scheme(&self.root_fs) {
            errors = errors.invalid_field("rootfs");
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
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredLrpSchedulingInfo {
    #[serde(rename = "desired_lrp_key")]
    pub key: DesiredLrpKey,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub annotation: String,
    pub instances: i32,
    #[serde(rename = "desired_lrp_resource")]
    pub resource: DesiredLrpResource,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub routes: Routes,
    pub modification_tag: ModificationTag,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub placement_tags: Vec<String>,
}

impl DesiredLrpSchedulingInfo {
    /// A new scheduling view with the update applied and the modification
    /// index bumped.
    pub fn apply_update(&self, update: &DesiredLrpUpdate) -> DesiredLrpSchedulingInfo {
        let mut info = self.clone();
        if let Some(instances) = update.instances {
            info.instances = instances;
        }
        if let Some(routes) = &update.routes {
            info.routes = routes.clone();
        }
        if let Some(annotation) = &update.annotation {
            info.annotation = annotation.clone();
        }
        info.modification_tag = self.modification_tag.increment();
        info
    }
}

impl Validator for DesiredLrpSchedulingInfo {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new()
            .merge(self.key.validate())
            .merge(self.resource.validate());
        if self.instances < 0 {
            errors = errors.invalid_field("instances");
        }
        errors = validate_annotation(
            errors,
            &self.annotation,
            ModelsConfig::default().max_annotation_bytes,
        );
        validate_routes(errors, &self.routes).into_result()
    }
}

// ============================================================================
// Update
// ============================================================================

/// The mutable part of a desired LRP. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesiredLrpUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routes: Option<Routes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl DesiredLrpUpdate {
    pub fn validate_with(&self, config: &ModelsConfig) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if matches!(self.instances, Some(n) if n < 0) {
            errors = errors.invalid_field("instances");
        }
        if let Some(annotation) = &self.annotation {
            errors = validate_annotation(errors, annotation, config.max_annotation_bytes);
        }
        if let Some(routes) = &self.routes {
            errors = validate_routes(errors, routes);
        }
        errors.into_result()
    }
}

impl Validator for DesiredLrpUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        self.validate_with(&ModelsConfig::default())
    }
}
