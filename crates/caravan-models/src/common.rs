// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Small value types shared by actions, desired LRPs and tasks.

use serde::{Deserialize, Serialize};

use crate::validation::{FieldViolation, ValidationError, Validator};

/// Maximum annotation size accepted on desired LRPs and tasks (10 KiB).
pub const MAX_ANNOTATION_BYTES: usize = 10 * 1024;

/// Maximum cpu weight.
pub const MAX_CPU_WEIGHT: u32 = 100;

/// A `NAME=value` pair exported into a container process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentVariable {
    pub name: String,
    pub value: String,
}

impl EnvironmentVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl Validator for EnvironmentVariable {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return ValidationError::new().invalid_field("name").into_result();
        }
        Ok(())
    }
}

/// Process limits applied to a run action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Maximum number of open file descriptors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nofile: Option<u64>,

    /// Maximum number of processes. Superseded by the definition-level `max_pids`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nproc: Option<u64>,
}

/// Validate every environment variable, reporting failures by position.
pub(crate) fn validate_environment(
    errors: ValidationError,
    variables: &[EnvironmentVariable],
) -> ValidationError {
    variables
        .iter()
        .enumerate()
        .fold(errors, |errors, (index, variable)| {
            errors.nest(
                format!("environment variable at index {}", index),
                variable.validate(),
            )
        })
}

/// Guids are non-empty and limited to ASCII letters, digits, `-` and `_`.
pub(crate) fn is_valid_guid(guid: &str) -> bool {
    !guid.is_empty()
        && guid
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// A rootfs is a URL with a scheme, e.g. `preloaded:cflinuxfs4` or
/// `docker:///busybox`.
pub(crate) fn has_url_scheme(url: &str) -> bool {
    match url.split_once(':') {
        Some((scheme, _)) => {
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

pub(crate) fn validate_annotation(
    errors: ValidationError,
    annotation: &str,
    max_bytes: usize,
) -> ValidationError {
    if annotation.len() > max_bytes {
        errors.append(FieldViolation::constraint(
            "annotation",
            format!("must be at most {} bytes", max_bytes),
        ))
    } else {
        errors
    }
}

/// serde helper: skip numeric fields left at zero.
pub(crate) fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
