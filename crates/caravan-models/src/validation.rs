// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validation error aggregation.
//!
//! Every `validate()` in this crate folds all the problems it finds into a
//! single [`ValidationError`] so callers see every violation in one pass.
//! Aggregates are built by value: [`ValidationError::append`] consumes the
//! aggregate and returns the extended one, and nothing is ever removed.

use std::fmt;

// ============================================================================
// Violations
// ============================================================================

/// A single field-scoped validation fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldViolation {
    /// A required field is missing or malformed.
    InvalidField { field: String },
    /// A field is present but breaks a constraint.
    Constraint { field: String, message: String },
    /// Violations found inside a nested value, e.g. `action at index 2`.
    Nested {
        context: String,
        errors: ValidationError,
    },
}

impl FieldViolation {
    pub fn invalid_field(field: impl Into<String>) -> Self {
        FieldViolation::InvalidField {
            field: field.into(),
        }
    }

    pub fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldViolation::Constraint {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field this violation is scoped to.
    pub fn field(&self) -> &str {
        match self {
            FieldViolation::InvalidField { field } | FieldViolation::Constraint { field, .. } => {
                field
            }
            FieldViolation::Nested { context, .. } => context,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldViolation::InvalidField { field } => write!(f, "Invalid field: {}", field),
            FieldViolation::Constraint { field, message } => write!(f, "{}: {}", field, message),
            FieldViolation::Nested { context, errors } => write!(f, "{}: {}", context, errors),
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// Ordered collection of validation facts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a new aggregate with `violation` recorded after everything
    /// already present.
    #[must_use]
    pub fn append(mut self, violation: FieldViolation) -> Self {
        self.violations.push(violation);
        self
    }

    /// Record a required-field violation.
    #[must_use]
    pub fn invalid_field(self, field: impl Into<String>) -> Self {
        self.append(FieldViolation::invalid_field(field))
    }

    /// Fold the violations of another validation result into this one, flat.
    #[must_use]
    pub fn merge(mut self, result: Result<(), ValidationError>) -> Self {
        if let Err(other) = result {
            self.violations.extend(other.violations);
        }
        self
    }

    /// Fold another validation result in as a single nested violation.
    ///
    /// An `Ok` result leaves the aggregate unchanged.
    #[must_use]
    pub fn nest(self, context: impl Into<String>, result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => self,
            Err(errors) => self.append(FieldViolation::Nested {
                context: context.into(),
                errors,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns true if `field` was reported anywhere, including nested values.
    pub fn mentions_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| match v {
            FieldViolation::Nested { context, errors } => {
                context == field || errors.mentions_field(field)
            }
            other => other.field() == field,
        })
    }

    /// Finalize: `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<FieldViolation> for ValidationError {
    fn from(violation: FieldViolation) -> Self {
        ValidationError::new().append(violation)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Types that check their own structural invariants before persistence.
pub trait Validator {
    fn validate(&self) -> Result<(), ValidationError>;
}
