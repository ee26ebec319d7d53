// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The Action execution-recipe language.
//!
//! An [`Action`] is a tree describing how a container is set up, what it runs
//! and how it is health-checked. Leaves move files and run processes; wrappers
//! add a timeout, swallow failures or emit progress messages around exactly one
//! child; composites run an ordered list of children in parallel, in series or
//! codependently (all fail as soon as one exits).
//!
//! Child slots are optional because the wire forms can carry a nil child (an
//! empty JSON `null` or a protobuf `Action` with no field set). Such a tree
//! decodes fine and is rejected by [`Validator::validate`].
//!
//! # Text form
//!
//! The union is externally tagged by snake case variant name:
//!
//! ```json
//! {"serial": {"actions": [
//!     {"download": {"from": "http://x/app.tgz", "to": "/app", "user": "vcap"}},
//!     {"run": {"path": "/app/start", "user": "vcap"}}
//! ]}}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::common::{EnvironmentVariable, ResourceLimits, is_zero, validate_environment};
use crate::validation::{FieldViolation, ValidationError, Validator};

/// Checksum algorithms accepted on downloads and cached dependencies.
pub const SUPPORTED_CHECKSUM_ALGORITHMS: &[&str] = &["md5", "sha1", "sha256"];

const NANOS_PER_MILLI: i64 = 1_000_000;

// ============================================================================
// Union
// ============================================================================

/// Union of all action variants, discriminated by variant name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Fetch an artifact into the container
    Download(DownloadAction),

    /// Copy a file out of the container
    Upload(UploadAction),

    /// Run a process
    Run(RunAction),

    /// Fail the child if it has not finished in time
    Timeout(TimeoutAction),

    /// Log start/success/failure messages around the child
    EmitProgress(EmitProgressAction),

    /// Run the child and ignore its failure
    Try(TryAction),

    /// Run all children concurrently
    Parallel(ParallelAction),

    /// Run children one after another, stopping at the first failure
    Serial(SerialAction),

    /// Run all children concurrently, failing all when any exits
    Codependent(CodependentAction),
}

/// Behavior common to every action variant.
pub trait ActionInterface: fmt::Debug {
    /// Stable snake case name of the variant.
    fn action_type(&self) -> &'static str;

    fn validate(&self) -> Result<(), ValidationError>;
}

impl Action {
    /// The single variant carried by this action, as the common interface.
    pub fn as_interface(&self) -> &dyn ActionInterface {
        match self {
            Action::Download(a) => a,
            Action::Upload(a) => a,
            Action::Run(a) => a,
            Action::Timeout(a) => a,
            Action::EmitProgress(a) => a,
            Action::Try(a) => a,
            Action::Parallel(a) => a,
            Action::Serial(a) => a,
            Action::Codependent(a) => a,
        }
    }

    pub fn action_type(&self) -> &'static str {
        self.as_interface().action_type()
    }

    /// Immediate children, nil slots included.
    pub fn children(&self) -> Vec<Option<&Action>> {
        match self {
            Action::Download(_) | Action::Upload(_) | Action::Run(_) => Vec::new(),
            Action::Timeout(a) => vec![a.action.as_deref()],
            Action::EmitProgress(a) => vec![a.action.as_deref()],
            Action::Try(a) => vec![a.action.as_deref()],
            Action::Parallel(a) => a.actions.iter().map(Option::as_ref).collect(),
            Action::Serial(a) => a.actions.iter().map(Option::as_ref).collect(),
            Action::Codependent(a) => a.actions.iter().map(Option::as_ref).collect(),
        }
    }

    /// Copy of this tree with every timeout's legacy nanosecond field derived
    /// from its millisecond field.
    pub fn with_deprecated_timeout_ns(&self) -> Action {
        let mut copy = self.clone();
        copy.for_each_timeout_mut(&mut |timeout: &mut TimeoutAction| {
            timeout.deprecated_timeout_ns = timeout.timeout_ms.saturating_mul(NANOS_PER_MILLI);
        });
        copy
    }

    /// Copy of this tree with every unset millisecond timeout filled in from
    /// the legacy nanosecond field.
    pub fn with_timeout_ms_from_deprecated_ns(&self) -> Action {
        let mut copy = self.clone();
        copy.for_each_timeout_mut(&mut |timeout: &mut TimeoutAction| {
            if timeout.timeout_ms == 0 {
                timeout.timeout_ms = timeout.deprecated_timeout_ns / NANOS_PER_MILLI;
            }
        });
        copy
    }

    // Only ever called on a private copy.
    fn for_each_timeout_mut(&mut self, f: &mut dyn FnMut(&mut TimeoutAction)) {
        match self {
            Action::Download(_) | Action::Upload(_) | Action::Run(_) => {}
            Action::Timeout(a) => {
                f(a);
                if let Some(inner) = a.action.as_deref_mut() {
                    inner.for_each_timeout_mut(f);
                }
            }
            Action::EmitProgress(a) => {
                if let Some(inner) = a.action.as_deref_mut() {
                    inner.for_each_timeout_mut(f);
                }
            }
            Action::Try(a) => {
                if let Some(inner) = a.action.as_deref_mut() {
                    inner.for_each_timeout_mut(f);
                }
            }
            Action::Parallel(ParallelAction { actions, .. })
            | Action::Serial(SerialAction { actions, .. })
            | Action::Codependent(CodependentAction { actions, .. }) => {
                for inner in actions.iter_mut().flatten() {
                    inner.for_each_timeout_mut(f);
                }
            }
        }
    }
}

impl Validator for Action {
    fn validate(&self) -> Result<(), ValidationError> {
        self.as_interface().validate()
    }
}

/// Lift a concrete variant into the union. Nil stays nil.
pub fn wrap_action<A: Into<Action>>(action: Option<A>) -> Option<Action> {
    action.map(Into::into)
}

/// Extract the single variant of a possibly-nil action.
pub fn unwrap_action(action: Option<&Action>) -> Option<&dyn ActionInterface> {
    action.map(Action::as_interface)
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Action {
                fn from(action: $ty) -> Self {
                    Action::$variant(action)
                }
            }
        )*
    };
}

impl_from_variant! {
    Download => DownloadAction,
    Upload => UploadAction,
    Run => RunAction,
    Timeout => TimeoutAction,
    EmitProgress => EmitProgressAction,
    Try => TryAction,
    Parallel => ParallelAction,
    Serial => SerialAction,
    Codependent => CodependentAction,
}

// ============================================================================
// Leaf Actions
// ============================================================================

/// Fetch an artifact from a URL into the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadAction {
    /// Human-readable name shown in progress logs
    #[serde(skip_serializing_if = "String::is_empty")]
    pub artifact: String,
    pub from: String,
    pub to: String,
    /// Key under which the download is cached on the cell; empty disables caching
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cache_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum_algorithm: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum_value: String,
}

impl ActionInterface for DownloadAction {
    fn action_type(&self) -> &'static str {
        "download"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.from.is_empty() {
            errors = errors.invalid_field("from");
        }
        if self.to.is_empty() {
            errors = errors.invalid_field("to");
        }
        if self.user.is_empty() {
            errors = errors.invalid_field("user");
        }
        validate_checksum(errors, &self.checksum_algorithm, &self.checksum_value).into_result()
    }
}

/// Checksum algorithm and value must come together, and the algorithm must be
/// one of [`SUPPORTED_CHECKSUM_ALGORITHMS`].
pub(crate) fn validate_checksum(
    errors: ValidationError,
    algorithm: &str,
    value: &str,
) -> ValidationError {
    if algorithm.is_empty() {
        return if value.is_empty() {
            errors
        } else {
            errors.invalid_field("checksum_algorithm")
        };
    }

    let errors = if value.is_empty() {
        errors.invalid_field("checksum_value")
    } else {
        errors
    };
    let normalized = algorithm.to_lowercase();
    if SUPPORTED_CHECKSUM_ALGORITHMS.contains(&normalized.as_str()) {
        errors
    } else {
        errors.append(FieldViolation::constraint(
            "checksum_algorithm",
            format!("invalid algorithm '{}'", algorithm),
        ))
    }
}

/// Copy a file out of the container to a URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadAction {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub artifact: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
    pub user: String,
}

impl ActionInterface for UploadAction {
    fn action_type(&self) -> &'static str {
        "upload"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.from.is_empty() {
            errors = errors.invalid_field("from");
        }
        if self.to.is_empty() {
            errors = errors.invalid_field("to");
        }
        if self.user.is_empty() {
            errors = errors.invalid_field("user");
        }
        errors.into_result()
    }
}

/// Run a process inside the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunAction {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dir: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvironmentVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_limits: Option<ResourceLimits>,
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub suppress_log_output: bool,
}

impl ActionInterface for RunAction {
    fn action_type(&self) -> &'static str {
        "run"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.path.is_empty() {
            errors = errors.invalid_field("path");
        }
        if self.user.is_empty() {
            errors = errors.invalid_field("user");
        }
        validate_environment(errors, &self.env).into_result()
    }
}

// ============================================================================
// Wrapper Actions
// ============================================================================

/// Fail the wrapped action if it runs longer than the timeout.
///
/// Two timeout fields exist. `timeout_ms` is the current one; the nanosecond
/// field is only written for schema V0 readers. When both are set
/// `timeout_ms` wins (see [`TimeoutAction::effective_timeout`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutAction {
    pub action: Option<Box<Action>>,
    #[serde(skip_serializing_if = "is_zero")]
    pub deprecated_timeout_ns: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
    pub timeout_ms: i64,
}

impl TimeoutAction {
    /// The timeout a runner should enforce, `None` when neither field is set.
    pub fn effective_timeout(&self) -> Option<Duration> {
        if self.timeout_ms > 0 {
            Some(Duration::from_millis(self.timeout_ms as u64))
        } else if self.deprecated_timeout_ns > 0 {
            Some(Duration::from_nanos(self.deprecated_timeout_ns as u64))
        } else {
            None
        }
    }
}

impl ActionInterface for TimeoutAction {
    fn action_type(&self) -> &'static str {
        "timeout"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = validate_inner(ValidationError::new(), self.action.as_deref());
        if self.timeout_ms <= 0 {
            errors = errors.invalid_field("timeout_ms");
        }
        errors.into_result()
    }
}

/// Log messages before and after the wrapped action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitProgressAction {
    pub action: Option<Box<Action>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub success_message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub failure_message_prefix: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
}

impl ActionInterface for EmitProgressAction {
    fn action_type(&self) -> &'static str {
        "emit_progress"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_inner(ValidationError::new(), self.action.as_deref()).into_result()
    }
}

/// Run the wrapped action and swallow its failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TryAction {
    pub action: Option<Box<Action>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
}

impl ActionInterface for TryAction {
    fn action_type(&self) -> &'static str {
        "try"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_inner(ValidationError::new(), self.action.as_deref()).into_result()
    }
}

fn validate_inner(errors: ValidationError, action: Option<&Action>) -> ValidationError {
    match action {
        None => errors.invalid_field("action"),
        Some(action) => errors.nest("action", action.validate()),
    }
}

// ============================================================================
// Composite Actions
// ============================================================================

/// Run all children at the same time; fails if any child fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelAction {
    pub actions: Vec<Option<Action>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
}

impl ActionInterface for ParallelAction {
    fn action_type(&self) -> &'static str {
        "parallel"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_children(&self.actions)
    }
}

/// Run children in order; stops at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialAction {
    pub actions: Vec<Option<Action>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
}

impl ActionInterface for SerialAction {
    fn action_type(&self) -> &'static str {
        "serial"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_children(&self.actions)
    }
}

/// Run all children at the same time; the first child to exit, successfully or
/// not, brings the others down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodependentAction {
    pub actions: Vec<Option<Action>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
}

impl ActionInterface for CodependentAction {
    fn action_type(&self) -> &'static str {
        "codependent"
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_children(&self.actions)
    }
}

/// Every child is visited; each problem is reported under its 0-based index.
fn validate_children(actions: &[Option<Action>]) -> Result<(), ValidationError> {
    if actions.is_empty() {
        return ValidationError::new().invalid_field("actions").into_result();
    }

    actions
        .iter()
        .enumerate()
        .fold(ValidationError::new(), |errors, (index, action)| {
            let context = format!("action at index {}", index);
            match action {
                None => errors.nest(
                    context,
                    Err(FieldViolation::invalid_field("action").into()),
                ),
                Some(action) => errors.nest(context, action.validate()),
            }
        })
        .into_result()
}

// ============================================================================
// Construction Helpers
// ============================================================================

fn collect_children<I, A>(actions: I) -> Vec<Option<Action>>
where
    I: IntoIterator<Item = A>,
    A: Into<Option<Action>>,
{
    actions.into_iter().map(Into::into).collect()
}

/// Build a parallel action. Accepts actions or nil slots.
pub fn parallel<I, A>(actions: I) -> Action
where
    I: IntoIterator<Item = A>,
    A: Into<Option<Action>>,
{
    Action::Parallel(ParallelAction {
        actions: collect_children(actions),
        log_source: String::new(),
    })
}

/// Build a serial action. Accepts actions or nil slots.
pub fn serial<I, A>(actions: I) -> Action
where
    I: IntoIterator<Item = A>,
    A: Into<Option<Action>>,
{
    Action::Serial(SerialAction {
        actions: collect_children(actions),
        log_source: String::new(),
    })
}

/// Build a codependent action. Accepts actions or nil slots.
pub fn codependent<I, A>(actions: I) -> Action
where
    I: IntoIterator<Item = A>,
    A: Into<Option<Action>>,
{
    Action::Codependent(CodependentAction {
        actions: collect_children(actions),
        log_source: String::new(),
    })
}

/// Wrap an action so that its failure is ignored.
pub fn try_action(action: impl Into<Option<Action>>) -> Action {
    Action::Try(TryAction {
        action: action.into().map(Box::new),
        log_source: String::new(),
    })
}

/// Wrap an action in a timeout. Sub-millisecond precision is dropped.
pub fn timeout(action: impl Into<Option<Action>>, duration: Duration) -> Action {
    Action::Timeout(TimeoutAction {
        action: action.into().map(Box::new),
        deprecated_timeout_ns: 0,
        log_source: String::new(),
        timeout_ms: i64::try_from(duration.as_millis()).unwrap_or(i64::MAX),
    })
}

/// Wrap an action with start, success and failure progress messages.
pub fn emit_progress_for(
    action: impl Into<Option<Action>>,
    start_message: impl Into<String>,
    success_message: impl Into<String>,
    failure_message_prefix: impl Into<String>,
) -> Action {
    Action::EmitProgress(EmitProgressAction {
        action: action.into().map(Box::new),
        start_message: start_message.into(),
        success_message: success_message.into(),
        failure_message_prefix: failure_message_prefix.into(),
        log_source: String::new(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run(path: &str) -> Action {
        Action::Run(RunAction {
            path: path.to_string(),
            user: "vcap".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_action_types() {
        let cases = vec![
            (Action::from(DownloadAction::default()), "download"),
            (Action::from(UploadAction::default()), "upload"),
            (run("/bin/ls"), "run"),
            (timeout(run("/bin/ls"), Duration::from_secs(1)), "timeout"),
            (emit_progress_for(run("/bin/ls"), "a", "b", "c"), "emit_progress"),
            (try_action(run("/bin/ls")), "try"),
            (parallel([run("/bin/ls")]), "parallel"),
            (serial([run("/bin/ls")]), "serial"),
            (codependent([run("/bin/ls")]), "codependent"),
        ];

        for (action, expected) in cases {
            assert_eq!(action.action_type(), expected);
            assert_eq!(unwrap_action(Some(&action)).unwrap().action_type(), expected);
        }
    }

    #[test]
    fn test_wrap_nil_stays_nil() {
        assert_eq!(wrap_action::<RunAction>(None), None);
        assert!(unwrap_action(None).is_none());
    }

    #[test]
    fn test_wrap_variant() {
        let wrapped = wrap_action(Some(TryAction::default())).unwrap();
        assert!(matches!(wrapped, Action::Try(_)));
    }

    #[test]
    fn test_timeout_helper_sets_ms() {
        match timeout(run("/bin/ls"), Duration::from_millis(1500)) {
            Action::Timeout(t) => {
                assert_eq!(t.timeout_ms, 1500);
                assert_eq!(t.deprecated_timeout_ns, 0);
            }
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_deprecated_timeout_round_trip_through_tree() {
        let tree = serial([
            timeout(run("/a"), Duration::from_millis(20)),
            parallel([timeout(try_action(run("/b")), Duration::from_secs(2))]),
        ]);

        let legacy = tree.with_deprecated_timeout_ns();
        let timeouts: Vec<i64> = collect_timeouts(&legacy)
            .iter()
            .map(|t| t.deprecated_timeout_ns)
            .collect();
        assert_eq!(timeouts, vec![20_000_000, 2_000_000_000]);

        // the input is untouched
        assert!(
            collect_timeouts(&tree)
                .iter()
                .all(|t| t.deprecated_timeout_ns == 0)
        );
    }

    #[test]
    fn test_timeout_ms_from_deprecated_ns() {
        let legacy = Action::Timeout(TimeoutAction {
            action: Some(Box::new(run("/a"))),
            deprecated_timeout_ns: 3_000_000_000,
            ..Default::default()
        });

        match legacy.with_timeout_ms_from_deprecated_ns() {
            Action::Timeout(t) => assert_eq!(t.timeout_ms, 3000),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_effective_timeout_precedence() {
        let both = TimeoutAction {
            deprecated_timeout_ns: 5_000_000_000,
            timeout_ms: 1000,
            ..Default::default()
        };
        assert_eq!(both.effective_timeout(), Some(Duration::from_secs(1)));

        let legacy_only = TimeoutAction {
            deprecated_timeout_ns: 5_000_000_000,
            ..Default::default()
        };
        assert_eq!(legacy_only.effective_timeout(), Some(Duration::from_secs(5)));

        assert_eq!(TimeoutAction::default().effective_timeout(), None);
    }

    #[test]
    fn test_children_includes_nil_slots() {
        let action = parallel([Some(run("/a")), None]);
        let children = action.children();
        assert_eq!(children.len(), 2);
        assert!(children[0].is_some());
        assert!(children[1].is_none());
    }

    fn collect_timeouts(action: &Action) -> Vec<&TimeoutAction> {
        let mut found = Vec::new();
        if let Action::Timeout(t) = action {
            found.push(t);
        }
        for child in action.children().into_iter().flatten() {
            found.extend(collect_timeouts(child));
        }
        found
    }
}
