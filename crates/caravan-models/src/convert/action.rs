// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later

use caravan_protocol::models as proto;

use super::{ProtoConvert, option_from_proto, vec_from_proto, vec_to_proto};
use crate::action::{
    Action, CodependentAction, DownloadAction, EmitProgressAction, ParallelAction, RunAction,
    SerialAction, TimeoutAction, TryAction, UploadAction,
};
use crate::error::ModelError;

/// Encode a possibly-nil action. Nil becomes a message with no field set.
pub(crate) fn action_to_proto(action: Option<&Action>) -> proto::Action {
    let mut message = proto::Action::default();
    let Some(action) = action else {
        return message;
    };

    match action {
        Action::Download(a) => message.download_action = Some(a.to_proto()),
        Action::Upload(a) => message.upload_action = Some(a.to_proto()),
        Action::Run(a) => message.run_action = Some(a.to_proto()),
        Action::Timeout(a) => message.timeout_action = Some(a.to_proto()),
        Action::EmitProgress(a) => message.emit_progress_action = Some(a.to_proto()),
        Action::Try(a) => message.try_action = Some(a.to_proto()),
        Action::Parallel(a) => message.parallel_action = Some(a.to_proto()),
        Action::Serial(a) => message.serial_action = Some(a.to_proto()),
        Action::Codependent(a) => message.codependent_action = Some(a.to_proto()),
    }
    message
}

/// Decode an action message. No field set is nil; several fields set is an
/// error.
pub(crate) fn action_from_proto(message: proto::Action) -> Result<Option<Action>, ModelError> {
    let proto::Action {
        download_action,
        upload_action,
        run_action,
        timeout_action,
        emit_progress_action,
        try_action,
        parallel_action,
        serial_action,
        codependent_action,
    } = message;

    let variants: Vec<Result<Action, ModelError>> = [
        download_action.map(|a| DownloadAction::from_proto(a).map(Action::Download)),
        upload_action.map(|a| UploadAction::from_proto(a).map(Action::Upload)),
        run_action.map(|a| RunAction::from_proto(a).map(Action::Run)),
        timeout_action.map(|a| TimeoutAction::from_proto(a).map(Action::Timeout)),
        emit_progress_action.map(|a| EmitProgressAction::from_proto(a).map(Action::EmitProgress)),
        try_action.map(|a| TryAction::from_proto(a).map(Action::Try)),
        parallel_action.map(|a| ParallelAction::from_proto(a).map(Action::Parallel)),
        serial_action.map(|a| SerialAction::from_proto(a).map(Action::Serial)),
        codependent_action.map(|a| CodependentAction::from_proto(a).map(Action::Codependent)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if variants.len() > 1 {
        return Err(ModelError::invalid_record(format!(
            "action has {} variants set",
            variants.len()
        )));
    }
    variants.into_iter().next().transpose()
}

fn child_to_proto(action: &Option<Box<Action>>) -> Option<Box<proto::Action>> {
    action
        .as_deref()
        .map(|action| Box::new(action_to_proto(Some(action))))
}

fn child_from_proto(
    message: Option<Box<proto::Action>>,
) -> Result<Option<Box<Action>>, ModelError> {
    match message {
        Some(message) => Ok(action_from_proto(*message)?.map(Box::new)),
        None => Ok(None),
    }
}

fn children_to_proto(actions: &[Option<Action>]) -> Vec<proto::Action> {
    actions
        .iter()
        .map(|action| action_to_proto(action.as_ref()))
        .collect()
}

fn children_from_proto(messages: Vec<proto::Action>) -> Result<Vec<Option<Action>>, ModelError> {
    messages.into_iter().map(action_from_proto).collect()
}

impl ProtoConvert for Action {
    type Proto = proto::Action;

    fn to_proto(&self) -> Self::Proto {
        action_to_proto(Some(self))
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        action_from_proto(proto)?
            .ok_or_else(|| ModelError::invalid_record("action has no variant set"))
    }
}

impl ProtoConvert for DownloadAction {
    type Proto = proto::DownloadAction;

    fn to_proto(&self) -> Self::Proto {
        proto::DownloadAction {
            artifact: self.artifact.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            cache_key: self.cache_key.clone(),
            log_source: self.log_source.clone(),
            user: self.user.clone(),
            checksum_algorithm: self.checksum_algorithm.clone(),
            checksum_value: self.checksum_value.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            artifact: proto.artifact,
            from: proto.from,
            to: proto.to,
            cache_key: proto.cache_key,
            log_source: proto.log_source,
            user: proto.user,
            checksum_algorithm: proto.checksum_algorithm,
            checksum_value: proto.checksum_value,
        })
    }
}

impl ProtoConvert for UploadAction {
    type Proto = proto::UploadAction;

    fn to_proto(&self) -> Self::Proto {
        proto::UploadAction {
            artifact: self.artifact.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            log_source: self.log_source.clone(),
            user: self.user.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            artifact: proto.artifact,
            from: proto.from,
            to: proto.to,
            log_source: proto.log_source,
            user: proto.user,
        })
    }
}

impl ProtoConvert for RunAction {
    type Proto = proto::RunAction;

    fn to_proto(&self) -> Self::Proto {
        proto::RunAction {
            path: self.path.clone(),
            args: self.args.clone(),
            dir: self.dir.clone(),
            env: vec_to_proto(&self.env),
            resource_limits: self.resource_limits.as_ref().map(ProtoConvert::to_proto),
            user: self.user.clone(),
            log_source: self.log_source.clone(),
            suppress_log_output: self.suppress_log_output,
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            path: proto.path,
            args: proto.args,
            dir: proto.dir,
            env: vec_from_proto(proto.env)?,
            resource_limits: option_from_proto(proto.resource_limits)?,
            user: proto.user,
            log_source: proto.log_source,
            suppress_log_output: proto.suppress_log_output,
        })
    }
}

impl ProtoConvert for TimeoutAction {
    type Proto = proto::TimeoutAction;

    fn to_proto(&self) -> Self::Proto {
        proto::TimeoutAction {
            action: child_to_proto(&self.action),
            deprecated_timeout_ns: self.deprecated_timeout_ns,
            log_source: self.log_source.clone(),
            timeout_ms: self.timeout_ms,
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            action: child_from_proto(proto.action)?,
            deprecated_timeout_ns: proto.deprecated_timeout_ns,
            log_source: proto.log_source,
            timeout_ms: proto.timeout_ms,
        })
    }
}

impl ProtoConvert for EmitProgressAction {
    type Proto = proto::EmitProgressAction;

    fn to_proto(&self) -> Self::Proto {
        proto::EmitProgressAction {
            action: child_to_proto(&self.action),
            start_message: self.start_message.clone(),
            success_message: self.success_message.clone(),
            failure_message_prefix: self.failure_message_prefix.clone(),
            log_source: self.log_source.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            action: child_from_proto(proto.action)?,
            start_message: proto.start_message,
            success_message: proto.success_message,
            failure_message_prefix: proto.failure_message_prefix,
            log_source: proto.log_source,
        })
    }
}

impl ProtoConvert for TryAction {
    type Proto = proto::TryAction;

    fn to_proto(&self) -> Self::Proto {
        proto::TryAction {
            action: child_to_proto(&self.action),
            log_source: self.log_source.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            action: child_from_proto(proto.action)?,
            log_source: proto.log_source,
        })
    }
}

macro_rules! impl_composite_convert {
    ($($ty:ident),* $(,)?) => {
        $(
            impl ProtoConvert for $ty {
                type Proto = proto::$ty;

                fn to_proto(&self) -> Self::Proto {
                    proto::$ty {
                        actions: children_to_proto(&self.actions),
                        log_source: self.log_source.clone(),
                    }
                }

                fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
                    Ok(Self {
                        actions: children_from_proto(proto.actions)?,
                        log_source: proto.log_source,
                    })
                }
            }
        )*
    };
}

impl_composite_convert!(ParallelAction, SerialAction, CodependentAction);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{parallel, serial, timeout, try_action};
    use std::time::Duration;

    fn run(path: &str) -> Action {
        Action::Run(RunAction {
            path: path.to_string(),
            user: "vcap".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_nil_children_survive_round_trip() {
        let tree = serial([Some(run("/a")), None, Some(try_action(None::<Action>))]);
        let decoded = Action::from_proto(tree.to_proto()).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_multiple_variants_rejected() {
        let mut message = run("/a").to_proto();
        message.upload_action = Some(proto::UploadAction::default());

        let err = Action::from_proto(message).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RECORD");
        assert!(err.to_string().contains("2 variants"));
    }

    #[test]
    fn test_empty_message_is_nil() {
        assert_eq!(action_from_proto(proto::Action::default()).unwrap(), None);
        assert!(Action::from_proto(proto::Action::default()).is_err());
    }

    #[test]
    fn test_nested_tree_round_trip() {
        let tree = parallel([
            timeout(serial([run("/a"), run("/b")]), Duration::from_secs(5)),
            try_action(run("/c")),
        ]);
        assert_eq!(Action::from_proto(tree.to_proto()).unwrap(), tree);
    }
}
