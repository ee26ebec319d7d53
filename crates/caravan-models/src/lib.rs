// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Caravan Models - execution recipes, instance lifecycle and schema evolution
//!
//! This crate is the data-model core of the caravan control plane:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      caravan-models                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Entities: DesiredLrp, ActualLrp(Group), Task, Event        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Action tree + validation    │  Downgrade engine (V3..V0)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Wire: serde JSON  │  ProtoConvert <-> caravan-protocol     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is a pure value transformation: no I/O, no clocks, no
//! shared state. Callers decode or build entities, call
//! [`Validator::validate`] before persisting, and call `version_down_to`
//! before handing a definition to an older consumer.
//!
//! # Usage
//!
//! ```ignore
//! use caravan_models::{DesiredLrp, SchemaVersion, Validator, action};
//! use std::time::Duration;
//!
//! let lrp = DesiredLrp {
//!     process_guid: "web".into(),
//!     domain: "apps".into(),
//!     root_fs: "preloaded:cflinuxfs4".into(),
//!     action: Some(action::timeout(start_server, Duration::from_secs(60))),
//!     ..Default::default()
//! };
//! lrp.validate()?;
//!
//! let legacy = lrp.version_down_to(SchemaVersion::V0);
//! ```

pub mod action;
pub mod actual_lrp;
pub mod common;
pub mod config;
pub mod convert;
pub mod desired_lrp;
pub mod error;
pub mod events;
pub mod format;
pub mod image_layer;
pub mod modification_tag;
pub mod restart;
pub mod task;
pub mod validation;
pub mod version;

pub use action::{
    Action, ActionInterface, CodependentAction, DownloadAction, EmitProgressAction,
    ParallelAction, RunAction, SerialAction, TimeoutAction, TryAction, UploadAction,
    unwrap_action, wrap_action,
};
pub use actual_lrp::{
    ActualLrp, ActualLrpGroup, ActualLrpInstanceKey, ActualLrpKey, ActualLrpNetInfo,
    ActualLrpState, PortMapping,
};
pub use common::{EnvironmentVariable, ResourceLimits};
pub use config::{ConfigError, ModelsConfig};
pub use convert::ProtoConvert;
pub use desired_lrp::{
    DesiredLrp, DesiredLrpKey, DesiredLrpResource, DesiredLrpSchedulingInfo, DesiredLrpUpdate,
    Routes,
};
pub use error::{ModelError, Result};
pub use events::{ActualLrpCrash, Change, Event};
pub use format::WireEntity;
pub use image_layer::{CachedDependency, DigestAlgorithm, ImageLayer, LayerType, MediaType};
pub use modification_tag::ModificationTag;
pub use restart::{RestartCalculator, RestartPolicy, RestartPolicyError};
pub use task::{Task, TaskDefinition, TaskState};
pub use validation::{FieldViolation, ValidationError, Validator};
pub use version::SchemaVersion;
