// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
// @generated
// Generated from: proto/models.proto
// Manual check-in for offline builds.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EnvironmentVariable {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResourceLimits {
    #[prost(uint64, optional, tag = "1")]
    pub nofile: ::core::option::Option<u64>,
    #[prost(uint64, optional, tag = "2")]
    pub nproc: ::core::option::Option<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DownloadAction {
    #[prost(string, tag = "1")]
    pub artifact: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub from: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub cache_key: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub log_source: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub user: ::prost::alloc::string::String,
    #[prost(string, tag = "7")]
    pub checksum_algorithm: ::prost::alloc::string::String,
    #[prost(string, tag = "8")]
    pub checksum_value: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UploadAction {
    #[prost(string, tag = "1")]
    pub artifact: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub from: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub log_source: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub user: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunAction {
    #[prost(string, tag = "1")]
    pub path: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "2")]
    pub args: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(string, tag = "3")]
    pub dir: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "4")]
    pub env: ::prost::alloc::vec::Vec<EnvironmentVariable>,
    #[prost(message, optional, tag = "5")]
    pub resource_limits: ::core::option::Option<ResourceLimits>,
    #[prost(string, tag = "6")]
    pub user: ::prost::alloc::string::String,
    #[prost(string, tag = "7")]
    pub log_source: ::prost::alloc::string::String,
    #[prost(bool, tag = "8")]
    pub suppress_log_output: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TimeoutAction {
    #[prost(message, optional, boxed, tag = "1")]
    pub action: ::core::option::Option<::prost::alloc::boxed::Box<Action>>,
    #[prost(int64, tag = "2")]
    pub deprecated_timeout_ns: i64,
    #[prost(string, tag = "3")]
    pub log_source: ::prost::alloc::string::String,
    #[prost(int64, tag = "4")]
    pub timeout_ms: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EmitProgressAction {
    #[prost(message, optional, boxed, tag = "1")]
    pub action: ::core::option::Option<::prost::alloc::boxed::Box<Action>>,
    #[prost(string, tag = "2")]
    pub start_message: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub success_message: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub failure_message_prefix: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub log_source: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TryAction {
    #[prost(message, optional, boxed, tag = "1")]
    pub action: ::core::option::Option<::prost::alloc::boxed::Box<Action>>,
    #[prost(string, tag = "2")]
    pub log_source: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParallelAction {
    #[prost(message, repeated, tag = "1")]
    pub actions: ::prost::alloc::vec::Vec<Action>,
    #[prost(string, tag = "2")]
    pub log_source: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SerialAction {
    #[prost(message, repeated, tag = "1")]
    pub actions: ::prost::alloc::vec::Vec<Action>,
    #[prost(string, tag = "2")]
    pub log_source: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CodependentAction {
    #[prost(message, repeated, tag = "1")]
    pub actions: ::prost::alloc::vec::Vec<Action>,
    #[prost(string, tag = "2")]
    pub log_source: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Action {
    #[prost(message, optional, tag = "1")]
    pub download_action: ::core::option::Option<DownloadAction>,
    #[prost(message, optional, tag = "2")]
    pub upload_action: ::core::option::Option<UploadAction>,
    #[prost(message, optional, tag = "3")]
    pub run_action: ::core::option::Option<RunAction>,
    #[prost(message, optional, tag = "4")]
    pub timeout_action: ::core::option::Option<TimeoutAction>,
    #[prost(message, optional, tag = "5")]
    pub emit_progress_action: ::core::option::Option<EmitProgressAction>,
    #[prost(message, optional, tag = "6")]
    pub try_action: ::core::option::Option<TryAction>,
    #[prost(message, optional, tag = "7")]
    pub parallel_action: ::core::option::Option<ParallelAction>,
    #[prost(message, optional, tag = "8")]
    pub serial_action: ::core::option::Option<SerialAction>,
    #[prost(message, optional, tag = "9")]
    pub codependent_action: ::core::option::Option<CodependentAction>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CachedDependency {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub from: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub to: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub cache_key: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub log_source: ::prost::alloc::string::String,
    #[prost(string, tag = "6")]
    pub checksum_algorithm: ::prost::alloc::string::String,
    #[prost(string, tag = "7")]
    pub checksum_value: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ImageLayer {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub url: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub destination_path: ::prost::alloc::string::String,
    #[prost(enumeration = "LayerType", tag = "4")]
    pub layer_type: i32,
    #[prost(enumeration = "MediaType", tag = "5")]
    pub media_type: i32,
    #[prost(enumeration = "DigestAlgorithm", tag = "6")]
    pub digest_algorithm: i32,
    #[prost(string, tag = "7")]
    pub digest_value: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModificationTag {
    #[prost(string, tag = "1")]
    pub epoch: ::prost::alloc::string::String,
    #[prost(uint32, tag = "2")]
    pub index: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Routes {
    #[prost(btree_map = "string, bytes", tag = "1")]
    pub routes:
        ::prost::alloc::collections::BTreeMap<::prost::alloc::string::String, ::prost::alloc::vec::Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DesiredLrp {
    #[prost(string, tag = "1")]
    pub process_guid: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub domain: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub root_fs: ::prost::alloc::string::String,
    #[prost(int32, tag = "4")]
    pub instances: i32,
    #[prost(message, repeated, tag = "5")]
    pub environment_variables: ::prost::alloc::vec::Vec<EnvironmentVariable>,
    #[prost(message, optional, tag = "6")]
    pub setup: ::core::option::Option<Action>,
    #[prost(message, optional, tag = "7")]
    pub action: ::core::option::Option<Action>,
    #[prost(int64, tag = "8")]
    pub start_timeout_ms: i64,
    #[prost(uint32, tag = "9")]
    pub deprecated_start_timeout_s: u32,
    #[prost(message, optional, tag = "10")]
    pub monitor: ::core::option::Option<Action>,
    #[prost(int32, tag = "11")]
    pub disk_mb: i32,
    #[prost(int32, tag = "12")]
    pub memory_mb: i32,
    #[prost(uint32, tag = "13")]
    pub cpu_weight: u32,
    #[prost(bool, tag = "14")]
    pub privileged: bool,
    #[prost(uint32, repeated, tag = "15")]
    pub ports: ::prost::alloc::vec::Vec<u32>,
    #[prost(btree_map = "string, bytes", tag = "16")]
    pub routes:
        ::prost::alloc::collections::BTreeMap<::prost::alloc::string::String, ::prost::alloc::vec::Vec<u8>>,
    #[prost(string, tag = "17")]
    pub log_source: ::prost::alloc::string::String,
    #[prost(string, tag = "18")]
    pub log_guid: ::prost::alloc::string::String,
    #[prost(string, tag = "19")]
    pub metrics_guid: ::prost::alloc::string::String,
    #[prost(string, tag = "20")]
    pub annotation: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "21")]
    pub modification_tag: ::core::option::Option<ModificationTag>,
    #[prost(message, repeated, tag = "22")]
    pub cached_dependencies: ::prost::alloc::vec::Vec<CachedDependency>,
    #[prost(string, tag = "23")]
    pub legacy_download_user: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "24")]
    pub placement_tags: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "25")]
    pub image_layers: ::prost::alloc::vec::Vec<ImageLayer>,
    #[prost(int32, tag = "26")]
    pub max_pids: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DesiredLrpUpdate {
    #[prost(int32, optional, tag = "1")]
    pub instances: ::core::option::Option<i32>,
    #[prost(message, optional, tag = "2")]
    pub routes: ::core::option::Option<Routes>,
    #[prost(string, optional, tag = "3")]
    pub annotation: ::core::option::Option<::prost::alloc::string::String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TaskDefinition {
    #[prost(string, tag = "1")]
    pub root_fs: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub environment_variables: ::prost::alloc::vec::Vec<EnvironmentVariable>,
    #[prost(message, optional, tag = "3")]
    pub action: ::core::option::Option<Action>,
    #[prost(int32, tag = "4")]
    pub disk_mb: i32,
    #[prost(int32, tag = "5")]
    pub memory_mb: i32,
    #[prost(uint32, tag = "6")]
    pub cpu_weight: u32,
    #[prost(bool, tag = "7")]
    pub privileged: bool,
    #[prost(string, tag = "8")]
    pub log_source: ::prost::alloc::string::String,
    #[prost(string, tag = "9")]
    pub log_guid: ::prost::alloc::string::String,
    #[prost(string, tag = "10")]
    pub metrics_guid: ::prost::alloc::string::String,
    #[prost(string, tag = "11")]
    pub result_file: ::prost::alloc::string::String,
    #[prost(string, tag = "12")]
    pub completion_callback_url: ::prost::alloc::string::String,
    #[prost(string, tag = "13")]
    pub annotation: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "14")]
    pub cached_dependencies: ::prost::alloc::vec::Vec<CachedDependency>,
    #[prost(string, tag = "15")]
    pub legacy_download_user: ::prost::alloc::string::String,
    #[prost(string, repeated, tag = "16")]
    pub placement_tags: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    #[prost(message, repeated, tag = "17")]
    pub image_layers: ::prost::alloc::vec::Vec<ImageLayer>,
    #[prost(int32, tag = "18")]
    pub max_pids: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Task {
    #[prost(message, optional, tag = "1")]
    pub task_definition: ::core::option::Option<TaskDefinition>,
    #[prost(string, tag = "2")]
    pub task_guid: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub domain: ::prost::alloc::string::String,
    #[prost(int64, tag = "4")]
    pub created_at: i64,
    #[prost(int64, tag = "5")]
    pub updated_at: i64,
    #[prost(int64, tag = "6")]
    pub first_completed_at: i64,
    #[prost(enumeration = "TaskState", tag = "7")]
    pub state: i32,
    #[prost(string, tag = "8")]
    pub cell_id: ::prost::alloc::string::String,
    #[prost(string, tag = "9")]
    pub result: ::prost::alloc::string::String,
    #[prost(bool, tag = "10")]
    pub failed: bool,
    #[prost(string, tag = "11")]
    pub failure_reason: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActualLrpKey {
    #[prost(string, tag = "1")]
    pub process_guid: ::prost::alloc::string::String,
    #[prost(int32, tag = "2")]
    pub index: i32,
    #[prost(string, tag = "3")]
    pub domain: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActualLrpInstanceKey {
    #[prost(string, tag = "1")]
    pub instance_guid: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub cell_id: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PortMapping {
    #[prost(uint32, tag = "1")]
    pub container_port: u32,
    #[prost(uint32, tag = "2")]
    pub host_port: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActualLrpNetInfo {
    #[prost(string, tag = "1")]
    pub address: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub ports: ::prost::alloc::vec::Vec<PortMapping>,
    #[prost(string, tag = "3")]
    pub instance_address: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActualLrp {
    #[prost(message, optional, tag = "1")]
    pub actual_lrp_key: ::core::option::Option<ActualLrpKey>,
    #[prost(message, optional, tag = "2")]
    pub actual_lrp_instance_key: ::core::option::Option<ActualLrpInstanceKey>,
    #[prost(message, optional, tag = "3")]
    pub actual_lrp_net_info: ::core::option::Option<ActualLrpNetInfo>,
    #[prost(int32, tag = "4")]
    pub crash_count: i32,
    #[prost(string, tag = "5")]
    pub crash_reason: ::prost::alloc::string::String,
    #[prost(enumeration = "ActualLrpState", tag = "6")]
    pub state: i32,
    #[prost(string, tag = "7")]
    pub placement_error: ::prost::alloc::string::String,
    #[prost(int64, tag = "8")]
    pub since: i64,
    #[prost(message, optional, tag = "9")]
    pub modification_tag: ::core::option::Option<ModificationTag>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ActualLrpGroup {
    #[prost(message, optional, tag = "1")]
    pub instance: ::core::option::Option<ActualLrp>,
    #[prost(message, optional, tag = "2")]
    pub evacuating: ::core::option::Option<ActualLrp>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum LayerType {
    Invalid = 0,
    Shared = 1,
    Exclusive = 2,
}
impl LayerType {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Invalid => "LAYER_TYPE_INVALID",
            Self::Shared => "LAYER_TYPE_SHARED",
            Self::Exclusive => "LAYER_TYPE_EXCLUSIVE",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "LAYER_TYPE_INVALID" => Some(Self::Invalid),
            "LAYER_TYPE_SHARED" => Some(Self::Shared),
            "LAYER_TYPE_EXCLUSIVE" => Some(Self::Exclusive),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MediaType {
    Invalid = 0,
    Tgz = 1,
    Tar = 2,
    Zip = 3,
}
impl MediaType {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Invalid => "MEDIA_TYPE_INVALID",
            Self::Tgz => "MEDIA_TYPE_TGZ",
            Self::Tar => "MEDIA_TYPE_TAR",
            Self::Zip => "MEDIA_TYPE_ZIP",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "MEDIA_TYPE_INVALID" => Some(Self::Invalid),
            "MEDIA_TYPE_TGZ" => Some(Self::Tgz),
            "MEDIA_TYPE_TAR" => Some(Self::Tar),
            "MEDIA_TYPE_ZIP" => Some(Self::Zip),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DigestAlgorithm {
    Invalid = 0,
    Sha256 = 1,
    Sha512 = 2,
}
impl DigestAlgorithm {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Invalid => "DIGEST_ALGORITHM_INVALID",
            Self::Sha256 => "DIGEST_ALGORITHM_SHA256",
            Self::Sha512 => "DIGEST_ALGORITHM_SHA512",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "DIGEST_ALGORITHM_INVALID" => Some(Self::Invalid),
            "DIGEST_ALGORITHM_SHA256" => Some(Self::Sha256),
            "DIGEST_ALGORITHM_SHA512" => Some(Self::Sha512),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TaskState {
    Invalid = 0,
    Pending = 1,
    Running = 2,
    Completed = 3,
    Resolving = 4,
}
impl TaskState {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Invalid => "TASK_STATE_INVALID",
            Self::Pending => "TASK_STATE_PENDING",
            Self::Running => "TASK_STATE_RUNNING",
            Self::Completed => "TASK_STATE_COMPLETED",
            Self::Resolving => "TASK_STATE_RESOLVING",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "TASK_STATE_INVALID" => Some(Self::Invalid),
            "TASK_STATE_PENDING" => Some(Self::Pending),
            "TASK_STATE_RUNNING" => Some(Self::Running),
            "TASK_STATE_COMPLETED" => Some(Self::Completed),
            "TASK_STATE_RESOLVING" => Some(Self::Resolving),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ActualLrpState {
    Invalid = 0,
    Unclaimed = 1,
    Claimed = 2,
    Running = 3,
    Crashed = 4,
}
impl ActualLrpState {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Invalid => "ACTUAL_LRP_STATE_INVALID",
            Self::Unclaimed => "ACTUAL_LRP_STATE_UNCLAIMED",
            Self::Claimed => "ACTUAL_LRP_STATE_CLAIMED",
            Self::Running => "ACTUAL_LRP_STATE_RUNNING",
            Self::Crashed => "ACTUAL_LRP_STATE_CRASHED",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "ACTUAL_LRP_STATE_INVALID" => Some(Self::Invalid),
            "ACTUAL_LRP_STATE_UNCLAIMED" => Some(Self::Unclaimed),
            "ACTUAL_LRP_STATE_CLAIMED" => Some(Self::Claimed),
            "ACTUAL_LRP_STATE_RUNNING" => Some(Self::Running),
            "ACTUAL_LRP_STATE_CRASHED" => Some(Self::Crashed),
            _ => None,
        }
    }
}
