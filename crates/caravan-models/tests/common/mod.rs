// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared fixtures for caravan-models integration tests.

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use caravan_models::action::{parallel, serial, timeout, try_action};
use caravan_models::{
    Action, ActualLrp, ActualLrpInstanceKey, ActualLrpKey, ActualLrpNetInfo, ActualLrpState,
    CachedDependency, DesiredLrp, DigestAlgorithm, DownloadAction, EnvironmentVariable,
    ImageLayer, LayerType, MediaType, ModificationTag, PortMapping, RunAction, Task,
    TaskDefinition, TaskState,
};

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn run(path: &str) -> Action {
    Action::Run(RunAction {
        path: path.to_string(),
        user: "vcap".to_string(),
        ..Default::default()
    })
}

pub fn download(from: &str, to: &str) -> Action {
    Action::Download(DownloadAction {
        from: from.to_string(),
        to: to.to_string(),
        user: "vcap".to_string(),
        ..Default::default()
    })
}

/// A desired LRP using every action position and several timeouts.
pub fn desired_lrp() -> DesiredLrp {
    let mut routes = caravan_models::Routes::new();
    routes.insert(
        "http-router".to_string(),
        serde_json::json!([{"hostnames": ["app.example.com"], "port": 8080}]),
    );

    DesiredLrp {
        process_guid: "process-guid".to_string(),
        domain: "some-domain".to_string(),
        root_fs: "docker:///busybox".to_string(),
        instances: 3,
        environment_variables: vec![EnvironmentVariable::new("PORT", "8080")],
        setup: Some(serial([
            download("http://example.com/app.tgz", "/app"),
            timeout(run("/app/prepare"), Duration::from_millis(1500)),
        ])),
        action: Some(parallel([
            run("/app/server"),
            try_action(run("/app/sidecar")),
        ])),
        start_timeout_ms: 77_000,
        monitor: Some(timeout(run("/app/healthcheck"), Duration::from_secs(10))),
        disk_mb: 512,
        memory_mb: 256,
        cpu_weight: 50,
        ports: vec![8080, 9090],
        routes,
        log_guid: "log-guid".to_string(),
        annotation: "some annotation".to_string(),
        modification_tag: ModificationTag::new("some-epoch", 3),
        legacy_download_user: "the user".to_string(),
        placement_tags: vec!["red".to_string()],
        ..Default::default()
    }
}

pub fn cached_dependency(name: &str) -> CachedDependency {
    CachedDependency {
        name: name.to_string(),
        from: format!("http://deps/{}", name),
        to: format!("/deps/{}", name),
        cache_key: format!("key-{}", name),
        log_source: "deps".to_string(),
        ..Default::default()
    }
}

pub fn image_layer(
    name: &str,
    url: &str,
    destination: &str,
    layer_type: LayerType,
) -> ImageLayer {
    ImageLayer {
        name: name.to_string(),
        url: url.to_string(),
        destination_path: destination.to_string(),
        layer_type,
        media_type: Some(MediaType::Tgz),
        digest_algorithm: Some(DigestAlgorithm::Sha256),
        digest_value: "some-sha".to_string(),
    }
}

pub fn actual_lrp(state: ActualLrpState) -> ActualLrp {
    let mut lrp = ActualLrp {
        key: ActualLrpKey::new("process-guid", 1, "some-domain"),
        state,
        since: 1_700_000_000_000_000_000,
        modification_tag: ModificationTag::new("epoch", 1),
        ..Default::default()
    };
    match state {
        ActualLrpState::Claimed => {
            lrp.instance_key = ActualLrpInstanceKey::new("instance-a", "cell-a");
        }
        ActualLrpState::Running => {
            lrp.instance_key = ActualLrpInstanceKey::new("instance-a", "cell-a");
            lrp.net_info =
                ActualLrpNetInfo::new("10.0.0.1", vec![PortMapping::new(8080, 61001)]);
        }
        ActualLrpState::Crashed => {
            lrp.crash_count = 4;
            lrp.crash_reason = "exit status 1".to_string();
        }
        ActualLrpState::Unclaimed => {}
    }
    lrp
}

pub fn task() -> Task {
    Task {
        task_guid: "task-guid".to_string(),
        domain: "some-domain".to_string(),
        state: TaskState::Pending,
        created_at: 1_700_000_000_000_000_000,
        definition: TaskDefinition {
            root_fs: "preloaded:cflinuxfs4".to_string(),
            action: Some(timeout(run("/bin/migrate"), Duration::from_secs(30))),
            memory_mb: 128,
            result_file: "/tmp/result".to_string(),
            legacy_download_user: "the user".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}
