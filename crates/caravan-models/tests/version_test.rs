// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Downgrade tests: what each older schema consumer receives.

mod common;

use std::time::Duration;

use caravan_models::action::{parallel, serial, timeout};
use caravan_models::{
    Action, DesiredLrp, DownloadAction, LayerType, SchemaVersion, TimeoutAction, Validator,
};
use common::{cached_dependency, desired_lrp, image_layer, run, task};

fn timeouts(action: &Action) -> Vec<&TimeoutAction> {
    let mut found = Vec::new();
    if let Action::Timeout(t) = action {
        found.push(t);
    }
    for child in action.children().into_iter().flatten() {
        found.extend(timeouts(child));
    }
    found
}

fn layer_download(name: &str, url: &str, to: &str, user: &str) -> Action {
    Action::from(DownloadAction {
        artifact: name.to_string(),
        from: url.to_string(),
        to: to.to_string(),
        cache_key: "sha256:some-sha".to_string(),
        user: user.to_string(),
        checksum_algorithm: "sha256".to_string(),
        checksum_value: "some-sha".to_string(),
        ..Default::default()
    })
}

// ============================================================================
// Latest
// ============================================================================

#[test]
fn test_latest_is_unchanged() {
    let mut lrp = desired_lrp();
    lrp.image_layers
        .push(image_layer("dep0", "u0", "/tmp/0", LayerType::Exclusive));
    lrp.cached_dependencies.push(cached_dependency("buildpack"));

    assert_eq!(lrp.version_down_to(SchemaVersion::V3), lrp);
    assert_eq!(lrp.version_down_to(SchemaVersion::LATEST), lrp);
}

#[test]
fn test_without_layers_or_dependencies_only_timeouts_change() {
    let lrp = desired_lrp();
    assert_eq!(lrp.version_down_to(SchemaVersion::V2), lrp);
    assert_eq!(lrp.version_down_to(SchemaVersion::V1), lrp);
    assert_ne!(lrp.version_down_to(SchemaVersion::V0), lrp);
}

// ============================================================================
// Image Layers (V3 -> V2)
// ============================================================================

#[test]
fn test_exclusive_layer_becomes_setup_download() {
    common::init_tracing();
    let mut lrp = desired_lrp();
    let original_setup = lrp.setup.clone().unwrap();
    lrp.image_layers
        .push(image_layer("dep0", "u0", "/tmp/0", LayerType::Exclusive));

    let downgraded = lrp.version_down_to(SchemaVersion::V2);

    let expected = serial([
        parallel([layer_download("dep0", "u0", "/tmp/0", "the user")]),
        original_setup,
    ]);
    assert_eq!(downgraded.setup, Some(expected));
    assert!(downgraded.image_layers.is_empty());
    assert!(downgraded.cached_dependencies.is_empty());
}

#[test]
fn test_exclusive_layer_at_v0() {
    let mut lrp = desired_lrp();
    let original_setup = lrp.setup.clone().unwrap();
    lrp.image_layers
        .push(image_layer("dep0", "u0", "/tmp/0", LayerType::Exclusive));

    let downgraded = lrp.version_down_to(SchemaVersion::V0);

    let expected = serial([
        parallel([layer_download("dep0", "u0", "/tmp/0", "the user")]),
        original_setup.with_deprecated_timeout_ns(),
    ]);
    assert_eq!(downgraded.setup, Some(expected));
}

#[test]
fn test_exclusive_layer_without_setup() {
    let mut lrp = desired_lrp();
    lrp.setup = None;
    lrp.image_layers
        .push(image_layer("dep0", "u0", "/tmp/0", LayerType::Exclusive));

    let downgraded = lrp.version_down_to(SchemaVersion::V2);
    assert_eq!(
        downgraded.setup,
        Some(parallel([layer_download("dep0", "u0", "/tmp/0", "the user")]))
    );
}

#[test]
fn test_shared_layers_prepend_to_cached_dependencies() {
    let mut lrp = desired_lrp();
    lrp.cached_dependencies.push(cached_dependency("buildpack"));
    lrp.image_layers = vec![
        image_layer("first", "http://l/1", "/l/1", LayerType::Shared),
        image_layer("second", "http://l/2", "/l/2", LayerType::Shared),
    ];

    let downgraded = lrp.version_down_to(SchemaVersion::V2);

    let names: Vec<&str> = downgraded
        .cached_dependencies
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second", "buildpack"]);
    assert_eq!(downgraded.cached_dependencies[0].cache_key, "sha256:some-sha");
    assert_eq!(downgraded.cached_dependencies[0].from, "http://l/1");
    assert_eq!(downgraded.setup, lrp.setup);
}

#[test]
fn test_mixed_layers_split_by_type() {
    let mut lrp = desired_lrp();
    lrp.image_layers = vec![
        image_layer("shared", "http://l/s", "/s", LayerType::Shared),
        image_layer("mine", "http://l/m", "/m", LayerType::Exclusive),
    ];

    let downgraded = lrp.version_down_to(SchemaVersion::V2);

    assert_eq!(downgraded.cached_dependencies.len(), 1);
    assert_eq!(downgraded.cached_dependencies[0].name, "shared");
    match downgraded.setup {
        Some(Action::Serial(steps)) => {
            assert_eq!(
                steps.actions[0],
                Some(parallel([layer_download("mine", "http://l/m", "/m", "the user")]))
            );
            assert_eq!(steps.actions[1], lrp.setup);
        }
        other => panic!("unexpected setup {:?}", other),
    }
}

// ============================================================================
// Cached Dependencies (V2 -> V1)
// ============================================================================

#[test]
fn test_cached_dependencies_become_setup_downloads() {
    let mut lrp = desired_lrp();
    let original_setup = lrp.setup.clone();
    lrp.cached_dependencies = vec![cached_dependency("a"), cached_dependency("b")];

    let downgraded = lrp.version_down_to(SchemaVersion::V1);

    let mut expected = vec![Some(parallel([
        dependency_download("a"),
        dependency_download("b"),
    ]))];
    expected.push(original_setup);

    assert_eq!(downgraded.setup, Some(serial(expected)));
    assert!(downgraded.cached_dependencies.is_empty());
}

#[test]
fn test_layers_reach_v1_as_one_download_group() {
    let mut lrp = desired_lrp();
    lrp.setup = None;
    lrp.cached_dependencies.push(cached_dependency("buildpack"));
    lrp.image_layers
        .push(image_layer("shared", "http://l/s", "/s", LayerType::Shared));

    let downgraded = lrp.version_down_to(SchemaVersion::V1);

    match downgraded.setup {
        Some(Action::Serial(steps)) => {
            assert_eq!(steps.actions.len(), 1);
            let artifacts: Vec<&str> = match &steps.actions[0] {
                Some(Action::Parallel(p)) => p
                    .actions
                    .iter()
                    .flatten()
                    .map(|a| match a {
                        Action::Download(d) => d.artifact.as_str(),
                        other => panic!("unexpected action {:?}", other),
                    })
                    .collect(),
                other => panic!("unexpected action {:?}", other),
            };
            assert_eq!(artifacts, vec!["shared", "buildpack"]);
        }
        other => panic!("unexpected setup {:?}", other),
    }
    assert!(downgraded.cached_dependencies.is_empty());
    assert!(downgraded.image_layers.is_empty());
}

fn dependency_download(name: &str) -> Action {
    Action::from(DownloadAction {
        artifact: name.to_string(),
        from: format!("http://deps/{}", name),
        to: format!("/deps/{}", name),
        cache_key: format!("key-{}", name),
        log_source: "deps".to_string(),
        user: "the user".to_string(),
        ..Default::default()
    })
}

fn fully_layered() -> DesiredLrp {
    let mut lrp = desired_lrp();
    lrp.cached_dependencies.push(cached_dependency("buildpack"));
    lrp.image_layers = vec![
        image_layer("shared", "http://l/s", "/s", LayerType::Shared),
        image_layer("mine", "http://l/m", "/m", LayerType::Exclusive),
    ];
    lrp
}

#[test]
fn test_all_sources_nest_around_setup_at_v1() {
    let lrp = fully_layered();
    let original_setup = lrp.setup.clone().unwrap();

    let downgraded = lrp.version_down_to(SchemaVersion::V1);

    let expected = serial([
        parallel([
            layer_download("shared", "http://l/s", "/s", "the user"),
            dependency_download("buildpack"),
        ]),
        serial([
            parallel([layer_download("mine", "http://l/m", "/m", "the user")]),
            original_setup,
        ]),
    ]);
    assert_eq!(downgraded.setup, Some(expected));
    assert!(downgraded.cached_dependencies.is_empty());
    assert!(downgraded.image_layers.is_empty());
}

#[test]
fn test_all_sources_nest_around_setup_at_v0() {
    let lrp = fully_layered();
    let original_setup = lrp.setup.clone().unwrap();

    let downgraded = lrp.version_down_to(SchemaVersion::V0);

    let expected = serial([
        parallel([
            layer_download("shared", "http://l/s", "/s", "the user"),
            dependency_download("buildpack"),
        ]),
        serial([
            parallel([layer_download("mine", "http://l/m", "/m", "the user")]),
            original_setup.with_deprecated_timeout_ns(),
        ]),
    ]);
    assert_eq!(downgraded.setup, Some(expected));
    let setup = downgraded.setup.as_ref().unwrap();
    assert_eq!(timeouts(setup)[0].deprecated_timeout_ns, 1_500_000_000);
}

#[test]
fn test_all_sources_without_setup() {
    let mut lrp = fully_layered();
    lrp.setup = None;

    let expected = serial([
        parallel([
            layer_download("shared", "http://l/s", "/s", "the user"),
            dependency_download("buildpack"),
        ]),
        parallel([layer_download("mine", "http://l/m", "/m", "the user")]),
    ]);
    for target in [SchemaVersion::V1, SchemaVersion::V0] {
        let downgraded = lrp.version_down_to(target);
        assert_eq!(downgraded.setup, Some(expected.clone()), "target {}", target);
    }
}

// ============================================================================
// Timeouts (V1 -> V0)
// ============================================================================

#[test]
fn test_v0_fills_deprecated_timeouts_everywhere() {
    let lrp = desired_lrp();
    let downgraded = lrp.version_down_to(SchemaVersion::V0);

    let setup = downgraded.setup.as_ref().unwrap();
    let monitor = downgraded.monitor.as_ref().unwrap();
    assert_eq!(timeouts(setup)[0].deprecated_timeout_ns, 1_500_000_000);
    assert_eq!(timeouts(setup)[0].timeout_ms, 1500);
    assert_eq!(timeouts(monitor)[0].deprecated_timeout_ns, 10_000_000_000);
    assert_eq!(downgraded.deprecated_start_timeout_s, 77);
    assert_eq!(downgraded.start_timeout_ms, 77_000);
}

#[test]
fn test_v0_nested_timeouts() {
    let mut lrp = desired_lrp();
    lrp.action = Some(timeout(
        serial([timeout(run("/inner"), Duration::from_millis(20))]),
        Duration::from_secs(5),
    ));

    let downgraded = lrp.version_down_to(SchemaVersion::V0);
    let found: Vec<i64> = timeouts(downgraded.action.as_ref().unwrap())
        .iter()
        .map(|t| t.deprecated_timeout_ns)
        .collect();
    assert_eq!(found, vec![5_000_000_000, 20_000_000]);
}

#[test]
fn test_start_timeout_truncates_to_seconds() {
    let mut lrp = desired_lrp();
    lrp.start_timeout_ms = 1999;
    assert_eq!(
        lrp.version_down_to(SchemaVersion::V0).deprecated_start_timeout_s,
        1
    );
    assert_eq!(
        lrp.version_down_to(SchemaVersion::V1).deprecated_start_timeout_s,
        0
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_input_is_never_mutated() {
    let mut lrp = desired_lrp();
    lrp.cached_dependencies.push(cached_dependency("buildpack"));
    lrp.image_layers
        .push(image_layer("dep0", "u0", "/tmp/0", LayerType::Exclusive));
    let before = lrp.clone();

    for target in [SchemaVersion::V2, SchemaVersion::V1, SchemaVersion::V0] {
        let _ = lrp.version_down_to(target);
        assert_eq!(lrp, before);
    }
}

#[test]
fn test_downgrade_is_idempotent() {
    let mut lrp = desired_lrp();
    lrp.cached_dependencies.push(cached_dependency("buildpack"));
    lrp.image_layers
        .push(image_layer("dep0", "u0", "/tmp/0", LayerType::Exclusive));

    for target in [SchemaVersion::V2, SchemaVersion::V1, SchemaVersion::V0] {
        let once = lrp.version_down_to(target);
        let twice = once.version_down_to(target);
        assert_eq!(once, twice, "target {}", target);
    }
}

#[test]
fn test_downgraded_definition_still_validates() {
    let mut lrp = desired_lrp();
    lrp.cached_dependencies.push(cached_dependency("buildpack"));
    lrp.image_layers = vec![
        image_layer("shared", "http://l/s", "/s", LayerType::Shared),
        image_layer("mine", "http://l/m", "/m", LayerType::Exclusive),
    ];
    assert!(lrp.validate().is_ok());

    for target in [SchemaVersion::V2, SchemaVersion::V1, SchemaVersion::V0] {
        let downgraded: DesiredLrp = lrp.version_down_to(target);
        assert!(downgraded.validate().is_ok(), "target {}", target);
    }
}

// ============================================================================
// Tasks
// ============================================================================

#[test]
fn test_task_layers_prepend_to_action() {
    let mut task = task();
    let original_action = task.definition.action.clone().unwrap();
    task.definition
        .image_layers
        .push(image_layer("dep0", "u0", "/tmp/0", LayerType::Exclusive));

    let downgraded = task.version_down_to(SchemaVersion::V2);

    assert_eq!(
        downgraded.definition.action,
        Some(serial([
            parallel([layer_download("dep0", "u0", "/tmp/0", "the user")]),
            original_action,
        ]))
    );
    assert_eq!(downgraded.task_guid, task.task_guid);
    assert_eq!(downgraded.state, task.state);
}

#[test]
fn test_task_v0_timeouts() {
    let task = task();
    let downgraded = task.version_down_to(SchemaVersion::V0);
    let action = downgraded.definition.action.as_ref().unwrap();
    assert_eq!(timeouts(action)[0].deprecated_timeout_ns, 30_000_000_000);
    assert_eq!(task.version_down_to(SchemaVersion::V3), task);
}
