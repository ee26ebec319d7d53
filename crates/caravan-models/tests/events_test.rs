// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Change events: keys, text form and downgrading.

mod common;

use caravan_models::{
    ActualLrpCrash, ActualLrpGroup, ActualLrpState, Change, Event, LayerType, SchemaVersion,
};
use common::{actual_lrp, desired_lrp, image_layer, task};

#[test]
fn test_event_keys() {
    let lrp = desired_lrp();
    assert_eq!(
        Event::DesiredLrpCreated(lrp.clone()).key().unwrap(),
        "process-guid"
    );
    assert_eq!(
        Event::DesiredLrpChanged(Change {
            before: lrp.clone(),
            after: lrp,
        })
        .key()
        .unwrap(),
        "process-guid"
    );
    assert_eq!(Event::TaskRemoved(task()).key().unwrap(), "task-guid");
}

#[test]
fn test_group_event_key_follows_resolution() {
    let mut evacuating = actual_lrp(ActualLrpState::Running);
    evacuating.instance_key.instance_guid = "evacuating-guid".to_string();
    let group = ActualLrpGroup {
        instance: Some(actual_lrp(ActualLrpState::Unclaimed)),
        evacuating: Some(evacuating),
    };
    assert_eq!(
        Event::ActualLrpCreated(group).key().unwrap(),
        "evacuating-guid"
    );
}

#[test]
fn test_text_form_is_adjacently_tagged() {
    let crash = ActualLrpCrash {
        key: actual_lrp(ActualLrpState::Crashed).key,
        crash_count: 2,
        crash_reason: "oom".to_string(),
        since: 5,
        ..Default::default()
    };
    let json = serde_json::to_value(Event::ActualLrpCrashed(crash.clone())).unwrap();

    assert_eq!(json["type"], "actual_lrp_crashed");
    assert_eq!(json["payload"]["crash_reason"], "oom");
    assert_eq!(json["payload"]["actual_lrp_key"]["index"], 1);

    let decoded: Event = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, Event::ActualLrpCrashed(crash));
}

#[test]
fn test_event_type_matches_tag() {
    let events = vec![
        Event::DesiredLrpRemoved(desired_lrp()),
        Event::ActualLrpRemoved(ActualLrpGroup {
            instance: Some(actual_lrp(ActualLrpState::Running)),
            evacuating: None,
        }),
        Event::TaskCreated(task()),
    ];
    for event in events {
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
    }
}

#[test]
fn test_downgrade_reaches_embedded_definitions() {
    let mut lrp = desired_lrp();
    lrp.image_layers
        .push(image_layer("dep0", "u0", "/tmp/0", LayerType::Exclusive));
    let event = Event::DesiredLrpChanged(Change {
        before: lrp.clone(),
        after: lrp.clone(),
    });

    match event.version_down_to(SchemaVersion::V1) {
        Event::DesiredLrpChanged(change) => {
            assert_eq!(change.before, lrp.version_down_to(SchemaVersion::V1));
            assert_eq!(change.after, lrp.version_down_to(SchemaVersion::V1));
            assert!(change.after.image_layers.is_empty());
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[test]
fn test_downgrade_leaves_lifecycle_events_alone() {
    let event = Event::ActualLrpCreated(ActualLrpGroup {
        instance: Some(actual_lrp(ActualLrpState::Claimed)),
        evacuating: None,
    });
    assert_eq!(event.version_down_to(SchemaVersion::V0), event);
}
