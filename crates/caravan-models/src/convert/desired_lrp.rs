// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later

use caravan_protocol::models as proto;
use std::collections::BTreeMap;

use super::{
    ProtoConvert, action_from_proto, action_to_proto, optional_enum, required_enum,
    vec_from_proto, vec_to_proto,
};
use crate::action::Action;
use crate::desired_lrp::{DesiredLrp, DesiredLrpUpdate, Routes};
use crate::error::ModelError;
use crate::image_layer::{CachedDependency, DigestAlgorithm, ImageLayer, LayerType, MediaType};
use crate::modification_tag::ModificationTag;

// ============================================================================
// Enumerations
// ============================================================================

impl From<LayerType> for proto::LayerType {
    fn from(layer_type: LayerType) -> Self {
        match layer_type {
            LayerType::Shared => proto::LayerType::Shared,
            LayerType::Exclusive => proto::LayerType::Exclusive,
        }
    }
}

impl TryFrom<proto::LayerType> for LayerType {
    type Error = ModelError;

    fn try_from(layer_type: proto::LayerType) -> Result<Self, Self::Error> {
        match layer_type {
            proto::LayerType::Shared => Ok(LayerType::Shared),
            proto::LayerType::Exclusive => Ok(LayerType::Exclusive),
            proto::LayerType::Invalid => Err(ModelError::invalid_record("layer_type is not set")),
        }
    }
}

impl From<MediaType> for proto::MediaType {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Tgz => proto::MediaType::Tgz,
            MediaType::Tar => proto::MediaType::Tar,
            MediaType::Zip => proto::MediaType::Zip,
        }
    }
}

fn media_type_from_proto(value: i32) -> Result<Option<MediaType>, ModelError> {
    Ok(
        optional_enum::<proto::MediaType>(value, "media_type")?.and_then(|media_type| {
            match media_type {
                proto::MediaType::Tgz => Some(MediaType::Tgz),
                proto::MediaType::Tar => Some(MediaType::Tar),
                proto::MediaType::Zip => Some(MediaType::Zip),
                proto::MediaType::Invalid => None,
            }
        }),
    )
}

impl From<DigestAlgorithm> for proto::DigestAlgorithm {
    fn from(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Sha256 => proto::DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha512 => proto::DigestAlgorithm::Sha512,
        }
    }
}

fn digest_algorithm_from_proto(value: i32) -> Result<Option<DigestAlgorithm>, ModelError> {
    Ok(
        optional_enum::<proto::DigestAlgorithm>(value, "digest_algorithm")?.and_then(
            |algorithm| match algorithm {
                proto::DigestAlgorithm::Sha256 => Some(DigestAlgorithm::Sha256),
                proto::DigestAlgorithm::Sha512 => Some(DigestAlgorithm::Sha512),
                proto::DigestAlgorithm::Invalid => None,
            },
        ),
    )
}

// ============================================================================
// Routes
// ============================================================================

/// Route values travel as their JSON text.
pub(super) fn routes_to_proto(routes: &Routes) -> BTreeMap<String, Vec<u8>> {
    routes
        .iter()
        .map(|(name, value)| (name.clone(), value.to_string().into_bytes()))
        .collect()
}

pub(super) fn routes_from_proto(routes: BTreeMap<String, Vec<u8>>) -> Result<Routes, ModelError> {
    routes
        .into_iter()
        .map(|(name, raw)| -> Result<_, ModelError> {
            Ok((name, serde_json::from_slice(&raw)?))
        })
        .collect()
}

// ============================================================================
// Dependencies
// ============================================================================

impl ProtoConvert for CachedDependency {
    type Proto = proto::CachedDependency;

    fn to_proto(&self) -> Self::Proto {
        proto::CachedDependency {
            name: self.name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            cache_key: self.cache_key.clone(),
            log_source: self.log_source.clone(),
            checksum_algorithm: self.checksum_algorithm.clone(),
            checksum_value: self.checksum_value.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            name: proto.name,
            from: proto.from,
            to: proto.to,
            cache_key: proto.cache_key,
            log_source: proto.log_source,
            checksum_algorithm: proto.checksum_algorithm,
            checksum_value: proto.checksum_value,
        })
    }
}

impl ProtoConvert for ImageLayer {
    type Proto = proto::ImageLayer;

    fn to_proto(&self) -> Self::Proto {
        proto::ImageLayer {
            name: self.name.clone(),
            url: self.url.clone(),
            destination_path: self.destination_path.clone(),
            layer_type: proto::LayerType::from(self.layer_type) as i32,
            media_type: self
                .media_type
                .map_or(0, |media_type| proto::MediaType::from(media_type) as i32),
            digest_algorithm: self
                .digest_algorithm
                .map_or(0, |algorithm| proto::DigestAlgorithm::from(algorithm) as i32),
            digest_value: self.digest_value.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        let layer_type =
            LayerType::try_from(required_enum::<proto::LayerType>(proto.layer_type, "layer_type")?)?;
        Ok(Self {
            name: proto.name,
            url: proto.url,
            destination_path: proto.destination_path,
            layer_type,
            media_type: media_type_from_proto(proto.media_type)?,
            digest_algorithm: digest_algorithm_from_proto(proto.digest_algorithm)?,
            digest_value: proto.digest_value,
        })
    }
}

// ============================================================================
// Desired LRP
// ============================================================================

pub(super) fn optional_action_to_proto(action: &Option<Action>) -> Option<proto::Action> {
    action.as_ref().map(|action| action_to_proto(Some(action)))
}

pub(super) fn optional_action_from_proto(
    message: Option<proto::Action>,
) -> Result<Option<Action>, ModelError> {
    Ok(message.map(action_from_proto).transpose()?.flatten())
}

impl ProtoConvert for DesiredLrp {
    type Proto = proto::DesiredLrp;

    fn to_proto(&self) -> Self::Proto {
        proto::DesiredLrp {
            process_guid: self.process_guid.clone(),
            domain: self.domain.clone(),
            root_fs: self.root_fs.clone(),
            instances: self.instances,
            environment_variables: vec_to_proto(&self.environment_variables),
            setup: optional_action_to_proto(&self.setup),
            action: optional_action_to_proto(&self.action),
            start_timeout_ms: self.start_timeout_ms,
            deprecated_start_timeout_s: self.deprecated_start_timeout_s,
            monitor: optional_action_to_proto(&self.monitor),
            disk_mb: self.disk_mb,
            memory_mb: self.memory_mb,
            cpu_weight: self.cpu_weight,
            privileged: self.privileged,
            ports: self.ports.clone(),
            routes: routes_to_proto(&self.routes),
            log_source: self.log_source.clone(),
            log_guid: self.log_guid.clone(),
            metrics_guid: self.metrics_guid.clone(),
            annotation: self.annotation.clone(),
            modification_tag: Some(self.modification_tag.to_proto()),
            cached_dependencies: vec_to_proto(&self.cached_dependencies),
            legacy_download_user: self.legacy_download_user.clone(),
            placement_tags: self.placement_tags.clone(),
            image_layers: vec_to_proto(&self.image_layers),
            max_pids: self.max_pids,
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            process_guid: proto.process_guid,
            domain: proto.domain,
            root_fs: proto.root_fs,
            instances: proto.instances,
            environment_variables: vec_from_proto(proto.environment_variables)?,
            setup: optional_action_from_proto(proto.setup)?,
            action: optional_action_from_proto(proto.action)?,
            start_timeout_ms: proto.start_timeout_ms,
            deprecated_start_timeout_s: proto.deprecated_start_timeout_s,
            monitor: optional_action_from_proto(proto.monitor)?,
            disk_mb: proto.disk_mb,
            memory_mb: proto.memory_mb,
            cpu_weight: proto.cpu_weight,
            privileged: proto.privileged,
            ports: proto.ports,
            routes: routes_from_proto(proto.routes)?,
            log_source: proto.log_source,
            log_guid: proto.log_guid,
            metrics_guid: proto.metrics_guid,
            annotation: proto.annotation,
            modification_tag: proto
                .modification_tag
                .map(ModificationTag::from_proto)
                .transpose()?
                .unwrap_or_default(),
            cached_dependencies: vec_from_proto(proto.cached_dependencies)?,
            legacy_download_user: proto.legacy_download_user,
            placement_tags: proto.placement_tags,
            image_layers: vec_from_proto(proto.image_layers)?,
            max_pids: proto.max_pids,
        })
    }
}

impl ProtoConvert for DesiredLrpUpdate {
    type Proto = proto::DesiredLrpUpdate;

    fn to_proto(&self) -> Self::Proto {
        proto::DesiredLrpUpdate {
            instances: self.instances,
            routes: self.routes.as_ref().map(|routes| proto::Routes {
                routes: routes_to_proto(routes),
            }),
            annotation: self.annotation.clone(),
        }
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, ModelError> {
        Ok(Self {
            instances: proto.instances,
            routes: proto
                .routes
                .map(|routes| routes_from_proto(routes.routes))
                .transpose()?,
            annotation: proto.annotation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_travel_as_json_text() {
        let mut routes = Routes::new();
        routes.insert("http".to_string(), serde_json::json!([{"hostnames": ["a.example"]}]));

        let encoded = routes_to_proto(&routes);
        assert_eq!(encoded["http"], br#"[{"hostnames":["a.example"]}]"#.to_vec());
        assert_eq!(routes_from_proto(encoded).unwrap(), routes);
    }

    #[test]
    fn test_malformed_route_is_json_error() {
        let mut encoded = BTreeMap::new();
        encoded.insert("http".to_string(), b"{not json".to_vec());
        let err = routes_from_proto(encoded).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_JSON_MESSAGE");
    }

    #[test]
    fn test_layer_without_type_rejected() {
        let message = proto::ImageLayer {
            url: "u".to_string(),
            ..Default::default()
        };
        let err = ImageLayer::from_proto(message).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_RECORD");
    }

    #[test]
    fn test_unknown_digest_algorithm_rejected() {
        let message = proto::ImageLayer {
            layer_type: proto::LayerType::Shared as i32,
            digest_algorithm: 17,
            ..Default::default()
        };
        assert!(ImageLayer::from_proto(message).is_err());
    }
}
