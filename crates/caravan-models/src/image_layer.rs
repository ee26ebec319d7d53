// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cached dependencies and image layers.
//!
//! Both describe an artifact placed into the container filesystem before the
//! setup action runs. Cached dependencies are the older construct; image
//! layers replaced them and add a Shared/Exclusive distinction and a content
//! digest. Older consumers only understand the former, see [`crate::version`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::{DownloadAction, validate_checksum};
use crate::validation::{ValidationError, Validator};

// ============================================================================
// Cached Dependency
// ============================================================================

/// An artifact downloaded once per cell and bind-mounted into containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachedDependency {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub from: String,
    pub to: String,
    pub cache_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log_source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum_algorithm: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub checksum_value: String,
}

impl CachedDependency {
    /// The download action an older consumer runs in place of this dependency.
    pub fn to_download_action(&self, user: &str) -> DownloadAction {
        DownloadAction {
            artifact: self.name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            cache_key: self.cache_key.clone(),
            log_source: self.log_source.clone(),
            user: user.to_string(),
            checksum_algorithm: self.checksum_algorithm.clone(),
            checksum_value: self.checksum_value.clone(),
        }
    }
}

impl Validator for CachedDependency {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.from.is_empty() {
            errors = errors.invalid_field("from");
        }
        if self.to.is_empty() {
            errors = errors.invalid_field("to");
        }
        validate_checksum(errors, &self.checksum_algorithm, &self.checksum_value).into_result()
    }
}

// ============================================================================
// Image Layer Enumerations
// ============================================================================

/// Whether a layer may be shared between containers on a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerType {
    #[default]
    Shared,
    Exclusive,
}

/// Archive format of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Tgz,
    Tar,
    Zip,
}

/// Hash used for a layer's content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DigestAlgorithm {
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    /// Lowercase name, as used in cache keys and download checksums.
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Image Layer
// ============================================================================

/// A filesystem layer applied to the container root before setup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageLayer {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub url: String,
    pub destination_path: String,
    pub layer_type: LayerType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_algorithm: Option<DigestAlgorithm>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub digest_value: String,
}

impl ImageLayer {
    pub fn is_exclusive(&self) -> bool {
        self.layer_type == LayerType::Exclusive
    }

    /// `"<algorithm>:<digest>"` when a digest is present, the source URL otherwise.
    pub fn cache_key(&self) -> String {
        match self.digest() {
            Some((algorithm, value)) => format!("{}:{}", algorithm, value),
            None => self.url.clone(),
        }
    }

    fn digest(&self) -> Option<(DigestAlgorithm, &str)> {
        match self.digest_algorithm {
            Some(algorithm) if !self.digest_value.is_empty() => {
                Some((algorithm, self.digest_value.as_str()))
            }
            _ => None,
        }
    }

    fn checksum(&self) -> (String, String) {
        self.digest()
            .map(|(algorithm, value)| (algorithm.as_str().to_string(), value.to_string()))
            .unwrap_or_default()
    }

    /// The cached dependency an older consumer uses in place of a shared layer.
    pub fn to_cached_dependency(&self) -> CachedDependency {
        let (checksum_algorithm, checksum_value) = self.checksum();
        CachedDependency {
            name: self.name.clone(),
            from: self.url.clone(),
            to: self.destination_path.clone(),
            cache_key: self.cache_key(),
            log_source: String::new(),
            checksum_algorithm,
            checksum_value,
        }
    }

    /// The download action an older consumer runs in place of this layer.
    pub fn to_download_action(&self, user: &str) -> DownloadAction {
        let (checksum_algorithm, checksum_value) = self.checksum();
        DownloadAction {
            artifact: self.name.clone(),
            from: self.url.clone(),
            to: self.destination_path.clone(),
            cache_key: self.cache_key(),
            log_source: String::new(),
            user: user.to_string(),
            checksum_algorithm,
            checksum_value,
        }
    }
}

impl Validator for ImageLayer {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.url.is_empty() {
            errors = errors.invalid_field("url");
        }
        if self.destination_path.is_empty() {
            errors = errors.invalid_field("destination_path");
        }
        if self.media_type.is_none() {
            errors = errors.invalid_field("media_type");
        }

        match (self.digest_algorithm.is_some(), self.digest_value.is_empty()) {
            (true, true) => errors = errors.invalid_field("digest_value"),
            (false, false) => errors = errors.invalid_field("digest_algorithm"),
            (false, true) if self.is_exclusive() => {
                errors = errors
                    .invalid_field("digest_algorithm")
                    .invalid_field("digest_value");
            }
            _ => {}
        }

        errors.into_result()
    }
}
