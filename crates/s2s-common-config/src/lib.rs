// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the Snap2Snomed identity functions.
//!
//! This crate provides:
//! - Layered configuration from defaults, an optional TOML file, and the
//!   environment (`S2S_*`, plus the legacy unprefixed names)
//! - Type-safe resolved configuration with validation
//!
//! # Usage
//!
//! ```ignore
//! use s2s_common_config::load_config;
//!
//! let config = load_config()?;
//! let policy = config.link_policy();
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, CONFIG_FILE_ENV};

use s2s_auth_core::{LinkPolicy, MAX_PAGE_LIMIT};
use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresignupConfig {
	pub linking: LinkingConfig,
	pub directory: DirectoryConfig,
	pub logging: LoggingConfig,
}

impl PresignupConfig {
	/// The resolver policy this configuration describes.
	pub fn link_policy(&self) -> LinkPolicy {
		LinkPolicy {
			require_verified_email: self.linking.require_verified_email,
			primary_provider: self.linking.primary_provider.clone(),
			linked_provider: self.linking.linked_provider.clone(),
			page_limit: self.directory.page_limit,
		}
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables
/// 2. Config file named by `S2S_CONFIG_FILE`, when set
/// 3. Built-in defaults
pub fn load_config() -> Result<PresignupConfig, ConfigError> {
	let mut sources: Vec<Box<dyn ConfigSource>> = vec![Box::new(DefaultsSource), Box::new(EnvSource)];
	if let Some(toml) = TomlSource::from_env() {
		sources.push(Box::new(toml));
	}
	load_from_sources(sources)
}

/// Load configuration with an explicit config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<PresignupConfig, ConfigError> {
	let sources: Vec<Box<dyn ConfigSource>> = vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	];
	load_from_sources(sources)
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<PresignupConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize a merged layer into resolved config.
pub fn finalize(layer: ConfigLayer) -> Result<PresignupConfig, ConfigError> {
	let config = PresignupConfig {
		linking: layer.linking.unwrap_or_default().finalize(),
		directory: layer.directory.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		require_verified_email = config.linking.require_verified_email,
		primary_provider = config.linking.primary_provider.as_deref().unwrap_or("<any>"),
		linked_provider = %config.linking.linked_provider,
		page_limit = config.directory.page_limit,
		custom_endpoint = config.directory.endpoint_url.is_some(),
		"configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &PresignupConfig) -> Result<(), ConfigError> {
	if config.linking.linked_provider.is_empty() {
		return Err(ConfigError::Validation(
			"linked provider must not be empty".to_string(),
		));
	}

	let limit = config.directory.page_limit;
	if limit == 0 || limit > MAX_PAGE_LIMIT {
		return Err(ConfigError::Validation(format!(
			"directory page limit {limit} must be between 1 and {MAX_PAGE_LIMIT}"
		)));
	}

	Ok(())
}
