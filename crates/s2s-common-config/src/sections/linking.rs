// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity linking policy section.

use s2s_auth_core::DEFAULT_LINKED_PROVIDER;
use serde::Deserialize;

/// Linking configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkingConfig {
	pub require_verified_email: bool,
	pub primary_provider: Option<String>,
	pub linked_provider: String,
}

impl Default for LinkingConfig {
	fn default() -> Self {
		LinkingConfigLayer::default().finalize()
	}
}

/// Linking configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkingConfigLayer {
	#[serde(default)]
	pub require_verified_email: Option<bool>,
	#[serde(default)]
	pub primary_provider: Option<String>,
	#[serde(default)]
	pub linked_provider: Option<String>,
}

impl LinkingConfigLayer {
	pub fn merge(&mut self, other: LinkingConfigLayer) {
		if other.require_verified_email.is_some() {
			self.require_verified_email = other.require_verified_email;
		}
		if other.primary_provider.is_some() {
			self.primary_provider = other.primary_provider;
		}
		if other.linked_provider.is_some() {
			self.linked_provider = other.linked_provider;
		}
	}

	pub fn finalize(self) -> LinkingConfig {
		LinkingConfig {
			require_verified_email: self.require_verified_email.unwrap_or(true),
			primary_provider: self
				.primary_provider
				.map(|p| p.trim().to_string())
				.filter(|p| !p.is_empty()),
			linked_provider: self
				.linked_provider
				.map(|p| p.trim().to_string())
				.unwrap_or_else(|| DEFAULT_LINKED_PROVIDER.to_string()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = LinkingConfigLayer::default().finalize();
		assert!(config.require_verified_email);
		assert!(config.primary_provider.is_none());
		assert_eq!(config.linked_provider, "SNOMED");
	}

	#[test]
	fn test_blank_primary_provider_is_unset() {
		let layer = LinkingConfigLayer {
			primary_provider: Some("  ".to_string()),
			..Default::default()
		};
		assert!(layer.finalize().primary_provider.is_none());
	}

	#[test]
	fn test_merge_overwrites_only_set_fields() {
		let mut base = LinkingConfigLayer {
			require_verified_email: Some(false),
			primary_provider: Some("SNOMEDINTERNATIONAL".to_string()),
			linked_provider: None,
		};
		base.merge(LinkingConfigLayer {
			linked_provider: Some("CROWD".to_string()),
			..Default::default()
		});
		assert_eq!(base.require_verified_email, Some(false));
		assert_eq!(base.primary_provider.as_deref(), Some("SNOMEDINTERNATIONAL"));
		assert_eq!(base.linked_provider.as_deref(), Some("CROWD"));
	}
}
