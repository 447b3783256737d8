// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use crate::sections::{DirectoryConfigLayer, LinkingConfigLayer, LoggingConfigLayer};

/// One source's partial view of the configuration.
///
/// TOML files use the same shape:
///
/// ```toml
/// [linking]
/// require_verified_email = true
/// linked_provider = "SNOMED"
///
/// [directory]
/// page_limit = 60
///
/// [logging]
/// level = "info"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
	#[serde(default)]
	pub linking: Option<LinkingConfigLayer>,
	#[serde(default)]
	pub directory: Option<DirectoryConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ConfigLayer {
	/// Overlay `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: ConfigLayer) {
		merge_section(&mut self.linking, other.linking, LinkingConfigLayer::merge);
		merge_section(&mut self.directory, other.directory, DirectoryConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	let Some(other) = other else {
		return;
	};
	match base {
		Some(existing) => merge(existing, other),
		None => *base = Some(other),
	}
}
