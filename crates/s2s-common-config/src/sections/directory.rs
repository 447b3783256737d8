// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User directory (Cognito) section.

use s2s_auth_core::MAX_PAGE_LIMIT;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
	pub page_limit: u32,
	pub endpoint_url: Option<String>,
}

impl Default for DirectoryConfig {
	fn default() -> Self {
		DirectoryConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DirectoryConfigLayer {
	#[serde(default)]
	pub page_limit: Option<u32>,
	#[serde(default)]
	pub endpoint_url: Option<String>,
}

impl DirectoryConfigLayer {
	pub fn merge(&mut self, other: DirectoryConfigLayer) {
		if other.page_limit.is_some() {
			self.page_limit = other.page_limit;
		}
		if other.endpoint_url.is_some() {
			self.endpoint_url = other.endpoint_url;
		}
	}

	pub fn finalize(self) -> DirectoryConfig {
		DirectoryConfig {
			page_limit: self.page_limit.unwrap_or(MAX_PAGE_LIMIT),
			endpoint_url: self.endpoint_url.filter(|u| !u.trim().is_empty()),
		}
	}
}
