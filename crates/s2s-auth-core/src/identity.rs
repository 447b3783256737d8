// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Federated identity types.
//!
//! The user pool encodes linked identities as a JSON array stored in the
//! `identities` attribute:
//!
//! ```json
//! [{"userId":"U1","providerName":"SNOMED","providerType":"OIDC","primary":false}]
//! ```
//!
//! Providers are not consistent about typing `userId` (some send numbers), so
//! entries are read leniently from [`serde_json::Value`] rather than through a
//! strict derive.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The external identity that is signing up right now.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingIdentity {
	/// Provider name as registered in the user pool, e.g. `SNOMEDINTERNATIONAL`.
	pub provider_name: String,
	/// The user's ID at the provider.
	pub provider_user_id: String,
}

impl IncomingIdentity {
	pub fn new(provider_name: impl Into<String>, provider_user_id: impl Into<String>) -> Self {
		Self {
			provider_name: provider_name.into(),
			provider_user_id: provider_user_id.into(),
		}
	}

	/// Parse the first entry of a JSON-encoded identities claim.
	///
	/// Returns `None` when the claim is not valid JSON, is not an array, or is
	/// empty. A present entry with missing fields yields empty strings, which
	/// the caller rejects.
	pub fn from_claim(claim: &str) -> Option<Self> {
		let first = parse_identities(claim)?.into_iter().next()?;
		Some(Self {
			provider_name: first.provider_name.unwrap_or_default(),
			provider_user_id: first.user_id.unwrap_or_default(),
		})
	}

	/// Split a platform-assigned username of the form `<Provider>_<userId>`.
	///
	/// Only the first underscore separates; provider-side ids may contain more.
	pub fn from_username(username: &str) -> Option<Self> {
		let (provider, user_id) = username.split_once('_')?;
		Some(Self::new(provider, user_id))
	}

	pub fn is_complete(&self) -> bool {
		!self.provider_name.trim().is_empty() && !self.provider_user_id.trim().is_empty()
	}
}

impl fmt::Display for IncomingIdentity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.provider_name, self.provider_user_id)
	}
}

/// One entry of a directory user's `identities` attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedIdentity {
	pub provider_name: Option<String>,
	pub user_id: Option<String>,
}

impl LinkedIdentity {
	fn from_value(value: &Value) -> Option<Self> {
		let object = value.as_object()?;
		Some(Self {
			provider_name: object.get("providerName").and_then(value_to_string),
			user_id: object.get("userId").and_then(value_to_string),
		})
	}

	pub fn is_provider(&self, provider_name: &str) -> bool {
		self.provider_name.as_deref() == Some(provider_name)
	}
}

/// Parse a JSON-encoded identities array. Non-object entries are skipped.
pub fn parse_identities(raw: &str) -> Option<Vec<LinkedIdentity>> {
	let value: Value = serde_json::from_str(raw).ok()?;
	let entries = value.as_array()?;
	Some(entries.iter().filter_map(LinkedIdentity::from_value).collect())
}

fn value_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}
