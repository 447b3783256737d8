// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User directory seam.
//!
//! The resolver needs exactly two things from the user pool: a lookup of
//! accounts by email and the admin call that links a provider identity to an
//! existing account. Both sit behind [`UserDirectory`] so the policy can be
//! exercised without a live pool.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

use crate::event::{EMAIL_ATTRIBUTE, IDENTITIES_ATTRIBUTE};
use crate::identity::{parse_identities, IncomingIdentity, LinkedIdentity};

#[derive(Debug, Error)]
pub enum DirectoryError {
	#[error("user lookup failed: {0}")]
	Lookup(String),

	#[error("provider link failed: {0}")]
	Link(String),

	#[error("invalid directory data: {0}")]
	InvalidData(String),
}

/// An account record in the user pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub attributes: BTreeMap<String, String>,
}

impl DirectoryUser {
	pub fn new(username: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			attributes: BTreeMap::new(),
		}
	}

	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(String::as_str)
	}

	pub fn email(&self) -> Option<&str> {
		self.attribute(EMAIL_ATTRIBUTE)
	}

	/// Identities previously linked to this account.
	///
	/// A missing or malformed attribute reads as no linked identities.
	pub fn linked_identities(&self) -> Vec<LinkedIdentity> {
		self
			.attribute(IDENTITIES_ATTRIBUTE)
			.and_then(parse_identities)
			.unwrap_or_default()
	}

	pub fn is_linked_to(&self, provider_name: &str) -> bool {
		self
			.linked_identities()
			.iter()
			.any(|identity| identity.is_provider(provider_name))
	}
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
	/// All users whose email attribute equals `email`, at most `limit` of them.
	async fn list_users_by_email(
		&self,
		user_pool_id: &str,
		email: &str,
		limit: u32,
	) -> Result<Vec<DirectoryUser>, DirectoryError>;

	/// Link `identity` to the existing account `destination_username`.
	async fn link_provider_for_user(
		&self,
		user_pool_id: &str,
		destination_username: &str,
		identity: &IncomingIdentity,
	) -> Result<(), DirectoryError>;
}

/// A link call recorded by [`InMemoryDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCall {
	pub user_pool_id: String,
	pub destination_username: String,
	pub identity: IncomingIdentity,
}

/// Fixture-backed directory.
///
/// Serves lookups from a fixed user list and records link calls instead of
/// performing them. Used by tests and by the offline `decide` command.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
	users: Vec<DirectoryUser>,
	fail_lookup: bool,
	fail_link: bool,
	links: Mutex<Vec<LinkCall>>,
}

impl InMemoryDirectory {
	pub fn new(users: Vec<DirectoryUser>) -> Self {
		Self {
			users,
			..Self::default()
		}
	}

	/// Load users from a JSON array of [`DirectoryUser`].
	pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
		let users: Vec<DirectoryUser> =
			serde_json::from_str(json).map_err(|e| DirectoryError::InvalidData(e.to_string()))?;
		Ok(Self::new(users))
	}

	pub fn failing_lookup(mut self) -> Self {
		self.fail_lookup = true;
		self
	}

	pub fn failing_link(mut self) -> Self {
		self.fail_link = true;
		self
	}

	pub async fn link_calls(&self) -> Vec<LinkCall> {
		self.links.lock().await.clone()
	}
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
	async fn list_users_by_email(
		&self,
		_user_pool_id: &str,
		email: &str,
		limit: u32,
	) -> Result<Vec<DirectoryUser>, DirectoryError> {
		if self.fail_lookup {
			return Err(DirectoryError::Lookup("simulated lookup failure".to_string()));
		}

		let matches: Vec<DirectoryUser> = self
			.users
			.iter()
			.filter(|user| user.email().is_some_and(|e| e.eq_ignore_ascii_case(email)))
			.take(limit as usize)
			.cloned()
			.collect();

		debug!(matches = matches.len(), "in-memory directory lookup");
		Ok(matches)
	}

	async fn link_provider_for_user(
		&self,
		user_pool_id: &str,
		destination_username: &str,
		identity: &IncomingIdentity,
	) -> Result<(), DirectoryError> {
		if self.fail_link {
			return Err(DirectoryError::Link("simulated link failure".to_string()));
		}

		self.links.lock().await.push(LinkCall {
			user_pool_id: user_pool_id.to_string(),
			destination_username: destination_username.to_string(),
			identity: identity.clone(),
		});
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn linked(username: &str, email: &str, provider: &str) -> DirectoryUser {
		DirectoryUser::new(username)
			.with_attribute("email", email)
			.with_attribute(
				"identities",
				format!(r#"[{{"providerName":"{provider}","userId":"{username}"}}]"#),
			)
	}

	#[test]
	fn test_is_linked_to() {
		let user = linked("alice", "alice@example.com", "SNOMED");
		assert!(user.is_linked_to("SNOMED"));
		assert!(!user.is_linked_to("Google"));
	}

	#[test]
	fn test_malformed_identities_reads_as_unlinked() {
		let user = DirectoryUser::new("bob").with_attribute("identities", "{broken");
		assert!(user.linked_identities().is_empty());
		assert!(!user.is_linked_to("SNOMED"));
	}

	#[test]
	fn test_from_json() {
		let directory = InMemoryDirectory::from_json(
			r#"[{"username":"alice","attributes":{"email":"alice@example.com"}}]"#,
		)
		.unwrap();
		assert_eq!(directory.users.len(), 1);
		assert!(InMemoryDirectory::from_json("nope").is_err());
	}

	#[tokio::test]
	async fn test_lookup_matches_email_case_insensitively() {
		let directory = InMemoryDirectory::new(vec![
			linked("alice", "Alice@Example.com", "SNOMED"),
			linked("bob", "bob@example.com", "SNOMED"),
		]);
		let users = directory
			.list_users_by_email("pool", "alice@example.com", 60)
			.await
			.unwrap();
		assert_eq!(users.len(), 1);
		assert_eq!(users[0].username, "alice");
	}

	#[tokio::test]
	async fn test_lookup_respects_limit() {
		let directory = InMemoryDirectory::new(
			(0..5)
				.map(|i| linked(&format!("u{i}"), "same@example.com", "SNOMED"))
				.collect(),
		);
		let users = directory
			.list_users_by_email("pool", "same@example.com", 2)
			.await
			.unwrap();
		assert_eq!(users.len(), 2);
	}

	#[tokio::test]
	async fn test_link_calls_are_recorded() {
		let directory = InMemoryDirectory::default();
		let identity = IncomingIdentity::new("SNOMEDINTERNATIONAL", "U1");
		directory
			.link_provider_for_user("pool", "alice", &identity)
			.await
			.unwrap();

		let calls = directory.link_calls().await;
		assert_eq!(
			calls,
			vec![LinkCall {
				user_pool_id: "pool".to_string(),
				destination_username: "alice".to_string(),
				identity,
			}]
		);
	}

	#[tokio::test]
	async fn test_failure_switches() {
		let directory = InMemoryDirectory::default().failing_lookup().failing_link();
		assert!(matches!(
			directory.list_users_by_email("pool", "a@b.com", 1).await,
			Err(DirectoryError::Lookup(_))
		));
		assert!(matches!(
			directory
				.link_provider_for_user("pool", "a", &IncomingIdentity::new("P", "1"))
				.await,
			Err(DirectoryError::Link(_))
		));
	}
}
