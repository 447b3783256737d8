// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The linking decision table.

use crate::directory::DirectoryUser;

/// Outcome of matching a claimed email against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
	/// No account has this email; the platform creates a new one.
	CreateNew,
	/// Exactly one account is already linked to the secondary provider.
	Link { username: String },
	/// A single account exists but it was never linked to the secondary
	/// provider, so it is not a crowd user.
	NotCrowdUser { username: String },
	/// Several accounts are linked to the secondary provider.
	AmbiguousLinked { count: usize },
	/// Several accounts share the email and none is linked.
	AmbiguousDuplicateEmail { count: usize },
}

impl LinkDecision {
	pub fn is_ambiguous(&self) -> bool {
		matches!(
			self,
			LinkDecision::AmbiguousLinked { .. } | LinkDecision::AmbiguousDuplicateEmail { .. }
		)
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			LinkDecision::CreateNew => "create_new",
			LinkDecision::Link { .. } => "link",
			LinkDecision::NotCrowdUser { .. } => "not_crowd_user",
			LinkDecision::AmbiguousLinked { .. } => "ambiguous_linked",
			LinkDecision::AmbiguousDuplicateEmail { .. } => "ambiguous_duplicate_email",
		}
	}
}

/// Decide what to do with the directory matches for a claimed email.
///
/// Rules are checked in order; the first that applies wins:
///
/// 1. no matches: create a new account
/// 2. exactly one match linked to `linked_provider`: link to it
/// 3. several matches linked to `linked_provider`: ambiguous
/// 4. exactly one match overall: not a crowd user
/// 5. otherwise: ambiguous duplicate email
pub fn decide(users: &[DirectoryUser], linked_provider: &str) -> LinkDecision {
	if users.is_empty() {
		return LinkDecision::CreateNew;
	}

	let linked: Vec<&DirectoryUser> = users
		.iter()
		.filter(|user| user.is_linked_to(linked_provider))
		.collect();

	match (linked.as_slice(), users) {
		([target], _) => LinkDecision::Link {
			username: target.username.clone(),
		},
		([_, _, ..], _) => LinkDecision::AmbiguousLinked {
			count: linked.len(),
		},
		([], [only]) => LinkDecision::NotCrowdUser {
			username: only.username.clone(),
		},
		([], _) => LinkDecision::AmbiguousDuplicateEmail { count: users.len() },
	}
}
