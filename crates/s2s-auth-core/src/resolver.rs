// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The identity link resolver.
//!
//! Runs once per pre sign-up event: read the claim, look the email up in the
//! directory, apply [`decide`], and issue the admin link call when exactly one
//! linkable account exists. Nothing here returns an error; every failure is
//! logged and the event is handed back as it arrived.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::claim::{claim_from_event, PassThrough};
use crate::directory::UserDirectory;
use crate::event::SignupEvent;
use crate::policy::{decide, LinkDecision};
use crate::redact::redact_email;

/// Secondary provider whose presence marks an account as linkable.
pub const DEFAULT_LINKED_PROVIDER: &str = "SNOMED";

/// Largest page the user pool's ListUsers call accepts.
pub const MAX_PAGE_LIMIT: u32 = 60;

/// Tunables for the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
	/// Only link when the provider asserts `email_verified == "true"`.
	pub require_verified_email: bool,
	/// When set, identities from any other provider are left alone.
	pub primary_provider: Option<String>,
	/// Provider whose linked identity marks an existing account as the target.
	pub linked_provider: String,
	/// Maximum number of directory matches fetched per lookup.
	pub page_limit: u32,
}

impl Default for LinkPolicy {
	fn default() -> Self {
		Self {
			require_verified_email: true,
			primary_provider: None,
			linked_provider: DEFAULT_LINKED_PROVIDER.to_string(),
			page_limit: MAX_PAGE_LIMIT,
		}
	}
}

/// What the resolver did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	Skipped(PassThrough),
	LookupFailed,
	/// A decision other than [`LinkDecision::Link`].
	Decided(LinkDecision),
	EmptyLinkTarget,
	Linked { username: String },
	LinkFailed { username: String },
}

impl Outcome {
	pub fn as_str(&self) -> &'static str {
		match self {
			Outcome::Skipped(_) => "skipped",
			Outcome::LookupFailed => "lookup_failed",
			Outcome::Decided(decision) => decision.as_str(),
			Outcome::EmptyLinkTarget => "empty_link_target",
			Outcome::Linked { .. } => "linked",
			Outcome::LinkFailed { .. } => "link_failed",
		}
	}
}

/// The event to return to the platform plus what happened to it.
#[derive(Debug, Clone)]
pub struct Resolution {
	pub event: SignupEvent,
	pub outcome: Outcome,
}

pub struct IdentityLinkResolver {
	directory: Arc<dyn UserDirectory>,
	policy: LinkPolicy,
}

impl IdentityLinkResolver {
	pub fn new(directory: Arc<dyn UserDirectory>, policy: LinkPolicy) -> Self {
		Self { directory, policy }
	}

	pub fn policy(&self) -> &LinkPolicy {
		&self.policy
	}

	/// Resolve an event, returning only the event for the platform.
	pub async fn resolve(&self, event: SignupEvent) -> SignupEvent {
		self.evaluate(event).await.event
	}

	/// Resolve an event and report the outcome.
	#[instrument(skip_all, fields(user_name = event.user_name.as_deref().unwrap_or("")))]
	pub async fn evaluate(&self, mut event: SignupEvent) -> Resolution {
		let claim = match claim_from_event(&event, &self.policy) {
			Ok(claim) => claim,
			Err(reason) => {
				debug!(reason = %reason, "leaving sign-up event untouched");
				return Resolution {
					event,
					outcome: Outcome::Skipped(reason),
				};
			}
		};

		let email = redact_email(&claim.email);

		let users = match self
			.directory
			.list_users_by_email(&claim.user_pool_id, &claim.email, self.policy.page_limit)
			.await
		{
			Ok(users) => users,
			Err(e) => {
				error!(email = %email, error = %e, "directory lookup failed, not linking");
				return Resolution {
					event,
					outcome: Outcome::LookupFailed,
				};
			}
		};

		let decision = decide(&users, &self.policy.linked_provider);
		debug!(
			email = %email,
			matches = users.len(),
			decision = decision.as_str(),
			"link decision"
		);

		let username = match decision {
			LinkDecision::Link { username } => username,
			LinkDecision::CreateNew => {
				info!(email = %email, "no existing account, allowing new sign-up");
				return Resolution {
					event,
					outcome: Outcome::Decided(LinkDecision::CreateNew),
				};
			}
			LinkDecision::NotCrowdUser { username } => {
				info!(email = %email, username = %username, "not a crowd user, not linking");
				return Resolution {
					event,
					outcome: Outcome::Decided(LinkDecision::NotCrowdUser { username }),
				};
			}
			ambiguous => {
				error!(
					email = %email,
					linked_provider = %self.policy.linked_provider,
					decision = ambiguous.as_str(),
					"multiple candidate accounts for email, not linking"
				);
				return Resolution {
					event,
					outcome: Outcome::Decided(ambiguous),
				};
			}
		};

		if username.trim().is_empty() {
			warn!(email = %email, "link target has no username, not linking");
			return Resolution {
				event,
				outcome: Outcome::EmptyLinkTarget,
			};
		}

		match self
			.directory
			.link_provider_for_user(&claim.user_pool_id, &username, &claim.identity)
			.await
		{
			Ok(()) => {
				event.response.confirm_and_verify();
				info!(
					email = %email,
					username = %username,
					identity = %claim.identity,
					"linked federated identity to existing account"
				);
				Resolution {
					event,
					outcome: Outcome::Linked { username },
				}
			}
			Err(e) => {
				error!(
					email = %email,
					username = %username,
					identity = %claim.identity,
					error = %e,
					"failed to link federated identity"
				);
				Resolution {
					event,
					outcome: Outcome::LinkFailed { username },
				}
			}
		}
	}
}
